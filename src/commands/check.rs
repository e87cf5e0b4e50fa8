use crate::import::{import_wahlinfo, Result};
use colored::*;
use itertools::Itertools;
use std::path::Path;

/// Imports both files and reports how consistent they are with each other
/// and with the seat table. Findings are informational; only parse and
/// join failures abort.
pub fn check(ergebnisse: &Path, allgemeine_info: &Path, wahljahr: u16) -> Result<()> {
    println!(
        "🔍 Checking {} against {}",
        ergebnisse.display().to_string().bright_cyan(),
        allgemeine_info.display().to_string().bright_cyan()
    );

    let data = import_wahlinfo(ergebnisse, allgemeine_info, wahljahr)?;

    let unenriched: Vec<u32> = data
        .stimmkreise
        .iter()
        .filter(|s| s.name.is_none())
        .map(|s| s.schluessel)
        .sorted()
        .collect();
    if unenriched.is_empty() {
        println!(
            "✅ all {} Stimmkreise carry general information",
            data.stimmkreise.len().to_string().bright_green()
        );
    } else {
        println!(
            "⚠️  {} Stimmkreise without general information: {}",
            unenriched.len().to_string().bright_yellow(),
            unenriched.iter().map(|nr| nr.to_string()).join(", ")
        );
    }

    let unpatched: Vec<&str> = data
        .wahlkreise
        .iter()
        .filter(|w| w.anzahl_sitze.is_none())
        .map(|w| w.name.as_str())
        .collect();
    if unpatched.is_empty() {
        println!(
            "✅ all {} Wahlkreise have a seat allocation for {}",
            data.wahlkreise.len().to_string().bright_green(),
            wahljahr
        );
    } else {
        println!(
            "⚠️  {} Wahlkreise without a seat allocation for {}: {}",
            unpatched.len().to_string().bright_yellow(),
            wahljahr,
            unpatched.join(", ")
        );
    }

    let direktkandidaten = data
        .kandidaten
        .iter()
        .filter(|k| k.stimmkreis.is_some())
        .count();
    println!(
        "ℹ️  {} of {} Kandidaten contest a Stimmkreis directly",
        direktkandidaten.to_string().bright_white(),
        data.kandidaten.len()
    );

    Ok(())
}
