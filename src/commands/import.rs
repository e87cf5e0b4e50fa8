use crate::import::{import_wahlinfo, Result};
use crate::model::wahl::{WahlData, WahlkreisId};
use colored::*;
use itertools::Itertools;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub wahljahr: u16,
    pub wahlkreise: usize,
    pub parteien: usize,
    pub kandidaten: usize,
    pub stimmkreise: usize,
    pub kandidaten_stimmen_eintraege: usize,
    pub parteien_stimmen_eintraege: usize,
    pub duration_ms: u64,
}

pub fn import(ergebnisse: &Path, allgemeine_info: &Path, wahljahr: u16, json: bool) -> Result<()> {
    if !json {
        println!(
            "🚀 Importing {} results from {}",
            wahljahr.to_string().bright_cyan(),
            ergebnisse.display().to_string().bright_cyan()
        );
    }

    let start = Instant::now();
    let data = import_wahlinfo(ergebnisse, allgemeine_info, wahljahr)?;
    let duration_ms = start.elapsed().as_millis() as u64;

    let summary = ImportSummary {
        wahljahr,
        wahlkreise: data.wahlkreise.len(),
        parteien: data.parteien.len(),
        kandidaten: data.kandidaten.len(),
        stimmkreise: data.stimmkreise.len(),
        kandidaten_stimmen_eintraege: data.stimmkreis_kandidaten_stimmen.len(),
        parteien_stimmen_eintraege: data.stimmkreis_parteien_stimmen.len(),
        duration_ms,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).expect("summary serializes")
        );
        return Ok(());
    }

    print_summary(&summary);
    print_wahlkreis_table(&data);
    print_partei_table(&data);
    Ok(())
}

fn print_summary(summary: &ImportSummary) {
    println!("\n{}", "🎉 Import Complete!".bright_green().bold());
    println!("{}", "=".repeat(50).bright_green());
    println!(
        "{}: {}",
        "Wahlkreise".bright_white().bold(),
        summary.wahlkreise.to_string().bright_yellow()
    );
    println!(
        "{}: {}",
        "Parteien".bright_white().bold(),
        summary.parteien.to_string().bright_yellow()
    );
    println!(
        "{}: {}",
        "Kandidaten".bright_white().bold(),
        summary.kandidaten.to_string().bright_yellow()
    );
    println!(
        "{}: {}",
        "Stimmkreise".bright_white().bold(),
        summary.stimmkreise.to_string().bright_yellow()
    );
    println!(
        "{}: {} / {}",
        "Stimmen-Eintraege (Kandidat / Partei)".bright_white().bold(),
        summary.kandidaten_stimmen_eintraege.to_string().bright_yellow(),
        summary.parteien_stimmen_eintraege.to_string().bright_yellow()
    );
    println!(
        "{}: {} ms",
        "Duration".bright_white().bold(),
        summary.duration_ms.to_string().bright_green()
    );
}

fn print_wahlkreis_table(data: &WahlData) {
    println!("\n{}", "Wahlkreise".bright_white().bold());

    let by_schluessel = data
        .wahlkreise
        .iter()
        .enumerate()
        .sorted_by_key(|(_, wk)| wk.schluessel.unwrap_or(u16::MAX));

    for (idx, wahlkreis) in by_schluessel {
        let id = WahlkreisId(idx as u32);
        let kandidaten = data.kandidaten.iter().filter(|k| k.wahlkreis == id).count();
        let stimmkreise = data.stimmkreise.iter().filter(|s| s.wahlkreis == id).count();
        let sitze = match wahlkreis.anzahl_sitze {
            Some(n) => n.to_string(),
            None => "-".to_string(),
        };

        println!(
            "  {:<14} {:>3} Sitze  {:>3} Stimmkreise  {:>4} Kandidaten",
            wahlkreis.name.bright_cyan(),
            sitze,
            stimmkreise,
            kandidaten
        );
    }
}

fn print_partei_table(data: &WahlData) {
    println!("\n{}", "Parteien".bright_white().bold());

    let kandidaten_pro_partei = data.kandidaten.iter().counts_by(|k| k.partei);
    for (partei, kandidaten) in kandidaten_pro_partei
        .into_iter()
        .sorted_by_key(|&(partei, kandidaten)| (std::cmp::Reverse(kandidaten), partei))
    {
        println!(
            "  {:<24} {:>4} Kandidaten",
            data.partei(partei).name,
            kandidaten
        );
    }
}
