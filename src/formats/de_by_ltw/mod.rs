//! Readers for the Bavarian Landtagswahl XML exports.
//!
//! Two documents make up one election: the results file (Wahlkreis ->
//! Partei -> Kandidat -> per-Stimmkreis vote entries) and the general
//! information file (one regional unit per Stimmkreis, plus aggregate
//! rollup rows that must be ignored).

use crate::formats::common::EntityIndex;
use crate::import::{ImportError, Result};
use crate::model::wahl::{
    Kandidat, KandidatId, ParsedResults, Partei, ParteiId, StimmkreisDetails, StimmkreisId,
    StimmkreisStub, WahlkreisId,
};
use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Value of the `Stimmentyp` attribute marking the one first-vote entry.
const ERSTSTIMMEN: &str = "Erststimmen";

pub fn read_results(path: &Path) -> Result<ParsedResults> {
    let xml = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_results(&xml)
}

pub fn read_general_info(path: &Path) -> Result<Vec<StimmkreisDetails>> {
    let xml = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_general_info(&xml)
}

/// Walks the results document and builds the deduplicated entity arenas
/// and both cross-reference vote maps.
pub fn parse_results(xml: &str) -> Result<ParsedResults> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    let mut wahlkreise: EntityIndex<String, String> = EntityIndex::new();
    let mut parteien: EntityIndex<String, Partei> = EntityIndex::new();
    let mut stimmkreise: EntityIndex<u32, StimmkreisStub> = EntityIndex::new();
    let mut kandidaten: Vec<Kandidat> = Vec::new();
    let mut kandidaten_stimmen: HashMap<(StimmkreisId, KandidatId), u32> = HashMap::new();
    let mut parteien_stimmen: HashMap<(StimmkreisId, ParteiId), u32> = HashMap::new();

    for wahlkreis_elem in root.children().filter(|n| n.is_element()) {
        let wahlkreis_name = child_text(wahlkreis_elem, "Name")?;
        let wahlkreis = WahlkreisId(
            wahlkreise.intern(wahlkreis_name.to_string(), || wahlkreis_name.to_string()),
        );

        for partei_elem in wahlkreis_elem.children().filter(|n| n.has_tag_name("Partei")) {
            let partei_name = child_text(partei_elem, "Name")?;
            // Parties span Wahlkreise: candidates of the same party in
            // different regions share one Partei entity.
            let partei = ParteiId(parteien.intern(partei_name.to_string(), || Partei {
                name: partei_name.to_string(),
            }));

            for kandidat_elem in partei_elem.children().filter(|n| n.has_tag_name("Kandidat")) {
                let kandidat_id = KandidatId(kandidaten.len() as u32);
                let mut kandidat = Kandidat {
                    vorname: child_text(kandidat_elem, "Vorname")?.trim().to_string(),
                    nachname: child_text(kandidat_elem, "Nachname")?.trim().to_string(),
                    partei,
                    wahlkreis,
                    listenplatz: child_u32(kandidat_elem, "AnfangListenPos")?,
                    gesamtstimmen: child_u32(kandidat_elem, "Gesamtstimmen")?,
                    zweitstimmen: child_u32(kandidat_elem, "Zweitstimmen")?,
                    stimmkreis: None,
                    erststimmen: None,
                };

                for sk_elem in kandidat_elem.children().filter(|n| n.has_tag_name("Stimmkreis")) {
                    let nr = child_u32(sk_elem, "NrSK")?;
                    let ohne_kandidat = child_u32(sk_elem, "ZweitSohneKandidat")?;
                    let stimmkreis = StimmkreisId(stimmkreise.intern(nr, || StimmkreisStub {
                        schluessel: nr,
                        wahlkreis,
                    }));

                    let num_stimmen = child(sk_elem, "NumStimmen")?;
                    let stimmentyp = num_stimmen.attribute("Stimmentyp").ok_or(
                        ImportError::MissingAttribute {
                            element: "NumStimmen",
                            attr: "Stimmentyp",
                        },
                    )?;
                    let stimmen = parse_u32("NumStimmen", num_stimmen.text().unwrap_or(""))?;

                    if stimmentyp == ERSTSTIMMEN {
                        // The one entry naming the candidate's own Stimmkreis.
                        kandidat.stimmkreis = Some(stimmkreis);
                        kandidat.erststimmen = Some(stimmen);
                    } else {
                        kandidaten_stimmen.insert((stimmkreis, kandidat_id), stimmen);
                        // First writer wins: the candidate-less party tally
                        // is identical on every entry for the same pair.
                        parteien_stimmen
                            .entry((stimmkreis, partei))
                            .or_insert(ohne_kandidat);
                    }
                }

                kandidaten.push(kandidat);
            }
        }
    }

    Ok(ParsedResults {
        wahlkreis_namen: wahlkreise.into_vec(),
        parteien: parteien.into_vec(),
        kandidaten,
        stimmkreis_stubs: stimmkreise.into_vec(),
        stimmkreis_kandidaten_stimmen: kandidaten_stimmen,
        stimmkreis_parteien_stimmen: parteien_stimmen,
    })
}

/// Reads the general-information document into one enrichment record per
/// real Stimmkreis.
///
/// Regional units with key >= 900 or divisible by 100 are state- or
/// Wahlkreis-level rollups and are skipped before anything else is read,
/// so aggregate rows may lack the remaining fields entirely.
pub fn parse_general_info(xml: &str) -> Result<Vec<StimmkreisDetails>> {
    let doc = Document::parse(xml)?;
    let mut details = Vec::new();

    for einheit in doc.root_element().children().filter(|n| n.is_element()) {
        let angaben = child(einheit, "Allgemeine_Angaben")?;
        let schluessel = child_u32(angaben, "Schluesselnummer")?;
        if schluessel >= 900 || schluessel % 100 == 0 {
            continue;
        }

        details.push(StimmkreisDetails {
            schluessel,
            name: child_text(angaben, "Name_der_Regionaleinheit")?
                .trim()
                .to_string(),
            wahlberechtigte: child_u32(angaben, "Stimmberechtigte")?,
            ungueltige_erststimmen: child_u32(
                angaben,
                "ungueltige_Erststimmen_der_aktuellen_Wahl",
            )?,
            ungueltige_zweitstimmen: child_u32(
                angaben,
                "ungueltige_Zweitstimmen_der_aktuellen_Wahl",
            )?,
        });
    }

    Ok(details)
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &'static str) -> Result<Node<'a, 'input>> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .ok_or_else(|| ImportError::MissingElement {
            element: name,
            parent: node.tag_name().name().to_string(),
        })
}

fn child_text<'a>(node: Node<'a, '_>, name: &'static str) -> Result<&'a str> {
    Ok(child(node, name)?.text().unwrap_or(""))
}

fn child_u32(node: Node, name: &'static str) -> Result<u32> {
    parse_u32(name, child_text(node, name)?)
}

fn parse_u32(element: &'static str, text: &str) -> Result<u32> {
    let trimmed = text.trim();
    trimmed.parse().map_err(|_| ImportError::InvalidNumber {
        element,
        value: trimmed.to_string(),
    })
}
