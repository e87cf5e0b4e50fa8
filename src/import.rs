//! The import pipeline: results file, then general information, then the
//! seat table, assembled into one immutable [`WahlData`] snapshot.

use crate::formats::de_by_ltw;
use crate::model::wahl::{
    ParsedResults, Stimmkreis, StimmkreisDetails, StimmkreisId, WahlData, Wahlkreis,
};
use crate::seats;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("missing element <{element}> under <{parent}>")]
    MissingElement {
        element: &'static str,
        parent: String,
    },
    #[error("missing attribute {attr} on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attr: &'static str,
    },
    #[error("expected an integer in <{element}>, found {value:?}")]
    InvalidNumber {
        element: &'static str,
        value: String,
    },
    #[error("general information names Stimmkreis {0}, which the results file does not contain")]
    UnknownStimmkreis(u32),
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// Imports one election. Any parse or consistency failure aborts the whole
/// run; there is no partial snapshot.
pub fn import_wahlinfo(
    ergebnisse: &Path,
    allgemeine_info: &Path,
    wahljahr: u16,
) -> Result<WahlData> {
    let parsed = de_by_ltw::read_results(ergebnisse)?;
    let details = de_by_ltw::read_general_info(allgemeine_info)?;
    assemble(parsed, details, wahljahr)
}

/// Joins the two parsed stages and the seat table into the final snapshot.
///
/// Every enrichment record must name a Stimmkreis the results file already
/// produced; the join never creates entities. Stimmkreise absent from the
/// general information keep `None` details, Wahlkreis names absent from the
/// seat table (or any table-less year) keep `None` seats and key.
pub fn assemble(
    parsed: ParsedResults,
    details: Vec<StimmkreisDetails>,
    wahljahr: u16,
) -> Result<WahlData> {
    let by_schluessel: HashMap<u32, StimmkreisId> = parsed
        .stimmkreis_stubs
        .iter()
        .enumerate()
        .map(|(i, stub)| (stub.schluessel, StimmkreisId(i as u32)))
        .collect();

    let mut details_by_id: HashMap<StimmkreisId, StimmkreisDetails> = HashMap::new();
    for detail in details {
        let id = by_schluessel
            .get(&detail.schluessel)
            .copied()
            .ok_or(ImportError::UnknownStimmkreis(detail.schluessel))?;
        details_by_id.insert(id, detail);
    }

    let stimmkreise: Vec<Stimmkreis> = parsed
        .stimmkreis_stubs
        .into_iter()
        .enumerate()
        .map(|(i, stub)| match details_by_id.remove(&StimmkreisId(i as u32)) {
            Some(detail) => Stimmkreis {
                schluessel: stub.schluessel,
                wahlkreis: stub.wahlkreis,
                name: Some(detail.name),
                wahlberechtigte: Some(detail.wahlberechtigte),
                ungueltige_erststimmen: Some(detail.ungueltige_erststimmen),
                ungueltige_zweitstimmen: Some(detail.ungueltige_zweitstimmen),
            },
            None => Stimmkreis {
                schluessel: stub.schluessel,
                wahlkreis: stub.wahlkreis,
                name: None,
                wahlberechtigte: None,
                ungueltige_erststimmen: None,
                ungueltige_zweitstimmen: None,
            },
        })
        .collect();

    let table = seats::allocation_for_year(wahljahr);
    let wahlkreise: Vec<Wahlkreis> = parsed
        .wahlkreis_namen
        .into_iter()
        .map(|name| {
            let row = table.and_then(|t| seats::lookup(t, &name));
            Wahlkreis {
                name,
                anzahl_sitze: row.map(|r| r.anzahl_sitze),
                schluessel: row.map(|r| r.schluessel),
            }
        })
        .collect();

    Ok(WahlData {
        wahlkreise,
        parteien: parsed.parteien,
        kandidaten: parsed.kandidaten,
        stimmkreise,
        stimmkreis_kandidaten_stimmen: parsed.stimmkreis_kandidaten_stimmen,
        stimmkreis_parteien_stimmen: parsed.stimmkreis_parteien_stimmen,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::de_by_ltw::{parse_general_info, parse_results};
    use crate::model::wahl::{KandidatId, ParteiId};
    use std::fs;

    const RESULTS: &str = r#"
        <Ergebnisse>
          <Wahlkreis>
            <Name>Oberbayern</Name>
            <Partei>
              <Name>CSU</Name>
              <Kandidat>
                <Vorname>Ilse</Vorname>
                <Nachname>Aigner</Nachname>
                <AnfangListenPos>1</AnfangListenPos>
                <Gesamtstimmen>9800</Gesamtstimmen>
                <Zweitstimmen>4800</Zweitstimmen>
                <Stimmkreis>
                  <NrSK>101</NrSK>
                  <ZweitSohneKandidat>200</ZweitSohneKandidat>
                  <NumStimmen Stimmentyp="Erststimmen">5000</NumStimmen>
                </Stimmkreis>
                <Stimmkreis>
                  <NrSK>101</NrSK>
                  <ZweitSohneKandidat>200</ZweitSohneKandidat>
                  <NumStimmen Stimmentyp="Zweitstimmen">4800</NumStimmen>
                </Stimmkreis>
              </Kandidat>
            </Partei>
          </Wahlkreis>
          <Wahlkreis>
            <Name>Frankenland</Name>
            <Partei>
              <Name>SPD</Name>
              <Kandidat>
                <Vorname>Max</Vorname>
                <Nachname>Muster</Nachname>
                <AnfangListenPos>3</AnfangListenPos>
                <Gesamtstimmen>700</Gesamtstimmen>
                <Zweitstimmen>300</Zweitstimmen>
                <Stimmkreis>
                  <NrSK>401</NrSK>
                  <ZweitSohneKandidat>40</ZweitSohneKandidat>
                  <NumStimmen Stimmentyp="Zweitstimmen">300</NumStimmen>
                </Stimmkreis>
              </Kandidat>
            </Partei>
          </Wahlkreis>
        </Ergebnisse>"#;

    const GENERAL_INFO: &str = r#"
        <Regionaleinheiten>
          <Regionaleinheit>
            <Allgemeine_Angaben>
              <Schluesselnummer>900</Schluesselnummer>
            </Allgemeine_Angaben>
          </Regionaleinheit>
          <Regionaleinheit>
            <Allgemeine_Angaben>
              <Schluesselnummer>101</Schluesselnummer>
              <Name_der_Regionaleinheit>München-Hadern</Name_der_Regionaleinheit>
              <Stimmberechtigte>110000</Stimmberechtigte>
              <ungueltige_Erststimmen_der_aktuellen_Wahl>1200</ungueltige_Erststimmen_der_aktuellen_Wahl>
              <ungueltige_Zweitstimmen_der_aktuellen_Wahl>900</ungueltige_Zweitstimmen_der_aktuellen_Wahl>
            </Allgemeine_Angaben>
          </Regionaleinheit>
        </Regionaleinheiten>"#;

    fn import_fixtures(wahljahr: u16) -> WahlData {
        assemble(
            parse_results(RESULTS).unwrap(),
            parse_general_info(GENERAL_INFO).unwrap(),
            wahljahr,
        )
        .unwrap()
    }

    #[test]
    fn end_to_end_snapshot_for_2018() {
        let data = import_fixtures(2018);

        assert_eq!(data.wahlkreise.len(), 2);
        assert_eq!(data.parteien.len(), 2);
        assert_eq!(data.kandidaten.len(), 2);
        assert_eq!(data.stimmkreise.len(), 2);

        let aigner = &data.kandidaten[0];
        assert_eq!(aigner.erststimmen, Some(5000));
        let stimmkreis = data.stimmkreis(aigner.stimmkreis.unwrap());
        assert_eq!(stimmkreis.schluessel, 101);

        assert_eq!(
            data.stimmkreis_kandidaten_stimmen[&(StimmkreisId(0), KandidatId(0))],
            4800
        );
        assert_eq!(
            data.stimmkreis_parteien_stimmen[&(StimmkreisId(0), ParteiId(0))],
            200
        );
        assert_eq!(data.stimmkreis_by_schluessel(101), Some(StimmkreisId(0)));
        assert_eq!(data.stimmkreis_by_schluessel(999), None);
    }

    #[test]
    fn enrichment_fills_matching_stimmkreise_and_creates_none() {
        let data = import_fixtures(2018);

        let enriched = data
            .stimmkreis(data.stimmkreis_by_schluessel(101).unwrap());
        assert_eq!(enriched.name.as_deref(), Some("München-Hadern"));
        assert_eq!(enriched.wahlberechtigte, Some(110000));
        assert_eq!(enriched.ungueltige_erststimmen, Some(1200));
        assert_eq!(enriched.ungueltige_zweitstimmen, Some(900));

        // 401 has no general-information row; it survives with empty details.
        let bare = data.stimmkreis(data.stimmkreis_by_schluessel(401).unwrap());
        assert_eq!(bare.name, None);
        assert_eq!(bare.wahlberechtigte, None);

        assert_eq!(data.stimmkreise.len(), 2);
    }

    #[test]
    fn enrichment_for_an_unknown_real_key_is_fatal() {
        let info = r#"
            <Regionaleinheiten>
              <Regionaleinheit>
                <Allgemeine_Angaben>
                  <Schluesselnummer>512</Schluesselnummer>
                  <Name_der_Regionaleinheit>Nirgendwo</Name_der_Regionaleinheit>
                  <Stimmberechtigte>1</Stimmberechtigte>
                  <ungueltige_Erststimmen_der_aktuellen_Wahl>0</ungueltige_Erststimmen_der_aktuellen_Wahl>
                  <ungueltige_Zweitstimmen_der_aktuellen_Wahl>0</ungueltige_Zweitstimmen_der_aktuellen_Wahl>
                </Allgemeine_Angaben>
              </Regionaleinheit>
            </Regionaleinheiten>"#;

        let result = assemble(
            parse_results(RESULTS).unwrap(),
            parse_general_info(info).unwrap(),
            2018,
        );
        match result {
            Err(ImportError::UnknownStimmkreis(512)) => {}
            other => panic!("expected UnknownStimmkreis(512), got {:?}", other),
        }
    }

    #[test]
    fn aggregate_units_never_reach_the_join() {
        // GENERAL_INFO contains a bare key-900 rollup with no matching
        // Stimmkreis; the import must not even attempt the lookup.
        assert!(import_fixtures(2018).stimmkreise.len() == 2);
    }

    #[test]
    fn seat_patch_depends_on_the_election_year() {
        let data_2018 = import_fixtures(2018);
        let oberbayern = &data_2018.wahlkreise[0];
        assert_eq!(oberbayern.anzahl_sitze, Some(61));
        assert_eq!(oberbayern.schluessel, Some(901));

        let data_2013 = import_fixtures(2013);
        assert_eq!(data_2013.wahlkreise[0].anzahl_sitze, Some(60));
        assert_eq!(data_2013.wahlkreise[0].schluessel, Some(901));

        // Not a Wahlkreis the table knows; stays unpatched in every year.
        let franken = &data_2018.wahlkreise[1];
        assert_eq!(franken.name, "Frankenland");
        assert_eq!(franken.anzahl_sitze, None);
        assert_eq!(franken.schluessel, None);
    }

    #[test]
    fn unknown_year_leaves_every_wahlkreis_unpatched() {
        let data = import_fixtures(1998);
        assert!(data.wahlkreise.iter().all(|w| w.anzahl_sitze.is_none()));
        assert!(data.wahlkreise.iter().all(|w| w.schluessel.is_none()));
    }

    #[test]
    fn import_wahlinfo_reads_both_files_from_disk() {
        let dir = std::env::temp_dir();
        let ergebnisse = dir.join("wahl_import_test_ergebnisse.xml");
        let info = dir.join("wahl_import_test_allgemeine_info.xml");
        fs::write(&ergebnisse, RESULTS).unwrap();
        fs::write(&info, GENERAL_INFO).unwrap();

        let data = import_wahlinfo(&ergebnisse, &info, 2018).unwrap();
        assert_eq!(data.kandidaten.len(), 2);
        assert_eq!(data.wahlkreise[0].anzahl_sitze, Some(61));

        fs::remove_file(ergebnisse).ok();
        fs::remove_file(info).ok();
    }

    #[test]
    fn missing_input_file_is_a_fatal_io_error() {
        let missing = Path::new("/nonexistent/2018Ergebnisse_final.xml");
        match import_wahlinfo(missing, missing, 2018) {
            Err(ImportError::Io { path, .. }) => assert_eq!(path, missing.to_path_buf()),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
