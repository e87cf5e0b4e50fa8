//! Entity model for one imported Landtagswahl.
//!
//! Entities are stored in dense arenas inside the snapshot and addressed by
//! typed indices. Identity is the arena index, never structural equality:
//! two candidates with identical names stay two distinct entities.

use std::collections::HashMap;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WahlkreisId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParteiId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StimmkreisId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KandidatId(pub u32);

/// One of the seven large electoral regions of Bavaria.
///
/// Seat allocation and key come from the embedded reference table, not from
/// the XML; both stay `None` for names the table does not know.
#[derive(Debug, Clone, PartialEq)]
pub struct Wahlkreis {
    pub name: String,
    pub anzahl_sitze: Option<u16>,
    pub schluessel: Option<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partei {
    pub name: String,
}

/// Smallest electoral unit, uniquely numbered across Bavaria.
///
/// Only `schluessel` and the owning Wahlkreis are known from the results
/// file; everything else is filled from the general-information file.
#[derive(Debug, Clone, PartialEq)]
pub struct Stimmkreis {
    pub schluessel: u32,
    pub wahlkreis: WahlkreisId,
    pub name: Option<String>,
    pub wahlberechtigte: Option<u32>,
    pub ungueltige_erststimmen: Option<u32>,
    pub ungueltige_zweitstimmen: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kandidat {
    pub vorname: String,
    pub nachname: String,
    pub partei: ParteiId,
    pub wahlkreis: WahlkreisId,
    pub listenplatz: u32,
    pub gesamtstimmen: u32,
    pub zweitstimmen: u32,
    /// Stimmkreis the candidate contests as direct nominee, if any.
    /// Set from the single vote entry typed as Erststimmen.
    pub stimmkreis: Option<StimmkreisId>,
    pub erststimmen: Option<u32>,
}

/// Stimmkreis as discovered in the results file: key and owner only.
#[derive(Debug, Clone, PartialEq)]
pub struct StimmkreisStub {
    pub schluessel: u32,
    pub wahlkreis: WahlkreisId,
}

/// Everything the results file yields. Immutable once returned by the
/// reader; the later stages join against it instead of mutating it.
#[derive(Debug)]
pub struct ParsedResults {
    pub wahlkreis_namen: Vec<String>,
    pub parteien: Vec<Partei>,
    pub kandidaten: Vec<Kandidat>,
    pub stimmkreis_stubs: Vec<StimmkreisStub>,
    pub stimmkreis_kandidaten_stimmen: HashMap<(StimmkreisId, KandidatId), u32>,
    pub stimmkreis_parteien_stimmen: HashMap<(StimmkreisId, ParteiId), u32>,
}

/// Per-Stimmkreis record from the general-information file.
#[derive(Debug, Clone, PartialEq)]
pub struct StimmkreisDetails {
    pub schluessel: u32,
    pub name: String,
    pub wahlberechtigte: u32,
    pub ungueltige_erststimmen: u32,
    pub ungueltige_zweitstimmen: u32,
}

/// The assembled snapshot of one election. Handed to the caller after the
/// last pipeline stage and not modified afterwards.
#[derive(Debug)]
pub struct WahlData {
    pub wahlkreise: Vec<Wahlkreis>,
    pub parteien: Vec<Partei>,
    pub kandidaten: Vec<Kandidat>,
    pub stimmkreise: Vec<Stimmkreis>,
    /// Zweitstimmen cast for a specific candidate, per Stimmkreis.
    pub stimmkreis_kandidaten_stimmen: HashMap<(StimmkreisId, KandidatId), u32>,
    /// Zweitstimmen cast for a party list without a named candidate,
    /// per Stimmkreis.
    pub stimmkreis_parteien_stimmen: HashMap<(StimmkreisId, ParteiId), u32>,
}

impl WahlData {
    pub fn wahlkreis(&self, id: WahlkreisId) -> &Wahlkreis {
        &self.wahlkreise[id.0 as usize]
    }

    pub fn partei(&self, id: ParteiId) -> &Partei {
        &self.parteien[id.0 as usize]
    }

    pub fn kandidat(&self, id: KandidatId) -> &Kandidat {
        &self.kandidaten[id.0 as usize]
    }

    pub fn stimmkreis(&self, id: StimmkreisId) -> &Stimmkreis {
        &self.stimmkreise[id.0 as usize]
    }

    pub fn stimmkreis_by_schluessel(&self, schluessel: u32) -> Option<StimmkreisId> {
        self.stimmkreise
            .iter()
            .position(|s| s.schluessel == schluessel)
            .map(|i| StimmkreisId(i as u32))
    }
}
