//! Statutory seat allocation per Wahlkreis, embedded as static data.
//!
//! Values follow the official Stimmkreisbericht (180 statutory seats per
//! term); the redistricting between 2013 and 2018 moved one Oberbayern seat
//! at Unterfranken's expense. The numeric keys are identical in both terms.

/// One row of the reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatAllocation {
    pub wahlkreis: &'static str,
    pub anzahl_sitze: u16,
    pub schluessel: u16,
}

const fn row(wahlkreis: &'static str, anzahl_sitze: u16, schluessel: u16) -> SeatAllocation {
    SeatAllocation {
        wahlkreis,
        anzahl_sitze,
        schluessel,
    }
}

pub const SITZE_2013: &[SeatAllocation] = &[
    row("Oberbayern", 60, 901),
    row("Niederbayern", 18, 902),
    row("Oberpfalz", 16, 903),
    row("Oberfranken", 16, 904),
    row("Mittelfranken", 24, 905),
    row("Unterfranken", 20, 906),
    row("Schwaben", 26, 907),
];

pub const SITZE_2018: &[SeatAllocation] = &[
    row("Oberbayern", 61, 901),
    row("Niederbayern", 18, 902),
    row("Oberpfalz", 16, 903),
    row("Oberfranken", 16, 904),
    row("Mittelfranken", 24, 905),
    row("Unterfranken", 19, 906),
    row("Schwaben", 26, 907),
];

/// Table for the given election year; `None` for years without one, in
/// which case the patch stage is a silent no-op.
pub fn allocation_for_year(wahljahr: u16) -> Option<&'static [SeatAllocation]> {
    match wahljahr {
        2013 => Some(SITZE_2013),
        2018 => Some(SITZE_2018),
        _ => None,
    }
}

pub fn lookup(table: &'static [SeatAllocation], name: &str) -> Option<&'static SeatAllocation> {
    table.iter().find(|row| row.wahlkreis == name)
}
