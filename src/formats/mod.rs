pub mod common;
pub mod de_by_ltw;
