//! Canonicalization of free-text wine geography.
//!
//! Guesses and wine records are typed by people, so "Châteauneuf-du-Pape",
//! "chateauneuf du pape" and "CdP AOC" must land on the same value before
//! they are compared. Every function here is total: unknown input comes back
//! trimmed and unchanged so that it still matches itself.

mod country;
mod normalize;
mod region;

pub use country::canonicalize_country;
pub use normalize::{normalize_key, same_value};
pub use region::canonicalize_region;
