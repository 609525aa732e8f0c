//! Protocol operations over a shared graph store.
//!
//! Each public operation owns its boundary logging; see the crate docs.

pub mod classifier;
pub mod factory;
pub mod lifecycle;
pub mod params;

pub(crate) fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
