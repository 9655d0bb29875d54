//! Text rendering for the meter readout.
//!
//! Pure functions over a borrowed [`Meter`] — the caller holds the meter
//! lock and does the actual printing, so no I/O happens in here.
//!
//! [`Meter`]: gauge_core::Meter

pub mod gauge;
pub mod sparkline;

pub use gauge::render_gauge;
pub use sparkline::render_history;
