//! Small reusable rendering helpers.

pub mod signal_bars;
