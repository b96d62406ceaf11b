//! Core types, window functions, and the cross-correlation engine.

pub mod correlate;
pub mod types;
pub mod window;

pub use correlate::CrossCorrelator;
pub use types::{AudioSignal, Sample};
pub use window::{generate_window, window_energy, WindowType};
