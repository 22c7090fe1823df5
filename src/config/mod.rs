//! Environment-driven settings and the constants shared across layers.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
