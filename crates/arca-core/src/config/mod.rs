//! User-facing configuration.

pub mod settings;

pub use settings::Config;
