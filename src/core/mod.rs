//! Core conversion logic and abstractions

pub mod config;
pub mod currency;
pub mod engine;
pub mod error;
pub mod format;
pub mod log;
pub mod rates;
pub mod storefront;

// Re-export main types for cleaner imports
pub use currency::RateTableProvider;
pub use engine::{ConversionRequest, ConversionResult, convert};
pub use error::{ConversionError, Side};
pub use rates::{RateSnapshot, RateTable};
