pub mod analyzers;
pub mod calendar;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;

pub use error::{AnalysisError, AnalysisResult};
