pub mod cache;
pub mod config;
pub mod error;

pub use cache::{global_cache, ModelCache, ModelOptions};
pub use config::{AnalyzerConfig, DeviceSetting};
pub use error::{AnalysisError, ParseModelSizeError};
