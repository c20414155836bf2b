pub mod review_analysis;
pub mod sentiment_analysis;
pub mod utils;

pub use review_analysis::*;
pub use sentiment_analysis::*;
