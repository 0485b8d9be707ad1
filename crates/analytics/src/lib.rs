pub mod correlation;
pub mod engine;
pub mod types;

pub use correlation::correlation_matrix;
pub use engine::AnalyticsEngine;
pub use types::{CorrelationMatrix, ReturnStats};
