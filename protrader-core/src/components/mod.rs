//! Pluggable seams: indicators and confidence models.

pub mod confidence;
pub mod indicator;

pub use confidence::{blend, ConfidenceModel, LogisticModel, MlFeatures};
pub use indicator::Indicator;
