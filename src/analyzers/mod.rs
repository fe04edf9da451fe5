pub mod observation_analyzer;

pub use observation_analyzer::{round2, ObservationAnalyzer};
