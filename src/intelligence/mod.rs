pub mod engine;

pub use engine::{ArtifactStatus, EngineArtifacts, RecommendationEngine};
