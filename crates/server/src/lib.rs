//! Server crate for the shelf-recs recommendation engine.
//!
//! This crate contains the engine that coordinates all components of
//! the recommendation flow.

pub mod engine;

pub use engine::{
    EngineConfig, EngineError, Origin, Recommendation, RecommendRequest, RecommendationEngine,
};
