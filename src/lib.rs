pub mod base;
pub mod bird;
pub mod config;
pub mod engine;
pub mod pipe;
pub mod policy;
pub mod rng;
pub mod snapshot;
pub mod sprite;
pub mod world;

pub use config::{Scenario, ScenarioLoader};
pub use engine::{Engine, EngineSettings, FrameObserver, GenerationSummary};
pub use policy::{Policy, Sensors, Trainer};
pub use world::{FrameSnapshot, TerminationReason};
