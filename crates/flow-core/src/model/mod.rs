//! Modelos neutrales (ArtifactRef, ConfigTree, ExecutionContext,...)

pub mod artifact;
pub mod config;
pub mod context;
pub mod fingerprint;

pub use artifact::{ArtifactRef, ArtifactVersion, NewArtifact, LATEST, PROD};
pub use config::ConfigTree;
pub use context::{ExecutionContext, TrackerContext};
pub use fingerprint::StepFingerprintInput;
