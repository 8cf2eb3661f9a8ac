//! Temporary audio artifacts and the workspace that owns them.

mod store;

pub use store::{Artifact, ArtifactError, AudioFormat, Workspace};
