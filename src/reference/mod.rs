//! Reference clip storage for the voice-cloning variant.
//!
//! Uploaded clips are kept on disk with JSON metadata so they can be reused
//! across requests within a session.

mod store;

pub use store::{ReferenceError, ReferenceMetadata, ReferenceStore};
