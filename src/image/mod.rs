//! Image build phase
//!
//! Assembles a runnable runtime root from the dependency manifest, the
//! application source tree and the optional credential artifact, then
//! records the launch policy in `image.json`. Any missing input aborts the
//! build and removes the partial root; serve refuses to start from a root
//! without valid metadata.

mod builder;
mod metadata;

pub use builder::{BuildReport, ImageBuilder, CREDENTIAL_FILE_NAME};
pub use metadata::{ImageManifest, IMAGE_METADATA_FILE};
