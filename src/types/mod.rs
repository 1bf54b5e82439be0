// ABOUTME: Validated domain types for stager.
// ABOUTME: Manifest identifiers and deployment names with construction-time checks.

mod deployment_name;
mod manifest_id;

pub use deployment_name::{DeploymentName, DeploymentNameError};
pub use manifest_id::{ManifestId, ManifestIdError};
