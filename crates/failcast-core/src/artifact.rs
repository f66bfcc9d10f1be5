//! Persisted model artifact.
//!
//! The artifact is a JSON envelope around a fitted [`RandomForest`]. It is not
//! versioned: an artifact that does not deserialize is reported as
//! [`FailcastError::ArtifactCorrupt`], and one fitted on a different feature
//! order as [`FailcastError::ArtifactFeatureMismatch`]. Either must be removed
//! by the operator to force retraining.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::classifier::RandomForest;
use crate::error::{FailcastError, Result};
use crate::features::FEATURE_NAMES;

/// Serialized form of a trained classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub trained_at: DateTime<Utc>,
    /// Feature columns in the order the model was fitted on.
    pub feature_names: Vec<String>,
    pub model: RandomForest,
}

impl ModelArtifact {
    pub fn new(model: RandomForest) -> Self {
        Self {
            trained_at: Utc::now(),
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            model,
        }
    }

    /// Write the artifact to `path`, replacing any existing file atomically.
    ///
    /// Returns the hex SHA-256 digest of the bytes written.
    pub fn persist(&self, path: &Path) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let digest = hex::encode(Sha256::digest(&bytes));

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        // Write to a temp file in the target directory, then rename over the target.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        crate::obs::emit_model_persisted(path, &digest, bytes.len());
        Ok(digest)
    }

    /// Read the artifact at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let artifact: Self =
            serde_json::from_slice(&bytes).map_err(|source| FailcastError::ArtifactCorrupt {
                path: path.to_path_buf(),
                source,
            })?;
        if artifact.feature_names != FEATURE_NAMES {
            return Err(FailcastError::ArtifactFeatureMismatch {
                path: path.to_path_buf(),
                found: artifact.feature_names,
            });
        }
        tracing::debug!(
            path = %path.display(),
            digest = %hex::encode(Sha256::digest(&bytes)),
            trained_at = %artifact.trained_at,
            "model artifact read"
        );
        Ok(artifact)
    }
}
