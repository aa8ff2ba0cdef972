use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::classifier::Pipeline;

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "expense_classifier_model.bin";

const MAGIC: &[u8; 8] = b"EXPCLSF\0";
/// Bumped whenever the serialized pipeline layout changes.
pub const FORMAT_VERSION: u32 = 1;
const HASH_LEN: usize = 32;
const HEADER_LEN: usize = MAGIC.len() + 4 + HASH_LEN;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Model artifact not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("File is not a model artifact")]
    BadMagic,
    #[error("Model artifact is truncated ({0} bytes)")]
    Truncated(usize),
    #[error("Unsupported artifact version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
    #[error("Failed to encode pipeline: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("Failed to decode pipeline: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

/// Reads and writes the trained pipeline artifact at a single path.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Serializes `pipeline` and atomically replaces the artifact file.
    pub fn save(&self, pipeline: &Pipeline) -> Result<(), ArtifactError> {
        let payload = bincode::serde::encode_to_vec(pipeline, bincode::config::standard())?;
        let hash = Sha256::digest(&payload);

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&hash);
        bytes.extend_from_slice(&payload);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            log::info!("Creating parent directory: {:?}", parent);
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.tmp_path();
        log::info!("Writing {} bytes to {:?}", bytes.len(), tmp_path);
        fs::write(&tmp_path, &bytes)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        log::info!("Model artifact saved to {:?} (sha256 {:x})", self.path, hash);
        Ok(())
    }

    /// Reads, verifies and decodes the artifact.
    pub fn load(&self) -> Result<Pipeline, ArtifactError> {
        let bytes = self.read()?;
        let payload = Self::verified_payload(&bytes)?;
        let (pipeline, _) =
            bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
        log::info!("Model artifact loaded from {:?}", self.path);
        Ok(pipeline)
    }

    /// Checks header and checksum without decoding. A missing file verifies
    /// as `false`; a present but damaged file is an error.
    pub fn verify(&self) -> Result<bool, ArtifactError> {
        if !self.exists() {
            log::info!("Artifact {:?} does not exist", self.path);
            return Ok(false);
        }
        let bytes = self.read()?;
        Self::verified_payload(&bytes)?;
        Ok(true)
    }

    pub fn remove(&self) -> Result<(), ArtifactError> {
        if self.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn read(&self) -> Result<Vec<u8>, ArtifactError> {
        fs::read(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ArtifactError::NotFound(self.path.clone()),
            _ => ArtifactError::IoError(e),
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_MODEL_PATH.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn verified_payload(bytes: &[u8]) -> Result<&[u8], ArtifactError> {
        if bytes.len() < MAGIC.len() || &bytes[..MAGIC.len()] != MAGIC {
            return Err(ArtifactError::BadMagic);
        }
        if bytes.len() < HEADER_LEN {
            return Err(ArtifactError::Truncated(bytes.len()));
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[MAGIC.len()..MAGIC.len() + 4]);
        let version = u32::from_le_bytes(version);
        if version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: version,
                expected: FORMAT_VERSION,
            });
        }

        let expected = &bytes[MAGIC.len() + 4..HEADER_LEN];
        let payload = &bytes[HEADER_LEN..];
        let actual = Sha256::digest(payload);
        if actual.as_slice() != expected {
            return Err(ArtifactError::HashMismatch {
                expected: hex(expected),
                actual: hex(&actual),
            });
        }
        Ok(payload)
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
