//! Artifact transport encoding.
//!
//! The preview surface is fed over a text channel, so artifacts travel as
//! standard padded base64. The blob is reference counted because the same
//! artifact is pushed to every client of a session and kept for late
//! attachers.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::core::PipelineError;

/// Base64 text of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlob(Arc<str>);

impl EncodedBlob {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Original artifact bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.0.as_bytes())
    }
}

/// Read the artifact at `path` and encode it.
pub fn encode(path: &Path) -> Result<EncodedBlob, PipelineError> {
    let bytes =
        std::fs::read(path).map_err(|e| PipelineError::io("failed to read artifact", path, e))?;
    Ok(encode_bytes(&bytes))
}

pub fn encode_bytes(bytes: &[u8]) -> EncodedBlob {
    EncodedBlob(STANDARD.encode(bytes).into())
}
