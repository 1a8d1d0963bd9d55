//! Checks applied to an uploaded image before it is sent anywhere.

use crate::{Error, Result, config::UploadConfig};
use base64::{Engine as _, engine::general_purpose};
use sha2::{Digest, Sha256};

/// Hex characters of the SHA-256 digest kept as the image fingerprint.
const IMAGE_HASH_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_types: Vec<String>,
    max_file_mb: u64,
    max_file_bytes: usize,
}

impl UploadPolicy {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            allowed_types: config.allowed_types.clone(),
            max_file_mb: config.max_file_mb,
            max_file_bytes: config.max_file_bytes(),
        }
    }

    pub fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    pub fn max_file_mb(&self) -> u64 {
        self.max_file_mb
    }

    pub fn check_content_type(&self, content_type: Option<&str>) -> Result<()> {
        match content_type {
            Some(ct) if self.allowed_types.iter().any(|allowed| allowed == ct) => Ok(()),
            _ => Err(Error::UnsupportedMediaType {
                allowed: self.allowed_types.join(", "),
            }),
        }
    }

    pub fn check_size(&self, len: usize) -> Result<()> {
        if len > self.max_file_bytes {
            return Err(Error::FileTooLarge {
                limit_mb: self.max_file_mb,
            });
        }
        Ok(())
    }
}

pub fn encode_image(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

pub fn image_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hash = hex::encode(digest);
    hash.truncate(IMAGE_HASH_LEN);
    hash
}
