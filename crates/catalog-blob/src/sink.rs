use crate::errors::BlobError;
use crate::model::ImageInfo;
use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};

/// Destination for uploaded images.
#[async_trait]
pub trait BlobSink: Send + Sync {
    /// Persists `bytes` for `owner_id` and returns the new blob id.
    async fn store(&self, owner_id: &str, mime_type: &str, bytes: Bytes)
        -> Result<String, BlobError>;

    /// Index entry for a previously stored blob.
    fn info(&self, blob_id: &str) -> Option<ImageInfo>;
}

/// Image types are file extensions such as `.jpg`; anything that could escape the
/// target directory is refused.
pub(crate) fn check_image_type(image_type: &str) -> Result<(), BlobError> {
    let valid = image_type.len() <= 16
        && image_type
            .chars()
            .all(|c| c == '.' || c.is_ascii_alphanumeric())
        && !image_type.contains("..");
    if valid {
        Ok(())
    } else {
        Err(BlobError::schema(&format!("unsupported image type: {image_type:?}")))
    }
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_type_rules() {
        assert!(check_image_type(".jpg").is_ok());
        assert!(check_image_type(".png").is_ok());
        assert!(check_image_type("").is_ok());
        assert!(check_image_type("/../etc").is_err());
        assert!(check_image_type("..").is_err());
        assert!(check_image_type(".j pg").is_err());
    }

    #[test]
    fn digest_is_hex() {
        let hex = sha256_hex(b"abc");
        assert_eq!(
            hex,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
