// src/utils/digest.rs

//! Content fingerprinting.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 digest of a byte sequence.
///
/// The digest covers the exact bytes as observed; no whitespace or
/// encoding normalization is applied.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_deterministic() {
        let bytes = b"calendar page body";
        assert_eq!(sha256_hex(bytes), sha256_hex(bytes));
    }

    #[test]
    fn test_single_byte_difference() {
        assert_ne!(sha256_hex(b"content"), sha256_hex(b"content "));
        assert_ne!(sha256_hex(b"content"), sha256_hex(b"Content"));
    }
}
