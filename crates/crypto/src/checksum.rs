//! MD5 digest helpers: key derivation input and frame checksums

use md5::{Digest, Md5};

/// Digest output length (128 bits)
pub const DIGEST_LEN: usize = 16;

/// MD5 over the concatenation of `parts`
pub fn digest(parts: &[&[u8]]) -> [u8; DIGEST_LEN] {
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Frame checksum: MD5(header[0..16] || token || body)
pub fn frame_checksum(header_prefix: &[u8], token: &[u8], body: &[u8]) -> [u8; DIGEST_LEN] {
    digest(&[header_prefix, token, body])
}

/// Constant-time comparison to prevent timing attacks
#[inline]
pub fn constant_time_eq(a: &[u8; DIGEST_LEN], b: &[u8; DIGEST_LEN]) -> bool {
    let mut result = 0u8;
    for i in 0..DIGEST_LEN {
        result |= a[i] ^ b[i];
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unhex(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn test_digest_known_values() {
        // RFC 1321 test suite
        assert_eq!(digest(&[]).to_vec(), unhex("d41d8cd98f00b204e9800998ecf8427e"));
        assert_eq!(
            digest(&[b"abc"]).to_vec(),
            unhex("900150983cd24fb0d6963f7d28e17f72")
        );
    }

    #[test]
    fn test_digest_is_concatenation() {
        assert_eq!(digest(&[b"a", b"bc"]), digest(&[b"abc"]));
        assert_eq!(digest(&[b"", b"abc", b""]), digest(&[b"abc"]));
    }

    #[test]
    fn test_frame_checksum_vector() {
        // Header prefix of an empty-body frame for device 0x04e1f2a3, stamp 0x1a2b
        let prefix = unhex("213100200000000004e1f2a300001a2b");
        let token = unhex("9c3f1b0e6a5d4c2b8e7f0a1d2c3b4a59");

        let checksum = frame_checksum(&prefix, &token, &[]);
        assert_eq!(checksum.to_vec(), unhex("b48d6620460deda643225ec2b1c77347"));
    }

    #[test]
    fn test_constant_time_eq() {
        let a = [1u8; 16];
        let b = [1u8; 16];
        let mut c = [1u8; 16];
        c[15] = 2;

        assert!(constant_time_eq(&a, &b));
        assert!(!constant_time_eq(&a, &c));
    }
}
