//! AES-128-CBC payload encryption with PKCS#7 padding

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use thiserror::Error;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Cipher block size in bytes
pub const BLOCK_SIZE: usize = 16;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("Ciphertext length {0} is not a non-zero multiple of the 16-byte block size")]
    Misaligned(usize),

    #[error("Invalid padding (corrupted data or wrong token)")]
    InvalidPadding,
}

/// Encrypt `plaintext` under AES-128-CBC, padding it to the block size
///
/// The output is always a non-empty multiple of [`BLOCK_SIZE`]: an empty
/// plaintext still yields one full padding block.
pub fn encrypt(key: &[u8; 16], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    Aes128CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypt and unpad an AES-128-CBC ciphertext
pub fn decrypt(key: &[u8; 16], iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::Misaligned(ciphertext.len()));
    }

    Aes128CbcDec::new(key.into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::InvalidPadding)
}
