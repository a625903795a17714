//! Authenticated encryption with associated data built from a block primitive.

mod ccm;

pub use ccm::{Ccm, CcmParams};

use std::ops::Range;

use zeroize::Zeroizing;

use crate::{
    error::Result,
    overlap::{self, Windows},
};

/// Sealing and opening of messages under a nonce, cipher text and tag are transmitted together.
pub trait Aead {
    /// Returns the required nonce length in bytes.
    fn nonce_size(&self) -> usize;

    /// Returns by how many bytes a sealed message exceeds its plain text.
    fn overhead(&self) -> usize;

    /// Encrypts and authenticates `plain_text` into `dst`, returns the number of bytes written,
    /// `plain_text.len() + overhead()`.
    fn seal_into(
        &self,
        dst: &mut [u8],
        nonce: &[u8],
        plain_text: &[u8],
        associated_data: &[u8],
    ) -> Result<usize>;

    /// Verifies and decrypts `cipher_text` (including the tag) into `dst`, returns the number of
    /// bytes written. On authentication failure the written region of `dst` is zeroed.
    fn open_into(
        &self,
        dst: &mut [u8],
        nonce: &[u8],
        cipher_text: &[u8],
        associated_data: &[u8],
    ) -> Result<usize>;

    /// Seals `plain_text` into a new buffer.
    fn seal(&self, nonce: &[u8], plain_text: &[u8], associated_data: &[u8]) -> Result<Vec<u8>> {
        let mut sealed = vec![0u8; plain_text.len() + self.overhead()];
        let len = self.seal_into(&mut sealed, nonce, plain_text, associated_data)?;
        sealed.truncate(len);
        Ok(sealed)
    }

    /// Opens `cipher_text` into a new buffer.
    fn open(&self, nonce: &[u8], cipher_text: &[u8], associated_data: &[u8]) -> Result<Vec<u8>> {
        let mut opened = vec![0u8; cipher_text.len().saturating_sub(self.overhead())];
        let len = self.open_into(&mut opened, nonce, cipher_text, associated_data)?;
        opened.truncate(len);
        Ok(opened)
    }

    /// Seals the window `plain_text` of `buf` into the window starting at `dst_start`, which is
    /// `overhead()` bytes longer. Both windows may start at the same offset, a partial overlap is
    /// rejected.
    fn seal_within(
        &self,
        buf: &mut [u8],
        nonce: &[u8],
        plain_text: Range<usize>,
        dst_start: usize,
        associated_data: &[u8],
    ) -> Result<usize> {
        let plain_len = plain_text.end.saturating_sub(plain_text.start);
        let sealed = dst_start..dst_start.saturating_add(plain_len + self.overhead());

        match overlap::resolve_windows(buf, plain_text, sealed)? {
            Windows::InPlace(data) => {
                let plain_text = Zeroizing::new(data[..plain_len].to_vec());
                self.seal_into(data, nonce, &plain_text, associated_data)
            }
            Windows::Split { src, dst } => self.seal_into(dst, nonce, src, associated_data),
        }
    }

    /// Opens the window `cipher_text` of `buf` into the window starting at `dst_start`. Both
    /// windows may start at the same offset, a partial overlap is rejected.
    fn open_within(
        &self,
        buf: &mut [u8],
        nonce: &[u8],
        cipher_text: Range<usize>,
        dst_start: usize,
        associated_data: &[u8],
    ) -> Result<usize> {
        let sealed_len = cipher_text.end.saturating_sub(cipher_text.start);
        let opened = dst_start..dst_start.saturating_add(sealed_len.saturating_sub(self.overhead()));

        match overlap::resolve_windows(buf, cipher_text, opened)? {
            Windows::InPlace(data) => {
                let cipher_text = data[..sealed_len].to_vec();
                self.open_into(data, nonce, &cipher_text, associated_data)
            }
            Windows::Split { src, dst } => self.open_into(dst, nonce, src, associated_data),
        }
    }
}
