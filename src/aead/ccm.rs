//! Counter with CBC-MAC as of [RFC 3610](https://www.rfc-editor.org/rfc/rfc3610).

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::Aead;
use crate::{
    error::{ModeError, Result},
    mode::ensure_iv_len,
    primitive::BlockCipher,
    util::{ensure_output_len, increment_be, xor_in_place},
};

const BLOCK_SIZE: usize = 16;
const NONCE_SIZES: std::ops::RangeInclusive<usize> = 7..=13;
const MAX_TAG_SIZE: usize = 16;
const MIN_TAG_SIZE: usize = 4;

type Block = [u8; BLOCK_SIZE];

/// Nonce and tag length of a [`Ccm`] instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcmParams {
    /// nonce length, between 7 and 13 bytes
    ///
    /// default: `13`
    pub nonce_size: usize,
    /// tag length, an even value between 4 and 16 bytes
    ///
    /// default: `16`
    pub tag_size: usize,
}

impl Default for CcmParams {
    fn default() -> Self {
        Self {
            nonce_size: 13,
            tag_size: 16,
        }
    }
}

impl CcmParams {
    fn validate(&self) -> Result<()> {
        if !NONCE_SIZES.contains(&self.nonce_size) {
            return Err(ModeError::InvalidNonceSize(self.nonce_size));
        }
        if self.tag_size < MIN_TAG_SIZE || self.tag_size > MAX_TAG_SIZE || self.tag_size % 2 != 0 {
            return Err(ModeError::InvalidTagSize(self.tag_size));
        }
        Ok(())
    }
}

/// CCM over a 128 bit block cipher.
///
/// The counter and the CBC-MAC share the primitive. Messages are limited by the `15 - nonce_size`
/// bytes available for the length field, see [`Ccm::max_message_len`].
#[derive(Clone, Debug)]
pub struct Ccm<C> {
    cipher: C,
    nonce_size: usize,
    tag_size: usize,
}

impl<C: BlockCipher> Ccm<C> {
    /// Creates CCM with a 13 byte nonce and a 16 byte tag.
    pub fn new(cipher: C) -> Result<Self> {
        Self::with_params(cipher, CcmParams::default())
    }

    pub fn with_params(cipher: C, params: CcmParams) -> Result<Self> {
        if cipher.block_size() != BLOCK_SIZE {
            return Err(ModeError::InvalidBlockSize {
                expected: BLOCK_SIZE,
                actual: cipher.block_size(),
            });
        }
        params.validate()?;
        log::debug!(
            "Setting up CCM with {} byte nonce and {} byte tag",
            params.nonce_size,
            params.tag_size
        );

        Ok(Self {
            cipher,
            nonce_size: params.nonce_size,
            tag_size: params.tag_size,
        })
    }

    pub fn tag_size(&self) -> usize {
        self.tag_size
    }

    /// Largest plain text length the length field can encode.
    pub fn max_message_len(&self) -> usize {
        let length_size = self.length_size();
        let encodable = if length_size >= 8 {
            u64::MAX
        } else {
            (1u64 << (8 * length_size)) - 1
        };
        let platform = isize::MAX as u64 - self.tag_size as u64;
        encodable.min(platform) as usize
    }

    /// Encrypts `buf` in place and returns the tag.
    pub fn seal_in_place_detached(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        buf: &mut [u8],
    ) -> Result<Vec<u8>> {
        self.check_nonce(nonce)?;
        self.check_len(buf.len())?;

        let counter = self.counter_zero(nonce);
        let mut tag = self.cbc_mac(nonce, associated_data, buf);
        self.apply_counter(&counter, buf);
        self.mask_tag(&counter, &mut tag);

        Ok(tag[..self.tag_size].to_vec())
    }

    /// Verifies and decrypts `buf`, which holds the cipher text followed by the tag. Returns the
    /// plain text prefix of `buf`, which is zeroed if the tag does not match.
    pub fn open_in_place<'a>(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        buf: &'a mut [u8],
    ) -> Result<&'a mut [u8]> {
        self.check_nonce(nonce)?;
        let data_len = self.data_len(buf.len())?;

        let (data, tag) = buf.split_at_mut(data_len);
        self.open_detached(nonce, associated_data, data, tag)?;
        Ok(data)
    }

    fn length_size(&self) -> usize {
        BLOCK_SIZE - 1 - self.nonce_size
    }

    fn check_nonce(&self, nonce: &[u8]) -> Result<()> {
        ensure_iv_len(nonce, self.nonce_size)
    }

    fn check_len(&self, len: usize) -> Result<()> {
        let max = self.max_message_len();
        if len > max {
            return Err(ModeError::MessageTooLong { len, max });
        }
        Ok(())
    }

    /// Plain text length of a sealed message of `sealed_len` bytes.
    fn data_len(&self, sealed_len: usize) -> Result<usize> {
        if sealed_len < self.tag_size {
            log::debug!("Sealed message of {sealed_len} bytes is shorter than the tag");
            return Err(ModeError::AuthenticationFailure);
        }
        let data_len = sealed_len - self.tag_size;
        self.check_len(data_len)?;
        Ok(data_len)
    }

    fn open_detached(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        data: &mut [u8],
        tag: &[u8],
    ) -> Result<()> {
        let counter = self.counter_zero(nonce);
        self.apply_counter(&counter, data);
        let mut expected = self.cbc_mac(nonce, associated_data, data);
        self.mask_tag(&counter, &mut expected);

        if bool::from(expected[..self.tag_size].ct_eq(tag)) {
            Ok(())
        } else {
            log::debug!("CCM tag mismatch, wiping {} bytes of output", data.len());
            data.zeroize();
            Err(ModeError::AuthenticationFailure)
        }
    }

    /// `A_0`, flags holding `L - 1` followed by the nonce and a zero counter.
    fn counter_zero(&self, nonce: &[u8]) -> Block {
        let mut counter = [0u8; BLOCK_SIZE];
        counter[0] = (self.length_size() - 1) as u8;
        counter[1..=self.nonce_size].copy_from_slice(nonce);
        counter
    }

    fn apply_counter(&self, counter_zero: &Block, data: &mut [u8]) {
        let counter_start = BLOCK_SIZE - self.length_size();
        let mut counter = *counter_zero;
        let mut keystream = [0u8; BLOCK_SIZE];

        for chunk in data.chunks_mut(BLOCK_SIZE) {
            increment_be(&mut counter[counter_start..]);
            self.cipher.encrypt_block_b2b(&counter, &mut keystream);
            xor_in_place(chunk, &keystream);
        }
    }

    fn mask_tag(&self, counter_zero: &Block, tag: &mut Block) {
        let mut mask = *counter_zero;
        self.cipher.encrypt_block(&mut mask);
        xor_in_place(tag, &mask);
    }

    fn cbc_mac(&self, nonce: &[u8], associated_data: &[u8], plain_text: &[u8]) -> Block {
        let length_size = self.length_size();
        let mut b0 = [0u8; BLOCK_SIZE];
        if !associated_data.is_empty() {
            b0[0] |= 0x40;
        }
        b0[0] |= (((self.tag_size - 2) / 2) as u8) << 3;
        b0[0] |= (length_size - 1) as u8;
        b0[1..=self.nonce_size].copy_from_slice(nonce);
        let len = (plain_text.len() as u64).to_be_bytes();
        b0[BLOCK_SIZE - length_size..].copy_from_slice(&len[len.len() - length_size..]);

        let mut mac = CbcMac::new(&self.cipher);
        mac.update(&b0);
        if !associated_data.is_empty() {
            mac.update(&encode_aad_len(associated_data.len() as u64));
            mac.update(associated_data);
            mac.pad();
        }
        mac.update(plain_text);
        mac.finish()
    }
}

/// Length prefix of the associated data, 2, 6 or 10 bytes depending on the magnitude.
fn encode_aad_len(len: u64) -> Vec<u8> {
    if len < 0xff00 {
        (len as u16).to_be_bytes().to_vec()
    } else if len <= u64::from(u32::MAX) {
        [&[0xff, 0xfe][..], &(len as u32).to_be_bytes()[..]].concat()
    } else {
        [&[0xff, 0xff][..], &len.to_be_bytes()[..]].concat()
    }
}

struct CbcMac<'a, C> {
    cipher: &'a C,
    state: Block,
    position: usize,
}

impl<'a, C: BlockCipher> CbcMac<'a, C> {
    fn new(cipher: &'a C) -> Self {
        Self {
            cipher,
            state: [0u8; BLOCK_SIZE],
            position: 0,
        }
    }

    fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let n = (BLOCK_SIZE - self.position).min(data.len());
            xor_in_place(&mut self.state[self.position..self.position + n], &data[..n]);
            self.position += n;
            data = &data[n..];

            if self.position == BLOCK_SIZE {
                self.cipher.encrypt_block(&mut self.state);
                self.position = 0;
            }
        }
    }

    /// Completes a partial block with zeros.
    fn pad(&mut self) {
        if self.position != 0 {
            self.cipher.encrypt_block(&mut self.state);
            self.position = 0;
        }
    }

    fn finish(mut self) -> Block {
        self.pad();
        self.state
    }
}

impl<C: BlockCipher> Aead for Ccm<C> {
    fn nonce_size(&self) -> usize {
        self.nonce_size
    }

    fn overhead(&self) -> usize {
        self.tag_size
    }

    fn seal_into(
        &self,
        dst: &mut [u8],
        nonce: &[u8],
        plain_text: &[u8],
        associated_data: &[u8],
    ) -> Result<usize> {
        self.check_nonce(nonce)?;
        self.check_len(plain_text.len())?;
        let sealed_len = plain_text.len() + self.tag_size;
        ensure_output_len(dst, sealed_len)?;
        let sealed = &mut dst[..sealed_len];

        let (data, tag) = sealed.split_at_mut(plain_text.len());
        data.copy_from_slice(plain_text);
        tag.copy_from_slice(&self.seal_in_place_detached(nonce, associated_data, data)?);

        Ok(sealed_len)
    }

    fn open_into(
        &self,
        dst: &mut [u8],
        nonce: &[u8],
        cipher_text: &[u8],
        associated_data: &[u8],
    ) -> Result<usize> {
        self.check_nonce(nonce)?;
        let data_len = self.data_len(cipher_text.len())?;
        ensure_output_len(dst, data_len)?;
        let data = &mut dst[..data_len];

        let (sealed_data, tag) = cipher_text.split_at(data_len);
        data.copy_from_slice(sealed_data);
        self.open_detached(nonce, associated_data, data, tag)?;

        Ok(data_len)
    }
}
