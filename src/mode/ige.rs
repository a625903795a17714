use super::{ensure_aligned, ensure_iv_len, BlockMode, ResetIv};
use crate::{
    error::Result,
    primitive::{BlockCipher, Direction},
    util::xor_in_place,
};

/// Infinite garble extension.
///
/// `C[i] = E(P[i] ^ C[i-1]) ^ P[i-1]`, decryption runs the same chain with the roles of plain and
/// cipher text exchanged. The IV spans two blocks, the first seeds `C[-1]`, the second `P[-1]`.
#[derive(Clone, Debug)]
pub struct Ige<C> {
    cipher: C,
    last_ciphertext: Vec<u8>,
    last_plaintext: Vec<u8>,
    scratch: Vec<u8>,
    direction: Direction,
}

impl<C: BlockCipher> Ige<C> {
    pub fn new(cipher: C, iv: &[u8], direction: Direction) -> Result<Self> {
        let block_size = cipher.block_size();
        ensure_iv_len(iv, 2 * block_size)?;

        let (last_ciphertext, last_plaintext) = iv.split_at(block_size);
        Ok(Self {
            cipher,
            last_ciphertext: last_ciphertext.to_vec(),
            last_plaintext: last_plaintext.to_vec(),
            scratch: vec![0u8; block_size],
            direction,
        })
    }
}

/// `out = f(in ^ prev_out) ^ prev_in`, afterwards `in` and `out` become the previous values.
fn chain_block<F>(
    block: &mut [u8],
    prev_in: &mut [u8],
    prev_out: &mut [u8],
    scratch: &mut [u8],
    transform: F,
) where
    F: Fn(&mut [u8]),
{
    scratch.copy_from_slice(block);
    xor_in_place(block, prev_out);
    transform(block);
    xor_in_place(block, prev_in);

    prev_in.copy_from_slice(scratch);
    prev_out.copy_from_slice(block);
}

impl<C: BlockCipher> BlockMode for Ige<C> {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn crypt_blocks_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        let block_size = self.block_size();
        ensure_aligned(buf.len(), block_size)?;

        let Self {
            cipher,
            last_ciphertext,
            last_plaintext,
            scratch,
            direction,
        } = self;

        let (prev_in, prev_out) = match direction {
            Direction::Encrypt => (last_plaintext, last_ciphertext),
            Direction::Decrypt => (last_ciphertext, last_plaintext),
        };

        for block in buf.chunks_exact_mut(block_size) {
            match direction {
                Direction::Encrypt => {
                    chain_block(block, prev_in, prev_out, scratch, |b| cipher.encrypt_block(b))
                }
                Direction::Decrypt => {
                    chain_block(block, prev_in, prev_out, scratch, |b| cipher.decrypt_block(b))
                }
            }
        }

        Ok(())
    }
}

impl<C: BlockCipher> ResetIv for Ige<C> {
    fn iv_size(&self) -> usize {
        2 * self.cipher.block_size()
    }

    fn set_iv(&mut self, iv: &[u8]) -> Result<()> {
        ensure_iv_len(iv, self.iv_size())?;
        let (last_ciphertext, last_plaintext) = iv.split_at(self.cipher.block_size());
        self.last_ciphertext.copy_from_slice(last_ciphertext);
        self.last_plaintext.copy_from_slice(last_plaintext);
        Ok(())
    }
}

#[cfg(all(test, feature = "rust-crypto"))]
mod test {
    use super::Ige;
    use crate::{
        error::ModeError,
        mode::{BlockMode, ResetIv},
        primitive::{Direction, RustCryptoBlock},
        test_vectors::{aes_cipher, aes_iv, aes_plain_text},
        util::test::{assert_bytes_eq, hex_bytes},
    };
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn counting_bytes(len: usize) -> Vec<u8> {
        (0..len as u8).collect()
    }

    fn sp800_iv() -> Vec<u8> {
        let mut iv = aes_iv();
        iv.extend_from_slice(&aes_plain_text()[48..]);
        iv
    }

    const SP800_IGE: &str = concat!(
        "80d68fe95e56295163c2cfe0f4852e6d",
        "b59fb403c4676d5504a9d8207a265473",
        "e0b699c954871e6d897c984d8805bfdb"
    );

    #[test]
    fn encrypts_reference_vector() {
        let cipher = RustCryptoBlock::<aes::Aes128>::new_from_slice(&counting_bytes(16)).unwrap();
        let mut ige = Ige::new(cipher, &counting_bytes(32), Direction::Encrypt).unwrap();
        let mut data = vec![0u8; 32];

        ige.crypt_blocks_in_place(&mut data).unwrap();

        assert_bytes_eq(
            &data,
            &hex_bytes("1a8519a6557be652e9da8e43da4ef4453cf456b4ca488aa383c79c98b34797cb"),
        );
    }

    #[test_case(Direction::Encrypt; "encrypt")]
    #[test_case(Direction::Decrypt; "decrypt")]
    fn transforms_known_answer(direction: Direction) {
        let (input, output) = match direction {
            Direction::Encrypt => (aes_plain_text()[..48].to_vec(), hex_bytes(SP800_IGE)),
            Direction::Decrypt => (hex_bytes(SP800_IGE), aes_plain_text()[..48].to_vec()),
        };
        let mut ige = Ige::new(aes_cipher(), &sp800_iv(), direction).unwrap();
        let mut dst = vec![0u8; input.len()];

        ige.crypt_blocks(&mut dst, &input).unwrap();

        assert_bytes_eq(&dst, &output);
    }

    #[test]
    fn corruption_propagates_to_all_following_blocks() {
        let mut ige = Ige::new(aes_cipher(), &sp800_iv(), Direction::Decrypt).unwrap();
        let mut data = hex_bytes(SP800_IGE);
        data[5] ^= 0x80;

        ige.crypt_blocks_in_place(&mut data).unwrap();

        let plain_text = aes_plain_text();
        for i in 0..3 {
            let range = i * 16..(i + 1) * 16;
            assert_ne!(&data[range.clone()], &plain_text[range]);
        }
    }

    #[test]
    fn set_iv_reseeds_both_registers() {
        let mut ige = Ige::new(aes_cipher(), &[0u8; 32], Direction::Encrypt).unwrap();
        let mut scratch = aes_plain_text();
        ige.crypt_blocks_in_place(&mut scratch).unwrap();

        ige.set_iv(&sp800_iv()).unwrap();
        let mut data = aes_plain_text()[..48].to_vec();
        ige.crypt_blocks_in_place(&mut data).unwrap();

        assert_bytes_eq(&data, &hex_bytes(SP800_IGE));
    }

    #[test]
    fn requires_double_block_iv() {
        assert_eq!(
            Ige::new(aes_cipher(), &aes_iv(), Direction::Encrypt).err(),
            Some(ModeError::InvalidIvLength {
                expected: 32,
                actual: 16
            })
        );
    }
}
