use super::{ensure_iv_len, StreamMode};
use crate::{
    error::{ModeError, Result},
    primitive::{BlockCipher, Direction},
};

/// Cipher feedback mode with a configurable segment size.
///
/// Each segment is XORed with the leading bytes of the encrypted shift register, afterwards the
/// register is shifted left by one segment and the cipher text segment is appended. The segment
/// size only changes how often the primitive is invoked and which bytes feed back, so
/// CFB8/16/32/64 and the full-block NCFB share this engine. Partial segments are carried over to
/// the next call.
#[derive(Clone, Debug)]
pub struct Cfb<C> {
    cipher: C,
    register: Vec<u8>,
    keystream: Vec<u8>,
    segment_len: usize,
    position: usize,
    direction: Direction,
}

impl<C: BlockCipher> Cfb<C> {
    /// Creates a CFB mode feeding back `segment_len` bytes per primitive call.
    pub fn new(cipher: C, iv: &[u8], segment_len: usize, direction: Direction) -> Result<Self> {
        let block_size = cipher.block_size();
        ensure_iv_len(iv, block_size)?;
        if segment_len == 0 || segment_len > block_size {
            return Err(ModeError::InvalidSegmentSize {
                segment: segment_len,
                block_size,
            });
        }
        log::debug!("Setting up CFB{} ({direction:?})", segment_len * 8);

        Ok(Self {
            cipher,
            register: iv.to_vec(),
            keystream: vec![0u8; block_size],
            segment_len,
            position: 0,
            direction,
        })
    }

    /// CFB with 8 bit segments.
    pub fn cfb8(cipher: C, iv: &[u8], direction: Direction) -> Result<Self> {
        Self::new(cipher, iv, 1, direction)
    }

    /// CFB with 16 bit segments.
    pub fn cfb16(cipher: C, iv: &[u8], direction: Direction) -> Result<Self> {
        Self::new(cipher, iv, 2, direction)
    }

    /// CFB with 32 bit segments.
    pub fn cfb32(cipher: C, iv: &[u8], direction: Direction) -> Result<Self> {
        Self::new(cipher, iv, 4, direction)
    }

    /// CFB with 64 bit segments. For 64 bit block ciphers this is the same as [`Cfb::ncfb`].
    pub fn cfb64(cipher: C, iv: &[u8], direction: Direction) -> Result<Self> {
        Self::new(cipher, iv, 8, direction)
    }

    /// CFB with segments spanning the whole block.
    pub fn ncfb(cipher: C, iv: &[u8], direction: Direction) -> Result<Self> {
        let block_size = cipher.block_size();
        Self::new(cipher, iv, block_size, direction)
    }

    /// Returns the segment size in bytes.
    pub fn segment_size(&self) -> usize {
        self.segment_len
    }

    pub fn block_size(&self) -> usize {
        self.register.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn cipher(&self) -> &C {
        &self.cipher
    }

    /// The shift register, at a segment boundary this holds the last cipher text bytes.
    pub(crate) fn register(&self) -> &[u8] {
        &self.register
    }

    fn refresh_keystream(&mut self) {
        self.keystream.copy_from_slice(&self.register);
        self.cipher.encrypt_block(&mut self.keystream);
    }

    fn feedback(&self, input: u8, output: u8) -> u8 {
        match self.direction {
            Direction::Encrypt => output,
            Direction::Decrypt => input,
        }
    }

    /// Processes one complete segment, the mode has to be at a segment boundary.
    fn process_segment(&mut self, segment: &mut [u8]) {
        let s = self.segment_len;
        self.refresh_keystream();
        self.register.copy_within(s.., 0);
        let tail = self.register.len() - s;

        for (i, byte) in segment.iter_mut().enumerate() {
            let input = *byte;
            let output = input ^ self.keystream[i];
            *byte = output;
            let feedback = self.feedback(input, output);
            self.register[tail + i] = feedback;
        }
    }

    fn process_byte(&mut self, byte: &mut u8) {
        if self.position == 0 {
            self.refresh_keystream();
        }

        let input = *byte;
        let output = input ^ self.keystream[self.position];
        *byte = output;

        let feedback = self.feedback(input, output);
        let last = self.register.len() - 1;
        self.register.copy_within(1.., 0);
        self.register[last] = feedback;
        self.position = (self.position + 1) % self.segment_len;
    }
}

impl<C: BlockCipher> StreamMode for Cfb<C> {
    fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut rest = buf;

        // finish a segment left open by the previous call
        while self.position != 0 && !rest.is_empty() {
            let (byte, tail) = std::mem::take(&mut rest).split_at_mut(1);
            self.process_byte(&mut byte[0]);
            rest = tail;
        }

        let whole = rest.len() - rest.len() % self.segment_len;
        let (segments, tail) = rest.split_at_mut(whole);
        for segment in segments.chunks_exact_mut(self.segment_len) {
            self.process_segment(segment);
        }
        tail.iter_mut().for_each(|byte| self.process_byte(byte));

        Ok(())
    }
}

/// Placeholder for CFB with single bit segments.
///
/// A bit level feedback register cannot be driven sensibly through a byte oriented stream
/// interface, every use is rejected with [`ModeError::Unsupported`].
#[derive(Clone, Debug)]
pub struct Cfb1<C> {
    cipher: C,
    direction: Direction,
}

impl<C: BlockCipher> Cfb1<C> {
    pub fn new(cipher: C, iv: &[u8], direction: Direction) -> Result<Self> {
        ensure_iv_len(iv, cipher.block_size())?;
        Ok(Self { cipher, direction })
    }

    pub fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl<C: BlockCipher> StreamMode for Cfb1<C> {
    fn apply_keystream(&mut self, _buf: &mut [u8]) -> Result<()> {
        Err(ModeError::Unsupported("CFB1"))
    }
}
