use crate::util::{raise_to_min_len, xor_in_place};

const DEFAULT_BUFFER_SIZE: usize = 512;

/// Options for modes which pre-compute their keystream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeystreamOptions {
    /// number of keystream bytes computed ahead in one refill, raised to at least one block
    ///
    /// default: `512`
    pub buffer_size: usize,
}

impl Default for KeystreamOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Keystream computed ahead in chunks and handed out byte by byte.
///
/// A refill is triggered once no more than one chunk is left; the leftover is moved to the
/// front and as many chunks are appended as fit into the capacity.
#[derive(Clone, Debug)]
pub(crate) struct KeystreamBuffer {
    out: Vec<u8>,
    used: usize,
    chunk_len: usize,
    capacity: usize,
}

impl KeystreamBuffer {
    pub fn new(capacity: usize, chunk_len: usize) -> Self {
        let capacity = raise_to_min_len("keystream buffer", capacity, chunk_len);
        Self {
            out: Vec::with_capacity(capacity),
            used: 0,
            chunk_len,
            capacity,
        }
    }

    /// Number of keystream bytes computed but not yet consumed.
    pub fn pending(&self) -> usize {
        self.out.len() - self.used
    }

    /// XORs the keystream into `buf`, producing new chunks with `generate` on demand.
    pub fn apply<G>(&mut self, mut buf: &mut [u8], mut generate: G)
    where
        G: FnMut(&mut [u8]),
    {
        while !buf.is_empty() {
            if self.pending() <= self.chunk_len {
                self.refill(&mut generate);
            }

            let available = &self.out[self.used..];
            let n = available.len().min(buf.len());
            let (head, tail) = std::mem::take(&mut buf).split_at_mut(n);
            xor_in_place(head, &available[..n]);
            self.used += n;
            buf = tail;
        }
    }

    fn refill<G>(&mut self, generate: &mut G)
    where
        G: FnMut(&mut [u8]),
    {
        self.out.drain(..self.used);
        self.used = 0;

        while self.out.len() + self.chunk_len <= self.capacity {
            let start = self.out.len();
            self.out.resize(start + self.chunk_len, 0);
            generate(&mut self.out[start..]);
        }
        log::trace!("Refilled keystream, {} bytes pending", self.out.len());
    }
}
