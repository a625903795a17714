//! Detection of aliased source and destination windows.
//!
//! Safe Rust never hands out a `&mut [u8]` overlapping a `&[u8]`, so the only way to express an
//! aliased transform is a pair of windows into one buffer, see [`split_windows`].
//! Windows starting at the same offset are fine (in-place processing), windows that share some
//! bytes but start at different offsets would read already transformed data and are rejected.

use std::ops::Range;

use crate::error::{ModeError, Result};

/// Relation between two byte windows
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Overlap {
    /// both windows start at the same position
    Identical,
    /// the windows share no byte
    Disjoint,
    /// the windows share bytes but start at different positions
    Partial,
}

impl Overlap {
    pub fn is_partial(self) -> bool {
        self == Overlap::Partial
    }
}

/// Classifies two windows given as half-open ranges of positions (offsets or addresses).
/// Empty windows never overlap anything.
pub fn classify(a: Range<usize>, b: Range<usize>) -> Overlap {
    if a.is_empty() || b.is_empty() || a.end <= b.start || b.end <= a.start {
        Overlap::Disjoint
    } else if a.start == b.start {
        Overlap::Identical
    } else {
        Overlap::Partial
    }
}

/// Classifies two slices by the memory they cover.
pub fn classify_slices(a: &[u8], b: &[u8]) -> Overlap {
    classify(address_range(a), address_range(b))
}

/// Rejects partially overlapping slices.
pub fn check(dst: &[u8], src: &[u8]) -> Result<()> {
    if classify_slices(dst, src).is_partial() {
        log::debug!("Rejecting partially overlapping buffers");
        return Err(ModeError::BufferOverlap);
    }
    Ok(())
}

fn address_range(slice: &[u8]) -> Range<usize> {
    let start = slice.as_ptr() as usize;
    start..start + slice.len()
}

/// Source and destination resolved from two windows into one buffer
#[derive(Debug)]
pub enum Windows<'a> {
    /// both windows start at the same byte, the slice covers the longer one
    InPlace(&'a mut [u8]),
    /// source and destination do not share any byte
    Split { src: &'a [u8], dst: &'a mut [u8] },
}

/// Resolves the window `src` and the equally long window starting at `dst_start`, both inside
/// `buf`, into borrows that can be processed safely.
pub fn split_windows(buf: &mut [u8], src: Range<usize>, dst_start: usize) -> Result<Windows<'_>> {
    let len = src.end.saturating_sub(src.start);
    resolve_windows(buf, src, dst_start..dst_start.saturating_add(len))
}

/// Resolves the windows `src` and `dst` of `buf`, which may differ in length, e.g. a plain text
/// and its sealed form.
pub fn resolve_windows(buf: &mut [u8], src: Range<usize>, dst: Range<usize>) -> Result<Windows<'_>> {
    let src = src.start..src.end.max(src.start);
    let dst = dst.start..dst.end.max(dst.start);

    let needed = src.end.max(dst.end);
    if needed > buf.len() {
        return Err(ModeError::OutputTooSmall {
            needed,
            actual: buf.len(),
        });
    }

    match classify(src.clone(), dst.clone()) {
        Overlap::Identical => Ok(Windows::InPlace(&mut buf[src.start..needed])),
        Overlap::Partial => {
            log::debug!("Rejecting windows {src:?} and {dst:?}: partial overlap");
            Err(ModeError::BufferOverlap)
        }
        Overlap::Disjoint if src.is_empty() => Ok(Windows::Split {
            src: &[],
            dst: &mut buf[dst],
        }),
        Overlap::Disjoint if dst.is_empty() => {
            let buf: &[u8] = buf;
            Ok(Windows::Split {
                src: &buf[src],
                dst: &mut [],
            })
        }
        Overlap::Disjoint if src.start < dst.start => {
            let (head, tail) = buf.split_at_mut(dst.start);
            Ok(Windows::Split {
                src: &head[src],
                dst: &mut tail[..dst.len()],
            })
        }
        Overlap::Disjoint => {
            let (head, tail) = buf.split_at_mut(src.start);
            Ok(Windows::Split {
                src: &tail[..src.len()],
                dst: &mut head[dst],
            })
        }
    }
}
