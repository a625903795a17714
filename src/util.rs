#[cfg(test)]
use std::fmt::Write;

#[cfg(test)]
pub(crate) fn bin2string(bin: &[u8]) -> String {
    bin.iter().fold(String::new(), |mut output, x| {
        let _ = write!(output, "{x:08b} ");
        output
    })
}

pub(crate) fn raise_to_min_len(name: &str, value: usize, min: usize) -> usize {
    if value < min {
        log::warn!("Length for {name} of {value} is too small, raising it to {min} bytes");
        return min;
    }

    value
}

/// XORs `src` into `dst`, stopping at the shorter of both.
pub(crate) fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    dst.iter_mut().zip(src).for_each(|(d, s)| *d ^= s);
}

/// Increments `counter` as a big-endian integer, wrapping around on overflow.
pub(crate) fn increment_be(counter: &mut [u8]) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

/// Checks that `dst` can hold `src_len` bytes of output.
pub(crate) fn ensure_output_len(dst: &[u8], src_len: usize) -> crate::error::Result<()> {
    if dst.len() < src_len {
        return Err(crate::error::ModeError::OutputTooSmall {
            needed: src_len,
            actual: dst.len(),
        });
    }
    Ok(())
}
