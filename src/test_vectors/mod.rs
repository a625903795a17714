//! Known-answer data shared by the unit tests.
//!
//! AES vectors use the key, IV and plaintext of NIST SP 800-38A, appendix F. Outputs for modes
//! without a published vector were produced with an independent implementation.

use crate::util::test::hex_bytes;

pub const AES_KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
pub const AES_IV: &str = "000102030405060708090a0b0c0d0e0f";
pub const AES_PLAIN_TEXT: &str = concat!(
    "6bc1bee22e409f96e93d7e117393172a",
    "ae2d8a571e03ac9c9eb76fac45af8e51",
    "30c81c46a35ce411e5fbc1191a0a52ef",
    "f69f2445df4f9b17ad2b417be66c3710"
);

/// Length of the plain text prefix used for stream modes, deliberately not block aligned.
pub const STREAM_LEN: usize = 37;

pub const GOST_KEY: &str = "8899aabbccddeeff0011223344556677fedcba98765432100123456789abcdef";
pub const GOST_CTR_IV: &str = "1234567890abcef0";
pub const GOST_PLAIN_TEXT: &str = concat!(
    "1122334455667700ffeeddccbbaa9988",
    "00112233445566778899aabbcceeff0a",
    "112233445566778899aabbcceeff0a00",
    "2233445566778899aabbcceeff0a0011"
);

#[derive(Clone, Copy, Debug)]
pub struct StreamVector {
    pub name: &'static str,
    pub cipher_text: &'static str,
}

#[allow(clippy::missing_panics_doc)]
pub fn stream_vector(name: &str) -> &'static StreamVector {
    STREAM_VECTORS
        .iter()
        .find(|v| v.name == name)
        .unwrap_or_else(|| panic!("no stream vector named {name}"))
}

static STREAM_VECTORS: &[StreamVector] = &[
    StreamVector {
        name: "cfb8",
        cipher_text: "3b79424c9c0dd436bace9e0ed4586a4f32b9ded50ae3ba69d472e88267fb505270cbad1e25",
    },
    StreamVector {
        name: "cfb16",
        cipher_text: "3b3fe49824de6332ce228e5b8131a24ab56faa8dc50f8c9aa71d6086e285d94924f5b803a6",
    },
    StreamVector {
        name: "cfb32",
        cipher_text: "3b3fd92ee12c0a7c7f428924fa1aedc33f9fcbce3c58e69d62b8f519c8316fb34b95fea604",
    },
    StreamVector {
        name: "cfb64",
        cipher_text: "3b3fd92eb72dad20764bc8b40ee0de40f857ab76f3e7bc33332265ff0594b12e6c8bf2f3fc",
    },
    StreamVector {
        name: "ncfb",
        cipher_text: "3b3fd92eb72dad20333449f8e83cfb4ac8a64537a0b3a93fcde3cdad9f1ce58b26751f67a3",
    },
    StreamVector {
        name: "nofb",
        cipher_text: "3b3fd92eb72dad20333449f8e83cfb4a7789508d16918f03f53c52dac54ed8259740051e9c",
    },
    StreamVector {
        name: "ofb8",
        cipher_text: "3b95b11c62c9b759f605bbce1812c67c7a3a9516c4c7f59cf8a3ba9af02645c0943514c250",
    },
];

pub fn aes_key() -> Vec<u8> {
    hex_bytes(AES_KEY)
}

pub fn aes_iv() -> Vec<u8> {
    hex_bytes(AES_IV)
}

pub fn aes_plain_text() -> Vec<u8> {
    hex_bytes(AES_PLAIN_TEXT)
}

pub fn gost_key() -> Vec<u8> {
    hex_bytes(GOST_KEY)
}

/// Kuznyechik keyed with the GOST R 34.13-2015 example key.
#[cfg(feature = "rust-crypto")]
#[allow(clippy::missing_panics_doc)]
pub fn gost_cipher() -> crate::primitive::RustCryptoBlock<kuznyechik::Kuznyechik> {
    crate::primitive::RustCryptoBlock::new_from_slice(&gost_key()).unwrap()
}

/// AES-128 keyed with the SP 800-38A example key.
#[cfg(feature = "rust-crypto")]
#[allow(clippy::missing_panics_doc)]
pub fn aes_cipher() -> crate::primitive::RustCryptoBlock<aes::Aes128> {
    crate::primitive::RustCryptoBlock::new_from_slice(&aes_key()).unwrap()
}

/// Deterministic, non-repeating filler for long messages.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8).collect()
}
