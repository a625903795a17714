//! # Block cipher modes of operation
//! This library turns any fixed-size block primitive into stream, block and authenticated
//! encryption modes: CFB (8/16/32/64 bit and full block segments), OFB8 and full block OFB, GOST
//! 28147-89 OFB/CFB with CryptoPro key meshing ([RFC 4357](https://www.rfc-editor.org/rfc/rfc4357)),
//! the GOST R 34.13-2015 counter mode, ECB, PCBC, IGE, OFB with non-linear feedback and CCM
//! ([RFC 3610](https://www.rfc-editor.org/rfc/rfc3610)).
//!
//! Every mode is generic over [`BlockCipher`], modes which re-key their primitive while running
//! take a [`BlockCipherFactory`]. Contract violations such as wrong IV lengths, unaligned block
//! input or partially overlapping buffers are reported as [`ModeError`]s before any data is
//! touched.
//!
//! # Optional features
//!
//! - **`rust-crypto`** *(enabled by default)*: provides [`primitive::RustCryptoBlock`] which wraps
//! any cipher implementing the [RustCrypto](https://github.com/RustCrypto/traits) `cipher` traits,
//! e.g. from the `aes` or `des` crates.
//! - **`openssl`**: provides `primitive::OpensslBlock`, using ECB ciphers of the
//! [rust-openssl](https://crates.io/crates/openssl) crate as primitive.
//! Per default the OpenSSL library is locally compiled and then statically linked. The build process requires a C compiler,
//! `perl` (and `perl-core`), and `make`. For further options see the [openssl crate documentation](https://docs.rs/openssl/0.10.55/openssl/).
//!
//! Both features may be enabled at the same time, the modes themselves depend on neither.

#![deny(clippy::missing_panics_doc)]
#![deny(
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
#![warn(
    // missing_docs,
    clippy::doc_markdown,
    clippy::semicolon_if_nothing_returned,
    clippy::single_match_else,
    clippy::inconsistent_struct_constructor,
    clippy::map_unwrap_or,
    clippy::match_same_arms
)]

mod util;

/// authenticated encryption, see [RFC 3610](https://www.rfc-editor.org/rfc/rfc3610) for CCM
pub mod aead;
/// error definitions
pub mod error;
/// stream and block modes of operation
pub mod mode;
/// detection of partially overlapping source and destination windows
pub mod overlap;
/// the block primitive contract and adapters to cipher libraries
pub mod primitive;

pub use aead::{Aead, Ccm, CcmParams};
pub use error::{ErrorKind, ModeError, Result};
pub use mode::{BlockMode, ResetIv, StreamMode};
pub use primitive::{BlockCipher, BlockCipherFactory, Direction};

#[cfg(test)]
pub mod test_vectors;
