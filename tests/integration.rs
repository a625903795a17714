#![cfg(feature = "rust-crypto")]

use pretty_assertions::assert_eq;
use rand::{rng, Rng};
use test_case::test_case;

use cryptomodes::{
    mode::{
        Cfb, Ecb, G3413Ctr, Gcfb, Gofb, Ige, KeystreamOptions, Nofb, Ofb8, OfbNlf, Pcbc,
        MESHING_INTERVAL,
    },
    primitive::{RustCryptoBlock, RustCryptoFactory},
    Aead, BlockMode, Ccm, CcmParams, Direction, ErrorKind, ModeError, ResetIv, StreamMode,
};

type Aes128 = RustCryptoBlock<aes::Aes128>;

const KEY: [u8; 16] = *b"0123456789abcdef";
const GOST_KEY: [u8; 32] = *b"0123456789abcdef0123456789ABCDEF";
const IV: [u8; 16] = *b"fedcba9876543210";

fn aes() -> Aes128 {
    RustCryptoBlock::new_from_slice(&KEY).unwrap()
}

fn random_message(len: usize) -> Vec<u8> {
    let mut message = vec![0u8; len];
    rng().fill(message.as_mut_slice());
    message
}

fn stream_mode(name: &str, direction: Direction) -> Box<dyn StreamMode> {
    match name {
        "cfb8" => Box::new(Cfb::cfb8(aes(), &IV, direction).unwrap()),
        "cfb16" => Box::new(Cfb::cfb16(aes(), &IV, direction).unwrap()),
        "cfb32" => Box::new(Cfb::cfb32(aes(), &IV, direction).unwrap()),
        "cfb64" => Box::new(Cfb::cfb64(aes(), &IV, direction).unwrap()),
        "ncfb" => Box::new(Cfb::ncfb(aes(), &IV, direction).unwrap()),
        "ofb8" => Box::new(
            Ofb8::with_options(aes(), &IV, KeystreamOptions { buffer_size: 100 }).unwrap(),
        ),
        "nofb" => Box::new(Nofb::new(aes(), &IV).unwrap()),
        "g3413ctr" => Box::new(G3413Ctr::new(aes(), &IV[..8]).unwrap()),
        "g3413ctr32" => Box::new(G3413Ctr::with_bit_block_size(aes(), &IV[..8], 32).unwrap()),
        "gofb" => Box::new(
            Gofb::new(RustCryptoFactory::<aes::Aes256>::new(), &GOST_KEY, &IV).unwrap(),
        ),
        "gcfb" => Box::new(
            Gcfb::new(
                RustCryptoFactory::<aes::Aes256>::new(),
                &GOST_KEY,
                &IV,
                direction,
            )
            .unwrap(),
        ),
        _ => panic!("unknown stream mode {name}"),
    }
}

fn block_mode(name: &str, direction: Direction) -> Box<dyn BlockMode> {
    match name {
        "ecb" => Box::new(Ecb::new(aes(), direction)),
        "pcbc" => Box::new(Pcbc::new(aes(), &IV, direction).unwrap()),
        "ige" => Box::new(Ige::new(aes(), &[IV, KEY].concat(), direction).unwrap()),
        "ofbnlf" => Box::new(
            OfbNlf::new(RustCryptoFactory::<aes::Aes128>::new(), &KEY, &IV, direction).unwrap(),
        ),
        _ => panic!("unknown block mode {name}"),
    }
}

fn apply_in_random_chunks(mode: &mut dyn StreamMode, data: &mut [u8]) {
    let mut offset = 0;
    while offset < data.len() {
        let len = rng().random_range(1..=97).min(data.len() - offset);
        mode.apply_keystream(&mut data[offset..offset + len]).unwrap();
        offset += len;
    }
}

#[test_case("cfb8")]
#[test_case("cfb16")]
#[test_case("cfb32")]
#[test_case("cfb64")]
#[test_case("ncfb")]
#[test_case("ofb8")]
#[test_case("nofb")]
#[test_case("g3413ctr")]
#[test_case("g3413ctr32")]
#[test_case("gofb")]
#[test_case("gcfb")]
fn stream_modes_round_trip_in_random_chunks(name: &str) {
    let message = random_message(3 * MESHING_INTERVAL + 11);

    let mut encrypted = vec![0u8; message.len()];
    stream_mode(name, Direction::Encrypt)
        .xor_key_stream(&mut encrypted, &message)
        .unwrap();
    assert_ne!(encrypted, message);

    let mut decrypted = encrypted.clone();
    apply_in_random_chunks(stream_mode(name, Direction::Decrypt).as_mut(), &mut decrypted);

    assert_eq!(decrypted, message);
}

#[test_case("cfb8")]
#[test_case("ofb8")]
#[test_case("g3413ctr")]
#[test_case("gcfb")]
fn stream_output_does_not_depend_on_chunking(name: &str) {
    let message = random_message(2500);

    let mut at_once = message.clone();
    stream_mode(name, Direction::Encrypt)
        .apply_keystream(&mut at_once)
        .unwrap();

    let mut chunked = message;
    apply_in_random_chunks(stream_mode(name, Direction::Encrypt).as_mut(), &mut chunked);

    assert_eq!(chunked, at_once);
}

#[test_case("gofb")]
#[test_case("gcfb")]
fn meshing_boundary_split_equals_single_call(name: &str) {
    let message = random_message(MESHING_INTERVAL + 300);

    let mut whole = message.clone();
    stream_mode(name, Direction::Encrypt)
        .apply_keystream(&mut whole)
        .unwrap();

    let mut split = message;
    let mut mode = stream_mode(name, Direction::Encrypt);
    let (first_epoch, rest) = split.split_at_mut(MESHING_INTERVAL);
    mode.apply_keystream(first_epoch).unwrap();
    mode.apply_keystream(rest).unwrap();

    assert_eq!(split, whole);
}

#[test]
fn meshing_changes_the_keystream() {
    let mut meshed = vec![0u8; 2 * MESHING_INTERVAL];
    Gofb::new(RustCryptoFactory::<aes::Aes256>::new(), &GOST_KEY, &IV)
        .unwrap()
        .apply_keystream(&mut meshed)
        .unwrap();

    let mut plain_ofb = vec![0u8; 2 * MESHING_INTERVAL];
    let cipher = RustCryptoBlock::<aes::Aes256>::new_from_slice(&GOST_KEY).unwrap();
    Nofb::new(cipher, &IV)
        .unwrap()
        .apply_keystream(&mut plain_ofb)
        .unwrap();

    assert_eq!(
        meshed[..MESHING_INTERVAL],
        plain_ofb[..MESHING_INTERVAL]
    );
    assert_ne!(meshed[MESHING_INTERVAL..], plain_ofb[MESHING_INTERVAL..]);
}

#[test_case("ecb")]
#[test_case("pcbc")]
#[test_case("ige")]
#[test_case("ofbnlf")]
fn block_modes_round_trip(name: &str) {
    let message = random_message(16 * 40);

    let mut encrypted = vec![0u8; message.len()];
    block_mode(name, Direction::Encrypt)
        .crypt_blocks(&mut encrypted, &message)
        .unwrap();

    let mut decrypter = block_mode(name, Direction::Decrypt);
    let mut decrypted = encrypted.clone();
    for blocks in decrypted.chunks_mut(48) {
        decrypter.crypt_blocks_in_place(blocks).unwrap();
    }

    assert_eq!(decrypted, message);
}

#[test_case("ecb")]
#[test_case("pcbc")]
#[test_case("ige")]
#[test_case("ofbnlf")]
fn block_modes_reject_partial_blocks(name: &str) {
    let mut mode = block_mode(name, Direction::Encrypt);
    let mut data = random_message(33);
    let untouched = data.clone();

    let err = mode.crypt_blocks_in_place(&mut data).unwrap_err();

    assert_eq!(
        err,
        ModeError::NotBlockAligned {
            len: 33,
            block_size: 16
        }
    );
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert_eq!(data, untouched);
}

#[test_case("ncfb")]
#[test_case("nofb")]
#[test_case("gofb")]
fn stream_modes_reject_partial_overlap(name: &str) {
    let mut mode = stream_mode(name, Direction::Encrypt);
    let mut buf = random_message(64);

    assert_eq!(
        mode.xor_key_stream_within(&mut buf, 0..32, 1),
        Err(ModeError::BufferOverlap)
    );
    assert_eq!(
        mode.xor_key_stream_within(&mut buf, 8..40, 0),
        Err(ModeError::BufferOverlap)
    );
}

#[test_case("ncfb")]
#[test_case("cfb8")]
fn in_place_and_copy_agree(name: &str) {
    let message = random_message(200);

    let mut buf = message.clone();
    buf.resize(400, 0);
    stream_mode(name, Direction::Encrypt)
        .xor_key_stream_within(&mut buf, 0..200, 0)
        .unwrap();

    let mut moved = message.clone();
    moved.resize(400, 0);
    stream_mode(name, Direction::Encrypt)
        .xor_key_stream_within(&mut moved, 0..200, 200)
        .unwrap();

    assert_eq!(buf[..200], moved[200..]);
}

#[test_case("pcbc")]
#[test_case("ige")]
fn chaining_modes_propagate_errors_to_the_end(name: &str) {
    let message = random_message(16 * 8);
    let mut encrypted = message.clone();
    block_mode(name, Direction::Encrypt)
        .crypt_blocks_in_place(&mut encrypted)
        .unwrap();

    encrypted[2 * 16 + 3] ^= 0x04;
    block_mode(name, Direction::Decrypt)
        .crypt_blocks_in_place(&mut encrypted)
        .unwrap();

    assert_eq!(encrypted[..32], message[..32]);
    for (decrypted, original) in encrypted.chunks(16).zip(message.chunks(16)).skip(2) {
        assert_ne!(decrypted, original);
    }
}

#[test]
fn set_iv_reuses_a_chaining_mode() {
    let message = random_message(64);
    let mut pcbc = Pcbc::new(aes(), &IV, Direction::Encrypt).unwrap();
    assert_eq!(pcbc.iv_size(), 16);

    let mut first = message.clone();
    pcbc.crypt_blocks_in_place(&mut first).unwrap();
    pcbc.set_iv(&IV).unwrap();
    let mut second = message;
    pcbc.crypt_blocks_in_place(&mut second).unwrap();

    assert_eq!(first, second);
}

#[test]
fn ccm_round_trips_and_detects_tampering() {
    let ccm = Ccm::with_params(
        aes(),
        CcmParams {
            nonce_size: 12,
            tag_size: 12,
        },
    )
    .unwrap();
    let nonce = random_message(ccm.nonce_size());
    let aad = random_message(20);

    for len in [0, 1, 15, 16, 17, 1000] {
        let message = random_message(len);
        let sealed = ccm.seal(&nonce, &message, &aad).unwrap();
        assert_eq!(sealed.len(), len + ccm.overhead());
        assert_eq!(ccm.open(&nonce, &sealed, &aad).unwrap(), message);

        let mut tampered = sealed.clone();
        let position = rng().random_range(0..tampered.len());
        tampered[position] ^= 0x01;

        let mut dst = vec![0xffu8; len];
        let err = ccm.open_into(&mut dst, &nonce, &tampered, &aad).unwrap_err();
        assert!(err.is_authentication_failure());
        assert!(dst.iter().all(|&b| b == 0));
    }
}

#[test]
fn precondition_errors_are_not_authentication_failures() {
    let err = Cfb::cfb8(aes(), &IV[..4], Direction::Encrypt).unwrap_err();
    assert!(err.is_precondition());
    assert!(!err.is_authentication_failure());

    let err = Ccm::with_params(
        aes(),
        CcmParams {
            nonce_size: 5,
            tag_size: 16,
        },
    )
    .unwrap_err();
    assert_eq!(err, ModeError::InvalidNonceSize(5));
    assert_eq!(err.kind(), ErrorKind::Precondition);
}
