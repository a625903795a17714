use std::io::{self, BufRead, Write as _};

use clap::{Parser, ValueEnum};
use cryptomodes::{
    mode::{Cfb, G3413Ctr, Gcfb, Gofb, Nofb, Ofb8},
    primitive::{RustCryptoBlock, RustCryptoFactory},
    Aead, Ccm, Direction, StreamMode,
};

fn main() {
    let Args {
        mode,
        log_level,
        secret,
        iv,
    } = Args::parse();

    println!("- Using mode {:?}, secret {}, iv {}", mode, secret, iv);

    if let Some(log_level) = log_level {
        println!("- Using log level {}", log_level);
        simple_logger::init_with_level(log_level).unwrap();
    }

    let key = fit_to(&secret, key_len(mode));
    let iv = fit_to(&iv, 16);

    let print_before_input = || {
        println!("--------------------------------------------------------------------------");
        println!("- Enter a phrase to be encrypted, confirm with [ENTER], abort with [CTRL+C]");
        print!("- To be encrypted:  ");
        std::io::stdout().flush().unwrap();
    };

    print_before_input();

    let stdin = io::stdin();
    let lines = stdin
        .lock()
        .lines()
        .take_while(Result::is_ok)
        .map(Result::unwrap);

    lines.for_each(|l| {
        println!("- Encrypting {}", hex::encode(l.as_bytes()));

        if mode == ArgMode::Ccm {
            let ccm = Ccm::new(RustCryptoBlock::<aes::Aes128>::new_from_slice(&key).unwrap())
                .unwrap();
            let nonce = &iv[..ccm.nonce_size()];
            let sealed = ccm.seal(nonce, l.as_bytes(), b"demo").unwrap();
            println!("- Sealed {}", hex::encode(&sealed));

            let opened = ccm.open(nonce, &sealed, b"demo").unwrap();
            println!("- Opened {}", String::from_utf8_lossy(&opened));
        } else {
            let mut data = l.into_bytes();
            stream_mode(mode, &key, &iv, Direction::Encrypt)
                .apply_keystream(&mut data)
                .unwrap();
            println!("- Encrypted {}", hex::encode(&data));

            stream_mode(mode, &key, &iv, Direction::Decrypt)
                .apply_keystream(&mut data)
                .unwrap();
            println!("- Decrypted {}", String::from_utf8_lossy(&data));
        }

        print_before_input();
    });
}

fn stream_mode(mode: ArgMode, key: &[u8], iv: &[u8], direction: Direction) -> Box<dyn StreamMode> {
    let aes = || RustCryptoBlock::<aes::Aes128>::new_from_slice(key).unwrap();
    match mode {
        ArgMode::Cfb8 => Box::new(Cfb::cfb8(aes(), iv, direction).unwrap()),
        ArgMode::Cfb32 => Box::new(Cfb::cfb32(aes(), iv, direction).unwrap()),
        ArgMode::Ncfb => Box::new(Cfb::ncfb(aes(), iv, direction).unwrap()),
        ArgMode::Ofb8 => Box::new(Ofb8::new(aes(), iv).unwrap()),
        ArgMode::Nofb => Box::new(Nofb::new(aes(), iv).unwrap()),
        ArgMode::G3413Ctr => Box::new(G3413Ctr::new(aes(), &iv[..8]).unwrap()),
        ArgMode::Gofb => Box::new(
            Gofb::new(RustCryptoFactory::<aes::Aes256>::new(), key, iv).unwrap(),
        ),
        ArgMode::Gcfb => Box::new(
            Gcfb::new(RustCryptoFactory::<aes::Aes256>::new(), key, iv, direction).unwrap(),
        ),
        ArgMode::Ccm => unreachable!("CCM is not a stream mode"),
    }
}

fn key_len(mode: ArgMode) -> usize {
    match mode {
        ArgMode::Gofb | ArgMode::Gcfb => 32,
        _ => 16,
    }
}

/// Repeats or truncates `input` to exactly `len` bytes.
fn fit_to(input: &str, len: usize) -> Vec<u8> {
    input.bytes().cycle().take(len).collect()
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(value_enum, short, long, default_value_t = ArgMode::Ncfb)]
    mode: ArgMode,
    #[arg(short, long)]
    log_level: Option<log::Level>,
    #[arg(short, long, default_value = "SUPER_SECRET")]
    secret: String,
    #[arg(short, long, default_value = "INITIALIZATION_VECTOR")]
    iv: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ArgMode {
    Cfb8,
    Cfb32,
    Ncfb,
    Ofb8,
    Nofb,
    G3413Ctr,
    Gofb,
    Gcfb,
    Ccm,
}
