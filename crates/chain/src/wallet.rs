//! Cosmetic wallet identifiers
//!
//! Raw random bytes rendered as hex. There is no key derivation or curve
//! structure behind them.

use rand::RngCore;
use zeroize::Zeroizing;

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(&bytes))
}

/// 20 random bytes, `0x`-prefixed
pub fn generate_wallet_address() -> String {
    random_hex(20)
}

/// 32 random bytes, `0x`-prefixed; wiped from memory on drop
pub fn generate_private_key() -> Zeroizing<String> {
    Zeroizing::new(random_hex(32))
}
