//! # phyton-crypto
//!
//! The mangle cipher, key material, encrypted-block envelope, device key
//! derivation, and LCG seed bruteforce for the Phyton/AlmaCode firmware
//! format.
//!
//! - [`lcg`]: Borland C `rand()`-compatible LCG
//! - [`cipher`]: the Feistel-variant mangle cipher
//! - [`tables`]: the hardcoded and alternate mangle key tables
//! - [`generator`]: key generators (secure-random, LCG-seeded, zero, wrappers)
//! - [`block`]: the encrypted block envelope (key header + payload)
//! - [`deviceid`]: device-bound key derivation and device code encrypt/decrypt
//! - [`bruteforce`]: LCG seed recovery from a decrypted key header
//! - [`error`]: shared error type

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod block;
pub mod bruteforce;
pub mod cipher;
pub mod deviceid;
pub mod error;
pub mod generator;
pub mod lcg;
pub mod tables;

pub use cipher::{MANGLE_KEY_ROUNDS, MangleKey};
pub use error::{CryptoError, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::block::{EncryptedBlock, KeyMaterial};
    pub use crate::cipher::MangleKey;
    pub use crate::deviceid::DeviceId;
    pub use crate::error::{CryptoError, Result};
    pub use crate::generator::KeyGenerator;
}
