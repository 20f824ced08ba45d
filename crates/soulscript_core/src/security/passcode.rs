//! Argon2id hashing for the four-digit app-lock passcode.
//!
//! Encoded layout: `version (1) | salt (16) | hash (32)`.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use std::error::Error;
use std::fmt::{Display, Formatter};
use subtle::ConstantTimeEq;

/// Required passcode length in ASCII digits.
pub const PASSCODE_LENGTH: usize = 4;

const HASH_VERSION: u8 = 0x01;
const SALT_SIZE: usize = 16;
const HASH_SIZE: usize = 32;
const ENCODED_SIZE: usize = 1 + SALT_SIZE + HASH_SIZE;

// 19 MiB, 2 passes, 1 lane.
const ARGON_MEMORY_KIB: u32 = 19 * 1024;
const ARGON_ITERATIONS: u32 = 2;
const ARGON_LANES: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasscodeError {
    /// Not exactly four ASCII digits.
    InvalidFormat,
    /// Stored hash has the wrong size or version.
    CorruptHash(String),
    Hashing(String),
}

impl Display for PasscodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat => {
                write!(f, "passcode must be exactly {PASSCODE_LENGTH} digits")
            }
            Self::CorruptHash(message) => write!(f, "stored passcode hash is invalid: {message}"),
            Self::Hashing(message) => write!(f, "passcode hashing failed: {message}"),
        }
    }
}

impl Error for PasscodeError {}

/// Checks the passcode shape without hashing it.
pub fn validate_passcode(passcode: &str) -> Result<(), PasscodeError> {
    if passcode.len() == PASSCODE_LENGTH && passcode.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(PasscodeError::InvalidFormat)
    }
}

/// Hashes a passcode with a fresh random salt.
pub fn hash_passcode(passcode: &str) -> Result<Vec<u8>, PasscodeError> {
    validate_passcode(passcode)?;

    let mut salt = [0u8; SALT_SIZE];
    rand::rng().fill_bytes(&mut salt);
    let hash = argon2id_hash(passcode, &salt)?;

    let mut encoded = Vec::with_capacity(ENCODED_SIZE);
    encoded.push(HASH_VERSION);
    encoded.extend_from_slice(&salt);
    encoded.extend_from_slice(&hash);
    Ok(encoded)
}

/// Verifies a passcode against an encoded hash in constant time.
///
/// Malformed input passcodes simply do not match.
pub fn verify_passcode(passcode: &str, encoded: &[u8]) -> Result<bool, PasscodeError> {
    if encoded.len() != ENCODED_SIZE {
        return Err(PasscodeError::CorruptHash(format!(
            "expected {ENCODED_SIZE} bytes, got {}",
            encoded.len()
        )));
    }
    if encoded[0] != HASH_VERSION {
        return Err(PasscodeError::CorruptHash(format!(
            "unsupported version {}",
            encoded[0]
        )));
    }
    if validate_passcode(passcode).is_err() {
        return Ok(false);
    }

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&encoded[1..1 + SALT_SIZE]);
    let computed = argon2id_hash(passcode, &salt)?;
    Ok(computed.as_slice().ct_eq(&encoded[1 + SALT_SIZE..]).into())
}

fn argon2id_hash(passcode: &str, salt: &[u8; SALT_SIZE]) -> Result<[u8; HASH_SIZE], PasscodeError> {
    let params = Params::new(ARGON_MEMORY_KIB, ARGON_ITERATIONS, ARGON_LANES, Some(HASH_SIZE))
        .map_err(|err| PasscodeError::Hashing(err.to_string()))?;
    let mut output = [0u8; HASH_SIZE];
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password_into(passcode.as_bytes(), salt, &mut output)
        .map_err(|err| PasscodeError::Hashing(err.to_string()))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::{hash_passcode, validate_passcode, verify_passcode, PasscodeError, ENCODED_SIZE};

    #[test]
    fn validate_accepts_only_four_digits() {
        assert!(validate_passcode("0123").is_ok());
        assert_eq!(validate_passcode("123"), Err(PasscodeError::InvalidFormat));
        assert_eq!(validate_passcode("12a4"), Err(PasscodeError::InvalidFormat));
        assert_eq!(validate_passcode("١٢٣٤"), Err(PasscodeError::InvalidFormat));
    }

    #[test]
    fn hash_then_verify_matches_only_same_passcode() {
        let encoded = hash_passcode("2580").expect("hash passcode");
        assert_eq!(encoded.len(), ENCODED_SIZE);
        assert!(verify_passcode("2580", &encoded).expect("verify"));
        assert!(!verify_passcode("0852", &encoded).expect("verify"));
        assert!(!verify_passcode("25801", &encoded).expect("verify"));
    }

    #[test]
    fn same_passcode_gets_distinct_salts() {
        let first = hash_passcode("1111").expect("hash");
        let second = hash_passcode("1111").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn corrupt_hash_is_reported() {
        let err = verify_passcode("1234", &[1, 2, 3]).expect_err("short hash must fail");
        assert!(matches!(err, PasscodeError::CorruptHash(_)));
    }
}
