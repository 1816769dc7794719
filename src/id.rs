//! Blurb identifiers.

use std::fmt;

use rand_core::OsRng;
use rand_core::RngCore;
use serde::{Deserialize, Serialize};

/// Prefix carried by every generated id.
pub const ID_PREFIX: &str = "id-";

/// Number of base-36 characters after the prefix.
pub const ID_LEN: usize = 16;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// An opaque blurb identifier, e.g. `id-k3x9q0c1m2v7z8a4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlurbId(String);

impl BlurbId {
    /// Generate a random id from the OS RNG.
    pub fn generate() -> BlurbId {
        let mut bytes = [0u8; ID_LEN];
        OsRng.fill_bytes(&mut bytes);
        let mut id = String::with_capacity(ID_PREFIX.len() + ID_LEN);
        id.push_str(ID_PREFIX);
        for byte in bytes {
            // 256 % 36 leaves a slight bias toward the low digits; fine for ids.
            id.push(ALPHABET[byte as usize % ALPHABET.len()] as char);
        }
        return BlurbId(id);
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl From<&str> for BlurbId {
    fn from(value: &str) -> Self {
        BlurbId(value.to_string())
    }
}

impl From<String> for BlurbId {
    fn from(value: String) -> Self {
        BlurbId(value)
    }
}

impl fmt::Display for BlurbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_shape() {
        let id = BlurbId::generate();
        let s = id.as_str();
        assert!(s.starts_with(ID_PREFIX));
        assert_eq!(s.len(), ID_PREFIX.len() + ID_LEN);
        assert!(s[ID_PREFIX.len()..].bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(BlurbId::generate(), BlurbId::generate());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = BlurbId::from("id-abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"id-abc\"");
        let back: BlurbId = serde_json::from_str("\"id-abc\"").unwrap();
        assert_eq!(back, id);
    }
}
