use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Material used to derive an [`AccountId`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentityMaterial {
    /// A 32-byte signing public key.
    PublicKey([u8; 32]),
    /// An externally issued address of arbitrary length (e.g. a wallet address).
    Address(Vec<u8>),
    /// An identity derived from a parent account and a label.
    Derived { parent: [u8; 32], label: String },
}

/// Opaque identity of a voter, an owner, or a deployed ledger.
///
/// An `AccountId` is derived deterministically from [`IdentityMaterial`]
/// with BLAKE3, so the same material always yields the same account. The
/// ledger only ever compares and hashes accounts; it never interprets them.
///
/// Serialized as a 64-character hex string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId {
    hash: [u8; 32],
}

impl AccountId {
    /// Derive an `AccountId` from identity material.
    pub fn derive(material: &IdentityMaterial) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"ballot-account-v1:");
        match material {
            IdentityMaterial::PublicKey(pk) => {
                hasher.update(b"pubkey:");
                hasher.update(pk);
            }
            IdentityMaterial::Address(addr) => {
                hasher.update(b"address:");
                hasher.update(addr);
            }
            IdentityMaterial::Derived { parent, label } => {
                hasher.update(b"derived:");
                hasher.update(parent);
                hasher.update(b":");
                hasher.update(label.as_bytes());
            }
        }
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Create a random account, for tests, demos and `keygen`.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self::derive(&IdentityMaterial::PublicKey(bytes))
    }

    /// Derive a child account labelled under this one.
    pub fn child(&self, label: &str) -> Self {
        Self::derive(&IdentityMaterial::Derived {
            parent: self.hash,
            label: label.to_string(),
        })
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier for logs (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("acct:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from 64 hex characters, optionally prefixed with `acct:` or `0x`.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.trim();
        let s = s
            .strip_prefix("acct:")
            .or_else(|| s.strip_prefix("0x"))
            .unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr })
    }

    /// Create from a raw 32-byte value. Use `derive()` for production code.
    pub fn from_raw(hash: [u8; 32]) -> Self {
        Self { hash }
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.short_id())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}

impl FromStr for AccountId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let material = IdentityMaterial::PublicKey([42u8; 32]);
        assert_eq!(AccountId::derive(&material), AccountId::derive(&material));
    }

    #[test]
    fn different_material_types_produce_different_ids() {
        let bytes = [7u8; 32];
        let pubkey = AccountId::derive(&IdentityMaterial::PublicKey(bytes));
        let address = AccountId::derive(&IdentityMaterial::Address(bytes.to_vec()));
        assert_ne!(pubkey, address);
    }

    #[test]
    fn child_accounts_depend_on_label() {
        let owner = AccountId::from_raw([5; 32]);
        assert_ne!(owner.child("ledger:1"), owner.child("ledger:2"));
        assert_eq!(owner.child("ledger:1"), owner.child("ledger:1"));
    }

    #[test]
    fn ephemeral_ids_are_unique() {
        assert_ne!(AccountId::ephemeral(), AccountId::ephemeral());
    }

    #[test]
    fn short_id_format() {
        let id = AccountId::from_raw([0xab; 32]);
        assert_eq!(id.short_id(), "acct:abababab");
        assert_eq!(format!("{id}"), "acct:abababab");
    }

    #[test]
    fn hex_parsing_accepts_prefixes() {
        let id = AccountId::derive(&IdentityMaterial::PublicKey([99; 32]));
        assert_eq!(AccountId::from_hex(&id.to_hex()).unwrap(), id);
        assert_eq!(AccountId::from_hex(&format!("0x{}", id.to_hex())).unwrap(), id);
        assert_eq!(AccountId::from_hex(&format!("acct:{}", id.to_hex())).unwrap(), id);
    }

    #[test]
    fn hex_parsing_rejects_bad_input() {
        assert!(matches!(
            AccountId::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
        assert_eq!(
            AccountId::from_hex("abcd").unwrap_err(),
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = AccountId::from_raw([1; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let parsed: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<AccountId>("\"nope\"").is_err());
    }

    #[test]
    fn ordering_is_consistent() {
        assert!(AccountId::from_raw([0; 32]) < AccountId::from_raw([1; 32]));
    }
}
