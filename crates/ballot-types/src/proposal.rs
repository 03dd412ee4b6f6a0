use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NameError;

/// Smallest accepted proposal name, in UTF-8 bytes.
pub const MIN_NAME_BYTES: usize = 1;
/// Largest accepted proposal name, in UTF-8 bytes.
pub const MAX_NAME_BYTES: usize = 99;

/// A proposal label whose UTF-8 length is within
/// [`MIN_NAME_BYTES`]..=[`MAX_NAME_BYTES`].
///
/// Length is measured in bytes, not characters: a 50-character name made of
/// two-byte code points is 100 bytes and is refused.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProposalName(String);

impl ProposalName {
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        let len = name.len();
        if len < MIN_NAME_BYTES {
            return Err(NameError::Empty);
        }
        if len > MAX_NAME_BYTES {
            return Err(NameError::TooLong {
                len,
                max: MAX_NAME_BYTES,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn byte_len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ProposalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProposalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProposalName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ProposalName {
    type Error = NameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProposalName> for String {
    fn from(name: ProposalName) -> Self {
        name.0
    }
}

impl PartialEq<str> for ProposalName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProposalName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(ProposalName::new("A").unwrap().byte_len(), 1);
        assert_eq!(ProposalName::new("x".repeat(99)).unwrap().byte_len(), 99);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(ProposalName::new("").unwrap_err(), NameError::Empty);
    }

    #[test]
    fn rejects_too_long() {
        assert_eq!(
            ProposalName::new("x".repeat(120)).unwrap_err(),
            NameError::TooLong { len: 120, max: 99 }
        );
    }

    #[test]
    fn length_is_counted_in_bytes() {
        // 50 two-byte characters = 100 bytes.
        let name = "é".repeat(50);
        assert_eq!(name.chars().count(), 50);
        assert!(matches!(
            ProposalName::new(name),
            Err(NameError::TooLong { len: 100, .. })
        ));
    }

    #[test]
    fn deserialization_validates() {
        let ok: ProposalName = serde_json::from_str("\"Alpha\"").unwrap();
        assert_eq!(ok, "Alpha");
        assert!(serde_json::from_str::<ProposalName>("\"\"").is_err());
    }

    proptest! {
        #[test]
        fn accepted_iff_byte_length_in_range(s in ".{0,120}") {
            let len = s.len();
            let accepted = ProposalName::new(s).is_ok();
            prop_assert_eq!(accepted, (MIN_NAME_BYTES..=MAX_NAME_BYTES).contains(&len));
        }
    }
}
