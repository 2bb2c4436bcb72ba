//! Credential strings that never print their contents.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An opaque destination credential (webhook URL, bot token).
///
/// The value is wiped from memory on drop and is redacted from `Debug` and
/// `Display` output, so credentials can travel through logged structs safely.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    inner: String,
}

impl SecretString {
    /// Wrap a credential value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Expose the credential.
    ///
    /// Only call this at the point where the value goes onto the wire.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// True when no usable value is present (empty or whitespace only).
    pub fn is_blank(&self) -> bool {
        self.inner.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            f.write_str("[EMPTY]")
        } else {
            f.write_str("[REDACTED]")
        }
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for SecretString {}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Config files hold the real value.
        self.inner.serialize(serializer)
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_redacted() {
        let token = SecretString::new("123456:ABC-DEF1234ghIkl");
        assert_eq!(format!("{:?}", token), "[REDACTED]");
        assert_eq!(format!("{}", token), "[REDACTED]");
        assert_eq!(format!("{:?}", SecretString::default()), "[EMPTY]");
    }

    #[test]
    fn test_blank_detection() {
        assert!(SecretString::default().is_blank());
        assert!(SecretString::new("   ").is_blank());
        assert!(!SecretString::new("https://hooks.example/1").is_blank());
    }

    #[test]
    fn test_serde_keeps_value() {
        let url = SecretString::new("https://hooks.example/abc");
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, "\"https://hooks.example/abc\"");

        let back: SecretString = serde_json::from_str(&json).unwrap();
        assert_eq!(back, url);
        assert_eq!(back.expose_secret(), "https://hooks.example/abc");
    }
}
