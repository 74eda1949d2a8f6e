use super::config::IntegrationKey;
use sha2::{Digest, Sha512};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the field that carries the integrity hash on the wire.
pub const HASH_KEY: &str = "hash";

/// Outbound request parameters, kept in ascending key order.
///
/// The ordering is what makes the integrity hash independent of the order in
/// which parameters were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    params: BTreeMap<String, String>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Entries in canonical (byte-wise ascending key) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Uppercase hex SHA-512 over the key-sorted values followed by the integration key.
#[derive(Clone, PartialEq, Eq)]
pub struct IntegrityHash(String);

impl IntegrityHash {
    /// Hashes every entry except an existing `hash` field.
    pub fn compute<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
        key: &IntegrationKey,
    ) -> Self {
        let mut sorted: Vec<(&str, &str)> = entries
            .into_iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(HASH_KEY))
            .collect();
        sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

        let mut hasher = Sha512::new();
        for (_, value) in sorted {
            hasher.update(value.as_bytes());
        }
        hasher.update(key.expose().as_bytes());
        Self(hex::encode_upper(hasher.finalize()))
    }

    /// Recomputes the hash over `entries` and compares it with their `hash` field.
    pub fn verify<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a str)> + Clone,
        key: &IntegrationKey,
    ) -> bool {
        let Some(claimed) = entries
            .clone()
            .into_iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(HASH_KEY))
            .map(|(_, v)| v)
        else {
            return false;
        };
        let expected = Self::compute(entries, key);
        expected.0.eq_ignore_ascii_case(claimed.trim())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// The hash is a keyed credential for one request; keep it out of debug output.
impl fmt::Debug for IntegrityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IntegrityHash(..)")
    }
}
