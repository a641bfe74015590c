//! Ordered, case-insensitive, multi-valued header collection.
//!
//! Header names keep the casing they were inserted with; every lookup
//! compares names ASCII case-insensitively. A name may appear many times
//! (e.g. `Set-Cookie`), and insertion order is preserved across names.
//!
//! Values are stored as raw bytes so that obs-text (e.g. Latin-1 filenames)
//! survives a round trip. The `&str` accessors only see UTF-8 values; the
//! `_bytes` accessors see everything.

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Header multimap shared by canonical requests and responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Bytes)>,
}

impl Headers {
    /// Create an empty header collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value without touching existing values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl AsRef<[u8]>) {
        self.entries.push((name.into(), copy(value)));
    }

    /// Replace every value for `name` with a single value.
    ///
    /// The new entry takes the position of the first removed one, or goes
    /// last when the name was absent.
    pub fn insert(&mut self, name: impl Into<String>, value: impl AsRef<[u8]>) {
        let name = name.into();
        let value = copy(value);
        match self.position(&name) {
            Some(idx) => {
                self.entries[idx] = (name.clone(), value);
                let mut seen_first = false;
                self.entries.retain(|(k, _)| {
                    if !k.eq_ignore_ascii_case(&name) {
                        return true;
                    }
                    let keep = !seen_first;
                    seen_first = true;
                    keep
                });
            }
            None => self.entries.push((name, value)),
        }
    }

    /// Insert `value` only when no value for `name` exists yet.
    pub fn set_default(&mut self, name: impl Into<String>, value: impl AsRef<[u8]>) {
        let name = name.into();
        if !self.contains(&name) {
            self.entries.push((name, copy(value)));
        }
    }

    /// First value for `name`, if it is UTF-8.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_bytes(name).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// First value for `name`, as sent on the wire.
    pub fn get_bytes(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_ref())
    }

    /// Every UTF-8 value for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.get_all_bytes(name)
            .filter_map(|v| std::str::from_utf8(v).ok())
    }

    /// Every value for `name`, in insertion order, as sent on the wire.
    pub fn get_all_bytes<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove every value for `name`, returning how many were dropped.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        before - self.entries.len()
    }

    /// Distinct header names in first-seen order, with their first-seen casing.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (k, _) in &self.entries {
            if !keys.iter().any(|seen| seen.eq_ignore_ascii_case(k)) {
                keys.push(k);
            }
        }
        keys
    }

    /// Drop every header whose name is not in `names`.
    pub fn retain_names(&mut self, names: &[&str]) {
        self.entries
            .retain(|(k, _)| names.iter().any(|n| n.eq_ignore_ascii_case(k)));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// `name: value` lines for diagnostics, non-UTF-8 bytes replaced.
    pub fn display_lines(&self) -> Vec<String> {
        self.iter()
            .map(|(k, v)| format!("{}: {}", k, String::from_utf8_lossy(v)))
            .collect()
    }

    /// Number of header entries (not distinct names).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert to an `http` header map.
    ///
    /// Entries whose name or value is not valid on the wire are skipped and
    /// reported back by name.
    pub fn to_header_map(&self) -> (HeaderMap, Vec<String>) {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        let mut rejected = Vec::new();
        for (k, v) in &self.entries {
            match (HeaderName::from_bytes(k.as_bytes()), HeaderValue::from_bytes(v)) {
                (Ok(name), Ok(value)) => {
                    map.append(name, value);
                }
                _ => rejected.push(k.clone()),
            }
        }
        (map, rejected)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

fn copy(value: impl AsRef<[u8]>) -> Bytes {
    Bytes::copy_from_slice(value.as_ref())
}

impl From<&HeaderMap> for Headers {
    fn from(map: &HeaderMap) -> Self {
        let entries = map
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), copy(v.as_bytes())))
            .collect();
        Self { entries }
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: AsRef<[u8]>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), copy(v))).collect(),
        }
    }
}
