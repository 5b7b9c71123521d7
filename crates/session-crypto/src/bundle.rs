//! Named key bundles and their canonical wire encoding.
//!
//! Wire format (all lengths unsigned 32-bit big-endian):
//!
//! ```text
//! [count]
//! [name_len][name: UTF-8][value_len][value]   (count times, sorted by name)
//! ```
//!
//! Entries are written in byte-wise name order, so equal bundles always
//! encode to identical bytes. Peers must produce the same layout to
//! interoperate.

use std::collections::btree_map::{self, BTreeMap};

use crate::error::{CryptoError, Result};
use crate::keys::KeyMaterial;

const LEN_PREFIX: usize = 4;

/// A mapping from key names to key material. Names are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyBundle {
    entries: BTreeMap<String, KeyMaterial>,
}

impl KeyBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the material previously stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, material: KeyMaterial) -> Option<KeyMaterial> {
        self.entries.insert(name.into(), material)
    }

    pub fn get(&self, name: &str) -> Option<&KeyMaterial> {
        self.entries.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<KeyMaterial> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in sorted name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, KeyMaterial> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a KeyBundle {
    type Item = (&'a String, &'a KeyMaterial);
    type IntoIter = btree_map::Iter<'a, String, KeyMaterial>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<N: Into<String>> FromIterator<(N, KeyMaterial)> for KeyBundle {
    fn from_iter<I: IntoIterator<Item = (N, KeyMaterial)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, m)| (n.into(), m)).collect(),
        }
    }
}

/// Serialize a bundle into its canonical byte form.
///
/// Names and values must each fit in a `u32` length prefix.
pub fn encode(bundle: &KeyBundle) -> Vec<u8> {
    let body: usize = bundle
        .iter()
        .map(|(name, value)| 2 * LEN_PREFIX + name.len() + value.len())
        .sum();
    let mut out = Vec::with_capacity(LEN_PREFIX + body);

    out.extend_from_slice(&(bundle.len() as u32).to_be_bytes());
    for (name, value) in bundle {
        out.extend_from_slice(&(name.len() as u32).to_be_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&(value.len() as u32).to_be_bytes());
        out.extend_from_slice(value.as_bytes());
    }
    out
}

/// Parse the canonical byte form back into a bundle.
///
/// Entry order in the input is not enforced; duplicate names are rejected.
pub fn decode(bytes: &[u8]) -> Result<KeyBundle> {
    let mut reader = Reader::new(bytes);
    let count = reader.read_u32()? as usize;

    // Every entry needs at least its two length prefixes.
    if count > reader.remaining() / (2 * LEN_PREFIX) {
        return Err(CryptoError::MalformedBundle(format!(
            "entry count {count} exceeds what {} remaining bytes can hold",
            reader.remaining()
        )));
    }

    let mut entries = BTreeMap::new();
    for index in 0..count {
        let name = reader.read_chunk()?;
        let name = std::str::from_utf8(name)
            .map_err(|_| CryptoError::MalformedBundle(format!("entry {index}: name is not UTF-8")))?;
        let value = KeyMaterial::from_slice(reader.read_chunk()?);

        if entries.insert(name.to_string(), value).is_some() {
            return Err(CryptoError::MalformedBundle(format!(
                "duplicate entry name '{name}'"
            )));
        }
    }

    if reader.remaining() != 0 {
        return Err(CryptoError::MalformedBundle(format!(
            "{} trailing bytes after last entry",
            reader.remaining()
        )));
    }

    Ok(KeyBundle { entries })
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(CryptoError::MalformedBundle(format!(
                "need {n} bytes at offset {}, only {} remain",
                self.pos,
                self.remaining()
            )));
        }
        let chunk = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(chunk)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let raw: [u8; LEN_PREFIX] = self
            .take(LEN_PREFIX)?
            .try_into()
            .map_err(|_| CryptoError::MalformedBundle("short length prefix".into()))?;
        Ok(u32::from_be_bytes(raw))
    }

    fn read_chunk(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32()? as usize;
        self.take(len)
    }
}
