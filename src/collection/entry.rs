//! Collection entry types and id normalization.
//!
//! DESIGN
//! ======
//! Persisted lists written by older widgets mix numeric and string ids
//! (`[123, "456"]`). [`EntryId`] accepts both on every decode path and
//! always holds the canonical string form, so lookups never miss because
//! of a representation mismatch.

use std::fmt;

use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// ENTRY ID
// =============================================================================

/// Canonical string id of a collection entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntryId(String);

impl EntryId {
    /// Normalize `raw` into an id. Surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for EntryId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&String> for EntryId {
    fn from(raw: &String) -> Self {
        Self::new(raw)
    }
}

impl From<&EntryId> for EntryId {
    fn from(id: &EntryId) -> Self {
        id.clone()
    }
}

impl From<u64> for EntryId {
    fn from(raw: u64) -> Self {
        Self(raw.to_string())
    }
}

impl From<i64> for EntryId {
    fn from(raw: i64) -> Self {
        Self(raw.to_string())
    }
}

impl Serialize for EntryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntryIdVisitor)
    }
}

struct EntryIdVisitor;

impl Visitor<'_> for EntryIdVisitor {
    type Value = EntryId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<EntryId, E> {
        Ok(EntryId::new(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<EntryId, E> {
        Ok(EntryId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<EntryId, E> {
        Ok(EntryId::from(v))
    }

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<EntryId, E> {
        // JSON numbers like `123.0` still name product 123.
        if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
            return Ok(EntryId::from(v as i64));
        }
        Err(E::invalid_value(de::Unexpected::Float(v), &self))
    }
}

// =============================================================================
// KEYED
// =============================================================================

/// A value a collection can hold: serializable and identified by an [`EntryId`].
pub trait Keyed: Clone + Serialize + DeserializeOwned + Send + 'static {
    fn key(&self) -> &EntryId;

    /// Fold a re-added value into the one already stored under the same key.
    fn merge(&mut self, incoming: Self) {
        *self = incoming;
    }

    /// Repair a value decoded from storage. `None` drops it.
    fn normalize(self) -> Option<Self> {
        Some(self)
    }
}

// =============================================================================
// COLLECTION ENTRY
// =============================================================================

/// Reference to a product-like entity with optional cached display fields.
///
/// Display fields are captured when the entry is added and never refreshed
/// from the catalog, so they can go stale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionEntry {
    pub id: EntryId,
    pub title: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
    pub price: Option<String>,
}

impl CollectionEntry {
    /// Entry with only an id. Persists as a bare id string.
    pub fn new(id: impl Into<EntryId>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(Some(title.into()));
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = non_empty(Some(image.into()));
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = non_empty(Some(url.into()));
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = non_empty(Some(price.into()));
        self
    }

    /// `true` when no display field is cached.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.title.is_none() && self.image.is_none() && self.url.is_none() && self.price.is_none()
    }
}

impl Keyed for CollectionEntry {
    fn key(&self) -> &EntryId {
        &self.id
    }

    /// Refresh cached fields the incoming entry carries; keep the rest.
    fn merge(&mut self, incoming: Self) {
        if incoming.title.is_some() {
            self.title = incoming.title;
        }
        if incoming.image.is_some() {
            self.image = incoming.image;
        }
        if incoming.url.is_some() {
            self.url = incoming.url;
        }
        if incoming.price.is_some() {
            self.price = incoming.price;
        }
    }
}

#[derive(Serialize, Deserialize)]
struct EntryRecord {
    id: EntryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Bare(EntryId),
    Record(EntryRecord),
}

impl Serialize for CollectionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_bare() {
            return self.id.serialize(serializer);
        }
        EntryRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            image: self.image.clone(),
            url: self.url.clone(),
            price: self.price.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CollectionEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match StoredEntry::deserialize(deserializer)? {
            StoredEntry::Bare(id) => Self::new(id),
            StoredEntry::Record(record) => Self {
                id: record.id,
                title: non_empty(record.title),
                image: non_empty(record.image),
                url: non_empty(record.url),
                price: non_empty(record.price),
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "entry_test.rs"]
mod tests;
