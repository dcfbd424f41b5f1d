//! Minimal HAL (`application/hal+json`) representation.
//!
//! Single resources serialize as their DTO fields plus `_links`; collections
//! as `{"_embedded": {<relation>: [...]}, "_links": {...}}`.

use serde::ser::{Serialize, SerializeMap, Serializer};

pub const HAL_JSON: &str = "application/hal+json";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
pub struct Link {
    pub href: String,
}

/// Link relations in insertion order, serialized as `{rel: {href}}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links(Vec<(String, Link)>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rel: impl Into<String>, href: impl Into<String>) -> Self {
        self.push(rel, href);
        self
    }

    pub fn push(&mut self, rel: impl Into<String>, href: impl Into<String>) {
        self.0.push((rel.into(), Link { href: href.into() }));
    }

    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.iter().find(|(r, _)| r == rel).map(|(_, link)| link)
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rel, link) in &self.0 {
            map.serialize_entry(rel, link)?;
        }
        map.end()
    }
}

/// Name under which a resource type appears inside `_embedded`
pub trait Relation {
    const COLLECTION_RELATION: &'static str;
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T> EntityModel<T> {
    pub fn of(content: T, links: Links) -> Self {
        Self { content, links }
    }

    pub fn self_href(&self) -> Option<&str> {
        self.links.get("self").map(|link| link.href.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CollectionModel<T> {
    pub items: Vec<EntityModel<T>>,
    pub links: Links,
}

impl<T> CollectionModel<T> {
    pub fn of(items: Vec<EntityModel<T>>, links: Links) -> Self {
        Self { items, links }
    }
}

struct Embedded<'a, T>(&'a [EntityModel<T>]);

impl<T: Serialize + Relation> Serialize for Embedded<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(T::COLLECTION_RELATION, self.0)?;
        map.end()
    }
}

impl<T: Serialize + Relation> Serialize for CollectionModel<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.items.is_empty() {
            map.serialize_entry("_embedded", &Embedded(&self.items))?;
        }
        map.serialize_entry("_links", &self.links)?;
        map.end()
    }
}
