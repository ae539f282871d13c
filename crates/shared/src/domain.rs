use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Opaque key naming one record within a collection type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Int(i64),
    Str(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(v) => write!(f, "{v}"),
            Identifier::Str(v) => f.write_str(v),
        }
    }
}

impl FromStr for Identifier {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(v) => Identifier::Int(v),
            Err(_) => Identifier::Str(s.to_string()),
        })
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Int(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Str(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: Identifier,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    #[default]
    Routes,
    Collections,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 2] = [CollectionKind::Routes, CollectionKind::Collections];

    /// Array field of the index response that lists member identifiers.
    pub fn ids_field(self) -> &'static str {
        match self {
            CollectionKind::Routes => "routes",
            CollectionKind::Collections => "collections",
        }
    }

    /// Object field of the detail response that wraps the record.
    pub fn wrapper_field(self) -> &'static str {
        match self {
            CollectionKind::Routes => "route",
            CollectionKind::Collections => "collection",
        }
    }

    pub fn id_field(self) -> &'static str {
        match self {
            CollectionKind::Routes => "route_id",
            CollectionKind::Collections => "collection_id",
        }
    }

    /// First path segment of detail views for this kind.
    pub fn namespace(self) -> &'static str {
        self.wrapper_field()
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ids_field())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortTab {
    Sort,
    Filter,
}
