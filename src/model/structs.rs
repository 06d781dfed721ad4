use serde::{Deserialize, Serialize};
use std::fmt;

// Payload items returned by the college endpoints
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct YearInfo {
    #[serde(default)]
    pub id: Option<ItemId>,
    pub year_number: i64,
}

/// A term or a module; both endpoints share the `{ id, name }` shape.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NamedItem {
    pub id: ItemId,
    pub name: String,
}

/// Row identifiers come back as JSON numbers, but string ids are accepted too.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StructureType {
    Term,
    Module,
    Unknown(String),
}

impl From<String> for StructureType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "term" => StructureType::Term,
            "module" => StructureType::Module,
            _ => StructureType::Unknown(tag),
        }
    }
}

impl From<StructureType> for String {
    fn from(kind: StructureType) -> Self {
        match kind {
            StructureType::Term => "term".to_string(),
            StructureType::Module => "module".to_string(),
            StructureType::Unknown(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureDescriptor {
    pub structure_type: StructureType,
}
