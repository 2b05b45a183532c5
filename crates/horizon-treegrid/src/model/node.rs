//! Tree nodes supplied by the host.
//!
//! The grid reads host data through the [`GridNode`] trait so any tree type
//! can be displayed without copying. [`Row`] is a ready-made implementation
//! that deserializes from JSON.
//!
//! Row identity is always compared through its string coercion, [`RowKey`]:
//! a numeric id `7` and a string id `"7"` address the same row.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::CellValue;

/// A row identifier as supplied by the host: a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Str(String),
}

impl RowId {
    /// The string-coerced key used for every lookup.
    pub fn key(&self) -> RowKey {
        RowKey(self.to_string())
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(n) => write!(f, "{n}"),
            RowId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        RowId::Int(n)
    }
}

impl From<i32> for RowId {
    fn from(n: i32) -> Self {
        RowId::Int(n as i64)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        RowId::Str(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        RowId::Str(s)
    }
}

impl From<RowId> for CellValue {
    fn from(id: RowId) -> Self {
        match id {
            RowId::Int(n) => CellValue::Int(n),
            RowId::Str(s) => CellValue::String(s),
        }
    }
}

/// String-coerced row identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(String);

impl RowKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RowKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&RowId> for RowKey {
    fn from(id: &RowId) -> Self {
        id.key()
    }
}

impl From<RowId> for RowKey {
    fn from(id: RowId) -> Self {
        id.key()
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for RowKey {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<i32> for RowKey {
    fn from(n: i32) -> Self {
        Self(n.to_string())
    }
}

/// A node of the host's tree.
///
/// Depth is never read from the node; the grid derives it from where the
/// node sits in the forest.
pub trait GridNode: Send + Sync + 'static {
    /// The node's identifier, unique across the whole forest.
    ///
    /// Nodes without one are displayed but cannot be indexed, expanded by id,
    /// dragged, dropped onto or edited.
    fn id(&self) -> Option<RowId>;

    /// Free-form type discriminator, opaque to the grid.
    fn node_type(&self) -> &str;

    /// Ordered children, if the node has a child sequence at all.
    fn children(&self) -> Option<&[Self]>
    where
        Self: Sized;

    /// Look up a value by dot-separated path (`"owner.name"`).
    fn field(&self, path: &str) -> Option<CellValue>;

    /// String-coerced identity of this node.
    fn key(&self) -> Option<RowKey> {
        self.id().map(|id| id.key())
    }

    /// Whether the node has a non-empty child sequence.
    fn has_children(&self) -> bool
    where
        Self: Sized,
    {
        self.children().is_some_and(|children| !children.is_empty())
    }
}

/// A generic JSON-shaped tree row.
///
/// Any property besides `id`, `type` and `children` is kept in `fields` and
/// is reachable by column paths.
///
/// ```
/// use horizon_treegrid::model::{GridNode, Row};
///
/// let row: Row = serde_json::from_str(
///     r#"{"id": 1, "type": "folder", "owner": {"name": "Ada"}, "children": [{"id": 2, "type": "file"}]}"#,
/// ).unwrap();
/// assert_eq!(row.field("owner.name").unwrap().as_str(), Some("Ada"));
/// assert!(row.has_children());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RowId>,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Row>>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, CellValue>,
}

impl Row {
    /// Create a row with an identifier and type.
    pub fn new(id: impl Into<RowId>, node_type: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            node_type: node_type.into(),
            ..Self::default()
        }
    }

    /// Set a field value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set the child sequence.
    pub fn with_children(mut self, children: Vec<Row>) -> Self {
        self.children = Some(children);
        self
    }
}

impl GridNode for Row {
    fn id(&self) -> Option<RowId> {
        self.id.clone()
    }

    fn node_type(&self) -> &str {
        &self.node_type
    }

    fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    fn field(&self, path: &str) -> Option<CellValue> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let value = match head {
            "id" => self.id.clone().map(CellValue::from)?,
            "type" => CellValue::String(self.node_type.clone()),
            _ => self.fields.get(head)?.clone(),
        };
        match rest {
            Some(rest) => value.get_path(rest).cloned(),
            None => Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_id_coercion() {
        assert_eq!(RowId::from(7).key(), RowId::from("7").key());
        assert_eq!(RowKey::from(7), RowKey::new("7"));
        assert_eq!(RowId::from("a:b").to_string(), "a:b");
    }

    #[test]
    fn test_row_fields() {
        let row = Row::new(1, "task")
            .with_field("title", "Write docs")
            .with_field("estimate", 3);

        assert_eq!(row.field("title"), Some(CellValue::from("Write docs")));
        assert_eq!(row.field("id"), Some(CellValue::Int(1)));
        assert_eq!(row.field("type"), Some(CellValue::from("task")));
        assert_eq!(row.field("missing"), None);
        assert!(!row.has_children());
    }

    #[test]
    fn test_row_from_json() {
        let row: Row = serde_json::from_str(
            r#"{"id": "root", "type": "folder", "meta": {"owner": {"name": "Ada"}}, "children": []}"#,
        )
        .unwrap();

        assert_eq!(row.id, Some(RowId::Str("root".into())));
        assert_eq!(row.field("meta.owner.name"), Some(CellValue::from("Ada")));
        assert_eq!(row.children.as_ref().map(Vec::len), Some(0));
        assert!(!row.has_children());
    }

    #[test]
    fn test_row_without_id() {
        let row: Row = serde_json::from_str(r#"{"type": "note"}"#).unwrap();
        assert_eq!(row.key(), None);
    }
}
