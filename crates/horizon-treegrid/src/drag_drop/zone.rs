//! Drop zones and their string handles.

use std::fmt;
use std::str::FromStr;

use crate::geometry::Rect;
use crate::model::RowKey;

/// Where, relative to a target row, a dragged row lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZone {
    /// Top third of the row: insert as the previous sibling.
    Before,
    /// Middle third: insert as a child.
    Inside,
    /// Bottom third: insert as the next sibling.
    After,
}

impl DropZone {
    /// All zones in top-to-bottom order.
    pub const ALL: [DropZone; 3] = [DropZone::Before, DropZone::Inside, DropZone::After];

    pub fn as_str(self) -> &'static str {
        match self {
            DropZone::Before => "before",
            DropZone::Inside => "inside",
            DropZone::After => "after",
        }
    }

    /// Before and after are edge zones; they outrank inside on collisions.
    pub fn is_edge(self) -> bool {
        !matches!(self, DropZone::Inside)
    }
}

impl fmt::Display for DropZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DropZone {
    type Err = ZoneParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(DropZone::Before),
            "inside" => Ok(DropZone::Inside),
            "after" => Ok(DropZone::After),
            other => Err(ZoneParseError::UnknownZone(other.to_string())),
        }
    }
}

/// Failure to parse a `<zone>:<rowId>` handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZoneParseError {
    #[error("Drop zone handle '{0}' has no ':' separator")]
    MissingSeparator(String),
    #[error("Unknown drop zone '{0}'")]
    UnknownZone(String),
    #[error("Drop zone handle '{0}' has an empty row id")]
    EmptyRow(String),
}

/// A drop zone of a specific row, written as `<zone>:<rowId>`.
///
/// Only the first `:` separates; row ids may contain colons themselves.
///
/// ```
/// use horizon_treegrid::drag_drop::{DropZone, ZoneId};
///
/// let zone: ZoneId = "inside:folder:7".parse().unwrap();
/// assert_eq!(zone.zone, DropZone::Inside);
/// assert_eq!(zone.row.as_str(), "folder:7");
/// assert_eq!(zone.to_string(), "inside:folder:7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneId {
    pub zone: DropZone,
    pub row: RowKey,
}

impl ZoneId {
    pub fn new(zone: DropZone, row: impl Into<RowKey>) -> Self {
        Self {
            zone,
            row: row.into(),
        }
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.zone, self.row)
    }
}

impl FromStr for ZoneId {
    type Err = ZoneParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (zone, row) = s
            .split_once(':')
            .ok_or_else(|| ZoneParseError::MissingSeparator(s.to_string()))?;
        if row.is_empty() {
            return Err(ZoneParseError::EmptyRow(s.to_string()));
        }
        Ok(Self {
            zone: zone.parse()?,
            row: RowKey::new(row),
        })
    }
}

/// A droppable region reported by the host, identified by an opaque handle.
///
/// Row zones use [`ZoneId`] handles; anything else the host registers as
/// droppable is an unrelated candidate and never produces a drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DropCandidate {
    pub handle: String,
    pub rect: Rect,
}

impl DropCandidate {
    pub fn new(handle: impl Into<String>, rect: Rect) -> Self {
        Self {
            handle: handle.into(),
            rect,
        }
    }

    /// The row zone this candidate stands for, if it is one.
    pub fn zone(&self) -> Option<ZoneId> {
        self.handle.parse().ok()
    }
}

/// Split a laid-out row into its three drop-zone candidates.
pub fn row_drop_candidates(row: &RowKey, rect: Rect) -> [DropCandidate; 3] {
    let [top, middle, bottom] = rect.split_thirds();
    [
        DropCandidate::new(ZoneId::new(DropZone::Before, row.clone()).to_string(), top),
        DropCandidate::new(ZoneId::new(DropZone::Inside, row.clone()).to_string(), middle),
        DropCandidate::new(ZoneId::new(DropZone::After, row.clone()).to_string(), bottom),
    ]
}
