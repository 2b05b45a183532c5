//! Column definitions.
//!
//! A column is a record of optional strategies: how to read, display, edit,
//! parse and gate a cell. Every strategy is optional; an unset one falls back
//! to the plain behaviour documented on its builder method. Columns are never
//! mutated by the grid once supplied.

use std::fmt;
use std::sync::Arc;

use super::node::GridNode;
use super::value::CellValue;

/// Horizontal alignment of a column's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    /// Align to the left edge.
    #[default]
    Left,
    /// Center horizontally.
    Center,
    /// Align to the right edge.
    Right,
}

/// Explicit per-row edit policy for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditMode {
    /// The editor is always shown and never closes; commits write through.
    Locked,
    /// The editor opens on its own and closes for good after one commit or
    /// cancel.
    Unlocked,
}

/// The kind of editor a host should paint for an open cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EditorKind {
    #[default]
    Text,
    Number,
    Currency,
    Percentage,
    /// A host-defined editor, identified by name.
    Custom(String),
}

pub type RenderFn<N> = Arc<dyn Fn(&N, &CellValue) -> String + Send + Sync>;
pub type RowPredicate<N> = Arc<dyn Fn(&N) -> bool + Send + Sync>;
pub type VisibilityFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;
pub type EditModeFn<N> = Arc<dyn Fn(&N) -> Option<EditMode> + Send + Sync>;
pub type FormatFn = Arc<dyn Fn(&CellValue) -> String + Send + Sync>;
pub type ParseFn = Arc<dyn Fn(&CellValue) -> Result<CellValue, String> + Send + Sync>;

/// Definition of one grid column.
///
/// The column id doubles as the dot-separated path of the cell value inside
/// each node.
///
/// ```
/// use horizon_treegrid::model::{ColumnDef, EditorKind, Row};
///
/// let amount = ColumnDef::<Row>::new("budget.amount", "Budget")
///     .with_width(120.0)
///     .with_editor(EditorKind::Currency)
///     .with_editable(|row| row.node_type == "project");
/// assert_eq!(amount.id(), "budget.amount");
/// ```
pub struct ColumnDef<N> {
    id: String,
    header: String,
    width: Option<f32>,
    alignment: HorizontalAlignment,
    editor: EditorKind,
    render: Option<RenderFn<N>>,
    editable: Option<RowPredicate<N>>,
    visible: Option<VisibilityFn>,
    edit_mode: Option<EditModeFn<N>>,
    auto_commit: Option<RowPredicate<N>>,
    formatter: Option<FormatFn>,
    parser: Option<ParseFn>,
}

impl<N> Clone for ColumnDef<N> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            width: self.width,
            alignment: self.alignment,
            editor: self.editor.clone(),
            render: self.render.clone(),
            editable: self.editable.clone(),
            visible: self.visible.clone(),
            edit_mode: self.edit_mode.clone(),
            auto_commit: self.auto_commit.clone(),
            formatter: self.formatter.clone(),
            parser: self.parser.clone(),
        }
    }
}

impl<N> fmt::Debug for ColumnDef<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("width", &self.width)
            .field("alignment", &self.alignment)
            .field("editor", &self.editor)
            .finish_non_exhaustive()
    }
}

impl<N: GridNode> ColumnDef<N> {
    /// Create a column reading the value at `id` and titled `header`.
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            width: None,
            alignment: HorizontalAlignment::Left,
            editor: EditorKind::Text,
            render: None,
            editable: None,
            visible: None,
            edit_mode: None,
            auto_commit: None,
            formatter: None,
            parser: None,
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the editor painted when the cell is open. Defaults to text.
    pub fn with_editor(mut self, editor: EditorKind) -> Self {
        self.editor = editor;
        self
    }

    /// Set a custom read renderer, given the row and its cell value.
    pub fn with_render<F>(mut self, render: F) -> Self
    where
        F: Fn(&N, &CellValue) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Set the per-row editability predicate. Unset means not editable.
    pub fn with_editable<F>(mut self, editable: F) -> Self
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        self.editable = Some(Arc::new(editable));
        self
    }

    /// Set the view-mode visibility predicate. Unset means always visible.
    pub fn with_visible<F>(mut self, visible: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.visible = Some(Arc::new(visible));
        self
    }

    /// Set the explicit per-row edit policy.
    pub fn with_edit_mode<F>(mut self, edit_mode: F) -> Self
    where
        F: Fn(&N) -> Option<EditMode> + Send + Sync + 'static,
    {
        self.edit_mode = Some(Arc::new(edit_mode));
        self
    }

    /// Commit on the first change of an open, non-locked editor.
    pub fn with_auto_commit<F>(mut self, auto_commit: F) -> Self
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        self.auto_commit = Some(Arc::new(auto_commit));
        self
    }

    /// Set the display formatter used by the read view.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&CellValue) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Set the parser applied to editor values before commit.
    pub fn with_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&CellValue) -> Result<CellValue, String> + Send + Sync + 'static,
    {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn width(&self) -> Option<f32> {
        self.width
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn editor(&self) -> &EditorKind {
        &self.editor
    }

    /// Read this column's value from a node.
    pub fn value(&self, node: &N) -> CellValue {
        node.field(&self.id).unwrap_or_default()
    }

    /// The read-view text for a node: renderer, else formatter, else plain.
    pub fn display_text(&self, node: &N) -> String {
        let value = self.value(node);
        if let Some(render) = &self.render {
            render(node, &value)
        } else if let Some(formatter) = &self.formatter {
            formatter(&value)
        } else {
            value.display_text()
        }
    }

    pub fn is_visible(&self, view_mode: &str) -> bool {
        self.visible.as_ref().is_none_or(|visible| visible(view_mode))
    }

    pub fn is_editable(&self, node: &N) -> bool {
        self.editable.as_ref().is_some_and(|editable| editable(node))
    }

    /// The explicit edit policy for a node, if the column has one.
    pub fn explicit_edit_mode(&self, node: &N) -> Option<EditMode> {
        self.edit_mode.as_ref().and_then(|edit_mode| edit_mode(node))
    }

    pub fn auto_commits(&self, node: &N) -> bool {
        self.auto_commit.as_ref().is_some_and(|auto| auto(node))
    }

    /// Parse an editor value. Without a parser the value passes through.
    pub fn parse(&self, raw: &CellValue) -> Result<CellValue, String> {
        match &self.parser {
            Some(parser) => parser(raw),
            None => Ok(raw.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    #[test]
    fn test_defaults() {
        let column = ColumnDef::<Row>::new("title", "Title");
        let row = Row::new(1, "task").with_field("title", "Hello");

        assert!(column.is_visible("view"));
        assert!(!column.is_editable(&row));
        assert_eq!(column.explicit_edit_mode(&row), None);
        assert!(!column.auto_commits(&row));
        assert_eq!(column.display_text(&row), "Hello");
        assert_eq!(column.parse(&CellValue::from("x")), Ok(CellValue::from("x")));
    }

    #[test]
    fn test_strategies() {
        let column = ColumnDef::<Row>::new("price", "Price")
            .with_visible(|mode| mode != "compact")
            .with_formatter(|value| format!("${:.2}", value.as_float().unwrap_or_default()))
            .with_parser(|raw| {
                raw.as_str()
                    .unwrap_or_default()
                    .trim_start_matches('$')
                    .parse::<f64>()
                    .map(CellValue::Float)
                    .map_err(|e| e.to_string())
            })
            .with_edit_mode(|row| (row.node_type == "draft").then_some(EditMode::Unlocked));

        let row = Row::new(1, "draft").with_field("price", 3);
        assert!(!column.is_visible("compact"));
        assert_eq!(column.display_text(&row), "$3.00");
        assert_eq!(column.parse(&"$4.5".into()), Ok(CellValue::Float(4.5)));
        assert!(column.parse(&"abc".into()).is_err());
        assert_eq!(column.explicit_edit_mode(&row), Some(EditMode::Unlocked));
    }

    #[test]
    fn test_render_wins_over_formatter() {
        let column = ColumnDef::<Row>::new("title", "Title")
            .with_formatter(|_| "formatted".into())
            .with_render(|row, value| format!("{}:{}", row.node_type, value));
        let row = Row::new(1, "task").with_field("title", "x");
        assert_eq!(column.display_text(&row), "task:x");
    }
}
