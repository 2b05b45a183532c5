//! Composing visible rows and columns into a [`GridView`].

use horizon_treegrid_core::logging::targets;

use super::config::Callbacks;
use super::view::{CellDragView, CellView, ColumnHeader, EditorView, GridView, RowView};
use super::{GridState, TreeGrid, cell_edit_mode};
use crate::editing::{CellKey, CellMode};
use crate::model::{ColumnDef, GridNode, VisibleRow, flatten_tree};

impl<N: GridNode> GridState<N> {
    fn build_view(&self, callbacks: &Callbacks<N>) -> GridView {
        let columns: Vec<&ColumnDef<N>> = self
            .columns
            .iter()
            .filter(|column| column.is_visible(&self.view_mode))
            .collect();

        let rows: Vec<RowView> = flatten_tree(&self.rows, self.expansion.expanded_rows())
            .iter()
            .map(|row| self.row_view(row, &columns, callbacks))
            .collect();
        tracing::trace!(
            target: targets::GRID,
            rows = rows.len(),
            columns = columns.len(),
            "grid rendered"
        );

        GridView {
            columns: columns
                .iter()
                .map(|column| ColumnHeader {
                    id: column.id().to_string(),
                    header: column.header().to_string(),
                    width: column.width(),
                    alignment: column.alignment(),
                })
                .collect(),
            rows,
            show_actions: callbacks.row_actions.is_some(),
            footer: self.footer.clone(),
            dragging: self.drag.session().map(|session| session.active().clone()),
        }
    }

    fn row_view(&self, row: &VisibleRow<'_, N>, columns: &[&ColumnDef<N>], callbacks: &Callbacks<N>) -> RowView {
        let node = row.node;
        let cells = columns
            .iter()
            .enumerate()
            .map(|(i, column)| self.cell_view(row, column, i == 0, callbacks))
            .collect();

        RowView {
            key: row.key.clone(),
            id: node.id(),
            node_type: node.node_type().to_string(),
            level: row.level,
            has_children: row.has_children,
            expanded: row.expanded,
            is_last_child: row.is_last_child,
            aria_level: row.level + 1,
            aria_expanded: row.has_children.then_some(row.expanded),
            cells,
            actions: callbacks.row_actions.as_ref().map(|actions| actions(node)),
        }
    }

    fn cell_view(&self, row: &VisibleRow<'_, N>, column: &ColumnDef<N>, first: bool, callbacks: &Callbacks<N>) -> CellView {
        let node = row.node;
        let cell = row.key.as_ref().map(|key| CellKey::new(key.clone(), column.id()));
        let mode = match &cell {
            Some(cell) => self
                .editing
                .cell_mode(cell, cell_edit_mode(column, node, self.in_edit_view())),
            None => CellMode::Off,
        };

        let editor = mode.is_editing().then(|| EditorView {
            kind: column.editor().clone(),
            value: cell
                .as_ref()
                .and_then(|cell| self.editing.value(cell).cloned())
                .unwrap_or_else(|| column.value(node)),
        });

        let drag = match (&row.key, first) {
            (Some(key), true) => {
                let mut view = CellDragView::new(key, callbacks.can_drag(node));
                if let Some(session) = self.drag.session() {
                    view.is_source = session.active() == key;
                    view.hovered_zone = session.hover().filter(|hover| &hover.row == key).map(|hover| hover.zone);
                    view.drop_disabled = !session.permits(key);
                }
                Some(view)
            }
            _ => None,
        };

        CellView {
            column: column.id().to_string(),
            mode,
            text: column.display_text(node),
            editor,
            indent: first.then(|| row.level as f32 * self.settings.indent_width),
            drag,
        }
    }
}

impl<N: GridNode + Clone> TreeGrid<N> {
    /// Compose the current state into a view.
    ///
    /// Auto-closed unlocked cells whose row is no longer designated unlocked
    /// are released first, so they open again when designated anew.
    #[tracing::instrument(skip_all, target = "horizon_treegrid::grid", level = "trace")]
    pub fn render(&self) -> GridView {
        self.update(|state, callbacks, _| {
            state.release_auto_closed();
            state.build_view(callbacks)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{RowAction, TreeGridConfig};
    use crate::model::Row;

    #[test]
    fn test_first_column_carries_indent_and_drag() {
        let rows = vec![Row::new(1, "folder").with_field("name", "A").with_children(vec![Row::new(2, "file").with_field("name", "B")])];
        let grid = TreeGrid::new(
            rows,
            TreeGridConfig::new()
                .with_column(ColumnDef::new("name", "Name"))
                .with_column(ColumnDef::new("type", "Type")),
        );
        let view = grid.render();

        let child = view.row(2).unwrap();
        let name = child.cell("name").unwrap();
        assert_eq!(name.indent, Some(20.0));
        let drag = name.drag.as_ref().unwrap();
        assert_eq!(drag.zones, ["before:2", "inside:2", "after:2"].map(String::from));
        assert!(drag.can_drag);

        let kind = child.cell("type").unwrap();
        assert_eq!(kind.text, "file");
        assert_eq!(kind.indent, None);
        assert!(kind.drag.is_none());
    }

    #[test]
    fn test_row_without_id_is_rendered_but_inert() {
        let rows: Vec<Row> = serde_json::from_str(r#"[{"type": "note", "text": "hi"}]"#).unwrap();
        let grid = TreeGrid::new(rows, TreeGridConfig::new().with_column(ColumnDef::new("text", "Text")));
        let view = grid.render();

        assert_eq!(view.rows.len(), 1);
        let cell = &view.rows[0].cells[0];
        assert_eq!(cell.text, "hi");
        assert!(cell.drag.is_none());
        assert_eq!(cell.mode, CellMode::Off);
    }

    #[test]
    fn test_actions_column() {
        let rows = vec![Row::new(1, "file")];
        let grid = TreeGrid::new(
            rows.clone(),
            TreeGridConfig::new().with_row_actions(|row: &Row| vec![RowAction::new("delete", format!("Delete {}", row.node_type))]),
        );
        let view = grid.render();
        assert!(view.show_actions);
        assert_eq!(view.rows[0].actions, Some(vec![RowAction::new("delete", "Delete file")]));

        let plain = TreeGrid::new(rows, TreeGridConfig::new());
        let view = plain.render();
        assert!(!view.show_actions);
        assert_eq!(view.rows[0].actions, None);
    }
}
