//! Render output tests: columns, cells, drag wiring, actions and footer.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use horizon_treegrid::prelude::*;

fn rows() -> Vec<Row> {
    serde_json::from_str(
        r#"[
            {"id": "p1", "type": "project", "name": "Apollo", "budget": {"amount": 1200.5, "currency": "EUR"},
             "children": [
                {"id": "t1", "type": "task", "name": "Design", "budget": {"amount": 200}},
                {"id": "t2", "type": "task", "name": "Build"}
             ]},
            {"id": "p2", "type": "project", "name": "Gemini"}
        ]"#,
    )
    .unwrap()
}

fn columns() -> Vec<ColumnDef<Row>> {
    vec![
        ColumnDef::new("name", "Name").with_width(240.0).with_editable(|_| true),
        ColumnDef::new("budget.amount", "Budget")
            .with_alignment(HorizontalAlignment::Right)
            .with_editor(EditorKind::Currency)
            .with_editable(|row: &Row| row.node_type == "project")
            .with_formatter(|value| match value.as_float() {
                Some(amount) => format!("{amount:.2}"),
                None => "-".to_string(),
            }),
        ColumnDef::new("type", "Type").with_visible(|mode| mode != "edit"),
    ]
}

#[test]
fn test_headers_follow_view_mode() {
    let grid = TreeGrid::new(rows(), TreeGridConfig::new().with_columns(columns()));

    let view = grid.render();
    let ids: Vec<&str> = view.columns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["name", "budget.amount", "type"]);
    assert_eq!(view.columns[0].width, Some(240.0));
    assert_eq!(view.columns[1].alignment, HorizontalAlignment::Right);

    grid.set_view_mode("edit");
    let view = grid.render();
    let ids: Vec<&str> = view.columns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["name", "budget.amount"]);
    assert!(view.rows.iter().all(|row| row.cells.len() == 2));
}

#[test]
fn test_cell_text_uses_path_and_formatter() {
    let grid = TreeGrid::new(rows(), TreeGridConfig::new().with_columns(columns()));
    let view = grid.render();

    assert_eq!(view.row("p1").unwrap().cell("budget.amount").unwrap().text, "1200.50");
    assert_eq!(view.row("t1").unwrap().cell("budget.amount").unwrap().text, "200.00");
    assert_eq!(view.row("t2").unwrap().cell("budget.amount").unwrap().text, "-");
    assert_eq!(view.row("t2").unwrap().cell("type").unwrap().text, "task");
}

#[test]
fn test_edit_view_shows_editors_for_editable_cells() {
    let grid = TreeGrid::new(rows(), TreeGridConfig::new().with_columns(columns()).with_view_mode("edit"));
    let view = grid.render();

    let project = view.row("p1").unwrap().cell("budget.amount").unwrap();
    assert_eq!(project.mode, CellMode::Locked);
    let editor = project.editor.as_ref().unwrap();
    assert_eq!(editor.kind, EditorKind::Currency);
    assert_eq!(editor.value, CellValue::Float(1200.5));

    let task = view.row("t1").unwrap().cell("budget.amount").unwrap();
    assert_eq!(task.mode, CellMode::Off);
    assert!(task.editor.is_none());
}

#[test]
fn test_editor_shows_typed_value() {
    let grid = TreeGrid::new(rows(), TreeGridConfig::new().with_columns(columns()));
    grid.start_edit("t2", "name").unwrap();
    grid.update_edit("t2", "name", "Build & test".into()).unwrap();

    let view = grid.render();
    let cell = view.row("t2").unwrap().cell("name").unwrap();
    assert_eq!(cell.mode, CellMode::UserOpen);
    assert_eq!(cell.editor.as_ref().unwrap().value, CellValue::from("Build & test"));
    assert_eq!(cell.text, "Build");
}

#[test]
fn test_indentation_follows_settings() {
    let settings = GridSettings::from_json_str(r#"{"indent_width": 12}"#).unwrap();
    let grid = TreeGrid::new(
        rows(),
        TreeGridConfig::new().with_columns(columns()).with_settings(settings),
    );
    let view = grid.render();
    assert_eq!(view.row("p1").unwrap().cells[0].indent, Some(0.0));
    assert_eq!(view.row("t1").unwrap().cells[0].indent, Some(12.0));
}

#[test]
fn test_drag_state_is_rendered_on_first_column() {
    let grid = TreeGrid::new(
        rows(),
        TreeGridConfig::new()
            .with_columns(columns())
            .with_can_drag(|row: &Row| row.node_type == "task")
            .with_valid_drop_targets(|_| ValidTargets::Ready([RowId::from("t1"), RowId::from("p2")].into())),
    );

    let view = grid.render();
    assert!(!view.row("p1").unwrap().cells[0].drag.as_ref().unwrap().can_drag);
    assert!(view.row("t1").unwrap().cells[0].drag.as_ref().unwrap().can_drag);
    assert_eq!(view.dragging, None);

    grid.start_drag("t2").unwrap();
    grid.drag_over(Some(ZoneId::new(DropZone::After, "t1")), Instant::now());
    let view = grid.render();
    assert_eq!(view.dragging, Some(RowKey::from("t2")));

    let source = view.row("t2").unwrap().cells[0].drag.clone().unwrap();
    assert!(source.is_source);
    let hovered = view.row("t1").unwrap().cells[0].drag.clone().unwrap();
    assert_eq!(hovered.hovered_zone, Some(DropZone::After));
    assert!(!hovered.drop_disabled);
    let excluded = view.row("p1").unwrap().cells[0].drag.clone().unwrap();
    assert!(excluded.drop_disabled);
    assert_eq!(excluded.hovered_zone, None);
    assert!(view.row("t1").unwrap().cells[1].drag.is_none());
}

#[test]
fn test_actions_and_footer() {
    let grid = TreeGrid::new(
        rows(),
        TreeGridConfig::new()
            .with_columns(columns())
            .with_footer("2 projects")
            .with_row_actions(|row: &Row| {
                let mut actions = vec![RowAction::new("rename", "Rename")];
                if row.node_type == "project" {
                    actions.push(RowAction::new("archive", "Archive").with_enabled(!row.has_children()));
                }
                actions
            }),
    );
    let view = grid.render();

    assert!(view.show_actions);
    assert_eq!(view.footer.as_deref(), Some("2 projects"));
    let p1 = view.row("p1").unwrap().actions.clone().unwrap();
    assert_eq!(p1.len(), 2);
    assert!(!p1[1].enabled);
    assert_eq!(view.row("t1").unwrap().actions.as_ref().map(Vec::len), Some(1));

    grid.set_footer(None);
    assert_eq!(grid.render().footer, None);
}

#[test]
fn test_changed_signal_fires_once_per_transition() {
    let grid = TreeGrid::new(rows(), TreeGridConfig::new().with_columns(columns()));
    let changes = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&changes);
    grid.signals().changed.connect(move |_| *sink.lock() += 1);

    grid.render();
    assert_eq!(*changes.lock(), 0);
    grid.toggle_row("p1").unwrap();
    grid.start_edit("p2", "name").unwrap();
    grid.set_view_mode("compact");
    assert_eq!(*changes.lock(), 3);
}

#[test]
fn test_signal_slots_may_call_back_into_grid() {
    let grid = TreeGrid::new(rows(), TreeGridConfig::new().with_columns(columns()));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handle = grid.clone();
    grid.signals().row_toggled.connect(move |_| sink.lock().push(handle.render().rows.len()));

    grid.toggle_row("p1").unwrap();
    assert_eq!(*seen.lock(), vec![2]);
}
