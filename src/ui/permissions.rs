use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};

use crate::app::AppState;
use crate::model::{Permission, PermissionField};
use crate::ui::table::{self, Column, TableView};

pub fn columns() -> Vec<Column<Permission>> {
    vec![
        Column::field("Name", PermissionField::Name, Constraint::Percentage(30)),
        Column::field("Description", PermissionField::Description, Constraint::Percentage(45)),
        Column::derived(
            "Resource",
            |p: &Permission| p.name.split(':').next().unwrap_or_default().to_string(),
            Constraint::Percentage(25),
        ),
    ]
}

pub fn render_permissions(f: &mut Frame, area: Rect, app: &mut AppState) {
    let columns = columns();
    let view = TableView {
        title: format!("Permissions ({})", app.permissions.len()),
        columns: &columns,
        items: app.permissions.items(),
        selected: app.permissions.selected,
        sort: app.permissions.sort.config(),
        loading: app.ctx.permissions.is_loading(),
    };
    app.rows_per_page = table::render_table(f, area, view, &app.theme);
}
