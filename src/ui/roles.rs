use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::AppState;
use crate::model::{Role, RoleField};
use crate::ui::table::{self, Column, TableView};

pub fn columns() -> Vec<Column<Role>> {
    vec![
        Column::field("Name", RoleField::Name, Constraint::Percentage(25)),
        Column::field("Description", RoleField::Description, Constraint::Percentage(35)),
        Column::field("Permissions", RoleField::Permissions, Constraint::Percentage(40)),
    ]
}

/// Users currently holding a copy of `role`, matched by id.
fn holders(app: &AppState, role: &Role) -> Vec<String> {
    app.ctx
        .users
        .items()
        .into_iter()
        .filter(|u| u.roles.iter().any(|r| r.id == role.id))
        .map(|u| u.name)
        .collect()
}

pub fn render_roles(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let columns = columns();
    let view = TableView {
        title: format!("Roles ({})", app.roles.len()),
        columns: &columns,
        items: app.roles.items(),
        selected: app.roles.selected,
        sort: app.roles.sort.config(),
        loading: app.ctx.roles.is_loading(),
    };
    app.rows_per_page = table::render_table(f, body[0], view, &app.theme);
    render_role_details(f, body[1], app);
}

fn render_role_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.roles.selected_item() {
        Some(role) => {
            let mut lines = vec![
                format!("Name:        {}", role.name),
                format!("Description: {}", role.description),
                format!("ID:          {}", role.id),
                String::new(),
                "Permissions:".to_string(),
            ];
            if role.permissions.is_empty() {
                lines.push("  (none)".to_string());
            }
            for p in &role.permissions {
                lines.push(format!("  {}", p.name));
            }
            lines.push(String::new());
            let users = holders(app, role);
            lines.push(format!("Held by {} user(s)", users.len()));
            for name in users {
                lines.push(format!("  {name}"));
            }
            lines.join("\n")
        }
        None => String::new(),
    };
    let p = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}
