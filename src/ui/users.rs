use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::AppState;
use crate::model::{User, UserField};
use crate::ui::table::{self, Column, TableView};

pub fn columns() -> Vec<Column<User>> {
    vec![
        Column::field("Name", UserField::Name, Constraint::Percentage(25)),
        Column::field("Email", UserField::Email, Constraint::Percentage(35)),
        Column::field("Status", UserField::Status, Constraint::Length(10)),
        Column::derived("Roles", |u: &User| u.role_names().join(", "), Constraint::Percentage(30)),
    ]
}

pub fn render_users(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let columns = columns();
    let view = TableView {
        title: format!("Users ({})", app.users.len()),
        columns: &columns,
        items: app.users.items(),
        selected: app.users.selected,
        sort: app.users.sort.config(),
        loading: app.ctx.users.is_loading(),
    };
    app.rows_per_page = table::render_table(f, body[0], view, &app.theme);
    render_user_details(f, body[1], app);
}

fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.users.selected_item() {
        Some(u) => {
            let mut lines = vec![
                format!("Name:   {}", u.name),
                format!("Email:  {}", u.email),
                format!("Status: {}", u.status),
                format!("ID:     {}", u.id),
                String::new(),
                "Roles:".to_string(),
            ];
            if u.roles.is_empty() {
                lines.push("  (none)".to_string());
            }
            for role in &u.roles {
                lines.push(format!("  {} - {}", role.name, role.description));
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
