pub mod components;
pub mod dashboard;
pub mod permissions;
pub mod roles;
pub mod table;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{ActiveTab, AppState, InputMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    if app.input_mode == InputMode::Login {
        components::render_login(f, f.area(), app);
        components::render_notices(f, f.area(), app);
        return;
    }

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let who = app
        .ctx
        .session
        .current_user()
        .map(|u| u.email)
        .unwrap_or_else(|| "anonymous".to_string());
    let mut spans = Vec::new();
    for tab in ActiveTab::ALL {
        let style = if tab == app.active_tab {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.header_fg)
        };
        spans.push(Span::styled(format!(" {} ", tab.title()), style));
    }
    spans.push(Span::styled(
        format!("  ({who})  Tab: switch  /: search  1-9: sort  n/e/d: new/edit/delete  r: refresh  L: logout  q: quit"),
        Style::default().fg(app.theme.muted),
    ));
    let header = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .title("rbac-admin")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().bg(app.theme.header_bg));
    f.render_widget(header, root[0]);

    match app.active_tab {
        ActiveTab::Dashboard => dashboard::render_dashboard(f, root[1], app),
        ActiveTab::Users => users::render_users(f, root[1], app),
        ActiveTab::Roles => roles::render_roles(f, root[1], app),
        ActiveTab::Permissions => permissions::render_permissions(f, root[1], app),
    }

    components::render_status_bar(f, root[2], app);
    components::render_modal(f, f.area(), app);
    components::render_notices(f, root[1], app);
}
