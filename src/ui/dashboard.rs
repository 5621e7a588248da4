//! Overview tab: headline counts plus the first few users and roles.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, Theme};
use crate::model::{Role, User};

const RECENT: usize = 5;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub users: usize,
    pub active: usize,
    pub inactive: usize,
    pub roles: usize,
    pub permissions: usize,
}

impl Stats {
    pub fn collect(users: &[User], roles: usize, permissions: usize) -> Self {
        let active = users.iter().filter(|u| u.is_active()).count();
        Self {
            users: users.len(),
            active,
            inactive: users.len() - active,
            roles,
            permissions,
        }
    }
}

fn stat_card<'a>(label: &'a str, value: usize, theme: &Theme) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label, Style::default().fg(theme.muted))),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    )
}

pub fn render_dashboard(f: &mut Frame, area: Rect, app: &AppState) {
    let users = app.ctx.users.items();
    let roles = app.ctx.roles.items();
    let stats = Stats::collect(&users, roles.len(), app.ctx.permissions.items().len());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(rows[0]);
    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let theme = &app.theme;
    let entries = [
        ("Total users", stats.users),
        ("Active users", stats.active),
        ("Inactive users", stats.inactive),
        ("Roles", stats.roles),
        ("Permissions", stats.permissions),
    ];
    for (slot, (label, value)) in cards.iter().zip(entries) {
        f.render_widget(stat_card(label, value, theme), *slot);
    }

    render_recent_users(f, lists[0], &users, theme);
    render_role_overview(f, lists[1], &roles, theme);
}

fn render_recent_users(f: &mut Frame, area: Rect, users: &[User], theme: &Theme) {
    let rows = users.iter().take(RECENT).map(|u| {
        let status = if u.is_active() { theme.success } else { theme.failure };
        Row::new(vec![
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.status.as_str()).style(Style::default().fg(status)),
        ])
        .style(Style::default().fg(theme.text))
    });
    let header = Row::new(vec!["Name", "Email", "Status"])
        .style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [Constraint::Percentage(35), Constraint::Percentage(45), Constraint::Length(10)],
    )
    .header(header)
    .block(
        Block::default()
            .title("Recent users")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(table, area);
}

fn render_role_overview(f: &mut Frame, area: Rect, roles: &[Role], theme: &Theme) {
    let rows = roles.iter().take(RECENT).map(|r| {
        Row::new(vec![
            Cell::from(r.name.clone()),
            Cell::from(r.description.clone()),
            Cell::from(r.permissions.len().to_string()),
        ])
        .style(Style::default().fg(theme.text))
    });
    let header = Row::new(vec!["Role", "Description", "Perms"])
        .style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [Constraint::Percentage(30), Constraint::Percentage(55), Constraint::Length(6)],
    )
    .header(header)
    .block(
        Block::default()
            .title("Roles")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(table, area);
}
