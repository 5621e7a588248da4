//! Shared UI components (status bar, modals, notices, sign-in screen).
//!
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, EntityForm, FormRow, InputMode, ModalState, Notice};

/// Render the bottom status bar with mode, counts and the search prompt.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Login => "LOGIN",
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let busy = if app.is_loading() { "  [loading]" } else { "" };
    let search = match (app.input_mode, app.search_query()) {
        (InputMode::Search, q) => format!("  /{q}_"),
        (_, "") => String::new(),
        (_, q) => format!("  filter:\"{q}\""),
    };
    let msg = format!(
        "mode: {mode}  users:{}  roles:{}  permissions:{}  rows/page:{}{busy}{search}",
        app.users.len(),
        app.roles.len(),
        app.permissions.len(),
        app.rows_per_page,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn marker(focused: bool) -> &'static str {
    if focused { "▶ " } else { "  " }
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let max_w = area.width.saturating_sub(6).max(30);
    let min_w = 40u16.min(max_w);
    let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = (approx_lines + 4).min(max_h).max(5);
    let rect = centered_rect(min_w, height, area);
    let p = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Create/edit dialog: text inputs with inline errors, the status toggle
/// and the checklist.
pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState, form: &EntityForm) {
    let theme = &app.theme;
    let mut lines: Vec<Line> = Vec::new();
    for (idx, row) in form.rows().into_iter().enumerate() {
        let focused = idx == form.focus;
        let style = if focused {
            Style::default().fg(theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        match row {
            FormRow::Text(name) => {
                let cursor = if focused { "_" } else { "" };
                lines.push(Line::styled(
                    format!("{}{:<12} {}{cursor}", marker(focused), name, form.form.value(name)),
                    style,
                ));
                if form.form.is_touched(name)
                    && let Some(err) = form.form.error(name)
                {
                    lines.push(Line::styled(
                        format!("    {err}"),
                        Style::default().fg(theme.failure),
                    ));
                }
            }
            FormRow::Status => {
                lines.push(Line::styled(
                    format!("{}{:<12} {} (Space)", marker(focused), "status", form.status),
                    style,
                ));
            }
            FormRow::Choice(i) => {
                if let Some(choice) = form.choices.get(i) {
                    if i == 0 {
                        let heading = match form.kind {
                            crate::app::EntityKind::Role => "Permissions:",
                            _ => "Roles:",
                        };
                        lines.push(Line::raw(""));
                        lines.push(Line::from(Span::styled(
                            heading,
                            Style::default().add_modifier(Modifier::BOLD),
                        )));
                    }
                    lines.push(Line::styled(
                        format!("{}{} {}", marker(focused), checkbox(choice.checked), choice.label),
                        style,
                    ));
                }
            }
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Tab/↑↓: move  Space: toggle  Enter: save  Esc: cancel",
        Style::default().fg(theme.muted),
    ));

    let width = 70u16.min(area.width.saturating_sub(4)).max(40);
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2)).max(6);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(form.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState, label: &str, name: &str, selected: usize) {
    let rect = centered_rect(50, 7, area);
    let options = ["Delete", "Cancel"];
    let buttons = options
        .iter()
        .enumerate()
        .map(|(idx, o)| {
            if idx == selected {
                format!("[{o}]")
            } else {
                format!(" {o} ")
            }
        })
        .collect::<Vec<_>>()
        .join("   ");
    let body = format!("Delete {} '{}'?\n\n{}", label.to_lowercase(), name, buttons);
    let p = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Confirm delete")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.failure)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Stack live notices in the bottom-right corner, newest last.
pub fn render_notices(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 48u16.min(area.width);
    let mut bottom = area.y + area.height.saturating_sub(1);
    for (_, notice) in app.notices.iter().rev() {
        if bottom < area.y + 3 {
            break;
        }
        let color = match notice {
            Notice::Success(_) => app.theme.success,
            Notice::Failure(_) => app.theme.failure,
        };
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width),
            y: bottom - 3,
            width,
            height: 3,
        };
        let p = Paragraph::new(notice.message().to_string())
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
        bottom -= 3;
    }
}

/// Full-screen sign-in form.
pub fn render_login(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let rect = centered_rect(54, 12, area);
    let mut lines = vec![
        Line::from(Span::styled(
            "Sign in to rbac-admin",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    for (idx, name) in crate::app::update::LOGIN_FIELDS.iter().enumerate() {
        let focused = idx == app.login_focus;
        let raw = app.login.value(name);
        let shown = if *name == "password" {
            "*".repeat(raw.chars().count())
        } else {
            raw.to_string()
        };
        let cursor = if focused { "_" } else { "" };
        let style = if focused {
            Style::default().fg(theme.highlight_fg)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::styled(format!("{}{:<9} {shown}{cursor}", marker(focused), name), style));
        if app.login.is_touched(name)
            && let Some(err) = app.login.error(name)
        {
            lines.push(Line::styled(format!("    {err}"), Style::default().fg(theme.failure)));
        }
    }
    lines.push(Line::raw(""));
    let footer = if app.login_pending {
        "Signing in..."
    } else {
        "Tab: next field  Enter: sign in  Esc: quit"
    };
    lines.push(Line::styled(footer, Style::default().fg(theme.muted)));

    let p = Paragraph::new(lines).block(
        Block::default()
            .title("Login")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Dispatch the open modal, if any.
pub fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.modal {
        Some(ModalState::Form(form)) => render_form_modal(f, area, app, form),
        Some(ModalState::DeleteConfirm {
            kind, name, selected, ..
        }) => render_delete_modal(f, area, app, kind.label(), name, *selected),
        Some(ModalState::Info { message }) => render_info_modal(f, area, app, message),
        None => {}
    }
}
