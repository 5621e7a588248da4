use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::app::{
    ActiveTab, AppState, EntityForm, EntityKind, FormRow, InputMode, ModalState, Notice,
};
use crate::error::AdminResult;
use crate::model::Record;
use crate::store::EntityStore;
use crate::ui;
use crate::ui::table::{self, Column};
use crate::view::ListView;

pub const LOGIN_FIELDS: [&str; 2] = ["email", "password"];

/// Run `$body` against whichever list view backs the active tab.
macro_rules! on_active_view {
    ($app:expr, |$v:ident| $body:expr) => {
        match $app.active_tab {
            ActiveTab::Dashboard => {}
            ActiveTab::Users => {
                let $v = &mut $app.users;
                $body;
            }
            ActiveTab::Roles => {
                let $v = &mut $app.roles;
                $body;
            }
            ActiveTab::Permissions => {
                let $v = &mut $app.permissions;
                $body;
            }
        }
    };
}

/// What the loop should do after a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    if app.ctx.session.is_authenticated() {
        refresh(app);
    }

    loop {
        tick(app);
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(app, key) == Flow::Quit
        {
            break;
        }
    }

    info!(uptime_secs = app.started_at.elapsed().as_secs(), "exiting");
    Ok(())
}

/// Per-frame bookkeeping: collect finished operations, finish a pending
/// sign-in and bring the list views up to date.
pub fn tick(app: &mut AppState) {
    app.drain_notices();
    if app.login_pending && app.ctx.session.is_authenticated() {
        app.login_pending = false;
        app.login.reset_form();
        app.login_focus = 0;
        app.input_mode = InputMode::Normal;
        refresh(app);
    }
    app.sync_views();
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }
    match app.input_mode {
        InputMode::Login => return handle_login_key(app, key.code),
        InputMode::Normal => return handle_normal_key(app, key.code),
        InputMode::Search => handle_search_key(app, key.code),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
    Flow::Continue
}

fn handle_login_key(app: &mut AppState, code: KeyCode) -> Flow {
    if app.login_pending {
        return Flow::Continue;
    }
    let field = LOGIN_FIELDS[app.login_focus % LOGIN_FIELDS.len()];
    match code {
        KeyCode::Esc => return Flow::Quit,
        KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up => {
            app.login.handle_blur(field);
            app.login_focus = (app.login_focus + 1) % LOGIN_FIELDS.len();
        }
        KeyCode::Backspace => {
            let mut value = app.login.value(field).to_string();
            value.pop();
            app.login.handle_change(field, value);
        }
        KeyCode::Char(c) => {
            let mut value = app.login.value(field).to_string();
            value.push(c);
            app.login.handle_change(field, value);
        }
        KeyCode::Enter => submit_login(app),
        _ => {}
    }
    Flow::Continue
}

fn submit_login(app: &mut AppState) {
    if let Err(err) = app.login.check() {
        debug!(error = %err, "sign-in form rejected");
        return;
    }
    let email = app.login.value("email").trim().to_string();
    let password = app.login.value("password").to_string();
    let session = app.ctx.session.clone();
    app.login_pending = true;
    spawn_op(app, async move {
        let user = session.login(&email, &password).await;
        Ok(format!("Signed in as {}", user.name))
    });
}

fn handle_normal_key(app: &mut AppState, code: KeyCode) -> Flow {
    let rpp = app.rows_per_page.max(1);
    match code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Tab => app.active_tab = app.active_tab.next(),
        KeyCode::BackTab => app.active_tab = app.active_tab.prev(),
        KeyCode::Char('/') => {
            if app.active_tab != ActiveTab::Dashboard {
                app.input_mode = InputMode::Search;
            }
        }
        KeyCode::Esc => clear_search(app),
        KeyCode::Up | KeyCode::Char('k') => on_active_view!(app, |v| v.move_up()),
        KeyCode::Down | KeyCode::Char('j') => on_active_view!(app, |v| v.move_down()),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
            on_active_view!(app, |v| v.page_up(rpp))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
            on_active_view!(app, |v| v.page_down(rpp))
        }
        KeyCode::Char('s') => sort_active(app, None),
        KeyCode::Char(c @ '1'..='9') => {
            let column = c as usize - '1' as usize;
            sort_active(app, Some(column));
        }
        KeyCode::Char('n') => open_form(app, false),
        KeyCode::Char('e') | KeyCode::Enter => open_form(app, true),
        KeyCode::Char('d') | KeyCode::Delete => open_delete(app),
        KeyCode::Char('r') => refresh(app),
        KeyCode::Char('L') => logout(app),
        _ => {}
    }
    Flow::Continue
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            clear_search(app);
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => on_active_view!(app, |v| v.search.pop_char()),
        KeyCode::Char(c) => on_active_view!(app, |v| v.search.push_char(c)),
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Form(form)) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Enter => submit_form(app),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(' ') if !matches!(form.focused_row(), Some(FormRow::Text(_))) => {
                form.toggle()
            }
            KeyCode::Char(c) => form.type_char(c),
            _ => {}
        },
        Some(ModalState::DeleteConfirm { selected, .. }) => match code {
            KeyCode::Esc | KeyCode::Char('n') => close_modal(app),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                *selected = if *selected == 0 { 1 } else { 0 };
            }
            KeyCode::Char('y') => confirm_delete(app),
            KeyCode::Enter => {
                if *selected == 0 {
                    confirm_delete(app);
                } else {
                    close_modal(app);
                }
            }
            _ => {}
        },
        Some(ModalState::Info { .. }) => {
            if matches!(code, KeyCode::Esc | KeyCode::Enter) {
                close_modal(app);
            }
        }
        None => app.input_mode = InputMode::Normal,
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

fn show_info(app: &mut AppState, message: String) {
    app.modal = Some(ModalState::Info { message });
    app.input_mode = InputMode::Modal;
}

/// Run a store operation on the runtime and report its outcome as a notice.
fn spawn_op<F>(app: &AppState, op: F)
where
    F: Future<Output = AdminResult<String>> + Send + 'static,
{
    let tx = app.notice_tx.clone();
    app.runtime.spawn(async move {
        let notice = match op.await {
            Ok(message) => Notice::Success(message),
            Err(err) => {
                warn!(error = %err, "operation failed");
                Notice::Failure(err.to_string())
            }
        };
        let _ = tx.send(notice);
    });
}

fn refresh(app: &AppState) {
    let ctx = app.ctx.clone();
    spawn_op(app, async move {
        ctx.fetch_all().await?;
        Ok("Data refreshed".to_string())
    });
}

fn logout(app: &mut AppState) {
    app.ctx.session.logout();
    app.modal = None;
    app.login.reset_form();
    app.login_focus = 0;
    app.input_mode = InputMode::Login;
}

fn clear_search(app: &mut AppState) {
    on_active_view!(app, |v| v.search.clear());
}

fn sort_view<R: Record>(view: &mut ListView<R>, columns: &[Column<R>], column: Option<usize>) {
    let key = match column {
        Some(index) => table::sort_key_at(columns, index),
        None => view
            .sort
            .config()
            .map(|cfg| cfg.key)
            .or_else(|| table::first_sort_key(columns)),
    };
    if let Some(key) = key {
        view.sort.request(key);
    }
}

/// Sort the active list by the given column, or flip the current sort when
/// no column is named.
fn sort_active(app: &mut AppState, column: Option<usize>) {
    match app.active_tab {
        ActiveTab::Dashboard => {}
        ActiveTab::Users => sort_view(&mut app.users, &ui::users::columns(), column),
        ActiveTab::Roles => sort_view(&mut app.roles, &ui::roles::columns(), column),
        ActiveTab::Permissions => {
            sort_view(&mut app.permissions, &ui::permissions::columns(), column)
        }
    }
}

/// `None` when editing was asked for but nothing is selected.
fn edit_target<R: Record>(view: &ListView<R>, edit: bool) -> Option<Option<R>> {
    if edit {
        view.selected_item().cloned().map(Some)
    } else {
        Some(None)
    }
}

fn open_form(app: &mut AppState, edit: bool) {
    let built = match app.active_tab {
        ActiveTab::Dashboard => return,
        ActiveTab::Users => {
            let Some(existing) = edit_target(&app.users, edit) else {
                return;
            };
            EntityForm::user(existing.as_ref(), &app.ctx.roles.items())
        }
        ActiveTab::Roles => {
            let Some(existing) = edit_target(&app.roles, edit) else {
                return;
            };
            EntityForm::role(existing.as_ref(), &app.ctx.permissions.items())
        }
        ActiveTab::Permissions => {
            let Some(existing) = edit_target(&app.permissions, edit) else {
                return;
            };
            EntityForm::permission(existing.as_ref())
        }
    };
    match built {
        Ok(form) => {
            app.modal = Some(ModalState::Form(Box::new(form)));
            app.input_mode = InputMode::Modal;
        }
        Err(err) => show_info(app, err.to_string()),
    }
}

fn spawn_add<R: Record>(
    app: &AppState,
    store: EntityStore<R>,
    draft: R::Draft,
    label: &'static str,
) {
    spawn_op(app, async move {
        let record = store.add(draft).await?;
        Ok(format!("{label} '{}' created", record.name()))
    });
}

fn spawn_update<R: Record>(
    app: &AppState,
    store: EntityStore<R>,
    id: String,
    patch: R::Patch,
    label: &'static str,
) {
    spawn_op(app, async move {
        if store.update(&id, patch).await? {
            Ok(format!("{label} updated"))
        } else {
            Ok(format!("{label} no longer exists, nothing to update"))
        }
    });
}

fn spawn_delete<R: Record>(
    app: &AppState,
    store: EntityStore<R>,
    id: String,
    name: String,
    label: &'static str,
) {
    spawn_op(app, async move {
        if store.delete(&id).await? {
            Ok(format!("{label} '{name}' deleted"))
        } else {
            Ok(format!("{label} '{name}' was already gone"))
        }
    });
}

/// Validate the open dialog and, if it passes, dispatch the matching store
/// mutation. An invalid form stays open with its errors shown.
fn submit_form(app: &mut AppState) {
    let Some(ModalState::Form(mut form)) = app.modal.take() else {
        return;
    };
    if let Err(err) = form.form.check() {
        debug!(error = %err, "form rejected");
        app.modal = Some(ModalState::Form(form));
        return;
    }
    close_modal(app);

    let label = form.kind.label();
    let ctx = app.ctx.clone();
    match (form.kind, form.editing.clone()) {
        (EntityKind::Permission, None) => {
            spawn_add(app, ctx.permissions, form.permission_draft(), label)
        }
        (EntityKind::Permission, Some(id)) => {
            spawn_update(app, ctx.permissions, id, form.permission_patch(), label)
        }
        (EntityKind::Role, None) => {
            let draft = form.role_draft(&ctx.permissions.items());
            spawn_add(app, ctx.roles, draft, label)
        }
        (EntityKind::Role, Some(id)) => {
            let patch = form.role_patch(&ctx.permissions.items());
            spawn_update(app, ctx.roles, id, patch, label)
        }
        (EntityKind::User, None) => {
            let draft = form.user_draft(&ctx.roles.items());
            spawn_add(app, ctx.users, draft, label)
        }
        (EntityKind::User, Some(id)) => {
            let patch = form.user_patch(&ctx.roles.items());
            spawn_update(app, ctx.users, id, patch, label)
        }
    }
}

fn delete_target<R: Record>(view: &ListView<R>) -> Option<(String, String)> {
    view.selected_item().map(|r| (r.id().to_string(), r.name().to_string()))
}

fn open_delete(app: &mut AppState) {
    let (kind, target) = match app.active_tab {
        ActiveTab::Dashboard => return,
        ActiveTab::Users => (EntityKind::User, delete_target(&app.users)),
        ActiveTab::Roles => (EntityKind::Role, delete_target(&app.roles)),
        ActiveTab::Permissions => (EntityKind::Permission, delete_target(&app.permissions)),
    };
    if let Some((id, name)) = target {
        app.modal = Some(ModalState::DeleteConfirm {
            kind,
            id,
            name,
            selected: 1,
        });
        app.input_mode = InputMode::Modal;
    }
}

fn confirm_delete(app: &mut AppState) {
    let Some(ModalState::DeleteConfirm { kind, id, name, .. }) = app.modal.take() else {
        return;
    };
    close_modal(app);
    let ctx = app.ctx.clone();
    let label = kind.label();
    match kind {
        EntityKind::User => spawn_delete(app, ctx.users, id, name, label),
        EntityKind::Role => spawn_delete(app, ctx.roles, id, name, label),
        EntityKind::Permission => spawn_delete(app, ctx.permissions, id, name, label),
    }
}
