use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use staffdesk_core::grid::GridRow;
use staffdesk_core::viewmodel::{DeleteConfirm, EmployeeFormState, Notice};
use staffdesk_core::Route;
use staffdesk_store::Employee;
use std::time::Duration;

use crate::app::{App, Modal};

/// Poll for keyboard events with timeout
pub fn poll_event(timeout_ms: u64) -> anyhow::Result<Option<Event>> {
    if event::poll(Duration::from_millis(timeout_ms))? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_event(app: &mut App, event: Event) -> anyhow::Result<()> {
    let Event::Key(key) = event else {
        // resize is handled by ratatui
        return Ok(());
    };
    // press only, not release
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    if let Some(modal) = app.modal.take() {
        handle_modal(app, modal, key);
        return Ok(());
    }

    if app.searching {
        handle_search(app, key.code);
        return Ok(());
    }

    if handle_global(app, key.code) {
        return Ok(());
    }

    match app.route {
        Route::Dashboard => handle_dashboard(app, key.code),
        Route::Employees => handle_employees(app, key.code),
        Route::Report(_) => handle_report(app, key.code),
        Route::About | Route::NotFound(_) => {}
    }
    Ok(())
}

/// Keys available on every screen. Returns whether the key was used.
fn handle_global(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.navigate(Route::Dashboard),
        KeyCode::Char('2') => app.navigate(Route::Employees),
        KeyCode::Char('3') => app.navigate(Route::Report(None)),
        KeyCode::Char('4') => app.navigate(Route::About),
        KeyCode::Char(':') => app.modal = Some(Modal::Route(String::new())),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('L') => app.open_login(),
        KeyCode::Char('r') => app.reload(),
        _ => return false,
    }
    true
}

fn handle_dashboard(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Right | KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
            app.dashboard.select_next()
        }
        KeyCode::Left | KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
            app.dashboard.select_prev()
        }
        KeyCode::Enter => {
            if let Some(card) = app.dashboard.selected_card() {
                app.navigate(card.route());
            }
        }
        _ => {}
    }
}

fn handle_employees(app: &mut App, code: KeyCode) {
    let grid = &mut app.employees.grid;
    match code {
        KeyCode::Down | KeyCode::Char('j') => grid.select_next(),
        KeyCode::Up | KeyCode::Char('k') => grid.select_prev(),
        KeyCode::Right | KeyCode::PageDown => grid.next_page(),
        KeyCode::Left | KeyCode::PageUp => grid.prev_page(),
        KeyCode::Char('/') => app.searching = true,
        KeyCode::Char('s') => {
            let columns = Employee::headers().len();
            let next = grid.sort().map_or(0, |s| (s.column + 1) % columns);
            grid.sort_by(next);
        }
        KeyCode::Char('S') => {
            if let Some(sort) = grid.sort() {
                grid.sort_by(sort.column);
            }
        }
        KeyCode::Char('a') => {
            app.modal = Some(Modal::Form(EmployeeFormState::create(), None));
        }
        KeyCode::Char('e') => {
            if let Some(employee) = grid.selected_row() {
                app.modal = Some(Modal::Form(EmployeeFormState::edit(employee), None));
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(employee) = grid.selected_row() {
                app.modal = Some(Modal::Delete(DeleteConfirm::new(employee)));
            }
        }
        KeyCode::Char('v') | KeyCode::Enter => {
            if let Some(employee) = grid.selected_row() {
                app.modal = Some(Modal::View(employee.clone()));
            }
        }
        KeyCode::Char('o') => {
            if let Some(employee) = grid.selected_row() {
                app.login.logout(employee.id);
            }
        }
        _ => {}
    }
}

fn handle_search(app: &mut App, code: KeyCode) {
    let grid = &mut app.employees.grid;
    match code {
        KeyCode::Char(c) => grid.push_search(c),
        KeyCode::Backspace => grid.pop_search(),
        KeyCode::Enter | KeyCode::Esc => app.searching = false,
        _ => {}
    }
}

fn handle_report(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Down | KeyCode::Char('j') => app.report.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.report.scroll_up(),
        KeyCode::Tab => app.next_report_filter(),
        _ => {}
    }
}

/// Handles a key for the open popup. The popup was taken out of `app`; it is
/// put back unless the key closes it.
fn handle_modal(app: &mut App, modal: Modal, key: KeyEvent) {
    let code = key.code;
    match modal {
        Modal::Form(mut state, error) => match code {
            KeyCode::Esc => {}
            KeyCode::Tab | KeyCode::Down => {
                state.focus_next();
                app.modal = Some(Modal::Form(state, error));
            }
            KeyCode::BackTab | KeyCode::Up => {
                state.focus_prev();
                app.modal = Some(Modal::Form(state, error));
            }
            KeyCode::Backspace => {
                state.backspace();
                app.modal = Some(Modal::Form(state, error));
            }
            KeyCode::Enter => {
                if let Err(e) = app.employees.submit(&state) {
                    app.modal = Some(Modal::Form(state, Some(e.to_string())));
                }
            }
            KeyCode::Char(c) => {
                state.input(c);
                app.modal = Some(Modal::Form(state, error));
            }
            _ => app.modal = Some(Modal::Form(state, error)),
        },
        Modal::Delete(mut confirm) => match code {
            KeyCode::Esc => {}
            KeyCode::Enter => app.employees.delete(&confirm),
            KeyCode::Backspace => {
                confirm.actor.pop();
                app.modal = Some(Modal::Delete(confirm));
            }
            KeyCode::Char(c) => {
                confirm.actor.push(c);
                app.modal = Some(Modal::Delete(confirm));
            }
            _ => app.modal = Some(Modal::Delete(confirm)),
        },
        Modal::View(employee) => match code {
            KeyCode::Char('e') if employee.is_active() => {
                app.modal = Some(Modal::Form(EmployeeFormState::edit(&employee), None));
            }
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('v') => {}
            _ => app.modal = Some(Modal::View(employee)),
        },
        Modal::Login => match code {
            KeyCode::Esc => app.login.reset(),
            KeyCode::Enter => {
                if app.login.email.trim().is_empty() {
                    app.login.reset();
                    app.show_message(Notice::error("Email is required."));
                } else {
                    app.login.submit();
                    app.modal = Some(Modal::Login);
                }
            }
            KeyCode::Backspace => {
                app.login.backspace();
                app.modal = Some(Modal::Login);
            }
            KeyCode::Char(c) => {
                app.login.input(c);
                app.modal = Some(Modal::Login);
            }
            _ => app.modal = Some(Modal::Login),
        },
        // any key dismisses
        Modal::Message(_) => {}
        Modal::Route(mut path) => match code {
            KeyCode::Esc => {}
            KeyCode::Enter => app.navigate(Route::parse(&path)),
            KeyCode::Backspace => {
                path.pop();
                app.modal = Some(Modal::Route(path));
            }
            KeyCode::Char(c) => {
                path.push(c);
                app.modal = Some(Modal::Route(path));
            }
            _ => app.modal = Some(Modal::Route(path)),
        },
    }
}
