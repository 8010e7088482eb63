use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use staffdesk_core::grid::{GridRow, SortDirection};
use staffdesk_core::services::login_service::CODE_LENGTH;
use staffdesk_core::viewmodel::{
    DeleteConfirm, EmployeeFormState, FormField, LoginStep, Notice, NoticeKind,
};
use staffdesk_core::Route;
use staffdesk_store::Employee;

use crate::app::{App, Modal};
use crate::commands::local_time;
use crate::theme::Theme;

const NAV: [(&str, &str, Route); 4] = [
    ("1", "Dashboard", Route::Dashboard),
    ("2", "Employees", Route::Employees),
    ("3", "Report", Route::Report(None)),
    ("4", "About", Route::About),
];

pub fn render(frame: &mut Frame, app: &App) {
    let theme = Theme::new(app.preference.dark_mode);
    let area = frame.area();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(" StaffDesk ")
        .title_style(theme.title);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .constraints([
            Constraint::Length(1), // Navigation
            Constraint::Length(1), // Padding
            Constraint::Min(5),    // Screen
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer
        ])
        .split(inner_rect(area, 1));

    render_nav(frame, app, &theme, layout[0]);

    match &app.route {
        Route::Dashboard => render_dashboard(frame, app, &theme, layout[2]),
        Route::Employees => render_employees(frame, app, &theme, layout[2]),
        Route::Report(_) => render_report(frame, app, &theme, layout[2]),
        Route::About => render_about(frame, &theme, layout[2]),
        Route::NotFound(path) => render_not_found(frame, path, &theme, layout[2]),
    }

    render_status(frame, app, &theme, layout[3]);
    render_footer(frame, app, &theme, layout[4]);

    match &app.modal {
        Some(Modal::Form(state, error)) => render_form(frame, state, error.as_deref(), &theme),
        Some(Modal::Delete(confirm)) => render_confirm_delete(frame, confirm, &theme),
        Some(Modal::View(employee)) => render_view(frame, employee, &theme),
        Some(Modal::Login) => render_login(frame, app, &theme),
        Some(Modal::Message(notice)) => render_message(frame, notice, &theme),
        Some(Modal::Route(path)) => render_route_prompt(frame, path, &theme),
        None => {}
    }
}

fn render_nav(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut spans = Vec::new();
    for (key, label, route) in NAV.iter() {
        let active = std::mem::discriminant(route) == std::mem::discriminant(&app.route);
        let style = if active { theme.selected } else { theme.normal };
        spans.push(Span::styled(format!(" {key} "), theme.key_hint));
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(app.route.path(), theme.title));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(format!("[{}]", app.store_label), theme.muted));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_dashboard(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Length(1), // Heading
        Constraint::Length(5), // Created
        Constraint::Length(5), // Deleted
        Constraint::Length(5), // Logins
        Constraint::Min(0),
    ])
    .split(area);

    let heading = if app.dashboard.is_loading {
        "Dashboard  (loading...)"
    } else {
        "Dashboard"
    };
    frame.render_widget(Paragraph::new(heading).style(theme.title), rows[0]);

    let cards = app.dashboard.cards();
    for (pair_index, pair) in cards.chunks(2).enumerate() {
        let columns = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1 + pair_index]);

        for (i, card) in pair.iter().enumerate() {
            let index = pair_index * 2 + i;
            let selected = index == app.dashboard.selected;
            let border = if selected { theme.selected } else { theme.border };

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {} ", card.title))
                .title_style(if selected { theme.selected } else { theme.card });

            let count = if app.dashboard.summary.is_some() {
                card.count.to_string()
            } else {
                "-".to_string()
            };
            let body = Paragraph::new(vec![
                Line::from(Span::styled(count, theme.count)),
                Line::from(Span::styled(card.route().path(), theme.muted)),
            ])
            .alignment(Alignment::Center)
            .block(block);

            frame.render_widget(body, columns[i]);
        }
    }
}

fn render_employees(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let grid = &app.employees.grid;
    let layout = Layout::vertical([
        Constraint::Length(1), // Search
        Constraint::Length(1), // Padding
        Constraint::Min(3),    // Table
        Constraint::Length(1), // Info
    ])
    .split(area);

    let cursor = if app.searching { "_" } else { "" };
    let search_style = if app.searching { theme.title } else { theme.normal };
    let search = Paragraph::new(Line::from(vec![
        Span::styled("Search: ", theme.muted),
        Span::styled(format!("{}{}", grid.search(), cursor), search_style),
    ]));
    frame.render_widget(search, layout[0]);

    if grid.filtered_len() == 0 {
        let msg = if app.employees.is_loading {
            "Loading..."
        } else if grid.total_len() > 0 {
            "No matching records found"
        } else {
            "No employees"
        };
        let p = Paragraph::new(msg)
            .style(theme.muted)
            .alignment(Alignment::Center);
        frame.render_widget(p, layout[2]);
    } else {
        let sort = grid.sort();
        let header = Row::new(Employee::headers().iter().enumerate().map(|(i, h)| {
            let arrow = match sort {
                Some(s) if s.column == i && s.direction == SortDirection::Ascending => " ▲",
                Some(s) if s.column == i => " ▼",
                _ => "",
            };
            Cell::from(format!("{h}{arrow}"))
        }))
        .style(theme.header);

        let rows: Vec<Row> = grid
            .page_rows()
            .into_iter()
            .enumerate()
            .map(|(i, employee)| {
                let style = if i == grid.selected_index() {
                    theme.selected
                } else {
                    theme.normal
                };
                let cells: Vec<Cell> = (0..Employee::headers().len())
                    .map(|c| Cell::from(employee.cell(c)))
                    .collect();
                Row::new(cells).style(style)
            })
            .collect();

        let widths = [
            Constraint::Percentage(10),
            Constraint::Percentage(20),
            Constraint::Percentage(26),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
            Constraint::Percentage(12),
        ];
        let table = Table::new(rows, widths).header(header);
        frame.render_widget(table, layout[2]);
    }

    let info = Paragraph::new(Line::from(vec![
        Span::styled(grid.info(), theme.muted),
        Span::raw("   "),
        Span::styled(
            format!("Page {} of {}", grid.page() + 1, grid.page_count()),
            theme.muted,
        ),
    ]));
    frame.render_widget(info, layout[3]);
}

fn render_report(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let report = &app.report;
    let layout = Layout::vertical([
        Constraint::Length(1), // Title
        Constraint::Length(1), // Padding
        Constraint::Min(3),    // Table
    ])
    .split(area);

    let mut title = vec![Span::styled(report.title(), theme.title)];
    if report.is_loading {
        title.push(Span::styled("  (loading...)", theme.muted));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), layout[0]);

    let Some(page) = &report.page else {
        return;
    };

    if let Some(error) = &page.error {
        let p = Paragraph::new(error.as_str())
            .style(theme.danger)
            .alignment(Alignment::Center);
        frame.render_widget(p, layout[2]);
        return;
    }

    if page.rows.is_empty() {
        let p = Paragraph::new("No records found.")
            .style(theme.muted)
            .alignment(Alignment::Center);
        frame.render_widget(p, layout[2]);
        return;
    }

    let header = Row::new([
        "Code",
        "Name",
        "Email",
        "Login Status",
        "Created",
        "Last Login",
        "Last Logout",
        "Deleted",
        "Deleted By",
    ])
    .style(theme.header);

    let rows: Vec<Row> = page
        .rows
        .iter()
        .skip(report.scroll)
        .map(|e| {
            Row::new(vec![
                e.code().to_string(),
                e.name.clone(),
                e.email.clone(),
                e.login_status
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_else(|| "-".to_string()),
                local_time(Some(e.created_at)),
                local_time(e.last_login),
                local_time(e.last_logout),
                local_time(e.deleted_at),
                e.deleted_by.clone().unwrap_or_else(|| "-".to_string()),
            ])
            .style(theme.normal)
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Percentage(14),
        Constraint::Percentage(18),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Min(8),
    ];
    frame.render_widget(Table::new(rows, widths).header(header), layout[2]);
}

fn render_about(frame: &mut Frame, theme: &Theme, area: Rect) {
    let text = vec![
        Line::from(Span::styled("StaffDesk", theme.title)),
        Line::raw(""),
        Line::raw("Administration of the employee directory."),
        Line::raw("Create, edit and soft-delete employees; deleted records stay"),
        Line::raw("available to the reports."),
        Line::raw(""),
        Line::raw("The dashboard counts records created, deleted and logged in"),
        Line::raw("today and yesterday, using local calendar days."),
    ];
    let p = Paragraph::new(text)
        .style(theme.normal)
        .wrap(Wrap { trim: true });
    frame.render_widget(p, area);
}

fn render_not_found(frame: &mut Frame, path: &str, theme: &Theme, area: Rect) {
    let text = vec![
        Line::raw(""),
        Line::from(Span::styled("404", theme.danger)),
        Line::raw(format!("No route matched \"{path}\"")),
        Line::raw(""),
        Line::from(vec![
            Span::styled(" 1 ", theme.key_hint),
            Span::styled("Go to the dashboard", theme.muted),
        ]),
    ];
    let p = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(p, area);
}

fn render_status(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let line = if app.employees.is_saving {
        Line::from(Span::styled("Saving...", theme.muted))
    } else if app.route == Route::Employees {
        match &app.employees.status {
            Some(notice) => Line::from(Span::styled(
                notice.text.clone(),
                notice_style(notice, theme),
            )),
            None => Line::raw(""),
        }
    } else {
        Line::raw("")
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let hints: &[(&str, &str)] = if app.searching {
        &[("type", "Search"), ("Enter/Esc", "Done")]
    } else {
        match app.route {
            Route::Dashboard => &[("←/→", "Select"), ("Enter", "Open report")],
            Route::Employees => &[
                ("↑/↓", "Select"),
                ("←/→", "Page"),
                ("/", "Search"),
                ("s/S", "Sort"),
                ("a", "Add"),
                ("e", "Edit"),
                ("d", "Delete"),
                ("v", "View"),
                ("o", "Logout"),
            ],
            Route::Report(_) => &[("↑/↓", "Scroll"), ("Tab", "Next filter")],
            Route::About | Route::NotFound(_) => &[],
        }
    };

    let mut spans = Vec::new();
    for (key, label) in hints
        .iter()
        .chain([(":", "Go to"), ("L", "Login"), ("t", "Theme"), ("r", "Reload"), ("q", "Quit")].iter())
    {
        spans.push(Span::styled(format!(" {key} "), theme.key_hint));
        spans.push(Span::styled(*label, theme.muted));
        spans.push(Span::raw(" "));
    }

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

fn render_form(frame: &mut Frame, state: &EmployeeFormState, error: Option<&str>, theme: &Theme) {
    let area = center_rect(frame.area(), 60, 13);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.title)
        .title(format!(" {} ", state.title()))
        .title_style(theme.title);
    frame.render_widget(block, area);

    let mut lines = vec![Line::raw("")];
    for field in FormField::ALL {
        let focused = field == state.focus;
        let required = matches!(field, FormField::Name | FormField::Email);
        let label = format!(
            "{:>11}{} ",
            field.label(),
            if required { "*" } else { " " }
        );
        let value = format!("{}{}", state.value(field), if focused { "_" } else { "" });
        lines.push(Line::from(vec![
            Span::styled(label, if focused { theme.title } else { theme.muted }),
            Span::styled(value, theme.normal),
        ]));
    }
    lines.push(Line::raw(""));
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(error.to_string(), theme.danger)));
    } else {
        lines.push(Line::raw(""));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled(" Tab ", theme.key_hint),
        Span::styled("Next field", theme.muted),
        Span::raw("  "),
        Span::styled(" Enter ", theme.key_hint),
        Span::styled("Save", theme.muted),
        Span::raw("  "),
        Span::styled(" Esc ", theme.key_hint),
        Span::styled("Cancel", theme.muted),
    ]));

    frame.render_widget(Paragraph::new(lines), inner_rect(area, 1));
}

fn render_confirm_delete(frame: &mut Frame, confirm: &DeleteConfirm, theme: &Theme) {
    let area = center_rect(frame.area(), 50, 9);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.danger)
        .title(" Confirm Delete ")
        .title_style(theme.danger);
    frame.render_widget(block, area);

    let text = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("Delete "),
            Span::styled(format!("'{} ({})'", confirm.code, confirm.name), theme.title),
            Span::raw("?"),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Deleted by: ", theme.muted),
            Span::styled(format!("{}_", confirm.actor), theme.normal),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled(" [Enter] ", theme.key_hint),
            Span::styled("Yes, Delete", theme.danger),
            Span::raw("    "),
            Span::styled(" [Esc] ", theme.key_hint),
            Span::raw("Cancel"),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(text, inner_rect(area, 1));
}

fn render_view(frame: &mut Frame, employee: &Employee, theme: &Theme) {
    let area = center_rect(frame.area(), 60, 14);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.title)
        .title(format!(" {} ({}) ", employee.code(), employee.name))
        .title_style(theme.title);
    frame.render_widget(block, area);

    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:>13}: "), theme.muted),
            Span::styled(value, theme.normal),
        ])
    };
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        field("Email", employee.email.clone()),
        field("Department", optional(&employee.department)),
        field("Role", optional(&employee.role)),
        field(
            "Login Status",
            employee
                .login_status
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        field("Created", local_time(Some(employee.created_at))),
        field("Last Login", local_time(employee.last_login)),
        field("Last Logout", local_time(employee.last_logout)),
    ];
    if !employee.is_active() {
        lines.push(field("Deleted", local_time(employee.deleted_at)));
        lines.push(field("Deleted By", optional(&employee.deleted_by)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled(" e ", theme.key_hint),
        Span::styled("Edit", theme.muted),
        Span::raw("  "),
        Span::styled(" Esc ", theme.key_hint),
        Span::styled("Close", theme.muted),
    ]));

    frame.render_widget(Paragraph::new(lines), inner_rect(area, 1));
}

fn render_login(frame: &mut Frame, app: &App, theme: &Theme) {
    let area = center_rect(frame.area(), 50, 10);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.title)
        .title(" Login ")
        .title_style(theme.title);
    frame.render_widget(block, area);

    let login = &app.login;
    let mut lines = match &login.step {
        LoginStep::Email => vec![
            Line::raw("Enter your work email"),
            Line::raw(""),
            Line::from(vec![
                Span::styled("Email: ", theme.muted),
                Span::styled(format!("{}_", login.email), theme.normal),
            ]),
        ],
        LoginStep::Code(challenge) => {
            let masked: String = "*".repeat(login.code.len());
            let pending = "_".repeat(CODE_LENGTH - login.code.len());
            vec![
                Line::raw(format!("Enter the code for {}", challenge.employee.email)),
                Line::raw(""),
                Line::from(vec![
                    Span::styled("Code: ", theme.muted),
                    Span::styled(format!("{masked}{pending}"), theme.normal),
                ]),
            ]
        }
    };

    lines.push(Line::raw(""));
    if login.is_loading {
        lines.push(Line::from(Span::styled("Checking...", theme.muted)));
    } else if let Some(error) = &login.error {
        lines.push(Line::from(Span::styled(error.clone(), theme.danger)));
    } else {
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(vec![
        Span::styled(" Enter ", theme.key_hint),
        Span::styled("Continue", theme.muted),
        Span::raw("  "),
        Span::styled(" Esc ", theme.key_hint),
        Span::styled("Cancel", theme.muted),
    ]));

    let text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(text, inner_rect(area, 1));
}

fn render_message(frame: &mut Frame, notice: &Notice, theme: &Theme) {
    let area = center_rect(frame.area(), 50, 7);
    frame.render_widget(Clear, area);

    let style = notice_style(notice, theme);
    let title = match notice.kind {
        NoticeKind::Error => " Error ",
        NoticeKind::Info => " Success ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
        .title_style(style);
    frame.render_widget(block, area);

    let text = Paragraph::new(vec![
        Line::raw(""),
        Line::raw(notice.text.as_str()),
        Line::raw(""),
        Line::from(Span::styled("Press any key to continue", theme.muted)),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(text, inner_rect(area, 1));
}

fn render_route_prompt(frame: &mut Frame, path: &str, theme: &Theme) {
    let area = center_rect(frame.area(), 50, 3);
    frame.render_widget(Clear, area);

    let p = Paragraph::new(Line::from(vec![
        Span::styled(": ", theme.key_hint),
        Span::styled(format!("{path}_"), theme.normal),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.title)
            .title(" Go to path ")
            .title_style(theme.title),
    );
    frame.render_widget(p, area);
}

fn notice_style(notice: &Notice, theme: &Theme) -> Style {
    if notice.is_error() {
        theme.danger
    } else {
        theme.success
    }
}

// Helper: shrink rect by margin
fn inner_rect(area: Rect, margin: u16) -> Rect {
    Rect {
        x: area.x + margin,
        y: area.y + margin,
        width: area.width.saturating_sub(margin * 2),
        height: area.height.saturating_sub(margin * 2),
    }
}

// Helper: center a popup
fn center_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = height.min(area.height);
    let x = (area.width - width) / 2;
    let y = (area.height - height) / 2;
    Rect {
        x: area.x + x,
        y: area.y + y,
        width,
        height,
    }
}
