use staffdesk_core::services::ReportFilter;
use staffdesk_core::viewmodel::{
    DashboardViewModel, DeleteConfirm, EmployeeFormState, EmployeesViewModel, LoginViewModel,
    Notice, ReportViewModel,
};
use staffdesk_core::{AppEvent, Route, ThemePreference};
use staffdesk_store::Employee;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::context::Context;

/// Popups drawn over the current screen. At most one is open.
#[derive(Clone, Debug, PartialEq)]
pub enum Modal {
    /// Add/edit form and the last validation error.
    Form(EmployeeFormState, Option<String>),
    Delete(DeleteConfirm),
    View(Employee),
    Login,
    Message(Notice),
    /// `:` path prompt.
    Route(String),
}

/// Application state
pub struct App {
    pub route: Route,
    pub modal: Option<Modal>,
    pub should_quit: bool,
    /// Keys go to the grid search box.
    pub searching: bool,
    pub store_label: String,

    pub dashboard: DashboardViewModel,
    pub employees: EmployeesViewModel,
    pub report: ReportViewModel,
    pub login: LoginViewModel,

    pub preference: ThemePreference,
    preferences_path: PathBuf,
}

impl App {
    pub fn new(ctx: &Context, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let preferences_path = ctx.settings.ui.preferences_path.clone();
        Self {
            route: Route::Dashboard,
            modal: None,
            should_quit: false,
            searching: false,
            store_label: ctx.store_label(),
            dashboard: DashboardViewModel::new(Arc::clone(&ctx.metrics), event_tx.clone()),
            employees: EmployeesViewModel::new(
                Arc::clone(&ctx.employees),
                ctx.settings.grid.page_length,
                event_tx.clone(),
            ),
            report: ReportViewModel::new(Arc::clone(&ctx.reports), event_tx.clone()),
            login: LoginViewModel::new(Arc::clone(&ctx.login), event_tx),
            preference: ThemePreference::load(&preferences_path),
            preferences_path,
        }
    }

    pub fn start(&mut self) {
        self.navigate(Route::Dashboard);
    }

    /// Switches screens and starts the screen's load.
    pub fn navigate(&mut self, route: Route) {
        debug!(route = %route, "navigate");
        self.searching = false;
        match &route {
            Route::Dashboard => {
                self.dashboard.load();
            }
            Route::Employees => {
                self.employees.load();
            }
            Route::Report(param) => {
                self.report.open(param.clone());
            }
            Route::About | Route::NotFound(_) => {}
        }
        self.route = route;
    }

    pub fn reload(&mut self) {
        self.navigate(self.route.clone());
    }

    /// Moves the report to the next predefined filter.
    pub fn next_report_filter(&mut self) {
        let current = self
            .report
            .param
            .as_deref()
            .and_then(ReportFilter::parse)
            .and_then(|f| ReportFilter::ALL.iter().position(|x| *x == f));
        let next = match current {
            Some(i) => ReportFilter::ALL[(i + 1) % ReportFilter::ALL.len()],
            None => ReportFilter::ALL[0],
        };
        self.navigate(Route::Report(Some(next.as_str().to_string())));
    }

    pub fn toggle_theme(&mut self) {
        self.preference.toggle();
        if let Err(e) = self.preference.save(&self.preferences_path) {
            error!(error = %e, "failed to save theme preference");
        }
    }

    pub fn show_message(&mut self, notice: Notice) {
        self.modal = Some(Modal::Message(notice));
    }

    pub fn open_login(&mut self) {
        self.login.reset();
        self.modal = Some(Modal::Login);
    }

    pub fn on_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::DashboardLoaded { ticket, summary } => {
                if !self.dashboard.on_loaded(ticket, summary) {
                    debug!("stale dashboard result dropped");
                }
            }
            AppEvent::EmployeesLoaded { ticket, result } => {
                if !self.employees.on_loaded(ticket, result) {
                    debug!("stale employee list dropped");
                }
            }
            AppEvent::ReportLoaded { ticket, page } => {
                if !self.report.on_loaded(ticket, page) {
                    debug!("stale report dropped");
                }
            }
            AppEvent::WriteFinished(Ok(message)) => {
                self.show_message(Notice::info(message));
                self.employees.on_write_finished();
                self.refresh_counts();
            }
            AppEvent::WriteFinished(Err(e)) => {
                self.employees.is_saving = false;
                self.show_message(Notice::error(e));
            }
            AppEvent::LoginStarted(result) => self.login.on_started(result),
            AppEvent::LoginFinished(result) => {
                if let Some(message) = self.login.on_finished(result) {
                    self.show_message(Notice::info(message));
                    if self.route == Route::Employees {
                        self.employees.load();
                    }
                    self.refresh_counts();
                }
            }
        }
    }

    /// Counts change after writes; only the visible dashboard reloads.
    fn refresh_counts(&mut self) {
        if self.route == Route::Dashboard {
            self.dashboard.load();
        }
    }
}
