//! Results that background tasks send back to the UI loop.

use staffdesk_store::Employee;

use crate::generation::Ticket;
use crate::services::{DashboardSummary, LoginChallenge, ReportPage};

#[derive(Debug)]
pub enum AppEvent {
    DashboardLoaded {
        ticket: Ticket,
        summary: DashboardSummary,
    },
    EmployeesLoaded {
        ticket: Ticket,
        result: Result<Vec<Employee>, String>,
    },
    ReportLoaded {
        ticket: Ticket,
        page: ReportPage,
    },
    /// Outcome of a create, update, delete or logout: the user-facing
    /// success message or the error.
    WriteFinished(Result<String, String>),
    /// Email step of the demo login.
    LoginStarted(Result<LoginChallenge, String>),
    /// Code step of the demo login.
    LoginFinished(Result<String, String>),
}
