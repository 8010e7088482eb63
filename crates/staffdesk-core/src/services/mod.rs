pub mod calendar;
pub mod employee_service;
pub mod login_service;
pub mod metrics;
pub mod report;

pub use calendar::{local_day_range, Day, DayRange, DayWindows};
pub use employee_service::{EmployeeForm, EmployeeService};
pub use login_service::{LoginChallenge, LoginError, LoginService};
pub use metrics::{DashboardSummary, MetricsService, SummaryCard};
pub use report::{ReportFilter, ReportKind, ReportPage, ReportService};
