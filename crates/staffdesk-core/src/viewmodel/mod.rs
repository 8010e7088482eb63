pub mod dashboard_vm;
pub mod employees_vm;
pub mod login_vm;
pub mod report_vm;

pub use dashboard_vm::DashboardViewModel;
pub use employees_vm::{DeleteConfirm, EmployeeFormState, EmployeesViewModel, FormField, FormMode};
pub use login_vm::{LoginStep, LoginViewModel};
pub use report_vm::ReportViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A message for the user. Errors are shown as blocking popups, info as a
/// transient status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}
