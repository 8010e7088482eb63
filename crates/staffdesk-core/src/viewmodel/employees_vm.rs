//! CRUD list state: the grid, the add/edit form and the delete prompt.

use staffdesk_store::Employee;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::events::AppEvent;
use crate::generation::{RequestTracker, Ticket};
use crate::grid::DataGrid;
use crate::services::employee_service::{
    created_message, deleted_message, fetched_message, updated_message,
};
use crate::services::{EmployeeForm, EmployeeService};
use crate::utils::error::Result;
use crate::viewmodel::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Department,
    Role,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Email,
        FormField::Department,
        FormField::Role,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Department => "Department",
            FormField::Role => "Role",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: i64, code: String },
}

/// Add/edit dialog: the form values plus which field has focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFormState {
    pub mode: FormMode,
    pub form: EmployeeForm,
    pub focus: FormField,
}

impl EmployeeFormState {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            form: EmployeeForm::default(),
            focus: FormField::Name,
        }
    }

    pub fn edit(employee: &Employee) -> Self {
        Self {
            mode: FormMode::Edit {
                id: employee.id,
                code: employee.code().to_string(),
            },
            form: EmployeeForm::from_employee(employee),
            focus: FormField::Name,
        }
    }

    pub fn title(&self) -> String {
        match &self.mode {
            FormMode::Create => "Add Employee".to_string(),
            FormMode::Edit { code, .. } => format!("Edit Employee {code}"),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.form.name,
            FormField::Email => &self.form.email,
            FormField::Department => &self.form.department,
            FormField::Role => &self.form.role,
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.form.name,
            FormField::Email => &mut self.form.email,
            FormField::Department => &mut self.form.department,
            FormField::Role => &mut self.form.role,
        }
    }

    pub fn input(&mut self, c: char) {
        self.value_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.value_mut().pop();
    }

    pub fn focus_next(&mut self) {
        let i = FormField::ALL.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = FormField::ALL[(i + 1) % FormField::ALL.len()];
    }

    pub fn focus_prev(&mut self) {
        let i = FormField::ALL.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = FormField::ALL[(i + FormField::ALL.len() - 1) % FormField::ALL.len()];
    }
}

/// Delete confirmation, with the actor typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirm {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub actor: String,
}

impl DeleteConfirm {
    pub fn new(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            code: employee.code().to_string(),
            name: employee.name.clone(),
            actor: String::new(),
        }
    }
}

pub struct EmployeesViewModel {
    pub grid: DataGrid<Employee>,
    pub is_loading: bool,
    pub is_saving: bool,
    /// Transient status line ("Fetched N employees." or a read error).
    pub status: Option<Notice>,
    service: Arc<EmployeeService>,
    tracker: RequestTracker,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl EmployeesViewModel {
    pub fn new(
        service: Arc<EmployeeService>,
        page_length: usize,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            grid: DataGrid::new(page_length),
            is_loading: false,
            is_saving: false,
            status: None,
            service,
            tracker: RequestTracker::new(),
            event_tx,
        }
    }

    pub fn load(&mut self) -> Ticket {
        let ticket = self.tracker.begin();
        self.is_loading = true;

        let service = Arc::clone(&self.service);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = service.list_active().await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::EmployeesLoaded { ticket, result });
        });

        ticket
    }

    /// A failed read keeps the grid usable with no rows.
    pub fn on_loaded(&mut self, ticket: Ticket, result: std::result::Result<Vec<Employee>, String>) -> bool {
        if !self.tracker.is_current(ticket) {
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(rows) => {
                self.status = Some(Notice::info(fetched_message(rows.len())));
                self.grid.set_rows(rows);
            }
            Err(e) => {
                self.status = Some(Notice::error(e));
                self.grid.set_rows(Vec::new());
            }
        }
        true
    }

    /// Validates before anything is sent. A validation error is returned
    /// directly and no request is issued.
    pub fn submit(&mut self, state: &EmployeeFormState) -> Result<()> {
        let form = state.form.checked()?;
        let mode = state.mode.clone();
        self.spawn_write(move |service| async move {
            match mode {
                FormMode::Create => service.create(&form).await.map(|e| created_message(&e)),
                FormMode::Edit { id, .. } => {
                    service.update(id, &form).await.map(|e| updated_message(&e))
                }
            }
        });
        Ok(())
    }

    pub fn delete(&mut self, confirm: &DeleteConfirm) {
        let id = confirm.id;
        let actor = confirm.actor.clone();
        self.spawn_write(move |service| async move {
            service
                .soft_delete(id, &actor)
                .await
                .map(|e| deleted_message(&e))
        });
    }

    fn spawn_write<F, Fut>(&mut self, write: F)
    where
        F: FnOnce(Arc<EmployeeService>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<String>> + Send + 'static,
    {
        self.is_saving = true;
        let service = Arc::clone(&self.service);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = write(service).await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::WriteFinished(result));
        });
    }

    /// A successful write ends with a fresh list; nothing is patched
    /// locally.
    pub fn on_write_finished(&mut self) {
        self.is_saving = false;
        self.load();
    }
}
