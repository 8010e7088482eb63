//! Create, list, edit and soft-delete of employee records.

use chrono::Utc;
use staffdesk_store::{
    Column, Employee, EmployeePatch, EmployeeStore, LoginStatus, NewEmployee, Query,
};
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::{Validate, ValidateEmail, ValidationError};

use crate::utils::error::{AppError, Result};

/// Actor recorded when a delete is confirmed without a name.
pub const UNKNOWN_ACTOR: &str = "Unknown";

/// Add/edit dialog state. Optional fields are free text; blanks become NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct EmployeeForm {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(
        length(min = 1, message = "Email is required."),
        custom(function = "email_address")
    )]
    pub email: String,
    pub department: String,
    pub role: String,
}

fn email_address(value: &str) -> std::result::Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        return Ok(());
    }
    let mut err = ValidationError::new("email");
    err.message = Some("Email is not a valid address.".into());
    Err(err)
}

fn blank_to_none(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl EmployeeForm {
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            email: employee.email.clone(),
            department: employee.department.clone().unwrap_or_default(),
            role: employee.role.clone().unwrap_or_default(),
        }
    }

    /// Trimmed copy of the form.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            department: self.department.trim().to_string(),
            role: self.role.trim().to_string(),
        }
    }

    /// Normalizes and validates; nothing reaches the store on failure.
    pub fn checked(&self) -> Result<Self> {
        let form = self.normalized();
        form.validate()?;
        Ok(form)
    }

    fn to_new_employee(&self) -> NewEmployee {
        NewEmployee {
            name: self.name.clone(),
            email: self.email.clone(),
            department: blank_to_none(&self.department),
            role: blank_to_none(&self.role),
            login_status: LoginStatus::LoggedOut,
        }
    }

    fn to_patch(&self) -> EmployeePatch {
        EmployeePatch {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            department: Some(blank_to_none(&self.department)),
            role: Some(blank_to_none(&self.role)),
            ..Default::default()
        }
    }
}

pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// Active records ordered by employee code.
    pub async fn list_active(&self) -> Result<Vec<Employee>> {
        let query = Query::all()
            .is_null(Column::DeletedAt)
            .order_asc(Column::EmpCode);
        self.store.select(&query).await.map_err(|e| {
            error!(error = %e, "failed to load employees");
            AppError::ReadFailed(e)
        })
    }

    pub async fn find(&self, id: i64) -> Result<Option<Employee>> {
        let query = Query::all().eq(Column::Id, id).limit(1);
        let rows = self.store.select(&query).await.map_err(AppError::ReadFailed)?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create(&self, form: &EmployeeForm) -> Result<Employee> {
        let form = form.checked()?;
        let rows = self
            .store
            .insert(&form.to_new_employee())
            .await
            .map_err(|e| {
                error!(error = %e, "insert failed");
                AppError::WriteFailed(e)
            })?;

        let created = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppError::WriteRejected("the store returned no row".to_string()))?;
        info!(id = created.id, code = created.code(), "employee created");
        Ok(created)
    }

    #[instrument(skip(self, form))]
    pub async fn update(&self, id: i64, form: &EmployeeForm) -> Result<Employee> {
        let form = form.checked()?;
        let updated = self.patch(id, &form.to_patch()).await?;
        info!(id, code = updated.code(), "employee updated");
        Ok(updated)
    }

    /// Marks the record deleted and logged out. A blank actor is recorded as
    /// [`UNKNOWN_ACTOR`].
    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: i64, deleted_by: &str) -> Result<Employee> {
        let actor = blank_to_none(deleted_by).unwrap_or_else(|| UNKNOWN_ACTOR.to_string());
        let patch = EmployeePatch {
            deleted_at: Some(Utc::now()),
            deleted_by: Some(actor.clone()),
            login_status: Some(LoginStatus::LoggedOut),
            ..Default::default()
        };
        let deleted = self.patch(id, &patch).await?;
        info!(id, actor = %actor, "employee soft-deleted");
        Ok(deleted)
    }

    async fn patch(&self, id: i64, patch: &EmployeePatch) -> Result<Employee> {
        let rows = self.store.update(id, patch).await.map_err(|e| {
            error!(id, error = %e, "update failed");
            AppError::WriteFailed(e)
        })?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::WriteRejected(format!("no employee with id {id}")))
    }
}

pub fn created_message(employee: &Employee) -> String {
    format!("\"{}\" Created Successfully", employee.name)
}

pub fn updated_message(employee: &Employee) -> String {
    format!("'{} ({})' Updated Successfully", employee.code(), employee.name)
}

pub fn deleted_message(employee: &Employee) -> String {
    let actor = employee.deleted_by.as_deref().unwrap_or(UNKNOWN_ACTOR);
    format!(
        "'{} ({})' deleted successfully by {}.",
        employee.code(),
        employee.name,
        actor
    )
}

pub fn fetched_message(count: usize) -> String {
    format!("Fetched {count} employees.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{employee_at, MockStore};
    use staffdesk_store::MemoryStore;

    fn form(name: &str, email: &str) -> EmployeeForm {
        EmployeeForm {
            name: name.to_string(),
            email: email.to_string(),
            department: "  ".to_string(),
            role: " Engineer ".to_string(),
        }
    }

    #[test]
    fn test_validation_messages() {
        let err = form("  ", "").checked().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Email is required. Name is required.");

        let err = form("Asha", "not-an-email").checked().unwrap_err();
        assert_eq!(err.to_string(), "Email is not a valid address.");

        let ok = form(" Asha ", " asha@example.com ").checked().unwrap();
        assert_eq!(ok.name, "Asha");
        assert_eq!(ok.email, "asha@example.com");
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_store() {
        // no expectations: any call would panic
        let store = MockStore::new();
        let service = EmployeeService::new(Arc::new(store));
        let err = service.create(&form("", "x@example.com")).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let store = Arc::new(MemoryStore::new());
        let service = EmployeeService::new(store.clone());

        let created = service
            .create(&form("Asha Rao", "asha@example.com"))
            .await
            .unwrap();
        assert_eq!(created.department, None);
        assert_eq!(created.role.as_deref(), Some("Engineer"));
        assert_eq!(created.login_status, Some(LoginStatus::LoggedOut));
        assert_eq!(created_message(&created), "\"Asha Rao\" Created Successfully");

        let listed = service.list_active().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(fetched_message(listed.len()), "Fetched 1 employees.");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_row_from_listing() {
        let base = Utc::now();
        let store = Arc::new(MemoryStore::with_rows(vec![
            employee_at(2, base),
            employee_at(1, base),
        ]));
        let service = EmployeeService::new(store.clone());

        let deleted = service.soft_delete(1, "   ").await.unwrap();
        assert!(!deleted.is_active());
        assert_eq!(deleted.deleted_by.as_deref(), Some(UNKNOWN_ACTOR));
        assert_eq!(
            deleted_message(&deleted),
            "'EMP0001 (Employee 1)' deleted successfully by Unknown."
        );

        let listed = service.list_active().await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_update_clears_blank_fields() {
        let mut existing = employee_at(1, Utc::now());
        existing.department = Some("Sales".into());
        let store = Arc::new(MemoryStore::with_rows(vec![existing]));
        let service = EmployeeService::new(store);

        let updated = service
            .update(1, &form("Renamed", "renamed@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.department, None);
        assert_eq!(
            updated_message(&updated),
            "'EMP0001 (Renamed)' Updated Successfully"
        );
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_rejected() {
        let service = EmployeeService::new(Arc::new(MemoryStore::new()));
        let err = service
            .update(42, &form("Nobody", "nobody@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::WriteRejected(_)));
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_read_and_write_errors() {
        let mut store = MockStore::new();
        store.expect_select().returning(|_| {
            Err(staffdesk_store::StoreError::NotConfigured("url".into()))
        });
        store.expect_update().returning(|_, _| {
            Err(staffdesk_store::StoreError::Api {
                status: 409,
                body: "conflict".into(),
            })
        });
        let service = EmployeeService::new(Arc::new(store));

        assert!(service.list_active().await.unwrap_err().is_read());
        let err = service.soft_delete(1, "admin").await.unwrap_err();
        assert!(matches!(err, AppError::WriteFailed(_)));
    }
}
