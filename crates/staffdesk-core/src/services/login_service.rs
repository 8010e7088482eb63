//! Two-step demo login: email lookup, then a fixed four-digit code.
//!
//! This only flips the `login_status` column. It is not an authentication
//! mechanism.

use chrono::Utc;
use staffdesk_store::{Column, Employee, EmployeePatch, EmployeeStore, LoginStatus, Query, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub const CODE_LENGTH: usize = 4;

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Email is required.")]
    MissingEmail,

    #[error("Email not found in database.")]
    EmailNotFound,

    #[error("Incorrect OTP")]
    WrongCode,

    #[error("Employee record could not be updated.")]
    NotUpdated,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Keeps the digits of `input`, at most [`CODE_LENGTH`] of them.
pub fn sanitize_code(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(CODE_LENGTH)
        .collect()
}

/// An employee matched by email, waiting for the code.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginChallenge {
    pub employee: Employee,
}

pub struct LoginService {
    store: Arc<dyn EmployeeStore>,
    demo_code: String,
}

impl LoginService {
    pub fn new(store: Arc<dyn EmployeeStore>, demo_code: impl Into<String>) -> Self {
        Self {
            store,
            demo_code: demo_code.into(),
        }
    }

    /// Step one: exact email match among active records.
    pub async fn start(&self, email: &str) -> Result<LoginChallenge, LoginError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(LoginError::MissingEmail);
        }

        let query = Query::all()
            .eq(Column::Email, email)
            .is_null(Column::DeletedAt)
            .limit(1);
        let employee = self
            .store
            .select(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                warn!(email, "login attempt for unknown email");
                LoginError::EmailNotFound
            })?;

        Ok(LoginChallenge { employee })
    }

    /// Step two: checks the code and marks the employee logged in.
    pub async fn verify(
        &self,
        challenge: &LoginChallenge,
        code: &str,
    ) -> Result<Employee, LoginError> {
        if sanitize_code(code) != self.demo_code {
            return Err(LoginError::WrongCode);
        }

        let patch = EmployeePatch {
            login_status: Some(LoginStatus::LoggedIn),
            last_login: Some(Utc::now()),
            ..Default::default()
        };
        let employee = self.write(challenge.employee.id, &patch).await?;
        info!(id = employee.id, code = employee.code(), "logged in");
        Ok(employee)
    }

    pub async fn logout(&self, id: i64) -> Result<Employee, LoginError> {
        let patch = EmployeePatch {
            login_status: Some(LoginStatus::LoggedOut),
            last_logout: Some(Utc::now()),
            ..Default::default()
        };
        let employee = self.write(id, &patch).await?;
        info!(id = employee.id, code = employee.code(), "logged out");
        Ok(employee)
    }

    async fn write(&self, id: i64, patch: &EmployeePatch) -> Result<Employee, LoginError> {
        self.store
            .update(id, patch)
            .await?
            .into_iter()
            .next()
            .ok_or(LoginError::NotUpdated)
    }
}

pub fn login_message(employee: &Employee) -> String {
    format!("{} ({}) Logged In Successfully", employee.code(), employee.name)
}

pub fn logout_message(employee: &Employee) -> String {
    format!("{} ({}) Logged Out Successfully", employee.code(), employee.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::employee_at;
    use staffdesk_store::MemoryStore;

    fn service() -> (Arc<MemoryStore>, LoginService) {
        let mut deleted = employee_at(2, Utc::now());
        deleted.deleted_at = Some(Utc::now());
        let store = Arc::new(MemoryStore::with_rows(vec![employee_at(1, Utc::now()), deleted]));
        let service = LoginService::new(store.clone(), "1234");
        (store, service)
    }

    #[test]
    fn test_sanitize_code() {
        assert_eq!(sanitize_code("12a34"), "1234");
        assert_eq!(sanitize_code("123456"), "1234");
        assert_eq!(sanitize_code(" 9-8 "), "98");
        assert_eq!(sanitize_code(""), "");
    }

    #[tokio::test]
    async fn test_unknown_and_deleted_emails_are_rejected() {
        let (_, service) = service();
        assert!(matches!(
            service.start("nobody@example.com").await,
            Err(LoginError::EmailNotFound)
        ));
        assert!(matches!(
            service.start("employee2@example.com").await,
            Err(LoginError::EmailNotFound)
        ));
        assert!(matches!(service.start("  ").await, Err(LoginError::MissingEmail)));
    }

    #[tokio::test]
    async fn test_login_and_logout_write_status() {
        let (store, service) = service();
        let challenge = service.start(" employee1@example.com ").await.unwrap();

        assert!(matches!(
            service.verify(&challenge, "4321").await,
            Err(LoginError::WrongCode)
        ));

        let employee = service.verify(&challenge, "1-2-3-4").await.unwrap();
        assert_eq!(employee.login_status, Some(LoginStatus::LoggedIn));
        assert!(employee.last_login.is_some());
        assert_eq!(login_message(&employee), "EMP0001 (Employee 1) Logged In Successfully");

        let employee = service.logout(1).await.unwrap();
        assert_eq!(employee.login_status, Some(LoginStatus::LoggedOut));
        assert!(employee.last_logout.is_some());
        assert_eq!(store.snapshot()[0].login_status, Some(LoginStatus::LoggedOut));
    }

    #[tokio::test]
    async fn test_logout_of_missing_row() {
        let (_, service) = service();
        assert!(matches!(service.logout(99).await, Err(LoginError::NotUpdated)));
    }
}
