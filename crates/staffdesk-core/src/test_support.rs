//! Shared fixtures for unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use staffdesk_store::error::Result as StoreResult;
use staffdesk_store::{Employee, EmployeePatch, EmployeeStore, NewEmployee, Query, StoreError};

pub fn employee_at(id: i64, created_at: DateTime<Utc>) -> Employee {
    Employee {
        id,
        emp_code: Some(format!("EMP{:04}", id)),
        name: format!("Employee {id}"),
        email: format!("employee{id}@example.com"),
        department: None,
        role: None,
        status: None,
        login_status: None,
        created_at,
        last_login: None,
        last_logout: None,
        deleted_at: None,
        deleted_by: None,
    }
}

mock! {
    pub Store {}

    #[async_trait]
    impl EmployeeStore for Store {
        async fn select(&self, query: &Query) -> StoreResult<Vec<Employee>>;
        async fn count(&self, query: &Query) -> StoreResult<u64>;
        async fn insert(&self, record: &NewEmployee) -> StoreResult<Vec<Employee>>;
        async fn update(&self, id: i64, patch: &EmployeePatch) -> StoreResult<Vec<Employee>>;
    }
}

fn unreachable_backend() -> StoreError {
    StoreError::Api {
        status: 503,
        body: "service unavailable".to_string(),
    }
}

/// A store whose every call fails.
pub struct FailingStore;

#[async_trait]
impl EmployeeStore for FailingStore {
    async fn select(&self, _query: &Query) -> StoreResult<Vec<Employee>> {
        Err(unreachable_backend())
    }

    async fn count(&self, _query: &Query) -> StoreResult<u64> {
        Err(unreachable_backend())
    }

    async fn insert(&self, _record: &NewEmployee) -> StoreResult<Vec<Employee>> {
        Err(unreachable_backend())
    }

    async fn update(&self, _id: i64, _patch: &EmployeePatch) -> StoreResult<Vec<Employee>> {
        Err(unreachable_backend())
    }
}
