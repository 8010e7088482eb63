//! In-process [`EmployeeStore`] with the same query semantics as the REST
//! backend. Backs demo mode and service tests.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::models::{Employee, EmployeePatch, NewEmployee};
use crate::query::Query;
use crate::store::EmployeeStore;

struct MemoryState {
    rows: Vec<Employee>,
    next_id: i64,
}

pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    /// Seeds the table. Subsequent inserts continue after the highest id.
    pub fn with_rows(rows: Vec<Employee>) -> Self {
        let next_id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(MemoryState { rows, next_id }),
        }
    }

    pub fn snapshot(&self) -> Vec<Employee> {
        self.state.lock().rows.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Employee>> {
        let state = self.state.lock();
        let rows = query.apply(&state.rows);
        debug!(matched = rows.len(), "memory select");
        Ok(rows)
    }

    async fn count(&self, query: &Query) -> Result<u64> {
        let state = self.state.lock();
        Ok(state.rows.iter().filter(|r| query.matches(r)).count() as u64)
    }

    async fn insert(&self, record: &NewEmployee) -> Result<Vec<Employee>> {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;

        let employee = Employee {
            id,
            emp_code: Some(format!("EMP{:04}", id)),
            name: record.name.clone(),
            email: record.email.clone(),
            department: record.department.clone(),
            role: record.role.clone(),
            status: None,
            login_status: Some(record.login_status),
            created_at: Utc::now(),
            last_login: None,
            last_logout: None,
            deleted_at: None,
            deleted_by: None,
        };
        state.rows.push(employee.clone());
        Ok(vec![employee])
    }

    async fn update(&self, id: i64, patch: &EmployeePatch) -> Result<Vec<Employee>> {
        let mut state = self.state.lock();
        let updated = state
            .rows
            .iter_mut()
            .filter(|r| r.id == id)
            .map(|row| {
                patch.apply_to(row);
                row.clone()
            })
            .collect();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, LoginStatus};

    fn new_employee(name: &str) -> NewEmployee {
        NewEmployee {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            department: None,
            role: None,
            login_status: LoginStatus::LoggedOut,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_code() {
        let store = MemoryStore::new();
        let first = store.insert(&new_employee("Ana")).await.unwrap();
        let second = store.insert(&new_employee("Ben")).await.unwrap();

        assert_eq!(first[0].id, 1);
        assert_eq!(second[0].code(), "EMP0002");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_row_returns_empty() {
        let store = MemoryStore::new();
        let patch = EmployeePatch {
            name: Some("X".into()),
            ..Default::default()
        };
        assert!(store.update(99, &patch).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_soft_deleted_rows_leave_active_listing() {
        let store = MemoryStore::new();
        store.insert(&new_employee("Ana")).await.unwrap();
        store.insert(&new_employee("Ben")).await.unwrap();
        store
            .update(
                1,
                &EmployeePatch {
                    deleted_at: Some(Utc::now()),
                    deleted_by: Some("admin".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let active = store
            .select(&Query::all().is_null(Column::DeletedAt).order_asc(Column::EmpCode))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Ben");

        let total = store.count(&Query::all()).await.unwrap();
        assert_eq!(total, 2);
    }
}
