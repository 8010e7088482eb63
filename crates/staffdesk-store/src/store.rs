use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Employee, EmployeePatch, NewEmployee};
use crate::query::Query;

/// Access to the single `employees` table.
///
/// Implementations are constructed explicitly and handed to services as
/// `Arc<dyn EmployeeStore>`.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Rows matching `query`, in its order, truncated to its limit.
    async fn select(&self, query: &Query) -> Result<Vec<Employee>>;

    /// Number of rows matching the predicates of `query`. Selection, order
    /// and limit are ignored; no row payload is transferred.
    async fn count(&self, query: &Query) -> Result<u64>;

    /// Inserts one row and returns its stored representation.
    async fn insert(&self, record: &NewEmployee) -> Result<Vec<Employee>>;

    /// Patches the row with `id` and returns the updated representation
    /// (empty when nothing matched).
    async fn update(&self, id: i64, patch: &EmployeePatch) -> Result<Vec<Employee>>;
}
