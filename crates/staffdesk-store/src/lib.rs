pub mod error;
pub mod memory;
pub mod models;
pub mod query;
pub mod rest;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::{Column, Employee, EmployeePatch, LoginStatus, NewEmployee, TimestampColumn};
pub use query::{Direction, Filter, Order, Query, Selection, Value};
pub use rest::RestStore;
pub use store::EmployeeStore;
