use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One row of the `employees` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    #[serde(default)]
    pub emp_code: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub login_status: Option<LoginStatus>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_logout: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_by: Option<String>,
}

/// Legacy rows may hold NULL in text columns the form requires.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Employee {
    /// A record is active until it carries a deletion timestamp.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn code(&self) -> &str {
        self.emp_code.as_deref().unwrap_or("-")
    }

    pub fn timestamp(&self, column: TimestampColumn) -> Option<DateTime<Utc>> {
        match column {
            TimestampColumn::CreatedAt => Some(self.created_at),
            TimestampColumn::LastLogin => self.last_login,
            TimestampColumn::LastLogout => self.last_logout,
            TimestampColumn::DeletedAt => self.deleted_at,
        }
    }

    /// Typed view of a single column, used by in-process filtering and sorting.
    pub fn field(&self, column: Column) -> FieldValue<'_> {
        match column {
            Column::Id => FieldValue::Int(self.id),
            Column::EmpCode => FieldValue::Text(self.emp_code.as_deref()),
            Column::Name => FieldValue::Text(Some(self.name.as_str())),
            Column::Email => FieldValue::Text(Some(self.email.as_str())),
            Column::Department => FieldValue::Text(self.department.as_deref()),
            Column::Role => FieldValue::Text(self.role.as_deref()),
            Column::Status => FieldValue::Text(self.status.as_deref()),
            Column::LoginStatus => FieldValue::Text(self.login_status.map(|s| s.as_str())),
            Column::DeletedBy => FieldValue::Text(self.deleted_by.as_deref()),
            Column::CreatedAt => FieldValue::Time(Some(self.created_at)),
            Column::LastLogin => FieldValue::Time(self.last_login),
            Column::LastLogout => FieldValue::Time(self.last_logout),
            Column::DeletedAt => FieldValue::Time(self.deleted_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Int(i64),
    Text(Option<&'a str>),
    Time(Option<DateTime<Utc>>),
}

impl FieldValue<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Text(None) | FieldValue::Time(None))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginStatus {
    LoggedIn,
    #[default]
    LoggedOut,
    #[serde(other)]
    Unknown,
}

impl LoginStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStatus::LoggedIn => "logged_in",
            LoginStatus::LoggedOut => "logged_out",
            LoginStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insert payload. The store assigns `id`, `emp_code` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub role: Option<String>,
    pub login_status: LoginStatus,
}

/// Partial update. `None` leaves a column untouched; `Some(None)` on the
/// nullable text columns writes NULL.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmployeePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_status: Option<LoginStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_logout: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        *self == EmployeePatch::default()
    }

    /// Applies the patch in place, mirroring what the backend does with the
    /// same JSON body.
    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(name) = &self.name {
            employee.name = name.clone();
        }
        if let Some(email) = &self.email {
            employee.email = email.clone();
        }
        if let Some(department) = &self.department {
            employee.department = department.clone();
        }
        if let Some(role) = &self.role {
            employee.role = role.clone();
        }
        if let Some(status) = self.login_status {
            employee.login_status = Some(status);
        }
        if let Some(at) = self.last_login {
            employee.last_login = Some(at);
        }
        if let Some(at) = self.last_logout {
            employee.last_logout = Some(at);
        }
        if let Some(at) = self.deleted_at {
            employee.deleted_at = Some(at);
        }
        if let Some(by) = &self.deleted_by {
            employee.deleted_by = Some(by.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    EmpCode,
    Name,
    Email,
    Department,
    Role,
    Status,
    LoginStatus,
    CreatedAt,
    LastLogin,
    LastLogout,
    DeletedAt,
    DeletedBy,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::EmpCode => "emp_code",
            Column::Name => "name",
            Column::Email => "email",
            Column::Department => "department",
            Column::Role => "role",
            Column::Status => "status",
            Column::LoginStatus => "login_status",
            Column::CreatedAt => "created_at",
            Column::LastLogin => "last_login",
            Column::LastLogout => "last_logout",
            Column::DeletedAt => "deleted_at",
            Column::DeletedBy => "deleted_by",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The timestamp columns that day-bucketed counts and reports range over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampColumn {
    CreatedAt,
    LastLogin,
    LastLogout,
    DeletedAt,
}

impl TimestampColumn {
    pub fn column(&self) -> Column {
        match self {
            TimestampColumn::CreatedAt => Column::CreatedAt,
            TimestampColumn::LastLogin => Column::LastLogin,
            TimestampColumn::LastLogout => Column::LastLogout,
            TimestampColumn::DeletedAt => Column::DeletedAt,
        }
    }
}

impl From<TimestampColumn> for Column {
    fn from(column: TimestampColumn) -> Self {
        column.column()
    }
}
