//! Row query builder.
//!
//! A `Query` describes column selection, predicates, ordering and a limit in
//! the vocabulary of PostgREST. The REST store turns it into URL parameters;
//! the memory store evaluates it directly against rows.

use chrono::{DateTime, SecondsFormat, Utc};
use std::cmp::Ordering;

use crate::models::{Column, Employee, FieldValue};

/// Columns returned by a query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Columns(Vec<Column>),
}

impl Selection {
    pub fn to_param(&self) -> String {
        match self {
            Selection::All => "*".to_string(),
            Selection::Columns(columns) => columns
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    fn to_param(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Text(v) => v.clone(),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq(Column, Value),
    /// Inclusive lower bound.
    Gte(Column, DateTime<Utc>),
    /// Exclusive upper bound.
    Lt(Column, DateTime<Utc>),
    IsNull(Column),
}

impl Filter {
    pub fn column(&self) -> Column {
        match self {
            Filter::Eq(c, _) | Filter::Gte(c, _) | Filter::Lt(c, _) | Filter::IsNull(c) => *c,
        }
    }

    /// `(column, "op.value")` pair as PostgREST expects it.
    pub fn to_param(&self) -> (String, String) {
        let value = match self {
            Filter::Eq(_, v) => format!("eq.{}", v.to_param()),
            Filter::Gte(_, at) => format!("gte.{}", format_timestamp(at)),
            Filter::Lt(_, at) => format!("lt.{}", format_timestamp(at)),
            Filter::IsNull(_) => "is.null".to_string(),
        };
        (self.column().as_str().to_string(), value)
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        let field = employee.field(self.column());
        match self {
            Filter::IsNull(_) => field.is_null(),
            Filter::Eq(_, expected) => match (field, expected) {
                (FieldValue::Int(actual), Value::Int(expected)) => actual == *expected,
                (FieldValue::Text(Some(actual)), Value::Text(expected)) => actual == expected,
                (FieldValue::Int(actual), Value::Text(expected)) => {
                    actual.to_string() == *expected
                }
                _ => false,
            },
            Filter::Gte(_, bound) => matches!(field, FieldValue::Time(Some(at)) if at >= *bound),
            Filter::Lt(_, bound) => matches!(field, FieldValue::Time(Some(at)) if at < *bound),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: Column,
    pub direction: Direction,
}

impl Order {
    pub fn to_param(&self) -> String {
        let dir = match self.direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };
        format!("{}.{}", self.column.as_str(), dir)
    }

    /// PostgreSQL ordering: NULL compares greater than any value, so it lands
    /// last ascending and first descending.
    pub fn compare(&self, a: &Employee, b: &Employee) -> Ordering {
        let ord = compare_fields(a.field(self.column), b.field(self.column));
        match self.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    }
}

fn compare_fields(a: FieldValue<'_>, b: FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Int(x), FieldValue::Int(y)) => x.cmp(&y),
        (FieldValue::Text(x), FieldValue::Text(y)) => null_last(x, y),
        (FieldValue::Time(x), FieldValue::Time(y)) => null_last(x, y),
        _ => Ordering::Equal,
    }
}

fn null_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

/// ISO-8601 instant in UTC with millisecond precision, e.g.
/// `2025-03-04T18:30:00.000Z`.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub selection: Selection,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    /// `select *` with no predicate.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn columns(columns: &[Column]) -> Self {
        Self {
            selection: Selection::Columns(columns.to_vec()),
            ..Self::default()
        }
    }

    pub fn eq(mut self, column: Column, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column, value.into()));
        self
    }

    pub fn gte(mut self, column: Column, at: DateTime<Utc>) -> Self {
        self.filters.push(Filter::Gte(column, at));
        self
    }

    pub fn lt(mut self, column: Column, at: DateTime<Utc>) -> Self {
        self.filters.push(Filter::Lt(column, at));
        self
    }

    pub fn is_null(mut self, column: Column) -> Self {
        self.filters.push(Filter::IsNull(column));
        self
    }

    pub fn order_asc(mut self, column: Column) -> Self {
        self.order = Some(Order {
            column,
            direction: Direction::Asc,
        });
        self
    }

    pub fn order_desc(mut self, column: Column) -> Self {
        self.order = Some(Order {
            column,
            direction: Direction::Desc,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        self.filters.iter().all(|f| f.matches(employee))
    }

    /// URL parameters for a row read.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 3);
        params.push(("select".to_string(), self.selection.to_param()));
        params.extend(self.filter_params());
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.to_param()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    /// Predicate parameters only (count reads carry no ordering or limit).
    pub fn filter_params(&self) -> Vec<(String, String)> {
        self.filters.iter().map(Filter::to_param).collect()
    }

    /// Runs the query over an in-memory row set.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<Employee>
    where
        I: IntoIterator<Item = &'a Employee>,
    {
        let mut out: Vec<Employee> = rows
            .into_iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect();
        if let Some(order) = &self.order {
            out.sort_by(|a, b| order.compare(a, b));
        }
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn employee(id: i64, code: Option<&str>, created: DateTime<Utc>) -> Employee {
        Employee {
            id,
            emp_code: code.map(str::to_string),
            name: format!("Employee {id}"),
            email: format!("e{id}@example.com"),
            department: None,
            role: None,
            status: None,
            login_status: None,
            created_at: created,
            last_login: None,
            last_logout: None,
            deleted_at: None,
            deleted_by: None,
        }
    }

    #[test]
    fn test_range_query_params() {
        let start = Utc.with_ymd_and_hms(2025, 3, 3, 18, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 4, 18, 30, 0).unwrap();
        let query = Query::all()
            .gte(Column::CreatedAt, start)
            .lt(Column::CreatedAt, end)
            .order_desc(Column::CreatedAt);

        assert_eq!(
            query.to_params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("created_at".to_string(), "gte.2025-03-03T18:30:00.000Z".to_string()),
                ("created_at".to_string(), "lt.2025-03-04T18:30:00.000Z".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_column_selection_and_limit() {
        let query = Query::columns(&[Column::Id, Column::EmpCode, Column::Name])
            .is_null(Column::DeletedAt)
            .limit(500);
        let params = query.to_params();
        assert_eq!(params[0].1, "id,emp_code,name");
        assert_eq!(params[1], ("deleted_at".to_string(), "is.null".to_string()));
        assert_eq!(params[2], ("limit".to_string(), "500".to_string()));
    }

    #[test]
    fn test_half_open_bounds() {
        let start = Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap();
        let query = Query::all()
            .gte(Column::CreatedAt, start)
            .lt(Column::CreatedAt, end);

        assert!(query.matches(&employee(1, None, start)));
        assert!(!query.matches(&employee(2, None, end)));
    }

    #[test]
    fn test_null_ordering_follows_postgres() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let rows = vec![
            employee(1, Some("EMP0002"), at),
            employee(2, None, at),
            employee(3, Some("EMP0001"), at),
        ];

        let asc = Query::all().order_asc(Column::EmpCode).apply(&rows);
        let ids: Vec<i64> = asc.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let desc = Query::all().order_desc(Column::EmpCode).apply(&rows);
        let ids: Vec<i64> = desc.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_eq_on_id_and_text() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let row = employee(9, None, at);
        assert!(Query::all().eq(Column::Id, 9i64).matches(&row));
        assert!(Query::all().eq(Column::Email, "e9@example.com").matches(&row));
        assert!(!Query::all().eq(Column::Email, "E9@example.com").matches(&row));
    }
}
