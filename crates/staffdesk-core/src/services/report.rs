//! Filtered listings behind `/report/:filter`.

use serde::Serialize;
use staffdesk_store::{Column, Employee, EmployeeStore, Query, TimestampColumn};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

use crate::services::calendar::{Day, DayWindows};

/// Columns shown by the recent-activity fallback.
pub const RECENT_ACTIVITY_COLUMNS: &[Column] = &[
    Column::Id,
    Column::EmpCode,
    Column::Name,
    Column::Email,
    Column::Department,
    Column::Role,
    Column::Status,
    Column::LoginStatus,
    Column::CreatedAt,
    Column::LastLogin,
    Column::LastLogout,
    Column::DeletedAt,
    Column::DeletedBy,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFilter {
    CreatedToday,
    CreatedYesterday,
    DeletedToday,
    DeletedYesterday,
    LogoutToday,
    LogoutYesterday,
    LoginToday,
    LoginYesterday,
}

impl ReportFilter {
    pub const ALL: [ReportFilter; 8] = [
        ReportFilter::CreatedToday,
        ReportFilter::CreatedYesterday,
        ReportFilter::DeletedToday,
        ReportFilter::DeletedYesterday,
        ReportFilter::LogoutToday,
        ReportFilter::LogoutYesterday,
        ReportFilter::LoginToday,
        ReportFilter::LoginYesterday,
    ];

    /// Exact, case-sensitive match on the identifier.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == id)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFilter::CreatedToday => "created_today",
            ReportFilter::CreatedYesterday => "created_yesterday",
            ReportFilter::DeletedToday => "deleted_today",
            ReportFilter::DeletedYesterday => "deleted_yesterday",
            ReportFilter::LogoutToday => "logout_today",
            ReportFilter::LogoutYesterday => "logout_yesterday",
            ReportFilter::LoginToday => "login_today",
            ReportFilter::LoginYesterday => "login_yesterday",
        }
    }

    pub fn column(&self) -> TimestampColumn {
        match self {
            ReportFilter::CreatedToday | ReportFilter::CreatedYesterday => {
                TimestampColumn::CreatedAt
            }
            ReportFilter::DeletedToday | ReportFilter::DeletedYesterday => {
                TimestampColumn::DeletedAt
            }
            ReportFilter::LogoutToday | ReportFilter::LogoutYesterday => {
                TimestampColumn::LastLogout
            }
            ReportFilter::LoginToday | ReportFilter::LoginYesterday => TimestampColumn::LastLogin,
        }
    }

    pub fn day(&self) -> Day {
        match self {
            ReportFilter::CreatedToday
            | ReportFilter::DeletedToday
            | ReportFilter::LogoutToday
            | ReportFilter::LoginToday => Day::Today,
            _ => Day::Yesterday,
        }
    }

    /// All columns, range on the filter's timestamp column, newest first.
    pub fn query(&self, windows: &DayWindows) -> Query {
        let column = self.column().column();
        let range = windows.range(self.day());
        Query::all()
            .gte(column, range.start)
            .lt(column, range.end)
            .order_desc(column)
    }
}

impl fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The query a report route resolves to. Unknown or absent identifiers
/// resolve to recent activity; this never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    Filtered(ReportFilter),
    RecentActivity,
}

impl ReportKind {
    pub fn from_param(param: Option<&str>) -> Self {
        param
            .and_then(ReportFilter::parse)
            .map(ReportKind::Filtered)
            .unwrap_or(ReportKind::RecentActivity)
    }

    pub fn query(&self, windows: &DayWindows, recent_limit: usize) -> Query {
        match self {
            ReportKind::Filtered(filter) => filter.query(windows),
            ReportKind::RecentActivity => Query::columns(RECENT_ACTIVITY_COLUMNS)
                .order_desc(Column::CreatedAt)
                .limit(recent_limit),
        }
    }
}

/// `created_today` → `created today`; no parameter → `Report`.
pub fn report_title(param: Option<&str>) -> String {
    match param {
        Some(p) if !p.is_empty() => p.replace('_', " "),
        _ => "Report".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportPage {
    pub title: String,
    pub kind: ReportKind,
    pub rows: Vec<Employee>,
    /// Set when the read failed; `rows` is then empty.
    pub error: Option<String>,
}

pub struct ReportService {
    store: Arc<dyn EmployeeStore>,
    recent_limit: usize,
}

impl ReportService {
    pub fn new(store: Arc<dyn EmployeeStore>, recent_limit: usize) -> Self {
        Self {
            store,
            recent_limit,
        }
    }

    /// Loads the report for a route parameter. Read failures are logged and
    /// returned as an empty page carrying the message.
    pub async fn fetch(&self, param: Option<&str>, windows: &DayWindows) -> ReportPage {
        let kind = ReportKind::from_param(param);
        let query = kind.query(windows, self.recent_limit);
        let title = report_title(param);

        match self.store.select(&query).await {
            Ok(rows) => {
                info!(report = %title, rows = rows.len(), "report loaded");
                ReportPage {
                    title,
                    kind,
                    rows,
                    error: None,
                }
            }
            Err(e) => {
                error!(report = %title, error = %e, "report query failed");
                ReportPage {
                    title,
                    kind,
                    rows: Vec::new(),
                    error: Some(format!("Load failed: {e}")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{employee_at, FailingStore};
    use chrono::{FixedOffset, TimeDelta, TimeZone, Utc};
    use staffdesk_store::MemoryStore;

    fn windows() -> DayWindows {
        let tz = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        DayWindows::at(&tz.with_ymd_and_hms(2025, 3, 4, 14, 0, 0).unwrap())
    }

    #[test]
    fn test_parse_known_and_unknown() {
        for filter in ReportFilter::ALL {
            assert_eq!(ReportFilter::parse(filter.as_str()), Some(filter));
        }
        assert_eq!(ReportFilter::parse("Created_Today"), None);
        assert_eq!(ReportKind::from_param(Some("bogus")), ReportKind::RecentActivity);
        assert_eq!(ReportKind::from_param(None), ReportKind::RecentActivity);
    }

    #[test]
    fn test_filter_query_params() {
        let params = ReportFilter::LogoutYesterday.query(&windows()).to_params();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("last_logout".to_string(), "gte.2025-03-02T18:30:00.000Z".to_string()),
                ("last_logout".to_string(), "lt.2025-03-03T18:30:00.000Z".to_string()),
                ("order".to_string(), "last_logout.desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_titles() {
        assert_eq!(report_title(Some("deleted_yesterday")), "deleted yesterday");
        assert_eq!(report_title(Some("")), "Report");
        assert_eq!(report_title(None), "Report");
    }

    #[tokio::test]
    async fn test_created_today_within_range_and_sorted() {
        let w = windows();
        let start = w.today.start;
        let rows = vec![
            employee_at(1, start - TimeDelta::seconds(1)),
            employee_at(2, start),
            employee_at(3, start + TimeDelta::hours(5)),
            employee_at(4, w.today.end),
            employee_at(5, start + TimeDelta::hours(2)),
        ];
        let store = Arc::new(MemoryStore::with_rows(rows));
        let page = ReportService::new(store, 500)
            .fetch(Some("created_today"), &w)
            .await;

        let ids: Vec<i64> = page.rows.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 5, 2]);
        assert!(page.rows.iter().all(|e| w.today.contains(e.created_at)));
        assert!(page
            .rows
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
        assert_eq!(page.title, "created today");
    }

    #[tokio::test]
    async fn test_unknown_filter_caps_recent_activity() {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let rows = (1..=12)
            .map(|id| employee_at(id, base + TimeDelta::minutes(id)))
            .collect();
        let store = Arc::new(MemoryStore::with_rows(rows));
        let page = ReportService::new(store, 5)
            .fetch(Some("no_such_filter"), &windows())
            .await;

        assert_eq!(page.kind, ReportKind::RecentActivity);
        assert!(page.error.is_none());
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.rows[0].id, 12);
    }

    #[tokio::test]
    async fn test_deleted_rows_appear_in_deleted_reports() {
        let w = windows();
        let mut gone = employee_at(1, w.yesterday.start - TimeDelta::days(5));
        gone.deleted_at = Some(w.yesterday.start + TimeDelta::hours(1));
        gone.deleted_by = Some("admin".into());
        let store = Arc::new(MemoryStore::with_rows(vec![
            gone,
            employee_at(2, w.yesterday.start),
        ]));
        let service = ReportService::new(store, 500);

        let yesterday = service.fetch(Some("deleted_yesterday"), &w).await;
        assert_eq!(yesterday.rows.len(), 1);
        assert_eq!(yesterday.rows[0].id, 1);

        let today = service.fetch(Some("deleted_today"), &w).await;
        assert!(today.rows.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_yields_empty_page() {
        let page = ReportService::new(Arc::new(FailingStore), 500)
            .fetch(Some("created_today"), &windows())
            .await;
        assert!(page.rows.is_empty());
        assert!(page.error.is_some());
    }
}
