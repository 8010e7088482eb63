//! Day-bucketed counts behind the dashboard cards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use staffdesk_store::{EmployeeStore, Query, TimestampColumn};
use std::sync::Arc;
use tracing::{debug, error};

use crate::routes::Route;
use crate::services::calendar::{Day, DayRange, DayWindows};
use crate::services::report::ReportFilter;

pub struct MetricsService {
    store: Arc<dyn EmployeeStore>,
}

impl MetricsService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// Rows whose `column` lies in `[lower, upper)`. A missing bound drops
    /// that predicate. Failures are logged and reported as zero.
    pub async fn count_between(
        &self,
        column: TimestampColumn,
        lower: Option<DateTime<Utc>>,
        upper: Option<DateTime<Utc>>,
    ) -> u64 {
        let query = range_query(column, lower, upper);
        match self.store.count(&query).await {
            Ok(count) => {
                debug!(column = %column.column(), count, "count");
                count
            }
            Err(e) => {
                error!(column = %column.column(), error = %e, "count query failed, reporting zero");
                0
            }
        }
    }

    pub async fn count_in(&self, column: TimestampColumn, range: DayRange) -> u64 {
        self.count_between(column, Some(range.start), Some(range.end))
            .await
    }

    /// The six dashboard counts, issued concurrently.
    pub async fn dashboard(&self, windows: DayWindows) -> DashboardSummary {
        let (created_today, created_yesterday, deleted_today, deleted_yesterday, login_today, login_yesterday) = tokio::join!(
            self.count_in(TimestampColumn::CreatedAt, windows.today),
            self.count_in(TimestampColumn::CreatedAt, windows.yesterday),
            self.count_in(TimestampColumn::DeletedAt, windows.today),
            self.count_in(TimestampColumn::DeletedAt, windows.yesterday),
            self.count_in(TimestampColumn::LastLogin, windows.today),
            self.count_in(TimestampColumn::LastLogin, windows.yesterday),
        );

        DashboardSummary {
            created_today,
            created_yesterday,
            deleted_today,
            deleted_yesterday,
            login_today,
            login_yesterday,
        }
    }
}

pub fn range_query(
    column: TimestampColumn,
    lower: Option<DateTime<Utc>>,
    upper: Option<DateTime<Utc>>,
) -> Query {
    let mut query = Query::all();
    if let Some(lower) = lower {
        query = query.gte(column.column(), lower);
    }
    if let Some(upper) = upper {
        query = query.lt(column.column(), upper);
    }
    query
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardSummary {
    pub created_today: u64,
    pub created_yesterday: u64,
    pub deleted_today: u64,
    pub deleted_yesterday: u64,
    pub login_today: u64,
    pub login_yesterday: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub title: &'static str,
    pub count: u64,
    pub filter: ReportFilter,
}

impl SummaryCard {
    pub fn route(&self) -> Route {
        Route::Report(Some(self.filter.as_str().to_string()))
    }
}

impl DashboardSummary {
    pub fn count(&self, column: TimestampColumn, day: Day) -> u64 {
        match (column, day) {
            (TimestampColumn::CreatedAt, Day::Today) => self.created_today,
            (TimestampColumn::CreatedAt, Day::Yesterday) => self.created_yesterday,
            (TimestampColumn::DeletedAt, Day::Today) => self.deleted_today,
            (TimestampColumn::DeletedAt, Day::Yesterday) => self.deleted_yesterday,
            (TimestampColumn::LastLogin, Day::Today) => self.login_today,
            (TimestampColumn::LastLogin, Day::Yesterday) => self.login_yesterday,
            (TimestampColumn::LastLogout, _) => 0,
        }
    }

    /// Cards in display order, each linking to its report.
    pub fn cards(&self) -> Vec<SummaryCard> {
        vec![
            SummaryCard {
                title: "Created Today",
                count: self.created_today,
                filter: ReportFilter::CreatedToday,
            },
            SummaryCard {
                title: "Created Yesterday",
                count: self.created_yesterday,
                filter: ReportFilter::CreatedYesterday,
            },
            SummaryCard {
                title: "Deleted Today",
                count: self.deleted_today,
                filter: ReportFilter::DeletedToday,
            },
            SummaryCard {
                title: "Deleted Yesterday",
                count: self.deleted_yesterday,
                filter: ReportFilter::DeletedYesterday,
            },
            SummaryCard {
                title: "Logins Today",
                count: self.login_today,
                filter: ReportFilter::LoginToday,
            },
            SummaryCard {
                title: "Logins Yesterday",
                count: self.login_yesterday,
                filter: ReportFilter::LoginYesterday,
            },
        ]
    }
}
