//! Dashboard state: six day-bucketed counts, loaded in the background.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::events::AppEvent;
use crate::generation::{RequestTracker, Ticket};
use crate::services::{DashboardSummary, DayWindows, MetricsService, SummaryCard};

pub struct DashboardViewModel {
    pub summary: Option<DashboardSummary>,
    pub is_loading: bool,
    /// Card under the cursor.
    pub selected: usize,
    metrics: Arc<MetricsService>,
    tracker: RequestTracker,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl DashboardViewModel {
    pub fn new(metrics: Arc<MetricsService>, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            summary: None,
            is_loading: false,
            selected: 0,
            metrics,
            tracker: RequestTracker::new(),
            event_tx,
        }
    }

    /// Day boundaries are taken from the clock at call time.
    pub fn load(&mut self) -> Ticket {
        self.load_for(DayWindows::now())
    }

    pub fn load_for(&mut self, windows: DayWindows) -> Ticket {
        let ticket = self.tracker.begin();
        self.is_loading = true;

        let metrics = Arc::clone(&self.metrics);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let summary = metrics.dashboard(windows).await;
            let _ = tx.send(AppEvent::DashboardLoaded { ticket, summary });
        });

        ticket
    }

    /// Returns whether the result was applied.
    pub fn on_loaded(&mut self, ticket: Ticket, summary: DashboardSummary) -> bool {
        if !self.tracker.is_current(ticket) {
            return false;
        }
        self.is_loading = false;
        self.summary = Some(summary);
        true
    }

    pub fn cards(&self) -> Vec<SummaryCard> {
        self.summary.unwrap_or_default().cards()
    }

    pub fn select_next(&mut self) {
        let count = self.cards().len();
        self.selected = (self.selected + 1) % count;
    }

    pub fn select_prev(&mut self) {
        let count = self.cards().len();
        self.selected = (self.selected + count - 1) % count;
    }

    pub fn selected_card(&self) -> Option<SummaryCard> {
        self.cards().into_iter().nth(self.selected)
    }
}
