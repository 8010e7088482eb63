use std::sync::Arc;
use tokio::sync::mpsc;

use crate::events::AppEvent;
use crate::generation::{RequestTracker, Ticket};
use crate::services::report::report_title;
use crate::services::{DayWindows, ReportPage, ReportService};

/// Report screen. Switching filters while a load is in flight discards the
/// older response.
pub struct ReportViewModel {
    pub param: Option<String>,
    pub page: Option<ReportPage>,
    pub is_loading: bool,
    /// First visible row.
    pub scroll: usize,
    service: Arc<ReportService>,
    tracker: RequestTracker,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl ReportViewModel {
    pub fn new(service: Arc<ReportService>, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            param: None,
            page: None,
            is_loading: false,
            scroll: 0,
            service,
            tracker: RequestTracker::new(),
            event_tx,
        }
    }

    pub fn open(&mut self, param: Option<String>) -> Ticket {
        self.open_for(param, DayWindows::now())
    }

    pub fn open_for(&mut self, param: Option<String>, windows: DayWindows) -> Ticket {
        let ticket = self.tracker.begin();
        self.param = param.clone();
        self.is_loading = true;
        self.scroll = 0;

        let service = Arc::clone(&self.service);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let page = service.fetch(param.as_deref(), &windows).await;
            let _ = tx.send(AppEvent::ReportLoaded { ticket, page });
        });

        ticket
    }

    pub fn reload(&mut self) -> Ticket {
        self.open(self.param.clone())
    }

    pub fn on_loaded(&mut self, ticket: Ticket, page: ReportPage) -> bool {
        if !self.tracker.is_current(ticket) {
            return false;
        }
        self.is_loading = false;
        self.page = Some(page);
        true
    }

    /// Title of the requested report, available before its rows arrive.
    pub fn title(&self) -> String {
        report_title(self.param.as_deref())
    }

    pub fn scroll_down(&mut self) {
        let len = self.page.as_ref().map_or(0, |p| p.rows.len());
        if self.scroll + 1 < len {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::employee_at;
    use chrono::Utc;
    use staffdesk_store::MemoryStore;

    #[tokio::test]
    async fn test_stale_report_is_discarded() {
        let now = Utc::now();
        let store = Arc::new(MemoryStore::with_rows(vec![employee_at(1, now)]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut vm = ReportViewModel::new(Arc::new(ReportService::new(store, 500)), tx);
        let windows = DayWindows::at(&now);

        let first = vm.open_for(Some("created_today".into()), windows);
        let second = vm.open_for(Some("deleted_today".into()), windows);

        let mut pages = Vec::new();
        for _ in 0..2 {
            match rx.recv().await.unwrap() {
                AppEvent::ReportLoaded { ticket, page } => pages.push((ticket, page)),
                other => panic!("unexpected event {other:?}"),
            }
        }
        // deliver the newer response first, then the stale one
        pages.sort_by_key(|(ticket, _)| *ticket != second);
        for (ticket, page) in pages {
            let applied = vm.on_loaded(ticket, page);
            assert_eq!(applied, ticket == second);
            assert_ne!(applied, ticket == first);
        }

        let page = vm.page.as_ref().unwrap();
        assert_eq!(page.title, "deleted today");
        assert!(page.rows.is_empty());
        assert_eq!(vm.title(), "deleted today");
    }

    #[test]
    fn test_title_before_load() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let vm = ReportViewModel::new(
            Arc::new(ReportService::new(Arc::new(MemoryStore::new()), 500)),
            tx,
        );
        assert_eq!(vm.title(), "Report");
        assert!(vm.page.is_none());
    }
}
