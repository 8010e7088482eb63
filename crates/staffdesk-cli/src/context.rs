use chrono::Utc;
use staffdesk_core::services::{EmployeeService, LoginService, MetricsService, ReportService};
use staffdesk_core::Settings;
use staffdesk_store::{EmployeeStore, RestStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::demo;

/// Services shared by the subcommands and the TUI, all over one store.
#[derive(Clone)]
pub struct Context {
    pub settings: Settings,
    pub demo: bool,
    pub employees: Arc<EmployeeService>,
    pub metrics: Arc<MetricsService>,
    pub reports: Arc<ReportService>,
    pub login: Arc<LoginService>,
}

impl Context {
    pub fn new(settings: Settings, demo: bool) -> Self {
        let store = build_store(&settings, demo);
        Self::with_store(settings, demo, store)
    }

    pub fn with_store(settings: Settings, demo: bool, store: Arc<dyn EmployeeStore>) -> Self {
        Self {
            employees: Arc::new(EmployeeService::new(Arc::clone(&store))),
            metrics: Arc::new(MetricsService::new(Arc::clone(&store))),
            reports: Arc::new(ReportService::new(
                Arc::clone(&store),
                settings.report.recent_limit,
            )),
            login: Arc::new(LoginService::new(store, settings.login.demo_code.clone())),
            settings,
            demo,
        }
    }

    /// Short description of the backing store for headers.
    pub fn store_label(&self) -> String {
        if self.demo {
            "demo data (in memory)".to_string()
        } else if self.settings.store_configured() {
            self.settings.store.url.clone()
        } else {
            "store not configured".to_string()
        }
    }
}

fn build_store(settings: &Settings, demo: bool) -> Arc<dyn EmployeeStore> {
    if demo {
        info!("using seeded in-memory store");
        return Arc::new(demo::store(Utc::now()));
    }

    if !settings.store_configured() {
        warn!("SUPABASE_URL / SUPABASE_ANON_KEY not set; store calls will fail");
    }

    Arc::new(
        RestStore::new(&settings.store.url, &settings.store.anon_key)
            .with_table(&settings.store.table)
            .with_timeout(Duration::from_secs(settings.store.timeout_seconds)),
    )
}
