pub mod settings;

pub use settings::{
    GridConfig, LogFormat, LoggingConfig, LoginConfig, ReportConfig, Settings, StoreConfig,
    StoreCredentials, UiConfig,
};
