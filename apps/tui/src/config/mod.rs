#[allow(clippy::module_inception)]
mod config;

pub use config::{
    init_app_config, DashboardConfig, BASE_URL_VAR, DEFAULT_LOG_FILE, FALLBACK_PRODUCT_VAR,
    LOG_FILE_VAR,
};
