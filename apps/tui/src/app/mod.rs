// App module for the crop dashboard
// Handles UI state and the keyboard-driven filter controls

pub mod actions;
pub mod input;
pub mod state;

pub use actions::{DashboardActions, StartupOutcome};
pub use input::handle_input;
pub use state::{App, ChartTab};

#[cfg(test)]
pub(crate) fn test_app(
    fetcher: crate::dashboard::renderers::test_support::ScriptedFetcher,
) -> App<crate::dashboard::renderers::test_support::ScriptedFetcher> {
    use crate::api::ApiBase;
    use crate::config::DashboardConfig;
    use crate::dashboard::renderers::test_support::BASE;

    let config = DashboardConfig {
        api: ApiBase::parse(BASE).unwrap(),
        fallback_product: "Maize_Production".to_string(),
        log_file: "unused.log".into(),
    };
    App::new(
        DashboardActions::new(std::sync::Arc::new(fetcher), &config),
        crate::domain::FilterState::default(),
    )
}
