use color_eyre::eyre::WrapErr;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::api::{ApiBase, DEFAULT_BASE_URL};
use crate::dashboard::DEFAULT_FALLBACK_PRODUCT;

pub const BASE_URL_VAR: &str = "DASHBOARD_BASE_URL";
pub const FALLBACK_PRODUCT_VAR: &str = "DASHBOARD_FALLBACK_PRODUCT";
pub const LOG_FILE_VAR: &str = "DASHBOARD_LOG_FILE";

pub const DEFAULT_LOG_FILE: &str = "crop_dashboard.log";

/// Settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api: ApiBase,
    /// Product the top-producers chart shows while no product is selected.
    pub fallback_product: String,
    /// Log destination in interactive mode.
    pub log_file: PathBuf,
}

impl DashboardConfig {
    /// Builds the configuration from a variable lookup. Unset or blank
    /// variables fall back to the defaults.
    pub fn from_lookup<L>(lookup: L) -> color_eyre::eyre::Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = read(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api = ApiBase::parse(base_url.trim())
            .wrap_err_with(|| format!("{BASE_URL_VAR} is not a usable API address"))?;

        let fallback_product =
            read(FALLBACK_PRODUCT_VAR).unwrap_or_else(|| DEFAULT_FALLBACK_PRODUCT.to_string());
        let log_file =
            read(LOG_FILE_VAR).map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from);

        Ok(Self {
            api,
            fallback_product,
            log_file,
        })
    }
}

/// Loads `.env` and resolves the configuration from the environment.
///
/// `overrides` (the command-line flags) win over the environment, and
/// variables already set in the process win over `.env`.
pub fn init_app_config<O>(overrides: O) -> color_eyre::eyre::Result<DashboardConfig>
where
    O: Fn(&str) -> Option<String>,
{
    dotenv().ok();
    DashboardConfig::from_lookup(layered(overrides, |key| env::var(key).ok()))
}

fn layered<O, E>(overrides: O, environment: E) -> impl Fn(&str) -> Option<String>
where
    O: Fn(&str) -> Option<String>,
    E: Fn(&str) -> Option<String>,
{
    move |key| overrides(key).or_else(|| environment(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api.base().as_str(), "https://cmp419-unit2.onrender.com/");
        assert_eq!(config.fallback_product, "Maize_Production");
        assert_eq!(config.log_file, PathBuf::from("crop_dashboard.log"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config =
            DashboardConfig::from_lookup(lookup(&[(FALLBACK_PRODUCT_VAR, "  ")])).unwrap();
        assert_eq!(config.fallback_product, "Maize_Production");
    }

    #[test]
    fn overrides_are_used() {
        let config = DashboardConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://localhost:5000"),
            (FALLBACK_PRODUCT_VAR, "Rice_Production"),
            (LOG_FILE_VAR, "/tmp/dash.log"),
        ]))
        .unwrap();
        assert_eq!(
            config.api.countries().as_str(),
            "http://localhost:5000/api/countries"
        );
        assert_eq!(config.fallback_product, "Rice_Production");
        assert_eq!(config.log_file, PathBuf::from("/tmp/dash.log"));
    }

    #[test]
    fn overrides_win_over_the_environment() {
        let config = DashboardConfig::from_lookup(layered(
            lookup(&[(FALLBACK_PRODUCT_VAR, "Rice_Production")]),
            lookup(&[
                (FALLBACK_PRODUCT_VAR, "Wheat_Production"),
                (LOG_FILE_VAR, "/tmp/env.log"),
            ]),
        ))
        .unwrap();
        assert_eq!(config.fallback_product, "Rice_Production");
        assert_eq!(config.log_file, PathBuf::from("/tmp/env.log"));
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        let error = DashboardConfig::from_lookup(lookup(&[(BASE_URL_VAR, "ftp://nope")]))
            .unwrap_err();
        assert!(error.to_string().contains(BASE_URL_VAR));
    }
}
