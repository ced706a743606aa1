use clap::{CommandFactory, Parser};

use crate::config::{BASE_URL_VAR, FALLBACK_PRODUCT_VAR, LOG_FILE_VAR};
use crate::domain::FilterState;

#[derive(Debug, Default, Parser)]
#[command(
    name = "crop_dashboard",
    version,
    about = "Crop production dashboard"
)]
pub struct CliArgs {
    /// API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Run one update pass, print the charts and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    /// Initial country filter
    #[arg(long, value_name = "COUNTRY")]
    pub country: Option<String>,

    /// Initial year filter
    #[arg(long, value_name = "YEAR")]
    pub year: Option<String>,

    /// Initial product filter, e.g. Maize_Production
    #[arg(long, value_name = "PRODUCT")]
    pub product: Option<String>,

    /// Product for the top-producers chart while none is selected
    #[arg(long, value_name = "PRODUCT")]
    pub fallback_product: Option<String>,

    /// Log file used by the interactive dashboard
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl CliArgs {
    /// Value a flag supplies for a configuration variable, if given.
    /// These take precedence over the environment and `.env`.
    pub fn config_override(&self, key: &str) -> Option<String> {
        match key {
            BASE_URL_VAR => self.base_url.clone(),
            FALLBACK_PRODUCT_VAR => self.fallback_product.clone(),
            LOG_FILE_VAR => self.log_file.clone(),
            _ => None,
        }
    }

    /// Filters requested on the command line; absent flags are empty.
    pub fn filters(&self) -> FilterState {
        FilterState::new(
            self.country.clone().unwrap_or_default(),
            self.year.clone().unwrap_or_default(),
            self.product.clone().unwrap_or_default(),
        )
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
