use clap::Parser;
use color_eyre::Result;

use crop_dashboard::app::{App, DashboardActions};
use crop_dashboard::cli::CliArgs;
use crop_dashboard::config::init_app_config;
use crop_dashboard::{event, telemetry, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = init_app_config(|key| args.config_override(key))?;

    let headless = args.headless || args.json || !is_terminal();
    if headless {
        telemetry::init_stderr_tracing(args.debug);
    } else if let Err(e) = telemetry::init_file_tracing(&config.log_file, args.debug) {
        eprintln!("Logging disabled: {e}");
    }
    tracing::info!(base_url = %config.api.base(), headless, "starting crop dashboard");

    let actions = DashboardActions::from_config(&config);
    let mut app = App::new(actions, args.filters());

    if headless {
        return event::run_headless(&mut app, args.json).await;
    }

    let mut terminal = terminal::setup()?;

    let result = event::run(&mut terminal, &mut app).await;

    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
