// Event handling: the interactive loop and the headless report

mod loop_handler;

pub use loop_handler::{build_report, run, run_headless, HeadlessReport};
