// Terminal lifecycle for the interactive dashboard

mod setup;

pub use setup::{cleanup_terminal_state as cleanup, setup_terminal as setup};
