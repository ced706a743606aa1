mod controls;
mod helpers;
mod help;
mod search;

use crate::api::DataFetcher;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub use search::best_match;

pub fn handle_input<F: DataFetcher>(app: &mut App<F>, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    if app.search.is_some() {
        search::handle_search_input(app, key);
        return;
    }

    controls::handle_controls_input(app, key);
}
