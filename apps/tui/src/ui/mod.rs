// UI module for the crop dashboard
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::App;
use ratatui::Frame;

pub fn ui<F>(app: &App<F>, f: &mut Frame<'_>) {
    screens::dashboard::render_dashboard(app, f);
}
