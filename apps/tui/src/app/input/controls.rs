use crate::api::DataFetcher;
use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, ChartTab};
use crate::domain::Dimension;
use crossterm::event::KeyCode;

/// Options skipped by PageUp/PageDown.
const PAGE: usize = 10;

pub fn handle_controls_input<F: DataFetcher>(app: &mut App<F>, key: KeyCode) {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
        }
        KeyCode::Left | KeyCode::BackTab => {
            let index = wrap_decrement(app.focus.index(), Dimension::ALL.len());
            app.focus = Dimension::from_index(index).unwrap_or(Dimension::Country);
        }
        KeyCode::Right | KeyCode::Tab => {
            let index = wrap_increment(app.focus.index(), Dimension::ALL.len());
            app.focus = Dimension::from_index(index).unwrap_or(Dimension::Country);
        }
        KeyCode::Up => {
            let control = app.focused_control();
            let index = wrap_decrement(control.selected, control.len());
            app.select_focused(index);
        }
        KeyCode::Down => {
            let control = app.focused_control();
            let index = wrap_increment(control.selected, control.len());
            app.select_focused(index);
        }
        KeyCode::PageUp => {
            let index = app.focused_control().selected.saturating_sub(PAGE);
            app.select_focused(index);
        }
        KeyCode::PageDown => {
            let index = app.focused_control().selected + PAGE;
            app.select_focused(index);
        }
        KeyCode::Home => {
            app.select_focused(0);
        }
        KeyCode::Char(digit @ '1'..='4') => {
            let index = digit as usize - '1' as usize;
            if ChartTab::from_index(index).is_some() {
                app.chart_tab_index = index;
            }
        }
        KeyCode::Char('r') => {
            app.apply_filters();
        }
        KeyCode::Char('/') => {
            if !app.focused_control().is_empty() {
                app.search = Some(String::new());
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;
    use crate::dashboard::renderers::test_support::ScriptedFetcher;
    use crate::dashboard::RendererKind;

    fn populated() -> App<ScriptedFetcher> {
        let mut app = test_app(ScriptedFetcher::new());
        app.controls.country.populate(["Chad", "Kenya"]);
        app.controls
            .year
            .populate((1990..2021).rev().map(|year| year.to_string()));
        app.controls.product.populate(["Maize_Production"]);
        app
    }

    #[tokio::test]
    async fn focus_wraps_around() {
        let mut app = populated();
        handle_controls_input(&mut app, KeyCode::Left);
        assert_eq!(app.focus, Dimension::Product);
        handle_controls_input(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Dimension::Country);
    }

    #[tokio::test]
    async fn down_selects_and_fires_a_pass() {
        let mut app = populated();
        app.focus = Dimension::Year;

        handle_controls_input(&mut app, KeyCode::Down);

        assert_eq!(app.filter_state().year, "2020");
        let pass = app.last_pass.clone().unwrap();
        assert_eq!(pass.generation, 1);
        assert_eq!(
            pass.invoked,
            [
                RendererKind::Map,
                RendererKind::Decade,
                RendererKind::Yearly,
                RendererKind::TopProducers,
            ]
        );
    }

    #[tokio::test]
    async fn up_from_placeholder_wraps_to_last_option() {
        let mut app = populated();
        handle_controls_input(&mut app, KeyCode::Up);
        assert_eq!(app.filter_state().country, "Kenya");
    }

    #[tokio::test]
    async fn page_keys_clamp_and_home_clears() {
        let mut app = populated();
        app.focus = Dimension::Year;

        handle_controls_input(&mut app, KeyCode::PageDown);
        assert_eq!(app.controls.year.selected, 10);
        for _ in 0..5 {
            handle_controls_input(&mut app, KeyCode::PageDown);
        }
        assert_eq!(app.filter_state().year, "1990");

        handle_controls_input(&mut app, KeyCode::Home);
        assert_eq!(app.filter_state().year, "");
        assert_eq!(app.last_pass.as_ref().map(|pass| pass.generation), Some(5));
    }

    #[tokio::test]
    async fn number_keys_pick_chart_pages() {
        let mut app = populated();
        handle_controls_input(&mut app, KeyCode::Char('4'));
        assert_eq!(app.chart_tab(), ChartTab::Compare);
        handle_controls_input(&mut app, KeyCode::Char('5'));
        assert_eq!(app.chart_tab(), ChartTab::Compare);
    }

    #[tokio::test]
    async fn quit_keys_stop_the_app() {
        let mut app = populated();
        handle_controls_input(&mut app, KeyCode::Esc);
        assert!(!app.running);
    }
}
