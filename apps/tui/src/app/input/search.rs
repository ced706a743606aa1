use crate::api::DataFetcher;
use crate::app::state::App;
use crate::domain::SelectControl;
use crossterm::event::KeyCode;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Control index of the option whose label best matches `query`.
/// Ties keep the earlier option.
pub fn best_match(control: &SelectControl, query: &str) -> Option<usize> {
    if query.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut best: Option<(i64, usize)> = None;
    for (index, option) in control.options.iter().enumerate() {
        let Some(score) = matcher.fuzzy_match(&option.label, query) else {
            continue;
        };
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, index + 1));
        }
    }
    best.map(|(_, index)| index)
}

pub fn handle_search_input<F: DataFetcher>(app: &mut App<F>, key: KeyCode) {
    let Some(query) = app.search.as_mut() else {
        return;
    };

    match key {
        KeyCode::Esc => {
            app.search = None;
        }
        KeyCode::Backspace => {
            query.pop();
        }
        KeyCode::Char(ch) => {
            query.push(ch);
        }
        KeyCode::Enter => {
            let query = app.search.take().unwrap_or_default();
            match best_match(app.focused_control(), &query) {
                Some(index) => app.select_focused(index),
                None => {
                    app.status_message = format!("No {} matches '{query}'", app.focus.as_str());
                }
            }
        }
        _ => {}
    }
}
