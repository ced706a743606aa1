use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use serde::Serialize;
use std::io::Stdout;

use crate::api::DataFetcher;
use crate::app::{handle_input, App};
use crate::charts::{describe_chart, describe_table};
use crate::dashboard::{BoardSnapshot, PassSummary, SlotContent, SlotId};
use crate::domain::{Dimension, FilterState};
use crate::ui;

/// Everything the headless run prints.
#[derive(Debug, Serialize)]
pub struct HeadlessReport {
    pub filters: FilterState,
    pub unmatched: Vec<Dimension>,
    pub pass: PassSummary,
    pub board: BoardSnapshot,
}

/// Run the dashboard once without a UI: startup, one pass for the command
/// line filters, then print the board.
pub async fn run_headless<F: DataFetcher>(app: &mut App<F>, json: bool) -> Result<()> {
    let report = build_report(app).await;

    if json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{json}");
    } else {
        render_headless_text(&report);
    }

    Ok(())
}

pub async fn build_report<F: DataFetcher>(app: &mut App<F>) -> HeadlessReport {
    let lists = app.actions.startup().await;
    lists.apply(&mut app.controls);

    let requested = std::mem::take(&mut app.initial_filters);
    let unmatched: Vec<Dimension> = Dimension::ALL
        .into_iter()
        .filter(|&dimension| {
            let value = requested.get(dimension);
            !value.is_empty() && !app.controls.control_mut(dimension).select_value(value)
        })
        .collect();
    for dimension in &unmatched {
        tracing::warn!(
            dimension = dimension.as_str(),
            value = requested.get(*dimension),
            "filter value not offered by the API"
        );
    }

    let filters = app.filter_state();
    let pass = app.actions.run_pass(filters.clone());
    let summary = pass.summary();
    pass.join().await;

    HeadlessReport {
        filters,
        unmatched,
        pass: summary,
        board: app.actions.snapshot(),
    }
}

fn render_headless_text(report: &HeadlessReport) {
    println!("\nCrop Production Dashboard");
    println!("=========================");
    for dimension in Dimension::ALL {
        let value = report.filters.get(dimension);
        println!(
            "{}: {}",
            dimension.label(),
            if value.is_empty() { "(none)" } else { value }
        );
    }
    for dimension in &report.unmatched {
        println!("Unknown {}: {}", dimension.as_str(), report.filters.get(*dimension));
    }
    println!(
        "Pass {}: {}",
        report.pass.generation,
        report
            .pass
            .invoked
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    for slot in SlotId::ALL {
        let Some(entry) = report.board.slots.get(&slot) else {
            continue;
        };
        let (title, lines) = match &entry.content {
            SlotContent::Empty => continue,
            SlotContent::Chart(spec) => (spec.title().to_string(), describe_chart(spec)),
            SlotContent::Table(table) => (slot.caption().to_string(), describe_table(table)),
            SlotContent::Error(message) => (slot.caption().to_string(), vec![message.clone()]),
        };
        println!("\n[{}] {title}", slot.container_id());
        for line in lines {
            println!("  {line}");
        }
    }
}

/// Run the main application event loop
pub async fn run<F: DataFetcher>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<F>,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    app.start();

    loop {
        // Update animations and pick up startup results
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }

        // Let spawned renderers make progress between frames
        tokio::task::yield_now().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::app::test_app;
    use crate::dashboard::renderers::test_support::ScriptedFetcher;
    use crate::dashboard::RendererKind;

    #[tokio::test]
    async fn headless_report_runs_the_command_line_filters() {
        let fetcher = ScriptedFetcher::new()
            .json("/api/countries", json!(["Kenya"]))
            .json("/api/years", json!([2020]))
            .json("/api/products", json!(["Maize_Production"]));
        let mut app = test_app(fetcher);
        app.initial_filters = FilterState::new("Atlantis", "2020", "");

        let report = build_report(&mut app).await;

        assert_eq!(report.filters, FilterState::new("", "2020", ""));
        assert_eq!(report.unmatched, [Dimension::Country]);
        assert_eq!(report.pass.generation, 2);
        assert_eq!(
            report.pass.invoked,
            [
                RendererKind::Map,
                RendererKind::Decade,
                RendererKind::Yearly,
                RendererKind::TopProducers,
            ]
        );
        assert!(report.board.slots[&SlotId::Yearly].content.is_error());
        assert_eq!(report.board.slots[&SlotId::Map].content, SlotContent::Empty);
        assert!(!report.board.slots.contains_key(&SlotId::Trend));
    }
}
