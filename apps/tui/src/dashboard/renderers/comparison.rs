use crate::api::models::{Comparison, ComparisonReply};
use crate::api::{fetch_as, DataFetcher, FetchError};
use crate::charts::{ChartSpec, RadarDataset, RadarSpec, ValuesTable};
use crate::dashboard::slots::{SlotContent, SlotId};
use crate::domain::Dimension;
use crate::format::format_product_name;

use super::{cleared, RenderContext, RenderError, RendererKind, SlotUpdate};

const TOP_FILL: &str = "rgba(75, 192, 192, 0.15)";
const SELECTED_FILL: &str = "rgba(255, 99, 132, 0.15)";

fn radar(title: String, comparison: &Comparison) -> RadarSpec {
    RadarSpec {
        title,
        labels: comparison.labels.clone(),
        datasets: comparison
            .datasets
            .iter()
            .enumerate()
            .map(|(index, dataset)| RadarDataset {
                label: dataset.label.clone(),
                values: dataset.data.clone(),
                border_color: dataset.border_color.clone(),
                fill_color: if index == 0 { TOP_FILL } else { SELECTED_FILL }.to_string(),
            })
            .collect(),
        max_production: comparison.actual_values.max_production,
    }
}

fn values_table(comparison: &Comparison) -> ValuesTable {
    let actual = &comparison.actual_values;
    ValuesTable::new(
        actual.max_production,
        actual
            .top_producers
            .iter()
            .map(|entry| (entry.region.clone(), entry.production)),
        (
            actual.selected_country.region.clone(),
            actual.selected_country.production,
        ),
    )
}

/// The API answers 400/404 with an `{error}` body; keep its reason.
fn rejected(error: FetchError) -> RenderError {
    match (error.status(), error.server_message()) {
        (Some(status), Some(message)) => {
            RenderError::Api(format!("API request failed: {status} - {message}"))
        }
        _ => RenderError::Fetch(error),
    }
}

/// Radar of the selected country against the top producers, plus the table
/// of absolute values behind the percentages.
pub(super) async fn render_comparison<F: DataFetcher>(
    ctx: &RenderContext,
    fetcher: &F,
    canvas_available: bool,
) -> Result<Vec<SlotUpdate>, RenderError> {
    let filters = &ctx.filters;
    let (Some(country), Some(year), Some(product)) = (
        filters.selected(Dimension::Country),
        filters.selected(Dimension::Year),
        filters.selected(Dimension::Product),
    ) else {
        tracing::debug!("comparison needs country, year and product");
        return Ok(cleared(RendererKind::Comparison.slots()));
    };

    let url = ctx.api.compare(country, year, product);
    let reply: ComparisonReply = fetch_as(fetcher, &url).await.map_err(rejected)?;
    let comparison = match reply {
        ComparisonReply::Failed { error } => return Err(RenderError::Api(error)),
        ComparisonReply::Compared(comparison) => comparison,
    };

    if !canvas_available {
        return Err(RenderError::MissingCanvas);
    }

    let title = format!(
        "{} Production Comparison ({year})",
        format_product_name(product)
    );

    Ok(vec![
        (
            SlotId::Radar,
            SlotContent::Chart(ChartSpec::Radar(radar(title, &comparison))),
        ),
        (SlotId::Values, SlotContent::Table(values_table(&comparison))),
    ])
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::dashboard::renderers::run;
    use crate::dashboard::renderers::test_support::{context, ScriptedFetcher};
    use crate::dashboard::slots::SlotBoard;
    use crate::domain::FilterState;

    const COMPARE: &str = "/api/data/compare/Kenya/2020/Maize_Production";

    fn comparison_body() -> Value {
        json!({
            "labels": ["China", "India", "Kenya"],
            "datasets": [
                {"label": "Top Global Producers", "data": [100.0, 50.0, 0], "borderColor": "rgb(75, 192, 192)"},
                {"label": "Kenya", "data": [0, 0, 12.5], "borderColor": "rgb(255, 99, 132)"}
            ],
            "actual_values": {
                "max_production": 400.0,
                "top_producers": [
                    {"region": "China", "production": 400.0},
                    {"region": "India", "production": 200.0}
                ],
                "selected_country": {"region": "Kenya", "production": 50.0}
            }
        })
    }

    fn filters() -> FilterState {
        FilterState::new("Kenya", "2020", "Maize_Production")
    }

    #[tokio::test]
    async fn publishes_radar_and_values_table() {
        let board = SlotBoard::new();
        let fetcher = ScriptedFetcher::new().json(COMPARE, comparison_body());
        let ctx = context(filters(), &board);

        run(RendererKind::Comparison, &ctx, &fetcher, &board).await;

        let SlotContent::Chart(ChartSpec::Radar(spec)) = board.content(SlotId::Radar) else {
            panic!("expected a radar");
        };
        assert_eq!(spec.title, "Maize Production Production Comparison (2020)");
        assert_eq!(spec.datasets[0].fill_color, TOP_FILL);
        assert_eq!(spec.datasets[1].fill_color, SELECTED_FILL);
        assert!((spec.actual_value(12.5) - 50.0).abs() < f64::EPSILON);

        let SlotContent::Table(table) = board.content(SlotId::Values) else {
            panic!("expected the values table");
        };
        let regions: Vec<_> = table.rows.iter().map(|row| row.region.as_str()).collect();
        assert_eq!(regions, ["China", "India", "Kenya"]);
        assert_eq!(table.rows[2].percent_of_max, Some(12.5));
        assert!(table.rows[2].highlight);
    }

    #[tokio::test]
    async fn error_body_is_a_failure() {
        let board = SlotBoard::new();
        let fetcher =
            ScriptedFetcher::new().json(COMPARE, json!({"error": "Invalid product type"}));
        let ctx = context(filters(), &board);

        run(RendererKind::Comparison, &ctx, &fetcher, &board).await;

        assert_eq!(
            board.content(SlotId::Radar),
            SlotContent::Error("Error loading comparison: Invalid product type".to_string())
        );
    }

    #[tokio::test]
    async fn rejected_request_shows_the_server_reason() {
        let board = SlotBoard::new();
        let fetcher = ScriptedFetcher::new().status_with_body(
            COMPARE,
            404,
            r#"{"error": "No data found for selected country/year"}"#,
        );
        let ctx = context(filters(), &board);

        run(RendererKind::Comparison, &ctx, &fetcher, &board).await;

        assert_eq!(
            board.content(SlotId::Radar),
            SlotContent::Error(
                "Error loading comparison: API request failed: 404 Not Found - \
                 No data found for selected country/year"
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn failure_clears_values_from_an_earlier_pass() {
        let board = SlotBoard::new();
        let fetcher = ScriptedFetcher::new().json(COMPARE, comparison_body());
        let ctx = context(filters(), &board);
        run(RendererKind::Comparison, &ctx, &fetcher, &board).await;
        assert!(matches!(board.content(SlotId::Values), SlotContent::Table(_)));

        let fetcher = ScriptedFetcher::new().status(COMPARE, 500);
        let ctx = context(filters(), &board);
        run(RendererKind::Comparison, &ctx, &fetcher, &board).await;

        assert!(matches!(board.content(SlotId::Radar), SlotContent::Error(_)));
        assert_eq!(board.content(SlotId::Values), SlotContent::Empty);
    }

    #[tokio::test]
    async fn missing_canvas_fails_inline() {
        let board = SlotBoard::without_radar_canvas();
        let fetcher = ScriptedFetcher::new().json(COMPARE, comparison_body());
        let ctx = context(filters(), &board);

        run(RendererKind::Comparison, &ctx, &fetcher, &board).await;

        assert_eq!(
            board.content(SlotId::Radar),
            SlotContent::Error(
                "Error loading comparison: radar chart canvas is not available".to_string()
            )
        );
        assert_eq!(board.content(SlotId::Values), SlotContent::Empty);
    }

    #[tokio::test]
    async fn needs_all_three_filters() {
        let board = SlotBoard::new();
        let fetcher = ScriptedFetcher::new();
        let ctx = context(FilterState::new("Kenya", "", "Maize_Production"), &board);

        run(RendererKind::Comparison, &ctx, &fetcher, &board).await;

        assert!(fetcher.requests().is_empty());
        assert_eq!(board.content(SlotId::Radar), SlotContent::Empty);
    }

    #[tokio::test]
    async fn rerender_replaces_the_radar_instance() {
        let board = SlotBoard::new();
        let fetcher = ScriptedFetcher::new().json(COMPARE, comparison_body());

        for _ in 0..2 {
            let ctx = context(filters(), &board);
            run(RendererKind::Comparison, &ctx, &fetcher, &board).await;
        }

        let instance = board.entry(SlotId::Radar).and_then(|entry| entry.radar_instance);
        assert_eq!(instance, Some(2));
    }
}
