use crate::api::models::{lenient_f64, scalar_text, DynamicRecord, TrendPoint};
use crate::api::{fetch_as, DataFetcher};
use crate::charts::{BarSpec, ChartSpec, LineSpec, TreemapSpec, TreemapTile};
use crate::dashboard::slots::{SlotContent, SlotId};
use crate::domain::Dimension;
use crate::format::format_product_name;

use super::{cleared, RenderContext, RenderError, RendererKind, SlotUpdate};

const BAR_COLOR: &str = "#51b7e0";
const TONNES_SUFFIX: &str = " Production (tonnes)";

async fn country_product_trend<F: DataFetcher>(
    ctx: &RenderContext,
    fetcher: &F,
    country: &str,
    product: &str,
) -> Result<Vec<TrendPoint>, RenderError> {
    Ok(fetch_as(fetcher, &ctx.api.trend(country, product)).await?)
}

/// Treemap of yearly production, one tile per year under the product.
pub(super) async fn render_trend<F: DataFetcher>(
    ctx: &RenderContext,
    fetcher: &F,
) -> Result<Vec<SlotUpdate>, RenderError> {
    let filters = &ctx.filters;
    let (Some(country), Some(product)) = (
        filters.selected(Dimension::Country),
        filters.selected(Dimension::Product),
    ) else {
        return Ok(cleared(RendererKind::Trend.slots()));
    };

    let points = country_product_trend(ctx, fetcher, country, product).await?;
    let spec = TreemapSpec {
        title: format!(
            "{country} Production Trend for {}",
            format_product_name(product)
        ),
        root: product.to_string(),
        tiles: points
            .iter()
            .map(|point| TreemapTile {
                label: scalar_text(&point.year),
                value: point.production,
            })
            .collect(),
    };

    Ok(vec![(SlotId::Trend, SlotContent::Chart(ChartSpec::Treemap(spec)))])
}

/// Vertical bars, year to production.
pub(super) async fn render_bar<F: DataFetcher>(
    ctx: &RenderContext,
    fetcher: &F,
) -> Result<Vec<SlotUpdate>, RenderError> {
    let filters = &ctx.filters;
    let (Some(country), Some(product)) = (
        filters.selected(Dimension::Country),
        filters.selected(Dimension::Product),
    ) else {
        return Ok(cleared(RendererKind::Bar.slots()));
    };

    let points = country_product_trend(ctx, fetcher, country, product).await?;
    let spec = BarSpec::single(
        format!("{} Production in {country}", format_product_name(product)),
        points.iter().map(|point| scalar_text(&point.year)).collect(),
        points.iter().map(|point| point.production).collect(),
        BAR_COLOR,
    )
    .axes("Year", "Production (tonnes)");

    Ok(vec![(SlotId::Bar, SlotContent::Chart(ChartSpec::Bar(spec)))])
}

/// Series name for a country-trend column: `"Maize Production (tonnes)"`
/// reads as `"Maize"`.
fn series_name(key: &str) -> String {
    format_product_name(&key.replacen(TONNES_SUFFIX, "", 1))
}

/// One line per product column of the country's multi-product history.
pub(super) async fn render_scatter<F: DataFetcher>(
    ctx: &RenderContext,
    fetcher: &F,
) -> Result<Vec<SlotUpdate>, RenderError> {
    let Some(country) = ctx.filters.selected(Dimension::Country) else {
        return Ok(cleared(RendererKind::Scatter.slots()));
    };

    let records: Vec<DynamicRecord> = fetch_as(fetcher, &ctx.api.country_trends(country)).await?;
    let first = records
        .first()
        .ok_or_else(|| RenderError::Shape(format!("no production history for {country}")))?;

    // records without a numeric year cannot be placed on the axis
    let years: Vec<Option<f64>> = records
        .iter()
        .map(|record| record.year().and_then(lenient_f64))
        .collect();

    let spec = first.series_fields().fold(
        LineSpec::new(
            format!("Production Trends for {country}"),
            "Year",
            "Production (tonnes)",
        ),
        |spec, (key, _)| {
            let points = records
                .iter()
                .zip(&years)
                .filter_map(|(record, year)| year.map(|year| (year, record.number(key))))
                .collect();
            spec.series(series_name(key), None, points)
        },
    );

    Ok(vec![(SlotId::Scatter, SlotContent::Chart(ChartSpec::Lines(spec)))])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dashboard::renderers::run;
    use crate::dashboard::renderers::test_support::{context, ScriptedFetcher};
    use crate::dashboard::slots::SlotBoard;
    use crate::domain::FilterState;

    fn trend_fetcher() -> ScriptedFetcher {
        ScriptedFetcher::new().json(
            "/api/trend/Kenya/Maize_Production",
            json!([
                {"Year": 2000, "production": 10.0},
                {"Year": "2001", "production": null},
                {"Year": 2002, "production": 30.0}
            ]),
        )
    }

    #[tokio::test]
    async fn treemap_tiles_hang_off_the_product() {
        let board = SlotBoard::new();
        let fetcher = trend_fetcher();
        let ctx = context(FilterState::new("Kenya", "", "Maize_Production"), &board);

        run(RendererKind::Trend, &ctx, &fetcher, &board).await;

        let SlotContent::Chart(ChartSpec::Treemap(spec)) = board.content(SlotId::Trend) else {
            panic!("expected a treemap");
        };
        assert_eq!(spec.title, "Kenya Production Trend for Maize Production");
        assert_eq!(spec.root, "Maize_Production");
        let labels: Vec<_> = spec.tiles.iter().map(|tile| tile.label.as_str()).collect();
        assert_eq!(labels, ["2000", "2001", "2002"]);
        assert_eq!(spec.tiles[1].value, None);
        assert!((spec.total() - 40.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn bar_chart_keeps_gaps() {
        let board = SlotBoard::new();
        let fetcher = trend_fetcher();
        let ctx = context(FilterState::new("Kenya", "", "Maize_Production"), &board);

        run(RendererKind::Bar, &ctx, &fetcher, &board).await;

        let SlotContent::Chart(ChartSpec::Bar(spec)) = board.content(SlotId::Bar) else {
            panic!("expected bars");
        };
        assert_eq!(spec.title, "Maize Production Production in Kenya");
        assert_eq!(spec.series[0].values, [Some(10.0), None, Some(30.0)]);
        assert_eq!(spec.series[0].color, BAR_COLOR);
        assert_eq!(spec.max_value(), Some(30.0));
    }

    #[tokio::test]
    async fn country_with_spaces_is_one_path_segment() {
        let board = SlotBoard::new();
        let fetcher = ScriptedFetcher::new();
        let ctx = context(
            FilterState::new("Trinidad and Tobago", "", "Maize_Production"),
            &board,
        );

        run(RendererKind::Bar, &ctx, &fetcher, &board).await;

        assert!(fetcher.requested("/api/trend/Trinidad%20and%20Tobago/Maize_Production"));
    }

    #[tokio::test]
    async fn scatter_draws_one_series_per_product() {
        let board = SlotBoard::new();
        let fetcher = ScriptedFetcher::new().json(
            "/api/country-trends/Kenya",
            json!([
                {"Year": 1990, "Maize Production (tonnes)": 5.0, "Rice_Production": 1.0},
                {"Year": 1991, "Maize Production (tonnes)": 6.0, "Rice_Production": null}
            ]),
        );
        let ctx = context(FilterState::new("Kenya", "", ""), &board);

        run(RendererKind::Scatter, &ctx, &fetcher, &board).await;

        let SlotContent::Chart(ChartSpec::Lines(spec)) = board.content(SlotId::Scatter) else {
            panic!("expected lines");
        };
        assert_eq!(spec.title, "Production Trends for Kenya");
        let names: Vec<_> = spec.series.iter().map(|series| series.name.as_str()).collect();
        assert_eq!(names, ["Maize", "Rice Production"]);
        assert_eq!(spec.series[1].points, [(1990.0, Some(1.0)), (1991.0, None)]);
    }

    #[tokio::test]
    async fn scatter_rejects_empty_history() {
        let board = SlotBoard::new();
        let fetcher = ScriptedFetcher::new().json("/api/country-trends/Kenya", json!([]));
        let ctx = context(FilterState::new("Kenya", "", ""), &board);

        run(RendererKind::Scatter, &ctx, &fetcher, &board).await;

        assert_eq!(
            board.content(SlotId::Scatter),
            SlotContent::Error(
                "Error loading multi-line data: no production history for Kenya".to_string()
            )
        );
    }

    #[test]
    fn series_names_drop_the_tonnes_suffix() {
        assert_eq!(series_name("Wheat Production (tonnes)"), "Wheat");
        assert_eq!(series_name("Potatoes_Production"), "Potatoes Production");
    }
}
