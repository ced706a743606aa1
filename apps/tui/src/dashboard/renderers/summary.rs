//! Decade, yearly and statistics charts, plus the fixed overview versions
//! drawn once at startup.

use crate::api::models::{
    lenient_f64, scalar_matches, scalar_text, DynamicRecord, ProductStats, StatsSummary,
};
use crate::api::{fetch_as, ApiBase, DataFetcher};
use crate::charts::{BarSpec, ChartSpec, IndicatorSpec, LineSpec};
use crate::dashboard::slots::{ChartSink, SlotContent, SlotId};
use crate::domain::Dimension;
use crate::format::{format_optional, format_product_name};

use super::{cleared, RenderContext, RenderError, RendererKind, SlotUpdate};

const DECADE_COLOR: &str = "#ffa500";
const YEARLY_COLOR: &str = "#5cb85c";
const OVERVIEW_TREND_COLOR: &str = "#FF9F1C";

/// Crops drawn in the startup decade overview, with their bar colors.
const OVERVIEW_CROPS: [(&str, &str); 3] = [
    ("Maize", "#1f77b4"),
    ("Rice", "#2ca02c"),
    ("Wheat", "#d62728"),
];

const OVERVIEW_STATS: [(&str, &str); 2] = [("MEAN", "#636efa"), ("STD", "#ef553b")];

fn decade_label(record: &DynamicRecord) -> String {
    record.get("decade").map(scalar_text).unwrap_or_default()
}

pub(super) async fn render_decade<F: DataFetcher>(
    ctx: &RenderContext,
    fetcher: &F,
) -> Result<Vec<SlotUpdate>, RenderError> {
    let Some(product) = ctx.filters.selected(Dimension::Product) else {
        return Ok(cleared(RendererKind::Decade.slots()));
    };

    let records: Vec<DynamicRecord> =
        fetch_as(fetcher, &ctx.api.decade_for_product(product)).await?;
    let spec = BarSpec::single(
        format!("Decadal Production of {product}"),
        records.iter().map(decade_label).collect(),
        records.iter().map(|record| record.number("production")).collect(),
        DECADE_COLOR,
    )
    .axes("Decade", "Average Production");

    Ok(vec![(SlotId::Decade, SlotContent::Chart(ChartSpec::Bar(spec)))])
}

pub(super) async fn render_yearly<F: DataFetcher>(
    ctx: &RenderContext,
    fetcher: &F,
) -> Result<Vec<SlotUpdate>, RenderError> {
    let Some(year) = ctx.filters.selected(Dimension::Year) else {
        return Ok(cleared(RendererKind::Yearly.slots()));
    };

    let records: Vec<DynamicRecord> = fetch_as(fetcher, &ctx.api.yearly()).await?;
    let record = records
        .iter()
        .find(|record| {
            record
                .get("Year")
                .is_some_and(|value| scalar_matches(value, year))
        })
        .ok_or_else(|| RenderError::Shape(format!("no data found for {year}")))?;

    let (labels, values): (Vec<String>, Vec<Option<f64>>) = record
        .series_fields()
        .map(|(key, value)| (key.clone(), lenient_f64(value)))
        .unzip();

    let spec = BarSpec::single(
        format!("Production in {year} by Product"),
        labels,
        values,
        YEARLY_COLOR,
    )
    .axes("Product", "Production (tonnes)");

    Ok(vec![(SlotId::Yearly, SlotContent::Chart(ChartSpec::Bar(spec)))])
}

fn stats_indicator(product: &str, stats: &ProductStats) -> IndicatorSpec {
    let reference = stats.mean.zip(stats.std).map(|(mean, std)| mean - std);
    let band = stats.lower_bound.zip(stats.upper_bound);

    IndicatorSpec {
        title: format!("{} Stats", format_product_name(product)),
        subtitle: Some(format!(
            "Range: {} - {} tonnes",
            format_optional(stats.min),
            format_optional(stats.max)
        )),
        value: stats.mean,
        reference,
        band,
        suffix: " tonnes".to_string(),
    }
}

pub(super) async fn render_stats<F: DataFetcher>(
    ctx: &RenderContext,
    fetcher: &F,
) -> Result<Vec<SlotUpdate>, RenderError> {
    let Some(product) = ctx.filters.selected(Dimension::Product) else {
        return Ok(cleared(RendererKind::Stats.slots()));
    };

    let stats: ProductStats = fetch_as(fetcher, &ctx.api.stats_for_product(product)).await?;
    let spec = stats_indicator(product, &stats);

    Ok(vec![(SlotId::Stats, SlotContent::Chart(ChartSpec::Indicator(spec)))])
}

fn decade_overview(records: &[DynamicRecord]) -> BarSpec {
    let categories = records.iter().map(decade_label).collect();
    OVERVIEW_CROPS
        .iter()
        .fold(
            BarSpec::new("Decadal Production Trends", categories),
            |spec, (crop, color)| {
                let values = records.iter().map(|record| record.number(crop)).collect();
                spec.series(Some((*crop).to_string()), color, values)
            },
        )
        .axes("Decade", "Tonnes")
}

fn yearly_overview(records: &[DynamicRecord]) -> LineSpec {
    let points = records
        .iter()
        .filter_map(|record| {
            let year = record.year().and_then(lenient_f64)?;
            Some((year, record.number("Maize")))
        })
        .collect();

    LineSpec::new("Global Maize Production Trend", "Year", "Tonnes").series(
        "Maize Production",
        Some(OVERVIEW_TREND_COLOR),
        points,
    )
}

fn stats_overview(summary: &StatsSummary) -> BarSpec {
    let entries = summary.entries();
    let categories = entries
        .iter()
        .map(|(name, _)| format_product_name(name))
        .collect();
    let column = |pick: fn(&ProductStats) -> Option<f64>| {
        entries
            .iter()
            .map(|(_, stats)| Some(pick(stats).unwrap_or(0.0)))
            .collect::<Vec<_>>()
    };

    let [(mean_name, mean_color), (std_name, std_color)] = OVERVIEW_STATS;
    BarSpec::new("Production Statistics", categories)
        .series(Some(mean_name.to_string()), mean_color, column(|s| s.mean))
        .series(Some(std_name.to_string()), std_color, column(|s| s.std))
        .axes("Product", "Value")
}

fn overview_content<T>(
    result: Result<T, RenderError>,
    chart: impl FnOnce(T) -> ChartSpec,
    what: &str,
) -> SlotContent {
    match result {
        Ok(data) => SlotContent::Chart(chart(data)),
        Err(error) => {
            tracing::error!(%error, "fixed {what} chart failed");
            SlotContent::Error(format!("Failed to load {what} data: {error}"))
        }
    }
}

/// Fetches the all-products decade, yearly and statistics summaries
/// concurrently and draws the overview charts. Each chart fails on its own.
pub async fn initialize_fixed_charts<F, S>(api: &ApiBase, fetcher: &F, sink: &S)
where
    F: DataFetcher,
    S: ChartSink,
{
    let generation = sink.current_generation();
    sink.renderer_started();

    let decade_url = api.decade_summary();
    let yearly_url = api.yearly();
    let stats_url = api.stats_summary();
    let (decade, yearly, stats) = tokio::join!(
        fetch_as::<Vec<DynamicRecord>, _>(fetcher, &decade_url),
        fetch_as::<Vec<DynamicRecord>, _>(fetcher, &yearly_url),
        fetch_as::<StatsSummary, _>(fetcher, &stats_url),
    );

    let updates = [
        (
            SlotId::Decade,
            overview_content(
                decade.map_err(RenderError::from),
                |records| ChartSpec::Bar(decade_overview(&records)),
                "decade",
            ),
        ),
        (
            SlotId::Yearly,
            overview_content(
                yearly.map_err(RenderError::from),
                |records| ChartSpec::Lines(yearly_overview(&records)),
                "yearly",
            ),
        ),
        (
            SlotId::Stats,
            overview_content(
                stats.map_err(RenderError::from),
                |summary| ChartSpec::Bar(stats_overview(&summary)),
                "statistics",
            ),
        ),
    ];

    for (slot, content) in updates {
        sink.publish(slot, content, generation);
    }
    sink.renderer_finished();
}
