use crate::api::models::{BubbleRecord, TopProducer};
use crate::api::{fetch_as, DataFetcher};
use crate::charts::{BarSpec, BubbleSpec, ChartSpec};
use crate::dashboard::slots::{SlotContent, SlotId};
use crate::domain::Dimension;
use crate::format::{format_optional, format_product_name, format_thousands};

use super::{RenderContext, RenderError, SlotUpdate};

const TOP_PRODUCERS_COLOR: &str = "rgba(55, 128, 191, 0.7)";

fn bubble_details(record: &BubbleRecord) -> Vec<String> {
    let mut lines = vec![
        record.country.clone(),
        format!(
            "Total Production: {} tonnes",
            format_optional(record.total_production)
        ),
        "Top Crops:".to_string(),
    ];

    match &record.top_crops {
        Some(crops) => lines.extend(crops.iter().map(|crop| {
            format!("{}: {} tonnes", crop.name, format_optional(crop.value))
        })),
        None => lines.push("No detailed data".to_string()),
    }

    lines.push(match record.area_harvested {
        Some(area) if area != 0.0 => format!("Area Harvested: {} hectares", format_thousands(area)),
        _ => "Area Harvested: N/A".to_string(),
    });
    lines.push(match record.crop_yield {
        Some(value) if value != 0.0 => format!("Yield: {value:.2} tonnes/hectare"),
        _ => "Yield: N/A".to_string(),
    });

    lines
}

/// Every country as a bubble sized by total production.
pub(super) async fn render_bubble<F: DataFetcher>(
    ctx: &RenderContext,
    fetcher: &F,
) -> Result<Vec<SlotUpdate>, RenderError> {
    let records: Vec<BubbleRecord> = fetch_as(fetcher, &ctx.api.bubble()).await?;

    let spec = BubbleSpec::spiral(
        "Total Crop Production by Country",
        records.iter().map(|record| {
            (
                record.country.clone(),
                record.total_production,
                bubble_details(record),
            )
        }),
    );

    Ok(vec![(SlotId::Bubble, SlotContent::Chart(ChartSpec::Bubble(spec)))])
}

/// Ranked regions for the selected product, or the fallback product.
pub(super) async fn render_top_producers<F: DataFetcher>(
    ctx: &RenderContext,
    fetcher: &F,
) -> Result<Vec<SlotUpdate>, RenderError> {
    let crop_type = ctx
        .filters
        .selected(Dimension::Product)
        .unwrap_or(&ctx.fallback_product);

    let producers: Vec<TopProducer> = fetch_as(fetcher, &ctx.api.top_producers(crop_type)).await?;
    let spec = BarSpec::single(
        format!("Top Producers: {}", format_product_name(crop_type)),
        producers.iter().map(|producer| producer.region.clone()).collect(),
        producers.iter().map(|producer| producer.production_value).collect(),
        TOP_PRODUCERS_COLOR,
    )
    .axes("Production (tonnes)", "Region")
    .horizontal();

    Ok(vec![(SlotId::TopProducers, SlotContent::Chart(ChartSpec::Bar(spec)))])
}
