use crate::api::models::MapPoint;
use crate::api::{fetch_as, DataFetcher};
use crate::charts::{ChartSpec, MapSpec};
use crate::dashboard::slots::{SlotContent, SlotId};
use crate::domain::Dimension;
use crate::format::format_product_name;

use super::{cleared, RenderContext, RenderError, RendererKind, SlotUpdate};

/// Choropleth plus bubble map for one year and product.
pub(super) async fn render_map<F: DataFetcher>(
    ctx: &RenderContext,
    fetcher: &F,
) -> Result<Vec<SlotUpdate>, RenderError> {
    let filters = &ctx.filters;
    let (Some(year), Some(product)) = (
        filters.selected(Dimension::Year),
        filters.selected(Dimension::Product),
    ) else {
        return Ok(cleared(RendererKind::Map.slots()));
    };

    let points: Vec<MapPoint> = fetch_as(fetcher, &ctx.api.map(year, product)).await?;
    let highlight = filters.selected(Dimension::Country);
    let pairs = || points.iter().map(|point| (point.entity.clone(), point.value));

    let choropleth = MapSpec::choropleth(
        format!(
            "Global {} Production ({year})",
            format_product_name(product)
        ),
        pairs(),
        highlight,
    );
    let bubbles = MapSpec::bubbles(
        format!("Production Intensity ({year})"),
        pairs(),
        highlight,
    );

    Ok(vec![
        (SlotId::Map, SlotContent::Chart(ChartSpec::Map(choropleth))),
        (SlotId::BubbleMap, SlotContent::Chart(ChartSpec::Map(bubbles))),
    ])
}
