//! Plain-text rendering of chart specs for the headless report.

use crate::format::{format_optional, format_thousands};

use super::spec::{
    BarSpec, BubbleSpec, ChartSpec, IndicatorSpec, LineSpec, MapSpec, MapStyle, RadarSpec,
    TreemapSpec, ValuesTable,
};

/// Rows listed per chart before the rest is summarised.
pub const MAX_ROWS: usize = 10;

fn truncated<I>(rows: I, total: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut lines: Vec<String> = rows.into_iter().take(MAX_ROWS).collect();
    if total > MAX_ROWS {
        lines.push(format!("... {} more", total - MAX_ROWS));
    }
    lines
}

fn describe_map(spec: &MapSpec) -> Vec<String> {
    let mut lines = vec![format!(
        "{} regions, max {}",
        spec.regions.len(),
        format_optional(spec.max_value)
    )];
    if let Some(region) = spec.selected_region() {
        let marker = match (spec.style, region.marker_size) {
            (MapStyle::Bubble, Some(size)) => format!(", marker {size:.1}"),
            _ => String::new(),
        };
        lines.push(format!(
            "selected {}: {} tonnes{marker}",
            region.name,
            format_optional(region.value)
        ));
    }

    let mut ranked: Vec<_> = spec.regions.iter().filter(|r| r.value.is_some()).collect();
    ranked.sort_by(|a, b| b.value.unwrap_or(0.0).total_cmp(&a.value.unwrap_or(0.0)));
    let total = ranked.len();
    lines.extend(truncated(
        ranked
            .into_iter()
            .map(|region| format!("{}: {}", region.name, format_optional(region.value))),
        total,
    ));
    lines
}

fn describe_bar(spec: &BarSpec) -> Vec<String> {
    let names: Vec<String> = spec
        .series
        .iter()
        .map(|series| series.name.clone().unwrap_or_default())
        .collect();
    let rows = spec.categories.iter().enumerate().map(|(index, category)| {
        let values: Vec<String> = spec
            .series
            .iter()
            .zip(&names)
            .map(|(series, name)| {
                let value = format_optional(series.values.get(index).copied().flatten());
                if name.is_empty() {
                    value
                } else {
                    format!("{name} {value}")
                }
            })
            .collect();
        format!("{category}: {}", values.join(", "))
    });
    truncated(rows, spec.categories.len())
}

fn describe_lines(spec: &LineSpec) -> Vec<String> {
    let rows = spec.series.iter().map(|series| {
        let latest = series.points.iter().rev().find_map(|(x, y)| y.map(|y| (x, y)));
        match latest {
            Some((x, y)) => format!(
                "{}: {} points, latest {x} = {}",
                series.name,
                series.points.len(),
                format_thousands(y)
            ),
            None => format!("{}: no values", series.name),
        }
    });
    truncated(rows, spec.series.len())
}

fn describe_treemap(spec: &TreemapSpec) -> Vec<String> {
    let mut lines = vec![format!(
        "{} tiles under {}, total {}",
        spec.tiles.len(),
        spec.root,
        format_thousands(spec.total())
    )];
    lines.extend(truncated(
        spec.tiles.iter().map(|tile| {
            let share = spec
                .share(tile)
                .map(|share| format!(" ({:.1}%)", share * 100.0))
                .unwrap_or_default();
            format!("{}: {}{share}", tile.label, format_optional(tile.value))
        }),
        spec.tiles.len(),
    ));
    lines
}

fn describe_bubbles(spec: &BubbleSpec) -> Vec<String> {
    let mut ranked: Vec<_> = spec.bubbles.iter().collect();
    ranked.sort_by(|a, b| b.diameter.unwrap_or(0.0).total_cmp(&a.diameter.unwrap_or(0.0)));

    let mut lines = vec![format!("{} countries", spec.bubbles.len())];
    lines.extend(truncated(
        ranked.into_iter().map(|bubble| {
            let detail = bubble.details.get(1).cloned().unwrap_or_default();
            format!("{}: {detail}", bubble.label)
        }),
        spec.bubbles.len(),
    ));
    lines
}

fn describe_indicator(spec: &IndicatorSpec) -> Vec<String> {
    let mut lines = vec![format!("value: {}{}", format_optional(spec.value), spec.suffix)];
    if let Some(delta) = spec.delta() {
        lines.push(format!("delta vs mean - std: {}", format_thousands(delta)));
    }
    if let Some((low, high)) = spec.band {
        lines.push(format!(
            "band: {} - {}",
            format_thousands(low),
            format_thousands(high)
        ));
    }
    if let Some(subtitle) = &spec.subtitle {
        lines.push(subtitle.clone());
    }
    lines
}

fn describe_radar(spec: &RadarSpec) -> Vec<String> {
    spec.datasets
        .iter()
        .map(|dataset| {
            let points: Vec<String> = spec
                .labels
                .iter()
                .zip(&dataset.values)
                .map(|(label, value)| match value {
                    Some(percent) => format!("{label} {percent:.1}%"),
                    None => format!("{label} N/A"),
                })
                .collect();
            format!("{}: {}", dataset.label, points.join(", "))
        })
        .collect()
}

/// Text lines for a chart, title excluded.
pub fn describe_chart(spec: &ChartSpec) -> Vec<String> {
    match spec {
        ChartSpec::Map(spec) => describe_map(spec),
        ChartSpec::Bar(spec) => describe_bar(spec),
        ChartSpec::Lines(spec) => describe_lines(spec),
        ChartSpec::Treemap(spec) => describe_treemap(spec),
        ChartSpec::Bubble(spec) => describe_bubbles(spec),
        ChartSpec::Indicator(spec) => describe_indicator(spec),
        ChartSpec::Radar(spec) => describe_radar(spec),
    }
}

pub fn describe_table(table: &ValuesTable) -> Vec<String> {
    let mut lines = vec![format!(
        "Maximum production: {} tons",
        format_thousands(table.max_production)
    )];
    lines.extend(table.rows.iter().map(|row| {
        let percent = row
            .percent_of_max
            .map_or_else(|| "N/A".to_string(), |percent| format!("{percent:.1}%"));
        let marker = if row.highlight { " *" } else { "" };
        format!(
            "{}: {} tons ({percent}){marker}",
            row.region,
            format_thousands(row.production)
        )
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_bar_charts_are_truncated() {
        let categories: Vec<String> = (1990..2010).map(|year| year.to_string()).collect();
        let values = (0..20).map(|v| Some(f64::from(v) * 1000.0)).collect();
        let spec = BarSpec::single("t", categories, values, "#fff");

        let lines = describe_chart(&ChartSpec::Bar(spec));
        assert_eq!(lines.len(), MAX_ROWS + 1);
        assert_eq!(lines[1], "1991: 1,000");
        assert_eq!(lines[MAX_ROWS], "... 10 more");
    }

    #[test]
    fn grouped_bars_name_each_series() {
        let spec = BarSpec::new("Stats", vec!["Maize".to_string()])
            .series(Some("MEAN".to_string()), "#000", vec![Some(5.0)])
            .series(Some("STD".to_string()), "#000", vec![None]);

        assert_eq!(
            describe_chart(&ChartSpec::Bar(spec)),
            ["Maize: MEAN 5, STD N/A"]
        );
    }

    #[test]
    fn values_table_marks_selected_row() {
        let table = ValuesTable::new(
            200.0,
            vec![("China".to_string(), 200.0)],
            ("Kenya".to_string(), 50.0),
        );
        assert_eq!(
            describe_table(&table),
            [
                "Maximum production: 200 tons",
                "China: 200 tons (100.0%)",
                "Kenya: 50 tons (25.0%) *",
            ]
        );
    }
}
