use crate::charts::{
    BarSpec, BubbleSpec, ChartSpec, IndicatorSpec, LineSpec, MapSpec, MapStyle, Orientation,
    TreemapSpec, ValuesTable,
};
use crate::dashboard::{SlotContent, SlotEntry, SlotId};
use crate::format::{format_compact, format_optional, format_thousands};
use crate::ui::widgets::palette::{color_or, scale_color, series_color};
use crate::ui::widgets::radar::render_radar_chart;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::canvas::{Canvas, Circle};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, LineGauge,
    Paragraph, Row, Table, Wrap,
};
use ratatui::Frame;

fn chart_block(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(title.into())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

/// Draws whatever the slot currently holds.
pub fn render_slot(f: &mut Frame<'_>, area: Rect, slot: SlotId, entry: Option<&SlotEntry>) {
    let content = entry.map_or(&SlotContent::Empty, |entry| &entry.content);
    match content {
        SlotContent::Empty => render_placeholder(f, area, slot),
        SlotContent::Error(message) => render_error(f, area, slot, message),
        SlotContent::Table(table) => render_values_table(f, area, table),
        SlotContent::Chart(spec) => match spec {
            ChartSpec::Map(spec) => render_map(f, area, spec),
            ChartSpec::Bar(spec) => render_bars(f, area, spec),
            ChartSpec::Lines(spec) => render_lines(f, area, spec),
            ChartSpec::Treemap(spec) => render_treemap(f, area, spec),
            ChartSpec::Bubble(spec) => render_bubbles(f, area, spec),
            ChartSpec::Indicator(spec) => render_indicator(f, area, spec),
            ChartSpec::Radar(spec) => {
                render_radar_chart(f, area, spec, entry.and_then(|entry| entry.radar_instance));
            }
        },
    }
}

fn render_placeholder(f: &mut Frame<'_>, area: Rect, slot: SlotId) {
    let paragraph = Paragraph::new("No data for the current selection")
        .block(chart_block(slot.caption()).border_style(Style::default().fg(Color::DarkGray)))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_error(f: &mut Frame<'_>, area: Rect, slot: SlotId, message: &str) {
    let paragraph = Paragraph::new(message.to_string())
        .block(chart_block(slot.caption()).border_style(Style::default().fg(Color::Red)))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Regions ranked by value; the selected region is kept in view.
fn render_map(f: &mut Frame<'_>, area: Rect, spec: &MapSpec) {
    let mut ranked: Vec<(usize, &crate::charts::MapRegion)> =
        spec.regions.iter().enumerate().collect();
    ranked.sort_by(|a, b| {
        b.1.value
            .unwrap_or(f64::NEG_INFINITY)
            .total_cmp(&a.1.value.unwrap_or(f64::NEG_INFINITY))
    });

    let visible = usize::from(area.height.saturating_sub(3)).max(1);
    let selected_rank = spec
        .selected
        .and_then(|selected| ranked.iter().position(|(index, _)| *index == selected))
        .unwrap_or(0);
    let offset = scroll_offset(ranked.len(), visible, selected_rank);
    let max = spec.max_value.unwrap_or(0.0);

    let rows = ranked
        .iter()
        .skip(offset)
        .take(visible)
        .map(|(index, region)| {
            let share = region.value.filter(|_| max > 0.0).map_or(0.0, |v| v / max);
            let color = scale_color((share * 100.0).round() as usize, 100);
            let scale = match (spec.style, region.marker_size) {
                (MapStyle::Bubble, Some(size)) => "●".repeat((size / 15.0).ceil() as usize),
                _ => "█".repeat((share * 12.0).ceil() as usize),
            };
            let style = if spec.selected == Some(*index) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(region.name.clone()),
                Cell::from(format_optional(region.value)),
                Cell::from(Span::styled(scale, Style::default().fg(color))),
            ])
            .style(style)
        });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ],
    )
    .header(
        Row::new(vec!["Country", "Tonnes", ""])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(chart_block(spec.title.clone()));

    f.render_widget(table, area);
}

fn bar_value(value: Option<f64>) -> u64 {
    value.filter(|v| v.is_finite() && *v > 0.0).map_or(0, |v| v.round() as u64)
}

fn render_bars(f: &mut Frame<'_>, area: Rect, spec: &BarSpec) {
    let direction = match spec.orientation {
        Orientation::Vertical => Direction::Vertical,
        Orientation::Horizontal => Direction::Horizontal,
    };
    let colors: Vec<Color> = spec
        .series
        .iter()
        .enumerate()
        .map(|(index, series)| color_or(Some(series.color.as_str()), series_color(index)))
        .collect();

    let groups: Vec<BarGroup<'_>> = if spec.series.len() == 1 {
        let bars: Vec<Bar<'_>> = spec
            .categories
            .iter()
            .zip(&spec.series[0].values)
            .map(|(category, value)| {
                Bar::default()
                    .value(bar_value(*value))
                    .label(TextLine::from(category.clone()))
                    .text_value(format_compact(value.unwrap_or(0.0)))
                    .style(Style::default().fg(colors[0]))
            })
            .collect();
        vec![BarGroup::default().bars(&bars)]
    } else {
        spec.categories
            .iter()
            .enumerate()
            .map(|(index, category)| {
                let bars: Vec<Bar<'_>> = spec
                    .series
                    .iter()
                    .zip(&colors)
                    .map(|(series, color)| {
                        let value = series.values.get(index).copied().flatten();
                        Bar::default()
                            .value(bar_value(value))
                            .text_value(format_compact(value.unwrap_or(0.0)))
                            .style(Style::default().fg(*color))
                    })
                    .collect();
                BarGroup::default()
                    .label(TextLine::from(category.clone()))
                    .bars(&bars)
            })
            .collect()
    };

    let mut title = spec.title.clone();
    let names: Vec<&str> = spec
        .series
        .iter()
        .filter_map(|series| series.name.as_deref())
        .collect();
    if !names.is_empty() {
        title = format!("{title} [{}]", names.join(" / "));
    }

    let mut chart = BarChart::default()
        .block(chart_block(title))
        .direction(direction)
        .bar_gap(1)
        .group_gap(2)
        .bar_width(if direction == Direction::Horizontal { 1 } else { 5 })
        .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    for group in groups {
        chart = chart.data(group);
    }

    f.render_widget(chart, area);
}

fn axis_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|value| Span::raw(format_compact(value)))
        .collect()
}

fn render_lines(f: &mut Frame<'_>, area: Rect, spec: &LineSpec) {
    let data: Vec<Vec<(f64, f64)>> = spec
        .series
        .iter()
        .map(|series| {
            series
                .points
                .iter()
                .filter_map(|(x, y)| y.map(|y| (*x, y)))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset<'_>> = spec
        .series
        .iter()
        .zip(&data)
        .enumerate()
        .map(|(index, (series, points))| {
            Dataset::default()
                .name(series.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color_or(series.color.as_deref(), series_color(index))))
                .data(points)
        })
        .collect();

    let x_bounds = spec.x_bounds().unwrap_or([0.0, 1.0]);
    let y_bounds = spec.y_bounds().map_or([0.0, 1.0], |[_, high]| [0.0, high.max(1.0)]);

    let chart = Chart::new(datasets)
        .block(chart_block(spec.title.clone()))
        .x_axis(
            Axis::default()
                .title(spec.x_title.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(
                    [x_bounds[0], x_bounds[1]]
                        .into_iter()
                        .map(|value| Span::raw(format!("{value:.0}"))),
                ),
        )
        .y_axis(
            Axis::default()
                .title(spec.y_title.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );

    f.render_widget(chart, area);
}

fn render_treemap(f: &mut Frame<'_>, area: Rect, spec: &TreemapSpec) {
    let width = usize::from(area.width.saturating_sub(30)).max(4);
    let count = spec.tiles.len().saturating_sub(1);
    let rows = spec.tiles.iter().enumerate().map(|(index, tile)| {
        let share = spec.share(tile).unwrap_or(0.0);
        Row::new(vec![
            Cell::from(tile.label.clone()),
            Cell::from(format_optional(tile.value)),
            Cell::from(Span::styled(
                "█".repeat((share * width as f64).round() as usize),
                Style::default().fg(scale_color(index, count)),
            )),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(16),
            Constraint::Min(4),
        ],
    )
    .header(
        Row::new(vec![spec.root.clone(), format_thousands(spec.total()), String::new()])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(chart_block(spec.title.clone()));

    f.render_widget(table, area);
}

fn render_bubbles(f: &mut Frame<'_>, area: Rect, spec: &BubbleSpec) {
    let max_index = spec
        .bubbles
        .iter()
        .map(|bubble| bubble.color_index)
        .max()
        .unwrap_or(0);

    let canvas = Canvas::default()
        .block(chart_block(spec.title.clone()))
        .marker(Marker::Braille)
        .x_bounds([0.0, 100.0])
        .y_bounds([0.0, 100.0])
        .paint(|ctx| {
            for bubble in &spec.bubbles {
                let Some(diameter) = bubble.diameter else {
                    continue;
                };
                ctx.draw(&Circle {
                    x: bubble.x,
                    y: bubble.y,
                    radius: diameter / 8.0,
                    color: scale_color(bubble.color_index, max_index),
                });
            }
            ctx.layer();
            for bubble in spec.bubbles.iter().filter(|b| b.diameter.unwrap_or(0.0) >= 30.0) {
                ctx.print(bubble.x, bubble.y, bubble.label.clone());
            }
        });

    f.render_widget(canvas, area);
}

fn render_indicator(f: &mut Frame<'_>, area: Rect, spec: &IndicatorSpec) {
    let block = chart_block(spec.title.clone());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let mut lines = vec![TextLine::from(Span::styled(
        format!("{}{}", format_optional(spec.value), spec.suffix),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))];
    if let Some(delta) = spec.delta() {
        let (arrow, color) = if delta >= 0.0 {
            ("▲", Color::Green)
        } else {
            ("▼", Color::Red)
        };
        lines.push(TextLine::from(Span::styled(
            format!("{arrow} {}", format_thousands(delta.abs())),
            Style::default().fg(color),
        )));
    }
    if let Some(subtitle) = &spec.subtitle {
        lines.push(TextLine::from(Span::styled(
            subtitle.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    f.render_widget(
        Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
        layout[0],
    );

    if let Some(ratio) = spec.band_ratio() {
        let gauge = LineGauge::default()
            .ratio(ratio)
            .label("band")
            .filled_style(Style::default().fg(Color::LightGreen))
            .unfilled_style(Style::default().fg(Color::DarkGray));
        f.render_widget(gauge, layout[1]);
    }
}

fn render_values_table(f: &mut Frame<'_>, area: Rect, table: &ValuesTable) {
    let rows = table.rows.iter().map(|row| {
        let percent = row
            .percent_of_max
            .map_or_else(|| "N/A".to_string(), |percent| format!("{percent:.1}%"));
        let style = if row.highlight {
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![
            row.region.clone(),
            format!("{} tons", format_thousands(row.production)),
            percent,
        ])
        .style(style)
    });

    let widget = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
        ],
    )
    .header(
        Row::new(vec!["Region", "Production", "% of max"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(
        chart_block(table.title.clone()).title_bottom(format!(
            "Maximum production: {} tons",
            format_thousands(table.max_production)
        )),
    );

    f.render_widget(widget, area);
}
