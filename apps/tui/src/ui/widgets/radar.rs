use crate::charts::RadarSpec;
use crate::ui::widgets::palette::{color_or, series_color};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

/// Spinning sweep shown in the title bar; dimmed when nothing is loading.
pub fn render_sweep(f: &mut Frame<'_>, area: Rect, animation: f64, active: bool) {
    if area.width < 4 || area.height < 4 {
        return;
    }

    let size = area.width.min(area.height);
    let square = Rect {
        x: area.x + (area.width - size) / 2,
        y: area.y + (area.height - size) / 2,
        width: size,
        height: size,
    };
    let (sweep_color, trail_color) = if active {
        (Color::Green, Color::LightGreen)
    } else {
        (Color::DarkGray, Color::DarkGray)
    };

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                let width = f64::from(square.width);
                let height = f64::from(square.height);
                let center_x = width / 2.0;
                let center_y = height / 2.0;
                let radius = width.min(height) / 2.0 * 0.8;

                for i in 1..=2 {
                    ctx.draw(&Circle {
                        x: center_x,
                        y: center_y,
                        radius: radius * (f64::from(i) / 2.0),
                        color: Color::DarkGray,
                    });
                }

                let angle = animation;
                let trail = angle - std::f64::consts::PI / 12.0;
                for (theta, color, reach) in
                    [(trail, trail_color, 0.9), (angle, sweep_color, 1.0)]
                {
                    ctx.draw(&CanvasLine {
                        x1: center_x,
                        y1: center_y,
                        x2: theta.cos().mul_add(radius * reach, center_x),
                        y2: theta.sin().mul_add(radius * reach, center_y),
                        color,
                    });
                }
            })
            .x_bounds([0.0, f64::from(square.width)])
            .y_bounds([0.0, f64::from(square.height)]),
        square,
    );
}

/// Polar position of axis `index` out of `count`, first axis straight up.
fn axis_point(index: usize, count: usize, reach: f64) -> (f64, f64) {
    let angle = std::f64::consts::FRAC_PI_2
        - std::f64::consts::TAU * (index as f64) / (count.max(1) as f64);
    (angle.cos() * reach, angle.sin() * reach)
}

/// Radar chart on a 0–100 % scale, one closed polygon per dataset.
pub fn render_radar_chart(f: &mut Frame<'_>, area: Rect, spec: &RadarSpec, instance: Option<u64>) {
    let title = instance.map_or_else(
        || spec.title.clone(),
        |instance| format!("{} #{instance}", spec.title),
    );
    let legend: Vec<Span<'_>> = spec
        .datasets
        .iter()
        .enumerate()
        .flat_map(|(index, dataset)| {
            let color = color_or(dataset.border_color.as_deref(), series_color(index));
            [
                Span::styled("■ ", Style::default().fg(color)),
                Span::raw(format!("{}  ", dataset.label)),
            ]
        })
        .collect();

    let block = Block::default()
        .title(title)
        .title_bottom(TextLine::from(legend))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let count = spec.labels.len();
    let canvas = Canvas::default()
        .block(block)
        .x_bounds([-130.0, 130.0])
        .y_bounds([-120.0, 120.0])
        .paint(|ctx| {
            for ring in [25.0, 50.0, 75.0, 100.0] {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: ring,
                    color: Color::DarkGray,
                });
            }
            for (index, label) in spec.labels.iter().enumerate() {
                let (x, y) = axis_point(index, count, 100.0);
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2: x,
                    y2: y,
                    color: Color::DarkGray,
                });
                let (lx, ly) = axis_point(index, count, 112.0);
                ctx.print(lx, ly, label.clone());
            }

            ctx.layer();
            for (index, dataset) in spec.datasets.iter().enumerate() {
                let color = color_or(dataset.border_color.as_deref(), series_color(index));
                let points: Vec<(f64, f64)> = dataset
                    .values
                    .iter()
                    .enumerate()
                    .map(|(axis, value)| {
                        axis_point(axis, count, value.unwrap_or(0.0).clamp(0.0, 100.0))
                    })
                    .collect();
                for (start, end) in points.iter().zip(points.iter().cycle().skip(1)) {
                    ctx.draw(&CanvasLine {
                        x1: start.0,
                        y1: start.1,
                        x2: end.0,
                        y2: end.1,
                        color,
                    });
                }
            }
        });

    f.render_widget(canvas, area);
}
