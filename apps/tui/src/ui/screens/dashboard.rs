use crate::app::{App, ChartTab};
use crate::app::input::best_match;
use crate::dashboard::BoardSnapshot;
use crate::domain::{Dimension, SelectControl};
use crate::ui::widgets::charts::render_slot;
use crate::ui::widgets::popup::centered_rect;
use crate::ui::widgets::radar::render_sweep;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};

pub fn render_dashboard<F>(app: &App<F>, f: &mut Frame<'_>) {
    let main_layout = build_main_layout(f);
    let snapshot = app.actions.snapshot();

    render_title_section(app, f, main_layout[0]);
    render_content_section(app, &snapshot, f, main_layout[1]);
    render_status_section(app, &snapshot, f, main_layout[2]);
    render_shortcuts(f, main_layout[3]);

    if app.show_help {
        render_help_popup(f, f.area());
    }
}

fn build_main_layout(f: &Frame<'_>) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Title and controls
            Constraint::Min(5),    // Chart pages
            Constraint::Length(3), // Status
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(2, 1)))
        .to_vec()
}

fn render_title_section<F>(app: &App<F>, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .title("== Crop Production Dashboard ==")
        .title_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    f.render_widget(title_block, area);

    let title_inner = area.inner(Margin::new(1, 1));
    let title_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Min(4),
        ])
        .split(title_inner);

    for dimension in Dimension::ALL {
        render_control(
            app,
            f,
            title_chunks[dimension.index()],
            app.controls.control(dimension),
        );
    }

    render_sweep(f, title_chunks[3], app.animation_counter, app.is_busy());
}

fn render_control<F>(app: &App<F>, f: &mut Frame<'_>, area: Rect, control: &SelectControl) {
    let focused = app.focus == control.dimension;
    let border = if focused { Color::Yellow } else { Color::DarkGray };

    let mut lines = vec![TextLine::from(Span::styled(
        format!("◀ {} ▶", control.label()),
        if control.selected == 0 {
            Style::default().fg(Color::Gray)
        } else {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        },
    ))];

    if focused {
        if let Some(query) = &app.search {
            let hint = best_match(control, query)
                .and_then(|index| control.options.get(index - 1))
                .map_or_else(String::new, |option| format!(" → {}", option.label));
            lines.push(TextLine::from(vec![
                Span::styled(format!("/{query}"), Style::default().fg(Color::Yellow)),
                Span::styled(hint, Style::default().fg(Color::Gray)),
            ]));
        } else {
            lines.push(TextLine::from(Span::styled(
                format!("{}/{}", control.selected, control.options.len()),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .title(control.dimension.label())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}

fn render_content_section<F>(
    app: &App<F>,
    snapshot: &BoardSnapshot,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(4)])
        .split(area);

    render_chart_tabs(app, f, split[0]);

    let tab = app.chart_tab();
    let slots = tab.slots();
    let rows = if slots.len() > 2 { 2 } else { 1 };
    let per_row = slots.len().div_ceil(rows);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(split[1]);

    for (row_index, row_slots) in slots.chunks(per_row).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, row_slots.len() as u32);
                row_slots.len()
            ])
            .split(row_areas[row_index]);
        for (cell, slot) in cells.iter().zip(row_slots) {
            render_slot(f, *cell, *slot, snapshot.slots.get(slot));
        }
    }
}

fn render_chart_tabs<F>(app: &App<F>, f: &mut Frame<'_>, area: Rect) {
    let titles = ChartTab::ALL
        .iter()
        .enumerate()
        .map(|(index, tab)| TextLine::from(format!("{} {}", index + 1, tab.label())))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .select(app.chart_tab_index)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

fn render_status_section<F>(
    app: &App<F>,
    snapshot: &BoardSnapshot,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let errors = snapshot
        .slots
        .values()
        .filter(|entry| entry.content.is_error())
        .count();

    let mut spans = Vec::new();
    if app.is_busy() {
        spans.push(
            Throbber::default()
                .throbber_set(BRAILLE_SIX)
                .to_symbol_span(&app.throbber_state),
        );
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        app.status_message.clone(),
        Style::default().fg(Color::Green),
    ));
    if errors > 0 {
        spans.push(Span::styled(
            format!(" | {errors} chart{} failed", if errors == 1 { "" } else { "s" }),
            Style::default().fg(Color::Red),
        ));
    }

    let status_paragraph = Paragraph::new(TextLine::from(spans))
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::Gray);

    let mut spans = Vec::new();
    for (index, (keys, action)) in SHORTCUTS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" | ", text));
        }
        spans.push(Span::styled(*keys, key));
        spans.push(Span::styled(format!(": {action}"), text));
    }

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}

const SHORTCUTS: [(&str, &str); 6] = [
    ("F1", "Help"),
    ("←/→", "Control"),
    ("↑/↓", "Select"),
    ("1-4", "Page"),
    ("/", "Search"),
    ("q", "Quit"),
];

const HELP_KEYS: [(&str, &str); 10] = [
    ("F1", "Toggle this help popup"),
    ("Left/Right, Tab", "Move focus between Country, Year and Product"),
    ("Up/Down", "Change the focused selection and refresh the charts"),
    ("PgUp/PgDn", "Jump 10 options"),
    ("Home", "Clear the focused selection"),
    ("/", "Search the focused control, Enter to pick, Esc to cancel"),
    ("1-4", "Global, Country, Summary and Compare pages"),
    ("r", "Re-run every chart for the current selection"),
    ("Esc", "Close help, or quit"),
    ("q", "Quit application"),
];

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(80, 80, area);
    f.render_widget(Clear, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .title_bottom(TextLine::from("Press F1 or Esc to close").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });

    f.render_widget(help_paragraph, popup_area);
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        TextLine::from(Span::styled(
            "Crop Production Dashboard",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Pick a country, year and product. Charts that need a selection stay empty until it is made.",
        ),
        TextLine::from(""),
        TextLine::from(Span::styled("Keyboard Shortcuts:", bold)),
    ];
    lines.extend(HELP_KEYS.iter().map(|(keys, action)| {
        TextLine::from(vec![
            Span::styled(format!("  {keys}"), key),
            Span::raw(format!(" - {action}")),
        ])
    }));
    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled("CLI Options:", bold)));

    let help_text = crate::cli::CliArgs::help_text();
    for line in help_text.lines() {
        if line.starts_with("Usage") || line.starts_with("Options") || line.trim().is_empty() {
            continue;
        }
        lines.push(TextLine::from(line.to_string()));
    }

    lines
}
