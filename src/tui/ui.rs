use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::app::{App, MEDIA_ITEMS};
use crate::command::{
    ClimateState, DoorPosition, LightState, PropertyEnum, SeatAxis, UiScreen, UiStyle,
};
use crate::notify::VehicleNotifier;
use crate::scene::{SceneProperties, node};

pub fn draw<N: VehicleNotifier>(frame: &mut Frame, app: &App<N>) {
    let area = frame.area();

    let screen = enum_property::<UiScreen>(app, node::UI_SCREEN);
    let style = enum_property::<UiStyle>(app, node::UI_STYLE);
    let accent = accent_color(style);

    let block = Block::default()
        .title(" Vehicle Dashboard ")
        .title_bottom(format!(" screen: {screen}  style: {style} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Layout: panels row, command history, help bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12), // panels
            Constraint::Min(0),     // history
            Constraint::Length(1),  // help bar
        ])
        .split(inner);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[0]);

    render_body_panel(frame, app, panels[0], accent);
    render_cabin_panel(frame, app, panels[1], accent);
    render_media_panel(frame, app, panels[2], accent, screen == UiScreen::Media);
    render_history(frame, app, chunks[1]);

    let help_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(48)])
        .split(chunks[2]);
    frame.render_widget(Paragraph::new(render_help()), help_chunks[0]);
    frame.render_widget(Paragraph::new(render_stats(app)), help_chunks[1]);
}

fn accent_color(style: UiStyle) -> Color {
    match style {
        UiStyle::Classic => Color::Cyan,
        UiStyle::Modern => Color::Magenta,
        UiStyle::Sport => Color::Red,
    }
}

fn enum_property<T: PropertyEnum + Default>(app: &App<impl VehicleNotifier>, name: &str) -> T {
    app.scene
        .int_property(name)
        .ok()
        .and_then(T::from_index)
        .unwrap_or_default()
}

fn panel(title: &str, accent: Color) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
}

fn open_span(app: &App<impl VehicleNotifier>, name: &str, on: &str, off: &str) -> Span<'static> {
    match app.scene.bool_property(name) {
        Ok(true) => Span::styled(
            on.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Ok(false) => Span::styled(off.to_string(), Style::default().fg(Color::Green)),
        Err(_) => Span::styled("---".to_string(), Style::default().fg(Color::DarkGray)),
    }
}

fn labelled(label: &str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label:<13}"), Style::default().fg(Color::White)),
        value,
    ])
}

fn render_body_panel(frame: &mut Frame, app: &App<impl VehicleNotifier>, area: Rect, accent: Color) {
    let mut lines = Vec::new();
    for (i, pos) in DoorPosition::ALL.into_iter().enumerate() {
        let door = open_span(app, node::door_open(pos), "OPEN", "closed");
        let window = open_span(app, node::window_open(pos), "down", "up");
        lines.push(Line::from(vec![
            Span::styled(format!(" [{}] {:<12}", i + 1, pos.to_string()), Style::default()),
            door,
            Span::raw("  win "),
            window,
        ]));
    }
    lines.push(labelled(
        "[b] back door",
        open_span(app, node::BACK_DOOR_OPEN, "OPEN", "closed"),
    ));
    lines.push(labelled("misc", open_span(app, node::MISC_ON, "on", "off")));
    lines.push(labelled(
        "accessory",
        open_span(app, node::ACCESSORY_ON, "on", "off"),
    ));

    frame.render_widget(Paragraph::new(lines).block(panel("Body", accent)), area);
}

fn render_cabin_panel(frame: &mut Frame, app: &App<impl VehicleNotifier>, area: Rect, accent: Color) {
    let lights = enum_property::<LightState>(app, node::LIGHT_STATE);
    let climate = enum_property::<ClimateState>(app, node::CLIMATE_STATE);

    let mut lines = vec![
        labelled("lights", Span::raw(lights.to_string())),
        labelled("climate", Span::raw(climate.to_string())),
        Line::from(""),
    ];
    for axis in [SeatAxis::ForwardBack, SeatAxis::UpDown, SeatAxis::Recline] {
        let value = app
            .scene
            .float_property(node::seat_offset(axis))
            .map(|v| format!("{v:+.1}"))
            .unwrap_or_else(|_| "---".to_string());
        lines.push(labelled(&format!("seat {axis}"), Span::raw(value)));
    }

    frame.render_widget(Paragraph::new(lines).block(panel("Cabin", accent)), area);
}

fn render_media_panel(
    frame: &mut Frame,
    app: &App<impl VehicleNotifier>,
    area: Rect,
    accent: Color,
    active: bool,
) {
    let band = app
        .scene
        .string_property(node::RADIO_BAND)
        .unwrap_or_else(|_| "--".to_string());
    let freq = app
        .scene
        .float_property(node::RADIO_FREQUENCY)
        .map(|f| format!("{f:.1}"))
        .unwrap_or_else(|_| "---".to_string());
    let seek = app.scene.float_property(node::MEDIA_SEEK_POSITION).unwrap_or(0.0);
    let selected = app.scene.int_property(node::MEDIA_SELECTED_INDEX).unwrap_or(-1);
    let focus = app.media_focus();

    let bar_width = 12;
    let filled = ((seek.clamp(0.0, 1.0) * bar_width as f32).round() as usize).min(bar_width);

    let mut lines = vec![
        labelled("tuner", Span::raw(format!("{band} {freq}"))),
        labelled(
            "seek",
            Span::styled(
                format!(
                    "{}{}",
                    "\u{2588}".repeat(filled),
                    "\u{2591}".repeat(bar_width - filled)
                ),
                Style::default().fg(accent),
            ),
        ),
    ];
    for (i, item) in MEDIA_ITEMS.iter().enumerate() {
        let marker = if i as i32 == selected { "\u{25b6}" } else { " " };
        let style = if i == focus {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(format!(" {marker} ")),
            Span::styled(item.to_string(), style),
        ]));
    }

    let title = if active { "Media *" } else { "Media" };
    frame.render_widget(Paragraph::new(lines).block(panel(title, accent)), area);
}

fn render_history(frame: &mut Frame, app: &App<impl VehicleNotifier>, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = app
        .history
        .iter()
        .rev()
        .take(visible)
        .map(|entry| Line::from(Span::raw(format!(" {entry}"))))
        .collect();
    lines.reverse();

    if let Some(err) = &app.last_error {
        lines.push(Line::from(Span::styled(
            format!(" ! {err}"),
            Style::default().fg(Color::Red),
        )));
    }

    let block = Block::default().title(" Commands ").borders(Borders::TOP);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help() -> Line<'static> {
    let key = Style::default().fg(Color::Yellow);
    Line::from(vec![
        Span::styled(" 1-4", key),
        Span::raw(" doors "),
        Span::styled("5-8", key),
        Span::raw(" windows "),
        Span::styled("b", key),
        Span::raw(" back "),
        Span::styled("\u{2191}\u{2193}", key),
        Span::raw(" focus "),
        Span::styled("Enter", key),
        Span::raw(" play "),
        Span::styled("q", key),
        Span::raw(" quit"),
    ])
}

fn render_stats(app: &App<impl VehicleNotifier>) -> Line<'static> {
    let stats = app.queue_stats();
    let totals = app.totals();
    Line::from(Span::styled(
        format!(
            "q:{} hw:{} drop:{}  applied:{} failed:{} ",
            stats.enqueued - stats.drained - stats.dropped,
            stats.high_water,
            stats.dropped,
            totals.applied,
            totals.dropped,
        ),
        Style::default().fg(Color::DarkGray),
    ))
}
