//! UI rendering for the TUI.

use daygrid_core::{gutter_labels, PositionedSession, SelectionState};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

// ========== Grid Colors ==========

/// Gutter time labels
const GUTTER_COLOR: Color = Color::Rgb(120, 120, 120);
/// Border of a session that has the lane to itself
const BORDER_SINGLE: Color = Color::Rgb(0, 150, 150);
/// Border of a session sharing its time with others
const BORDER_GROUPED: Color = Color::Rgb(220, 180, 0);
/// Border of the session under the cursor
const BORDER_CURSOR: Color = Color::Rgb(255, 127, 80);
/// Fill of sessions shown in an open group or detail view
const EXPANDED_BG: Color = Color::Rgb(40, 40, 70);
/// Label color for detail attributes
const LABEL_COLOR: Color = Color::Rgb(100, 180, 180);
/// Border color for the group picker
const BORDER_PICKER: Color = Color::Rgb(180, 100, 180);

/// Grid pixels covered by one terminal row.
pub const PIXELS_PER_ROW: f64 = 16.0;

/// Width of the time gutter in columns.
const GUTTER_WIDTH: u16 = 6;

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Layout: header, grid, footer
    let chunks = Layout::vertical([
        Constraint::Length(2), // Header
        Constraint::Min(3),    // Grid
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_header(frame, app, chunks[0]);
    render_grid(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);

    match app.selection().clone() {
        SelectionState::None => {}
        SelectionState::GroupOpen {
            members,
            highlighted,
            ..
        } => render_group_picker(frame, app, &members, highlighted, area),
        SelectionState::DetailOpen { session } => {
            if let Some(positioned) = app.model.get(&session) {
                render_detail(frame, positioned, area);
            }
        }
    }
}

/// Render the date header and any layout error.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" daygrid ", Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw("  "),
        Span::styled(
            app.date.format("%A %d %B %Y").to_string(),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("  {} sessions", app.model.len()),
            Style::default().fg(GUTTER_COLOR),
        ),
    ]);

    let header = match &app.status {
        Some(error) => Paragraph::new(vec![
            title,
            Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
        ]),
        None => Paragraph::new(title).block(Block::default().borders(Borders::BOTTOM)),
    };
    frame.render_widget(header, area);
}

/// Grid row of a pixel coordinate, relative to the grid origin.
fn pixel_row(y: f64, origin: f64) -> i64 {
    ((y - origin) / PIXELS_PER_ROW).floor() as i64
}

/// Pixel coordinate drawn at row 0 before scrolling.
///
/// Sessions that start before the configured day start pull the origin up so
/// they stay reachable.
fn grid_origin(app: &App) -> f64 {
    app.model
        .iter()
        .map(|p| p.geometry.top)
        .fold(0.0, f64::min)
}

/// Total grid rows for the current day.
fn grid_rows(app: &App) -> u16 {
    let origin = grid_origin(app);
    let bottom = app.model.content_height(app.day_end_minutes);
    ((bottom - origin) / PIXELS_PER_ROW).ceil().max(1.0) as u16
}

/// Screen rectangle of a session box in `lane`, or `None` when it is
/// scrolled out of view.
pub fn session_rect(
    positioned: &PositionedSession,
    lane: Rect,
    origin: f64,
    scroll: u16,
) -> Option<Rect> {
    let top_row = pixel_row(positioned.geometry.top, origin) - i64::from(scroll);
    let bottom_px = positioned.geometry.bottom() - origin;
    let bottom_row = (bottom_px / PIXELS_PER_ROW).ceil() as i64 - i64::from(scroll);
    let bottom_row = bottom_row.max(top_row + 1);

    let visible_top = top_row.max(0);
    let visible_bottom = bottom_row.min(i64::from(lane.height));
    if visible_top >= visible_bottom {
        return None;
    }

    let (x, width) = positioned.horizontal_slot(f64::from(lane.width));
    let left = x.round() as u16;
    let right = ((x + width).round() as u16).min(lane.width);
    if right <= left {
        return None;
    }

    Some(Rect::new(
        lane.x + left,
        lane.y + visible_top as u16,
        right - left,
        (visible_bottom - visible_top) as u16,
    ))
}

/// Render the gutter and the session boxes.
fn render_grid(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns = Layout::horizontal([
        Constraint::Length(GUTTER_WIDTH), // Time gutter
        Constraint::Min(10),              // Session lane
    ])
    .split(area);
    let (gutter, lane) = (columns[0], columns[1]);

    let origin = grid_origin(app);
    keep_cursor_visible(app, origin, lane.height);
    let max_scroll = grid_rows(app).saturating_sub(lane.height);
    app.scroll_rows = app.scroll_rows.min(max_scroll);
    let scroll = app.scroll_rows;

    for label in gutter_labels(&app.projection, app.row_interval_minutes, app.day_end_minutes) {
        let row = pixel_row(label.top, origin) - i64::from(scroll);
        if row < 0 || row >= i64::from(gutter.height) {
            continue;
        }
        let cell = Rect::new(gutter.x, gutter.y + row as u16, gutter.width, 1);
        frame.render_widget(
            Paragraph::new(label.label).style(Style::default().fg(GUTTER_COLOR)),
            cell,
        );
    }

    let selection = app.selection();
    let cursor = app.cursor;

    // Paint order puts the highest offset last, on top
    for (idx, positioned) in app.model.iter().enumerate() {
        let Some(rect) = session_rect(positioned, lane, origin, scroll) else {
            continue;
        };
        let is_cursor = cursor == Some(idx);
        let is_expanded = selection.is_expanded(positioned.id());
        render_session_box(frame, positioned, rect, is_cursor, is_expanded);
    }
}

/// Scroll just enough to bring the cursor's box into view.
fn keep_cursor_visible(app: &mut App, origin: f64, height: u16) {
    let Some(positioned) = app.cursor_session() else {
        return;
    };
    let row = pixel_row(positioned.geometry.top, origin).max(0);
    let top = u16::try_from(row).unwrap_or(u16::MAX);
    if top < app.scroll_rows {
        app.scroll_rows = top;
    } else if height > 0 && top >= app.scroll_rows.saturating_add(height) {
        app.scroll_rows = top - (height - 1);
    }
}

fn render_session_box(
    frame: &mut Frame,
    positioned: &PositionedSession,
    rect: Rect,
    is_cursor: bool,
    is_expanded: bool,
) {
    let border = if is_cursor {
        BORDER_CURSOR
    } else if positioned.is_grouped() {
        BORDER_GROUPED
    } else {
        BORDER_SINGLE
    };
    let mut style = Style::default();
    if is_expanded {
        style = style.bg(EXPANDED_BG);
    }

    let title = session_label(positioned);
    frame.render_widget(Clear, rect);

    if rect.height >= 3 && rect.width >= 4 {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .style(style);
        let text = vec![
            Line::from(Span::styled(title, Style::default().bold())),
            Line::from(Span::styled(
                format!("{}-{}", positioned.session.start_time, positioned.session.end_time),
                Style::default().fg(GUTTER_COLOR),
            )),
        ];
        frame.render_widget(Paragraph::new(text).block(block), rect);
    } else {
        // Too short for borders: a single colored line
        let line = Line::from(Span::styled(format!("▌{}", title), Style::default().fg(border)));
        frame.render_widget(Paragraph::new(line).style(style), rect);
    }
}

fn session_label(positioned: &PositionedSession) -> String {
    let title = &positioned.session.display.title;
    if title.is_empty() {
        positioned.id().to_string()
    } else {
        title.clone()
    }
}

/// Render the group picker overlay.
fn render_group_picker(
    frame: &mut Frame,
    app: &App,
    members: &[daygrid_core::SessionId],
    highlighted: usize,
    area: Rect,
) {
    let width = 50.min(area.width.saturating_sub(4));
    let height = (members.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = centered(area, width, height);

    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = members
        .iter()
        .filter_map(|id| app.model.get(id))
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}-{} ", p.session.start_time, p.session.end_time),
                    Style::default().fg(GUTTER_COLOR),
                ),
                Span::raw(session_label(p)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BORDER_PICKER))
                .title(format!(" {} overlapping sessions ", members.len()))
                .title_style(Style::default().fg(BORDER_PICKER).add_modifier(Modifier::BOLD)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(highlighted));
    frame.render_stateful_widget(list, popup, &mut state);
}

/// Render the session detail overlay.
fn render_detail(frame: &mut Frame, positioned: &PositionedSession, area: Rect) {
    let session = &positioned.session;
    let label =
        |name: &str| Span::styled(format!("{:<14}", name), Style::default().fg(LABEL_COLOR));

    let mut lines = vec![
        Line::from(vec![label("Date"), Span::raw(session.date.format("%a %Y-%m-%d").to_string())]),
        Line::from(vec![
            label("Time"),
            Span::raw(format!("{}-{}", session.start_time, session.end_time)),
        ]),
        Line::from(vec![
            label("Column"),
            Span::raw(format!("{} of {}", positioned.offset + 1, positioned.group_size)),
        ]),
    ];

    if !session.display.participants.is_empty() {
        lines.push(Line::from(vec![
            label("Participants"),
            Span::raw(session.display.participants.join(", ")),
        ]));
    }

    for (key, value) in &session.display.extra {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        lines.push(Line::from(vec![label(key), Span::raw(value)]));
    }

    let width = 60.min(area.width.saturating_sub(4));
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = centered(area, width, height);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_SINGLE))
        .title(format!(" {} ", session_label(positioned)))
        .title_style(Style::default().fg(BORDER_SINGLE).add_modifier(Modifier::BOLD));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

/// Render the key help footer.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = match app.selection() {
        SelectionState::None => " j/k session  enter open  [/] day  d/u scroll  q quit",
        SelectionState::GroupOpen { .. } => " j/k choose  enter open  esc close",
        SelectionState::DetailOpen { .. } => " esc close",
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(GUTTER_COLOR)),
        area,
    );
}
