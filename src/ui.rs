//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  This makes it easy to change the
//! visual layout without touching business logic.
//!
//! ## For contributors
//!
//! * The layout is a two-row split: a scrollable list on top and a one-line
//!   status bar at the bottom.
//! * Each headline is two or three lines: date, title and image badge; the
//!   description; the content excerpt when the article has one.
//! * Images are not decoded.  The badge only shows the row's image state.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use std::ops::Range;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::headlines::{HeadlineCell, RowImage};
use crate::source::Article;
use crate::viewport::visible_rows;

/// Draw the complete UI for one frame.
///
/// Returns the rows the list actually rendered, for
/// [`App::sync_visibility`].
pub fn draw(app: &mut App, frame: &mut Frame) -> Range<usize> {
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let visible = draw_headlines(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
    visible
}

fn image_badge(cell: Option<&HeadlineCell>) -> Span<'static> {
    match cell.map(|c| &c.image) {
        None => Span::raw(""),
        Some(RowImage::Loading) => Span::styled("[loading]", Style::default().fg(Color::DarkGray)),
        Some(RowImage::Loaded(bytes)) => Span::styled(
            format!("[{} KB]", bytes.len().div_ceil(1024)),
            Style::default().fg(Color::Green),
        ),
        Some(RowImage::Failed) => Span::styled("[retry: r]", Style::default().fg(Color::Red)),
    }
}

fn headline_item(article: &Article, cell: Option<&HeadlineCell>) -> ListItem<'static> {
    let date_str = article
        .published_at
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "no date".into());

    // A bound row renders from its cell; others straight from the article.
    let (title, description, content) = match cell {
        Some(cell) => (
            cell.title.clone(),
            cell.description.clone(),
            cell.is_content_visible().then(|| cell.content.clone()).flatten(),
        ),
        None => (
            article.title.clone(),
            article.description.clone(),
            article.content.clone(),
        ),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<18}", date_str), Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            Span::styled(title, Style::default().fg(Color::White)),
            Span::raw("  "),
            image_badge(cell),
        ]),
        Line::from(Span::styled(
            format!("{:<19}{description}", ""),
            Style::default().fg(Color::Gray),
        )),
    ];
    if let Some(content) = content {
        lines.push(Line::from(Span::styled(
            format!("{:<19}{content}", ""),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    ListItem::new(Text::from(lines))
}

/// Render the scrollable headline list.
fn draw_headlines(app: &mut App, frame: &mut Frame, area: Rect) -> Range<usize> {
    let items: Vec<ListItem> = app
        .headlines
        .articles()
        .iter()
        .enumerate()
        .map(|(row, article)| headline_item(article, app.headlines.cell(row)))
        .collect();
    let heights: Vec<usize> = items.iter().map(ListItem::height).collect();

    let block = Block::default().title(" Top Headlines ").borders(Borders::ALL);
    let inner = block.inner(area);

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);

    // Rendering settles the scroll offset around the selection.
    visible_rows(&heights, app.list_state.offset(), inner.height as usize)
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(app.status(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} headlines", app.headlines.number_of_rows()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ↑/↓: scroll  R: refresh  r: retry image"),
    ]));
    frame.render_widget(status, area);
}
