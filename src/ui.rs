use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use flipdex::{
    game::{Outcome, PowerUp, Session},
    stats::Stats,
    theme::Palette,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const CARD_BACK: &str = "░▒▓▒░";
const HELP: &str = "←↑↓→/hjkl move  (space) flip  (s)tart  (r)eset  (1/2/3) difficulty  (p)ower-up  (t)heme  (o)pen artwork  (esc) quit";

/// Cut `text` down to at most `width` terminal columns
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    if width > 0 {
        out.push('…');
    }
    out
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = self.theme.palette();
        let session = self.controller.session();
        let base = Style::default().fg(palette.text).bg(palette.background);
        buf.set_style(area, base);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(3), // stats
                Constraint::Min(3),    // board
                Constraint::Length(1), // status
                Constraint::Length(2), // help
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "flipdex",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        render_stats(Stats::from(session), &palette, chunks[1], buf);

        if session.is_dealt() {
            render_board(self, session, &palette, chunks[2], buf);
        } else {
            Paragraph::new("Shuffling the deck...")
                .style(Style::default().fg(palette.dim))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);
        }

        render_status(self, session, &palette, chunks[3], buf);

        Paragraph::new(HELP)
            .style(
                Style::default()
                    .fg(palette.dim)
                    .add_modifier(Modifier::ITALIC),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[4], buf);
    }
}

fn render_stats(stats: Stats, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let label = Style::default().fg(palette.dim);
    let value = Style::default()
        .fg(palette.text)
        .add_modifier(Modifier::BOLD);
    let time_style = if stats.time_left <= 10 {
        Style::default()
            .fg(palette.alert)
            .add_modifier(Modifier::BOLD)
    } else {
        value
    };

    let line = Line::from(vec![
        Span::styled("Clicks ", label),
        Span::styled(stats.clicks.to_string(), value),
        Span::styled("   Pairs left ", label),
        Span::styled(stats.pairs_left.to_string(), value),
        Span::styled("   Matched ", label),
        Span::styled(
            format!("{}/{}", stats.pairs_matched, stats.total_pairs),
            value,
        ),
        Span::styled("   Time ", label),
        Span::styled(format!("{}s", stats.time_left), time_style),
    ]);

    Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_board(app: &App, session: &Session, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let board = session.board();
    let cols = board.columns();
    let rows = board.len().div_ceil(cols);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
            .split(*row_area);

        for (col, cell) in cells.iter().enumerate() {
            let index = row * cols + col;
            let Some(card) = board.get(index) else {
                continue;
            };

            let face_up = session.is_face_up(index);
            let mut border = Style::default().fg(palette.dim);
            if index == app.focus {
                border = Style::default()
                    .fg(palette.focus)
                    .add_modifier(Modifier::BOLD);
            }

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border);
            let inner_width = cell.width.saturating_sub(2) as usize;

            let body = if face_up {
                let style = if card.matched {
                    Style::default().fg(palette.matched)
                } else {
                    Style::default()
                        .fg(palette.card_face)
                        .add_modifier(Modifier::BOLD)
                };
                let mut lines = vec![Line::from(Span::styled(
                    fit_width(&card.label(), inner_width),
                    style,
                ))];
                if card.artwork.is_some() {
                    lines.push(Line::from(Span::styled(
                        card.content.to_string(),
                        Style::default().fg(palette.dim),
                    )));
                }
                Paragraph::new(lines)
            } else {
                Paragraph::new(Span::styled(
                    fit_width(CARD_BACK, inner_width),
                    Style::default().fg(palette.card_back),
                ))
            };

            body.block(block)
                .alignment(Alignment::Center)
                .render(*cell, buf);
        }
    }
}

fn render_status(app: &App, session: &Session, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let power_up = match session.power_up() {
        PowerUp::Locked => "locked",
        PowerUp::Ready => "ready",
        PowerUp::Revealing => "revealing",
        PowerUp::Spent => "used",
    };
    let timer = if session.timer_running() {
        "running"
    } else {
        "stopped"
    };

    let mut spans = vec![Span::styled(
        format!(
            "{} | {} theme | timer {} | power-up {}",
            session.difficulty(),
            app.theme,
            timer,
            power_up
        ),
        Style::default().fg(palette.dim),
    )];

    let banner = match session.outcome() {
        Some(Outcome::Won) => Some(("Congratulations! You won!", palette.matched)),
        Some(Outcome::TimedOut) => Some(("Game Over! Time's up!", palette.alert)),
        None => app.notice.as_deref().map(|n| (n, palette.accent)),
    };
    if let Some((text, color)) = banner {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            text.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}
