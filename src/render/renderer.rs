use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GamePhase, Position, Snapshot};
use crate::metrics::GameMetrics;

/// What occupies a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Head,
    Body,
    Food,
    Empty,
}

impl CellKind {
    pub fn of(snapshot: &Snapshot<'_>, pos: Position) -> Self {
        if pos == snapshot.head() {
            CellKind::Head
        } else if snapshot.is_snake(pos) {
            CellKind::Body
        } else if snapshot.food() == Some(pos) {
            CellKind::Food
        } else {
            CellKind::Empty
        }
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot<'_>, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match snapshot.phase() {
            GamePhase::Running => frame.render_widget(self.render_grid(snapshot), game_area),
            GamePhase::Ready => frame.render_widget(self.render_ready(), game_area),
            GamePhase::Over | GamePhase::Won => {
                frame.render_widget(self.render_game_over(snapshot), game_area)
            }
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot<'_>) -> Paragraph<'static> {
        let size = snapshot.grid_size() as i32;
        let mut lines = Vec::with_capacity(snapshot.grid_size());

        for y in 0..size {
            let spans: Vec<Span> = (0..size)
                .map(|x| self.render_cell(snapshot, Position::new(x, y)))
                .collect();
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_cell(&self, snapshot: &Snapshot<'_>, pos: Position) -> Span<'static> {
        match CellKind::of(snapshot, pos) {
            // Pulse on the tick food was eaten
            CellKind::Head if snapshot.ate_food() => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
            CellKind::Head => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            CellKind::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
            CellKind::Food => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            CellKind::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }

    fn render_stats(&self, snapshot: &Snapshot<'_>, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(snapshot.score().to_string(), value.add_modifier(Modifier::BOLD)),
                Span::raw("    "),
                Span::styled("Best: ", label),
                Span::styled(snapshot.high_score().to_string(), value),
                Span::raw("    "),
                Span::styled("Speed: ", label),
                Span::styled(format!("{}ms", snapshot.speed_ms()), value),
                Span::raw("    "),
                Span::styled("Time: ", label),
                Span::styled(metrics.format_time(), value),
            ]),
            Line::from(vec![
                Span::styled("Session best: ", label),
                Span::styled(metrics.session_best.to_string(), value),
                Span::raw("    "),
                Span::styled("Games: ", label),
                Span::styled(metrics.games_played.to_string(), value),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_ready(&self) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" or click to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_game_over(&self, snapshot: &Snapshot<'_>) -> Paragraph<'static> {
        let (title, color) = match snapshot.phase() {
            GamePhase::Won => ("YOU WIN", Color::Green),
            _ => ("GAME OVER", Color::Red),
        };

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if snapshot.new_high_score() {
            text.push(Line::from(Span::styled(
                "NEW HIGH SCORE!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Space",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" / mouse swipe to move | "),
            Span::styled("Space", Style::default().fg(Color::Green)),
            Span::raw(" to start | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
