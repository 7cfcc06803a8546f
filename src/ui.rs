//! Terminal UI rendering with ratatui

use crate::board::Cell;
use crate::game::{GameStatus, Snapshot};
use crate::menu::{Menu, MenuItem};
use crate::settings::Settings;
use crate::tetromino::TetrominoType;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";

/// Width of the preview/stats column
const SIDE_WIDTH: u16 = 16;

/// Render one frame: board, active piece, side panel and the modal if open
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot, menu: Option<&Menu>, settings: &Settings) {
    let area = frame.area();
    let block_char = settings.visual.block_chars();

    // Start every frame from a blank surface
    frame.render_widget(Clear, area);

    let board_width = cells_to_u16(snapshot.board.width())
        .saturating_mul(2)
        .saturating_add(2);
    let board_height = cells_to_u16(snapshot.board.height()).saturating_add(2);
    let game_area = center_rect(area, board_width.saturating_add(SIDE_WIDTH), board_height);

    // Create main layout: board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Length(SIDE_WIDTH)])
        .split(game_area);

    render_board(frame, main_layout[0], snapshot, block_char);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Next piece (tallest shape is 4 rows)
            Constraint::Min(8),    // Stats
        ])
        .split(main_layout[1]);

    render_next(frame, right_layout[0], snapshot.next, block_char);
    render_stats(frame, right_layout[1], snapshot);

    if let Some(menu) = menu {
        render_menu(frame, area, menu, snapshot.status);
    }
}

fn cells_to_u16(cells: usize) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the game board with the active piece on top
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, block_char: &'static str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let board = snapshot.board;
    let mut grid: Vec<Vec<Option<Color>>> = board
        .rows()
        .iter()
        .map(|row| row.iter().map(Cell::color).collect())
        .collect();

    // Overlay the active piece; sub-cells above the board are not drawn
    if let Some(piece) = snapshot.active {
        for (x, y) in piece.cells() {
            if x < 0 || y < 0 {
                continue;
            }
            if let Some(slot) = grid.get_mut(y as usize).and_then(|row| row.get_mut(x as usize)) {
                *slot = Some(piece.color);
            }
        }
    }

    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|cell| cell_span(cell, block_char))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn cell_span(color: Option<Color>, block_char: &'static str) -> Span<'static> {
    match color {
        Some(color) => Span::styled(block_char, Style::default().fg(color).bold()),
        None => Span::raw(EMPTY),
    }
}

/// Render the next piece preview
fn render_next(frame: &mut Frame, area: Rect, next: Option<TetrominoType>, block_char: &'static str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(kind) = next else {
        return;
    };
    let color = kind.color();
    let lines: Vec<Line> = kind
        .shape()
        .rows()
        .iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|occupied| cell_span(occupied.then_some(color), block_char))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(Color::Gray)));

    let lines = vec![
        label("LEVEL"),
        Line::from(Span::styled(
            snapshot.difficulty.name(),
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        label("SCORE"),
        Line::from(Span::styled(
            snapshot.score.points.to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        label("LINES"),
        Line::from(Span::styled(
            snapshot.score.lines.to_string(),
            Style::default().fg(Color::Green),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the modal menu
fn render_menu(frame: &mut Frame, area: Rect, menu: &Menu, status: GameStatus) {
    let popup_area = center_rect(area, 30, cells_to_u16(menu.items.len()).saturating_add(6));

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" BLOCKTRIS ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let subtitle = match status {
        GameStatus::Paused => "PAUSED",
        GameStatus::Finished => "GAME OVER",
        _ => "",
    };

    let mut lines = vec![
        Line::styled(subtitle, Style::default().fg(Color::Red).bold()),
        Line::raw(""),
    ];

    for (i, item) in menu.items.iter().enumerate() {
        let text = match item {
            MenuItem::Difficulty => format!("< {} >", menu.difficulty.name()),
            other => other.label().to_string(),
        };
        let style = if i == menu.selected {
            Style::default().fg(Color::Black).bg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::styled(text, style));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "↑↓ select  ←→ change  ⏎ ok",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Game, GameConfig};
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_running_game() {
        let mut game = Game::new(GameConfig {
            seed: Some(5),
            ..GameConfig::default()
        });
        game.new_game();
        for _ in 0..3 {
            game.step();
        }

        let settings = Settings::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal
            .draw(|frame| render_game(frame, &game.snapshot(), None, &settings))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("NEXT"));
        assert!(text.contains("SCORE"));
        assert!(text.contains("[]"));
        assert!(!text.contains("BLOCKTRIS"));
    }

    #[test]
    fn test_render_board_wider_than_terminal() {
        let mut game = Game::new(GameConfig {
            width: 33_000,
            height: 4,
            seed: Some(5),
            ..GameConfig::default()
        });
        game.new_game();

        let settings = Settings::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal
            .draw(|frame| render_game(frame, &game.snapshot(), None, &settings))
            .unwrap();
    }

    #[test]
    fn test_render_menu_when_idle() {
        let game = Game::default();
        let settings = Settings::default();
        let menu = Menu::for_status(game.status(), game.difficulty());

        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal
            .draw(|frame| render_game(frame, &game.snapshot(), Some(&menu), &settings))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("BLOCKTRIS"));
        assert!(text.contains("New game"));
        assert!(text.contains("Normal"));
        assert!(!text.contains("Resume"));
    }
}
