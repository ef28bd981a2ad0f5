use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::game::{RunState, Snapshot};
use crate::game_loop::{Command, InputSource, Renderer};
use crate::snake::{Cell, Direction::*};
use crate::{GRID_CELLS, UNIT_SIZE};

type Coords = (u16, u16);

// Terminal glyphs are about twice as tall as wide, so a cell spans two columns
const CELL_WIDTH: u16 = 2;
const BOARD_COLS: u16 = GRID_CELLS as u16 * CELL_WIDTH + 2;
const BOARD_ROWS: u16 = GRID_CELLS as u16 + 2;

const SNAKE_GLYPH: &str = "██";
const FOOD_GLYPH: &str = "()";

pub struct TermManager {
    width: u16,
    height: u16,
    origin: Coords,
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        ensure!(
            width >= BOARD_COLS && height > BOARD_ROWS,
            "Terminal is {}x{}, the board needs at least {}x{}",
            width,
            height,
            BOARD_COLS,
            BOARD_ROWS + 1
        );

        let origin = ((width - BOARD_COLS) / 2, (height - BOARD_ROWS - 1) / 2);
        Ok(TermManager { width, height, origin, stdout: stdout() })
    }

    pub fn setup(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        let entered = execute!(self.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)
            .context("Error entering alt screen");
        if entered.is_err() {
            // Best effort, the alt screen error is the one worth reporting
            let _ = self.restore();
        }

        entered
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error disabling raw mode")?;
        execute!(self.stdout, ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")
    }

    /// Returns false if the player quit from the intro screen.
    pub fn show_intro(&mut self) -> Result<bool> {
        self.show_message(&[
            "Arrow keys or WASD to move",
            "SPACE to restart after game over",
            "CTRL+C to quit",
            "",
            "Press any key to begin",
        ])?;

        let key = read_key_blocking()?;
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        Ok(!is_ctrl_c(&key))
    }

    fn draw_borders(&mut self) -> Result<()> {
        let (left, top) = self.origin;
        let right = left + BOARD_COLS - 1;
        let bottom = top + BOARD_ROWS - 1;
        let edge = format!("+{}+", "-".repeat(BOARD_COLS as usize - 2));

        queue!(self.stdout, ResetColor, cursor::MoveTo(left, top), Print(&edge))?;
        queue!(self.stdout, cursor::MoveTo(left, bottom), Print(&edge))?;
        for y in top + 1..bottom {
            queue!(self.stdout, cursor::MoveTo(left, y), Print('|'))?;
            queue!(self.stdout, cursor::MoveTo(right, y), Print('|'))?;
        }

        Ok(())
    }

    fn clear_board(&mut self) -> Result<()> {
        let blank = " ".repeat((BOARD_COLS - 2) as usize);
        for row in 0..GRID_CELLS as u16 {
            queue!(self.stdout, cursor::MoveTo(self.origin.0 + 1, self.origin.1 + 1 + row), Print(&blank))?;
        }

        Ok(())
    }

    fn print_cell(&mut self, cell: Cell, glyph: &str, color: Color) -> Result<()> {
        // The head may be off the board on the tick that ends the game
        if let Some((x, y)) = self.cell_position(cell) {
            queue!(self.stdout, cursor::MoveTo(x, y), SetForegroundColor(color), Print(glyph))?;
        }

        Ok(())
    }

    fn cell_position(&self, cell: Cell) -> Option<Coords> {
        if !cell.in_bounds() {
            return None;
        }

        let col = (cell.x / UNIT_SIZE) as u16;
        let row = (cell.y / UNIT_SIZE) as u16;
        Some((self.origin.0 + 1 + col * CELL_WIDTH, self.origin.1 + 1 + row))
    }

    fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap_or(0) + 4) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0 - msg_width / 2, center.1 - msg_height / 2);
        let blank = " ".repeat(msg_width as usize);

        queue!(self.stdout, ResetColor)?;
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), Print(&blank))?;
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), Print(padded_line))?;
        }

        self.stdout.flush().context("Error flushing")
    }
}

impl Renderer for TermManager {
    fn draw(&mut self, view: &Snapshot<'_>) -> Result<()> {
        self.draw_borders()?;
        self.clear_board()?;

        self.print_cell(view.food, FOOD_GLYPH, Color::Red)?;
        // Head last so it stays visible when food or body overlap it
        for (i, cell) in view.body.iter().enumerate().rev() {
            let color = if i == 0 { Color::Yellow } else { Color::Green };
            self.print_cell(*cell, SNAKE_GLYPH, color)?;
        }

        let score = format!("Score: {}", view.score);
        queue!(
            self.stdout,
            ResetColor,
            cursor::MoveTo(self.origin.0, self.origin.1 + BOARD_ROWS),
            terminal::Clear(ClearType::CurrentLine),
            Print(&score)
        )?;

        if view.run_state == RunState::Terminated {
            self.show_message(&["Game Over", score.as_str(), "", "Press SPACE to restart", "or CTRL+C to quit"])?;
        }

        self.stdout.flush().context("Error flushing")
    }
}

/// Keyboard input read straight from the terminal.
pub struct TermInput;

impl InputSource for TermInput {
    fn next_command(&mut self, timeout: Duration) -> Result<Option<Command>> {
        if !poll(timeout).context("Error polling for input")? {
            return Ok(None);
        }

        match read().context("Error reading input")? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(command_for(&key)),
            _ => Ok(None),
        }
    }
}

fn command_for(key: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(key) {
        return Some(Command::Quit);
    }

    match key.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Command::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Command::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Command::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Command::Turn(Right)),
        KeyCode::Char(' ') => Some(Command::Restart),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

fn read_key_blocking() -> Result<KeyEvent> {
    loop {
        if let Event::Key(ev) = read().context("Error reading input")? {
            if ev.kind == KeyEventKind::Press {
                return Ok(ev);
            }
        }
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
