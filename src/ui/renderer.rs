/// Presentation layer: terminal renderer for the pyramid.
///
/// The core computes what sits where; this module decides how that
/// looks in a character grid. Each frame is composed into an offscreen
/// buffer, then emitted in one batched, buffered write to avoid
/// flicker. The grid projection mirrors `PyramidGeometry::cell_center`
/// scaled to character cells: every cube is CUBE_W columns wide, each
/// row drops by two terminal rows and shifts half a cube sideways.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::PyramidGeometry;
use crate::sim::session::{GameSession, Phase};

// ── CGA-flavored palette, after the original cabinet look ──

const COLOR_CUBE_INITIAL: Color = Color::Cyan;
const COLOR_CUBE_TARGET: Color = Color::Magenta;
const COLOR_PLAYER: Color = Color::White;
const COLOR_COILY: Color = Color::Yellow;
const COLOR_BALL: Color = Color::Red;
const COLOR_DISC: Color = Color::Green;
const COLOR_DISC_COOLDOWN: Color = Color::DarkGrey;
const COLOR_TEXT: Color = Color::White;

/// Terminal columns per cube.
const CUBE_W: i32 = 6;
/// Terminal rows per pyramid row.
const ROW_H: i32 = 2;
/// Top-left anchor of the pyramid drawing area.
const ORIGIN_X: i32 = 36;
const ORIGIN_Y: i32 = 3;

const HUD_ROW: u16 = 0;

// ── Character cell of the frame buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
}

const BLANK: Cell = Cell { ch: ' ', fg: COLOR_TEXT };

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn set(&mut self, x: i32, y: i32, ch: char, fg: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = Cell { ch, fg };
        }
    }

    fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg);
        }
    }

    fn put_centered(&mut self, y: i32, s: &str, fg: Color) {
        let x = (self.width as i32 - s.chars().count() as i32) / 2;
        self.put_str(x, y, s, fg);
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    frame: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            frame: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.frame.resize(self.term_w, self.term_h);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &GameSession) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.frame.resize(self.term_w, self.term_h);
            queue!(self.writer, Clear(ClearType::All))?;
        }

        self.frame.clear();
        self.compose_pyramid(session);
        self.compose_discs(session);
        self.compose_actors(session);
        self.compose_hud(session);
        self.compose_overlay(session);
        self.flush_frame()
    }

    // ── Grid → terminal projection ──

    /// Left edge of the cube's top face in terminal coordinates.
    fn cube_origin(row: i32, col: i32) -> (i32, i32) {
        let x = ORIGIN_X + col * CUBE_W - row * CUBE_W / 2;
        let y = ORIGIN_Y + row * ROW_H;
        (x, y)
    }

    fn compose_pyramid(&mut self, session: &GameSession) {
        for cube in session.cubes.iter() {
            let (x, y) = Self::cube_origin(cube.row, cube.col);
            let color = if cube.is_target_color() { COLOR_CUBE_TARGET } else { COLOR_CUBE_INITIAL };
            self.frame.put_str(x, y, "▄▄▄▄▄", color);
            self.frame.put_str(x, y + 1, "▀▀▀▀▀", Color::DarkBlue);
        }
    }

    fn compose_discs(&mut self, session: &GameSession) {
        // Discs float off the pyramid's upper edges, beside row 2.
        let (lx, ly) = Self::cube_origin(2, 0);
        let (rx, ry) = Self::cube_origin(2, 2);
        let anchors = [(lx - CUBE_W, ly), (rx + CUBE_W, ry)];
        for (disc, (x, y)) in session.discs.iter().zip(anchors) {
            let color = if disc.is_available() { COLOR_DISC } else { COLOR_DISC_COOLDOWN };
            self.frame.put_str(x, y, "(===)", color);
        }
    }

    fn compose_actors(&mut self, session: &GameSession) {
        let geom = &session.geom;

        if session.ball.actor.active {
            self.draw_actor(geom, session.ball.actor.row, session.ball.actor.col, 'o', COLOR_BALL);
        }
        if session.coily.actor.active {
            self.draw_actor(geom, session.coily.actor.row, session.coily.actor.col, 'S', COLOR_COILY);
        }
        if session.player.actor.active {
            self.draw_actor(geom, session.player.actor.row, session.player.actor.col, '@', COLOR_PLAYER);
        }
    }

    /// Actors sit one terminal row above their cube's top face.
    /// Off-grid actors are simply not drawn.
    fn draw_actor(&mut self, geom: &PyramidGeometry, row: i32, col: i32, ch: char, fg: Color) {
        if !geom.is_valid_cell(row, col) {
            return;
        }
        let (x, y) = Self::cube_origin(row, col);
        self.frame.set(x + CUBE_W / 2 - 1, y - 1, ch, fg);
    }

    fn compose_hud(&mut self, session: &GameSession) {
        let hud = format!(
            "SCORE {:<8} LIVES {:<3} LEVEL {}",
            session.score, session.player.lives, session.level
        );
        self.frame.put_str(1, HUD_ROW as i32, &hud, COLOR_TEXT);
    }

    fn compose_overlay(&mut self, session: &GameSession) {
        let mid = self.frame.height as i32 / 2;
        match session.phase {
            Phase::GameOver => {
                self.frame.put_centered(mid - 1, "GAME OVER", COLOR_PLAYER);
                self.frame
                    .put_centered(mid + 1, "Press 'R' to restart or ESC to exit", COLOR_TEXT);
            }
            Phase::LevelSplash => {
                let msg = format!("LEVEL {} COMPLETE!", session.level - 1);
                self.frame.put_centered(mid, &msg, COLOR_CUBE_TARGET);
            }
            Phase::LevelComplete => {
                let msg = format!("LEVEL {} COMPLETE!", session.level - 1);
                self.frame.put_centered(mid - 1, &msg, COLOR_CUBE_TARGET);
                self.frame.put_centered(mid + 1, "Press 'N' for the next level", COLOR_TEXT);
            }
            Phase::PlayerDied | Phase::Playing => {}
        }
    }

    // ── Emit the frame in one buffered write ──

    fn flush_frame(&mut self) -> io::Result<()> {
        let mut last_fg = COLOR_TEXT;
        queue!(self.writer, SetForegroundColor(last_fg))?;
        for y in 0..self.frame.height {
            queue!(self.writer, MoveTo(0, y as u16))?;
            for x in 0..self.frame.width {
                let cell = self.frame.cells[y * self.frame.width + x];
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                queue!(self.writer, Print(cell.ch))?;
            }
        }
        queue!(self.writer, SetBackgroundColor(Color::Reset))?;
        self.writer.flush()
    }
}
