/// Rendering layer — all terminal I/O lives here.
///
/// The simulation runs in arena units; this module projects them onto the
/// terminal grid and translates one `Frame` into crossterm commands.  No game
/// logic is performed.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::config::Arena;
use crate::entities::{Enemy, EnemyKind, GameState};
use crate::render::{boss_health_fraction, Frame, Hud, Renderer};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Cyan;
const C_HUD_HEALTH_LOW: Color = Color::Red;
const C_PLAYER: Color = Color::Cyan;
const C_GRUNT: Color = Color::DarkYellow;
const C_BOSS: Color = Color::Magenta;
const C_BOSS_BAR: Color = Color::Red;
const C_BULLET: Color = Color::White;
const C_STAR: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

const HEALTH_BAR_CELLS: usize = 10;
const BOSS_BAR_CELLS: usize = 9;

// ── Projection ────────────────────────────────────────────────────────────────

/// Terminal layout: row 0 HUD, row 1 top border, rows `2..rows-2` play
/// area, row `rows-2` bottom border, last row controls hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    fn inner(&self) -> (f32, f32) {
        (
            self.cols.saturating_sub(2) as f32,
            self.rows.saturating_sub(4) as f32,
        )
    }

    /// Map an arena position to a terminal cell, or `None` when it falls
    /// outside the visible play area.
    pub fn project(&self, x: f32, y: f32, arena: &Arena) -> Option<(u16, u16)> {
        let (inner_w, inner_h) = self.inner();
        if inner_w < 1.0 || inner_h < 1.0 {
            return None;
        }
        if !(0.0..arena.width()).contains(&x) || !(0.0..arena.height()).contains(&y) {
            return None;
        }
        let col = 1 + (x / arena.width() * inner_w) as u16;
        let row = 2 + (y / arena.height() * inner_h) as u16;
        Some((
            col.min(self.cols.saturating_sub(2)),
            row.min(self.rows.saturating_sub(3)),
        ))
    }

    /// Convert a movement of whole cells back into arena units.
    pub fn cells_to_arena(&self, dcol: i32, drow: i32, arena: &Arena) -> (f32, f32) {
        let (inner_w, inner_h) = self.inner();
        let sx = if inner_w >= 1.0 { arena.width() / inner_w } else { 0.0 };
        let sy = if inner_h >= 1.0 { arena.height() / inner_h } else { 0.0 };
        (dcol as f32 * sx, drow as f32 * sy)
    }

    fn in_play_area(&self, row: u16) -> bool {
        row >= 2 && row < self.rows.saturating_sub(2)
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

pub struct TerminalRenderer<W: Write> {
    out: W,
    viewport: Viewport,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, viewport: Viewport) -> Self {
        Self { out, viewport }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    /// Render one complete frame.
    fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let out = &mut self.out;
        let vp = self.viewport;
        let state = frame.state;

        out.queue(terminal::Clear(terminal::ClearType::All))?;

        if frame.ui.start_screen {
            draw_start_screen(out, vp)?;
        } else {
            draw_border(out, vp)?;
            for star in &state.stars {
                if let Some((col, row)) = vp.project(star.x, star.y, &state.arena) {
                    out.queue(cursor::MoveTo(col, row))?;
                    out.queue(style::SetForegroundColor(C_STAR))?;
                    out.queue(Print("·"))?;
                }
            }
            for enemy in &state.enemies {
                draw_enemy(out, vp, enemy, state)?;
            }
            for bullet in &state.player.bullets {
                if let Some((col, row)) = vp.project(bullet.x, bullet.y, &state.arena) {
                    out.queue(cursor::MoveTo(col, row))?;
                    out.queue(style::SetForegroundColor(C_BULLET))?;
                    out.queue(Print("║"))?;
                }
            }
            draw_player(out, vp, state)?;
            draw_controls_hint(out, vp)?;
        }

        if frame.ui.hud {
            draw_hud(out, vp, &frame.hud)?;
        }
        if frame.ui.status_screen {
            draw_status_screen(out, vp, frame)?;
        }

        // Park cursor in a harmless spot and flush
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(1)))?;
        out.flush()?;
        Ok(())
    }
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, vp: Viewport) -> io::Result<()> {
    let w = vp.cols as usize;
    let h = vp.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, vp: Viewport, hud: &Hud) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("SCORE {}", hud.score_text)))?;

    let filled = (hud.health_percent as usize * HEALTH_BAR_CELLS).div_ceil(100);
    let bar = format!(
        "HP [{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(HEALTH_BAR_CELLS - filled),
        hud.health_percent
    );
    let color = if hud.health_percent <= 30 {
        C_HUD_HEALTH_LOW
    } else {
        C_HUD_HEALTH
    };
    let col = vp.cols.saturating_sub(bar.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(col, 0))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(bar))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, vp: Viewport, state: &GameState) -> io::Result<()> {
    //   ▲       ← nose
    //  /█\      ← wings
    let p = &state.player;
    let Some((col, row)) = vp.project(p.x, p.y, &state.arena) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print("▲"))?;
    if vp.in_play_area(row + 1) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row + 1))?;
        out.queue(Print("/█\\"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(
    out: &mut W,
    vp: Viewport,
    enemy: &Enemy,
    state: &GameState,
) -> io::Result<()> {
    let Some((col, row)) = vp.project(enemy.x, enemy.y, &state.arena) else {
        return Ok(());
    };
    match enemy.kind {
        EnemyKind::Grunt => {
            out.queue(style::SetForegroundColor(C_GRUNT))?;
            out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
            out.queue(Print("«▼»"))?;
        }
        EnemyKind::Boss { .. } => {
            let lx = col.saturating_sub(3).max(1);
            if vp.in_play_area(row.saturating_sub(1)) {
                let fraction = boss_health_fraction(enemy.hp, enemy.max_hp);
                let filled = (fraction * BOSS_BAR_CELLS as f32).ceil() as usize;
                let filled = filled.min(BOSS_BAR_CELLS);
                out.queue(cursor::MoveTo(col.saturating_sub(4).max(1), row - 1))?;
                out.queue(style::SetForegroundColor(C_BOSS_BAR))?;
                out.queue(Print(format!(
                    "{}{}",
                    "■".repeat(filled),
                    "□".repeat(BOSS_BAR_CELLS - filled)
                )))?;
            }
            out.queue(style::SetForegroundColor(C_BOSS))?;
            out.queue(cursor::MoveTo(lx, row))?;
            out.queue(Print("◢▓▓█▓▓◣"))?;
            if vp.in_play_area(row + 1) {
                out.queue(cursor::MoveTo(lx, row + 1))?;
                out.queue(Print(" ◥▀▼▀◤ "))?;
            }
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, vp: Viewport) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, vp.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "WASD/Arrows : Move   SPACE : Fire   Drag : Steer   P : Pause   Q : Quit",
    ))?;
    Ok(())
}

// ── Screens ───────────────────────────────────────────────────────────────────

fn print_centered<W: Write>(
    out: &mut W,
    vp: Viewport,
    row: u16,
    text: &str,
    color: Color,
) -> io::Result<()> {
    let col = (vp.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_start_screen<W: Write>(out: &mut W, vp: Viewport) -> io::Result<()> {
    let cy = vp.rows / 2;
    print_centered(out, vp, cy.saturating_sub(4), "★  N E O N   S T R I K E  ★", C_TITLE)?;
    print_centered(
        out,
        vp,
        cy.saturating_sub(2),
        "Survive the swarm. Bring down the mothership.",
        Color::White,
    )?;
    print_centered(out, vp, cy, "ENTER : Launch   Q : Quit", Color::Yellow)?;
    print_centered(
        out,
        vp,
        cy + 2,
        "WASD/Arrows : Move   SPACE : Fire   Drag : Steer   P : Pause",
        C_HINT,
    )?;
    Ok(())
}

fn draw_status_screen<W: Write>(out: &mut W, vp: Viewport, frame: &Frame<'_>) -> io::Result<()> {
    let title = frame.ui.status_title.unwrap_or_default();
    let inner = title.chars().count().max(20) + 4;
    let top = format!("╔{}╗", "═".repeat(inner));
    let mid = format!("║{:^width$}║", title, width = inner);
    let bottom = format!("╚{}╝", "═".repeat(inner));

    let start_row = (vp.rows / 2).saturating_sub(3);
    for (i, line) in [top, mid, bottom].iter().enumerate() {
        print_centered(out, vp, start_row + i as u16, line, Color::Red)?;
    }

    let score_line = format!("Score: {}", frame.hud.score_text);
    print_centered(out, vp, start_row + 3, &score_line, Color::Yellow)?;

    let mut actions = Vec::new();
    if frame.ui.resume_button {
        actions.push("P - Resume");
    }
    if frame.ui.restart_button {
        actions.push("R - Restart");
    }
    actions.push("Q - Quit");
    print_centered(out, vp, start_row + 4, &actions.join("   "), Color::White)?;
    Ok(())
}
