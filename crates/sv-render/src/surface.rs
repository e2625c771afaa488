use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use ratatui::style::{Color, Style};
use sv_core::color::Rgb;
use sv_core::traits::{Surface, SurfaceEvent};

use crate::grid::PixelGrid;

/// `Surface` ratatui : écrit la grille de pixels en demi-blocs directement
/// dans le buffer du terminal, sans widget — zéro overhead.
///
/// Une colonne de cellules = 1 pixel de large, une rangée = 2 pixels de
/// haut ('▄' : pixel bas en fg, pixel haut en bg, technique half-block).
/// La dernière rangée du terminal est réservée à la ligne de statut.
///
/// Esc, `q` et Ctrl+C remontent `SurfaceEvent::Close` ; un resize terminal
/// réalloue la grille et remonte `SurfaceEvent::Resize`.
pub struct TerminalSurface {
    terminal: DefaultTerminal,
    grid: PixelGrid,
    status: String,
}

impl TerminalSurface {
    /// Wrap an initialized ratatui terminal.
    ///
    /// # Errors
    /// Returns an error if the terminal size cannot be queried.
    pub fn new(terminal: DefaultTerminal) -> Result<Self> {
        let (cols, rows) = crossterm::terminal::size()?;
        let (w, h) = pixel_dims(cols, rows);
        Ok(Self {
            terminal,
            grid: PixelGrid::new(w, h),
            status: String::new(),
        })
    }
}

/// Dimensions pixel pour un terminal donné (statut : une rangée réservée).
fn pixel_dims(cols: u16, rows: u16) -> (u16, u16) {
    (cols, rows.saturating_sub(1) * 2)
}

impl Surface for TerminalSurface {
    fn size(&self) -> (u16, u16) {
        (self.grid.width(), self.grid.height())
    }

    fn clear(&mut self) {
        self.grid.clear();
    }

    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb) {
        self.grid.fill_rect(x, y, w, h, color);
    }

    fn set_status(&mut self, status: &str) {
        self.status.clear();
        self.status.push_str(status);
    }

    fn present(&mut self) -> Result<()> {
        let grid = &self.grid;
        let status = &self.status;
        self.terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();
            let rows = (grid.height() / 2).min(area.height.saturating_sub(1));
            let cols = grid.width().min(area.width);

            for cy in 0..rows {
                for cx in 0..cols {
                    let top = grid.get(cx, cy * 2);
                    let bottom = grid.get(cx, cy * 2 + 1);
                    if top == (0, 0, 0) && bottom == (0, 0, 0) {
                        continue; // cellule vide : le clear du draw suffit
                    }
                    if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                        cell.set_char('▄');
                        cell.set_fg(Color::Rgb(bottom.0, bottom.1, bottom.2));
                        if top != (0, 0, 0) {
                            cell.set_bg(Color::Rgb(top.0, top.1, top.2));
                        }
                    }
                }
            }

            if area.height > 0 && !status.is_empty() {
                let y = area.y + area.height - 1;
                buf.set_stringn(
                    area.x,
                    y,
                    status,
                    usize::from(area.width),
                    Style::default().fg(Color::DarkGray),
                );
            }
        })?;
        Ok(())
    }

    fn poll_event(&mut self, wait: Duration) -> Result<Option<SurfaceEvent>> {
        if !event::poll(wait)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                let close = matches!(code, KeyCode::Esc | KeyCode::Char('q'))
                    || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL));
                Ok(close.then_some(SurfaceEvent::Close))
            }
            Event::Resize(cols, rows) => {
                let (w, h) = pixel_dims(cols, rows);
                self.grid.resize(w, h);
                log::debug!("Terminal redimensionné : {cols}×{rows}");
                Ok(Some(SurfaceEvent::Resize(w, h)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_dims_reserve_status_row() {
        assert_eq!(pixel_dims(80, 25), (80, 48));
        assert_eq!(pixel_dims(80, 1), (80, 0));
        assert_eq!(pixel_dims(80, 0), (80, 0));
    }
}
