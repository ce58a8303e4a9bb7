//! The terminal as the board's visual layer.
use std::{io, io::Write, time::Duration};

use lib_2048::{Completion, Position, Surface, TileId, Values};
use rustc_hash::FxHashMap;
use tracing::{error, warn};

use crate::render::{self, EMPTY_BOARD};

const LOSS_MESSAGE: &str = "Try again!";

#[derive(Debug)]
struct Sprite {
    value: u32,
    position: Option<Position>,
}

/// Draws tiles as they are positioned and finishes their animations after a
/// fixed delay.
pub struct TerminalSurface<W> {
    out: W,
    sprites: FxHashMap<TileId, Sprite>,
    shown: Values,
    slide: Duration,
    appear: Duration,
    error: Option<io::Error>,
}

impl<W> TerminalSurface<W>
where
    W: Write,
{
    pub fn new(out: W, slide: Duration, appear: Duration) -> Self {
        Self {
            out,
            sprites: FxHashMap::default(),
            shown: EMPTY_BOARD,
            slide,
            appear,
            error: None,
        }
    }

    /// Draws the whole frame below the cursor.
    pub fn draw(&mut self) -> io::Result<()> {
        let frame = self.frame();
        render::draw_board(&mut self.out, &frame)?;
        self.shown = frame;

        Ok(())
    }

    /// First write failure since the last call, if any. Drawing stops after
    /// a failure.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    fn frame(&self) -> Values {
        let mut frame = EMPTY_BOARD;

        for sprite in self.sprites.values() {
            if let Some(Position { row, column }) = sprite.position {
                let shown = &mut frame[row][column];
                *shown = (*shown).max(sprite.value);
            }
        }

        frame
    }

    fn refresh(&mut self) {
        if self.error.is_some() {
            return;
        }

        let frame = self.frame();

        match render::redraw_board(&mut self.out, &self.shown, &frame) {
            Ok(()) => self.shown = frame,
            Err(err) => {
                error!(%err, "failed to draw the board");
                self.error = Some(err);
            }
        }
    }

    fn finish_after(delay: Duration, completion: Completion) {
        if delay.is_zero() {
            completion.complete();
            return;
        }

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            completion.complete();
        });
    }
}

impl<W> Surface for TerminalSurface<W>
where
    W: Write,
{
    fn create_tile(&mut self, id: TileId, value: u32, appeared: Completion) {
        self.sprites.insert(
            id,
            Sprite {
                value,
                position: None,
            },
        );

        Self::finish_after(self.appear, appeared);
    }

    fn position_tile(&mut self, id: TileId, at: Position, transition: Option<Completion>) {
        match self.sprites.get_mut(&id) {
            Some(sprite) => sprite.position = Some(at),
            None => warn!(tile = %id, "positioning a tile that was never created"),
        }

        if let Some(transition) = transition {
            Self::finish_after(self.slide, transition);
        }

        self.refresh();
    }

    fn update_tile(&mut self, id: TileId, value: u32) {
        match self.sprites.get_mut(&id) {
            Some(sprite) => sprite.value = value,
            None => warn!(tile = %id, "updating a tile that was never created"),
        }

        self.refresh();
    }

    fn remove_tile(&mut self, id: TileId) {
        self.sprites.remove(&id);
        self.refresh();
    }

    fn notify_loss(&mut self) {
        if self.error.is_some() {
            return;
        }

        if let Err(err) = writeln!(self.out, "{LOSS_MESSAGE}").and_then(|()| self.out.flush()) {
            error!(%err, "failed to show the loss message");
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use lib_2048::{resolver, Direction, Grid};

    use super::*;

    fn surface() -> TerminalSurface<Vec<u8>> {
        TerminalSurface::new(Vec::new(), Duration::ZERO, Duration::ZERO)
    }

    #[tokio::test]
    async fn frame_follows_the_board_through_a_move() {
        let mut surface = surface();
        let mut grid = Grid::from_values(
            [[2, 2, 0, 4], [0, 0, 0, 0], [8, 0, 0, 0], [0, 0, 0, 0]],
            &mut surface,
        )
        .unwrap();
        assert_eq!(surface.frame(), grid.values());

        resolver::resolve(&mut grid, Direction::Right, &mut surface)
            .await
            .unwrap();

        assert_eq!(surface.frame(), grid.values());
        assert_eq!(surface.shown, grid.values());
        assert_eq!(surface.sprites.len(), grid.tile_count());
    }

    #[test]
    fn loss_message_is_written_once_per_call() {
        let mut surface = surface();

        surface.notify_loss();

        let text = String::from_utf8(surface.out.clone()).unwrap();
        assert_eq!(text, format!("{LOSS_MESSAGE}\n"));
        assert!(surface.take_error().is_none());
    }
}
