#![allow(dead_code)]

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use lib_2048::{Completion, Direction, Grid, Position, Surface, TileId};
use tokio::sync::mpsc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub value: u32,
    pub position: Option<Position>,
}

#[derive(Debug, Default)]
pub struct Record {
    pub sprites: HashMap<TileId, Sprite>,
    pub created: usize,
    pub removed: usize,
    pub updates: usize,
    pub losses: usize,
    /// Keep slide completions instead of finishing them at once.
    pub hold_transitions: bool,
    pub held: Vec<Completion>,
    /// Keep appear completions instead of finishing them at once.
    pub hold_appears: bool,
    pub held_appears: Vec<Completion>,
    /// Sent once, the first time a slide starts.
    pub inject: Option<(mpsc::Sender<Direction>, Direction)>,
}

/// Surface that mirrors every representation so tests can compare it with
/// the grid.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub record: Rc<RefCell<Record>>,
}

impl RecordingSurface {
    pub fn holding_transitions() -> Self {
        let surface = Self::default();
        surface.record.borrow_mut().hold_transitions = true;
        surface
    }

    pub fn assert_matches(&self, grid: &Grid) {
        let record = self.record.borrow();

        assert_eq!(record.sprites.len(), grid.tile_count(), "\n{grid}");

        for cell in grid.cells() {
            if let Some(tile) = cell.tile() {
                let expected = Sprite {
                    value: tile.value(),
                    position: Some(cell.position()),
                };

                assert_eq!(record.sprites.get(&tile.id()), Some(&expected), "\n{grid}");
            }
        }
    }
}

impl Surface for RecordingSurface {
    fn create_tile(&mut self, id: TileId, value: u32, appeared: Completion) {
        let mut record = self.record.borrow_mut();

        if record.hold_appears {
            record.held_appears.push(appeared);
        }

        record.created += 1;
        let previous = record.sprites.insert(
            id,
            Sprite {
                value,
                position: None,
            },
        );
        assert!(previous.is_none(), "tile {id} created twice");
    }

    fn position_tile(&mut self, id: TileId, at: Position, transition: Option<Completion>) {
        let mut record = self.record.borrow_mut();

        record
            .sprites
            .get_mut(&id)
            .expect("positioned tile has a representation")
            .position = Some(at);

        if transition.is_some() {
            if let Some((tx, direction)) = record.inject.take() {
                tx.try_send(direction).expect("injected input fits");
            }
        }

        if let Some(transition) = transition {
            if record.hold_transitions {
                record.held.push(transition);
            }
        }
    }

    fn update_tile(&mut self, id: TileId, value: u32) {
        let mut record = self.record.borrow_mut();

        record.updates += 1;
        record
            .sprites
            .get_mut(&id)
            .expect("updated tile has a representation")
            .value = value;
    }

    fn remove_tile(&mut self, id: TileId) {
        let mut record = self.record.borrow_mut();

        record.removed += 1;
        assert!(record.sprites.remove(&id).is_some(), "tile {id} removed twice");
    }

    fn notify_loss(&mut self) {
        self.record.borrow_mut().losses += 1;
    }
}

/// Board where nothing can move.
pub const LOCKED: [[u32; 4]; 4] = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

/// Locks after `Left`: the 8s merge and the spawn fills the only free cell.
pub const LAST_MOVE: [[u32; 4]; 4] = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 8, 8]];
