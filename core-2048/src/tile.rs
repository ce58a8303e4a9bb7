use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    animation::{self, AnimationEnd, Completion},
    Surface,
};

/// Value of every freshly spawned tile.
pub const SPAWN_VALUE: u32 = 2;

static NEXT_TILE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a tile's visual representation, unique per process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u64);

impl TileId {
    fn next() -> Self {
        Self(NEXT_TILE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A numbered piece. Not `Clone`: a tile is owned by at most one cell and
/// moves between cells.
#[derive(Debug)]
pub struct Tile {
    id: TileId,
    value: u32,
    appeared: Option<AnimationEnd>,
    transition: Option<Completion>,
}

impl Tile {
    pub fn new(surface: &mut dyn Surface) -> Self {
        Self::with_value(SPAWN_VALUE, surface)
    }

    pub(crate) fn with_value(value: u32, surface: &mut dyn Surface) -> Self {
        let id = TileId::next();
        let (appeared, end) = animation::channel();

        surface.create_tile(id, value, appeared);

        Self {
            id,
            value,
            appeared: Some(end),
            transition: None,
        }
    }

    pub const fn id(&self) -> TileId {
        self.id
    }

    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Only merges change a tile's value.
    pub fn set_value(&mut self, value: u32, surface: &mut dyn Surface) {
        self.value = value;
        surface.update_tile(self.id, value);
    }

    /// Arms a slide animation for the next time this tile is positioned.
    ///
    /// The returned end fires once the visual layer finishes that slide.
    pub fn wait_for_transition_end(&mut self) -> AnimationEnd {
        let (completion, end) = animation::channel();
        self.transition = Some(completion);

        end
    }

    /// End of the appear animation started when the tile was created.
    ///
    /// Only the first call waits on the animation; later calls return an end
    /// that has already fired.
    pub fn wait_for_animation_end(&mut self) -> AnimationEnd {
        self.appeared.take().unwrap_or_else(AnimationEnd::finished)
    }

    pub(crate) fn take_transition(&mut self) -> Option<Completion> {
        self.transition.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullSurface;

    #[test]
    fn new_tiles_start_at_two_with_distinct_ids() {
        let first = Tile::new(&mut NullSurface);
        let second = Tile::new(&mut NullSurface);

        assert_eq!(first.value(), SPAWN_VALUE);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn transition_end_fires_when_the_completion_is_released() {
        let mut tile = Tile::new(&mut NullSurface);
        let mut end = tile.wait_for_transition_end();
        assert!(!end.is_finished());

        drop(tile.take_transition());
        assert!(end.is_finished());
    }

    #[test]
    fn appear_animation_can_only_be_awaited_once() {
        let mut tile = Tile::new(&mut NullSurface);

        // NullSurface drops the appear completion straight away.
        assert!(tile.wait_for_animation_end().is_finished());
        assert!(tile.wait_for_animation_end().is_finished());
    }
}
