use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::host::{ElementTransform, Renderable, SpriteSpec, Surface, SurfaceError};

/// One live sprite as the renderer sees it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    pub spec: SpriteSpec,
    pub transform: ElementTransform,
}

struct Slot {
    generation: u32,
    sprite: Option<Sprite>,
}

#[derive(Default)]
struct Table {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
}

impl Table {
    fn get_mut(&mut self, index: usize, generation: u32) -> Option<&mut Sprite> {
        let slot = self.slots.get_mut(index)?;
        if slot.generation != generation {
            return None;
        }
        slot.sprite.as_mut()
    }

    fn release(&mut self, index: usize) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.sprite.take().is_none() {
            return false;
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.live -= 1;
        true
    }
}

/// Slot-allocated sprite storage with generation-checked handles.
#[derive(Clone, Default)]
pub struct SpriteSurface {
    table: Rc<RefCell<Table>>,
    capacity: Option<usize>,
}

impl SpriteSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that refuses to hold more than `capacity` sprites.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { table: Rc::default(), capacity: Some(capacity) }
    }

    pub fn live_count(&self) -> usize {
        self.table.borrow().live
    }

    /// Live sprites in slot order.
    pub fn sprites(&self) -> Vec<Sprite> {
        self.table.borrow().slots.iter().filter_map(|s| s.sprite).collect()
    }

    /// Destroys the sprite in `slot` behind its handle's back, as a window
    /// teardown would. The handle stays valid to hold but is no longer live.
    pub fn evict(&self, slot: usize) -> bool {
        self.table.borrow_mut().release(slot)
    }
}

impl Surface for SpriteSurface {
    type Handle = SpriteHandle;

    fn attach(&mut self, spec: &SpriteSpec) -> Result<SpriteHandle, SurfaceError> {
        let mut table = self.table.borrow_mut();
        if let Some(capacity) = self.capacity {
            if table.live >= capacity {
                return Err(SurfaceError::Full { capacity });
            }
        }

        let sprite = Sprite {
            spec: *spec,
            transform: ElementTransform { x: 0.0, y: 0.0, scale: 1.0, rotation: 0.0, opacity: 0.0 },
        };

        let index = match table.free.pop() {
            Some(index) => {
                table.slots[index].sprite = Some(sprite);
                index
            }
            None => {
                table.slots.push(Slot { generation: 0, sprite: Some(sprite) });
                table.slots.len() - 1
            }
        };
        table.live += 1;

        Ok(SpriteHandle {
            table: Rc::downgrade(&self.table),
            index,
            generation: table.slots[index].generation,
        })
    }

    fn detach(&mut self, handle: SpriteHandle) {
        let mut table = self.table.borrow_mut();
        if table.slots.get(handle.index).is_some_and(|s| s.generation == handle.generation) {
            table.release(handle.index);
        }
    }
}

/// Handle onto one slot of a [`SpriteSurface`].
///
/// Holds the table weakly: dropping every surface clone makes all handles dead.
#[derive(Debug)]
pub struct SpriteHandle {
    table: Weak<RefCell<Table>>,
    index: usize,
    generation: u32,
}

impl SpriteHandle {
    pub fn slot(&self) -> usize {
        self.index
    }
}

impl Renderable for SpriteHandle {
    fn is_live(&self) -> bool {
        self.table
            .upgrade()
            .is_some_and(|t| t.borrow_mut().get_mut(self.index, self.generation).is_some())
    }

    fn set_transform(&mut self, transform: &ElementTransform) {
        let Some(table) = self.table.upgrade() else {
            return;
        };
        if let Some(sprite) = table.borrow_mut().get_mut(self.index, self.generation) {
            sprite.transform = *transform;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SpriteShape;
    use crate::paint::Tint;

    fn spec(size: f32) -> SpriteSpec {
        SpriteSpec { size, shape: SpriteShape::Disc, tint: Tint::default() }
    }

    fn moved(x: f32) -> ElementTransform {
        ElementTransform { x, y: 0.0, scale: 1.0, rotation: 0.0, opacity: 1.0 }
    }

    #[test]
    fn attach_detach_tracks_live_count() {
        let mut surface = SpriteSurface::new();
        let a = surface.attach(&spec(1.0)).unwrap();
        let b = surface.attach(&spec(2.0)).unwrap();
        assert_eq!(surface.live_count(), 2);

        surface.detach(a);
        assert_eq!(surface.live_count(), 1);
        assert_eq!(surface.sprites()[0].spec.size, 2.0);
        surface.detach(b);
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut surface = SpriteSurface::with_capacity(1);
        let _a = surface.attach(&spec(1.0)).unwrap();
        assert_eq!(surface.attach(&spec(1.0)).err(), Some(SurfaceError::Full { capacity: 1 }));
    }

    #[test]
    fn reused_slot_does_not_revive_old_handle() {
        let mut surface = SpriteSurface::new();
        let mut old = surface.attach(&spec(1.0)).unwrap();
        surface.evict(old.slot());
        assert!(!old.is_live());

        let fresh = surface.attach(&spec(9.0)).unwrap();
        assert_eq!(fresh.slot(), old.slot());
        assert!(!old.is_live());

        old.set_transform(&moved(50.0));
        assert_eq!(surface.sprites()[0].transform.x, 0.0);
    }

    #[test]
    fn transforms_land_in_the_shared_table() {
        let mut surface = SpriteSurface::new();
        let view = surface.clone();
        let mut handle = surface.attach(&spec(3.0)).unwrap();

        handle.set_transform(&moved(12.5));
        assert_eq!(view.sprites()[0].transform.x, 12.5);
    }

    #[test]
    fn handles_die_with_the_surface() {
        let mut surface = SpriteSurface::new();
        let handle = surface.attach(&spec(1.0)).unwrap();
        drop(surface);
        assert!(!handle.is_live());
    }
}
