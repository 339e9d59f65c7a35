use crate::config::FieldConfig;
use crate::coords::Viewport;
use crate::host::{Renderable, Surface};
use crate::input::PointerState;
use crate::FieldError;

use super::element::MovableElement;
use super::physics::{step_body, PhysicsParams};
use super::spawn::Spawner;
use super::sync::{render_sync, SyncReport};

/// Outcome of one physics step.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Elements inside the pointer radius this step.
    pub repelled: usize,
}

/// Owns the live elements of one field, one visual handle each.
pub struct Registry<H> {
    elements: Vec<MovableElement<H>>,
    params: PhysicsParams,
    wrap_margin: f32,
    viewport: Viewport,
}

impl<H: Renderable> Registry<H> {
    /// Spawns `config.element_count` elements and attaches a handle for each.
    ///
    /// All or nothing: if the surface refuses one handle, every handle
    /// attached so far is detached again before the error is returned.
    pub fn initialize<S>(surface: &mut S, config: &FieldConfig, viewport: Viewport) -> Result<Self, FieldError>
    where
        S: Surface<Handle = H>,
    {
        config.validate()?;

        let mut spawner = Spawner::new(config.seed);
        let mut elements = Vec::with_capacity(config.element_count);

        for index in 0..config.element_count {
            let seed = spawner.spawn(index, config, viewport);
            match surface.attach(&seed.sprite) {
                Ok(handle) => {
                    elements.push(MovableElement::new(seed.body, seed.sprite.size, seed.opacity, seed.rotation, handle));
                }
                Err(e) => {
                    log::warn!("attach failed at element {index}/{}: {e}", config.element_count);
                    for element in elements.drain(..) {
                        surface.detach(element.into_handle());
                    }
                    return Err(FieldError::Attach(e));
                }
            }
        }

        log::debug!("registry initialized with {} elements", elements.len());

        Ok(Self {
            elements,
            params: PhysicsParams {
                radius: config.interaction_radius,
                repulsion: config.repulsion,
                bounds: viewport.wrap_bounds(config.wrap_margin),
            },
            wrap_margin: config.wrap_margin,
            viewport,
        })
    }

    /// Advances every element by one frame against the same pointer sample.
    pub fn step(&mut self, pointer: PointerState) -> StepReport {
        let mut report = StepReport::default();
        for element in &mut self.elements {
            if step_body(&mut element.body, &pointer, &self.params) > 0.0 {
                report.repelled += 1;
            }
        }
        report
    }

    /// Pushes every element's transform onto its handle. Dead handles are skipped.
    pub fn sync(&mut self) -> SyncReport {
        render_sync(&mut self.elements)
    }

    /// Adopts new wrap bounds. Elements outside them wrap on the next step.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.params.bounds = viewport.wrap_bounds(self.wrap_margin);
    }

    /// Hands every handle back to `surface` and empties the registry.
    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: Surface<Handle = H>,
    {
        for element in self.elements.drain(..) {
            surface.detach(element.into_handle());
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in spawn order.
    pub fn elements(&self) -> &[MovableElement<H>] {
        &self.elements
    }

    /// Mutable access for placing elements by hand. The handles stay owned
    /// by the registry.
    pub fn elements_mut(&mut self) -> &mut [MovableElement<H>] {
        &mut self.elements
    }

    /// Viewport the wrap bounds were derived from.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::host::SurfaceError;
    use crate::scene::SpriteSurface;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    // ── initialize ────────────────────────────────────────────────────────

    #[test]
    fn one_handle_per_element() {
        let mut surface = SpriteSurface::new();
        let cfg = FieldConfig::particles().with_seed(1);
        let registry = Registry::initialize(&mut surface, &cfg, viewport()).unwrap();

        assert_eq!(registry.len(), 15);
        assert_eq!(surface.live_count(), 15);
        assert!(registry.elements().iter().all(|e| e.handle().is_live()));
    }

    #[test]
    fn zero_count_is_empty() {
        let mut surface = SpriteSurface::new();
        let cfg = FieldConfig::particles().with_count(0);
        let registry = Registry::initialize(&mut surface, &cfg, viewport()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn failed_attach_rolls_back() {
        let mut surface = SpriteSurface::with_capacity(4);
        let cfg = FieldConfig::particles().with_count(6);

        let err = Registry::initialize(&mut surface, &cfg, viewport()).err();
        assert_eq!(err, Some(FieldError::Attach(SurfaceError::Full { capacity: 4 })));
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn oversized_or_non_finite_config_is_refused_before_spawning() {
        let mut surface = SpriteSurface::new();
        let huge = FieldConfig::particles().with_count(usize::MAX);
        let runaway = FieldConfig { max_speed: f32::INFINITY, ..FieldConfig::particles() };

        for cfg in [huge, runaway] {
            let err = Registry::initialize(&mut surface, &cfg, viewport()).err();
            assert!(matches!(err, Some(FieldError::InvalidConfig(_))));
        }
        assert_eq!(surface.live_count(), 0);
    }

    // ── step / sync ───────────────────────────────────────────────────────

    #[test]
    fn step_counts_repelled_elements() {
        let mut surface = SpriteSurface::new();
        let cfg = FieldConfig::shapes().with_seed(5).with_count(2);
        let mut registry = Registry::initialize(&mut surface, &cfg, viewport()).unwrap();

        for element in registry.elements_mut() {
            element.body.velocity = Vec2::zero();
        }
        registry.elements_mut()[0].body.position = Vec2::new(400.0, 300.0);
        registry.elements_mut()[1].body.position = Vec2::new(50.0, 50.0);

        let report = registry.step(PointerState::at(Vec2::new(410.0, 300.0)));

        assert_eq!(report.repelled, 1);
        assert!(registry.elements()[0].body.position.x < 400.0);
        assert_eq!(registry.elements()[1].body.position, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn sync_reaches_the_surface() {
        let mut surface = SpriteSurface::new();
        let cfg = FieldConfig::particles().with_seed(2).with_count(3);
        let mut registry = Registry::initialize(&mut surface, &cfg, viewport()).unwrap();

        registry.elements_mut()[1].body.position = Vec2::new(42.0, 24.0);
        let report = registry.sync();

        assert_eq!(report.synced, 3);
        let sprite = surface.sprites()[1];
        assert_eq!((sprite.transform.x, sprite.transform.y), (42.0, 24.0));
    }

    #[test]
    fn resize_moves_wrap_bounds() {
        let mut surface = SpriteSurface::new();
        let cfg = FieldConfig::particles().with_count(1);
        let mut registry = Registry::initialize(&mut surface, &cfg, viewport()).unwrap();

        registry.resize(Viewport::new(200.0, 100.0));
        registry.elements_mut()[0].body.position = Vec2::new(500.0, 50.0);
        registry.elements_mut()[0].body.velocity = Vec2::zero();
        registry.step(PointerState::centered(registry.viewport()));

        assert_eq!(registry.elements()[0].body.position.x, -10.0);
    }

    #[test]
    fn clear_detaches_everything() {
        let mut surface = SpriteSurface::new();
        let cfg = FieldConfig::particles();
        let mut registry = Registry::initialize(&mut surface, &cfg, viewport()).unwrap();

        registry.clear(&mut surface);
        assert!(registry.is_empty());
        assert_eq!(surface.live_count(), 0);

        registry.clear(&mut surface);
        assert_eq!(surface.live_count(), 0);
    }
}
