//! Initial placement and styling of elements.

use std::f32::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{FieldConfig, Layout, Span};
use crate::coords::{Vec2, Viewport};
use crate::host::SpriteSpec;

use super::element::Body;

/// Everything needed to attach and simulate one element.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ElementSeed {
    pub body: Body,
    pub sprite: SpriteSpec,
    pub opacity: f32,
    pub rotation: f32,
}

/// Draws element seeds from a small, optionally seeded RNG.
pub struct Spawner {
    rng: SmallRng,
}

impl Spawner {
    /// `None` derives a seed from the wall clock, so runs differ.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });
        Self { rng: SmallRng::seed_from_u64(seed) }
    }

    pub fn spawn(&mut self, index: usize, config: &FieldConfig, viewport: Viewport) -> ElementSeed {
        let count = config.element_count.max(1);

        let position = match config.layout {
            Layout::Scatter => Vec2::new(
                self.sample(Span::new(0.0, viewport.width)),
                self.sample(Span::new(0.0, viewport.height)),
            ),
            Layout::Ring { radius_fraction } => {
                let angle = index as f32 / count as f32 * TAU;
                let radius = viewport.min_dimension() * radius_fraction;
                viewport.center() + Vec2::from_angle(angle) * radius
            }
        };

        let half = config.max_speed * 0.5;
        let velocity = Vec2::new(
            self.sample(Span::new(-half, half)),
            self.sample(Span::new(-half, half)),
        );

        // Palette is validated non-empty.
        let style = config.palette[index % config.palette.len()];
        let size = match style.size {
            Some(size) => size,
            None => self.sample(config.size),
        };
        let base_scale = self.sample(config.scale);
        let opacity = self.sample(config.opacity);
        let rotation = if config.spin { self.sample(Span::new(0.0, 360.0)) } else { 0.0 };

        ElementSeed {
            body: Body::new(position, velocity, base_scale),
            sprite: SpriteSpec { size, shape: style.shape, tint: style.tint },
            opacity,
            rotation,
        }
    }

    fn sample(&mut self, span: Span) -> f32 {
        if span.max <= span.min {
            return span.min;
        }
        self.rng.gen_range(span.min..span.max)
    }
}
