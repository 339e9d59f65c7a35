//! Field configuration.
//!
//! Every tunable of a particle field lives here. Numbers are not contracts;
//! the two presets reproduce the dust-particle and floating-shape backgrounds.

use crate::host::SpriteShape;
use crate::input::TrackerConfig;
use crate::paint::{Color, Tint};
use crate::FieldError;

/// Upper bound on `element_count`. Larger fields are rejected by
/// [`FieldConfig::validate`] instead of exhausting memory at mount.
pub const MAX_ELEMENTS: usize = 10_000;

/// Closed interval sampled uniformly at spawn time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub const fn fixed(v: f32) -> Self {
        Self { min: v, max: v }
    }

    #[inline]
    pub fn contains(self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    fn is_ordered(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Where elements start.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Layout {
    /// Uniformly random over the viewport.
    Scatter,

    /// Evenly spaced on a circle around the viewport centre, radius
    /// `min(width, height) * radius_fraction`.
    Ring { radius_fraction: f32 },
}

/// How the pointer pushes elements away.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Repulsion {
    /// Nudge velocity; the push plays out over the following frames.
    Velocity { strength: f32 },

    /// Offset position immediately by up to `strength` pixels and grow the
    /// element by up to `scale_gain`.
    Displace { strength: f32, scale_gain: f32 },
}

/// Visual style of one palette slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteStyle {
    pub shape: SpriteShape,
    pub tint: Tint,
    /// Fixed size in pixels; `None` samples [`FieldConfig::size`].
    pub size: Option<f32>,
}

/// Tunables of one particle field.
///
/// Start from [`FieldConfig::particles`] or [`FieldConfig::shapes`] and
/// override fields with struct update syntax. [`ParticleField::new`] runs
/// [`validate`](Self::validate), so a field never mounts with a bad config.
///
/// [`ParticleField::new`]: crate::ParticleField::new
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Number of elements spawned at mount. At most [`MAX_ELEMENTS`].
    pub element_count: usize,
    /// Upper bound on simulation frames per second.
    pub target_fps: f64,
    /// Pointer influence radius in logical pixels.
    pub interaction_radius: f32,
    /// Pointer throttle window.
    pub throttle_ms: f64,
    /// Pointer stillness after which repulsion stops.
    pub idle_ms: f64,
    /// How far past the viewport edge an element may travel before it wraps.
    pub wrap_margin: f32,
    pub layout: Layout,
    pub repulsion: Repulsion,
    /// Element size in pixels, for palette slots without a fixed size.
    pub size: Span,
    pub opacity: Span,
    /// Resting scale; displacement repulsion grows elements from here.
    pub scale: Span,
    /// Velocity components are drawn from `[-max_speed / 2, max_speed / 2]` px/frame.
    pub max_speed: f32,
    /// Random initial rotation in `[0, 360)` degrees.
    pub spin: bool,
    /// Cycled by element index. Must not be empty.
    pub palette: Vec<SpriteStyle>,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Mount statically when the host reports reduced motion, touch input or a
    /// narrow viewport.
    pub respect_motion_preferences: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::particles()
    }
}

impl FieldConfig {
    /// Fifteen slow, faint dust particles.
    pub fn particles() -> Self {
        let cyan = Color::from_srgb_u8(0x22, 0xd3, 0xee, 0xff);
        let purple = Color::from_srgb_u8(0xc0, 0x84, 0xfc, 0xff);

        Self {
            element_count: 15,
            target_fps: 30.0,
            interaction_radius: 100.0,
            throttle_ms: 16.0,
            idle_ms: 100.0,
            wrap_margin: 10.0,
            layout: Layout::Scatter,
            repulsion: Repulsion::Velocity { strength: 0.005 },
            size: Span::new(1.0, 4.0),
            opacity: Span::new(0.1, 0.4),
            scale: Span::fixed(1.0),
            max_speed: 0.3,
            spin: false,
            palette: vec![SpriteStyle {
                shape: SpriteShape::Disc,
                tint: Tint::gradient(cyan, purple),
                size: None,
            }],
            seed: None,
            respect_motion_preferences: true,
        }
    }

    /// Six larger outlined and filled shapes on a ring, pushed aside by the pointer.
    pub fn shapes() -> Self {
        let c = |r, g, b| Color::from_srgb_u8(r, g, b, 0xff);
        let style = |shape, tint, size| SpriteStyle { shape, tint, size: Some(size) };

        Self {
            element_count: 6,
            interaction_radius: 150.0,
            throttle_ms: 32.0,
            layout: Layout::Ring { radius_fraction: 0.3 },
            repulsion: Repulsion::Displace { strength: 15.0, scale_gain: 0.2 },
            size: Span::new(16.0, 56.0),
            opacity: Span::new(0.15, 0.25),
            scale: Span::new(0.7, 1.0),
            max_speed: 0.4,
            spin: true,
            palette: vec![
                style(SpriteShape::Frame, Tint::solid(c(0xc0, 0x84, 0xfc)), 48.0),
                style(SpriteShape::Disc, Tint::gradient(c(0x22, 0xd3, 0xee), c(0x60, 0xa5, 0xfa)), 32.0),
                style(SpriteShape::Square, Tint::gradient(c(0xf4, 0x72, 0xb6), c(0xc0, 0x84, 0xfc)), 24.0),
                style(SpriteShape::Ring, Tint::solid(c(0x2d, 0xd4, 0xbf)), 56.0),
                style(SpriteShape::Disc, Tint::gradient(c(0xfa, 0xcc, 0x15), c(0xfb, 0x92, 0x3c)), 16.0),
                style(SpriteShape::Frame, Tint::solid(c(0x4a, 0xde, 0x80)), 40.0),
            ],
            ..Self::particles()
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.element_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            throttle_ms: self.throttle_ms,
            idle_ms: self.idle_ms,
        }
    }

    /// Checks ranges. An empty field (`element_count == 0`) is valid.
    ///
    /// Every float must be finite; spawning samples ranges built from them.
    pub fn validate(&self) -> Result<(), FieldError> {
        let bad = |msg: String| Err(FieldError::InvalidConfig(msg));

        if self.element_count > MAX_ELEMENTS {
            return bad(format!(
                "element_count {} exceeds the maximum of {MAX_ELEMENTS}",
                self.element_count
            ));
        }
        if !(self.target_fps > 0.0 && self.target_fps.is_finite()) {
            return bad(format!("target_fps must be positive, got {}", self.target_fps));
        }
        if !(self.interaction_radius > 0.0 && self.interaction_radius.is_finite()) {
            return bad(format!(
                "interaction_radius must be positive, got {}",
                self.interaction_radius
            ));
        }
        for (name, v) in [("throttle_ms", self.throttle_ms), ("idle_ms", self.idle_ms)] {
            if !non_negative(v) {
                return bad(format!("{name} must be finite and not negative, got {v}"));
            }
        }
        for (name, v) in [("wrap_margin", self.wrap_margin), ("max_speed", self.max_speed)] {
            if !non_negative(v as f64) {
                return bad(format!("{name} must be finite and not negative, got {v}"));
            }
        }
        for (name, span) in [("size", self.size), ("opacity", self.opacity), ("scale", self.scale)] {
            if !span.is_ordered() {
                return bad(format!("{name} range {}..{} is inverted or not finite", span.min, span.max));
            }
        }
        if !(Span::new(0.0, 1.0).contains(self.opacity.min) && Span::new(0.0, 1.0).contains(self.opacity.max)) {
            return bad("opacity must lie in [0, 1]".to_string());
        }
        if self.palette.is_empty() {
            return bad("palette is empty".to_string());
        }
        if let Some(size) = self.palette.iter().filter_map(|style| style.size).find(|&s| !non_negative(s as f64)) {
            return bad(format!("palette size must be finite and not negative, got {size}"));
        }
        if let Layout::Ring { radius_fraction } = self.layout {
            if !non_negative(radius_fraction as f64) {
                return bad(format!("ring radius_fraction must not be negative, got {radius_fraction}"));
            }
        }
        let repulsion = match self.repulsion {
            Repulsion::Velocity { strength } => [("strength", strength), ("scale_gain", 0.0)],
            Repulsion::Displace { strength, scale_gain } => [("strength", strength), ("scale_gain", scale_gain)],
        };
        for (name, v) in repulsion {
            if !v.is_finite() {
                return bad(format!("repulsion {name} must be finite, got {v}"));
            }
        }
        Ok(())
    }
}

fn non_negative(v: f64) -> bool {
    v >= 0.0 && v.is_finite()
}
