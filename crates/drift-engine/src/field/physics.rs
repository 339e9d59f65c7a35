//! Per-element physics.
//!
//! Order within one step is fixed: integrate velocity, apply pointer
//! repulsion, relax scale, wrap into the padded viewport. Wrapping last keeps
//! every element inside the bounds at the end of the step even when the
//! repulsion pushed it past an edge.

use crate::config::Repulsion;
use crate::coords::{Rect, Vec2};
use crate::input::PointerState;

use super::element::Body;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhysicsParams {
    pub radius: f32,
    pub repulsion: Repulsion,
    /// Viewport expanded by the wrap margin.
    pub bounds: Rect,
}

/// Linear falloff: 1 at the pointer, 0 at `radius` and beyond.
#[inline]
pub fn repulsion_force(distance: f32, radius: f32) -> f32 {
    if distance >= radius {
        return 0.0;
    }
    ((radius - distance) / radius).clamp(0.0, 1.0)
}

/// Advances `body` by one frame. Returns the repulsion force applied (0 when
/// the pointer did not reach it).
pub fn step_body(body: &mut Body, pointer: &PointerState, params: &PhysicsParams) -> f32 {
    body.position += body.velocity;

    let mut force = 0.0;
    if pointer.interacting {
        let offset = body.position - pointer.position;
        let radius_sq = params.radius * params.radius;
        let dist_sq = offset.length_squared();

        // Squared compare first; sqrt only for elements inside the radius.
        if dist_sq < radius_sq {
            force = repulsion_force(dist_sq.sqrt(), params.radius);
            // atan2(0, 0) == 0: an element exactly under the pointer goes +x.
            let away = Vec2::from_angle(offset.angle());

            match params.repulsion {
                Repulsion::Velocity { strength } => {
                    body.velocity += away * (force * strength);
                }
                Repulsion::Displace { strength, .. } => {
                    body.position += away * (force * strength);
                }
            }
        }
    }

    body.scale = match params.repulsion {
        Repulsion::Displace { scale_gain, .. } if force > 0.0 => {
            body.base_scale * (1.0 + force * scale_gain)
        }
        _ => body.base_scale,
    };

    body.position = params.bounds.wrap(body.position);
    force
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn params(repulsion: Repulsion) -> PhysicsParams {
        PhysicsParams {
            radius: 100.0,
            repulsion,
            bounds: Viewport::new(800.0, 600.0).wrap_bounds(10.0),
        }
    }

    const DISPLACE: Repulsion = Repulsion::Displace { strength: 15.0, scale_gain: 0.2 };
    const NUDGE: Repulsion = Repulsion::Velocity { strength: 0.005 };

    // ── force ─────────────────────────────────────────────────────────────

    #[test]
    fn force_falls_off_linearly() {
        assert!(approx(repulsion_force(0.0, 100.0), 1.0));
        assert!(approx(repulsion_force(50.0, 100.0), 0.5));
        assert!(approx(repulsion_force(99.0, 100.0), 0.01));
        assert_eq!(repulsion_force(100.0, 100.0), 0.0);
        assert_eq!(repulsion_force(250.0, 100.0), 0.0);
    }

    #[test]
    fn force_never_increases_with_distance() {
        let mut prev = f32::INFINITY;
        for d in 0..=120 {
            let f = repulsion_force(d as f32, 100.0);
            assert!(f <= prev);
            prev = f;
        }
    }

    // ── displace ──────────────────────────────────────────────────────────

    #[test]
    fn displace_pushes_away_from_pointer() {
        let mut body = Body::at_rest(Vec2::zero());
        let pointer = PointerState::at(Vec2::new(50.0, 0.0));

        let force = step_body(&mut body, &pointer, &params(DISPLACE));

        assert!(approx(force, 0.5));
        assert!(approx(body.position.x, -7.5));
        assert!(approx(body.position.y, 0.0));
        assert!(approx(body.scale, 1.1));
    }

    #[test]
    fn out_of_range_pointer_leaves_drift_only() {
        let mut body = Body::new(Vec2::zero(), Vec2::new(0.2, -0.1), 1.0);
        let pointer = PointerState::at(Vec2::new(200.0, 0.0));

        let force = step_body(&mut body, &pointer, &params(DISPLACE));

        assert_eq!(force, 0.0);
        assert!(approx(body.position.x, 0.2));
        assert!(approx(body.position.y, -0.1));
        assert_eq!(body.scale, 1.0);
    }

    #[test]
    fn idle_pointer_is_ignored() {
        let mut body = Body::at_rest(Vec2::new(400.0, 300.0));
        let pointer = PointerState::at(Vec2::new(400.0, 300.0)).idle();

        assert_eq!(step_body(&mut body, &pointer, &params(DISPLACE)), 0.0);
        assert_eq!(body.position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn coincident_pointer_pushes_along_positive_x() {
        let mut body = Body::at_rest(Vec2::new(400.0, 300.0));
        let pointer = PointerState::at(Vec2::new(400.0, 300.0));

        let force = step_body(&mut body, &pointer, &params(DISPLACE));

        assert!(approx(force, 1.0));
        assert!(approx(body.position.x, 415.0));
        assert!(approx(body.position.y, 300.0));
    }

    #[test]
    fn scale_relaxes_when_pointer_moves_off() {
        let mut body = Body::at_rest(Vec2::new(400.0, 300.0));
        step_body(&mut body, &PointerState::at(Vec2::new(420.0, 300.0)), &params(DISPLACE));
        assert!(body.scale > 1.0);

        step_body(&mut body, &PointerState::at(Vec2::new(0.0, 0.0)), &params(DISPLACE));
        assert_eq!(body.scale, 1.0);
    }

    // ── velocity ──────────────────────────────────────────────────────────

    #[test]
    fn velocity_mode_nudges_velocity_not_position() {
        let mut body = Body::at_rest(Vec2::new(100.0, 100.0));
        let pointer = PointerState::at(Vec2::new(150.0, 100.0));

        let force = step_body(&mut body, &pointer, &params(NUDGE));

        assert!(approx(force, 0.5));
        assert_eq!(body.position, Vec2::new(100.0, 100.0));
        assert!(approx(body.velocity.x, -0.0025));
        assert!(approx(body.velocity.y, 0.0));
        assert_eq!(body.scale, 1.0);
    }

    // ── wrap ──────────────────────────────────────────────────────────────

    #[test]
    fn wrap_happens_after_repulsion() {
        // Starts inside the margin, repulsion carries it past the left edge.
        let mut body = Body::at_rest(Vec2::new(-5.0, 300.0));
        let pointer = PointerState::at(Vec2::new(5.0, 300.0));

        step_body(&mut body, &pointer, &params(DISPLACE));

        let bounds = params(DISPLACE).bounds;
        assert!(bounds.contains_closed(body.position));
        assert!(approx(body.position.x, 810.0));
    }

    #[test]
    fn drift_past_right_edge_reenters_left() {
        let mut body = Body::new(Vec2::new(809.9, 10.0), Vec2::new(0.3, 0.0), 1.0);
        step_body(&mut body, &PointerState::centered(Viewport::new(800.0, 600.0)).idle(), &params(NUDGE));
        assert!(approx(body.position.x, -10.0));
    }
}
