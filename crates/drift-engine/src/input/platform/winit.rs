use winit::dpi::PhysicalPosition;
use winit::event::WindowEvent;

use crate::coords::Vec2;
use crate::input::PointerEvent;

/// Translates a winit `WindowEvent` into a [`PointerEvent`].
///
/// `scale_factor` is the window's current DPI scale. Returns `None` for events
/// the pointer tracker does not consume.
pub fn translate_window_event(scale_factor: f64, event: &WindowEvent) -> Option<PointerEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            Some(PointerEvent::Moved(to_logical(*position, scale_factor)))
        }

        WindowEvent::CursorLeft { .. } => Some(PointerEvent::Left),

        // Losing focus mid-hover would otherwise leave the field repelling
        // around a pointer that is no longer there.
        WindowEvent::Focused(false) => Some(PointerEvent::Left),

        _ => None,
    }
}

fn to_logical(pos: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let logical = pos.to_logical::<f64>(scale_factor);
    Vec2::new(logical.x as f32, logical.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_loss_reads_as_leave() {
        assert_eq!(
            translate_window_event(1.0, &WindowEvent::Focused(false)),
            Some(PointerEvent::Left)
        );
        assert_eq!(translate_window_event(1.0, &WindowEvent::Focused(true)), None);
    }

    #[test]
    fn physical_positions_are_scaled_down() {
        let p = to_logical(PhysicalPosition::new(200.0, 100.0), 2.0);
        assert_eq!(p, Vec2::new(100.0, 50.0));
    }
}
