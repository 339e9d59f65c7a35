//! Pushes simulated state onto visual handles.

use crate::host::Renderable;

use super::element::MovableElement;

/// Outcome of one sync pass.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SyncReport {
    pub synced: usize,
    /// Handles whose backing view was gone.
    pub skipped: usize,
}

/// Writes every element's transform to its handle.
///
/// A handle that is no longer live is skipped, the rest of the pass continues.
pub fn render_sync<H: Renderable>(elements: &mut [MovableElement<H>]) -> SyncReport {
    let mut report = SyncReport::default();

    for (index, element) in elements.iter_mut().enumerate() {
        if !element.handle().is_live() {
            log::trace!("render sync: element {index} has no live handle, skipping");
            report.skipped += 1;
            continue;
        }
        let transform = element.transform();
        element.handle_mut().set_transform(&transform);
        report.synced += 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::field::Body;
    use crate::host::ElementTransform;

    #[derive(Default)]
    struct Recorder {
        live: bool,
        last: Option<ElementTransform>,
    }

    impl Renderable for Recorder {
        fn is_live(&self) -> bool {
            self.live
        }

        fn set_transform(&mut self, transform: &ElementTransform) {
            self.last = Some(*transform);
        }
    }

    fn element(x: f32, live: bool) -> MovableElement<Recorder> {
        let body = Body::at_rest(Vec2::new(x, 5.0));
        MovableElement::new(body, 4.0, 0.3, 45.0, Recorder { live, last: None })
    }

    #[test]
    fn writes_position_scale_and_opacity() {
        let mut elements = vec![element(12.0, true)];
        let report = render_sync(&mut elements);

        assert_eq!(report, SyncReport { synced: 1, skipped: 0 });
        let t = elements[0].handle().last.expect("transform written");
        assert_eq!((t.x, t.y, t.scale, t.rotation, t.opacity), (12.0, 5.0, 1.0, 45.0, 0.3));
    }

    #[test]
    fn dead_handle_is_skipped_without_stopping_the_pass() {
        let mut elements = vec![element(1.0, true), element(2.0, false), element(3.0, true)];
        let report = render_sync(&mut elements);

        assert_eq!(report, SyncReport { synced: 2, skipped: 1 });
        assert!(elements[1].handle().last.is_none());
        assert_eq!(elements[2].handle().last.map(|t| t.x), Some(3.0));
    }
}
