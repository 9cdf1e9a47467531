use lookdev_core::{Layout, SurfaceSize, ViewIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    pub fn intersect(&self, other: PixelRect) -> Option<PixelRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.width).min(other.x + other.width);
        let y1 = (self.y + self.height).min(other.y + other.height);
        (x1 > x0 && y1 > y0).then_some(PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Region of the composite a view renders into, or `None` when the view is hidden.
///
/// Split halves round so that the pixel centres they cover agree with
/// `ComparisonGizmo::view_from_composition`: the middle column or row of an odd
/// surface belongs to the first view.
pub fn view_viewport(layout: Layout, size: SurfaceSize, index: ViewIndex) -> Option<PixelRect> {
    let size = size.clamped();
    let full = PixelRect {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
    };
    match (layout, index) {
        (Layout::FullFirstView, ViewIndex::First) | (Layout::FullSecondView, ViewIndex::Second) => {
            Some(full)
        }
        (Layout::FullFirstView, _) | (Layout::FullSecondView, _) => None,
        (Layout::HorizontalSplit, index) => {
            let first = size.width.div_ceil(2);
            match index {
                ViewIndex::First => Some(PixelRect { width: first, ..full }),
                ViewIndex::Second => (size.width > first).then_some(PixelRect {
                    x: first,
                    width: size.width - first,
                    ..full
                }),
            }
        }
        (Layout::VerticalSplit, index) => {
            let first = size.height.div_ceil(2);
            match index {
                ViewIndex::First => Some(PixelRect { height: first, ..full }),
                ViewIndex::Second => (size.height > first).then_some(PixelRect {
                    y: first,
                    height: size.height - first,
                    ..full
                }),
            }
        }
        (Layout::CustomSplit, _) | (Layout::CustomCircular, _) => Some(full),
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use lookdev_core::{ComparisonGizmo, LayoutContext};

    use super::*;

    #[test]
    fn full_layouts_hide_the_other_view() {
        let size = SurfaceSize::new(640, 480);
        assert!(view_viewport(Layout::FullFirstView, size, ViewIndex::Second).is_none());
        assert_eq!(
            view_viewport(Layout::FullSecondView, size, ViewIndex::Second)
                .unwrap()
                .size(),
            size
        );
    }

    #[test]
    fn split_viewports_agree_with_hit_testing() {
        for (layout, size) in [
            (Layout::HorizontalSplit, SurfaceSize::new(801, 10)),
            (Layout::HorizontalSplit, SurfaceSize::new(800, 10)),
            (Layout::VerticalSplit, SurfaceSize::new(10, 7)),
        ] {
            let mut context = LayoutContext::default();
            context.view_layout = layout;
            for index in ViewIndex::ALL {
                let rect = view_viewport(layout, size, index).unwrap();
                for (x, y) in [(rect.x, rect.y), (rect.x + rect.width - 1, rect.y + rect.height - 1)] {
                    let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    assert_eq!(
                        ComparisonGizmo::view_from_composition(&context, size, center),
                        index
                    );
                }
            }
        }
    }

    #[test]
    fn intersection_of_disjoint_rects_is_empty() {
        let a = PixelRect { x: 0, y: 0, width: 2, height: 2 };
        let b = PixelRect { x: 2, y: 0, width: 2, height: 2 };
        assert!(a.intersect(b).is_none());
    }
}
