//! Segment geometry.
//!
//! Pure functions placing segment `i` of `n` inside a drawing region. Shapes
//! are expressed in the segment's local coordinates: the local origin is
//! pinned to the segment position, and every scale transform applies around
//! it. All radii are divided by the style's peak scale, so the displayed shape
//! never leaves `min(width, height) / 2` around the region center.

use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, ops::Range};

/// Point in region units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

/// Width and height in region units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

/// Axis-aligned rectangle. The size may be negative, in which case the
/// rectangle extends to the left or upwards of its origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Corner the size is measured from.
    pub origin: Point,
    /// Signed extent.
    pub size: Size,
}

/// One drawing command of a [`Path`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathElement {
    /// Starts a new sub-path.
    MoveTo(Point),
    /// Straight line from the current point.
    LineTo(Point),
    /// Clockwise arc, connected to the current point by a straight line.
    Arc {
        /// Arc center.
        center: Point,
        /// Arc radius.
        radius: f64,
        /// Start angle, in radians.
        start_angle: f64,
        /// End angle, in radians.
        end_angle: f64,
    },
    /// Closes the current sub-path.
    Close,
}

/// Vector outline of a segment, in local coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Creates a new [`Point`].
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotates the point around the origin.
    #[must_use]
    pub fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { x: self.x * cos - self.y * sin, y: self.x * sin + self.y * cos }
    }

    /// Distance to the origin.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    fn lerp(self, other: Self, t: f64) -> Self {
        Self { x: lerp(self.x, other.x, t), y: lerp(self.y, other.y, t) }
    }
}

impl Size {
    /// Creates a new [`Size`].
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Rect {
    /// Creates a new [`Rect`].
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { origin: Point { x, y }, size: Size { width, height } }
    }

    /// Creates a rectangle of the given size at the origin.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self { origin: Point::ZERO, size }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.origin.x.min(self.origin.x + self.size.width)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.origin.x.max(self.origin.x + self.size.width)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.origin.y.min(self.origin.y + self.size.height)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.origin.y.max(self.origin.y + self.size.height)
    }

    /// Absolute width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.size.width.abs()
    }

    /// Absolute height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.size.height.abs()
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn mid(&self) -> Point {
        Point { x: (self.min_x() + self.max_x()) / 2.0, y: (self.min_y() + self.max_y()) / 2.0 }
    }

    /// Length of the shortest side.
    #[must_use]
    pub fn min_side(&self) -> f64 {
        self.width().min(self.height())
    }

    /// Returns `true` if the rectangle has no area or isn't finite.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.origin.x.is_finite()
            && self.origin.y.is_finite()
            && self.size.width.is_finite()
            && self.size.height.is_finite())
            || self.width() <= 0.0
            || self.height() <= 0.0
    }
}

impl Path {
    /// Closed rectangle outline.
    #[must_use]
    pub fn rect(rect: Rect) -> Self {
        let (x0, y0) = (rect.origin.x, rect.origin.y);
        let (x1, y1) = (x0 + rect.size.width, y0 + rect.size.height);
        Self {
            elements: vec![
                PathElement::MoveTo(Point::new(x0, y0)),
                PathElement::LineTo(Point::new(x1, y0)),
                PathElement::LineTo(Point::new(x1, y1)),
                PathElement::LineTo(Point::new(x0, y1)),
                PathElement::Close,
            ],
        }
    }

    /// Pie wedge with its apex at the local origin.
    #[must_use]
    pub fn sector(radius: f64, span: Range<f64>) -> Self {
        Self {
            elements: vec![
                PathElement::MoveTo(Point::ZERO),
                PathElement::Arc {
                    center: Point::ZERO,
                    radius,
                    start_angle: span.start,
                    end_angle: span.end,
                },
                PathElement::Close,
            ],
        }
    }

    /// Full circle centered on the local origin.
    #[must_use]
    pub fn circle(radius: f64) -> Self {
        Self {
            elements: vec![
                PathElement::Arc { center: Point::ZERO, radius, start_angle: 0.0, end_angle: 2.0 * PI },
                PathElement::Close,
            ],
        }
    }

    /// Returns the path rotated around the local origin.
    #[must_use]
    pub fn rotated(&self, angle: f64) -> Self {
        let elements = self
            .elements
            .iter()
            .map(|element| match *element {
                PathElement::MoveTo(p) => PathElement::MoveTo(p.rotated(angle)),
                PathElement::LineTo(p) => PathElement::LineTo(p.rotated(angle)),
                PathElement::Arc { center, radius, start_angle, end_angle } => PathElement::Arc {
                    center: center.rotated(angle),
                    radius,
                    start_angle: start_angle + angle,
                    end_angle: end_angle + angle,
                },
                PathElement::Close => PathElement::Close,
            })
            .collect();
        Self { elements }
    }

    /// Drawing commands.
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Largest distance between the local origin and any point of the path.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.elements
            .iter()
            .map(|element| match *element {
                PathElement::MoveTo(p) | PathElement::LineTo(p) => p.length(),
                PathElement::Arc { center, radius, .. } => center.length() + radius,
                PathElement::Close => 0.0,
            })
            .fold(0.0, f64::max)
    }

    /// Bounding box. Arcs are bounded by their full circle.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut include = |p: Point, r: f64| {
            min = Point::new(min.x.min(p.x - r), min.y.min(p.y - r));
            max = Point::new(max.x.max(p.x + r), max.y.max(p.y + r));
        };
        for element in &self.elements {
            match *element {
                PathElement::MoveTo(p) | PathElement::LineTo(p) => include(p, 0.0),
                PathElement::Arc { center, radius, .. } => include(center, radius),
                PathElement::Close => {}
            }
        }
        if min.x > max.x {
            return Rect::default();
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Interpolates two paths point by point. Returns `None` if the paths
    /// don't share the same structure.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Option<Self> {
        if self.elements.len() != other.elements.len() {
            return None;
        }
        self.elements
            .iter()
            .zip(&other.elements)
            .map(|pair| match pair {
                (&PathElement::MoveTo(a), &PathElement::MoveTo(b)) => {
                    Some(PathElement::MoveTo(a.lerp(b, t)))
                }
                (&PathElement::LineTo(a), &PathElement::LineTo(b)) => {
                    Some(PathElement::LineTo(a.lerp(b, t)))
                }
                (
                    &PathElement::Arc { center: c0, radius: r0, start_angle: s0, end_angle: e0 },
                    &PathElement::Arc { center: c1, radius: r1, start_angle: s1, end_angle: e1 },
                ) => Some(PathElement::Arc {
                    center: c0.lerp(c1, t),
                    radius: lerp(r0, r1, t),
                    start_angle: lerp(s0, s1, t),
                    end_angle: lerp(e0, e1, t),
                }),
                (PathElement::Close, PathElement::Close) => Some(PathElement::Close),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(|elements| Self { elements })
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Radius of the largest circle centered in the region.
#[must_use]
pub fn bounding_radius(region: &Rect) -> f64 {
    region.min_side() / 2.0
}

/// Angle covered by one segment of a full turn.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn angle_step(segment_count: usize) -> f64 {
    2.0 * PI / segment_count as f64
}

/// Angular span `[i * step, (i + 1) * step)` of segment `index`.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn sector_span(segment_count: usize, index: usize) -> Range<f64> {
    let step = angle_step(segment_count);
    let start = index as f64 * step;
    start..start + step
}

/// Pie wedge of segment `index`, sized so that `max_scale` still fits the
/// region.
#[must_use]
pub fn sector(region: &Rect, segment_count: usize, index: usize, max_scale: f64) -> Path {
    Path::sector(bounding_radius(region) / max_scale, sector_span(segment_count, index))
}

/// Radius of concentric ring `index`. Rings grow with their index, the
/// outermost one reaching the bounding radius divided by `max_scale`.
///
/// Deliberately `base * (index + 1)` rather than `base * index`, so that the
/// innermost ring has a non-zero radius.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn ring_radius(region: &Rect, segment_count: usize, index: usize, max_scale: f64) -> f64 {
    let base_radius = bounding_radius(region) / max_scale / segment_count as f64;
    base_radius * (index + 1) as f64
}

/// Width of one equalizer column.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn column_width(region: &Rect, segment_count: usize) -> f64 {
    region.width() / segment_count as f64
}

/// Bar standing on the local origin: bottom-center anchored, so that a
/// vertical scale grows it upwards from the baseline.
#[must_use]
pub fn bar_path(width: f64, height: f64) -> Path {
    Path::rect(Rect::new(-width / 2.0, 0.0, width, -height))
}

/// Baseline position of equalizer bar `index`: the bottom-center of its
/// column.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn bar_position(region: &Rect, segment_count: usize, index: usize) -> Point {
    let column = column_width(region, segment_count);
    Point::new(region.min_x() + column * (index as f64 + 0.5), region.max_y())
}

/// Width of an equalizer bar once the gap is taken out of its column.
#[must_use]
pub fn bar_width(region: &Rect, segment_count: usize, gap: f64) -> f64 {
    (column_width(region, segment_count) - gap).max(0.0)
}

/// Radiating dash of segment `index`, between the inner empty disc and the
/// bounding radius. The outer corners touch the bounding circle.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn dash(region: &Rect, segment_count: usize, index: usize, center_ratio: f64) -> Path {
    let outer = bounding_radius(region);
    let width = outer / segment_count as f64;
    let inner = outer / center_ratio;
    let tip = (outer * outer - width * width / 4.0).sqrt();
    Path::rect(Rect::new(-width / 2.0, inner, width, tip - inner))
        .rotated(sector_span(segment_count, index).start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const REGION: Rect = Rect::new(0.0, 0.0, 100.0, 60.0);

    #[test]
    fn test_sector_span() {
        let span = sector_span(3, 1);
        assert_relative_eq!(span.start, 2.0 * PI / 3.0);
        assert_relative_eq!(span.end, 4.0 * PI / 3.0);
        let span = sector_span(1, 0);
        assert_relative_eq!(span.end - span.start, 2.0 * PI);
    }

    #[test]
    fn test_sector_fits_peak_scale() {
        let path = sector(&REGION, 4, 2, 1.2);
        assert_relative_eq!(path.extent() * 1.2, 30.0);
    }

    #[test]
    fn test_ring_radius_grows_with_index() {
        let radii: Vec<_> = (0..5).map(|i| ring_radius(&REGION, 5, i, 1.5)).collect();
        assert!(radii.windows(2).all(|w| w[0] < w[1]));
        assert_relative_eq!(radii[4] * 1.5, 30.0);
        assert_relative_eq!(radii[0], radii[4] / 5.0);
    }

    #[test]
    fn test_bar_layout() {
        let position = bar_position(&REGION, 4, 0);
        assert_relative_eq!(position.x, 12.5);
        assert_relative_eq!(position.y, 60.0);
        assert_relative_eq!(bar_width(&REGION, 4, 5.0), 20.0);
        assert_relative_eq!(bar_width(&REGION, 4, 50.0), 0.0);
        let bounds = bar_path(20.0, 40.0).bounds();
        assert_relative_eq!(bounds.max_y(), 0.0);
        assert_relative_eq!(bounds.min_y(), -40.0);
        assert_relative_eq!(bounds.mid().x, 0.0);
    }

    #[test]
    fn test_dash_stays_in_ring() {
        for i in 0..8 {
            let path = dash(&REGION, 8, i, 2.5);
            assert!(path.extent() <= 30.0 + 1e-9);
            let closest = path
                .elements()
                .iter()
                .filter_map(|element| match element {
                    PathElement::MoveTo(p) | PathElement::LineTo(p) => Some(p.length()),
                    _ => None,
                })
                .fold(f64::INFINITY, f64::min);
            assert!(closest >= 12.0 - 1e-9);
        }
    }

    #[test]
    fn test_path_lerp() {
        let a = bar_path(10.0, 20.0);
        let b = bar_path(10.0, 40.0);
        let mid = a.lerp(&b, 0.5).unwrap();
        assert_relative_eq!(mid.bounds().height(), 30.0);
        assert!(a.lerp(&Path::circle(1.0), 0.5).is_none());
    }

    #[test]
    fn test_path_lerp_arcs() {
        let a = Path::sector(10.0, 0.0..PI);
        let b = Path::sector(20.0, PI..2.0 * PI);
        let mid = a.lerp(&b, 0.25).unwrap();
        assert_eq!(mid.elements().len(), 3);
        let PathElement::Arc { center, radius, start_angle, end_angle } = mid.elements()[1] else {
            panic!("expected an arc, got {:?}", mid.elements()[1]);
        };
        assert_eq!(center, Point::ZERO);
        assert_relative_eq!(radius, 12.5);
        assert_relative_eq!(start_angle, PI / 4.0);
        assert_relative_eq!(end_angle, 1.25 * PI);
        assert!(a.lerp(&Path::rect(REGION), 0.5).is_none());
    }

    #[test]
    fn test_degenerate_region() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, f64::NAN, 10.0).is_degenerate());
        assert!(!Rect::new(5.0, 5.0, -10.0, 10.0).is_degenerate());
    }
}
