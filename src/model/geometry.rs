//! Geometric primitives used by shape detection.
//!
//! Contour points arrive as integer pixel coordinates from `imageproc`; they are
//! carried as `f32` so that approximation and circle fitting can work without
//! repeated conversions.

use imageproc::contours::Contour;
use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate (pixels, growing right)
    pub x: f32,
    /// Y-coordinate (pixels, growing down)
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point) -> f32 {
        self.distance_squared(other).sqrt()
    }

    #[inline]
    fn distance_squared(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// An axis-aligned rectangle in integer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Width divided by height. Returns 0.0 for a zero-height rectangle.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Area in square pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Smallest rectangle containing both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, (right - x) as u32, (bottom - y) as u32)
    }
}

/// A circle given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    /// Center point
    pub center: Point,
    /// Radius in pixels
    pub radius: f32,
}

impl Circle {
    /// Area of the circle.
    pub fn area(&self) -> f32 {
        std::f32::consts::PI * self.radius * self.radius
    }

    fn contains(&self, p: &Point) -> bool {
        self.center.distance(p) <= self.radius + 1e-3 * self.radius.max(1.0)
    }

    fn from_two(a: &Point, b: &Point) -> Circle {
        Circle {
            center: Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
            radius: a.distance(b) / 2.0,
        }
    }

    fn from_three(a: &Point, b: &Point, c: &Point) -> Circle {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d.abs() < f32::EPSILON {
            // Collinear: the widest pair spans the circle.
            return [
                Circle::from_two(a, b),
                Circle::from_two(a, c),
                Circle::from_two(b, c),
            ]
            .into_iter()
            .fold(Circle::default(), |best, c| {
                if c.radius > best.radius {
                    c
                } else {
                    best
                }
            });
        }

        let a2 = a.x * a.x + a.y * a.y;
        let b2 = b.x * b.x + b.y * b.y;
        let c2 = c.x * c.x + c.y * c.y;
        let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
        let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
        let center = Point::new(ux, uy);
        Circle {
            center,
            radius: center.distance(a),
        }
    }
}

/// A polygon, or a closed contour, as an ordered list of points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    /// Ordered vertices. The closing edge back to the first point is implicit.
    pub points: Vec<Point>,
}

impl Polygon {
    /// Create a polygon from points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Create a polygon from an `imageproc` contour.
    pub fn from_contour(contour: &Contour<u32>) -> Self {
        let points = contour
            .points
            .iter()
            .map(|p| Point::new(p.x as f32, p.y as f32))
            .collect();
        Self { points }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area using the shoelace formula.
    ///
    /// Returns 0.0 for fewer than 3 points.
    pub fn area(&self) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }

        let n = self.points.len();
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area.abs() / 2.0
    }

    /// Arc length, optionally including the closing edge.
    pub fn perimeter(&self, closed: bool) -> f32 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }

        let mut length: f32 = self
            .points
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum();
        if closed {
            length += self.points[n - 1].distance(&self.points[0]);
        }
        length
    }

    /// Upright bounding rectangle.
    ///
    /// Follows the pixel convention where a single point has a 1x1 box, so
    /// `width = max_x - min_x + 1`.
    pub fn bounding_rect(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::default();
        }

        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let x = min_x.floor() as i32;
        let y = min_y.floor() as i32;
        let width = (max_x.floor() as i32 - x + 1).max(0) as u32;
        let height = (max_y.floor() as i32 - y + 1).max(0) as u32;
        Rect::new(x, y, width, height)
    }

    /// Simplify a closed curve with the Douglas-Peucker algorithm.
    ///
    /// The curve is split at the vertex farthest from the first vertex and
    /// each half is simplified as an open chain, so both anchor points survive.
    pub fn approx_closed(&self, epsilon: f32) -> Polygon {
        let n = self.points.len();
        if n <= 3 {
            return self.clone();
        }

        let first = self.points[0];
        let far = (1..n)
            .max_by(|&a, &b| {
                first
                    .distance_squared(&self.points[a])
                    .total_cmp(&first.distance_squared(&self.points[b]))
            })
            .unwrap_or(n - 1);

        let head = douglas_peucker(&self.points[..=far], epsilon);
        let mut tail_chain = self.points[far..].to_vec();
        tail_chain.push(first);
        let tail = douglas_peucker(&tail_chain, epsilon);

        let mut points = Vec::with_capacity(head.len() + tail.len());
        points.extend_from_slice(&head[..head.len() - 1]);
        points.extend_from_slice(&tail[..tail.len() - 1]);
        Polygon::new(points)
    }

    /// Convex hull (Andrew's monotone chain), counter-clockwise in image space.
    pub fn convex_hull(&self) -> Polygon {
        if self.points.len() < 3 {
            return self.clone();
        }

        let mut pts = self.points.clone();
        pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        pts.dedup();
        if pts.len() < 3 {
            return Polygon::new(pts);
        }

        let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
        for p in &pts {
            while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0
            {
                lower.pop();
            }
            lower.push(*p);
        }

        let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
        for p in pts.iter().rev() {
            while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0
            {
                upper.pop();
            }
            upper.push(*p);
        }

        lower.pop();
        upper.pop();
        lower.extend(upper);
        Polygon::new(lower)
    }

    /// Smallest circle enclosing every point.
    ///
    /// Runs the incremental Welzl construction over the convex hull, which
    /// has the same enclosing circle as the full point set.
    pub fn min_enclosing_circle(&self) -> Circle {
        let hull = self.convex_hull();
        let pts = &hull.points;
        let Some(first) = pts.first() else {
            return Circle::default();
        };

        let mut circle = Circle {
            center: *first,
            radius: 0.0,
        };
        for i in 1..pts.len() {
            if circle.contains(&pts[i]) {
                continue;
            }
            circle = Circle {
                center: pts[i],
                radius: 0.0,
            };
            for j in 0..i {
                if circle.contains(&pts[j]) {
                    continue;
                }
                circle = Circle::from_two(&pts[i], &pts[j]);
                for k in 0..j {
                    if !circle.contains(&pts[k]) {
                        circle = Circle::from_three(&pts[i], &pts[j], &pts[k]);
                    }
                }
            }
        }
        circle
    }
}

fn cross(o: &Point, a: &Point, b: &Point) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
fn line_distance(p: &Point, a: &Point, b: &Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return p.distance(a);
    }
    (dy * p.x - dx * p.y + b.x * a.y - b.y * a.x).abs() / len
}

/// Douglas-Peucker over an open chain. Both endpoints are always kept.
fn douglas_peucker(points: &[Point], epsilon: f32) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((start, end)) = stack.pop() {
        if end - start <= 1 {
            continue;
        }

        let mut max_dist = 0.0;
        let mut max_index = start;
        for i in (start + 1)..end {
            let dist = line_distance(&points[i], &points[start], &points[end]);
            if dist > max_dist {
                max_dist = dist;
                max_index = i;
            }
        }

        if max_dist > epsilon {
            keep[max_index] = true;
            stack.push((start, max_index));
            stack.push((max_index, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_outline(x0: f32, y0: f32, side: f32) -> Polygon {
        // Dense outline, one point per pixel, like a traced contour.
        let mut points = Vec::new();
        let s = side as i32;
        for i in 0..s {
            points.push(Point::new(x0 + i as f32, y0));
        }
        for i in 0..s {
            points.push(Point::new(x0 + side, y0 + i as f32));
        }
        for i in 0..s {
            points.push(Point::new(x0 + side - i as f32, y0 + side));
        }
        for i in 0..s {
            points.push(Point::new(x0, y0 + side - i as f32));
        }
        Polygon::new(points)
    }

    #[test]
    fn test_area_and_perimeter() {
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 3.0),
            Point::new(0.0, 3.0),
        ]);
        assert_eq!(poly.area(), 12.0);
        assert_eq!(poly.perimeter(true), 14.0);
        assert_eq!(poly.perimeter(false), 11.0);
    }

    #[test]
    fn test_area_degenerate() {
        let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)]);
        assert_eq!(line.area(), 0.0);
        assert_eq!(Polygon::default().perimeter(true), 0.0);
    }

    #[test]
    fn test_bounding_rect_pixel_convention() {
        let poly = Polygon::new(vec![Point::new(10.0, 20.0), Point::new(19.0, 29.0)]);
        assert_eq!(poly.bounding_rect(), Rect::new(10, 20, 10, 10));

        let single = Polygon::new(vec![Point::new(3.0, 4.0)]);
        assert_eq!(single.bounding_rect(), Rect::new(3, 4, 1, 1));
    }

    #[test]
    fn test_approx_closed_square() {
        let outline = square_outline(10.0, 10.0, 50.0);
        let epsilon = 0.015 * outline.perimeter(true);
        let approx = outline.approx_closed(epsilon);
        assert_eq!(approx.len(), 4);
        assert_eq!(approx.bounding_rect(), Rect::new(10, 10, 51, 51));
    }

    #[test]
    fn test_approx_keeps_small_polygons() {
        let tri = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 8.0),
        ]);
        assert_eq!(tri.approx_closed(100.0), tri);
    }

    #[test]
    fn test_convex_hull_drops_interior() {
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        let hull = poly.convex_hull();
        assert_eq!(hull.len(), 4);
        assert!(!hull.points.contains(&Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_min_enclosing_circle_square() {
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ]);
        let circle = poly.min_enclosing_circle();
        assert!((circle.center.x - 1.0).abs() < 1e-4);
        assert!((circle.center.y - 1.0).abs() < 1e-4);
        assert!((circle.radius - 2f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_min_enclosing_circle_sampled_circle() {
        let points = (0..72)
            .map(|i| {
                let t = i as f32 * std::f32::consts::PI / 36.0;
                Point::new(50.0 + 20.0 * t.cos(), 40.0 + 20.0 * t.sin())
            })
            .collect();
        let circle = Polygon::new(points).min_enclosing_circle();
        assert!((circle.radius - 20.0).abs() < 0.05);
        assert!((circle.center.x - 50.0).abs() < 0.05);
    }

    #[test]
    fn test_rect_union_and_aspect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 20);
        assert_eq!(a.union(&b), Rect::new(0, 0, 15, 25));
        assert_eq!(Rect::new(0, 0, 20, 10).aspect_ratio(), 2.0);
        assert_eq!(Rect::new(0, 0, 20, 0).aspect_ratio(), 0.0);
    }
}
