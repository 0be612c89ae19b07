//! Polygon geometry for closing turning cuts
//!
//! Everything works in tile-coordinate space (tile centers sit on integer
//! points), so the play field boundary is the rectangle spanned by the border
//! tile centers.

use glam::Vec2;

const EPS: f32 = 1e-4;

/// Winding order of a closed polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
    /// Zero area (collinear or fewer than 3 points)
    Degenerate,
}

/// Signed area via the shoelace formula (positive = counter-clockwise)
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].perp_dot(points[j]);
    }
    area / 2.0
}

pub fn winding(points: &[Vec2]) -> Winding {
    let area = signed_area(points);
    if area > EPS {
        Winding::CounterClockwise
    } else if area < -EPS {
        Winding::Clockwise
    } else {
        Winding::Degenerate
    }
}

/// Even-odd ray casting test
pub fn contains_point(points: &[Vec2], p: Vec2) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Whether `p` lies on segment `a`-`b`
pub fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    let ab = b - a;
    let ap = p - a;
    if ab.perp_dot(ap).abs() > EPS {
        return false;
    }
    let t = ap.dot(ab);
    t >= -EPS && t <= ab.length_squared() + EPS
}

/// Whether `p` lies on any edge of the closed polygon
pub fn on_boundary(points: &[Vec2], p: Vec2) -> bool {
    let n = points.len();
    (0..n).any(|i| on_segment(points[i], points[(i + 1) % n], p))
}

/// Inside or on the boundary
pub fn covers(points: &[Vec2], p: Vec2) -> bool {
    on_boundary(points, p) || contains_point(points, p)
}

/// Axis-aligned rectangle whose perimeter closes open cut paths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundaryRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn perimeter(&self) -> f32 {
        2.0 * (self.size().x + self.size().y)
    }

    /// Corners in counter-clockwise order starting at `min`
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Nearest point on the perimeter
    pub fn project(&self, p: Vec2) -> Vec2 {
        let p = p.clamp(self.min, self.max);
        let q = p - self.min;
        let size = self.size();
        // bottom, right, top, left
        let dists = [q.y, size.x - q.x, size.y - q.y, q.x];
        let nearest = dists
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);
        match nearest {
            0 => Vec2::new(p.x, self.min.y),
            1 => Vec2::new(self.max.x, p.y),
            2 => Vec2::new(p.x, self.max.y),
            _ => Vec2::new(self.min.x, p.y),
        }
    }

    /// Distance along the perimeter, counter-clockwise from `min`
    ///
    /// `p` must already be on the perimeter (see [`BoundaryRect::project`]).
    pub fn perimeter_param(&self, p: Vec2) -> f32 {
        let q = p - self.min;
        let Vec2 { x: w, y: h } = self.size();
        if q.y.abs() < EPS {
            q.x
        } else if (q.x - w).abs() < EPS {
            w + q.y
        } else if (q.y - h).abs() < EPS {
            w + h + (w - q.x)
        } else {
            2.0 * w + h + (h - q.y)
        }
    }

    /// Corners passed when walking the perimeter from `from` to `to`
    ///
    /// Both points must be on the perimeter. When they coincide the
    /// counter-clockwise walk is empty and the clockwise walk goes all the way
    /// around.
    pub fn walk(&self, from: Vec2, to: Vec2, counter_clockwise: bool) -> Vec<Vec2> {
        let perimeter = self.perimeter();
        if perimeter <= EPS {
            return Vec::new();
        }
        let wrap = |x: f32| x.rem_euclid(perimeter);
        let t_from = self.perimeter_param(from);
        let t_to = self.perimeter_param(to);

        let travel = |t: f32| {
            if counter_clockwise {
                wrap(t - t_from)
            } else {
                wrap(t_from - t)
            }
        };
        let mut span = travel(t_to);
        if span < EPS && !counter_clockwise {
            span = perimeter;
        }

        let mut passed: Vec<(f32, Vec2)> = self
            .corners()
            .into_iter()
            .map(|corner| (travel(self.perimeter_param(corner)), corner))
            .filter(|(d, _)| *d > EPS && *d < span - EPS)
            .collect();
        passed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        passed.into_iter().map(|(_, corner)| corner).collect()
    }

    /// Close an open path (start..end) into a polygon along the perimeter
    pub fn close_path(&self, path: &[Vec2], counter_clockwise: bool) -> Vec<Vec2> {
        let (Some(&start), Some(&end)) = (path.first(), path.last()) else {
            return Vec::new();
        };
        let start_proj = self.project(start);
        let end_proj = self.project(end);

        let mut polygon = path.to_vec();
        if end_proj.distance(end) > EPS {
            polygon.push(end_proj);
        }
        polygon.extend(self.walk(end_proj, start_proj, counter_clockwise));
        if start_proj.distance(start) > EPS {
            polygon.push(start_proj);
        }
        polygon
    }
}
