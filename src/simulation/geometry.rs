use serde::Serialize;

/// World coordinates, y grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn translate(self, v: Vector) -> Self {
        self.offset(v.dx, v.dy)
    }
}

/// Velocity in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Unit vector for an angle in degrees measured clockwise from vertical.
    pub fn from_heading(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self { dx: sin, dy: cos }
    }

    pub fn scale(self, k: f64) -> Self {
        Self {
            dx: self.dx * k,
            dy: self.dy * k,
        }
    }

    pub fn add(self, w: Vector) -> Self {
        Self {
            dx: self.dx + w.dx,
            dy: self.dy + w.dy,
        }
    }
}

/// Directed edge of the terrain or of a landing pad, built left to right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub begin: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(begin: Point, end: Point) -> Self {
        Self { begin, end }
    }

    pub fn width(&self) -> f64 {
        self.end.x - self.begin.x
    }

    /// Highest point of the segment, used as the surface height over its whole x-range.
    pub fn height(&self) -> f64 {
        self.begin.y.max(self.end.y)
    }

    pub fn is_flat(&self) -> bool {
        self.begin.y == self.end.y
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.begin.x && x < self.end.x
    }
}

/// Finds the segment whose `[begin.x, end.x)` range holds `point.x`.
pub fn segment_containing(point: Point, segments: &[Segment]) -> Option<&Segment> {
    segments.iter().find(|segment| segment.contains_x(point.x))
}

/// Terrain is queried first, pads second. A point outside both is never below.
pub fn is_below_surface(point: Point, terrain: &[Segment], pads: &[Segment]) -> bool {
    segment_containing(point, terrain)
        .or_else(|| segment_containing(point, pads))
        .is_some_and(|segment| point.y - segment.height() <= 0.)
}
