use geo::{Coord, Point};

/// Axis-aligned bounding accumulator over a trajectory or a group of
/// trajectories.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Coord,
    pub max: Coord,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            min: Coord {
                x: f64::MAX,
                y: f64::MAX,
            },
            max: Coord {
                x: -f64::MAX,
                y: -f64::MAX,
            },
        }
    }
}

impl Bounds {
    /// Grows the bounds to cover `point`.
    pub fn extend(&mut self, point: Point) {
        self.min.x = self.min.x.min(point.x());
        self.min.y = self.min.y.min(point.y());
        self.max.x = self.max.x.max(point.x());
        self.max.y = self.max.y.max(point.y());
    }

    /// Grows the bounds to cover another accumulator.
    pub fn merge(&mut self, other: &Bounds) {
        self.extend(Point::new(other.min.x, other.min.y));
        self.extend(Point::new(other.max.x, other.max.y));
    }

    /// Whether any point has been accumulated.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Length of the diagonal of the bounded region.
    pub fn diagonal(&self) -> f64 {
        let width = self.max.x - self.min.x;
        let height = self.max.y - self.min.y;
        (width * width + height * height).sqrt()
    }
}

impl FromIterator<Point> for Bounds {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut bounds = Bounds::default();
        for point in iter {
            bounds.extend(point);
        }
        bounds
    }
}
