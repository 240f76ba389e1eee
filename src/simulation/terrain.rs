use log::{debug, warn};
use rand::Rng;

use super::geometry::{self, Point, Segment};

mod defaults {
    pub const SEGMENT_WIDTH: f64 = 20.;
    pub const SLOPE_HEIGHT: f64 = 160.;
    pub const STAR_COUNT: usize = 20;
    pub const MAX_RESAMPLES: usize = 1000;
    pub const LEFT_PAD_X: f64 = 0.1;
    pub const PAD_Y: f64 = 0.2;
    pub const EDGE_Y: f64 = 0.25;
    pub const PAD_WIDTH_IN_CRAFTS: f64 = 2.;
    pub const RIGHT_PAD_MARGIN_IN_CRAFTS: f64 = 3.;
}

/// Landscape of one session: terrain, the two landing pads and the background stars.
#[derive(Debug, Clone)]
pub struct World {
    width: f64,
    height: f64,
    terrain: Vec<Segment>,
    pads: [Segment; 2],
    stars: Vec<Point>,
}

impl World {
    pub fn new(
        width: f64,
        height: f64,
        terrain: Vec<Segment>,
        pads: [Segment; 2],
        stars: Vec<Point>,
    ) -> Self {
        Self {
            width,
            height,
            terrain,
            pads,
            stars,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn terrain(&self) -> &[Segment] {
        &self.terrain
    }

    pub fn pads(&self) -> &[Segment] {
        &self.pads
    }

    /// Pad the craft starts on and is reset to.
    pub fn start_pad(&self) -> &Segment {
        &self.pads[0]
    }

    pub fn stars(&self) -> &[Point] {
        &self.stars
    }

    pub fn is_below_surface(&self, point: Point) -> bool {
        geometry::is_below_surface(point, &self.terrain, &self.pads)
    }
}

#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    segment_width: f64,
    slope_height: f64,
    star_count: usize,
    max_resamples: usize,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self {
            segment_width: defaults::SEGMENT_WIDTH,
            slope_height: defaults::SLOPE_HEIGHT,
            star_count: defaults::STAR_COUNT,
            max_resamples: defaults::MAX_RESAMPLES,
        }
    }
}

impl TerrainGenerator {
    pub fn with_segment_width(self, segment_width: f64) -> Self {
        Self {
            segment_width,
            ..self
        }
    }

    pub fn with_slope_height(self, slope_height: f64) -> Self {
        Self {
            slope_height,
            ..self
        }
    }

    pub fn with_star_count(self, star_count: usize) -> Self {
        Self { star_count, ..self }
    }

    pub fn with_max_resamples(self, max_resamples: usize) -> Self {
        Self {
            max_resamples,
            ..self
        }
    }

    pub fn segment_width(&self) -> f64 {
        self.segment_width
    }

    pub fn slope_height(&self) -> f64 {
        self.slope_height
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        width: f64,
        height: f64,
        craft_width: f64,
    ) -> World {
        let pads = landing_pads(width, height, craft_width);
        let [left, right] = pads;
        let edge_y = height * defaults::EDGE_Y;
        let max_y = height / 2.;

        let mut terrain = self.run(rng, Point::new(0., edge_y), left.begin, max_y);
        terrain.extend(self.run(rng, left.end, right.begin, max_y));
        terrain.extend(self.run(rng, right.end, Point::new(width, edge_y), max_y));

        let mut world = World::new(width, height, terrain, pads, Vec::new());
        world.stars = self.stars(rng, &world);
        debug!(
            "Generated world {width}x{height}: {} terrain segments, pads at {:.1} and {:.1}",
            world.terrain.len(),
            left.begin.x,
            right.begin.x
        );
        world
    }

    /// Jagged run between two fixed endpoints. Heights stay within `[0, max_y]`
    /// and the last segment lands exactly on `end`.
    fn run<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        start: Point,
        end: Point,
        max_y: f64,
    ) -> Vec<Segment> {
        let span = end.x - start.x;
        if span <= 0. {
            return Vec::new();
        }
        let count = if self.segment_width > 0. {
            ((span / self.segment_width).floor() as usize).max(1)
        } else {
            1
        };
        let segment_width = span / count as f64;

        let mut begin = start;
        (0..count)
            .map(|i| {
                let end_point = if i == count - 1 {
                    end
                } else {
                    Point::new(
                        start.x + segment_width * (i + 1) as f64,
                        self.next_height(rng, begin.y, max_y),
                    )
                };
                let segment = Segment::new(begin, end_point);
                begin = end_point;
                segment
            })
            .collect()
    }

    fn next_height<R: Rng + ?Sized>(&self, rng: &mut R, y: f64, max_y: f64) -> f64 {
        let half = self.slope_height.abs() / 2.;
        let mut candidate = y;
        for _ in 0..self.max_resamples {
            candidate = y + rng.gen_range(-half..=half);
            if (0. ..=max_y).contains(&candidate) {
                return candidate;
            }
        }
        warn!("Terrain height resampling exhausted, clamping {candidate:.1} into [0, {max_y:.1}]");
        candidate.clamp(0., max_y.max(0.))
    }

    fn stars<R: Rng + ?Sized>(&self, rng: &mut R, world: &World) -> Vec<Point> {
        (0..self.star_count)
            .map(|_| {
                for _ in 0..self.max_resamples {
                    let star = Point::new(
                        rng.gen::<f64>() * world.width,
                        rng.gen::<f64>() * world.height,
                    );
                    if !world.is_below_surface(star) {
                        return star;
                    }
                }
                warn!("Star placement resampling exhausted, pinning star to the top edge");
                Point::new(rng.gen::<f64>() * world.width, world.height)
            })
            .collect()
    }
}

fn landing_pads(width: f64, height: f64, craft_width: f64) -> [Segment; 2] {
    let pad_y = height * defaults::PAD_Y;
    let pad_width = craft_width * defaults::PAD_WIDTH_IN_CRAFTS;

    let left_x = width * defaults::LEFT_PAD_X;
    let right_x = width - craft_width * defaults::RIGHT_PAD_MARGIN_IN_CRAFTS;

    [
        Segment::new(Point::new(left_x, pad_y), Point::new(left_x + pad_width, pad_y)),
        Segment::new(Point::new(right_x, pad_y), Point::new(right_x + pad_width, pad_y)),
    ]
}
