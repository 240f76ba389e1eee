use super::geometry::{segment_containing, Point};
use super::physics::Craft;
use super::terrain::World;

mod defaults {
    pub const PAD_TOLERANCE: f64 = 5.;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Pad,
    Terrain,
    Airborne,
}

#[derive(Debug, Clone)]
pub struct CollisionChecker {
    pad_tolerance: f64,
}

impl Default for CollisionChecker {
    fn default() -> Self {
        Self {
            pad_tolerance: defaults::PAD_TOLERANCE,
        }
    }
}

impl CollisionChecker {
    pub fn with_pad_tolerance(self, pad_tolerance: f64) -> Self {
        Self { pad_tolerance }
    }

    pub fn pad_tolerance(&self) -> f64 {
        self.pad_tolerance
    }

    /// Pad contact wins over terrain contact: a craft sitting on a pad also has
    /// its lower corners on the pad surface.
    pub fn classify(&self, craft: &Craft, world: &World) -> Contact {
        if self.is_on_pad(craft, world) {
            Contact::Pad
        } else if is_on_terrain(craft, world) {
            Contact::Terrain
        } else {
            Contact::Airborne
        }
    }

    fn is_on_pad(&self, craft: &Craft, world: &World) -> bool {
        let [left, right] = craft.footprint();
        let (Some(pad), Some(_)) = (
            segment_containing(left, world.pads()),
            segment_containing(right, world.pads()),
        ) else {
            return false;
        };
        craft.bottom() - pad.begin.y < self.pad_tolerance
    }
}

fn is_on_terrain(craft: &Craft, world: &World) -> bool {
    craft
        .corners()
        .into_iter()
        .any(|corner: Point| world.is_below_surface(corner))
}
