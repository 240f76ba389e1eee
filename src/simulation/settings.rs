use crate::Error;

use super::particles::ParticleSystem;
use super::physics::Physics;
use super::terrain::TerrainGenerator;

mod defaults {
    pub const FRAME_DT: f64 = 1. / 60.;
    pub const LEFT_PAD_END_RATIO: f64 = 0.9;
    pub const PADS_IN_CRAFT_WIDTHS: f64 = 5.;
}

/// Everything a session needs to build its world and fly the craft.
#[derive(Debug, Clone)]
pub struct Settings {
    pub world_width: f64,
    pub world_height: f64,
    pub craft_width: f64,
    pub craft_height: f64,
    pub frame_dt: f64,
    pub seed: Option<u64>,
    pub physics: Physics,
    pub terrain: TerrainGenerator,
    pub particles: ParticleSystem,
}

impl Settings {
    pub fn new(world_width: f64, world_height: f64, craft_width: f64, craft_height: f64) -> Self {
        Self {
            world_width,
            world_height,
            craft_width,
            craft_height,
            frame_dt: defaults::FRAME_DT,
            seed: None,
            physics: Physics::default(),
            terrain: TerrainGenerator::default(),
            particles: ParticleSystem::default(),
        }
    }

    pub fn with_frame_dt(self, frame_dt: f64) -> Self {
        Self { frame_dt, ..self }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn with_physics(self, physics: Physics) -> Self {
        Self { physics, ..self }
    }

    pub fn with_terrain(self, terrain: TerrainGenerator) -> Self {
        Self { terrain, ..self }
    }

    pub fn with_particles(self, particles: ParticleSystem) -> Self {
        Self { particles, ..self }
    }

    pub fn validate(&self) -> Result<(), Error> {
        let dimensions = [
            ("world width", self.world_width),
            ("world height", self.world_height),
            ("craft width", self.craft_width),
            ("craft height", self.craft_height),
            ("frame dt", self.frame_dt),
            ("max landing speed", self.physics.max_landing_speed()),
            ("terrain segment width", self.terrain.segment_width()),
            ("particle lifetime", self.particles.seconds_to_live()),
        ];
        if let Some((name, value)) = dimensions
            .iter()
            .find(|(_, value)| !value.is_finite() || *value <= 0.)
        {
            return Err(Error::InvalidSettings(format!(
                "{name} has to be positive, got {value}"
            )));
        }
        // left pad ends at 0.1 * width + 2 crafts, right pad begins 3 crafts from the edge
        if self.world_width * defaults::LEFT_PAD_END_RATIO
            <= self.craft_width * defaults::PADS_IN_CRAFT_WIDTHS
        {
            return Err(Error::InvalidSettings(format!(
                "world width {} leaves no room between pads for craft width {}",
                self.world_width, self.craft_width
            )));
        }
        let non_negative = [
            ("pad tolerance", self.physics.collision_checker().pad_tolerance()),
            ("terrain slope height", self.terrain.slope_height()),
        ];
        if let Some((name, value)) = non_negative
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.)
        {
            return Err(Error::InvalidSettings(format!(
                "{name} can't be negative, got {value}"
            )));
        }
        if self.world_height <= self.craft_height {
            return Err(Error::InvalidSettings(format!(
                "world height {} has to exceed craft height {}",
                self.world_height, self.craft_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod settings_tests {
    use super::*;
    use crate::simulation::collision::CollisionChecker;

    #[test]
    fn regular_window_is_valid() {
        assert!(Settings::new(640., 480., 16., 16.).validate().is_ok());
    }

    #[test]
    fn non_positive_dimension_is_rejected() {
        let err = Settings::new(0., 480., 16., 16.).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(reason) if reason.contains("world width")));
        assert!(Settings::new(640., 480., 16., f64::NAN).validate().is_err());
        assert!(Settings::new(640., 480., 16., 16.)
            .with_frame_dt(0.)
            .validate()
            .is_err());
    }

    #[test]
    fn overlapping_pads_are_rejected() {
        assert!(Settings::new(80., 480., 16., 16.).validate().is_err());
        assert!(Settings::new(100., 480., 16., 16.).validate().is_ok());
    }

    #[test]
    fn component_tunables_are_checked() {
        let settings = || Settings::new(640., 480., 16., 16.);
        let err = settings()
            .with_physics(Physics::default().with_max_landing_speed(0.))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(reason) if reason.contains("landing speed")));
        assert!(settings()
            .with_physics(
                Physics::default()
                    .with_collision_checker(CollisionChecker::default().with_pad_tolerance(-1.))
            )
            .validate()
            .is_err());
        assert!(settings()
            .with_terrain(TerrainGenerator::default().with_segment_width(0.))
            .validate()
            .is_err());
        assert!(settings()
            .with_terrain(TerrainGenerator::default().with_slope_height(-5.))
            .validate()
            .is_err());
        assert!(settings()
            .with_particles(ParticleSystem::default().with_seconds_to_live(0.))
            .validate()
            .is_err());
        assert!(settings()
            .with_terrain(TerrainGenerator::default().with_segment_width(35.))
            .with_particles(ParticleSystem::default().with_max_particles(10))
            .validate()
            .is_ok());
    }

    #[test]
    fn craft_taller_than_world_is_rejected() {
        assert!(Settings::new(640., 10., 16., 16.).validate().is_err());
    }
}
