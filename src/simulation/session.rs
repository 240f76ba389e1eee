use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use super::geometry::{Point, Segment};
use super::particles::ParticleSystem;
use super::physics::{Control, Craft, FlightOutcome, Physics};
use super::settings::Settings;
use super::terrain::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Flying,
    Exploding,
}

/// What a renderer needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub state: SessionState,
    pub craft: Option<Craft>,
    pub particles: Vec<Point>,
    pub terrain: Vec<Segment>,
    pub pads: Vec<Segment>,
    pub stars: Vec<Point>,
}

pub struct Session {
    state: SessionState,
    craft: Craft,
    world: World,
    particles: ParticleSystem,
    physics: Physics,
    rng: StdRng,
    last_outcome: FlightOutcome,
}

impl Session {
    /// Generates the world and parks the craft on the first pad.
    pub fn initialize(settings: &Settings) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let world = settings.terrain.generate(
            &mut rng,
            settings.world_width,
            settings.world_height,
            settings.craft_width,
        );
        Self::with_world(
            world,
            Craft::new(settings.craft_width, settings.craft_height),
            settings.physics.clone(),
            settings.particles.clone(),
            rng,
        )
    }

    pub fn with_world(
        world: World,
        mut craft: Craft,
        physics: Physics,
        particles: ParticleSystem,
        rng: StdRng,
    ) -> Self {
        craft.park_on(world.start_pad());
        Self {
            state: SessionState::Flying,
            craft,
            world,
            particles,
            physics,
            rng,
            last_outcome: FlightOutcome::Landed,
        }
    }

    /// Runs one frame. Particles move in every state, the craft only while flying.
    pub fn advance(&mut self, dt: f64, control: Control) -> SessionState {
        match self.state {
            SessionState::Flying => {
                self.last_outcome = self.physics.iterate(
                    &mut self.craft,
                    control,
                    dt,
                    &self.world,
                    &mut self.particles,
                    &mut self.rng,
                );
                if let FlightOutcome::Exploded(crash) = self.last_outcome {
                    debug!("Session exploding after {crash:?}");
                    self.state = SessionState::Exploding;
                }
            }
            SessionState::Exploding if self.particles.is_empty() => self.reset(),
            SessionState::Exploding => {}
        }
        self.particles.update(dt, self.physics.gravity(), &self.world);
        self.state
    }

    fn reset(&mut self) {
        self.craft.park_on(self.world.start_pad());
        self.last_outcome = FlightOutcome::Flying;
        self.state = SessionState::Flying;
        info!(
            "Craft reset to ({:.1}, {:.1})",
            self.craft.position.x, self.craft.position.y
        );
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Outcome of the last craft update.
    pub fn last_outcome(&self) -> FlightOutcome {
        self.last_outcome
    }

    /// The craft is hidden while it is exploding.
    pub fn craft(&self) -> Option<&Craft> {
        match self.state {
            SessionState::Flying => Some(&self.craft),
            SessionState::Exploding => None,
        }
    }

    pub fn particles(&self) -> impl Iterator<Item = Point> + '_ {
        self.particles.positions()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn terrain(&self) -> &[Segment] {
        self.world.terrain()
    }

    pub fn pads(&self) -> &[Segment] {
        self.world.pads()
    }

    pub fn stars(&self) -> &[Point] {
        self.world.stars()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            craft: self.craft().cloned(),
            particles: self.particles().collect(),
            terrain: self.terrain().to_vec(),
            pads: self.pads().to_vec(),
            stars: self.stars().to_vec(),
        }
    }
}
