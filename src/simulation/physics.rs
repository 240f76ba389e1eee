use log::info;
use rand::Rng;
use serde::Serialize;

use super::collision::{CollisionChecker, Contact};
use super::geometry::{Point, Segment, Vector};
use super::particles::ParticleSystem;
use super::terrain::World;

mod defaults {
    pub const GRAVITY: f64 = -4.;
    pub const ACCELERATION_PER_SECOND: f64 = 20.;
    pub const TURN_STEP: f64 = 3.;
    pub const MAX_LANDING_SPEED: f64 = 8.;
    pub const THRUST_PARTICLE_SPEED: f64 = 4.;
    pub const DEBRIS_SPEED: f64 = 8.;
    pub const DEBRIS_ANGLES: std::ops::Range<i32> = -90..90;
    pub const DEBRIS_ANGLE_STEP: usize = 10;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Turn {
    Left,
    #[default]
    None,
    Right,
}

impl Turn {
    fn factor(self) -> f64 {
        match self {
            Turn::Left => -1.,
            Turn::None => 0.,
            Turn::Right => 1.,
        }
    }
}

/// Pilot input sampled once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Control {
    pub thrust: bool,
    pub turn: Turn,
}

impl Control {
    pub fn new(thrust: bool, turn: Turn) -> Self {
        Self { thrust, turn }
    }

    pub fn idle() -> Self {
        Self::default()
    }
}

/// `position` is the upper-left corner of the sprite box, the box extends
/// `height` downwards from it. `angle` is clockwise degrees in `[0, 360)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Craft {
    pub position: Point,
    pub velocity: Vector,
    pub angle: f64,
    pub width: f64,
    pub height: f64,
}

impl Craft {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            position: Point::default(),
            velocity: Vector::default(),
            angle: 0.,
            width,
            height,
        }
    }

    pub fn with_position(self, position: Point) -> Self {
        Self { position, ..self }
    }

    pub fn with_velocity(self, velocity: Vector) -> Self {
        Self { velocity, ..self }
    }

    pub fn with_angle(self, angle: f64) -> Self {
        Self { angle, ..self }
    }

    pub fn bottom(&self) -> f64 {
        self.position.y - self.height
    }

    pub fn center(&self) -> Point {
        self.position.offset(self.width / 2., -self.height / 2.)
    }

    /// Lower-left and lower-right corners.
    pub fn footprint(&self) -> [Point; 2] {
        let bottom_left = self.position.offset(0., -self.height);
        [bottom_left, bottom_left.offset(self.width, 0.)]
    }

    pub fn corners(&self) -> [Point; 4] {
        let [bottom_left, bottom_right] = self.footprint();
        [
            self.position,
            self.position.offset(self.width, 0.),
            bottom_left,
            bottom_right,
        ]
    }

    /// Places the craft a third of the way along `pad`, resting on it, level and still.
    pub fn park_on(&mut self, pad: &Segment) {
        self.position = Point::new(pad.begin.x + pad.width() / 3., pad.begin.y + self.height);
        self.velocity = Vector::default();
        self.angle = 0.;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crash {
    HardLanding { vertical_speed: f64 },
    Terrain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightOutcome {
    Flying,
    Landed,
    Exploded(Crash),
}

#[derive(Debug, Clone)]
pub struct Physics {
    gravity: f64,
    acceleration_per_second: f64,
    turn_step: f64,
    max_landing_speed: f64,
    collision_checker: CollisionChecker,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: defaults::GRAVITY,
            acceleration_per_second: defaults::ACCELERATION_PER_SECOND,
            turn_step: defaults::TURN_STEP,
            max_landing_speed: defaults::MAX_LANDING_SPEED,
            collision_checker: CollisionChecker::default(),
        }
    }
}

impl Physics {
    pub fn with_gravity(self, gravity: f64) -> Self {
        Self { gravity, ..self }
    }

    pub fn with_acceleration_per_second(self, acceleration_per_second: f64) -> Self {
        Self {
            acceleration_per_second,
            ..self
        }
    }

    pub fn with_turn_step(self, turn_step: f64) -> Self {
        Self { turn_step, ..self }
    }

    pub fn with_max_landing_speed(self, max_landing_speed: f64) -> Self {
        Self {
            max_landing_speed,
            ..self
        }
    }

    pub fn with_collision_checker(self, collision_checker: CollisionChecker) -> Self {
        Self {
            collision_checker,
            ..self
        }
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn max_landing_speed(&self) -> f64 {
        self.max_landing_speed
    }

    pub fn collision_checker(&self) -> &CollisionChecker {
        &self.collision_checker
    }

    /// Advances the craft by one frame. Velocity is integrated with `dt`,
    /// position then moves by the whole velocity, unscaled.
    pub fn iterate<R: Rng + ?Sized>(
        &self,
        craft: &mut Craft,
        control: Control,
        dt: f64,
        world: &World,
        particles: &mut ParticleSystem,
        rng: &mut R,
    ) -> FlightOutcome {
        craft.angle = (craft.angle + control.turn.factor() * self.turn_step).rem_euclid(360.);
        // heading is taken before a pad contact levels the craft
        let heading = Vector::from_heading(craft.angle);

        let mut outcome = FlightOutcome::Flying;
        match self.collision_checker.classify(craft, world) {
            Contact::Pad => {
                let vertical_speed = craft.velocity.dy;
                craft.velocity = Vector::default();
                craft.angle = 0.;

                if vertical_speed.abs() > self.max_landing_speed {
                    let crash = Crash::HardLanding { vertical_speed };
                    explode(craft, crash, particles, rng);
                    return FlightOutcome::Exploded(crash);
                }
                outcome = FlightOutcome::Landed;
            }
            Contact::Terrain => {
                craft.velocity.dy = 0.;
                explode(craft, Crash::Terrain, particles, rng);
                return FlightOutcome::Exploded(Crash::Terrain);
            }
            Contact::Airborne => craft.velocity.dy += dt * self.gravity,
        }

        if control.thrust {
            craft.velocity = craft
                .velocity
                .add(heading.scale(dt * self.acceleration_per_second));
            emit_thrust(craft, particles, rng);
        }

        craft.position = craft.position.translate(craft.velocity);
        outcome
    }
}

fn emit_thrust<R: Rng + ?Sized>(craft: &Craft, particles: &mut ParticleSystem, rng: &mut R) {
    let angle = craft.angle + 180.;
    let exhaust = Vector::from_heading(angle);
    let origin = craft
        .center()
        .offset(exhaust.dx * craft.width / 2., exhaust.dy * craft.height / 2.);
    particles.spawn_thrust(rng, angle, origin, defaults::THRUST_PARTICLE_SPEED);
}

/// Scatters debris in a fan from the middle of the craft's lower edge.
pub fn explode<R: Rng + ?Sized>(
    craft: &Craft,
    crash: Crash,
    particles: &mut ParticleSystem,
    rng: &mut R,
) {
    match crash {
        Crash::HardLanding { vertical_speed } => {
            info!("Kaboom! Hard landing at {vertical_speed:.3}")
        }
        Crash::Terrain => info!(
            "Kaboom! Hit terrain at ({:.1}, {:.1})",
            craft.position.x, craft.position.y
        ),
    }
    let origin = craft.position.offset(craft.width / 2., -craft.height);
    for angle in defaults::DEBRIS_ANGLES.step_by(defaults::DEBRIS_ANGLE_STEP) {
        particles.spawn(rng, angle as f64, origin, defaults::DEBRIS_SPEED);
    }
}
