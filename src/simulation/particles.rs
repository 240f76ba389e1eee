use log::trace;
use rand::Rng;

use super::geometry::{Point, Vector};
use super::terrain::World;

mod defaults {
    pub const MAX_PARTICLES: usize = 60;
    pub const THRUST_LIMIT: usize = 30;
    pub const ANGLE_JITTER: f64 = 20.;
    pub const SPEED_JITTER: f64 = 2.;
    pub const SECONDS_TO_LIVE: f64 = 1.5;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Vector,
    pub seconds_to_live: f64,
}

/// Exhaust and debris sparks. Particles are unordered.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max_particles: usize,
    thrust_limit: usize,
    angle_jitter: f64,
    speed_jitter: f64,
    seconds_to_live: f64,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self {
            particles: Vec::with_capacity(defaults::MAX_PARTICLES),
            max_particles: defaults::MAX_PARTICLES,
            thrust_limit: defaults::THRUST_LIMIT,
            angle_jitter: defaults::ANGLE_JITTER,
            speed_jitter: defaults::SPEED_JITTER,
            seconds_to_live: defaults::SECONDS_TO_LIVE,
        }
    }
}

impl ParticleSystem {
    pub fn with_max_particles(self, max_particles: usize) -> Self {
        Self {
            max_particles,
            ..self
        }
    }

    pub fn with_thrust_limit(self, thrust_limit: usize) -> Self {
        Self {
            thrust_limit,
            ..self
        }
    }

    pub fn with_seconds_to_live(self, seconds_to_live: f64) -> Self {
        Self {
            seconds_to_live,
            ..self
        }
    }

    pub fn seconds_to_live(&self) -> f64 {
        self.seconds_to_live
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    /// Adds one particle with jittered angle and speed. Returns false when the cap is reached.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        angle: f64,
        origin: Point,
        speed: f64,
    ) -> bool {
        if self.particles.len() >= self.max_particles {
            trace!("Particle cap of {} reached, spawn refused", self.max_particles);
            return false;
        }

        let angle = angle + rng.gen_range(-self.angle_jitter..=self.angle_jitter);
        let speed = speed + rng.gen_range(-self.speed_jitter..=self.speed_jitter);

        self.particles.push(Particle {
            position: origin,
            velocity: Vector::from_heading(angle).scale(speed),
            seconds_to_live: self.seconds_to_live,
        });
        true
    }

    /// Exhaust is dropped once the thrust budget is used so debris always has room.
    pub fn spawn_thrust<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        angle: f64,
        origin: Point,
        speed: f64,
    ) -> bool {
        if self.particles.len() > self.thrust_limit {
            return false;
        }
        self.spawn(rng, angle, origin, speed)
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn update(&mut self, dt: f64, gravity: f64, world: &World) {
        self.particles.retain_mut(|particle| {
            particle.velocity.dy += dt * gravity;
            particle.position = particle.position.translate(particle.velocity);
            particle.seconds_to_live -= dt;

            particle.seconds_to_live >= 0. && !world.is_below_surface(particle.position)
        });
    }
}

#[cfg(test)]
mod particles_tests {
    use super::*;
    use crate::simulation::geometry::Segment;
    use rand::{rngs::StdRng, SeedableRng};

    fn flat_world() -> World {
        let pads = [
            Segment::new(Point::new(100., 20.), Point::new(140., 20.)),
            Segment::new(Point::new(300., 20.), Point::new(340., 20.)),
        ];
        let terrain = vec![
            Segment::new(Point::new(0., 10.), Point::new(100., 20.)),
            Segment::new(Point::new(140., 20.), Point::new(300., 20.)),
            Segment::new(Point::new(340., 20.), Point::new(400., 10.)),
        ];
        World::new(400., 300., terrain, pads, Vec::new())
    }

    fn resting(x: f64, y: f64, seconds_to_live: f64) -> Particle {
        Particle {
            position: Point::new(x, y),
            velocity: Vector::default(),
            seconds_to_live,
        }
    }

    #[test]
    fn expires_after_lifetime() {
        let mut particles = ParticleSystem::default();
        particles.insert(resting(50., 200., 0.05));
        particles.update(0.1, 0., &flat_world());
        assert!(particles.is_empty());
    }

    #[test]
    fn survives_within_lifetime() {
        let mut particles = ParticleSystem::default();
        particles.insert(resting(50., 200., 1.));
        particles.update(0.1, -4., &flat_world());
        assert_eq!(particles.len(), 1);
        let p = particles.iter().next().unwrap();
        assert!((p.velocity.dy + 0.4).abs() < 1e-12);
        assert!((p.position.y - 199.6).abs() < 1e-12);
        assert!((p.seconds_to_live - 0.9).abs() < 1e-12);
    }

    #[test]
    fn removed_below_terrain() {
        let mut particles = ParticleSystem::default();
        particles.insert(Particle {
            position: Point::new(200., 25.),
            velocity: Vector::new(0., -10.),
            seconds_to_live: 1.5,
        });
        particles.insert(resting(200., 100., 1.5));
        particles.update(0.016, -4., &flat_world());
        assert_eq!(particles.len(), 1);
        assert_eq!(particles.iter().next().unwrap().position.x, 200.);
        assert!(particles.iter().next().unwrap().position.y > 99.);
    }

    #[test]
    fn cap_is_never_exceeded() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut particles = ParticleSystem::default();
        let spawned = (0..100)
            .filter(|_| particles.spawn(&mut rng, 0., Point::new(10., 10.), 8.))
            .count();
        assert_eq!(spawned, 60);
        assert_eq!(particles.len(), 60);
    }

    #[test]
    fn thrust_is_rate_limited() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut particles = ParticleSystem::default();
        let spawned = (0..100)
            .filter(|_| particles.spawn_thrust(&mut rng, 180., Point::new(10., 10.), 4.))
            .count();
        assert_eq!(spawned, 31);
        assert!(particles.spawn(&mut rng, 0., Point::new(10., 10.), 8.));
    }

    #[test]
    fn configured_limits_apply() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut particles = ParticleSystem::default()
            .with_max_particles(10)
            .with_thrust_limit(4)
            .with_seconds_to_live(0.5);
        let thrust = (0..20)
            .filter(|_| particles.spawn_thrust(&mut rng, 180., Point::new(10., 10.), 4.))
            .count();
        assert_eq!(thrust, 5);
        let debris = (0..20)
            .filter(|_| particles.spawn(&mut rng, 0., Point::new(10., 10.), 8.))
            .count();
        assert_eq!(debris, 5);
        assert!(particles.iter().all(|p| p.seconds_to_live == 0.5));
    }

    #[test]
    fn spawn_jitter_is_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut particles = ParticleSystem::default();
        for _ in 0..50 {
            particles.spawn(&mut rng, 0., Point::new(0., 0.), 8.);
        }
        for p in particles.iter() {
            let speed = p.velocity.dx.hypot(p.velocity.dy);
            assert!((6. - 1e-9..=10. + 1e-9).contains(&speed));
            let angle = p.velocity.dx.atan2(p.velocity.dy).to_degrees();
            assert!((-20. - 1e-9..=20. + 1e-9).contains(&angle));
            assert_eq!(p.seconds_to_live, 1.5);
        }
    }
}
