use serde::Serialize;

use crate::simulation::*;
use crate::Error;

/// Source of pilot input, asked once per frame. `None` ends the run.
pub trait ControlProvider {
    fn get_control(&mut self, frame: usize, session: &Session) -> Option<Control>;
}

/// A scripted flight. Once the script runs out its last control is held.
impl ControlProvider for [Control] {
    fn get_control(&mut self, frame: usize, _: &Session) -> Option<Control> {
        self.get(frame).or(self.last()).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlightStats {
    pub frames: usize,
    pub explosions: usize,
    pub resets: usize,
    pub landed_frames: usize,
}

/// Headless frame driver: fixed time step, one control sample per frame.
pub struct App {
    session: Session,
    frame_dt: f64,
    stats: FlightStats,
}

impl App {
    pub fn try_new(settings: Settings) -> Result<Self, Error> {
        settings.validate()?;
        Ok(Self {
            session: Session::initialize(&settings),
            frame_dt: settings.frame_dt,
            stats: FlightStats::default(),
        })
    }

    pub fn run<P: ControlProvider + ?Sized>(
        &mut self,
        provider: &mut P,
        frames: usize,
    ) -> &FlightStats {
        for _ in 0..frames {
            let Some(control) = provider.get_control(self.stats.frames, &self.session) else {
                break;
            };
            self.step(control);
        }
        &self.stats
    }

    pub fn step(&mut self, control: Control) -> SessionState {
        let previous = self.session.state();
        let current = self.session.advance(self.frame_dt, control);

        match (previous, current) {
            (SessionState::Flying, SessionState::Exploding) => self.stats.explosions += 1,
            (SessionState::Exploding, SessionState::Flying) => self.stats.resets += 1,
            _ => {}
        }
        if current == SessionState::Flying
            && self.session.last_outcome() == FlightOutcome::Landed
        {
            self.stats.landed_frames += 1;
        }
        self.stats.frames += 1;
        current
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stats(&self) -> &FlightStats {
        &self.stats
    }
}
