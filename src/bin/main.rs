use clap::Parser;
use rand::Rng;
use simulation::{App, Control, ControlProvider, Session, Settings, Turn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Fly the lander headless with a random pilot")]
struct Args {
    /// JSON settings file, a 640x480 world with a 16x16 craft when omitted
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long, default_value_t = 600)]
    frames: usize,
    #[arg(long)]
    seed: Option<u64>,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

struct RandomPilot {}

impl ControlProvider for RandomPilot {
    fn get_control(&mut self, _: usize, session: &Session) -> Option<Control> {
        let mut rng = rand::thread_rng();
        // keep the engine lit while sinking fast
        let sinking = session.craft().is_some_and(|craft| craft.velocity.dy < -3.);
        let turn = match rng.gen_range(0..3) {
            0 => Turn::Left,
            1 => Turn::None,
            _ => Turn::Right,
        };
        Some(Control::new(sinking || rng.gen_bool(0.3), turn))
    }
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => simulation::init::json::parse_settings(path).map_err(|e| e.to_string())?,
        None => Settings::new(640., 480., 16., 16.),
    };
    let settings = match args.seed {
        Some(seed) => settings.with_seed(seed),
        None => settings,
    };

    let mut app = App::try_new(settings).map_err(|e| e.to_string())?;
    let now = std::time::Instant::now();
    let stats = app.run(&mut RandomPilot {}, args.frames).clone();
    let elapsed = now.elapsed();

    println!("Run ended with {stats:?} time: {elapsed:?}");
    if args.json {
        let snapshot = serde_json::to_string_pretty(&app.session().snapshot())
            .map_err(|e| e.to_string())?;
        println!("{snapshot}");
    }
    Ok(())
}
