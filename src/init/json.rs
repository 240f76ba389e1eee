use crate::simulation::*;
use crate::Error;
use json::{self, JsonValue};
use std::{fs::File, io::Read, path::Path};

macro_rules! get_json {
    ($json:ident[$first:literal $(, $key:literal)*], $func:ident) => {
        $json[$first]$([$key])*
            .$func()
            .ok_or(Error::MissingKey(concat!($first $(, "/", $key)*)))?
    };
}

macro_rules! optional_json {
    ($json:ident[$first:literal $(, $key:literal)*], $func:ident) => {{
        let value = &$json[$first]$([$key])*;
        if value.is_null() {
            None
        } else {
            Some(value.$func().ok_or_else(|| {
                Error::InvalidSettings(format!(
                    concat!("Unexpected value for ", $first $(, "/", $key)*, ": {}"),
                    value.dump()
                ))
            })?)
        }
    }};
}

pub fn parse_settings<P: AsRef<Path>>(settings_file_path: P) -> Result<Settings, Error> {
    parse_settings_json(&read_json(settings_file_path)?)
}

pub fn parse_settings_from_string(text: &str) -> Result<Settings, Error> {
    parse_settings_json(&json::parse(text)?)
}

fn read_json<P: AsRef<Path>>(file_path: P) -> Result<JsonValue, Error> {
    let path = file_path.as_ref().display().to_string();
    let mut file_content = String::new();
    File::open(&file_path)
        .and_then(|mut file| file.read_to_string(&mut file_content))
        .map_err(|source| Error::Io { path, source })?;
    Ok(json::parse(&file_content)?)
}

fn parse_settings_json(json: &JsonValue) -> Result<Settings, Error> {
    let mut settings = Settings::new(
        get_json!(json["World", "Width"], as_f64),
        get_json!(json["World", "Height"], as_f64),
        get_json!(json["Craft", "Width"], as_f64),
        get_json!(json["Craft", "Height"], as_f64),
    );

    if let Some(frame_dt) = optional_json!(json["FrameDt"], as_f64) {
        settings = settings.with_frame_dt(frame_dt);
    }
    if let Some(seed) = optional_json!(json["Seed"], as_u64) {
        settings = settings.with_seed(seed);
    }
    let settings = settings
        .with_physics(parse_physics(json)?)
        .with_terrain(parse_terrain(json)?)
        .with_particles(parse_particles(json)?);
    settings.validate()?;
    Ok(settings)
}

fn parse_physics(json: &JsonValue) -> Result<Physics, Error> {
    let mut physics = Physics::default();
    if let Some(gravity) = optional_json!(json["Physics", "Gravity"], as_f64) {
        physics = physics.with_gravity(gravity);
    }
    if let Some(acceleration) = optional_json!(json["Physics", "AccelerationPerSecond"], as_f64) {
        physics = physics.with_acceleration_per_second(acceleration);
    }
    if let Some(turn_step) = optional_json!(json["Physics", "TurnStep"], as_f64) {
        physics = physics.with_turn_step(turn_step);
    }
    if let Some(speed) = optional_json!(json["Physics", "MaxLandingSpeed"], as_f64) {
        physics = physics.with_max_landing_speed(speed);
    }
    if let Some(tolerance) = optional_json!(json["Physics", "PadTolerance"], as_f64) {
        physics = physics
            .with_collision_checker(CollisionChecker::default().with_pad_tolerance(tolerance));
    }
    Ok(physics)
}

fn parse_terrain(json: &JsonValue) -> Result<TerrainGenerator, Error> {
    let mut terrain = TerrainGenerator::default();
    if let Some(width) = optional_json!(json["Terrain", "SegmentWidth"], as_f64) {
        terrain = terrain.with_segment_width(width);
    }
    if let Some(height) = optional_json!(json["Terrain", "SlopeHeight"], as_f64) {
        terrain = terrain.with_slope_height(height);
    }
    if let Some(count) = optional_json!(json["Terrain", "StarCount"], as_usize) {
        terrain = terrain.with_star_count(count);
    }
    if let Some(resamples) = optional_json!(json["Terrain", "MaxResamples"], as_usize) {
        terrain = terrain.with_max_resamples(resamples);
    }
    Ok(terrain)
}

fn parse_particles(json: &JsonValue) -> Result<ParticleSystem, Error> {
    let mut particles = ParticleSystem::default();
    if let Some(max) = optional_json!(json["Particles", "MaxParticles"], as_usize) {
        particles = particles.with_max_particles(max);
    }
    if let Some(limit) = optional_json!(json["Particles", "ThrustLimit"], as_usize) {
        particles = particles.with_thrust_limit(limit);
    }
    if let Some(seconds) = optional_json!(json["Particles", "SecondsToLive"], as_f64) {
        particles = particles.with_seconds_to_live(seconds);
    }
    Ok(particles)
}

#[cfg(test)]
mod json_tests {
    use super::*;

    const FULL: &str = r#"{
        "World": { "Width": 800, "Height": 600 },
        "Craft": { "Width": 20, "Height": 24 },
        "FrameDt": 0.02,
        "Seed": 17,
        "Physics": { "Gravity": -1.62, "AccelerationPerSecond": 10 }
    }"#;

    #[test]
    fn parses_full_document() {
        let settings = parse_settings_from_string(FULL).unwrap();
        assert_eq!(settings.world_width, 800.);
        assert_eq!(settings.world_height, 600.);
        assert_eq!(settings.craft_width, 20.);
        assert_eq!(settings.craft_height, 24.);
        assert_eq!(settings.frame_dt, 0.02);
        assert_eq!(settings.seed, Some(17));
        assert_eq!(settings.physics.gravity(), -1.62);
    }

    #[test]
    fn optional_keys_fall_back_to_defaults() {
        let settings = parse_settings_from_string(
            r#"{"World": {"Width": 640, "Height": 480}, "Craft": {"Width": 16, "Height": 16}}"#,
        )
        .unwrap();
        assert_eq!(settings.seed, None);
        assert_eq!(settings.physics.gravity(), -4.);
    }

    #[test]
    fn missing_key_is_named() {
        let err = parse_settings_from_string(r#"{"World": {"Width": 640}}"#).unwrap_err();
        assert!(matches!(err, Error::MissingKey("World/Height")));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            parse_settings_from_string("{ World"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            parse_settings_from_string(
                r#"{"World": {"Width": 640, "Height": 480}, "Craft": {"Width": 16, "Height": 16}, "Physics": {"MaxLandingSpeed": 0}}"#
            ),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn mistyped_optional_values_are_rejected() {
        let with = |extra: &str| {
            parse_settings_from_string(&format!(
                r#"{{"World": {{"Width": 640, "Height": 480}}, "Craft": {{"Width": 16, "Height": 16}}, {extra}}}"#
            ))
        };
        for extra in [
            r#""Seed": -3"#,
            r#""FrameDt": "x""#,
            r#""Physics": {"Gravity": true}"#,
            r#""Terrain": {"StarCount": 2.5}"#,
        ] {
            assert!(
                matches!(with(extra), Err(Error::InvalidSettings(_))),
                "accepted {extra}"
            );
        }
        let err = with(r#""Seed": -3"#).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(reason) if reason.contains("Seed")));
    }

    #[test]
    fn component_sections_are_applied() {
        let settings = parse_settings_from_string(
            r#"{
                "World": {"Width": 640, "Height": 480}, "Craft": {"Width": 16, "Height": 16},
                "Physics": {"PadTolerance": 8},
                "Terrain": {"SegmentWidth": 32, "SlopeHeight": 60, "StarCount": 7, "MaxResamples": 50},
                "Particles": {"MaxParticles": 40, "ThrustLimit": 10, "SecondsToLive": 2}
            }"#,
        )
        .unwrap();
        assert_eq!(settings.physics.collision_checker().pad_tolerance(), 8.);
        assert_eq!(settings.terrain.segment_width(), 32.);
        assert_eq!(settings.terrain.slope_height(), 60.);
        assert_eq!(settings.particles.seconds_to_live(), 2.);

        let session = Session::initialize(&settings.with_seed(3));
        assert_eq!(session.stars().len(), 7);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            parse_settings("does/not/exist.json"),
            Err(Error::Io { .. })
        ));
    }
}
