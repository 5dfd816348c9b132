use std::error::Error;
use std::fs::File;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use serde_derive::*;

use field::{
    InteractionMap, ParticleField, SceneTheme, ShapeKind, ShapeTemplate, PARTICLE_COUNT,
};

fn default_shape() -> ShapeKind {
    ShapeKind::Heart
}

fn default_count() -> usize {
    PARTICLE_COUNT
}

fn default_fps() -> f32 {
    60.0
}

fn default_max_time() -> f32 {
    10.0
}

/// One scheduled shape switch, in simulated seconds. The headless stand-in
/// for a user clicking through shapes in a UI.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ShapeEvent {
    pub at: f32,
    pub shape: ShapeKind,
}

#[derive(Debug, Deserialize)]
pub struct Configuration {
    #[serde(default = "default_shape")]
    pub shape: ShapeKind,

    #[serde(default = "default_count")]
    pub particle_count: usize,

    #[serde(default)]
    pub theme: SceneTheme,

    #[serde(default)]
    pub interaction: InteractionMap,

    #[serde(default = "default_fps")]
    pub fps: f32,

    #[serde(default = "default_max_time")]
    pub max_time: f32,

    /// Fixed seed for reproducible runs; fresh entropy otherwise.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Recorded detector frames driving the classifier in place of a camera.
    #[serde(default)]
    pub replay: Option<String>,

    #[serde(default)]
    pub shape_schedule: Vec<ShapeEvent>,
}

impl Default for Configuration {
    fn default() -> Configuration {
        Configuration {
            shape: default_shape(),
            particle_count: default_count(),
            theme: SceneTheme::default(),
            interaction: InteractionMap::default(),
            fps: default_fps(),
            max_time: default_max_time(),
            seed: None,
            replay: None,
            shape_schedule: Vec::new(),
        }
    }
}

impl Configuration {
    pub fn rng(&self) -> Pcg32 {
        match self.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_entropy(),
        }
    }

    /// Active shape at a point in simulated time: the latest scheduled
    /// switch not after `time`, or the base shape before any fired.
    pub fn shape_at(&self, time: f32) -> ShapeKind {
        self.shape_schedule
            .iter()
            .filter(|event| event.at <= time)
            .max_by(|a, b| a.at.partial_cmp(&b.at).unwrap())
            .map(|event| event.shape)
            .unwrap_or(self.shape)
    }

    pub fn build(&self, rng: &mut Pcg32) -> (ParticleField, ShapeTemplate) {
        let field = ParticleField::new(self.particle_count, &self.theme, rng);
        let template = ShapeTemplate::new(self.shape, self.particle_count, rng);

        (field, template)
    }
}

pub fn load_scene(path: &str) -> Result<Configuration, Box<dyn Error>> {
    let file = File::open(path)?;
    let config = serde_yaml::from_reader(file)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_scene_uses_defaults() {
        let config: Configuration = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config.shape, ShapeKind::Heart);
        assert_eq!(config.particle_count, PARTICLE_COUNT);
        assert!((config.fps - 60.0).abs() < 1e-6);
        assert!(config.replay.is_none());
        assert!(config.shape_schedule.is_empty());
    }

    #[test]
    fn full_scene_parses() {
        let yaml = r##"
shape: saturn
particle_count: 500
seed: 7
theme:
    primary_color: "#112233"
    speed: 2.0
interaction:
    width: 12.0
shape_schedule:
    - at: 1.0
      shape: spiral
    - at: 3.0
      shape: fireworks
"##;
        let config: Configuration = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.shape, ShapeKind::Saturn);
        assert_eq!(config.particle_count, 500);
        assert_eq!(config.seed, Some(7));
        assert!((config.theme.speed - 2.0).abs() < 1e-6);
        assert!((config.interaction.width - 12.0).abs() < 1e-6);
        // unspecified interaction fields keep their defaults
        assert!((config.interaction.depth_scale + 2.0).abs() < 1e-6);
        assert_eq!(config.shape_schedule.len(), 2);
    }

    #[test]
    fn unknown_shape_is_a_config_error() {
        let result: Result<Configuration, _> = serde_yaml::from_str("shape: cube");
        assert!(result.is_err());
    }

    #[test]
    fn schedule_resolves_latest_event() {
        let yaml = r#"
shape: heart
shape_schedule:
    - at: 2.0
      shape: sphere
    - at: 5.0
      shape: spiral
"#;
        let config: Configuration = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.shape_at(0.0), ShapeKind::Heart);
        assert_eq!(config.shape_at(2.0), ShapeKind::Sphere);
        assert_eq!(config.shape_at(4.9), ShapeKind::Sphere);
        assert_eq!(config.shape_at(60.0), ShapeKind::Spiral);
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let config = Configuration {
            particle_count: 32,
            seed: Some(99),
            ..Configuration::default()
        };

        let (field_a, template_a) = config.build(&mut config.rng());
        let (field_b, template_b) = config.build(&mut config.rng());

        assert_eq!(field_a.positions(), field_b.positions());
        assert_eq!(template_a.targets(), template_b.targets());
    }
}
