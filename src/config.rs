use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

fn default_population() -> usize {
    50
}

fn default_snapshot_interval_ticks() -> u64 {
    0
}

fn default_tick_hz() -> u32 {
    30
}

fn default_window() -> WindowRules {
    WindowRules::default()
}

fn default_bird() -> BirdRules {
    BirdRules::default()
}

fn default_pipe() -> PipeRules {
    PipeRules::default()
}

fn default_base() -> BaseRules {
    BaseRules::default()
}

fn default_rewards() -> RewardRules {
    RewardRules::default()
}

/// A complete simulation scenario. Every tunable named in the rule structs
/// defaults to the classic constants, so a minimal YAML file only needs a
/// name and a seed.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub generations: Option<u64>,
    #[serde(default = "default_population")]
    pub population: usize,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    /// Nominal frame rate; headless runs are unthrottled.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    #[serde(default = "default_window")]
    pub window: WindowRules,
    #[serde(default = "default_bird")]
    pub bird: BirdRules,
    #[serde(default = "default_pipe")]
    pub pipe: PipeRules,
    #[serde(default = "default_base")]
    pub base: BaseRules,
    #[serde(default = "default_rewards")]
    pub rewards: RewardRules,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowRules {
    pub width: u32,
    pub height: u32,
    /// y of the ground line; birds die below it, the base scrolls along it.
    pub ground_y: f64,
}

impl Default for WindowRules {
    fn default() -> Self {
        Self {
            width: 550,
            height: 800,
            ground_y: 730.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BirdRules {
    pub spawn_x: f64,
    pub spawn_y: f64,
    pub sprite_width: usize,
    pub sprite_height: usize,
    pub jump_impulse: f64,
    /// Displacement clamp for a single tick of falling.
    pub max_drop_per_tick: f64,
    /// Extra displacement applied while moving upward.
    pub climb_boost: f64,
    pub max_tilt_up: f64,
    pub max_tilt_down: f64,
    pub tilt_rate: f64,
    /// Height band above the jump reference within which the bird keeps
    /// pitching up.
    pub climb_grace: f64,
    /// Ticks per animation pose.
    pub animation_period: u32,
    /// Tilt at or below which the dive pose overrides the cycle.
    pub dive_pose_tilt: f64,
}

impl Default for BirdRules {
    fn default() -> Self {
        Self {
            spawn_x: 230.0,
            spawn_y: 350.0,
            sprite_width: 68,
            sprite_height: 48,
            jump_impulse: -10.5,
            max_drop_per_tick: 16.0,
            climb_boost: -2.0,
            max_tilt_up: 25.0,
            max_tilt_down: -90.0,
            tilt_rate: 20.0,
            climb_grace: 50.0,
            animation_period: 5,
            dive_pose_tilt: -80.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipeRules {
    pub sprite_width: usize,
    pub sprite_height: usize,
    /// Vertical gap between the two halves, identical for every pipe.
    pub gap: f64,
    /// Leftward scroll per tick, shared with the base.
    pub velocity: f64,
    pub spawn_x: f64,
    pub gap_top_min: f64,
    pub gap_top_max: f64,
}

impl Default for PipeRules {
    fn default() -> Self {
        Self {
            sprite_width: 104,
            sprite_height: 640,
            gap: 200.0,
            velocity: 5.0,
            spawn_x: 600.0,
            gap_top_min: 50.0,
            gap_top_max: 450.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BaseRules {
    pub segment_width: f64,
}

impl Default for BaseRules {
    fn default() -> Self {
        Self {
            segment_width: 672.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewardRules {
    /// Fitness accrued by each live bird every tick.
    pub tick_reward: f64,
    /// Fitness granted to every surviving bird when any pipe is passed.
    pub pass_bonus: f64,
    /// Fitness removed on collision or bounds exit.
    pub death_penalty: f64,
    /// Policy activation at or above which the bird jumps.
    pub jump_threshold: f64,
    /// Generation ends once the shared score exceeds this.
    pub score_cap: u32,
}

impl Default for RewardRules {
    fn default() -> Self {
        Self {
            tick_reward: 0.1,
            pass_bonus: 5.0,
            death_penalty: 1.0,
            jump_threshold: 0.5,
            score_cap: 80,
        }
    }
}

impl Scenario {
    /// The classic rule set with a fixed seed, used by tests and as the
    /// reference for `scenarios/classic.yaml`.
    pub fn classic(seed: u64) -> Self {
        Self {
            name: "classic".to_string(),
            description: None,
            seed,
            generations: None,
            population: default_population(),
            snapshot_interval_ticks: 0,
            tick_hz: default_tick_hz(),
            window: WindowRules::default(),
            bird: BirdRules::default(),
            pipe: PipeRules::default(),
            base: BaseRules::default(),
            rewards: RewardRules::default(),
        }
    }

    pub fn generations(&self, override_generations: Option<u64>) -> u64 {
        override_generations.or(self.generations).unwrap_or(50)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            bail!("scenario must have a name");
        }
        if self.population == 0 {
            bail!("population must be greater than zero");
        }
        if self.pipe.gap_top_min >= self.pipe.gap_top_max {
            bail!(
                "pipe gap_top range is empty ({}..{})",
                self.pipe.gap_top_min,
                self.pipe.gap_top_max
            );
        }
        if self.pipe.velocity <= 0.0 {
            bail!("pipe velocity must be positive");
        }
        if self.bird.sprite_width == 0 || self.bird.sprite_height == 0 {
            bail!("bird sprite dimensions must be non-zero");
        }
        if self.pipe.sprite_width == 0 || self.pipe.sprite_height == 0 {
            bail!("pipe sprite dimensions must be non-zero");
        }
        if self.window.ground_y <= 0.0 || self.window.ground_y > self.window.height as f64 {
            bail!(
                "ground line {} outside window height {}",
                self.window.ground_y,
                self.window.height
            );
        }
        if self.base.segment_width <= 0.0 {
            bail!("base segment width must be positive");
        }
        Ok(())
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_matches_original_constants() {
        let scenario = Scenario::classic(7);
        assert_eq!(scenario.bird.spawn_x, 230.0);
        assert_eq!(scenario.bird.spawn_y, 350.0);
        assert_eq!(scenario.bird.jump_impulse, -10.5);
        assert_eq!(scenario.pipe.gap, 200.0);
        assert_eq!(scenario.pipe.velocity, 5.0);
        assert_eq!(scenario.pipe.spawn_x, 600.0);
        assert_eq!(scenario.window.ground_y, 730.0);
        assert_eq!(scenario.rewards.score_cap, 80);
        scenario.validate().unwrap();
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let scenario: Scenario = serde_yaml::from_str("name: tiny\nseed: 3\n").unwrap();
        scenario.validate().unwrap();
        assert_eq!(scenario.population, 50);
        assert_eq!(scenario.pipe.gap, 200.0);
        assert_eq!(scenario.tick_hz, 30);
        assert_eq!(scenario.generations(None), 50);
        assert_eq!(scenario.generations(Some(3)), 3);
    }

    #[test]
    fn rejects_empty_gap_range() {
        let mut scenario = Scenario::classic(1);
        scenario.pipe.gap_top_min = 500.0;
        assert!(scenario.validate().is_err());
    }
}
