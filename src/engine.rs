use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::Result;

use crate::{
    config::Scenario,
    policy::{Policy, SimError, Trainer},
    rng::RngManager,
    snapshot::SnapshotWriter,
    sprite::SpriteAtlas,
    world::{EliminationCause, FrameSnapshot, GameWorld, TerminationReason},
};

pub struct EngineSettings {
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            snapshot_interval_ticks: 0,
            snapshot_dir: PathBuf::from("snapshots"),
        }
    }
}

/// Anything that wants the per-tick frame: a renderer, a recorder, a test.
/// The engine works identically with zero observers attached.
pub trait FrameObserver {
    fn frame(&mut self, frame: &FrameSnapshot);
}

#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub generation: u64,
    pub ticks: u64,
    pub score: u32,
    pub reason: TerminationReason,
    /// Birds still alive at termination.
    pub survivors: usize,
    /// Fitness per trainer slot, supply order.
    pub fitness: Vec<f64>,
    pub invalid_sensor_eliminations: usize,
}

impl GenerationSummary {
    pub fn best_fitness(&self) -> f64 {
        self.fitness
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Runs generations of the simulation for an external trainer. Holds the
/// scenario rules, the deterministic RNG, and the sprite atlas; the world is
/// rebuilt fresh for every generation.
pub struct Engine {
    scenario: Scenario,
    rng: RngManager,
    atlas: SpriteAtlas,
    snapshot_writer: SnapshotWriter,
    observers: Vec<Box<dyn FrameObserver>>,
    quit: Arc<AtomicBool>,
    generation: u64,
}

impl Engine {
    pub fn new(scenario: Scenario, settings: EngineSettings) -> Self {
        let atlas = SpriteAtlas::build(
            scenario.bird.sprite_width,
            scenario.bird.sprite_height,
            scenario.pipe.sprite_width,
            scenario.pipe.sprite_height,
        );
        let snapshot_writer = SnapshotWriter::new(
            &settings.snapshot_dir,
            settings.snapshot_interval_ticks,
            scenario.name.clone(),
        );
        Self {
            rng: RngManager::new(scenario.seed),
            atlas,
            snapshot_writer,
            observers: Vec::new(),
            quit: Arc::new(AtomicBool::new(false)),
            generation: 0,
            scenario,
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn add_observer(&mut self, observer: Box<dyn FrameObserver>) {
        self.observers.push(observer);
    }

    /// Cooperative quit flag, checked at the top of every tick. Setting it
    /// ends the current generation with `TerminationReason::Quit`; whether
    /// that is fatal to the process is the caller's decision.
    pub fn quit_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.quit)
    }

    /// Run one generation to termination with the supplied policies.
    pub fn run_generation(&mut self, policies: Vec<Box<dyn Policy>>) -> Result<GenerationSummary> {
        if policies.is_empty() {
            return Err(SimError::EmptyGeneration.into());
        }
        let generation = self.generation;
        let mut world = GameWorld::new(&self.scenario, policies, &mut self.rng.stream("pipes"));
        let mut invalid_sensor_eliminations = 0;

        let reason = loop {
            if self.quit.load(Ordering::Relaxed) {
                break TerminationReason::Quit;
            }
            let report = world.step(&mut self.rng.stream("pipes"), &self.atlas);
            invalid_sensor_eliminations += report
                .eliminated
                .iter()
                .filter(|(_, cause)| *cause == EliminationCause::InvalidSensorInput)
                .count();

            let frame = world.frame_snapshot();
            for observer in &mut self.observers {
                observer.frame(&frame);
            }
            self.snapshot_writer.maybe_write(generation, &frame)?;

            if let Some(reason) = report.terminated {
                break reason;
            }
        };

        self.generation += 1;
        Ok(GenerationSummary {
            generation,
            ticks: world.tick(),
            score: world.score(),
            reason,
            survivors: world.alive(),
            fitness: world.fitness_by_slot(),
            invalid_sensor_eliminations,
        })
    }

    /// Drive a trainer for up to `generations` generations, feeding fitness
    /// back after each one. Stops early when quit is requested.
    pub fn run(
        &mut self,
        trainer: &mut dyn Trainer,
        generations: u64,
    ) -> Result<Vec<GenerationSummary>> {
        let mut summaries = Vec::new();
        for _ in 0..generations {
            let summary = self.run_generation(trainer.next_generation())?;
            trainer.record_fitness(&summary.fitness);
            let quit = summary.reason == TerminationReason::Quit;
            summaries.push(summary);
            if quit {
                break;
            }
        }
        Ok(summaries)
    }
}
