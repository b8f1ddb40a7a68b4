use rand::Rng;
use serde::Serialize;

use crate::base::Base;
use crate::bird::Bird;
use crate::config::Scenario;
use crate::pipe::Pipe;
use crate::policy::{Policy, Sensors};
use crate::sprite::SpriteAtlas;

/// One agent: bird, its decision function, and its fitness accumulator kept
/// together in a single record so they can never desynchronize. `slot` is
/// the position in the trainer's supply order, stable across eliminations.
pub struct RosterEntry {
    pub slot: usize,
    pub bird: Bird,
    pub policy: Box<dyn Policy>,
    pub fitness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EliminationCause {
    Collision,
    OutOfBounds,
    InvalidSensorInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminationReason {
    AllDead,
    ScoreCap,
    Quit,
}

/// What happened during one tick, for the engine's bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub tick: u64,
    pub eliminated: Vec<(usize, EliminationCause)>,
    pub pipe_passed: bool,
    pub terminated: Option<TerminationReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BirdFrame {
    pub slot: usize,
    pub x: f64,
    pub y: f64,
    pub tilt: f64,
    pub pose: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipeFrame {
    pub x: f64,
    pub gap_top: f64,
    pub gap_bottom: f64,
    pub passed: bool,
}

/// Read-only per-tick view of the world, enough for any renderer or headless
/// observer to reconstruct the visual state.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub score: u32,
    pub alive: usize,
    pub birds: Vec<BirdFrame>,
    pub pipes: Vec<PipeFrame>,
    pub base_x: [f64; 2],
}

pub struct GameWorld {
    rules: Scenario,
    roster: Vec<RosterEntry>,
    /// Final fitness per slot, filled in as agents die and at generation end.
    results: Vec<f64>,
    pipes: Vec<Pipe>,
    base: Base,
    score: u32,
    tick: u64,
}

impl GameWorld {
    pub fn new(rules: &Scenario, policies: Vec<Box<dyn Policy>>, rng: &mut impl Rng) -> Self {
        let roster: Vec<RosterEntry> = policies
            .into_iter()
            .enumerate()
            .map(|(slot, policy)| RosterEntry {
                slot,
                bird: Bird::spawn(&rules.bird),
                policy,
                fitness: 0.0,
            })
            .collect();
        let results = vec![0.0; roster.len()];
        let pipes = vec![Pipe::spawn(&rules.pipe, rng)];
        Self {
            base: Base::new(&rules.base),
            rules: rules.clone(),
            roster,
            results,
            pipes,
            score: 0,
            tick: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn alive(&self) -> usize {
        self.roster.len()
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// Fitness per trainer slot. Valid once the generation has terminated;
    /// mid-generation it mixes final (dead) and running (live) values.
    pub fn fitness_by_slot(&self) -> Vec<f64> {
        let mut results = self.results.clone();
        for entry in &self.roster {
            results[entry.slot] = entry.fitness;
        }
        results
    }

    /// Index of the pipe used for sensing: the nearest pipe still ahead of
    /// the lead bird's sprite.
    fn reference_pipe(&self) -> usize {
        if self.pipes.len() > 1 {
            if let Some(lead) = self.roster.first() {
                if lead.bird.x > self.pipes[0].right_edge(&self.rules.pipe) {
                    return 1;
                }
            }
        }
        0
    }

    fn sensors(&self, bird: &Bird, pipe: &Pipe) -> Sensors {
        [
            self.rules.window.ground_y - bird.y,
            bird.y - pipe.gap_top(),
            bird.y - pipe.gap_bottom(&self.rules.pipe),
        ]
    }

    /// Advance the world by one tick. Eliminations are marked during the
    /// phase traversals and compacted once at the end, so every live agent
    /// is evaluated exactly once per tick regardless of same-tick deaths.
    pub fn step(&mut self, rng: &mut impl Rng, atlas: &SpriteAtlas) -> StepReport {
        self.tick += 1;
        let mut report = StepReport {
            tick: self.tick,
            ..StepReport::default()
        };

        if self.pipes.is_empty() {
            self.pipes.push(Pipe::spawn(&self.rules.pipe, rng));
        }
        let reference = self.reference_pipe();

        // Physics, sensing, control.
        let mut marked: Vec<Option<EliminationCause>> = vec![None; self.roster.len()];
        for index in 0..self.roster.len() {
            self.roster[index].bird.advance(&self.rules.bird);
            let sensors = self.sensors(&self.roster[index].bird, &self.pipes[reference]);
            if !sensors.iter().all(|v| v.is_finite()) {
                // Fitness stays exactly as it was: no reward, no penalty.
                marked[index] = Some(EliminationCause::InvalidSensorInput);
                continue;
            }
            let entry = &mut self.roster[index];
            entry.fitness += self.rules.rewards.tick_reward;
            if entry.policy.activate(&sensors) >= self.rules.rewards.jump_threshold {
                entry.bird.jump(&self.rules.bird);
            }
        }

        // Collisions and pass-throughs, then pipe motion.
        let mut spawn_pipe = false;
        let mut remove_pipe = vec![false; self.pipes.len()];
        for (pipe_index, pipe) in self.pipes.iter_mut().enumerate() {
            for (index, entry) in self.roster.iter_mut().enumerate() {
                if marked[index].is_some() {
                    continue;
                }
                if pipe.collides(&entry.bird, &self.rules.pipe, atlas) {
                    entry.fitness -= self.rules.rewards.death_penalty;
                    marked[index] = Some(EliminationCause::Collision);
                }
            }
            // Passage is pipe-relative: one score increment no matter how
            // many birds cross it.
            if !pipe.passed() {
                let lead_x = self
                    .roster
                    .iter()
                    .zip(&marked)
                    .find(|(_, cause)| cause.is_none())
                    .map(|(entry, _)| entry.bird.x);
                if let Some(lead_x) = lead_x {
                    if pipe.x < lead_x {
                        pipe.mark_passed();
                        spawn_pipe = true;
                        self.score += 1;
                        report.pipe_passed = true;
                    }
                }
            }
            if pipe.off_screen(&self.rules.pipe) {
                remove_pipe[pipe_index] = true;
            }
            pipe.advance(&self.rules.pipe);
        }

        // Pass bonus goes to birds still standing this tick; the new pipe
        // first moves next tick.
        if spawn_pipe {
            for (index, entry) in self.roster.iter_mut().enumerate() {
                if marked[index].is_none() {
                    entry.fitness += self.rules.rewards.pass_bonus;
                }
            }
            self.pipes.push(Pipe::spawn(&self.rules.pipe, rng));
            remove_pipe.push(false);
        }

        let mut keep = remove_pipe.iter();
        self.pipes.retain(|_| !keep.next().copied().unwrap_or(false));

        // Vertical bounds.
        let bird_height = atlas.bird_height() as f64;
        for (index, entry) in self.roster.iter_mut().enumerate() {
            if marked[index].is_some() {
                continue;
            }
            if entry.bird.y + bird_height > self.rules.window.ground_y || entry.bird.y < 0.0 {
                entry.fitness -= self.rules.rewards.death_penalty;
                marked[index] = Some(EliminationCause::OutOfBounds);
            }
        }

        // Compact the roster in one pass, preserving order.
        if marked.iter().any(Option::is_some) {
            let mut marks = marked.into_iter();
            let results = &mut self.results;
            let eliminated = &mut report.eliminated;
            self.roster.retain(|entry| {
                match marks.next().flatten() {
                    Some(cause) => {
                        results[entry.slot] = entry.fitness;
                        eliminated.push((entry.slot, cause));
                        false
                    }
                    None => true,
                }
            });
        }

        if self.roster.is_empty() {
            report.terminated = Some(TerminationReason::AllDead);
        } else if self.score > self.rules.rewards.score_cap {
            report.terminated = Some(TerminationReason::ScoreCap);
        }

        self.base
            .advance(&self.rules.base, self.rules.pipe.velocity);
        for entry in &mut self.roster {
            entry.bird.advance_animation(&self.rules.bird);
        }

        if report.terminated.is_some() {
            for entry in &self.roster {
                self.results[entry.slot] = entry.fitness;
            }
        }
        report
    }

    pub fn frame_snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            score: self.score,
            alive: self.roster.len(),
            birds: self
                .roster
                .iter()
                .map(|entry| BirdFrame {
                    slot: entry.slot,
                    x: entry.bird.x,
                    y: entry.bird.y,
                    tilt: entry.bird.tilt(),
                    pose: entry.bird.pose(),
                })
                .collect(),
            pipes: self
                .pipes
                .iter()
                .map(|pipe| PipeFrame {
                    x: pipe.x,
                    gap_top: pipe.gap_top(),
                    gap_bottom: pipe.gap_bottom(&self.rules.pipe),
                    passed: pipe.passed(),
                })
                .collect(),
            base_x: [self.base.x1, self.base.x2],
        }
    }
}
