use thiserror::Error;

pub const SENSOR_COUNT: usize = 3;

/// Per-tick sensor vector handed to a policy:
/// `[ground_y - y, y - gap_top, y - gap_bottom]`, all signed.
pub type Sensors = [f64; SENSOR_COUNT];

/// A decision function owned by the external trainer. Must be a pure
/// function of the sensor vector; the simulation jumps when the activation
/// reaches the configured threshold.
pub trait Policy {
    fn activate(&self, sensors: &Sensors) -> f64;
}

/// Adapter turning any closure over the sensor vector into a `Policy`.
pub struct PolicyFn<F>(pub F);

impl<F> Policy for PolicyFn<F>
where
    F: Fn(&Sensors) -> f64,
{
    fn activate(&self, sensors: &Sensors) -> f64 {
        (self.0)(sensors)
    }
}

/// The external trainer boundary. The core never assumes anything about how
/// policies are produced; it only hands back one fitness value per policy,
/// in supply order.
pub trait Trainer {
    fn next_generation(&mut self) -> Vec<Box<dyn Policy>>;
    fn record_fitness(&mut self, fitness: &[f64]);
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("trainer supplied an empty generation")]
    EmptyGeneration,
}

/// Jumps whenever the bird sits below the gap center by more than `margin`.
/// Not a trained policy; it exists so the binary can run headless without an
/// evolutionary trainer attached.
#[derive(Debug, Clone, Copy)]
pub struct GapSeekPolicy {
    pub margin: f64,
}

impl Policy for GapSeekPolicy {
    fn activate(&self, sensors: &Sensors) -> f64 {
        if sensors[1] > self.margin {
            1.0
        } else {
            0.0
        }
    }
}

/// Reference trainer: a fixed population of identical `GapSeekPolicy`
/// instances every generation. Performs no search of any kind.
pub struct FixedPolicyTrainer {
    population: usize,
    margin: f64,
    best_fitness: Option<f64>,
}

impl FixedPolicyTrainer {
    pub fn new(population: usize, half_gap: f64) -> Self {
        Self {
            population,
            margin: half_gap,
            best_fitness: None,
        }
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best_fitness
    }
}

impl Trainer for FixedPolicyTrainer {
    fn next_generation(&mut self) -> Vec<Box<dyn Policy>> {
        (0..self.population)
            .map(|_| Box::new(GapSeekPolicy { margin: self.margin }) as Box<dyn Policy>)
            .collect()
    }

    fn record_fitness(&mut self, fitness: &[f64]) {
        let generation_best = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if generation_best.is_finite() {
            self.best_fitness = Some(match self.best_fitness {
                Some(best) => best.max(generation_best),
                None => generation_best,
            });
        }
    }
}
