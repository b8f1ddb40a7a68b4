//! Coarse step-loop timing.
//!
//! Run with: cargo bench

// Criterion would give proper statistics; for now a single wall-clock
// measurement over a full generation is enough to catch regressions in the
// mask-overlap collision path, which dominates the per-tick cost.

#[cfg(test)]
mod benches {
    use std::time::Instant;

    use flapsim::{
        engine::{Engine, EngineSettings},
        policy::{GapSeekPolicy, Policy},
        Scenario,
    };

    #[test]
    fn generation_of_fifty_is_fast() {
        let mut engine = Engine::new(Scenario::classic(7), EngineSettings::default());
        let policies: Vec<Box<dyn Policy>> = (0..50)
            .map(|_| Box::new(GapSeekPolicy { margin: 100.0 }) as Box<dyn Policy>)
            .collect();

        let start = Instant::now();
        let summary = engine.run_generation(policies).unwrap();
        let elapsed = start.elapsed();

        assert!(summary.ticks > 0);
        // Headless throughput should beat the 30 Hz frame budget by orders
        // of magnitude.
        let per_tick = elapsed.as_secs_f64() / summary.ticks as f64;
        assert!(per_tick < 1.0 / 30.0, "step took {per_tick:.6}s");
    }
}
