use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use flapsim::{
    engine::{Engine, EngineSettings},
    policy::FixedPolicyTrainer,
    ScenarioLoader, TerminationReason,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Flappy simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/classic.yaml")]
    scenario: PathBuf,

    /// Override generation count (uses scenario default when omitted)
    #[arg(long)]
    generations: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for frame snapshots
    #[arg(long, default_value = "snapshots")]
    snapshot_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    let generations = scenario.generations(cli.generations);
    let settings = EngineSettings {
        snapshot_interval_ticks: cli
            .snapshot_interval
            .unwrap_or(scenario.snapshot_interval_ticks),
        snapshot_dir: cli.snapshot_dir,
    };

    let mut trainer = FixedPolicyTrainer::new(scenario.population, scenario.pipe.gap / 2.0);
    let mut engine = Engine::new(scenario, settings);
    let summaries = engine.run(&mut trainer, generations)?;

    for summary in &summaries {
        println!(
            "generation {:>3}: {:>6} ticks, score {:>3}, {} survivors of {}, best fitness {:.1} ({:?})",
            summary.generation,
            summary.ticks,
            summary.score,
            summary.survivors,
            summary.fitness.len(),
            summary.best_fitness(),
            summary.reason,
        );
    }
    if summaries
        .last()
        .is_some_and(|s| s.reason == TerminationReason::Quit)
    {
        println!("quit requested; stopping early");
    }
    Ok(())
}
