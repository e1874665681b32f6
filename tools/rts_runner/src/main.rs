//! Headless match/tournament runner (§6, §14). Ground: the teacher's headless
//! runner `run_fast`/`run_realtime` split and summary printing, adapted to
//! rounds instead of raw ticks since the controller here drives whole rounds
//! rather than handing back control every tick.

use std::path::PathBuf;

use clap::Parser;
use rts_agent_sdk::RoundCsvSink;
use rts_reference_agent::PlannerAgent;
use rts_sim::{Agent, Controller, MatchConfig};

#[derive(Parser, Debug)]
#[command(name = "rts-runner", about = "Headless RTS match runner")]
struct Cli {
    /// Simulation speed multiplier, 0-30 (0 pauses all timers).
    #[arg(long, default_value_t = 1)]
    game_speed: u32,

    /// Rounds per match.
    #[arg(long, default_value_t = 3)]
    rounds: u8,

    /// Seconds of simulated game-time before a round times out.
    #[arg(long, default_value_t = 300)]
    max_seconds: u32,

    /// JSON file with a `MatchConfig` to load instead of defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base path for the per-agent CSV log sink (§6). Each agent's rows go
    /// to a `_agent{N}` sibling of this path.
    #[arg(long)]
    log_csv: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path).expect("failed to read --config file");
            serde_json::from_str(&contents).expect("failed to parse --config as MatchConfig")
        }
        None => MatchConfig::default(),
    };
    config.game_speed = cli.game_speed;
    config.rounds_per_match = cli.rounds;
    config.max_seconds_per_round = cli.max_seconds;
    config.clamp_game_speed();

    let rounds_per_match = config.rounds_per_match;
    let agents: Vec<Box<dyn Agent>> = vec![Box::new(PlannerAgent::new()), Box::new(PlannerAgent::new())];
    let mut controller = Controller::new(config, agents);

    let mut round_wins = [0u32; 2];
    for round in 0..rounds_per_match {
        let result = controller.play_round();
        print_round_summary(round, &result.outcome);

        if let Some(agent) = result.outcome.winner {
            round_wins[agent as usize] += 1;
        }
        if let Some(base) = &cli.log_csv {
            flush_round_logs(base, &result.logs);
        }
        if let Some(fatal) = &result.fatal {
            eprintln!("fatal: {fatal}, aborting match early");
            break;
        }
    }

    let winner = if round_wins[0] >= round_wins[1] { 0 } else { 1 };
    println!("=== Match Complete ===");
    println!("Round wins: agent 0 = {}, agent 1 = {}", round_wins[0], round_wins[1]);
    println!("Winner: agent {winner}");
}

fn print_round_summary(round: u8, outcome: &rts_sim::RoundOutcome) {
    println!(
        "[round {round}] winner={:?} scores={:?}",
        outcome.winner, outcome.scores
    );
}

fn flush_round_logs(base: &PathBuf, logs: &[Vec<Vec<(String, String)>>; 2]) {
    for (agent, rows) in logs.iter().enumerate() {
        let path = agent_log_path(base, agent);
        match RoundCsvSink::open(&path) {
            Ok(sink) => {
                if let Err(err) = sink.write_round(rows) {
                    eprintln!("failed to write log for agent {agent}: {err}");
                }
            }
            Err(err) => eprintln!("failed to open log for agent {agent}: {err}"),
        }
    }
}

fn agent_log_path(base: &PathBuf, agent: usize) -> PathBuf {
    let stem = base.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let ext = base.extension().map(|e| e.to_string_lossy().into_owned()).unwrap_or_else(|| "csv".to_string());
    let parent = base.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
    parent.join(format!("{stem}_agent{agent}.{ext}"))
}
