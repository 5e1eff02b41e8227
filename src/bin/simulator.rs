//! Natya Headless Detection Simulator
//!
//! Plays practice attempt chains against the real detection engine in
//! virtual time and reports how the tiers behave: pass rate, time to pass,
//! how often the Advanced near miss fires and how often a run jumps clean
//! over the checkpoint window.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --chains N      Attempt chains to play (default: 1000)
//!   --seed N        RNG seed (default: 42)
//!   --attempts N    Max attempts per chain (default: 10)
//!   --verbose       Print every attempt
//!   --json          Print the summary as JSON

use natya::detection::{Clock, DetectionEngine, ManualClock, Phase, RngRandom, Tier};
use natya::practice::{PracticeOutcome, PracticeSession};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

// ── CLI Configuration ────────────────────────────────────────────────

struct SimConfig {
    chains: u32,
    seed: u64,
    attempts: u32,
    verbose: bool,
    json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            chains: 1_000,
            seed: 42,
            attempts: 10,
            verbose: false,
            json: false,
        }
    }
}

fn take_number(args: &[String], i: &mut usize, name: &str) -> Result<u64, String> {
    *i += 1;
    args.get(*i)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| format!("{} requires a number", name))
}

fn parse_args() -> Result<SimConfig, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--chains" => config.chains = take_number(&args, &mut i, "--chains")? as u32,
            "--seed" => config.seed = take_number(&args, &mut i, "--seed")?,
            "--attempts" => {
                config.attempts = take_number(&args, &mut i, "--attempts")?.max(1) as u32
            }
            "--verbose" => config.verbose = true,
            "--json" => config.json = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(config)
}

fn print_usage() {
    eprintln!(
        "Natya Headless Detection Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --chains N      Attempt chains to play (default: 1000)\n\
         \x20 --seed N        RNG seed (default: 42)\n\
         \x20 --attempts N    Max attempts per chain (default: 10)\n\
         \x20 --verbose       Print every attempt\n\
         \x20 --json          Print the summary as JSON\n\
         \x20 --help, -h      Show this help"
    );
}

// ── Statistics ───────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Serialize)]
struct TierStats {
    attempts: u64,
    passes: u64,
    checkpoint_failures: u64,
    /// Passed Advanced runs that never landed in the checkpoint window.
    checkpoint_skips: u64,
    total_pass_ms: u64,
}

impl TierStats {
    fn pass_rate(&self) -> f64 {
        self.passes as f64 / self.attempts.max(1) as f64
    }

    fn avg_pass_secs(&self) -> f64 {
        self.total_pass_ms as f64 / self.passes.max(1) as f64 / 1000.0
    }
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    chains: u32,
    seed: u64,
    basic: TierStats,
    advanced: TierStats,
    chains_reaching_advanced_pass: u32,
    avg_attempts_to_advanced_pass: f64,
}

/// Longest an attempt may take in virtual time before it is written off.
const ATTEMPT_LIMIT_MS: u64 = 10 * 60 * 1000;

fn play_chain(
    session: &mut PracticeSession<RngRandom<StdRng>, ManualClock>,
    clock: &ManualClock,
    config: &SimConfig,
    chain: u32,
    summary: &mut Summary,
) {
    for attempt in 1..=config.attempts {
        let tier = session.tier();
        let started = clock.now_ms();
        let id = session.start_attempt();
        let mut outcome = None;

        while outcome.is_none() {
            let Some(due) = session.engine_mut().next_deadline() else {
                break;
            };
            if due.saturating_sub(started) > ATTEMPT_LIMIT_MS {
                session.cancel_attempt();
                break;
            }
            clock.set(due);
            outcome = session.poll();
        }

        let stats = match tier {
            Tier::Basic => &mut summary.basic,
            Tier::Advanced => &mut summary.advanced,
        };
        stats.attempts += 1;
        match outcome {
            Some(PracticeOutcome::Celebrate { .. }) => {
                stats.passes += 1;
                stats.total_pass_ms += clock.now_ms() - started;
                // Passing with the near miss unspent means the ramp jumped the window
                if tier == Tier::Advanced && !session.engine().checkpoint_spent() {
                    stats.checkpoint_skips += 1;
                }
            }
            Some(PracticeOutcome::KeepPracticing { .. }) => stats.checkpoint_failures += 1,
            None => {}
        }

        if config.verbose {
            println!(
                "chain {:>5} attempt {:>2} run {:>6} {:<8} -> {:?} at {}%",
                chain,
                attempt,
                id.0,
                tier.name(),
                session.phase(),
                session.percentage()
            );
        }

        if tier == Tier::Advanced && session.phase() == Phase::Succeeded {
            summary.chains_reaching_advanced_pass += 1;
            summary.avg_attempts_to_advanced_pass += attempt as f64;
            return;
        }
    }
}

fn main() {
    let config = match parse_args() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    let mut summary = Summary {
        chains: config.chains,
        seed: config.seed,
        ..Default::default()
    };

    for chain in 0..config.chains {
        let clock = ManualClock::new();
        let rng = RngRandom(StdRng::seed_from_u64(config.seed.wrapping_add(chain as u64)));
        let mut session = PracticeSession::new(DetectionEngine::new(rng, clock.clone()));
        play_chain(&mut session, &clock, &config, chain, &mut summary);
    }
    if summary.chains_reaching_advanced_pass > 0 {
        summary.avg_attempts_to_advanced_pass /= summary.chains_reaching_advanced_pass as f64;
    }

    if config.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("could not encode summary: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Natya detection simulator: {} chains, seed {}", summary.chains, summary.seed);
    for (name, stats) in [("Basic", &summary.basic), ("Advanced", &summary.advanced)] {
        println!(
            "  {:<8} attempts {:>6}  pass {:>5.1}%  avg pass {:>5.1}s  checkpoint fails {:>5}  skipped windows {:>5}",
            name,
            stats.attempts,
            stats.pass_rate() * 100.0,
            stats.avg_pass_secs(),
            stats.checkpoint_failures,
            stats.checkpoint_skips
        );
    }
    println!(
        "  Chains passing Advanced: {} (avg {:.2} attempts)",
        summary.chains_reaching_advanced_pass, summary.avg_attempts_to_advanced_pass
    );
}
