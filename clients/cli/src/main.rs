mod render;

use blackjack::GamePhase;
use blackjack_table::{ConfigError, QueryMsg, Scenario, Speed, Table, TableConfig};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "blackjack-cli", about = "Single-player blackjack table in the terminal")]
struct Cli {
    /// JSON table config; the flags below override it
    #[arg(long, env = "BLACKJACK_CONFIG")]
    config: Option<PathBuf>,

    /// Number of decks in the shoe
    #[arg(long, env = "BLACKJACK_DECKS")]
    decks: Option<u8>,

    /// Pacing preset: slow, medium, fast or instant
    #[arg(long, env = "BLACKJACK_SPEED")]
    speed: Option<Speed>,

    /// Fixed shuffle seed
    #[arg(long, env = "BLACKJACK_SEED")]
    seed: Option<u64>,

    /// Dealer hits soft 17
    #[arg(long, action = clap::ArgAction::Set)]
    dealer_hits_soft_17: Option<bool>,

    /// Start with a scripted scenario
    #[arg(long)]
    scenario: Option<String>,
}

fn load_config(cli: &Cli) -> Result<TableConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => TableConfig::from_file(path)?,
        None => TableConfig::default(),
    };
    if let Some(decks) = cli.decks {
        config.rules.num_decks = decks;
    }
    if let Some(speed) = cli.speed {
        config.speed = speed;
        config.pacing = None;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(hits) = cli.dealer_hits_soft_17 {
        config.rules.dealer_hits_soft_17 = hits;
    }
    config.validate()?;
    Ok(config)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    log::info!(
        "{} deck(s), dealer {} soft 17, {:?} pacing",
        config.rules.num_decks,
        if config.rules.dealer_hits_soft_17 { "hits" } else { "stands on" },
        config.speed
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            log::error!("Failed to start runtime: {e}");
            std::process::exit(1);
        });

    if let Err(e) = rt.block_on(play(config, cli.scenario)) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// Runs the virtual clock against wall time, interleaving scheduled steps
/// with commands read from stdin.
async fn play(config: TableConfig, scenario: Option<String>) -> Result<(), BoxErr> {
    let mut table = Table::new(config)?;
    let mut events = table.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let started = Instant::now();

    print_help();
    if let Some(id) = scenario {
        table.select_scenario(&id)?;
    }

    loop {
        catch_up(&mut table, started);

        let mut printed = false;
        while let Ok(event) = events.try_recv() {
            println!("{}", render::event_line(&event));
            printed = true;
        }
        if printed && table.round().phase == GamePhase::PlayerTurn && table.pending() == 0 {
            println!("{}", render::status(&table.snapshot()));
        }

        let deadline = table.next_deadline().map(|due| started + due);
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                catch_up(&mut table, started);
                if !handle_line(&mut table, line.trim())? {
                    break;
                }
            }
            _ = sleep_until(deadline) => {}
        }
    }
    Ok(())
}

fn catch_up(table: &mut Table, started: Instant) {
    let now = started.elapsed();
    if now > table.clock() {
        let elapsed = now - table.clock();
        table.advance(elapsed);
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Returns false when the player quits.
fn handle_line(table: &mut Table, line: &str) -> Result<bool, BoxErr> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(true);
    };

    let result = match word.to_ascii_lowercase().as_str() {
        "deal" | "d" => table.deal(),
        "hit" | "h" => table.hit(),
        "stand" | "s" => table.stand(),
        "split" | "p" => table.split(),
        "yes" | "y" => table.accept_split_prompt(true),
        "no" | "n" => table.accept_split_prompt(false),
        "scenario" => match words.next() {
            Some(id) => table.select_scenario(id),
            None => table.select(None),
        },
        "scenarios" => {
            for scenario in Scenario::ALL {
                println!("  {:<16} {}", scenario.id(), scenario.label());
            }
            Ok(())
        }
        "state" => {
            println!("{}", table.query(QueryMsg::Snapshot {})?);
            Ok(())
        }
        "help" | "?" => {
            print_help();
            Ok(())
        }
        "quit" | "q" | "exit" => return Ok(false),
        other => {
            println!("Unknown command '{other}', type 'help'");
            Ok(())
        }
    };

    if let Err(e) = result {
        println!("! {e}");
    }
    Ok(true)
}

fn print_help() {
    println!("Commands: deal, hit, stand, split, yes/no (split prompt),");
    println!("          scenario <id>, scenarios, state, help, quit");
}
