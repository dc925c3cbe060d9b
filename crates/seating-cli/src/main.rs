mod error;
mod settings;

use clap::{Parser, Subcommand};
use error::CliError;
use seating_core::{detect_conflicts, summarize, ConstraintConflict, GenerateOutcome, Planner, SeatingRequest};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "seating", version)]
#[command(about = "Generate ranked seating plans from a JSON guest list", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate ranked seating plans
    Generate {
        /// Request file (guests, tables, constraints, adjacency, options)
        #[arg(short, long)]
        input: PathBuf,

        /// Seed for a reproducible run; random when omitted
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of plans to return, overriding the request
        #[arg(short = 'n', long)]
        plans: Option<usize>,

        /// Allow relaxed and partial plans
        #[arg(long)]
        allow_partial: bool,

        /// Engine config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check constraints for conflicts without generating plans
    Conflicts {
        #[arg(short, long)]
        input: PathBuf,

        /// Include adjacency checks
        #[arg(long)]
        adjacency: bool,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct ConflictReport<'a> {
    blocking: bool,
    conflicts: &'a [ConstraintConflict],
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "seating=debug,seating_core=debug"
    } else {
        "seating=info,seating_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<ExitCode, CliError> {
    match command {
        Command::Generate {
            input,
            seed,
            plans,
            allow_partial,
            config,
            json,
        } => {
            let mut request = settings::read_request(&input)?;
            if let Some(plans) = plans {
                request.options.max_plans = plans;
            }
            request.options.allow_partial |= allow_partial;
            let config = settings::load_config(config.as_deref())?;

            let seed = seed.unwrap_or_else(rand::random);
            tracing::info!(
                seed,
                guests = request.guests.len(),
                tables = request.tables.len(),
                "generating seating plans"
            );
            let outcome = Planner::with_config_and_seed(config, seed).generate_request(&request);

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome, &request);
            }
            Ok(if outcome.plans.is_empty() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            })
        }

        Command::Conflicts { input, adjacency, json } => {
            let request = settings::read_request(&input)?;
            let conflicts = detect_conflicts(
                &request.guests,
                &request.tables,
                &request.constraints,
                adjacency,
                &request.adjacency,
            );
            let blocking = conflicts.iter().any(ConstraintConflict::is_critical);

            if json {
                let report = ConflictReport {
                    blocking,
                    conflicts: &conflicts,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if conflicts.is_empty() {
                println!("No conflicts found");
            } else {
                for conflict in &conflicts {
                    println!("[{}] {}", conflict.severity, conflict.description);
                }
            }
            Ok(if blocking { ExitCode::from(2) } else { ExitCode::SUCCESS })
        }
    }
}

fn print_outcome(outcome: &GenerateOutcome, request: &SeatingRequest) {
    for diagnostic in &outcome.errors {
        eprintln!("{}", diagnostic);
    }
    for (i, plan) in outcome.plans.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", summarize(plan, &request.guests, &request.tables));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "seating", "generate", "--input", "party.json", "--seed", "42", "-n", "3", "--allow-partial", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Generate {
                input,
                seed,
                plans,
                allow_partial,
                config,
                json,
            } => {
                assert_eq!(input, PathBuf::from("party.json"));
                assert_eq!(seed, Some(42));
                assert_eq!(plans, Some(3));
                assert!(allow_partial);
                assert!(config.is_none());
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_conflicts_with_verbose() {
        let cli = Cli::try_parse_from(["seating", "conflicts", "-i", "party.json", "--adjacency", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Conflicts { adjacency: true, json: false, .. }));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["seating", "generate"]).is_err());
    }
}
