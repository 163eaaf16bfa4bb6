mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use route_diff::CompareError;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "route-diff")]
#[command(about = "Reconcile manufacturing route reports and show differences")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compare a submitted (RTE) route against a staged (SM) route")]
    Compare {
        #[arg(help = "Path to the submitted route file (JSON)")]
        rte: String,
        #[arg(help = "Path to the staged route file (JSON)")]
        sm: String,
        #[arg(long, value_name = "PATH", help = "Production baseline route file (JSON)")]
        baseline: Option<String>,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long, short, help = "Quiet mode: only show summary")]
        quiet: bool,
        #[arg(long, short, help = "Verbose mode: show equal operations too")]
        verbose: bool,
        #[arg(long, help = "Accept routes whose keys are not in ascending order")]
        allow_unordered: bool,
        #[arg(long, help = "Skip the baseline neutralization rule")]
        no_neutralize: bool,
        #[arg(long, help = "Omit content signatures from one-sided entries")]
        no_signatures: bool,
        #[arg(long, value_name = "N", help = "Abort when a route exceeds this many operations")]
        max_operations: Option<u32>,
    },
    #[command(about = "Show information about a route file")]
    Info {
        #[arg(help = "Path to the route file (JSON)")]
        path: String,
        #[arg(long, value_enum, default_value = "rte", help = "Which report the file came from")]
        kind: KindArg,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Jsonl,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum KindArg {
    Rte,
    Sm,
    Mm,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare {
            rte,
            sm,
            baseline,
            format,
            quiet,
            verbose,
            allow_unordered,
            no_neutralize,
            no_signatures,
            max_operations,
        } => commands::compare::run(
            &rte,
            &sm,
            baseline.as_deref(),
            format,
            quiet,
            verbose,
            allow_unordered,
            no_neutralize,
            no_signatures,
            max_operations,
        ),
        Commands::Info { path, kind } => commands::info::run(&path, kind),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for_error(&e)
        }
    }
}

fn exit_code_for_error(err: &anyhow::Error) -> ExitCode {
    if is_internal_error(err) {
        ExitCode::from(3)
    } else {
        ExitCode::from(2)
    }
}

/// Build failures and unreadable files are input problems (exit 2); an
/// engine abort mid-run points at corrupt state or a bug (exit 3).
fn is_internal_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<CompareError>(),
            Some(CompareError::InternalError { .. })
                | Some(CompareError::AlignmentUnderflow { .. })
        )
    })
}
