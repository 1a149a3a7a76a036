//! # Saorsa Cube CLI
//!
//! Command-line host for the cube model. Every stateful command runs
//! through a [`SessionHandle`], the same single-owner task a GUI host
//! would drive, so the sticker grid and the piece layout are exercised
//! together.
//!
//! ## Usage
//!
//! ```bash
//! cube apply "R U R' U'"
//! cube scramble --length 25 --seed 7
//! cube invert R U2 F\'
//! cube --output json check UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `SimConfig` - Resolved configuration for one invocation
//! - `session` - Owner task holding `CubeState` and `SpatialLayerEngine`
//! - `render` - ASCII net and report types

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod render;
pub mod session;

pub use render::{net, CubeReport, InverseReport};
pub use session::{
    spawn_session, SessionCommand, SessionError, SessionEvent, SessionHandle, SessionResult,
    SessionSnapshot,
};

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use cube_core::notation::{invert_sequence, parse_sequence_lenient};
use cube_core::{CubeError, ScrambleConfig, SolveCoordinator, DEFAULT_SCRAMBLE_LENGTH};
use cube_spatial::AnimationConfig;
use serde::Serialize;

/// Command-line arguments for the `cube` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "cube")]
#[command(about = "Saorsa Cube 3x3x3 puzzle simulator")]
#[command(version)]
pub struct CliArgs {
    /// Output format
    #[arg(long, value_enum, env = "CUBE_OUTPUT", default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Layer turn duration in milliseconds (0 turns instantly)
    #[arg(long, env = "CUBE_ANIMATION_MS", default_value = "0", global = true)]
    pub animation_ms: u64,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Apply moves to a solved cube and print the result
    Apply {
        /// Move tokens; several may share one argument
        #[arg(required = true)]
        moves: Vec<String>,
    },
    /// Scramble a solved cube
    Scramble {
        /// Number of moves
        #[arg(long, env = "CUBE_SCRAMBLE_LENGTH", default_value_t = DEFAULT_SCRAMBLE_LENGTH)]
        length: usize,
        /// Seed for a reproducible scramble
        #[arg(long, env = "CUBE_SEED")]
        seed: Option<u64>,
    },
    /// Print the sequence that undoes the given moves
    Invert {
        /// Move tokens
        #[arg(required = true)]
        moves: Vec<String>,
    },
    /// Validate a 54-character facelet string and show it
    Check {
        /// Facelets in URFDLB order
        facelets: String,
    },
}

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable net and summary.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// What to do.
    pub command: Command,
    /// Output format.
    pub output: OutputFormat,
    /// Scramble settings (used by `scramble`).
    pub scramble: ScrambleConfig,
    /// Animation settings for the session engine.
    pub animation: AnimationConfig,
}

impl SimConfig {
    /// Config for `command` with default settings.
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            command,
            output: OutputFormat::default(),
            scramble: ScrambleConfig::default(),
            animation: AnimationConfig::instant(),
        }
    }
}

impl From<CliArgs> for SimConfig {
    fn from(args: CliArgs) -> Self {
        let scramble = match &args.command {
            Command::Scramble { length, seed } => ScrambleConfig {
                length: *length,
                seed: *seed,
            },
            _ => ScrambleConfig::default(),
        };
        Self {
            command: args.command,
            output: args.output,
            scramble,
            animation: AnimationConfig::default()
                .with_duration(Duration::from_millis(args.animation_ms)),
        }
    }
}

/// Run the configured command and return what should be printed.
///
/// # Errors
///
/// - [`SessionError::Cube`] with [`CubeError::Format`] for a bad facelet string
/// - [`SessionError::Closed`] if the session task died
pub async fn execute(config: &SimConfig) -> SessionResult<String> {
    match &config.command {
        Command::Invert { moves } => {
            let text = moves.join(" ");
            let (parsed, ignored) = parse_sequence_lenient(&text);
            let report = InverseReport {
                moves: invert_sequence(&parsed),
                ignored: ignored.into_iter().map(str::to_string).collect(),
            };
            match config.output {
                OutputFormat::Text => Ok(report.to_text()),
                OutputFormat::Json => to_json(&report),
            }
        }
        command => {
            let (session, task) =
                spawn_session(config.animation, Arc::new(SolveCoordinator::new()));
            let outcome = run_in_session(&session, command, config.scramble).await;
            // A failed shutdown means the task is already gone.
            let _ = session.shutdown().await;
            if let Err(e) = task.await {
                tracing::warn!("Session task ended abnormally: {e}");
            }
            let report = outcome?;
            match config.output {
                OutputFormat::Text => Ok(report.to_text()?),
                OutputFormat::Json => to_json(&report),
            }
        }
    }
}

async fn run_in_session(
    session: &SessionHandle,
    command: &Command,
    scramble: ScrambleConfig,
) -> SessionResult<CubeReport> {
    let ignored = match command {
        Command::Apply { moves } => session.apply_sequence(&moves.join(" ")).await?.ignored,
        Command::Scramble { .. } => {
            let sequence = session.scramble(scramble).await?;
            tracing::debug!("Scrambled with {} moves", sequence.len());
            Vec::new()
        }
        Command::Check { facelets } => {
            session.load_facelets(facelets.trim()).await?;
            Vec::new()
        }
        Command::Invert { .. } => Vec::new(),
    };
    session.wait_idle().await?;
    let snapshot = session.snapshot().await?;
    Ok(CubeReport {
        cube: snapshot.cube,
        ignored,
    })
}

fn to_json<T: Serialize>(value: &T) -> SessionResult<String> {
    Ok(serde_json::to_string_pretty(value).map_err(CubeError::from)?)
}
