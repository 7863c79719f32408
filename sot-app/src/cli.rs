//! Command-line interface

use clap::{Parser, ValueEnum};
use sot_experiment::CaptureMode;
use std::path::PathBuf;

/// Spatial orientation test: point from one object to another in an imagined layout
#[derive(Parser, Debug)]
#[command(name = "sot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Experiment config (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Object layout and trial lists (JSON); the standard layout when omitted
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// TrueType/OpenType font for on-screen text
    #[arg(short, long)]
    pub font: Option<PathBuf>,

    /// Response input, overriding the config file
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Report results to a survey host over stdout
    #[arg(long)]
    pub hosted: bool,

    /// Also write the results record to this file
    #[arg(short, long)]
    pub results: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Drag the line with the mouse
    Continuous,
    /// Rotate the line with the arrow keys
    Discrete,
}

impl From<ModeArg> for CaptureMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Continuous => CaptureMode::Continuous,
            ModeArg::Discrete => CaptureMode::Discrete,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
