//! CLI argument definitions

use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "mdprof",
    version,
    about = "Convert Mega Drive emulator profiling recordings into Chrome/Perfetto traces",
    after_help = "\
EXAMPLES:
    mdprof capture.mdp -s game.sym                  Write capture.json
    mdprof capture.mdp -s game.sym -i frames.txt    Add manual intervals
    mdprof -s game.sym -i frames.txt --breakpoints game.bpt
                                                    Write breakpoint addresses for the emulator"
)]
pub struct Args {
    /// Recording produced by the emulator (.mdp)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Symbol file (asm68k binary, AS listing or nm output)
    #[arg(short, long, value_name = "FILE")]
    pub symbols: Option<PathBuf>,

    /// Manual interval definitions
    #[arg(short, long, value_name = "FILE")]
    pub intervals: Option<PathBuf>,

    /// Output trace path (default: INPUT with a .json extension)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the interval breakpoint addresses to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub breakpoints: Option<PathBuf>,

    /// Emit an instant marker for every horizontal interrupt
    #[arg(long)]
    pub hint_markers: bool,

    /// Do not emit vertical interrupt markers
    #[arg(long)]
    pub no_vint_markers: bool,

    /// Close frames abandoned by stack pointer jumps on return
    #[arg(long)]
    pub unwind_by_sp: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Print the N labels with the most inclusive time (0 = off)
    #[arg(long, value_name = "N", default_value = "0")]
    pub top: usize,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Output path, derived from the input when `--output` is absent.
    #[must_use]
    pub fn output_path(&self, input: &Path) -> PathBuf {
        self.output.clone().unwrap_or_else(|| input.with_extension("json"))
    }
}
