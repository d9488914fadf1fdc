//! # mdprof - Main Entry Point
//!
//! Supports two operational modes:
//! - **Convert** (`mdprof capture.mdp`): decode a recording and write a trace
//! - **Breakpoints** (`--breakpoints FILE`): write the emulator breakpoint list and exit

// Time conversions lose precision for display
#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use mdprof::analysis::{analyze_hotspots, display_hotspots};
use mdprof::cli::Args;
use mdprof::export::ChromeTraceExporter;
use mdprof::intervals::{write_breakpoints_file, IntervalRuleTable};
use mdprof::preflight::run_preflight_checks;
use mdprof::reconstruction::{display_diagnostics, reconstruct, ReconstructionOptions};
use mdprof::recording::Recording;
use mdprof::symbolization::SymbolTable;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

/// Anomalies listed individually before only the totals are shown
const DIAGNOSTIC_DETAIL_LIMIT: usize = 10;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let msg = err.to_string().to_lowercase();
    if msg.contains("missing required argument") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

fn load_symbols(path: Option<&Path>) -> Result<SymbolTable> {
    let Some(path) = path else {
        return Ok(SymbolTable::default());
    };
    let symbols = SymbolTable::from_file(path)
        .with_context(|| format!("Failed to load symbols from {}", path.display()))?;
    info!("Loaded {} symbols from {}", symbols.len(), path.display());
    Ok(symbols)
}

fn load_intervals(path: Option<&Path>, symbols: &SymbolTable) -> Result<IntervalRuleTable> {
    let Some(path) = path else {
        return Ok(IntervalRuleTable::default());
    };
    let table = IntervalRuleTable::from_file(path, symbols)
        .with_context(|| format!("Failed to load intervals from {}", path.display()))?;
    info!(
        "Loaded {} interval rules in {} categories from {}",
        table.len(),
        table.categories().len(),
        path.display()
    );
    Ok(table)
}

fn run() -> Result<()> {
    let args = Args::parse();
    let quiet = args.quiet;

    // ── Breakpoint mode: no recording involved ──────────────────────────
    if let Some(ref bpt_path) = args.breakpoints {
        let Some(intervals_path) = args.intervals.as_deref() else {
            anyhow::bail!(
                "Missing required argument: --intervals\n\n\
                 Usage:\n  \
                 mdprof -s game.sym -i frames.txt --breakpoints game.bpt"
            );
        };
        run_preflight_checks(None, args.symbols.as_deref(), Some(intervals_path))?;

        let symbols = load_symbols(args.symbols.as_deref())?;
        let table = load_intervals(Some(intervals_path), &symbols)?;
        let count = write_breakpoints_file(&table, bpt_path)
            .with_context(|| format!("Failed to write breakpoints to {}", bpt_path.display()))?;

        if !quiet {
            println!("breakpoints: {count}");
            println!("saved: {}", bpt_path.display());
        }
        return Ok(());
    }

    let Some(input) = args.input.as_deref() else {
        anyhow::bail!(
            "Missing required argument: INPUT\n\n\
             Usage:\n  \
             mdprof capture.mdp -s game.sym\n\n\
             Run 'mdprof --help' for more options"
        );
    };

    run_preflight_checks(Some(input), args.symbols.as_deref(), args.intervals.as_deref())?;

    let symbols = load_symbols(args.symbols.as_deref())?;
    let table = load_intervals(args.intervals.as_deref(), &symbols)?;

    // ── Decode and reconstruct ──────────────────────────────────────────
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let recording = Recording::parse(&bytes)
        .with_context(|| format!("Failed to parse recording {}", input.display()))?;
    let clock_hz = recording.header.clock_hz();
    debug!("Recording header: {:?}", recording.header);

    let options = ReconstructionOptions {
        vint_markers: !args.no_vint_markers,
        hint_markers: args.hint_markers,
        unwind_by_stack_pointer: args.unwind_by_sp,
    };
    let reconstruction = reconstruct(recording.events(), &table, &symbols, options)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    if !quiet {
        println!("mdprof v{}", env!("CARGO_PKG_VERSION"));
        println!("input: {}", input.display());
        println!("clock: {clock_hz:.0} Hz");
        let span_ms = reconstruction
            .last_timestamp
            .map_or(0.0, |last| last.as_micros(clock_hz) / 1000.0);
        println!(
            "events: {}, intervals: {}, markers: {}, span: {span_ms:.3} ms",
            reconstruction.event_count,
            reconstruction.intervals.len(),
            reconstruction.markers.len(),
        );
        for (track, depth) in &reconstruction.max_depth {
            debug!("{} max depth {depth}", table.categories().name(*track));
        }
    }

    display_diagnostics(&reconstruction.diagnostics, table.categories(), DIAGNOSTIC_DETAIL_LIMIT);

    // ── Export ──────────────────────────────────────────────────────────
    let output = args.output_path(input);
    let mut exporter =
        ChromeTraceExporter::new(table.categories().clone(), clock_hz).with_pretty(args.pretty);
    exporter.add_reconstruction(&reconstruction);

    let file = File::create(&output)
        .with_context(|| format!("Failed to create trace output file {}", output.display()))?;
    exporter.export(BufWriter::new(file)).context("Failed to export trace")?;

    if !quiet {
        println!("saved: {}", output.display());
    }

    if args.top > 0 {
        let hotspots = analyze_hotspots(&reconstruction);
        display_hotspots(&hotspots, table.categories(), args.top, clock_hz);
    }

    Ok(())
}
