//! memsim - Main Entry Point
//!
//! Usage: memsim -p <level> -r <tracefile> -s <swapfile> -f <frames> -a <algorithm> -t <tick> -o <outfile>
//!
//! Replays a memory-reference trace against a simulated demand-paged
//! address space and writes one translation line per reference plus the
//! total page-fault count.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process;

use anyhow::Context;

use memsim::constants::{MAX_FRAMES, MIN_FRAMES};
use memsim::sim::{run, SimOptions};
use memsim::swap::SwapStore;
use memsim::table::TableKind;
use memsim::Algorithm;

/// Command-line configuration
struct Config {
    options: SimOptions,
    trace_file: String,
    swap_file: String,
    output_file: String,
}

fn main() {
    env_logger::init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = execute(&config) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn print_help(program: &str) {
    eprintln!("memsim - demand-paged virtual memory simulator");
    eprintln!();
    eprintln!("Usage: {} -p <level> -r <tracefile> -s <swapfile> -f <frames> -a <algorithm> -t <tick> -o <outfile>", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p <level>      Page table levels: 1 or 2");
    eprintln!("  -r <tracefile>  Memory reference trace to replay");
    eprintln!("  -s <swapfile>   Swap store (created and zero-filled if absent)");
    eprintln!("  -f <frames>     Physical frame count, 4 to 128");
    eprintln!("  -a <algorithm>  Replacement algorithm: FIFO, LRU, CLOCK or ECLOCK");
    eprintln!("  -t <tick>       References between aging sweeps (0 disables aging)");
    eprintln!("  -o <outfile>    Translation log output file");
    eprintln!("  --skip-bad-lines  Skip malformed trace lines instead of aborting");
    eprintln!("  -h, --help      Print this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  {} -p 1 -r trace.txt -s swap.bin -f 8 -a CLOCK -t 10 -o out.txt", program);
}

fn parse_args() -> Result<Config, String> {
    let args: Vec<String> = std::env::args().collect();
    let program = &args[0];

    let mut level: Option<u32> = None;
    let mut trace_file: Option<String> = None;
    let mut swap_file: Option<String> = None;
    let mut frame_count: Option<usize> = None;
    let mut algorithm: Option<Algorithm> = None;
    let mut tick: Option<u64> = None;
    let mut output_file: Option<String> = None;
    let mut skip_bad_lines = false;

    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help(program);
                process::exit(0);
            }
            "--skip-bad-lines" => {
                skip_bad_lines = true;
            }
            "-p" | "-r" | "-s" | "-f" | "-a" | "-t" | "-o" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("Error: Option {} requires a value.", arg))?;
                match arg.as_str() {
                    "-p" => {
                        let parsed: u32 = value
                            .parse()
                            .map_err(|_| format!("Error: Invalid page level '{}'.", value))?;
                        if !(1..=2).contains(&parsed) {
                            return Err(
                                "Error: Minimum and maximum values for page level are 1 and 2."
                                    .to_string(),
                            );
                        }
                        level = Some(parsed);
                    }
                    "-r" => trace_file = Some(value.clone()),
                    "-s" => swap_file = Some(value.clone()),
                    "-f" => {
                        let parsed: usize = value
                            .parse()
                            .map_err(|_| format!("Error: Invalid frame count '{}'.", value))?;
                        if !(MIN_FRAMES..=MAX_FRAMES).contains(&parsed) {
                            return Err(format!(
                                "Error: Minimum and maximum values for frame count are {} and {}.",
                                MIN_FRAMES, MAX_FRAMES
                            ));
                        }
                        frame_count = Some(parsed);
                    }
                    "-a" => {
                        algorithm = Some(value.parse().map_err(|e| format!("Error: {}", e))?);
                    }
                    "-t" => {
                        let parsed: u64 = value
                            .parse()
                            .map_err(|_| format!("Error: Invalid tick '{}'.", value))?;
                        tick = Some(parsed);
                    }
                    "-o" => output_file = Some(value.clone()),
                    _ => unreachable!(),
                }
            }
            _ => {
                return Err(format!(
                    "Unknown option: {}\nUse --help for usage information.",
                    arg
                ));
            }
        }
    }

    let missing = |flag: &str, what: &str| format!("Error: Missing {} (option {}).", what, flag);
    let level = level.ok_or_else(|| missing("-p", "page table level"))?;
    let trace_file = trace_file.ok_or_else(|| missing("-r", "trace file name"))?;
    let swap_file = swap_file.ok_or_else(|| missing("-s", "swap file name"))?;
    let frame_count = frame_count.ok_or_else(|| missing("-f", "frame count"))?;
    let algorithm = algorithm.ok_or_else(|| missing("-a", "algorithm name"))?;
    let tick = tick.ok_or_else(|| missing("-t", "aging tick"))?;
    let output_file = output_file.ok_or_else(|| missing("-o", "output file name"))?;

    let table_kind = if level == 1 {
        TableKind::SingleLevel
    } else {
        TableKind::TwoLevel
    };

    Ok(Config {
        options: SimOptions {
            table_kind,
            frame_count,
            algorithm,
            tick,
            skip_bad_lines,
        },
        trace_file,
        swap_file,
        output_file,
    })
}

/// Open the three files and hand them to the simulation run loop
fn execute(config: &Config) -> anyhow::Result<()> {
    let trace = File::open(&config.trace_file)
        .with_context(|| format!("cannot open trace file '{}'", config.trace_file))?;
    let swap = SwapStore::open(&config.swap_file)
        .with_context(|| format!("cannot open swap file '{}'", config.swap_file))?;
    let output = File::create(&config.output_file)
        .with_context(|| format!("cannot create output file '{}'", config.output_file))?;

    run(
        &config.options,
        BufReader::new(trace),
        swap,
        BufWriter::new(output),
    )
    .context("simulation failed")?;

    Ok(())
}
