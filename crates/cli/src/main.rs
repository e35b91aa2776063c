//! Command-line front end for the pagewalk simulator.

use clap::{ArgAction, Parser, Subcommand};
use log::debug;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::{fs, process};

use pagewalk::common::addr::format_binary;
use pagewalk::config::Config;
use pagewalk::core::mmu::TlbAccess;
use pagewalk::core::paging::AccessOutcome;
use pagewalk::{FrameTable, Mmu, PageIndices, Policy, ProcPagemap, Tlb, VirtAddr};

mod render;

#[derive(Parser, Debug)]
#[command(
    name = "pagewalk",
    author,
    version,
    about = "Virtual address translation, TLB and demand-paging simulator",
    long_about = None,
)]
struct Cli {
    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// TOML file with [tlb] and [paging] sections.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split an address into page table indices and offset.
    Decompose {
        #[arg(value_parser = parse_address)]
        addr: u64,
    },

    /// Translate an address of a running process (reads /proc/<pid>/pagemap).
    Translate {
        #[arg(short, long)]
        pid: u32,

        #[arg(value_parser = parse_address)]
        addr: u64,
    },

    /// Replay addresses through the TLB model.
    Tlb {
        /// Number of entries (1-1024).
        #[arg(short, long)]
        entries: Option<usize>,

        /// LRU, FIFO, RANDOM or CLOCK.
        #[arg(long)]
        policy: Option<Policy>,

        /// Seed for RANDOM replacement.
        #[arg(long)]
        seed: Option<u64>,

        /// Fill misses from this process's real mappings when possible.
        #[arg(short, long)]
        pid: Option<u32>,

        /// Mark inserted entries dirty.
        #[arg(long)]
        dirty: bool,

        #[arg(required = true, value_parser = parse_address)]
        addrs: Vec<u64>,
    },

    /// Replay addresses through the demand-paging model.
    Paging {
        /// Number of physical frames (clamped to 1-64).
        #[arg(short, long)]
        frames: Option<usize>,

        /// LRU, FIFO, RANDOM or CLOCK.
        #[arg(long)]
        policy: Option<Policy>,

        /// Seed for RANDOM replacement.
        #[arg(long)]
        seed: Option<u64>,

        #[arg(required = true, value_parser = parse_address)]
        addrs: Vec<u64>,
    },
}

#[derive(Serialize)]
struct DecomposeReport {
    vaddr: VirtAddr,
    vpn: u64,
    indices: PageIndices,
    binary: String,
}

#[derive(Serialize)]
struct PageAccess {
    vaddr: VirtAddr,
    vpn: u64,
    #[serde(flatten)]
    outcome: AccessOutcome,
}

#[derive(Serialize)]
struct TlbReport {
    accesses: Vec<TlbAccess>,
    status: pagewalk::core::mmu::tlb::TlbStatus,
}

#[derive(Serialize)]
struct PagingReport {
    accesses: Vec<PageAccess>,
    status: pagewalk::core::paging::FrameTableStatus,
}

#[derive(Serialize)]
struct TranslateReport {
    success: bool,
    reason: Option<String>,
    #[serde(flatten)]
    result: pagewalk::TranslationResult,
}

/// Parses `0x`-prefixed hex or plain decimal.
fn parse_address(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid address `{}`: {}", s, e))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let src = fs::read_to_string(path)
        .map_err(|e| format!("could not read config {}: {}", path.display(), e))?;
    let config = Config::from_toml_str(&src)?;
    debug!("loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

fn emit<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("\x1b[1;31merror:\x1b[0m {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Decompose { addr } => {
            let vaddr = VirtAddr::new(addr);
            let report = DecomposeReport {
                vaddr,
                vpn: vaddr.vpn(),
                indices: vaddr.indices(),
                binary: format_binary(addr),
            };
            if cli.json {
                emit(&report)?;
            } else {
                render::decomposition(vaddr);
            }
        }

        Command::Translate { pid, addr } => {
            let result = pagewalk::translate(&ProcPagemap::new(), pid, VirtAddr::new(addr));
            if cli.json {
                emit(&TranslateReport {
                    success: result.is_success(),
                    reason: result.reason(),
                    result,
                })?;
            } else {
                render::translation(&result);
            }
        }

        Command::Tlb {
            entries,
            policy,
            seed,
            pid,
            dirty,
            addrs,
        } => {
            config.tlb.entries = entries.unwrap_or(config.tlb.entries);
            config.tlb.policy = policy.unwrap_or(config.tlb.policy);
            config.tlb.seed = seed.or(config.tlb.seed);
            debug!("TLB settings after flag overrides: {:?}", config.tlb);

            let mut mmu = Mmu::new(Tlb::from_config(&config.tlb)?, ProcPagemap::new());
            mmu.select(pid);

            let accesses: Vec<TlbAccess> = addrs
                .into_iter()
                .map(|a| mmu.tlb_access(VirtAddr::new(a), dirty))
                .collect();

            if cli.json {
                emit(&TlbReport {
                    accesses,
                    status: mmu.tlb.status(),
                })?;
            } else {
                for access in &accesses {
                    render::tlb_access(access);
                }
                render::tlb_status(&mmu.tlb);
            }
        }

        Command::Paging {
            frames,
            policy,
            seed,
            addrs,
        } => {
            config.paging.frames = frames.unwrap_or(config.paging.frames);
            config.paging.policy = policy.unwrap_or(config.paging.policy);
            config.paging.seed = seed.or(config.paging.seed);
            debug!("paging settings after flag overrides: {:?}", config.paging);

            let mut table = FrameTable::from_config(&config.paging);
            let accesses: Vec<PageAccess> = addrs
                .into_iter()
                .map(|a| {
                    let vaddr = VirtAddr::new(a);
                    PageAccess {
                        vaddr,
                        vpn: vaddr.vpn(),
                        outcome: table.access(vaddr.vpn()),
                    }
                })
                .collect();

            if cli.json {
                emit(&PagingReport {
                    accesses,
                    status: table.status(),
                })?;
            } else {
                for access in &accesses {
                    render::page_access(access.vpn, &access.outcome);
                }
                render::frame_table(&table);
            }
        }
    }

    Ok(())
}
