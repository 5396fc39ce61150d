//! BacVM - CLI
//!
//! Command-line interface to execute textual BacVM bytecode.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bac_core::loader::version;
use bac_core::{BacResult, BytecodeLoader, VirtualMachine, VmConfig};

/// BacVM - run line-oriented stack bytecode
#[derive(Parser)]
#[command(name = "bac")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run BacVM bytecode files", long_about = None)]
struct Cli {
    /// Bytecode files, run in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Log every executed instruction
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Print scope and buffer state after each run
    #[arg(short = 'd', long = "dump", value_enum)]
    dump: Option<DumpFormat>,

    /// Cap the number of buffered values (unbounded by default)
    #[arg(long = "max-buffer")]
    max_buffer: Option<usize>,

    /// Cap the number of nested scopes (unbounded by default)
    #[arg(long = "max-scopes")]
    max_scopes: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DumpFormat {
    Plain,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = VmConfig {
        max_buffer_size: cli.max_buffer,
        max_scope_depth: cli.max_scopes,
    };

    for path in &cli.files {
        if let Err(e) = run_file(path, &config, cli.dump) {
            eprintln!("Error: {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}

/// Initialize logging; `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_file(path: &Path, config: &VmConfig, dump: Option<DumpFormat>) -> BacResult<()> {
    let instructions = BytecodeLoader::load_file(path)?;
    debug!(file = %path.display(), vm = %version(), "loaded");

    let mut vm = VirtualMachine::new(config.clone(), instructions, bac_natives::standard_registry());
    let result = vm.run();

    if let Some(format) = dump {
        print_dump(&vm, format);
    }
    if let Err(e) = &result {
        if let Some(instruction) = vm.instructions().get(vm.program_counter()) {
            eprintln!("at instruction {} ({})", vm.program_counter(), instruction);
        }
        debug!(error = %e, "run failed");
    }
    result
}

fn print_dump(vm: &VirtualMachine, format: DumpFormat) {
    let dump = vm.dump();
    match format {
        DumpFormat::Plain => eprintln!("{}", dump),
        DumpFormat::Json => match serde_json::to_string_pretty(&dump) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => eprintln!("Error: failed to serialize dump: {}", e),
        },
    }
}
