//! `cpu-power` entry point
use std::{io, process::ExitCode};

use clap::Parser;
use cpu_power::{
    cli::{Cli, Commands},
    commands,
    error::text::NOT_ROOT,
    system::cpu::CpuManager,
};
use nix::unistd::geteuid;
use tracing::debug;
use tracing_subscriber::{filter::Directive, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cpu = CpuManager::with_root(&cli.sysfs_root);
    let verbose = cli.verbose > 0;
    let out = io::stdout().lock();
    debug!(root = %cpu.root().display(), "starting");

    let code = match &cli.command {
        Some(Commands::Set(args)) => {
            if !geteuid().is_root() {
                println!("{NOT_ROOT}");
                return ExitCode::FAILURE;
            }
            commands::set(&cpu, args, verbose, out)
        }
        Some(Commands::Info) | None => commands::info(&cpu, verbose, out),
    };
    ExitCode::from(code)
}

/// Logs go to stderr so they don't mix with the report.
///
/// `-v` shows what this crate is doing, `-vv` everything it can. `RUST_LOG`
/// still applies on top.
fn init_tracing(verbose: u8) {
    let mut filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    let directive = match verbose {
        0 => None,
        1 => Some("cpu_power=debug"),
        _ => Some("cpu_power=trace"),
    };
    if let Some(Ok(directive)) = directive.map(str::parse::<Directive>) {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
