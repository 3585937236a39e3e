//! CLI argument definitions using Clap
use crate::{system::cpu::freq::Frequency, util::CPU_PATH};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Report and adjust CPU power management settings
#[derive(Parser, Debug)]
#[command(name = "cpu-power")]
#[command(version, about)]
pub struct Cli {
    /// Show verbose error messages (-v), and every sysfs access (-vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Use a copy of the CPU sysfs tree instead of the real one
    #[arg(long, global = true, value_name = "PATH", default_value = CPU_PATH, hide = true)]
    pub sysfs_root: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current CPU settings (default when no command given)
    Info,

    /// [requires root] manually set some CPU performance parameters
    Set(SetArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct SetArgs {
    /// Enable Simultaneous Multi-Threading
    #[arg(short = 's', long, conflicts_with = "no_smt")]
    pub smt: bool,

    /// Disable Simultaneous Multi-Threading
    #[arg(short = 'S', long)]
    pub no_smt: bool,

    /// Enable CPU performance boost
    #[arg(short = 'b', long, conflicts_with = "no_boost")]
    pub boost: bool,

    /// Disable CPU performance boost
    #[arg(short = 'B', long)]
    pub no_boost: bool,

    /// Set the number of cores manually. Will ignore any additional --smt or
    /// --no-smt flags
    #[arg(short = 'c', long, value_name = "N")]
    pub cores: Option<usize>,

    /// Set the CPU minimum frequency, in GHz
    #[arg(short = 'd', long, value_name = "GHZ", value_parser = parse_ghz)]
    pub min_freq: Option<Frequency>,

    /// Set the CPU maximum frequency, in GHz
    #[arg(short = 'u', long, value_name = "GHZ", value_parser = parse_ghz)]
    pub max_freq: Option<Frequency>,
}

impl SetArgs {
    /// Requested SMT state, if any
    pub fn smt(&self) -> Option<bool> {
        flag_pair(self.smt, self.no_smt)
    }

    /// Requested boost state, if any
    pub fn boost(&self) -> Option<bool> {
        flag_pair(self.boost, self.no_boost)
    }
}

/// `--feature` and `--no-feature`
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn parse_ghz(s: &str) -> Result<Frequency, String> {
    let ghz: f64 = s.parse().map_err(|_| format!("`{s}` isn't a number"))?;
    if !ghz.is_finite() || ghz <= 0.0 {
        return Err(format!("`{s}` isn't a positive frequency"));
    }
    Frequency::try_from_ghz(ghz).ok_or_else(|| format!("`{s}` is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{error::ErrorKind, CommandFactory};

    #[test]
    fn verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_is_info() {
        let cli = Cli::try_parse_from(["cpu-power"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.sysfs_root, PathBuf::from(CPU_PATH));

        let cli = Cli::try_parse_from(["cpu-power", "-v", "info"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Info)));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn set_flags() {
        let cli = Cli::try_parse_from([
            "cpu-power", "set", "-S", "--boost", "-c", "4", "-d", "0.8", "--max-freq", "2.5", "-vv",
        ])
        .unwrap();
        let Some(Commands::Set(args)) = cli.command else {
            panic!("expected set");
        };
        assert_eq!(cli.verbose, 2);
        assert_eq!(args.smt(), Some(false));
        assert_eq!(args.boost(), Some(true));
        assert_eq!(args.cores, Some(4));
        assert_eq!(args.min_freq, Some(Frequency::from_mhz(800)));
        assert_eq!(args.max_freq.map(Frequency::khz), Some(2_500_000));
    }

    #[test]
    fn nothing_to_set() {
        let cli = Cli::try_parse_from(["cpu-power", "set"]).unwrap();
        let Some(Commands::Set(args)) = cli.command else {
            panic!("expected set");
        };
        assert_eq!(args.smt(), None);
        assert_eq!(args.boost(), None);
        assert_eq!(args.cores, None);
    }

    #[test]
    fn conflicting_flags() {
        let err = Cli::try_parse_from(["cpu-power", "set", "-s", "-S"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        let err = Cli::try_parse_from(["cpu-power", "set", "--boost", "--no-boost"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn bad_frequencies() {
        for f in ["fast", "0", "0.0", "inf", "NaN", "1e20", "1e300"] {
            let err = Cli::try_parse_from(["cpu-power", "set", "--max-freq", f]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{f}");
        }
    }
}
