//! The `info` and `set` commands
//!
//! Every setting is read or applied on its own, a failure is reported and the
//! rest still runs. The exit code says whether anything failed.
use crate::{
    cli::SetArgs,
    error::text::*,
    system::cpu::{freq::Frequency, CpuManager},
};
use anyhow::{Context, Result};
use std::{io::prelude::*, thread, time::Duration};

/// How long frequency changes take to show up in `cpuinfo_cur_freq`
const SETTLE_TIME: Duration = Duration::from_millis(100);

/// Runs operations, printing `[OK]` or `[ERROR]` lines and remembering
/// whether any failed.
#[derive(Debug)]
pub struct Reporter<W> {
    out: W,
    verbose: bool,
    failed: bool,
}

impl<W: Write> Reporter<W> {
    /// With `verbose`, the full error chain follows every `[ERROR]` line on
    /// stderr.
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            failed: false,
        }
    }

    /// Run `f`, printing `error` if it fails, or `success` if given and it
    /// doesn't.
    pub fn attempt<T>(
        &mut self,
        error: &str,
        success: Option<&str>,
        f: impl FnOnce(&mut W) -> Result<T>,
    ) -> Option<T> {
        match f(&mut self.out) {
            Ok(t) => {
                if let Some(msg) = success {
                    self.print("[OK]", msg);
                }
                Some(t)
            }
            Err(e) => {
                self.failed = true;
                self.print("[ERROR]", error);
                if self.verbose {
                    eprintln!("{e:?}");
                }
                None
            }
        }
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// `1` if anything failed, `0` otherwise
    pub fn exit_code(&self) -> u8 {
        u8::from(self.failed)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, tag: &str, msg: &str) {
        // Nowhere left to report a broken stdout to
        let _ = writeln!(self.out, "{tag} {msg}");
    }
}

fn enabled(x: bool) -> &'static str {
    if x {
        "enabled"
    } else {
        "disabled"
    }
}

/// Print the current settings, returning the exit code.
pub fn info<W: Write>(cpu: &CpuManager, verbose: bool, out: W) -> u8 {
    let mut r = Reporter::new(out, verbose);
    report(cpu, &mut r);
    r.exit_code()
}

/// Print the current settings
pub fn report<W: Write>(cpu: &CpuManager, r: &mut Reporter<W>) {
    r.attempt(CORE_COUNT, None, |out| {
        let status = cpu.get_core_status()?;
        let online = status.iter().filter(|&&x| x).count();
        writeln!(out, "Cores          : {online} / {}", status.len())?;
        Ok(())
    });
    r.attempt(SMT, None, |out| {
        writeln!(out, "SMT            : {}", enabled(cpu.is_smt_enabled()?))?;
        Ok(())
    });
    r.attempt(BOOST, None, |out| {
        writeln!(out, "Boost          : {}", enabled(cpu.is_boost_enabled()?))?;
        Ok(())
    });
    r.attempt(FREQ, None, |out| {
        writeln!(out, "Current freq   : {}", cpu.get_freq_span()?)?;
        Ok(())
    });
    r.attempt(MIN_FREQ, None, |out| {
        writeln!(out, "Min freq       : {}", cpu.get_min_freq()?)?;
        Ok(())
    });
    r.attempt(MAX_FREQ, None, |out| {
        writeln!(out, "Max freq       : {}", cpu.get_max_freq()?)?;
        Ok(())
    });
    r.attempt(AVAILABLE_FREQ, None, |out| {
        let freqs = cpu
            .get_available_freq_list()?
            .iter()
            .map(Frequency::to_string)
            .collect::<Vec<_>>();
        writeln!(out, "Available freq : {}", freqs.join(", "))?;
        Ok(())
    });
}

/// Apply `args`, then print the resulting settings. Returns the exit code.
///
/// # Note
///
/// This doesn't check for root, the kernel will refuse the writes anyway.
pub fn set<W: Write>(cpu: &CpuManager, args: &SetArgs, verbose: bool, out: W) -> u8 {
    let mut r = Reporter::new(out, verbose);

    if let Some(cores) = args.cores {
        // Sibling threads can't be brought online with SMT off
        r.attempt(ENABLE_SMT, Some("SMT enabled"), |_| {
            cpu.set_smt(true).context("writing smt/control")
        });
        r.attempt(
            SET_CORES,
            Some(&format!("{cores} cores online")),
            |_| cpu.set_core_count(cores).context("updating core online status"),
        );
    } else if let Some(smt) = args.smt() {
        r.attempt(SET_SMT, Some(&format!("SMT {}", enabled(smt))), |_| {
            cpu.set_smt(smt).context("writing smt/control")
        });
    }

    if let Some(boost) = args.boost() {
        r.attempt(SET_BOOST, Some(&format!("Boost {}", enabled(boost))), |_| {
            cpu.set_boost(boost).context("writing cpufreq/boost")
        });
    }

    if let Some(freq) = args.min_freq {
        r.attempt(
            SET_MIN_FREQ,
            Some(&format!("Minimum frequency set to {freq}")),
            |_| cpu.set_min_freq(freq).context("writing scaling_min_freq"),
        );
    }

    if let Some(freq) = args.max_freq {
        r.attempt(
            SET_MAX_FREQ,
            Some(&format!("Maximum frequency set to {freq}")),
            |_| cpu.set_max_freq(freq).context("writing scaling_max_freq"),
        );
    }

    if args.min_freq.is_some() || args.max_freq.is_some() {
        thread::sleep(SETTLE_TIME);
    }

    // Show the new values, so it's visible whether it worked
    report(cpu, &mut r);
    r.exit_code()
}
