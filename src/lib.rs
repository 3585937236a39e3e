//! Report and adjust Linux CPU power management settings
//!
//! SMT, frequency boost, which cores are online, and the scaling frequency
//! limits are all exposed by the kernel as small text files under
//! `/sys/devices/system/cpu`. [`system::cpu::CpuManager`] reads and writes
//! them, the `cpu-power` binary wraps that in a command line tool.
//!
//! # Implementation details
//!
//! Everything here is read from sysfs on every call, nothing is cached, and
//! this library requires it to exist.
//!
//! Which attributes exist depends on the hardware, the kernel configuration
//! and the cpufreq driver. Missing ones are reported as errors, see
//! [`error::CpuError::is_not_found`].
//!
//! Changing anything requires root.
pub mod cli;
pub mod commands;
pub mod error;

pub mod system;
pub mod util;

#[cfg(test)]
mod testing;
