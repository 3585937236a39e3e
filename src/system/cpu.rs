//! Interface to CPU power management.
//!
//! # Examples
//!
//! Print which cores are online
//!
//! ```rust,no_run
//! # use cpu_power::system::cpu::*;
//!
//! let cpu = CpuManager::new();
//! for (index, online) in cpu.get_core_status().unwrap().into_iter().enumerate() {
//!     println!("cpu{index}: {}", if online { "online" } else { "offline" });
//! }
//! ```
//!
//! # Implementation
//!
//! This uses the sysfs interface, documented [here][1], [here][2] and
//! [here][3].
//!
//! [1]: https://www.kernel.org/doc/Documentation/ABI/testing/sysfs-devices-system-cpu
//! [2]: https://www.kernel.org/doc/html/latest/admin-guide/pm/cpufreq.html
//! [3]: https://www.kernel.org/doc/html/latest/core-api/cpu_hotplug.html
use crate::{
    error::{CpuError, Result},
    util::{read_bool, write_attr, write_bool, CPU_PATH},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub mod freq;

/// Access to the CPU subsystem in sysfs.
///
/// Nothing is cached, every call goes to the kernel.
#[derive(Debug, Clone)]
pub struct CpuManager {
    /// Usually [`CPU_PATH`]
    root: PathBuf,
}

impl Default for CpuManager {
    fn default() -> Self {
        Self::new()
    }
}

// Public
impl CpuManager {
    /// Manage the CPUs of the running system
    pub fn new() -> Self {
        Self::with_root(CPU_PATH)
    }

    /// Manage the CPU tree at `root`, instead of [`CPU_PATH`]
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory this operates on
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether frequency boost is enabled
    ///
    /// # Errors
    ///
    /// - If the cpufreq driver doesn't support boost, the attribute is missing.
    pub fn is_boost_enabled(&self) -> Result<bool> {
        read_bool(&self.root.join("cpufreq/boost"))
    }

    /// Enable or disable frequency boost for every core
    pub fn set_boost(&self, enabled: bool) -> Result<()> {
        write_bool(&self.root.join("cpufreq/boost"), enabled)?;
        info!(enabled, "boost updated");
        Ok(())
    }

    /// Whether SMT is currently active
    pub fn is_smt_enabled(&self) -> Result<bool> {
        read_bool(&self.root.join("smt/active"))
    }

    /// Enable or disable SMT
    ///
    /// # Note
    ///
    /// Sibling threads are hot-unplugged by the kernel when disabling,
    /// and will show up as offline in [`CpuManager::get_core_status`].
    pub fn set_smt(&self, enabled: bool) -> Result<()> {
        write_attr(
            &self.root.join("smt/control"),
            if enabled { "on" } else { "off" },
        )?;
        info!(enabled, "SMT updated");
        Ok(())
    }

    /// Indices of the logical cores the kernel knows about, sorted.
    ///
    /// Only the contiguous run starting at `cpu0` is returned. `cpu0` is
    /// always included, even if its directory is missing.
    ///
    /// # Errors
    ///
    /// - If the CPU directory couldn't be listed
    pub fn core_indices(&self) -> Result<Vec<usize>> {
        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Some(index) = entry.file_name().to_str().and_then(core_index) {
                found.push(index);
            }
        }
        found.sort_unstable();
        if found.first() != Some(&0) {
            found.insert(0, 0);
        }
        let count = found
            .iter()
            .enumerate()
            .take_while(|&(i, &index)| i == index)
            .count();
        found.truncate(count);
        debug!(cores = found.len(), "enumerated cores");
        Ok(found)
    }

    /// Online status of every logical core, indexed by core number.
    ///
    /// # Note
    ///
    /// `cpu0` usually has no `online` attribute, and cores that can't be
    /// hot-unplugged never do. These are always online.
    ///
    /// # Errors
    ///
    /// - If the CPU directory couldn't be listed
    /// - If any `online` attribute couldn't be read or parsed
    pub fn get_core_status(&self) -> Result<Vec<bool>> {
        self.core_indices()?
            .into_iter()
            .map(|index| match read_bool(&self.online_path(index)) {
                Err(e) if e.is_not_found() => Ok(true),
                r => r,
            })
            .collect()
    }

    /// Indices of the cores that are currently online
    pub fn online_cores(&self) -> Result<Vec<usize>> {
        Ok(self
            .get_core_status()?
            .into_iter()
            .enumerate()
            .filter_map(|(index, online)| online.then_some(index))
            .collect())
    }

    /// Bring exactly `target` logical cores online, the lowest numbered ones,
    /// and take the rest offline.
    ///
    /// `cpu0` is never touched.
    ///
    /// # Errors
    ///
    /// - If `target` is 0
    /// - If the system has fewer than `target` cores. Nothing is written in
    ///   this case.
    /// - If a core that would have to go offline has no `online` attribute,
    ///   and so can't be hot-unplugged. Nothing is written in this case.
    /// - If any `online` attribute couldn't be written. Cores before it will
    ///   have been updated already.
    pub fn set_core_count(&self, target: usize) -> Result<()> {
        if target < 1 {
            return Err(CpuError::InvalidTarget(target));
        }
        let cores = self.core_indices()?;
        if cores.len() < target {
            return Err(CpuError::InsufficientCores {
                target,
                available: cores.len(),
            });
        }
        if let Some(&index) = cores[target..]
            .iter()
            .find(|&&index| !self.online_path(index).exists())
        {
            return Err(CpuError::NotHotpluggable(index));
        }
        for index in cores.into_iter().skip(1) {
            match write_bool(&self.online_path(index), index < target) {
                // Always online, nothing to do
                Err(e) if e.is_not_found() && index < target => {
                    debug!(index, "core has no online attribute");
                }
                r => r?,
            }
        }
        info!(target, "core count updated");
        Ok(())
    }
}

// Private
impl CpuManager {
    fn core_path(&self, index: usize) -> PathBuf {
        self.root.join(format!("cpu{index}"))
    }

    fn online_path(&self, index: usize) -> PathBuf {
        self.core_path(index).join("online")
    }
}

/// Core number from a directory name like `cpu12`
fn core_index(name: &str) -> Option<usize> {
    let digits = name.strip_prefix("cpu")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
