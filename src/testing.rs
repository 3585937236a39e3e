//! Fake sysfs trees for tests
use crate::system::cpu::CpuManager;
use std::{fs, io, path::Path};
use tempfile::TempDir;

/// A throwaway copy of `/sys/devices/system/cpu`.
#[derive(Debug)]
pub(crate) struct StubCpu {
    dir: TempDir,
}

impl StubCpu {
    /// Empty tree with the directories that are always there, plus some
    /// entries that look like cores but aren't.
    pub fn new() -> io::Result<Self> {
        let dir = TempDir::new()?;
        for d in ["cpufreq", "cpuidle", "smt", "power", "hotplug"] {
            fs::create_dir_all(dir.path().join(d))?;
        }
        for f in ["possible", "present", "online", "offline", "kernel_max"] {
            fs::write(dir.path().join(f), "0\n")?;
        }
        Ok(Self { dir })
    }

    /// Tree with `online.len()` cores.
    ///
    /// `cpu0` gets no `online` attribute, like on most machines, so its entry
    /// is ignored.
    pub fn with_cores(online: &[bool]) -> io::Result<Self> {
        let stub = Self::new()?;
        for (i, on) in online.iter().enumerate() {
            fs::create_dir_all(stub.path().join(format!("cpu{i}/cpufreq")))?;
            if i > 0 {
                stub.set(&format!("cpu{i}/online"), if *on { "1\n" } else { "0\n" })?;
            }
        }
        Ok(stub)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `value` to the attribute at `rel`, creating parents as needed.
    pub fn set(&self, rel: &str, value: &str) -> io::Result<&Self> {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, value)?;
        Ok(self)
    }

    /// Set `attr` under `cpu<N>/cpufreq/` for every core in `values`.
    pub fn set_freqs(&self, attr: &str, values: &[u64]) -> io::Result<&Self> {
        for (i, v) in values.iter().enumerate() {
            self.set(&format!("cpu{i}/cpufreq/{attr}"), &format!("{v}\n"))?;
        }
        Ok(self)
    }

    pub fn get(&self, rel: &str) -> io::Result<String> {
        fs::read_to_string(self.path().join(rel)).map(|s| s.trim().to_owned())
    }

    pub fn manager(&self) -> CpuManager {
        CpuManager::with_root(self.path())
    }
}
