//! Utility functions
use crate::error::{CpuError, Result};
use std::{fs, io::prelude::*, path::Path};
use tracing::trace;

/// The CPU subsystem directory, which everything this crate touches lives
/// below.
///
/// This is only the default, [`CpuManager::with_root`] points a manager at any
/// other tree, such as a copy used for testing.
///
/// [`CpuManager::with_root`]: crate::system::cpu::CpuManager::with_root
pub const CPU_PATH: &str = "/sys/devices/system/cpu";

/// Parse a sysfs boolean.
///
/// The kernel uses both `1`/`0` and `on`/`off`, depending on the attribute.
///
/// # Errors
///
/// - If `text` is anything else
pub fn parse_bool(text: &str) -> Result<bool> {
    match text.trim() {
        "1" | "on" => Ok(true),
        "0" | "off" => Ok(false),
        _ => Err(CpuError::InvalidBool(text.into())),
    }
}

/// Read a sysfs attribute, trimmed.
///
/// # Arguments
///
/// - `path`, path to the attribute.
pub(crate) fn read_attr(path: &Path) -> Result<String> {
    let value = fs::read_to_string(path).map_err(|e| CpuError::io(path, e))?;
    let value = value.trim();
    trace!(path = %path.display(), value, "read");
    Ok(value.to_owned())
}

/// Write a sysfs attribute.
///
/// The attribute must already exist, sysfs doesn't allow creating files.
pub(crate) fn write_attr(path: &Path, value: &str) -> Result<()> {
    trace!(path = %path.display(), value, "write");
    let mut f = fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| CpuError::io(path, e))?;
    f.write_all(value.as_bytes())
        .map_err(|e| CpuError::io(path, e))
}

pub(crate) fn read_bool(path: &Path) -> Result<bool> {
    parse_bool(&read_attr(path)?)
}

/// Write `1` or `0`
pub(crate) fn write_bool(path: &Path, value: bool) -> Result<()> {
    write_attr(path, if value { "1" } else { "0" })
}

/// Read an unsigned decimal attribute.
pub(crate) fn read_u64(path: &Path) -> Result<u64> {
    let text = read_attr(path)?;
    text.parse().map_err(|_| CpuError::InvalidInteger {
        path: path.display().to_string(),
        text,
    })
}
