//! Error handling stuff
use displaydoc::Display;
use std::{io, path::Path};
use thiserror::Error;

pub type Result<T, E = CpuError> = std::result::Result<T, E>;

/// Error type for [`crate::system::cpu`]
#[derive(Debug, Display, Error)]
pub enum CpuError {
    /// Couldn't access `{path}`: {source}
    Io { path: String, source: io::Error },

    /// Couldn't list CPU cores: {0}
    Walk(#[from] walkdir::Error),

    /// Can not parse as boolean: `{0}`
    InvalidBool(String),

    /// Can not parse `{text}` from `{path}` as an integer
    InvalidInteger { path: String, text: String },

    /// Invalid CPU core target: {0}. Needs to be 1 or higher
    InvalidTarget(usize),

    /// Can't reach target of {target} cores, because your system only has {available} virtual cores
    InsufficientCores { target: usize, available: usize },

    /// cpu{0} has no `online` attribute, it can't be taken offline
    NotHotpluggable(usize),

    /// No online CPU cores were found
    NoCores,
}

impl CpuError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Whether this error was caused by a sysfs attribute that doesn't exist.
    ///
    /// The kernel omits attributes a device doesn't support, so this is
    /// usually not a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Error text.
pub mod text {
    pub const NOT_ROOT: &str = "You need to run this script as root";

    pub const CORE_COUNT: &str = "Failed to get CPU core count";

    pub const SMT: &str = "Failed to get SMT status";

    pub const BOOST: &str = "Failed to get CPU boost";

    pub const FREQ: &str = "Failed to get CPU frequency";

    pub const MIN_FREQ: &str = "Failed to get minimum CPU frequency";

    pub const MAX_FREQ: &str = "Failed to get maximum CPU frequency";

    pub const AVAILABLE_FREQ: &str = "Failed to get available CPU frequencies";

    pub const ENABLE_SMT: &str = "Failed enabling SMT";

    pub const SET_CORES: &str = "Failed to enable target number of cores";

    pub const SET_SMT: &str = "Failed updating SMT";

    pub const SET_BOOST: &str = "Failed updating boost";

    pub const SET_MIN_FREQ: &str = "Failed setting minimum frequency";

    pub const SET_MAX_FREQ: &str = "Failed setting maximum frequency";
}
