//! CPU frequency scaling
//!
//! The kernel speaks kHz everywhere, users think in GHz and MHz.
//! [`Frequency`] converts between them.
//!
//! See the [cpufreq docs][1] for what each attribute means.
//!
//! [1]: https://www.kernel.org/doc/html/latest/admin-guide/pm/cpufreq.html
use super::CpuManager;
use crate::{
    error::{CpuError, Result},
    util::{read_attr, read_u64, write_attr},
};
use std::fmt;
use tracing::info;

/// A CPU clock frequency
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency {
    khz: u64,
}

impl Frequency {
    pub const fn from_khz(khz: u64) -> Self {
        Self { khz }
    }

    /// Saturates at [`u64::MAX`] kHz
    pub const fn from_mhz(mhz: u64) -> Self {
        Self {
            khz: mhz.saturating_mul(1000),
        }
    }

    /// Rounded to the nearest MHz, so `2.3` is `2300 MHz` and not
    /// `2299 MHz`.
    ///
    /// Negative and non-finite values saturate. Use
    /// [`Frequency::try_from_ghz`] for user input.
    pub fn from_ghz(ghz: f64) -> Self {
        Self::from_mhz((ghz * 1000.0).round() as u64)
    }

    /// Like [`Frequency::from_ghz`], but [`None`] if `ghz` is negative, not
    /// finite, or too large to represent in kHz.
    pub fn try_from_ghz(ghz: f64) -> Option<Self> {
        let mhz = (ghz * 1000.0).round();
        if !mhz.is_finite() || mhz < 0.0 {
            return None;
        }
        // `as` saturates, which checked_mul then catches
        (mhz as u64).checked_mul(1000).map(Self::from_khz)
    }

    pub const fn khz(self) -> u64 {
        self.khz
    }

    /// Truncated to whole MHz
    pub const fn mhz(self) -> u64 {
        self.khz / 1000
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MHz", self.mhz())
    }
}

/// Lowest and highest of a set of [`Frequency`]s
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FreqSpan {
    pub min: Frequency,
    pub max: Frequency,
}

impl FreqSpan {
    /// [`None`] if `freqs` is empty
    pub fn from_freqs<I: IntoIterator<Item = Frequency>>(freqs: I) -> Option<Self> {
        freqs.into_iter().fold(None, |span, f| {
            Some(match span {
                None => FreqSpan { min: f, max: f },
                Some(FreqSpan { min, max }) => FreqSpan {
                    min: min.min(f),
                    max: max.max(f),
                },
            })
        })
    }
}

/// `2000 MHz`, or `2000 - 2100 MHz`
impl fmt::Display for FreqSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min.mhz() == self.max.mhz() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{} - {}", self.min.mhz(), self.max)
        }
    }
}

impl CpuManager {
    /// Current frequency span across online cores.
    ///
    /// # Note
    ///
    /// This reads `cpuinfo_cur_freq`, the frequency reported by the hardware,
    /// which only root can read.
    pub fn get_freq_span(&self) -> Result<FreqSpan> {
        self.read_online("cpuinfo_cur_freq")
    }

    /// Frequencies the cpufreq driver supports, ascending.
    ///
    /// # Note
    ///
    /// Not every driver provides this, `intel_pstate` and `amd-pstate` in
    /// active mode don't.
    pub fn get_available_freq_list(&self) -> Result<Vec<Frequency>> {
        let path = self
            .core_path(0)
            .join("cpufreq/scaling_available_frequencies");
        let text = read_attr(&path)?;
        let mut freqs = text
            .split_whitespace()
            .map(|s| {
                s.parse().map(Frequency::from_khz).map_err(|_| CpuError::InvalidInteger {
                    path: path.display().to_string(),
                    text: s.to_owned(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        freqs.sort_unstable();
        Ok(freqs)
    }

    /// Span of the minimum scaling frequency across online cores
    pub fn get_min_freq(&self) -> Result<FreqSpan> {
        self.read_online("scaling_min_freq")
    }

    /// Span of the maximum scaling frequency across online cores
    pub fn get_max_freq(&self) -> Result<FreqSpan> {
        self.read_online("scaling_max_freq")
    }

    /// Set the minimum scaling frequency of every online core
    ///
    /// # Errors
    ///
    /// - If the kernel rejects `freq`, for example because it's above the
    ///   current maximum. Cores before the failing one keep the new value.
    pub fn set_min_freq(&self, freq: Frequency) -> Result<()> {
        self.write_online("scaling_min_freq", freq)?;
        info!(khz = freq.khz(), "minimum frequency updated");
        Ok(())
    }

    /// Set the maximum scaling frequency of every online core
    ///
    /// # Errors
    ///
    /// See [`CpuManager::set_min_freq`]
    pub fn set_max_freq(&self, freq: Frequency) -> Result<()> {
        self.write_online("scaling_max_freq", freq)?;
        info!(khz = freq.khz(), "maximum frequency updated");
        Ok(())
    }
}

// Private
impl CpuManager {
    /// Read `cpufreq/<attr>` of every online core
    fn read_online(&self, attr: &str) -> Result<FreqSpan> {
        let mut freqs = Vec::new();
        for index in self.online_cores()? {
            let path = self.core_path(index).join("cpufreq").join(attr);
            freqs.push(Frequency::from_khz(read_u64(&path)?));
        }
        FreqSpan::from_freqs(freqs).ok_or(CpuError::NoCores)
    }

    fn write_online(&self, attr: &str, freq: Frequency) -> Result<()> {
        let value = freq.khz().to_string();
        for index in self.online_cores()? {
            write_attr(&self.core_path(index).join("cpufreq").join(attr), &value)?;
        }
        Ok(())
    }
}
