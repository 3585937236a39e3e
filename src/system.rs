//! This module provides ways to get information about, and configure, a
//! running Linux system
//!
//! # Stability
//!
//! Linux has 3 ideas of stability for sysfs, documented [here][1]
//!
//! Everything used here is either 'Stable' or 'Testing', but which attributes
//! exist depends on the hardware and the cpufreq driver in use.
//!
//! [1]: https://www.kernel.org/doc/Documentation/ABI/README
pub mod cpu;
