//! Device identity

use std::fmt;

/// Identifies a compute unit an operator's leaf state can live on
///
/// Relocation only ever targets a device; actually moving data is the
/// responsibility of each leaf (see `Evaluate::relocate` and
/// `LinearMap::relocate`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Device {
    /// Host memory
    #[default]
    Cpu,
    /// NVIDIA GPU with the given ordinal
    Cuda(usize),
    /// WebGPU adapter with the given ordinal
    Wgpu(usize),
}

impl Device {
    /// Ordinal of this device within its backend (always 0 for CPU)
    #[inline]
    pub fn id(&self) -> usize {
        match self {
            Device::Cpu => 0,
            Device::Cuda(id) | Device::Wgpu(id) => *id,
        }
    }

    /// Backend name without the ordinal
    pub fn backend(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda(_) => "cuda",
            Device::Wgpu(_) => "wgpu",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Check if two devices are the same
    #[inline]
    pub fn is_same(&self, other: &Self) -> bool {
        self == other
    }

    /// Whether this is host memory
    #[inline]
    pub fn is_cpu(&self) -> bool {
        matches!(self, Device::Cpu)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            other => write!(f, "{}:{}", other.backend(), other.id()),
        }
    }
}
