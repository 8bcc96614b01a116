//! Forward/adjoint map pairs: the leaves of linear operator trees

use crate::dtype::Value;
use crate::error::Result;
use crate::runtime::Device;
use std::sync::Arc;

/// A linear map together with its adjoint
///
/// For every `x` and `y` the pair should satisfy `⟨A x, y⟩ = ⟨x, Aᴴ y⟩`.
/// Nothing checks this; an inconsistent pair simply yields wrong adjoints
/// and gram operators.
pub trait LinearMap<T: Value>: Send + Sync {
    /// Apply the map: `A x`
    fn apply_forward(&self, x: &T) -> Result<T>;

    /// Apply the adjoint: `Aᴴ y`
    fn apply_adjoint(&self, y: &T) -> Result<T>;

    /// Human-readable name for debugging
    fn name(&self) -> &'static str {
        "linear_map"
    }

    /// Produce a copy of this map whose state lives on `device`
    ///
    /// Returns `None` when the map holds no device state.
    fn relocate(&self, _device: &Device) -> Option<Result<Arc<dyn LinearMap<T>>>> {
        None
    }
}

/// Closure-backed forward/adjoint pair
pub(crate) struct FnMap<F, G> {
    pub(crate) name: &'static str,
    pub(crate) forward: F,
    pub(crate) adjoint: G,
}

impl<T, F, G> LinearMap<T> for FnMap<F, G>
where
    T: Value,
    F: Fn(&T) -> Result<T> + Send + Sync,
    G: Fn(&T) -> Result<T> + Send + Sync,
{
    fn apply_forward(&self, x: &T) -> Result<T> {
        (self.forward)(x)
    }

    fn apply_adjoint(&self, y: &T) -> Result<T> {
        (self.adjoint)(y)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
