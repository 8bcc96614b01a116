//! Execution targets for operator trees
//!
//! Operators never own compute resources themselves. Leaves that hold
//! device-resident state (precomputed kernels, masks, weights) can opt into
//! relocation; everything else travels with the tree unchanged.
//!
//! ```text
//! Operator tree
//! ├── Node (Add, Sub, Mul, Div, Neg, Composite) - no device state
//! └── Leaf  ── relocate(&Device) ─┬─ None         → skipped
//!                                 ├─ Some(Ok(..)) → replaced
//!                                 └─ Some(Err(..))→ Error::Relocation
//! ```

mod device;

pub use device::Device;

use crate::error::Error;

/// Attach the failing operand and target device to a relocation failure
///
/// Errors that already describe a relocation pass through unchanged, so a
/// failure deep inside a nested tree keeps the name of the operand that failed.
pub(crate) fn relocation_error(operand: &str, device: &Device, err: Error) -> Error {
    match err {
        err @ Error::Relocation { .. } => err,
        other => Error::Relocation {
            operand: operand.to_string(),
            device: *device,
            reason: other.to_string(),
        },
    }
}
