//! Value types that operators map between
//!
//! The algebra is generic over any [`Value`]: scalars, complex scalars,
//! flat `Vec` signals, nested `Vec`s, and (with the `f16` feature) half
//! precision floats.

pub mod complex;
mod value;

pub use complex::{Complex64, Complex128};
pub use value::Value;

#[cfg(feature = "rayon")]
pub use value::PARALLEL_MIN_LEN;
