//! Linear operators with structural adjoints

use super::map::{FnMap, LinearMap};
use super::options::LinOpOptions;
use crate::algebra::{Algebra, Evaluate, Node, Operator, impl_algebra_ops};
use crate::dtype::Value;
use crate::error::Result;
use crate::runtime::{Device, relocation_error};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

enum LinearKind<T: Value> {
    /// A user map, possibly viewed through its adjoint
    Leaf {
        map: Arc<dyn LinearMap<T>>,
        adjoint: bool,
    },
    Node(Node<LinearOperator<T>>),
}

/// An immutable linear operator tree over values of type `T`
///
/// Leaves are forward/adjoint map pairs. Combinators follow the same rules
/// as [`Operator`]; on top of that every tree has a structural adjoint:
///
/// | Tree            | Adjoint                 |
/// |-----------------|-------------------------|
/// | `F + G`         | `Fᴴ + Gᴴ`               |
/// | `F - G`         | `Fᴴ - Gᴴ`               |
/// | `c * F`         | `c * Fᴴ`                |
/// | `F / c`         | `Fᴴ / c`                |
/// | `-F`            | `-Fᴴ`                   |
/// | `F ∘ G`         | `Gᴴ ∘ Fᴴ`               |
/// | leaf `(A, Aᴴ)`  | leaf `(Aᴴ, A)`          |
///
/// The adjoint of a leaf shares the leaf's map, so `F.H().H()` is
/// node-for-node the same tree as `F`.
///
/// Every operator carries [`LinOpOptions`]. Derived operators inherit the
/// options of their first operand.
///
/// # Example
///
/// ```
/// use linop::prelude::*;
///
/// let f = LinearOperator::<f64>::new(|x| Ok(2.0 * x), |y| Ok(2.0 * y));
///
/// assert_eq!((&f + &f).apply(&1.0)?, 4.0);
/// assert_eq!(f.H().apply(&1.0)?, 2.0);
/// assert_eq!(f.gram().apply(&1.0)?, 4.0);
/// # Ok::<(), linop::error::Error>(())
/// ```
pub struct LinearOperator<T: Value> {
    kind: Arc<LinearKind<T>>,
    options: LinOpOptions,
}

impl<T: Value> LinearOperator<T> {
    /// Create a leaf from a forward map and its adjoint, with default options
    pub fn new<F, G>(forward: F, adjoint: G) -> Self
    where
        F: Fn(&T) -> Result<T> + Send + Sync + 'static,
        G: Fn(&T) -> Result<T> + Send + Sync + 'static,
    {
        Self::with_options(forward, adjoint, LinOpOptions::default())
    }

    /// Create a leaf from a forward map and its adjoint
    pub fn with_options<F, G>(forward: F, adjoint: G, options: LinOpOptions) -> Self
    where
        F: Fn(&T) -> Result<T> + Send + Sync + 'static,
        G: Fn(&T) -> Result<T> + Send + Sync + 'static,
    {
        Self::named("linear_map", forward, adjoint).configured(options)
    }

    /// Create a leaf with a name shown in `Debug` output
    pub fn named<F, G>(name: &'static str, forward: F, adjoint: G) -> Self
    where
        F: Fn(&T) -> Result<T> + Send + Sync + 'static,
        G: Fn(&T) -> Result<T> + Send + Sync + 'static,
    {
        Self::from_map(FnMap {
            name,
            forward,
            adjoint,
        })
    }

    /// Create a self-adjoint leaf (`Aᴴ = A`)
    pub fn self_adjoint<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&T) -> Result<T> + Send + Sync + 'static,
    {
        let forward = Arc::new(f);
        let adjoint = Arc::clone(&forward);
        Self::named(name, move |x| (*forward)(x), move |y| (*adjoint)(y))
    }

    /// Create a leaf from a [`LinearMap`] implementation, with default options
    pub fn from_map<M: LinearMap<T> + 'static>(map: M) -> Self {
        Self::from_shared_map(Arc::new(map), LinOpOptions::default())
    }

    /// Create a leaf from a shared [`LinearMap`] implementation
    pub fn from_shared_map(map: Arc<dyn LinearMap<T>>, options: LinOpOptions) -> Self {
        Self {
            kind: Arc::new(LinearKind::Leaf {
                map,
                adjoint: false,
            }),
            options,
        }
    }

    /// The identity operator carrying `options`
    pub fn identity_with(options: LinOpOptions) -> Self {
        Self {
            kind: Arc::new(LinearKind::Node(Node::Composite(SmallVec::new()))),
            options,
        }
    }

    /// The same tree with different solver options
    pub fn configured(&self, options: LinOpOptions) -> Self {
        Self {
            kind: Arc::clone(&self.kind),
            options,
        }
    }

    /// Apply the operator: `A x`
    pub fn apply(&self, x: &T) -> Result<T> {
        match &*self.kind {
            LinearKind::Leaf { map, adjoint: false } => map.apply_forward(x),
            LinearKind::Leaf { map, adjoint: true } => map.apply_adjoint(x),
            LinearKind::Node(node) => {
                trace!(kind = %node.kind(), "evaluating linear node");
                node.evaluate(x, |op, v| op.apply(v))
            }
        }
    }

    /// Apply the adjoint without building the adjoint tree: `Aᴴ y`
    pub fn apply_adjoint(&self, y: &T) -> Result<T> {
        match &*self.kind {
            LinearKind::Leaf { map, adjoint: false } => map.apply_adjoint(y),
            LinearKind::Leaf { map, adjoint: true } => map.apply_forward(y),
            LinearKind::Node(Node::Composite(ops)) => {
                trace!(len = ops.len(), "evaluating adjoint composite");
                ops.iter().try_fold(y.clone(), |v, op| op.apply_adjoint(&v))
            }
            LinearKind::Node(node) => {
                trace!(kind = %node.kind(), "evaluating adjoint node");
                node.evaluate(y, |op, v| op.apply_adjoint(v))
            }
        }
    }

    /// The structural adjoint `Aᴴ`
    pub fn adjoint(&self) -> Self {
        let kind = match &*self.kind {
            LinearKind::Leaf { map, adjoint } => LinearKind::Leaf {
                map: Arc::clone(map),
                adjoint: !adjoint,
            },
            LinearKind::Node(node) => LinearKind::Node(node.adjoint_with(Self::adjoint)),
        };
        Self {
            kind: Arc::new(kind),
            options: self.options,
        }
    }

    /// Alias for [`adjoint`](Self::adjoint)
    #[inline]
    pub fn adj(&self) -> Self {
        self.adjoint()
    }

    /// Alias for [`adjoint`](Self::adjoint)
    #[allow(non_snake_case)]
    #[inline]
    pub fn H(&self) -> Self {
        self.adjoint()
    }

    /// The normal (gram) operator `Aᴴ ∘ A`
    pub fn gram(&self) -> Self {
        self.adjoint().compose(self)
    }

    /// Alias for [`gram`](Self::gram)
    #[allow(non_snake_case)]
    #[inline]
    pub fn N(&self) -> Self {
        self.gram()
    }

    /// Solver options carried by this operator
    #[inline]
    pub fn options(&self) -> LinOpOptions {
        self.options
    }

    /// Maximum solver iterations
    #[inline]
    pub fn max_iter(&self) -> usize {
        self.options.max_iter
    }

    /// Solver tolerance
    #[inline]
    pub fn tol(&self) -> f64 {
        self.options.tol
    }

    /// The combinator at the root, or `None` for a leaf
    pub fn node(&self) -> Option<&Node<LinearOperator<T>>> {
        match &*self.kind {
            LinearKind::Leaf { .. } => None,
            LinearKind::Node(node) => Some(node),
        }
    }

    /// Whether the root is a leaf
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(&*self.kind, LinearKind::Leaf { .. })
    }

    /// Whether the root is a leaf viewed through its adjoint
    #[inline]
    pub fn is_adjoint_leaf(&self) -> bool {
        matches!(&*self.kind, LinearKind::Leaf { adjoint: true, .. })
    }

    /// Whether this is the identity (an empty composite)
    pub fn is_identity(&self) -> bool {
        self.node().is_some_and(Node::is_identity)
    }

    /// Height of the tree; a leaf or the identity has depth 1
    pub fn depth(&self) -> usize {
        match &*self.kind {
            LinearKind::Leaf { .. } => 1,
            LinearKind::Node(node) => {
                1 + node
                    .operands()
                    .into_iter()
                    .map(LinearOperator::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// Whether both handles point at the same tree node
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.kind, &other.kind)
    }

    /// Whether both are leaves sharing the same map, viewed the same way
    pub fn same_leaf(&self, other: &Self) -> bool {
        match (&*self.kind, &*other.kind) {
            (
                LinearKind::Leaf { map: a, adjoint: x },
                LinearKind::Leaf { map: b, adjoint: y },
            ) => Arc::ptr_eq(a, b) && x == y,
            _ => false,
        }
    }

    /// Rebuild the tree with every relocatable map moved to `device`
    ///
    /// Maps without device state are kept unchanged. The first map that
    /// fails to relocate aborts the operation. Options are preserved.
    pub fn to(&self, device: &Device) -> Result<Self> {
        let kind = match &*self.kind {
            LinearKind::Leaf { map, adjoint } => match map.relocate(device) {
                None => {
                    debug!(map = map.name(), %device, "map has no device state, skipping");
                    return Ok(self.clone());
                }
                Some(Ok(moved)) => LinearKind::Leaf {
                    map: moved,
                    adjoint: *adjoint,
                },
                Some(Err(err)) => return Err(relocation_error(map.name(), device, err)),
            },
            LinearKind::Node(node) => LinearKind::Node(node.try_map(|op| op.to(device))?),
        };
        Ok(Self {
            kind: Arc::new(kind),
            options: self.options,
        })
    }
}

impl<T: Value> Clone for LinearOperator<T> {
    fn clone(&self) -> Self {
        Self {
            kind: Arc::clone(&self.kind),
            options: self.options,
        }
    }
}

impl<T: Value> Algebra for LinearOperator<T> {
    fn from_node(node: Node<Self>) -> Self {
        let options = node.first().map(|op| op.options).unwrap_or_default();
        Self {
            kind: Arc::new(LinearKind::Node(node)),
            options,
        }
    }

    fn identity_like(&self) -> Self {
        Self::identity_with(self.options)
    }
}

impl_algebra_ops!(LinearOperator);

impl<T: Value> LinearMap<T> for LinearOperator<T> {
    fn apply_forward(&self, x: &T) -> Result<T> {
        self.apply(x)
    }

    fn apply_adjoint(&self, y: &T) -> Result<T> {
        LinearOperator::apply_adjoint(self, y)
    }

    fn name(&self) -> &'static str {
        "linear_operator"
    }

    fn relocate(&self, device: &Device) -> Option<Result<Arc<dyn LinearMap<T>>>> {
        Some(
            self.to(device)
                .map(|op| Arc::new(op) as Arc<dyn LinearMap<T>>),
        )
    }
}

impl<T: Value> Evaluate<T> for LinearOperator<T> {
    fn evaluate(&self, x: &T) -> Result<T> {
        self.apply(x)
    }

    fn name(&self) -> &'static str {
        "linear_operator"
    }

    fn relocate(&self, device: &Device) -> Option<Result<Arc<dyn Evaluate<T>>>> {
        Some(
            self.to(device)
                .map(|op| Arc::new(op) as Arc<dyn Evaluate<T>>),
        )
    }
}

impl<T: Value> From<LinearOperator<T>> for Operator<T> {
    /// Forget the adjoint and treat the tree as a generic operator
    fn from(op: LinearOperator<T>) -> Self {
        Operator::from_evaluate(op)
    }
}

impl<T: Value> fmt::Debug for LinearOperator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.kind {
            LinearKind::Leaf { map, adjoint: false } => f.write_str(map.name()),
            LinearKind::Leaf { map, adjoint: true } => write!(f, "{}^H", map.name()),
            LinearKind::Node(node) => fmt::Debug::fmt(node, f),
        }
    }
}
