//! Generic operators: any value-to-value map plus the combinator tree

use super::{Algebra, Node, impl_algebra_ops};
use crate::dtype::Value;
use crate::error::Result;
use crate::runtime::{Device, relocation_error};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A leaf operator: the numeric work at the bottom of every tree
///
/// Implementors must be reentrant; a tree may be evaluated from several
/// threads at once.
pub trait Evaluate<T: Value>: Send + Sync {
    /// Map `x` to the operator's output
    fn evaluate(&self, x: &T) -> Result<T>;

    /// Human-readable name for debugging
    fn name(&self) -> &'static str {
        "leaf"
    }

    /// Produce a copy of this leaf whose state lives on `device`
    ///
    /// Returns `None` when the leaf holds no device state; relocation then
    /// keeps the leaf as is.
    fn relocate(&self, _device: &Device) -> Option<Result<Arc<dyn Evaluate<T>>>> {
        None
    }
}

/// Closure-backed leaf
struct FnLeaf<F> {
    name: &'static str,
    f: F,
}

impl<T, F> Evaluate<T> for FnLeaf<F>
where
    T: Value,
    F: Fn(&T) -> Result<T> + Send + Sync,
{
    fn evaluate(&self, x: &T) -> Result<T> {
        (self.f)(x)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

enum Kind<T: Value> {
    Leaf(Arc<dyn Evaluate<T>>),
    Node(Node<Operator<T>>),
}

/// An immutable operator tree over values of type `T`
///
/// Cloning is cheap: operands are shared, never copied, so `a.pow(8)` holds
/// eight references to the same `a`.
///
/// # Example
///
/// ```
/// use linop::prelude::*;
///
/// let a = Operator::<f64>::from_fn(|x| Ok(x + 1.0));
/// let b = Operator::<f64>::from_fn(|x| Ok(x + 1.0));
///
/// assert_eq!((&a + &b).apply(&5.0)?, 12.0);
/// assert_eq!((2 * &a).apply(&5.0)?, 12.0);
/// assert_eq!(a.compose(&b).apply(&5.0)?, 7.0);
/// # Ok::<(), linop::error::Error>(())
/// ```
pub struct Operator<T: Value> {
    kind: Arc<Kind<T>>,
}

impl<T: Value> Operator<T> {
    /// Create a leaf from a closure
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&T) -> Result<T> + Send + Sync + 'static,
    {
        Self::named_fn("fn", f)
    }

    /// Create a leaf from a closure with a name shown in `Debug` output
    pub fn named_fn<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&T) -> Result<T> + Send + Sync + 'static,
    {
        Self::from_evaluate(FnLeaf { name, f })
    }

    /// Create a leaf from an [`Evaluate`] implementation
    pub fn from_evaluate<E: Evaluate<T> + 'static>(leaf: E) -> Self {
        Self::from_leaf(Arc::new(leaf))
    }

    /// Create a leaf from a shared [`Evaluate`] implementation
    pub fn from_leaf(leaf: Arc<dyn Evaluate<T>>) -> Self {
        Self {
            kind: Arc::new(Kind::Leaf(leaf)),
        }
    }

    /// Evaluate the tree at `x`
    pub fn apply(&self, x: &T) -> Result<T> {
        match &*self.kind {
            Kind::Leaf(leaf) => leaf.evaluate(x),
            Kind::Node(node) => {
                trace!(kind = %node.kind(), "evaluating operator node");
                node.evaluate(x, |op, v| op.apply(v))
            }
        }
    }

    /// The combinator at the root, or `None` for a leaf
    pub fn node(&self) -> Option<&Node<Operator<T>>> {
        match &*self.kind {
            Kind::Leaf(_) => None,
            Kind::Node(node) => Some(node),
        }
    }

    /// The leaf at the root, or `None` for a combinator
    pub fn leaf(&self) -> Option<&Arc<dyn Evaluate<T>>> {
        match &*self.kind {
            Kind::Leaf(leaf) => Some(leaf),
            Kind::Node(_) => None,
        }
    }

    /// Whether the root is a leaf
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(&*self.kind, Kind::Leaf(_))
    }

    /// Whether this is the identity (an empty composite)
    pub fn is_identity(&self) -> bool {
        self.node().is_some_and(Node::is_identity)
    }

    /// Height of the tree; a leaf or the identity has depth 1
    pub fn depth(&self) -> usize {
        match &*self.kind {
            Kind::Leaf(_) => 1,
            Kind::Node(node) => {
                1 + node
                    .operands()
                    .into_iter()
                    .map(Operator::depth)
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

    /// Rebuild the tree with every relocatable leaf moved to `device`
    ///
    /// Leaves without device state are kept unchanged. The first leaf that
    /// fails to relocate aborts the operation.
    pub fn to(&self, device: &Device) -> Result<Self> {
        match &*self.kind {
            Kind::Leaf(leaf) => match leaf.relocate(device) {
                None => {
                    debug!(leaf = leaf.name(), %device, "leaf has no device state, skipping");
                    Ok(self.clone())
                }
                Some(Ok(moved)) => Ok(Self::from_leaf(moved)),
                Some(Err(err)) => Err(relocation_error(leaf.name(), device, err)),
            },
            Kind::Node(node) => Ok(Self::from_node(node.try_map(|op| op.to(device))?)),
        }
    }
}

impl<T: Value> Clone for Operator<T> {
    fn clone(&self) -> Self {
        Self {
            kind: Arc::clone(&self.kind),
        }
    }
}

impl<T: Value> Algebra for Operator<T> {
    fn from_node(node: Node<Self>) -> Self {
        Self {
            kind: Arc::new(Kind::Node(node)),
        }
    }
}

impl_algebra_ops!(Operator);

impl<T: Value> Evaluate<T> for Operator<T> {
    fn evaluate(&self, x: &T) -> Result<T> {
        self.apply(x)
    }

    fn name(&self) -> &'static str {
        "operator"
    }

    fn relocate(&self, device: &Device) -> Option<Result<Arc<dyn Evaluate<T>>>> {
        Some(
            self.to(device)
                .map(|op| Arc::new(op) as Arc<dyn Evaluate<T>>),
        )
    }
}

impl<T: Value> fmt::Debug for Operator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.kind {
            Kind::Leaf(leaf) => f.write_str(leaf.name()),
            Kind::Node(node) => fmt::Debug::fmt(node, f),
        }
    }
}
