//! Combinator nodes shared by every operator family

use crate::dtype::Value;
use crate::error::Result;
use smallvec::SmallVec;
use std::fmt;

/// Operands of a composite node, in written order
///
/// Most composites come from a single `compose` call and hold two operands.
pub type Operands<O> = SmallVec<[O; 2]>;

/// One combinator applied to operands of family `O`
///
/// `Node` is the abstract description an operator family rebuilds into a
/// concrete instance through [`Algebra::from_node`](super::Algebra::from_node).
/// The set of kinds is closed: every family handles all six.
///
/// | Kind        | Meaning                             |
/// |-------------|-------------------------------------|
/// | `Add`       | `A(x) + B(x)`                       |
/// | `Sub`       | `A(x) - B(x)`                       |
/// | `Mul`       | `c * A(x)`                          |
/// | `Div`       | `A(x) / c`                          |
/// | `Neg`       | `-A(x)`                             |
/// | `Composite` | `op₁(op₂(...opₙ(x)))`, rightmost first |
///
/// A composite with no operands is the identity.
#[derive(Clone, Debug)]
pub enum Node<O> {
    /// Sum of two operators
    Add(O, O),
    /// Difference of two operators
    Sub(O, O),
    /// Operator scaled by a real scalar
    Mul(O, f64),
    /// Operator divided by a real scalar
    Div(O, f64),
    /// Negated operator
    Neg(O),
    /// Sequential application, rightmost operand applied first
    Composite(Operands<O>),
}

/// Discriminant of a [`Node`], for logging and inspection
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `Node::Add`
    Add,
    /// `Node::Sub`
    Sub,
    /// `Node::Mul`
    Mul,
    /// `Node::Div`
    Div,
    /// `Node::Neg`
    Neg,
    /// `Node::Composite`
    Composite,
}

impl NodeKind {
    /// Short lowercase name
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Add => "add",
            NodeKind::Sub => "sub",
            NodeKind::Mul => "mul",
            NodeKind::Div => "div",
            NodeKind::Neg => "neg",
            NodeKind::Composite => "composite",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<O> Node<O> {
    /// The kind of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Add(..) => NodeKind::Add,
            Node::Sub(..) => NodeKind::Sub,
            Node::Mul(..) => NodeKind::Mul,
            Node::Div(..) => NodeKind::Div,
            Node::Neg(_) => NodeKind::Neg,
            Node::Composite(_) => NodeKind::Composite,
        }
    }

    /// Operands in written order
    pub fn operands(&self) -> Vec<&O> {
        match self {
            Node::Add(a, b) | Node::Sub(a, b) => vec![a, b],
            Node::Mul(a, _) | Node::Div(a, _) | Node::Neg(a) => vec![a],
            Node::Composite(ops) => ops.iter().collect(),
        }
    }

    /// First operand, if any
    ///
    /// Families that carry configuration inherit it from this operand.
    pub fn first(&self) -> Option<&O> {
        match self {
            Node::Add(a, _)
            | Node::Sub(a, _)
            | Node::Mul(a, _)
            | Node::Div(a, _)
            | Node::Neg(a) => Some(a),
            Node::Composite(ops) => ops.first(),
        }
    }

    /// Whether this is an empty composite (the identity operator)
    pub fn is_identity(&self) -> bool {
        matches!(self, Node::Composite(ops) if ops.is_empty())
    }

    /// Rebuild the same node over transformed operands
    ///
    /// Operand order is preserved.
    pub fn try_map<P, E>(
        &self,
        mut f: impl FnMut(&O) -> std::result::Result<P, E>,
    ) -> std::result::Result<Node<P>, E> {
        Ok(match self {
            Node::Add(a, b) => Node::Add(f(a)?, f(b)?),
            Node::Sub(a, b) => Node::Sub(f(a)?, f(b)?),
            Node::Mul(a, c) => Node::Mul(f(a)?, *c),
            Node::Div(a, c) => Node::Div(f(a)?, *c),
            Node::Neg(a) => Node::Neg(f(a)?),
            Node::Composite(ops) => {
                Node::Composite(ops.iter().map(f).collect::<std::result::Result<_, E>>()?)
            }
        })
    }

    /// Structural adjoint given the adjoint of each operand
    ///
    /// Sums, differences, real scalings and negations commute with the
    /// adjoint; a composite reverses its operand order:
    /// `(op₁ ∘ ... ∘ opₙ)ᴴ = opₙᴴ ∘ ... ∘ op₁ᴴ`.
    pub fn adjoint_with<P>(&self, mut adjoint: impl FnMut(&O) -> P) -> Node<P> {
        match self {
            Node::Add(a, b) => Node::Add(adjoint(a), adjoint(b)),
            Node::Sub(a, b) => Node::Sub(adjoint(a), adjoint(b)),
            Node::Mul(a, c) => Node::Mul(adjoint(a), *c),
            Node::Div(a, c) => Node::Div(adjoint(a), *c),
            Node::Neg(a) => Node::Neg(adjoint(a)),
            Node::Composite(ops) => Node::Composite(ops.iter().rev().map(adjoint).collect()),
        }
    }

    /// Evaluate this node by delegating to `apply` for each operand
    ///
    /// Shared operands are evaluated once per occurrence; nothing is cached.
    pub fn evaluate<T: Value>(
        &self,
        x: &T,
        mut apply: impl FnMut(&O, &T) -> Result<T>,
    ) -> Result<T> {
        match self {
            Node::Add(a, b) => apply(a, x)?.try_add(&apply(b, x)?),
            Node::Sub(a, b) => apply(a, x)?.try_sub(&apply(b, x)?),
            Node::Mul(a, c) => Ok(apply(a, x)?.scale(*c)),
            Node::Div(a, c) => Ok(apply(a, x)?.unscale(*c)),
            Node::Neg(a) => Ok(apply(a, x)?.negate()),
            Node::Composite(ops) => ops
                .iter()
                .rev()
                .try_fold(x.clone(), |y, op| apply(op, &y)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    // Operands are plain scalars acting as "multiply by k" operators
    fn apply(k: &f64, x: &f64) -> Result<f64> {
        Ok(k * x)
    }

    #[test]
    fn test_evaluate_each_kind() {
        assert_eq!(Node::Add(2.0, 3.0).evaluate(&1.0, apply).unwrap(), 5.0);
        assert_eq!(Node::Sub(2.0, 3.0).evaluate(&1.0, apply).unwrap(), -1.0);
        assert_eq!(Node::Mul(2.0, 3.0).evaluate(&1.0, apply).unwrap(), 6.0);
        assert_eq!(Node::Div(2.0, 4.0).evaluate(&1.0, apply).unwrap(), 0.5);
        assert_eq!(Node::Neg(2.0).evaluate(&1.0, apply).unwrap(), -2.0);
    }

    #[test]
    fn test_composite_applies_rightmost_first() {
        // Operands record the order they were applied in
        let node: Node<&str> = Node::Composite(smallvec!["outer", "inner"]);
        let mut seen = Vec::new();
        node.evaluate(&0.0f64, |op, x| {
            seen.push(*op);
            Ok(*x)
        })
        .unwrap();
        assert_eq!(seen, vec!["inner", "outer"]);
    }

    #[test]
    fn test_empty_composite_is_identity() {
        let node: Node<f64> = Node::Composite(SmallVec::new());
        assert!(node.is_identity());
        assert_eq!(node.first(), None);
        assert_eq!(node.evaluate(&7.0, apply).unwrap(), 7.0);
    }

    #[test]
    fn test_adjoint_reverses_composite() {
        let node: Node<&str> = Node::Composite(smallvec!["a", "b", "c"]);
        match node.adjoint_with(|op| op.to_uppercase()) {
            Node::Composite(ops) => assert_eq!(ops.as_slice(), ["C", "B", "A"]),
            other => panic!("expected composite, got {:?}", other),
        }
    }

    #[test]
    fn test_adjoint_keeps_negation() {
        let node: Node<&str> = Node::Neg("f");
        let adj = node.adjoint_with(|op| format!("{}^H", op));
        assert_eq!(adj.kind(), NodeKind::Neg);
        assert_eq!(adj.operands(), vec![&"f^H".to_string()]);
    }

    #[test]
    fn test_try_map_propagates_errors() {
        let node = Node::Add(1, 2);
        let mapped: std::result::Result<Node<i32>, String> =
            node.try_map(|v| if *v == 2 { Err("two".to_string()) } else { Ok(*v) });
        assert_eq!(mapped.unwrap_err(), "two");

        let doubled = Node::Mul(3, 0.5).try_map(|v| Ok::<_, ()>(v * 2)).unwrap();
        assert_eq!(doubled.first(), Some(&6));
        assert_eq!(doubled.kind().name(), "mul");
    }
}
