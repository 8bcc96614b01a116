//! Integration tests for moving operator trees between devices

use linop::prelude::*;
use std::sync::Arc;

/// Leaf holding a weight that can be uploaded to CUDA devices
struct Weighted {
    weight: f64,
}

impl Weighted {
    fn on_cpu(weight: f64) -> Self {
        Self { weight }
    }
}

impl LinearMap<f64> for Weighted {
    fn apply_forward(&self, x: &f64) -> Result<f64> {
        Ok(self.weight * x)
    }

    fn apply_adjoint(&self, y: &f64) -> Result<f64> {
        Ok(self.weight * y)
    }

    fn name(&self) -> &'static str {
        "weighted"
    }

    fn relocate(&self, device: &Device) -> Option<Result<Arc<dyn LinearMap<f64>>>> {
        if let Device::Wgpu(_) = device {
            return Some(Err(Error::internal("no adapter")));
        }
        Some(Ok(Arc::new(Weighted {
            weight: self.weight,
        })))
    }
}

impl Evaluate<f64> for Weighted {
    fn evaluate(&self, x: &f64) -> Result<f64> {
        self.apply_forward(x)
    }

    fn name(&self) -> &'static str {
        "weighted"
    }

    fn relocate(&self, device: &Device) -> Option<Result<Arc<dyn Evaluate<f64>>>> {
        // Only CUDA is supported for generic leaves
        match device {
            Device::Cuda(_) => Some(Ok(Arc::new(Weighted {
                weight: self.weight,
            }))),
            _ => Some(Err(Error::internal(format!("{} unsupported", device)))),
        }
    }
}

fn describe(op: &LinearOperator<f64>) -> String {
    format!("{:?}", op)
}

#[test]
fn test_linear_relocation_preserves_behaviour() {
    let a = LinearOperator::from_map(Weighted::on_cpu(3.0));
    let b = LinearOperator::<f64>::self_adjoint("double", |x| Ok(2.0 * x));
    let expr = (a.compose(&b) - &b).configured(LinOpOptions::new(9, 1e-5));

    let moved = expr.to(&Device::Cuda(0)).unwrap();
    assert_eq!(moved.apply(&1.0).unwrap(), expr.apply(&1.0).unwrap());
    assert_eq!(moved.H().apply(&1.0).unwrap(), expr.H().apply(&1.0).unwrap());
    assert_eq!(moved.options(), expr.options());
    assert_eq!(describe(&moved), describe(&expr));
    assert!(!moved.ptr_eq(&expr));
}

#[test]
fn test_relocation_keeps_adjoint_view() {
    let a = LinearOperator::named("skew", |x: &f64| Ok(3.0 * x), |y: &f64| Ok(5.0 * y));
    let moved = a.H().to(&Device::Cuda(1)).unwrap();
    assert!(moved.is_adjoint_leaf());
    assert_eq!(moved.apply(&1.0).unwrap(), 5.0);
}

#[test]
fn test_non_relocatable_leaves_are_skipped() {
    let a = LinearOperator::<f64>::self_adjoint("double", |x| Ok(2.0 * x));
    let moved = a.to(&Device::Cuda(0)).unwrap();
    // Closure leaves have no device state: the same leaf is kept
    assert!(moved.ptr_eq(&a));
}

#[test]
fn test_relocation_failure_is_reported() {
    let a = LinearOperator::from_map(Weighted::on_cpu(3.0));
    let expr = &a + &a.H();
    match expr.to(&Device::Wgpu(0)) {
        Err(Error::Relocation {
            operand,
            device,
            reason,
        }) => {
            assert_eq!(operand, "weighted");
            assert_eq!(device, Device::Wgpu(0));
            assert!(reason.contains("no adapter"));
        }
        other => panic!("expected relocation error, got {:?}", other),
    }
}

#[test]
fn test_generic_operator_relocation() {
    let weighted = Operator::from_evaluate(Weighted::on_cpu(4.0));
    let plain = Operator::<f64>::from_fn(|x| Ok(x - 1.0));
    let expr = weighted.compose(&plain) * 0.5;

    let moved = expr.to(&Device::Cuda(2)).unwrap();
    assert_eq!(moved.apply(&3.0).unwrap(), 4.0);

    let err = expr.to(&Device::Cpu).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to relocate 'weighted' to cpu: Internal error: cpu unsupported"
    );
}

#[test]
fn test_nested_operator_relocation_keeps_inner_error() {
    let inner = Operator::from_evaluate(Weighted::on_cpu(1.0));
    let outer = Operator::from_evaluate(inner.clone() + inner);
    match outer.to(&Device::Wgpu(3)) {
        Err(Error::Relocation { operand, .. }) => assert_eq!(operand, "weighted"),
        other => panic!("expected relocation error, got {:?}", other),
    }
}

#[test]
fn test_device_recorded_on_relocated_leaf() {
    struct Probe(Device);

    impl Evaluate<f64> for Probe {
        fn evaluate(&self, _x: &f64) -> Result<f64> {
            Ok(self.0.id() as f64)
        }

        fn relocate(&self, device: &Device) -> Option<Result<Arc<dyn Evaluate<f64>>>> {
            Some(Ok(Arc::new(Probe(*device))))
        }
    }

    let op = Operator::from_evaluate(Probe(Device::Cpu)) * 1;
    assert_eq!(op.apply(&0.0).unwrap(), 0.0);
    assert_eq!(op.to(&Device::Cuda(3)).unwrap().apply(&0.0).unwrap(), 3.0);
}
