use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_complex::Complex64;
use qjac_adjoint::{AdjointJacobian, Observable};
use qjac_core::{OperationsTape, TapeOp};
use qjac_state::DeviceTag;
use std::sync::Arc;

// Layered hardware-efficient ansatz: one RX and one RY per wire per layer,
// CNOT ring between layers
fn layered_tape(num_qubits: usize, depth: usize) -> OperationsTape {
    let mut ops = Vec::with_capacity(num_qubits * depth * 3);
    for layer in 0..depth {
        for w in 0..num_qubits {
            let angle = 0.1 + 0.07 * (layer * num_qubits + w) as f64;
            ops.push(TapeOp::new("RX", &[angle], &[w]));
            ops.push(TapeOp::new("RY", &[angle * 0.5], &[w]));
        }
        for w in 0..num_qubits {
            ops.push(TapeOp::new("CNOT", &[], &[w, (w + 1) % num_qubits]));
        }
    }
    OperationsTape::new(ops)
}

fn ground_state(num_qubits: usize) -> Vec<Complex64> {
    let mut v = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
    v[0] = Complex64::new(1.0, 0.0);
    v
}

fn bench_adjoint_jacobian(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjoint_jacobian");

    for &num_qubits in [4, 8].iter() {
        let depth = 3;
        let tape = layered_tape(num_qubits, depth);
        let num_params = tape.num_parametric_ops();
        let trainable: Vec<usize> = (0..num_params).collect();
        let state = ground_state(num_qubits);
        let observables: Vec<Arc<Observable>> = (0..num_qubits)
            .map(|w| Arc::new(Observable::named("PauliZ", &[w])))
            .collect();

        group.bench_with_input(
            BenchmarkId::new(
                "full_gradient",
                format!("{}q_d{}_{}params", num_qubits, depth, num_params),
            ),
            &num_qubits,
            |b, _| {
                b.iter(|| {
                    let mut jac = vec![0.0; observables.len() * trainable.len()];
                    AdjointJacobian::new()
                        .adjoint_jacobian(
                            black_box(&state),
                            &mut jac,
                            black_box(&observables),
                            black_box(&tape),
                            &trainable,
                            true,
                            DeviceTag::default(),
                        )
                        .unwrap();
                    black_box(jac);
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_adjoint_jacobian);
criterion_main!(benches);
