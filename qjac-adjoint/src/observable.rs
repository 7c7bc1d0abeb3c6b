//! Measurement operators for expectation-value Jacobians
//!
//! An [`Observable`] is an immutable tree over four variants: named gates
//! (PauliZ, Hadamard, ...), dense Hermitian matrices, tensor products of
//! disjoint-wire factors and real-weighted Hamiltonian sums. Sub-observables
//! are shared through `Arc`; the tree is acyclic by construction.
//!
//! Equality is structural and never crosses variants: a Named observable is
//! not equal to a Hermitian one even when their matrices coincide.

use ahash::AHashSet;
use num_complex::Complex64;
use qjac_core::{AdjointError, Result};
use qjac_state::DeviceStateVector;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
enum ObservableKind {
    Named {
        name: String,
        wires: Vec<usize>,
        params: Vec<f64>,
    },
    Hermitian {
        matrix: Vec<Complex64>,
        wires: Vec<usize>,
    },
    TensorProduct {
        factors: Vec<Arc<Observable>>,
        wires: Vec<usize>, // sorted union, precomputed at construction
    },
    Hamiltonian {
        coeffs: Vec<f64>,
        terms: Vec<Arc<Observable>>,
    },
}

/// An immutable measurement operator
///
/// # Example
/// ```
/// use qjac_adjoint::Observable;
/// use std::sync::Arc;
///
/// let z0 = Arc::new(Observable::named("PauliZ", &[0]));
/// let x1 = Arc::new(Observable::named("PauliX", &[1]));
/// let prod = Observable::tensor_product(vec![z0.clone(), x1.clone()]).unwrap();
/// assert_eq!(prod.wires(), &[0, 1]);
///
/// let ham = Observable::hamiltonian(vec![0.5, 0.5], vec![z0, x1]).unwrap();
/// assert!(ham.name().starts_with("Hamiltonian"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Observable {
    kind: ObservableKind,
}

impl Observable {
    /// A named observable acting on the given wires
    pub fn named(name: impl Into<String>, wires: &[usize]) -> Self {
        Self::named_with_params(name, wires, &[])
    }

    /// A named observable with numeric parameters
    pub fn named_with_params(name: impl Into<String>, wires: &[usize], params: &[f64]) -> Self {
        Self {
            kind: ObservableKind::Named {
                name: name.into(),
                wires: wires.to_vec(),
                params: params.to_vec(),
            },
        }
    }

    /// A dense Hermitian observable from a row-major matrix
    ///
    /// # Errors
    /// Returns [`AdjointError::DimensionMismatch`] if the matrix is not
    /// 2^k × 2^k for k wires.
    pub fn hermitian(matrix: Vec<Complex64>, wires: &[usize]) -> Result<Self> {
        let dim = 1usize << wires.len();
        if matrix.len() != dim * dim {
            return Err(AdjointError::DimensionMismatch {
                expected: dim * dim,
                actual: matrix.len(),
            });
        }
        Ok(Self {
            kind: ObservableKind::Hermitian {
                matrix,
                wires: wires.to_vec(),
            },
        })
    }

    /// A tensor product of observables acting on pairwise-disjoint wires
    ///
    /// # Errors
    /// Returns [`AdjointError::OverlappingWires`] if any two factors share
    /// a wire.
    pub fn tensor_product(factors: Vec<Arc<Observable>>) -> Result<Self> {
        let mut seen = AHashSet::new();
        for factor in &factors {
            for wire in factor.wires() {
                if !seen.insert(wire) {
                    return Err(AdjointError::OverlappingWires { wire });
                }
            }
        }
        let mut wires: Vec<usize> = seen.into_iter().collect();
        wires.sort_unstable();
        Ok(Self {
            kind: ObservableKind::TensorProduct { factors, wires },
        })
    }

    /// A Hamiltonian: a real-weighted sum of observables
    ///
    /// # Errors
    /// Returns [`AdjointError::CoefficientMismatch`] if the coefficient and
    /// term counts differ.
    pub fn hamiltonian(coeffs: Vec<f64>, terms: Vec<Arc<Observable>>) -> Result<Self> {
        if coeffs.len() != terms.len() {
            return Err(AdjointError::CoefficientMismatch {
                coeffs: coeffs.len(),
                terms: terms.len(),
            });
        }
        Ok(Self {
            kind: ObservableKind::Hamiltonian { coeffs, terms },
        })
    }

    /// Mutate a state copy to represent this observable applied to it
    ///
    /// The Hamiltonian variant accumulates coefficient-scaled term
    /// applications into a zero buffer and writes it back: O(terms)
    /// full-length copies and adds.
    pub fn apply_in_place(&self, sv: &mut DeviceStateVector) -> Result<()> {
        match &self.kind {
            ObservableKind::Named {
                name,
                wires,
                params,
            } => sv.apply_operation(name, wires, false, params, None),
            ObservableKind::Hermitian { matrix, wires } => sv.apply_matrix(matrix, wires, false),
            ObservableKind::TensorProduct { factors, .. } => {
                for factor in factors {
                    factor.apply_in_place(sv)?;
                }
                Ok(())
            },
            ObservableKind::Hamiltonian { coeffs, terms } => {
                let mut acc = DeviceStateVector::zeros(sv.num_qubits(), sv.tag());
                for (coeff, term) in coeffs.iter().zip(terms) {
                    let mut scratch = sv.clone();
                    term.apply_in_place(&mut scratch)?;
                    acc.scaled_add(Complex64::new(*coeff, 0.0), &scratch)?;
                }
                sv.update_from(&acc)
            },
        }
    }

    /// The wires this observable acts on
    ///
    /// Tensor products report the precomputed sorted union; Hamiltonians
    /// report the sorted union over their terms.
    pub fn wires(&self) -> Vec<usize> {
        match &self.kind {
            ObservableKind::Named { wires, .. } => wires.clone(),
            ObservableKind::Hermitian { wires, .. } => wires.clone(),
            ObservableKind::TensorProduct { wires, .. } => wires.clone(),
            ObservableKind::Hamiltonian { terms, .. } => {
                let mut wires: Vec<usize> = terms
                    .iter()
                    .flat_map(|term| term.wires())
                    .collect::<AHashSet<_>>()
                    .into_iter()
                    .collect();
                wires.sort_unstable();
                wires
            },
        }
    }

    /// Canonical name including wires
    pub fn name(&self) -> String {
        match &self.kind {
            ObservableKind::Named { name, wires, .. } => format!("{}{:?}", name, wires),
            ObservableKind::Hermitian { .. } => "Hermitian".to_string(),
            ObservableKind::TensorProduct { factors, .. } => factors
                .iter()
                .map(|f| f.name())
                .collect::<Vec<_>>()
                .join(" @ "),
            ObservableKind::Hamiltonian { coeffs, terms } => {
                let names: Vec<String> = terms.iter().map(|t| t.name()).collect();
                format!(
                    "Hamiltonian: {{ 'coeffs' : {:?}, 'observables' : [{}] }}",
                    coeffs,
                    names.join(", ")
                )
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qjac_state::{gates, DeviceTag};

    fn z(wire: usize) -> Arc<Observable> {
        Arc::new(Observable::named("PauliZ", &[wire]))
    }

    #[test]
    fn test_named_equality() {
        let a = Observable::named("PauliZ", &[0]);
        let b = Observable::named("PauliZ", &[0]);
        let c = Observable::named("PauliZ", &[1]);
        let d = Observable::named("PauliX", &[0]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_ne!(
            Observable::named_with_params("RZ", &[0], &[0.1]),
            Observable::named_with_params("RZ", &[0], &[0.2])
        );
    }

    #[test]
    fn test_named_never_equals_hermitian() {
        let named = Observable::named("PauliZ", &[0]);
        let hermitian = Observable::hermitian(gates::PAULI_Z.to_vec(), &[0]).unwrap();
        assert_ne!(named, hermitian);
    }

    #[test]
    fn test_tensor_product_overlapping_wires() {
        let err = Observable::tensor_product(vec![z(0), z(0)]).unwrap_err();
        assert_eq!(err, AdjointError::OverlappingWires { wire: 0 });
    }

    #[test]
    fn test_tensor_product_wires_sorted_union() {
        let prod = Observable::tensor_product(vec![z(3), z(1), z(2)]).unwrap();
        assert_eq!(prod.wires(), &[1, 2, 3]);
    }

    #[test]
    fn test_hamiltonian_length_mismatch() {
        let err = Observable::hamiltonian(vec![0.5], vec![z(0), z(1)]).unwrap_err();
        assert_eq!(err, AdjointError::CoefficientMismatch { coeffs: 1, terms: 2 });
    }

    #[test]
    fn test_hermitian_dimension_check() {
        let err = Observable::hermitian(vec![Complex64::new(1.0, 0.0); 3], &[0]).unwrap_err();
        assert_eq!(err, AdjointError::DimensionMismatch { expected: 4, actual: 3 });
    }

    #[test]
    fn test_names() {
        assert_eq!(Observable::named("PauliZ", &[1]).name(), "PauliZ[1]");
        let prod = Observable::tensor_product(vec![z(0), z(1)]).unwrap();
        assert_eq!(prod.name(), "PauliZ[0] @ PauliZ[1]");
    }

    #[test]
    fn test_hamiltonian_apply_is_weighted_sum() {
        // H = 0.5·Z(0) + 2.0·X(0) on |0⟩ gives 0.5·|0⟩ + 2.0·|1⟩
        let x0 = Arc::new(Observable::named("PauliX", &[0]));
        let ham = Observable::hamiltonian(vec![0.5, 2.0], vec![z(0), x0]).unwrap();

        let mut sv = DeviceStateVector::new(1, DeviceTag::default());
        ham.apply_in_place(&mut sv).unwrap();
        assert_relative_eq!(sv.amplitudes()[0].re, 0.5, epsilon = 1e-12);
        assert_relative_eq!(sv.amplitudes()[1].re, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tensor_product_apply() {
        // Z(0) ⊗ Z(1) on |01⟩ flips the sign once
        let prod = Arc::new(Observable::tensor_product(vec![z(0), z(1)]).unwrap());
        let mut sv = DeviceStateVector::from_amplitudes(
            &[
                Complex64::new(0.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
            ],
            DeviceTag::default(),
        )
        .unwrap();
        prod.apply_in_place(&mut sv).unwrap();
        assert_relative_eq!(sv.amplitudes()[1].re, -1.0, epsilon = 1e-12);
    }
}
