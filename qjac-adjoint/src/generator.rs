//! Registry of gate generators and their scaling coefficients
//!
//! A parametric gate U(θ) satisfies dU/dθ = i·c·G·U, where G is the gate's
//! Hermitian generator and c a fixed real coefficient (−0.5 for the
//! exp(−iθ/2·G) rotation families, +1 for phase shifts). The registry maps
//! gate names to the pair (generator action, coefficient); the sweep engine
//! applies the action to its scratch bra state and folds the coefficient
//! into the Jacobian update.

use qjac_core::{AdjointError, Result};
use qjac_state::gates::generators;
use qjac_state::DeviceStateVector;

/// Applies a gate's generator to a state in place
pub type GeneratorFn = fn(&mut DeviceStateVector, &[usize], bool) -> Result<()>;

/// One registry entry: the generator action and its scaling coefficient
#[derive(Debug, Clone, Copy)]
pub struct GeneratorEntry {
    /// Parametric gate name
    pub name: &'static str,
    /// Generator application
    pub apply: GeneratorFn,
    /// Real scaling coefficient from the gate definition
    pub coefficient: f64,
}

fn rx(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_pauli_x(wires, adj)
}

fn ry(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_pauli_y(wires, adj)
}

fn rz(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_pauli_z(wires, adj)
}

fn phase_shift(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::P11, wires, adj)
}

fn ising_xx(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::ising_xx(), wires, adj)
}

fn ising_yy(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::ising_yy(), wires, adj)
}

fn ising_zz(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::ising_zz(), wires, adj)
}

fn crx(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::crx(), wires, adj)
}

fn cry(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::cry(), wires, adj)
}

fn crz(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::crz(), wires, adj)
}

fn controlled_phase_shift(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::controlled_phase_shift(), wires, adj)
}

fn single_excitation(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::single_excitation(), wires, adj)
}

fn single_excitation_minus(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::single_excitation_minus(), wires, adj)
}

fn single_excitation_plus(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::single_excitation_plus(), wires, adj)
}

fn double_excitation(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::double_excitation(), wires, adj)
}

fn double_excitation_minus(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::double_excitation_minus(), wires, adj)
}

fn double_excitation_plus(sv: &mut DeviceStateVector, wires: &[usize], adj: bool) -> Result<()> {
    sv.apply_matrix(&generators::double_excitation_plus(), wires, adj)
}

fn multi_rz(sv: &mut DeviceStateVector, wires: &[usize], _adj: bool) -> Result<()> {
    // Z⊗...⊗Z is real and diagonal; the adjoint is itself
    sv.apply_generator_multi_rz(wires)
}

/// The generator registry, one entry per supported parametric gate family
pub static GENERATORS: &[GeneratorEntry] = &[
    GeneratorEntry { name: "RX", apply: rx, coefficient: -0.5 },
    GeneratorEntry { name: "RY", apply: ry, coefficient: -0.5 },
    GeneratorEntry { name: "RZ", apply: rz, coefficient: -0.5 },
    GeneratorEntry { name: "PhaseShift", apply: phase_shift, coefficient: 1.0 },
    GeneratorEntry { name: "CRX", apply: crx, coefficient: -0.5 },
    GeneratorEntry { name: "CRY", apply: cry, coefficient: -0.5 },
    GeneratorEntry { name: "CRZ", apply: crz, coefficient: -0.5 },
    GeneratorEntry {
        name: "ControlledPhaseShift",
        apply: controlled_phase_shift,
        coefficient: 1.0,
    },
    GeneratorEntry { name: "IsingXX", apply: ising_xx, coefficient: -0.5 },
    GeneratorEntry { name: "IsingYY", apply: ising_yy, coefficient: -0.5 },
    GeneratorEntry { name: "IsingZZ", apply: ising_zz, coefficient: -0.5 },
    GeneratorEntry {
        name: "SingleExcitation",
        apply: single_excitation,
        coefficient: -0.5,
    },
    GeneratorEntry {
        name: "SingleExcitationMinus",
        apply: single_excitation_minus,
        coefficient: -0.5,
    },
    GeneratorEntry {
        name: "SingleExcitationPlus",
        apply: single_excitation_plus,
        coefficient: -0.5,
    },
    GeneratorEntry {
        name: "DoubleExcitation",
        apply: double_excitation,
        coefficient: -0.5,
    },
    GeneratorEntry {
        name: "DoubleExcitationMinus",
        apply: double_excitation_minus,
        coefficient: -0.5,
    },
    GeneratorEntry {
        name: "DoubleExcitationPlus",
        apply: double_excitation_plus,
        coefficient: -0.5,
    },
    GeneratorEntry { name: "MultiRZ", apply: multi_rz, coefficient: -0.5 },
];

/// Look up the generator entry for a parametric gate
///
/// # Errors
/// Returns [`AdjointError::UnknownGenerator`] for unregistered names.
pub fn lookup(name: &str) -> Result<&'static GeneratorEntry> {
    GENERATORS
        .iter()
        .find(|entry| entry.name == name)
        .ok_or_else(|| AdjointError::UnknownGenerator {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_names() {
        assert_eq!(lookup("RX").unwrap().coefficient, -0.5);
        assert_eq!(lookup("PhaseShift").unwrap().coefficient, 1.0);
        assert_eq!(lookup("ControlledPhaseShift").unwrap().coefficient, 1.0);
        assert_eq!(lookup("DoubleExcitationPlus").unwrap().coefficient, -0.5);
    }

    #[test]
    fn test_lookup_unknown_name() {
        let err = lookup("Rot").unwrap_err();
        assert_eq!(err, AdjointError::UnknownGenerator { name: "Rot".into() });
    }

    #[test]
    fn test_registry_covers_every_family_once() {
        let mut names: Vec<&str> = GENERATORS.iter().map(|e| e.name).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);
        assert_eq!(before, 18);
    }
}
