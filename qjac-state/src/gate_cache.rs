//! Cache of gate matrices keyed by name and parameter value
//!
//! Each state vector owns one cache on its device, so repeated applications
//! of the same parametric gate (a common pattern in layered circuits) reuse
//! the device-resident matrix instead of rebuilding it.

use crate::gates;
use ahash::AHashMap;
use num_complex::Complex64;
use std::sync::Arc;

/// Key identifying a cached gate: name plus the exact parameter value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GateKey {
    name: String,
    param_bits: u64,
}

impl GateKey {
    fn new(name: &str, param: f64) -> Self {
        Self {
            name: name.to_string(),
            param_bits: param.to_bits(),
        }
    }
}

/// Handle to a cached, device-resident matrix
pub type MatrixHandle = Arc<Vec<Complex64>>;

/// Per-device cache of gate matrices
///
/// # Example
/// ```
/// use qjac_state::GateCache;
///
/// let cache = GateCache::with_defaults();
/// assert!(cache.lookup("PauliX", 0.0).is_some());
/// assert!(cache.lookup("RX", 0.3).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct GateCache {
    gates: AHashMap<GateKey, MatrixHandle>,
}

impl GateCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            gates: AHashMap::new(),
        }
    }

    /// Create a cache pre-populated with the fixed gate set
    ///
    /// Identity, the Paulis, Hadamard, S, T, SWAP, CNOT, CZ, Toffoli and
    /// CSWAP, all keyed with parameter 0.0.
    pub fn with_defaults() -> Self {
        let mut cache = Self::new();
        cache.insert("Identity", 0.0, gates::IDENTITY.to_vec());
        cache.insert("PauliX", 0.0, gates::PAULI_X.to_vec());
        cache.insert("PauliY", 0.0, gates::PAULI_Y.to_vec());
        cache.insert("PauliZ", 0.0, gates::PAULI_Z.to_vec());
        cache.insert("Hadamard", 0.0, gates::HADAMARD.to_vec());
        cache.insert("S", 0.0, gates::S_GATE.to_vec());
        cache.insert("T", 0.0, gates::T_GATE.to_vec());
        cache.insert("SWAP", 0.0, gates::SWAP.to_vec());
        cache.insert("CNOT", 0.0, gates::CNOT.to_vec());
        cache.insert("CZ", 0.0, gates::CZ.to_vec());
        cache.insert("Toffoli", 0.0, gates::toffoli());
        cache.insert("CSWAP", 0.0, gates::cswap());
        cache
    }

    /// Look up a cached matrix
    pub fn lookup(&self, name: &str, param: f64) -> Option<MatrixHandle> {
        self.gates.get(&GateKey::new(name, param)).cloned()
    }

    /// Check whether a gate is cached
    pub fn contains(&self, name: &str, param: f64) -> bool {
        self.gates.contains_key(&GateKey::new(name, param))
    }

    /// Insert a host matrix, replacing any existing entry
    pub fn insert(&mut self, name: &str, param: f64, matrix: Vec<Complex64>) -> MatrixHandle {
        let handle = Arc::new(matrix);
        self.gates.insert(GateKey::new(name, param), Arc::clone(&handle));
        handle
    }

    /// Number of cached matrices
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

impl Default for GateCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}
