//! # Coefficient cache
//!
//! Bounded LRU map from the canonical parameter tuple
//! `(Lx, Ly, grid, modes, shape)` to a shared `ModalCoefficientTable`.
//!
//! Each key owns a `OnceLock`: the first caller computes the table, concurrent
//! callers for the same key block on the lock and receive the same `Arc`.
//! The map mutex is never held while a table is computed, so different keys are
//! computed in parallel.
//!
//! ```rust
//! use PDEKit::WaveEquation::coefficient_cache::CoefficientCache;
//! use PDEKit::WaveEquation::fourier_modal::ModalDomain;
//! use PDEKit::WaveEquation::initial_shapes::{GaussianPluck, InitialShape};
//!
//! let cache = CoefficientCache::new(8);
//! let shape: InitialShape = GaussianPluck::new(0.6, 0.4, 0.1).into();
//! let table = cache.get_or_compute(&ModalDomain::new(1.0, 1.0, 50, 20), &shape).unwrap();
//! assert_eq!(table.coefficients.shape(), (20, 20));
//! ```

use super::fourier_modal::{ModalCoefficientTable, ModalDomain, compute_table};
use super::initial_shapes::{Displacement, InitialShape, ShapeKey, canonical_bits};
use crate::solver_error::SolverResult;
use log::debug;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

pub const DEFAULT_CACHE_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoefficientKey {
    lx: u64,
    ly: u64,
    grid_points: usize,
    modes: usize,
    shape: ShapeKey,
}

impl CoefficientKey {
    pub fn new(domain: &ModalDomain, shape: &InitialShape) -> Self {
        Self {
            lx: canonical_bits(domain.lx),
            ly: canonical_bits(domain.ly),
            grid_points: domain.grid_points,
            modes: domain.modes,
            shape: shape.cache_key(),
        }
    }
}

type Slot = Arc<OnceLock<Arc<ModalCoefficientTable>>>;

#[derive(Debug, Default)]
struct CacheState {
    slots: HashMap<CoefficientKey, Slot>,
    /// front = least recently used
    order: VecDeque<CoefficientKey>,
}

impl CacheState {
    fn touch(&mut self, key: &CoefficientKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(*key);
    }
}

#[derive(Debug)]
pub struct CoefficientCache {
    capacity: usize,
    state: Mutex<CacheState>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl Default for CoefficientCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl CoefficientCache {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // the state is only a map of Arcs, it cannot be left half-updated
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validates the inputs, then returns the cached table or computes it once.
    pub fn get_or_compute(
        &self,
        domain: &ModalDomain,
        shape: &InitialShape,
    ) -> SolverResult<Arc<ModalCoefficientTable>> {
        domain.validate()?;
        shape.validate()?;
        let key = CoefficientKey::new(domain, shape);

        let slot = {
            let mut state = self.lock();
            let slot = match state.slots.get(&key) {
                Some(slot) => slot.clone(),
                None => {
                    let slot: Slot = Arc::new(OnceLock::new());
                    state.slots.insert(key, slot.clone());
                    slot
                }
            };
            state.touch(&key);
            while state.order.len() > self.capacity {
                if let Some(evicted) = state.order.pop_front() {
                    state.slots.remove(&evicted);
                    debug!("coefficient cache evicted {:?}", evicted);
                }
            }
            slot
        };

        let mut computed = false;
        let table = slot
            .get_or_init(|| {
                computed = true;
                Arc::new(compute_table(domain, shape))
            })
            .clone();
        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        Ok(table)
    }

    pub fn contains(&self, domain: &ModalDomain, shape: &InitialShape) -> bool {
        let key = CoefficientKey::new(domain, shape);
        self.lock()
            .slots
            .get(&key)
            .map(|slot| slot.get().is_some())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.slots.clear();
        state.order.clear();
    }
}

static SHARED_CACHE: OnceLock<CoefficientCache> = OnceLock::new();

/// Process-wide cache with `DEFAULT_CACHE_CAPACITY` entries.
pub fn shared_cache() -> &'static CoefficientCache {
    SHARED_CACHE.get_or_init(CoefficientCache::default)
}
