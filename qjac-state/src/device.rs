//! Device identity and the process-wide device pool
//!
//! Every state vector is bound to a [`DeviceTag`]; operations combining two
//! state vectors check the tags and fail with a device-consistency error if
//! they differ. The [`DevicePool`] tracks which devices are free and hands
//! them out one per shard worker; acquisition blocks until a device frees.

use parking_lot::{Condvar, Mutex};
use qjac_core::{AdjointError, Result};

/// Identity of the device (and stream) a state vector lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceTag {
    device_id: usize,
    stream_id: usize,
}

impl DeviceTag {
    /// Create a tag for a device and stream
    pub fn new(device_id: usize, stream_id: usize) -> Self {
        Self {
            device_id,
            stream_id,
        }
    }

    /// The device identifier
    pub fn device_id(&self) -> usize {
        self.device_id
    }

    /// The stream identifier
    pub fn stream_id(&self) -> usize {
        self.stream_id
    }
}

/// Process-wide registry of devices with availability tracking
///
/// The pool outlives any single computation; shard workers acquire a device
/// at shard start and the returned [`DeviceGuard`] releases it when dropped,
/// on every exit path.
///
/// # Example
/// ```
/// use qjac_state::DevicePool;
///
/// let pool = DevicePool::new(2);
/// let guard = pool.acquire();
/// assert!(guard.device_id() < 2);
/// drop(guard);
/// assert_eq!(pool.available_devices(), 2);
/// ```
pub struct DevicePool {
    free: Mutex<Vec<bool>>,
    freed: Condvar,
    total: usize,
}

impl DevicePool {
    /// Create a pool tracking `total` devices, all initially free
    pub fn new(total: usize) -> Self {
        Self {
            free: Mutex::new(vec![true; total]),
            freed: Condvar::new(),
            total,
        }
    }

    /// Number of devices the pool tracks
    pub fn total_devices(&self) -> usize {
        self.total
    }

    /// Number of devices currently free
    pub fn available_devices(&self) -> usize {
        self.free.lock().iter().filter(|f| **f).count()
    }

    /// Acquire a device, blocking until one is free
    pub fn acquire(&self) -> DeviceGuard<'_> {
        let mut free = self.free.lock();
        loop {
            if let Some(id) = free.iter().position(|f| *f) {
                free[id] = false;
                return DeviceGuard { pool: self, id };
            }
            self.freed.wait(&mut free);
        }
    }

    /// Acquire a device without blocking
    ///
    /// # Errors
    /// Returns [`AdjointError::DevicePoolExhausted`] if no device is free.
    pub fn try_acquire(&self) -> Result<DeviceGuard<'_>> {
        let mut free = self.free.lock();
        match free.iter().position(|f| *f) {
            Some(id) => {
                free[id] = false;
                Ok(DeviceGuard { pool: self, id })
            },
            None => Err(AdjointError::DevicePoolExhausted { total: self.total }),
        }
    }

    fn release(&self, id: usize) {
        let mut free = self.free.lock();
        free[id] = true;
        self.freed.notify_one();
    }
}

/// Exclusive hold on one pool device, released on drop
pub struct DeviceGuard<'a> {
    pool: &'a DevicePool,
    id: usize,
}

impl DeviceGuard<'_> {
    /// The identifier of the held device
    pub fn device_id(&self) -> usize {
        self.id
    }
}

impl Drop for DeviceGuard<'_> {
    fn drop(&mut self) {
        self.pool.release(self.id);
    }
}
