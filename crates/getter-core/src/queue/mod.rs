//! Bounded blocking FIFO used to hand chunk tasks from the producer to workers.
//!
//! Classic bounded producer/consumer: a "slots free" permit count starting at
//! `capacity`, an "items ready" permit count starting at 0, and a mutex over
//! the ring indices. `put` blocks while the queue is full, `get` blocks while
//! it is empty. At any instant `len == items ready == capacity - slots free`
//! once in-flight operations settle.
//!
//! `close` is the cancellation path: it wakes every blocked producer and
//! consumer and makes all further `put`/`get` calls fail with [`Closed`].

mod permits;

use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use permits::Permits;

/// Returned by queue operations once the queue has been closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("queue closed")]
pub struct Closed;

/// Construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("queue capacity must be at least 1")]
    ZeroCapacity,
}

#[derive(Debug)]
struct Ring<T> {
    slots: Vec<Option<T>>,
    start: usize,
    end: usize,
    len: usize,
}

impl<T> Ring<T> {
    fn push(&mut self, item: T) {
        let cap = self.slots.len();
        debug_assert!(self.len < cap, "slot permit granted on a full ring");
        self.slots[self.end] = Some(item);
        self.end = (self.end + 1) % cap;
        self.len += 1;
    }

    fn pop(&mut self) -> T {
        let cap = self.slots.len();
        let item = self.slots[self.start]
            .take()
            .expect("item permit granted on an empty ring");
        self.start = (self.start + 1) % cap;
        self.len -= 1;
        item
    }
}

/// Fixed-capacity, thread-safe FIFO with blocking backpressure in both directions.
///
/// Share it by reference (e.g. with `std::thread::scope`) or behind an `Arc`.
/// Dropping the queue drops any items still inside it.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    ring: Mutex<Ring<T>>,
    slots_free: Permits,
    items_ready: Permits,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Allocate a queue holding at most `capacity` items.
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Ok(Self {
            ring: Mutex::new(Ring {
                slots,
                start: 0,
                end: 0,
                len: 0,
            }),
            slots_free: Permits::new(capacity),
            items_ready: Permits::new(0),
            capacity,
        })
    }

    fn ring(&self) -> MutexGuard<'_, Ring<T>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `item` at the tail, blocking while the queue is full.
    ///
    /// Returns once the item is enqueued. If the queue is (or becomes) closed
    /// while waiting, the item is dropped and `Closed` is returned.
    pub fn put(&self, item: T) -> Result<(), Closed> {
        self.slots_free.acquire()?;
        self.ring().push(item);
        self.items_ready.release();
        Ok(())
    }

    /// Remove and return the head item, blocking while the queue is empty.
    pub fn get(&self) -> Result<T, Closed> {
        self.items_ready.acquire()?;
        let item = self.ring().pop();
        self.slots_free.release();
        Ok(item)
    }

    /// Close the queue and wake every blocked `put`/`get`.
    pub fn close(&self) {
        self.slots_free.close();
        self.items_ready.close();
    }

    pub fn is_closed(&self) -> bool {
        self.items_ready.is_closed()
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        self.ring().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
