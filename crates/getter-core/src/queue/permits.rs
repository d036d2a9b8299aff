//! Counting permits (a semaphore) built from `Mutex` + `Condvar`.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use super::Closed;

#[derive(Debug)]
struct State {
    available: usize,
    closed: bool,
}

/// A counting semaphore that can be closed to release every waiter.
#[derive(Debug)]
pub(super) struct Permits {
    state: Mutex<State>,
    cond: Condvar,
}

impl Permits {
    pub(super) fn new(initial: usize) -> Self {
        Self {
            state: Mutex::new(State {
                available: initial,
                closed: false,
            }),
            cond: Condvar::new(),
        }
    }

    // The guarded state is two plain fields updated atomically under the lock,
    // so a panic elsewhere cannot leave it half-written.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take one permit, blocking while none is available.
    pub(super) fn acquire(&self) -> Result<(), Closed> {
        let mut state = self.lock();
        while state.available == 0 && !state.closed {
            state = self.cond.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        if state.closed {
            return Err(Closed);
        }
        state.available -= 1;
        Ok(())
    }

    /// Return one permit and wake one waiter.
    pub(super) fn release(&self) {
        let mut state = self.lock();
        state.available += 1;
        drop(state);
        self.cond.notify_one();
    }

    #[cfg(test)]
    pub(super) fn available(&self) -> usize {
        self.lock().available
    }

    pub(super) fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Close: every current and future `acquire` fails with `Closed`.
    pub(super) fn close(&self) {
        self.lock().closed = true;
        self.cond.notify_all();
    }
}
