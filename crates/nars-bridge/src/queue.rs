//! FIFO of commands waiting for the writer task

use nars_core::{NarsError, Result};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Queue length above which a warning is logged
pub const HIGH_WATER_MARK: usize = 0xff;

#[derive(Debug, Default)]
struct Inner {
    commands: VecDeque<String>,
    /// Set while above the high-water mark, so the warning fires once per excursion
    over_limit: bool,
    /// Set once by `close`; later pushes are refused
    closed: bool,
}

/// Result of an accepted push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pushed {
    /// Queue length after the push
    pub len: usize,
    /// True if this push took the queue above [`HIGH_WATER_MARK`]
    pub crossed_high_water: bool,
}

/// Unbounded, serialized FIFO shared by producers and the writer task
///
/// Growth past [`HIGH_WATER_MARK`] is logged but never refused. Once
/// closed, the queue stays empty.
#[derive(Debug, Default)]
pub struct CommandQueue {
    inner: Mutex<Inner>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append to the tail
    ///
    /// Fails with [`NarsError::Terminated`] after [`close`](CommandQueue::close).
    pub fn push(&self, command: String) -> Result<Pushed> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(NarsError::Terminated);
        }
        inner.commands.push_back(command);
        let len = inner.commands.len();
        let mut crossed_high_water = false;
        if len > HIGH_WATER_MARK {
            if !inner.over_limit {
                inner.over_limit = true;
                crossed_high_water = true;
                warn!(
                    "Command queue exceeded {} entries (n={}), last command: {:?}",
                    HIGH_WATER_MARK,
                    len,
                    inner.commands.back()
                );
            }
        } else {
            inner.over_limit = false;
        }
        Ok(Pushed {
            len,
            crossed_high_water,
        })
    }

    /// Take the oldest command
    pub fn pop(&self) -> Option<String> {
        let mut inner = self.lock();
        let command = inner.commands.pop_front();
        if inner.commands.len() <= HIGH_WATER_MARK {
            inner.over_limit = false;
        }
        command
    }

    pub fn len(&self) -> usize {
        self.lock().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().commands.is_empty()
    }

    /// Drop every pending command, returning how many were dropped
    pub fn clear(&self) -> usize {
        let mut inner = self.lock();
        let dropped = inner.commands.len();
        inner.commands.clear();
        inner.over_limit = false;
        dropped
    }

    /// Refuse further pushes and drop what is pending, in one step
    pub fn close(&self) -> usize {
        let mut inner = self.lock();
        inner.closed = true;
        let dropped = inner.commands.len();
        inner.commands.clear();
        inner.over_limit = false;
        dropped
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Copy of the pending commands, oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().commands.iter().cloned().collect()
    }
}
