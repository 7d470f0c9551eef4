use std::fmt::Debug;
use std::sync::Arc;

use crate::error::ConfigError;

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 1024;

type TieBreakFn<TKey> = dyn Fn(&TKey, &TKey) -> bool + Send + Sync;

/// Decides which of two values with equal priorities leaves the queue first.
///
/// The function gets `(first, second)` and returns `true` if `first`
/// must be popped before `second`. It must describe a strict order,
/// must not have side effects and must not call back into the queue:
/// it runs while the queue lock is held.
///
/// Without a function no value is preferred over another,
/// so values with equal priorities leave the queue in unspecified order.
/// This is not insertion order.
///
/// ### Examples
///
/// ```
/// use priorityq::TieBreak;
///
/// let ascending = TieBreak::new(|a: &u32, b: &u32| a < b);
/// assert!(ascending.precedes(&1, &2));
/// assert!(!TieBreak::<u32>::none().precedes(&1, &2));
/// ```
pub struct TieBreak<TKey>(Option<Arc<TieBreakFn<TKey>>>);

impl<TKey> TieBreak<TKey> {
    /// Prefers no value over another.
    #[inline]
    pub fn none() -> Self {
        Self(None)
    }

    #[inline]
    pub fn new<F>(precedes: F) -> Self
    where
        F: Fn(&TKey, &TKey) -> bool + Send + Sync + 'static,
    {
        Self(Some(Arc::new(precedes)))
    }

    /// Returns `true` if `first` must leave the queue before `second`.
    #[inline]
    pub fn precedes(&self, first: &TKey, second: &TKey) -> bool {
        match &self.0 {
            Some(precedes) => precedes(first, second),
            None => false,
        }
    }
}

impl<TKey> Default for TieBreak<TKey> {
    #[inline]
    fn default() -> Self {
        Self::none()
    }
}

impl<TKey> Clone for TieBreak<TKey> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<TKey> Debug for TieBreak<TKey> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self.0 {
            Some(_) => write!(f, "TieBreak(custom)"),
            None => write!(f, "TieBreak(none)"),
        }
    }
}

/// Settings of a [`PriorityQueue`], fixed at construction.
///
/// ### Examples
///
/// ```
/// use priorityq::{Config, PriorityQueue};
///
/// let config = Config::new()
///     .with_capacity(2)
///     .with_tie_break(|a: &&str, b: &&str| a < b);
/// let queue: PriorityQueue<&str> = PriorityQueue::with_config(config).unwrap();
/// assert_eq!(queue.capacity(), 2);
/// ```
///
/// [`PriorityQueue`]: struct.PriorityQueue.html
pub struct Config<TKey> {
    /// Maximal number of distinct values in queue. Defaults to [`DEFAULT_CAPACITY`].
    ///
    /// [`DEFAULT_CAPACITY`]: constant.DEFAULT_CAPACITY.html
    pub capacity: usize,
    /// Order of values with equal priorities. Defaults to [`TieBreak::none`].
    ///
    /// [`TieBreak::none`]: struct.TieBreak.html#method.none
    pub tie_break: TieBreak<TKey>,
}

impl<TKey> Config<TKey> {
    #[inline]
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            tie_break: TieBreak::none(),
        }
    }

    #[inline]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[inline]
    pub fn with_tie_break<F>(mut self, precedes: F) -> Self
    where
        F: Fn(&TKey, &TKey) -> bool + Send + Sync + 'static,
    {
        self.tie_break = TieBreak::new(precedes);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

impl<TKey> Default for Config<TKey> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<TKey> Clone for Config<TKey> {
    fn clone(&self) -> Self {
        Self {
            capacity: self.capacity,
            tie_break: self.tie_break.clone(),
        }
    }
}

impl<TKey> Debug for Config<TKey> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("Config")
            .field("capacity", &self.capacity)
            .field("tie_break", &self.tie_break)
            .finish()
    }
}
