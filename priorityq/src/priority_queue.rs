use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{ConfigError, QueueError};
use crate::store::IndexedHeap;

/// A bounded priority queue that can be shared between threads
/// and supports changing priority or removing any queued value.
///
/// Bigger `TPriority` values will have more priority.
/// Values are unique: adding a value that is already queued only updates its priority.
///
/// Reads ([`peek`], [`len`], lookups) take a shared lock,
/// everything that changes the queue takes an exclusive one.
/// No operation ever waits for the queue contents to change:
/// empty and full queues are reported with [`QueueError`] right away.
///
/// It is logic error if key values changes somehow while in queue.
/// This changes normally possible only through `Cell`, `RefCell`, global state, IO, or unsafe code.
///
/// [`peek`]: struct.PriorityQueue.html#method.peek
/// [`len`]: struct.PriorityQueue.html#method.len
/// [`QueueError`]: enum.QueueError.html
///
/// # Examples
///
/// ```
/// use priorityq::{Config, PriorityQueue, QueueError};
///
/// let queue: PriorityQueue<&str> =
///     PriorityQueue::with_config(Config::new().with_capacity(3)).unwrap();
///
/// queue.add("Second", 4).unwrap();
/// queue.add("Third", 3).unwrap();
/// queue.add("First", 5).unwrap();
/// assert_eq!(queue.add("Fourth", 2), Err(QueueError::Overflow { capacity: 3 }));
///
/// // Peek does not remove anything
/// assert_eq!(queue.peek(), Ok(("First", 5)));
/// assert_eq!(queue.len(), 3);
///
/// // Adding queued value changes its priority even if queue is full
/// queue.add("Third", 10).unwrap();
/// assert_eq!(queue.pop(), Ok("Third"));
///
/// queue.update_priority(&"Second", -1).unwrap();
/// assert_eq!(queue.pop(), Ok("First"));
/// assert_eq!(queue.pop(), Ok("Second"));
/// assert_eq!(queue.pop(), Err(QueueError::Underflow));
/// ```
pub struct PriorityQueue<TKey, TPriority = i64, S = RandomState>
where
    TKey: Hash + Eq,
    TPriority: Ord,
    S: BuildHasher,
{
    store: RwLock<IndexedHeap<TKey, TPriority, S>>,
    capacity: usize,
}

impl<TKey: Hash + Eq, TPriority: Ord> PriorityQueue<TKey, TPriority, RandomState> {
    /// Creates an empty queue with [`DEFAULT_CAPACITY`] and no tie-break.
    ///
    /// [`DEFAULT_CAPACITY`]: constant.DEFAULT_CAPACITY.html
    ///
    /// ### Examples
    ///
    /// ```
    /// use priorityq::PriorityQueue;
    /// let queue: PriorityQueue<&str> = PriorityQueue::new();
    /// queue.add("Key", 4).unwrap();
    /// assert_eq!(queue.capacity(), 1024);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::from_valid_config(Config::new(), RandomState::default())
    }

    /// Creates an empty queue with given settings.
    ///
    /// ### Errors
    ///
    /// Fails if configuration is invalid, see [`Config::validate`].
    ///
    /// [`Config::validate`]: struct.Config.html#method.validate
    #[inline]
    pub fn with_config(config: Config<TKey>) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, RandomState::default())
    }
}

impl<TKey: Hash + Eq, TPriority: Ord, S: BuildHasher> PriorityQueue<TKey, TPriority, S> {
    /// Creates an empty queue with given settings and specific Hasher for value lookup.
    ///
    /// ### Examples
    ///
    /// ```
    /// use priorityq::{Config, PriorityQueue};
    /// use std::collections::hash_map::RandomState;
    /// let queue: PriorityQueue<u32, i64, RandomState> =
    ///     PriorityQueue::with_config_and_hasher(Config::new(), RandomState::new()).unwrap();
    /// queue.add(1, 4).unwrap();
    /// ```
    pub fn with_config_and_hasher(config: Config<TKey>, hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config, hasher))
    }

    fn from_valid_config(config: Config<TKey>, hasher: S) -> Self {
        debug!(capacity = config.capacity, tie_break = ?config.tie_break, "priority queue created");
        Self {
            store: RwLock::new(IndexedHeap::new(config.tie_break, hasher)),
            capacity: config.capacity,
        }
    }

    /// Adds new value to queue or changes priority of already queued one.
    /// In second case doesn't replace the stored value.
    ///
    /// ### Errors
    ///
    /// [`QueueError::Overflow`] if `key` is new and queue already holds `capacity` values.
    /// Queue is left untouched in that case.
    ///
    /// [`QueueError::Overflow`]: enum.QueueError.html#variant.Overflow
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***, amortized over reallocations of the backing storage.
    pub fn add(&self, key: TKey, priority: TPriority) -> Result<(), QueueError> {
        let mut store = self.store.write();
        if let Some(slot) = store.slot_of(&key) {
            store.update(slot, priority);
            trace!(len = store.len(), "priority updated by add");
            return Ok(());
        }
        if store.len() >= self.capacity {
            return Err(QueueError::Overflow {
                capacity: self.capacity,
            });
        }
        store.push(key, priority);
        trace!(len = store.len(), "value added");
        Ok(())
    }

    /// Same as [`add`] with `TPriority::default()` priority, which is `0` for integers.
    ///
    /// [`add`]: struct.PriorityQueue.html#method.add
    #[inline]
    pub fn add_default(&self, key: TKey) -> Result<(), QueueError>
    where
        TPriority: Default,
    {
        self.add(key, TPriority::default())
    }

    /// Removes queued value wherever it is in the queue.
    ///
    /// ### Errors
    ///
    /// [`QueueError::NotFound`] if `key` is not queued.
    ///
    /// [`QueueError::NotFound`]: enum.QueueError.html#variant.NotFound
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***
    pub fn delete<Q>(&self, key: &Q) -> Result<(), QueueError>
    where
        TKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut store = self.store.write();
        let slot = store.slot_of(key).ok_or(QueueError::NotFound)?;
        store
            .remove(slot)
            .ok_or(QueueError::InvariantViolation("value was removed"))?;
        trace!(len = store.len(), "value deleted");
        Ok(())
    }

    /// Removes value with the maximal priority and returns it.
    ///
    /// ### Errors
    ///
    /// [`QueueError::Underflow`] if queue is empty.
    ///
    /// [`QueueError::Underflow`]: enum.QueueError.html#variant.Underflow
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***
    #[inline]
    pub fn pop(&self) -> Result<TKey, QueueError> {
        let (key, _) = self.pop_entry()?;
        Ok(key)
    }

    /// Same as [`pop`] but also returns priority of removed value.
    ///
    /// [`pop`]: struct.PriorityQueue.html#method.pop
    pub fn pop_entry(&self) -> Result<(TKey, TPriority), QueueError> {
        let mut store = self.store.write();
        if store.is_empty() {
            return Err(QueueError::Underflow);
        }
        let entry = store
            .pop()
            .ok_or(QueueError::InvariantViolation("value was removed"))?;
        trace!(len = store.len(), "value popped");
        Ok(entry)
    }

    /// Returns copy of the value with maximal priority and its priority
    /// without removing them.
    ///
    /// ### Errors
    ///
    /// [`QueueError::Underflow`] if queue is empty.
    ///
    /// [`QueueError::Underflow`]: enum.QueueError.html#variant.Underflow
    ///
    /// ### Time complexity
    ///
    /// Always ***O(1)***
    pub fn peek(&self) -> Result<(TKey, TPriority), QueueError>
    where
        TKey: Clone,
        TPriority: Clone,
    {
        let store = self.store.read();
        let (key, priority) = store.peek().ok_or(QueueError::Underflow)?;
        Ok((key.clone(), priority.clone()))
    }

    /// Changes priority of queued value.
    ///
    /// ### Errors
    ///
    /// [`QueueError::NotFound`] if `key` is not queued.
    ///
    /// [`QueueError::NotFound`]: enum.QueueError.html#variant.NotFound
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***
    pub fn update_priority<Q>(&self, key: &Q, priority: TPriority) -> Result<(), QueueError>
    where
        TKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut store = self.store.write();
        let slot = store.slot_of(key).ok_or(QueueError::NotFound)?;
        store.update(slot, priority);
        trace!(len = store.len(), "priority updated");
        Ok(())
    }

    /// Returns copy of priority of queued value.
    ///
    /// ### Examples
    ///
    /// ```
    /// use priorityq::PriorityQueue;
    /// let queue: PriorityQueue<String> = PriorityQueue::new();
    /// queue.add("first".to_string(), 5).unwrap();
    /// assert_eq!(queue.get_priority("first"), Some(5));
    /// assert_eq!(queue.get_priority("second"), None);
    /// ```
    pub fn get_priority<Q>(&self, key: &Q) -> Option<TPriority>
    where
        TKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        TPriority: Clone,
    {
        let store = self.store.read();
        let slot = store.slot_of(key)?;
        Some(store.get_priority(slot).clone())
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        TKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.read().slot_of(key).is_some()
    }

    /// Number of queued values.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Maximal number of distinct values queue can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all values.
    pub fn clear(&self) {
        self.store.write().clear();
    }

    /// Consumes queue and returns its entries in the order `pop` would return them.
    ///
    /// ### Examples
    ///
    /// ```
    /// use priorityq::PriorityQueue;
    /// let queue: PriorityQueue<char> = PriorityQueue::new();
    /// queue.add('a', 1).unwrap();
    /// queue.add('b', 3).unwrap();
    /// queue.add('c', 2).unwrap();
    /// assert_eq!(queue.into_sorted_vec(), [('b', 3), ('c', 2), ('a', 1)]);
    /// ```
    pub fn into_sorted_vec(self) -> Vec<(TKey, TPriority)> {
        let mut store = self.store.into_inner();
        let mut sorted = Vec::with_capacity(store.len());
        while let Some(entry) = store.pop() {
            sorted.push(entry);
        }
        sorted
    }
}

impl<TKey: Hash + Eq, TPriority: Ord> Default for PriorityQueue<TKey, TPriority, RandomState> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<TKey, TPriority, S> Debug for PriorityQueue<TKey, TPriority, S>
where
    TKey: Hash + Eq + Debug,
    TPriority: Ord + Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("PriorityQueue")
            .field("capacity", &self.capacity)
            .field("entries", &*self.store.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::PriorityQueue;
    use crate::config::Config;
    use crate::error::{ConfigError, QueueError};
    use crate::store::tests::assert_invariants;

    fn queue_with_capacity<TK: std::hash::Hash + Eq>(capacity: usize) -> PriorityQueue<TK> {
        PriorityQueue::with_config(Config::new().with_capacity(capacity))
            .expect("capacity is positive")
    }

    #[test]
    fn test_priority() {
        let mut items = [1, 4, 5, 2, 3];
        let queue: PriorityQueue<i32> = PriorityQueue::new();
        for (i, &x) in items.iter().enumerate() {
            queue.add(x, x as i64).unwrap();
            assert_eq!(queue.len(), i + 1);
        }
        items.sort_unstable_by_key(|&x| -x);
        for &x in items.iter() {
            assert_eq!(queue.pop(), Ok(x));
        }
        assert_eq!(queue.pop(), Err(QueueError::Underflow));
        assert_eq!(queue.peek(), Err(QueueError::Underflow));
    }

    #[test]
    fn test_capacity_one_scenario() {
        let queue = queue_with_capacity::<&str>(1);
        assert_eq!(queue.add("A", 0), Ok(()));
        assert_eq!(queue.peek(), Ok(("A", 0)));
        assert_eq!(queue.add("A", 1), Ok(()));
        assert_eq!(queue.peek(), Ok(("A", 1)));
        assert_eq!(queue.add("B", 0), Err(QueueError::Overflow { capacity: 1 }));
        assert_eq!(queue.delete(&"A"), Ok(()));
        assert_eq!(queue.pop(), Err(QueueError::Underflow));
    }

    #[test]
    fn test_tie_break_by_value() {
        let queue: PriorityQueue<u32> = PriorityQueue::with_config(
            Config::new()
                .with_capacity(10)
                .with_tie_break(|a: &u32, b: &u32| a < b),
        )
        .unwrap();
        for &(value, priority) in [(6, 3), (1, 1), (4, 2), (2, 1), (5, 3), (3, 2)].iter() {
            queue.add(value, priority).unwrap();
        }
        let popped: Vec<_> = std::iter::from_fn(|| queue.pop_entry().ok()).collect();
        assert_eq!(
            popped,
            [(5, 3), (6, 3), (3, 2), (4, 2), (1, 1), (2, 1)]
        );
    }

    #[test]
    fn test_overflow_leaves_queue_untouched() {
        let queue = queue_with_capacity::<u32>(3);
        for i in 0..3 {
            queue.add(i, i as i64).unwrap();
        }
        assert_eq!(queue.add(99, 1000), Err(QueueError::Overflow { capacity: 3 }));
        assert_eq!(queue.len(), 3);
        assert!(!queue.contains(&99));
        assert_eq!(queue.peek(), Ok((2, 2)));
        assert_invariants(&*queue.store.read());
    }

    #[test]
    fn test_update_never_overflows() {
        let queue = queue_with_capacity::<u32>(2);
        queue.add(1, 1).unwrap();
        queue.add(2, 2).unwrap();
        queue.add(1, 10).unwrap();
        queue.update_priority(&2, 20).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek(), Ok((2, 20)));
    }

    #[test]
    fn test_add_default_priority() {
        let queue: PriorityQueue<&str> = PriorityQueue::new();
        queue.add_default("zero").unwrap();
        queue.add("negative", -1).unwrap();
        assert_eq!(queue.get_priority(&"zero"), Some(0));
        assert_eq!(queue.pop(), Ok("zero"));
    }

    #[test]
    fn test_delete_and_update_missing() {
        let queue: PriorityQueue<&str> = PriorityQueue::new();
        queue.add("a", 1).unwrap();
        queue.add("b", 2).unwrap();
        assert_eq!(queue.delete(&"c"), Err(QueueError::NotFound));
        assert_eq!(queue.update_priority(&"c", 5), Err(QueueError::NotFound));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek(), Ok(("b", 2)));

        assert_eq!(queue.delete(&"b"), Ok(()));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.delete(&"b"), Err(QueueError::NotFound));
        assert_eq!(queue.peek(), Ok(("a", 1)));
    }

    #[test]
    fn test_update_reorders_immediately() {
        let queue: PriorityQueue<&str> = PriorityQueue::new();
        for &(k, p) in [("first", 5), ("second", 4), ("third", 3)].iter() {
            queue.add(k, p).unwrap();
        }
        queue.update_priority(&"third", 10).unwrap();
        assert_eq!(queue.peek(), Ok(("third", 10)));
        queue.update_priority(&"third", 0).unwrap();
        assert_eq!(queue.peek(), Ok(("first", 5)));
        assert_invariants(&*queue.store.read());
        assert_eq!(
            queue.into_sorted_vec(),
            [("first", 5), ("second", 4), ("third", 0)]
        );
    }

    #[test]
    fn test_remove_change_tree() {
        let queue: PriorityQueue<u32> = PriorityQueue::new();
        for &(k, p) in [(0, -300), (1, -500), (2, -400), (3, -400), (4, -600), (5, -100), (6, -200)]
            .iter()
        {
            queue.add(k, p).unwrap();
        }
        queue.delete(&1).unwrap();
        assert_invariants(&*queue.store.read());

        let priorities: Vec<_> = queue.into_sorted_vec().into_iter().map(|(_, p)| p).collect();
        assert_eq!(priorities, [-100, -200, -300, -400, -400, -600]);
    }

    #[test]
    fn test_borrowed_keys() {
        let queue: PriorityQueue<String> = PriorityQueue::new();
        queue.add("Hello".to_string(), 5).unwrap();
        assert!(queue.contains("Hello"));
        queue.update_priority("Hello", 6).unwrap();
        assert_eq!(queue.get_priority("Hello"), Some(6));
        queue.delete("Hello").unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear() {
        let queue = queue_with_capacity::<u32>(2);
        queue.add(1, 1).unwrap();
        queue.add(2, 2).unwrap();
        queue.clear();
        assert!(queue.is_empty());
        queue.add(3, 3).unwrap();
        queue.add(4, 4).unwrap();
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = PriorityQueue::<u32>::with_config(Config::new().with_capacity(0));
        assert_eq!(result.err(), Some(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_default() {
        let queue: PriorityQueue<u32> = Default::default();
        assert_eq!(queue.capacity(), crate::DEFAULT_CAPACITY);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<PriorityQueue<i32, i32>>();
    }

    #[test]
    fn test_send() {
        fn assert_send<T: Send>() {}
        assert_send::<PriorityQueue<i32, i32>>();
    }

    #[test]
    fn test_fmt() {
        let queue = queue_with_capacity::<&str>(4);
        queue.add("low", 1).unwrap();
        queue.add("high", 2).unwrap();
        assert_eq!(
            format!("{:?}", queue),
            "PriorityQueue { capacity: 4, entries: [(\"high\", 2), (\"low\", 1)] }"
        );
    }

    #[test]
    fn test_concurrent_producers_and_consumers() {
        const PRODUCERS: u32 = 4;
        const PER_PRODUCER: u32 = 250;

        let queue = queue_with_capacity::<u32>((PRODUCERS * PER_PRODUCER) as usize);
        std::thread::scope(|s| {
            for producer in 0..PRODUCERS {
                let queue = &queue;
                s.spawn(move || {
                    for i in 0..PER_PRODUCER {
                        let value = producer * PER_PRODUCER + i;
                        queue.add(value, (value % 17) as i64).unwrap();
                        let _ = queue.peek();
                    }
                });
            }
        });
        assert_eq!(queue.len(), (PRODUCERS * PER_PRODUCER) as usize);
        assert_invariants(&*queue.store.read());

        let popped = std::sync::Mutex::new(Vec::new());
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    while let Ok(value) = queue.pop() {
                        popped.lock().unwrap().push(value);
                    }
                });
            }
        });
        let mut popped = popped.into_inner().unwrap();
        popped.sort_unstable();
        assert_eq!(popped, (0..PRODUCERS * PER_PRODUCER).collect::<Vec<_>>());
        assert_eq!(queue.pop(), Err(QueueError::Underflow));
    }

    #[test]
    fn test_concurrent_delete_and_update() {
        let queue = queue_with_capacity::<u32>(1000);
        for i in 0..1000 {
            queue.add(i, i as i64).unwrap();
        }
        std::thread::scope(|s| {
            s.spawn(|| {
                for i in (0..1000).step_by(2) {
                    queue.delete(&i).unwrap();
                }
            });
            s.spawn(|| {
                for i in (1..1000).step_by(2) {
                    queue.update_priority(&i, -(i as i64)).unwrap();
                }
            });
        });
        assert_eq!(queue.len(), 500);
        assert_invariants(&*queue.store.read());
        assert_eq!(queue.peek(), Ok((1, -1)));
    }
}
