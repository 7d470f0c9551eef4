//! This is bounded thread-safe priority queue that supports changing priority
//! and removing of any queued value.
//!
//! It uses IndexMap and own implementation of binary heap to achieve this,
//! and a single reader/writer lock to share it between threads.
//!
//! Each queued value is unique, and has associated *priority*.
//! Values must be hashable; priorities must implement Ord trait
//! and are `i64` unless other type is chosen.
//!
//! Popping returns value with biggest priority.
//! Adding a new value puts it into queue, adding already queued value changes its priority.
//! Also it is possible to change priority or delete value without popping it.
//! Values with equal priorities are ordered by optional [`TieBreak`] function.
//!
//! Add, pop, update priority, delete have ***O(log n)*** time complexity;
//! peek and lookup by value are ***O(1)***.
//!
//! Queue never blocks waiting for values or free space:
//! popping empty queue or adding new value into full one returns [`QueueError`] immediately.
//!
//! # Examples
//!
//! Workers pick jobs with the nearest deadline.
//! Dispatcher may move job deadline or cancel job while it is still queued.
//! Jobs with the same deadline are taken by job id.
//!
//! [`TieBreak`]: struct.TieBreak.html
//! [`QueueError`]: enum.QueueError.html
//!
//! ```
//! use priorityq::{Config, PriorityQueue, QueueError};
//! use std::sync::Mutex;
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
//! struct JobId(u32);
//!
//! // Nearest deadline must be popped first, so deadline is negated.
//! fn priority(deadline: i64) -> i64 {
//!     -deadline
//! }
//!
//! let jobs: PriorityQueue<JobId> = PriorityQueue::with_config(
//!     Config::new()
//!         .with_capacity(16)
//!         .with_tie_break(|a: &JobId, b: &JobId| a < b),
//! )
//! .unwrap();
//!
//! for (id, deadline) in [(1, 50), (2, 10), (3, 30), (4, 10), (5, 70)] {
//!     jobs.add(JobId(id), priority(deadline)).unwrap();
//! }
//!
//! // Job 5 became urgent, job 3 was cancelled.
//! jobs.update_priority(&JobId(5), priority(0)).unwrap();
//! jobs.delete(&JobId(3)).unwrap();
//! assert_eq!(jobs.delete(&JobId(3)), Err(QueueError::NotFound));
//! assert_eq!(jobs.peek(), Ok((JobId(5), 0)));
//!
//! let done = Mutex::new(Vec::new());
//! std::thread::scope(|s| {
//!     for _ in 0..2 {
//!         s.spawn(|| {
//!             while let Ok(job) = jobs.pop() {
//!                 done.lock().unwrap().push(job);
//!             }
//!         });
//!     }
//! });
//!
//! let mut done = done.into_inner().unwrap();
//! done.sort();
//! assert_eq!(done, [JobId(1), JobId(2), JobId(4), JobId(5)]);
//! assert_eq!(jobs.pop(), Err(QueueError::Underflow));
//! ```
//!

mod config;
mod editable_binary_heap;
mod error;
mod mediator;
mod priority_queue;
mod store;

pub use crate::config::{Config, TieBreak, DEFAULT_CAPACITY};
pub use crate::error::{ConfigError, QueueError};
pub use crate::priority_queue::PriorityQueue;

#[doc = include_str!("../../Readme.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
