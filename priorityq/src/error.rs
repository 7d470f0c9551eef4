use thiserror::Error;

/// Errors returned by [`PriorityQueue`] operations.
///
/// All of them are reported immediately: no operation waits for the queue
/// to change, and a failed operation leaves the queue exactly as it was.
///
/// [`PriorityQueue`]: struct.PriorityQueue.html
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Tried to add a new value to a full queue.
    /// Updating priority of a queued value never fails this way.
    #[error("overflow: queue is at capacity {capacity}")]
    Overflow {
        /// Configured capacity of the queue.
        capacity: usize,
    },

    /// Tried to pop or peek an empty queue.
    #[error("underflow: queue is empty")]
    Underflow,

    /// Value to delete or update is not in the queue.
    #[error("value not found")]
    NotFound,

    /// Heap and lookup table disagree with each other.
    /// This is a bug in the queue, not a caller error.
    #[error("invariant violated: {0}")]
    InvariantViolation(&'static str),
}

/// Errors returned while validating a [`Config`].
///
/// [`Config`]: struct.Config.html
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("capacity must be at least 1")]
    ZeroCapacity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            QueueError::Overflow { capacity: 3 }.to_string(),
            "overflow: queue is at capacity 3"
        );
        assert_eq!(QueueError::Underflow.to_string(), "underflow: queue is empty");
        assert_eq!(QueueError::NotFound.to_string(), "value not found");
        assert_eq!(
            QueueError::InvariantViolation("value was removed").to_string(),
            "invariant violated: value was removed"
        );
        assert_eq!(
            ConfigError::ZeroCapacity.to_string(),
            "capacity must be at least 1"
        );
    }

    #[test]
    fn test_is_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<QueueError>();
        assert_error::<ConfigError>();
    }
}
