use crate::error::QueueError;

/// Performs one physical write of a fragment.
///
/// Called from a blocking thread, never concurrently with itself when driven
/// by a [`QueuedWriter`](crate::QueuedWriter).
pub trait FragmentSink<F>: Send + Sync {
    type Error: From<QueueError> + std::fmt::Display + Send + 'static;

    fn persist(&self, fragment: F) -> Result<(), Self::Error>;
}
