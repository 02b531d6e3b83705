pub mod error;
pub mod traits;
pub mod types;
pub mod writer;

pub use error::QueueError;
pub use traits::FragmentSink;
pub use types::{WriteCallback, WriteRequest, WriterState, WriterStats};
pub use writer::QueuedWriter;
