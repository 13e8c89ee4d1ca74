//! Snapsight Worker
//!
//! Everything behind the queue: the [`MessageQueue`] abstraction and its SQS implementation,
//! the [`AnalysisHandler`] that runs detection on a stored upload, and the [`QueueConsumer`]
//! loop that feeds it.

pub mod analysis;
pub mod consumer;
pub mod queue;
pub mod sqs;

pub use analysis::{AnalysisHandler, AnalysisOutcome, AnalysisReport, PassOutcome};
pub use consumer::QueueConsumer;
pub use queue::{MessageQueue, QueueError, QueueRecord};
pub use sqs::SqsQueue;
