pub mod batch;
pub mod document;
pub mod outcome;
pub mod submission;

pub use batch::{Batch, BatchPhase, BatchStatus};
pub use document::{CaptureOrigin, DocumentHandle, DocumentId, MediaType};
pub use outcome::{RecognitionOutcome, Score};
pub use submission::{ItemState, ItemStateKind, ProgressHint, SubmissionItem};
