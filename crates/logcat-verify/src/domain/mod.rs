//! Domain model for log verification.
//!
//! - `RecordedEvent`: one analytics event reassembled from the log
//! - `Extraction`: everything pulled out of a single log file
//! - `ExtractError` / `VerifyError`: error taxonomy

pub mod error;
pub mod event;

pub use error::{ExtractError, Result, VerifyError};
pub use event::{Extraction, RecordedEvent, SaveFailure};
