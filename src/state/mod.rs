//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `PdfCandidate`: A PDF link found during the crawl, with the depth it was found at
//! - `Outcome`: The terminal state of one candidate (persisted, merged, filtered out or failed)
//! - `DownloadResult`: A candidate paired with its outcome

mod candidate;
mod outcome;

pub use candidate::PdfCandidate;
pub use outcome::{DownloadResult, FilterStage, ItemError, Outcome};
