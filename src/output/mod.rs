//! Output module for harvest events and reports
//!
//! This module handles:
//! - Streaming progress events through [`HarvestObserver`]
//! - Drawing a terminal progress bar ([`ProgressObserver`])
//! - Collecting the final [`HarvestReport`]
//! - Printing a human-readable summary

mod observer;
mod progress;
mod report;

pub use observer::{HarvestObserver, NoopObserver, TracingObserver};
pub use progress::ProgressObserver;
pub use report::{print_report, HarvestReport};
