//! Data types shared across the crawler.

pub mod job;
pub mod page;

pub use job::{Job, JobResult, Outcome};
pub use page::PageContent;
