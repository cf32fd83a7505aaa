//! Best-effort web fetching: SSRF guards, capped HTTP retrieval, and
//! visible-text extraction for keyword scanning.

pub mod client;
pub mod guard;
pub mod text;

pub use client::{FetchedPage, PageFetcher};
pub use guard::{validate_target, GuardError};
pub use text::{extract_page_text, PageText};
