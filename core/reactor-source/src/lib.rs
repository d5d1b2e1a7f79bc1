//! Remote data sources for reactor-export.
//!
//! The exporter only reads from the Reactor API, through the
//! [`RemoteSource`] capability trait:
//! - [`ReactorClient`] talks to the real API over HTTP
//! - [`MemorySource`] serves in-memory fixtures with identical paging
//!
//! List operations are paged. [`collect_all`] keeps requesting pages until
//! the source reports the last one, so collections larger than
//! [`MAX_PAGE_SIZE`] are fetched completely.

mod client;
mod error;
mod memory;
mod source;

pub use client::{ReactorClient, ReactorConfig};
pub use error::{SourceError, SourceResult};
pub use memory::{MemorySource, Operation};
pub use source::{
    DEFAULT_PAGE_SIZE, Document, MAX_PAGE_SIZE, Page, PageMeta, PageRequest, Pagination,
    RemoteSource, collect_all,
};
