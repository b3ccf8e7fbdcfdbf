//! Metadata lookups against TMDB.
//!
//! The pipelines only need a title and a year (movies) or a name and a season
//! count (shows), plus a raw passthrough for arbitrary API paths.

pub mod tmdb;

pub use tmdb::{MovieMetadata, ShowMetadata, TmdbClient, TmdbError};
