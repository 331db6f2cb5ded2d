//! Package sources.
//!
//! Currently only the compiler's local package cache, used to pin the
//! constraint-style dependencies of package projects.

pub mod cache;

pub use cache::PackageCache;
