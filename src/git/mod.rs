pub mod blame;
pub mod diff;
pub mod log;
pub mod metadata;
pub mod query;
pub mod repository;

#[cfg(test)]
pub mod testing;

pub use repository::{GitRepository, SharedRepo};
