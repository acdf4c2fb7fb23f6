//! Infrastructure layer - Storage, cache and backend implementations

pub mod backend;
pub mod cache;
pub mod logging;
pub mod storage;
