//! Storage, cache and job-queue ports with in-process implementations.
//!
//! The lookup service only talks to the [`GstinStore`], [`FlagCache`] and
//! [`JobDispatcher`] traits. The implementations here keep everything in
//! process memory; a deployment backed by a database, Redis or a job
//! server plugs in its own.

mod cache;
#[cfg(feature = "queue")]
mod dispatch;
mod queue;
mod store;

pub use cache::{
    FlagCache, MemoryCache, RECENTLY_CHECKED_TTL, SERVER_ERROR_KEY, SERVER_ERROR_TTL, Suppressions,
};
#[cfg(feature = "queue")]
pub use dispatch::TokioDispatcher;
pub use queue::{DeferredDispatcher, EnqueueOptions, Job, JobDispatcher, Queue};
pub use store::{GstinStore, MemoryStore};
