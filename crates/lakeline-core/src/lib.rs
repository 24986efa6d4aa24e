//! Lakeline Core - layer materialization pipeline
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Implements the four-stage pipeline that turns Parquet data sitting in
//! object storage into managed catalog tables:
//!
//! 1. Provision the table bucket (create-if-absent, fatal on error)
//! 2. Provision the namespace inside it (same policy)
//! 3. Register schema-on-read external tables over the Parquet locations
//! 4. Materialize a managed table per source via a CTAS query
//!
//! All remote services sit behind `async_trait` seams (see [`remote`]) so
//! the pipeline can be exercised against in-memory fakes. The pipeline is
//! strictly sequential: one remote call at a time, with fixed delays
//! injected through a [`clock::Clock`].

pub mod clock;
pub mod config;
pub mod discover;
pub mod pipeline;
pub mod provision;
pub mod query;
pub mod register;
pub mod remote;
pub mod sql;
pub mod typemap;

pub use config::PipelineConfig;
pub use pipeline::PipelineDriver;
pub use typemap::TypeMapper;
