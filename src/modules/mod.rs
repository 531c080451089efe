//! Package modules
//!
//! apt/dpkg command construction and the stale-kernel selection built on
//! top of it.

pub mod kernels;
pub mod packages;
