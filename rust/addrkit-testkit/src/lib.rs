//! Test utilities and helpers for the addrkit crates.
//!
//! This crate provides:
//! - Small reference address allocators, each declaring a different set of
//!   optional capabilities
//! - A call log recording every primitive an allocator receives
//! - Batch generation for randomized tests
//!
//! # Usage
//!
//! This crate is intended for use within the addrkit test suites only.

pub mod batching;
pub mod call_log;
pub mod data_gen;
pub mod linear;
pub mod pool;
pub mod ring;

pub use batching::BatchingPoolAllocator;
pub use call_log::{Call, CallLog};
pub use linear::LinearAllocator;
pub use pool::PoolAllocator;
pub use ring::RingAllocator;

use addrkit_alloc_traits::Address;
use num_traits::NumCast;

/// Converts a `usize` quantity into an address, mapping overflow to `INVALID`.
pub fn to_addr<A: Address>(value: usize) -> A {
    <A as NumCast>::from(value).unwrap_or(A::INVALID)
}

/// Converts an address quantity into a `usize`, saturating on overflow.
pub fn to_usize<A: Address>(value: A) -> usize {
    value.to_usize().unwrap_or(usize::MAX)
}
