//! Uniform adaptation layer over address allocators.
//!
//! An address allocator hands out integer offsets into a fixed backing range
//! rather than raw pointers. Allocator strategies differ in what they support
//! beyond single-item allocate/free: batched operations, arbitrary-order frees,
//! a null (absent) backing buffer, or a translation from allocated to real
//! addresses. This crate lets generic code talk to any of them through one
//! surface.
//!
//! # Modules
//!
//! - [`address`]: the [`Address`] width trait and its `INVALID` sentinel.
//! - [`allocator`]: the [`AddressAllocator`] trait concrete allocators implement.
//! - [`capability`]: build-time probing of the optional members an allocator declares.
//! - [`policy`]: fallback implementations used for undeclared members.
//! - [`traits`]: the [`AddressAllocatorTraits`] facade callers go through.

pub mod address;
pub mod allocator;
pub mod capability;
pub mod policy;
pub mod traits;

pub use address::Address;
pub use allocator::{AddressAllocator, MultiAllocFn, MultiFreeFn, RealAddrFn};
pub use capability::Capabilities;
pub use traits::AddressAllocatorTraits;
