//! Build-time probing of the optional members an allocator declares.
//!
//! Every probe reads an associated constant, so the results are known at
//! compile time and the dispatch built on top of them has no runtime cost.

use serde::{Deserialize, Serialize};

use crate::allocator::AddressAllocator;

/// Batch cap used when the allocator declares no `MAX_MULTI_OPS`.
pub const DEFAULT_MAX_MULTI_OPS: u32 = 256;

pub const DEFAULT_SUPPORTS_ARBITRARY_ORDER_FREES: bool = true;

pub const DEFAULT_SUPPORTS_NULL_BUFFER: bool = false;

pub const fn has_supports_arbitrary_order_frees<A: AddressAllocator>() -> bool {
    A::SUPPORTS_ARBITRARY_ORDER_FREES.is_some()
}

pub const fn has_max_multi_ops<A: AddressAllocator>() -> bool {
    A::MAX_MULTI_OPS.is_some()
}

pub const fn has_supports_null_buffer<A: AddressAllocator>() -> bool {
    A::SUPPORTS_NULL_BUFFER.is_some()
}

pub const fn has_multi_alloc_addr<A: AddressAllocator>() -> bool {
    A::MULTI_ALLOC_ADDR.is_some()
}

pub const fn has_multi_free_addr<A: AddressAllocator>() -> bool {
    A::MULTI_FREE_ADDR.is_some()
}

pub const fn has_get_real_addr<A: AddressAllocator>() -> bool {
    A::GET_REAL_ADDR.is_some()
}

/// Resolved capability view of an allocator type.
///
/// The `has_*` fields report whether the type declares the member itself;
/// the remaining fields hold the effective values after defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    pub has_supports_arbitrary_order_frees: bool,
    pub has_max_multi_ops: bool,
    pub has_supports_null_buffer: bool,
    pub has_multi_alloc_addr: bool,
    pub has_multi_free_addr: bool,
    pub has_get_real_addr: bool,
    pub supports_arbitrary_order_frees: bool,
    pub max_multi_ops: u32,
    pub supports_null_buffer: bool,
}

impl Capabilities {
    pub const fn probe<A: AddressAllocator>() -> Capabilities {
        Capabilities {
            has_supports_arbitrary_order_frees: has_supports_arbitrary_order_frees::<A>(),
            has_max_multi_ops: has_max_multi_ops::<A>(),
            has_supports_null_buffer: has_supports_null_buffer::<A>(),
            has_multi_alloc_addr: has_multi_alloc_addr::<A>(),
            has_multi_free_addr: has_multi_free_addr::<A>(),
            has_get_real_addr: has_get_real_addr::<A>(),
            supports_arbitrary_order_frees: match A::SUPPORTS_ARBITRARY_ORDER_FREES {
                Some(value) => value,
                None => DEFAULT_SUPPORTS_ARBITRARY_ORDER_FREES,
            },
            max_multi_ops: match A::MAX_MULTI_OPS {
                Some(value) => value,
                None => DEFAULT_MAX_MULTI_OPS,
            },
            supports_null_buffer: match A::SUPPORTS_NULL_BUFFER {
                Some(value) => value,
                None => DEFAULT_SUPPORTS_NULL_BUFFER,
            },
        }
    }

    /// `true` when the type declares none of the optional members.
    pub const fn is_bare(&self) -> bool {
        !(self.has_supports_arbitrary_order_frees
            || self.has_max_multi_ops
            || self.has_supports_null_buffer
            || self.has_multi_alloc_addr
            || self.has_multi_free_addr
            || self.has_get_real_addr)
    }
}
