//! Fallback implementations for optional allocator members.
//!
//! The functions here match the [`MultiAllocFn`], [`MultiFreeFn`] and
//! [`RealAddrFn`] shapes, so they can stand in for a native member. The
//! `resolve_*` functions pick the native member when the allocator declares
//! one and the fallback otherwise; they are `const` and are evaluated once
//! per allocator type.

use num_traits::Zero;

use crate::{
    address::Address,
    allocator::{AddressAllocator, MultiAllocFn, MultiFreeFn, RealAddrFn},
};

/// Allocates every slot of `out_addresses` still holding `INVALID` with the
/// single-item primitive, in index order.
///
/// Slots already holding an address are left untouched, so a partially
/// failed batch can be retried with the same arrays. A failed slot stays
/// `INVALID`; the remaining slots are still attempted.
pub fn multi_alloc_addr<A: AddressAllocator>(
    alloc: &mut A,
    out_addresses: &mut [A::Address],
    sizes: &[A::Address],
    alignments: &[A::Address],
    hints: Option<&[A::Address]>,
) {
    for (i, out) in out_addresses.iter_mut().enumerate() {
        if out.is_valid() {
            continue;
        }
        let hint = hints.map_or_else(Zero::zero, |hints| hints[i]);
        *out = alloc.alloc_addr(sizes[i], alignments[i], hint);
    }
}

/// Frees every address that is not `INVALID` with the single-item primitive,
/// in index order.
pub fn multi_free_addr<A: AddressAllocator>(
    alloc: &mut A,
    addresses: &[A::Address],
    sizes: &[A::Address],
) {
    for (&addr, &size) in addresses.iter().zip(sizes) {
        if addr.is_invalid() {
            continue;
        }
        alloc.free_addr(addr, size);
    }
}

/// Identity translation.
#[inline]
pub fn get_real_addr<A: AddressAllocator>(_alloc: &A, allocated_addr: A::Address) -> A::Address {
    allocated_addr
}

pub const fn resolve_multi_alloc_addr<A: AddressAllocator>() -> MultiAllocFn<A> {
    match A::MULTI_ALLOC_ADDR {
        Some(native) => native,
        None => multi_alloc_addr::<A>,
    }
}

pub const fn resolve_multi_free_addr<A: AddressAllocator>() -> MultiFreeFn<A> {
    match A::MULTI_FREE_ADDR {
        Some(native) => native,
        None => multi_free_addr::<A>,
    }
}

pub const fn resolve_get_real_addr<A: AddressAllocator>() -> RealAddrFn<A> {
    match A::GET_REAL_ADDR {
        Some(native) => native,
        None => get_real_addr::<A>,
    }
}
