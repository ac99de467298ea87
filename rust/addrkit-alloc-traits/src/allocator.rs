//! `AddressAllocator`: the interface a concrete allocator strategy implements.

use std::ptr::NonNull;

use crate::address::Address;

/// Native batched allocation.
///
/// Arguments are the allocator, the output address slots, and the per-slot
/// sizes, alignments and optional hints. All slices have the same length.
pub type MultiAllocFn<A> = fn(
    &mut A,
    &mut [<A as AddressAllocator>::Address],
    &[<A as AddressAllocator>::Address],
    &[<A as AddressAllocator>::Address],
    Option<&[<A as AddressAllocator>::Address]>,
);

/// Native batched free: the allocator, the addresses and their sizes.
pub type MultiFreeFn<A> = fn(
    &mut A,
    &[<A as AddressAllocator>::Address],
    &[<A as AddressAllocator>::Address],
);

/// Native translation from an allocated address to the real address.
pub type RealAddrFn<A> =
    fn(&A, <A as AddressAllocator>::Address) -> <A as AddressAllocator>::Address;

/// An allocator handing out offsets into a fixed backing range.
///
/// Only the single-item primitives and the query accessors are required.
/// Every optional capability is an associated constant that defaults to
/// `None` ("not declared"). An implementation declares a capability by
/// overriding the constant with `Some(..)`; [`AddressAllocatorTraits`]
/// substitutes the fallback from [`policy`] for anything left undeclared.
///
/// ```ignore
/// impl AddressAllocator for MyAllocator {
///     type Address = u32;
///
///     const MAX_MULTI_OPS: Option<u32> = Some(64);
///     const MULTI_FREE_ADDR: Option<MultiFreeFn<Self>> = Some(Self::free_many);
///
///     // primitives and accessors ...
/// }
/// ```
///
/// Implementations are not required to be thread-safe; callers serialize
/// access to a shared instance themselves.
///
/// [`AddressAllocatorTraits`]: crate::traits::AddressAllocatorTraits
/// [`policy`]: crate::policy
pub trait AddressAllocator: Sized {
    type Address: Address;

    /// Whether frees may be issued in any order relative to allocations.
    const SUPPORTS_ARBITRARY_ORDER_FREES: Option<bool> = None;

    /// Largest batch a single native batched call accepts. Must not be zero.
    const MAX_MULTI_OPS: Option<u32> = None;

    /// Whether an instance may exist without a backing buffer. Interpreted by
    /// allocator implementations only; the adapter merely reports it.
    const SUPPORTS_NULL_BUFFER: Option<bool> = None;

    const MULTI_ALLOC_ADDR: Option<MultiAllocFn<Self>> = None;

    const MULTI_FREE_ADDR: Option<MultiFreeFn<Self>> = None;

    const GET_REAL_ADDR: Option<RealAddrFn<Self>> = None;

    /// Allocates `size` units aligned to `alignment`, optionally near `hint`.
    ///
    /// Returns `Self::Address::INVALID` when the request cannot be satisfied.
    fn alloc_addr(
        &mut self,
        size: Self::Address,
        alignment: Self::Address,
        hint: Self::Address,
    ) -> Self::Address;

    /// Returns a previously allocated range to the allocator.
    fn free_addr(&mut self, addr: Self::Address, size: Self::Address);

    /// Start of the backing buffer, `None` when the allocator has no buffer.
    fn buffer_start(&self) -> Option<NonNull<u8>>;

    /// Start of the reserved bookkeeping space, if any.
    fn reserved_space(&self) -> Option<NonNull<u8>>;

    /// Largest size a single allocation can currently be served with.
    fn max_size(&self) -> Self::Address;

    fn min_size(&self) -> Self::Address;

    fn max_alignment(&self) -> Self::Address;

    /// Offset of the buffer start from its natural alignment.
    fn align_offset(&self) -> Self::Address;

    fn free_size(&self) -> Self::Address;

    fn allocated_size(&self) -> Self::Address;

    fn total_size(&self) -> Self::Address;
}
