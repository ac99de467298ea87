//! `AddressAllocatorTraits`: the single call surface over any [`AddressAllocator`].

use std::{marker::PhantomData, ops::Range, ptr::NonNull};

use addrkit_common::{verify_len, Result};

use crate::{
    allocator::{AddressAllocator, MultiAllocFn, MultiFreeFn, RealAddrFn},
    capability::{self, Capabilities},
    policy,
};

/// Capability-independent facade over an allocator type `A`.
///
/// This type is never constructed. It carries the resolved capability
/// constants of `A` and exposes every operation as an associated function
/// taking the allocator by reference. Whether an operation forwards to a
/// native member of `A` or to the fallback in [`policy`] is decided per type
/// at compile time.
pub struct AddressAllocatorTraits<A>(PhantomData<fn() -> A>);

impl<A: AddressAllocator> AddressAllocatorTraits<A> {
    pub const CAPABILITIES: Capabilities = Capabilities::probe::<A>();

    pub const SUPPORTS_ARBITRARY_ORDER_FREES: bool =
        Self::CAPABILITIES.supports_arbitrary_order_frees;

    pub const SUPPORTS_NULL_BUFFER: bool = Self::CAPABILITIES.supports_null_buffer;

    /// Effective per-call batch cap.
    pub const MAX_MULTI_OPS: u32 = {
        let max = Self::CAPABILITIES.max_multi_ops;
        assert!(max != 0, "MAX_MULTI_OPS must be greater than zero");
        max
    };

    const MULTI_ALLOC: MultiAllocFn<A> = policy::resolve_multi_alloc_addr::<A>();
    const MULTI_FREE: MultiFreeFn<A> = policy::resolve_multi_free_addr::<A>();
    const REAL_ADDR: RealAddrFn<A> = policy::resolve_get_real_addr::<A>();

    /// Allocates every slot of `out_addresses` that holds `INVALID`.
    ///
    /// The batch is split into contiguous chunks of at most
    /// [`Self::MAX_MULTI_OPS`] slots, each passed to the native batched
    /// allocation of `A` or to [`policy::multi_alloc_addr`].
    ///
    /// `out_addresses` must be primed with `INVALID` for every slot that should
    /// be allocated; slots holding an address are treated as satisfied. On
    /// return every slot holds either an address or `INVALID` (that slot
    /// failed).
    ///
    /// # Panics
    ///
    /// Panics if `sizes`, `alignments` or `hints` differ in length from
    /// `out_addresses`. See [`Self::try_multi_alloc_addr`] for a checked
    /// variant.
    pub fn multi_alloc_addr(
        alloc: &mut A,
        out_addresses: &mut [A::Address],
        sizes: &[A::Address],
        alignments: &[A::Address],
        hints: Option<&[A::Address]>,
    ) {
        let count = out_addresses.len();
        assert_eq!(sizes.len(), count, "sizes length");
        assert_eq!(alignments.len(), count, "alignments length");
        if let Some(hints) = hints {
            assert_eq!(hints.len(), count, "hints length");
        }
        Self::dispatch_multi_alloc(alloc, out_addresses, sizes, alignments, hints);
    }

    /// Checked variant of [`Self::multi_alloc_addr`].
    ///
    /// Returns an error without touching the allocator when the argument
    /// slices differ in length. Allocation failures are still reported
    /// per slot through `INVALID`, not through the error.
    pub fn try_multi_alloc_addr(
        alloc: &mut A,
        out_addresses: &mut [A::Address],
        sizes: &[A::Address],
        alignments: &[A::Address],
        hints: Option<&[A::Address]>,
    ) -> Result<()> {
        Self::verify_alloc_args(out_addresses.len(), sizes, alignments, hints).inspect_err(
            |e| log::debug!("multi_alloc_addr rejected: {e}"),
        )?;
        Self::dispatch_multi_alloc(alloc, out_addresses, sizes, alignments, hints);
        Ok(())
    }

    /// Frees every address in `addresses` that is not `INVALID`.
    ///
    /// Chunked like [`Self::multi_alloc_addr`]. `INVALID` slots are no-ops,
    /// so freeing the output of a partially failed batch is safe.
    ///
    /// # Panics
    ///
    /// Panics if `sizes` differs in length from `addresses`.
    pub fn multi_free_addr(alloc: &mut A, addresses: &[A::Address], sizes: &[A::Address]) {
        assert_eq!(sizes.len(), addresses.len(), "sizes length");
        Self::dispatch_multi_free(alloc, addresses, sizes);
    }

    /// Checked variant of [`Self::multi_free_addr`].
    pub fn try_multi_free_addr(
        alloc: &mut A,
        addresses: &[A::Address],
        sizes: &[A::Address],
    ) -> Result<()> {
        Self::verify_free_args(addresses.len(), sizes)
            .inspect_err(|e| log::debug!("multi_free_addr rejected: {e}"))?;
        Self::dispatch_multi_free(alloc, addresses, sizes);
        Ok(())
    }

    /// Translates an allocated address into the real address.
    ///
    /// The identity unless `A` declares `GET_REAL_ADDR`.
    #[inline]
    pub fn get_real_addr(alloc: &A, allocated_addr: A::Address) -> A::Address {
        (Self::REAL_ADDR)(alloc, allocated_addr)
    }

    #[inline]
    pub fn buffer_start(alloc: &A) -> Option<NonNull<u8>> {
        alloc.buffer_start()
    }

    #[inline]
    pub fn reserved_space(alloc: &A) -> Option<NonNull<u8>> {
        alloc.reserved_space()
    }

    #[inline]
    pub fn max_size(alloc: &A) -> A::Address {
        alloc.max_size()
    }

    #[inline]
    pub fn min_size(alloc: &A) -> A::Address {
        alloc.min_size()
    }

    #[inline]
    pub fn max_alignment(alloc: &A) -> A::Address {
        alloc.max_alignment()
    }

    #[inline]
    pub fn align_offset(alloc: &A) -> A::Address {
        alloc.align_offset()
    }

    #[inline]
    pub fn free_size(alloc: &A) -> A::Address {
        alloc.free_size()
    }

    #[inline]
    pub fn allocated_size(alloc: &A) -> A::Address {
        alloc.allocated_size()
    }

    #[inline]
    pub fn total_size(alloc: &A) -> A::Address {
        alloc.total_size()
    }

    fn dispatch_multi_alloc(
        alloc: &mut A,
        out_addresses: &mut [A::Address],
        sizes: &[A::Address],
        alignments: &[A::Address],
        hints: Option<&[A::Address]>,
    ) {
        for range in chunk_ranges(out_addresses.len(), Self::MAX_MULTI_OPS) {
            log::trace!(
                "multi_alloc_addr: chunk {}..{} ({})",
                range.start,
                range.end,
                if capability::has_multi_alloc_addr::<A>() {
                    "native"
                } else {
                    "default"
                }
            );
            (Self::MULTI_ALLOC)(
                alloc,
                &mut out_addresses[range.clone()],
                &sizes[range.clone()],
                &alignments[range.clone()],
                hints.map(|hints| &hints[range.clone()]),
            );
        }
    }

    fn dispatch_multi_free(alloc: &mut A, addresses: &[A::Address], sizes: &[A::Address]) {
        for range in chunk_ranges(addresses.len(), Self::MAX_MULTI_OPS) {
            log::trace!(
                "multi_free_addr: chunk {}..{} ({})",
                range.start,
                range.end,
                if capability::has_multi_free_addr::<A>() {
                    "native"
                } else {
                    "default"
                }
            );
            (Self::MULTI_FREE)(alloc, &addresses[range.clone()], &sizes[range]);
        }
    }

    fn verify_alloc_args(
        count: usize,
        sizes: &[A::Address],
        alignments: &[A::Address],
        hints: Option<&[A::Address]>,
    ) -> Result<()> {
        verify_len!(sizes, count);
        verify_len!(alignments, count);
        if let Some(hints) = hints {
            verify_len!(hints, count);
        }
        Ok(())
    }

    fn verify_free_args(count: usize, sizes: &[A::Address]) -> Result<()> {
        verify_len!(sizes, count);
        Ok(())
    }
}

/// Splits `0..count` into contiguous ranges of at most `max_multi_ops` items.
pub(crate) fn chunk_ranges(count: usize, max_multi_ops: u32) -> impl Iterator<Item = Range<usize>> {
    let max = max_multi_ops as usize;
    (0..count)
        .step_by(max)
        .map(move |start| start..(start + max).min(count))
}
