//! Block pool with native batched operations.

use std::ptr::NonNull;

use addrkit_alloc_traits::{Address, AddressAllocator, MultiAllocFn, MultiFreeFn};

use crate::{
    call_log::{Call, CallLog},
    pool::PoolAllocator,
};

/// A [`PoolAllocator`] that declares native batched allocate and free,
/// a batch cap of [`BatchingPoolAllocator::BATCH_CAP`] and null buffer support.
///
/// Each native batch is recorded as a `MultiAlloc`/`MultiFree` marker
/// followed by the single-item primitives it performs.
pub struct BatchingPoolAllocator<A: Address> {
    pool: PoolAllocator<A>,
}

impl<A: Address> BatchingPoolAllocator<A> {
    pub const BATCH_CAP: u32 = 4;

    pub fn new(block_size: usize, block_count: usize) -> BatchingPoolAllocator<A> {
        BatchingPoolAllocator {
            pool: PoolAllocator::new(block_size, block_count),
        }
    }

    /// Creates an instance with no backing buffer.
    pub fn unbacked(block_size: usize, block_count: usize) -> BatchingPoolAllocator<A> {
        BatchingPoolAllocator {
            pool: PoolAllocator::unbacked(block_size, block_count),
        }
    }

    pub fn pool(&self) -> &PoolAllocator<A> {
        &self.pool
    }

    pub fn log(&self) -> &CallLog<A> {
        self.pool.log()
    }

    fn alloc_batch(
        &mut self,
        out_addresses: &mut [A],
        sizes: &[A],
        alignments: &[A],
        hints: Option<&[A]>,
    ) {
        assert!(out_addresses.len() <= Self::BATCH_CAP as usize);
        self.pool.log_mut().record(Call::MultiAlloc {
            count: out_addresses.len(),
        });
        for (i, out) in out_addresses.iter_mut().enumerate() {
            if out.is_valid() {
                continue;
            }
            let hint = hints.map_or(A::zero(), |hints| hints[i]);
            *out = self.pool.alloc_addr(sizes[i], alignments[i], hint);
        }
    }

    fn free_batch(&mut self, addresses: &[A], sizes: &[A]) {
        assert!(addresses.len() <= Self::BATCH_CAP as usize);
        self.pool.log_mut().record(Call::MultiFree {
            count: addresses.len(),
        });
        for (&addr, &size) in addresses.iter().zip(sizes) {
            if addr.is_valid() {
                self.pool.free_addr(addr, size);
            }
        }
    }
}

impl<A: Address> AddressAllocator for BatchingPoolAllocator<A> {
    type Address = A;

    const MAX_MULTI_OPS: Option<u32> = Some(Self::BATCH_CAP);
    const SUPPORTS_NULL_BUFFER: Option<bool> = Some(true);
    const MULTI_ALLOC_ADDR: Option<MultiAllocFn<Self>> = Some(Self::alloc_batch);
    const MULTI_FREE_ADDR: Option<MultiFreeFn<Self>> = Some(Self::free_batch);

    fn alloc_addr(&mut self, size: A, alignment: A, hint: A) -> A {
        self.pool.alloc_addr(size, alignment, hint)
    }

    fn free_addr(&mut self, addr: A, size: A) {
        self.pool.free_addr(addr, size)
    }

    fn buffer_start(&self) -> Option<NonNull<u8>> {
        self.pool.buffer_start()
    }

    fn reserved_space(&self) -> Option<NonNull<u8>> {
        self.pool.reserved_space()
    }

    fn max_size(&self) -> A {
        self.pool.max_size()
    }

    fn min_size(&self) -> A {
        self.pool.min_size()
    }

    fn max_alignment(&self) -> A {
        self.pool.max_alignment()
    }

    fn align_offset(&self) -> A {
        self.pool.align_offset()
    }

    fn free_size(&self) -> A {
        self.pool.free_size()
    }

    fn allocated_size(&self) -> A {
        self.pool.allocated_size()
    }

    fn total_size(&self) -> A {
        self.pool.total_size()
    }
}
