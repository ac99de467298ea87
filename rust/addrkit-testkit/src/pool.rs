//! Fixed-size block pool. Declares none of the optional capabilities.

use std::ptr::NonNull;

use addrkit_alloc_traits::{Address, AddressAllocator};
use num_traits::Zero;

use crate::{
    call_log::{Call, CallLog},
    to_addr, to_usize,
};

/// Hands out `block_size`-sized blocks from a buffer of `block_count` blocks.
///
/// Blocks are handed out lowest address first. Requests larger than one block,
/// or with an alignment the block size does not satisfy, fail with `INVALID`.
pub struct PoolAllocator<A: Address> {
    buffer: Option<Vec<u8>>,
    block_size: usize,
    block_count: usize,
    /// Free block indices, lowest index on top.
    free_blocks: Vec<usize>,
    log: CallLog<A>,
}

impl<A: Address> PoolAllocator<A> {
    /// Creates a pool backed by an owned, zero-initialized buffer.
    pub fn new(block_size: usize, block_count: usize) -> PoolAllocator<A> {
        let mut pool = Self::unbacked(block_size, block_count);
        pool.buffer = Some(vec![0u8; block_size * block_count]);
        pool
    }

    /// Creates a pool that manages addresses only, with no backing buffer.
    pub fn unbacked(block_size: usize, block_count: usize) -> PoolAllocator<A> {
        assert_ne!(block_size, 0);
        PoolAllocator {
            buffer: None,
            block_size,
            block_count,
            free_blocks: (0..block_count).rev().collect(),
            log: CallLog::new(),
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn log(&self) -> &CallLog<A> {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut CallLog<A> {
        &mut self.log
    }

    /// Whether `addr` is currently handed out.
    pub fn is_allocated(&self, addr: A) -> bool {
        let addr = to_usize(addr);
        addr % self.block_size == 0
            && addr / self.block_size < self.block_count
            && !self.free_blocks.contains(&(addr / self.block_size))
    }

    fn block_alignment(&self) -> usize {
        self.block_size & self.block_size.wrapping_neg()
    }
}

impl<A: Address> AddressAllocator for PoolAllocator<A> {
    type Address = A;

    fn alloc_addr(&mut self, size: A, alignment: A, hint: A) -> A {
        self.log.record(Call::Alloc {
            size,
            alignment,
            hint,
        });
        let alignment = to_usize(alignment);
        if to_usize(size) > self.block_size
            || (alignment != 0 && alignment > self.block_alignment())
        {
            return A::INVALID;
        }
        match self.free_blocks.pop() {
            Some(index) => to_addr(index * self.block_size),
            None => A::INVALID,
        }
    }

    fn free_addr(&mut self, addr: A, size: A) {
        self.log.record(Call::Free { addr, size });
        debug_assert!(
            self.is_allocated(addr),
            "freeing {addr:?}, which is not an allocated block"
        );
        self.free_blocks.push(to_usize(addr) / self.block_size);
        self.free_blocks.sort_unstable_by(|a, b| b.cmp(a));
    }

    fn buffer_start(&self) -> Option<NonNull<u8>> {
        self.buffer
            .as_ref()
            .and_then(|buf| NonNull::new(buf.as_ptr().cast_mut()))
    }

    fn reserved_space(&self) -> Option<NonNull<u8>> {
        None
    }

    fn max_size(&self) -> A {
        to_addr(self.block_size)
    }

    fn min_size(&self) -> A {
        to_addr(self.block_size)
    }

    fn max_alignment(&self) -> A {
        to_addr(self.block_alignment())
    }

    fn align_offset(&self) -> A {
        Zero::zero()
    }

    fn free_size(&self) -> A {
        to_addr(self.free_blocks.len() * self.block_size)
    }

    fn allocated_size(&self) -> A {
        to_addr((self.block_count - self.free_blocks.len()) * self.block_size)
    }

    fn total_size(&self) -> A {
        to_addr(self.block_count * self.block_size)
    }
}
