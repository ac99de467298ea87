//! Bump allocator over a fixed range.

use std::ptr::NonNull;

use addrkit_alloc_traits::{Address, AddressAllocator};

use crate::{
    call_log::{Call, CallLog},
    to_addr, to_usize,
};

/// Allocates by advancing a cursor. Only the most recent allocation can be
/// given back to the range; freeing anything else just updates the counters.
///
/// Declares `SUPPORTS_ARBITRARY_ORDER_FREES = Some(false)`.
pub struct LinearAllocator<A: Address> {
    capacity: usize,
    max_alignment: usize,
    cursor: usize,
    allocated: usize,
    log: CallLog<A>,
}

impl<A: Address> LinearAllocator<A> {
    pub fn new(capacity: usize, max_alignment: usize) -> LinearAllocator<A> {
        assert!(max_alignment.is_power_of_two());
        LinearAllocator {
            capacity,
            max_alignment,
            cursor: 0,
            allocated: 0,
            log: CallLog::new(),
        }
    }

    pub fn log(&self) -> &CallLog<A> {
        &self.log
    }

    /// Releases everything at once.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.allocated = 0;
    }
}

impl<A: Address> AddressAllocator for LinearAllocator<A> {
    type Address = A;

    const SUPPORTS_ARBITRARY_ORDER_FREES: Option<bool> = Some(false);

    fn alloc_addr(&mut self, size: A, alignment: A, hint: A) -> A {
        self.log.record(Call::Alloc {
            size,
            alignment,
            hint,
        });
        let size = to_usize(size);
        let alignment = to_usize(alignment).max(1);
        if !alignment.is_power_of_two() || alignment > self.max_alignment {
            return A::INVALID;
        }
        let start = self.cursor.next_multiple_of(alignment);
        match start.checked_add(size) {
            Some(end) if end <= self.capacity => {
                self.cursor = end;
                self.allocated += size;
                to_addr(start)
            }
            _ => A::INVALID,
        }
    }

    fn free_addr(&mut self, addr: A, size: A) {
        self.log.record(Call::Free { addr, size });
        let (addr, size) = (to_usize(addr), to_usize(size));
        if addr + size == self.cursor {
            self.cursor = addr;
        }
        self.allocated = self.allocated.saturating_sub(size);
    }

    fn buffer_start(&self) -> Option<NonNull<u8>> {
        None
    }

    fn reserved_space(&self) -> Option<NonNull<u8>> {
        None
    }

    fn max_size(&self) -> A {
        to_addr(self.capacity - self.cursor)
    }

    fn min_size(&self) -> A {
        A::one()
    }

    fn max_alignment(&self) -> A {
        to_addr(self.max_alignment)
    }

    fn align_offset(&self) -> A {
        A::zero()
    }

    fn free_size(&self) -> A {
        to_addr(self.capacity - self.cursor)
    }

    fn allocated_size(&self) -> A {
        to_addr(self.allocated)
    }

    fn total_size(&self) -> A {
        to_addr(self.capacity)
    }
}
