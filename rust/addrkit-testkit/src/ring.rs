//! Circular allocator with allocated-to-real address translation.

use std::ptr::NonNull;

use addrkit_alloc_traits::{Address, AddressAllocator, RealAddrFn};

use crate::{
    call_log::{Call, CallLog},
    to_addr, to_usize,
};

/// FIFO allocator over a ring of `capacity` units.
///
/// Allocated addresses grow monotonically; [`AddressAllocator::GET_REAL_ADDR`]
/// maps them back into the ring (`addr % capacity`). An allocation never
/// straddles the end of the ring. Frees must arrive in allocation order.
pub struct RingAllocator<A: Address> {
    capacity: usize,
    /// Oldest live address (allocated space).
    tail: usize,
    /// Next address to hand out (allocated space).
    head: usize,
    log: CallLog<A>,
}

impl<A: Address> RingAllocator<A> {
    pub fn new(capacity: usize) -> RingAllocator<A> {
        assert_ne!(capacity, 0);
        RingAllocator {
            capacity,
            tail: 0,
            head: 0,
            log: CallLog::new(),
        }
    }

    pub fn log(&self) -> &CallLog<A> {
        &self.log
    }

    fn real_addr(&self, addr: A) -> A {
        to_addr(to_usize(addr) % self.capacity)
    }

    fn in_use(&self) -> usize {
        self.head - self.tail
    }
}

impl<A: Address> AddressAllocator for RingAllocator<A> {
    type Address = A;

    const SUPPORTS_ARBITRARY_ORDER_FREES: Option<bool> = Some(false);
    const GET_REAL_ADDR: Option<RealAddrFn<Self>> = Some(Self::real_addr);

    fn alloc_addr(&mut self, size: A, alignment: A, hint: A) -> A {
        self.log.record(Call::Alloc {
            size,
            alignment,
            hint,
        });
        let size = to_usize(size);
        let alignment = to_usize(alignment).max(1);
        if size == 0 || size > self.capacity || !alignment.is_power_of_two() {
            return A::INVALID;
        }
        let mut start = self.head.next_multiple_of(alignment);
        if start % self.capacity + size > self.capacity {
            start = start.next_multiple_of(self.capacity);
        }
        let end = start + size;
        if end - self.tail > self.capacity {
            return A::INVALID;
        }
        let addr: A = to_addr(start);
        if addr.is_invalid() {
            return addr;
        }
        self.head = end;
        addr
    }

    fn free_addr(&mut self, addr: A, size: A) {
        self.log.record(Call::Free { addr, size });
        self.tail = (to_usize(addr) + to_usize(size)).min(self.head);
    }

    fn buffer_start(&self) -> Option<NonNull<u8>> {
        None
    }

    fn reserved_space(&self) -> Option<NonNull<u8>> {
        None
    }

    fn max_size(&self) -> A {
        to_addr(self.capacity)
    }

    fn min_size(&self) -> A {
        A::one()
    }

    fn max_alignment(&self) -> A {
        to_addr(self.capacity & self.capacity.wrapping_neg())
    }

    fn align_offset(&self) -> A {
        A::zero()
    }

    fn free_size(&self) -> A {
        to_addr(self.capacity - self.in_use())
    }

    fn allocated_size(&self) -> A {
        to_addr(self.in_use())
    }

    fn total_size(&self) -> A {
        to_addr(self.capacity)
    }
}
