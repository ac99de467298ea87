//! Random batch generation for tests.

use addrkit_alloc_traits::Address;

use crate::to_addr;

/// Parallel arrays describing one batched allocation request.
#[derive(Debug, Clone)]
pub struct AllocBatch<A> {
    pub out_addresses: Vec<A>,
    pub sizes: Vec<A>,
    pub alignments: Vec<A>,
    pub hints: Vec<A>,
}

impl<A: Address> AllocBatch<A> {
    /// A batch of `count` identical requests with every output slot primed
    /// with `INVALID`.
    pub fn uniform(count: usize, size: usize, alignment: usize) -> AllocBatch<A> {
        AllocBatch {
            out_addresses: vec![A::INVALID; count],
            sizes: vec![to_addr(size); count],
            alignments: vec![to_addr(alignment); count],
            hints: (0..count).map(to_addr::<A>).collect(),
        }
    }

    /// A batch of `count` requests with sizes in `1..=max_size` and
    /// power-of-two alignments up to `max_alignment`.
    ///
    /// Uses the thread-local `fastrand` generator; seed it for reproducibility.
    pub fn random(count: usize, max_size: usize, max_alignment: usize) -> AllocBatch<A> {
        assert!(max_alignment.is_power_of_two());
        let max_shift = max_alignment.trailing_zeros();
        AllocBatch {
            out_addresses: vec![A::INVALID; count],
            sizes: (0..count)
                .map(|_| to_addr(fastrand::usize(1..=max_size)))
                .collect(),
            alignments: (0..count)
                .map(|_| to_addr(1usize << fastrand::u32(0..=max_shift)))
                .collect(),
            hints: (0..count).map(|_| to_addr(fastrand::usize(0..1 << 16))).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.out_addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out_addresses.is_empty()
    }

    /// Number of output slots holding an address.
    pub fn allocated_count(&self) -> usize {
        self.out_addresses.iter().filter(|a| a.is_valid()).count()
    }
}
