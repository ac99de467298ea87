//! Ordered record of the calls an allocator receives.

/// One call observed by a test allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call<A> {
    Alloc { size: A, alignment: A, hint: A },
    Free { addr: A, size: A },
    /// Native batched allocation covering `count` slots.
    MultiAlloc { count: usize },
    /// Native batched free covering `count` slots.
    MultiFree { count: usize },
}

impl<A> Call<A> {
    /// Whether this is a single-item primitive rather than a batch marker.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Call::Alloc { .. } | Call::Free { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CallLog<A> {
    calls: Vec<Call<A>>,
}

impl<A: Copy> CallLog<A> {
    pub fn new() -> CallLog<A> {
        CallLog { calls: Vec::new() }
    }

    pub fn record(&mut self, call: Call<A>) {
        self.calls.push(call);
    }

    pub fn calls(&self) -> &[Call<A>] {
        &self.calls
    }

    /// Calls to the single-item primitives only, in order.
    pub fn primitives(&self) -> Vec<Call<A>> {
        self.calls
            .iter()
            .filter(|c| c.is_primitive())
            .copied()
            .collect()
    }

    pub fn alloc_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Alloc { .. }))
            .count()
    }

    pub fn free_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Free { .. }))
            .count()
    }

    /// Slot counts of the native batched allocations, in order.
    pub fn multi_alloc_counts(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::MultiAlloc { count } => Some(*count),
                _ => None,
            })
            .collect()
    }

    /// Slot counts of the native batched frees, in order.
    pub fn multi_free_counts(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::MultiFree { count } => Some(*count),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl<A: Copy> Default for CallLog<A> {
    fn default() -> Self {
        Self::new()
    }
}
