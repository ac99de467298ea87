use addrkit_alloc_traits::{Address, AddressAllocator, AddressAllocatorTraits};
use addrkit_common::error::ErrorKind;
use addrkit_testkit::{
    BatchingPoolAllocator, Call, LinearAllocator, PoolAllocator, RingAllocator,
    data_gen::AllocBatch,
};

fn alloc_batch<A: AddressAllocator>(alloc: &mut A, batch: &mut AllocBatch<A::Address>) {
    AddressAllocatorTraits::multi_alloc_addr(
        alloc,
        &mut batch.out_addresses,
        &batch.sizes,
        &batch.alignments,
        Some(batch.hints.as_slice()),
    );
}

#[test]
fn test_bare_allocator_allocates_each_slot_in_order() {
    type Traits = AddressAllocatorTraits<PoolAllocator<u32>>;
    assert_eq!(Traits::MAX_MULTI_OPS, 256);
    assert!(Traits::SUPPORTS_ARBITRARY_ORDER_FREES);
    assert!(!Traits::SUPPORTS_NULL_BUFFER);

    let mut pool = PoolAllocator::<u32>::new(64, 16);
    let mut batch = AllocBatch::uniform(10, 32, 8);
    alloc_batch(&mut pool, &mut batch);

    let expected: Vec<Call<u32>> = (0..10)
        .map(|i| Call::Alloc {
            size: 32,
            alignment: 8,
            hint: i,
        })
        .collect();
    assert_eq!(pool.log().calls(), expected.as_slice());
    assert_eq!(
        batch.out_addresses,
        (0..10).map(|i| i * 64).collect::<Vec<u32>>()
    );
}

#[test]
fn test_native_free_is_chunked_by_declared_cap() {
    type Traits = AddressAllocatorTraits<BatchingPoolAllocator<u32>>;
    assert_eq!(Traits::MAX_MULTI_OPS, 4);

    let mut alloc = BatchingPoolAllocator::<u32>::new(64, 16);
    let mut batch = AllocBatch::uniform(10, 64, 64);
    alloc_batch(&mut alloc, &mut batch);
    assert_eq!(batch.allocated_count(), 10);
    assert_eq!(alloc.log().multi_alloc_counts(), vec![4, 4, 2]);
    assert_eq!(alloc.pool().block_size(), 64);
    assert!(batch.out_addresses.iter().all(|&a| alloc.pool().is_allocated(a)));

    let before = alloc.log().calls().len();
    AddressAllocatorTraits::multi_free_addr(&mut alloc, &batch.out_addresses, &batch.sizes);

    let mut expected = Vec::new();
    for chunk in batch.out_addresses.chunks(4) {
        expected.push(Call::MultiFree { count: chunk.len() });
        expected.extend(chunk.iter().map(|&addr| Call::Free { addr, size: 64 }));
    }
    assert_eq!(&alloc.log().calls()[before..], expected.as_slice());
    assert_eq!(alloc.log().multi_free_counts(), vec![4, 4, 2]);
    assert_eq!(alloc.allocated_size(), 0);
    assert!(!batch.out_addresses.iter().any(|&a| alloc.pool().is_allocated(a)));
}

#[test]
fn test_native_and_default_paths_issue_same_primitives() {
    fastrand::seed(8_675_309);
    for count in [0, 1, 3, 4, 5, 17, 64, 300] {
        let template = AllocBatch::<u64>::random(count, 80, 64);

        let mut plain = PoolAllocator::<u64>::new(64, 200);
        let mut plain_batch = template.clone();
        alloc_batch(&mut plain, &mut plain_batch);

        let mut batching = BatchingPoolAllocator::<u64>::new(64, 200);
        let mut batching_batch = template.clone();
        alloc_batch(&mut batching, &mut batching_batch);

        assert_eq!(plain_batch.out_addresses, batching_batch.out_addresses);
        assert_eq!(plain.log().primitives(), batching.log().primitives());

        AddressAllocatorTraits::multi_free_addr(
            &mut plain,
            &plain_batch.out_addresses,
            &plain_batch.sizes,
        );
        AddressAllocatorTraits::multi_free_addr(
            &mut batching,
            &batching_batch.out_addresses,
            &batching_batch.sizes,
        );
        assert_eq!(plain.log().primitives(), batching.log().primitives());
        assert_eq!(plain.allocated_size(), 0);
        assert_eq!(batching.allocated_size(), 0);
    }
}

#[test]
fn test_chunks_are_contiguous_and_cover_batch() {
    for count in 0..=21usize {
        let mut alloc = BatchingPoolAllocator::<u32>::new(16, 32);
        let mut batch = AllocBatch::uniform(count, 16, 16);
        assert_eq!(batch.len(), count);
        assert_eq!(batch.is_empty(), count == 0);
        alloc_batch(&mut alloc, &mut batch);

        let chunks = alloc.log().multi_alloc_counts();
        assert_eq!(chunks.len(), count.div_ceil(4));
        assert_eq!(chunks.iter().sum::<usize>(), count);
        assert!(chunks.iter().rev().skip(1).all(|&c| c == 4));

        // Every slot was attempted exactly once and in index order.
        let hints: Vec<u32> = alloc
            .log()
            .primitives()
            .iter()
            .map(|c| match c {
                Call::Alloc { hint, .. } => *hint,
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        assert_eq!(hints, (0..count as u32).collect::<Vec<_>>());
    }
}

#[test]
fn test_retry_only_touches_unsatisfied_slots() {
    let mut pool = PoolAllocator::<u32>::new(32, 8);
    let held: Vec<u32> = (0..4).map(|_| pool.alloc_addr(32, 1, 0)).collect();
    pool.log_mut().clear();

    let mut batch = AllocBatch::uniform(10, 32, 1);
    alloc_batch(&mut pool, &mut batch);
    assert_eq!(batch.allocated_count(), 4);
    assert_eq!(pool.log().alloc_count(), 10);
    let first = batch.out_addresses.clone();

    AddressAllocatorTraits::multi_free_addr(&mut pool, &held, &[32; 4]);
    pool.log_mut().clear();

    alloc_batch(&mut pool, &mut batch);
    assert_eq!(pool.log().alloc_count(), 6);
    assert_eq!(batch.allocated_count(), 8);
    for (before, after) in first.iter().zip(&batch.out_addresses) {
        if before.is_valid() {
            assert_eq!(before, after);
        }
    }

    // Hints show which slots were retried.
    let retried: Vec<u32> = pool
        .log()
        .calls()
        .iter()
        .filter_map(|c| match c {
            Call::Alloc { hint, .. } => Some(*hint),
            _ => None,
        })
        .collect();
    assert_eq!(retried, vec![4, 5, 6, 7, 8, 9]);

    // A third pass with everything satisfied or exhausted changes nothing.
    let second = batch.out_addresses.clone();
    alloc_batch(&mut pool, &mut batch);
    assert_eq!(batch.out_addresses, second);
}

#[test]
fn test_free_skips_invalid_slots() {
    let mut pool = PoolAllocator::<u64>::new(8, 8);
    let a = pool.alloc_addr(8, 8, 0);
    let b = pool.alloc_addr(8, 8, 0);
    let c = pool.alloc_addr(8, 8, 0);
    pool.log_mut().clear();

    let addresses = [u64::INVALID, a, u64::INVALID, b, c, u64::INVALID];
    AddressAllocatorTraits::multi_free_addr(&mut pool, &addresses, &[8; 6]);

    assert_eq!(
        pool.log().calls(),
        &[
            Call::Free { addr: a, size: 8 },
            Call::Free { addr: b, size: 8 },
            Call::Free { addr: c, size: 8 },
        ]
    );
    assert_eq!(pool.allocated_size(), 0);

    // Freeing nothing but sentinels is a no-op.
    pool.log_mut().clear();
    AddressAllocatorTraits::multi_free_addr(&mut pool, &[u64::INVALID; 5], &[8; 5]);
    assert!(pool.log().calls().is_empty());
}

#[test]
fn test_native_free_skips_invalid_slots() {
    let mut alloc = BatchingPoolAllocator::<u32>::new(8, 8);
    let mut batch = AllocBatch::uniform(3, 8, 8);
    alloc_batch(&mut alloc, &mut batch);

    let addresses = [
        batch.out_addresses[0],
        u32::INVALID,
        batch.out_addresses[1],
        u32::INVALID,
        batch.out_addresses[2],
    ];
    AddressAllocatorTraits::multi_free_addr(&mut alloc, &addresses, &[8; 5]);
    assert_eq!(alloc.log().free_count(), 3);
    assert_eq!(alloc.log().multi_free_counts(), vec![4, 1]);
    assert_eq!(alloc.allocated_size(), 0);
}

#[test]
fn test_get_real_addr_identity_without_translation() {
    let pool = PoolAllocator::<u32>::new(16, 4);
    for addr in [0, 16, 48, 0xffff_fff0, u32::INVALID] {
        assert_eq!(AddressAllocatorTraits::get_real_addr(&pool, addr), addr);
    }
    let linear = LinearAllocator::<u64>::new(64, 8);
    assert_eq!(
        AddressAllocatorTraits::get_real_addr(&linear, u64::INVALID),
        u64::INVALID
    );
}

#[test]
fn test_get_real_addr_uses_native_translation() {
    type Traits = AddressAllocatorTraits<RingAllocator<u32>>;
    assert!(Traits::CAPABILITIES.has_get_real_addr);
    assert!(!Traits::SUPPORTS_ARBITRARY_ORDER_FREES);

    let mut ring = RingAllocator::<u32>::new(100);
    let mut batch = AllocBatch::uniform(3, 40, 1);
    alloc_batch(&mut ring, &mut batch);
    assert_eq!(batch.out_addresses, vec![0, 40, u32::INVALID]);

    AddressAllocatorTraits::multi_free_addr(&mut ring, &batch.out_addresses[..1], &[40]);
    let mut batch = AllocBatch::uniform(1, 40, 1);
    alloc_batch(&mut ring, &mut batch);

    // 80..120 would straddle the end of the ring, so the allocation starts
    // at the next lap.
    let addr = batch.out_addresses[0];
    assert_eq!(addr, 100);
    assert_eq!(Traits::get_real_addr(&ring, addr), 0);
    assert_eq!(Traits::get_real_addr(&ring, 40), 40);
}

#[test]
fn test_in_order_frees_on_linear_allocator() {
    type Traits = AddressAllocatorTraits<LinearAllocator<u32>>;
    assert!(!Traits::SUPPORTS_ARBITRARY_ORDER_FREES);
    assert!(Traits::CAPABILITIES.has_supports_arbitrary_order_frees);
    assert_eq!(Traits::MAX_MULTI_OPS, 256);

    let mut linear = LinearAllocator::<u32>::new(256, 16);
    let mut batch = AllocBatch::uniform(4, 32, 16);
    alloc_batch(&mut linear, &mut batch);
    assert_eq!(batch.out_addresses, vec![0, 32, 64, 96]);
    assert_eq!(Traits::allocated_size(&linear), 128);
    assert_eq!(Traits::free_size(&linear), 128);

    // Reverse order gives the whole range back.
    let mut addresses = batch.out_addresses.clone();
    addresses.reverse();
    Traits::multi_free_addr(&mut linear, &addresses, &batch.sizes);
    assert_eq!(Traits::allocated_size(&linear), 0);
    assert_eq!(Traits::free_size(&linear), 256);

    // Allocation order only reclaims the last range.
    let mut batch = AllocBatch::uniform(2, 32, 16);
    alloc_batch(&mut linear, &mut batch);
    Traits::multi_free_addr(&mut linear, &batch.out_addresses, &batch.sizes);
    assert_eq!(Traits::allocated_size(&linear), 0);
    assert_eq!(Traits::free_size(&linear), 224);

    linear.reset();
    assert_eq!(Traits::free_size(&linear), 256);
}

#[test]
fn test_null_buffer_support() {
    type Traits = AddressAllocatorTraits<BatchingPoolAllocator<u64>>;
    assert!(Traits::SUPPORTS_NULL_BUFFER);

    let unbacked = BatchingPoolAllocator::<u64>::unbacked(32, 4);
    assert!(Traits::buffer_start(&unbacked).is_none());
    assert_eq!(Traits::total_size(&unbacked), 128);

    let backed = BatchingPoolAllocator::<u64>::new(32, 4);
    assert!(Traits::buffer_start(&backed).is_some());
    assert!(Traits::reserved_space(&backed).is_none());
}

#[test]
fn test_accessors_forward_to_allocator() {
    type Traits = AddressAllocatorTraits<PoolAllocator<u64>>;
    let mut pool = PoolAllocator::<u64>::new(48, 10);
    pool.alloc_addr(48, 16, 0);

    assert_eq!(Traits::max_size(&pool), 48);
    assert_eq!(Traits::min_size(&pool), 48);
    assert_eq!(Traits::max_alignment(&pool), 16);
    assert_eq!(Traits::align_offset(&pool), 0);
    assert_eq!(Traits::allocated_size(&pool), 48);
    assert_eq!(Traits::free_size(&pool), 432);
    assert_eq!(Traits::total_size(&pool), 480);
    assert_eq!(
        Traits::buffer_start(&pool),
        AddressAllocator::buffer_start(&pool)
    );
}

#[test]
fn test_checked_variants_reject_mismatched_lengths() {
    let mut alloc = BatchingPoolAllocator::<u32>::new(8, 8);
    let mut out = [u32::INVALID; 3];

    let err = AddressAllocatorTraits::try_multi_alloc_addr(&mut alloc, &mut out, &[8; 3], &[8; 2], None)
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::LengthMismatch {
            expected: 3,
            actual: 2,
            ..
        }
    ));

    let err = AddressAllocatorTraits::try_multi_alloc_addr(
        &mut alloc,
        &mut out,
        &[8; 3],
        &[8; 3],
        Some(&[0; 4]),
    )
    .unwrap_err();
    let ErrorKind::LengthMismatch { name, .. } = err.kind();
    assert_eq!(name, "hints");

    let err = AddressAllocatorTraits::try_multi_free_addr(&mut alloc, &out, &[8; 1]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::LengthMismatch { .. }));

    assert!(alloc.log().calls().is_empty());
    assert_eq!(out, [u32::INVALID; 3]);
}

#[test]
fn test_checked_variants_dispatch_when_valid() {
    let mut alloc = BatchingPoolAllocator::<u32>::new(8, 8);
    let mut out = [u32::INVALID; 6];
    AddressAllocatorTraits::try_multi_alloc_addr(&mut alloc, &mut out, &[8; 6], &[8; 6], None)
        .unwrap();
    assert_eq!(out, [0, 8, 16, 24, 32, 40]);
    assert_eq!(alloc.log().multi_alloc_counts(), vec![4, 2]);

    AddressAllocatorTraits::try_multi_free_addr(&mut alloc, &out, &[8; 6]).unwrap();
    assert_eq!(alloc.log().multi_free_counts(), vec![4, 2]);
    assert_eq!(alloc.allocated_size(), 0);
}
