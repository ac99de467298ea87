//! Address width abstraction.

use std::{fmt::Debug, hash::Hash};

use num_traits::{PrimInt, Unsigned};

/// Unsigned integer offset into a backing buffer.
///
/// Implemented for `u32` and `u64`. Each width carries its own `INVALID`
/// sentinel, which denotes "no allocation" and is never a valid offset
/// handed out by an allocator.
pub trait Address:
    PrimInt
    + Unsigned
    + Hash
    + Debug
    + Default
    + bytemuck::Zeroable
    + bytemuck::Pod
    + Send
    + Sync
    + 'static
{
    /// Sentinel value for a failed or absent allocation.
    const INVALID: Self;

    const SIZE: usize;
    const BITS_COUNT: usize = Self::SIZE * 8;

    #[inline]
    fn is_invalid(self) -> bool {
        self == Self::INVALID
    }

    #[inline]
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    /// Maps the sentinel to `None`.
    #[inline]
    fn into_option(self) -> Option<Self> {
        self.is_valid().then_some(self)
    }

    /// Maps `None` to the sentinel.
    #[inline]
    fn from_option(addr: Option<Self>) -> Self {
        addr.unwrap_or(Self::INVALID)
    }
}

macro_rules! impl_address {
    ($T:ty, $invalid:expr) => {
        impl Address for $T {
            const INVALID: $T = $invalid;
            const SIZE: usize = std::mem::size_of::<$T>();
        }
    };
}

impl_address!(u32, 0xdead_beef);
impl_address!(u64, 0xdead_beef_badc_0ffe);
