use std::fmt;
use std::mem;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use super::Alignment;

/// A raw machine address, used to inspect where storage actually landed.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(usize);

impl Address {
    pub const LOG_BYTES: usize = mem::size_of::<usize>().trailing_zeros() as usize;
    pub const BYTES: usize = 1 << Self::LOG_BYTES;

    pub const ZERO: Self = Self(0);

    #[inline(always)]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn align_up(&self, align: usize) -> Address {
        debug_assert!(align.is_power_of_two());
        let mask = align - 1;
        Self((self.0 + mask) & !mask)
    }

    #[inline(always)]
    pub const fn align_down(&self, align: usize) -> Address {
        debug_assert!(align.is_power_of_two());
        let mask = align - 1;
        Self(self.0 & !mask)
    }

    #[inline(always)]
    pub const fn is_aligned_to(&self, align: usize) -> bool {
        debug_assert!(align.is_power_of_two());
        (self.0 & (align - 1)) == 0
    }

    /// Strictest power of two this address is a multiple of. Zero is treated
    /// as aligned to everything and yields `None`.
    #[inline(always)]
    pub const fn natural_alignment(&self) -> Option<Alignment> {
        if self.is_zero() {
            return None;
        }
        let align = 1usize << self.0.trailing_zeros();
        #[cfg(feature = "slow_assert")]
        assert!(self.is_aligned_to(align));
        // Safe: `align` is a power of two by construction.
        Some(unsafe { Alignment::new_unchecked(align) })
    }

    #[inline(always)]
    pub const fn from_usize(v: usize) -> Self {
        Self(v)
    }

    #[inline(always)]
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    #[inline(always)]
    pub fn as_ptr<T>(&self) -> *const T {
        self.0 as _
    }

    #[inline(always)]
    pub fn as_mut_ptr<T>(&self) -> *mut T {
        self.0 as _
    }
}

impl From<usize> for Address {
    #[inline(always)]
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl<T: ?Sized> From<*const T> for Address {
    #[inline(always)]
    fn from(value: *const T) -> Self {
        Self(value as *const u8 as usize)
    }
}

impl<T: ?Sized> From<*mut T> for Address {
    #[inline(always)]
    fn from(value: *mut T) -> Self {
        Self(value as *const u8 as usize)
    }
}

impl<T: ?Sized> From<&T> for Address {
    #[inline(always)]
    fn from(value: &T) -> Self {
        Self::from(value as *const T)
    }
}

impl<T: ?Sized> From<&mut T> for Address {
    #[inline(always)]
    fn from(value: &mut T) -> Self {
        Self::from(value as *const T)
    }
}

impl From<Address> for usize {
    #[inline(always)]
    fn from(value: Address) -> usize {
        value.0
    }
}

impl Add<usize> for Address {
    type Output = Self;

    #[inline(always)]
    fn add(self, other: usize) -> Self::Output {
        Self(self.0 + other)
    }
}

impl AddAssign<usize> for Address {
    #[inline(always)]
    fn add_assign(&mut self, other: usize) {
        *self = *self + other
    }
}

impl Sub<Self> for Address {
    type Output = usize;

    #[inline(always)]
    fn sub(self, other: Self) -> Self::Output {
        debug_assert!(self.0 >= other.0);
        self.0 - other.0
    }
}

impl Sub<usize> for Address {
    type Output = Self;

    #[inline(always)]
    fn sub(self, other: usize) -> Self::Output {
        Self(self.0 - other)
    }
}

impl SubAssign<usize> for Address {
    #[inline(always)]
    fn sub_assign(&mut self, other: usize) {
        *self = *self - other
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_ptr::<u8>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        let a = Address::from(0x1003usize);
        assert_eq!(a.align_up(8), Address::from(0x1008usize));
        assert_eq!(a.align_down(8), Address::from(0x1000usize));
        assert_eq!(a.align_up(1), a);
        assert!(Address::from(0x1000usize).is_aligned_to(4096));
        assert!(!a.is_aligned_to(2));
    }

    #[test]
    fn natural_alignment() {
        assert_eq!(Address::ZERO.natural_alignment(), None);
        assert_eq!(Address::from(0x30usize).natural_alignment().map(|a| a.get()), Some(16));
        assert_eq!(Address::from(0x31usize).natural_alignment().map(|a| a.get()), Some(1));
    }

    #[test]
    fn arithmetic() {
        let mut a = Address::from(0x100usize);
        a += 0x20;
        assert_eq!(a - Address::from(0x100usize), 0x20);
        a -= 0x10;
        assert_eq!(a.as_usize(), 0x110);
    }

    #[test]
    fn from_references() {
        let x = 5u64;
        assert_eq!(Address::from(&x).as_usize(), &x as *const u64 as usize);
        let s: &[u64] = &[1, 2];
        assert_eq!(Address::from(s), Address::from(s.as_ptr()));
    }
}
