//! Byte storage with an alignment picked by a const generic.
//!
//! `#[repr(align(N))]` only takes a literal, so every supported alignment
//! gets a zero-sized archetype carrying the attribute, and [`Align<N>`]
//! selects one through [`SupportedAlignment`]. Asking for an alignment that
//! is not a power of two (or exceeds what `repr(align)` accepts) fails to
//! compile:
//!
//! ```compile_fail
//! let _ = alignkit::AlignedCharArray::<24, 8>::new();
//! ```

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr;

mod private {
    pub trait Sealed {}
}

/// Implemented for `Align<N>` exactly when `N` is a valid `repr(align)`
/// value: every power of two from 1 through 2^29.
///
/// # Safety
///
/// `Archetype` must be a zero-sized type whose alignment is `N`.
pub unsafe trait SupportedAlignment: private::Sealed {
    #[doc(hidden)]
    type Archetype: Copy + Default + Eq + Ord + fmt::Debug + std::hash::Hash + Send + Sync + 'static;
}

/// A zero-sized type aligned to `N` bytes.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Align<const N: usize>([<Self as SupportedAlignment>::Archetype; 0])
where
    Self: SupportedAlignment;

impl<const N: usize> Align<N>
where
    Self: SupportedAlignment,
{
    pub const NEW: Self = Self([]);
}

impl<const N: usize> fmt::Debug for Align<N>
where
    Self: SupportedAlignment,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Align<{}>", N)
    }
}

#[doc(hidden)]
pub mod archetype {
    macro_rules! supported_alignments {
        ($($name: ident = $align: literal),* $(,)?) => {
            $(
                #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
                #[repr(align($align))]
                pub struct $name;

                impl super::private::Sealed for super::Align<$align> {}

                unsafe impl super::SupportedAlignment for super::Align<$align> {
                    type Archetype = $name;
                }
            )*

            /// Every alignment `Align<N>` can be instantiated with, ascending.
            pub const SUPPORTED: &[usize] = &[$($align),*];
        };
    }

    supported_alignments!(
        Align1 = 1,
        Align2 = 2,
        Align4 = 4,
        Align8 = 8,
        Align16 = 16,
        Align32 = 32,
        Align64 = 64,
        Align128 = 128,
        Align256 = 256,
        Align512 = 512,
        Align1K = 1024,
        Align2K = 2048,
        Align4K = 4096,
        Align8K = 8192,
        Align16K = 16384,
        Align32K = 32768,
        Align64K = 65536,
        Align128K = 131072,
        Align256K = 262144,
        Align512K = 524288,
        Align1M = 1048576,
        Align2M = 2097152,
        Align4M = 4194304,
        Align8M = 8388608,
        Align16M = 16777216,
        Align32M = 33554432,
        Align64M = 67108864,
        Align128M = 134217728,
        Align256M = 268435456,
        Align512M = 536870912,
    );
}

pub use archetype::SUPPORTED as SUPPORTED_ALIGNMENTS;

/// `SIZE` bytes of uninitialized storage whose address is always a
/// multiple of `ALIGN`.
///
/// The type is at least `SIZE` bytes; it is padded up to a multiple of
/// `ALIGN` like any other Rust type.
#[repr(C)]
pub struct AlignedCharArray<const ALIGN: usize, const SIZE: usize>
where
    Align<ALIGN>: SupportedAlignment,
{
    _align: Align<ALIGN>,
    buffer: [MaybeUninit<u8>; SIZE],
}

impl<const ALIGN: usize, const SIZE: usize> AlignedCharArray<ALIGN, SIZE>
where
    Align<ALIGN>: SupportedAlignment,
{
    pub const ALIGN: usize = ALIGN;
    pub const SIZE: usize = SIZE;
    pub const LAYOUT: Layout = Layout::new::<Self>();

    pub const fn new() -> Self {
        Self {
            _align: Align::NEW,
            buffer: [MaybeUninit::uninit(); SIZE],
        }
    }

    pub const fn zeroed() -> Self {
        Self {
            _align: Align::NEW,
            buffer: [MaybeUninit::new(0); SIZE],
        }
    }

    /// The first `SIZE` bytes. Trailing padding is not included.
    pub fn as_bytes_mut(&mut self) -> &mut [MaybeUninit<u8>] {
        &mut self.buffer
    }
}

impl<const ALIGN: usize, const SIZE: usize> Default for AlignedCharArray<ALIGN, SIZE>
where
    Align<ALIGN>: SupportedAlignment,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const ALIGN: usize, const SIZE: usize> fmt::Debug for AlignedCharArray<ALIGN, SIZE>
where
    Align<ALIGN>: SupportedAlignment,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlignedCharArray<{}, {}>@{:?}", ALIGN, SIZE, self.as_ptr())
    }
}

unsafe impl<const ALIGN: usize, const SIZE: usize> RawStorage for AlignedCharArray<ALIGN, SIZE> where
    Align<ALIGN>: SupportedAlignment
{
}

/// Names the storage type for a given alignment and size.
#[macro_export]
macro_rules! aligned_char_array {
    ($align: expr, $size: expr) => {
        $crate::AlignedCharArray<{ $align }, { $size }>
    };
}

/// Raw storage that values can be placement-constructed into.
///
/// A value of type `T` only goes in if it fits: `size_of::<T>()` and
/// `align_of::<T>()` may not exceed those of the storage. This is checked
/// when the call is monomorphized, so a misfit never reaches run time:
///
/// ```compile_fail
/// use alignkit::{AlignedCharArray, RawStorage};
///
/// let mut storage = AlignedCharArray::<4, 4>::new();
/// storage.write(0u64);
/// ```
///
/// The storage never tracks what lives in it. Dropping it does not drop
/// the placed value; use [`RawStorage::drop_in_place`] for that.
///
/// # Safety
///
/// Implementors must be plain memory: no drop glue of their own and no
/// invariants on their bytes.
pub unsafe trait RawStorage: Sized {
    #[inline(always)]
    fn as_ptr(&self) -> *const u8 {
        self as *const Self as *const u8
    }

    #[inline(always)]
    fn as_mut_ptr(&mut self) -> *mut u8 {
        self as *mut Self as *mut u8
    }

    /// Moves `value` into the storage, overwriting whatever was there
    /// without dropping it.
    #[inline(always)]
    fn write<T>(&mut self, value: T) -> &mut T {
        let () = Fits::<T, Self>::OK;
        let ptr = self.as_mut_ptr() as *mut T;
        unsafe {
            ptr.write(value);
            &mut *ptr
        }
    }

    /// # Safety
    ///
    /// A `T` must have been written and not moved out or dropped since.
    #[inline(always)]
    unsafe fn assume_init_ref<T>(&self) -> &T {
        let () = Fits::<T, Self>::OK;
        &*(self.as_ptr() as *const T)
    }

    /// # Safety
    ///
    /// Same as [`RawStorage::assume_init_ref`].
    #[inline(always)]
    unsafe fn assume_init_mut<T>(&mut self) -> &mut T {
        let () = Fits::<T, Self>::OK;
        &mut *(self.as_mut_ptr() as *mut T)
    }

    /// Moves the value out. The storage is logically empty afterwards.
    ///
    /// # Safety
    ///
    /// Same as [`RawStorage::assume_init_ref`].
    #[inline(always)]
    unsafe fn assume_init_read<T>(&self) -> T {
        let () = Fits::<T, Self>::OK;
        ptr::read(self.as_ptr() as *const T)
    }

    /// Runs the destructor of the placed value.
    ///
    /// # Safety
    ///
    /// Same as [`RawStorage::assume_init_ref`].
    #[inline(always)]
    unsafe fn drop_in_place<T>(&mut self) {
        let () = Fits::<T, Self>::OK;
        ptr::drop_in_place(self.as_mut_ptr() as *mut T)
    }
}

/// Compile-time check that a `T` can be placed in storage `S`.
pub struct Fits<T, S>(PhantomData<(T, S)>);

impl<T, S> Fits<T, S> {
    pub const OK: () = {
        assert!(
            mem::size_of::<T>() <= mem::size_of::<S>(),
            "value is larger than the storage"
        );
        assert!(
            mem::align_of::<T>() <= mem::align_of::<S>(),
            "value is more strictly aligned than the storage"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Address;

    #[test]
    fn align_is_zero_sized() {
        assert_eq!(mem::size_of::<Align<1>>(), 0);
        assert_eq!(mem::size_of::<Align<4096>>(), 0);
        assert_eq!(mem::align_of::<Align<4096>>(), 4096);
        assert_eq!(mem::align_of::<Align<536870912>>(), 1 << 29);
    }

    #[test]
    fn supported_alignments_are_powers_of_two() {
        assert_eq!(SUPPORTED_ALIGNMENTS.len(), 30);
        for (i, a) in SUPPORTED_ALIGNMENTS.iter().enumerate() {
            assert_eq!(*a, 1 << i);
        }
    }

    #[test]
    fn size_is_padded_to_alignment() {
        assert_eq!(mem::size_of::<AlignedCharArray<8, 3>>(), 8);
        assert_eq!(mem::size_of::<AlignedCharArray<1, 3>>(), 3);
        assert_eq!(mem::size_of::<AlignedCharArray<16, 32>>(), 32);
        assert_eq!(mem::size_of::<AlignedCharArray<64, 0>>(), 0);
        assert_eq!(AlignedCharArray::<32, 40>::LAYOUT.size(), 64);
        assert_eq!(AlignedCharArray::<32, 40>::LAYOUT.align(), 32);
        assert_eq!(mem::size_of::<aligned_char_array!(4, 6)>(), 8);
    }

    #[test]
    fn stack_arrays_stay_aligned() {
        let slots: [AlignedCharArray<32, 5>; 8] = Default::default();
        for slot in &slots {
            assert!(Address::from(slot).is_aligned_to(32));
        }
    }

    #[test]
    fn bytes_exclude_padding() {
        let mut storage = AlignedCharArray::<16, 5>::zeroed();
        assert_eq!(storage.as_bytes_mut().len(), 5);
        storage.as_bytes_mut()[4] = MaybeUninit::new(7);
        assert_eq!(unsafe { *storage.as_ptr().add(4) }, 7);
    }

    #[test]
    fn placement_round_trip() {
        let mut storage = AlignedCharArray::<8, 16>::new();
        *storage.write(41u64) += 1;
        assert_eq!(unsafe { *storage.assume_init_ref::<u64>() }, 42);
        storage.write([1u32, 2, 3, 4]);
        assert_eq!(unsafe { storage.assume_init_read::<[u32; 4]>() }, [1, 2, 3, 4]);
    }

    #[test]
    fn drop_in_place_runs_destructor() {
        use std::rc::Rc;

        let shared = Rc::new(());
        let mut storage = AlignedCharArray::<8, 8>::new();
        storage.write(Rc::clone(&shared));
        assert_eq!(Rc::strong_count(&shared), 2);
        unsafe { storage.drop_in_place::<Rc<()>>() };
        assert_eq!(Rc::strong_count(&shared), 1);
    }
}
