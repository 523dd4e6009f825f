use crate::storage::RawStorage;
use std::alloc::Layout;
use std::fmt;
use std::mem::{ManuallyDrop, MaybeUninit};

/// Zero-sized, byte-aligned stand-in for unused candidate slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Filler;

/// Storage big enough and aligned enough for any one of up to ten types.
///
/// The size is the largest candidate size and the alignment the strictest
/// candidate alignment; unlike a struct, nothing is summed. The storage is
/// meant to be reused: write one candidate, drop or read it out, write
/// another.
///
/// ```
/// use alignkit::{AlignedCharArrayUnion, RawStorage};
///
/// let mut slot = AlignedCharArrayUnion::<u8, u64, [u16; 3]>::new();
/// slot.write(7u8);
/// slot.write([1u16, 2, 3]);
/// assert_eq!(unsafe { *slot.assume_init_ref::<[u16; 3]>() }, [1, 2, 3]);
/// ```
#[allow(dead_code)]
#[repr(C)]
pub union AlignedCharArrayUnion<
    T1,
    T2 = Filler,
    T3 = Filler,
    T4 = Filler,
    T5 = Filler,
    T6 = Filler,
    T7 = Filler,
    T8 = Filler,
    T9 = Filler,
    T10 = Filler,
> {
    t1: ManuallyDrop<MaybeUninit<T1>>,
    t2: ManuallyDrop<MaybeUninit<T2>>,
    t3: ManuallyDrop<MaybeUninit<T3>>,
    t4: ManuallyDrop<MaybeUninit<T4>>,
    t5: ManuallyDrop<MaybeUninit<T5>>,
    t6: ManuallyDrop<MaybeUninit<T6>>,
    t7: ManuallyDrop<MaybeUninit<T7>>,
    t8: ManuallyDrop<MaybeUninit<T8>>,
    t9: ManuallyDrop<MaybeUninit<T9>>,
    t10: ManuallyDrop<MaybeUninit<T10>>,
}

impl<T1, T2, T3, T4, T5, T6, T7, T8, T9, T10>
    AlignedCharArrayUnion<T1, T2, T3, T4, T5, T6, T7, T8, T9, T10>
{
    pub const LAYOUT: Layout = Layout::new::<Self>();
    pub const ALIGN: usize = Self::LAYOUT.align();
    pub const SIZE: usize = Self::LAYOUT.size();

    pub const fn new() -> Self {
        Self {
            t1: ManuallyDrop::new(MaybeUninit::uninit()),
        }
    }
}

impl<T1, T2, T3, T4, T5, T6, T7, T8, T9, T10> Default
    for AlignedCharArrayUnion<T1, T2, T3, T4, T5, T6, T7, T8, T9, T10>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T1, T2, T3, T4, T5, T6, T7, T8, T9, T10> fmt::Debug
    for AlignedCharArrayUnion<T1, T2, T3, T4, T5, T6, T7, T8, T9, T10>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AlignedCharArrayUnion[size={}, align={}]@{:?}",
            Self::SIZE,
            Self::ALIGN,
            self.as_ptr()
        )
    }
}

unsafe impl<T1, T2, T3, T4, T5, T6, T7, T8, T9, T10> RawStorage
    for AlignedCharArrayUnion<T1, T2, T3, T4, T5, T6, T7, T8, T9, T10>
{
}

/// Names the union storage for a list of candidate types.
#[macro_export]
macro_rules! aligned_union {
    ($($t: ty),+ $(,)?) => {
        $crate::AlignedCharArrayUnion<$($t),+>
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Address;
    use std::mem;

    #[allow(dead_code)]
    #[repr(align(16))]
    struct Vector([f32; 4]);

    #[allow(dead_code)]
    #[repr(align(8))]
    struct Word(u64);

    #[allow(dead_code)]
    struct Odd([u8; 3]);

    #[test]
    fn filler_is_free() {
        assert_eq!(mem::size_of::<Filler>(), 0);
        assert_eq!(mem::align_of::<Filler>(), 1);
        assert_eq!(mem::size_of::<AlignedCharArrayUnion<u32>>(), 4);
        assert_eq!(mem::align_of::<AlignedCharArrayUnion<u32>>(), 4);
    }

    #[test]
    fn byte_and_word() {
        type S = AlignedCharArrayUnion<u8, Word>;
        assert!(S::SIZE >= 8);
        assert_eq!(S::ALIGN, 8);
        assert_eq!(S::ALIGN, mem::align_of::<Word>());
    }

    #[test]
    fn mixed_scalars_take_maximum() {
        type S = aligned_union!(u32, u16, u8);
        assert!(S::SIZE >= 4);
        assert_eq!(S::SIZE, 4);
        assert_eq!(S::ALIGN, 4);
    }

    #[test]
    fn size_is_maximum_not_sum() {
        type S = AlignedCharArrayUnion<[u8; 40], Word, Vector, u16, char, (u8, u32), f64, bool, [u64; 2], i8>;
        assert_eq!(S::ALIGN, 16);
        assert_eq!(S::SIZE, 48);
        assert_eq!(S::LAYOUT, Layout::from_size_align(40, 16).unwrap().pad_to_align());
    }

    #[test]
    fn size_rounds_up_to_strictest_alignment() {
        type S = AlignedCharArrayUnion<Odd, u16>;
        assert_eq!(S::ALIGN, 2);
        assert_eq!(S::SIZE, 4);
    }

    #[test]
    fn repeated_requests_are_identical() {
        type A = AlignedCharArrayUnion<u8, Vector>;
        type B = aligned_union!(u8, Vector);
        assert_eq!(A::LAYOUT, B::LAYOUT);
        assert_eq!(mem::size_of::<A>(), mem::size_of::<B>());
    }

    #[test]
    fn sequential_reuse() {
        let mut slot = AlignedCharArrayUnion::<String, Vector, u8>::new();
        assert!(Address::from(&slot).is_aligned_to(16));
        slot.write(String::from("first"));
        let s = unsafe { slot.assume_init_read::<String>() };
        assert_eq!(s, "first");
        slot.write(Vector([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(unsafe { slot.assume_init_ref::<Vector>() }.0[3], 4.0);
        slot.write(String::from("second"));
        unsafe { slot.assume_init_mut::<String>() }.push('!');
        assert_eq!(unsafe { slot.assume_init_ref::<String>() }, "second!");
        unsafe { slot.drop_in_place::<String>() };
    }
}
