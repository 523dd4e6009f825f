//! Placement checks shared by the integration tests.

use crate::util::Address;
use crate::RawStorage;
use std::mem;

const ROUNDS: usize = 64;

/// Boxes the storage repeatedly, keeping every box alive so each one is a
/// distinct allocation, and checks each start address.
pub fn repeated_boxed<S: RawStorage + Default>(align: usize, size: usize) {
    assert!(mem::size_of::<S>() >= size);
    assert_eq!(mem::align_of::<S>(), align);
    let boxes: Vec<Box<S>> = (0..ROUNDS).map(|_| Box::<S>::default()).collect();
    for b in &boxes {
        assert!(
            Address::from(b.as_ptr()).is_aligned_to(align),
            "{:?} is not {}-byte aligned",
            Address::from(b.as_ptr()),
            align
        );
    }
}

/// Same check for storage living in a `Vec` buffer and on the stack.
pub fn repeated_inline<S: RawStorage + Default>(align: usize) {
    let slots: Vec<S> = (0..ROUNDS).map(|_| S::default()).collect();
    for s in &slots {
        assert!(Address::from(s).is_aligned_to(align));
    }
    for _ in 0..ROUNDS {
        let local = S::default();
        assert!(Address::from(&local).is_aligned_to(align));
    }
}

/// Writes a value that fills the storage completely and reads it back.
pub fn fill_and_read<S: RawStorage + Default>() {
    let mut storage = S::default();
    let len = mem::size_of::<S>();
    for i in 0..len {
        unsafe { storage.as_mut_ptr().add(i).write(i as u8) };
    }
    for i in 0..len {
        assert_eq!(unsafe { *storage.as_ptr().add(i) }, i as u8);
    }
}

#[macro_export]
#[doc(hidden)]
macro_rules! storage_tests {
    ($name: ident: $align: literal, $size: literal) => {
        mod $name {
            type S = $crate::AlignedCharArray<$align, $size>;

            #[test]
            fn boxed() {
                $crate::testing::repeated_boxed::<S>($align, $size);
            }

            #[test]
            fn inline() {
                $crate::testing::repeated_inline::<S>($align);
            }

            #[test]
            fn fill() {
                $crate::testing::fill_and_read::<S>();
            }

            #[test]
            fn idempotent() {
                assert_eq!(
                    <S as $crate::AlignOf>::ALIGNMENT,
                    <$crate::AlignedCharArray<$align, $size> as $crate::AlignOf>::ALIGNMENT
                );
                assert_eq!(S::LAYOUT, $crate::util::storage_layout($align, $size).unwrap());
            }
        }
    };
    ($($name: ident: $align: literal, $size: literal);+ $(;)?) => {
        $($crate::storage_tests!($name: $align, $size);)+
    };
}
