use std::mem;

/// Alignment requirement of a type as a compile-time constant.
///
/// Every sized type gets this through the blanket impl, where the value is
/// exactly what [`mem::align_of`] reports. Unsized abstract types
/// (`dyn Trait`) opt in with [`impl_abstract_align_of!`] or the
/// [`abstract_type`](crate::abstract_type) attribute, and report the
/// alignment of [`AbstractBase`].
///
/// The derived flags can be used anywhere a `const bool` is accepted, e.g.
/// to pick between specialized code paths:
///
/// ```
/// use alignkit::AlignOf;
///
/// assert!(<u64 as AlignOf>::ALIGNMENT_GREATER_EQUAL_4_BYTES);
/// assert!(<u16 as AlignOf>::ALIGNMENT_LESS_EQUAL_2_BYTES);
/// ```
pub trait AlignOf {
    const ALIGNMENT: usize;

    const ALIGNMENT_GREATER_EQUAL_2_BYTES: bool = Self::ALIGNMENT >= 2;
    const ALIGNMENT_GREATER_EQUAL_4_BYTES: bool = Self::ALIGNMENT >= 4;
    const ALIGNMENT_GREATER_EQUAL_8_BYTES: bool = Self::ALIGNMENT >= 8;
    const ALIGNMENT_GREATER_EQUAL_16_BYTES: bool = Self::ALIGNMENT >= 16;

    const ALIGNMENT_LESS_EQUAL_2_BYTES: bool = Self::ALIGNMENT <= 2;
    const ALIGNMENT_LESS_EQUAL_4_BYTES: bool = Self::ALIGNMENT <= 4;
    const ALIGNMENT_LESS_EQUAL_8_BYTES: bool = Self::ALIGNMENT <= 8;
    const ALIGNMENT_LESS_EQUAL_16_BYTES: bool = Self::ALIGNMENT <= 16;
}

impl<T> AlignOf for T {
    const ALIGNMENT: usize = mem::align_of::<T>();
}

impl<T> AlignOf for [T] {
    const ALIGNMENT: usize = mem::align_of::<T>();
}

impl AlignOf for str {
    const ALIGNMENT: usize = mem::align_of::<u8>();
}

/// Same as `T::ALIGNMENT`, callable in `const` contexts.
#[inline(always)]
pub const fn align_of<T: ?Sized + AlignOf>() -> usize {
    T::ALIGNMENT
}

/// The smallest thing an abstract type can be: a dispatch table and nothing
/// else.
///
/// Trait objects are never embedded by value, so their alignment is taken
/// from this type instead of from any implementor. It is never constructed.
#[repr(C)]
pub struct AbstractBase {
    _vtable: *const (),
}

/// Implements [`AlignOf`] for one or more trait object types.
///
/// ```
/// use alignkit::{impl_abstract_align_of, AbstractBase, AlignOf};
///
/// trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// impl_abstract_align_of!(dyn Shape, dyn Shape + Send);
///
/// assert_eq!(<dyn Shape as AlignOf>::ALIGNMENT, <AbstractBase as AlignOf>::ALIGNMENT);
/// ```
#[macro_export]
macro_rules! impl_abstract_align_of {
    ($($t: ty),+ $(,)?) => {
        $(
            impl $crate::AlignOf for $t {
                const ALIGNMENT: usize = <$crate::AbstractBase as $crate::AlignOf>::ALIGNMENT;
            }
        )+
    };
}
