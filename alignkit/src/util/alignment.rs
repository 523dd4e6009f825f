use std::fmt;
use std::mem;

use crate::storage::SUPPORTED_ALIGNMENTS;

/// Largest alignment `#[repr(align)]`, and so [`crate::Align`], accepts.
pub const MAX_ALIGNMENT: usize = 1 << 29;

/// A validated alignment value for code that only learns the alignment at
/// run time, such as tools reporting on storage types. Follows the same
/// rule as [`crate::SupportedAlignment`]: a power of two no larger than
/// [`MAX_ALIGNMENT`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alignment(usize);

impl Alignment {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(MAX_ALIGNMENT);

    pub const fn new(align: usize) -> Result<Self, AlignmentError> {
        if align == 0 {
            Err(AlignmentError::Zero)
        } else if !align.is_power_of_two() {
            Err(AlignmentError::NotPowerOfTwo(align))
        } else if align > MAX_ALIGNMENT {
            Err(AlignmentError::TooLarge(align))
        } else {
            Ok(Self(align))
        }
    }

    /// # Safety
    ///
    /// `align` must be a power of two no larger than [`MAX_ALIGNMENT`].
    pub const unsafe fn new_unchecked(align: usize) -> Self {
        debug_assert!(align.is_power_of_two());
        Self(align)
    }

    pub const fn of<T>() -> Self {
        Self(mem::align_of::<T>())
    }

    #[inline(always)]
    pub const fn get(self) -> usize {
        self.0
    }

    #[inline(always)]
    pub const fn log2(self) -> u32 {
        self.0.trailing_zeros()
    }

    #[inline(always)]
    pub const fn mask(self) -> usize {
        self.0 - 1
    }

    /// Every value `Alignment::new` accepts, ascending.
    pub fn all() -> impl Iterator<Item = Self> {
        SUPPORTED_ALIGNMENTS.iter().map(|a| Self(*a))
    }
}

impl fmt::Debug for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alignment({})", self.0)
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for Alignment {
    type Error = AlignmentError;

    fn try_from(align: usize) -> Result<Self, Self::Error> {
        Self::new(align)
    }
}

impl From<Alignment> for usize {
    fn from(align: Alignment) -> usize {
        align.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentError {
    Zero,
    NotPowerOfTwo(usize),
    TooLarge(usize),
    /// The storage size, padded to its alignment, exceeds `isize::MAX`.
    SizeOverflow(usize),
}

impl fmt::Display for AlignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "alignment must be non-zero"),
            Self::NotPowerOfTwo(a) => write!(f, "alignment {} is not a power of two", a),
            Self::TooLarge(a) => write!(f, "alignment {} exceeds the maximum of {}", a, MAX_ALIGNMENT),
            Self::SizeOverflow(s) => write!(f, "storage of {} bytes overflows isize::MAX once padded", s),
        }
    }
}

impl std::error::Error for AlignmentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_powers_of_two() {
        for shift in 0..30 {
            let align = Alignment::new(1 << shift).unwrap();
            assert_eq!(align.get(), 1 << shift);
            assert_eq!(align.log2(), shift);
            assert_eq!(align.mask(), (1 << shift) - 1);
        }
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(Alignment::new(0), Err(AlignmentError::Zero));
        assert_eq!(Alignment::new(24), Err(AlignmentError::NotPowerOfTwo(24)));
        assert_eq!(Alignment::new(1 << 30), Err(AlignmentError::TooLarge(1 << 30)));
        assert_eq!(
            Alignment::try_from(3usize).unwrap_err().to_string(),
            "alignment 3 is not a power of two"
        );
    }

    #[test]
    fn matches_compile_time_table() {
        assert_eq!(Alignment::all().count(), SUPPORTED_ALIGNMENTS.len());
        assert_eq!(Alignment::all().last(), Some(Alignment::MAX));
        assert_eq!(Alignment::all().next(), Some(Alignment::MIN));
        assert_eq!(Alignment::of::<u32>().get(), 4);
    }
}
