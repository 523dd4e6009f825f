use std::alloc::Layout;

use super::{Alignment, AlignmentError};

pub trait LayoutUtils: Sized {
    fn layout(&self) -> Layout;

    /// Size once trailing padding up to the alignment is added.
    #[inline(always)]
    fn padded_size(&self) -> usize {
        self.layout().pad_to_align().size()
    }

    /// Layout of storage that can hold either `self` or `other`, the way
    /// [`crate::AlignedCharArrayUnion`] is laid out: the larger size and the
    /// stricter alignment, padded to that alignment.
    #[inline(always)]
    fn union_with(&self, other: Layout) -> Layout {
        let layout = self.layout();
        let align = usize::max(layout.align(), other.align());
        let size = usize::max(layout.size(), other.size());
        // Both inputs are valid layouts, so the larger of each is too.
        match Layout::from_size_align(size, align) {
            Ok(l) => l.pad_to_align(),
            Err(_) => unreachable!(),
        }
    }
}

impl LayoutUtils for Layout {
    #[inline(always)]
    fn layout(&self) -> Layout {
        *self
    }
}

/// Layout of `AlignedCharArray<align, size>`, for when `align` is only
/// known at run time.
pub fn storage_layout(align: usize, size: usize) -> Result<Layout, AlignmentError> {
    let align = Alignment::new(align)?;
    Layout::from_size_align(size, align.get())
        .map(|l| l.pad_to_align())
        .map_err(|_| AlignmentError::SizeOverflow(size))
}

/// Layout of a union of `candidates`. An empty list yields the layout of
/// [`crate::Filler`].
pub fn union_layout(candidates: &[Layout]) -> Layout {
    candidates
        .iter()
        .fold(Layout::new::<crate::Filler>(), |acc, c| acc.union_with(*c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlignedCharArray, AlignedCharArrayUnion};

    #[test]
    fn matches_storage_types() {
        assert_eq!(storage_layout(8, 3).unwrap(), AlignedCharArray::<8, 3>::LAYOUT);
        assert_eq!(storage_layout(64, 100).unwrap(), AlignedCharArray::<64, 100>::LAYOUT);
        assert_eq!(storage_layout(6, 1), Err(AlignmentError::NotPowerOfTwo(6)));
    }

    #[test]
    fn oversized_storage_is_a_size_error() {
        let err = storage_layout(8, usize::MAX).unwrap_err();
        assert_eq!(err, AlignmentError::SizeOverflow(usize::MAX));
        assert_eq!(
            err.to_string(),
            format!("storage of {} bytes overflows isize::MAX once padded", usize::MAX)
        );
    }

    #[test]
    fn matches_union_types() {
        let candidates = [Layout::new::<[u8; 3]>(), Layout::new::<u16>(), Layout::new::<u8>()];
        assert_eq!(
            union_layout(&candidates),
            AlignedCharArrayUnion::<[u8; 3], u16, u8>::LAYOUT
        );
        assert_eq!(union_layout(&[]), Layout::new::<AlignedCharArrayUnion<crate::Filler>>());
    }

    #[test]
    fn padded_size() {
        let layout = Layout::from_size_align(13, 8).unwrap();
        assert_eq!(layout.padded_size(), 16);
        assert_eq!(Layout::new::<u64>().padded_size(), 8);
        assert_eq!(Layout::from_size_align(0, 64).unwrap().padded_size(), 0);
    }
}
