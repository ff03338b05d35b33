//! Target size of each segment.

use std::fmt;

/// Size available to the segment with the given zero-based index.
pub trait TargetSizes {
    fn size(&self, segment: u32) -> i32;

    /// First segment index from which every size is the same, if known.
    /// Lets the search merge paths that differ only in segment count.
    fn uniform_from(&self) -> Option<u32> {
        None
    }
}

impl TargetSizes for i32 {
    fn size(&self, _segment: u32) -> i32 {
        *self
    }

    fn uniform_from(&self) -> Option<u32> {
        Some(0)
    }
}

/// Per-segment sizes; the last one repeats for every later segment.
impl TargetSizes for [i32] {
    fn size(&self, segment: u32) -> i32 {
        match self.last() {
            Some(last) => self.get(segment as usize).copied().unwrap_or(*last),
            None => 0,
        }
    }

    fn uniform_from(&self) -> Option<u32> {
        let Some(last) = self.last() else {
            return Some(0);
        };
        let tail = self.iter().rev().take_while(|s| *s == last).count();
        Some((self.len() - tail) as u32)
    }
}

impl TargetSizes for Vec<i32> {
    fn size(&self, segment: u32) -> i32 {
        self.as_slice().size(segment)
    }

    fn uniform_from(&self) -> Option<u32> {
        self.as_slice().uniform_from()
    }
}

impl<T: TargetSizes + ?Sized> TargetSizes for &T {
    fn size(&self, segment: u32) -> i32 {
        (**self).size(segment)
    }

    fn uniform_from(&self) -> Option<u32> {
        (**self).uniform_from()
    }
}

/// Size lookup callback keyed by segment index.
pub struct SizeFn<F>(pub F);

impl<F: Fn(u32) -> i32> TargetSizes for SizeFn<F> {
    fn size(&self, segment: u32) -> i32 {
        (self.0)(segment)
    }
}

impl<F> fmt::Debug for SizeFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SizeFn(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_size() {
        assert_eq!(300.size(7), 300);
        assert_eq!(300.uniform_from(), Some(0));
    }

    #[test]
    fn test_last_size_repeats() {
        let sizes = vec![100, 200, 300, 300];
        assert_eq!(sizes.size(0), 100);
        assert_eq!(sizes.size(3), 300);
        assert_eq!(sizes.size(40), 300);
        assert_eq!(sizes.uniform_from(), Some(2));
    }

    #[test]
    fn test_empty_sizes() {
        let sizes: Vec<i32> = Vec::new();
        assert_eq!(sizes.size(0), 0);
        assert_eq!(sizes.uniform_from(), Some(0));
    }

    #[test]
    fn test_callback_has_unknown_shape() {
        let sizes = SizeFn(|k| 100 + k as i32);
        assert_eq!(sizes.size(2), 102);
        assert_eq!(sizes.uniform_from(), None);
    }
}
