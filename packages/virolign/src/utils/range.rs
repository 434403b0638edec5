use auto_ops::impl_op_ex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::Range as StdRange;

/// Half-open interval `[begin, end)` with `begin <= end`
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Range {
  pub begin: usize,
  pub end: usize,
}

impl Range {
  pub const fn new(begin: usize, end: usize) -> Self {
    Self { begin, end }
  }

  pub const fn len(&self) -> usize {
    self.end.saturating_sub(self.begin)
  }

  pub const fn is_empty(&self) -> bool {
    self.begin >= self.end
  }

  /// Checks if a point belongs to this half-open range
  pub const fn contains(&self, x: usize) -> bool {
    x >= self.begin && x < self.end
  }

  /// Finds overlap of 2 half-open ranges. `None` if the ranges don't overlap.
  pub fn intersection(&self, other: &Range) -> Option<Range> {
    if other.begin >= self.end || self.begin >= other.end {
      return None;
    }
    Some(Range {
      begin: self.begin.max(other.begin),
      end: self.end.min(other.end),
    })
  }

  pub fn has_intersection(&self, other: &Range) -> bool {
    self.intersection(other).is_some()
  }
}

impl_op_ex!(+ |range: &Range, offset: &usize| -> Range {
  Range::new(range.begin + offset, range.end + offset)
});

impl_op_ex!(-|range: &Range, offset: &usize| -> Range {
  Range::new(range.begin - offset, range.end - offset)
});

impl Display for Range {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    if self.is_empty() {
      return write!(f, "empty range");
    }
    // Ranges are displayed as one-based, inclusive
    write!(f, "{}-{}", self.begin + 1, self.end)
  }
}

impl From<Range> for StdRange<usize> {
  fn from(range: Range) -> Self {
    range.begin..range.end
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  #[case(Range::new(3, 7), 3, true)]
  #[case(Range::new(3, 7), 6, true)]
  #[case(Range::new(3, 7), 7, false)]
  #[case(Range::new(3, 7), 2, false)]
  #[case(Range::new(3, 3), 3, false)]
  fn contains_point(#[case] range: Range, #[case] x: usize, #[case] expected: bool) {
    assert_eq!(range.contains(x), expected);
  }

  #[rstest]
  fn intersects_overlapping() {
    assert_eq!(
      Range::new(2, 8).intersection(&Range::new(5, 12)),
      Some(Range::new(5, 8))
    );
  }

  #[rstest]
  fn intersects_nested() {
    assert_eq!(Range::new(0, 10).intersection(&Range::new(3, 5)), Some(Range::new(3, 5)));
  }

  #[rstest]
  fn intersects_disjoint() {
    assert_eq!(Range::new(0, 3).intersection(&Range::new(3, 5)), None);
  }

  #[rstest]
  fn shifts_by_offset() {
    assert_eq!(Range::new(2, 5) + 10, Range::new(12, 15));
    assert_eq!(Range::new(12, 15) - 10, Range::new(2, 5));
  }
}
