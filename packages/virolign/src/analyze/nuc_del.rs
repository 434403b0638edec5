use crate::utils::range::Range;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A run of gaps in the aligned query: a deletion relative to the reference.
/// `start` is 0-based, in reference coordinates; `length >= 1`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NucDel {
  pub start: usize,
  pub length: usize,
}

impl NucDel {
  pub const fn end(&self) -> usize {
    self.start + self.length
  }

  pub const fn range(&self) -> Range {
    Range::new(self.start, self.end())
  }
}
