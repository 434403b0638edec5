use crate::utils::range::Range;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum GeneStrand {
  #[serde(rename = "+")]
  Forward,
  #[serde(rename = "-")]
  Reverse,
}

impl Display for GeneStrand {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      GeneStrand::Forward => write!(f, "+"),
      GeneStrand::Reverse => write!(f, "-"),
    }
  }
}

/// A single coding region of the reference genome.
///
/// `start` and `end` are 0-based, half-open, in reference coordinates.
/// Reverse-strand genes are translated after reverse-complementing the extracted slice.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Gene {
  pub gene_name: String,
  pub start: usize,
  pub end: usize,
  pub strand: GeneStrand,
  pub frame: usize,
  pub length: usize,
}

impl Gene {
  pub const fn len(&self) -> usize {
    self.end - self.start
  }

  pub const fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub const fn range(&self) -> Range {
    Range::new(self.start, self.end)
  }
}
