use crate::analyze::aa_del::AaDel;
use crate::analyze::aa_sub::AaSub;
use crate::io::letter::Letter;
use crate::io::nuc::Nuc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Nucleotide substitution. `pos` is 0-based, in reference coordinates.
/// Neither side is a gap and both sides are canonical.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NucSub {
  #[serde(rename = "ref")]
  pub reff: Nuc,
  pub pos: usize,
  pub qry: Nuc,
  pub aa_substitutions: Vec<AaSub>,
  pub aa_deletions: Vec<AaDel>,
  pub pcr_primers_changed: Vec<String>,
}

impl NucSub {
  pub fn new(reff: Nuc, pos: usize, qry: Nuc) -> Self {
    Self {
      reff,
      pos,
      qry,
      aa_substitutions: vec![],
      aa_deletions: vec![],
      pcr_primers_changed: vec![],
    }
  }

  /// A copy of this substitution without the cross-links, for embedding into other records
  pub fn unlinked(&self) -> Self {
    Self::new(self.reff, self.pos, self.qry)
  }
}

impl Ord for NucSub {
  fn cmp(&self, other: &Self) -> Ordering {
    (self.pos, self.reff, self.qry).cmp(&(other.pos, other.reff, other.qry))
  }
}

impl PartialOrd for NucSub {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Display for NucSub {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    // Positions are 1-based on the wire
    write!(f, "{}{}{}", self.reff.to_char(), self.pos + 1, self.qry.to_char())
  }
}
