use crate::analyze::nuc_del::NucDel;
use crate::analyze::nuc_sub::NucSub;
use crate::io::aa::Aa;
use crate::io::letter::Letter;
use crate::io::nuc::Nuc;
use crate::utils::range::Range;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Aminoacid substitution in one gene. `pos` is the 0-based codon index within the gene.
/// `codon_nuc_range` is the codon's nucleotide range in reference coordinates;
/// the contexts span one codon to each side, clamped to the sequence.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AaSub {
  pub gene: String,
  #[serde(rename = "ref")]
  pub reff: Aa,
  pub pos: usize,
  pub qry: Aa,
  pub codon_nuc_range: Range,
  #[serde(with = "crate::io::letter::serde_seq")]
  #[schemars(with = "String")]
  pub ref_context: Vec<Nuc>,
  #[serde(with = "crate::io::letter::serde_seq")]
  #[schemars(with = "String")]
  pub query_context: Vec<Nuc>,
  pub context_nuc_range: Range,
  pub nuc_substitutions: Vec<NucSub>,
  pub nuc_deletions: Vec<NucDel>,
}

impl AaSub {
  /// A copy of this substitution without the cross-links, for embedding into other records
  pub fn unlinked(&self) -> Self {
    Self {
      nuc_substitutions: vec![],
      nuc_deletions: vec![],
      ..self.clone()
    }
  }

  pub fn to_string_without_gene(&self) -> String {
    // Positions are 1-based on the wire
    format!("{}{}{}", self.reff.to_char(), self.pos + 1, self.qry.to_char())
  }
}

impl Ord for AaSub {
  fn cmp(&self, other: &Self) -> Ordering {
    (&self.gene, self.pos, self.reff, self.qry).cmp(&(&other.gene, other.pos, other.reff, other.qry))
  }
}

impl PartialOrd for AaSub {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Display for AaSub {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}", self.gene, self.to_string_without_gene())
  }
}
