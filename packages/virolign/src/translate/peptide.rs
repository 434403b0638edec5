use crate::io::aa::Aa;
use crate::translate::frame_shifts::FrameShift;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Peptide of one gene, translated from the query, with the frame shifts found in that gene
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
  pub gene_name: String,
  #[serde(with = "crate::io::letter::serde_seq")]
  #[schemars(with = "String")]
  pub seq: Vec<Aa>,
  pub frame_shifts: Vec<FrameShift>,
}

/// Reference peptides, keyed by gene name
pub type RefPeptideMap = BTreeMap<String, Vec<Aa>>;
