use crate::align::insertions::NucIns;
use crate::analyze::aa_del::AaDel;
use crate::analyze::aa_sub::AaSub;
use crate::analyze::letter_ranges::NucRange;
use crate::analyze::nuc_del::NucDel;
use crate::analyze::nuc_sub::NucSub;
use crate::translate::frame_shifts::FrameShift;
use crate::tree::tree::TreeNodeKey;
use crate::utils::range::Range;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stage of the per-query pipeline in which a non-fatal error occurred
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisStage {
  Ingest,
  Alignment,
  Translation,
  Analysis,
  TreePlacement,
}

/// A warning about one gene of one query which did not prevent the rest of the analysis
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeptideWarning {
  pub gene_name: String,
  pub warning: String,
}

/// Full per-query report
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
  pub seq_name: String,
  pub index: usize,

  pub alignment_score: i32,
  pub alignment_range: Range,

  pub substitutions: Vec<NucSub>,
  pub total_substitutions: usize,
  pub deletions: Vec<NucDel>,
  pub total_deletions: usize,
  pub insertions: Vec<NucIns>,
  pub total_insertions: usize,
  pub missing: Vec<NucRange>,
  pub total_missing: usize,

  pub aa_substitutions: Vec<AaSub>,
  pub total_aminoacid_substitutions: usize,
  pub aa_deletions: Vec<AaDel>,
  pub total_aminoacid_deletions: usize,

  pub frame_shifts: Vec<FrameShift>,
  pub total_frame_shifts: usize,

  /// Query peptides, one per translated gene, in gene map order
  pub peptides: IndexMap<String, String>,
  pub warnings: Vec<PeptideWarning>,

  pub nearest_node_id: TreeNodeKey,
  pub nearest_node_name: String,
  pub clade: String,
  pub private_mutations: Vec<NucSub>,
}

/// Report entry for a query that failed before producing a result
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisError {
  pub seq_name: String,
  pub index: usize,
  pub stage: AnalysisStage,
  pub error: String,
}

/// The complete results document
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultsJson {
  pub results: Vec<AnalysisResult>,
  pub errors: Vec<AnalysisError>,
}
