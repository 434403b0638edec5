use crate::align::align::{align_nuc, AlignmentScratch};
use crate::align::gap_open::get_gap_open_close_scores_codon_aware;
use crate::align::insertions::strip_insertions;
use crate::align::params::AlignPairwiseParams;
use crate::align::seed_index::SeedIndex;
use crate::analyze::aa_changes::find_aa_changes;
use crate::analyze::letter_ranges::find_letter_ranges;
use crate::analyze::link_nuc_and_aa_changes::{link_nuc_and_aa_changes, LinkedNucAndAaChanges};
use crate::analyze::nuc_changes::find_nuc_changes;
use crate::gene::gene_map::GeneMap;
use crate::io::aa::from_aa_seq;
use crate::io::nuc::Nuc;
use crate::translate::coord_map::CoordMap;
use crate::translate::peptide::{RefPeptideMap, Translation};
use crate::translate::translate_genes::{translate_genes, translate_genes_ref};
use crate::tree::tree::Tree;
use crate::tree::tree_find_nearest_node::tree_find_nearest_node;
use crate::types::outputs::{AnalysisResult, AnalysisStage, PeptideWarning};
use crate::utils::error::report_to_string;
use crate::utils::range::Range;
use eyre::Report;
use indexmap::IndexMap;
use itertools::Itertools;

/// A non-fatal failure of one query, tagged with the pipeline stage it occurred in
#[derive(Debug)]
pub struct AnalysisFailure {
  pub stage: AnalysisStage,
  pub report: Report,
}

/// Shared immutable state of one run: everything that is loaded once and then read by all
/// workers. The tree is logically read-only during the analysis; new leaves are attached
/// by the coordinator after all workers are done.
pub struct Virolign {
  pub ref_seq: Vec<Nuc>,
  pub seed_index: SeedIndex,
  pub gene_map: GeneMap,
  pub gap_open_close_nuc: Vec<i32>,
  pub ref_peptides: RefPeptideMap,
  pub tree: Tree,
  pub params: AlignPairwiseParams,
}

impl Virolign {
  pub fn new(ref_seq: Vec<Nuc>, gene_map: GeneMap, tree: Tree, params: AlignPairwiseParams) -> Result<Self, Report> {
    gene_map.validate()?;
    gene_map.validate_against_ref(ref_seq.len())?;

    let seed_index = SeedIndex::new(&ref_seq, params.seed_length);
    let gap_open_close_nuc = get_gap_open_close_scores_codon_aware(&ref_seq, &gene_map, &params);
    let ref_peptides = translate_genes_ref(&ref_seq, &gene_map, &params)?;

    Ok(Self {
      ref_seq,
      seed_index,
      gene_map,
      gap_open_close_nuc,
      ref_peptides,
      tree,
      params,
    })
  }

  /// Runs the whole per-query pipeline: alignment, translation, mutation calling,
  /// and placement onto the reference tree.
  pub fn run_one(
    &self,
    index: usize,
    seq_name: &str,
    qry_seq: &[Nuc],
    scratch: &mut AlignmentScratch,
  ) -> Result<AnalysisResult, AnalysisFailure> {
    let alignment = align_nuc(
      qry_seq,
      &self.ref_seq,
      &self.seed_index,
      &self.gap_open_close_nuc,
      &self.params,
      scratch,
    )
    .map_err(|report| AnalysisFailure {
      stage: AnalysisStage::Alignment,
      report,
    })?;

    let coord_map = CoordMap::new(&alignment.ref_seq);
    let stripped = strip_insertions(&alignment.qry_seq, &alignment.ref_seq);

    let nuc_changes = find_nuc_changes(&stripped.qry_seq, &stripped.ref_seq);
    let alignment_range = nuc_changes.alignment_range;
    let missing = find_letter_ranges(&stripped.qry_seq, Nuc::N);

    let (translations, warnings) = self.translate_query_genes(
      &alignment.qry_seq,
      &alignment.ref_seq,
      &stripped.qry_seq,
      &coord_map,
      &alignment_range,
    );

    let frame_shifts = translations
      .iter()
      .flat_map(|translation| translation.frame_shifts.iter().cloned())
      .collect_vec();

    let aa_changes = find_aa_changes(
      &stripped.ref_seq,
      &stripped.qry_seq,
      &self.ref_peptides,
      &translations,
      &self.gene_map,
      &alignment_range,
    )
    .map_err(|report| AnalysisFailure {
      stage: AnalysisStage::Analysis,
      report,
    })?;

    let LinkedNucAndAaChanges {
      substitutions,
      deletions,
      aa_substitutions,
      aa_deletions,
    } = link_nuc_and_aa_changes(
      &nuc_changes.substitutions,
      &nuc_changes.deletions,
      &aa_changes.aa_substitutions,
      &aa_changes.aa_deletions,
    );

    let placement = tree_find_nearest_node(&self.tree, &substitutions, &deletions, &missing, &alignment_range);

    let peptides: IndexMap<String, String> = translations
      .iter()
      .map(|translation| (translation.gene_name.clone(), from_aa_seq(&translation.seq)))
      .collect();

    let total_substitutions = substitutions.len();
    let total_deletions = deletions.iter().map(|del| del.length).sum();
    let total_insertions = stripped.insertions.iter().map(|ins| ins.length).sum();
    let total_missing = missing.iter().map(|range| range.len()).sum();
    let total_aminoacid_substitutions = aa_substitutions.len();
    let total_aminoacid_deletions = aa_deletions.len();
    let total_frame_shifts = frame_shifts.len();

    Ok(AnalysisResult {
      seq_name: seq_name.to_owned(),
      index,
      alignment_score: alignment.alignment_score,
      alignment_range,
      substitutions,
      total_substitutions,
      deletions,
      total_deletions,
      insertions: stripped.insertions,
      total_insertions,
      missing,
      total_missing,
      aa_substitutions,
      total_aminoacid_substitutions,
      aa_deletions,
      total_aminoacid_deletions,
      frame_shifts,
      total_frame_shifts,
      peptides,
      warnings,
      nearest_node_id: placement.nearest_node_key,
      nearest_node_name: placement.nearest_node_name,
      clade: placement.clade,
      private_mutations: placement.private_mutations,
    })
  }

  /// Translation failures of single genes do not fail the query: they are collected as
  /// per-gene warnings and the rest of the analysis proceeds without those peptides
  fn translate_query_genes(
    &self,
    qry_aln: &[Nuc],
    ref_aln: &[Nuc],
    qry_stripped: &[Nuc],
    coord_map: &CoordMap,
    alignment_range: &Range,
  ) -> (Vec<Translation>, Vec<PeptideWarning>) {
    let mut translations = Vec::<Translation>::new();
    let mut warnings = Vec::<PeptideWarning>::new();

    for (gene_name, result) in translate_genes(
      qry_aln,
      ref_aln,
      qry_stripped,
      &self.gene_map,
      coord_map,
      alignment_range,
      &self.params,
    ) {
      match result {
        Ok(translation) => translations.push(translation),
        Err(report) => warnings.push(PeptideWarning {
          gene_name,
          warning: report_to_string(&report),
        }),
      }
    }

    (translations, warnings)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::align::insertions::Insertion;
  use crate::analyze::nuc_del::NucDel;
  use crate::analyze::nuc_sub::NucSub;
  use crate::gene::gene::{Gene, GeneStrand};
  use crate::io::json::json_parse;
  use crate::io::nuc::to_nuc_seq;
  use crate::tree::tree::AuspiceTree;
  use crate::tree::tree_preprocess::tree_preprocess;
  use indexmap::IndexMap;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  // Reference with one gene spanning the whole genome:
  // ATG AAA CCC GGG TTT ACA TCA TCA GCA TAG -> M K P G F T S S A *
  const REF_SEQ: &str = "ATGAAACCCGGGTTTACATCATCAGCATAG";

  fn test_params() -> AlignPairwiseParams {
    AlignPairwiseParams {
      min_length: 6,
      seed_length: 3,
      seed_spacing: 3,
      min_seeds: 2,
      max_seed_shift: 20,
      ..AlignPairwiseParams::default()
    }
  }

  fn test_tree_json() -> &'static str {
    r#"{
      "tree": {
        "name": "root",
        "branch_attrs": { "mutations": {} },
        "node_attrs": { "clade_membership": { "value": "A" } },
        "children": [
          {
            "name": "node-AB",
            "branch_attrs": { "mutations": { "nuc": ["A6G"] } },
            "node_attrs": { "clade_membership": { "value": "AB" } }
          }
        ]
      }
    }"#
  }

  fn make_virolign() -> Result<Virolign, Report> {
    let ref_seq = to_nuc_seq(REF_SEQ)?;
    let gene_map = GeneMap::from_genes(IndexMap::from([(
      "g".to_owned(),
      Gene {
        gene_name: "g".to_owned(),
        start: 0,
        end: 30,
        strand: GeneStrand::Forward,
        frame: 0,
        length: 30,
      },
    )]));
    let auspice: AuspiceTree = json_parse(test_tree_json())?;
    let tree = tree_preprocess(auspice, &ref_seq)?;
    Virolign::new(ref_seq, gene_map, tree, test_params())
  }

  fn run_query(qry: &str) -> Result<AnalysisResult, Report> {
    let virolign = make_virolign()?;
    let qry_seq = to_nuc_seq(qry)?;
    let mut scratch = AlignmentScratch::new();
    virolign
      .run_one(0, "query-1", &qry_seq, &mut scratch)
      .map_err(|failure| failure.report)
  }

  // A query identical to the reference produces no changes of any kind and is placed
  // at the root with no private mutations
  #[rstest]
  fn analyzes_identical_query() -> Result<(), Report> {
    let result = run_query(REF_SEQ)?;

    assert_eq!(result.substitutions, vec![]);
    assert_eq!(result.deletions, vec![]);
    assert_eq!(result.insertions, vec![]);
    assert_eq!(result.missing, vec![]);
    assert_eq!(result.aa_substitutions, vec![]);
    assert_eq!(result.aa_deletions, vec![]);
    assert_eq!(result.frame_shifts, vec![]);
    assert_eq!(result.peptides["g"], "MKPGFTSSA*");
    assert_eq!(result.alignment_range, Range::new(0, 30));

    assert_eq!(result.nearest_node_name, "root");
    assert_eq!(result.clade, "A");
    assert_eq!(result.private_mutations, vec![]);
    Ok(())
  }

  // A silent nucleotide substitution is reported at the nucleotide level only
  #[rstest]
  fn analyzes_synonymous_substitution() -> Result<(), Report> {
    // AAA -> AAG, both lysine
    let qry = "ATGAAGCCCGGGTTTACATCATCAGCATAG";
    let result = run_query(qry)?;

    assert_eq!(result.substitutions.len(), 1);
    assert_eq!(result.substitutions[0].unlinked(), NucSub::new(Nuc::A, 5, Nuc::G));
    assert_eq!(result.aa_substitutions, vec![]);
    assert_eq!(result.aa_deletions, vec![]);

    // The substitution matches the only mutation of node-AB
    assert_eq!(result.nearest_node_name, "node-AB");
    assert_eq!(result.clade, "AB");
    assert_eq!(result.private_mutations, vec![]);
    Ok(())
  }

  // Insertions are stripped and recorded; the stripped query equals the reference
  #[rstest]
  fn analyzes_insertion() -> Result<(), Report> {
    // CAC inserted after reference position 12
    let qry = "ATGAAACCCGGGCACTTTACATCATCAGCATAG";
    let result = run_query(qry)?;

    assert_eq!(
      result.insertions,
      vec![Insertion {
        pos: 12,
        length: 3,
        ins: to_nuc_seq("CAC")?,
      }]
    );
    assert_eq!(result.substitutions, vec![]);
    assert_eq!(result.deletions, vec![]);
    assert_eq!(result.frame_shifts, vec![]);
    Ok(())
  }

  // An in-frame deletion shows up as a nucleotide deletion run and an aminoacid deletion,
  // cross-linked to each other
  #[rstest]
  fn analyzes_codon_deletion() -> Result<(), Report> {
    // Codon 1 (AAA) deleted
    let qry = "ATGCCCGGGTTTACATCATCAGCATAG";
    let result = run_query(qry)?;

    assert_eq!(result.deletions, vec![NucDel { start: 3, length: 3 }]);
    assert_eq!(result.substitutions, vec![]);
    assert_eq!(result.frame_shifts, vec![]);

    assert_eq!(result.aa_deletions.len(), 1);
    assert_eq!(result.aa_deletions[0].pos, 1);
    assert_eq!(result.aa_deletions[0].codon_nuc_range, Range::new(3, 6));
    assert_eq!(result.aa_deletions[0].nuc_deletions, vec![NucDel { start: 3, length: 3 }]);
    assert_eq!(result.peptides["g"], "M-PGFTSSA*");
    Ok(())
  }

  // Runs of N are missing regions, not substitutions, and the affected codon decodes to X
  #[rstest]
  fn analyzes_missing_region() -> Result<(), Report> {
    let qry = "ATGNNNCCCGGGTTTACATCATCAGCATAG";
    let result = run_query(qry)?;

    assert_eq!(result.substitutions, vec![]);
    assert_eq!(result.missing.len(), 1);
    assert_eq!(result.missing[0].begin, 3);
    assert_eq!(result.missing[0].end, 6);
    assert_eq!(result.peptides["g"], "MXPGFTSSA*");
    // The unknown aminoacid X is not reported as a substitution
    assert_eq!(result.aa_substitutions, vec![]);
    Ok(())
  }

  #[rstest]
  fn fails_on_unalignable_query() -> Result<(), Report> {
    let virolign = make_virolign()?;
    let qry_seq = to_nuc_seq("GGGGGGGGGGGGGGGGGGGGGGGG")?;
    let mut scratch = AlignmentScratch::new();
    let failure = virolign.run_one(0, "query-bad", &qry_seq, &mut scratch);
    assert!(matches!(
      failure,
      Err(AnalysisFailure {
        stage: AnalysisStage::Alignment,
        ..
      })
    ));
    Ok(())
  }
}

