use crate::align::params::AlignPairwiseParams;
use crate::gene::gene_map::GeneMap;
use crate::io::nuc::Nuc;

/// Uniform gap-open penalty for every reference position
pub fn get_gap_open_close_scores_flat(ref_seq: &[Nuc], params: &AlignPairwiseParams) -> Vec<i32> {
  let value = params.penalty_gap_open;
  let len = ref_seq.len() + 2;
  vec![value; len]
}

/// Gap-open penalties adjusted inside genes so that gaps preferentially align with codon
/// boundaries: opening a gap at the first position of a codon is cheaper than mid-codon
pub fn get_gap_open_close_scores_codon_aware(
  ref_seq: &[Nuc],
  gene_map: &GeneMap,
  params: &AlignPairwiseParams,
) -> Vec<i32> {
  let mut gap_open_close = get_gap_open_close_scores_flat(ref_seq, params);
  for gene in gene_map.genes() {
    for i in (gene.start..gene.end).step_by(3) {
      gap_open_close[i] = params.penalty_gap_open_in_frame;
      gap_open_close[i + 1] = params.penalty_gap_open_out_of_frame;
      gap_open_close[i + 2] = params.penalty_gap_open_out_of_frame;
    }
  }
  gap_open_close
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::gene::gene::{Gene, GeneStrand};
  use crate::io::nuc::to_nuc_seq;
  use eyre::Report;
  use indexmap::IndexMap;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  fn scores_codon_aware() -> Result<(), Report> {
    let ref_seq = to_nuc_seq("AAATTTGGG")?;
    let gene = Gene {
      gene_name: "g".to_owned(),
      start: 3,
      end: 9,
      strand: GeneStrand::Forward,
      frame: 0,
      length: 6,
    };
    let gene_map = GeneMap::from_genes(IndexMap::from([("g".to_owned(), gene)]));
    let params = AlignPairwiseParams::default();

    let scores = get_gap_open_close_scores_codon_aware(&ref_seq, &gene_map, &params);
    assert_eq!(scores, vec![6, 6, 6, 7, 8, 8, 7, 8, 8, 6, 6]);
    Ok(())
  }
}
