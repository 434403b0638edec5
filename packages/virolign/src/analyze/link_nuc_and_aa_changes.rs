use crate::analyze::aa_del::AaDel;
use crate::analyze::aa_sub::AaSub;
use crate::analyze::nuc_del::NucDel;
use crate::analyze::nuc_sub::NucSub;

#[derive(Clone, Debug)]
pub struct LinkedNucAndAaChanges {
  pub substitutions: Vec<NucSub>,
  pub deletions: Vec<NucDel>,
  pub aa_substitutions: Vec<AaSub>,
  pub aa_deletions: Vec<AaDel>,
}

/// Cross-links nucleotide and aminoacid changes, in both directions, by codon overlap:
///
/// - each aminoacid change receives the nucleotide substitutions and deletions whose
///   positions fall within its codon's nucleotide range,
/// - each nucleotide substitution receives the aminoacid changes whose codon range
///   contains the substitution's position.
///
/// The linking is many-to-many. Embedded copies carry no nested links of their own.
pub fn link_nuc_and_aa_changes(
  substitutions: &[NucSub],
  deletions: &[NucDel],
  aa_substitutions: &[AaSub],
  aa_deletions: &[AaDel],
) -> LinkedNucAndAaChanges {
  let mut substitutions = substitutions.to_vec();
  let mut aa_substitutions = aa_substitutions.to_vec();
  let mut aa_deletions = aa_deletions.to_vec();

  for aa_sub in &mut aa_substitutions {
    aa_sub.nuc_substitutions = substitutions
      .iter()
      .filter(|nuc_sub| aa_sub.codon_nuc_range.contains(nuc_sub.pos))
      .map(NucSub::unlinked)
      .collect();
    aa_sub.nuc_deletions = deletions
      .iter()
      .filter(|nuc_del| aa_sub.codon_nuc_range.has_intersection(&nuc_del.range()))
      .copied()
      .collect();
  }

  for aa_del in &mut aa_deletions {
    aa_del.nuc_substitutions = substitutions
      .iter()
      .filter(|nuc_sub| aa_del.codon_nuc_range.contains(nuc_sub.pos))
      .map(NucSub::unlinked)
      .collect();
    aa_del.nuc_deletions = deletions
      .iter()
      .filter(|nuc_del| aa_del.codon_nuc_range.has_intersection(&nuc_del.range()))
      .copied()
      .collect();
  }

  for nuc_sub in &mut substitutions {
    nuc_sub.aa_substitutions = aa_substitutions
      .iter()
      .filter(|aa_sub| aa_sub.codon_nuc_range.contains(nuc_sub.pos))
      .map(AaSub::unlinked)
      .collect();
    nuc_sub.aa_deletions = aa_deletions
      .iter()
      .filter(|aa_del| aa_del.codon_nuc_range.contains(nuc_sub.pos))
      .map(AaDel::unlinked)
      .collect();
  }

  LinkedNucAndAaChanges {
    substitutions,
    deletions: deletions.to_vec(),
    aa_substitutions,
    aa_deletions,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::aa::Aa;
  use crate::io::nuc::{to_nuc_seq, Nuc};
  use crate::utils::range::Range;
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  fn make_aa_sub(codon_nuc_range: Range) -> Result<AaSub, Report> {
    Ok(AaSub {
      gene: "g".to_owned(),
      reff: Aa::K,
      pos: 1,
      qry: Aa::Q,
      codon_nuc_range,
      ref_context: to_nuc_seq("ATGAAATAG")?,
      query_context: to_nuc_seq("ATGCAATAG")?,
      context_nuc_range: Range::new(0, 9),
      nuc_substitutions: vec![],
      nuc_deletions: vec![],
    })
  }

  #[rstest]
  fn links_substitutions_both_ways() -> Result<(), Report> {
    let nuc_subs = vec![NucSub::new(Nuc::A, 3, Nuc::C), NucSub::new(Nuc::A, 7, Nuc::G)];
    let aa_subs = vec![make_aa_sub(Range::new(3, 6))?];

    let linked = link_nuc_and_aa_changes(&nuc_subs, &[], &aa_subs, &[]);

    // The aminoacid change owns exactly the nucleotide substitution inside its codon
    assert_eq!(
      linked.aa_substitutions[0].nuc_substitutions,
      vec![NucSub::new(Nuc::A, 3, Nuc::C)]
    );

    // And vice versa: only the nucleotide substitution inside the codon points back
    assert_eq!(linked.substitutions[0].aa_substitutions.len(), 1);
    assert_eq!(linked.substitutions[1].aa_substitutions.len(), 0);
    Ok(())
  }

  #[rstest]
  fn links_deletions_by_overlap() -> Result<(), Report> {
    let nuc_dels = vec![NucDel { start: 3, length: 3 }];
    let aa_del = AaDel {
      gene: "g".to_owned(),
      reff: Aa::K,
      pos: 1,
      codon_nuc_range: Range::new(3, 6),
      ref_context: to_nuc_seq("ATGAAATTTTAG")?,
      query_context: to_nuc_seq("ATG---TTTTAG")?,
      context_nuc_range: Range::new(0, 9),
      nuc_substitutions: vec![],
      nuc_deletions: vec![],
    };

    let linked = link_nuc_and_aa_changes(&[], &nuc_dels, &[], &[aa_del]);
    assert_eq!(linked.aa_deletions[0].nuc_deletions, vec![NucDel { start: 3, length: 3 }]);
    Ok(())
  }

  // Linking is symmetric: a nucleotide substitution appears in an aminoacid change's list
  // exactly when the codon range contains its position
  #[rstest]
  fn linking_is_symmetric() -> Result<(), Report> {
    let nuc_subs = vec![
      NucSub::new(Nuc::A, 2, Nuc::C),
      NucSub::new(Nuc::A, 4, Nuc::C),
      NucSub::new(Nuc::A, 5, Nuc::C),
      NucSub::new(Nuc::T, 8, Nuc::C),
    ];
    let aa_subs = vec![make_aa_sub(Range::new(3, 6))?];

    let linked = link_nuc_and_aa_changes(&nuc_subs, &[], &aa_subs, &[]);

    for nuc_sub in &linked.substitutions {
      let linked_back = linked.aa_substitutions[0]
        .nuc_substitutions
        .iter()
        .any(|linked_sub| linked_sub.pos == nuc_sub.pos);
      let contained = linked.aa_substitutions[0].codon_nuc_range.contains(nuc_sub.pos);
      assert_eq!(linked_back, contained);
      assert_eq!(!nuc_sub.aa_substitutions.is_empty(), contained);
    }
    Ok(())
  }
}
