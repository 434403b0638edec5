use crate::analyze::nuc_del::NucDel;
use crate::analyze::nuc_sub::NucSub;
use crate::io::letter::Letter;
use crate::io::nuc::Nuc;
use crate::utils::range::Range;

#[derive(Clone, Debug)]
pub struct FindNucChangesOutput {
  pub substitutions: Vec<NucSub>,
  pub deletions: Vec<NucDel>,
  pub alignment_range: Range,
}

/// Finds nucleotide substitutions and deletion runs in the stripped aligned pair, and the
/// alignment range: the reference window in which the query is actually present.
///
/// Query letters that are ambiguous are never reported as substitutions: a substitution
/// requires both sides to be canonical and distinct. `N` runs are reported separately as
/// missing regions (see `find_letter_ranges`), not as mutations.
pub fn find_nuc_changes(qry_aln: &[Nuc], ref_aln: &[Nuc]) -> FindNucChangesOutput {
  debug_assert_eq!(qry_aln.len(), ref_aln.len());

  let n = qry_aln.len();

  let begin = qry_aln.iter().position(|nuc| !nuc.is_gap()).unwrap_or(n);
  let end = qry_aln.iter().rposition(|nuc| !nuc.is_gap()).map_or(begin, |pos| pos + 1);
  let alignment_range = Range::new(begin, end);

  let mut substitutions = Vec::<NucSub>::new();
  let mut deletions = Vec::<NucDel>::new();
  let mut del_begin: Option<usize> = None;

  for pos in begin..end {
    let qry_nuc = qry_aln[pos];
    let ref_nuc = ref_aln[pos];

    if qry_nuc.is_gap() {
      if del_begin.is_none() {
        del_begin = Some(pos);
      }
      continue;
    }

    if let Some(start) = del_begin.take() {
      deletions.push(NucDel {
        start,
        length: pos - start,
      });
    }

    if qry_nuc.is_acgt() && ref_nuc.is_acgt() && qry_nuc != ref_nuc {
      substitutions.push(NucSub::new(ref_nuc, pos, qry_nuc));
    }
  }

  // A deletion run cannot extend to the end of the alignment range: the range ends on a
  // non-gap letter by construction
  debug_assert!(del_begin.is_none());

  FindNucChangesOutput {
    substitutions,
    deletions,
    alignment_range,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::nuc::{to_nuc_seq, Nuc};
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  fn reports_nothing_on_identity() -> Result<(), Report> {
    let seq = to_nuc_seq("ATGAAATAG")?;
    let changes = find_nuc_changes(&seq, &seq);
    assert_eq!(changes.substitutions, vec![]);
    assert_eq!(changes.deletions, vec![]);
    assert_eq!(changes.alignment_range, Range::new(0, 9));
    Ok(())
  }

  #[rstest]
  fn finds_single_substitution() -> Result<(), Report> {
    let reff = to_nuc_seq("ATGAAATAG")?;
    let qry = to_nuc_seq("ATGAAGTAG")?;
    let changes = find_nuc_changes(&qry, &reff);
    assert_eq!(changes.substitutions, vec![NucSub::new(Nuc::A, 5, Nuc::G)]);
    assert_eq!(changes.deletions, vec![]);
    Ok(())
  }

  #[rstest]
  fn finds_deletion_run() -> Result<(), Report> {
    let reff = to_nuc_seq("ATGAAATTTTAG")?;
    let qry = to_nuc_seq("ATG---TTTTAG")?;
    let changes = find_nuc_changes(&qry, &reff);
    assert_eq!(changes.substitutions, vec![]);
    assert_eq!(changes.deletions, vec![NucDel { start: 3, length: 3 }]);
    Ok(())
  }

  #[rstest]
  fn computes_alignment_range_with_terminal_gaps() -> Result<(), Report> {
    let reff = to_nuc_seq("ATGAAATTTTAG")?;
    let qry = to_nuc_seq("---AAATTT---")?;
    let changes = find_nuc_changes(&qry, &reff);
    assert_eq!(changes.alignment_range, Range::new(3, 9));
    assert_eq!(changes.deletions, vec![]);
    Ok(())
  }

  #[rstest]
  fn skips_compatible_ambiguous_letters() -> Result<(), Report> {
    let reff = to_nuc_seq("ATGAAATAG")?;
    // R is compatible with the reference A; N is missing, not a substitution
    let qry = to_nuc_seq("ATGRNATAG")?;
    let changes = find_nuc_changes(&qry, &reff);
    assert_eq!(changes.substitutions, vec![]);
    Ok(())
  }

  #[rstest]
  fn skips_incompatible_ambiguous_letters() -> Result<(), Report> {
    let reff = to_nuc_seq("ATGCAATAG")?;
    // Y = {C,T} is incompatible with the reference A at position 4, but it is not canonical,
    // so it is not reported
    let qry = to_nuc_seq("ATGCYATAG")?;
    let changes = find_nuc_changes(&qry, &reff);
    assert_eq!(changes.substitutions, vec![]);
    Ok(())
  }
}
