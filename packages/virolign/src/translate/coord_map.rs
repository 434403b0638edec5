use crate::io::letter::Letter;
use crate::io::nuc::Nuc;
use crate::utils::range::Range;

/// Converts positions between alignment and reference coordinate spaces.
///
/// Insertions in the query introduce gaps into the aligned reference, so positions of
/// nucleotides differ between the aligned sequences and the original reference. Some
/// operations are done in alignment space, while others in reference space. This struct
/// allows for conversion of position indices from one space to another.
#[derive(Debug, Clone)]
pub struct CoordMap {
  aln_to_ref_table: Vec<usize>,
  ref_to_aln_table: Vec<usize>,
}

impl CoordMap {
  /// Takes the aligned reference before insertions (i.e. gaps in ref) are stripped
  pub fn new(ref_aln: &[Nuc]) -> Self {
    let mut aln_to_ref_table = Vec::<usize>::with_capacity(ref_aln.len());
    let mut ref_to_aln_table = Vec::<usize>::with_capacity(ref_aln.len());

    let mut ref_pos: usize = 0;
    for (aln_pos, nuc) in ref_aln.iter().enumerate() {
      if nuc.is_gap() {
        aln_to_ref_table.push(ref_pos.saturating_sub(1));
      } else {
        aln_to_ref_table.push(ref_pos);
        ref_to_aln_table.push(aln_pos);
        ref_pos += 1;
      }
    }

    Self {
      aln_to_ref_table,
      ref_to_aln_table,
    }
  }

  pub fn aln_to_ref_position(&self, aln: usize) -> usize {
    self.aln_to_ref_table[aln]
  }

  // Reff is used because `ref` is magic word in Rust
  pub fn ref_to_aln_position(&self, reff: usize) -> usize {
    self.ref_to_aln_table[reff]
  }

  pub fn aln_to_ref_range(&self, aln_range: &Range) -> Range {
    Range {
      begin: self.aln_to_ref_table[aln_range.begin],
      end: self.aln_to_ref_table[aln_range.end - 1] + 1,
    }
  }

  pub fn ref_to_aln_range(&self, ref_range: &Range) -> Range {
    Range {
      begin: self.ref_to_aln_table[ref_range.begin],
      end: self.ref_to_aln_table[ref_range.end - 1] + 1,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::nuc::to_nuc_seq;
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  fn maps_aln_to_ref() -> Result<(), Report> {
    // ref pos: 0  1  2  3           4  5  6  7           8
    // ref    : A  C  T  C  -  -  -  C  G  T  G  -  -  -  A
    // aln pos: 0  1  2  3  4  5  6  7  8  9  10 11 12 13 14
    let coord_map = CoordMap::new(&to_nuc_seq("ACTC---CGTG---A")?);
    assert_eq!(
      coord_map.aln_to_ref_table,
      vec![0, 1, 2, 3, 3, 3, 3, 4, 5, 6, 7, 7, 7, 7, 8]
    );
    Ok(())
  }

  #[rstest]
  fn maps_ref_to_aln() -> Result<(), Report> {
    let coord_map = CoordMap::new(&to_nuc_seq("ACTC---CGTG---A")?);
    assert_eq!(coord_map.ref_to_aln_table, vec![0, 1, 2, 3, 7, 8, 9, 10, 14]);
    Ok(())
  }

  #[rstest]
  fn maps_range_ref_to_aln() -> Result<(), Report> {
    let coord_map = CoordMap::new(&to_nuc_seq("ACTC---CGTG---A")?);
    assert_eq!(
      coord_map.ref_to_aln_range(&Range { begin: 3, end: 6 }),
      Range { begin: 3, end: 9 }
    );
    Ok(())
  }

  #[rstest]
  fn maps_range_aln_to_ref() -> Result<(), Report> {
    let coord_map = CoordMap::new(&to_nuc_seq("ACTC---CGTG---A")?);
    assert_eq!(
      coord_map.aln_to_ref_range(&Range { begin: 3, end: 9 }),
      Range { begin: 3, end: 6 }
    );
    Ok(())
  }

  #[rstest]
  fn maps_identity_without_gaps() -> Result<(), Report> {
    let coord_map = CoordMap::new(&to_nuc_seq("ACTCG")?);
    assert_eq!(coord_map.aln_to_ref_position(3), 3);
    assert_eq!(coord_map.ref_to_aln_position(3), 3);
    Ok(())
  }
}
