use crate::io::aa::Aa;
use crate::io::nuc::Nuc;
use crate::translate::decode::decode;

/// Translates a nucleotide sequence codon-by-codon.
///
/// The peptide length is the number of whole codons (the length is rounded down to a
/// multiple of 3, so that translation does not overrun the buffer). If `translate_past_stop`
/// is false, translation halts at the first stop codon and the remaining positions stay gaps.
pub fn translate(seq: &[Nuc], translate_past_stop: bool) -> Vec<Aa> {
  let peptide_length = seq.len() / 3;

  let mut peptide = vec![Aa::Gap; peptide_length];
  for i_aa in 0..peptide_length {
    let i_nuc = i_aa * 3;
    let aminoacid = decode(&seq[i_nuc..i_nuc + 3]);
    peptide[i_aa] = aminoacid;
    if !translate_past_stop && aminoacid == Aa::Stop {
      break;
    }
  }

  peptide
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::aa::from_aa_seq;
  use crate::io::nuc::to_nuc_seq;
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  fn translates_simple_orf() -> Result<(), Report> {
    let seq = to_nuc_seq("ATGAAATAG")?;
    assert_eq!(from_aa_seq(&translate(&seq, false)), "MK*");
    Ok(())
  }

  #[rstest]
  fn halts_at_premature_stop() -> Result<(), Report> {
    let seq = to_nuc_seq("ATGTAAAAATTT")?;
    assert_eq!(from_aa_seq(&translate(&seq, false)), "M*--");
    Ok(())
  }

  #[rstest]
  fn translates_past_stop_when_asked() -> Result<(), Report> {
    let seq = to_nuc_seq("ATGTAAAAATTT")?;
    assert_eq!(from_aa_seq(&translate(&seq, true)), "M*KF");
    Ok(())
  }

  #[rstest]
  fn truncates_incomplete_codons() -> Result<(), Report> {
    let seq = to_nuc_seq("ATGAA")?;
    assert_eq!(from_aa_seq(&translate(&seq, false)), "M");
    Ok(())
  }
}
