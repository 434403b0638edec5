use crate::io::nuc::Nuc;

/// Watson-Crick complement, extended to the full IUPAC alphabet
const fn complement(nuc: Nuc) -> Nuc {
  match nuc {
    Nuc::A => Nuc::T,
    Nuc::C => Nuc::G,
    Nuc::G => Nuc::C,
    Nuc::T => Nuc::A,
    Nuc::R => Nuc::Y,
    Nuc::Y => Nuc::R,
    Nuc::S => Nuc::S,
    Nuc::W => Nuc::W,
    Nuc::K => Nuc::M,
    Nuc::M => Nuc::K,
    Nuc::B => Nuc::V,
    Nuc::D => Nuc::H,
    Nuc::H => Nuc::D,
    Nuc::V => Nuc::B,
    Nuc::N => Nuc::N,
    Nuc::Gap => Nuc::Gap,
  }
}

pub fn reverse_complement_in_place(seq: &mut [Nuc]) {
  seq.reverse();
  for nuc in seq.iter_mut() {
    *nuc = complement(*nuc);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::nuc::{from_nuc_seq, to_nuc_seq};
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  fn reverse_complements() -> Result<(), Report> {
    let mut seq = to_nuc_seq("ATGCCCGTA")?;
    reverse_complement_in_place(&mut seq);
    assert_eq!(from_nuc_seq(&seq), "TACGGGCAT");
    Ok(())
  }

  #[rstest]
  fn reverse_complements_ambiguous() -> Result<(), Report> {
    let mut seq = to_nuc_seq("ARN-")?;
    reverse_complement_in_place(&mut seq);
    assert_eq!(from_nuc_seq(&seq), "-NYT");
    Ok(())
  }
}
