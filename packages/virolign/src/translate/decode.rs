use crate::io::aa::Aa;
use crate::io::letter::Letter;
use crate::io::nuc::Nuc;

/// Standard genetic code for canonical codons.
/// Callers must pass canonical (unambiguous) nucleotides only.
const fn decode_canonical(n1: Nuc, n2: Nuc, n3: Nuc) -> Aa {
  use Nuc::{A, C, G, T};
  match (n1, n2, n3) {
    (A, A, A | G) => Aa::K,
    (A, A, C | T) => Aa::N,
    (A, C, _) => Aa::T,
    (A, G, A | G) => Aa::R,
    (A, G, C | T) => Aa::S,
    (A, T, G) => Aa::M,
    (A, T, _) => Aa::I,
    (C, A, A | G) => Aa::Q,
    (C, A, C | T) => Aa::H,
    (C, C, _) => Aa::P,
    (C, G, _) => Aa::R,
    (C, T, _) => Aa::L,
    (G, A, A | G) => Aa::E,
    (G, A, C | T) => Aa::D,
    (G, C, _) => Aa::A,
    (G, G, _) => Aa::G,
    (G, T, _) => Aa::V,
    (T, A, A | G) => Aa::Stop,
    (T, A, C | T) => Aa::Y,
    (T, C, _) => Aa::S,
    (T, G, A) => Aa::Stop,
    (T, G, C | T) => Aa::C,
    (T, G, G) => Aa::W,
    (T, T, A | G) => Aa::L,
    (T, T, C | T) => Aa::F,
    _ => Aa::X,
  }
}

/// Decodes a nucleotide triplet into an aminoacid.
///
/// If any position is a gap, the result is a gap. Ambiguity codes (including `N`) resolve
/// to a concrete aminoacid only when every codon consistent with them decodes to the same
/// aminoacid; otherwise the result is `X`.
pub fn decode(triplet: &[Nuc]) -> Aa {
  debug_assert_eq!(triplet.len(), 3);

  if triplet.iter().any(Letter::is_gap) {
    return Aa::Gap;
  }

  if triplet.iter().all(|nuc| nuc.is_acgt()) {
    return decode_canonical(triplet[0], triplet[1], triplet[2]);
  }

  let mut agreed: Option<Aa> = None;
  for &n1 in triplet[0].disambiguate() {
    for &n2 in triplet[1].disambiguate() {
      for &n3 in triplet[2].disambiguate() {
        let aa = decode_canonical(n1, n2, n3);
        match agreed {
          None => agreed = Some(aa),
          Some(prev) if prev != aa => return Aa::X,
          Some(_) => {}
        }
      }
    }
  }

  agreed.unwrap_or(Aa::X)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::nuc::to_nuc_seq;
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  #[case("ATG", Aa::M)]
  #[case("AAA", Aa::K)]
  #[case("TGG", Aa::W)]
  #[case("TAA", Aa::Stop)]
  #[case("TAG", Aa::Stop)]
  #[case("TGA", Aa::Stop)]
  fn decodes_canonical_codons(#[case] codon: &str, #[case] expected: Aa) -> Result<(), Report> {
    assert_eq!(decode(&to_nuc_seq(codon)?), expected);
    Ok(())
  }

  #[rstest]
  fn decodes_gap_codons_to_gap() -> Result<(), Report> {
    assert_eq!(decode(&to_nuc_seq("A-G")?), Aa::Gap);
    assert_eq!(decode(&to_nuc_seq("---")?), Aa::Gap);
    Ok(())
  }

  // Third-position wobble: GGN is glycine no matter how the N resolves
  #[rstest]
  #[case("GGN", Aa::G)]
  #[case("CTN", Aa::L)]
  #[case("TCN", Aa::S)]
  // `TAR` resolves to TAA or TAG, both stops
  #[case("TAR", Aa::Stop)]
  // `ATN` can be isoleucine or methionine
  #[case("ATN", Aa::X)]
  #[case("ANA", Aa::X)]
  #[case("NNN", Aa::X)]
  fn decodes_ambiguous_codons(#[case] codon: &str, #[case] expected: Aa) -> Result<(), Report> {
    assert_eq!(decode(&to_nuc_seq(codon)?), expected);
    Ok(())
  }
}
