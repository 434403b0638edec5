use crate::align::params::AlignPairwiseParams;
use crate::io::nuc::Nuc;
use crate::make_error;
use eyre::Report;
use std::collections::HashMap;

/// k-mer lookup index over the reference sequence.
///
/// Maps every k-mer of the reference to the list of its positions, in ascending order.
/// K-mers containing `N`, other ambiguity codes or gaps are not indexed.
#[derive(Debug, Clone)]
pub struct SeedIndex {
  k: usize,
  index: HashMap<u64, Vec<usize>>,
}

/// Packs a canonical k-mer into an integer, 2 bits per nucleotide.
/// Returns `None` when the window contains anything other than ACGT.
fn encode_kmer(kmer: &[Nuc]) -> Option<u64> {
  debug_assert!(kmer.len() <= 31);
  let mut code: u64 = 0;
  for nuc in kmer {
    let bits = match nuc {
      Nuc::A => 0,
      Nuc::C => 1,
      Nuc::G => 2,
      Nuc::T => 3,
      _ => return None,
    };
    code = (code << 2) | bits;
  }
  Some(code)
}

impl SeedIndex {
  pub fn new(ref_seq: &[Nuc], k: usize) -> Self {
    let mut index = HashMap::<u64, Vec<usize>>::new();
    if ref_seq.len() >= k {
      for pos in 0..=(ref_seq.len() - k) {
        if let Some(code) = encode_kmer(&ref_seq[pos..pos + k]) {
          index.entry(code).or_default().push(pos);
        }
      }
    }
    Self { k, index }
  }

  pub const fn k(&self) -> usize {
    self.k
  }

  pub fn lookup(&self, kmer: &[Nuc]) -> &[usize] {
    encode_kmer(kmer)
      .and_then(|code| self.index.get(&code))
      .map_or(&[], Vec::as_slice)
  }
}

/// An exact k-mer match between query and reference
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SeedMatch {
  pub qry_pos: usize,
  pub ref_pos: usize,
}

impl SeedMatch {
  /// Offset of the reference position relative to the query position
  pub const fn shift(&self) -> isize {
    self.ref_pos as isize - self.qry_pos as isize
  }
}

/// Colinear chain of seed matches that anchors the banded alignment
#[derive(Clone, Debug)]
pub struct SeedChain {
  pub matches: Vec<SeedMatch>,
}

impl SeedChain {
  /// Median of the seed shifts: the diagonal around which the alignment band is centered
  pub fn mean_shift(&self) -> isize {
    let mut shifts: Vec<isize> = self.matches.iter().map(SeedMatch::shift).collect();
    shifts.sort_unstable();
    shifts[shifts.len() / 2]
  }

  pub fn min_shift(&self) -> isize {
    self.matches.iter().map(SeedMatch::shift).min().unwrap_or(0)
  }

  pub fn max_shift(&self) -> isize {
    self.matches.iter().map(SeedMatch::shift).max().unwrap_or(0)
  }

  pub fn first_qry_pos(&self) -> usize {
    self.matches.first().map_or(0, |seed| seed.qry_pos)
  }

  pub fn last_qry_pos(&self) -> usize {
    self.matches.last().map_or(0, |seed| seed.qry_pos)
  }
}

/// Takes query seeds at a regular stride and looks them up in the reference index
fn find_seed_matches(qry_seq: &[Nuc], seed_index: &SeedIndex, params: &AlignPairwiseParams) -> Vec<SeedMatch> {
  let k = seed_index.k();
  if qry_seq.len() < k {
    return vec![];
  }

  let total = qry_seq.len() - k;
  let n_seeds = params.min_seeds.max(total / params.seed_spacing.max(1));
  let stride = (total / n_seeds.max(1)).max(1);

  let mut matches = Vec::<SeedMatch>::new();
  let mut qry_pos = 0;
  while qry_pos <= total {
    for &ref_pos in seed_index.lookup(&qry_seq[qry_pos..qry_pos + k]) {
      matches.push(SeedMatch { qry_pos, ref_pos });
    }
    qry_pos += stride;
  }
  matches
}

/// Builds candidate chains of colinear seed matches and picks the best one.
///
/// Within one chain, query and reference positions are strictly increasing and the shift
/// between successive seeds stays within the configured band. Fails when no chain gathers
/// the required number of seeds.
pub fn find_seed_chain(
  qry_seq: &[Nuc],
  seed_index: &SeedIndex,
  params: &AlignPairwiseParams,
) -> Result<SeedChain, Report> {
  let mut matches = find_seed_matches(qry_seq, seed_index, params);
  matches.sort_unstable_by_key(|seed| (seed.qry_pos, seed.ref_pos));

  let mut chains: Vec<Vec<SeedMatch>> = vec![];
  for seed in matches {
    let mut placed = false;
    for chain in &mut chains {
      let last = chain.last().expect("Chains are never empty");
      let shift_delta = (seed.shift() - last.shift()).unsigned_abs();
      if seed.qry_pos > last.qry_pos && seed.ref_pos > last.ref_pos && shift_delta <= params.max_seed_shift {
        chain.push(seed);
        placed = true;
        break;
      }
    }
    if !placed {
      chains.push(vec![seed]);
    }
  }

  let best = chains.into_iter().max_by_key(Vec::len);
  match best {
    Some(matches) if matches.len() >= params.min_seeds.max(1) => Ok(SeedChain { matches }),
    _ => make_error!(
      "Unable to align: no chain of at least {} colinear seed matches was found. This is likely due to low quality of the provided sequence, or due to using incorrect reference sequence.",
      params.min_seeds.max(1)
    ),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::nuc::to_nuc_seq;
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  fn test_params() -> AlignPairwiseParams {
    AlignPairwiseParams {
      seed_length: 3,
      seed_spacing: 3,
      min_seeds: 2,
      max_seed_shift: 10,
      ..AlignPairwiseParams::default()
    }
  }

  #[rstest]
  fn indexes_and_looks_up_kmers() -> Result<(), Report> {
    let ref_seq = to_nuc_seq("ACGTACGT")?;
    let index = SeedIndex::new(&ref_seq, 4);
    assert_eq!(index.lookup(&to_nuc_seq("ACGT")?), [0, 4]);
    assert_eq!(index.lookup(&to_nuc_seq("CGTA")?), [1]);
    assert!(index.lookup(&to_nuc_seq("TTTT")?).is_empty());
    Ok(())
  }

  #[rstest]
  fn skips_ambiguous_kmers() -> Result<(), Report> {
    let ref_seq = to_nuc_seq("ACNTACGT")?;
    let index = SeedIndex::new(&ref_seq, 4);
    // Windows overlapping the N are not indexed
    assert_eq!(index.lookup(&to_nuc_seq("TACG")?), [3]);
    assert!(index.lookup(&to_nuc_seq("ACNT")?).is_empty());
    Ok(())
  }

  #[rstest]
  fn chains_identical_sequences_at_zero_shift() -> Result<(), Report> {
    let params = test_params();
    let ref_seq = to_nuc_seq("ATGGCATTGACCGTTAAGCTAGCTT")?;
    let index = SeedIndex::new(&ref_seq, params.seed_length);
    let chain = find_seed_chain(&ref_seq, &index, &params)?;
    assert!(chain.matches.len() >= 2);
    assert_eq!(chain.mean_shift(), 0);
    Ok(())
  }

  #[rstest]
  fn chains_shifted_query() -> Result<(), Report> {
    let params = test_params();
    let ref_seq = to_nuc_seq("AAAAATGGCATTGACCGTTAAGCT")?;
    // The query is the reference with the first 5 nucleotides missing
    let qry_seq = to_nuc_seq("ATGGCATTGACCGTTAAGCT")?;
    let index = SeedIndex::new(&ref_seq, params.seed_length);
    let chain = find_seed_chain(&qry_seq, &index, &params)?;
    assert_eq!(chain.mean_shift(), 5);
    Ok(())
  }

  #[rstest]
  fn fails_on_unrelated_sequences() -> Result<(), Report> {
    let params = test_params();
    let ref_seq = to_nuc_seq("ATGGCATTGACCGTTAAGCTAGCTT")?;
    let qry_seq = to_nuc_seq("CCCCCCCCCCCCCCCCCCCC")?;
    let index = SeedIndex::new(&ref_seq, params.seed_length);
    assert!(find_seed_chain(&qry_seq, &index, &params).is_err());
    Ok(())
  }
}
