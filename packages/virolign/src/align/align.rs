use crate::align::params::AlignPairwiseParams;
use crate::align::seed_index::{find_seed_chain, SeedIndex};
use crate::io::nuc::Nuc;
use crate::make_error;
use eyre::{Report, WrapErr};

/// Result of the pairwise alignment: both sequences with gap letters inserted, of equal length
#[derive(Clone, Debug)]
pub struct AlignmentOutput {
  pub qry_seq: Vec<Nuc>,
  pub ref_seq: Vec<Nuc>,
  pub alignment_score: i32,
}

// Alignment states
const MATCH: u8 = 0;
const DEL: u8 = 1; // gap in query, consumes reference
const INS: u8 = 2; // gap in reference, consumes query

// Trace bits
const MATCH_FROM_MASK: u8 = 0b0011;
const DEL_FROM_DEL: u8 = 0b0100;
const INS_FROM_INS: u8 = 0b1000;

// Low enough to never win a comparison, high enough to not overflow when penalties are subtracted
const UNREACHABLE_SCORE: i32 = i32::MIN / 4;

/// Reusable buffers for the banded score matrices. Per-query peak memory is bounded by the
/// band area; one scratch is kept per worker and reused across queries.
#[derive(Debug, Default)]
pub struct AlignmentScratch {
  match_scores: Vec<i32>,
  del_scores: Vec<i32>,
  ins_scores: Vec<i32>,
  traces: Vec<u8>,
}

impl AlignmentScratch {
  pub fn new() -> Self {
    Self::default()
  }

  fn reset(&mut self, size: usize) {
    self.match_scores.clear();
    self.match_scores.resize(size, UNREACHABLE_SCORE);
    self.del_scores.clear();
    self.del_scores.resize(size, UNREACHABLE_SCORE);
    self.ins_scores.clear();
    self.ins_scores.resize(size, UNREACHABLE_SCORE);
    self.traces.clear();
    self.traces.resize(size, 0);
  }
}

fn max3(match_score: i32, del_score: i32, ins_score: i32) -> (i32, u8) {
  let mut best = (match_score, MATCH);
  if del_score > best.0 {
    best = (del_score, DEL);
  }
  if ins_score > best.0 {
    best = (ins_score, INS);
  }
  best
}

/// Banded Needleman-Wunsch around the seed-implied diagonal.
///
/// Terminal gaps are penalty-free on both sides (configurable), so partial genomes align
/// to the window of the reference they actually cover.
pub fn align_nuc(
  qry_seq: &[Nuc],
  ref_seq: &[Nuc],
  seed_index: &SeedIndex,
  gap_open_close: &[i32],
  params: &AlignPairwiseParams,
  scratch: &mut AlignmentScratch,
) -> Result<AlignmentOutput, Report> {
  let n = qry_seq.len();
  let m = ref_seq.len();

  if n < params.min_length {
    return make_error!(
      "Unable to align: sequence is too short: {n} nucleotides (min: {})",
      params.min_length
    );
  }
  if n > params.max_seq_len {
    return make_error!(
      "Unable to align: sequence is too long: {n} nucleotides (max: {})",
      params.max_seq_len
    );
  }

  let chain = find_seed_chain(qry_seq, seed_index, params).wrap_err("When seeding the alignment")?;

  let shift = chain.mean_shift();
  let spread = (chain.max_shift() - chain.min_shift()).unsigned_abs();
  let band_width = (spread / 2 + params.excess_bandwidth + params.terminal_bandwidth).min(n.max(m)).max(1);

  let width = 2 * band_width + 1;
  let band_area = (n + 1) * width;
  if band_area > params.max_band_area {
    return make_error!(
      "Unable to align: alignment band is too large: {band_area} cells (max: {})",
      params.max_band_area
    );
  }

  let output = align_banded(qry_seq, ref_seq, shift, band_width, gap_open_close, params, scratch);

  if output.alignment_score < params.min_score {
    return make_error!(
      "Unable to align: alignment score is too low: {} (min: {}). This is likely due to low quality of the provided sequence, or due to using incorrect reference sequence.",
      output.alignment_score,
      params.min_score
    );
  }

  Ok(output)
}

#[allow(clippy::too_many_lines)]
fn align_banded(
  qry_seq: &[Nuc],
  ref_seq: &[Nuc],
  shift: isize,
  band_width: usize,
  gap_open_close: &[i32],
  params: &AlignPairwiseParams,
  scratch: &mut AlignmentScratch,
) -> AlignmentOutput {
  let n = qry_seq.len();
  let m = ref_seq.len();
  let width = 2 * band_width + 1;

  scratch.reset((n + 1) * width);
  let AlignmentScratch {
    match_scores,
    del_scores,
    ins_scores,
    traces,
  } = scratch;

  // Column (reference position) covered by band cell `k` of row `i`
  let col_of = |i: usize, k: usize| -> Option<usize> {
    let j = i as isize + shift + k as isize - band_width as isize;
    (0..=m as isize).contains(&j).then_some(j as usize)
  };

  // Row 0: nothing of the query is consumed yet. A gap run here is a leading deletion.
  for k in 0..width {
    let Some(j) = col_of(0, k) else { continue };
    if j == 0 {
      match_scores[k] = 0;
    } else if params.left_terminal_gaps_free {
      del_scores[k] = 0;
    } else {
      del_scores[k] = -(gap_open_close[0] + (j as i32 - 1) * params.penalty_gap_extend);
    }
  }

  for i in 1..=n {
    let qry_nuc = qry_seq[i - 1];
    for k in 0..width {
      let Some(j) = col_of(i, k) else { continue };
      let idx = i * width + k;

      if j == 0 {
        // Column 0: nothing of the reference is consumed yet. A gap run here is a leading insertion.
        ins_scores[idx] = if params.left_terminal_gaps_free {
          0
        } else {
          -(gap_open_close[0] + (i as i32 - 1) * params.penalty_gap_extend)
        };
        continue;
      }

      let mut trace = 0u8;

      // Diagonal step: (i-1, j-1) is the same band cell of the previous row
      let idx_diag = (i - 1) * width + k;
      let (diag_best, diag_from) = max3(match_scores[idx_diag], del_scores[idx_diag], ins_scores[idx_diag]);
      let substitution_score = if qry_nuc.is_compatible_with(ref_seq[j - 1]) {
        params.score_match
      } else {
        -params.penalty_mismatch
      };
      match_scores[idx] = diag_best + substitution_score;
      trace |= diag_from & MATCH_FROM_MASK;

      // Deletion step: from (i, j-1), one band cell to the left
      if k >= 1 {
        let idx_left = idx - 1;
        let from_match = match_scores[idx_left] - gap_open_close[j - 1];
        let from_del = del_scores[idx_left] - params.penalty_gap_extend;
        if from_del > from_match {
          del_scores[idx] = from_del;
          trace |= DEL_FROM_DEL;
        } else {
          del_scores[idx] = from_match;
        }
      }

      // Insertion step: from (i-1, j), one band cell to the right of the previous row
      if k + 1 < width {
        let idx_up = (i - 1) * width + k + 1;
        let from_match = match_scores[idx_up] - gap_open_close[j];
        let from_ins = ins_scores[idx_up] - params.penalty_gap_extend;
        if from_ins > from_match {
          ins_scores[idx] = from_ins;
          trace |= INS_FROM_INS;
        } else {
          ins_scores[idx] = from_match;
        }
      }

      traces[idx] = trace;
    }
  }

  // Alignment ends on the bottom row (rest of the reference is a trailing deletion) or on
  // the right column (rest of the query is a trailing insertion). Terminal gap penalties
  // apply only when terminal gaps are not free.
  let trailing_gap_penalty = |len: usize| -> i32 {
    if len == 0 || params.right_terminal_gaps_free {
      0
    } else {
      -(params.penalty_gap_open + (len as i32 - 1) * params.penalty_gap_extend)
    }
  };

  let mut best_score = UNREACHABLE_SCORE;
  let mut best_end = (0usize, 0usize, MATCH);

  for k in 0..width {
    let Some(j) = col_of(n, k) else { continue };
    let idx = n * width + k;
    let (score, state) = max3(match_scores[idx], del_scores[idx], ins_scores[idx]);
    let score = score + trailing_gap_penalty(m - j);
    if score > best_score {
      best_score = score;
      best_end = (n, j, state);
    }
  }
  for i in 0..n {
    let j = m;
    let k = j as isize - i as isize - shift + band_width as isize;
    if !(0..width as isize).contains(&k) {
      continue;
    }
    let idx = i * width + k as usize;
    let (score, state) = max3(match_scores[idx], del_scores[idx], ins_scores[idx]);
    let score = score + trailing_gap_penalty(n - i);
    if score > best_score {
      best_score = score;
      best_end = (i, j, state);
    }
  }

  // Traceback, building both aligned sequences back-to-front
  let mut qry_aln = Vec::<Nuc>::with_capacity(n + m);
  let mut ref_aln = Vec::<Nuc>::with_capacity(n + m);

  let (end_i, end_j, end_state) = best_end;
  for j in (end_j..m).rev() {
    qry_aln.push(Nuc::Gap);
    ref_aln.push(ref_seq[j]);
  }
  for i in (end_i..n).rev() {
    qry_aln.push(qry_seq[i]);
    ref_aln.push(Nuc::Gap);
  }

  let (mut i, mut j, mut state) = (end_i, end_j, end_state);
  while i > 0 || j > 0 {
    if i == 0 {
      for jj in (0..j).rev() {
        qry_aln.push(Nuc::Gap);
        ref_aln.push(ref_seq[jj]);
      }
      break;
    }
    if j == 0 {
      for ii in (0..i).rev() {
        qry_aln.push(qry_seq[ii]);
        ref_aln.push(Nuc::Gap);
      }
      break;
    }

    let k = (j as isize - i as isize - shift + band_width as isize) as usize;
    let trace = traces[i * width + k];
    match state {
      DEL => {
        qry_aln.push(Nuc::Gap);
        ref_aln.push(ref_seq[j - 1]);
        state = if trace & DEL_FROM_DEL != 0 { DEL } else { MATCH };
        j -= 1;
      }
      INS => {
        qry_aln.push(qry_seq[i - 1]);
        ref_aln.push(Nuc::Gap);
        state = if trace & INS_FROM_INS != 0 { INS } else { MATCH };
        i -= 1;
      }
      _ => {
        qry_aln.push(qry_seq[i - 1]);
        ref_aln.push(ref_seq[j - 1]);
        state = trace & MATCH_FROM_MASK;
        i -= 1;
        j -= 1;
      }
    }
  }

  qry_aln.reverse();
  ref_aln.reverse();

  AlignmentOutput {
    qry_seq: qry_aln,
    ref_seq: ref_aln,
    alignment_score: best_score,
  }
}
