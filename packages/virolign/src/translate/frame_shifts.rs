use crate::gene::gene::Gene;
use crate::io::letter::Letter;
use crate::io::nuc::Nuc;
use crate::translate::coord_map::CoordMap;
use crate::utils::range::Range;
use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Codons adjacent to a frame shift which begin or end mid-codon
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameShiftContext {
  pub codon: Range,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameShift {
  pub gene_name: String,
  pub nuc_rel: Range,
  pub nuc_abs: Range,
  pub codon: Range,
  pub gaps_leading: FrameShiftContext,
  pub gaps_trailing: FrameShiftContext,
}

/// Finds spans within one gene where the cumulative difference between insertions and
/// deletions is not a multiple of 3. Takes the gene slices of the aligned (unstripped)
/// sequences; returned ranges are relative to the gene, in alignment coordinates.
pub fn frame_shifts_detect(qry_gene_aln: &[Nuc], ref_gene_aln: &[Nuc]) -> Vec<Range> {
  debug_assert_eq!(qry_gene_aln.len(), ref_gene_aln.len());

  let n = qry_gene_aln.len();
  let mut shifts = Vec::<Range>::new();
  let mut frame: i32 = 0;
  let mut shift_begin: Option<usize> = None;

  let mut pos = 0;
  while pos < n {
    if ref_gene_aln[pos].is_gap() {
      // Insertion run
      let run_begin = pos;
      while pos < n && ref_gene_aln[pos].is_gap() {
        pos += 1;
      }
      frame = (frame + (pos - run_begin) as i32).rem_euclid(3);
      update_shift(&mut shifts, &mut shift_begin, frame, run_begin, pos);
    } else if qry_gene_aln[pos].is_gap() {
      // Deletion run
      let run_begin = pos;
      while pos < n && qry_gene_aln[pos].is_gap() && !ref_gene_aln[pos].is_gap() {
        pos += 1;
      }
      frame = (frame - (pos - run_begin) as i32).rem_euclid(3);
      update_shift(&mut shifts, &mut shift_begin, frame, run_begin, pos);
    } else {
      pos += 1;
    }
  }

  if let Some(begin) = shift_begin {
    shifts.push(Range::new(begin, n));
  }

  shifts
}

fn update_shift(shifts: &mut Vec<Range>, shift_begin: &mut Option<usize>, frame: i32, run_begin: usize, run_end: usize) {
  match (*shift_begin, frame) {
    (None, f) if f != 0 => *shift_begin = Some(run_begin),
    (Some(begin), 0) => {
      // The indel run that restores the frame closes the shifted span
      shifts.push(Range::new(begin, run_end));
      *shift_begin = None;
    }
    _ => {}
  }
}

/// Finds the first position of a gap run immediately preceding and adjacent to the frame shift
fn find_mask_begin(seq: &[Nuc], frame_shift_range: &Range) -> usize {
  let mut begin = frame_shift_range.begin;
  while begin > 0 && seq[begin - 1].is_gap() {
    begin -= 1;
  }
  begin
}

/// Finds the position one past a gap run immediately following and adjacent to the frame shift
fn find_mask_end(seq: &[Nuc], frame_shift_range: &Range) -> usize {
  let mut end = frame_shift_range.end;
  while end < seq.len() && seq[end].is_gap() {
    end += 1;
  }
  end
}

fn find_mask(seq: &[Nuc], frame_shift_range: &Range) -> Range {
  Range {
    begin: find_mask_begin(seq, frame_shift_range),
    end: find_mask_end(seq, frame_shift_range),
  }
}

#[inline]
fn nuc_range_to_codon_range(range: &Range) -> Range {
  Range {
    begin: range.begin / 3,
    // Make sure the right boundary is aligned to codon boundary
    end: (range.end + (3 - range.end % 3) % 3) / 3,
  }
}

/// Converts one relative nucleotide frame shift range to the final result, with
/// reference-coordinate and codon ranges and the partial-codon context on both sides
fn frame_shift_transform(
  nuc_rel_aln: &Range,
  qry_gene_aln: &[Nuc],
  coord_map: &CoordMap,
  gene: &Gene,
) -> FrameShift {
  // The detected range is in alignment coordinates, relative to the gene. After insertions
  // are stripped, absolute positions may change, so the range boundaries are converted from
  // alignment coordinates to reference coordinates.
  let gene_start_aln = coord_map.ref_to_aln_position(gene.start);

  let nuc_abs_aln = nuc_rel_aln + gene_start_aln;
  let nuc_abs_ref = coord_map.aln_to_ref_range(&nuc_abs_aln);
  let nuc_rel_ref = &nuc_abs_ref - gene.start;
  let codon = nuc_range_to_codon_range(&nuc_rel_ref);

  let mask_rel_aln = find_mask(qry_gene_aln, nuc_rel_aln);
  let mask_abs_aln = mask_rel_aln + gene_start_aln;
  let mask_abs_ref = coord_map.aln_to_ref_range(&mask_abs_aln);
  let mask_rel_ref = mask_abs_ref - gene.start;

  let mut codon_mask = nuc_range_to_codon_range(&mask_rel_ref);

  // The gap mask can span beyond the gene. Prevent codon mask overflow.
  codon_mask.end = codon_mask.end.min(gene.len() / 3);

  let gaps_leading = FrameShiftContext {
    codon: Range {
      begin: codon_mask.begin,
      end: codon.begin,
    },
  };

  let gaps_trailing = FrameShiftContext {
    codon: Range {
      begin: codon.end,
      end: codon_mask.end.max(codon.end),
    },
  };

  FrameShift {
    gene_name: gene.gene_name.clone(),
    nuc_rel: nuc_rel_ref,
    nuc_abs: nuc_abs_ref,
    codon,
    gaps_leading,
    gaps_trailing,
  }
}

/// Detects frame shifts in one gene and converts them to the final results
pub fn frame_shifts_translate(
  qry_gene_aln: &[Nuc],
  ref_gene_aln: &[Nuc],
  coord_map: &CoordMap,
  gene: &Gene,
) -> Vec<FrameShift> {
  let nuc_rel_frame_shifts = frame_shifts_detect(qry_gene_aln, ref_gene_aln);
  nuc_rel_frame_shifts
    .iter()
    .map(|frame_shift_rel| frame_shift_transform(frame_shift_rel, qry_gene_aln, coord_map, gene))
    .collect_vec()
}
