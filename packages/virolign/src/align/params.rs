use clap::Parser;
use optfield::optfield;
use serde::{Deserialize, Serialize};

// NOTE: The `optfield` attribute creates a struct that have the same fields, but which are wrapped into `Option`,
// as well as adds a method `.merge_opt(&opt)` to the original struct, which merges values from the optional counterpart
// into self (mutably).

#[allow(clippy::struct_excessive_bools)]
#[optfield(pub AlignPairwiseParamsOptional, attrs, doc, field_attrs, field_doc, merge_fn = pub)]
#[derive(Parser, Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AlignPairwiseParams {
  /// Minimum length of nucleotide sequence to consider for alignment.
  ///
  /// If a sequence is shorter than that, alignment will not be attempted and a warning will be emitted. When adjusting this parameter, note that alignment of short sequences can be unreliable.
  #[clap(long)]
  pub min_length: usize,

  /// Maximum length of nucleotide sequence to consider for alignment.
  ///
  /// Alignment of longer sequences is slow and requires substantial memory, and sequences that much longer than the reference are most likely wrong input.
  #[clap(long)]
  pub max_seq_len: usize,

  /// Score for matching states in nucleotide alignments.
  #[clap(long)]
  pub score_match: i32,

  /// Penalty for aligned nucleotides that differ in state during alignment.
  #[clap(long)]
  pub penalty_mismatch: i32,

  /// Penalty for opening of a gap in alignment. A higher penalty results in fewer gaps and more mismatches. Should be less than `--penalty-gap-open-in-frame` to avoid gaps in genes.
  #[clap(long)]
  pub penalty_gap_open: i32,

  /// As `--penalty-gap-open`, but for opening gaps at the beginning of a codon. Should be greater than `--penalty-gap-open` and less than `--penalty-gap-open-out-of-frame`, to avoid gaps in genes, but favor gaps that align with codons.
  #[clap(long)]
  pub penalty_gap_open_in_frame: i32,

  /// As `--penalty-gap-open`, but for opening gaps in the body of a codon. Should be greater than `--penalty-gap-open-in-frame` to favor gaps that align with codons.
  #[clap(long)]
  pub penalty_gap_open_out_of_frame: i32,

  /// Penalty for extending a gap in alignment. If zero, all gaps regardless of length incur the same penalty.
  #[clap(long)]
  pub penalty_gap_extend: i32,

  /// Minimum alignment score to accept. Alignments scoring below that are discarded and a warning is emitted.
  #[clap(long)]
  pub min_score: i32,

  /// Length of exactly matching k-mers used to seed the banded alignment of the query to the reference.
  #[clap(long)]
  pub seed_length: usize,

  /// Spacing between successive seeds on the query sequence. Should be small compared to the query length.
  #[clap(long)]
  pub seed_spacing: usize,

  /// Minimum number of colinear seed matches required to proceed with the banded alignment.
  #[clap(long)]
  pub min_seeds: usize,

  /// Maximum difference in the reference offset between successive seeds of one chain.
  #[clap(long)]
  pub max_seed_shift: usize,

  /// Excess bandwidth of the alignment band around the seed-implied diagonal.
  #[clap(long)]
  pub excess_bandwidth: usize,

  /// Extra bandwidth accommodating terminal indels outside of the seed-covered region.
  #[clap(long)]
  pub terminal_bandwidth: usize,

  /// Maximum area of the alignment band. Alignments with large bands are slow to compute and require substantial memory. Alignment of sequences requiring a band with area larger than this value will not be attempted and a warning will be emitted.
  #[clap(long)]
  pub max_band_area: usize,

  /// If this flag is present, the amino acid sequences will be translated past stop codons, if mutations or sequencing errors cause premature stop codons to be present. By default translation is truncated at the first stop codon and no amino acid mutations in the truncated region are recorded.
  #[clap(long)]
  #[clap(num_args=0..=1, default_missing_value = "true")]
  pub translate_past_stop: bool,

  // Internal alignment parameter
  #[clap(skip)]
  pub left_terminal_gaps_free: bool,

  // Internal alignment parameter
  #[clap(skip)]
  pub right_terminal_gaps_free: bool,
}

impl Default for AlignPairwiseParams {
  fn default() -> Self {
    Self {
      min_length: 100,
      max_seq_len: 300_000,
      score_match: 1,
      penalty_mismatch: 1,
      penalty_gap_open: 6,
      penalty_gap_open_in_frame: 7,
      penalty_gap_open_out_of_frame: 8,
      penalty_gap_extend: 1,
      min_score: 0,
      seed_length: 21,
      seed_spacing: 100,
      min_seeds: 10,
      max_seed_shift: 200,
      excess_bandwidth: 9,
      terminal_bandwidth: 50,
      max_band_area: 500_000_000,
      translate_past_stop: false,
      left_terminal_gaps_free: true,
      right_terminal_gaps_free: true,
    }
  }
}
