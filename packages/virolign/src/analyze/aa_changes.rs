use crate::analyze::aa_del::AaDel;
use crate::analyze::aa_sub::AaSub;
use crate::gene::gene::Gene;
use crate::gene::gene_map::GeneMap;
use crate::io::aa::Aa;
use crate::io::letter::Letter;
use crate::io::nuc::Nuc;
use crate::make_internal_report;
use crate::translate::peptide::{RefPeptideMap, Translation};
use crate::utils::range::Range;
use eyre::{Report, WrapErr};
use num_traits::clamp;

#[derive(Clone, Debug, Default)]
pub struct FindAaChangesOutput {
  pub aa_substitutions: Vec<AaSub>,
  pub aa_deletions: Vec<AaDel>,
}

/// Finds aminoacid substitutions and deletions in query peptides relative to reference
/// peptides, in all genes.
///
/// Nucleotide sequences are required to be stripped from insertions.
pub fn find_aa_changes(
  ref_seq: &[Nuc],
  qry_seq: &[Nuc],
  ref_peptides: &RefPeptideMap,
  translations: &[Translation],
  gene_map: &GeneMap,
  alignment_range: &Range,
) -> Result<FindAaChangesOutput, Report> {
  let mut changes = FindAaChangesOutput::default();

  for translation in translations {
    let gene_name = &translation.gene_name;

    let ref_peptide = ref_peptides.get(gene_name).ok_or_else(|| {
      make_internal_report!(
        "When searching for aminoacid mutations: peptide \"{gene_name}\" was requested, but was not found among reference peptides"
      )
    })?;

    let gene = gene_map
      .get(gene_name)
      .wrap_err("When searching for aminoacid mutations")?;

    find_aa_changes_for_gene(
      ref_seq,
      qry_seq,
      ref_peptide,
      &translation.seq,
      gene,
      alignment_range,
      &mut changes,
    );
  }

  Ok(changes)
}

/// Finds aminoacid changes in one gene, comparing reference and query peptides one codon
/// at a time, and capturing the relevant nucleotide context around each change.
///
/// No one-to-one mapping between nucleotide and aminoacid changes is attempted here: when
/// several nucleotides in a codon mutate, the correspondence cannot be established without
/// knowing the order in which the nucleotide changes have occurred. The linking done
/// afterwards is many-to-many, by codon range overlap.
fn find_aa_changes_for_gene(
  ref_seq: &[Nuc],
  qry_seq: &[Nuc],
  ref_peptide: &[Aa],
  qry_peptide: &[Aa],
  gene: &Gene,
  alignment_range: &Range,
  changes: &mut FindAaChangesOutput,
) {
  assert_eq!(ref_peptide.len(), qry_peptide.len());
  assert_eq!(qry_seq.len(), ref_seq.len());

  let num_nucs = qry_seq.len();
  let num_codons = qry_peptide.len();
  for codon in 0..num_codons {
    let ref_aa = ref_peptide[codon];
    let qry_aa = qry_peptide[codon];

    // Where the codon is in the nucleotide sequences
    let codon_begin = gene.start + codon * 3;
    let codon_end = codon_begin + 3;

    // Only codons that lie fully inside the alignment range are considered
    if codon_begin < alignment_range.begin || codon_end > alignment_range.end {
      continue;
    }

    // Surrounding context in the nucleotide sequences: 1 codon to each side, clamped
    let context_begin = codon_begin.saturating_sub(3);
    let context_end = clamp(codon_end + 3, codon_end, num_nucs);

    let ref_context = ref_seq[context_begin..context_end].to_vec();
    let query_context = qry_seq[context_begin..context_end].to_vec();

    if qry_aa.is_gap() {
      // Gap in the query peptide means that this codon was deleted in the query sequence
      changes.aa_deletions.push(AaDel {
        gene: gene.gene_name.clone(),
        reff: ref_aa,
        pos: codon,
        codon_nuc_range: Range::new(codon_begin, codon_end),
        ref_context,
        query_context,
        context_nuc_range: Range::new(context_begin, context_end),
        nuc_substitutions: vec![],
        nuc_deletions: vec![],
      });
    } else if qry_aa != ref_aa && qry_aa != Aa::X {
      changes.aa_substitutions.push(AaSub {
        gene: gene.gene_name.clone(),
        reff: ref_aa,
        pos: codon,
        qry: qry_aa,
        codon_nuc_range: Range::new(codon_begin, codon_end),
        ref_context,
        query_context,
        context_nuc_range: Range::new(context_begin, context_end),
        nuc_substitutions: vec![],
        nuc_deletions: vec![],
      });
    }
  }
}
