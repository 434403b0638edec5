use crate::align::params::AlignPairwiseParams;
use crate::gene::gene::{Gene, GeneStrand};
use crate::gene::gene_map::GeneMap;
use crate::io::nuc::Nuc;
use crate::make_internal_report;
use crate::translate::complement::reverse_complement_in_place;
use crate::translate::coord_map::CoordMap;
use crate::translate::frame_shifts::frame_shifts_translate;
use crate::translate::peptide::{RefPeptideMap, Translation};
use crate::translate::translate::translate;
use crate::utils::range::Range;
use eyre::Report;
use itertools::Itertools;
use std::ops::Range as StdRange;

/// Extracts the gene slice from a sequence in reference coordinates,
/// reverse-complementing reverse-strand genes
fn extract_gene(seq: &[Nuc], gene: &Gene) -> Result<Vec<Nuc>, Report> {
  if gene.end > seq.len() {
    return Err(make_internal_report!(
      "Gene \"{}\" range ({}-{}) is out of bounds of the sequence of length {}",
      gene.gene_name,
      gene.start,
      gene.end,
      seq.len()
    ));
  }

  let mut gene_seq = seq[gene.start..gene.end].to_vec();
  if gene.strand == GeneStrand::Reverse {
    reverse_complement_in_place(&mut gene_seq);
  }
  Ok(gene_seq)
}

fn translate_gene(
  qry_aln: &[Nuc],
  ref_aln: &[Nuc],
  qry_stripped: &[Nuc],
  gene: &Gene,
  coord_map: &CoordMap,
  params: &AlignPairwiseParams,
) -> Result<Translation, Report> {
  let gene_nucs = extract_gene(qry_stripped, gene)?;
  let seq = translate(&gene_nucs, params.translate_past_stop);

  // Frame shifts are detected on the aligned pair before insertions are stripped,
  // so that insertions participate in the frame accounting
  let gene_range_aln = coord_map.ref_to_aln_range(&gene.range());
  let qry_gene_aln = &qry_aln[StdRange::from(gene_range_aln.clone())];
  let ref_gene_aln = &ref_aln[StdRange::from(gene_range_aln)];
  let frame_shifts = frame_shifts_translate(qry_gene_aln, ref_gene_aln, coord_map, gene);

  Ok(Translation {
    gene_name: gene.gene_name.clone(),
    seq,
    frame_shifts,
  })
}

/// Translates every gene of the query. Genes whose range lies entirely outside
/// of the alignment range produce no peptide and no error.
///
/// A failure to translate one gene does not fail the query: per-gene results are
/// returned together with the gene names so that failures become per-gene warnings.
pub fn translate_genes(
  qry_aln: &[Nuc],
  ref_aln: &[Nuc],
  qry_stripped: &[Nuc],
  gene_map: &GeneMap,
  coord_map: &CoordMap,
  alignment_range: &Range,
  params: &AlignPairwiseParams,
) -> Vec<(String, Result<Translation, Report>)> {
  gene_map
    .genes()
    .filter(|gene| alignment_range.has_intersection(&gene.range()))
    .map(|gene| {
      (
        gene.gene_name.clone(),
        translate_gene(qry_aln, ref_aln, qry_stripped, gene, coord_map, params),
      )
    })
    .collect_vec()
}

/// Translates every gene of the reference. The same stop-codon handling is applied as for
/// queries, so that reference and query peptides always have equal lengths.
pub fn translate_genes_ref(
  ref_seq: &[Nuc],
  gene_map: &GeneMap,
  params: &AlignPairwiseParams,
) -> Result<RefPeptideMap, Report> {
  gene_map
    .genes()
    .map(|gene| {
      let gene_nucs = extract_gene(ref_seq, gene)?;
      let peptide = translate(&gene_nucs, params.translate_past_stop);
      Ok((gene.gene_name.clone(), peptide))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::aa::from_aa_seq;
  use crate::io::nuc::to_nuc_seq;
  use indexmap::IndexMap;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  fn make_gene(name: &str, start: usize, end: usize, strand: GeneStrand) -> Gene {
    Gene {
      gene_name: name.to_owned(),
      start,
      end,
      strand,
      frame: 0,
      length: end - start,
    }
  }

  fn make_gene_map(genes: &[Gene]) -> GeneMap {
    GeneMap::from_genes(
      genes
        .iter()
        .map(|gene| (gene.gene_name.clone(), gene.clone()))
        .collect::<IndexMap<_, _>>(),
    )
  }

  #[rstest]
  fn translates_forward_gene() -> Result<(), Report> {
    let reff = to_nuc_seq("ATGAAATAG")?;
    let gene_map = make_gene_map(&[make_gene("g", 0, 9, GeneStrand::Forward)]);
    let params = AlignPairwiseParams::default();

    let coord_map = CoordMap::new(&reff);
    let translations = translate_genes(
      &reff,
      &reff,
      &reff,
      &gene_map,
      &coord_map,
      &Range::new(0, 9),
      &params,
    );
    assert_eq!(translations.len(), 1);
    let (gene_name, translation) = &translations[0];
    let translation = translation.as_ref().expect("Translation failed");
    assert_eq!(gene_name, "g");
    assert_eq!(from_aa_seq(&translation.seq), "MK*");
    assert_eq!(translation.frame_shifts, vec![]);
    Ok(())
  }

  #[rstest]
  fn translates_reverse_gene() -> Result<(), Report> {
    // Reverse complement of CTATTTCAT is ATGAAATAG
    let reff = to_nuc_seq("CTATTTCAT")?;
    let gene_map = make_gene_map(&[make_gene("g", 0, 9, GeneStrand::Reverse)]);
    let params = AlignPairwiseParams::default();

    let ref_peptides = translate_genes_ref(&reff, &gene_map, &params)?;
    assert_eq!(from_aa_seq(&ref_peptides["g"]), "MK*");
    Ok(())
  }

  #[rstest]
  fn skips_gene_outside_alignment_range() -> Result<(), Report> {
    let reff = to_nuc_seq("ATGAAATAGATGCCCTAG")?;
    let gene_map = make_gene_map(&[
      make_gene("g1", 0, 9, GeneStrand::Forward),
      make_gene("g2", 9, 18, GeneStrand::Forward),
    ]);
    let params = AlignPairwiseParams::default();

    let coord_map = CoordMap::new(&reff);
    // Query covers only the first gene
    let translations = translate_genes(
      &reff,
      &reff,
      &reff,
      &gene_map,
      &coord_map,
      &Range::new(0, 9),
      &params,
    );
    assert_eq!(translations.len(), 1);
    assert_eq!(translations[0].0, "g1");
    Ok(())
  }
}
