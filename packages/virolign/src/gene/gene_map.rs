use crate::gene::gene::Gene;
use crate::io::gff3::parse_gene_map_gff;
use crate::make_error;
use eyre::{eyre, Report, WrapErr};
use indexmap::IndexMap;
use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maps gene names to genes. Gene names are unique. Iteration order is the order
/// in which genes appear in the genome annotation, so that reports are stable.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[must_use]
pub struct GeneMap {
  pub genes: IndexMap<String, Gene>,
}

impl GeneMap {
  pub fn new() -> Self {
    Self::from_genes(IndexMap::new())
  }

  pub fn from_genes(genes: IndexMap<String, Gene>) -> Self {
    Self { genes }
  }

  pub fn from_file(filepath: impl AsRef<Path>) -> Result<Self, Report> {
    let filepath = filepath.as_ref();
    let gene_map = parse_gene_map_gff(&crate::io::fs::read_file_to_string(filepath)?)
      .wrap_err_with(|| eyre!("When reading gene map file: {filepath:#?}"))?;
    gene_map.validate()?;
    Ok(gene_map)
  }

  pub fn from_gff3_str(content: impl AsRef<str>) -> Result<Self, Report> {
    let gene_map = parse_gene_map_gff(content.as_ref())?;
    gene_map.validate()?;
    Ok(gene_map)
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.genes.is_empty()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.genes.len()
  }

  #[must_use]
  pub fn contains(&self, gene_name: &str) -> bool {
    self.genes.contains_key(gene_name)
  }

  pub fn get(&self, gene_name: &str) -> Result<&Gene, Report> {
    self.genes.get(gene_name).ok_or_else(|| {
      let available = self.genes.keys().map(|name| format!("\"{name}\"")).join(", ");
      eyre!("Gene \"{gene_name}\" is not found in the gene map. The genes present in the gene map were: {available}")
    })
  }

  pub fn iter_genes(&self) -> impl Iterator<Item = (&String, &Gene)> + '_ {
    self.genes.iter()
  }

  pub fn genes(&self) -> impl Iterator<Item = &Gene> + '_ {
    self.genes.values()
  }

  /// Retains only the requested genes. Requested genes missing from the map are reported as an error.
  pub fn filter_genes(self, requested: &[String]) -> Result<Self, Report> {
    let missing = requested
      .iter()
      .filter(|name| !self.genes.contains_key(name.as_str()))
      .join("`, `");
    if !missing.is_empty() {
      return make_error!("The following genes were requested but not found in the gene map: `{missing}`");
    }
    let genes = self
      .genes
      .into_iter()
      .filter(|(gene_name, _)| requested.contains(gene_name))
      .collect();
    Ok(Self::from_genes(genes))
  }

  /// A gene whose length is not a multiple of 3 cannot be translated codon-by-codon.
  /// This is a mistake in the genome annotation and is rejected upfront.
  pub fn validate(&self) -> Result<(), Report> {
    self.genes().try_for_each(|gene| {
      if gene.start >= gene.end {
        return make_error!(
          "Gene \"{}\" is empty or its range is inverted: start={}, end={}",
          gene.gene_name,
          gene.start,
          gene.end
        );
      }
      if gene.length != gene.len() {
        return make_error!(
          "Gene \"{}\" has inconsistent length: declared {}, but the range implies {}",
          gene.gene_name,
          gene.length,
          gene.len()
        );
      }
      if gene.len() % 3 != 0 {
        return make_error!(
          "Length of a gene is expected to be divisible by 3, but the length of gene \"{}\" is {}. This is likely a mistake in genome annotation.",
          gene.gene_name,
          gene.len()
        );
      }
      Ok(())
    })
  }

  /// Checks gene ranges against the reference length. Can only be done once the reference is known.
  pub fn validate_against_ref(&self, ref_len: usize) -> Result<(), Report> {
    self.genes().try_for_each(|gene| {
      if gene.end > ref_len {
        return make_error!(
          "Gene \"{}\" extends beyond the reference: gene end is {}, but the reference length is {ref_len}",
          gene.gene_name,
          gene.end
        );
      }
      Ok(())
    })
  }
}
