pub mod complement;
pub mod coord_map;
pub mod decode;
pub mod frame_shifts;
pub mod peptide;
pub mod translate;
pub mod translate_genes;
