pub mod aa_changes;
pub mod aa_del;
pub mod aa_sub;
pub mod letter_ranges;
pub mod link_nuc_and_aa_changes;
pub mod nuc_changes;
pub mod nuc_del;
pub mod nuc_sub;
