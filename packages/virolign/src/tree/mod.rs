pub mod tree;
pub mod tree_attach_new_nodes;
pub mod tree_find_nearest_node;
pub mod tree_preprocess;
