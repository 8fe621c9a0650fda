pub mod file_size;
pub mod json_tree;
