pub mod file_entry;
pub mod navigation;
pub mod operation;
pub mod view;
