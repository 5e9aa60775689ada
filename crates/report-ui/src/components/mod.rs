pub mod bar;
pub mod header;
pub mod project_list;
