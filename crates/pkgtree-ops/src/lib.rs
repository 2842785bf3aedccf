pub mod ops_deps;
pub mod ops_equalize;
pub mod ops_list;
pub mod ops_open;
