pub mod emitters;
pub mod generator;
pub mod go_type;
pub mod imports;
pub mod module_path;
pub mod type_mapper;

pub use generator::GoGenerator;
