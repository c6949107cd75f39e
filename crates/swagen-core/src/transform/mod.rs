pub mod collector;
pub mod defaults;
pub mod hoist;
pub mod name_normalizer;
pub mod path_parts;
pub mod schema_resolver;
pub mod spec_to_ir;

pub use hoist::hoist_anonymous_objects;
pub use spec_to_ir::{normalize, transform};
