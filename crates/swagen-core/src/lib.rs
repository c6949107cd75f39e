pub mod config;
pub mod error;
pub mod helpers;
pub mod ir;
pub mod parse;
pub mod transform;

pub use config::{GeneratorConfig, TargetLanguage};
pub use error::GeneratorError;

/// A generated file with path (relative to the output directory) and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that produce files from an IR spec.
pub trait CodeGenerator {
    fn id(&self) -> TargetLanguage;

    fn generate(
        &self,
        ir: &ir::IrSpec,
        config: &GeneratorConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError>;
}
