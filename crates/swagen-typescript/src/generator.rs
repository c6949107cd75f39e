use swagen_core::config::{GeneratorConfig, TargetLanguage};
use swagen_core::helpers::Helpers;
use swagen_core::ir::IrSpec;
use swagen_core::{CodeGenerator, GeneratedFile, GeneratorError};

use crate::emitters;
use crate::type_mapper::TsTypeMapper;

/// TypeScript generator: a single `types.ts` with the document's types.
pub struct TypeScriptGenerator;

impl CodeGenerator for TypeScriptGenerator {
    fn id(&self) -> TargetLanguage {
        TargetLanguage::Typescript
    }

    fn generate(
        &self,
        ir: &IrSpec,
        config: &GeneratorConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let mapper = TsTypeMapper;
        let helpers = Helpers::new(ir, &mapper);
        let header = if config.command_line.is_empty() {
            "// Code generated by swagen. DO NOT EDIT.".to_string()
        } else {
            format!(
                "// Code generated by swagen {}. DO NOT EDIT.",
                config.command_line
            )
        };
        log::debug!(
            "typescript types for {} objects, {} operations",
            ir.objects.len(),
            ir.operations.len()
        );

        Ok(vec![GeneratedFile {
            path: "types.ts".to_string(),
            content: emitters::types::emit_types(ir, &helpers, &header)?,
        }])
    }
}
