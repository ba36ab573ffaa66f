//! Operation filters: post-processing steps run on every generated operation.
//!
//! The builder hands each filter the operation and an [`OperationFilterContext`] holding the
//! description the operation came from, the assembly, and the schema generator with its
//! repository. Filters run in registration order; [`default_filters`] returns the standard
//! chain.

mod optional;
mod parameters;
mod path_type;

pub use optional::OptionalParameterFilter;
pub use parameters::{HeaderParameterFilter, QueryParameterFilter};
pub use path_type::PathParameterTypeFilter;

use crate::assembly::{DeclaringType, FunctionAssembly, FunctionMethod};
use crate::description::ApiDescription;
use crate::error::{Error, Result};
use crate::openapi_builder::Operation;
use crate::schema_generator::{Schema, SchemaGenerator, SchemaRepository};
use crate::types::TypeRef;
use std::sync::Arc;

/// A post-processing step on a generated operation.
pub trait OperationFilter {
    fn apply(&self, operation: &mut Operation, context: &mut OperationFilterContext<'_>) -> Result<()>;
}

/// Everything a filter can read while processing one operation.
pub struct OperationFilterContext<'a> {
    pub api_description: &'a ApiDescription,
    pub assembly: &'a FunctionAssembly,
    pub schema_generator: &'a dyn SchemaGenerator,
    pub schema_repository: &'a mut SchemaRepository,
}

impl<'a> OperationFilterContext<'a> {
    /// The function behind the description.
    ///
    /// # Errors
    ///
    /// `Error::MissingArgument("method")` when the assembly holds no such function, and
    /// `Error::InvalidArgument` when several functions share its declaring type and name.
    pub fn function_method(&self) -> Result<(&'a DeclaringType, &'a FunctionMethod)> {
        let descriptor = &self.api_description.action_descriptor;
        let assembly: &'a FunctionAssembly = self.assembly;
        let mut matches = assembly.methods().filter(|(declaring_type, method)| {
            declaring_type.name() == descriptor.declaring_type && method.name() == descriptor.method_name
        });
        let found = matches.next().ok_or(Error::MissingArgument("method"))?;
        if matches.next().is_some() {
            return Err(Error::InvalidArgument(format!(
                "ambiguous function {}::{}",
                descriptor.declaring_type, descriptor.method_name
            )));
        }
        Ok(found)
    }

    pub fn generate_schema(&mut self, ty: &TypeRef) -> Schema {
        self.schema_generator.generate_schema(ty, self.schema_repository)
    }
}

/// The standard filter chain
pub fn default_filters() -> Vec<Arc<dyn OperationFilter>> {
    vec![
        Arc::new(QueryParameterFilter),
        Arc::new(HeaderParameterFilter),
        Arc::new(OptionalParameterFilter),
        Arc::new(PathParameterTypeFilter),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::annotations::{Annotation, HttpTrigger};
    use crate::assembly::FunctionParameter;
    use crate::config::GeneratorConfig;
    use crate::description::ApiDescriptionGroup;
    use crate::function_processor::FunctionProcessor;
    use crate::metadata::DefaultModelMetadataProvider;
    use crate::parameter_processor::ParameterProcessor;
    use crate::response_processor::ResponseProcessor;

    /// An HTTP function with an untyped trigger on `route`
    pub fn http_function(name: &str, route: &str) -> FunctionMethod {
        FunctionMethod::new(name)
            .with_annotation(Annotation::FunctionName(name.to_string()))
            .with_parameter(
                FunctionParameter::new("req", TypeRef::new("HttpRequest")).with_annotation(
                    Annotation::HttpTrigger(
                        HttpTrigger::new().with_methods(["get"]).with_route(route),
                    ),
                ),
            )
    }

    /// The GET description of `method` as declared in `assembly`
    pub fn describe(assembly: &FunctionAssembly, type_name: &str, method_name: &str) -> ApiDescription {
        let metadata = Arc::new(DefaultModelMetadataProvider);
        let processor = FunctionProcessor::new(
            ParameterProcessor::new(metadata.clone()),
            ResponseProcessor::new(metadata),
            &GeneratorConfig::default(),
        );
        let (declaring_type, method) = assembly.find_method(type_name, method_name).unwrap();
        let ApiDescriptionGroup { mut items, .. } =
            processor.process_http_function(declaring_type, method).unwrap();
        items.remove(0)
    }
}
