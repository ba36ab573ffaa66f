use super::{OperationFilter, OperationFilterContext};
use crate::error::Result;
use crate::openapi_builder::{Operation, ParameterLocation};
use log::debug;

/// Replaces the placeholder schema of path parameters with the schema of their declared type.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParameterTypeFilter;

impl OperationFilter for PathParameterTypeFilter {
    fn apply(&self, operation: &mut Operation, context: &mut OperationFilterContext<'_>) -> Result<()> {
        let description = context.api_description;
        for parameter in operation
            .parameters
            .iter_mut()
            .filter(|p| p.location == ParameterLocation::Path)
        {
            let Some(parameter_description) = description.parameter_description(&parameter.name) else {
                continue;
            };
            debug!(
                "Path parameter {} has type {}",
                parameter.name, parameter_description.type_ref
            );
            parameter.schema = context.generate_schema(&parameter_description.type_ref);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{describe, http_function};
    use super::*;
    use crate::assembly::{DeclaringType, FunctionAssembly, FunctionParameter};
    use crate::openapi_builder::Parameter;
    use crate::schema_generator::{Schema, SchemaRepository, TypeSchemaGenerator};
    use crate::type_resolver::TypeDefinition;
    use crate::types::TypeRef;
    use pretty_assertions::assert_eq;

    fn path_parameter(name: &str) -> Parameter {
        Parameter {
            name: name.to_string(),
            location: ParameterLocation::Path,
            required: true,
            schema: Schema::string(),
            description: None,
        }
    }

    #[test]
    fn test_schemas_follow_declared_types() {
        let method = http_function("f", "items/{id}/{status}/{missing}")
            .with_parameter(FunctionParameter::new("id", TypeRef::new("i64")))
            .with_parameter(FunctionParameter::new("status", TypeRef::new("Status")));
        let assembly = FunctionAssembly::new("test")
            .with_definition(TypeDefinition::enumeration("Status", ["Open", "Closed"]))
            .with_type(DeclaringType::new("Functions").with_method(method));
        let description = describe(&assembly, "Functions", "f");
        let generator = TypeSchemaGenerator::for_assembly(&assembly);
        let mut repository = SchemaRepository::new();
        let mut context = OperationFilterContext {
            api_description: &description,
            assembly: &assembly,
            schema_generator: &generator,
            schema_repository: &mut repository,
        };
        let mut operation = Operation {
            parameters: vec![
                path_parameter("id"),
                path_parameter("status"),
                path_parameter("missing"),
            ],
            ..Operation::default()
        };

        PathParameterTypeFilter.apply(&mut operation, &mut context).unwrap();

        let schemas: Vec<&Schema> = operation.parameters.iter().map(|p| &p.schema).collect();
        assert_eq!(
            schemas,
            vec![
                &Schema::of_type("integer").with_format("int64"),
                &Schema::reference("Status"),
                &Schema::string(),
            ]
        );
        assert!(repository.contains("Status"));
    }
}
