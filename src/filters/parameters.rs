use super::{OperationFilter, OperationFilterContext};
use crate::annotations::{ParameterDeclaration, ParameterKind};
use crate::error::Result;
use crate::openapi_builder::{Operation, Parameter, ParameterLocation};
use log::debug;

/// Adds the query parameters declared on the function, its declaring type and the assembly.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParameterFilter;

/// Adds the header parameters declared on the function, its declaring type and the assembly.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderParameterFilter;

impl OperationFilter for QueryParameterFilter {
    fn apply(&self, operation: &mut Operation, context: &mut OperationFilterContext<'_>) -> Result<()> {
        add_declared_parameters(ParameterKind::Query, operation, context)
    }
}

impl OperationFilter for HeaderParameterFilter {
    fn apply(&self, operation: &mut Operation, context: &mut OperationFilterContext<'_>) -> Result<()> {
        add_declared_parameters(ParameterKind::Header, operation, context)
    }
}

fn add_declared_parameters(
    kind: ParameterKind,
    operation: &mut Operation,
    context: &mut OperationFilterContext<'_>,
) -> Result<()> {
    let (declaring_type, method) = context.function_method()?;
    let assembly = context.assembly;

    // Ignores are honored at method and declaring-type scope only
    let ignored: Vec<&str> = method
        .annotations()
        .ignored_parameters(kind)
        .chain(declaring_type.annotations().ignored_parameters(kind))
        .collect();

    let mut declarations: Vec<&ParameterDeclaration> = Vec::new();
    for declaration in method
        .annotations()
        .parameter_declarations(kind)
        .chain(declaring_type.annotations().parameter_declarations(kind))
        .chain(assembly.annotations().parameter_declarations(kind))
    {
        if ignored.contains(&declaration.name.as_str()) {
            debug!("Parameter {} ignored on {}", declaration.name, method.name());
            continue;
        }
        if !declarations.contains(&declaration) {
            declarations.push(declaration);
        }
    }

    let location = match kind {
        ParameterKind::Query => ParameterLocation::Query,
        ParameterKind::Header => ParameterLocation::Header,
    };
    for declaration in declarations {
        let schema = context.generate_schema(&declaration.ty);
        operation.parameters.push(Parameter {
            name: declaration.name.clone(),
            location,
            required: declaration.required,
            schema,
            description: declaration.description.clone(),
        });
    }
    Ok(())
}
