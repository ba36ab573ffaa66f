use super::{OperationFilter, OperationFilterContext};
use crate::error::Result;
use crate::openapi_builder::Operation;

/// Marks parameters bound to optional route placeholders (`{name?}`) as not required.
///
/// Never marks a parameter as required.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalParameterFilter;

impl OperationFilter for OptionalParameterFilter {
    fn apply(&self, operation: &mut Operation, context: &mut OperationFilterContext<'_>) -> Result<()> {
        for parameter in &mut operation.parameters {
            let optional = context
                .api_description
                .parameter_description(&parameter.name)
                .is_some_and(|description| description.is_optional());
            if optional {
                parameter.required = false;
            }
        }
        Ok(())
    }
}
