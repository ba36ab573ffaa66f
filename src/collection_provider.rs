use crate::assembly::{DeclaringType, FunctionAssembly, FunctionMethod};
use crate::description::ApiDescriptionGroupCollection;
use crate::error::Result;
use crate::function_processor::FunctionProcessor;
use log::{debug, info};
use std::sync::Arc;

/// Version of every generated collection.
pub const COLLECTION_VERSION: u32 = 1;

/// Enumerates the documentable functions of an assembly and describes each of them.
#[derive(Clone)]
pub struct FunctionCollectionProvider {
    assembly: Arc<FunctionAssembly>,
    function_processor: FunctionProcessor,
}

impl FunctionCollectionProvider {
    pub fn new(assembly: Arc<FunctionAssembly>, function_processor: FunctionProcessor) -> Self {
        Self {
            assembly,
            function_processor,
        }
    }

    /// Describes every documentable function, freshly on each call.
    ///
    /// # Errors
    ///
    /// A single malformed function fails the whole collection.
    pub fn api_description_groups(&self) -> Result<ApiDescriptionGroupCollection> {
        let groups = self
            .http_function_methods()
            .map(|(declaring_type, method)| {
                self.function_processor
                    .process_http_function(declaring_type, method)
            })
            .collect::<Result<Vec<_>>>()?;

        info!("Described {} HTTP functions", groups.len());
        Ok(ApiDescriptionGroupCollection::new(groups, COLLECTION_VERSION))
    }

    /// Methods with a function name and an HTTP trigger that are not excluded from the documentation
    pub fn http_function_methods(&self) -> impl Iterator<Item = (&DeclaringType, &FunctionMethod)> {
        self.assembly
            .methods()
            .filter(|(_, method)| is_http_function(method))
            .filter(|(declaring_type, method)| !is_excluded(declaring_type, method))
    }
}

fn is_http_function(method: &FunctionMethod) -> bool {
    method.annotations().has_function_name()
        && method
            .parameters()
            .iter()
            .any(|p| p.annotations().has_http_trigger())
}

fn is_excluded(declaring_type: &DeclaringType, method: &FunctionMethod) -> bool {
    if method.annotations().is_openapi_ignored() {
        debug!("Skipping {}: ignored on method", method.name());
        return true;
    }
    if declaring_type.annotations().is_openapi_ignored() {
        debug!(
            "Skipping {}: ignored on declaring type {}",
            method.name(),
            declaring_type.name()
        );
        return true;
    }
    if method
        .annotations()
        .api_explorer_settings()
        .is_some_and(|settings| settings.ignore_api)
    {
        debug!("Skipping {}: ignored by explorer settings", method.name());
        return true;
    }
    false
}
