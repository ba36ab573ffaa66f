//! API descriptions: the intermediate representation between function metadata and the
//! OpenAPI document.
//!
//! The processors turn each documented function into an [`ApiDescriptionGroup`] holding one
//! [`ApiDescription`] per HTTP verb. The [`OpenApiBuilder`](crate::openapi_builder::OpenApiBuilder)
//! consumes the resulting [`ApiDescriptionGroupCollection`].

use crate::metadata::ModelMetadata;
use crate::types::TypeRef;
use indexmap::IndexMap;
use serde::Serialize;

/// Where a parameter's value is read from in an HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BindingSource {
    Body,
    Path,
    Query,
    Header,
}

/// The low-level descriptor of a function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub parameter_type: TypeRef,
}

/// Route metadata of a parameter bound to a route placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApiParameterRouteInfo {
    pub is_optional: bool,
}

/// One documented parameter of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiParameterDescription {
    pub name: String,
    pub type_ref: TypeRef,
    pub source: BindingSource,
    /// Present for path parameters only
    pub route_info: Option<ApiParameterRouteInfo>,
    pub model_metadata: ModelMetadata,
    pub parameter_descriptor: ParameterDescriptor,
}

impl ApiParameterDescription {
    pub fn is_optional(&self) -> bool {
        self.route_info.map(|info| info.is_optional).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseFormat {
    pub media_type: String,
}

/// One documented response of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseType {
    pub type_ref: TypeRef,
    pub status_code: u16,
    pub is_default: bool,
    /// Empty for responses without content
    pub response_formats: Vec<ApiResponseFormat>,
    pub model_metadata: Option<ModelMetadata>,
}

/// Identifies the function behind a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    /// The function name
    pub display_name: String,
    pub action_name: String,
    /// The HTTP method of the description
    pub controller_name: String,
    pub declaring_type: String,
    pub method_name: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub route_values: IndexMap<String, String>,
}

/// A single documented operation: one verb of one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiDescription {
    pub http_method: String,
    pub relative_path: String,
    pub group_name: Option<String>,
    pub action_descriptor: ActionDescriptor,
    pub parameter_descriptions: Vec<ApiParameterDescription>,
    pub supported_response_types: Vec<ApiResponseType>,
}

impl ApiDescription {
    /// Finds the parameter description with the given name
    pub fn parameter_description(&self, name: &str) -> Option<&ApiParameterDescription> {
        self.parameter_descriptions.iter().find(|p| p.name == name)
    }
}

/// All descriptions of one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiDescriptionGroup {
    pub group_name: String,
    pub items: Vec<ApiDescription>,
}

/// The descriptions of every documented function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiDescriptionGroupCollection {
    pub items: Vec<ApiDescriptionGroup>,
    pub version: u32,
}

impl ApiDescriptionGroupCollection {
    pub fn new(items: Vec<ApiDescriptionGroup>, version: u32) -> Self {
        Self { items, version }
    }

    /// Every description across all groups
    pub fn descriptions(&self) -> impl Iterator<Item = &ApiDescription> {
        self.items.iter().flat_map(|group| group.items.iter())
    }
}
