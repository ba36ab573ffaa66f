use crate::assembly::FunctionAssembly;
use crate::description::{ApiDescription, ApiDescriptionGroup, ApiDescriptionGroupCollection, BindingSource};
use crate::error::Result;
use crate::filters::{OperationFilter, OperationFilterContext};
use crate::response_processor::JSON_MEDIA_TYPE;
use crate::schema_generator::{Schema, SchemaGenerator, SchemaRepository};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const OPENAPI_VERSION: &str = "3.0.1";

/// OpenAPI document builder
pub struct OpenApiBuilder<'a> {
    /// OpenAPI info section
    info: Info,
    servers: Vec<Server>,
    /// Paths collection (URL path -> PathItem)
    paths: IndexMap<String, PathItem>,
    /// Component schemas registered while generating operations
    schema_repository: SchemaRepository,
    schema_generator: &'a dyn SchemaGenerator,
    /// Assembly the descriptions were generated from; filters read annotations from it
    assembly: &'a FunctionAssembly,
    filters: Vec<Arc<dyn OperationFilter>>,
}

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI Server object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
}

/// OpenAPI PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Operation ID
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Parameters (path, query, header)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code
    pub responses: IndexMap<String, Response>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter location (path, query, header)
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the parameter is required
    pub required: bool,
    /// Parameter schema
    pub schema: Schema,
    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Whether the request body is required
    pub required: bool,
    /// Content types and their schemas
    pub content: IndexMap<String, MediaType>,
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema for this media type
    pub schema: Schema,
}

/// OpenAPI Response object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Response description
    pub description: String,
    /// Response content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// OpenAPI Components object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Schema definitions
    pub schemas: IndexMap<String, Schema>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version
    pub openapi: String,
    /// API info
    pub info: Info,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// API paths
    pub paths: IndexMap<String, PathItem>,
    /// Components (schemas, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

impl PathItem {
    /// Mutable slot of the operation for an HTTP verb; `None` for verbs OpenAPI cannot express
    pub fn operation_mut(&mut self, http_method: &str) -> Option<&mut Option<Operation>> {
        match http_method.to_ascii_uppercase().as_str() {
            "GET" => Some(&mut self.get),
            "PUT" => Some(&mut self.put),
            "POST" => Some(&mut self.post),
            "DELETE" => Some(&mut self.delete),
            "OPTIONS" => Some(&mut self.options),
            "HEAD" => Some(&mut self.head),
            "PATCH" => Some(&mut self.patch),
            "TRACE" => Some(&mut self.trace),
            _ => None,
        }
    }

    pub fn operation(&self, http_method: &str) -> Option<&Operation> {
        match http_method.to_ascii_uppercase().as_str() {
            "GET" => self.get.as_ref(),
            "PUT" => self.put.as_ref(),
            "POST" => self.post.as_ref(),
            "DELETE" => self.delete.as_ref(),
            "OPTIONS" => self.options.as_ref(),
            "HEAD" => self.head.as_ref(),
            "PATCH" => self.patch.as_ref(),
            "TRACE" => self.trace.as_ref(),
            _ => None,
        }
    }
}

impl Operation {
    /// Finds the parameter with the given name, regardless of location
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl<'a> OpenApiBuilder<'a> {
    pub fn new(assembly: &'a FunctionAssembly, schema_generator: &'a dyn SchemaGenerator) -> Self {
        debug!("Initializing OpenApiBuilder for assembly {}", assembly.name());
        Self {
            info: Info {
                title: "Open API Documentation".to_string(),
                version: "v1".to_string(),
                description: None,
            },
            servers: Vec::new(),
            paths: IndexMap::new(),
            schema_repository: SchemaRepository::new(),
            schema_generator,
            assembly,
            filters: Vec::new(),
        }
    }

    /// Set custom info for the API
    pub fn with_info(mut self, title: String, version: String, description: Option<String>) -> Self {
        self.info = Info {
            title,
            version,
            description,
        };
        self
    }

    pub fn with_server(mut self, url: impl Into<String>) -> Self {
        self.servers.push(Server { url: url.into() });
        self
    }

    /// Adds a filter run on every generated operation, after the ones added before it
    pub fn with_filter(mut self, filter: Arc<dyn OperationFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_filters(mut self, filters: impl IntoIterator<Item = Arc<dyn OperationFilter>>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Adds every description of the collection that belongs to `document_name`.
    ///
    /// Descriptions without a group name belong to every document.
    pub fn add_collection(
        &mut self,
        document_name: &str,
        collection: &ApiDescriptionGroupCollection,
    ) -> Result<()> {
        for group in &collection.items {
            self.add_group(document_name, group)?;
        }
        Ok(())
    }

    fn add_group(&mut self, document_name: &str, group: &ApiDescriptionGroup) -> Result<()> {
        let several_verbs = group.items.len() > 1;
        for description in &group.items {
            if description
                .group_name
                .as_deref()
                .is_some_and(|name| name != document_name)
            {
                debug!(
                    "Skipping {} {}: belongs to document {:?}",
                    description.http_method, description.relative_path, description.group_name
                );
                continue;
            }

            let operation_id = if several_verbs {
                format!("{}_{}", group.group_name, description.http_method.to_lowercase())
            } else {
                group.group_name.clone()
            };
            self.add_description(description, operation_id)?;
        }
        Ok(())
    }

    /// Add one description as an operation, running the filters over it
    pub fn add_description(&mut self, description: &ApiDescription, operation_id: String) -> Result<()> {
        debug!(
            "Adding operation: {} {}",
            description.http_method, description.relative_path
        );

        let mut operation = Operation {
            tags: vec![description.action_descriptor.display_name.clone()],
            operation_id: Some(operation_id),
            parameters: Self::path_parameters(description),
            request_body: self.request_body(description),
            responses: self.responses(description),
        };

        let mut context = OperationFilterContext {
            api_description: description,
            assembly: self.assembly,
            schema_generator: self.schema_generator,
            schema_repository: &mut self.schema_repository,
        };
        for filter in &self.filters {
            filter.apply(&mut operation, &mut context)?;
        }

        let path = format!("/{}", description.relative_path);
        let path_item = self.paths.entry(path.clone()).or_default();
        match path_item.operation_mut(&description.http_method) {
            Some(slot) => {
                if slot.is_some() {
                    warn!(
                        "Duplicate operation {} {}, keeping the last one",
                        description.http_method, path
                    );
                }
                *slot = Some(operation);
            }
            None => warn!(
                "HTTP method {} cannot be expressed in OpenAPI, skipping {}",
                description.http_method, path
            ),
        }
        Ok(())
    }

    /// Path parameters start out as required strings; filters refine them
    fn path_parameters(description: &ApiDescription) -> Vec<Parameter> {
        description
            .parameter_descriptions
            .iter()
            .filter(|p| p.source == BindingSource::Path)
            .map(|p| Parameter {
                name: p.name.clone(),
                location: ParameterLocation::Path,
                required: true,
                schema: Schema::string(),
                description: None,
            })
            .collect()
    }

    /// The first body description becomes the request body
    fn request_body(&mut self, description: &ApiDescription) -> Option<RequestBody> {
        let body = description
            .parameter_descriptions
            .iter()
            .find(|p| p.source == BindingSource::Body)?;
        let schema = self
            .schema_generator
            .generate_schema(&body.type_ref, &mut self.schema_repository);

        Some(RequestBody {
            required: true,
            content: IndexMap::from([(JSON_MEDIA_TYPE.to_string(), MediaType { schema })]),
        })
    }

    fn responses(&mut self, description: &ApiDescription) -> IndexMap<String, Response> {
        let mut responses = IndexMap::new();
        for response_type in &description.supported_response_types {
            let content = if response_type.response_formats.is_empty() {
                None
            } else {
                let schema = self
                    .schema_generator
                    .generate_schema(&response_type.type_ref, &mut self.schema_repository);
                Some(
                    response_type
                        .response_formats
                        .iter()
                        .map(|format| {
                            (
                                format.media_type.clone(),
                                MediaType {
                                    schema: schema.clone(),
                                },
                            )
                        })
                        .collect(),
                )
            };

            let status_code = response_type.status_code.to_string();
            if responses.contains_key(&status_code) {
                warn!(
                    "Duplicate response {} for {} /{}, keeping the last one",
                    status_code, description.http_method, description.relative_path
                );
            }
            responses.insert(
                status_code,
                Response {
                    description: reason_phrase(response_type.status_code).to_string(),
                    content,
                },
            );
        }
        responses
    }

    /// Build the final OpenAPI document
    pub fn build(self) -> OpenApiDocument {
        debug!("Building final OpenAPI document");

        let components = (!self.schema_repository.is_empty()).then(|| Components {
            schemas: self.schema_repository.into_schemas(),
        });

        OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: self.info,
            servers: self.servers,
            paths: self.paths,
            components,
        }
    }
}

fn reason_phrase(status_code: u16) -> &'static str {
    match status_code {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        100..=199 => "Informational",
        200..=299 => "Success",
        300..=399 => "Redirection",
        400..=499 => "Client Error",
        _ => "Server Error",
    }
}
