//! The configured entry point: builds OpenAPI documents for a function assembly.
//!
//! [`OpenApiService`] wires the processors, the collection provider, the schema generator and
//! the operation filters together. Every call regenerates the document from the assembly;
//! nothing is cached between calls.
//!
//! ```
//! use function_openapi::assembly::FunctionAssembly;
//! use function_openapi::config::GeneratorConfig;
//! use function_openapi::service::OpenApiService;
//! use std::sync::Arc;
//!
//! let service = OpenApiService::new(GeneratorConfig::default(), Arc::new(FunctionAssembly::new("empty")));
//! let document = service.document("v1", Some("example.com/"), Some("api")).unwrap();
//! assert_eq!(document.servers[0].url, "https://example.com/api");
//! ```

use crate::assembly::FunctionAssembly;
use crate::collection_provider::FunctionCollectionProvider;
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::filters::{self, OperationFilter};
use crate::function_processor::FunctionProcessor;
use crate::metadata::{DefaultModelMetadataProvider, ModelMetadataProvider};
use crate::openapi_builder::{OpenApiBuilder, OpenApiDocument};
use crate::parameter_processor::ParameterProcessor;
use crate::resources::{self, DOCUMENT_URL_PLACEHOLDER, SWAGGER_UI_PAGE};
use crate::response_processor::ResponseProcessor;
use crate::schema_generator::{SchemaGenerator, TypeSchemaGenerator};
use log::{debug, info};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static SCHEME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^https?://").expect("Invalid regex constant")
});

pub struct OpenApiService {
    config: GeneratorConfig,
    assembly: Arc<FunctionAssembly>,
    model_metadata_provider: Arc<dyn ModelMetadataProvider>,
    schema_generator: Arc<dyn SchemaGenerator>,
    filters: Vec<Arc<dyn OperationFilter>>,
}

impl OpenApiService {
    /// A service with the default metadata provider, schema generator and filter chain
    pub fn new(config: GeneratorConfig, assembly: Arc<FunctionAssembly>) -> Self {
        let schema_generator = Arc::new(TypeSchemaGenerator::for_assembly(&assembly));
        Self {
            config,
            assembly,
            model_metadata_provider: Arc::new(DefaultModelMetadataProvider),
            schema_generator,
            filters: filters::default_filters(),
        }
    }

    pub fn with_model_metadata_provider(mut self, provider: Arc<dyn ModelMetadataProvider>) -> Self {
        self.model_metadata_provider = provider;
        self
    }

    pub fn with_schema_generator(mut self, generator: Arc<dyn SchemaGenerator>) -> Self {
        self.schema_generator = generator;
        self
    }

    /// Appends a filter after the default chain
    pub fn with_filter(mut self, filter: Arc<dyn OperationFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn assembly(&self) -> &FunctionAssembly {
        &self.assembly
    }

    pub fn collection_provider(&self) -> FunctionCollectionProvider {
        let processor = FunctionProcessor::new(
            ParameterProcessor::new(self.model_metadata_provider.clone()),
            ResponseProcessor::new(self.model_metadata_provider.clone()),
            &self.config,
        );
        FunctionCollectionProvider::new(self.assembly.clone(), processor)
    }

    /// Generates the named document.
    ///
    /// `host` and `base_path` form the single server entry; blank values are ignored.
    ///
    /// # Errors
    ///
    /// `MissingArgument` for a blank document name, `InvalidArgument` for a name that is not
    /// configured, and any error of a malformed function.
    pub fn document(
        &self,
        name: &str,
        host: Option<&str>,
        base_path: Option<&str>,
    ) -> Result<OpenApiDocument> {
        if name.trim().is_empty() {
            return Err(Error::MissingArgument("document_name"));
        }
        let document_config = self
            .config
            .document(name)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown document: {}", name)))?;

        let collection = self.collection_provider().api_description_groups()?;

        let mut builder = OpenApiBuilder::new(&self.assembly, self.schema_generator.as_ref())
            .with_info(
                document_config.title,
                document_config.version,
                document_config.description,
            )
            .with_filters(self.filters.iter().cloned());
        if let Some(url) = server_url(clean_host(host), clean_base_path(base_path)) {
            debug!("Server URL: {}", url);
            builder = builder.with_server(url);
        }
        builder.add_collection(name, &collection)?;

        let document = builder.build();
        info!("Generated document {} with {} paths", name, document.paths.len());
        Ok(document)
    }

    pub fn document_json(&self, name: &str, host: Option<&str>, base_path: Option<&str>) -> Result<String> {
        let document = self.document(name, host, base_path)?;
        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub fn document_yaml(&self, name: &str, host: Option<&str>, base_path: Option<&str>) -> Result<String> {
        let document = self.document(name, host, base_path)?;
        Ok(serde_yaml::to_string(&document)?)
    }

    /// The documentation UI page, loading its document from `document_url`
    pub fn swagger_ui(&self, document_url: &str) -> Result<String> {
        let page = resources::resource(SWAGGER_UI_PAGE)?;
        Ok(page.replace(DOCUMENT_URL_PLACEHOLDER, document_url))
    }
}

/// Trimmed host without trailing slashes, `https://` added when no scheme is given
fn clean_host(host: Option<&str>) -> Option<String> {
    let host = host?.trim_matches(' ').trim_end_matches('/');
    if host.trim().is_empty() {
        return None;
    }
    if SCHEME_REGEX.is_match(host) {
        Some(host.to_string())
    } else {
        Some(format!("https://{}", host))
    }
}

/// `/path` with surrounding slashes and spaces trimmed
fn clean_base_path(base_path: Option<&str>) -> Option<String> {
    let base_path = base_path?;
    if base_path.trim().is_empty() {
        return None;
    }
    Some(format!("/{}", base_path.trim_matches(|c| c == '/' || c == ' ')))
}

fn server_url(host: Option<String>, base_path: Option<String>) -> Option<String> {
    match (host, base_path) {
        (Some(host), Some(base_path)) => Some(format!("{}{}", host, base_path)),
        (Some(host), None) => Some(host),
        (None, base_path) => base_path,
    }
}
