//! Function OpenAPI - OpenAPI documents for HTTP-triggered serverless functions.
//!
//! Functions are registered in a [`FunctionAssembly`](assembly::FunctionAssembly), either
//! through its builder API or by loading annotated Rust source with the [`loader`]. The
//! generator reads their annotations (function name, HTTP trigger, body and response types,
//! declared query and header parameters, exclusions) and describes every HTTP function as
//! OpenAPI 3.0 operations.
//!
//! # Architecture
//!
//! 1. [`loader`] - Builds an assembly from source, using [`scanner`] and [`parser`]
//! 2. [`collection_provider`] - Selects the documented functions of an assembly
//! 3. [`function_processor`] - Turns one function into API descriptions, one per verb, with
//!    the help of [`route`], [`parameter_processor`] and [`response_processor`]
//! 4. [`openapi_builder`] - Assembles operations, running the [`filters`] on each
//! 5. [`schema_generator`] - Converts types into schemas and component references
//! 6. [`service`] - The configured entry point producing named documents and the UI page
//! 7. [`serializer`] - Writes documents as YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use function_openapi::config::GeneratorConfig;
//! use function_openapi::loader::AssemblyLoader;
//! use function_openapi::serializer::serialize_yaml;
//! use function_openapi::service::OpenApiService;
//! use std::sync::Arc;
//!
//! let assembly = AssemblyLoader::new("./my-functions").load().unwrap();
//! let service = OpenApiService::new(GeneratorConfig::default(), Arc::new(assembly));
//! let document = service.document("v1", Some("example.com"), None).unwrap();
//! println!("{}", serialize_yaml(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod annotations;
pub mod assembly;
pub mod cli;
pub mod collection_provider;
pub mod config;
pub mod description;
pub mod error;
pub mod filters;
pub mod function_processor;
pub mod loader;
pub mod metadata;
pub mod openapi_builder;
pub mod parameter_processor;
pub mod parser;
pub mod resources;
pub mod response_processor;
pub mod route;
pub mod scanner;
pub mod schema_generator;
pub mod serializer;
pub mod service;
pub mod type_resolver;
pub mod types;
