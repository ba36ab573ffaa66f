//! The function assembly: an explicit registry of the functions to document.
//!
//! An assembly groups [`FunctionMethod`]s under [`DeclaringType`]s and carries three
//! annotation scopes (assembly, declaring type, method) plus per-parameter annotations.
//! It also registers the model [`TypeDefinition`]s that request and response types refer to.
//!
//! Assemblies are built either through the `with_*` methods below or by the
//! [`loader`](crate::loader) from annotated Rust source.
//!
//! ```
//! use function_openapi::annotations::{Annotation, HttpTrigger};
//! use function_openapi::assembly::{DeclaringType, FunctionAssembly, FunctionMethod, FunctionParameter};
//! use function_openapi::types::TypeRef;
//!
//! let assembly = FunctionAssembly::new("orders").with_type(
//!     DeclaringType::new("OrderFunctions").with_method(
//!         FunctionMethod::new("get_order")
//!             .with_annotation(Annotation::FunctionName("GetOrder".to_string()))
//!             .with_parameter(
//!                 FunctionParameter::new("req", TypeRef::new("HttpRequest")).with_annotation(
//!                     Annotation::HttpTrigger(HttpTrigger::new().with_methods(["get"]).with_route("orders/{id}")),
//!                 ),
//!             )
//!             .with_parameter(FunctionParameter::new("id", TypeRef::new("u32")))
//!             .returning(TypeRef::future(TypeRef::new("Order"))),
//!     ),
//! );
//! assert_eq!(assembly.types().len(), 1);
//! ```

use crate::annotations::{Annotation, Annotations};
use crate::error::{Error, Result};
use crate::type_resolver::TypeDefinition;
use crate::types::TypeRef;

/// A set of declaring types with their functions, plus assembly-scoped annotations.
#[derive(Debug, Clone, Default)]
pub struct FunctionAssembly {
    name: String,
    annotations: Annotations,
    types: Vec<DeclaringType>,
    definitions: Vec<TypeDefinition>,
}

/// A type (or module) that declares functions; the middle annotation scope.
#[derive(Debug, Clone, Default)]
pub struct DeclaringType {
    name: String,
    annotations: Annotations,
    methods: Vec<FunctionMethod>,
}

#[derive(Debug, Clone)]
pub struct FunctionMethod {
    name: String,
    annotations: Annotations,
    parameters: Vec<FunctionParameter>,
    return_type: TypeRef,
}

#[derive(Debug, Clone)]
pub struct FunctionParameter {
    name: String,
    ty: TypeRef,
    annotations: Annotations,
}

impl FunctionAssembly {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Registers a declaring type without checking for duplicates; see [`Self::add_type`]
    pub fn with_type(mut self, declaring_type: DeclaringType) -> Self {
        self.types.push(declaring_type);
        self
    }

    pub fn with_definition(mut self, definition: TypeDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Registers a declaring type.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` when one of its methods is already registered under the same
    /// declaring type name.
    pub fn add_type(&mut self, declaring_type: DeclaringType) -> Result<()> {
        for (index, method) in declaring_type.methods.iter().enumerate() {
            let repeated = declaring_type.methods[..index]
                .iter()
                .any(|earlier| earlier.name == method.name);
            if repeated || self.find_method(&declaring_type.name, &method.name).is_some() {
                return Err(Error::InvalidArgument(format!(
                    "duplicate function {}::{}",
                    declaring_type.name, method.name
                )));
            }
        }
        self.types.push(declaring_type);
        Ok(())
    }

    pub fn add_definition(&mut self, definition: TypeDefinition) {
        self.definitions.push(definition);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn types(&self) -> &[DeclaringType] {
        &self.types
    }

    pub fn definitions(&self) -> &[TypeDefinition] {
        &self.definitions
    }

    /// Every method paired with its declaring type, in registration order
    pub fn methods(&self) -> impl Iterator<Item = (&DeclaringType, &FunctionMethod)> {
        self.types
            .iter()
            .flat_map(|t| t.methods.iter().map(move |m| (t, m)))
    }

    /// Looks up a method by declaring type and method name
    pub fn find_method(
        &self,
        type_name: &str,
        method_name: &str,
    ) -> Option<(&DeclaringType, &FunctionMethod)> {
        self.methods()
            .find(|(t, m)| t.name == type_name && m.name == method_name)
    }
}

impl DeclaringType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_method(mut self, method: FunctionMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn add_method(&mut self, method: FunctionMethod) {
        self.methods.push(method);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn methods(&self) -> &[FunctionMethod] {
        &self.methods
    }
}

impl FunctionMethod {
    /// A method without parameters returning `()`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Annotations::new(),
            parameters: Vec::new(),
            return_type: TypeRef::unit(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_annotations(mut self, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        self.annotations.extend(annotations);
        self
    }

    pub fn with_parameter(mut self, parameter: FunctionParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returning(mut self, return_type: TypeRef) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn parameters(&self) -> &[FunctionParameter] {
        &self.parameters
    }

    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    /// Parameters carrying an HTTP trigger annotation
    pub fn trigger_parameters(&self) -> impl Iterator<Item = &FunctionParameter> {
        self.parameters
            .iter()
            .filter(|p| p.annotations.has_http_trigger())
    }
}

impl FunctionParameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Annotations::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
