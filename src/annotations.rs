//! Typed annotations attached to functions, parameters, declaring types and assemblies.
//!
//! Annotations are the metadata the pipeline reads: they name a function, mark its HTTP
//! trigger, declare response types and extra query/header parameters, and exclude functions
//! from the documentation. [`Annotations`] is the reader side: an ordered list with lookup
//! helpers for each kind.

use crate::error::{Error, Result};
use crate::types::TypeRef;
use serde::{Deserialize, Serialize};

/// A single piece of documentation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Annotation {
    /// Names a function; required on every documented function
    FunctionName(String),
    /// Marks the trigger parameter of an HTTP function
    HttpTrigger(HttpTrigger),
    /// Overrides the documented request body type of the trigger parameter
    BodyType(TypeRef),
    /// An explicit response type for a status code
    ProducesResponseType { ty: TypeRef, status_code: u16 },
    /// Excludes a function or every function of a declaring type
    OpenApiIgnore,
    ApiExplorerSettings(ApiExplorerSettings),
    QueryParameter(ParameterDeclaration),
    HeaderParameter(ParameterDeclaration),
    IgnoreQueryParameter(String),
    IgnoreHeaderParameter(String),
}

/// Route and verb metadata of the trigger parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpTrigger {
    /// Declared verbs; `None` accepts every standard verb
    pub methods: Option<Vec<String>>,
    /// Route template; `None` routes on the function name
    pub route: Option<String>,
}

impl HttpTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiExplorerSettings {
    pub group_name: Option<String>,
    pub ignore_api: bool,
}

/// Where a declared extra parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    Query,
    Header,
}

/// An extra query or header parameter declared on a method, declaring type or assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,
    pub ty: TypeRef,
    pub description: Option<String>,
    pub required: bool,
}

impl ParameterDeclaration {
    /// Creates a required `String` parameter. The name must not be blank.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::MissingArgument("name"));
        }
        Ok(Self {
            name,
            ty: TypeRef::string(),
            description: None,
            required: true,
        })
    }

    /// Sets the parameter type. The unit type cannot describe a parameter value.
    pub fn with_type(mut self, ty: TypeRef) -> Result<Self> {
        if ty.is_unit() {
            return Err(Error::InvalidArgument(format!(
                "parameter {} cannot have the unit type",
                self.name
            )));
        }
        self.ty = ty;
        Ok(self)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// The annotations of one scope, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.0.push(annotation);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|a| match a {
            Annotation::FunctionName(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn has_function_name(&self) -> bool {
        self.function_names().next().is_some()
    }

    pub fn http_triggers(&self) -> impl Iterator<Item = &HttpTrigger> {
        self.0.iter().filter_map(|a| match a {
            Annotation::HttpTrigger(trigger) => Some(trigger),
            _ => None,
        })
    }

    pub fn has_http_trigger(&self) -> bool {
        self.http_triggers().next().is_some()
    }

    pub fn body_type(&self) -> Option<&TypeRef> {
        self.0.iter().find_map(|a| match a {
            Annotation::BodyType(ty) => Some(ty),
            _ => None,
        })
    }

    pub fn produces_response_types(&self) -> impl Iterator<Item = (&TypeRef, u16)> {
        self.0.iter().filter_map(|a| match a {
            Annotation::ProducesResponseType { ty, status_code } => Some((ty, *status_code)),
            _ => None,
        })
    }

    pub fn is_openapi_ignored(&self) -> bool {
        self.0.iter().any(|a| matches!(a, Annotation::OpenApiIgnore))
    }

    pub fn api_explorer_settings(&self) -> Option<&ApiExplorerSettings> {
        self.0.iter().find_map(|a| match a {
            Annotation::ApiExplorerSettings(settings) => Some(settings),
            _ => None,
        })
    }

    /// Declared extra parameters of the given kind
    pub fn parameter_declarations(
        &self,
        kind: ParameterKind,
    ) -> impl Iterator<Item = &ParameterDeclaration> {
        self.0.iter().filter_map(move |a| match (a, kind) {
            (Annotation::QueryParameter(decl), ParameterKind::Query)
            | (Annotation::HeaderParameter(decl), ParameterKind::Header) => Some(decl),
            _ => None,
        })
    }

    /// Names of ignored extra parameters of the given kind
    pub fn ignored_parameters(&self, kind: ParameterKind) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(move |a| match (a, kind) {
            (Annotation::IgnoreQueryParameter(name), ParameterKind::Query)
            | (Annotation::IgnoreHeaderParameter(name), ParameterKind::Header) => {
                Some(name.as_str())
            }
            _ => None,
        })
    }
}

impl From<Vec<Annotation>> for Annotations {
    fn from(annotations: Vec<Annotation>) -> Self {
        Self(annotations)
    }
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Annotation> for Annotations {
    fn extend<I: IntoIterator<Item = Annotation>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Annotations {
    type Item = Annotation;
    type IntoIter = std::vec::IntoIter<Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_declaration_defaults() {
        let decl = ParameterDeclaration::new("page").unwrap();
        assert_eq!(decl.ty, TypeRef::string());
        assert!(decl.required);
        assert!(decl.description.is_none());
    }

    #[test]
    fn test_parameter_declaration_rejects_blank_name() {
        let result = ParameterDeclaration::new("  ");
        assert!(matches!(result, Err(Error::MissingArgument("name"))));
    }

    #[test]
    fn test_parameter_declaration_rejects_unit_type() {
        let result = ParameterDeclaration::new("page").unwrap().with_type(TypeRef::unit());
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_lookup_by_kind() {
        let annotations: Annotations = vec![
            Annotation::FunctionName("List".to_string()),
            Annotation::QueryParameter(ParameterDeclaration::new("page").unwrap()),
            Annotation::HeaderParameter(ParameterDeclaration::new("x-trace").unwrap()),
            Annotation::IgnoreQueryParameter("sort".to_string()),
        ]
        .into();

        let queries: Vec<_> = annotations
            .parameter_declarations(ParameterKind::Query)
            .map(|d| d.name.as_str())
            .collect();
        let headers: Vec<_> = annotations
            .parameter_declarations(ParameterKind::Header)
            .map(|d| d.name.as_str())
            .collect();

        assert_eq!(queries, vec!["page"]);
        assert_eq!(headers, vec!["x-trace"]);
        assert_eq!(
            annotations.ignored_parameters(ParameterKind::Query).collect::<Vec<_>>(),
            vec!["sort"]
        );
        assert_eq!(annotations.ignored_parameters(ParameterKind::Header).count(), 0);
        assert!(annotations.has_function_name());
        assert!(!annotations.has_http_trigger());
    }

    #[test]
    fn test_response_types_keep_declaration_order() {
        let annotations: Annotations = vec![
            Annotation::ProducesResponseType { ty: TypeRef::new("Item"), status_code: 200 },
            Annotation::ProducesResponseType { ty: TypeRef::unit(), status_code: 204 },
        ]
        .into();

        let codes: Vec<u16> = annotations.produces_response_types().map(|(_, c)| c).collect();
        assert_eq!(codes, vec![200, 204]);
    }
}
