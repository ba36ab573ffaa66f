use crate::assembly::{FunctionMethod, FunctionParameter};
use crate::description::{
    ApiParameterDescription, ApiParameterRouteInfo, BindingSource, ParameterDescriptor,
};
use crate::metadata::ModelMetadataProvider;
use crate::route;
use crate::types::TypeRef;
use log::debug;
use std::sync::Arc;

/// Request types of a trigger parameter that carry no typed body.
pub const UNTYPED_TRIGGER_TYPES: &[&str] = &["HttpRequest", "Request", "HttpRequestMessage"];

/// Classifies function parameters as body-bound, path-bound or undocumented.
#[derive(Clone)]
pub struct ParameterProcessor {
    model_metadata_provider: Arc<dyn ModelMetadataProvider>,
}

impl ParameterProcessor {
    pub fn new(model_metadata_provider: Arc<dyn ModelMetadataProvider>) -> Self {
        Self {
            model_metadata_provider,
        }
    }

    /// Describes the documented parameters of a function.
    ///
    /// Body descriptions come first, followed by path descriptions in parameter order.
    /// `route` is the raw route template; `None` is treated as an empty route.
    pub fn parameter_descriptions(
        &self,
        method: &FunctionMethod,
        route: Option<&str>,
    ) -> Vec<ApiParameterDescription> {
        let route = route.unwrap_or("");
        let mut descriptions = self.body_parameters(method);
        descriptions.extend(self.path_parameters(method, route));
        descriptions
    }

    fn body_parameters(&self, method: &FunctionMethod) -> Vec<ApiParameterDescription> {
        let mut descriptions = Vec::new();
        let Some(trigger) = method.trigger_parameters().next() else {
            return descriptions;
        };

        if let Some(body_type) = trigger.annotations().body_type() {
            debug!(
                "Body type {} declared on trigger parameter {}",
                body_type,
                trigger.name()
            );
            descriptions.push(self.create_description(
                trigger.name(),
                body_type,
                BindingSource::Body,
                None,
            ));
        }

        // A typed trigger is also a body, even next to a declared body type
        if !is_untyped_trigger(trigger.ty()) {
            descriptions.push(self.create_description(
                trigger.name(),
                trigger.ty(),
                BindingSource::Body,
                None,
            ));
        }

        descriptions
    }

    fn path_parameters<'a>(
        &'a self,
        method: &'a FunctionMethod,
        route: &'a str,
    ) -> impl Iterator<Item = ApiParameterDescription> + 'a {
        method
            .parameters()
            .iter()
            .filter(|parameter| !parameter.annotations().has_http_trigger())
            .filter_map(move |parameter| self.path_parameter(parameter, route))
    }

    fn path_parameter(
        &self,
        parameter: &FunctionParameter,
        route: &str,
    ) -> Option<ApiParameterDescription> {
        let placeholder = route::find_placeholder(route, parameter.name())?;
        Some(self.create_description(
            parameter.name(),
            parameter.ty(),
            BindingSource::Path,
            Some(ApiParameterRouteInfo {
                is_optional: placeholder.is_optional,
            }),
        ))
    }

    fn create_description(
        &self,
        name: &str,
        ty: &TypeRef,
        source: BindingSource,
        route_info: Option<ApiParameterRouteInfo>,
    ) -> ApiParameterDescription {
        ApiParameterDescription {
            name: name.to_string(),
            type_ref: ty.clone(),
            source,
            route_info,
            model_metadata: self.model_metadata_provider.metadata_for_type(ty),
            parameter_descriptor: ParameterDescriptor {
                name: name.to_string(),
                parameter_type: ty.clone(),
            },
        }
    }
}

fn is_untyped_trigger(ty: &TypeRef) -> bool {
    UNTYPED_TRIGGER_TYPES.contains(&ty.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{Annotation, HttpTrigger};
    use crate::metadata::DefaultModelMetadataProvider;
    use pretty_assertions::assert_eq;

    fn processor() -> ParameterProcessor {
        ParameterProcessor::new(Arc::new(DefaultModelMetadataProvider))
    }

    fn trigger(name: &str, ty: &str) -> FunctionParameter {
        FunctionParameter::new(name, TypeRef::new(ty))
            .with_annotation(Annotation::HttpTrigger(HttpTrigger::new()))
    }

    fn summary(descriptions: &[ApiParameterDescription]) -> Vec<(String, String, BindingSource)> {
        descriptions
            .iter()
            .map(|d| (d.name.clone(), d.type_ref.to_string(), d.source))
            .collect()
    }

    #[test]
    fn test_no_parameters_returns_empty_set() {
        let descriptions = processor().parameter_descriptions(&FunctionMethod::new("f"), None);
        assert!(descriptions.is_empty());
    }

    #[test]
    fn test_typed_trigger_is_body_parameter() {
        let method = FunctionMethod::new("f").with_parameter(trigger("body", "RequestType"));

        let descriptions = processor().parameter_descriptions(&method, None);

        assert_eq!(descriptions.len(), 1);
        let body = &descriptions[0];
        assert_eq!(body.name, "body");
        assert_eq!(body.source, BindingSource::Body);
        assert_eq!(body.route_info, None);
        assert_eq!(
            body.parameter_descriptor,
            ParameterDescriptor {
                name: "body".to_string(),
                parameter_type: TypeRef::new("RequestType"),
            }
        );
    }

    #[test]
    fn test_untyped_trigger_is_not_a_body() {
        let method = FunctionMethod::new("f").with_parameter(trigger("req", "HttpRequest"));
        assert!(processor().parameter_descriptions(&method, None).is_empty());
    }

    #[test]
    fn test_body_type_annotation_on_untyped_trigger() {
        let method = FunctionMethod::new("f").with_parameter(
            trigger("req", "HttpRequest")
                .with_annotation(Annotation::BodyType(TypeRef::new("ExampleRequest"))),
        );

        let descriptions = processor().parameter_descriptions(&method, None);

        assert_eq!(
            summary(&descriptions),
            vec![("req".to_string(), "ExampleRequest".to_string(), BindingSource::Body)]
        );
    }

    #[test]
    fn test_body_type_annotation_on_typed_trigger_yields_two_bodies() {
        let method = FunctionMethod::new("f").with_parameter(
            trigger("req", "RequestType")
                .with_annotation(Annotation::BodyType(TypeRef::new("ExampleRequest"))),
        );

        let descriptions = processor().parameter_descriptions(&method, None);

        assert_eq!(
            summary(&descriptions),
            vec![
                ("req".to_string(), "ExampleRequest".to_string(), BindingSource::Body),
                ("req".to_string(), "RequestType".to_string(), BindingSource::Body),
            ]
        );
    }

    #[test]
    fn test_path_parameters_with_optionality() {
        let method = FunctionMethod::new("f")
            .with_parameter(trigger("req", "HttpRequest"))
            .with_parameter(FunctionParameter::new("name", TypeRef::string()))
            .with_parameter(FunctionParameter::new("date", TypeRef::new("NaiveDate")))
            .with_parameter(FunctionParameter::new("id", TypeRef::new("i32")))
            .with_parameter(FunctionParameter::new("anotherId", TypeRef::option(TypeRef::new("i32"))));

        let descriptions = processor().parameter_descriptions(
            &method,
            Some("Route/{name}/{date?}/{id:int}/{anotherId:int?}/"),
        );

        let flags: Vec<(&str, bool)> = descriptions
            .iter()
            .map(|d| (d.name.as_str(), d.is_optional()))
            .collect();
        assert_eq!(
            flags,
            vec![("name", false), ("date", true), ("id", false), ("anotherId", true)]
        );
        assert!(descriptions.iter().all(|d| d.source == BindingSource::Path));
    }

    #[test]
    fn test_unmatched_parameters_are_excluded() {
        let method = FunctionMethod::new("f")
            .with_parameter(trigger("req", "HttpRequest"))
            .with_parameter(FunctionParameter::new("log", TypeRef::new("Logger")))
            .with_parameter(FunctionParameter::new("param", TypeRef::string()));

        let descriptions = processor().parameter_descriptions(&method, Some("/path/{param}"));

        assert_eq!(
            summary(&descriptions),
            vec![("param".to_string(), "String".to_string(), BindingSource::Path)]
        );
    }

    #[test]
    fn test_trigger_is_never_a_path_parameter() {
        let method = FunctionMethod::new("f").with_parameter(trigger("req", "HttpRequest"));
        assert!(processor()
            .parameter_descriptions(&method, Some("/path/{req}"))
            .is_empty());
    }
}
