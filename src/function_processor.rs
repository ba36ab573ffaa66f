use crate::annotations::HttpTrigger;
use crate::assembly::{DeclaringType, FunctionMethod};
use crate::config::GeneratorConfig;
use crate::description::{ActionDescriptor, ApiDescription, ApiDescriptionGroup};
use crate::error::{Error, Result};
use crate::parameter_processor::ParameterProcessor;
use crate::response_processor::ResponseProcessor;
use crate::route;
use indexmap::IndexMap;
use log::debug;

/// Verbs of a trigger that does not declare any.
pub const DEFAULT_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "HEAD", "PATCH", "OPTIONS"];

/// Builds the description group of a single HTTP function.
#[derive(Clone)]
pub struct FunctionProcessor {
    parameter_processor: ParameterProcessor,
    response_processor: ResponseProcessor,
    route_prefix: String,
}

impl FunctionProcessor {
    pub fn new(
        parameter_processor: ParameterProcessor,
        response_processor: ResponseProcessor,
        config: &GeneratorConfig,
    ) -> Self {
        Self {
            parameter_processor,
            response_processor,
            route_prefix: config.route_prefix.clone(),
        }
    }

    /// Describes one function: one `ApiDescription` per HTTP verb.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedFunction` when the method lacks exactly one function name,
    /// or lacks exactly one parameter with exactly one HTTP trigger.
    pub fn process_http_function(
        &self,
        declaring_type: &DeclaringType,
        method: &FunctionMethod,
    ) -> Result<ApiDescriptionGroup> {
        let function_name = function_name(method)?;
        let trigger = http_trigger(method, &function_name)?;
        let route_template = route_template(trigger, &function_name);
        let route = route::normalize_route(&self.route_prefix, &route_template);
        let methods = http_methods(trigger);
        let group_name = method
            .annotations()
            .api_explorer_settings()
            .and_then(|settings| settings.group_name.clone());

        debug!(
            "Processing function {} ({} {})",
            function_name,
            methods.join(","),
            route
        );

        let parameter_descriptions = self
            .parameter_processor
            .parameter_descriptions(method, Some(&route_template));
        let response_types = self.response_processor.response_types(method);

        let items = methods
            .into_iter()
            .map(|http_method| {
                let mut route_values = IndexMap::new();
                route_values.insert("controller".to_string(), function_name.clone());
                route_values.insert("action".to_string(), http_method.clone());

                ApiDescription {
                    relative_path: route.clone(),
                    group_name: group_name.clone(),
                    action_descriptor: ActionDescriptor {
                        display_name: function_name.clone(),
                        action_name: function_name.clone(),
                        controller_name: http_method.clone(),
                        declaring_type: declaring_type.name().to_string(),
                        method_name: method.name().to_string(),
                        parameters: parameter_descriptions
                            .iter()
                            .map(|p| p.parameter_descriptor.clone())
                            .collect(),
                        route_values,
                    },
                    parameter_descriptions: parameter_descriptions.clone(),
                    supported_response_types: response_types.clone(),
                    http_method,
                }
            })
            .collect();

        Ok(ApiDescriptionGroup {
            group_name: function_name,
            items,
        })
    }
}

fn function_name(method: &FunctionMethod) -> Result<String> {
    let names: Vec<&str> = method.annotations().function_names().collect();
    match names.as_slice() {
        [name] => Ok(name.to_string()),
        [] => Err(Error::malformed(method.name(), "missing function name")),
        _ => Err(Error::malformed(method.name(), "more than one function name")),
    }
}

fn http_trigger<'a>(method: &'a FunctionMethod, function_name: &str) -> Result<&'a HttpTrigger> {
    let parameters: Vec<_> = method.trigger_parameters().collect();
    let [parameter] = parameters[..] else {
        return Err(Error::malformed(
            function_name,
            format!(
                "expected exactly one HTTP trigger parameter, found {}",
                parameters.len()
            ),
        ));
    };

    let triggers: Vec<&HttpTrigger> = parameter.annotations().http_triggers().collect();
    match triggers[..] {
        [trigger] => Ok(trigger),
        _ => Err(Error::malformed(
            function_name,
            format!("parameter {} has more than one HTTP trigger", parameter.name()),
        )),
    }
}

fn route_template(trigger: &HttpTrigger, function_name: &str) -> String {
    match trigger.route.as_deref() {
        Some(route) if !route.trim().is_empty() => route.to_string(),
        _ => function_name.to_string(),
    }
}

fn http_methods(trigger: &HttpTrigger) -> Vec<String> {
    match &trigger.methods {
        Some(methods) => methods.iter().map(|m| m.trim().to_uppercase()).collect(),
        None => DEFAULT_METHODS.iter().map(|m| m.to_string()).collect(),
    }
}
