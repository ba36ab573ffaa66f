use crate::assembly::FunctionMethod;
use crate::description::{ApiResponseFormat, ApiResponseType};
use crate::metadata::ModelMetadataProvider;
use crate::types::TypeRef;
use log::debug;
use std::sync::Arc;

/// Response types that carry no static type information.
pub const UNTYPED_RESPONSE_TYPES: &[&str] = &[
    "HttpResponse",
    "Response",
    "HttpResponseMessage",
    "impl IntoResponse",
    "impl Responder",
];

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Derives the documented responses of a function.
#[derive(Clone)]
pub struct ResponseProcessor {
    model_metadata_provider: Arc<dyn ModelMetadataProvider>,
}

impl ResponseProcessor {
    pub fn new(model_metadata_provider: Arc<dyn ModelMetadataProvider>) -> Self {
        Self {
            model_metadata_provider,
        }
    }

    /// Explicit response annotations when present, otherwise one response inferred from
    /// the return type.
    pub fn response_types(&self, method: &FunctionMethod) -> Vec<ApiResponseType> {
        let explicit: Vec<ApiResponseType> = method
            .annotations()
            .produces_response_types()
            .map(|(ty, status_code)| self.create_response_type(ty.clone(), status_code))
            .collect();

        if !explicit.is_empty() {
            debug!(
                "Using {} declared response types for {}",
                explicit.len(),
                method.name()
            );
            return explicit;
        }

        vec![self.infer_response_type(method.return_type())]
    }

    fn infer_response_type(&self, return_type: &TypeRef) -> ApiResponseType {
        let resolved = match return_type.inner() {
            Some(inner) if return_type.is_async_wrapper() => inner,
            _ => return_type,
        };
        // errors are not documented, only the success value
        let resolved = match resolved.inner() {
            Some(ok) if resolved.is_result() => ok,
            _ => resolved,
        };

        if resolved.is_unit() {
            return self.create_response_type(TypeRef::unit(), 204);
        }

        let resolved = if UNTYPED_RESPONSE_TYPES.contains(&resolved.name.as_str()) {
            TypeRef::object()
        } else {
            resolved.clone()
        };

        debug!("Inferred response type {} from {}", resolved, return_type);
        self.create_response_type(resolved, 200)
    }

    fn create_response_type(&self, type_ref: TypeRef, status_code: u16) -> ApiResponseType {
        if type_ref.is_unit() {
            return ApiResponseType {
                type_ref,
                status_code,
                is_default: false,
                response_formats: Vec::new(),
                model_metadata: None,
            };
        }

        let model_metadata = self.model_metadata_provider.metadata_for_type(&type_ref);
        ApiResponseType {
            type_ref,
            status_code,
            is_default: false,
            response_formats: vec![ApiResponseFormat {
                media_type: JSON_MEDIA_TYPE.to_string(),
            }],
            model_metadata: Some(model_metadata),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::Annotation;
    use crate::metadata::DefaultModelMetadataProvider;

    fn processor() -> ResponseProcessor {
        ResponseProcessor::new(Arc::new(DefaultModelMetadataProvider))
    }

    fn single(method: FunctionMethod) -> (TypeRef, u16) {
        let responses = processor().response_types(&method);
        assert_eq!(responses.len(), 1);
        (responses[0].type_ref.clone(), responses[0].status_code)
    }

    #[test]
    fn test_single_declared_response() {
        let method = FunctionMethod::new("f")
            .with_annotation(Annotation::ProducesResponseType {
                ty: TypeRef::new("ResponseType"),
                status_code: 200,
            })
            .returning(TypeRef::new("impl IntoResponse"));

        assert_eq!(single(method), (TypeRef::new("ResponseType"), 200));
    }

    #[test]
    fn test_multiple_declared_responses_replace_inference() {
        let method = FunctionMethod::new("f")
            .with_annotations([
                Annotation::ProducesResponseType { ty: TypeRef::new("ResponseType"), status_code: 200 },
                Annotation::ProducesResponseType { ty: TypeRef::unit(), status_code: 204 },
            ])
            .returning(TypeRef::new("OtherType"));

        let responses = processor().response_types(&method);

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].response_formats[0].media_type, "application/json");
        assert!(responses[0].model_metadata.is_some());
        assert!(responses[1].type_ref.is_unit());
        assert!(responses[1].response_formats.is_empty());
        assert!(responses[1].model_metadata.is_none());
    }

    #[test]
    fn test_untyped_response_becomes_object() {
        let method = FunctionMethod::new("f").returning(TypeRef::new("HttpResponse"));
        assert_eq!(single(method), (TypeRef::object(), 200));
    }

    #[test]
    fn test_plain_response_type() {
        let method = FunctionMethod::new("f").returning(TypeRef::vec(TypeRef::new("ResponseType")));
        assert_eq!(single(method), (TypeRef::vec(TypeRef::new("ResponseType")), 200));
    }

    #[test]
    fn test_unit_is_no_content() {
        assert_eq!(single(FunctionMethod::new("f")), (TypeRef::unit(), 204));
    }

    #[test]
    fn test_async_without_result_is_no_content() {
        let method = FunctionMethod::new("f").returning(TypeRef::future(TypeRef::unit()));
        let responses = processor().response_types(&method);

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].status_code, 204);
        assert!(responses[0].type_ref.is_unit());
        assert!(responses[0].response_formats.is_empty());
    }

    #[test]
    fn test_async_result_is_unwrapped() {
        let method = FunctionMethod::new("f").returning(TypeRef::future(TypeRef::new("ResponseType")));
        assert_eq!(single(method), (TypeRef::new("ResponseType"), 200));
    }

    #[test]
    fn test_async_untyped_result_becomes_object() {
        let method =
            FunctionMethod::new("f").returning(TypeRef::future(TypeRef::new("impl Responder")));
        assert_eq!(single(method), (TypeRef::object(), 200));
    }

    #[test]
    fn test_result_documents_success_type() {
        let result = TypeRef::generic(
            "Result",
            vec![TypeRef::generic("Json", vec![TypeRef::new("Order")]), TypeRef::new("Error")],
        );
        let method = FunctionMethod::new("f").returning(TypeRef::future(result));
        assert_eq!(
            single(method),
            (TypeRef::generic("Json", vec![TypeRef::new("Order")]), 200)
        );

        let method = FunctionMethod::new("f").returning(TypeRef::generic("Result", vec![TypeRef::new("Order")]));
        assert_eq!(single(method), (TypeRef::new("Order"), 200));
    }

    #[test]
    fn test_result_of_unit_is_no_content() {
        let result = TypeRef::generic("Result", vec![TypeRef::unit(), TypeRef::new("Error")]);
        let method = FunctionMethod::new("f").returning(TypeRef::future(result));
        assert_eq!(single(method), (TypeRef::unit(), 204));

        let result = TypeRef::generic("Result", vec![TypeRef::new("HttpResponse"), TypeRef::new("Error")]);
        assert_eq!(single(FunctionMethod::new("f").returning(result)), (TypeRef::object(), 200));
    }

    #[test]
    fn test_only_one_async_level_is_unwrapped() {
        let nested = TypeRef::future(TypeRef::future(TypeRef::new("ResponseType")));
        let method = FunctionMethod::new("f").returning(nested);
        assert_eq!(single(method).0, TypeRef::future(TypeRef::new("ResponseType")));
    }
}
