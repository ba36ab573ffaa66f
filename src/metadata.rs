use crate::type_resolver::TypeResolver;
use crate::types::{TypeRef, OBJECT};
use serde::Serialize;

/// Resolves a type to descriptive model metadata
pub trait ModelMetadataProvider {
    fn metadata_for_type(&self, ty: &TypeRef) -> ModelMetadata;
}

/// Broad classification of a model type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelKind {
    Unit,
    Primitive,
    Collection,
    Map,
    Any,
    Complex,
}

/// Descriptive metadata of a model type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelMetadata {
    pub type_ref: TypeRef,
    pub kind: ModelKind,
    /// `Option<T>`; metadata describes `T`
    pub is_nullable: bool,
    /// Element type of collections
    pub element_type: Option<TypeRef>,
}

/// Classifies types purely by their shape and name
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultModelMetadataProvider;

impl ModelMetadataProvider for DefaultModelMetadataProvider {
    fn metadata_for_type(&self, ty: &TypeRef) -> ModelMetadata {
        if ty.is_option() {
            if let Some(inner) = ty.inner() {
                let mut metadata = self.metadata_for_type(inner);
                metadata.is_nullable = true;
                return metadata;
            }
        }

        let (kind, element_type) = if ty.is_unit() {
            (ModelKind::Unit, None)
        } else if ty.is_collection() {
            (ModelKind::Collection, ty.inner().cloned())
        } else if ty.is_map() {
            (ModelKind::Map, ty.generic_args.get(1).cloned())
        } else if ty.name == OBJECT {
            (ModelKind::Any, None)
        } else if TypeResolver::is_primitive(&ty.name) {
            (ModelKind::Primitive, None)
        } else {
            (ModelKind::Complex, None)
        };

        ModelMetadata {
            type_ref: ty.clone(),
            kind,
            is_nullable: false,
            element_type,
        }
    }
}
