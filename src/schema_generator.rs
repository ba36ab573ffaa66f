use crate::assembly::FunctionAssembly;
use crate::type_resolver::{EnumDef, PrimitiveType, StructDef, TypeKind, TypeResolver};
use crate::types::TypeRef;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Prefix of every component schema reference
pub const COMPONENT_SCHEMA_PREFIX: &str = "#/components/schemas/";

/// Wrappers that serialize exactly like the type they hold
const TRANSPARENT_WRAPPERS: &[&str] = &["Box", "Arc", "Rc", "Cow", "Json"];

/// Converts a type into an OpenAPI schema, registering component schemas as needed.
pub trait SchemaGenerator {
    fn generate_schema(&self, ty: &TypeRef, repository: &mut SchemaRepository) -> Schema;
}

/// OpenAPI Schema definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format for primitive types (e.g., "int32", "int64", "float", "double")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Properties for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    /// Required field names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Value schema for map types
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<Schema>>,
    /// Enum values for enum types
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Reference to another schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}

impl Schema {
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::default()
        }
    }

    pub fn string() -> Self {
        Self::of_type("string")
    }

    pub fn object() -> Self {
        Self::of_type("object")
    }

    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_type("array")
        }
    }

    /// A `$ref` to a component schema
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", COMPONENT_SCHEMA_PREFIX, name)),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }
}

/// Component schemas generated so far, keyed by type name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchemaRepository {
    schemas: IndexMap<String, Schema>,
}

impl SchemaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Registers a schema, replacing any earlier one with the same name
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        self.schemas.insert(name.into(), schema);
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn schemas(&self) -> &IndexMap<String, Schema> {
        &self.schemas
    }

    pub fn into_schemas(self) -> IndexMap<String, Schema> {
        self.schemas
    }
}

/// Schema generator over the model types registered with a [`TypeResolver`]
#[derive(Debug, Clone, Default)]
pub struct TypeSchemaGenerator {
    /// Type resolver for looking up type definitions
    type_resolver: TypeResolver,
}

impl TypeSchemaGenerator {
    pub fn new(type_resolver: TypeResolver) -> Self {
        debug!("Initializing TypeSchemaGenerator");
        Self { type_resolver }
    }

    /// Generator that knows the model types declared in an assembly
    pub fn for_assembly(assembly: &FunctionAssembly) -> Self {
        Self::new(TypeResolver::new(assembly.definitions()))
    }

    fn first_argument(&self, ty: &TypeRef, repository: &mut SchemaRepository) -> Option<Schema> {
        ty.inner().map(|inner| self.generate_schema(inner, repository))
    }

    /// Convert a primitive type to an OpenAPI schema
    fn primitive_schema(primitive: &PrimitiveType) -> Schema {
        let (schema_type, format) = match primitive {
            PrimitiveType::String | PrimitiveType::Char => ("string", None),
            PrimitiveType::I8
            | PrimitiveType::I16
            | PrimitiveType::I32
            | PrimitiveType::U8
            | PrimitiveType::U16
            | PrimitiveType::U32 => ("integer", Some("int32")),
            PrimitiveType::I64 | PrimitiveType::I128 | PrimitiveType::U64 | PrimitiveType::U128 => {
                ("integer", Some("int64"))
            }
            PrimitiveType::F32 => ("number", Some("float")),
            PrimitiveType::F64 => ("number", Some("double")),
            PrimitiveType::Bool => ("boolean", None),
            PrimitiveType::Uuid => ("string", Some("uuid")),
            PrimitiveType::DateTime => ("string", Some("date-time")),
            PrimitiveType::Date => ("string", Some("date")),
        };

        let schema = Schema::of_type(schema_type);
        match format {
            Some(format) => schema.with_format(format),
            None => schema,
        }
    }

    /// Registers a struct's component schema; a placeholder goes in first so that
    /// self-referencing models terminate.
    fn register_struct(&self, def: &StructDef, repository: &mut SchemaRepository) {
        if repository.contains(&def.name) {
            debug!("Schema for {} already exists", def.name);
            return;
        }
        debug!("Generating struct schema for: {}", def.name);
        repository.insert(def.name.clone(), Schema::object());

        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        for field in def.fields.iter().filter(|field| !field.serde_attrs.skip) {
            let name = field.serialized_name().to_string();
            let schema = self.generate_schema(&field.type_ref, repository);
            if field.is_required() {
                required.push(name.clone());
            }
            properties.insert(name, schema);
        }

        repository.insert(
            def.name.clone(),
            Schema {
                properties: Some(properties),
                required: (!required.is_empty()).then_some(required),
                ..Schema::object()
            },
        );
    }

    fn register_enum(def: &EnumDef, repository: &mut SchemaRepository) {
        if repository.contains(&def.name) {
            return;
        }
        debug!("Generating enum schema for: {}", def.name);
        repository.insert(
            def.name.clone(),
            Schema {
                enum_values: Some(def.variants.clone()),
                ..Schema::string()
            },
        );
    }
}

impl SchemaGenerator for TypeSchemaGenerator {
    fn generate_schema(&self, ty: &TypeRef, repository: &mut SchemaRepository) -> Schema {
        debug!("Generating schema for type: {}", ty);

        if ty.is_unit() {
            return Schema::default();
        }
        if ty.is_option() {
            let inner = self.first_argument(ty, repository).unwrap_or_else(Schema::object);
            return Schema {
                nullable: true,
                ..inner
            };
        }
        if ty.is_collection() {
            let items = self.first_argument(ty, repository).unwrap_or_else(Schema::object);
            return Schema::array(items);
        }
        if ty.is_map() {
            let values = ty
                .generic_args
                .get(1)
                .map(|value| self.generate_schema(value, repository))
                .unwrap_or_else(Schema::object);
            return Schema {
                additional_properties: Some(Box::new(values)),
                ..Schema::object()
            };
        }
        if ty.is_async_wrapper() || TRANSPARENT_WRAPPERS.contains(&ty.name.as_str()) {
            if let Some(inner) = self.first_argument(ty, repository) {
                return inner;
            }
        }

        match self.type_resolver.resolve_type(&ty.name).map(|r| r.kind) {
            Some(TypeKind::Primitive(primitive)) => Self::primitive_schema(&primitive),
            Some(TypeKind::Any) => Schema::object(),
            Some(TypeKind::Struct(def)) => {
                self.register_struct(&def, repository);
                Schema::reference(&def.name)
            }
            Some(TypeKind::Enum(def)) => {
                Self::register_enum(&def, repository);
                Schema::reference(&def.name)
            }
            None => {
                debug!("Unknown type: {}, using object placeholder", ty);
                Schema::object()
            }
        }
    }
}
