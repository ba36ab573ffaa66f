use crate::types::{TypeRef, OBJECT};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Type resolver - resolves type names to primitives or registered model definitions
#[derive(Debug, Clone, Default)]
pub struct TypeResolver {
    /// Registered struct and enum definitions indexed by name
    definitions: IndexMap<String, TypeDefinition>,
}

/// A type name matched against primitives and registered definitions
#[derive(Debug, Clone)]
pub struct ResolvedType {
    pub name: String,
    pub kind: TypeKind,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Struct(StructDef),
    /// Unit variants only; rendered as a string enumeration
    Enum(EnumDef),
    Primitive(PrimitiveType),
    /// Untyped JSON value
    Any,
}

/// A model type the documented functions exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeDefinition {
    Struct(StructDef),
    Enum(EnumDef),
}

/// A struct with named fields; tuple and unit structs have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub type_ref: TypeRef,
    #[serde(default)]
    pub serde_attrs: SerdeAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    /// Serialized variant names
    pub variants: Vec<String>,
}

/// Types rendered as OpenAPI scalars
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
    Bool,
    Char,
    Uuid,
    DateTime,
    Date,
}

/// The `#[serde(...)]` options that change a field's schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerdeAttributes {
    pub rename: Option<String>,
    pub skip: bool,
    /// Whether the field may be omitted on input
    pub default: bool,
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Struct(def) => &def.name,
            TypeDefinition::Enum(def) => &def.name,
        }
    }

    /// Builds a struct definition from its fields
    pub fn structure(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        TypeDefinition::Struct(StructDef {
            name: name.into(),
            fields,
        })
    }

    /// Builds an enum definition from its variant names
    pub fn enumeration<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeDefinition::Enum(EnumDef {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        })
    }

    /// Parse a struct item into a definition
    pub fn from_item_struct(item_struct: &syn::ItemStruct) -> Self {
        let struct_name = item_struct.ident.to_string();
        debug!("Parsing struct definition: {}", struct_name);

        let mut fields = Vec::new();
        if let syn::Fields::Named(named_fields) = &item_struct.fields {
            for field in &named_fields.named {
                if let Some(ident) = &field.ident {
                    fields.push(FieldDef {
                        name: ident.to_string(),
                        type_ref: TypeRef::from(&field.ty),
                        serde_attrs: parse_serde_attributes(&field.attrs),
                    });
                }
            }
        }

        debug!("Parsed {} fields", fields.len());
        TypeDefinition::Struct(StructDef {
            name: struct_name,
            fields,
        })
    }

    /// Parse an enum item into a definition
    pub fn from_item_enum(item_enum: &syn::ItemEnum) -> Self {
        let enum_name = item_enum.ident.to_string();
        debug!("Parsing enum definition: {}", enum_name);

        let variants = item_enum
            .variants
            .iter()
            .map(|variant| {
                parse_serde_attributes(&variant.attrs)
                    .rename
                    .unwrap_or_else(|| variant.ident.to_string())
            })
            .collect();

        TypeDefinition::Enum(EnumDef {
            name: enum_name,
            variants,
        })
    }
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            serde_attrs: SerdeAttributes::default(),
        }
    }

    /// Name of the field as serialized
    pub fn serialized_name(&self) -> &str {
        self.serde_attrs.rename.as_deref().unwrap_or(&self.name)
    }

    /// Whether the field must be present in a serialized value
    pub fn is_required(&self) -> bool {
        !self.type_ref.is_option() && !self.serde_attrs.default
    }
}

fn parse_serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
    let mut serde_attrs = SerdeAttributes::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                debug!("Found serde rename: {}", value.value());
                serde_attrs.rename = Some(value.value());
            } else if meta.path.is_ident("skip") {
                serde_attrs.skip = true;
            } else if meta.path.is_ident("default") {
                serde_attrs.default = true;
                if meta.input.peek(syn::Token![=]) {
                    let _: syn::LitStr = meta.value()?.parse()?;
                }
            } else if meta.input.peek(syn::Token![=]) {
                // Other key-value options such as skip_serializing_if are not relevant here
                let _: syn::Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let _content;
                syn::parenthesized!(_content in meta.input);
            }
            Ok(())
        });
        if let Err(e) = result {
            debug!("Ignoring unparseable serde attribute: {}", e);
        }
    }

    serde_attrs
}

impl TypeResolver {
    /// Indexes definitions by name; a later definition replaces an earlier one
    pub fn new(definitions: &[TypeDefinition]) -> Self {
        debug!("Initializing TypeResolver with {} definitions", definitions.len());
        Self {
            definitions: definitions
                .iter()
                .map(|def| (def.name().to_string(), def.clone()))
                .collect(),
        }
    }

    pub fn resolve_type(&self, type_name: &str) -> Option<ResolvedType> {
        debug!("Resolving type: {}", type_name);

        if let Some(primitive) = Self::parse_primitive_type(type_name) {
            return Some(ResolvedType {
                name: type_name.to_string(),
                kind: TypeKind::Primitive(primitive),
            });
        }

        if type_name == OBJECT {
            return Some(ResolvedType {
                name: type_name.to_string(),
                kind: TypeKind::Any,
            });
        }

        let resolved = self.definitions.get(type_name).map(|def| ResolvedType {
            name: type_name.to_string(),
            kind: match def {
                TypeDefinition::Struct(s) => TypeKind::Struct(s.clone()),
                TypeDefinition::Enum(e) => TypeKind::Enum(e.clone()),
            },
        });

        if resolved.is_none() {
            debug!("Could not resolve type: {}", type_name);
        }
        resolved
    }

    pub fn is_primitive(type_name: &str) -> bool {
        Self::parse_primitive_type(type_name).is_some()
    }

    fn parse_primitive_type(type_name: &str) -> Option<PrimitiveType> {
        match type_name {
            "String" | "str" => Some(PrimitiveType::String),
            "i8" => Some(PrimitiveType::I8),
            "i16" => Some(PrimitiveType::I16),
            "i32" => Some(PrimitiveType::I32),
            "i64" => Some(PrimitiveType::I64),
            "i128" => Some(PrimitiveType::I128),
            "u8" => Some(PrimitiveType::U8),
            "u16" => Some(PrimitiveType::U16),
            "u32" => Some(PrimitiveType::U32),
            "u64" => Some(PrimitiveType::U64),
            "u128" => Some(PrimitiveType::U128),
            "f32" => Some(PrimitiveType::F32),
            "f64" => Some(PrimitiveType::F64),
            "bool" => Some(PrimitiveType::Bool),
            "char" => Some(PrimitiveType::Char),
            "Uuid" => Some(PrimitiveType::Uuid),
            "DateTime" | "NaiveDateTime" | "OffsetDateTime" => Some(PrimitiveType::DateTime),
            "NaiveDate" | "Date" => Some(PrimitiveType::Date),
            _ => None,
        }
    }
}
