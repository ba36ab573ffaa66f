//! Structural type references used throughout the documentation pipeline.
//!
//! A [`TypeRef`] names a type and its generic arguments, e.g. `Vec<User>` is
//! `TypeRef { name: "Vec", generic_args: [User] }`. Type references are produced either by
//! the registration API or from `syn` types found in function signatures and attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the unit type.
pub const UNIT: &str = "()";

/// Name of the untyped object type.
pub const OBJECT: &str = "Value";

/// Wrapper types whose single generic argument is the eventual result of an async function.
pub const ASYNC_WRAPPERS: &[&str] = &["Future", "BoxFuture", "LocalBoxFuture"];

/// Sequence-like types rendered as arrays.
pub const COLLECTIONS: &[&str] = &["Vec", "VecDeque", "HashSet", "BTreeSet", "IndexSet", "LinkedList"];

/// Map-like types rendered as objects.
pub const MAPS: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

/// A reference to a type by name with its generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// The base type name (e.g. "String", "User", "Vec")
    pub name: String,
    /// Generic type arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_args: Vec<TypeRef>,
}

impl TypeRef {
    /// Create a TypeRef for a non-generic type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_args: Vec::new(),
        }
    }

    /// Create a TypeRef for a generic type
    pub fn generic(name: impl Into<String>, generic_args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            generic_args,
        }
    }

    pub fn unit() -> Self {
        Self::new(UNIT)
    }

    pub fn object() -> Self {
        Self::new(OBJECT)
    }

    pub fn string() -> Self {
        Self::new("String")
    }

    pub fn option(inner: TypeRef) -> Self {
        Self::generic("Option", vec![inner])
    }

    pub fn vec(inner: TypeRef) -> Self {
        Self::generic("Vec", vec![inner])
    }

    /// `impl Future<Output = T>`, the return type of an `async fn` yielding `T`
    pub fn future(output: TypeRef) -> Self {
        Self::generic("Future", vec![output])
    }

    /// Parses a Rust type expression such as `Vec<User>` or `Option<i32>`.
    pub fn parse(source: &str) -> crate::error::Result<Self> {
        let ty: syn::Type = syn::parse_str(source).map_err(|e| {
            crate::error::Error::InvalidArgument(format!("invalid type `{}`: {}", source, e))
        })?;
        Ok(Self::from(&ty))
    }

    pub fn is_unit(&self) -> bool {
        self.name == UNIT
    }

    pub fn is_option(&self) -> bool {
        self.name == "Option" && self.generic_args.len() == 1
    }

    pub fn is_collection(&self) -> bool {
        COLLECTIONS.contains(&self.name.as_str()) && self.generic_args.len() == 1
    }

    pub fn is_map(&self) -> bool {
        MAPS.contains(&self.name.as_str())
    }

    pub fn is_async_wrapper(&self) -> bool {
        ASYNC_WRAPPERS.contains(&self.name.as_str()) && !self.generic_args.is_empty()
    }

    /// `Result<T, E>` or an alias such as `anyhow::Result<T>`; `T` is the success value
    pub fn is_result(&self) -> bool {
        self.name == "Result" && !self.generic_args.is_empty()
    }

    /// The first generic argument, if any
    pub fn inner(&self) -> Option<&TypeRef> {
        self.generic_args.first()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.generic_args.is_empty() {
            let args: Vec<String> = self.generic_args.iter().map(|a| a.to_string()).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

impl From<&syn::Type> for TypeRef {
    fn from(ty: &syn::Type) -> Self {
        match ty {
            syn::Type::Path(type_path) => from_path(&type_path.path),
            syn::Type::Reference(reference) => TypeRef::from(reference.elem.as_ref()),
            syn::Type::Paren(paren) => TypeRef::from(paren.elem.as_ref()),
            syn::Type::Group(group) => TypeRef::from(group.elem.as_ref()),
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => TypeRef::unit(),
            syn::Type::Slice(slice) => TypeRef::vec(TypeRef::from(slice.elem.as_ref())),
            syn::Type::Array(array) => TypeRef::vec(TypeRef::from(array.elem.as_ref())),
            syn::Type::ImplTrait(impl_trait) => from_bounds(&impl_trait.bounds, "impl"),
            syn::Type::TraitObject(trait_object) => from_bounds(&trait_object.bounds, "dyn"),
            _ => TypeRef::new("Unknown"),
        }
    }
}

fn from_path(path: &syn::Path) -> TypeRef {
    let Some(segment) = path.segments.last() else {
        return TypeRef::new("Unknown");
    };

    let mut type_ref = TypeRef::new(segment.ident.to_string());
    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        for arg in &args.args {
            match arg {
                syn::GenericArgument::Type(inner) => type_ref.generic_args.push(TypeRef::from(inner)),
                // Future<Output = T>
                syn::GenericArgument::AssocType(assoc) if assoc.ident == "Output" => {
                    type_ref.generic_args.push(TypeRef::from(&assoc.ty))
                }
                _ => {}
            }
        }
    }
    type_ref
}

/// `impl Future<Output = T>` becomes `Future<T>`, any other trait becomes e.g. `impl IntoResponse`.
fn from_bounds(
    bounds: &syn::punctuated::Punctuated<syn::TypeParamBound, syn::Token![+]>,
    keyword: &str,
) -> TypeRef {
    for bound in bounds {
        if let syn::TypeParamBound::Trait(trait_bound) = bound {
            let trait_ref = from_path(&trait_bound.path);
            if trait_ref.is_async_wrapper() {
                return trait_ref;
            }
            return TypeRef::new(format!("{} {}", keyword, trait_ref));
        }
    }
    TypeRef::new("Unknown")
}
