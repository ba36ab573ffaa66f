//! Builds a [`FunctionAssembly`] from annotated Rust source.
//!
//! Every `.rs` file under the project root is parsed with `syn` and walked:
//!
//! - free functions of a file belong to a declaring type named after the file's module path
//!   (`v1::orders` for `src/v1/orders.rs`)
//! - each `impl` block becomes a declaring type named after its self type within that module
//!   (`v1::orders::OrderFunctions`, or `<v1::orders::OrderFunctions as Trait>` for trait impls)
//! - each inline `mod` becomes a declaring type named after its nested path
//! - structs and enums with fields or variants become model definitions
//!
//! Items of the library root are not prefixed. Inner attributes (`#![...]`) of a crate root
//! (`lib.rs`, `main.rs`) are assembly-scoped annotations; inner attributes of any other file
//! or inline module apply to that module. Files that fail to parse are skipped with a warning;
//! a malformed annotation or a function registered twice under the same name aborts loading.

pub mod attributes;

use crate::assembly::{DeclaringType, FunctionAssembly, FunctionMethod, FunctionParameter};
use crate::parser::{AstParser, ParsedFile, CRATE_MODULE};
use crate::scanner::FileScanner;
use crate::type_resolver::TypeDefinition;
use crate::types::TypeRef;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use syn::{Attribute, FnArg, ImplItem, Item, ItemImpl, Pat, ReturnType, Signature};

/// Name used when the project root has no usable directory name
const DEFAULT_ASSEMBLY_NAME: &str = "functions";

/// Loads a function project from a directory.
///
/// # Example
///
/// ```no_run
/// use function_openapi::loader::AssemblyLoader;
///
/// let assembly = AssemblyLoader::new("./my-functions").load().unwrap();
/// println!("{} declaring types", assembly.types().len());
/// ```
pub struct AssemblyLoader {
    root: PathBuf,
    name: Option<String>,
    excluded_dirs: Option<Vec<String>>,
}

impl AssemblyLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            name: None,
            excluded_dirs: None,
        }
    }

    /// Overrides the assembly name, which defaults to the root directory name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the scanner's default excluded directories
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Scans, parses and walks the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a directory or an annotation is malformed.
    pub fn load(&self) -> Result<FunctionAssembly> {
        let mut scanner = FileScanner::new(self.root.clone());
        if let Some(dirs) = &self.excluded_dirs {
            scanner = scanner.with_excluded_dirs(dirs.iter().cloned());
        }
        let scan_result = scanner.scan()?;

        let mut assembly = FunctionAssembly::new(self.assembly_name());
        let mut skipped = 0;
        for result in AstParser::parse_files(&scan_result.rust_files) {
            match result {
                Ok(parsed) => load_file(&mut assembly, &parsed.relative_to(&self.root))?,
                // already logged by the parser
                Err(_) => skipped += 1,
            }
        }

        info!(
            "Loaded assembly {}: {} declaring types, {} definitions, {} files skipped",
            assembly.name(),
            assembly.types().len(),
            assembly.definitions().len(),
            skipped
        );
        Ok(assembly)
    }

    fn assembly_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.root
            .canonicalize()
            .ok()
            .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| DEFAULT_ASSEMBLY_NAME.to_string())
    }
}

/// Loads the project at `root` with default settings.
pub fn load(root: impl Into<PathBuf>) -> Result<FunctionAssembly> {
    AssemblyLoader::new(root).load()
}

/// Declaring types and definitions collected from one file, in source order
#[derive(Default)]
struct LoadedItems {
    types: Vec<DeclaringType>,
    definitions: Vec<TypeDefinition>,
}

/// Adds the functions, annotations and definitions of one parsed file to `assembly`.
pub fn load_file(assembly: &mut FunctionAssembly, parsed: &ParsedFile) -> Result<()> {
    let context = || format!("Invalid annotation in file: {}", parsed.path.display());
    debug!("Loading module {} from {}", parsed.module_name, parsed.path.display());

    let inner = attributes::parse_annotations(&parsed.syntax_tree.attrs).with_context(context)?;
    let mut module = DeclaringType::new(parsed.module_name.as_str());
    if parsed.is_crate_root() {
        for annotation in inner {
            assembly.annotate(annotation);
        }
    } else {
        for annotation in inner {
            module.annotate(annotation);
        }
    }

    let mut loaded = LoadedItems::default();
    load_module(module, &parsed.syntax_tree.items, &mut loaded).with_context(context)?;

    for declaring_type in loaded.types {
        assembly
            .add_type(declaring_type)
            .with_context(|| format!("Duplicate function in file: {}", parsed.path.display()))?;
    }
    for definition in loaded.definitions {
        assembly.add_definition(definition);
    }
    Ok(())
}

/// Walks `items`; the module itself is registered ahead of the types nested in it.
fn load_module(mut module: DeclaringType, items: &[Item], loaded: &mut LoadedItems) -> syn::Result<()> {
    let position = loaded.types.len();

    for item in items {
        match item {
            Item::Fn(item_fn) => module.add_method(load_method(&item_fn.attrs, &item_fn.sig)?),
            Item::Impl(item_impl) => {
                let mut declaring_type = DeclaringType::new(impl_type_name(module.name(), item_impl));
                for annotation in attributes::parse_annotations(&item_impl.attrs)? {
                    declaring_type.annotate(annotation);
                }
                for impl_item in &item_impl.items {
                    if let ImplItem::Fn(impl_fn) = impl_item {
                        declaring_type.add_method(load_method(&impl_fn.attrs, &impl_fn.sig)?);
                    }
                }
                if !declaring_type.methods().is_empty() {
                    loaded.types.push(declaring_type);
                }
            }
            Item::Mod(item_mod) => {
                // `mod name;` is loaded from its own file
                let Some((_, content)) = &item_mod.content else {
                    continue;
                };
                let mut nested = DeclaringType::new(qualify(module.name(), &item_mod.ident.to_string()));
                for annotation in attributes::parse_annotations(&item_mod.attrs)? {
                    nested.annotate(annotation);
                }
                load_module(nested, content, loaded)?;
            }
            // fieldless structs are markers such as function holders, not models
            Item::Struct(item_struct) if item_struct.fields.is_empty() => {}
            Item::Struct(item_struct) => loaded
                .definitions
                .push(TypeDefinition::from_item_struct(item_struct)),
            Item::Enum(item_enum) => loaded
                .definitions
                .push(TypeDefinition::from_item_enum(item_enum)),
            _ => {}
        }
    }

    if !module.methods().is_empty() {
        debug!("Module {} declares {} functions", module.name(), module.methods().len());
        loaded.types.insert(position, module);
    }
    Ok(())
}

/// `name` inside the library root, `module::name` elsewhere
fn qualify(module: &str, name: &str) -> String {
    if module == CRATE_MODULE {
        name.to_string()
    } else {
        format!("{}::{}", module, name)
    }
}

fn impl_type_name(module: &str, item_impl: &ItemImpl) -> String {
    let self_type = qualify(module, &TypeRef::from(item_impl.self_ty.as_ref()).name);
    match item_impl.trait_.as_ref().and_then(|(_, path, _)| path.segments.last()) {
        Some(trait_segment) => format!("<{} as {}>", self_type, trait_segment.ident),
        None => self_type,
    }
}

fn load_method(attrs: &[Attribute], sig: &Signature) -> syn::Result<FunctionMethod> {
    let mut method =
        FunctionMethod::new(sig.ident.to_string()).with_annotations(attributes::parse_annotations(attrs)?);

    for input in &sig.inputs {
        // the receiver is not a request parameter
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        let mut parameter = FunctionParameter::new(parameter_name(&pat_type.pat), TypeRef::from(pat_type.ty.as_ref()));
        for annotation in attributes::parse_annotations(&pat_type.attrs)? {
            parameter = parameter.with_annotation(annotation);
        }
        method = method.with_parameter(parameter);
    }

    let return_type = match &sig.output {
        ReturnType::Default => TypeRef::unit(),
        ReturnType::Type(_, ty) => TypeRef::from(ty.as_ref()),
    };
    let return_type = if sig.asyncness.is_some() {
        TypeRef::future(return_type)
    } else {
        return_type
    };
    Ok(method.returning(return_type))
}

/// `id` for `id: u32` and for extractor patterns such as `Path(id): Path<u32>`
fn parameter_name(pat: &Pat) -> String {
    binding_name(pat).unwrap_or_else(|| "_".to_string())
}

fn binding_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(pat_ident) => Some(pat_ident.ident.to_string()),
        Pat::TupleStruct(tuple_struct) => tuple_struct.elems.iter().find_map(binding_name),
        Pat::Tuple(tuple) => tuple.elems.iter().find_map(binding_name),
        Pat::Struct(pat_struct) => pat_struct.fields.iter().find_map(|field| binding_name(&field.pat)),
        Pat::Reference(reference) => binding_name(&reference.pat),
        Pat::Type(pat_type) => binding_name(&pat_type.pat),
        _ => None,
    }
}
