use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Module name given to the library root (`lib.rs`)
pub const CRATE_MODULE: &str = "crate";

/// Module name given to the binary root (`main.rs`)
pub const BINARY_MODULE: &str = "main";

/// Directory that module paths are relative to
const SOURCE_DIR: &str = "src";

/// AST parser for function source files.
///
/// The `AstParser` uses the `syn` crate to parse Rust source code into a syntax tree that the
/// [`loader`](crate::loader) walks for functions, annotations and type definitions.
///
/// # Example
///
/// ```no_run
/// use function_openapi::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/orders.rs")).unwrap();
/// println!("{}: {} items", parsed.module_name, parsed.syntax_tree.items.len());
/// ```
pub struct AstParser;

/// A successfully parsed Rust file with its abstract syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Path of the module the file defines, such as `v1::orders`
    pub module_name: String,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

impl ParsedFile {
    /// Recomputes the module path from the file's location below `root`.
    ///
    /// Files outside `root` keep the module path derived from their full path.
    pub fn relative_to(mut self, root: &Path) -> Self {
        if let Ok(relative) = self.path.strip_prefix(root) {
            self.module_name = module_name(relative);
        }
        self
    }

    /// Whether the file is a crate root (`lib.rs` or `main.rs`)
    pub fn is_crate_root(&self) -> bool {
        self.module_name == CRATE_MODULE || self.module_name == BINARY_MODULE
    }
}

impl AstParser {
    /// Reads and parses a single Rust source file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid Rust syntax.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Self::parse_source(path, &content)
    }

    /// Parses source text as if it were read from `path`.
    pub fn parse_source(path: &Path, content: &str) -> Result<ParsedFile> {
        let syntax_tree = syn::parse_file(content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        Ok(ParsedFile {
            path: path.to_path_buf(),
            module_name: module_name(path),
            syntax_tree,
        })
    }

    /// Parses multiple Rust source files, continuing even if some fail.
    ///
    /// Files that fail to parse are logged as warnings and returned as `Err` in their slot.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(path).inspect_err(|e| {
                    warn!("Failed to parse {}: {:#}", path.display(), e);
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

/// The module path of a source file.
///
/// `src/orders.rs` is `orders`, `src/v1/orders.rs` is `v1::orders` and `src/v1/mod.rs` is `v1`.
/// Directories up to the last `src` are dropped. Without a `src` directory, every directory of
/// a relative path counts while an absolute path contributes only its file. The top-level
/// `lib.rs` is [`CRATE_MODULE`] and the top-level `main.rs` is [`BINARY_MODULE`].
pub fn module_name(path: &Path) -> String {
    let mut segments: Vec<String> = path
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|component| match component {
                    Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();
    match segments.iter().rposition(|segment| segment == SOURCE_DIR) {
        Some(index) => {
            segments.drain(..=index);
        }
        None if path.is_absolute() => segments.clear(),
        None => {}
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.as_str() {
        "mod" | "" => {}
        "lib" if segments.is_empty() => {}
        _ => segments.push(stem),
    }

    if segments.is_empty() {
        CRATE_MODULE.to_string()
    } else {
        segments.join("::")
    }
}
