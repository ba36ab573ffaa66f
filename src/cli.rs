use crate::config::GeneratorConfig;
use crate::loader::AssemblyLoader;
use crate::serializer::{serialize, write_to_file, OutputFormat};
use crate::service::OpenApiService;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// Generates OpenAPI documents for the HTTP-triggered functions of a Rust project
#[derive(Parser, Debug)]
#[command(name = "function-openapi")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the function project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Generator configuration file (YAML or JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Name of the document to generate
    #[arg(short = 'd', long = "document", default_value = "v1")]
    pub document: String,

    /// Route prefix the functions are hosted under; overrides the configuration
    #[arg(long = "route-prefix", value_name = "PREFIX")]
    pub route_prefix: Option<String>,

    /// Host of the server entry, e.g. `example.com`
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Base path of the server entry
    #[arg(long = "base-path", value_name = "PATH")]
    pub base_path: Option<String>,

    /// Also write the documentation UI page to this file
    #[arg(long = "ui", value_name = "FILE")]
    pub ui_path: Option<PathBuf>,

    /// URL the UI page loads the document from; defaults to the output file name
    #[arg(long = "document-url", value_name = "URL", requires = "ui_path")]
    pub document_url: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        bail!("Project path does not exist: {}", args.project_path.display());
    }
    if !args.project_path.is_dir() {
        bail!("Project path is not a directory: {}", args.project_path.display());
    }
    if let Some(config_path) = &args.config_path {
        if !config_path.is_file() {
            bail!("Configuration file does not exist: {}", config_path.display());
        }
    }
    if args.ui_path.is_some() && args.document_url.is_none() && args.output_path.is_none() {
        bail!("--ui needs --document-url or --output to know where the document is served from");
    }

    info!("Project path: {}", args.project_path.display());
    info!("Document: {} ({:?})", args.document, args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Loads the configuration named by the arguments, applying the route prefix override
pub fn load_config(args: &CliArgs) -> Result<GeneratorConfig> {
    let config = match &args.config_path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    Ok(match &args.route_prefix {
        Some(prefix) => config.with_route_prefix(prefix.as_str()),
        None => config,
    })
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let config = load_config(&args)?;
    debug!("Route prefix: {:?}", config.route_prefix);

    info!("Loading functions from {}", args.project_path.display());
    let assembly = AssemblyLoader::new(args.project_path.clone()).load()?;
    if assembly.methods().next().is_none() {
        warn!("No functions found in the project");
    }

    let service = OpenApiService::new(config, Arc::new(assembly));
    let document = service
        .document(&args.document, args.host.as_deref(), args.base_path.as_deref())
        .with_context(|| format!("Failed to generate document {}", args.document))?;
    let content = serialize(&document, args.output_format)?;

    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!("Wrote OpenAPI document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    if let Some(ui_path) = &args.ui_path {
        let document_url = match (&args.document_url, &args.output_path) {
            (Some(url), _) => url.clone(),
            (None, Some(output_path)) => output_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .context("Output path has no file name")?,
            (None, None) => bail!("No document URL for the UI page"),
        };
        write_to_file(&service.swagger_ui(&document_url)?, ui_path)?;
        info!("Wrote UI page to {} (document at {})", ui_path.display(), document_url);
    }

    info!(
        "Generated {} paths, {} schemas",
        document.paths.len(),
        document.components.as_ref().map_or(0, |c| c.schemas.len())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(project: &TempDir, extra: &[&str]) -> CliArgs {
        let mut argv = vec!["function-openapi", project.path().to_str().unwrap()];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let project = TempDir::new().unwrap();
        let args = args(&project, &[]);

        assert_eq!(args.output_format, OutputFormat::Yaml);
        assert_eq!(args.document, "v1");
        assert!(args.output_path.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_document_url_requires_ui() {
        let result = CliArgs::try_parse_from(["function-openapi", ".", "--document-url", "/openapi.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        let project = TempDir::new().unwrap();

        let missing = CliArgs::try_parse_from(["function-openapi", "/nonexistent/project"]).unwrap();
        assert!(parse_args_from_parsed(missing).is_err());

        let ui_without_url = args(&project, &["--ui", "index.html"]);
        assert!(parse_args_from_parsed(ui_without_url).is_err());

        let ui_with_output = args(&project, &["--ui", "index.html", "-o", "openapi.yaml"]);
        assert!(parse_args_from_parsed(ui_with_output).is_ok());
    }

    #[test]
    fn test_route_prefix_override() {
        let project = TempDir::new().unwrap();
        let config_path = project.path().join("openapi.yaml");
        fs::write(&config_path, "route_prefix: functions\n").unwrap();

        let from_file = args(&project, &["--config", config_path.to_str().unwrap()]);
        assert_eq!(load_config(&from_file).unwrap().route_prefix, "functions");

        let overridden = args(
            &project,
            &["--config", config_path.to_str().unwrap(), "--route-prefix", "v2"],
        );
        assert_eq!(load_config(&overridden).unwrap().route_prefix, "v2");
    }

    #[test]
    fn test_run_writes_document_and_ui() {
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join("ping.rs"),
            r#"
            #[function_name("Ping")]
            pub fn ping(#[http_trigger("get")] req: HttpRequest) -> String { String::new() }
            "#,
        )
        .unwrap();
        let out = TempDir::new().unwrap();
        let output = out.path().join("openapi.json");
        let ui = out.path().join("index.html");

        run(args(
            &project,
            &["-f", "json", "-o", output.to_str().unwrap(), "--ui", ui.to_str().unwrap()],
        ))
        .unwrap();

        let document: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(document["paths"]["/api/Ping"]["get"]["operationId"], "Ping");
        assert!(fs::read_to_string(&ui).unwrap().contains("\"openapi.json\""));
    }

    #[test]
    fn test_run_unknown_document_fails() {
        let project = TempDir::new().unwrap();
        let err = run(args(&project, &["--document", "v9"])).unwrap_err();
        assert!(err.to_string().contains("v9"));
    }
}
