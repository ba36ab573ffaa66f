use function_openapi::{
    config::GeneratorConfig,
    loader::AssemblyLoader,
    openapi_builder::{OpenApiDocument, ParameterLocation},
    schema_generator::Schema,
    serializer::{serialize_json, serialize_yaml},
    service::OpenApiService,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

const LIB: &str = r#"
#![header_parameter("X-Api-Version", description = "Requested API version")]

pub mod orders;
"#;

const CONFIG: &str = r#"
route_prefix: shop
documents:
  - name: v1
    title: Shop API
    version: "1.0"
  - name: v2
    title: Shop API
    version: "2.0"
    description: Adds order listing
"#;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn shop_service() -> OpenApiService {
    let project = create_test_project(vec![
        ("src/lib.rs", LIB),
        ("src/orders.rs", include_str!("fixtures/orders_functions.rs")),
    ]);
    let assembly = AssemblyLoader::new(project.path())
        .with_name("shop")
        .load()
        .expect("Failed to load project");
    let config = GeneratorConfig::parse(CONFIG).expect("Invalid configuration");
    OpenApiService::new(config, Arc::new(assembly))
}

fn generate(document_name: &str) -> OpenApiDocument {
    shop_service()
        .document(document_name, Some("shop.example.com"), None)
        .expect("Failed to generate document")
}

#[test]
fn test_loaded_assembly_shape() {
    let service = shop_service();
    let assembly = service.assembly();

    assert_eq!(assembly.name(), "shop");
    assert_eq!(assembly.annotations().len(), 1);
    let names: Vec<&str> = assembly.types().iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["orders", "orders::OrderFunctions"]);

    // the unit struct holding the functions is not a model
    let definitions: Vec<&str> = assembly.definitions().iter().map(|d| d.name()).collect();
    assert_eq!(definitions, vec!["Order", "OrderStatus", "CreateOrder"]);
}

#[test]
fn test_v1_document_end_to_end() {
    let document = generate("v1");

    assert_eq!(document.info.title, "Shop API");
    assert_eq!(document.info.version, "1.0");
    assert_eq!(document.servers[0].url, "https://shop.example.com");

    // ListOrders belongs to v2, PurgeOrders is ignored, the queue worker is not HTTP
    let paths: Vec<&str> = document.paths.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["/shop/orders/{id}", "/shop/orders"]);

    let orders = &document.paths["/shop/orders"];
    assert!(orders.get.is_none());
    assert!(orders.delete.is_none());
    assert_eq!(orders.post.as_ref().unwrap().operation_id.as_deref(), Some("SaveOrder_post"));
    assert_eq!(orders.put.as_ref().unwrap().operation_id.as_deref(), Some("SaveOrder_put"));
}

#[test]
fn test_get_order_operation() {
    let document = generate("v1");
    let operation = document.paths["/shop/orders/{id}"].get.as_ref().unwrap();

    assert_eq!(operation.operation_id.as_deref(), Some("GetOrder"));
    assert_eq!(operation.tags, vec!["GetOrder"]);
    assert!(operation.request_body.is_none());

    let id = operation.parameter("id").unwrap();
    assert_eq!(id.location, ParameterLocation::Path);
    assert!(id.required);
    assert_eq!(id.schema, Schema::of_type("integer").with_format("int32"));

    let tenant = operation.parameter("tenant").unwrap();
    assert_eq!(tenant.location, ParameterLocation::Query);
    assert_eq!(tenant.description.as_deref(), Some("Tenant identifier"));

    let correlation = operation.parameter("X-Correlation-Id").unwrap();
    assert_eq!(correlation.location, ParameterLocation::Header);
    assert!(!correlation.required);

    let version = operation.parameter("X-Api-Version").unwrap();
    assert_eq!(version.location, ParameterLocation::Header);

    let response = &operation.responses["200"];
    assert_eq!(response.description, "OK");
    let content = response.content.as_ref().unwrap();
    assert_eq!(content["application/json"].schema, Schema::reference("Order"));
}

#[test]
fn test_save_order_operation() {
    let document = generate("v1");
    let operation = document.paths["/shop/orders"].post.as_ref().unwrap();

    // the method-level ignore removes the type-level declaration
    assert!(operation.parameter("tenant").is_none());
    assert!(operation.parameter("X-Api-Version").is_some());

    let body = operation.request_body.as_ref().unwrap();
    assert!(body.required);
    assert_eq!(body.content["application/json"].schema, Schema::reference("CreateOrder"));

    let responses: Vec<&str> = operation.responses.keys().map(String::as_str).collect();
    assert_eq!(responses, vec!["201"]);
    assert_eq!(operation.responses["201"].description, "Created");
}

#[test]
fn test_components() {
    let document = generate("v1");
    let schemas = &document.components.as_ref().unwrap().schemas;

    let order = &schemas["Order"];
    let properties = order.properties.as_ref().unwrap();
    let names: Vec<&str> = properties.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["id", "customerName", "note", "status"]);
    assert_eq!(properties["status"], Schema::reference("OrderStatus"));
    let required = order.required.as_ref().unwrap();
    assert!(!required.contains(&"note".to_string()));
    assert!(required.contains(&"customerName".to_string()));

    assert_eq!(
        schemas["OrderStatus"].enum_values,
        Some(vec!["Open".to_string(), "Shipped".to_string()])
    );
    assert!(schemas.contains_key("CreateOrder"));
}

#[test]
fn test_v2_document_includes_grouped_function() {
    let document = generate("v2");

    assert_eq!(document.info.description.as_deref(), Some("Adds order listing"));

    let orders = &document.paths["/shop/orders"];
    let list = orders.get.as_ref().unwrap();
    assert_eq!(list.operation_id.as_deref(), Some("ListOrders"));
    assert!(orders.post.is_some());

    let page = list.parameter("page").unwrap();
    assert!(!page.required);
    assert_eq!(page.schema, Schema::of_type("integer").with_format("int32"));

    let content = list.responses["200"].content.as_ref().unwrap();
    assert_eq!(
        content["application/json"].schema,
        Schema::array(Schema::reference("Order"))
    );
}

#[test]
fn test_serialized_output() {
    let document = generate("v1");

    let json: serde_json::Value = serde_json::from_str(&serialize_json(&document).unwrap()).unwrap();
    assert_eq!(json["openapi"], "3.0.1");
    assert_eq!(
        json["paths"]["/shop/orders/{id}"]["get"]["parameters"][0]["in"],
        "path"
    );
    assert_eq!(
        json["paths"]["/shop/orders/{id}"]["get"]["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/Order"
    );

    let yaml = serialize_yaml(&document).unwrap();
    assert!(yaml.contains("operationId: SaveOrder_put"));
    assert!(yaml.contains("title: Shop API"));
}

#[test]
fn test_unparseable_file_is_skipped() {
    let project = create_test_project(vec![
        ("src/orders.rs", include_str!("fixtures/orders_functions.rs")),
        ("src/broken.rs", "pub fn broken( {"),
    ]);
    let assembly = AssemblyLoader::new(project.path()).load().unwrap();
    let service = OpenApiService::new(GeneratorConfig::default(), Arc::new(assembly));

    let document = service.document("v1", None, None).unwrap();
    assert!(document.paths.contains_key("/api/orders/{id}"));
    assert!(document.servers.is_empty());
}

#[test]
fn test_malformed_function_aborts_generation() {
    let project = create_test_project(vec![(
        "src/functions.rs",
        r#"
        #[function_name("First")]
        #[function_name("Second")]
        pub fn twice(#[http_trigger("get")] req: HttpRequest) {}
        "#,
    )]);
    let assembly = AssemblyLoader::new(project.path()).load().unwrap();
    let service = OpenApiService::new(GeneratorConfig::default(), Arc::new(assembly));

    assert!(service.document("v1", None, None).is_err());
}

#[test]
fn test_same_file_name_in_two_directories() {
    let project = create_test_project(vec![
        ("src/lib.rs", "pub mod v1;\npub mod v2;"),
        ("src/v1/mod.rs", "pub mod orders;"),
        ("src/v2/mod.rs", "pub mod orders;"),
        (
            "src/v1/orders.rs",
            r#"
            #[function_name("GetOrderV1")]
            #[query_parameter("legacy")]
            pub fn get_order(#[http_trigger("get", route = "v1/orders")] req: HttpRequest) {}
            "#,
        ),
        (
            "src/v2/orders.rs",
            r#"
            #[function_name("GetOrderV2")]
            #[query_parameter("cursor")]
            pub fn get_order(#[http_trigger("get", route = "v2/orders")] req: HttpRequest) {}
            "#,
        ),
    ]);
    let assembly = AssemblyLoader::new(project.path()).load().unwrap();
    let names: Vec<&str> = assembly.types().iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["v1::orders", "v2::orders"]);

    let service = OpenApiService::new(GeneratorConfig::default(), Arc::new(assembly));
    let document = service.document("v1", None, None).unwrap();

    let query_names = |path: &str| -> Vec<String> {
        document.paths[path]
            .get
            .as_ref()
            .unwrap()
            .parameters
            .iter()
            .map(|p| p.name.clone())
            .collect()
    };
    assert_eq!(query_names("/api/v1/orders"), vec!["legacy"]);
    assert_eq!(query_names("/api/v2/orders"), vec!["cursor"]);
}

#[test]
fn test_function_declared_twice_aborts_loading() {
    let project = create_test_project(vec![(
        "src/orders.rs",
        r#"
        impl OrderFunctions {
            #[function_name("GetOrder")]
            pub fn get_order(&self, #[http_trigger("get")] req: HttpRequest) {}
        }

        impl OrderFunctions {
            #[function_name("GetOrderAgain")]
            pub fn get_order(&self, #[http_trigger("get")] req: HttpRequest) {}
        }
        "#,
    )]);

    let err = AssemblyLoader::new(project.path()).load().unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("orders.rs"));
    assert!(message.contains("orders::OrderFunctions::get_order"));
}
