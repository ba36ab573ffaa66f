//! Static resources compiled into the library.

use crate::error::{Error, Result};

/// Name of the documentation UI page
pub const SWAGGER_UI_PAGE: &str = "index.html";

/// Placeholder in the UI page replaced with the document URL
pub const DOCUMENT_URL_PLACEHOLDER: &str = "{{SwaggerJsonUrl}}";

const RESOURCES: &[(&str, &str)] = &[(SWAGGER_UI_PAGE, include_str!("../resources/index.html"))];

/// Looks up an embedded resource by name.
pub fn resource(name: &str) -> Result<&'static str> {
    RESOURCES
        .iter()
        .find(|(resource_name, _)| *resource_name == name)
        .map(|(_, content)| *content)
        .ok_or_else(|| Error::MissingResource(name.to_string()))
}
