//! Reads documentation annotations from Rust attributes.
//!
//! Recognized attributes, matched on the last path segment so `#[openapi::function_name]`
//! works too:
//!
//! ```text
//! #[function_name("GetOrder")]
//! #[http_trigger(methods = ["get", "post"], route = "orders/{id}")]   // or http_trigger("get")
//! #[body_type(ExampleRequest)]
//! #[produces_response_type(Vec<Order>, 200)]
//! #[openapi_ignore]
//! #[api_explorer_settings(group_name = "v2", ignore_api = false)]
//! #[query_parameter("page", ty = i32, description = "Page number", required = false)]
//! #[header_parameter("X-Correlation-Id")]
//! #[ignore_query_parameter("page")]
//! #[ignore_header_parameter("X-Correlation-Id")]
//! ```
//!
//! Any other attribute is skipped.

use crate::annotations::{Annotation, Annotations, ApiExplorerSettings, HttpTrigger, ParameterDeclaration};
use crate::types::TypeRef;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Ident, LitBool, LitInt, LitStr, Meta, Token};

/// A value inside an annotation's argument list.
enum AttrValue {
    Str(LitStr),
    Int(LitInt),
    Bool(LitBool),
    List(Vec<LitStr>),
    Type(syn::Type),
}

/// `value` or `name = value`
struct AttrArg {
    name: Option<Ident>,
    value: AttrValue,
}

impl Parse for AttrValue {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            Ok(AttrValue::Str(input.parse()?))
        } else if input.peek(LitInt) {
            Ok(AttrValue::Int(input.parse()?))
        } else if input.peek(LitBool) {
            Ok(AttrValue::Bool(input.parse()?))
        } else if input.peek(syn::token::Bracket) {
            let content;
            syn::bracketed!(content in input);
            let items = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
            Ok(AttrValue::List(items.into_iter().collect()))
        } else {
            Ok(AttrValue::Type(input.parse()?))
        }
    }
}

impl Parse for AttrArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = if input.peek(Ident) && input.peek2(Token![=]) {
            let name: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            Some(name)
        } else {
            None
        };
        Ok(Self {
            name,
            value: input.parse()?,
        })
    }
}

/// The arguments of one attribute, split into positional and named
struct AttrArgs {
    positional: Vec<AttrValue>,
    named: Vec<(Ident, AttrValue)>,
}

impl AttrArgs {
    fn from_attribute(attr: &Attribute) -> syn::Result<Self> {
        let args = match &attr.meta {
            Meta::Path(_) => Vec::new(),
            Meta::List(_) => attr
                .parse_args_with(Punctuated::<AttrArg, Token![,]>::parse_terminated)?
                .into_iter()
                .collect(),
            Meta::NameValue(name_value) => match &name_value.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(value),
                    ..
                }) => vec![AttrArg {
                    name: None,
                    value: AttrValue::Str(value.clone()),
                }],
                other => return Err(syn::Error::new_spanned(other, "expected a string literal")),
            },
        };

        let mut positional = Vec::new();
        let mut named = Vec::new();
        for arg in args {
            match arg.name {
                Some(name) => named.push((name, arg.value)),
                None => positional.push(arg.value),
            }
        }
        Ok(Self { positional, named })
    }

    fn named(&self, name: &str) -> Option<&AttrValue> {
        self.named
            .iter()
            .find(|(ident, _)| ident == name)
            .map(|(_, value)| value)
    }

    /// Rejects named arguments outside `allowed`
    fn check_names(&self, allowed: &[&str]) -> syn::Result<()> {
        match self
            .named
            .iter()
            .find(|(ident, _)| !allowed.iter().any(|name| ident == name))
        {
            Some((ident, _)) => Err(syn::Error::new_spanned(
                ident,
                format!("unknown argument `{}`", ident),
            )),
            None => Ok(()),
        }
    }

    fn string(&self, index: usize, attr: &Attribute, what: &str) -> syn::Result<String> {
        match self.positional.get(index) {
            Some(AttrValue::Str(value)) => Ok(value.value()),
            _ => Err(syn::Error::new_spanned(attr, format!("expected {} as a string literal", what))),
        }
    }
}

fn named_string(value: Option<&AttrValue>, attr: &Attribute) -> syn::Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(AttrValue::Str(value)) => Ok(Some(value.value())),
        Some(_) => Err(syn::Error::new_spanned(attr, "expected a string literal")),
    }
}

fn named_bool(value: Option<&AttrValue>, attr: &Attribute) -> syn::Result<Option<bool>> {
    match value {
        None => Ok(None),
        Some(AttrValue::Bool(value)) => Ok(Some(value.value)),
        Some(_) => Err(syn::Error::new_spanned(attr, "expected `true` or `false`")),
    }
}

/// Name of an attribute, without any path qualification
fn attribute_name(attr: &Attribute) -> Option<String> {
    attr.path().segments.last().map(|segment| segment.ident.to_string())
}

/// Reads every recognized annotation, in declaration order.
pub fn parse_annotations(attrs: &[Attribute]) -> syn::Result<Annotations> {
    let mut annotations = Annotations::new();
    for attr in attrs {
        if let Some(annotation) = parse_annotation(attr)? {
            annotations.push(annotation);
        }
    }
    Ok(annotations)
}

/// Reads one attribute; `Ok(None)` for attributes that are not annotations.
pub fn parse_annotation(attr: &Attribute) -> syn::Result<Option<Annotation>> {
    let Some(name) = attribute_name(attr) else {
        return Ok(None);
    };

    let annotation = match name.as_str() {
        "function_name" => {
            let args = AttrArgs::from_attribute(attr)?;
            args.check_names(&[])?;
            Annotation::FunctionName(args.string(0, attr, "the function name")?)
        }
        "http_trigger" => Annotation::HttpTrigger(parse_http_trigger(attr)?),
        "body_type" => {
            let args = AttrArgs::from_attribute(attr)?;
            args.check_names(&[])?;
            match args.positional.first() {
                Some(AttrValue::Type(ty)) => Annotation::BodyType(TypeRef::from(ty)),
                _ => return Err(syn::Error::new_spanned(attr, "expected a body type")),
            }
        }
        "produces_response_type" => parse_produces_response_type(attr)?,
        "openapi_ignore" => Annotation::OpenApiIgnore,
        "api_explorer_settings" => {
            let args = AttrArgs::from_attribute(attr)?;
            args.check_names(&["group_name", "ignore_api"])?;
            Annotation::ApiExplorerSettings(ApiExplorerSettings {
                group_name: named_string(args.named("group_name"), attr)?,
                ignore_api: named_bool(args.named("ignore_api"), attr)?.unwrap_or(false),
            })
        }
        "query_parameter" => Annotation::QueryParameter(parse_parameter_declaration(attr)?),
        "header_parameter" => Annotation::HeaderParameter(parse_parameter_declaration(attr)?),
        "ignore_query_parameter" => {
            let args = AttrArgs::from_attribute(attr)?;
            Annotation::IgnoreQueryParameter(args.string(0, attr, "the parameter name")?)
        }
        "ignore_header_parameter" => {
            let args = AttrArgs::from_attribute(attr)?;
            Annotation::IgnoreHeaderParameter(args.string(0, attr, "the parameter name")?)
        }
        _ => return Ok(None),
    };
    Ok(Some(annotation))
}

fn parse_http_trigger(attr: &Attribute) -> syn::Result<HttpTrigger> {
    let args = AttrArgs::from_attribute(attr)?;
    args.check_names(&["methods", "route", "auth_level"])?;

    let mut positional_methods = Vec::new();
    for value in &args.positional {
        match value {
            AttrValue::Str(method) => positional_methods.push(method.value()),
            _ => return Err(syn::Error::new_spanned(attr, "expected HTTP methods as string literals")),
        }
    }

    let methods = match args.named("methods") {
        Some(AttrValue::List(methods)) => {
            let mut all = positional_methods;
            all.extend(methods.iter().map(LitStr::value));
            Some(all)
        }
        Some(_) => return Err(syn::Error::new_spanned(attr, "expected `methods = [\"get\", ...]`")),
        None if positional_methods.is_empty() => None,
        None => Some(positional_methods),
    };

    Ok(HttpTrigger {
        methods,
        route: named_string(args.named("route"), attr)?,
    })
}

fn parse_produces_response_type(attr: &Attribute) -> syn::Result<Annotation> {
    let args = AttrArgs::from_attribute(attr)?;
    args.check_names(&["status"])?;

    let ty = match args.positional.first() {
        Some(AttrValue::Type(ty)) => TypeRef::from(ty),
        _ => return Err(syn::Error::new_spanned(attr, "expected a response type")),
    };
    let status = match (args.positional.get(1), args.named("status")) {
        (Some(AttrValue::Int(code)), None) | (None, Some(AttrValue::Int(code))) => code.base10_parse()?,
        (None, None) => 200,
        _ => return Err(syn::Error::new_spanned(attr, "expected one integer status code")),
    };

    Ok(Annotation::ProducesResponseType {
        ty,
        status_code: status,
    })
}

fn parse_parameter_declaration(attr: &Attribute) -> syn::Result<ParameterDeclaration> {
    let args = AttrArgs::from_attribute(attr)?;
    args.check_names(&["ty", "description", "required"])?;

    let to_syn = |e: crate::error::Error| syn::Error::new_spanned(attr, e.to_string());
    let mut declaration = ParameterDeclaration::new(args.string(0, attr, "the parameter name")?)
        .map_err(to_syn)?;

    match args.named("ty") {
        Some(AttrValue::Type(ty)) => declaration = declaration.with_type(TypeRef::from(ty)).map_err(to_syn)?,
        Some(_) => return Err(syn::Error::new_spanned(attr, "expected a type for `ty`")),
        None => {}
    }
    if let Some(description) = named_string(args.named("description"), attr)? {
        declaration = declaration.with_description(description);
    }
    if named_bool(args.named("required"), attr)? == Some(false) {
        declaration = declaration.optional();
    }
    Ok(declaration)
}
