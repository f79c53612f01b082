use proc_macro::TokenStream;
use quote::quote;
use std::collections::{HashMap, HashSet};
use syn::{Attribute, Data, DeriveInput, Fields, Meta, Token, parse_macro_input};

/// Helper enum for parsed attribute values
enum MetaValue {
    Str(syn::LitStr),
    Flag,
}

/// Check if the struct has #[allow(missing_docs)] attribute
fn check_allow_missing_docs(attrs: &[Attribute]) -> bool {
    attrs.iter().any(is_allow_missing_docs)
}

fn is_allow_missing_docs(attr: &Attribute) -> bool {
    attr.path().is_ident("allow")
        && attr
            .parse_args::<syn::Ident>()
            .map(|ident| ident == "missing_docs")
            .unwrap_or(false)
}

/// Defines a configuration record loadable from environment variables
///
/// Every field declares the path token it is reached through:
///
/// * `#[field(env = "TAG", doc = "...")]` - decoded from `PREFIX_..._TAG...`
/// * `#[field(env = "TAG", opaque)]` - addressing it is an unsupported kind error
/// * `#[field(skip)]` - never touched by the loader
///
/// `doc` may be left out when the struct carries `#[allow(missing_docs)]`.
#[proc_macro]
pub fn define_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_config(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_config(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let vis = &input.vis;
    let struct_attrs = &input.attrs;

    if !input.generics.params.is_empty() || input.generics.where_clause.is_some() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "define_config! does not support generic structs",
        ));
    }

    // Check for struct-level attributes
    let allow_missing_docs = check_allow_missing_docs(struct_attrs);

    // Extract fields from the struct
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "define_config! only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "define_config! only supports structs",
            ));
        }
    };

    let mut field_defs = Vec::new();
    let mut slot_arms = Vec::new();
    let mut schema_pushes = Vec::new();
    let mut seen_tags = HashSet::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let field_vis = &field.vis;
        let field_type = &field.ty;
        let field_attrs = &field.attrs;

        // Parse field configuration from attributes
        let config = parse_field_config(field, allow_missing_docs)?;

        // Extract cfg attributes for feature gating
        let cfg_attrs: Vec<&Attribute> = field_attrs
            .iter()
            .filter(|attr| attr.path().is_ident("cfg"))
            .collect();

        // Everything except our own attribute stays on the field
        let kept_attrs: Vec<&Attribute> = field_attrs
            .iter()
            .filter(|attr| !attr.path().is_ident("field"))
            .collect();

        field_defs.push(quote! {
            #(#kept_attrs)*
            #field_vis #field_name: #field_type
        });

        let (tag, mode) = match config {
            FieldConfig::Skip => continue,
            FieldConfig::Tagged { tag, mode } => (tag, mode),
        };

        if !seen_tags.insert(tag.value()) {
            return Err(syn::Error::new_spanned(
                &tag,
                format!("duplicate env tag \"{}\"", tag.value()),
            ));
        }

        let description = &config_description(&mode);
        match mode {
            FieldMode::Decode(_) => {
                slot_arms.push(quote! {
                    #(#cfg_attrs)*
                    #tag => ::core::option::Option::Some(
                        ::envtree::FieldSlot::Decode(&mut self.#field_name),
                    ),
                });
                schema_pushes.push(quote! {
                    #(#cfg_attrs)*
                    fields.push(::envtree::FieldSchema::new(
                        #tag,
                        #description,
                        <#field_type as ::envtree::EnvDecode>::schema(),
                    ));
                });
            }
            FieldMode::Opaque(_) => {
                slot_arms.push(quote! {
                    #(#cfg_attrs)*
                    #tag => ::core::option::Option::Some(
                        ::envtree::FieldSlot::Opaque(::core::any::type_name::<#field_type>()),
                    ),
                });
                schema_pushes.push(quote! {
                    #(#cfg_attrs)*
                    fields.push(::envtree::FieldSchema::new(
                        #tag,
                        #description,
                        ::envtree::Schema::Opaque(::core::any::type_name::<#field_type>()),
                    ));
                });
            }
        }
    }

    // Filter out our custom attributes (allow(missing_docs)) from struct definition
    let filtered_attrs: Vec<&Attribute> = struct_attrs
        .iter()
        .filter(|attr| !is_allow_missing_docs(attr))
        .collect();

    // Generate the struct definition
    let struct_def = quote! {
        #(#filtered_attrs)*
        #vis struct #struct_name {
            #(#field_defs),*
        }
    };

    // Generate the tag table and decoder entry point
    let record_impl = quote! {
        impl ::envtree::Record for #struct_name {
            fn field(&mut self, tag: &str) -> ::core::option::Option<::envtree::FieldSlot<'_>> {
                match tag {
                    #(#slot_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn fields() -> ::std::vec::Vec<::envtree::FieldSchema> {
                #[allow(unused_mut)]
                let mut fields = ::std::vec::Vec::new();
                #(#schema_pushes)*
                fields
            }
        }

        impl ::envtree::EnvDecode for #struct_name {
            fn schema() -> ::envtree::Schema {
                ::envtree::Schema::record::<Self>()
            }

            fn kind() -> ::envtree::Kind {
                ::envtree::Kind::Record
            }

            fn decode(
                &mut self,
                cursor: ::envtree::Cursor<'_>,
            ) -> ::core::result::Result<bool, ::envtree::LoadError> {
                ::envtree::decode_record(self, cursor)
            }
        }
    };

    Ok(quote! {
        #struct_def
        #record_impl
    })
}

enum FieldConfig {
    Skip,
    Tagged { tag: syn::LitStr, mode: FieldMode },
}

enum FieldMode {
    Decode(String),
    Opaque(String),
}

fn config_description(mode: &FieldMode) -> String {
    match mode {
        FieldMode::Decode(description) | FieldMode::Opaque(description) => description.clone(),
    }
}

/// Parse #[field(env = "X", doc = "Y", opaque)] syntax
fn parse_field_list(meta_list: &syn::MetaList) -> syn::Result<HashMap<String, MetaValue>> {
    let mut values = HashMap::new();

    meta_list.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("expected identifier"))?
            .to_string();

        if meta.input.peek(Token![=]) {
            if key != "env" && key != "doc" {
                return Err(meta.error(format!("unknown field option `{}`", key)));
            }
            meta.input.parse::<Token![=]>()?;
            let value: syn::LitStr = meta.input.parse()?;
            values.insert(key, MetaValue::Str(value));
        } else {
            if key != "opaque" && key != "skip" {
                return Err(meta.error(format!("unknown field flag `{}`", key)));
            }
            values.insert(key, MetaValue::Flag);
        }

        Ok(())
    })?;

    Ok(values)
}

fn parse_field_config(field: &syn::Field, allow_missing_docs: bool) -> syn::Result<FieldConfig> {
    // Find the #[field(...)] attribute
    let field_attr = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("field"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                field,
                "field must have #[field(...)] attribute with env and doc, or #[field(skip)]",
            )
        })?;

    // Parse it as a Meta::List
    let parsed = match &field_attr.meta {
        Meta::List(list) => parse_field_list(list)?,
        _ => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "field attribute must be a list: #[field(env = \"...\", ...)]",
            ));
        }
    };

    if parsed.contains_key("skip") {
        if parsed.len() > 1 {
            return Err(syn::Error::new_spanned(
                field_attr,
                "skip cannot be combined with other field options",
            ));
        }
        return Ok(FieldConfig::Skip);
    }

    // Extract env (required)
    let tag = match parsed.get("env") {
        Some(MetaValue::Str(s)) => s.clone(),
        _ => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "field must have env = \"TAG\"",
            ));
        }
    };
    validate_tag(&tag)?;

    // Extract doc (conditionally required)
    let description = match parsed.get("doc") {
        Some(MetaValue::Str(s)) => s.value().trim().to_string(),
        None if allow_missing_docs => String::new(),
        _ => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "field must have doc = \"description\" (or use #[allow(missing_docs)] on struct)",
            ));
        }
    };

    let mode = if parsed.contains_key("opaque") {
        FieldMode::Opaque(description)
    } else {
        FieldMode::Decode(description)
    };

    Ok(FieldConfig::Tagged { tag, mode })
}

/// Variable names are upper-cased and split on '_' before matching, so
/// any other tag could never be reached.
fn validate_tag(tag: &syn::LitStr) -> syn::Result<()> {
    let value = tag.value();
    if value.is_empty() {
        return Err(syn::Error::new_spanned(tag, "env tag must not be empty"));
    }
    if value.contains('_') {
        return Err(syn::Error::new_spanned(
            tag,
            "env tag must not contain '_', it separates path tokens",
        ));
    }
    if value != value.to_uppercase() {
        return Err(syn::Error::new_spanned(
            tag,
            format!(
                "env tag must be upper-case, variable names are upper-cased before matching (try \"{}\")",
                value.to_uppercase()
            ),
        ));
    }
    Ok(())
}
