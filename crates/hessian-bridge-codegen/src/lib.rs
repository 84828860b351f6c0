// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Derive macros for `hessian-bridge` messages and composites.

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// One struct field with its wire name resolved.
struct FieldInfo {
    ident: syn::Ident,
    ty: syn::Type,
    wire_name: String,
}

/// `#[derive(Message)]`: encode and decode a struct as a flat field sequence
///
/// Each named field is written as one top-level value in declaration order.
/// Field types must implement `Encode` and `Bind`.
///
/// Example:
/// ```ignore
/// use hessian_bridge::Message;
///
/// #[derive(Message)]
/// struct EchoArgs {
///     req: EchoRequest,
///     #[hessian(rename = "traceId")]
///     trace: Option<String>,
/// }
/// ```
#[proc_macro_derive(Message, attributes(hessian))]
pub fn derive_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_message(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// `#[derive(Composite)]`: bind a struct to a Java class
///
/// Generates `Composite`, `Message`, `Encode`, `Bind` and `Shaped`. Wire field
/// names default to the lowerCamelCase form of the Rust field name, as Java
/// beans declare them; `#[hessian(rename = "...")]` overrides one field.
///
/// Example:
/// ```ignore
/// use hessian_bridge::Composite;
///
/// #[derive(Composite)]
/// #[hessian(java_class = "org.apache.dubbo.tests.api.EchoMultiBoolResponse")]
/// struct EchoMultiBoolResponse {
///     base_resp: bool,                 // "baseResp"
///     list_resp: Vec<bool>,            // "listResp"
///     map_resp: HashMap<bool, bool>,   // "mapResp"
/// }
/// ```
#[proc_macro_derive(Composite, attributes(hessian))]
pub fn derive_composite(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_composite(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_message(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let fields = named_fields(input)?;
    // Struct-level attributes are still validated for typos.
    parse_java_class(&input.attrs)?;
    Ok(message_impl(&input.ident, &fields))
}

fn expand_composite(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let fields = named_fields(input)?;
    let java_class = parse_java_class(&input.attrs)?.ok_or_else(|| {
        syn::Error::new_spanned(
            &input.ident,
            "#[derive(Composite)] requires #[hessian(java_class = \"...\")]",
        )
    })?;

    let name = &input.ident;
    let label = format!("composite {}", java_class);
    let message = message_impl(name, &fields);

    let descriptor_fields = fields.iter().map(|f| {
        let wire = &f.wire_name;
        let ty = &f.ty;
        quote! {
            ::hessian_bridge::FieldDescriptor::new(
                #wire,
                <#ty as ::hessian_bridge::Shaped>::shape(),
            )
        }
    });
    let bind_fields = fields.iter().map(|f| {
        let ident = &f.ident;
        let wire = &f.wire_name;
        let ty = &f.ty;
        quote! { #ident: fields.field::<#ty>(#wire)? }
    });

    Ok(quote! {
        impl ::hessian_bridge::Shaped for #name {
            fn shape() -> ::hessian_bridge::Shape {
                ::hessian_bridge::Shape::composite(#java_class)
            }

            fn java_type() -> ::core::option::Option<::std::borrow::Cow<'static, str>> {
                ::core::option::Option::Some(::std::borrow::Cow::Borrowed(#java_class))
            }

            fn type_label() -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(#label)
            }
        }

        impl ::hessian_bridge::Encode for #name {
            fn encode(
                &self,
                encoder: &mut ::hessian_bridge::Encoder<'_>,
            ) -> ::core::result::Result<(), ::hessian_bridge::EncodeError> {
                encoder.encode_composite(self)
            }
        }

        impl ::hessian_bridge::Bind for #name {
            fn bind(
                value: ::hessian_bridge::Value,
                binder: &::hessian_bridge::Binder<'_>,
            ) -> ::core::result::Result<Self, ::hessian_bridge::BindError> {
                binder.bind_composite::<Self>(value)
            }
        }

        impl ::hessian_bridge::Composite for #name {
            const JAVA_CLASS_NAME: &'static str = #java_class;

            fn descriptor() -> ::hessian_bridge::TypeDescriptor {
                ::hessian_bridge::TypeDescriptor::new(
                    #java_class,
                    ::std::vec![#(#descriptor_fields),*],
                )
            }

            #[allow(unused_variables)]
            fn bind_fields(
                fields: &mut ::hessian_bridge::FieldBinder<'_, '_>,
            ) -> ::core::result::Result<Self, ::hessian_bridge::BindError> {
                ::core::result::Result::Ok(Self { #(#bind_fields),* })
            }
        }

        #message
    })
}

fn message_impl(name: &syn::Ident, fields: &[FieldInfo]) -> proc_macro2::TokenStream {
    let encode_fields = fields.iter().map(|f| {
        let ident = &f.ident;
        let wire = &f.wire_name;
        quote! { fields.field(#wire, &self.#ident)?; }
    });
    let decode_fields = fields.iter().map(|f| {
        let ident = &f.ident;
        let wire = &f.wire_name;
        let ty = &f.ty;
        quote! { #ident: fields.field::<#ty>(#wire)? }
    });

    quote! {
        impl ::hessian_bridge::Message for #name {
            #[allow(unused_variables)]
            fn encode_fields(
                &self,
                fields: &mut ::hessian_bridge::FieldEncoder<'_, '_>,
            ) -> ::core::result::Result<(), ::hessian_bridge::EncodeError> {
                #(#encode_fields)*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn decode_fields(
                fields: &mut ::hessian_bridge::FieldDecoder<'_, '_, '_>,
            ) -> ::core::result::Result<Self, ::hessian_bridge::Error> {
                ::core::result::Result::Ok(Self { #(#decode_fields),* })
            }
        }
    }
}

/// Named fields of a non-generic struct, with wire names resolved.
fn named_fields(input: &DeriveInput) -> syn::Result<Vec<FieldInfo>> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Generic structs are not supported",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Only named fields are supported",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Only structs are supported",
            ))
        }
    };

    let mut infos = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let wire_name = match parse_rename(&field.attrs)? {
            Some(rename) => rename,
            None => lower_camel(&ident.to_string()),
        };
        if let Some(prev) = infos.iter().find(|f: &&FieldInfo| f.wire_name == wire_name) {
            return Err(syn::Error::new_spanned(
                ident,
                format!(
                    "wire name \"{}\" is already used by field `{}`",
                    wire_name, prev.ident
                ),
            ));
        }
        infos.push(FieldInfo {
            ident: ident.clone(),
            ty: field.ty.clone(),
            wire_name,
        });
    }
    Ok(infos)
}

fn parse_java_class(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut java_class = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("hessian")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("java_class") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(meta.error("java_class must not be empty"));
                }
                java_class = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported hessian attribute, expected `java_class`"))
            }
        })?;
    }
    Ok(java_class)
}

fn parse_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("hessian")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(meta.error("rename must not be empty"));
                }
                rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported hessian field attribute, expected `rename`"))
            }
        })?;
    }
    Ok(rename)
}

/// `base_resp` -> `baseResp`; raw identifiers lose their `r#` prefix.
fn lower_camel(ident: &str) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    let mut out = String::with_capacity(ident.len());
    for (i, part) in ident.split('_').filter(|p| !p.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(part);
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
