use super::types::{
    Declaration, DeclarationKind, Endpoint, Field, FieldKind, Output, PartBinding,
    ServiceEndpoints, TypeRef,
};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use whistler_wsdl::builtin::BuiltIn;

pub trait Codegen {
    fn codegen(&self, output: &Output) -> TokenStream;
}

fn get_ty_ident(primitive: BuiltIn) -> Ident {
    match primitive {
        BuiltIn::Boolean => format_ident!("bool"),
        BuiltIn::Byte => format_ident!("i8"),
        BuiltIn::Short => format_ident!("i16"),
        BuiltIn::Int => format_ident!("i32"),
        BuiltIn::Long | BuiltIn::Integer => format_ident!("i64"),
        BuiltIn::UnsignedByte => format_ident!("u8"),
        BuiltIn::UnsignedShort => format_ident!("u16"),
        BuiltIn::UnsignedInt => format_ident!("u32"),
        BuiltIn::UnsignedLong | BuiltIn::NonNegativeInteger => format_ident!("u64"),
        BuiltIn::Float => format_ident!("f32"),
        BuiltIn::Decimal | BuiltIn::Double => format_ident!("f64"),
        BuiltIn::String
        | BuiltIn::Date
        | BuiltIn::DateTime
        | BuiltIn::Time
        | BuiltIn::Duration
        | BuiltIn::Base64Binary
        | BuiltIn::HexBinary
        | BuiltIn::AnyType => format_ident!("String"),
    }
}

fn codegen_all(all: &[impl Codegen], output: &Output) -> Vec<TokenStream> {
    all.iter().map(|item| item.codegen(output)).collect()
}

/// Tokens naming `ty`; declared types are prefixed with `path`.
fn codegen_ty(ty: TypeRef, output: &Output, path: &TokenStream) -> TokenStream {
    match ty {
        TypeRef::Primitive(primitive) => {
            let ident = get_ty_ident(primitive);
            quote! { #ident }
        }

        TypeRef::Declared(id) => {
            let ident = format_ident!("{}", &output.declarations[id.index()].name);
            quote! { #path #ident }
        }
    }
}

fn codegen_docs(lines: &[String]) -> Vec<TokenStream> {
    lines
        .iter()
        .map(|line| {
            let line = format!(" {}", line);
            quote! { #[doc = #line] }
        })
        .collect()
}

impl Codegen for Output {
    fn codegen(&self, output: &Output) -> TokenStream {
        let declarations = codegen_all(&self.declarations, output);
        let bindings = codegen_all(&self.bindings, output);
        let services = codegen_all(&self.services, output);

        quote! {
            pub mod types {
                #(#declarations)*
            }

            pub mod messages {
                #(#bindings)*
            }

            pub mod services {
                #(#services)*
            }
        }
    }
}

impl Codegen for Declaration {
    fn codegen(&self, output: &Output) -> TokenStream {
        let name = format_ident!("{}", &self.name);
        let docs = codegen_docs(&self.documentation);

        match &self.kind {
            DeclarationKind::Struct(fields) => {
                let fields = codegen_all(fields, output);

                quote! {
                    #(#docs)*
                    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
                    pub struct #name {
                        #(#fields)*
                    }
                }
            }

            DeclarationKind::Empty => quote! {
                #(#docs)*
                #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
                pub struct #name {}
            },

            DeclarationKind::Alias(target) => {
                let target = codegen_ty(*target, output, &TokenStream::new());

                quote! {
                    #(#docs)*
                    pub type #name = #target;
                }
            }
        }
    }
}

impl Codegen for Field {
    fn codegen(&self, output: &Output) -> TokenStream {
        let name = format_ident!("{}", &self.name);

        let mut ty = codegen_ty(self.ty, output, &TokenStream::new());
        if self.boxed {
            ty = quote! { Box<#ty> };
        }
        if self.optional {
            ty = quote! { Option<#ty> };
        }

        let tag = match self.kind {
            FieldKind::Flatten => {
                return quote! {
                    #[serde(flatten)]
                    pub #name: #ty,
                }
            }
            FieldKind::Attribute => format!("@{}", self.tag),
            FieldKind::Text => "$value".to_owned(),
            FieldKind::Element => self.tag.clone(),
        };

        if self.optional {
            quote! {
                #[serde(rename = #tag, default, skip_serializing_if = "Option::is_none")]
                pub #name: #ty,
            }
        } else {
            quote! {
                #[serde(rename = #tag)]
                pub #name: #ty,
            }
        }
    }
}

impl Codegen for PartBinding {
    fn codegen(&self, output: &Output) -> TokenStream {
        let name = format_ident!("{}", &self.name);
        let ty = codegen_ty(self.ty, output, &quote! { super::types:: });
        let doc = format!(" Part `{}` of message `{}`.", self.part, self.message);

        quote! {
            #[doc = #doc]
            #[allow(non_camel_case_types)]
            pub type #name = #ty;
        }
    }
}

impl Codegen for ServiceEndpoints {
    fn codegen(&self, output: &Output) -> TokenStream {
        let name = format_ident!("{}", &self.module);
        let endpoints = codegen_all(&self.endpoints, output);

        quote! {
            pub mod #name {
                #(#endpoints)*
            }
        }
    }
}

impl Codegen for Endpoint {
    fn codegen(&self, _: &Output) -> TokenStream {
        let location = match &self.location {
            Some(location) => location,
            None => return quote! {},
        };

        let name = format_ident!("{}", &self.constant);
        let doc = format!(
            " `{}` port (binding `{}`): {}.",
            self.port,
            self.binding,
            self.operations.join(", ")
        );

        quote! {
            #[doc = #doc]
            pub const #name: &str = #location;
        }
    }
}
