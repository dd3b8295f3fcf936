extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;

#[proc_macro_derive(Enumeration, attributes(proto))]
pub fn enumeration_derive(input: TokenStream) -> TokenStream {
    let ast: syn::DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };

    match impl_enumeration(&ast) {
        Ok(gen) => gen.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn proto_name(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut name = None;
    for attr in attrs {
        if !attr.path().is_ident("proto") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }
    Ok(name)
}

/// Evaluates an explicit discriminant, which must be an integer literal,
/// optionally negated.
fn discriminant(expr: &syn::Expr) -> syn::Result<i64> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Int(lit),
            ..
        }) => lit.base10_parse::<i64>(),
        syn::Expr::Unary(syn::ExprUnary {
            op: syn::UnOp::Neg(_),
            expr,
            ..
        }) => Ok(-discriminant(expr)?),
        syn::Expr::Group(syn::ExprGroup { expr, .. })
        | syn::Expr::Paren(syn::ExprParen { expr, .. }) => discriminant(expr),
        other => Err(syn::Error::new(
            other.span(),
            "enumeration discriminants must be integer literals",
        )),
    }
}

struct VariantSpec<'a> {
    ident: &'a syn::Ident,
    name: String,
    value: i32,
}

fn impl_enumeration(ast: &syn::DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &ast.ident;

    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new(
            ast.generics.span(),
            "#[derive(Enumeration)] does not support generic types",
        ));
    }

    let variants = match &ast.data {
        syn::Data::Enum(syn::DataEnum { variants, .. }) => variants,
        _ => {
            return Err(syn::Error::new(
                ast.span(),
                "#[derive(Enumeration)] applies only to enums",
            ))
        }
    };

    let enum_name = proto_name(&ast.attrs)?.unwrap_or_else(|| ident.to_string());

    let mut specs: Vec<VariantSpec<'_>> = Vec::with_capacity(variants.len());
    let mut next: i64 = 0;
    for variant in variants {
        if !matches!(variant.fields, syn::Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "enumeration variants may not carry fields",
            ));
        }
        let value = match &variant.discriminant {
            Some((_, expr)) => discriminant(expr)?,
            None => next,
        };
        let value = i32::try_from(value).map_err(|_| {
            syn::Error::new(
                variant.span(),
                format!("discriminant {value} does not fit in an int32"),
            )
        })?;
        next = i64::from(value) + 1;
        specs.push(VariantSpec {
            ident: &variant.ident,
            name: proto_name(&variant.attrs)?.unwrap_or_else(|| variant.ident.to_string()),
            value,
        });
    }

    let default_variant = match specs.iter().find(|spec| spec.value == 0) {
        Some(spec) => spec.ident,
        None => {
            return Err(syn::Error::new(
                ast.span(),
                format!("enumeration `{enum_name}` must declare a variant with value 0"),
            ))
        }
    };

    let conv = quote! { ::protean::conv };
    let desc = quote! { ::protean::descriptor };
    let enumeration = quote! { ::protean::enumeration };
    let target = quote! { ::protean::conv::target::Target };
    let cursor = quote! { ::protean::parse::Cursor };
    let result = quote! { ::protean::parse::ParseResult };
    let context = quote! { ::protean::decode::DecodeContext };

    let idents: Vec<_> = specs.iter().map(|spec| spec.ident).collect();
    let names: Vec<_> = specs.iter().map(|spec| spec.name.as_str()).collect();
    let values: Vec<_> = specs.iter().map(|spec| spec.value).collect();

    let gen = quote! {
        impl #enumeration::Enumeration for #ident {
            const NAME: &'static str = #enum_name;

            const VARIANTS: &'static [Self] = &[ #( Self::#idents ),* ];

            fn value(self) -> i32 {
                match self {
                    #( Self::#idents => #values, )*
                }
            }

            fn name(self) -> &'static str {
                match self {
                    #( Self::#idents => #names, )*
                }
            }

            fn from_value(value: i32) -> Option<Self> {
                match value {
                    #( #values => Some(Self::#idents), )*
                    _ => None,
                }
            }

            fn descriptor() -> &'static #enumeration::EnumDescriptor {
                static DESCRIPTOR: #enumeration::EnumDescriptor = #enumeration::EnumDescriptor::new(
                    #enum_name,
                    &[
                        #( #enumeration::EnumValueDescriptor { name: #names, value: #values } ),*
                    ],
                );
                &DESCRIPTOR
            }
        }

        impl ::core::default::Default for #ident {
            fn default() -> Self {
                Self::#default_variant
            }
        }

        impl #conv::Value for #ident {
            const KIND: #desc::ValueKind =
                #desc::ValueKind::Enum(<Self as #enumeration::Enumeration>::descriptor);

            fn is_default(&self) -> bool {
                <Self as #enumeration::Enumeration>::value(*self) == 0
            }

            fn write_value<U: #target>(&self, buf: &mut U) -> usize {
                #enumeration::write_enum(*self, buf)
            }

            fn read_value<'a>(
                cur: #cursor<'a>,
                _: &mut #context<'_>,
            ) -> #result<(Self, #cursor<'a>)> {
                #enumeration::read_enum(cur)
            }
        }

        impl #conv::Field for #ident {
            const KIND: #desc::FieldKind =
                #desc::FieldKind::Singular(<Self as #conv::Value>::KIND);

            fn encode_field<U: #target>(&self, tag_id: u32, buf: &mut U) -> usize {
                ::protean::encode::write_singular(self, tag_id, buf)
            }

            fn merge_field<'a>(
                &mut self,
                cur: #cursor<'a>,
                ctx: &mut #context<'_>,
            ) -> #result<#cursor<'a>> {
                ::protean::decode::merge_singular(self, cur, ctx)
            }
        }
    };
    Ok(gen)
}
