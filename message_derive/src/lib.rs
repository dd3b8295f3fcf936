extern crate proc_macro;

use std::collections::BTreeMap;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;

const RESERVED: std::ops::RangeInclusive<u32> = 19_000..=19_999;
const MAX_VARINT_TAG_ID: u32 = (1 << 29) - 1;

#[proc_macro_derive(Message, attributes(proto))]
pub fn message_derive(input: TokenStream) -> TokenStream {
    let ast: syn::DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };

    match impl_message(&ast) {
        Ok(gen) => gen.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct ProtoAttr {
    tag: Option<(u32, proc_macro2::Span)>,
    name: Option<String>,
}

fn proto_attr(attrs: &[syn::Attribute]) -> syn::Result<ProtoAttr> {
    let mut ret = ProtoAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("proto") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                let lit: syn::LitInt = meta.value()?.parse()?;
                ret.tag = Some((lit.base10_parse::<u32>()?, lit.span()));
                Ok(())
            } else if meta.path.is_ident("name") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                ret.name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `tag = <integer>` or `name = \"...\"`"))
            }
        })?;
    }
    Ok(ret)
}

struct FieldSpec<'a> {
    access: TokenStream2,
    ty: &'a syn::Type,
    name: String,
    tag: u32,
}

fn field_specs(fields: &syn::Fields) -> syn::Result<Vec<FieldSpec<'_>>> {
    let mut specs = Vec::with_capacity(fields.len());
    let mut seen: BTreeMap<u32, String> = BTreeMap::new();

    for (ix, field) in fields.iter().enumerate() {
        let attr = proto_attr(&field.attrs)?;
        let (access, default_name) = match &field.ident {
            Some(ident) => (quote! { #ident }, ident.to_string()),
            None => {
                let index = syn::Index::from(ix);
                (quote! { #index }, format!("field_{ix}"))
            }
        };
        let name = attr.name.unwrap_or(default_name);
        let (tag, span) = attr.tag.ok_or_else(|| {
            syn::Error::new(
                field.span(),
                format!("field `{name}` is missing `#[proto(tag = ...)]`"),
            )
        })?;

        if tag == 0 || tag > MAX_VARINT_TAG_ID {
            return Err(syn::Error::new(
                span,
                format!("field number {tag} of `{name}` is outside of 1..={MAX_VARINT_TAG_ID}"),
            ));
        }
        if RESERVED.contains(&tag) {
            return Err(syn::Error::new(
                span,
                format!("field number {tag} of `{name}` is reserved"),
            ));
        }
        if let Some(prior) = seen.insert(tag, name.clone()) {
            return Err(syn::Error::new(
                span,
                format!("field number {tag} of `{name}` is already used by `{prior}`"),
            ));
        }

        specs.push(FieldSpec {
            access,
            ty: &field.ty,
            name,
            tag,
        });
    }
    Ok(specs)
}

fn impl_message(ast: &syn::DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &ast.ident;

    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new(
            ast.generics.span(),
            "#[derive(Message)] does not support generic types",
        ));
    }

    let fields = match &ast.data {
        syn::Data::Struct(syn::DataStruct { fields, .. }) => fields,
        syn::Data::Enum(_) => {
            return Err(syn::Error::new(
                ast.span(),
                "#[derive(Message)] applies to structs; use #[derive(Enumeration)] for enums",
            ))
        }
        syn::Data::Union(_) => {
            return Err(syn::Error::new(
                ast.span(),
                "#[derive(Message)] does not support unions",
            ))
        }
    };

    let msg_name = proto_attr(&ast.attrs)?
        .name
        .unwrap_or_else(|| ident.to_string());
    let specs = field_specs(fields)?;
    let n_fields = specs.len();

    let conv = quote! { ::protean::conv };
    let desc = quote! { ::protean::descriptor };
    let target = quote! { ::protean::conv::target::Target };
    let cursor = quote! { ::protean::parse::Cursor };
    let result = quote! { ::protean::parse::ParseResult };
    let context = quote! { ::protean::decode::DecodeContext };

    let field_descs = specs.iter().map(|spec| {
        let FieldSpec { ty, name, tag, .. } = spec;
        quote! {
            #desc::FieldDescriptor::new(#name, #tag, <#ty as #conv::Field>::KIND)
        }
    });

    let tag_checks = specs.iter().map(|spec| {
        let tag = spec.tag;
        quote! { const _: u32 = ::protean::wire::check_tag_id(#tag); }
    });

    let write_arms = specs.iter().enumerate().map(|(slot, spec)| {
        let FieldSpec { access, ty, tag, .. } = spec;
        quote! {
            #slot => <#ty as #conv::Field>::encode_field(&self.#access, #tag, buf),
        }
    });

    let merge_arms = specs.iter().enumerate().map(|(slot, spec)| {
        let FieldSpec { access, ty, .. } = spec;
        quote! {
            #slot => <#ty as #conv::Field>::merge_field(&mut self.#access, cur, ctx),
        }
    });

    let gen = quote! {
        const _: () = {
            #( #tag_checks )*

            static FIELDS: [#desc::FieldDescriptor; #n_fields] = [
                #( #field_descs ),*
            ];

            ::protean::lazy_static! {
                static ref DESCRIPTOR: #desc::MessageDescriptor =
                    #desc::MessageDescriptor::new(#msg_name, &FIELDS);
            }

            impl #conv::Message for #ident {
                fn descriptor() -> &'static #desc::MessageDescriptor {
                    &*DESCRIPTOR
                }

                #[allow(unused_variables)]
                fn write_slot<U: #target>(&self, slot: usize, buf: &mut U) -> usize {
                    match slot {
                        #( #write_arms )*
                        _ => 0,
                    }
                }

                #[allow(unused_variables)]
                fn merge_slot<'a>(
                    &mut self,
                    slot: usize,
                    cur: #cursor<'a>,
                    ctx: &mut #context<'_>,
                ) -> #result<#cursor<'a>> {
                    match slot {
                        #( #merge_arms )*
                        _ => Err(::protean::parse::error::InternalError::UnknownSlot {
                            message: #msg_name,
                            slot,
                        }
                        .into()),
                    }
                }
            }

            impl #conv::Value for #ident {
                const KIND: #desc::ValueKind =
                    #desc::ValueKind::Message(<Self as #conv::Message>::descriptor);

                fn is_default(&self) -> bool {
                    <Self as #conv::Message>::encoded_len(self) == 0
                }

                fn write_value<U: #target>(&self, buf: &mut U) -> usize {
                    ::protean::encode::write_nested_value(self, buf)
                }

                fn read_value<'a>(
                    cur: #cursor<'a>,
                    ctx: &mut #context<'_>,
                ) -> #result<(Self, #cursor<'a>)> {
                    ::protean::decode::read_nested(cur, ctx)
                }

                fn merge_value<'a>(
                    &mut self,
                    cur: #cursor<'a>,
                    ctx: &mut #context<'_>,
                ) -> #result<#cursor<'a>> {
                    ::protean::decode::merge_nested(self, cur, ctx)
                }

                fn write_unit<U: #target>(&self, tag_id: u32, buf: &mut U) -> usize {
                    ::protean::encode::write_nested(self, tag_id, buf)
                }
            }

            impl #conv::Field for #ident {
                const KIND: #desc::FieldKind =
                    #desc::FieldKind::Singular(<Self as #conv::Value>::KIND);

                fn encode_field<U: #target>(&self, tag_id: u32, buf: &mut U) -> usize {
                    ::protean::encode::write_nested(self, tag_id, buf)
                }

                fn merge_field<'a>(
                    &mut self,
                    cur: #cursor<'a>,
                    ctx: &mut #context<'_>,
                ) -> #result<#cursor<'a>> {
                    ::protean::decode::merge_nested(self, cur, ctx)
                }
            }
        };
    };
    Ok(gen)
}
