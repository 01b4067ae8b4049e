use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, GenericArgument, PathArguments, Type};

/// 从结构体字段生成字段注册表（FieldSchema）实现
///
/// 变更级别通过 #[field(immutable)] / #[field(server_managed)] / #[field(sensitive)]
/// 标注，未标注的字段默认 UserWritable
pub fn expand_field_schema_provider(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;
    let entity_name = name.to_string();

    let fields = match &ast.data {
        syn::Data::Struct(data) => &data.fields,
        _ => {
            let err = syn::Error::new_spanned(name, "FieldSchemaProvider only supports structs");
            return err.to_compile_error().into();
        }
    };

    let mut spec_exprs = vec![];

    for field in fields {
        let field_ident = match &field.ident {
            Some(ident) => ident,
            None => continue,
        };
        let field_name = field_ident.to_string();

        let mut class = quote! { MutationClass::UserWritable };
        for attr in &field.attrs {
            if !attr.path().is_ident("field") {
                continue;
            }
            let res = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("immutable") {
                    class = quote! { MutationClass::Immutable };
                } else if meta.path.is_ident("server_managed") {
                    class = quote! { MutationClass::ServerManaged };
                } else if meta.path.is_ident("sensitive") {
                    class = quote! { MutationClass::Sensitive };
                } else {
                    return Err(meta.error("Unsupported #[field(...)] attribute"));
                }
                Ok(())
            });
            if let Err(e) = res {
                return e.to_compile_error().into();
            }
        }

        let (kind, nullable) = map_field_kind(&field.ty);

        spec_exprs.push(quote! {
            FieldSpec::new(#field_name, #kind, #nullable, #class)
        });
    }

    let gen = quote! {
        impl FieldSchemaProvider for #name {
            fn field_schema() -> &'static FieldSchema {
                static SCHEMA: once_cell::sync::Lazy<FieldSchema> =
                    once_cell::sync::Lazy::new(|| {
                        FieldSchema::new(
                            #entity_name,
                            vec![
                                #(#spec_exprs),*
                            ],
                        )
                    });
                &SCHEMA
            }
        }
    };

    gen.into()
}

/// 将 Rust 字段类型映射为 FieldKind，Option<T> 记为可空
fn map_field_kind(ty: &Type) -> (TokenStream, bool) {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            let ident = segment.ident.to_string();
            match ident.as_str() {
                "Option" => {
                    if let PathArguments::AngleBracketed(args) = &segment.arguments {
                        if let Some(GenericArgument::Type(inner)) = args.args.first() {
                            let (kind, _) = map_field_kind(inner);
                            return (kind, true);
                        }
                    }
                    return (quote! { FieldKind::Object }, true);
                }
                "String" | "str" => return (quote! { FieldKind::Text }, false),
                "bool" => return (quote! { FieldKind::Boolean }, false),
                "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32"
                | "u64" | "u128" | "usize" => return (quote! { FieldKind::Integer }, false),
                "f32" | "f64" => return (quote! { FieldKind::Float }, false),
                _ => return (quote! { FieldKind::Object }, false),
            }
        }
    }
    (quote! { FieldKind::Object }, false)
}
