use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// 为实体结构体生成 DbEntity 基础字段访问器实现
///
/// 要求结构体包含 id / create_time / update_time / is_enable / revision 字段
pub fn expand_db_entity(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;

    let gen = quote! {
        impl DbEntity for #name {
            fn id(&self) -> &str {
                &self.id
            }
            fn set_id(&mut self, id: String) {
                self.id = id;
            }
            fn create_time(&self) -> i64 {
                self.create_time
            }
            fn set_create_time(&mut self, time: i64) {
                self.create_time = time;
            }
            fn update_time(&self) -> i64 {
                self.update_time
            }
            fn set_update_time(&mut self, time: i64) {
                self.update_time = time;
            }
            fn is_enable(&self) -> bool {
                self.is_enable
            }
            fn set_is_enable(&mut self, enable: bool) {
                self.is_enable = enable;
            }
            fn revision(&self) -> u64 {
                self.revision
            }
            fn set_revision(&mut self, revision: u64) {
                self.revision = revision;
            }
        }
    };

    gen.into()
}
