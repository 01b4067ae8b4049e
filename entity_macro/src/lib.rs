extern crate proc_macro;

mod db_entity_macro;
mod field_schema_macro;

use proc_macro::TokenStream;

#[proc_macro_derive(DbEntity)]
pub fn db_entity(input: TokenStream) -> TokenStream {
    db_entity_macro::expand_db_entity(input)
}

#[proc_macro_derive(FieldSchemaProvider, attributes(field))]
pub fn field_schema_provider(input: TokenStream) -> TokenStream {
    field_schema_macro::expand_field_schema_provider(input)
}
