use proc_macro::TokenStream;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Result as SynResult, Type};

#[derive(Debug)]
pub struct AttributeData {
    pub contracts: Vec<Type>,
}

pub fn parse_attributes(attr: TokenStream) -> SynResult<AttributeData> {
    if attr.is_empty() {
        return Ok(AttributeData {
            contracts: Vec::new(),
        });
    }

    let contracts = Punctuated::<Type, Comma>::parse_terminated.parse(attr)?;
    Ok(AttributeData {
        contracts: contracts.into_iter().collect(),
    })
}
