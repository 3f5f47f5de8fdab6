mod attrs;
mod impls;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::Result as SynResult;

/// Implements `tinyioc::descriptor::Component` for the self type of an
/// inherent `impl` block.
///
/// Every associated function annotated with `#[inject]` becomes a declared
/// constructor, in declaration order. Each of its arguments must be an
/// `Arc<K>`, which is resolved from the key `K`. The attribute optionally
/// lists the contracts the type satisfies besides its own, e.g.
/// `#[component(dyn Greeter, dyn Named)]`.
#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    match component_impl(attr, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn component_impl(attr: TokenStream, item: TokenStream) -> SynResult<TokenStream2> {
    let attr_data = attrs::parse_attributes(attr)?;
    let expanded = impls::expand_implementation(item, attr_data)?;
    Ok(expanded)
}
