extern crate proc_macro;

use proc_macro::TokenStream;

mod style_context;

#[proc_macro_derive(StyleContext, attributes(root, target, clock, animations, style_context))]
pub fn derive_style_context(input: TokenStream) -> TokenStream {
    style_context::style_context_impl(input)
}
