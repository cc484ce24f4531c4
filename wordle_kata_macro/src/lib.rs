#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, DeriveInput, Token,
};

struct ExportableArgs {
    init: (kw::new, Token![=], Ident),
    _separator: Token![,],
    name: (kw::name, Token![=], Ident),
}

impl Parse for ExportableArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let lookahead = input.lookahead1();
        if lookahead.peek(kw::new) {
            Ok(Self {
                init: (input.parse::<kw::new>()?, input.parse()?, input.parse()?),
                _separator: input.parse()?,
                name: (input.parse::<kw::name>()?, input.parse()?, input.parse()?),
            })
        } else if lookahead.peek(kw::name) {
            Ok(Self {
                name: (input.parse::<kw::name>()?, input.parse()?, input.parse()?),
                _separator: input.parse()?,
                init: (input.parse::<kw::new>()?, input.parse()?, input.parse()?),
            })
        } else {
            Err(lookahead.error())
        }
    }
}

/// An attribute for guessers written with `wordle_kata` that emits the
/// WebAssembly entry point loaded by that crate's `WasmGuesser` type.
///
/// # How to use
///
/// The attribute takes two arguments: a name for the guesser that is unique
/// within your crate and an associated function that creates it. Both are
/// passed as `[key] = [value]` (see example below).
///
/// - `name`: This must be a valid Rust identifier. Something like
///   `first_word` will work; `First Word` will not. The module exports
///   `guess_word_<name>`, and the host loads it by passing the same name.
/// - `new`: This must be a const associated function defined on the guesser
///   type that *takes no arguments*.
///
/// The entry point is only emitted when compiling for a wasm target, so the
/// same crate can still be tested natively.
///
/// # Examples
///
/// ```ignore
/// use serde_json::Value;
/// use wordle_kata::{exportable, Guess, Guesser, GuesserError};
///
/// #[exportable(name = first_word, new = new)]
/// #[derive(Debug)]
/// pub struct FirstWord;
///
/// impl FirstWord {
///     pub const fn new() -> Self {
///         FirstWord
///     }
/// }
///
/// impl Guesser for FirstWord {
///     // snip
/// }
/// ```
#[proc_macro_attribute]
pub fn exportable(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let options = parse_macro_input!(attr as ExportableArgs);
    let input = parse_macro_input!(item as DeriveInput);

    proc_macro::TokenStream::from(exportable_inner(options, input))
}

fn exportable_inner(options: ExportableArgs, input: DeriveInput) -> TokenStream {
    let name = &options.name.2;
    let mod_name = format_ident!("__{}_wasm_hooks", name);
    let exported_guess_name = format!("guess_word_{}", name);

    let struct_name = &input.ident;
    let struct_init = &options.init.2;

    quote! {
        #input

        #[cfg(target_family = "wasm")]
        mod #mod_name {
            #![allow(missing_docs)]

            use super::*;

            static THIS: #struct_name = <#struct_name>::#struct_init();

            #[export_name = #exported_guess_name]
            unsafe extern "C" fn __guess_trampoline(ptr: i32, len: i32) -> i32 {
                ::wordle_kata::wasm_rt::guess_trampoline(&THIS, ptr, len)
            }
        }
    }
}

mod kw {
    syn::custom_keyword!(new);
    syn::custom_keyword!(name);
}
