//! Attribute macros for the Sequentis runtime.
//!
//! - `#[sequentis::main]` turns an `async fn main` into a synchronous entry
//!   point driven by a fresh runtime.
//! - `#[sequentis::test]` does the same for test functions and adds `#[test]`.
//!
//! Both accept `start_paused = true` to build the runtime with a paused clock.

mod utils;

use proc_macro::{TokenStream, TokenTree};
use utils::RuntimeArgs;

#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match RuntimeArgs::parse(attr) {
        Ok(args) => args,
        Err(msg) => return utils::compile_error(&msg),
    };

    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    if !utils::strip_async(&mut tokens) {
        return utils::compile_error("#[sequentis::main] requires an async fn");
    }

    let builder = args.builder();
    let replaced = utils::replace_body(&mut tokens, |block| {
        format!(
            "{{
                let runtime = {builder};
                runtime
                    .block_on(async move {{
                        {block}
                    }})
            }}"
        )
    });

    if !replaced {
        return utils::compile_error("#[sequentis::main] could not find the function body");
    }

    tokens.into_iter().collect()
}

#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match RuntimeArgs::parse(attr) {
        Ok(args) => args,
        Err(msg) => return utils::compile_error(&msg),
    };

    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    if !utils::strip_async(&mut tokens) {
        return utils::compile_error("#[sequentis::test] requires an async fn");
    }

    let builder = args.builder();
    let replaced = utils::replace_body(&mut tokens, |block| {
        format!(
            "{{
                let runtime = {builder};
                runtime
                    .block_on(async move {{ {block} }})
            }}"
        )
    });

    if !replaced {
        return utils::compile_error("#[sequentis::test] could not find the function body");
    }

    let test_attr: TokenStream = "#[test]".parse().unwrap_or_default();
    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(tokens);

    result.into_iter().collect()
}
