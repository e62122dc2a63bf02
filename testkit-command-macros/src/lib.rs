//! Procedural macros for testkit-command
//!
//! This crate provides the `#[testkit_command::test]` attribute macro, which
//! runs a test inside one command-interception lifecycle.
//!
//! # Example
//!
//! ```rust,ignore
//! use testkit_command::prelude::*;
//!
//! #[testkit_command::test]
//! fn formats_sources() {
//!     expect_command(Criteria::new("deno").args(["fmt"]), OutputSpec::new());
//!     Command::new("deno").arg("fmt").output().unwrap();
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, Ident, ItemFn, Lit, Token,
};

/// Configuration options for the test macro.
#[derive(Default)]
struct TestConfig {
    /// Install global interception for the whole test (default: false)
    global: bool,
    /// Flavor for the tokio runtime of async tests
    flavor: Option<String>,
}

impl Parse for TestConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut config = TestConfig::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "global" => {
                    let lit: Lit = input.parse()?;
                    match lit {
                        Lit::Bool(b) => config.global = b.value(),
                        other => return Err(syn::Error::new_spanned(other, "expected a bool")),
                    }
                }
                "flavor" => {
                    let lit: Lit = input.parse()?;
                    match lit {
                        Lit::Str(s) => config.flavor = Some(s.value()),
                        other => return Err(syn::Error::new_spanned(other, "expected a string")),
                    }
                }
                _ => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {ident}"),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(config)
    }
}

/// Test attribute macro that scopes command interception to one test.
///
/// The generated test:
///
/// 1. waits for any other `#[testkit_command::test]` in the process to finish,
/// 2. installs global interception if `global = true`,
/// 3. runs the body,
/// 4. resets interception, panicking if expectations were left unconsumed,
///    and resets global mode if `global = true`.
///
/// A panic in the body is re-raised after the reset.
///
/// # Basic Usage
///
/// ```rust,ignore
/// use testkit_command::prelude::*;
///
/// #[testkit_command::test]
/// fn test_basic() {
///     expect_command("deno", OutputSpec::new());
///     assert!(Command::new("deno").output().unwrap().success);
/// }
/// ```
///
/// # Async Tests
///
/// Async functions run under `#[tokio::test]`:
///
/// ```rust,ignore
/// #[testkit_command::test(flavor = "multi_thread")]
/// async fn test_async() {
///     expect_command("deno", OutputSpec::new().stdout("hi"));
///     let output = Command::new("deno").output_async().await.unwrap();
///     assert_eq!(output.stdout, b"hi");
/// }
/// ```
///
/// # Configuration Options
///
/// - `global = true` - Keep interception installed for the whole test, so
///   unregistered commands fail instead of running
/// - `flavor = "multi_thread"` - Tokio runtime flavor for async tests
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let config = parse_macro_input!(attr as TestConfig);
    let input = parse_macro_input!(item as ItemFn);

    expand_test(&config, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_test(config: &TestConfig, input: &ItemFn) -> syn::Result<TokenStream2> {
    let name = &input.sig.ident;
    let body = &input.block;
    let attrs = &input.attrs;
    let vis = &input.vis;
    let output = &input.sig.output;
    let global = config.global;

    if !input.sig.inputs.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.sig.inputs,
            "test function must not take parameters",
        ));
    }

    if input.sig.asyncness.is_some() {
        let flavor_attr = match config.flavor.as_deref() {
            None | Some("current_thread") => quote! { #[::tokio::test] },
            Some("multi_thread") => quote! { #[::tokio::test(flavor = "multi_thread")] },
            Some(other) => {
                return Err(syn::Error::new(
                    proc_macro2::Span::call_site(),
                    format!(
                        "unsupported flavor: {other}. Use \"current_thread\" or \"multi_thread\""
                    ),
                ));
            }
        };

        return Ok(quote! {
            #flavor_attr
            #(#attrs)*
            #vis async fn #name() #output {
                ::testkit_command::__private::run_async_test(#global, async move #body).await
            }
        });
    }

    if config.flavor.is_some() {
        return Err(syn::Error::new_spanned(
            &input.sig,
            "flavor only applies to async test functions",
        ));
    }

    Ok(quote! {
        #[::core::prelude::v1::test]
        #(#attrs)*
        #vis fn #name() #output {
            ::testkit_command::__private::run_test(#global, move || #output #body)
        }
    })
}
