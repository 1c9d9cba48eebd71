//! Procedural macros for understudy
//!
//! This crate provides the `#[understudy::test]` attribute macro for writing
//! async tests with deadlines and completion-signal injection.
//!
//! # Example
//!
//! ```rust,ignore
//! use understudy::prelude::*;
//!
//! #[understudy::test]
//! async fn my_test(done: Done) {
//!     start_background_work(move || {
//!         done.complete();
//!     });
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, FnArg, Ident, ItemFn, Lit, Pat, Token, Type,
};

/// Configuration options for the test macro.
#[derive(Default)]
struct TestConfig {
    /// Which async runtime to use ("tokio" or "async-std")
    runtime: Option<String>,
    /// Flavor for tokio runtime ("current_thread" or "multi_thread")
    flavor: Option<String>,
    /// Deadline for the whole test body in milliseconds (default: 5000)
    timeout_ms: Option<u64>,
}

impl Parse for TestConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut config = TestConfig::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "runtime" => {
                    let lit: Lit = input.parse()?;
                    if let Lit::Str(s) = lit {
                        config.runtime = Some(s.value());
                    }
                }
                "flavor" => {
                    let lit: Lit = input.parse()?;
                    if let Lit::Str(s) = lit {
                        config.flavor = Some(s.value());
                    }
                }
                "timeout_ms" => {
                    let lit: Lit = input.parse()?;
                    if let Lit::Int(i) = lit {
                        config.timeout_ms = Some(i.base10_parse()?);
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

/// Extracts the pattern and type of a `done: Done<...>` parameter.
fn get_done_param(arg: &FnArg) -> Option<(&Pat, &Type)> {
    if let FnArg::Typed(pat_type) = arg {
        if let Type::Path(type_path) = &*pat_type.ty {
            if let Some(segment) = type_path.path.segments.last() {
                if segment.ident == "Done" {
                    return Some((&pat_type.pat, &pat_type.ty));
                }
            }
        }
    }
    None
}

/// Test attribute macro for async tests with deadlines and completion signals.
///
/// The macro wraps the test body in a runtime (tokio by default) and a
/// deadline. A test that neither finishes nor fires its completion signal
/// fails with a timeout panic instead of hanging the test run.
///
/// # Basic Usage
///
/// ```rust,ignore
/// #[understudy::test]
/// async fn test_basic() {
///     assert_eq!(2 + 2, 4);
/// }
/// ```
///
/// # With Completion-Signal Injection
///
/// Add a `done: Done` parameter (or `done: Done<T>` for a payload) to
/// receive the firing half of a completion signal. The macro builds the
/// pair, hands the `Done` to the body, and awaits the waiter after the body
/// runs. The test fails if the signal is rejected, or if every handle is
/// dropped without firing, which is what a panicking callback looks like
/// from the outside.
///
/// ```rust,ignore
/// #[understudy::test]
/// async fn test_callback(done: Done) {
///     spawn_worker(move |outcome| {
///         if outcome.is_ok() {
///             done.complete();
///         } else {
///             done.reject("worker failed");
///         }
///     });
/// }
/// ```
///
/// # Configuration Options
///
/// - `runtime = "tokio"` or `runtime = "async-std"` - Select the async runtime
/// - `flavor = "multi_thread"` - Tokio runtime flavor
/// - `timeout_ms = 250` - Deadline for the whole body (default: 5000)
///
/// ```rust,ignore
/// #[understudy::test(runtime = "tokio", timeout_ms = 250)]
/// async fn test_fast_path(done: Done<String>) {
///     fetch(move |payload| { done.resolve(payload); });
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let config = parse_macro_input!(attr as TestConfig);
    let input = parse_macro_input!(item as ItemFn);

    expand_test(config, input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_test(config: TestConfig, input: ItemFn) -> syn::Result<TokenStream2> {
    let name = &input.sig.ident;
    let body = &input.block;
    let attrs = &input.attrs;
    let vis = &input.vis;

    // Check if function is async
    if input.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            &input.sig,
            "test function must be async",
        ));
    }

    // Check for a completion-signal parameter
    let done_param = input.sig.inputs.iter().find_map(get_done_param);

    let (done_init, done_await) = if let Some((pat, ty)) = done_param {
        (
            quote! {
                let (#pat, __understudy_waiter): (#ty, _) =
                    ::understudy::completion::channel();
            },
            quote! {
                if let Err(err) = __understudy_waiter.wait().await {
                    panic!("completion failed: {err}");
                }
            },
        )
    } else {
        (quote! {}, quote! {})
    };

    let timeout_ms = config.timeout_ms.unwrap_or(5000);
    let deadline_setup = quote! {
        let __understudy_deadline = ::std::time::Duration::from_millis(#timeout_ms);
        let __understudy_run = async {
            #done_init
            #body
            #done_await
        };
    };

    // Determine runtime and generate wrapper
    let runtime = config.runtime.as_deref().unwrap_or("tokio");
    let flavor = config.flavor.as_deref().unwrap_or("current_thread");

    let runtime_wrapper = match runtime {
        "tokio" => {
            let flavor_attr = match flavor {
                "multi_thread" => quote! { #[::tokio::test(flavor = "multi_thread")] },
                _ => quote! { #[::tokio::test] },
            };
            quote! {
                #flavor_attr
                #(#attrs)*
                #vis async fn #name() {
                    #deadline_setup
                    if ::tokio::time::timeout(__understudy_deadline, __understudy_run)
                        .await
                        .is_err()
                    {
                        panic!("test timed out after {:?}", __understudy_deadline);
                    }
                }
            }
        }
        "async-std" => {
            quote! {
                #[::async_std::test]
                #(#attrs)*
                #vis async fn #name() {
                    #deadline_setup
                    if ::async_std::future::timeout(__understudy_deadline, __understudy_run)
                        .await
                        .is_err()
                    {
                        panic!("test timed out after {:?}", __understudy_deadline);
                    }
                }
            }
        }
        _ => {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                format!("unsupported runtime: {runtime}. Use \"tokio\" or \"async-std\""),
            ));
        }
    };

    Ok(runtime_wrapper)
}
