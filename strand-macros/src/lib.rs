mod args;

use args::RuntimeArgs;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Error, ItemFn, ReturnType, parse_macro_input};

/// Builds the runtime expression for the parsed arguments.
fn runtime(args: &RuntimeArgs) -> TokenStream2 {
    let worker_threads = args
        .worker_threads
        .as_ref()
        .map(|n| quote! { .worker_threads(#n) });

    quote! {
        ::strand::RuntimeBuilder::new()
            #worker_threads
            .build()
    }
}

/// Wraps the function body in a boxed future whose output is pinned to
/// the declared return type, so `?` in the body infers its error type.
fn body(input: &ItemFn) -> TokenStream2 {
    let block = &input.block;
    let output = match &input.sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };

    quote! {
        let body: ::std::pin::Pin<
            ::std::boxed::Box<dyn ::std::future::Future<Output = #output> + ::std::marker::Send>,
        > = ::std::boxed::Box::pin(async move #block);
    }
}

/// Rejects functions that cannot be turned into a runtime entry point.
fn check_signature(input: &ItemFn, attr: &str) -> syn::Result<()> {
    let sig = &input.sig;

    if sig.asyncness.is_none() {
        return Err(Error::new_spanned(
            sig.fn_token,
            format!("#[strand::{attr}] must be used on an async function"),
        ));
    }

    if !sig.inputs.is_empty() {
        return Err(Error::new_spanned(
            &sig.inputs,
            format!("#[strand::{attr}] functions cannot take arguments"),
        ));
    }

    Ok(())
}

/// Runs an `async fn main` on a Strand runtime.
///
/// The body runs as a task on a worker thread, so the return type must
/// be `Send`. Errors boxed as `Box<dyn Error>` are rejected; use
/// `Box<dyn Error + Send + Sync>` instead.
///
/// ```rust,ignore
/// #[strand::main(worker_threads = 4)]
/// async fn main() {
///     let handle = strand::task::launch(|| 1 + 1);
///     assert_eq!(handle.await, Ok(2));
/// }
/// ```
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as RuntimeArgs);
    let input = parse_macro_input!(item as ItemFn);

    if let Err(err) = check_signature(&input, "main") {
        return err.to_compile_error().into();
    }

    if input.sig.ident != "main" {
        return Error::new_spanned(&input.sig.ident, "#[strand::main] must be used on fn main")
            .to_compile_error()
            .into();
    }

    let attrs = &input.attrs;
    let vis = &input.vis;
    let output = &input.sig.output;
    let body = body(&input);
    let runtime = runtime(&args);

    quote! {
        #(#attrs)*
        #vis fn main() #output {
            #body
            #runtime.block_on(body)
        }
    }
    .into()
}

/// Runs an `async fn` test on a fresh Strand runtime.
///
/// As with [`macro@main`], the body runs on a worker thread and its
/// return type must be `Send`.
///
/// ```rust,ignore
/// #[strand::test(worker_threads = 2)]
/// async fn launches() {
///     let handle = strand::task::launch(|| 40 + 2);
///     assert_eq!(handle.await, Ok(42));
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as RuntimeArgs);
    let input = parse_macro_input!(item as ItemFn);

    if let Err(err) = check_signature(&input, "test") {
        return err.to_compile_error().into();
    }

    let attrs = &input.attrs;
    let vis = &input.vis;
    let name = &input.sig.ident;
    let output = &input.sig.output;
    let body = body(&input);
    let runtime = runtime(&args);

    quote! {
        #[::core::prelude::v1::test]
        #(#attrs)*
        #vis fn #name() #output {
            #body
            #runtime.block_on(body)
        }
    }
    .into()
}
