//! Handler attribute macro implementation
//!
//! Turns a function into a `bindkit::Handler` whose parameter table is read
//! off the function's typed signature.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{parse_macro_input, FnArg, ItemFn, Pat};

/// Implementation of the `#[handler]` attribute macro
///
/// Transforms:
/// ```rust,ignore
/// #[handler]
/// pub async fn put_node(node_id: u32, node: Node) -> (&'static str, u16) { ... }
/// ```
///
/// Into:
/// ```rust,ignore
/// pub struct put_node;
///
/// impl put_node {
///     pub async fn invoke(node_id: u32, node: Node) -> (&'static str, u16) { ... }
/// }
///
/// #[bindkit::async_trait]
/// impl bindkit::Handler for put_node {
///     fn params(&self) -> Vec<bindkit::ParameterDescriptor> {
///         vec![
///             ParameterDescriptor::new("node_id", <u32 as bindkit::Arg>::type_ref()),
///             ParameterDescriptor::new("node", <Node as bindkit::Arg>::type_ref()),
///         ]
///     }
///
///     async fn call(&self, args: bindkit::CallArgs) -> bindkit::Reply {
///         let node_id = match <u32 as bindkit::Arg>::take(&mut args, "node_id") { .. };
///         let node = match <Node as bindkit::Arg>::take(&mut args, "node") { .. };
///         bindkit::IntoReply::into_reply(Self::invoke(node_id, node).await)
///     }
/// }
/// ```
pub fn handler_impl(attr: TokenStream, input: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[handler] does not take arguments",
        )
        .to_compile_error()
        .into();
    }

    let input_fn = parse_macro_input!(input as ItemFn);
    match expand(input_fn) {
        Ok(output) => output.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input_fn: ItemFn) -> syn::Result<TokenStream2> {
    let fn_vis = &input_fn.vis;
    let fn_name = &input_fn.sig.ident;
    let fn_output = &input_fn.sig.output;
    let fn_block = &input_fn.block;
    let fn_attrs = &input_fn.attrs;
    let fn_inputs = &input_fn.sig.inputs;

    if !input_fn.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input_fn.sig.generics,
            "#[handler] functions cannot be generic",
        ));
    }

    let mut names = Vec::new();
    let mut bindings = Vec::new();
    let mut types = Vec::new();
    for input in fn_inputs {
        let pat_type = match input {
            FnArg::Typed(pat_type) => pat_type,
            FnArg::Receiver(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "#[handler] does not support methods with self receiver",
                ))
            }
        };
        let ident = match pat_type.pat.as_ref() {
            Pat::Ident(pat_ident) => &pat_ident.ident,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "#[handler] parameters must be plain identifiers",
                ))
            }
        };
        names.push(ident.unraw().to_string());
        bindings.push(format_ident!("__arg_{}", ident.unraw()));
        types.push(pat_type.ty.as_ref().clone());
    }

    let (async_token, await_token) = if input_fn.sig.asyncness.is_some() {
        (quote! { async }, quote! { .await })
    } else {
        (quote! {}, quote! {})
    };

    let args_binding = if names.is_empty() {
        quote! { let _ = args; }
    } else {
        quote! { let mut args = args; }
    };

    let handler_name = fn_name.to_string();
    let doc = format!("Route handler generated from `{}`", handler_name);

    Ok(quote! {
        #[doc = #doc]
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, Default)]
        #fn_vis struct #fn_name;

        impl #fn_name {
            #(#fn_attrs)*
            #fn_vis #async_token fn invoke(#fn_inputs) #fn_output #fn_block
        }

        #[::bindkit::async_trait]
        impl ::bindkit::Handler for #fn_name {
            fn name(&self) -> &'static str {
                #handler_name
            }

            fn params(&self) -> ::std::vec::Vec<::bindkit::ParameterDescriptor> {
                ::std::vec![
                    #(::bindkit::ParameterDescriptor::new(
                        #names,
                        <#types as ::bindkit::Arg>::type_ref(),
                    ),)*
                ]
            }

            async fn call(&self, args: ::bindkit::CallArgs) -> ::bindkit::Reply {
                #args_binding
                #(
                    let #bindings = match <#types as ::bindkit::Arg>::take(&mut args, #names) {
                        ::std::result::Result::Ok(value) => value,
                        ::std::result::Result::Err(err) => return ::bindkit::Reply::Failed(err),
                    };
                )*
                ::bindkit::IntoReply::into_reply(Self::invoke(#(#bindings),*) #await_token)
            }
        }
    })
}
