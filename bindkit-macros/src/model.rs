//! Model derive and attribute implementation

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Implementation of `#[derive(Model)]`
///
/// Generates, for `Node`:
///
/// ```rust,ignore
/// impl bindkit::Model for Node { fn model_name() -> &'static str { "Node" } }
/// impl bindkit::Arg for Node { /* take the bound model slot */ }
/// impl bindkit::IntoBody for Node { /* Body::model(self) */ }
/// impl bindkit::IntoReply for Node { /* Reply::body(self) */ }
/// bindkit::inventory::submit! { bindkit::binding::ModelRegistration { .. } }
/// ```
pub fn derive_model_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "models cannot be generic")
            .to_compile_error()
            .into();
    }
    if !matches!(input.data, syn::Data::Struct(_)) {
        return syn::Error::new_spanned(&input, "#[derive(Model)] can only be used on structs")
            .to_compile_error()
            .into();
    }

    let model_name = name.to_string();

    let output = quote! {
        impl ::bindkit::Model for #name {
            fn model_name() -> &'static str {
                #model_name
            }
        }

        impl ::bindkit::Arg for #name {
            fn type_ref() -> ::bindkit::TypeRef {
                ::bindkit::TypeRef::of::<Self>()
            }

            fn take(
                args: &mut ::bindkit::CallArgs,
                name: &str,
            ) -> ::std::result::Result<Self, ::bindkit::FrameworkError> {
                args.take_model::<Self>(name)
            }
        }

        impl ::bindkit::IntoBody for #name {
            fn into_body(self) -> ::bindkit::Body {
                ::bindkit::Body::model(self)
            }
        }

        impl ::bindkit::IntoReply for #name {
            fn into_reply(self) -> ::bindkit::Reply {
                ::bindkit::Reply::body(self)
            }
        }

        ::bindkit::inventory::submit! {
            ::bindkit::binding::ModelRegistration {
                model: ::bindkit::ModelType::of::<#name>,
            }
        }
    };

    output.into()
}

/// Implementation of the `#[model]` attribute
pub fn model_attr_impl(attr: TokenStream, input: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[model] does not take arguments",
        )
        .to_compile_error()
        .into();
    }

    let input = parse_macro_input!(input as DeriveInput);
    if !matches!(input.data, syn::Data::Struct(_)) {
        return syn::Error::new_spanned(&input, "#[model] can only be used on structs")
            .to_compile_error()
            .into();
    }

    let output = quote! {
        #[derive(serde::Deserialize, serde::Serialize, validator::Validate, ::bindkit::Model)]
        #input
    };

    output.into()
}
