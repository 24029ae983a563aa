use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Ident, ItemFn, LitStr, parse_macro_input};

/// Implementation of `#[register_processor("key")]` attribute macro.
///
/// Leaves the decorated `fn` unchanged and appends a
/// `#[::switchyard_core::linkme::distributed_slice]` static that wires the
/// function into `PROCESSOR_PLUGINS` in `switchyard-core`.
pub fn register_processor(attr: TokenStream, item: TokenStream) -> TokenStream {
    let key = parse_macro_input!(attr as LitStr);
    let func = parse_macro_input!(item as ItemFn);

    if key.value().is_empty() {
        return syn::Error::new(key.span(), "processor key must not be empty")
            .into_compile_error()
            .into();
    }

    if !func.sig.inputs.is_empty() {
        return syn::Error::new_spanned(
            &func.sig.inputs,
            "processor factories take no arguments",
        )
        .into_compile_error()
        .into();
    }

    if func.sig.asyncness.is_some() {
        return syn::Error::new_spanned(
            func.sig.asyncness,
            "processor factories must be synchronous",
        )
        .into_compile_error()
        .into();
    }

    let fn_name = &func.sig.ident;
    let fn_name_upper = fn_name.to_string().to_uppercase();
    let static_name = Ident::new(
        &format!("_PROCESSOR_REGISTER_{fn_name_upper}"),
        Span::call_site(),
    );

    quote! {
        #func

        #[::switchyard_core::linkme::distributed_slice(::switchyard_core::PROCESSOR_PLUGINS)]
        #[linkme(crate = ::switchyard_core::linkme)]
        static #static_name: ::switchyard_core::ProcessorPlugin = ::switchyard_core::ProcessorPlugin {
            key: #key,
            factory: || -> ::switchyard_core::BoxedProcessor {
                ::std::sync::Arc::new(#fn_name())
            },
        };
    }
    .into()
}
