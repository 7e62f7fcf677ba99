use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn, LitStr};

/// Test attribute used across the crate.
///
/// - `#[rxcombine_macro::test]` on a sync fn expands to `#[test]`.
/// - On an async fn it expands to `#[tokio::test]`; `local` selects the
///   current-thread runtime and `shared` the multi-thread one.
/// - On wasm32 the test is routed through `wasm_bindgen_test` instead.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);
  let is_async = input.sig.asyncness.is_some();

  let raw_args = proc_macro2::TokenStream::from(attr);
  let tokio_args = if raw_args.is_empty() {
    proc_macro2::TokenStream::new()
  } else {
    if !is_async {
      return syn::Error::new(
        raw_args.span(),
        "runtime flavor args are only supported for async tests; use #[rxcombine_macro::test] \
         for sync tests",
      )
      .to_compile_error()
      .into();
    }

    let flavor = if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
      ident.to_string()
    } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
      lit.value()
    } else {
      return syn::Error::new(raw_args.span(), "expected `local` or `shared`")
        .to_compile_error()
        .into();
    };

    match flavor.as_str() {
      "local" => quote!(flavor = "current_thread"),
      "shared" => quote!(flavor = "multi_thread"),
      _ => {
        return syn::Error::new(raw_args.span(), "expected `local` or `shared`")
          .to_compile_error()
          .into();
      }
    }
  };

  let wasm_attr = if is_async {
    quote!(wasm_bindgen_test::wasm_bindgen_test(async))
  } else {
    quote!(wasm_bindgen_test::wasm_bindgen_test)
  };
  let native_attr = if is_async { quote!(tokio::test(#tokio_args)) } else { quote!(test) };

  let expanded = quote! {
    #[cfg_attr(target_arch = "wasm32", #wasm_attr)]
    #[cfg_attr(not(target_arch = "wasm32"), #native_attr)]
    #input
  };

  expanded.into()
}
