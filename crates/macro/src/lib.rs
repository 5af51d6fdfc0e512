// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Procedural macros for introspect. Use them through the `introspect` crate.

use proc_macro::TokenStream;

/// Rewrite a function so a [`Wrapper`] can capture its bindings without an
/// execution observer.
///
/// The function is replaced by a constant of the same name holding its
/// instrumented body. Call it through `introspect::wrap(name)` to capture, or
/// directly with `name.call((args..))` to run it without capture. Generic,
/// async, const, unsafe and extern functions and methods taking `self` are
/// rejected; use `#[traced]` for those.
///
/// Each binding is recorded when it is bound or assigned. Mutation in place,
/// such as `items.push(x)`, does not update the recorded value. A name shadowed
/// by an inner block gets its outer entry back when the block is left.
///
/// Arguments: `crate = path` when `introspect` is re-exported under another
/// name, `name = "..."` to override the reported name.
///
/// [`Wrapper`]: https://docs.rs/introspect/latest/introspect/struct.Wrapper.html
#[proc_macro_attribute]
pub fn instrument(attr: TokenStream, item: TokenStream) -> TokenStream {
	introspect_macro_impl::instrument(attr.into(), item.into()).into()
}

/// Instrument a closure: `instrumented!("name", |a: i64| a + 1)`.
///
/// Every parameter needs a type annotation. The name is optional. Bindings are
/// recorded as with `#[instrument]`; variables the closure captures are not.
#[proc_macro]
pub fn instrumented(input: TokenStream) -> TokenStream {
	introspect_macro_impl::instrumented(input.into()).into()
}

/// Make a function observable by the execution hook.
///
/// The function keeps its signature and can be called as before. A wrapper
/// created with `introspect::trace` captures the last activation of the first
/// traced function its target enters.
///
/// Each binding is recorded when it is bound or assigned. Mutation in place,
/// such as `items.push(x)`, does not update the recorded value. A name shadowed
/// by an inner block gets its outer entry back when the block is left.
#[proc_macro_attribute]
pub fn traced(attr: TokenStream, item: TokenStream) -> TokenStream {
	introspect_macro_impl::traced(attr.into(), item.into()).into()
}
