// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Implementation of the introspect macros.
//!
//! This crate provides the expansion logic used by the proc-macro crate.
//! It's not intended for direct use - use `introspect` instead.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod generate;
pub mod instrument;
pub mod parse;
pub mod pattern;
pub mod rewrite;
pub mod traced;

use proc_macro2::TokenStream;
use syn::ItemFn;

use crate::parse::{ClosureInput, Options};

/// Crate the generated code refers to unless `crate = path` is given.
pub const DEFAULT_CRATE: &str = "introspect";

/// `#[instrument]` with the default crate path.
pub fn instrument(attr: TokenStream, item: TokenStream) -> TokenStream {
	instrument_with_crate(attr, item, DEFAULT_CRATE)
}

/// `#[instrument]` with a custom default crate path.
///
/// # Arguments
/// * `attr` - The attribute arguments
/// * `item` - The annotated function
/// * `crate_path` - The crate the generated code refers to (e.g., "introspect", "introspect_core")
pub fn instrument_with_crate(attr: TokenStream, item: TokenStream, crate_path: &str) -> TokenStream {
	let expanded = Options::parse(attr, crate_path)
		.and_then(|options| instrument::expand_fn(options, syn::parse2::<ItemFn>(item.clone())?));
	or_error(expanded, item)
}

/// `instrumented!` with the default crate path.
pub fn instrumented(input: TokenStream) -> TokenStream {
	instrumented_with_crate(input, DEFAULT_CRATE)
}

pub fn instrumented_with_crate(input: TokenStream, crate_path: &str) -> TokenStream {
	let expanded = Options::parse(TokenStream::new(), crate_path)
		.and_then(|options| instrument::expand_closure(options, syn::parse2::<ClosureInput>(input)?));
	expanded.unwrap_or_else(syn::Error::into_compile_error)
}

/// `#[traced]` with the default crate path.
pub fn traced(attr: TokenStream, item: TokenStream) -> TokenStream {
	traced_with_crate(attr, item, DEFAULT_CRATE)
}

pub fn traced_with_crate(attr: TokenStream, item: TokenStream, crate_path: &str) -> TokenStream {
	let expanded = Options::parse(attr, crate_path)
		.and_then(|options| traced::expand(options, syn::parse2::<ItemFn>(item.clone())?));
	or_error(expanded, item)
}

/// On failure keep the original item next to the error, so one bad attribute
/// does not cascade into unresolved names at every call site.
fn or_error(expanded: syn::Result<TokenStream>, item: TokenStream) -> TokenStream {
	expanded.unwrap_or_else(|error| {
		let mut tokens = error.into_compile_error();
		tokens.extend(item);
		tokens
	})
}

#[cfg(test)]
pub mod tests {
	use quote::quote;

	use super::{instrument, instrumented, traced};

	#[test]
	fn test_error_keeps_item() {
		let rendered = instrument(
			quote!(),
			quote!(
				fn identity<T>(value: T) -> T {
					value
				}
			),
		)
		.to_string();

		assert!(rendered.contains("compile_error"));
		assert!(rendered.contains("fn identity"));
	}

	#[test]
	fn test_bad_arguments() {
		let rendered = traced(quote!(verbose), quote!(fn noop() {})).to_string();
		assert!(rendered.contains("compile_error"));
	}

	#[test]
	fn test_instrumented_closure() {
		let rendered = instrumented(quote!(|n: u32| n + 1)).to_string();
		assert!(rendered.contains(":: introspect :: Instrumented :: new (\"closure\""));
	}
}
