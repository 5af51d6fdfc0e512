// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Expansion of `#[traced]`.
//!
//! The function keeps its signature. Its body gains a static code descriptor
//! and a frame entered before anything else runs, and every binding is
//! recorded into that frame. Recording is a no-op unless an observer is
//! installed on the thread, so untraced calls only pay for entering the frame.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{FnArg, ItemFn, ext::IdentExt};

use crate::{generate, parse::Options, pattern, rewrite::Rewriter};

pub fn expand(options: Options, item: ItemFn) -> syn::Result<TokenStream> {
	let ItemFn {
		attrs,
		vis,
		sig,
		block,
	} = item;

	if let Some(constness) = &sig.constness {
		return Err(syn::Error::new_spanned(constness, "#[traced] does not support const functions"));
	}
	if let Some(asyncness) = &sig.asyncness {
		return Err(syn::Error::new_spanned(asyncness, "#[traced] does not support async functions"));
	}

	let params: Vec<Ident> = sig
		.inputs
		.iter()
		.flat_map(|input| match input {
			FnArg::Receiver(receiver) => vec![Ident::from(receiver.self_token)],
			FnArg::Typed(typed) => pattern::bindings(&typed.pat),
		})
		.collect();

	let krate = &options.krate;
	let name = options.name.map(|name| name.value()).unwrap_or_else(|| sig.ident.unraw().to_string());
	let frame = generate::frame_ident();

	let mut body = *block;
	Rewriter::new(krate, frame.clone()).rewrite_body(&mut body, params);
	body.stmts.splice(0..0, generate::enter_frame(krate, &frame, &name, sig.ident.span()));

	Ok(quote! {
		#(#attrs)*
		#[allow(unreachable_code)]
		#vis #sig #body
	})
}
