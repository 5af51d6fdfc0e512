// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Expansion of `#[instrument]` and `instrumented!`.
//!
//! ```ignore
//! #[instrument]
//! fn compare(a: i64, b: i64, c: i64) -> bool { .. }
//! ```
//!
//! becomes a constant of the same name holding the rewritten body:
//!
//! ```ignore
//! const compare: Instrumented<fn(Sink, (i64, i64, i64)) -> bool> = {
//!     let body: fn(Sink, (i64, i64, i64)) -> bool = |sink, (a, b, c)| {
//!         let mut scope = sink.open();
//!         scope.bind("a", ..);
//!         ..
//!     };
//!     Instrumented::new("compare", body)
//! };
//! ```
//!
//! The body keeps its own `return`, `?` and tail value. Only monomorphic free
//! functions and associated functions without a receiver can be instrumented;
//! anything else is a compile error pointing at `#[traced]`.

use proc_macro2::{Ident, Span, TokenStream, TokenTree};
use quote::{ToTokens, quote};
use syn::{
	Attribute, Block, Expr, ExprBlock, ExprClosure, FnArg, ItemFn, Pat, ReturnType, Signature, Stmt, Type,
	ext::IdentExt,
};

use crate::{
	generate,
	parse::{ClosureInput, Options},
	pattern,
	rewrite::Rewriter,
};

pub fn expand_fn(options: Options, item: ItemFn) -> syn::Result<TokenStream> {
	let ItemFn {
		attrs,
		vis,
		sig,
		block,
	} = item;
	check_signature(&sig)?;

	let krate = &options.krate;
	let name = options.name.map(|name| name.value()).unwrap_or_else(|| sig.ident.unraw().to_string());

	let mut params = Vec::new();
	let mut pats = Vec::new();
	let mut tys = Vec::new();
	for input in &sig.inputs {
		match input {
			FnArg::Receiver(receiver) => {
				return Err(syn::Error::new_spanned(
					receiver,
					"#[instrument] does not support methods taking `self`, use #[traced]",
				));
			}
			FnArg::Typed(typed) => {
				reject_impl_trait(&typed.ty)?;
				params.extend(pattern::bindings(&typed.pat));
				pats.push(typed.pat.as_ref());
				tys.push(typed.ty.as_ref());
			}
		}
	}

	let output = match &sig.output {
		ReturnType::Default => quote!(()),
		ReturnType::Type(_, ty) => {
			reject_impl_trait(ty)?;
			ty.to_token_stream()
		}
	};

	let sink = generate::sink_ident();
	let body = instrument_body(krate, *block, params);

	let attrs = attrs.iter().filter(|attr| is_kept(attr));
	let ident = &sig.ident;
	let signature = quote!(fn(#krate::__private::Sink, (#(#tys,)*)) -> #output);
	let binding = Ident::new("body", Span::mixed_site());

	Ok(quote! {
		#(#attrs)*
		#[allow(non_upper_case_globals, unreachable_code)]
		#vis const #ident: #krate::Instrumented<#signature> = {
			let #binding: #signature = |#sink, (#(#pats,)*)| #body;
			#krate::Instrumented::new(#name, #binding)
		};
	})
}

pub fn expand_closure(options: Options, input: ClosureInput) -> syn::Result<TokenStream> {
	let ClosureInput {
		name,
		closure,
	} = input;
	check_closure(&closure)?;

	let krate = &options.krate;
	let name = name.or(options.name).map(|name| name.value()).unwrap_or_else(|| "closure".to_string());

	let mut params = Vec::new();
	let mut pats = Vec::new();
	let mut tys = Vec::new();
	for input in &closure.inputs {
		match input {
			Pat::Type(typed) => {
				params.extend(pattern::bindings(&typed.pat));
				pats.push(typed.pat.as_ref());
				tys.push(typed.ty.as_ref());
			}
			other => {
				return Err(syn::Error::new_spanned(other, "instrumented closure parameters need a type annotation"));
			}
		}
	}

	let body = match *closure.body {
		Expr::Block(ExprBlock {
			attrs,
			label: None,
			block,
		}) if attrs.is_empty() => block,
		other => Block {
			brace_token: Default::default(),
			stmts: vec![Stmt::Expr(other, None)],
		},
	};

	let sink = generate::sink_ident();
	let body = instrument_body(krate, body, params);
	let capture = &closure.capture;
	let output = &closure.output;
	let binding = Ident::new("body", Span::mixed_site());

	Ok(quote! {
		{
			#[allow(unreachable_code)]
			let #binding = #capture |#sink: #krate::__private::Sink, (#(#pats,)*): (#(#tys,)*)| #output #body;
			#krate::Instrumented::new(#name, #binding)
		}
	})
}

fn instrument_body(krate: &syn::Path, mut body: Block, params: Vec<Ident>) -> Block {
	let sink = generate::sink_ident();
	let scope = generate::scope_ident();

	Rewriter::new(krate, scope.clone()).rewrite_body(&mut body, params);
	body.stmts.insert(0, generate::open_scope(&sink, &scope));
	body
}

fn check_signature(sig: &Signature) -> syn::Result<()> {
	let unsupported = |tokens: &dyn ToTokens, what: &str| {
		Err(syn::Error::new_spanned(tokens, format!("#[instrument] does not support {what} functions, use #[traced]")))
	};

	if let Some(constness) = &sig.constness {
		return unsupported(constness, "const");
	}
	if let Some(asyncness) = &sig.asyncness {
		return unsupported(asyncness, "async");
	}
	if let Some(unsafety) = &sig.unsafety {
		return unsupported(unsafety, "unsafe");
	}
	if let Some(abi) = &sig.abi {
		return unsupported(abi, "extern");
	}
	if let Some(variadic) = &sig.variadic {
		return unsupported(variadic, "variadic");
	}
	if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
		return unsupported(&sig.generics, "generic");
	}
	Ok(())
}

fn check_closure(closure: &ExprClosure) -> syn::Result<()> {
	let unsupported = |tokens: &dyn ToTokens, what: &str| {
		Err(syn::Error::new_spanned(tokens, format!("instrumented! does not support {what} closures")))
	};

	if let Some(lifetimes) = &closure.lifetimes {
		return unsupported(lifetimes, "higher-ranked");
	}
	if let Some(constness) = &closure.constness {
		return unsupported(constness, "const");
	}
	if let Some(movability) = &closure.movability {
		return unsupported(movability, "static");
	}
	if let Some(asyncness) = &closure.asyncness {
		return unsupported(asyncness, "async");
	}
	Ok(())
}

fn reject_impl_trait(ty: &Type) -> syn::Result<()> {
	fn contains_impl(tokens: TokenStream) -> bool {
		tokens.into_iter().any(|tree| match tree {
			TokenTree::Ident(ident) => ident == "impl",
			TokenTree::Group(group) => contains_impl(group.stream()),
			_ => false,
		})
	}

	if contains_impl(ty.to_token_stream()) {
		return Err(syn::Error::new_spanned(ty, "#[instrument] does not support `impl Trait` types, use #[traced]"));
	}
	Ok(())
}

/// Attributes that still mean something on the generated constant.
fn is_kept(attr: &Attribute) -> bool {
	["doc", "cfg", "cfg_attr", "allow", "warn", "deny", "forbid", "expect", "deprecated"]
		.iter()
		.any(|name| attr.path().is_ident(name))
}
