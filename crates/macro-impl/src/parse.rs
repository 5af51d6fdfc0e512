// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Macro arguments.

use proc_macro2::TokenStream;
use syn::{
	Expr, ExprClosure, LitStr, Path, Token,
	parse::{Parse, ParseStream, Parser},
};

/// Arguments accepted by `#[instrument(..)]` and `#[traced(..)]`:
/// `crate = path` and `name = "..."`, both optional.
pub struct Options {
	pub krate: Path,
	pub name: Option<LitStr>,
}

impl Options {
	pub fn parse(attr: TokenStream, default_crate: &str) -> syn::Result<Self> {
		let mut krate = None;
		let mut name = None;

		let parser = syn::meta::parser(|meta| {
			if meta.path.is_ident("crate") {
				krate = Some(meta.value()?.parse::<Path>()?);
				Ok(())
			} else if meta.path.is_ident("name") {
				name = Some(meta.value()?.parse::<LitStr>()?);
				Ok(())
			} else {
				Err(meta.error("unsupported argument, expected `crate = path` or `name = \"...\"`"))
			}
		});
		parser.parse2(attr)?;

		let krate = match krate {
			Some(krate) => krate,
			None => crate_path(default_crate)?,
		};

		Ok(Self {
			krate,
			name,
		})
	}
}

/// Parse a crate name like `introspect` into the global path `::introspect`.
pub fn crate_path(name: &str) -> syn::Result<Path> {
	syn::parse_str(&format!("::{name}"))
}

/// Input of `instrumented!`: an optional name followed by a closure.
pub struct ClosureInput {
	pub name: Option<LitStr>,
	pub closure: ExprClosure,
}

impl Parse for ClosureInput {
	fn parse(input: ParseStream) -> syn::Result<Self> {
		let name = if input.peek(LitStr) {
			let name = input.parse::<LitStr>()?;
			input.parse::<Token![,]>()?;
			Some(name)
		} else {
			None
		};

		let closure = match input.parse::<Expr>()? {
			Expr::Closure(closure) => closure,
			other => return Err(syn::Error::new_spanned(other, "instrumented! expects a closure")),
		};

		// trailing comma
		if input.peek(Token![,]) {
			input.parse::<Token![,]>()?;
		}

		Ok(Self {
			name,
			closure,
		})
	}
}
