// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Statements inserted into rewritten bodies.
//!
//! Identifiers introduced here use mixed-site hygiene so they can neither
//! collide with nor be referenced by the user's own locals.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote_spanned;
use syn::{Path, Stmt, ext::IdentExt, parse_quote};

/// The hidden sink parameter of an instrumented body.
pub fn sink_ident() -> Ident {
	Ident::new("__introspect_sink", Span::mixed_site())
}

/// The scope guard an instrumented body records into.
pub fn scope_ident() -> Ident {
	Ident::new("__introspect_scope", Span::mixed_site())
}

/// The frame a traced function records into.
pub fn frame_ident() -> Ident {
	Ident::new("__introspect_frame", Span::mixed_site())
}

/// The static code descriptor of a traced function.
pub fn code_ident() -> Ident {
	Ident::new("__INTROSPECT_CODE", Span::mixed_site())
}

/// Holds the value of a tail expression while shadowed entries are restored.
pub fn tail_ident() -> Ident {
	Ident::new("__introspect_tail", Span::mixed_site())
}

/// Emits the name a binding is published under. Raw identifiers lose their
/// `r#` prefix.
pub fn label(binding: &Ident) -> String {
	binding.unraw().to_string()
}

/// Emits `recorder.bind("name", || <capture of name>);`
pub fn record(krate: &Path, recorder: &Ident, binding: &Ident) -> Stmt {
	let label = label(binding);
	parse_quote! {
		#recorder.bind(#label, || {
			#[allow(unused_imports)]
			use #krate::__private::{DebugProbe as _, OpaqueProbe as _, SerializeProbe as _};
			(&&&#krate::__private::Probe(&#binding)).introspect_value()
		});
	}
}

/// Emits `recorder.shadow("name");`, saving the entry an inner binding is
/// about to hide.
pub fn shadow(recorder: &Ident, label: &str) -> Stmt {
	parse_quote!(#recorder.shadow(#label);)
}

/// Emits `recorder.unshadow("name");`, restoring the saved entry.
pub fn unshadow(recorder: &Ident, label: &str) -> Stmt {
	parse_quote!(#recorder.unshadow(#label);)
}

/// Emits `let mut scope = sink.open();`
pub fn open_scope(sink: &Ident, scope: &Ident) -> Stmt {
	parse_quote! {
		#[allow(unused_mut)]
		let mut #scope = #sink.open();
	}
}

/// Emits the static code descriptor of a traced function followed by the
/// statement entering its frame. `span` locates the function for `line!()`.
pub fn enter_frame(krate: &Path, frame: &Ident, name: &str, span: Span) -> Vec<Stmt> {
	let code = code_ident();
	let line: TokenStream = quote_spanned!(span=> line!());
	vec![
		parse_quote! {
			static #code: #krate::__private::Code =
				#krate::__private::Code::new(#name, ::core::module_path!(), ::core::file!(), #line);
		},
		parse_quote! {
			#[allow(unused_mut)]
			let mut #frame = #krate::__private::Frame::enter(&#code);
		},
	]
}
