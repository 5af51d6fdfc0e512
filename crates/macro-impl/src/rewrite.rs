// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Body rewriting shared by both engines.
//!
//! The rewriter walks a function body and inserts a record statement after
//! every point where a local variable receives a value:
//!
//! - parameters, at the top of the body;
//! - `let` statements with an initializer, including `let .. else`;
//! - assignments and compound assignments whose root is a local of the body;
//! - `for`, `if let` and `while let` patterns, at the top of their block;
//! - match arm patterns, at the top of the arm.
//!
//! A statement containing a block that shadows an outer name is bracketed by
//! `shadow` and `unshadow` calls, so the outer entry is back once the block is
//! left. A value is recorded when it is bound or assigned, not when it is
//! mutated in place: `v.push(1)` leaves the entry of `v` as it was.
//!
//! Closures, async blocks, const blocks, nested items and macro invocations are
//! left alone. Their bindings belong to a different body.

use std::{collections::HashSet, mem};

use proc_macro2::{Ident, Span};
use syn::{
	Arm, Block, Expr, ExprBlock, Item, Path, Stmt, Token, parse_quote,
	visit_mut::{self, VisitMut},
};

use crate::{generate, pattern};

pub struct Rewriter<'a> {
	krate: &'a Path,
	recorder: Ident,
	scopes: Vec<HashSet<String>>,
	// outer names a finished block had shadowed
	uncovered: Vec<String>,
}

impl<'a> Rewriter<'a> {
	/// `recorder` is the local the inserted statements call `bind` on.
	pub fn new(krate: &'a Path, recorder: Ident) -> Self {
		Self {
			krate,
			recorder,
			scopes: Vec::new(),
			uncovered: Vec::new(),
		}
	}

	/// Rewrite the body of a callable whose parameters bind `params`.
	pub fn rewrite_body(&mut self, body: &mut Block, params: Vec<Ident>) {
		self.rewrite_block(body, params);
		self.uncovered.clear();
	}

	fn declare(&mut self, names: &[Ident]) {
		if let Some(scope) = self.scopes.last_mut() {
			scope.extend(names.iter().map(generate::label));
		}
	}

	fn is_declared(&self, name: &Ident) -> bool {
		self.is_visible(&generate::label(name))
	}

	fn is_visible(&self, label: &str) -> bool {
		self.scopes.iter().rev().any(|scope| scope.contains(label))
	}

	fn records(&self, names: &[Ident]) -> Vec<Stmt> {
		names.iter().map(|name| generate::record(self.krate, &self.recorder, name)).collect()
	}

	/// Outer names that a block inside the statement just rewritten shadowed.
	fn take_uncovered(&mut self) -> Vec<String> {
		let mut names = mem::take(&mut self.uncovered);
		names.sort();
		names.dedup();
		names
	}

	/// Rewrite `block`, whose first statement sees `bound` freshly bound.
	fn rewrite_block(&mut self, block: &mut Block, bound: Vec<Ident>) {
		let outer = mem::take(&mut self.uncovered);
		self.scopes.push(HashSet::new());
		self.declare(&bound);

		let recorder = self.recorder.clone();
		let mut stmts = self.records(&bound);
		let count = block.stmts.len();
		for (idx, mut stmt) in mem::take(&mut block.stmts).into_iter().enumerate() {
			match &mut stmt {
				Stmt::Local(local) => {
					let initialized = local.init.is_some();
					if let Some(init) = &mut local.init {
						self.visit_expr_mut(&mut init.expr);
						if let Some((_, diverge)) = &mut init.diverge {
							self.visit_expr_mut(diverge);
						}
					}

					let names = pattern::bindings(&local.pat);
					let uncovered = self.take_uncovered();
					self.declare(&names);

					stmts.extend(uncovered.iter().map(|name| generate::shadow(&recorder, name)));
					stmts.push(stmt);
					stmts.extend(uncovered.iter().map(|name| generate::unshadow(&recorder, name)));
					// `let x;` is recorded by the assignment that initializes it
					if initialized {
						stmts.extend(self.records(&names));
					}
				}
				Stmt::Expr(expr, semi) => {
					self.visit_expr_mut(expr);

					let written: Vec<Ident> =
						pattern::assigned(expr).into_iter().filter(|name| self.is_declared(name)).collect();
					if !written.is_empty() && semi.is_none() {
						*semi = Some(Token![;](Span::call_site()));
					}
					let uncovered = self.take_uncovered();
					stmts.extend(uncovered.iter().map(|name| generate::shadow(&recorder, name)));

					if idx + 1 == count && semi.is_none() && !uncovered.is_empty() {
						// restore the outer entries after the tail value is computed
						let tail = generate::tail_ident();
						let value = mem::replace(expr, Expr::Verbatim(Default::default()));
						stmts.push(parse_quote!(let #tail = #value;));
						stmts.extend(uncovered.iter().map(|name| generate::unshadow(&recorder, name)));
						stmts.push(Stmt::Expr(parse_quote!(#tail), None));
						continue;
					}

					stmts.push(stmt);
					stmts.extend(uncovered.iter().map(|name| generate::unshadow(&recorder, name)));
					stmts.extend(self.records(&written));
				}
				Stmt::Item(_) | Stmt::Macro(_) => stmts.push(stmt),
			}
		}
		block.stmts = stmts;

		let scope = self.scopes.pop().unwrap_or_default();
		self.uncovered = outer;
		let visible: Vec<String> = scope.into_iter().filter(|label| self.is_visible(label)).collect();
		self.uncovered.extend(visible);
	}

	fn rewrite_arm(&mut self, arm: &mut Arm) {
		let names = pattern::bindings(&arm.pat);

		if let Some((_, guard)) = &mut arm.guard {
			self.scopes.push(HashSet::new());
			self.declare(&names);
			self.visit_expr_mut(guard);
			self.scopes.pop();
		}

		match arm.body.as_mut() {
			Expr::Block(body) if body.label.is_none() && body.attrs.is_empty() => {
				self.rewrite_block(&mut body.block, names);
			}
			body if names.is_empty() && pattern::assigned(body).is_empty() => self.visit_expr_mut(body),
			body => {
				let expr = mem::replace(body, Expr::Verbatim(Default::default()));
				let mut block = Block {
					brace_token: Default::default(),
					stmts: vec![Stmt::Expr(expr, None)],
				};
				self.rewrite_block(&mut block, names);
				*body = Expr::Block(ExprBlock {
					attrs: Vec::new(),
					label: None,
					block,
				});
			}
		}
	}
}

impl VisitMut for Rewriter<'_> {
	fn visit_block_mut(&mut self, block: &mut Block) {
		self.rewrite_block(block, Vec::new());
	}

	fn visit_expr_mut(&mut self, expr: &mut Expr) {
		match expr {
			Expr::Closure(_) | Expr::Async(_) | Expr::Const(_) | Expr::Macro(_) => {}
			Expr::ForLoop(for_loop) => {
				self.visit_expr_mut(&mut for_loop.expr);
				let names = pattern::bindings(&for_loop.pat);
				self.rewrite_block(&mut for_loop.body, names);
			}
			Expr::If(if_expr) => {
				self.visit_expr_mut(&mut if_expr.cond);
				let names = pattern::condition_bindings(&if_expr.cond);
				self.rewrite_block(&mut if_expr.then_branch, names);
				if let Some((_, else_branch)) = &mut if_expr.else_branch {
					self.visit_expr_mut(else_branch);
				}
			}
			Expr::While(while_expr) => {
				self.visit_expr_mut(&mut while_expr.cond);
				let names = pattern::condition_bindings(&while_expr.cond);
				self.rewrite_block(&mut while_expr.body, names);
			}
			Expr::Match(match_expr) => {
				self.visit_expr_mut(&mut match_expr.expr);
				for arm in &mut match_expr.arms {
					self.rewrite_arm(arm);
				}
			}
			_ => visit_mut::visit_expr_mut(self, expr),
		}
	}

	fn visit_item_mut(&mut self, _item: &mut Item) {}
}

#[cfg(test)]
pub mod tests {
	use proc_macro2::{Ident, Span, TokenStream};
	use syn::{
		Block, Expr, ExprLit, ExprMethodCall, Lit, Stmt, parse_quote,
		visit_mut::{self, VisitMut},
	};

	use super::Rewriter;
	use crate::{generate, parse::crate_path};

	/// Names passed to `bind`, in the order the calls appear.
	#[derive(Default)]
	pub struct Recorded(pub Vec<String>);

	impl VisitMut for Recorded {
		fn visit_expr_method_call_mut(&mut self, call: &mut ExprMethodCall) {
			if call.method == "bind"
				&& let Some(Expr::Lit(ExprLit {
					lit: Lit::Str(name),
					..
				})) = call.args.first()
			{
				self.0.push(name.value());
			}
			visit_mut::visit_expr_method_call_mut(self, call);
		}
	}

	pub fn recorded(tokens: TokenStream) -> Vec<String> {
		let mut file: syn::File = syn::parse2(tokens).unwrap();
		let mut recorded = Recorded::default();
		recorded.visit_file_mut(&mut file);
		recorded.0
	}

	fn rewrite(params: &[&str], mut block: Block) -> Block {
		let krate = crate_path("introspect").unwrap();
		let params = params.iter().map(|name| Ident::new(name, Span::call_site())).collect();
		Rewriter::new(&krate, generate::scope_ident()).rewrite_body(&mut block, params);
		block
	}

	fn names(params: &[&str], block: Block) -> Vec<String> {
		let mut block = rewrite(params, block);
		let mut recorded = Recorded::default();
		recorded.visit_block_mut(&mut block);
		recorded.0
	}

	mod lets {
		use super::*;

		#[test]
		fn test_params_then_lets() {
			let body: Block = parse_quote!({
				let total = a + b + c;
				let product = a * b * c;
				total < product
			});
			assert_eq!(names(&["a", "b", "c"], body), vec!["a", "b", "c", "total", "product"]);
		}

		#[test]
		fn test_destructuring() {
			let body: Block = parse_quote!({
				let (low, high) = bounds;
				let Range { start, end: stop } = range;
			});
			assert_eq!(names(&[], body), vec!["low", "high", "start", "stop"]);
		}

		#[test]
		fn test_let_else() {
			let body: Block = parse_quote!({
				let Some(value) = maybe else {
					return;
				};
				value
			});
			assert_eq!(names(&[], body), vec!["value"]);
		}

		#[test]
		fn test_uninitialized_is_recorded_on_assignment() {
			let body: Block = parse_quote!({
				let x;
				if flag {
					x = 1
				} else {
					x = 2
				}
				x
			});
			assert_eq!(names(&[], body), vec!["x", "x"]);
		}

		#[test]
		fn test_shadowing_in_nested_block() {
			let body: Block = parse_quote!({
				let x = 1;
				{
					let x = "inner";
				}
				x
			});
			assert_eq!(names(&[], body), vec!["x", "x"]);
		}
	}

	mod shadowing {
		use super::*;

		fn method(stmt: &Stmt) -> Option<String> {
			match stmt {
				Stmt::Expr(Expr::MethodCall(call), Some(_)) => Some(call.method.to_string()),
				_ => None,
			}
		}

		#[test]
		fn test_block_is_bracketed() {
			let block = rewrite(
				&[],
				parse_quote!({
					let x = 1;
					{
						let x = "inner";
					}
					x
				}),
			);

			assert_eq!(block.stmts.len(), 6);
			assert_eq!(method(&block.stmts[2]).as_deref(), Some("shadow"));
			assert!(matches!(&block.stmts[3], Stmt::Expr(Expr::Block(_), None)));
			assert_eq!(method(&block.stmts[4]).as_deref(), Some("unshadow"));
			assert!(matches!(&block.stmts[5], Stmt::Expr(Expr::Path(_), None)));
		}

		#[test]
		fn test_loop_pattern() {
			let block = rewrite(
				&["items"],
				parse_quote!({
					let item = 0;
					for item in items {}
					item
				}),
			);

			let methods: Vec<_> = block.stmts.iter().filter_map(method).collect();
			assert_eq!(methods, vec!["bind", "bind", "shadow", "unshadow"]);
		}

		#[test]
		fn test_fresh_names_are_not_bracketed() {
			let block = rewrite(
				&[],
				parse_quote!({
					let x = 1;
					{
						let y = 2;
					}
					x
				}),
			);

			assert!(block.stmts.iter().filter_map(method).all(|method| method == "bind"));
		}

		#[test]
		fn test_tail_is_held_while_restoring() {
			let block = rewrite(
				&["n"],
				parse_quote!({
					let total = n;
					match n {
						total => total + 1,
					}
				}),
			);

			assert_eq!(block.stmts.len(), 7);
			assert_eq!(method(&block.stmts[3]).as_deref(), Some("shadow"));
			assert!(matches!(&block.stmts[4], Stmt::Local(local) if matches!(*local.init.as_ref().unwrap().expr, Expr::Match(_))));
			assert_eq!(method(&block.stmts[5]).as_deref(), Some("unshadow"));
			assert!(matches!(&block.stmts[6], Stmt::Expr(Expr::Path(_), None)));
		}
	}

	mod assignments {
		use super::*;

		#[test]
		fn test_locals_only() {
			let body: Block = parse_quote!({
				let mut count = 0;
				count += 1;
				limit = 3;
				count
			});
			assert_eq!(names(&[], body), vec!["count", "count"]);
		}

		#[test]
		fn test_parameter_fields() {
			let body: Block = parse_quote!({
				point.x = 1;
				grid[0] = 2;
			});
			assert_eq!(names(&["point", "grid"], body), vec!["point", "grid", "point", "grid"]);
		}

		#[test]
		fn test_tail_assignment_becomes_statement() {
			let block = rewrite(
				&[],
				parse_quote!({
					let mut x = 0;
					x = 5
				}),
			);

			assert_eq!(block.stmts.len(), 4);
			assert!(matches!(&block.stmts[2], Stmt::Expr(Expr::Assign(_), Some(_))));
			assert!(matches!(&block.stmts[3], Stmt::Expr(Expr::MethodCall(_), Some(_))));
		}
	}

	mod control_flow {
		use super::*;

		#[test]
		fn test_loop_and_conditional_patterns() {
			let body: Block = parse_quote!({
				for (i, item) in items.iter().enumerate() {
					let doubled = item * 2;
				}
				if let Some(first) = items.first() {}
				while let Some(top) = stack.pop() {}
			});
			assert_eq!(names(&[], body), vec!["i", "item", "doubled", "first", "top"]);
		}

		#[test]
		fn test_match_arms() {
			let block = rewrite(
				&[],
				parse_quote!({
					match value {
						Some(n) if n > 0 => n,
						Some(n) => {
							-n
						}
						None => 0,
					}
				}),
			);

			let Stmt::Expr(Expr::Match(matched), None) = &block.stmts[0] else {
				panic!("expected match");
			};
			assert!(matches!(*matched.arms[0].body, Expr::Block(_)));
			assert!(matches!(*matched.arms[2].body, Expr::Lit(_)));

			let mut block = block;
			let mut recorded = Recorded::default();
			recorded.visit_block_mut(&mut block);
			assert_eq!(recorded.0, vec!["n", "n"]);
		}
	}

	mod skipped {
		use super::*;

		#[test]
		fn test_closures() {
			let body: Block = parse_quote!({
				let add = |z: i64| {
					let w = z + 1;
					w
				};
				add(1)
			});
			assert_eq!(names(&[], body), vec!["add"]);
		}

		#[test]
		fn test_nested_items() {
			let body: Block = parse_quote!({
				fn helper() {
					let hidden = 1;
				}
				let shown = helper();
			});
			assert_eq!(names(&[], body), vec!["shown"]);
		}

		#[test]
		fn test_async_blocks() {
			let body: Block = parse_quote!({
				let future = async {
					let inner = 1;
					inner
				};
			});
			assert_eq!(names(&[], body), vec!["future"]);
		}
	}
}
