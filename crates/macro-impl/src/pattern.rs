// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Names introduced by patterns and assignment targets.

use proc_macro2::Ident;
use syn::{BinOp, Expr, Pat, UnOp};

/// Identifiers a pattern binds, in source order.
///
/// A bare identifier starting with an uppercase letter is taken to be a unit
/// struct, enum variant or constant rather than a binding. Of an or-pattern only
/// the first alternative is inspected; all alternatives bind the same names.
pub fn bindings(pat: &Pat) -> Vec<Ident> {
	let mut names = Vec::new();
	collect(pat, &mut names);
	names
}

fn collect(pat: &Pat, names: &mut Vec<Ident>) {
	match pat {
		Pat::Ident(ident) => {
			let is_path = ident.by_ref.is_none()
				&& ident.mutability.is_none()
				&& ident.subpat.is_none()
				&& ident.ident.to_string().starts_with(|c: char| c.is_uppercase());
			if !is_path {
				names.push(ident.ident.clone());
			}
			if let Some((_, subpat)) = &ident.subpat {
				collect(subpat, names);
			}
		}
		Pat::Or(or) => {
			if let Some(first) = or.cases.first() {
				collect(first, names);
			}
		}
		Pat::Paren(paren) => collect(&paren.pat, names),
		Pat::Reference(reference) => collect(&reference.pat, names),
		Pat::Slice(slice) => slice.elems.iter().for_each(|elem| collect(elem, names)),
		Pat::Struct(strukt) => strukt.fields.iter().for_each(|field| collect(&field.pat, names)),
		Pat::Tuple(tuple) => tuple.elems.iter().for_each(|elem| collect(elem, names)),
		Pat::TupleStruct(tuple) => tuple.elems.iter().for_each(|elem| collect(elem, names)),
		Pat::Type(typed) => collect(&typed.pat, names),
		_ => {}
	}
}

/// Identifiers bound by the `let` conditions of an `if` or `while`, including
/// every `let` of a `&&` chain.
pub fn condition_bindings(cond: &Expr) -> Vec<Ident> {
	match cond {
		Expr::Let(let_expr) => bindings(&let_expr.pat),
		Expr::Binary(binary) if matches!(binary.op, BinOp::And(_)) => {
			let mut names = condition_bindings(&binary.left);
			names.extend(condition_bindings(&binary.right));
			names
		}
		_ => Vec::new(),
	}
}

/// Root variables written by an assignment or compound assignment expression.
///
/// `x.field[i] = ..` and `*x = ..` write `x`; a destructuring assignment
/// `(a, b) = ..` writes both. Any other expression writes nothing.
pub fn assigned(expr: &Expr) -> Vec<Ident> {
	let mut roots = Vec::new();
	match expr {
		Expr::Assign(assign) => place_roots(&assign.left, &mut roots),
		Expr::Binary(binary) if is_compound_assign(&binary.op) => place_roots(&binary.left, &mut roots),
		_ => {}
	}
	roots
}

fn is_compound_assign(op: &BinOp) -> bool {
	matches!(
		op,
		BinOp::AddAssign(_)
			| BinOp::SubAssign(_)
			| BinOp::MulAssign(_)
			| BinOp::DivAssign(_)
			| BinOp::RemAssign(_)
			| BinOp::BitXorAssign(_)
			| BinOp::BitAndAssign(_)
			| BinOp::BitOrAssign(_)
			| BinOp::ShlAssign(_)
			| BinOp::ShrAssign(_)
	)
}

fn place_roots(place: &Expr, roots: &mut Vec<Ident>) {
	match place {
		Expr::Path(path) if path.qself.is_none() => {
			if let Some(ident) = path.path.get_ident() {
				roots.push(ident.clone());
			}
		}
		Expr::Field(field) => place_roots(&field.base, roots),
		Expr::Index(index) => place_roots(&index.expr, roots),
		Expr::Unary(unary) if matches!(unary.op, UnOp::Deref(_)) => place_roots(&unary.expr, roots),
		Expr::Paren(paren) => place_roots(&paren.expr, roots),
		Expr::Tuple(tuple) => tuple.elems.iter().for_each(|elem| place_roots(elem, roots)),
		Expr::Array(array) => array.elems.iter().for_each(|elem| place_roots(elem, roots)),
		_ => {}
	}
}

#[cfg(test)]
pub mod tests {
	use syn::{Expr, ExprIf, Pat, parse::Parser, parse_quote};

	use super::{assigned, bindings, condition_bindings};

	fn pat(tokens: &str) -> Pat {
		Pat::parse_multi_with_leading_vert.parse_str(tokens).unwrap()
	}

	fn names(idents: Vec<proc_macro2::Ident>) -> Vec<String> {
		idents.into_iter().map(|ident| ident.to_string()).collect()
	}

	mod patterns {
		use super::*;

		#[test]
		fn test_nested() {
			assert_eq!(names(bindings(&pat("(a, mut b, [c, .., d])"))), vec!["a", "b", "c", "d"]);
			assert_eq!(names(bindings(&pat("Point { x, y: (first, _) }"))), vec!["x", "first"]);
			assert_eq!(names(bindings(&pat("&Wrapper(ref inner)"))), vec!["inner"]);
		}

		#[test]
		fn test_paths_are_not_bindings() {
			assert!(bindings(&pat("None")).is_empty());
			assert!(bindings(&pat("MAX")).is_empty());
			assert!(bindings(&pat("Ordering::Less")).is_empty());
			assert_eq!(names(bindings(&pat("Some(value)"))), vec!["value"]);
		}

		#[test]
		fn test_subpattern() {
			assert_eq!(names(bindings(&pat("whole @ Some(part)"))), vec!["whole", "part"]);
		}

		#[test]
		fn test_or_uses_first_alternative() {
			assert_eq!(names(bindings(&pat("Ok(n) | Err(n)"))), vec!["n"]);
		}
	}

	mod conditions {
		use super::*;

		#[test]
		fn test_let_chain() {
			let expr: ExprIf = parse_quote!(if let Some(a) = first && ready && let Ok(b) = second(a) {});
			assert_eq!(names(condition_bindings(&expr.cond)), vec!["a", "b"]);
		}

		#[test]
		fn test_plain_condition() {
			let cond: Expr = parse_quote!(count > 3);
			assert!(condition_bindings(&cond).is_empty());
		}
	}

	mod assignments {
		use super::*;

		#[test]
		fn test_places() {
			assert_eq!(names(assigned(&parse_quote!(total = 1))), vec!["total"]);
			assert_eq!(names(assigned(&parse_quote!(total += 1))), vec!["total"]);
			assert_eq!(names(assigned(&parse_quote!(point.x = 1))), vec!["point"]);
			assert_eq!(names(assigned(&parse_quote!(grid[row][col] = 1))), vec!["grid"]);
			assert_eq!(names(assigned(&parse_quote!(*cursor = 1))), vec!["cursor"]);
			assert_eq!(names(assigned(&parse_quote!((a, b) = (b, a)))), vec!["a", "b"]);
		}

		#[test]
		fn test_not_assignments() {
			assert!(assigned(&parse_quote!(total + 1)).is_empty());
			assert!(assigned(&parse_quote!(values.push(1))).is_empty());
			assert!(assigned(&parse_quote!(crate::COUNTER = 1)).is_empty());
		}
	}
}
