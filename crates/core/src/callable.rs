// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

/// A function or closure called with its arguments packed into a tuple.
///
/// Implemented for every `Fn` of up to eight parameters, so a wrapper can
/// forward `(a, b, c)` to `f(a, b, c)` without knowing the arity.
pub trait Callable<A> {
	type Output;

	fn call(&self, args: A) -> Self::Output;
}

macro_rules! impl_callable {
	($($arg:ident),*) => {
		impl<F, R, $($arg),*> Callable<($($arg,)*)> for F
		where
			F: Fn($($arg),*) -> R,
		{
			type Output = R;

			#[allow(non_snake_case)]
			fn call(&self, ($($arg,)*): ($($arg,)*)) -> R {
				self($($arg),*)
			}
		}
	};
}

impl_callable!();
impl_callable!(A1);
impl_callable!(A1, A2);
impl_callable!(A1, A2, A3);
impl_callable!(A1, A2, A3, A4);
impl_callable!(A1, A2, A3, A4, A5);
impl_callable!(A1, A2, A3, A4, A5, A6);
impl_callable!(A1, A2, A3, A4, A5, A6, A7);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8);
