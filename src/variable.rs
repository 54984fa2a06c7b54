//! The variable seam between a [`Text`][crate::Text] and the document model.

use std::rc::Rc;
use std::sync::Arc;

/// Trait for types that can be embedded in a [`Text`][crate::Text] as a variable.
///
/// A text only records where each variable sits and serializes its [`value()`][Self::value].
/// Equality and hashing of variables are up to the implementing type.
pub trait Variable {
	/// The payload written to the attachments table when the text is encoded.
	type Value: ?Sized;

	/// Get the payload of the variable.
	fn value(&self) -> &Self::Value;
}

impl<T> Variable for &'_ T
where
	T: ?Sized + Variable,
{
	type Value = T::Value;

	#[inline(always)]
	fn value(&self) -> &Self::Value {
		T::value(self)
	}
}

impl<T> Variable for Box<T>
where
	T: ?Sized + Variable,
{
	type Value = T::Value;

	#[inline(always)]
	fn value(&self) -> &Self::Value {
		T::value(self)
	}
}

impl<T> Variable for Rc<T>
where
	T: ?Sized + Variable,
{
	type Value = T::Value;

	#[inline(always)]
	fn value(&self) -> &Self::Value {
		T::value(self)
	}
}

impl<T> Variable for Arc<T>
where
	T: ?Sized + Variable,
{
	type Value = T::Value;

	#[inline(always)]
	fn value(&self) -> &Self::Value {
		T::value(self)
	}
}

/// A variable that is nothing more than its payload.
///
/// Useful when decoding a document, where only the payload of each attachment is known.
///
/// # Example
/// ```rust
/// # use tokentext::{Payload, Variable};
/// let variable = Payload("ExtensionInput");
/// assert_eq!(*variable.value(), "ExtensionInput");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Payload<T>(pub T);

impl<T> Variable for Payload<T> {
	type Value = T;

	#[inline]
	fn value(&self) -> &Self::Value {
		&self.0
	}
}

impl<T> From<T> for Payload<T> {
	#[inline]
	fn from(other: T) -> Self {
		Self(other)
	}
}

#[cfg(test)]
mod test {
	use std::rc::Rc;
	use std::sync::Arc;
	use assert2::check;

	use super::*;

	#[derive(Debug, PartialEq, Eq, Hash)]
	struct Output {
		name: &'static str,
	}

	impl Variable for Output {
		type Value = str;

		fn value(&self) -> &str {
			self.name
		}
	}

	#[test]
	fn shared_variables_forward_the_payload() {
		let output = Output { name: "Clipboard" };
		check!(Variable::value(&&output) == "Clipboard");
		check!(Box::new(Output { name: "Clipboard" }).value() == "Clipboard");
		check!(Rc::new(Output { name: "Clipboard" }).value() == "Clipboard");
		check!(Arc::new(Output { name: "Clipboard" }).value() == "Clipboard");
	}

	#[test]
	fn payload_is_its_own_value() {
		let variable: Payload<u32> = 42.into();
		check!(*variable.value() == 42);
	}
}
