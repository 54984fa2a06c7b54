use std::ops::Range;

use indexmap::IndexMap;

use crate::text::{Text, PLACEHOLDER};

/// Builder that interleaves literal text and variables into a [`Text`].
///
/// Literal fragments are copied verbatim.
/// Each variable adds a single [`PLACEHOLDER`][crate::PLACEHOLDER] to the string and records its range.
///
/// The builder also implements [`std::fmt::Write`], so [`write!`] appends formatted literal text.
///
/// # Example
/// ```rust
/// # use tokentext::{Payload, Text, TextBuilder};
/// let mut builder = TextBuilder::with_capacity(8, 1);
/// builder.append_literal("Hello, ");
/// builder.append_variable(Payload("name"));
/// builder.append_literal("!");
/// let text: Text<_> = builder.build();
///
/// assert_eq!(text.as_str(), "Hello, \u{fffc}!");
/// assert_eq!(text.variables_by_range()[&(7..10)], Payload("name"));
/// ```
pub struct TextBuilder<V> {
	string: String,
	variables_by_range: IndexMap<Range<usize>, V>,
}

impl<V> TextBuilder<V> {
	/// Create an empty builder.
	#[inline]
	pub fn new() -> Self {
		Self::with_capacity(0, 0)
	}

	/// Create an empty builder with room for the given amount of literal text and variables.
	///
	/// The capacities are only hints: the builder grows as needed.
	pub fn with_capacity(literal_capacity: usize, interpolation_count: usize) -> Self {
		Self {
			string: String::with_capacity(literal_capacity + interpolation_count * PLACEHOLDER.len_utf8()),
			variables_by_range: IndexMap::with_capacity(interpolation_count),
		}
	}

	/// Append literal text.
	#[inline]
	pub fn append_literal(&mut self, literal: &str) -> &mut Self {
		self.string.push_str(literal);
		self
	}

	/// Append a variable.
	///
	/// This adds one placeholder to the string and attaches the variable to its range.
	pub fn append_variable(&mut self, variable: V) -> &mut Self {
		let start = self.string.len();
		self.string.push(PLACEHOLDER);
		self.variables_by_range.insert(start..self.string.len(), variable);
		self
	}

	/// Append the [`Display`][std::fmt::Display] output of a value as literal text.
	///
	/// The value does not become a variable.
	pub fn append_display<T>(&mut self, value: &T) -> &mut Self
	where
		T: std::fmt::Display + ?Sized,
	{
		self.append_literal(&value.to_string())
	}

	/// Get the string accumulated so far.
	#[inline]
	pub fn as_str(&self) -> &str {
		&self.string
	}

	/// Finish building the text.
	#[inline]
	pub fn build(self) -> Text<V> {
		Text::from_parts(self.string, self.variables_by_range)
	}
}

impl<V> Default for TextBuilder<V> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<V> std::fmt::Debug for TextBuilder<V>
where
	V: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TextBuilder")
			.field("string", &self.string)
			.field("variables_by_range", &self.variables_by_range)
			.finish()
	}
}

impl<V> std::fmt::Write for TextBuilder<V> {
	#[inline]
	fn write_str(&mut self, s: &str) -> std::fmt::Result {
		self.append_literal(s);
		Ok(())
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use std::fmt::Write;
	use assert2::{assert, check, let_assert};

	use super::*;
	use crate::text::PLACEHOLDER_STR;

	#[derive(Debug, Clone, PartialEq, Eq, Hash)]
	struct Var(&'static str);

	#[test]
	fn literals_only() {
		let mut builder = TextBuilder::<Var>::new();
		builder.append_literal("Hello").append_literal(", ").append_literal("world");
		let text = builder.build();
		check!(text.as_str() == "Hello, world");
		check!(!text.has_variables());
	}

	#[test]
	fn hello_scenario() {
		let mut builder = TextBuilder::with_capacity(8, 1);
		builder.append_literal("Hello, ");
		builder.append_variable(Var("V1"));
		builder.append_literal("!");
		let text = builder.build();

		check!(text.as_str() == "Hello, \u{fffc}!");
		check!(text.variables_by_range().len() == 1);
		let_assert!(Some(variable) = text.variables_by_range().get(&(7..10)));
		check!(variable == &Var("V1"));
		check!(!text.is_raw_encodable());
	}

	#[test]
	fn ranges_cover_placeholders_in_append_order() {
		let mut builder = TextBuilder::new();
		builder.append_variable(Var("a"));
		builder.append_literal("→ ünïcode ");
		builder.append_variable(Var("b"));
		builder.append_variable(Var("c"));
		builder.append_literal("\u{1F600}");
		builder.append_variable(Var("d"));
		let text = builder.build();

		check!(text.variables_by_range().len() == 4);
		let names: Vec<_> = text.variables().map(|(_, variable)| variable.0).collect();
		check!(names == ["a", "b", "c", "d"]);

		let mut previous_end = 0;
		for (range, _) in text.variables() {
			assert!(&text.as_str()[range.clone()] == PLACEHOLDER_STR);
			assert!(range.len() == PLACEHOLDER.len_utf8());
			assert!(range.start >= previous_end);
			previous_end = range.end;
		}
		check!(text.untracked_placeholders().count() == 0);
	}

	#[test]
	fn literal_placeholders_are_not_tracked() {
		let mut builder = TextBuilder::new();
		builder.append_literal(PLACEHOLDER_STR);
		builder.append_variable(Var("a"));
		let text = builder.build();

		check!(text.variables_by_range().len() == 1);
		check!(text.variables_by_range().contains_key(&(3..6)));
		check!(text.untracked_placeholders().collect::<Vec<_>>() == [0]);
	}

	#[test]
	fn display_values_are_literal() {
		let mut builder = TextBuilder::<Var>::new();
		builder.append_literal("count: ");
		builder.append_display(&42);
		builder.append_literal(", ratio: ");
		builder.append_display(&0.5);
		builder.append_literal(" ");
		builder.append_display("str");
		let_assert!(Ok(()) = write!(builder, " {}-{}", 1, true));
		let text: Text<Var> = builder.into();

		check!(text.as_str() == "count: 42, ratio: 0.5 str 1-true");
		check!(!text.has_variables());
	}

	#[test]
	fn builder_from_text() {
		let mut builder = Text::builder(0, 0);
		builder.append_variable(Var("a"));
		check!(builder.as_str() == PLACEHOLDER_STR);
		check!(builder.build().variables_by_range().len() == 1);
	}
}
