use std::hash::{Hash, Hasher};
use std::ops::Range;

use indexmap::IndexMap;

use crate::TextBuilder;

/// The character that marks the position of a variable in the string of a [`Text`].
///
/// This is U+FFFC OBJECT REPLACEMENT CHARACTER, which keeps the string displayable before substitution.
pub const PLACEHOLDER: char = '\u{fffc}';

/// The UTF-8 encoding of [`PLACEHOLDER`].
pub(crate) const PLACEHOLDER_STR: &str = "\u{fffc}";

/// Rich text: a string with variables attached to positions in it.
///
/// Each variable occupies exactly one [`PLACEHOLDER`] character in the string.
/// The ranges of those characters are recorded as byte ranges into the string,
/// so `&text.as_str()[range]` always gives the placeholder.
///
/// A text is created with [`Text::new()`] or with a [`TextBuilder`], and can not be modified afterwards.
///
/// Two texts are equal if their strings are equal and they attach equal variables at the same ranges.
/// The order in which the variables were recorded does not matter.
///
/// # Known ambiguity
/// Literal text may itself contain [`PLACEHOLDER`] characters.
/// These are kept as-is and are not tracked as variables,
/// but consumers of an encoded text can not tell them apart from real placeholders.
/// Use [`Text::untracked_placeholders()`] to find them.
#[derive(Clone)]
pub struct Text<V> {
	string: String,
	variables_by_range: IndexMap<Range<usize>, V>,
	allows_raw_encoding: bool,
}

impl<V> Text<V> {
	/// Create a text without any variables.
	#[inline]
	pub fn new(string: impl Into<String>) -> Self {
		Self {
			string: string.into(),
			variables_by_range: IndexMap::new(),
			allows_raw_encoding: true,
		}
	}

	/// Create a builder to interleave literal text and variables.
	///
	/// See [`TextBuilder::with_capacity()`] for the meaning of the arguments.
	#[inline]
	pub fn builder(literal_capacity: usize, interpolation_count: usize) -> TextBuilder<V> {
		TextBuilder::with_capacity(literal_capacity, interpolation_count)
	}

	/// Create a text from its parts.
	///
	/// The caller must ensure that every range covers exactly one placeholder.
	pub(crate) fn from_parts(string: String, variables_by_range: IndexMap<Range<usize>, V>) -> Self {
		Self {
			string,
			variables_by_range,
			allows_raw_encoding: true,
		}
	}

	/// Allow or disallow encoding the text as a bare string.
	///
	/// A text without variables is normally encoded as a plain string.
	/// Pass `false` to always use the expanded encoding, for a stable shape in generated documents.
	/// Texts with variables always use the expanded encoding.
	#[inline]
	#[must_use]
	pub fn with_raw_encoding(mut self, allowed: bool) -> Self {
		self.allows_raw_encoding = allowed;
		self
	}

	/// Get the string, including one placeholder per variable.
	#[inline]
	pub fn as_str(&self) -> &str {
		&self.string
	}

	/// Consume the text to get the string.
	#[inline]
	pub fn into_string(self) -> String {
		self.string
	}

	/// Get the variables, keyed by their byte range in the string.
	///
	/// The keys are UTF-8 byte offsets into [`as_str()`][Self::as_str], not character counts.
	/// The placeholder in `"Hello, \u{fffc}!"` sits at `7..10`, which is one character at position 7.
	/// Encoding converts each range with a [`FormatRange`][crate::FormatRange],
	/// so the attachments table counts characters in the document's own units, like `{7, 1}`.
	#[inline]
	pub fn variables_by_range(&self) -> &IndexMap<Range<usize>, V> {
		&self.variables_by_range
	}

	/// Iterate over the variables and their ranges, in the order they were appended.
	#[inline]
	pub fn variables(&self) -> indexmap::map::Iter<'_, Range<usize>, V> {
		self.variables_by_range.iter()
	}

	/// Check if any variables are attached to the text.
	#[inline]
	pub fn has_variables(&self) -> bool {
		!self.variables_by_range.is_empty()
	}

	/// Check if the text may be encoded as a bare string when it has no variables.
	#[inline]
	pub fn allows_raw_encoding(&self) -> bool {
		self.allows_raw_encoding
	}

	/// Check if the text will be encoded as a bare string.
	#[inline]
	pub fn is_raw_encodable(&self) -> bool {
		self.allows_raw_encoding && self.variables_by_range.is_empty()
	}

	/// Get the byte positions of placeholder characters that are not attached to a variable.
	///
	/// These come from literal text that happened to contain [`PLACEHOLDER`].
	pub fn untracked_placeholders(&self) -> impl Iterator<Item = usize> + '_ {
		memchr::memmem::find_iter(self.string.as_bytes(), PLACEHOLDER_STR.as_bytes())
			.filter(|&start| !self.variables_by_range.contains_key(&(start..start + PLACEHOLDER_STR.len())))
	}

	/// Expand the text by replacing each variable placeholder.
	///
	/// The function is called once for each variable, from left to right,
	/// and the returned text is inserted in place of the placeholder.
	/// Untracked placeholders are copied as-is.
	///
	/// # Example
	/// ```rust
	/// # use tokentext::{Payload, TextBuilder};
	/// let mut builder = TextBuilder::new();
	/// builder.append_literal("Hello, ");
	/// builder.append_variable(Payload("name"));
	/// builder.append_literal("!");
	/// let text = builder.build();
	///
	/// assert_eq!(text.expand(|variable| format!("<{}>", variable.0)), "Hello, <name>!");
	/// ```
	pub fn expand<F, S>(&self, mut func: F) -> String
	where
		F: FnMut(&V) -> S,
		S: AsRef<str>,
	{
		let mut ranges: Vec<_> = self.variables_by_range.iter().collect();
		ranges.sort_by_key(|(range, _)| range.start);

		let mut output = String::with_capacity(self.string.len());
		let mut finger = 0;
		for (range, variable) in ranges {
			output.push_str(&self.string[finger..range.start]);
			output.push_str(func(variable).as_ref());
			finger = range.end;
		}
		output.push_str(&self.string[finger..]);
		output
	}
}

impl<V> std::fmt::Debug for Text<V>
where
	V: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Text")
			.field("string", &self.string)
			.field("variables_by_range", &self.variables_by_range)
			.field("allows_raw_encoding", &self.allows_raw_encoding)
			.finish()
	}
}

impl<V> std::fmt::Display for Text<V> {
	#[inline]
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.string)
	}
}

impl<V: PartialEq> PartialEq for Text<V> {
	fn eq(&self, other: &Self) -> bool {
		// `IndexMap` equality ignores insertion order.
		self.string == other.string && self.variables_by_range == other.variables_by_range
	}
}

impl<V: Eq> Eq for Text<V> {}

impl<V: Hash> Hash for Text<V> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.string.hash(state);
		state.write_usize(self.variables_by_range.len());

		// Hash in range order so the hash agrees with the order-independent equality.
		let mut entries: Vec<_> = self.variables_by_range.iter().collect();
		entries.sort_by_key(|(range, _)| (range.start, range.end));
		for (range, variable) in entries {
			range.hash(state);
			variable.hash(state);
		}
	}
}

impl<V> From<&str> for Text<V> {
	#[inline]
	fn from(other: &str) -> Self {
		Self::new(other)
	}
}

impl<V> From<String> for Text<V> {
	#[inline]
	fn from(other: String) -> Self {
		Self::new(other)
	}
}

impl<V> From<TextBuilder<V>> for Text<V> {
	#[inline]
	fn from(other: TextBuilder<V>) -> Self {
		other.build()
	}
}
