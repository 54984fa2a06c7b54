//! Module containing error details.

/// An error that can occur while decoding a text token string.
///
/// Encoding a [`Text`][crate::Text] never produces this error:
/// errors from the serializer are passed through unchanged.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub enum Error {
	/// An attachment key is not a valid range.
	InvalidRange(InvalidRange),

	/// An attachment range does not fit in the string.
	RangeOutOfBounds(RangeOutOfBounds),

	/// An attachment range does not cover exactly one placeholder.
	NotAPlaceholder(NotAPlaceholder),

	/// Two attachment keys name the same range.
	DuplicateRange(DuplicateRange),
}

impl From<InvalidRange> for Error {
	fn from(other: InvalidRange) -> Self {
		Self::InvalidRange(other)
	}
}

impl From<RangeOutOfBounds> for Error {
	fn from(other: RangeOutOfBounds) -> Self {
		Self::RangeOutOfBounds(other)
	}
}

impl From<NotAPlaceholder> for Error {
	fn from(other: NotAPlaceholder) -> Self {
		Self::NotAPlaceholder(other)
	}
}

impl From<DuplicateRange> for Error {
	fn from(other: DuplicateRange) -> Self {
		Self::DuplicateRange(other)
	}
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::InvalidRange(e) => e.fmt(f),
			Self::RangeOutOfBounds(e) => e.fmt(f),
			Self::NotAPlaceholder(e) => e.fmt(f),
			Self::DuplicateRange(e) => e.fmt(f),
		}
	}
}

/// An attachment key is not a valid range.
///
/// Ranges are written as `{location, length}`.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct InvalidRange {
	/// The text that failed to parse.
	pub source: String,

	/// The byte offset within `source` where the error occurs.
	pub position: usize,

	/// A human readable message about what was expected instead.
	pub(crate) expected: &'static str,
}

impl InvalidRange {
	/// Get a human readable message to describe what was expected.
	pub fn expected(&self) -> &str {
		self.expected
	}

	/// Write source highlighting for the error location.
	///
	/// The highlighting ends with a newline.
	///
	/// Note: this function doesn't print anything if the source exceeds 60 characters in width.
	pub fn write_source_highlighting(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
		use unicode_width::UnicodeWidthStr;

		let line = self.source.as_str();
		if line.width() > 60 {
			return Ok(());
		}
		write!(f, "  {}\n  ", line)?;
		write_underline(f, line, self.position)?;
		writeln!(f)
	}

	/// Get source highlighting for the error location as a string.
	///
	/// The highlighting ends with a newline.
	pub fn source_highlighting(&self) -> String {
		let mut output = String::new();
		// Writing to a `String` can not fail.
		let _ = self.write_source_highlighting(&mut output);
		output
	}
}

impl std::error::Error for InvalidRange {}

impl std::fmt::Display for InvalidRange {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Invalid range {:?}: expected {}", self.source, self.expected)
	}
}

/// An attachment range does not fit in the string.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct RangeOutOfBounds {
	/// The start of the range in UTF-16 code units.
	pub location: usize,

	/// The length of the range in UTF-16 code units.
	pub length: usize,

	/// The length of the string in UTF-16 code units.
	pub string_length: usize,
}

impl std::error::Error for RangeOutOfBounds {}

impl std::fmt::Display for RangeOutOfBounds {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"Range {{{}, {}}} does not fit in a string of length {}",
			self.location, self.length, self.string_length,
		)
	}
}

/// An attachment range does not cover exactly one placeholder.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct NotAPlaceholder {
	/// The start of the range in UTF-16 code units.
	pub location: usize,

	/// The length of the range in UTF-16 code units.
	pub length: usize,

	/// The text covered by the range.
	pub found: String,
}

impl std::error::Error for NotAPlaceholder {}

impl std::fmt::Display for NotAPlaceholder {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"Range {{{}, {}}} does not cover a placeholder, found {:?}",
			self.location, self.length, self.found,
		)
	}
}

/// Two attachment keys name the same range.
///
/// Keys may be spelled differently and still parse to the same range, like `{0, 1}` and `{0,1}`.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct DuplicateRange {
	/// The start of the range in UTF-16 code units.
	pub location: usize,

	/// The length of the range in UTF-16 code units.
	pub length: usize,
}

impl std::error::Error for DuplicateRange {}

impl std::fmt::Display for DuplicateRange {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Range {{{}, {}}} has more than one attachment", self.location, self.length)
	}
}

fn write_underline(f: &mut impl std::fmt::Write, line: &str, position: usize) -> std::fmt::Result {
	use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
	let mut position = position.min(line.len());
	while !line.is_char_boundary(position) {
		position -= 1;
	}
	let spaces = line[..position].width();
	let carets = line[position..].chars().next().and_then(|c| c.width()).unwrap_or(1).max(1);
	write!(f, "{}", " ".repeat(spaces))?;
	write!(f, "{}", "^".repeat(carets))?;
	Ok(())
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use assert2::check;

	use super::*;

	#[test]
	fn highlighting_snaps_to_character_boundary() {
		let error = InvalidRange {
			source: "é}".into(),
			position: 1,
			expected: "a decimal number",
		};
		check!(error.source_highlighting() == concat!(
			"  é}\n",
			"  ^\n",
		));

		let error = InvalidRange {
			source: "{1".into(),
			position: 40,
			expected: "a comma (',')",
		};
		check!(error.source_highlighting() == concat!(
			"  {1\n",
			"    ^\n",
		));
	}

	#[test]
	fn duplicate_range_display() {
		let error = Error::from(DuplicateRange { location: 3, length: 1 });
		check!(error.to_string() == "Range {3, 1} has more than one attachment");
	}
}
