//! Ranges as the target document format writes them.

use std::ops::Range;

use crate::error::{InvalidRange, RangeOutOfBounds};

/// A range representation native to a target document format.
///
/// A [`Text`][crate::Text] records variable ranges as byte offsets into its string.
/// Before encoding, each range is converted with [`FormatRange::from_range()`],
/// and the [`Display`][std::fmt::Display] output is used as key in the attachments table.
pub trait FormatRange: std::fmt::Display {
	/// Convert a byte range over `string` into the format's own representation.
	///
	/// The range always lies on character boundaries of `string`.
	fn from_range(range: Range<usize>, string: &str) -> Self;
}

/// A range in the `NSRange` convention used by property list documents.
///
/// Both `location` and `length` count UTF-16 code units,
/// and the range is written as `{location, length}`.
///
/// # Example
/// ```rust
/// # use tokentext::NsRange;
/// let string = "😀 \u{fffc}";
/// let range = NsRange::from_byte_range(5..8, string);
/// assert_eq!(range, NsRange::new(3, 1));
/// assert_eq!(range.to_string(), "{3, 1}");
/// assert_eq!(range.to_byte_range(string), Some(5..8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NsRange {
	/// The start of the range in UTF-16 code units.
	pub location: usize,

	/// The length of the range in UTF-16 code units.
	pub length: usize,
}

impl NsRange {
	/// Create a range from a location and length in UTF-16 code units.
	#[inline]
	pub const fn new(location: usize, length: usize) -> Self {
		Self { location, length }
	}

	/// Convert a byte range over `string` into UTF-16 code units.
	///
	/// Bytes past the end of `string` are not counted.
	pub fn from_byte_range(range: Range<usize>, string: &str) -> Self {
		let mut location = 0;
		let mut length = 0;
		for (index, c) in string.char_indices() {
			if index < range.start {
				location += c.len_utf16();
			} else if index < range.end {
				length += c.len_utf16();
			} else {
				break;
			}
		}
		Self { location, length }
	}

	/// Convert the range back into a byte range over `string`.
	///
	/// Returns [`None`] if the range extends past the end of `string`
	/// or if either end falls inside a surrogate pair.
	pub fn to_byte_range(&self, string: &str) -> Option<Range<usize>> {
		let end = self.location.checked_add(self.length)?;
		let mut units = 0;
		let mut start_byte = None;
		for (index, c) in string.char_indices() {
			if units == self.location && start_byte.is_none() {
				start_byte = Some(index);
			}
			if units == end {
				return Some(start_byte?..index);
			}
			if units > end {
				return None;
			}
			units += c.len_utf16();
		}
		if units == self.location && start_byte.is_none() {
			start_byte = Some(string.len());
		}
		if units == end {
			return Some(start_byte?..string.len());
		}
		None
	}

	/// Convert the range back into a byte range over `string`, or report why it does not fit.
	pub(crate) fn checked_byte_range(&self, string: &str) -> Result<Range<usize>, RangeOutOfBounds> {
		self.to_byte_range(string).ok_or_else(|| RangeOutOfBounds {
			location: self.location,
			length: self.length,
			string_length: utf16_len(string),
		})
	}
}

impl FormatRange for NsRange {
	#[inline]
	fn from_range(range: Range<usize>, string: &str) -> Self {
		Self::from_byte_range(range, string)
	}
}

impl std::fmt::Display for NsRange {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{{{}, {}}}", self.location, self.length)
	}
}

impl std::str::FromStr for NsRange {
	type Err = InvalidRange;

	/// Parse a range written as `{location, length}`.
	///
	/// Whitespace is allowed around all tokens.
	fn from_str(source: &str) -> Result<Self, Self::Err> {
		let mut parser = Parser { source, position: 0 };
		parser.skip_whitespace();
		parser.expect(b'{', "an opening brace ('{')")?;
		let location = parser.number()?;
		parser.expect(b',', "a comma (',')")?;
		let length = parser.number()?;
		parser.expect(b'}', "a closing brace ('}')")?;
		parser.skip_whitespace();
		if parser.position != source.len() {
			return Err(parser.error("the end of the range"));
		}
		Ok(Self { location, length })
	}
}

/// Number of UTF-16 code units needed to encode `string`.
pub(crate) fn utf16_len(string: &str) -> usize {
	string.chars().map(char::len_utf16).sum()
}

struct Parser<'a> {
	source: &'a str,
	position: usize,
}

impl Parser<'_> {
	fn rest(&self) -> &[u8] {
		&self.source.as_bytes()[self.position..]
	}

	fn skip_whitespace(&mut self) {
		let skipped = self.rest().iter().take_while(|c| c.is_ascii_whitespace()).count();
		self.position += skipped;
	}

	fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), InvalidRange> {
		self.skip_whitespace();
		if self.rest().first() != Some(&byte) {
			return Err(self.error(expected));
		}
		self.position += 1;
		Ok(())
	}

	fn number(&mut self) -> Result<usize, InvalidRange> {
		self.skip_whitespace();
		let digits = self.rest().iter().take_while(|c| c.is_ascii_digit()).count();
		if digits == 0 {
			return Err(self.error("a decimal number"));
		}
		let text = &self.source[self.position..self.position + digits];
		let value = text.parse().map_err(|_| self.error("a number that fits in usize"))?;
		self.position += digits;
		Ok(value)
	}

	fn error(&self, expected: &'static str) -> InvalidRange {
		InvalidRange {
			source: self.source.to_owned(),
			position: self.position,
			expected,
		}
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use assert2::{assert, check, let_assert};

	use super::*;

	#[test]
	fn counts_utf16_code_units() {
		check!(NsRange::from_byte_range(7..10, "Hello, \u{fffc}!") == NsRange::new(7, 1));
		check!(NsRange::from_byte_range(4..7, "\u{1F600}\u{fffc}") == NsRange::new(2, 1));
		check!(NsRange::from_byte_range(2..5, "é\u{fffc}") == NsRange::new(1, 1));
		check!(NsRange::from_byte_range(0..0, "") == NsRange::new(0, 0));
	}

	#[test]
	fn back_to_byte_range() {
		check!(NsRange::new(7, 1).to_byte_range("Hello, \u{fffc}!") == Some(7..10));
		check!(NsRange::new(2, 1).to_byte_range("\u{1F600}\u{fffc}") == Some(4..7));
		check!(NsRange::new(3, 0).to_byte_range("abc") == Some(3..3));
		check!(NsRange::new(2, 2).to_byte_range("abc") == None);
		check!(NsRange::new(1, 1).to_byte_range("\u{1F600}") == None);
	}

	#[test]
	fn out_of_bounds_reports_string_length() {
		let_assert!(Err(e) = NsRange::new(4, 1).checked_byte_range("a\u{1F600}"));
		check!(e.string_length == 3);
		check!(e.to_string() == "Range {4, 1} does not fit in a string of length 3");
	}

	#[test]
	fn display() {
		check!(NsRange::new(7, 1).to_string() == "{7, 1}");
		check!(NsRange::new(0, 12).to_string() == "{0, 12}");
	}

	#[test]
	fn parse() {
		check!(let Ok(NsRange { location: 7, length: 1 }) = "{7, 1}".parse::<NsRange>());
		check!(let Ok(NsRange { location: 7, length: 1 }) = "{7,1}".parse::<NsRange>());
		check!(let Ok(NsRange { location: 12, length: 3 }) = " { 12 ,  3 } ".parse::<NsRange>());
	}

	#[test]
	fn parse_errors() {
		let_assert!(Err(e) = "7, 1}".parse::<NsRange>());
		assert!(e.position == 0);
		assert!(e.to_string() == r#"Invalid range "7, 1}": expected an opening brace ('{')"#);
		assert!(e.source_highlighting() == concat!(
			"  7, 1}\n",
			"  ^\n",
		));

		let_assert!(Err(e) = "{7 1}".parse::<NsRange>());
		assert!(e.expected() == "a comma (',')");
		assert!(e.source_highlighting() == concat!(
			"  {7 1}\n",
			"     ^\n",
		));

		let_assert!(Err(e) = "{7, x}".parse::<NsRange>());
		assert!(e.expected() == "a decimal number");
		assert!(e.position == 4);

		let_assert!(Err(e) = "{7, 1".parse::<NsRange>());
		assert!(e.expected() == "a closing brace ('}')");
		assert!(e.position == 5);

		let_assert!(Err(e) = "{7, 1} trailing".parse::<NsRange>());
		assert!(e.expected() == "the end of the range");
		assert!(e.position == 7);
	}
}
