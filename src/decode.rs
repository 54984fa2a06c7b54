//! Deserialization of [`Text`] values.

use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::de::{Error as _, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::encode::{SerializationType, SERIALIZATION_TYPE_KEY, VALUE_KEY};
use crate::error::{DuplicateRange, Error, NotAPlaceholder};
use crate::range::NsRange;
use crate::text::PLACEHOLDER_STR;
use crate::{Text, Variable};

#[derive(Deserialize)]
#[serde(field_identifier)]
enum Field {
	#[serde(rename = "WFSerializationType")]
	SerializationType,

	#[serde(rename = "Value")]
	Value,

	#[serde(other)]
	Other,
}

/// The nested value of the expanded encoding, with attachments still keyed by their range text.
#[derive(Deserialize)]
pub(crate) struct RawTokenValue<P> {
	string: String,

	#[serde(rename = "attachmentsByRange", default = "IndexMap::new")]
	attachments: IndexMap<String, P>,
}

impl<P> RawTokenValue<P> {
	/// Resolve the attachment ranges and wrap the payloads into variables.
	pub(crate) fn into_text<V: From<P>>(self) -> Result<Text<V>, Error> {
		let mut variables_by_range = IndexMap::with_capacity(self.attachments.len());
		for (key, payload) in self.attachments {
			let ns_range: NsRange = key.parse()?;
			let range = ns_range.checked_byte_range(&self.string)?;
			let found = &self.string[range.clone()];
			if found != PLACEHOLDER_STR {
				log::debug!("attachment {} covers {:?} instead of a placeholder", ns_range, found);
				return Err(NotAPlaceholder {
					location: ns_range.location,
					length: ns_range.length,
					found: found.to_owned(),
				}
				.into());
			}
			if variables_by_range.insert(range, V::from(payload)).is_some() {
				log::debug!("attachment {} is listed more than once", ns_range);
				return Err(DuplicateRange {
					location: ns_range.location,
					length: ns_range.length,
				}
				.into());
			}
		}
		variables_by_range.sort_by(|a, _, b, _| a.start.cmp(&b.start));

		// An expanded text without attachments must stay expanded when it is encoded again.
		let allows_raw_encoding = !variables_by_range.is_empty();
		Ok(Text::from_parts(self.string, variables_by_range).with_raw_encoding(allows_raw_encoding))
	}
}

struct TextVisitor<V> {
	_variable: PhantomData<fn() -> V>,
}

impl<'de, V> Visitor<'de> for TextVisitor<V>
where
	V: Variable + From<V::Value>,
	V::Value: Deserialize<'de> + Sized,
{
	type Value = Text<V>;

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("a string or a text token string")
	}

	fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
	where
		E: serde::de::Error,
	{
		Ok(Text::new(v))
	}

	fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
	where
		E: serde::de::Error,
	{
		Ok(Text::new(v))
	}

	fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
	where
		A: MapAccess<'de>,
	{
		let mut kind: Option<SerializationType> = None;
		let mut value: Option<RawTokenValue<V::Value>> = None;
		while let Some(field) = map.next_key::<Field>()? {
			match field {
				Field::SerializationType => {
					if kind.is_some() {
						return Err(A::Error::duplicate_field(SERIALIZATION_TYPE_KEY));
					}
					kind = Some(map.next_value()?);
				},
				Field::Value => {
					if value.is_some() {
						return Err(A::Error::duplicate_field(VALUE_KEY));
					}
					value = Some(map.next_value()?);
				},
				Field::Other => {
					map.next_value::<IgnoredAny>()?;
				},
			}
		}

		let SerializationType::TextTokenString = kind.ok_or_else(|| A::Error::missing_field(SERIALIZATION_TYPE_KEY))?;
		let value = value.ok_or_else(|| A::Error::missing_field(VALUE_KEY))?;
		value.into_text().map_err(A::Error::custom)
	}
}

impl<'de, V> Deserialize<'de> for Text<V>
where
	V: Variable + From<V::Value>,
	V::Value: Deserialize<'de> + Sized,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_any(TextVisitor { _variable: PhantomData })
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use assert2::{assert, check, let_assert};
	use serde_json::json;

	use super::RawTokenValue;
	use crate::error::DuplicateRange;
	use crate::{Payload, Text, TextBuilder};

	type JsonText = Text<Payload<serde_json::Value>>;

	#[test]
	fn bare_string() {
		let_assert!(Ok(text) = serde_json::from_value::<JsonText>(json!("no vars")));
		check!(text == Text::new("no vars"));
		check!(text.is_raw_encodable());
	}

	#[test]
	fn expanded() {
		let_assert!(Ok(text) = serde_json::from_value::<JsonText>(json!({
			"Value": {
				"attachmentsByRange": {
					"{9, 1}": "second",
					"{0, 1}": "first",
				},
				"string": "\u{fffc} and \u{1F600} \u{fffc}",
			},
			"WFSerializationType": "WFTextTokenString",
		})));

		let mut builder = TextBuilder::new();
		builder.append_variable(Payload(json!("first")));
		builder.append_literal(" and \u{1F600} ");
		builder.append_variable(Payload(json!("second")));
		assert!(text == builder.build());

		let ranges: Vec<_> = text.variables().map(|(range, _)| range.clone()).collect();
		check!(ranges == [0..3, 13..16]);
	}

	#[test]
	fn round_trip_keeps_shape() {
		let text: JsonText = Text::new("no vars").with_raw_encoding(false);
		let encoded = serde_json::to_value(&text).unwrap();
		let_assert!(Ok(decoded) = serde_json::from_value::<JsonText>(encoded.clone()));
		check!(decoded == text);
		check!(!decoded.allows_raw_encoding());
		check!(serde_json::to_value(&decoded).unwrap() == encoded);
	}

	#[test]
	fn unknown_fields_are_ignored_and_attachments_are_optional() {
		let_assert!(Ok(text) = serde_json::from_value::<JsonText>(json!({
			"WFSerializationType": "WFTextTokenString",
			"Extra": [1, 2, 3],
			"Value": { "string": "plain" },
		})));
		check!(text.as_str() == "plain");
		check!(!text.has_variables());
	}

	#[test]
	fn missing_fields() {
		let_assert!(Err(e) = serde_json::from_value::<JsonText>(json!({
			"Value": { "string": "plain" },
		})));
		check!(e.to_string() == "missing field `WFSerializationType`");

		let_assert!(Err(e) = serde_json::from_value::<JsonText>(json!({
			"WFSerializationType": "WFTextTokenString",
		})));
		check!(e.to_string() == "missing field `Value`");
	}

	#[test]
	fn wrong_serialization_type() {
		let_assert!(Err(_) = serde_json::from_value::<JsonText>(json!({
			"WFSerializationType": "WFDictionaryFieldValue",
			"Value": { "string": "plain" },
		})));
	}

	#[test]
	fn invalid_attachments() {
		let_assert!(Err(e) = serde_json::from_value::<JsonText>(json!({
			"WFSerializationType": "WFTextTokenString",
			"Value": { "string": "\u{fffc}", "attachmentsByRange": { "0, 1": null } },
		})));
		check!(e.to_string() == r#"Invalid range "0, 1": expected an opening brace ('{')"#);

		let_assert!(Err(e) = serde_json::from_value::<JsonText>(json!({
			"WFSerializationType": "WFTextTokenString",
			"Value": { "string": "\u{fffc}", "attachmentsByRange": { "{1, 1}": null } },
		})));
		check!(e.to_string() == "Range {1, 1} does not fit in a string of length 1");

		let_assert!(Err(e) = serde_json::from_value::<JsonText>(json!({
			"WFSerializationType": "WFTextTokenString",
			"Value": { "string": "ab\u{fffc}", "attachmentsByRange": { "{0, 1}": null } },
		})));
		check!(e.to_string() == r#"Range {0, 1} does not cover a placeholder, found "a""#);

		let_assert!(Err(e) = serde_json::from_value::<JsonText>(json!({
			"WFSerializationType": "WFTextTokenString",
			"Value": { "string": "\u{fffc}", "attachmentsByRange": { "{0, 1}": "first", "{0,1}": "second" } },
		})));
		check!(e.to_string() == "Range {0, 1} has more than one attachment");
	}

	#[test]
	fn duplicate_range_error_keeps_the_range() {
		let raw = RawTokenValue::<u32> {
			string: "a\u{fffc}".into(),
			attachments: [("{1, 1}".to_owned(), 1), (" { 1 , 1 } ".to_owned(), 2)].into_iter().collect(),
		};
		let_assert!(Err(crate::Error::DuplicateRange(e)) = raw.into_text::<Payload<u32>>());
		check!(e == DuplicateRange { location: 1, length: 1 });
	}
}
