//! Serialization of [`Text`] values.

use std::marker::PhantomData;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

use crate::range::{FormatRange, NsRange};
use crate::{Text, Variable};

/// Field name of the serialization type tag in the expanded encoding.
pub const SERIALIZATION_TYPE_KEY: &str = "WFSerializationType";

/// Field name of the nested value in the expanded encoding.
pub const VALUE_KEY: &str = "Value";

/// Field name of the string in the nested value.
pub const STRING_KEY: &str = "string";

/// Field name of the attachments table in the nested value.
pub const ATTACHMENTS_KEY: &str = "attachmentsByRange";

/// The serialization type tag of the expanded encoding, as written in documents.
pub const TEXT_TOKEN_STRING: &str = "WFTextTokenString";

/// The serialization type tag of the expanded encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerializationType {
	/// A string with attachments.
	#[serde(rename = "WFTextTokenString")]
	TextTokenString,
}

/// Serializable view of a [`Text`] that renders ranges with `R`.
///
/// Created by [`Text::encode_with()`].
/// The [`Serialize`] implementation of [`Text`] itself uses [`NsRange`].
pub struct Encode<'a, V, R> {
	text: &'a Text<V>,
	_range: PhantomData<fn() -> R>,
}

impl<V> Text<V> {
	/// Get a serializable view of the text that renders attachment ranges with `R`.
	///
	/// # Example
	/// ```rust
	/// # use tokentext::{NsRange, Payload, TextBuilder};
	/// let mut builder = TextBuilder::new();
	/// builder.append_variable(Payload("name"));
	/// let text = builder.build();
	///
	/// let encoded = serde_json::to_string(&text.encode_with::<NsRange>()).unwrap();
	/// assert_eq!(encoded, serde_json::to_string(&text).unwrap());
	/// ```
	#[inline]
	pub fn encode_with<R: FormatRange>(&self) -> Encode<'_, V, R> {
		Encode {
			text: self,
			_range: PhantomData,
		}
	}
}

impl<V, R> std::fmt::Debug for Encode<'_, V, R>
where
	V: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("Encode").field(self.text).finish()
	}
}

impl<V, R> Serialize for Encode<'_, V, R>
where
	V: Variable,
	V::Value: Serialize,
	R: FormatRange,
{
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		if self.text.is_raw_encodable() {
			log::trace!("encoding text as a bare string");
			return serializer.serialize_str(self.text.as_str());
		}

		log::trace!(
			"encoding text as a text token string with {} attachment(s)",
			self.text.variables_by_range().len()
		);
		let mut state = serializer.serialize_struct("Text", 2)?;
		state.serialize_field(SERIALIZATION_TYPE_KEY, &SerializationType::TextTokenString)?;
		state.serialize_field(VALUE_KEY, &TokenValue::<V, R> { text: self.text, _range: PhantomData })?;
		state.end()
	}
}

impl<V> Serialize for Text<V>
where
	V: Variable,
	V::Value: Serialize,
{
	#[inline]
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.encode_with::<NsRange>().serialize(serializer)
	}
}

/// The nested value of the expanded encoding.
struct TokenValue<'a, V, R> {
	text: &'a Text<V>,
	_range: PhantomData<fn() -> R>,
}

impl<V, R> Serialize for TokenValue<'_, V, R>
where
	V: Variable,
	V::Value: Serialize,
	R: FormatRange,
{
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut state = serializer.serialize_struct("Value", 2)?;
		state.serialize_field(STRING_KEY, self.text.as_str())?;
		state.serialize_field(ATTACHMENTS_KEY, &Attachments::<V, R> { text: self.text, _range: PhantomData })?;
		state.end()
	}
}

/// The attachments table: format ranges mapped to variable payloads.
struct Attachments<'a, V, R> {
	text: &'a Text<V>,
	_range: PhantomData<fn() -> R>,
}

impl<V, R> Serialize for Attachments<'_, V, R>
where
	V: Variable,
	V::Value: Serialize,
	R: FormatRange,
{
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let string = self.text.as_str();
		let mut map = serializer.serialize_map(Some(self.text.variables_by_range().len()))?;
		for (range, variable) in self.text.variables() {
			let key = R::from_range(range.clone(), string).to_string();
			map.serialize_entry(&key, variable.value())?;
		}
		map.end()
	}
}
