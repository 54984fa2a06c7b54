//! Support for text token strings in JSON documents.
//!
//! These helpers are optional extras on top of encoding and decoding single texts,
//! and are only compiled with the `json` feature.
//! They walk a whole JSON document, so token strings can be inspected or flattened
//! without knowing where in the document they sit.

use serde::de::{DeserializeOwned, Error as _};
use serde::Deserialize;

use crate::decode::RawTokenValue;
use crate::encode::{SERIALIZATION_TYPE_KEY, TEXT_TOKEN_STRING, VALUE_KEY};
use crate::{Payload, Text, Variable};

/// Parse a struct from JSON data, after expanding all text token strings.
///
/// This function first parses the data into a [`serde_json::Value`],
/// then replaces every text token string with its expanded string,
/// and then parses it further into the desired type.
///
/// See [`expand_token_strings()`] for the meaning of `func`.
pub fn from_str<T, F, S>(data: &str, func: F) -> Result<T, Error>
where
	T: DeserializeOwned,
	F: FnMut(&serde_json::Value) -> S,
	S: AsRef<str>,
{
	let mut value: serde_json::Value = serde_json::from_str(data)?;
	expand_token_strings(&mut value, func)?;
	Ok(T::deserialize(value)?)
}

/// Decode all text token strings in a JSON value.
///
/// Only texts in the expanded encoding can be recognized:
/// a plain JSON string may or may not have been a text.
/// Token strings are not searched for nested token strings.
pub fn find_token_strings<V>(value: &serde_json::Value) -> Result<Vec<Text<V>>, Error>
where
	V: Variable + From<V::Value>,
	V::Value: DeserializeOwned + Sized,
{
	let mut texts = Vec::new();
	visit_token_strings(value, &mut |token| -> Result<(), Error> {
		texts.push(decode(token)?);
		Ok(())
	})?;
	Ok(texts)
}

/// Replace all text token strings in a JSON value by their expanded string.
///
/// The function is called with the payload of each attachment,
/// and the returned text takes the place of the variable.
pub fn expand_token_strings<F, S>(value: &mut serde_json::Value, mut func: F) -> Result<(), Error>
where
	F: FnMut(&serde_json::Value) -> S,
	S: AsRef<str>,
{
	visit_token_strings_mut(value, &mut |token| {
		let text: Text<Payload<serde_json::Value>> = decode(token)?;
		*token = serde_json::Value::String(text.expand(|variable| func(&variable.0)));
		Ok(())
	})
}

/// Error for decoding text token strings in JSON data.
#[derive(Debug)]
pub enum Error {
	/// An error occurred while parsing JSON.
	Json(serde_json::Error),

	/// A text token string has invalid attachments.
	Text(crate::Error),
}

impl From<serde_json::Error> for Error {
	#[inline]
	fn from(other: serde_json::Error) -> Self {
		Self::Json(other)
	}
}

impl From<crate::Error> for Error {
	#[inline]
	fn from(other: crate::Error) -> Self {
		Self::Text(other)
	}
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
	#[inline]
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json(e) => std::fmt::Display::fmt(e, f),
			Self::Text(e) => std::fmt::Display::fmt(e, f),
		}
	}
}

fn is_token_string(value: &serde_json::Value) -> bool {
	value.get(SERIALIZATION_TYPE_KEY).and_then(serde_json::Value::as_str) == Some(TEXT_TOKEN_STRING)
}

fn decode<V>(token: &serde_json::Value) -> Result<Text<V>, Error>
where
	V: Variable + From<V::Value>,
	V::Value: DeserializeOwned + Sized,
{
	let value = token.get(VALUE_KEY).ok_or_else(|| serde_json::Error::missing_field(VALUE_KEY))?;
	let raw = RawTokenValue::<V::Value>::deserialize(value)?;
	Ok(raw.into_text()?)
}

/// Recursively apply a function to all text token strings in a JSON value.
fn visit_token_strings<F, E>(value: &serde_json::Value, fun: &mut F) -> Result<(), E>
where
	F: FnMut(&serde_json::Value) -> Result<(), E>,
{
	if is_token_string(value) {
		return fun(value);
	}
	match value {
		serde_json::Value::Null => Ok(()),
		serde_json::Value::Bool(_) => Ok(()),
		serde_json::Value::Number(_) => Ok(()),
		serde_json::Value::String(_) => Ok(()),
		serde_json::Value::Array(seq) => {
			for value in seq {
				visit_token_strings(value, fun)?;
			}
			Ok(())
		},
		serde_json::Value::Object(map) => {
			for value in map.values() {
				visit_token_strings(value, fun)?;
			}
			Ok(())
		},
	}
}

/// Recursively apply a function to all text token strings in a mutable JSON value.
fn visit_token_strings_mut<F, E>(value: &mut serde_json::Value, fun: &mut F) -> Result<(), E>
where
	F: FnMut(&mut serde_json::Value) -> Result<(), E>,
{
	if is_token_string(value) {
		return fun(value);
	}
	match value {
		serde_json::Value::Null => Ok(()),
		serde_json::Value::Bool(_) => Ok(()),
		serde_json::Value::Number(_) => Ok(()),
		serde_json::Value::String(_) => Ok(()),
		serde_json::Value::Array(seq) => {
			for value in seq {
				visit_token_strings_mut(value, fun)?;
			}
			Ok(())
		},
		serde_json::Value::Object(map) => {
			for value in map.values_mut() {
				visit_token_strings_mut(value, fun)?;
			}
			Ok(())
		},
	}
}
