//! Support for text token strings in YAML documents.
//!
//! These helpers are optional extras on top of encoding and decoding single texts,
//! and are only compiled with the `yaml` feature.
//! They walk a whole YAML document, so token strings can be inspected or flattened
//! without knowing where in the document they sit.

use serde::de::{DeserializeOwned, Error as _};
use serde::Deserialize;

use crate::decode::RawTokenValue;
use crate::encode::{SERIALIZATION_TYPE_KEY, TEXT_TOKEN_STRING, VALUE_KEY};
use crate::{Payload, Text, Variable};

/// Parse a struct from YAML data, after expanding all text token strings.
///
/// This function first parses the data into a [`serde_yaml::Value`],
/// then replaces every text token string with its expanded string,
/// and then parses it further into the desired type.
///
/// See [`expand_token_strings()`] for the meaning of `func`.
pub fn from_str<T, F, S>(data: &str, func: F) -> Result<T, Error>
where
	T: DeserializeOwned,
	F: FnMut(&serde_yaml::Value) -> S,
	S: AsRef<str>,
{
	let mut value: serde_yaml::Value = serde_yaml::from_str(data)?;
	expand_token_strings(&mut value, func)?;
	Ok(serde_yaml::from_value(value)?)
}

/// Decode all text token strings in a YAML value.
///
/// Only texts in the expanded encoding can be recognized.
/// Token strings are not searched for nested token strings.
pub fn find_token_strings<V>(value: &serde_yaml::Value) -> Result<Vec<Text<V>>, Error>
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

/// Replace all text token strings in a YAML value by their expanded string.
///
/// The function is called with the payload of each attachment,
/// and the returned text takes the place of the variable.
pub fn expand_token_strings<F, S>(value: &mut serde_yaml::Value, mut func: F) -> Result<(), Error>
where
	F: FnMut(&serde_yaml::Value) -> S,
	S: AsRef<str>,
{
	visit_token_strings_mut(value, &mut |token| {
		let text: Text<Payload<serde_yaml::Value>> = decode(token)?;
		*token = serde_yaml::Value::String(text.expand(|variable| func(&variable.0)));
		Ok(())
	})
}

/// Error for decoding text token strings in YAML data.
#[derive(Debug)]
pub enum Error {
	/// An error occurred while parsing YAML.
	Yaml(serde_yaml::Error),

	/// A text token string has invalid attachments.
	Text(crate::Error),
}

impl From<serde_yaml::Error> for Error {
	#[inline]
	fn from(other: serde_yaml::Error) -> Self {
		Self::Yaml(other)
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
			Error::Yaml(e) => std::fmt::Display::fmt(e, f),
			Error::Text(e) => std::fmt::Display::fmt(e, f),
		}
	}
}

/// Only untagged mappings are token strings, so tags around them are kept when expanding.
fn is_token_string(value: &serde_yaml::Value) -> bool {
	match value {
		serde_yaml::Value::Mapping(map) => {
			map.get(SERIALIZATION_TYPE_KEY).and_then(serde_yaml::Value::as_str) == Some(TEXT_TOKEN_STRING)
		},
		_ => false,
	}
}

fn decode<V>(token: &serde_yaml::Value) -> Result<Text<V>, Error>
where
	V: Variable + From<V::Value>,
	V::Value: DeserializeOwned + Sized,
{
	let value = token.get(VALUE_KEY).ok_or_else(|| serde_yaml::Error::missing_field(VALUE_KEY))?;
	let raw = RawTokenValue::<V::Value>::deserialize(value)?;
	Ok(raw.into_text()?)
}

/// Recursively apply a function to all text token strings in a YAML value.
fn visit_token_strings<F, E>(value: &serde_yaml::Value, fun: &mut F) -> Result<(), E>
where
	F: FnMut(&serde_yaml::Value) -> Result<(), E>,
{
	if is_token_string(value) {
		return fun(value);
	}
	match value {
		serde_yaml::Value::Null => Ok(()),
		serde_yaml::Value::Bool(_) => Ok(()),
		serde_yaml::Value::Number(_) => Ok(()),
		serde_yaml::Value::String(_) => Ok(()),
		serde_yaml::Value::Tagged(tagged) => visit_token_strings(&tagged.value, fun),
		serde_yaml::Value::Sequence(seq) => {
			for value in seq {
				visit_token_strings(value, fun)?;
			}
			Ok(())
		},
		serde_yaml::Value::Mapping(map) => {
			for (_key, value) in map.iter() {
				visit_token_strings(value, fun)?;
			}
			Ok(())
		},
	}
}

/// Recursively apply a function to all text token strings in a mutable YAML value.
fn visit_token_strings_mut<F, E>(value: &mut serde_yaml::Value, fun: &mut F) -> Result<(), E>
where
	F: FnMut(&mut serde_yaml::Value) -> Result<(), E>,
{
	if is_token_string(value) {
		return fun(value);
	}
	match value {
		serde_yaml::Value::Null => Ok(()),
		serde_yaml::Value::Bool(_) => Ok(()),
		serde_yaml::Value::Number(_) => Ok(()),
		serde_yaml::Value::String(_) => Ok(()),
		serde_yaml::Value::Tagged(tagged) => visit_token_strings_mut(&mut tagged.value, fun),
		serde_yaml::Value::Sequence(seq) => {
			for value in seq {
				visit_token_strings_mut(value, fun)?;
			}
			Ok(())
		},
		serde_yaml::Value::Mapping(map) => {
			for (_key, value) in map.iter_mut() {
				visit_token_strings_mut(value, fun)?;
			}
			Ok(())
		},
	}
}
