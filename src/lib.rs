//! Rich text with variables attached to positions in the string.
//!
//! Workflow documents store text that mixes literal characters with references to variables,
//! like the output of a previous action.
//! Such a text is a string with one placeholder character ([`PLACEHOLDER`], U+FFFC) per variable,
//! plus a table that maps the range of each placeholder to its variable.
//!
//! # Features
//!
//! * Build texts from literal fragments and variables with [`TextBuilder`].
//! * Serialize texts with [`serde`]:
//!   a text without variables is written as a bare string,
//!   a text with variables is written as a `WFTextTokenString` object with an attachments table.
//! * Deserialize both shapes back into a [`Text`].
//! * Extra, behind the `json` and `yaml` features: find and expand text token strings in whole JSON and YAML documents.
//!
//! Variables can be of any type that implements [`Variable`].
//! Only the payload returned by [`Variable::value()`] is written to the attachments table.
//!
//! # Examples
//!
//! A text without variables is encoded as a plain string.
//!
//! ```
//! # use tokentext::{Payload, Text};
//! let text: Text<Payload<u32>> = Text::new("no vars");
//! assert_eq!(serde_json::to_string(&text).unwrap(), r#""no vars""#);
//! ```
//!
//! A text with variables uses the expanded encoding,
//! where attachment ranges are written in UTF-16 code units as `{location, length}`.
//!
//! ```
//! # use tokentext::{Payload, TextBuilder};
//! let mut builder = TextBuilder::new();
//! builder.append_literal("Hello, ");
//! builder.append_variable(Payload("ExtensionInput"));
//! builder.append_literal("!");
//! let text = builder.build();
//!
//! assert_eq!(
//!   serde_json::to_value(&text).unwrap(),
//!   serde_json::json!({
//!     "WFSerializationType": "WFTextTokenString",
//!     "Value": {
//!       "string": "Hello, \u{fffc}!",
//!       "attachmentsByRange": { "{7, 1}": "ExtensionInput" },
//!     },
//!   }),
//! );
//! ```
//!
//! The expanded encoding can also be forced for texts without variables.
//!
//! ```
//! # use tokentext::{Payload, Text};
//! let text: Text<Payload<u32>> = Text::new("no vars").with_raw_encoding(false);
//! assert_eq!(
//!   serde_json::to_string(&text).unwrap(),
//!   r#"{"WFSerializationType":"WFTextTokenString","Value":{"string":"no vars","attachmentsByRange":{}}}"#,
//! );
//! ```
#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(feature = "doc-cfg", feature(doc_cfg))]

pub mod error;
pub use error::Error;

mod builder;
pub use builder::TextBuilder;

mod decode;

mod encode;
pub use encode::*;

mod features;
pub use features::*;

mod range;
pub use range::{FormatRange, NsRange};

mod text;
pub use text::{Text, PLACEHOLDER};

mod variable;
pub use variable::{Payload, Variable};
