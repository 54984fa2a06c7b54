//! Build a text with variables, encode it, and expand it again.
use tokentext::{json, Payload, Text, TextBuilder};

fn greeting() -> Text<Payload<serde_json::Value>> {
	let mut builder = TextBuilder::with_capacity(24, 2);
	builder.append_literal("Hello, ");
	builder.append_variable(Payload(serde_json::json!({
		"Type": "Variable",
		"VariableName": "name",
	})));
	builder.append_literal("! Today is ");
	builder.append_variable(Payload(serde_json::json!({
		"Type": "CurrentDate",
	})));
	builder.append_literal(".");
	builder.build()
}

fn describe(payload: &serde_json::Value) -> String {
	match payload["VariableName"].as_str() {
		Some(name) => format!("${name}"),
		None => format!("<{}>", payload["Type"].as_str().unwrap_or("?")),
	}
}

pub fn main() {
	let text = greeting();

	println!("Encoded text token string:");
	let mut document = serde_json::json!({ "WFTextActionText": text });
	println!("{}", serde_json::to_string_pretty(&document).unwrap());
	println!();

	println!("Expanded:");
	json::expand_token_strings(&mut document, describe).unwrap();
	println!("{}", document["WFTextActionText"]);
	println!();

	println!("Without variables:");
	let plain: Text<Payload<serde_json::Value>> = Text::new("Hello, world!");
	println!("{}", serde_json::to_string(&plain).unwrap());
}
