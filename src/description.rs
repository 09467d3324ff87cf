//! Issue descriptions.
//!
//! The tracker returns either a plain string or a rich-text document: a tree of nodes where leaves
//! carry `text` and containers carry `content`. We only ever need the plain text out of it.

use serde_json::Value;

pub const DESCRIPTION_PLACEHOLDER: &str = "No description provided";
pub const MAX_DESCRIPTION_CHARS: usize = 200;
const ELLIPSIS: &str = "...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RichNode {
	Text(String),
	Container(Vec<RichNode>),
}

impl RichNode {
	/// Builds the node tree from the raw JSON. Nodes that are neither text nor containers are dropped.
	pub fn from_value(value: &Value) -> Option<Self> {
		let obj = value.as_object()?;
		if obj.get("type").and_then(Value::as_str) == Some("text") {
			return obj.get("text").and_then(Value::as_str).map(|t| RichNode::Text(t.to_string()));
		}
		let children = match obj.get("content") {
			Some(Value::Array(items)) => items.iter().filter_map(RichNode::from_value).collect(),
			Some(_) => return None,
			None => Vec::new(),
		};
		Some(RichNode::Container(children))
	}

	/// All text leaves, depth-first, joined by single spaces.
	pub fn plain_text(&self) -> String {
		let mut parts = Vec::new();
		let mut stack = vec![self];
		while let Some(node) = stack.pop() {
			match node {
				RichNode::Text(t) => parts.push(t.as_str()),
				RichNode::Container(children) => stack.extend(children.iter().rev()),
			}
		}
		parts.join(" ")
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Description {
	Plain(String),
	Rich(RichNode),
	/// Present on the issue, but in a shape we can't read.
	Unreadable,
}

impl Description {
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Null => None,
			Value::String(s) => Some(Description::Plain(s.clone())),
			Value::Object(_) => Some(RichNode::from_value(value).map_or(Description::Unreadable, Description::Rich)),
			_ => Some(Description::Unreadable),
		}
	}
}

/// Readable text of a description, truncated to [MAX_DESCRIPTION_CHARS].
/// `None` when there is nothing to show, which renders as [DESCRIPTION_PLACEHOLDER].
pub fn description_text(description: Option<&Description>) -> Option<String> {
	let text = match description? {
		Description::Plain(s) => s.clone(),
		Description::Rich(node) => node.plain_text(),
		Description::Unreadable => return None,
	};
	if text.trim().is_empty() {
		return None;
	}
	Some(truncate(&text, MAX_DESCRIPTION_CHARS))
}

fn truncate(s: &str, max_chars: usize) -> String {
	match s.char_indices().nth(max_chars) {
		Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &s[..byte_idx]),
		None => s.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use insta::assert_snapshot;
	use serde_json::json;

	use super::*;

	fn doc() -> Value {
		json!({
			"type": "doc",
			"version": 1,
			"content": [
				{ "type": "paragraph", "content": [
					{ "type": "text", "text": "Fix login" },
					{ "type": "text", "text": "redirect", "marks": [{ "type": "strong" }] }
				]},
				{ "type": "bulletList", "content": [
					{ "type": "listItem", "content": [
						{ "type": "paragraph", "content": [{ "type": "text", "text": "on Safari" }] }
					]}
				]},
				{ "type": "rule" }
			]
		})
	}

	#[test]
	fn test_rich_text_flattening() {
		let description = Description::from_value(&doc()).unwrap();
		assert_snapshot!(description_text(Some(&description)).unwrap(), @"Fix login redirect on Safari");
	}

	#[test]
	fn test_truncation() {
		let long = "a".repeat(250);
		let formatted = description_text(Some(&Description::Plain(long))).unwrap();
		assert_eq!(formatted.chars().count(), MAX_DESCRIPTION_CHARS + 3);
		assert!(formatted.ends_with("..."));
		assert!(formatted.starts_with(&"a".repeat(200)));

		let exact = "b".repeat(200);
		assert_eq!(description_text(Some(&Description::Plain(exact.clone()))), Some(exact));

		let short = "short and sweet".to_string();
		assert_eq!(description_text(Some(&Description::Plain(short.clone()))), Some(short));
	}

	#[test]
	fn test_truncation_counts_chars_not_bytes() {
		let long = "é".repeat(201);
		let formatted = description_text(Some(&Description::Plain(long))).unwrap();
		assert_eq!(formatted, format!("{}...", "é".repeat(200)));
	}

	#[test]
	fn test_nothing_to_show() {
		assert_eq!(description_text(None), None);
		assert_eq!(Description::from_value(&Value::Null), None);
		assert_eq!(description_text(Some(&Description::Plain("  \n".into()))), None);
		assert_eq!(description_text(Description::from_value(&json!(42)).as_ref()), None);
		assert_eq!(description_text(Description::from_value(&json!({ "content": "nope" })).as_ref()), None);
		assert_eq!(description_text(Description::from_value(&json!({ "type": "doc", "content": [] })).as_ref()), None);
	}
}
