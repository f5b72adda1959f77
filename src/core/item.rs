//! Input documents and derived output records

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Document `_id`. The source type is kept, so `"7"`, `7` and
/// `{"$oid": "7"}` are three different ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemId {
	ObjectId(String),
	Int(i64),
	Text(String),
	/// Any other value, as its JSON text
	Other(String),
}

impl ItemId {
	/// Short type tag used when canonicalising snapshots
	pub fn kind(&self) -> &'static str {
		match self {
			Self::ObjectId(_) => "oid",
			Self::Int(_) => "int",
			Self::Text(_) => "str",
			Self::Other(_) => "raw",
		}
	}
}

impl std::fmt::Display for ItemId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::ObjectId(hex) => write!(f, "ObjectId({})", hex),
			Self::Int(n) => write!(f, "{}", n),
			Self::Text(s) | Self::Other(s) => f.write_str(s),
		}
	}
}

impl From<&str> for ItemId {
	fn from(s: &str) -> Self {
		Self::Text(s.to_string())
	}
}

impl From<String> for ItemId {
	fn from(s: String) -> Self {
		Self::Text(s)
	}
}

impl From<i64> for ItemId {
	fn from(n: i64) -> Self {
		Self::Int(n)
	}
}

/// Accepts string ids, integer ids and extended-JSON `{"$oid": "..."}` ids
impl<'de> Deserialize<'de> for ItemId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = Value::deserialize(deserializer)?;
		Ok(match value {
			Value::String(s) => Self::Text(s),
			Value::Number(ref n) => n.as_i64().map_or_else(|| Self::Other(value.to_string()), Self::Int),
			Value::Object(ref map) => match map.get("$oid") {
				Some(Value::String(oid)) => Self::ObjectId(oid.clone()),
				_ => Self::Other(value.to_string()),
			},
			other => Self::Other(other.to_string()),
		})
	}
}

/// A single label read from the input collection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextItem {
	#[serde(rename = "_id")]
	pub id: ItemId,
	pub word: String,
}

impl TextItem {
	pub fn new(id: impl Into<ItemId>, word: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			word: word.into(),
		}
	}
}

/// `{word, weight}` where weight is the size of the word's group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationRecord {
	pub word: String,
	pub weight: u32,
}

/// Legacy `{word, group_number}` shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
	pub word: String,
	pub group_number: u32,
}

/// A document in the derived collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputRecord {
	Weighted(CorrelationRecord),
	Numbered(GroupRecord),
}

impl OutputRecord {
	pub fn word(&self) -> &str {
		match self {
			Self::Weighted(r) => &r.word,
			Self::Numbered(r) => &r.word,
		}
	}

	pub fn weight(&self) -> Option<u32> {
		match self {
			Self::Weighted(r) => Some(r.weight),
			Self::Numbered(_) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_item_id_forms() {
		let items: Vec<TextItem> = serde_json::from_str(
			r#"[
				{"_id": "a1", "word": "大根"},
				{"_id": 7, "word": "人参"},
				{"_id": {"$oid": "65f0c0ffee"}, "word": "白菜"}
			]"#,
		)
		.unwrap();

		assert_eq!(items[0].id, ItemId::Text("a1".into()));
		assert_eq!(items[1].id, ItemId::Int(7));
		assert_eq!(items[2].id, ItemId::ObjectId("65f0c0ffee".into()));
		assert_eq!(items[2].word, "白菜");
	}

	#[test]
	fn test_id_type_is_preserved() {
		let items: Vec<TextItem> = serde_json::from_str(
			r#"[
				{"_id": "7", "word": "x"},
				{"_id": 7, "word": "x"},
				{"_id": {"$oid": "7"}, "word": "x"},
				{"_id": 7.5, "word": "x"}
			]"#,
		)
		.unwrap();

		let kinds: Vec<&str> = items.iter().map(|i| i.id.kind()).collect();
		assert_eq!(kinds, vec!["str", "int", "oid", "raw"]);
		assert_ne!(items[0].id, items[1].id);
		assert_ne!(items[1].id, items[2].id);
		assert_eq!(items[2].id.to_string(), "ObjectId(7)");
	}

	#[test]
	fn test_output_shapes() {
		let weighted = OutputRecord::Weighted(CorrelationRecord {
			word: "りんご".into(),
			weight: 1,
		});
		let numbered = OutputRecord::Numbered(GroupRecord {
			word: "野菜".into(),
			group_number: 2,
		});

		assert_eq!(
			serde_json::to_string(&weighted).unwrap(),
			r#"{"word":"りんご","weight":1}"#
		);
		assert_eq!(
			serde_json::to_string(&numbered).unwrap(),
			r#"{"word":"野菜","group_number":2}"#
		);

		let back: OutputRecord = serde_json::from_str(r#"{"word":"野菜","group_number":2}"#).unwrap();
		assert_eq!(back, numbered);
		assert_eq!(back.weight(), None);
		assert_eq!(weighted.weight(), Some(1));
	}
}
