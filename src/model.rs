use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A person in the dataset. Only `id` carries identity; everything else is
/// display data and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub born: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub died: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Fields this crate does not use, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Person {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn born(&self) -> &str {
        self.born.as_deref().unwrap_or("")
    }

    pub fn died(&self) -> &str {
        self.died.as_deref().unwrap_or("")
    }

    pub fn photo(&self) -> &str {
        self.photo.as_deref().unwrap_or("")
    }
}

/// One entry of the `relationships` array exactly as written in the dataset.
///
/// Every field is optional: entries are classified (or dropped) later by the
/// relationship index, never rejected at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_field"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_field"
    )]
    pub parent: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_field"
    )]
    pub child: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_field"
    )]
    pub a: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_field"
    )]
    pub b: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// The entry as read, kept when it cannot be written back from the
    /// fields above (non-object entries, odd field types).
    #[serde(skip)]
    pub raw: Option<Value>,
}

impl RelationshipRecord {
    pub fn parent_child(parent: &str, child: &str) -> Self {
        Self {
            parent: Some(parent.to_string()),
            child: Some(child.to_string()),
            ..Default::default()
        }
    }

    pub fn spousal(kind: &str, a: &str, b: &str) -> Self {
        Self {
            kind: Some(kind.to_string()),
            a: Some(a.to_string()),
            b: Some(b.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpousalKind {
    Spouse,
    Partner,
}

impl SpousalKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "spouse" => Some(Self::Spouse),
            "partner" => Some(Self::Partner),
            _ => None,
        }
    }
}

/// A relationship after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship<'a> {
    ParentChild {
        parent: &'a str,
        child: &'a str,
    },
    Spousal {
        kind: SpousalKind,
        a: &'a str,
        b: &'a str,
    },
}

/// The whole genealogy snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(
        default,
        deserialize_with = "lenient_records",
        serialize_with = "serialize_records"
    )]
    pub relationships: Vec<RelationshipRecord>,
    /// Top-level keys besides the two lists, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|person| person.id == id)
    }

    pub fn person_mut(&mut self, id: &str) -> Option<&mut Person> {
        self.people.iter_mut().find(|person| person.id == id)
    }
}

/// Accepts strings and numbers as ids; anything else reads as absent.
fn lenient_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) if !text.is_empty() => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// Reads every entry. Entries that do not survive a read/write cycle keep
/// their source value in `raw`; unreadable ones become empty records that
/// classify as nothing.
fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<RelationshipRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut records = Vec::with_capacity(values.len());
    for (idx, value) in values.into_iter().enumerate() {
        let mut record = match serde_json::from_value::<RelationshipRecord>(value.clone()) {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(index = idx, "unreadable relationship entry kept as-is: {err}");
                RelationshipRecord::default()
            }
        };
        if serde_json::to_value(&record).ok().as_ref() != Some(&value) {
            record.raw = Some(value);
        }
        records.push(record);
    }
    Ok(records)
}

#[derive(Serialize)]
#[serde(untagged)]
enum RecordOut<'a> {
    Raw(&'a Value),
    Parsed(&'a RelationshipRecord),
}

fn serialize_records<S>(records: &[RelationshipRecord], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(records.iter().map(|record| match &record.raw {
        Some(raw) => RecordOut::Raw(raw),
        None => RecordOut::Parsed(record),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_and_odd_entries_are_tolerated() {
        let text = r#"{
            "people": [{"id": "a", "name": "Ann", "nickname": "An"}],
            "relationships": [
                {"parent": "a", "child": 7},
                {"type": "spouse", "a": "a", "b": null},
                42,
                "nope"
            ],
            "version": 3
        }"#;
        let dataset: Dataset = serde_json::from_str(text).unwrap();
        assert_eq!(dataset.people[0].name, "Ann");
        assert_eq!(dataset.people[0].extra["nickname"], "An");
        assert_eq!(dataset.extra["version"], 3);
        assert_eq!(dataset.relationships.len(), 4);
        assert_eq!(dataset.relationships[0].child.as_deref(), Some("7"));
        assert_eq!(dataset.relationships[1].b, None);
        assert_eq!(dataset.relationships[2], RelationshipRecord {
            raw: Some(serde_json::json!(42)),
            ..Default::default()
        });
    }

    #[test]
    fn unknown_content_survives_a_write() {
        let text = r#"{
            "people": [{"id": "a", "name": "Ann", "nickname": "An", "tags": ["x"]}],
            "relationships": [
                {"parent": "a", "child": 7, "note": "adopted"},
                {"parent": "a", "child": "b", "since": 1990},
                {"type": "spouse", "a": "a", "b": true},
                42
            ],
            "version": 3
        }"#;
        let original: Value = serde_json::from_str(text).unwrap();
        let mut dataset: Dataset = serde_json::from_str(text).unwrap();
        dataset.person_mut("a").unwrap().photo = Some("/p.png".to_string());

        let mut written = serde_json::to_value(&dataset).unwrap();
        assert_eq!(written["people"][0]["photo"], "/p.png");
        written["people"][0].as_object_mut().unwrap().remove("photo");
        assert_eq!(written, original);
        // Clean entries are written from their fields.
        assert_eq!(dataset.relationships[1].raw, None);
        assert_eq!(dataset.relationships[1].extra["since"], 1990);
    }

    #[test]
    fn empty_strings_read_as_absent() {
        let record: RelationshipRecord =
            serde_json::from_str(r#"{"parent": "", "child": "c"}"#).unwrap();
        assert_eq!(record.parent, None);
        assert_eq!(record.child.as_deref(), Some("c"));
    }

    #[test]
    fn spousal_kind_is_case_insensitive() {
        assert_eq!(SpousalKind::from_token("Spouse"), Some(SpousalKind::Spouse));
        assert_eq!(SpousalKind::from_token("PARTNER"), Some(SpousalKind::Partner));
        assert_eq!(SpousalKind::from_token("sibling"), None);
    }

    #[test]
    fn optional_person_fields_are_not_serialized_when_absent() {
        let json = serde_json::to_string(&Person::new("a", "Ann")).unwrap();
        assert_eq!(json, r#"{"id":"a","name":"Ann"}"#);
    }
}
