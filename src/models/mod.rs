use serde::{Deserialize, Serialize};

/// Backend account object, returned under `data.account` on login/register.
///
/// Kept flexible so new profile fields don't break the client.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AccountInfo {
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// A grouping node. `parent_id` empty/absent means root; the backend does not
/// validate acyclicity, so the taxonomy layer defends against cycles.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Category {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

impl Category {
    /// Normalized parent reference: empty string behaves as absent.
    pub fn parent_ref(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.trim().is_empty())
    }

    pub fn is_root(&self) -> bool {
        self.parent_ref().is_none()
    }
}

/// A titled text record, optionally assigned to one category.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Prompt {
    pub id: String,
    pub title: String,
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub is_favorite: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

impl Prompt {
    /// Normalized category reference: empty string behaves as absent.
    pub fn category_ref(&self) -> Option<&str> {
        self.category_id.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RecentPrompt {
    pub prompt_id: String,
    pub title: String,
    pub last_opened_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_format_is_camel_case() {
        let json = r##"{
            "id": "c1",
            "name": "Work",
            "parentId": "c0",
            "color": "#ff8800",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-02T00:00:00Z"
        }"##;
        let c: Category = serde_json::from_str(json).expect("category should parse");
        assert_eq!(c.parent_id.as_deref(), Some("c0"));
        assert_eq!(c.color.as_deref(), Some("#ff8800"));
        assert!(c.description.is_none());
        assert_eq!(c.created_at, "2026-01-01T00:00:00Z");
    }

    #[test]
    fn category_without_parent_is_root() {
        let json = r#"{"id": "c1", "name": "Work"}"#;
        let c: Category = serde_json::from_str(json).expect("category should parse");
        assert!(c.is_root());
        assert!(c.parent_ref().is_none());
    }

    #[test]
    fn empty_string_parent_behaves_as_absent() {
        let json = r#"{"id": "c1", "name": "Work", "parentId": ""}"#;
        let c: Category = serde_json::from_str(json).expect("category should parse");
        assert!(c.is_root());
    }

    #[test]
    fn prompt_wire_format_defaults() {
        let json = r#"{"id": "p1", "title": "Greeting", "content": "Hello"}"#;
        let p: Prompt = serde_json::from_str(json).expect("prompt should parse");
        assert!(!p.is_favorite);
        assert!(p.tags.is_none());
        assert!(p.category_ref().is_none());
    }

    #[test]
    fn prompt_serializes_category_id_as_camel_case() {
        let p = Prompt {
            id: "p1".to_string(),
            title: "Greeting".to_string(),
            content: "Hello".to_string(),
            description: None,
            is_favorite: true,
            tags: Some(vec!["intro".to_string()]),
            category_id: Some("c2".to_string()),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let v = serde_json::to_value(&p).expect("should serialize");
        assert_eq!(v["categoryId"], "c2");
        assert_eq!(v["isFavorite"], true);
        assert!(v.get("description").is_none());
    }
}
