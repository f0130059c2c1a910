//! Domain model for a guardian account and its roster of children.
use serde::{Deserialize, Serialize};

use super::child::Child;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    /// Unique across accounts
    pub phone: String,
    #[serde(default)]
    pub username: String,
    /// Salted password hash
    pub password: String,
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_child_id: Option<String>,
}

impl Account {
    pub fn generate_id() -> String {
        super::generate_id("user")
    }

    pub fn find_child(&self, child_id: &str) -> Option<&Child> {
        self.children.iter().find(|c| c.id == child_id)
    }

    pub fn find_child_mut(&mut self, child_id: &str) -> Option<&mut Child> {
        self.children.iter_mut().find(|c| c.id == child_id)
    }

    /// The selected child, falling back to the first child
    pub fn current_child(&self) -> Option<&Child> {
        self.current_child_id
            .as_deref()
            .and_then(|id| self.find_child(id))
            .or_else(|| self.children.first())
    }

    /// Child named by `child_id`, or the current child when none is given
    pub fn resolve_child(&self, child_id: Option<&str>) -> Option<&Child> {
        match child_id {
            Some(id) => self.find_child(id),
            None => self.current_child(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_with_children() -> Account {
        Account {
            id: "user::1".to_string(),
            phone: "13800000000".to_string(),
            username: "parent".to_string(),
            password: "hash".to_string(),
            children: vec![
                Child::new("child::a".to_string(), "A".to_string(), 2, None),
                Child::new("child::b".to_string(), "B".to_string(), 4, None),
            ],
            current_child_id: None,
        }
    }

    #[test]
    fn test_current_child_falls_back_to_first() {
        let mut account = account_with_children();
        assert_eq!(account.current_child().map(|c| c.id.as_str()), Some("child::a"));

        account.current_child_id = Some("child::b".to_string());
        assert_eq!(account.current_child().map(|c| c.id.as_str()), Some("child::b"));

        account.current_child_id = Some("child::gone".to_string());
        assert_eq!(account.current_child().map(|c| c.id.as_str()), Some("child::a"));
    }

    #[test]
    fn test_resolve_child_rejects_foreign_child() {
        let account = account_with_children();
        assert!(account.resolve_child(Some("child::other")).is_none());
        assert!(account.resolve_child(Some("child::b")).is_some());
    }
}
