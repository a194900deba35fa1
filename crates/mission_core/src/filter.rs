use serde::{Deserialize, Serialize};

use crate::Language;

/// Search configuration submitted when a mission is launched.
///
/// Roles behave as a set that keeps selection order. The model does not
/// require a non-empty role set; the launcher checks that on submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterModel {
    roles: Vec<String>,
    location: String,
    language: Language,
}

impl Default for FilterModel {
    fn default() -> Self {
        Self {
            roles: vec!["Frontend Developer".to_string(), "Nurse".to_string()],
            location: "Germany".to_string(),
            language: Language::English,
        }
    }
}

impl FilterModel {
    pub fn new<I, S>(roles: I, location: impl Into<String>, language: Language) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut model = Self {
            roles: Vec::new(),
            location: location.into(),
            language,
        };
        for role in roles {
            let role = role.into();
            if !model.contains(&role) {
                model.roles.push(role);
            }
        }
        model
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_roles(&self) -> bool {
        !self.roles.is_empty()
    }

    /// Flips membership of `role`. Returns whether the role is selected afterwards.
    pub fn toggle(&mut self, role: &str) -> bool {
        if let Some(pos) = self.roles.iter().position(|r| r == role) {
            self.roles.remove(pos);
            false
        } else {
            self.roles.push(role.to_string());
            true
        }
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }
}
