use serde::{Deserialize, Serialize};

/// Signed-in principal as returned by Graph `/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            user_principal_name: None,
        }
    }

    /// Human-readable label, falling back to the object id.
    pub fn label(&self) -> &str {
        if !self.display_name.is_empty() {
            &self.display_name
        } else if let Some(upn) = self.user_principal_name.as_deref() {
            upn
        } else {
            &self.id
        }
    }
}
