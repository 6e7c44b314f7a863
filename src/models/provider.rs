use serde::{Deserialize, Serialize};

pub const REGISTERED_STATE: &str = "Registered";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    #[serde(default)]
    pub id: String,
    pub namespace: String,
    #[serde(default)]
    pub registration_state: String,
}
