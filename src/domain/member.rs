use chrono::{DateTime, Utc};

use super::{FormError, MemberId};

#[derive(serde::Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Fields written when a member is created. `createdAt` is filled in by the store.
#[derive(serde::Serialize, Debug, PartialEq, Clone)]
pub struct NewMember {
    name: String,
}

impl NewMember {
    pub fn parse(name: &str) -> Result<Self, FormError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FormError::BlankName);
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }
}
