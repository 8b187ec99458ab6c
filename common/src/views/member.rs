use serde::{Deserialize, Serialize};

/// A row of the manage-users table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommunityMember {
    pub name: String,
    pub email: String,

    /// `false` while the member has been invited but not yet signed in.
    #[serde(default)]
    pub active: bool,

    /// Whether an admin has disabled the member's access.
    #[serde(default)]
    pub blocked: bool,
}

impl CommunityMember {
    pub fn display_name(&self) -> String {
        if self.active {
            self.name.clone()
        } else {
            format!("{} (invited)", self.name)
        }
    }
}
