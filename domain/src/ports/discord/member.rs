use domain_shared::discord::{RoleId, UserId};
use std::collections::HashSet;

/// A guild member's current state as seen by the directory. The role set
/// never contains the guild's implicit everyone role.
#[derive(Debug, Clone)]
pub struct Member {
    pub user_id: UserId,
    pub display_name: String,
    pub is_bot: bool,
    pub role_ids: HashSet<RoleId>,
}
