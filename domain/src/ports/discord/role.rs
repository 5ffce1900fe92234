use domain_shared::discord::{RoleId, RoleRank};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub role_id: RoleId,
    pub name: String,
    pub rank: RoleRank,
}
