use crate::role_mapping::RoleMapping;
use domain_shared::discord::RoleId;
use std::collections::{BTreeSet, HashSet};

/// Destination-guild role ids to grant and to revoke for one member pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDiff {
    pub to_add: BTreeSet<RoleId>,
    pub to_remove: BTreeSet<RoleId>,
}

impl RoleDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes the role changes needed to make the destination member mirror
/// the mapped roles held by the source member. Both role sets must already
/// exclude the everyone role. Pure function; an empty mapping always
/// produces an empty diff.
///
/// A destination role is granted only while it is absent and revoked only
/// while it is present, so one invocation never emits both signals for the
/// same role id.
pub fn diff_member_roles(
    mapping: &RoleMapping,
    source_roles: &HashSet<RoleId>,
    dest_roles: &HashSet<RoleId>,
) -> RoleDiff {
    let mut diff = RoleDiff::default();

    for entry in mapping.entries() {
        let has_source = source_roles.contains(&entry.source_role_id);
        let has_dest = dest_roles.contains(&entry.dest_role_id);

        if has_source && !has_dest {
            diff.to_add.insert(entry.dest_role_id);
        } else if !has_source && has_dest {
            diff.to_remove.insert(entry.dest_role_id);
        }
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::discord::Role;
    use crate::role_mapping::RolePairSpec;
    use domain_shared::discord::RoleRank;

    fn role(id: u64, name: &str) -> Role {
        Role {
            role_id: RoleId(id),
            name: name.to_string(),
            rank: RoleRank(1),
        }
    }

    fn supporter_mapping() -> RoleMapping {
        RoleMapping::build(
            &[RolePairSpec::parse("Supporter:Supporter-Synced").unwrap()],
            &[role(1, "Supporter")],
            &[role(2, "Supporter-Synced")],
        )
    }

    fn ids(ids: &[u64]) -> HashSet<RoleId> {
        ids.iter().copied().map(RoleId).collect()
    }

    #[test]
    fn grants_the_mapped_role_when_only_the_source_role_is_held() {
        let diff = diff_member_roles(&supporter_mapping(), &ids(&[1]), &ids(&[]));

        assert_eq!(diff.to_add, ids(&[2]).into_iter().collect());
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn revokes_the_mapped_role_when_the_source_role_was_lost() {
        let diff = diff_member_roles(&supporter_mapping(), &ids(&[]), &ids(&[2]));

        assert!(diff.to_add.is_empty());
        assert_eq!(diff.to_remove, ids(&[2]).into_iter().collect());
    }

    #[test]
    fn converged_member_needs_no_changes() {
        let diff = diff_member_roles(&supporter_mapping(), &ids(&[1]), &ids(&[2]));

        assert!(diff.is_empty());
    }

    #[test]
    fn unmapped_roles_are_ignored() {
        let diff = diff_member_roles(&supporter_mapping(), &ids(&[7, 8]), &ids(&[9]));

        assert!(diff.is_empty());
    }

    #[test]
    fn empty_mapping_yields_an_empty_diff() {
        let diff = diff_member_roles(&RoleMapping::default(), &ids(&[1, 2, 3]), &ids(&[4]));

        assert!(diff.is_empty());
    }

    #[test]
    fn diff_is_deterministic_for_identical_inputs() {
        let mapping = supporter_mapping();
        let source = ids(&[1]);
        let dest = ids(&[]);

        let first = diff_member_roles(&mapping, &source, &dest);
        let second = diff_member_roles(&mapping, &source, &dest);

        assert_eq!(first, second);
    }

    #[test]
    fn held_dest_role_is_revoked_when_any_mapped_source_role_is_missing() {
        // Two source roles mapped onto one destination role; the member
        // holds one of them plus the destination role. The absent source
        // role drives a revoke, matching the reference behavior.
        let mapping = RoleMapping::build(
            &[
                RolePairSpec::parse("Gold:Perks").unwrap(),
                RolePairSpec::parse("Silver:Perks").unwrap(),
            ],
            &[role(1, "Gold"), role(2, "Silver")],
            &[role(10, "Perks")],
        );

        let diff = diff_member_roles(&mapping, &ids(&[1]), &ids(&[10]));

        assert!(diff.to_add.is_empty());
        assert_eq!(diff.to_remove, ids(&[10]).into_iter().collect());
    }
}
