use crate::ports::discord::Role;
use domain_shared::discord::RoleId;
use tracing::{instrument, warn};

/// One configured `"sourceRoleName:destRoleName"` pair, not yet resolved
/// against the live role catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePairSpec {
    pub source_name: String,
    pub dest_name: String,
}

impl RolePairSpec {
    /// Splits a configuration entry on the first colon, trimming both
    /// names. Entries without a colon are not a pair and yield `None`.
    pub fn parse(entry: &str) -> Option<Self> {
        let (source_name, dest_name) = entry.split_once(':')?;

        Some(Self {
            source_name: source_name.trim().to_string(),
            dest_name: dest_name.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub source_role_id: RoleId,
    pub source_name: String,
    pub dest_role_id: RoleId,
    pub dest_name: String,
}

/// Ordered source-role to destination-role correspondence. Each source role
/// id appears at most once; a destination role id may be the target of
/// several source roles. Rebuilt wholesale from the live catalogs on every
/// (re)load, never updated incrementally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMapping {
    entries: Vec<MappingEntry>,
}

impl RoleMapping {
    /// Resolves the configured pairs against both catalogs. Pairs whose
    /// name fails to resolve on either side are skipped with a warning;
    /// an empty result is valid.
    #[instrument(level = "debug", skip_all)]
    pub fn build(pairs: &[RolePairSpec], source_catalog: &[Role], dest_catalog: &[Role]) -> Self {
        let mut mapping = Self::default();

        for pair in pairs {
            let source = find_role_by_name(source_catalog, &pair.source_name);
            let dest = find_role_by_name(dest_catalog, &pair.dest_name);

            let (Some(source), Some(dest)) = (source, dest) else {
                if source.is_none() {
                    warn!("Source role {:?} not found, skipping pair", pair.source_name);
                }
                if dest.is_none() {
                    warn!(
                        "Destination role {:?} not found, skipping pair",
                        pair.dest_name,
                    );
                }
                continue;
            };

            mapping.insert(MappingEntry {
                source_role_id: source.role_id,
                source_name: source.name.clone(),
                dest_role_id: dest.role_id,
                dest_name: dest.name.clone(),
            });
        }

        mapping
    }

    /// Last write wins per source role id, keeping the position of the
    /// first occurrence.
    fn insert(&mut self, entry: MappingEntry) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.source_role_id == entry.source_role_id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `limit` mapped name pairs for status reporting, plus the
    /// count of entries that did not fit.
    pub fn sample_pairs(&self, limit: usize) -> (Vec<(String, String)>, usize) {
        let samples = self
            .entries
            .iter()
            .take(limit)
            .map(|e| (e.source_name.clone(), e.dest_name.clone()))
            .collect();
        let truncated = self.entries.len().saturating_sub(limit);

        (samples, truncated)
    }
}

/// Exact-name lookup. Discord role names are not unique; ties resolve to
/// the lowest role id so the result does not depend on catalog order.
fn find_role_by_name<'a>(catalog: &'a [Role], name: &str) -> Option<&'a Role> {
    catalog
        .iter()
        .filter(|role| role.name == name)
        .min_by_key(|role| role.role_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_shared::discord::RoleRank;

    fn role(id: u64, name: &str) -> Role {
        Role {
            role_id: RoleId(id),
            name: name.to_string(),
            rank: RoleRank(1),
        }
    }

    fn pairs(entries: &[&str]) -> Vec<RolePairSpec> {
        entries.iter().filter_map(|e| RolePairSpec::parse(e)).collect()
    }

    #[test]
    fn parses_pair_on_first_colon_and_trims() {
        let pair = RolePairSpec::parse(" Supporter : Supporter: Synced ").unwrap();

        assert_eq!(pair.source_name, "Supporter");
        assert_eq!(pair.dest_name, "Supporter: Synced");
    }

    #[test]
    fn entry_without_colon_is_not_a_pair() {
        assert_eq!(RolePairSpec::parse("Supporter"), None);
    }

    #[test]
    fn resolves_configured_pairs_in_order() {
        let source_catalog = vec![role(1, "Supporter"), role(2, "VIP")];
        let dest_catalog = vec![role(10, "Supporter-Synced"), role(20, "VIP-Synced")];

        let mapping = RoleMapping::build(
            &pairs(&["Supporter:Supporter-Synced", "VIP:VIP-Synced"]),
            &source_catalog,
            &dest_catalog,
        );

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.entries()[0].source_role_id, RoleId(1));
        assert_eq!(mapping.entries()[0].dest_role_id, RoleId(10));
        assert_eq!(mapping.entries()[1].source_role_id, RoleId(2));
        assert_eq!(mapping.entries()[1].dest_role_id, RoleId(20));
    }

    #[test]
    fn skips_pairs_that_do_not_resolve_on_either_side() {
        let source_catalog = vec![role(1, "Supporter")];
        let dest_catalog = vec![role(10, "Supporter-Synced")];

        let mapping = RoleMapping::build(
            &pairs(&[
                "Missing:Supporter-Synced",
                "Supporter:Missing",
                "Supporter:Supporter-Synced",
            ]),
            &source_catalog,
            &dest_catalog,
        );

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.entries()[0].dest_role_id, RoleId(10));
    }

    #[test]
    fn last_pair_wins_for_a_repeated_source_role() {
        let source_catalog = vec![role(1, "Supporter")];
        let dest_catalog = vec![role(10, "Bronze"), role(20, "Silver")];

        let mapping = RoleMapping::build(
            &pairs(&["Supporter:Bronze", "Supporter:Silver"]),
            &source_catalog,
            &dest_catalog,
        );

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.entries()[0].dest_role_id, RoleId(20));
    }

    #[test]
    fn duplicate_role_names_resolve_to_the_lowest_id() {
        let source_catalog = vec![role(5, "Supporter"), role(3, "Supporter")];
        let dest_catalog = vec![role(10, "Supporter-Synced")];

        let mapping = RoleMapping::build(
            &pairs(&["Supporter:Supporter-Synced"]),
            &source_catalog,
            &dest_catalog,
        );

        assert_eq!(mapping.entries()[0].source_role_id, RoleId(3));
    }

    #[test]
    fn no_valid_entries_yields_an_empty_mapping() {
        let mapping = RoleMapping::build(&pairs(&["no-colon-here"]), &[], &[]);

        assert!(mapping.is_empty());
        assert_eq!(mapping.len(), 0);
    }

    #[test]
    fn sample_pairs_truncate_past_the_limit() {
        let source_catalog: Vec<_> = (1..=4).map(|i| role(i, &format!("S{i}"))).collect();
        let dest_catalog: Vec<_> = (1..=4).map(|i| role(10 + i, &format!("D{i}"))).collect();
        let entries: Vec<String> = (1..=4).map(|i| format!("S{i}:D{i}")).collect();
        let entries: Vec<RolePairSpec> =
            entries.iter().filter_map(|e| RolePairSpec::parse(e)).collect();

        let mapping = RoleMapping::build(&entries, &source_catalog, &dest_catalog);
        let (samples, truncated) = mapping.sample_pairs(3);

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], ("S1".to_string(), "D1".to_string()));
        assert_eq!(truncated, 1);
    }
}
