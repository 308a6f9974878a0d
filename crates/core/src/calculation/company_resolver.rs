//! Groups a round table by company and orders each group chronologically.

use std::collections::HashMap;

use log::{debug, warn};

use super::calculation_model::{CalculationIssueKind, CalculationWarning};
use crate::rounds::{RoundRecord, RoundTable};

/// The rounds of one company, in sequence order.
#[derive(Debug, Clone)]
pub struct CompanyGroup {
    pub company: String,
    /// Positions in the source table, sorted by sequence
    pub positions: Vec<usize>,
    /// sequence -> index into `positions`
    sequence_index: HashMap<u32, usize>,
    /// Set when two rounds share a sequence number
    pub has_duplicates: bool,
}

impl CompanyGroup {
    fn new(company: String, mut positions: Vec<usize>, table: &RoundTable) -> (Self, Vec<u32>) {
        positions.sort_by_key(|&p| table.rounds()[p].sequence);

        let mut sequence_index = HashMap::with_capacity(positions.len());
        let mut duplicates = Vec::new();
        for (index, &position) in positions.iter().enumerate() {
            let sequence = table.rounds()[position].sequence;
            if sequence_index.insert(sequence, index).is_some() && !duplicates.contains(&sequence) {
                duplicates.push(sequence);
            }
        }

        let group = Self {
            company,
            positions,
            sequence_index,
            has_duplicates: !duplicates.is_empty(),
        };
        (group, duplicates)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Index within this group of the round with the given sequence.
    pub fn index_of(&self, sequence: u32) -> Option<usize> {
        self.sequence_index.get(&sequence).copied()
    }

    /// Clones this company's rounds out of the table, in sequence order.
    pub fn collect_rounds(&self, table: &RoundTable) -> Vec<RoundRecord> {
        self.positions
            .iter()
            .map(|&p| table.rounds()[p].clone())
            .collect()
    }
}

/// Companies of a table in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct ResolvedCompanies {
    pub groups: Vec<CompanyGroup>,
    pub warnings: Vec<CalculationWarning>,
}

impl ResolvedCompanies {
    /// Groups that can be recalculated.
    pub fn valid_groups(&self) -> impl Iterator<Item = &CompanyGroup> {
        self.groups.iter().filter(|g| !g.has_duplicates)
    }
}

/// Groups rounds by company, excluding the legacy `Total` marker rows.
///
/// Duplicate `(company, sequence)` pairs mark the company as structurally
/// invalid; a warning is attached to it and other companies are unaffected.
pub fn resolve_companies(table: &RoundTable) -> ResolvedCompanies {
    let mut order: Vec<String> = Vec::new();
    let mut positions_by_company: HashMap<String, Vec<usize>> = HashMap::new();

    for (position, round) in table.iter().enumerate() {
        if round.is_total_marker() {
            continue;
        }
        positions_by_company
            .entry(round.company.clone())
            .or_insert_with(|| {
                order.push(round.company.clone());
                Vec::new()
            })
            .push(position);
    }

    let mut resolved = ResolvedCompanies::default();
    for company in order {
        let positions = positions_by_company.remove(&company).unwrap_or_default();
        let (group, duplicates) = CompanyGroup::new(company, positions, table);

        for sequence in duplicates {
            let warning = CalculationWarning::new(
                CalculationIssueKind::StructuralViolation,
                group.company.clone(),
                Some(sequence),
                "Duplicate round number; company left as entered",
            );
            warn!("{}", warning);
            resolved.warnings.push(warning);
        }

        debug!(
            "Resolved company {} with {} rounds",
            group.company,
            group.len()
        );
        resolved.groups.push(group);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(company: &str, sequence: u32) -> RoundRecord {
        RoundRecord::new(company, sequence, "Round")
    }

    #[test]
    fn test_groups_by_company_in_first_appearance_order() {
        let table = RoundTable::new(vec![
            round("Beta", 2),
            round("Acme", 1),
            round("Beta", 1),
        ]);
        let resolved = resolve_companies(&table);

        let names: Vec<&str> = resolved.groups.iter().map(|g| g.company.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Acme"]);
        assert_eq!(resolved.groups[0].positions, vec![2, 0]);
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_total_rows_are_excluded() {
        let table = RoundTable::new(vec![round("Acme", 1), round("Total", 1)]);
        let resolved = resolve_companies(&table);
        assert_eq!(resolved.groups.len(), 1);
        assert_eq!(resolved.groups[0].company, "Acme");
    }

    #[test]
    fn test_index_of_sequence() {
        let table = RoundTable::new(vec![round("Acme", 3), round("Acme", 1), round("Acme", 2)]);
        let resolved = resolve_companies(&table);
        let group = &resolved.groups[0];
        assert_eq!(group.index_of(1), Some(0));
        assert_eq!(group.index_of(3), Some(2));
        assert_eq!(group.index_of(4), None);
    }

    #[test]
    fn test_duplicate_sequence_flags_only_that_company() {
        let table = RoundTable::new(vec![
            round("Acme", 1),
            round("Acme", 1),
            round("Beta", 1),
        ]);
        let resolved = resolve_companies(&table);

        assert!(resolved.groups[0].has_duplicates);
        assert!(!resolved.groups[1].has_duplicates);
        assert_eq!(resolved.valid_groups().count(), 1);
        assert_eq!(resolved.warnings.len(), 1);
        assert_eq!(
            resolved.warnings[0].kind,
            CalculationIssueKind::StructuralViolation
        );
        assert_eq!(resolved.warnings[0].company, "Acme");
    }

    #[test]
    fn test_empty_table() {
        let resolved = resolve_companies(&RoundTable::default());
        assert!(resolved.groups.is_empty());
    }
}
