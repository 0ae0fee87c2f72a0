//! Entity ranking by computed totals.
//!
//! Rankings borrow the entity list and never reorder it in place. Sorts are
//! stable, so entities with equal totals keep their input order, and an
//! entity with no computed totals ranks as if every total were zero.

use sitebook_shared::types::{CounterpartyId, ProjectId};
use std::collections::HashMap;
use std::hash::Hash;

use crate::ledger::summary::{LedgerSummary, ProjectOutstanding, ProjectPosition};
use crate::records::{Counterparty, Project};

/// An entity paired with the totals it was ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<'a, T, S> {
    /// The ranked entity.
    pub entity: &'a T,
    /// Its totals (zero when none were computed).
    pub summary: S,
}

/// Stateless ranking over already-computed totals.
pub struct Ranking;

impl Ranking {
    /// Entities by outstanding, highest first.
    #[must_use]
    pub fn by_outstanding<'a, T, K>(
        entities: &'a [T],
        key: impl Fn(&T) -> K,
        summaries: &HashMap<K, LedgerSummary>,
    ) -> Vec<Ranked<'a, T, LedgerSummary>>
    where
        K: Eq + Hash,
    {
        let mut ranked = Self::attach(entities, key, summaries);
        ranked.sort_by(|a, b| b.summary.outstanding.cmp(&a.summary.outstanding));
        ranked
    }

    /// Vendors or customers by outstanding, highest first.
    #[must_use]
    pub fn counterparties_by_outstanding<'a>(
        counterparties: &'a [Counterparty],
        summaries: &HashMap<CounterpartyId, LedgerSummary>,
    ) -> Vec<Ranked<'a, Counterparty, LedgerSummary>> {
        Self::by_outstanding(counterparties, |c| c.id, summaries)
    }

    /// Projects by combined (purchase minus sales) outstanding, highest first.
    #[must_use]
    pub fn projects_by_combined<'a>(
        projects: &'a [Project],
        outstanding: &HashMap<ProjectId, ProjectOutstanding>,
    ) -> Vec<Ranked<'a, Project, ProjectOutstanding>> {
        let mut ranked = Self::attach(projects, |p| p.id, outstanding);
        ranked.sort_by(|a, b| b.summary.combined.cmp(&a.summary.combined));
        ranked
    }

    /// Projects by balance, most negative first.
    #[must_use]
    pub fn projects_by_balance<'a>(
        projects: &'a [Project],
        positions: &HashMap<ProjectId, ProjectPosition>,
    ) -> Vec<Ranked<'a, Project, ProjectPosition>> {
        let mut ranked = Self::attach(projects, |p| p.id, positions);
        ranked.sort_by(|a, b| a.summary.balance.cmp(&b.summary.balance));
        ranked
    }

    fn attach<'a, T, K, S>(
        entities: &'a [T],
        key: impl Fn(&T) -> K,
        totals: &HashMap<K, S>,
    ) -> Vec<Ranked<'a, T, S>>
    where
        K: Eq + Hash,
        S: Copy + Default,
    {
        entities
            .iter()
            .map(|entity| Ranked {
                entity,
                summary: totals.get(&key(entity)).copied().unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ProjectStatus;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn counterparty(name: &str) -> Counterparty {
        Counterparty {
            id: CounterpartyId::new(),
            name: name.to_string(),
        }
    }

    fn project(name: &str) -> Project {
        Project {
            id: ProjectId::new(),
            name: name.to_string(),
            status: ProjectStatus::Active,
            group: None,
            company_name: None,
            order_number: None,
        }
    }

    fn owing(outstanding: Decimal) -> LedgerSummary {
        LedgerSummary {
            outstanding,
            ..LedgerSummary::default()
        }
    }

    #[test]
    fn test_counterparties_ranked_desc() {
        let list = vec![counterparty("A"), counterparty("B"), counterparty("C")];
        let summaries = HashMap::from([
            (list[0].id, owing(dec!(100))),
            (list[1].id, owing(dec!(500))),
            (list[2].id, owing(dec!(0))),
        ]);

        let ranked = Ranking::counterparties_by_outstanding(&list, &summaries);
        let names: Vec<&str> = ranked.iter().map(|r| r.entity.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        let total: LedgerSummary = ranked.iter().map(|r| r.summary).sum();
        assert_eq!(total.outstanding, dec!(600));
        // input untouched
        assert_eq!(list[0].name, "A");
    }

    #[test]
    fn test_ties_and_missing_keep_input_order() {
        let list = vec![counterparty("X"), counterparty("Y"), counterparty("Z")];
        let summaries = HashMap::from([(list[2].id, owing(dec!(10)))]);

        let ranked = Ranking::counterparties_by_outstanding(&list, &summaries);
        let names: Vec<&str> = ranked.iter().map(|r| r.entity.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "X", "Y"]);
        assert_eq!(ranked[1].summary, LedgerSummary::default());
    }

    #[test]
    fn test_projects_by_combined() {
        let list = vec![project("North"), project("South")];
        let totals = HashMap::from([
            (list[0].id, ProjectOutstanding::new(dec!(100), dec!(300))),
            (list[1].id, ProjectOutstanding::new(dec!(50), dec!(0))),
        ]);

        let ranked = Ranking::projects_by_combined(&list, &totals);
        assert_eq!(ranked[0].entity.name, "South");
        assert_eq!(ranked[0].summary.combined, dec!(50));
        assert_eq!(ranked[1].summary.combined, dec!(-200));
    }

    #[test]
    fn test_projects_by_balance() {
        let list = vec![project("North"), project("South")];
        let positions = HashMap::from([
            (
                list[0].id,
                ProjectPosition {
                    expenses: dec!(0),
                    received: dec!(10),
                    balance: dec!(10),
                },
            ),
            (
                list[1].id,
                ProjectPosition {
                    expenses: dec!(40),
                    received: dec!(0),
                    balance: dec!(-40),
                },
            ),
        ]);

        let ranked = Ranking::projects_by_balance(&list, &positions);
        assert_eq!(ranked[0].entity.name, "South");
    }

    #[test]
    fn test_empty_ranking() {
        let ranked = Ranking::counterparties_by_outstanding(&[], &HashMap::new());
        assert!(ranked.is_empty());
    }
}
