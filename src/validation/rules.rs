//! Validation rules for transition tables.

use crate::core::State;
use crate::engine::{SecondaryDataMatch, Transition};
use crate::validation::violations::TableViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for custom table checks
pub type TableCheck<S, C> =
    Box<dyn Fn(&[Transition<S, C>]) -> Validation<(), NonEmptyVec<TableViolation>> + Send + Sync>;

/// Rules a transition table must satisfy.
/// Uses Validation to accumulate ALL violations.
pub struct TableRules<S: State, C> {
    secondary: SecondaryDataMatch,
    initial: Option<S>,
    checks: Vec<TableCheck<S, C>>,
}

impl<S: State, C> TableRules<S, C> {
    /// Rules checking for empty tables and shadowed rows.
    pub fn new() -> Self {
        Self {
            secondary: SecondaryDataMatch::Ignore,
            initial: None,
            checks: Vec::new(),
        }
    }

    /// Match policy the table will be searched with.
    pub fn secondary_match(mut self, secondary: SecondaryDataMatch) -> Self {
        self.secondary = secondary;
        self
    }

    /// Also report states that cannot be reached from `state`.
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&[Transition<S, C>]) -> Validation<(), NonEmptyVec<TableViolation>>
            + Send
            + Sync
            + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&[Transition<S, C>]) -> bool + Send + Sync + 'static,
        S: 'static,
        C: 'static,
    {
        let check = move |rows: &[Transition<S, C>]| {
            if predicate(rows) {
                Validation::success(())
            } else {
                Validation::fail(TableViolation::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.checks.push(Box::new(check));
        self
    }

    /// Check every rule, accumulating ALL violations.
    pub fn validate(
        &self,
        rows: &[Transition<S, C>],
    ) -> Validation<(), NonEmptyVec<TableViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<TableViolation>>> = Vec::new();

        if rows.is_empty() {
            checks.push(Validation::fail(TableViolation::EmptyTable));
        }

        let shadowed = shadowed_rows(rows, self.secondary);
        for &(row, shadowed_by) in &shadowed {
            checks.push(Validation::fail(TableViolation::ShadowedRow { row, shadowed_by }));
        }

        if let Some(initial) = self.initial {
            for state in unreachable_states(rows, initial, &shadowed) {
                checks.push(Validation::fail(TableViolation::UnreachableState {
                    state: state.name().to_string(),
                }));
            }
        }

        for check_fn in &self.checks {
            checks.push(check_fn(rows));
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

impl<S: State, C> Default for TableRules<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// `(row, earlier row with the same key)` for every row that can never fire.
fn shadowed_rows<S: State, C>(
    rows: &[Transition<S, C>],
    secondary: SecondaryDataMatch,
) -> Vec<(usize, usize)> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            rows[..index]
                .iter()
                .position(|earlier| earlier.same_key(row, secondary))
                .map(|earlier| (index, earlier))
        })
        .collect()
}

/// States named by the table that no live row leads to from `initial`,
/// in order of first appearance.
fn unreachable_states<S: State, C>(
    rows: &[Transition<S, C>],
    initial: S,
    shadowed: &[(usize, usize)],
) -> Vec<S> {
    let live: Vec<&Transition<S, C>> = rows
        .iter()
        .enumerate()
        .filter(|(index, _)| !shadowed.iter().any(|&(row, _)| row == *index))
        .map(|(_, row)| row)
        .collect();

    let mut reached = vec![initial];
    let mut frontier = 0;
    while frontier < reached.len() {
        let state = reached[frontier];
        frontier += 1;
        for row in live.iter().filter(|row| row.from == state) {
            if let Some(to) = row.to {
                if !reached.contains(&to) {
                    reached.push(to);
                }
            }
        }
    }

    let mut unreachable = Vec::new();
    for row in rows {
        for state in std::iter::once(row.from).chain(row.to) {
            if !reached.contains(&state) && !unreachable.contains(&state) {
                unreachable.push(state);
            }
        }
    }
    unreachable
}

/// Check a table with the default rules: no empty table, no shadowed rows.
///
/// # Example
///
/// ```rust
/// use cwsw::engine::{SecondaryDataMatch, Transition};
/// use cwsw::state_enum;
/// use cwsw::validation::validate_table;
///
/// state_enum! {
///     enum Light { Red, Green }
/// }
///
/// let rows: [Transition<Light, ()>; 2] = [
///     Transition::new(Light::Red, 1, 0, Light::Green),
///     Transition::new(Light::Red, 1, 0, Light::Red),
/// ];
///
/// assert!(validate_table(&rows, SecondaryDataMatch::Ignore).is_failure());
/// ```
pub fn validate_table<S: State, C>(
    rows: &[Transition<S, C>],
    secondary: SecondaryDataMatch,
) -> Validation<(), NonEmptyVec<TableViolation>> {
    TableRules::new().secondary_match(secondary).validate(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Red,
            Green,
            Yellow,
            Flashing,
        }
    }

    type Row = Transition<TestState, ()>;

    fn cycle() -> Vec<Row> {
        vec![
            Transition::new(TestState::Red, 1, 0, TestState::Green),
            Transition::new(TestState::Green, 1, 0, TestState::Yellow),
            Transition::new(TestState::Yellow, 1, 0, TestState::Red),
        ]
    }

    fn violations(result: Validation<(), NonEmptyVec<TableViolation>>) -> Vec<TableViolation> {
        match result {
            Validation::Failure(errors) => errors.iter().cloned().collect(),
            Validation::Success(_) => Vec::new(),
        }
    }

    #[test]
    fn clean_table_passes() {
        let rules = TableRules::new().initial(TestState::Red);
        assert!(rules.validate(&cycle()).is_success());
    }

    #[test]
    fn empty_table_fails() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(
            violations(validate_table(&rows, SecondaryDataMatch::Ignore)),
            vec![TableViolation::EmptyTable]
        );
    }

    #[test]
    fn duplicated_key_is_shadowed() {
        let mut rows = cycle();
        rows.push(Transition::new(TestState::Red, 1, 0, TestState::Flashing));
        rows.push(Transition::halt(TestState::Red, 1, 0));

        assert_eq!(
            violations(validate_table(&rows, SecondaryDataMatch::Ignore)),
            vec![
                TableViolation::ShadowedRow { row: 3, shadowed_by: 0 },
                TableViolation::ShadowedRow { row: 4, shadowed_by: 0 },
            ]
        );
    }

    #[test]
    fn secondary_data_distinguishes_rows_under_compare() {
        let rows: Vec<Row> = vec![
            Transition::new(TestState::Red, 1, 0, TestState::Green).with_data(1),
            Transition::new(TestState::Red, 1, 0, TestState::Yellow).with_data(2),
        ];

        assert!(validate_table(&rows, SecondaryDataMatch::Ignore).is_failure());
        assert!(validate_table(&rows, SecondaryDataMatch::Compare).is_success());
    }

    #[test]
    fn unreachable_states_are_reported_once() {
        let mut rows = cycle();
        rows.push(Transition::new(TestState::Flashing, 1, 0, TestState::Red));
        rows.push(Transition::new(TestState::Flashing, 2, 0, TestState::Flashing));

        let rules = TableRules::new().initial(TestState::Red);
        assert_eq!(
            violations(rules.validate(&rows)),
            vec![TableViolation::UnreachableState {
                state: "Flashing".to_string()
            }]
        );
    }

    #[test]
    fn shadowed_rows_do_not_make_states_reachable() {
        let mut rows = cycle();
        rows.push(Transition::new(TestState::Red, 1, 0, TestState::Flashing));

        let rules = TableRules::new().initial(TestState::Red);
        let found = violations(rules.validate(&rows));

        assert!(found.contains(&TableViolation::ShadowedRow { row: 3, shadowed_by: 0 }));
        assert!(found.contains(&TableViolation::UnreachableState {
            state: "Flashing".to_string()
        }));
    }

    #[test]
    fn custom_checks_accumulate() {
        let rules = TableRules::new()
            .require_pred(|rows: &[Row]| rows.len() > 5, "table too small".to_string())
            .require(|rows: &[Row]| {
                if rows.iter().all(|row| row.to.is_some()) {
                    Validation::fail(TableViolation::CustomCheckFailed {
                        message: "machine can never halt".to_string(),
                    })
                } else {
                    Validation::success(())
                }
            });

        let found = violations(rules.validate(&cycle()));
        assert_eq!(found.len(), 2);
    }
}
