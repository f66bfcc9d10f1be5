//! Rule-based advisories for risky changes.
//!
//! Rules are independent and evaluated in a fixed order; every matching rule
//! contributes its advisory once.

use crate::domain::ChangeRecord;

pub const LARGE_CHANGE: &str =
    "Large code changes detected. Consider breaking changes into smaller units.";
pub const LOW_EXPERIENCE: &str =
    "Developer has limited experience with this codebase. Consider code review.";
pub const HIGH_COMPLEXITY: &str =
    "High code complexity detected. Consider refactoring for testability.";
pub const LOW_COVERAGE: &str = "Low test coverage. Consider adding more test cases.";

struct Rule {
    applies: fn(&ChangeRecord) -> bool,
    advisory: &'static str,
}

const RULES: [Rule; 4] = [
    Rule {
        applies: |c| c.code_churn > 200.0,
        advisory: LARGE_CHANGE,
    },
    Rule {
        applies: |c| c.author_experience < 5.0,
        advisory: LOW_EXPERIENCE,
    },
    Rule {
        applies: |c| c.complexity > 15.0,
        advisory: HIGH_COMPLEXITY,
    },
    Rule {
        applies: |c| c.coverage_percentage < 60.0,
        advisory: LOW_COVERAGE,
    },
];

/// Advisories for `change`, in rule order. Empty when nothing matches.
pub fn recommend(change: &ChangeRecord) -> Vec<String> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(change))
        .map(|rule| rule.advisory.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(churn: f64, experience: f64, complexity: f64, coverage: f64) -> ChangeRecord {
        ChangeRecord {
            test_name: "PaymentTest".to_string(),
            code_churn: churn,
            author_experience: experience,
            time_since_last_change: 4.0,
            coverage_percentage: coverage,
            complexity,
        }
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let recs = recommend(&change(250.0, 2.0, 20.0, 40.0));
        assert_eq!(
            recs,
            vec![LARGE_CHANGE, LOW_EXPERIENCE, HIGH_COMPLEXITY, LOW_COVERAGE]
        );
    }

    #[test]
    fn test_no_rules_fire() {
        assert!(recommend(&change(50.0, 12.0, 5.0, 85.0)).is_empty());
    }

    #[test]
    fn test_boundaries_are_strict() {
        // Exactly at each threshold: none of the strict comparisons match.
        assert!(recommend(&change(200.0, 5.0, 15.0, 60.0)).is_empty());
    }

    #[test]
    fn test_rules_are_independent() {
        assert_eq!(recommend(&change(201.0, 10.0, 1.0, 90.0)), vec![LARGE_CHANGE]);
        assert_eq!(recommend(&change(1.0, 10.0, 1.0, 59.9)), vec![LOW_COVERAGE]);
        assert_eq!(
            recommend(&change(1.0, 4.0, 16.0, 90.0)),
            vec![LOW_EXPERIENCE, HIGH_COMPLEXITY]
        );
    }
}
