//! Column resolution rules.
//!
//! Each output field owns an ordered list of [`Matcher`]s. For a given row
//! the first matcher that finds a non-empty cell decides the value.

use crate::model::{CellValue, NumericField, RawRow};

/// How a column label is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// The label equals this alias exactly.
    Exact(&'static str),
    /// The label contains any of these lowercase fragments, ignoring case.
    Contains(&'static [&'static str]),
}

impl Matcher {
    /// Check whether a label is accepted by this matcher.
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Matcher::Exact(alias) => label == *alias,
            Matcher::Contains(fragments) => {
                let lower = label.to_lowercase();
                fragments.iter().any(|f| lower.contains(f))
            }
        }
    }

    /// First non-empty cell in `row` whose label this matcher accepts.
    pub fn find<'r>(&self, row: &'r RawRow) -> Option<&'r CellValue> {
        match self {
            Matcher::Exact(alias) => row.get(alias),
            Matcher::Contains(_) => row
                .iter()
                .filter(|(label, _)| self.matches(label))
                .find_map(|(_, value)| value),
        }
    }
}

/// Prioritized matchers for one output field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRule {
    matchers: Vec<Matcher>,
}

impl ColumnRule {
    /// A rule trying the given aliases in order.
    pub fn exact(aliases: &[&'static str]) -> Self {
        Self {
            matchers: aliases.iter().map(|a| Matcher::Exact(*a)).collect(),
        }
    }

    /// Append a case-insensitive pattern tried after the existing matchers.
    pub fn or_contains(mut self, fragments: &'static [&'static str]) -> Self {
        self.matchers.push(Matcher::Contains(fragments));
        self
    }

    /// Matchers in evaluation order.
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Resolve the field's raw value for a row.
    ///
    /// Only empty cells are skipped: `0` or an empty string still wins.
    pub fn resolve<'r>(&self, row: &'r RawRow) -> Option<&'r CellValue> {
        self.matchers.iter().find_map(|m| m.find(row))
    }
}

/// The full set of rules mapping raw rows onto a
/// [`MaterialRecord`](crate::model::MaterialRecord).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
    material: ColumnRule,
    numeric: Vec<(NumericField, ColumnRule)>,
}

impl Default for FieldRules {
    fn default() -> Self {
        let material = ColumnRule::exact(&["Material", "material", "MAT"])
            .or_contains(&["material"])
            .or_contains(&["mat"]);

        let numeric = vec![
            (
                NumericField::Wavelength,
                ColumnRule::exact(&["Wavelength", "wavelength", "λ", "lambda"])
                    .or_contains(&["wavelength", "lambda", "λ"]),
            ),
            (NumericField::N, ColumnRule::exact(&["n"])),
            (NumericField::K, ColumnRule::exact(&["k"])),
            (
                NumericField::ReE,
                ColumnRule::exact(&["Re(ε)", "Re_e", "Re e", "Reeps"]),
            ),
            (
                NumericField::ImE,
                ColumnRule::exact(&["Im(ε)", "Im_e", "Im e", "Imeps"]),
            ),
            (NumericField::Q, ColumnRule::exact(&["Q"])),
            (NumericField::Pl, ColumnRule::exact(&["PL"])),
            (NumericField::Con, ColumnRule::exact(&["Con"])),
            (
                NumericField::QPl,
                ColumnRule::exact(&["Q_PL", "Q PL", "Q-PL"]),
            ),
            (
                NumericField::QCon,
                ColumnRule::exact(&["Q_con", "Q Con", "Q-con"]),
            ),
        ];

        Self { material, numeric }
    }
}

impl FieldRules {
    /// Rule for the material name.
    pub fn material(&self) -> &ColumnRule {
        &self.material
    }

    /// Rule for a numeric field.
    pub fn numeric(&self, field: NumericField) -> Option<&ColumnRule> {
        self.numeric
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, rule)| rule)
    }

    /// All numeric rules in output order.
    pub fn numeric_rules(&self) -> impl Iterator<Item = (NumericField, &ColumnRule)> {
        self.numeric.iter().map(|(f, rule)| (*f, rule))
    }

    /// Replace the rule for the material name.
    pub fn with_material(mut self, rule: ColumnRule) -> Self {
        self.material = rule;
        self
    }

    /// Replace (or add) the rule for a numeric field.
    pub fn with_numeric(mut self, field: NumericField, rule: ColumnRule) -> Self {
        match self.numeric.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = rule,
            None => self.numeric.push((field, rule)),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcher_case_insensitive() {
        let m = Matcher::Contains(&["wavelength", "lambda", "λ"]);
        assert!(m.matches("Wavelength (nm)"));
        assert!(m.matches("LAMBDA"));
        assert!(m.matches("Λ [µm]"));
        assert!(!m.matches("n"));

        assert!(Matcher::Exact("Q").matches("Q"));
        assert!(!Matcher::Exact("Q").matches("q"));
    }

    #[test]
    fn test_exact_aliases_in_priority_order() {
        let rule = ColumnRule::exact(&["Re(ε)", "Re_e"]);
        let row = RawRow::new().with("Re_e", 1.0).with("Re(ε)", 2.0);
        assert_eq!(rule.resolve(&row), Some(&CellValue::Number(2.0)));

        let row = RawRow::new().with_null("Re(ε)").with("Re_e", 1.0);
        assert_eq!(rule.resolve(&row), Some(&CellValue::Number(1.0)));
    }

    #[test]
    fn test_falsy_values_are_kept() {
        let rule = ColumnRule::exact(&["Q_PL", "Q PL"]);
        let row = RawRow::new().with("Q_PL", 0.0).with("Q PL", 5.0);
        assert_eq!(rule.resolve(&row), Some(&CellValue::Number(0.0)));

        let row = RawRow::new().with("Q_PL", "").with("Q PL", 5.0);
        assert_eq!(rule.resolve(&row), Some(&CellValue::text("")));
    }

    #[test]
    fn test_pattern_fallback_after_aliases() {
        let rules = FieldRules::default();
        let wavelength = rules.numeric(NumericField::Wavelength).unwrap();

        let row = RawRow::new()
            .with_null("Lambda [nm]")
            .with("Wavelength (nm)", 633.0);
        assert_eq!(wavelength.resolve(&row), Some(&CellValue::Number(633.0)));

        let row = RawRow::new().with("Wavelength (nm)", 1.0).with("lambda", 2.0);
        assert_eq!(wavelength.resolve(&row), Some(&CellValue::Number(2.0)));
    }

    #[test]
    fn test_material_prefers_material_over_mat() {
        let rules = FieldRules::default();
        let row = RawRow::new()
            .with("Substrate mat.", "Glass")
            .with("Film Material", "Gold");
        assert_eq!(rules.material().resolve(&row), Some(&CellValue::text("Gold")));

        let row = RawRow::new().with("Mat", "Silver");
        assert_eq!(rules.material().resolve(&row), Some(&CellValue::text("Silver")));
    }

    #[test]
    fn test_with_numeric_replaces_rule() {
        let rules = FieldRules::default().with_numeric(NumericField::N, ColumnRule::exact(&["n_eff"]));
        let row = RawRow::new().with("n", 1.0).with("n_eff", 1.5);
        assert_eq!(
            rules.numeric(NumericField::N).unwrap().resolve(&row),
            Some(&CellValue::Number(1.5))
        );
        assert_eq!(rules.numeric_rules().count(), NumericField::ALL.len());
    }

    #[test]
    fn test_with_material_replaces_rule() {
        let rule = ColumnRule::exact(&["Sample"]).or_contains(&["specimen"]);
        assert_eq!(
            rule.matchers(),
            &[Matcher::Exact("Sample"), Matcher::Contains(&["specimen"])]
        );

        let rules = FieldRules::default().with_material(rule);
        let row = RawRow::new()
            .with("Material", "Gold")
            .with("Specimen ID", "Au-01");
        assert_eq!(rules.material().resolve(&row), Some(&CellValue::text("Au-01")));
    }
}
