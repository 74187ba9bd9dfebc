use serde::Serialize;

use super::table::{CellValue, RubricRow};

/// Name used when a row offers nothing usable as a criterion name.
pub const UNNAMED_CRITERION: &str = "Unnamed Criterion";

/// Weight applied when the weight cell is absent or unusable.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Logical rubric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    Keywords,
    Weight,
    MinWords,
    MaxWords,
}

/// Accepted column spellings per field, highest priority first. Column
/// matching is case-sensitive.
const FIELD_SYNONYMS: &[(Field, &[&str])] = &[
    (Field::Name, &["Criterion", "Criteria", "Parameter", "Aspect"]),
    (
        Field::Description,
        &["Description", "Criteria Description", "Detail", "Details"],
    ),
    (Field::Keywords, &["Keywords", "Keyword", "Key words", "KeyWords"]),
    (Field::Weight, &["Weight", "Weights", "MaxScore"]),
    (Field::MinWords, &["MinWords", "Min Words"]),
    (Field::MaxWords, &["MaxWords", "Max Words"]),
];

impl Field {
    pub fn synonyms(self) -> &'static [&'static str] {
        FIELD_SYNONYMS
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, names)| *names)
            .unwrap_or(&[])
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Keywords => "keywords",
            Field::Weight => "weight",
            Field::MinWords => "min words",
            Field::MaxWords => "max words",
        }
    }
}

/// First cell among the field's synonyms that is present and not missing.
pub fn lookup<'a>(row: &'a RubricRow, field: Field) -> Option<(&'static str, &'a CellValue)> {
    field.synonyms().iter().find_map(|&column| {
        row.get(column)
            .filter(|cell| !cell.is_missing())
            .map(|cell| (column, cell))
    })
}

/// Canonical form of one rubric row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Criterion {
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub weight: f64,
    pub min_words: Option<f64>,
    pub max_words: Option<f64>,
}

/// Resolve a rubric row into a [`Criterion`]. Never fails: unusable cells
/// fall back to defaults.
pub fn resolve_criterion(row: &RubricRow) -> Criterion {
    Criterion {
        name: resolve_name(row),
        description: lookup(row, Field::Description)
            .and_then(|(_, cell)| cell.as_text())
            .unwrap_or_default(),
        keywords: lookup(row, Field::Keywords)
            .and_then(|(_, cell)| cell.as_text())
            .map(|raw| split_keywords(&raw))
            .unwrap_or_default(),
        weight: parse_weight(lookup(row, Field::Weight).map(|(_, cell)| cell)),
        min_words: parse_bound(lookup(row, Field::MinWords).map(|(_, cell)| cell)),
        max_words: parse_bound(lookup(row, Field::MaxWords).map(|(_, cell)| cell)),
    }
}

fn resolve_name(row: &RubricRow) -> String {
    lookup(row, Field::Name)
        .and_then(|(_, cell)| cell.as_text())
        .or_else(|| row.cells().find_map(|(_, cell)| cell.as_text()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNNAMED_CRITERION.to_string())
}

/// Comma-separated keywords, trimmed and lower-cased; blank entries dropped.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Weight from a cell. Absent, unparseable, negative or non-finite values
/// give [`DEFAULT_WEIGHT`].
pub fn parse_weight(cell: Option<&CellValue>) -> f64 {
    cell.and_then(CellValue::as_f64)
        .filter(|w| w.is_finite() && *w >= 0.0)
        .unwrap_or(DEFAULT_WEIGHT)
}

/// Word bound from a cell; `None` means unbounded on that side.
pub fn parse_bound(cell: Option<&CellValue>) -> Option<f64> {
    cell.and_then(CellValue::as_f64).filter(|b| b.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_canonical_columns() {
        let row = RubricRow::new()
            .with("Criterion", "Technical Skills")
            .with("Description", "Mentions programming experience")
            .with("Keywords", "Python, Java , machine learning,,")
            .with("Weight", 2)
            .with("MinWords", 5)
            .with("MaxWords", "120");
        let c = resolve_criterion(&row);
        assert_eq!(c.name, "Technical Skills");
        assert_eq!(c.description, "Mentions programming experience");
        assert_eq!(c.keywords, vec!["python", "java", "machine learning"]);
        assert_eq!(c.weight, 2.0);
        assert_eq!(c.min_words, Some(5.0));
        assert_eq!(c.max_words, Some(120.0));
    }

    #[test]
    fn test_synonym_columns_resolve_identically() {
        let canonical = RubricRow::new()
            .with("Criterion", "Hobbies")
            .with("Description", "Shares interests")
            .with("Keywords", "music, sport")
            .with("Weight", 1.5);
        let synonyms = RubricRow::new()
            .with("Criteria", "Hobbies")
            .with("Detail", "Shares interests")
            .with("Key words", "music, sport")
            .with("Weights", 1.5);
        assert_eq!(resolve_criterion(&canonical), resolve_criterion(&synonyms));
    }

    #[test]
    fn test_synonym_priority_order() {
        let row = RubricRow::new()
            .with("Aspect", "Fourth choice")
            .with("Criteria", "Second choice");
        assert_eq!(resolve_criterion(&row).name, "Second choice");
    }

    #[test]
    fn test_missing_synonym_falls_through_to_next() {
        let row = RubricRow::new()
            .with("Criterion", CellValue::Missing)
            .with("Parameter", "Confidence");
        assert_eq!(resolve_criterion(&row).name, "Confidence");
    }

    #[test]
    fn test_name_falls_back_to_first_present_cell() {
        let row = RubricRow::new()
            .with("Notes", CellValue::Missing)
            .with("Section", "Closing remarks")
            .with("Weight", 3);
        assert_eq!(resolve_criterion(&row).name, "Closing remarks");
    }

    #[test]
    fn test_name_placeholder_when_nothing_present() {
        let row = RubricRow::new().with("Notes", CellValue::Missing);
        assert_eq!(resolve_criterion(&row).name, UNNAMED_CRITERION);
    }

    #[test]
    fn test_boolean_weight_converts_to_number() {
        let off = RubricRow::new().with("Criterion", "Greeting").with("Weight", false);
        let on = RubricRow::new().with("Criterion", "Greeting").with("Weight", true);
        assert_eq!(resolve_criterion(&off).weight, 0.0);
        assert_eq!(resolve_criterion(&on).weight, 1.0);
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let row = RubricRow::new()
            .with("Criterion", "Greeting")
            .with("weight", 5);
        assert_eq!(resolve_criterion(&row).weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_weight_defaults() {
        assert_eq!(parse_weight(None), 1.0);
        assert_eq!(parse_weight(Some(&CellValue::text("heavy"))), 1.0);
        assert_eq!(parse_weight(Some(&CellValue::Number(-2.0))), 1.0);
        assert_eq!(parse_weight(Some(&CellValue::Number(f64::INFINITY))), 1.0);
        assert_eq!(parse_weight(Some(&CellValue::Number(0.0))), 0.0);
        assert_eq!(parse_weight(Some(&CellValue::text("4"))), 4.0);
    }

    #[test]
    fn test_unparseable_bounds_are_unbounded() {
        let row = RubricRow::new()
            .with("Criterion", "Length")
            .with("Min Words", "lots")
            .with("Max Words", 200);
        let c = resolve_criterion(&row);
        assert_eq!(c.min_words, None);
        assert_eq!(c.max_words, Some(200.0));
    }

    #[test]
    fn test_missing_description_and_keywords_are_empty() {
        let row = RubricRow::new().with("Criterion", "Greeting");
        let c = resolve_criterion(&row);
        assert_eq!(c.description, "");
        assert!(c.keywords.is_empty());
        assert_eq!(c.weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_every_field_has_synonyms() {
        for field in [
            Field::Name,
            Field::Description,
            Field::Keywords,
            Field::Weight,
            Field::MinWords,
            Field::MaxWords,
        ] {
            assert!(!field.synonyms().is_empty(), "{:?} has no synonyms", field);
        }
    }
}
