use super::resolver::{lookup, parse_bound, Field};
use super::table::RubricTable;

/// Lint a rubric table.
/// Returns all findings at once (not just the first). Scoring never depends
/// on this: the resolver applies its defaults regardless.
pub fn validate_rubric(table: &RubricTable) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if table.is_empty() {
        errors.push("rubric: no criteria rows".to_string());
        return Err(errors);
    }

    let has_name_column = table
        .columns()
        .iter()
        .any(|c| Field::Name.synonyms().contains(&c.as_str()));
    if !has_name_column {
        errors.push(format!(
            "rubric: no criterion name column (expected one of {})",
            Field::Name.synonyms().join(", ")
        ));
    }

    let mut total_weight = 0.0;
    for (i, row) in table.rows().iter().enumerate() {
        let line = i + 1;

        match lookup(row, Field::Weight) {
            Some((column, cell)) => match cell.as_f64() {
                Some(w) if w.is_finite() && w >= 0.0 => total_weight += w,
                Some(w) => {
                    errors.push(format!(
                        "rubric[{}].{}: weight must be a non-negative number, got {}",
                        line, column, w
                    ));
                    total_weight += 1.0;
                }
                None => {
                    errors.push(format!(
                        "rubric[{}].{}: invalid weight '{}', using 1",
                        line, column, cell
                    ));
                    total_weight += 1.0;
                }
            },
            None => total_weight += 1.0,
        }

        let mut bounds = [None, None];
        for (slot, field) in bounds.iter_mut().zip([Field::MinWords, Field::MaxWords]) {
            if let Some((column, cell)) = lookup(row, field) {
                *slot = parse_bound(Some(cell));
                if slot.is_none() {
                    errors.push(format!(
                        "rubric[{}].{}: invalid {} '{}', treated as unbounded",
                        line,
                        column,
                        field.label(),
                        cell
                    ));
                }
            }
        }

        if let [Some(min), Some(max)] = bounds {
            if min > max {
                errors.push(format!(
                    "rubric[{}]: min words ({}) exceeds max words ({})",
                    line, min, max
                ));
            }
        }
    }

    if total_weight == 0.0 {
        errors.push("rubric: all weights are zero, overall score will be 0".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::table::RubricRow;

    fn table(rows: Vec<RubricRow>) -> RubricTable {
        RubricTable::new(rows)
    }

    #[test]
    fn test_valid_rubric() {
        let t = table(vec![RubricRow::new()
            .with("Criterion", "Greeting")
            .with("Weight", 2)
            .with("MinWords", 10)
            .with("MaxWords", 100)]);
        assert!(validate_rubric(&t).is_ok());
    }

    #[test]
    fn test_empty_rubric() {
        let errors = validate_rubric(&RubricTable::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("no criteria"));
    }

    #[test]
    fn test_missing_name_column() {
        let t = table(vec![RubricRow::new().with("Title", "Greeting")]);
        let errors = validate_rubric(&t).unwrap_err();
        assert!(errors[0].contains("no criterion name column"));
    }

    #[test]
    fn test_invalid_weight() {
        let t = table(vec![RubricRow::new()
            .with("Criterion", "Greeting")
            .with("Weights", "heavy")]);
        let errors = validate_rubric(&t).unwrap_err();
        assert!(errors[0].contains("rubric[1].Weights"));
    }

    #[test]
    fn test_negative_weight() {
        let t = table(vec![RubricRow::new()
            .with("Criterion", "Greeting")
            .with("Weight", -1)]);
        let errors = validate_rubric(&t).unwrap_err();
        assert!(errors[0].contains("non-negative"));
    }

    #[test]
    fn test_inverted_bounds() {
        let t = table(vec![RubricRow::new()
            .with("Criterion", "Greeting")
            .with("Min Words", 80)
            .with("Max Words", 20)]);
        let errors = validate_rubric(&t).unwrap_err();
        assert!(errors[0].contains("exceeds max words"));
    }

    #[test]
    fn test_all_zero_weights() {
        let t = table(vec![
            RubricRow::new().with("Criterion", "A").with("Weight", 0),
            RubricRow::new().with("Criterion", "B").with("Weight", 0),
        ]);
        let errors = validate_rubric(&t).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("all weights are zero")));
    }

    #[test]
    fn test_collects_all_errors() {
        let t = table(vec![
            RubricRow::new()
                .with("Criterion", "A")
                .with("Weight", "bad")
                .with("MinWords", "many"),
            RubricRow::new().with("Criterion", "B").with("MaxWords", "few"),
        ]);
        let errors = validate_rubric(&t).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
