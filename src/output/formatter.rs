use std::collections::BTreeSet;
use std::io::IsTerminal;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::rubric::{Criterion, RubricTable};
use crate::scoring::{round_to, CriterionResult, ScoringResult};

/// Numeric columns of the criterion table, in order.
const SCORE_COLUMNS: [&str; 5] = ["weight", "keyword", "semantic", "length", "final"];
const SCORE_WIDTH: usize = 9;
const MIN_NAME_WIDTH: usize = 12;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Pad to `width` characters (not bytes).
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Score in [0, 1] at presentation precision (3 decimals)
pub fn format_fraction(value: f64) -> String {
    format!("{:.3}", round_to(value, 3))
}

/// Weight without trailing zeros ("2", "1.5")
pub fn format_weight(weight: f64) -> String {
    format!("{}", round_to(weight, 3))
}

/// Keywords deduplicated and sorted for display
pub fn unique_sorted(keywords: &[String]) -> Vec<&str> {
    keywords
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Overall score and word count
pub fn format_overall(result: &ScoringResult, use_colors: bool) -> String {
    let score = format!("{:.2}", result.overall_score);
    if use_colors {
        let colored = if result.overall_score >= 70.0 {
            score.green().bold().to_string()
        } else if result.overall_score >= 40.0 {
            score.yellow().bold().to_string()
        } else {
            score.red().bold().to_string()
        };
        format!(
            "Overall score: {} / 100\nWord count:    {}",
            colored, result.word_count
        )
    } else {
        format!(
            "Overall score: {} / 100\nWord count:    {}",
            score, result.word_count
        )
    }
}

/// Per-criterion breakdown table with a header row.
/// Criterion names are truncated to fit the terminal; pipes get full names.
pub fn format_criterion_table(results: &[CriterionResult], use_colors: bool) -> String {
    if results.is_empty() {
        return "No criteria in rubric.".to_string();
    }

    let longest = results
        .iter()
        .map(|r| r.criterion.chars().count())
        .max()
        .unwrap_or(0)
        .max("criterion".len());
    let fixed_width = SCORE_WIDTH * SCORE_COLUMNS.len();
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + MIN_NAME_WIDTH => longest.min(width - fixed_width),
        Some(_) => longest.min(MIN_NAME_WIDTH),
        None => longest,
    };

    let header = format!(
        "{}{}",
        pad("criterion", name_width),
        SCORE_COLUMNS
            .iter()
            .map(|c| format!("{:>width$}", c, width = SCORE_WIDTH))
            .collect::<String>()
    );

    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for r in results {
        let name = pad(&truncate(&r.criterion, name_width), name_width);
        let numbers = [
            format_weight(r.weight),
            format_fraction(r.keyword_score),
            format_fraction(r.semantic_score),
            format_fraction(r.length_penalty),
            format_fraction(r.final_score),
        ]
        .iter()
        .map(|n| format!("{:>width$}", n, width = SCORE_WIDTH))
        .collect::<String>();

        if use_colors {
            lines.push(format!("{}{}", name.cyan(), numbers));
        } else {
            lines.push(format!("{}{}", name, numbers));
        }
    }

    lines.join("\n")
}

/// Detailed feedback for one criterion
pub fn format_criterion_feedback(r: &CriterionResult, use_colors: bool) -> String {
    let title = if use_colors {
        r.criterion.bold().to_string()
    } else {
        r.criterion.clone()
    };

    let mut lines = vec![
        title,
        format!("  Final score:    {}", format_fraction(r.final_score)),
        format!("  Keyword score:  {}", format_fraction(r.keyword_score)),
        format!("  Semantic score: {}", format_fraction(r.semantic_score)),
        format!("  Length penalty: {}", format_fraction(r.length_penalty)),
    ];

    if !r.keywords_found.is_empty() {
        let found = unique_sorted(&r.keywords_found).join(", ");
        lines.push(if use_colors {
            format!("  Keywords found:   {}", found.green())
        } else {
            format!("  Keywords found:   {}", found)
        });
    }

    if !r.keywords_missing.is_empty() {
        let missing = unique_sorted(&r.keywords_missing).join(", ");
        lines.push(if use_colors {
            format!("  Keywords missing: {}", missing.red())
        } else {
            format!("  Keywords missing: {}", missing)
        });
    }

    if !r.length_feedback.is_empty() {
        lines.push(if use_colors {
            format!("  Length feedback:  {}", r.length_feedback.yellow())
        } else {
            format!("  Length feedback:  {}", r.length_feedback)
        });
    }

    lines.join("\n")
}

/// Overall score, breakdown table, and (optionally) detailed feedback
pub fn format_report(result: &ScoringResult, feedback: bool, use_colors: bool) -> String {
    let mut sections = vec![
        format_overall(result, use_colors),
        format_criterion_table(&result.per_criterion, use_colors),
    ];
    if feedback {
        sections.extend(
            result
                .per_criterion
                .iter()
                .map(|r| format_criterion_feedback(r, use_colors)),
        );
    }
    sections.join("\n\n")
}

/// Format results as tab-separated values for scripting.
/// First line: "overall", score, word count; then one line per criterion:
/// name, weight, keyword, semantic, length, final (no headers, no colors)
pub fn format_tsv(result: &ScoringResult) -> String {
    let mut lines = vec![format!(
        "overall\t{:.2}\t{}",
        result.overall_score, result.word_count
    )];
    lines.extend(result.per_criterion.iter().map(|r| {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            r.criterion,
            format_weight(r.weight),
            format_fraction(r.keyword_score),
            format_fraction(r.semantic_score),
            format_fraction(r.length_penalty),
            format_fraction(r.final_score)
        )
    }));
    lines.join("\n")
}

/// Pretty JSON report
pub fn format_json(result: &ScoringResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize scoring result")
}

/// The raw rubric as loaded, one row per line, cells separated by " | "
pub fn format_rubric_table(table: &RubricTable, use_colors: bool) -> String {
    if table.is_empty() {
        return "Rubric is empty.".to_string();
    }

    let header = table.columns().join(" | ");
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for row in table.rows() {
        let cells: Vec<String> = table
            .columns()
            .iter()
            .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        lines.push(cells.join(" | "));
    }

    lines.join("\n")
}

/// Resolved criteria, one block per criterion
pub fn format_criteria(criteria: &[Criterion], use_colors: bool) -> String {
    criteria
        .iter()
        .map(|c| {
            let name = if use_colors {
                c.name.bold().to_string()
            } else {
                c.name.clone()
            };
            let bound = |b: Option<f64>| b.map(format_weight).unwrap_or_else(|| "-".to_string());
            let mut block = format!(
                "{}\n  Weight: {}\n  Words: {} to {}",
                name,
                format_weight(c.weight),
                bound(c.min_words),
                bound(c.max_words)
            );
            if !c.description.is_empty() {
                block.push_str(&format!("\n  Description: {}", c.description));
            }
            if !c.keywords.is_empty() {
                block.push_str(&format!("\n  Keywords: {}", c.keywords.join(", ")));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}
