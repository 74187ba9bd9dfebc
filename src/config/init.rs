use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config};

/// Rubric written when the user asks for a starter file.
const STARTER_RUBRIC: &str = r#"# Columns follow the spreadsheet layout: any of the accepted spellings work
# (Criterion/Criteria/Parameter/Aspect, Description/Detail, Keywords/Key words,
# Weight/Weights/MaxScore, MinWords/Min Words, MaxWords/Max Words).
columns: [Criterion, Description, Keywords, Weight, MinWords, MaxWords]
rows:
  - [Salutation, "Opens with a greeting and states their name", "hello, hi, good morning, my name, i am", 1, 5, ~]
  - [Background, "Describes education, school or current studies", "school, college, class, studying, grade", 2, ~, ~]
  - [Family, "Mentions family members and home", "family, mother, father, brother, sister", 1, ~, ~]
  - [Interests, "Talks about hobbies, interests and what they enjoy", "hobby, hobbies, enjoy, like, play, reading", 1.5, ~, ~]
  - [Goals, "Shares ambitions or future goals", "dream, goal, want to become, future, ambition", 1.5, ~, ~]
  - [Closing, "Ends politely and thanks the audience", "thank you, thanks", 1, ~, ~]
  - [Length, "A complete introduction of appropriate length", ~, 1, 80, 200]
"#;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt for an optional value; empty input or "none" means not set.
fn prompt_optional(message: &str) -> Result<Option<PathBuf>> {
    let input = prompt(&format!("{} [none]: ", message))?;
    if input.is_empty() || input == "none" {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(input)))
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Run the interactive init wizard to create a config file and, optionally,
/// a starter rubric.
///
/// If `default_path` is Some, uses that as the suggested config file path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Intro Score Configuration");
    println!("=========================");
    println!();

    // 1. Rubric
    println!("The rubric lists the criteria a transcript is scored against.");
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    let default_rubric = default_config_path.with_file_name("rubric.yaml");
    let rubric = PathBuf::from(prompt_with_default(
        "Rubric file",
        &default_rubric.display().to_string(),
    )?);

    if !rubric.exists() && prompt_yes_no("Rubric not found. Write a starter rubric there?", true)? {
        write_file(&rubric, STARTER_RUBRIC)?;
        println!("  Starter rubric written to {}", rubric.display());
    }

    // 2. Embedding model
    println!();
    println!("Semantic scoring needs a sentence-transformers ONNX model directory");
    println!("(model.onnx + tokenizer.json). Without one, semantic scores are neutral (0.5).");
    let model_dir = prompt_optional("Model directory")?;

    // 3. Sample transcript
    println!();
    let sample_transcript = prompt_optional("Default transcript file")?;

    // 4. Config path
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        rubric: Some(rubric),
        model_dir,
        sample_transcript,
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
    write_file(&config_path, &yaml)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `intro-score score <transcript.txt>` to get started.");

    Ok(())
}
