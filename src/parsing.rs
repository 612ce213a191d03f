//! File parsing functionality for the fixed input dataset
//!
//! This module handles loading the per-article JSON folders and the manual
//! evaluation files into the typed records in
//! [`crate::common::data_structures`].

use crate::common::data_structures::{
    AnalysisDataset, ArticleAnalysis, ArticleRecord, ConflictEntry, FinalRecord, PhaseRecord,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during dataset parsing
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse JSON in {path}: {source}")]
    JsonParse {
        path: String,
        source: serde_json::Error,
    },

    #[error("No article folders found in {0}")]
    NoArticles(String),

    #[error("Missing required file: {0}")]
    MissingFile(String),
}

type Result<T> = core::result::Result<T, ParsingError>;

/// Loads every `json/Article_<N>/` folder, ordered by article number
///
/// The three phase files and the optional `questions_json.json` degrade to
/// empty records when absent (those articles show up as zero-cost in the
/// reports); `final_json.json` is the canonical per-article record and is
/// required.
pub fn load_articles(json_dir: &Path) -> Result<Vec<ArticleRecord>> {
    let mut folders = article_folders(json_dir)?;
    folders.sort_by_key(|(number, _)| *number);

    let bar = ProgressBar::new(folders.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}").unwrap(),
    );

    let mut articles = Vec::with_capacity(folders.len());
    for (number, folder) in folders {
        bar.set_message(format!("Article_{}", number));

        let final_path = folder.join("final_json.json");
        if !final_path.exists() {
            bar.abandon();
            return Err(ParsingError::MissingFile(final_path.display().to_string()));
        }
        let final_record: FinalRecord = read_json(&final_path)?;

        articles.push(ArticleRecord {
            number,
            label: format!("Art{}", number),
            vision: read_optional_phase(&folder.join("vision_json.json"))?,
            consensus: read_optional_phase(&folder.join("apis_clean_json.json"))?,
            topics: read_optional_phase(&folder.join("llm_topics_json.json"))?,
            questions: read_optional_phase(&folder.join("questions_json.json"))?,
            final_record,
        });
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(articles)
}

/// Loads the two model analysis files and the structured conflicts file
pub fn load_analysis_dataset(analysis_dir: &Path) -> Result<AnalysisDataset> {
    let claude: Vec<ArticleAnalysis> =
        read_json(&required(analysis_dir.join("analysis_claude.json"))?)?;
    let deepseek: Vec<ArticleAnalysis> =
        read_json(&required(analysis_dir.join("analysis_deepseek.json"))?)?;
    let conflicts: Vec<ConflictEntry> =
        read_json(&required(analysis_dir.join("conflicts_structured.json"))?)?;

    Ok(AnalysisDataset {
        claude,
        deepseek,
        conflicts,
    })
}

/// Enumerates `Article_<N>` folders with their parsed numbers
fn article_folders(json_dir: &Path) -> Result<Vec<(u32, PathBuf)>> {
    if !json_dir.is_dir() {
        return Err(ParsingError::NoArticles(json_dir.display().to_string()));
    }

    let mut folders = Vec::new();
    for entry in std::fs::read_dir(json_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(number) = name
            .to_str()
            .and_then(|n| n.strip_prefix("Article_"))
            .and_then(|n| n.parse::<u32>().ok())
        else {
            continue;
        };
        folders.push((number, entry.path()));
    }

    if folders.is_empty() {
        return Err(ParsingError::NoArticles(json_dir.display().to_string()));
    }
    Ok(folders)
}

fn required(path: PathBuf) -> Result<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(ParsingError::MissingFile(path.display().to_string()))
    }
}

fn read_optional_phase(path: &Path) -> Result<PhaseRecord> {
    if !path.exists() {
        return Ok(PhaseRecord::default());
    }
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ParsingError::JsonParse {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_article(json_dir: &Path, number: u32, vision_cost: f64) {
        let folder = json_dir.join(format!("Article_{}", number));
        fs::create_dir_all(&folder).unwrap();

        fs::write(
            folder.join("vision_json.json"),
            serde_json::json!({
                "cost_tracking": { "total_cost": vision_cost, "total_tokens": 1000 }
            })
            .to_string(),
        )
        .unwrap();
        fs::write(
            folder.join("final_json.json"),
            serde_json::json!({
                "vision_json": { "processing_time_ms": 1500 },
                "apis_clean_json": { "processing_time_ms": "2500" }
            })
            .to_string(),
        )
        .unwrap();
    }

    #[test]
    fn test_load_articles_sorted_by_number() {
        let temp = TempDir::new().unwrap();
        let json_dir = temp.path().join("json");
        write_article(&json_dir, 10, 0.03);
        write_article(&json_dir, 2, 0.01);
        write_article(&json_dir, 1, 0.02);

        let articles = load_articles(&json_dir).unwrap();
        let numbers: Vec<u32> = articles.iter().map(|a| a.number).collect();
        assert_eq!(numbers, vec![1, 2, 10]);
        assert_eq!(articles[2].label, "Art10");
        assert_eq!(articles[1].vision.cost(), 0.01);
        // Missing phase files degrade to zero
        assert_eq!(articles[0].topics.cost(), 0.0);
        assert_eq!(articles[0].final_record.apis_clean_json.processing_time_ms, 2500);
    }

    #[test]
    fn test_load_articles_requires_final_json() {
        let temp = TempDir::new().unwrap();
        let json_dir = temp.path().join("json");
        let folder = json_dir.join("Article_1");
        fs::create_dir_all(&folder).unwrap();

        let err = load_articles(&json_dir).unwrap_err();
        assert!(matches!(err, ParsingError::MissingFile(_)));
    }

    #[test]
    fn test_load_articles_rejects_empty_dir() {
        let temp = TempDir::new().unwrap();
        let json_dir = temp.path().join("json");
        fs::create_dir_all(&json_dir).unwrap();
        fs::create_dir_all(json_dir.join("not_an_article")).unwrap();

        let err = load_articles(&json_dir).unwrap_err();
        assert!(matches!(err, ParsingError::NoArticles(_)));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let temp = TempDir::new().unwrap();
        let json_dir = temp.path().join("json");
        let folder = json_dir.join("Article_1");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("final_json.json"), "{ not json").unwrap();

        let err = load_articles(&json_dir).unwrap_err();
        assert!(matches!(err, ParsingError::JsonParse { .. }));
    }

    #[test]
    fn test_load_analysis_dataset() {
        let temp = TempDir::new().unwrap();
        let analysis_dir = temp.path().join("analysis");
        fs::create_dir_all(&analysis_dir).unwrap();

        let analysis = serde_json::json!([
            {
                "article": "Article_1",
                "fields": {
                    "Methodology": { "analysis": { "classification": "A" } }
                }
            }
        ]);
        fs::write(
            analysis_dir.join("analysis_claude.json"),
            analysis.to_string(),
        )
        .unwrap();
        fs::write(
            analysis_dir.join("analysis_deepseek.json"),
            analysis.to_string(),
        )
        .unwrap();
        fs::write(
            analysis_dir.join("conflicts_structured.json"),
            serde_json::json!([
                {
                    "classification_source": "Claude-only",
                    "category": "D",
                    "field": "Factual",
                    "conflicts": [
                        { "infinity_correct": true, "manual_correct": false,
                          "both_correct": false, "key_insight": "year was 2024" }
                    ]
                }
            ])
            .to_string(),
        )
        .unwrap();

        let dataset = load_analysis_dataset(&analysis_dir).unwrap();
        assert_eq!(dataset.claude.len(), 1);
        assert_eq!(dataset.deepseek.len(), 1);
        assert_eq!(dataset.conflicts.len(), 1);
        assert!(dataset.conflicts[0].conflicts[0].infinity_correct);
    }

    #[test]
    fn test_load_analysis_dataset_missing_file() {
        let temp = TempDir::new().unwrap();
        let analysis_dir = temp.path().join("analysis");
        fs::create_dir_all(&analysis_dir).unwrap();

        let err = load_analysis_dataset(&analysis_dir).unwrap_err();
        assert!(matches!(err, ParsingError::MissingFile(_)));
    }
}
