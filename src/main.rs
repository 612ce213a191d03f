mod analysis;
mod common;
mod parsing;

use std::path::PathBuf;
use thiserror::Error;

// Import analysis functions
use analysis::{
    generate_accuracy_table, generate_api_specialization_analysis, generate_concordance_table,
    generate_conflicts_table, generate_cost_analysis, generate_field_completion_analysis,
    generate_field_concordance_table, generate_time_analysis, generate_token_analysis,
};

// Import parsing functionality
use parsing::{load_analysis_dataset, load_articles};

/// Errors that can occur while regenerating the figures and tables
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Parsing error: {0}")]
    Parsing(#[from] parsing::ParsingError),

    #[error("Cost analysis error: {0}")]
    Cost(#[from] analysis::cost::CostError),

    #[error("Time analysis error: {0}")]
    Time(#[from] analysis::time::TimeError),

    #[error("Token analysis error: {0}")]
    Tokens(#[from] analysis::tokens::TokenError),

    #[error("Field completion analysis error: {0}")]
    FieldCompletion(#[from] analysis::field_completion::CompletionError),

    #[error("API specialization analysis error: {0}")]
    ApiSpecialization(#[from] analysis::api_specialization::SpecializationError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type Result<T> = core::result::Result<T, AnalysisError>;

fn main() -> Result<()> {
    // All paths are fixed relative to the manifest directory
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let json_dir = manifest_dir.join("json");
    let analysis_dir = manifest_dir.join("analysis");
    let output_dir = manifest_dir.join("plots");

    // Check if input directories exist
    if !json_dir.exists() {
        eprintln!("Error: Input directory does not exist: {}", json_dir.display());
        std::process::exit(1);
    }
    if !analysis_dir.exists() {
        eprintln!(
            "Error: Analysis directory does not exist: {}",
            analysis_dir.display()
        );
        std::process::exit(1);
    }
    std::fs::create_dir_all(&output_dir)?;

    // Load the per-article extraction records
    println!("Loading article records from {}", json_dir.display());
    let articles = load_articles(&json_dir)?;
    println!("Loaded {} articles", articles.len());

    // Per-article charts with their figure legends
    println!("Generating cost analysis");
    generate_cost_analysis(&articles, &output_dir)?;

    println!("Generating time analysis");
    generate_time_analysis(&articles, &output_dir)?;

    println!("Generating token analysis");
    generate_token_analysis(&articles, &output_dir)?;

    // Field matrix heatmaps
    println!("Generating field completion analysis");
    generate_field_completion_analysis(&articles, &output_dir)?;

    println!("Generating API specialization analysis");
    generate_api_specialization_analysis(&articles, &output_dir)?;

    // Manual evaluation tables
    println!("Loading manual analysis from {}", analysis_dir.display());
    let dataset = load_analysis_dataset(&analysis_dir)?;

    println!("Generating concordance table");
    generate_concordance_table(&dataset.claude, &dataset.deepseek, &output_dir)?;

    println!("Generating field concordance table");
    generate_field_concordance_table(&dataset.claude, &dataset.deepseek, &output_dir)?;

    println!("Generating conflicts table");
    generate_conflicts_table(&dataset.conflicts, &output_dir)?;

    println!("Generating accuracy table");
    generate_accuracy_table(&dataset, &output_dir)?;

    println!("All outputs written to {}", output_dir.display());

    Ok(())
}
