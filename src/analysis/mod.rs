//! Domain-specific analysis modules
//!
//! One module per published figure or table:
//! - Cost, time and token charts (per-article phase breakdowns)
//! - Field completion and API specialization heatmaps
//! - Concordance, field concordance, conflict and accuracy tables

pub mod accuracy;
pub mod api_specialization;
pub mod categories;
pub mod concordance;
pub mod conflicts;
pub mod constants;
pub mod cost;
pub mod field_completion;
pub mod field_concordance;
pub mod phase_metrics;
pub mod time;
pub mod tokens;

// Re-export the generator entry points for convenience
pub use accuracy::generate_accuracy_table;
pub use api_specialization::generate_api_specialization_analysis;
pub use concordance::generate_concordance_table;
pub use conflicts::generate_conflicts_table;
pub use cost::generate_cost_analysis;
pub use field_completion::generate_field_completion_analysis;
pub use field_concordance::generate_field_concordance_table;
pub use time::generate_time_analysis;
pub use tokens::generate_token_analysis;
