//! sleval results — aggregate per-model evaluation runs into one comparison table.
//!
//! Result documents (`results*.json`) are discovered under a root directory and
//! keyed by their parent directory name. Wanted task metrics are extracted,
//! rounded, and laid out as a model × metric [`ResultTable`] that can be written
//! as CSV and later reshaped into plot input with [`load_plot_data`].

pub mod discover;
pub mod extract;
pub mod pipeline;
pub mod plot;
pub mod table;

pub use discover::{discover_result_documents, DocumentRef};
pub use extract::{extract_metrics, MetricValue, ResultDocument, ALIAS_MARKER};
pub use pipeline::Aggregator;
pub use plot::{load_plot_data, model_display_name, PlotData};
pub use table::{build_table, round_half_even, ResultRow, ResultTable};
