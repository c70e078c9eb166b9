//! Report formatters.
//!
//! - Text for people, with colors and excerpts
//! - JSON for automation and CI
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```
//! use paradupe::duplicates::{classify, Verdict};
//! use paradupe::output::{JsonOutput, TextReport};
//! use paradupe::scanner::{BlockFilter, Document};
//!
//! let docs = vec![
//!     Document::new("a.md", "same text\n", 0),
//!     Document::new("b.md", "same text\n", 1),
//! ];
//! let result = classify(&docs, BlockFilter::default());
//! let verdict = Verdict::evaluate(&result.state, 95.0);
//!
//! let text = TextReport::new(&result.records, &result.state, &verdict)
//!     .with_color(false)
//!     .render();
//! assert!(text.contains("exact duplicates"));
//!
//! let json = JsonOutput::new(&result.records, &result.state, &verdict);
//! assert!(!json.passed);
//! ```

pub mod csv;
pub mod json;
pub mod text;

pub use csv::{CsvOutput, CsvOutputError};
pub use json::{JsonOutput, JsonOutputError};
pub use text::{report_order, TextReport};
