//! `dmc-output` — audit sinks for the choice engine.
//!
//! Both sinks implement `dmc_choice::SelectionAuditor` and write one row
//! per evaluated candidate:
//!
//! | Sink              | Target                                              |
//! |-------------------|-----------------------------------------------------|
//! | `CsvAuditSink<W>` | `;`-delimited CSV on a file or any `io::Write`      |
//! | `MemoryAuditSink` | a `Vec<AuditRow>` for tests and post-processing     |
//!
//! Sinks are shared across concurrently running tours; each record is
//! written under a mutex and flushed before the call returns.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dmc_output::CsvAuditSink;
//!
//! let sink = Arc::new(CsvAuditSink::open("output/selections.csv")?);
//! let model = TripBasedModelBuilder::new(oracle, estimator)
//!     .auditor(Arc::clone(&sink))
//!     .build()?;
//! // ... run tours ...
//! sink.close()?;
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod row;


pub use crate::csv::{CSV_HEADER, CsvAuditSink};
pub use error::{OutputError, OutputResult};
pub use memory::MemoryAuditSink;
pub use row::AuditRow;
