//! Test harness for end-to-end scene export scenarios.
//!
//! # Key Components
//!
//! - [`ExportScenario`]: fluent runner over the assembler and export pipeline
//! - [`oracle`]: verification functions returning pass/fail verdicts
//! - [`helpers`]: error type, fixture documents, progress recording, mesh math
//! - [`assertions`]: assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod oracle;
pub mod workflow;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use workflow::ExportScenario;
