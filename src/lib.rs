//! `gem2ems` library crate.
//!
//! Translates GEM v2.0 building taxonomy strings into EMS/IMS structural
//! types and vulnerability-class (VC) distributions:
//!
//! - parses the taxonomy string into a structured attribute set
//! - assigns EMS type candidates via a priority-ordered rule list
//! - mixes the candidates' VC priors into a base distribution
//! - reshapes it with conditional modifier rules (bounded smooth shift)
//! - reports confidence and uncertainty metrics
//!
//! The whole pipeline is pure and deterministic per input string, so batch
//! translation is embarrassingly parallel.
//!
//! ```
//! use gem2ems::config::EngineConfig;
//! use gem2ems::engine::Translator;
//!
//! let engine = Translator::new(EngineConfig::builtin()).unwrap();
//! let result = engine.translate_one("CR/LFINF(MUR+CBH)+CDL+DUL/H:3/IND");
//! assert_eq!(result.summary.best_type, "RC1-L");
//! ```

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod math;
pub mod modifiers;
pub mod parser;
pub mod rules;
pub mod uncertainty;
