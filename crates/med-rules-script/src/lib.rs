//! # med-rules-script
//!
//! Runs [`med_rules`] over a whole generated SQL script.
//!
//! The script is split into statements; every `insert into ... from
//! PRESCRIBING` statement is a medication insert. Its destination table name
//! (e.g. `BiguanideByNames_initial`) gives the drug class and match method,
//! and the most recent group heading before it gives the group.
//!
//! ## Usage
//!
//! ```rust
//! use med_rules_script::{MedicationScript, ScriptConfig};
//!
//! let sql = "-- People with at least one ordered medications non-specific to Diabetes Mellitus\n\
//!            insert into BiguanideByNames_initial\n\
//!            select * from PRESCRIBING a join ENCOUNTER e on a.ENCOUNTERID = e.ENCOUNTERID\n\
//!            where (regexp_like(a.RAW_RX_MED_NAME,'Glucophage','i') or\n\
//!                   regexp_like(a.RAW_RX_MED_NAME,'Riomet','i'))\n\
//!              and e.ENC_TYPE in ('IP', 'AV');\n";
//!
//! let script = MedicationScript::with_config(sql, ScriptConfig::default());
//! let records = script.med_info().unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].pattern.as_deref(), Some("Riomet"));
//! assert!(records.iter().all(|r| r.group_id == Some(0)));
//! ```
//!
//! ## Features
//!
//! - `parallel` - Extracts inserts on the rayon thread pool when
//!   [`ScriptConfig::parallel`] is set
//! - `serde` - Serialization of the records via `med-rules/serde`

#![warn(missing_docs)]

mod config;
mod destination;
mod error;
mod labs;
mod script;

pub use config::{ScriptConfig, ScriptConfigBuilder};
pub use destination::destination_class;
pub use error::{ScriptError, ScriptResult};
pub use labs::lab_code_lists;
pub use script::{MedInsert, MedicationScript};
