//! Persistence for the trust mapping.
//!
//! One versioned JSON file per store, written atomically under a
//! caller-supplied base directory:
//!
//! ```text
//! {base_dir}/
//! └── trust_mapping.json
//! ```
//!
//! # Modules
//!
//! - [`mapping_file`] — save/load of the full mapping and current
//!   identity.

pub mod mapping_file;

pub use mapping_file::{MappingStore, PersistedMapping};
