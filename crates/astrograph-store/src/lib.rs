//! Persistent index, suppression store, and analysis reporter (§4.6,
//! §4.7): the durable half of the engine, layered on the in-memory
//! discovery pipeline in `astrograph-discovery`.

pub mod index;
pub mod report;

pub use index::{IndexStore, PersistedCluster, METADATA_DIR_NAME, REPORTS_DIR};
pub use report::{render as render_report, write_report, TOOL_VERSION};
