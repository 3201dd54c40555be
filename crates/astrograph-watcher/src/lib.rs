//! Event-driven mode: an optional long-lived `notify`-backed watch that
//! keeps the on-disk index warm by re-analyzing touched files instead of
//! re-walking the whole tree on every request (§6, §12).

pub mod watcher;

pub use watcher::{FileWatcher, WatchEvent, WatcherService};
