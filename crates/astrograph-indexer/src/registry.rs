//! Registry that resolves a `LanguagePlugin` by file extension or language
//! id (§4.1, §9's "registry keyed by language id" re-architecture of the
//! source's runtime subclassing).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::languages;
use crate::parser_pool::ParserPool;
use crate::plugin::LanguagePlugin;

/// Read-mostly, initialized once, safe for concurrent readers (§5's shared
/// resources note) — plugins are `Arc`-shared rather than owned uniquely so
/// cloning a registry handle is cheap.
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn LanguagePlugin>>,
    by_extension: HashMap<&'static str, usize>,
    by_id: HashMap<&'static str, usize>,
}

impl PluginRegistry {
    /// Build a registry with every first-class language module registered
    /// (§6: "language plugins are delivered as first-class modules
    /// registered at startup"), sharing one parser pool across all of them.
    pub fn with_defaults() -> Self {
        let pool = crate::parser_pool::create_parser_pool();
        let mut registry = PluginRegistry { plugins: Vec::new(), by_extension: HashMap::new(), by_id: HashMap::new() };
        for plugin in languages::default_plugins(pool) {
            registry.register(plugin);
        }
        registry
    }

    /// Build an empty registry and register a caller-supplied set of
    /// plugins — used by tests that want an isolated engine instance
    /// without touching any process-wide pool (§9).
    pub fn new(plugins: Vec<Arc<dyn LanguagePlugin>>) -> Self {
        let mut registry = PluginRegistry { plugins: Vec::new(), by_extension: HashMap::new(), by_id: HashMap::new() };
        for plugin in plugins {
            registry.register(plugin);
        }
        registry
    }

    fn register(&mut self, plugin: Arc<dyn LanguagePlugin>) {
        let idx = self.plugins.len();
        self.by_id.insert(plugin.language_id(), idx);
        for ext in plugin.file_extensions() {
            self.by_extension.insert(ext, idx);
        }
        self.plugins.push(plugin);
    }

    pub fn resolve_for_path(&self, path: &Path) -> Option<&Arc<dyn LanguagePlugin>> {
        let ext = path.extension()?.to_str()?;
        let dotted: String = format!(".{}", ext.to_lowercase());
        self.by_extension.get(dotted.as_str()).map(|&idx| &self.plugins[idx])
    }

    pub fn resolve_by_id(&self, language_id: &str) -> Option<&Arc<dyn LanguagePlugin>> {
        self.by_id.get(language_id).map(|&idx| &self.plugins[idx])
    }

    pub fn language_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.plugins.iter().map(|p| p.language_id())
    }

    /// Union of every registered plugin's `skip_dirs()`, used by the file
    /// walker in `astrograph-discovery` to prune build artifacts alongside
    /// whatever `.gitignore` already excludes.
    pub fn all_skip_dirs(&self) -> std::collections::HashSet<&'static str> {
        self.plugins.iter().flat_map(|p| p.skip_dirs().iter().copied()).collect()
    }

    pub fn plugins(&self) -> &[Arc<dyn LanguagePlugin>] {
        &self.plugins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_rust_extension() {
        let registry = PluginRegistry::with_defaults();
        let plugin = registry.resolve_for_path(Path::new("src/main.rs")).unwrap();
        assert_eq!(plugin.language_id(), "rust");
    }

    #[test]
    fn unknown_extension_resolves_to_none() {
        let registry = PluginRegistry::with_defaults();
        assert!(registry.resolve_for_path(Path::new("README.md")).is_none());
    }

    #[test]
    fn resolves_by_language_id() {
        let registry = PluginRegistry::with_defaults();
        assert!(registry.resolve_by_id("python").is_some());
        assert!(registry.resolve_by_id("nonexistent").is_none());
    }
}
