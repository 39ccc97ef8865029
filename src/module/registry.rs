//! Explicit module registry: insert-once at startup, concurrent reads after.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::log;

use super::Module;

/// Registration failures.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("module '{0}' is already registered")]
    Duplicate(String),
}

/// Name-keyed table of registered modules.
///
/// Constructed once at startup and injected by reference into the overlay;
/// there is no ambient global instance. Reads never block each other, and
/// no lock is held across I/O.
#[derive(Debug)]
pub struct ModuleRegistry {
    app_root: String,
    modules: RwLock<FxHashMap<String, Arc<Module>>>,
}

impl ModuleRegistry {
    /// Create a registry rooted at the application root path.
    ///
    /// The root is kept slash-terminated so prefix comparisons stay exact.
    pub fn new(app_root: &str) -> Self {
        let mut root = app_root.replace('\\', "/");
        if !root.ends_with('/') {
            root.push('/');
        }
        Self {
            app_root: root,
            modules: RwLock::new(FxHashMap::default()),
        }
    }

    /// Slash-terminated application root.
    pub fn app_root(&self) -> &str {
        &self.app_root
    }

    /// Expand the `~/` root-relative marker against the application root.
    pub fn expand_root(&self, path: &str) -> String {
        let forward = path.replace('\\', "/");
        if let Some(rest) = forward.strip_prefix("~/") {
            format!("{}{rest}", self.app_root)
        } else if forward == "~" {
            self.app_root.clone()
        } else {
            forward
        }
    }

    /// Register a module, failing on a duplicate name.
    pub fn register(&self, module: Module) -> Result<Arc<Module>, RegisterError> {
        let mut modules = self.modules.write();
        if modules.contains_key(module.name()) {
            return Err(RegisterError::Duplicate(module.name().to_string()));
        }
        let module = Arc::new(module);
        modules.insert(module.name().to_string(), Arc::clone(&module));
        Ok(module)
    }

    /// Register a module and run a consumer setup callback against it.
    ///
    /// A failing callback is logged and does not unregister the module;
    /// one broken module must not abort the rest of startup.
    pub fn register_with<F>(&self, module: Module, setup: F) -> Result<Arc<Module>, RegisterError>
    where
        F: FnOnce(&Arc<Module>) -> anyhow::Result<()>,
    {
        let module = self.register(module)?;
        if let Err(e) = setup(&module) {
            log!("module"; "setup for '{}' failed: {e:#}", module.name());
        }
        Ok(module)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Module>> {
        self.modules.read().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }

    /// Short-alias virtual path of a module's content: `~/~Name/rest`.
    pub fn module_short_path(&self, module_name: &str, content_path: &str) -> String {
        format!("~/~{module_name}/{}", content_path.trim_start_matches('/'))
    }

    /// Area-convention virtual path of a module's content: `~/Areas/Name/rest`.
    pub fn module_path(&self, module_name: &str, content_path: &str) -> String {
        format!(
            "~/Areas/{module_name}/{}",
            content_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EmbeddedStore;
    use std::time::UNIX_EPOCH;

    fn module(name: &str) -> Module {
        Module::new(name, EmbeddedStore::new(format!("Acme.{name}"), UNIX_EPOCH))
    }

    #[test]
    fn test_root_is_slash_terminated() {
        assert_eq!(ModuleRegistry::new("/").app_root(), "/");
        assert_eq!(ModuleRegistry::new("/app").app_root(), "/app/");
        assert_eq!(ModuleRegistry::new(r"\app\").app_root(), "/app/");
    }

    #[test]
    fn test_expand_root() {
        let reg = ModuleRegistry::new("/app");
        assert_eq!(reg.expand_root("~/x/y.css"), "/app/x/y.css");
        assert_eq!(reg.expand_root("~"), "/app/");
        assert_eq!(reg.expand_root("/already/abs"), "/already/abs");
    }

    #[test]
    fn test_register_and_get() {
        let reg = ModuleRegistry::new("/");
        assert!(reg.is_empty());

        let blog = reg.register(module("Blog")).unwrap();
        assert_eq!(blog.name(), "Blog");
        assert_eq!(reg.len(), 1);
        assert!(reg.get("Blog").is_some());
        assert!(reg.get("Shop").is_none());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let reg = ModuleRegistry::new("/");
        reg.register(module("Blog")).unwrap();
        assert!(matches!(
            reg.register(module("Blog")),
            Err(RegisterError::Duplicate(name)) if name == "Blog"
        ));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_register_with_failing_setup_keeps_module() {
        let reg = ModuleRegistry::new("/");
        let result = reg.register_with(module("Blog"), |_| anyhow::bail!("route clash"));
        assert!(result.is_ok());
        assert!(reg.get("Blog").is_some());
    }

    #[test]
    fn test_virtual_path_builders() {
        let reg = ModuleRegistry::new("/");
        assert_eq!(
            reg.module_short_path("Blog", "Posts/latest.css"),
            "~/~Blog/Posts/latest.css"
        );
        assert_eq!(
            reg.module_path("Blog", "/Posts/latest.css"),
            "~/Areas/Blog/Posts/latest.css"
        );
    }
}
