//! Compile-time embedded assets for the built-in Welcome module.
//!
//! The Welcome module is a complete, self-contained example of a content
//! module: its assets are embedded in the binary and surface through the
//! overlay like any externally packaged module.

mod template;

pub use template::{Template, TemplateVars};

use std::time::SystemTime;

use crate::module::Module;
use crate::store::EmbeddedStore;

/// Variables for the welcome page.
pub struct WelcomeVars<'a> {
    pub title: &'a str,
    pub version: &'a str,
}

impl TemplateVars for WelcomeVars<'_> {
    fn apply(&self, content: &str) -> String {
        content
            .replace("__TITLE__", self.title)
            .replace("__VERSION__", self.version)
    }
}

/// Welcome page template.
pub const WELCOME_HTML: Template<WelcomeVars<'static>> =
    Template::new(include_str!("welcome/index.html"));

/// Welcome page stylesheet.
const WELCOME_CSS: &str = include_str!("welcome/site.css");

/// Build the built-in Welcome module, stamped with the given origin.
pub fn welcome_module(origin: SystemTime) -> Module {
    let html = WELCOME_HTML.render(&WelcomeVars {
        title: "Welcome",
        version: env!("CARGO_PKG_VERSION"),
    });

    let mut store = EmbeddedStore::new("Modfs.Welcome", origin);
    store.insert_path("Pages/index.html", html.into_bytes());
    store.insert_path("Styles/site.css", WELCOME_CSS.as_bytes().to_vec());
    Module::new("Welcome", store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn test_welcome_template_renders_vars() {
        let html = WELCOME_HTML.render(&WelcomeVars {
            title: "Hello",
            version: "9.9.9",
        });
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("9.9.9"));
        assert!(!html.contains("__TITLE__"));
        assert!(!html.contains("__VERSION__"));
    }

    #[test]
    fn test_welcome_module_contents() {
        let module = welcome_module(UNIX_EPOCH);
        assert_eq!(module.name(), "Welcome");

        let store = module.store().unwrap();
        assert!(store.file_exists("Pages/index.html"));
        assert!(store.file_exists("Styles/site.css"));
        assert_eq!(store.origin(), UNIX_EPOCH);
    }
}
