//! Virtual path to (module, content path) parsing.
//!
//! Two conventions are tried in order:
//! 1. short alias: `<root>~<Name>/<rest>`
//! 2. area:        `<root>Areas/<Name>/<rest>`, where the prefix before
//!    `Areas/` must equal the application root exactly and a trailing
//!    segment after the name is mandatory (a bare `<root>Areas/<Name>`
//!    is ordinary content)
//!
//! A path matching neither convention, or naming an unknown module, parses
//! to `module: None` — "not provided by a module" is an answer, not an
//! error.

use regex::Regex;
use std::sync::{Arc, LazyLock};

use super::{Module, ModuleRegistry};

static AREA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*/)Areas/(\w+)(/.*)$").unwrap());

/// Which convention produced a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentPrefix {
    /// `<root>~<Name>/...`
    ShortAlias,
    /// `<root>Areas/<Name>/...`
    Area,
}

/// Outcome of parsing a virtual path against the registry.
#[derive(Debug, Clone)]
pub struct ParsedContentPath {
    /// The path exactly as the caller supplied it.
    pub raw_path: String,
    /// Root-expanded form with forward slashes.
    pub full_path: String,
    /// Whether the caller used the `~/` root-relative marker.
    pub is_root_relative: bool,
    /// Convention that matched, if any.
    pub prefix: Option<ContentPrefix>,
    /// Module name extracted from the path, empty when no convention matched.
    pub module_name: String,
    /// The registered module, when the name is known.
    pub module: Option<Arc<Module>>,
    /// Path of the resource inside the module's content tree.
    pub content_path: String,
}

impl ParsedContentPath {
    fn miss(raw_path: String, full_path: String, is_root_relative: bool) -> Self {
        Self {
            raw_path,
            full_path,
            is_root_relative,
            prefix: None,
            module_name: String::new(),
            module: None,
            content_path: String::new(),
        }
    }

    /// Whether a registered module provides this path.
    pub fn is_module_content(&self) -> bool {
        self.module.is_some()
    }
}

impl ModuleRegistry {
    /// Parse a virtual path into its module and content-path parts.
    pub fn parse_content_path(&self, virtual_path: &str) -> ParsedContentPath {
        let raw = virtual_path.to_string();
        let forward = virtual_path.replace('\\', "/");
        let is_root_relative = forward == "~" || forward.starts_with("~/");
        let full = self.expand_root(&forward);

        // short alias: <root>~Name/rest
        if let Some(rest) = full.strip_prefix(self.app_root())
            && let Some(rest) = rest.strip_prefix('~')
        {
            let (name, content) = match rest.split_once('/') {
                Some((name, content)) => (name, content),
                None => (rest, ""),
            };
            if !name.is_empty() {
                return ParsedContentPath {
                    raw_path: raw,
                    module: self.get(name),
                    module_name: name.to_string(),
                    content_path: content.to_string(),
                    prefix: Some(ContentPrefix::ShortAlias),
                    full_path: full,
                    is_root_relative,
                };
            }
        }

        // area: <root>Areas/Name/rest, prefix before Areas/ must be the root
        if let Some(caps) = AREA_RE.captures(&full)
            && &caps[1] == self.app_root()
        {
            let name = caps[2].to_string();
            let content = caps[3].trim_start_matches('/').to_string();
            return ParsedContentPath {
                raw_path: raw,
                module: self.get(&name),
                module_name: name,
                content_path: content,
                prefix: Some(ContentPrefix::Area),
                full_path: full,
                is_root_relative,
            };
        }

        ParsedContentPath::miss(raw, full, is_root_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EmbeddedStore;
    use std::time::UNIX_EPOCH;

    fn registry() -> ModuleRegistry {
        let reg = ModuleRegistry::new("/");
        reg.register(Module::new(
            "Blog",
            EmbeddedStore::new("Acme.Blog", UNIX_EPOCH),
        ))
        .unwrap();
        reg
    }

    #[test]
    fn test_short_alias() {
        let reg = registry();
        let parsed = reg.parse_content_path("~/~Blog/Posts/latest.css");
        assert!(parsed.is_root_relative);
        assert_eq!(parsed.prefix, Some(ContentPrefix::ShortAlias));
        assert_eq!(parsed.module_name, "Blog");
        assert_eq!(parsed.content_path, "Posts/latest.css");
        assert_eq!(parsed.full_path, "/~Blog/Posts/latest.css");
        assert!(parsed.is_module_content());
        assert_eq!(parsed.module.unwrap().name(), "Blog");
    }

    #[test]
    fn test_area_convention() {
        let reg = registry();
        let parsed = reg.parse_content_path("~/Areas/Blog/Styles/site.css");
        assert_eq!(parsed.prefix, Some(ContentPrefix::Area));
        assert_eq!(parsed.module_name, "Blog");
        assert_eq!(parsed.content_path, "Styles/site.css");
        assert!(parsed.is_module_content());
    }

    #[test]
    fn test_area_prefix_must_be_root() {
        let reg = registry();
        // Areas/ deeper in the tree is ordinary content
        let parsed = reg.parse_content_path("/nested/Areas/Blog/x.css");
        assert_eq!(parsed.prefix, None);
        assert!(parsed.module.is_none());
    }

    #[test]
    fn test_unknown_module_is_a_miss_not_an_error() {
        let reg = registry();
        let parsed = reg.parse_content_path("~/~Shop/cart.js");
        assert_eq!(parsed.prefix, Some(ContentPrefix::ShortAlias));
        assert_eq!(parsed.module_name, "Shop");
        assert!(parsed.module.is_none());
    }

    #[test]
    fn test_plain_path_is_a_miss() {
        let reg = registry();
        let parsed = reg.parse_content_path("~/Styles/site.css");
        assert_eq!(parsed.prefix, None);
        assert!(parsed.module.is_none());
        assert!(parsed.module_name.is_empty());
        assert!(parsed.content_path.is_empty());
        assert_eq!(parsed.full_path, "/Styles/site.css");
    }

    #[test]
    fn test_bare_area_name_is_a_miss() {
        let reg = registry();
        // the area convention needs a segment after the module name
        let parsed = reg.parse_content_path("~/Areas/Blog");
        assert_eq!(parsed.prefix, None);
        assert!(parsed.module.is_none());
        assert!(parsed.module_name.is_empty());

        // a trailing slash is segment enough
        let parsed = reg.parse_content_path("~/Areas/Blog/");
        assert_eq!(parsed.prefix, Some(ContentPrefix::Area));
        assert_eq!(parsed.module_name, "Blog");
        assert_eq!(parsed.content_path, "");
    }

    #[test]
    fn test_short_alias_without_content() {
        let reg = registry();
        let parsed = reg.parse_content_path("~/~Blog");
        assert_eq!(parsed.module_name, "Blog");
        assert_eq!(parsed.content_path, "");
        assert!(parsed.module.is_some());
    }

    #[test]
    fn test_non_root_relative_absolute_path() {
        let reg = registry();
        let parsed = reg.parse_content_path("/~Blog/Posts/latest.css");
        assert!(!parsed.is_root_relative);
        assert_eq!(parsed.module_name, "Blog");
        assert_eq!(parsed.raw_path, "/~Blog/Posts/latest.css");
    }

    #[test]
    fn test_custom_app_root() {
        let reg = ModuleRegistry::new("/app");
        reg.register(Module::empty("Blog")).unwrap();

        let parsed = reg.parse_content_path("~/Areas/Blog/x.css");
        assert_eq!(parsed.full_path, "/app/Areas/Blog/x.css");
        assert_eq!(parsed.prefix, Some(ContentPrefix::Area));
        assert_eq!(parsed.module_name, "Blog");

        // a different root prefix does not match the area convention
        let parsed = reg.parse_content_path("/other/Areas/Blog/x.css");
        assert_eq!(parsed.prefix, None);
    }
}
