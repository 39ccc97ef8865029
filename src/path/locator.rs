//! Parsed resource locator covering both local paths and URLs.
//!
//! - Internal representation: always decoded (human-readable)
//! - Directory is normalized on every write: no `\`, no trailing slash,
//!   no unresolved `..`

use rustc_hash::FxHashMap;
use std::hash::{Hash, Hasher};

use super::algebra::{self, normalize};

/// A resource address decomposed into its parts.
///
/// Local paths carry the `file` scheme with no host; network addresses keep
/// scheme, user info, host and non-default port. Equality and hashing go
/// through the fully composed address string, so two locators that render
/// identically are the same locator.
#[derive(Debug, Clone, Default)]
pub struct PathLocator {
    scheme: String,
    user_info: String,
    host: String,
    port: Option<u16>,
    directory: String,
    file_name: String,
    query: String,
    fragment: String,
}

impl PathLocator {
    /// Parse a locator from a local path or URL string.
    ///
    /// Empty input collapses to an empty locator.
    pub fn parse(input: &str) -> Self {
        let mut locator = Self::default();
        if input.is_empty() {
            return locator;
        }

        if algebra::is_url(input) {
            locator.init_from_url(input);
        } else {
            locator.init_from_local(input);
        }

        // The parser can leave a literal `?` inside the path when the query
        // marker arrived percent-encoded; re-split so the query never hides
        // in the filename.
        if locator.query.is_empty()
            && let Some(pos) = locator.file_name.find('?')
        {
            locator.query = locator.file_name[pos + 1..].to_string();
            locator.file_name.truncate(pos);
        }

        locator
    }

    fn init_from_url(&mut self, input: &str) {
        let Ok(url) = url::Url::parse(input) else {
            // not a well-formed URL after all, treat it as a local path
            self.init_from_local(input);
            return;
        };

        self.scheme = url.scheme().to_string();
        self.user_info = match (url.username(), url.password()) {
            ("", None) => String::new(),
            (user, None) => user.to_string(),
            (user, Some(pass)) => format!("{user}:{pass}"),
        };
        self.host = url.host_str().unwrap_or("").to_string();
        // `port()` is already None when the port is the scheme default
        self.port = url.port();

        let path = decode(url.path());
        self.split_path(&path);
        self.query = url.query().map(decode).unwrap_or_default();
        self.fragment = url.fragment().map(decode).unwrap_or_default();
    }

    fn init_from_local(&mut self, input: &str) {
        self.scheme = "file".to_string();

        let (rest, fragment) = match input.rsplit_once('#') {
            Some((r, f)) => (r, f.to_string()),
            None => (input, String::new()),
        };
        let (path, query) = match rest.split_once('?') {
            Some((p, q)) => (p, q.to_string()),
            None => (rest, String::new()),
        };

        self.split_path(path);
        self.query = query;
        self.fragment = fragment;
    }

    fn split_path(&mut self, path: &str) {
        let norm = normalize(path);
        match norm.rfind('/') {
            Some(pos) => {
                self.directory = norm[..pos].to_string();
                self.file_name = norm[pos + 1..].to_string();
            }
            None => {
                self.directory = String::new();
                self.file_name = norm;
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn user_info(&self) -> &str {
        &self.user_info
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Whether this locator addresses the local filesystem.
    pub fn is_local(&self) -> bool {
        self.host.is_empty() && (self.scheme.is_empty() || self.scheme == "file")
    }

    /// Whether every component is empty.
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
            && self.file_name.is_empty()
            && self.host.is_empty()
            && self.query.is_empty()
            && self.fragment.is_empty()
    }

    /// Extension of the filename, without the dot.
    ///
    /// A dot at position 0 marks a hidden file, not an extension.
    pub fn extension(&self) -> Option<&str> {
        match self.file_name.rfind('.') {
            Some(pos) if pos > 0 => Some(&self.file_name[pos + 1..]),
            _ => None,
        }
    }

    /// Filename with the extension removed.
    pub fn file_stem(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(pos) if pos > 0 => &self.file_name[..pos],
            _ => &self.file_name,
        }
    }

    /// Directory plus filename, no scheme or query.
    pub fn local_path(&self) -> String {
        if self.directory.is_empty() {
            return self.file_name.clone();
        }
        if self.file_name.is_empty() {
            return self.directory.clone();
        }
        format!("{}/{}", self.directory, self.file_name)
    }

    /// Scheme, user info, host and port, empty for local locators.
    pub fn url_prefix(&self) -> String {
        if self.is_local() {
            return String::new();
        }
        let mut prefix = format!("{}://", self.scheme);
        if !self.user_info.is_empty() {
            prefix.push_str(&self.user_info);
            prefix.push('@');
        }
        prefix.push_str(&self.host);
        if let Some(port) = self.port {
            prefix.push_str(&format!(":{port}"));
        }
        prefix
    }

    /// Query and fragment with their markers, empty when both are empty.
    pub fn url_suffix(&self) -> String {
        let mut suffix = String::new();
        if !self.query.is_empty() {
            suffix.push('?');
            suffix.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            suffix.push('#');
            suffix.push_str(&self.fragment);
        }
        suffix
    }

    /// Decompose the query string into key/value pairs.
    pub fn params(&self) -> FxHashMap<String, String> {
        let mut params = FxHashMap::default();
        for pair in self.query.split('&') {
            if pair.is_empty() {
                continue;
            }
            match pair.split_once('=') {
                Some((k, v)) => params.insert(k.to_string(), v.to_string()),
                None => params.insert(pair.to_string(), String::new()),
            };
        }
        params
    }

    /// Locator of the containing directory, query and fragment dropped.
    pub fn parent(&self) -> Self {
        let mut parent = self.clone();
        parent.query = String::new();
        parent.fragment = String::new();
        parent.split_path(&self.directory);
        parent
    }

    // ========================================================================
    // Setters (each re-normalizes what it touches)
    // ========================================================================

    pub fn set_directory(&mut self, directory: &str) {
        self.directory = normalize(directory);
    }

    pub fn set_file_name(&mut self, file_name: &str) {
        self.file_name = file_name.to_string();
        // a slipped-in directory part belongs to the directory field
        if self.file_name.contains('/') || self.file_name.contains('\\') {
            let combined = algebra::combine(&self.directory, &self.file_name.clone());
            self.split_path(&combined);
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim_start_matches('?').to_string();
    }

    pub fn set_fragment(&mut self, fragment: &str) {
        self.fragment = fragment.trim_start_matches('#').to_string();
    }

    /// Replace directory and filename in one go.
    pub fn set_local_path(&mut self, path: &str) {
        self.split_path(path);
    }
}

fn decode(encoded: &str) -> String {
    percent_encoding::percent_decode_str(encoded)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| encoded.to_string())
}

impl std::fmt::Display for PathLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_local() {
            write!(f, "{}{}", self.local_path(), self.url_suffix())
        } else {
            let path = self.local_path();
            let sep = if path.starts_with('/') { "" } else { "/" };
            write!(f, "{}{sep}{path}{}", self.url_prefix(), self.url_suffix())
        }
    }
}

impl PartialEq for PathLocator {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for PathLocator {}

impl Hash for PathLocator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl From<&str> for PathLocator {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
