//! Route template compilation.
//!
//! A template is a path with `{name}` placeholders: `/api/role/{uuid}`.
//! Compilation turns it into an anchored regex plus the placeholder names in
//! order of appearance, once, at table-construction time. Matching a request
//! never recompiles — it runs one `captures` call against the prebuilt
//! pattern.
//!
//! A placeholder matches exactly one path segment. `/api/role/{uuid}`
//! matches `/api/role/abc-123` but not `/api/role/abc/extra`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::RouteError;

/// `{name}` where `name` contains neither `/` nor `}`.
fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([^/}]+)\}").expect("placeholder regex is valid"))
}

/// A route template compiled into a matchable pattern.
///
/// ```rust
/// use junction::CompiledTemplate;
///
/// let tpl = CompiledTemplate::compile("/users/{id}/posts/{post}")?
///     .expect("template has placeholders");
/// assert_eq!(tpl.variable_names(), ["id", "post"]);
///
/// let vars = tpl.match_path("/users/42/posts/7").expect("path fits the template");
/// assert_eq!(vars["id"], "42");
/// assert_eq!(vars["post"], "7");
/// # Ok::<(), junction::RouteError>(())
/// ```
#[derive(Clone, Debug)]
pub struct CompiledTemplate {
    template: String,
    pattern: Regex,
    variable_names: Vec<String>,
}

impl CompiledTemplate {
    /// Compiles `template`, or returns `Ok(None)` if it contains no
    /// placeholders — a literal path is the exact table's job, not the
    /// template set's.
    ///
    /// Placeholder names are recorded left to right, one entry per
    /// occurrence; a repeated name is recorded each time it appears.
    pub fn compile(template: &str) -> Result<Option<Self>, RouteError> {
        let mut variable_names = Vec::new();
        let mut pattern = String::from("^");
        let mut tail = 0;

        for m in placeholder().find_iter(template) {
            pattern.push_str(&regex::escape(&template[tail..m.start()]));
            pattern.push_str("([^/]+)");
            // The match is `{name}`; the name is everything inside the braces.
            variable_names.push(template[m.start() + 1..m.end() - 1].to_owned());
            tail = m.end();
        }

        if variable_names.is_empty() {
            return Ok(None);
        }

        pattern.push_str(&regex::escape(&template[tail..]));
        pattern.push('$');

        let pattern = Regex::new(&pattern).map_err(|source| RouteError::Template {
            template: template.to_owned(),
            source,
        })?;

        Ok(Some(Self { template: template.to_owned(), pattern, variable_names }))
    }

    /// The original template string, exactly as registered.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The compiled pattern's textual form. Two templates that render to the
    /// same pattern string can never both match — registration treats that
    /// as a configuration error.
    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Placeholder names in order of appearance, duplicates included.
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    pub fn variable_count(&self) -> usize {
        self.variable_names.len()
    }

    /// Matches `path` against the pattern, anchored at both ends.
    ///
    /// A structural match must produce exactly
    /// [`variable_count`](Self::variable_count) capture groups; anything else
    /// is treated as no match rather than yielding partial bindings. Captures
    /// pair positionally with the recorded names — when a name repeats, the
    /// later capture wins.
    pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.pattern.captures(path)?;
        if caps.len() != self.variable_names.len() + 1 {
            return None;
        }
        let mut variables = HashMap::with_capacity(self.variable_names.len());
        for (i, name) in self.variable_names.iter().enumerate() {
            let group = caps.get(i + 1)?;
            variables.insert(name.clone(), group.as_str().to_owned());
        }
        Some(variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths_do_not_compile() {
        assert!(CompiledTemplate::compile("/users").unwrap().is_none());
        assert!(CompiledTemplate::compile("/").unwrap().is_none());
        // An unclosed brace is not a placeholder.
        assert!(CompiledTemplate::compile("/users/{id").unwrap().is_none());
    }

    #[test]
    fn names_record_in_order_of_appearance() {
        let tpl = CompiledTemplate::compile("/a/{first}/{second}/c/{third}")
            .unwrap()
            .unwrap();
        assert_eq!(tpl.variable_names(), ["first", "second", "third"]);
        assert_eq!(tpl.variable_count(), 3);
    }

    #[test]
    fn repeated_names_are_not_deduplicated() {
        let tpl = CompiledTemplate::compile("/{x}/{x}").unwrap().unwrap();
        assert_eq!(tpl.variable_names(), ["x", "x"]);
        assert_eq!(tpl.variable_count(), 2);
    }

    #[test]
    fn repeated_name_later_capture_wins() {
        let tpl = CompiledTemplate::compile("/{x}/{x}").unwrap().unwrap();
        let vars = tpl.match_path("/first/second").unwrap();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["x"], "second");
    }

    #[test]
    fn placeholders_match_single_segments_only() {
        let tpl = CompiledTemplate::compile("/api/role/{uuid}").unwrap().unwrap();

        let vars = tpl.match_path("/api/role/abc-123").unwrap();
        assert_eq!(vars["uuid"], "abc-123");

        assert!(tpl.match_path("/api/role/abc/extra").is_none());
        assert!(tpl.match_path("/api/role/").is_none());
    }

    #[test]
    fn matching_is_anchored_at_both_ends() {
        let tpl = CompiledTemplate::compile("/users/{id}").unwrap().unwrap();
        assert!(tpl.match_path("/v1/users/42").is_none());
        assert!(tpl.match_path("/users/42/posts").is_none());
    }

    #[test]
    fn literal_chunks_are_escaped() {
        let tpl = CompiledTemplate::compile("/v1.0/{id}").unwrap().unwrap();
        assert!(tpl.match_path("/v1.0/7").is_some());
        // `.` must not behave as a regex wildcard.
        assert!(tpl.match_path("/v1x0/7").is_none());
    }

    #[test]
    fn group_count_mismatch_is_no_match() {
        // A pattern whose capture count disagrees with the recorded names
        // must reject the match outright instead of binding partially.
        let tpl = CompiledTemplate {
            template: "/users/{id}".to_owned(),
            pattern: Regex::new("^/users/([^/]+)/([^/]+)$").unwrap(),
            variable_names: vec!["id".to_owned()],
        };
        assert!(tpl.match_path("/users/42/7").is_none());
    }
}
