//! The process-wide context a front end populates from argv and threads through
//! every operation, replacing the original's module-level global singleton per
//! §9's design note on shared mutable state.

use std::collections::HashMap;
use std::path::PathBuf;

/// The CLI surface named in §6, held as plain data. Constructing one from
/// `std::env::args()` is the front end's job, not the core's.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbosity: u32,
    pub directory: Option<PathBuf>,
    pub languages: Vec<String>,
    pub no_requires: bool,
    pub force_fetch: bool,
    sets: HashMap<String, String>,
}

impl GlobalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one or more `--set name=value[,name=value...]` occurrences, merging
    /// into the override map. Later occurrences of the same name win.
    pub fn add_set(&mut self, spec: &str) {
        for pair in spec.split(',') {
            if let Some((name, value)) = pair.split_once('=') {
                self.sets.insert(name.trim().to_string(), value.to_string());
            }
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Replaces every `${name}` occurrence in `text` with the current value of
    /// `name`: a `--set` override if present, else nothing supplied here (callers
    /// combining this with descriptor `vars` look those up first and fall back to
    /// this map only when absent). Unknown names substitute to the empty string.
    pub fn substitute(&self, text: &str) -> String {
        substitute_with(text, |name| self.sets.get(name).cloned())
    }
}

/// Replaces `${name}` references in `text` using `lookup`, which returns `None`
/// for an unknown variable (substituted as the empty string). Shared by
/// `GlobalOptions::substitute` and `builder-project`'s descriptor-wide
/// substitution, which additionally falls back to descriptor `vars`.
pub fn substitute_with(text: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                result.push_str(&lookup(name).unwrap_or_default());
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
                break;
            }
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_and_unknown_vars() {
        let mut opts = GlobalOptions::new();
        opts.add_set("v=1");
        assert_eq!(opts.substitute("${v}"), "1");
        assert_eq!(opts.substitute("${v} on ${v}"), "1 on 1");
        assert_eq!(opts.substitute("${missing}"), "");
    }

    #[test]
    fn add_set_parses_comma_separated_pairs() {
        let mut opts = GlobalOptions::new();
        opts.add_set("a=1,b=2");
        assert_eq!(opts.substitute("${a}-${b}"), "1-2");
    }
}
