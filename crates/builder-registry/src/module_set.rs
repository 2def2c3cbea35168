//! `ModuleSet` (§4.F): disambiguates task names across a set of loaded
//! languages and resolves task references against it.

use crate::error::RegistryError;
use crate::language::Language;
use crate::task::Task;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

fn task_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(?:(\w+?)?::)?(\w+(?:-\w+)*)$").unwrap())
}

pub struct ModuleSet {
    modules: IndexMap<String, Language>,
    task_to_module: HashMap<String, String>,
    ambiguous: HashSet<String>,
}

impl ModuleSet {
    /// Builds a set from loaded languages in registration order, rewriting any
    /// task name that appears in more than one language to `tag::name` in
    /// every occurrence.
    pub fn new(modules: impl IntoIterator<Item = (String, Language)>) -> Self {
        let mut modules: IndexMap<String, Language> = modules.into_iter().collect();
        let (task_to_module, duplicates) = name_mappings(&modules);

        for (task_name, sources) in &duplicates {
            for module_name in sources {
                if let Some(module) = modules.get_mut(module_name) {
                    if let Some(task) = module.tasks_mut().iter_mut().find(|task| task.name() == task_name) {
                        task.set_name(format!("{module_name}::{task_name}"));
                    }
                }
            }
        }

        Self {
            modules,
            task_to_module,
            ambiguous: duplicates.into_keys().collect(),
        }
    }

    pub fn get_language(&self, tag: &str) -> Option<&Language> {
        self.modules.get(tag)
    }

    pub fn languages(&self) -> impl Iterator<Item = (&str, &Language)> {
        self.modules.iter().map(|(tag, language)| (tag.as_str(), language))
    }

    pub fn get_task(&self, task_ref: &str) -> Result<(&Language, &Task), RegistryError> {
        let (explicit_module, task_name) = parse_task_ref(task_ref)?;

        let explicit = explicit_module.is_some();
        let module_name = explicit_module.or_else(|| self.task_to_module.get(&task_name).cloned());

        let Some(module_name) = module_name else {
            return Err(if self.ambiguous.contains(&task_name) {
                RegistryError::Ambiguous(task_name)
            } else {
                RegistryError::NotDefined(task_name)
            });
        };

        let module = self
            .modules
            .get(&module_name)
            .ok_or_else(|| RegistryError::UnknownLanguage(module_name.clone()))?;

        // A tag explicitly supplied by the caller (`tag::name`) may name a
        // task that `new` rewrote in place because it was ambiguous across
        // languages — the bare name no longer exists on the module, only
        // the qualified one does.
        let qualified_name = format!("{module_name}::{task_name}");
        let task = module
            .get_task(&task_name)
            .or_else(|| if explicit { module.get_task(&qualified_name) } else { None })
            .ok_or_else(|| RegistryError::NoSuchTask {
                language: module_name.clone(),
                task: task_name.clone(),
            })?;

        Ok((module, task))
    }

    /// Formats the per-language task listing `print_available_tasks` emitted
    /// directly; callers log or print the result as fits their front end.
    pub fn format_available_tasks(&self) -> String {
        let mut output = String::new();
        for (tag, language) in &self.modules {
            output.push_str(&format!("    {tag}\n"));
            let name_width = language.tasks().iter().map(|task| task.name().len()).max().unwrap_or(0);
            for task in language.tasks() {
                output.push_str(&format!("        {:width$} -- {}\n", task.name(), task.help_text(), width = name_width));
            }
            output.push('\n');
        }
        output
    }
}

fn name_mappings(modules: &IndexMap<String, Language>) -> (HashMap<String, String>, IndexMap<String, Vec<String>>) {
    let mut task_names: IndexMap<String, Vec<String>> = IndexMap::new();
    for (module_name, language) in modules {
        for task in language.tasks() {
            task_names.entry(task.name().to_string()).or_default().push(module_name.clone());
        }
    }

    let mut unique = HashMap::new();
    let mut duplicates = IndexMap::new();
    for (name, sources) in task_names {
        if sources.len() == 1 {
            unique.insert(name, sources.into_iter().next().unwrap());
        } else {
            duplicates.insert(name, sources);
        }
    }

    (unique, duplicates)
}

fn parse_task_ref(reference: &str) -> Result<(Option<String>, String), RegistryError> {
    let captures = task_ref_pattern()
        .captures(reference)
        .ok_or_else(|| RegistryError::InvalidTaskRef(reference.to_string()))?;
    let module = captures.get(1).map(|m| m.as_str().to_string());
    let task = captures.get(2).unwrap().as_str().to_string();
    Ok((module, task))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn language_with(tag: &str, tasks: &[&str]) -> (String, Language) {
        let mut language = Language::new(tag);
        for name in tasks {
            language.add_task(Task::new(*name));
        }
        (tag.to_string(), language)
    }

    #[test]
    fn ambiguity_rewrite_qualifies_only_shared_names() {
        let l1 = language_with("l1", &["t1", "t2", "t3"]);
        let l2 = language_with("l2", &["t3", "t4", "t5"]);
        let set = ModuleSet::new([l1, l2]);

        assert!(set.get_task("t1").is_ok());
        assert!(set.get_task("t2").is_ok());
        assert!(set.get_task("t4").is_ok());
        assert!(set.get_task("t5").is_ok());

        assert!(matches!(set.get_task("t3"), Err(RegistryError::Ambiguous(_))));
        assert_eq!(set.get_task("l1::t3").unwrap().1.name(), "l1::t3");
        assert_eq!(set.get_task("l2::t3").unwrap().1.name(), "l2::t3");
    }

    #[test]
    fn unqualified_reference_to_unknown_task_errors() {
        let l1 = language_with("l1", &["t1"]);
        let set = ModuleSet::new([l1]);
        assert!(matches!(set.get_task("nope"), Err(RegistryError::NotDefined(_))));
    }

    #[test]
    fn bare_double_colon_prefix_is_ignored() {
        let l1 = language_with("l1", &["t1"]);
        let set = ModuleSet::new([l1]);
        assert!(set.get_task("::t1").is_ok());
    }

    #[test]
    fn invalid_reference_syntax_errors() {
        let l1 = language_with("l1", &["t1"]);
        let set = ModuleSet::new([l1]);
        assert!(matches!(set.get_task("not a task!"), Err(RegistryError::InvalidTaskRef(_))));
    }
}
