//! `Engine` (§4.H): resolves task references to work, orders it by
//! prerequisite, and drives each task's dependency resolution and
//! invocation.

use crate::error::EngineError;
use crate::host::EngineResolutionHost;
use builder_cache::FileCache;
use builder_core::{BuilderError, GlobalOptions};
use builder_deps::DependencyPathSet;
use builder_project::Project;
use builder_registry::{Language, RegistryError, Task, TaskContext, TaskInput};
use builder_resolve::DependencyContext;
use serde_json::Value;
use std::sync::Arc;

pub struct Engine {
    project: Arc<Project>,
    registry: Arc<builder_registry::LanguageRegistry>,
    options: Arc<GlobalOptions>,
    cache: Arc<FileCache>,
}

impl Engine {
    pub fn new(project: Arc<Project>, registry: Arc<builder_registry::LanguageRegistry>, options: Arc<GlobalOptions>, cache: Arc<FileCache>) -> Self {
        Self {
            project,
            registry,
            options,
            cache,
        }
    }

    /// Runs the named tasks to completion, returning the process exit code:
    /// 0 on success, 1 when no tasks were given, else whatever
    /// `BuilderError::exit_code` reports for the failure encountered.
    pub fn run(&self, task_refs: &[String]) -> i32 {
        match self.try_run(task_refs) {
            Ok(()) => 0,
            Err(error) => {
                let widened: BuilderError = error.into();
                tracing::error!(target = "builder.engine", error = %widened, "run failed");
                widened.exit_code()
            }
        }
    }

    fn try_run(&self, task_refs: &[String]) -> Result<(), EngineError> {
        let module_set = self.project.get_module_set().ok_or(EngineError::NoTasksSpecified)?;

        if task_refs.is_empty() {
            tracing::warn!(target = "builder.engine", "no tasks specified");
            tracing::info!(target = "builder.engine", "{}", module_set.format_available_tasks());
            return Err(EngineError::NoTasksSpecified);
        }

        let requested: Vec<(&Language, &Task)> = task_refs.iter().map(|reference| module_set.get_task(reference)).collect::<Result<_, RegistryError>>()?;

        let ordered = if self.options.no_requires {
            requested
        } else {
            expand_prerequisites(&requested)?
        };

        for (language, task) in ordered {
            tracing::info!(target = "builder.engine", task = task.name(), "--> {}", task.name());
            if task.function().is_some() {
                self.execute(language, task)?;
            }
        }

        Ok(())
    }

    fn execute(&self, language: &Language, task: &Task) -> Result<(), EngineError> {
        let wants_all = task.needs_all_dependencies() || task.declares(TaskInput::AllDependencies);
        let scoped = if wants_all {
            self.project.get_dependencies().all()
        } else {
            self.project.get_dependencies().dependencies_for(task.name())
        };

        let accepts_dependencies = task.declares(TaskInput::Dependencies) || task.declares(TaskInput::AllDependencies);
        if !scoped.is_empty() && !accepts_dependencies {
            return Err(EngineError::DependenciesNotAccepted { task: task.name().to_string() });
        }

        let resolved: Vec<DependencyPathSet> = if accepts_dependencies && !scoped.is_empty() {
            let host = Arc::new(EngineResolutionHost::from_language(
                language,
                self.project.project_cache().clone(),
                Arc::clone(&self.registry),
                Arc::clone(&self.options),
            ));
            let context = DependencyContext::new(scoped, host, Arc::clone(&self.cache), Vec::new(), self.options.force_fetch);
            context.resolve()?
        } else {
            Vec::new()
        };

        let language_config = self.project.get_config_value(language.tag(), language.configuration_schema())?;
        let task_config = self.project.get_config_value(task.name(), task.configuration_schema())?;

        let context = EngineTaskContext {
            project: self.project.as_value(),
            language_config,
            task_config,
            dependencies: resolved,
        };

        let function = task.function().expect("checked by caller");
        function(&context).map_err(EngineError::Registry)
    }
}

struct EngineTaskContext<'a> {
    project: &'a Value,
    language_config: Value,
    task_config: Value,
    dependencies: Vec<DependencyPathSet>,
}

impl<'a> TaskContext for EngineTaskContext<'a> {
    fn project(&self) -> &Value {
        self.project
    }

    fn language_config(&self) -> &Value {
        &self.language_config
    }

    fn task_config(&self) -> &Value {
        &self.task_config
    }

    fn dependencies(&self) -> &[DependencyPathSet] {
        &self.dependencies
    }

    fn all_dependencies(&self) -> &[DependencyPathSet] {
        &self.dependencies
    }
}

/// A post-order expansion of `requested`: every task appears after its own
/// prerequisites and exactly once, ties among independently requested
/// top-level tasks broken by the caller's own input order. Transcribed from
/// the original engine's `_get_tasks_in_execution_order`/`add_task`.
fn expand_prerequisites<'a>(requested: &[(&'a Language, &'a Task)]) -> Result<Vec<(&'a Language, &'a Task)>, EngineError> {
    let mut seen = Vec::new();
    let mut ordered = Vec::new();

    for (language, task) in requested {
        add_task(language, task, &mut seen, &mut ordered)?;
    }

    Ok(ordered)
}

fn add_task<'a>(language: &'a Language, task: &'a Task, seen: &mut Vec<String>, ordered: &mut Vec<(&'a Language, &'a Task)>) -> Result<(), EngineError> {
    if seen.iter().any(|name| name == task.name()) {
        return Ok(());
    }

    for required_name in task.require() {
        let required = language.get_task(required_name).ok_or_else(|| {
            EngineError::Registry(RegistryError::NoSuchTask {
                language: language.tag().to_string(),
                task: required_name.clone(),
            })
        })?;
        add_task(language, required, seen, ordered)?;
    }

    seen.push(task.name().to_string());
    ordered.push((language, task));
    Ok(())
}
