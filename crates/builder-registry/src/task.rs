//! `Task` (§3, §9): a named unit of work belonging to one language, plus the
//! explicit input-descriptor tags that replace the original's reflection-based
//! argument building.

use crate::error::RegistryError;
use builder_deps::DependencyPathSet;
use serde_json::Value;
use std::sync::Arc;

/// One of the services a task's implementation function may ask to be handed,
/// chosen at registration instead of discovered by introspecting the
/// function's parameter names (§9's design note).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskInput {
    Project,
    LanguageConfig,
    TaskConfig,
    Dependencies,
    AllDependencies,
}

/// What a task's implementation function sees when invoked: project and
/// config data as validated JSON values (the concrete `Project`/config types
/// live above this crate, in `builder-project`/`builder-engine`, so the
/// function signature here is expressed against this seam instead of those
/// types directly), plus the path sets resolved for its scope.
pub trait TaskContext {
    fn project(&self) -> &Value;
    fn language_config(&self) -> &Value;
    fn task_config(&self) -> &Value;
    fn dependencies(&self) -> &[DependencyPathSet];
    fn all_dependencies(&self) -> &[DependencyPathSet];
}

pub type TaskFunction = Arc<dyn Fn(&dyn TaskContext) -> Result<(), RegistryError> + Send + Sync>;

pub struct Task {
    name: String,
    function: Option<TaskFunction>,
    require: Vec<String>,
    configuration_schema: Option<Value>,
    needs_all_dependencies: bool,
    help_text: Option<String>,
    inputs: Vec<TaskInput>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            function: None,
            require: Vec::new(),
            configuration_schema: None,
            needs_all_dependencies: false,
            help_text: None,
            inputs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn function(&self) -> Option<&TaskFunction> {
        self.function.as_ref()
    }

    pub fn with_function(mut self, function: TaskFunction) -> Self {
        self.function = Some(function);
        self
    }

    pub fn require(&self) -> &[String] {
        &self.require
    }

    pub fn with_require(mut self, require: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.require = require.into_iter().map(Into::into).collect();
        self
    }

    pub fn configuration_schema(&self) -> Option<&Value> {
        self.configuration_schema.as_ref()
    }

    pub fn with_configuration_schema(mut self, schema: Value) -> Self {
        self.configuration_schema = Some(schema);
        self
    }

    pub fn needs_all_dependencies(&self) -> bool {
        self.needs_all_dependencies
    }

    pub fn with_needs_all_dependencies(mut self, value: bool) -> Self {
        self.needs_all_dependencies = value;
        self
    }

    pub fn help_text(&self) -> &str {
        self.help_text.as_deref().unwrap_or("")
    }

    pub fn with_help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn inputs(&self) -> &[TaskInput] {
        &self.inputs
    }

    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = TaskInput>) -> Self {
        self.inputs = inputs.into_iter().collect();
        self
    }

    pub fn declares(&self, input: TaskInput) -> bool {
        self.inputs.contains(&input)
    }
}
