#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("the text, \"{0}\", is not a valid task name")]
    InvalidTaskRef(String),

    #[error("the task name, \"{0}\", is ambiguous")]
    Ambiguous(String),

    #[error("the task name, \"{0}\", is not defined")]
    NotDefined(String),

    #[error("there is no language named \"{0}\"")]
    UnknownLanguage(String),

    #[error("there is no task named \"{task}\" for the \"{language}\" language")]
    NoSuchTask { language: String, task: String },

    #[error("task \"{0}\" failed: {1}")]
    TaskFailed(String, String),
}
