/// The environment the reporting application runs in.
#[derive(Debug, Clone)]
pub struct ServerEnvironment {
    /// Environment name, e.g. "staging" or "production".
    pub environment_name: String,

    /// Root path of the project on the server, when known.
    pub project_root: Option<String>,
}

impl ServerEnvironment {
    /// Creates a server environment with no project root.
    pub fn new(environment_name: impl Into<String>) -> Self {
        Self {
            environment_name: environment_name.into(),
            project_root: None,
        }
    }
}
