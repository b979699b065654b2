/// The error being reported: type name, message and stack trace.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    /// Error/exception type name, e.g. `DivideByZeroError`.
    pub class: String,

    /// Error message.
    pub message: String,

    /// Stack trace lines, innermost frame first, serialized in this order.
    pub backtrace: Vec<TraceLine>,
}

impl ErrorDetails {
    /// Creates error details with an empty backtrace.
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            message: message.into(),
            backtrace: Vec::new(),
        }
    }
}

/// A single stack trace line.
#[derive(Debug, Clone)]
pub struct TraceLine {
    /// Source file path.
    pub file: String,

    /// 1-based line number; 0 when unknown.
    pub number: u32,

    /// Method or function name, when known.
    pub method: Option<String>,
}

impl TraceLine {
    /// Creates a trace line without a method name.
    pub fn new(file: impl Into<String>, number: u32) -> Self {
        Self {
            file: file.into(),
            number,
            method: None,
        }
    }

    /// Sets the method name.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}
