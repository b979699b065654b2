/// The HTTP request during which the error occurred.
#[derive(Debug, Clone)]
pub struct Request {
    /// URL of the originating request.
    pub url: String,

    /// Qualified name of the component handling the request, e.g. a
    /// controller type name.
    pub component: String,

    /// Action within the component, e.g. a handler method name.
    pub action: Option<String>,

    /// CGI/server variables. Omitted from the XML when empty.
    pub cgi_data: Vec<Var>,

    /// Request parameters. Omitted from the XML when empty.
    pub params: Vec<Var>,

    /// Session variables. Omitted from the XML when empty.
    pub session: Vec<Var>,
}

impl Request {
    /// Creates a request from the originating URL and the qualified name of
    /// the component that handled it.
    pub fn new(url: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            component: component.into(),
            action: None,
            cgi_data: Vec::new(),
            params: Vec::new(),
            session: Vec::new(),
        }
    }
}

/// A single name/value pair in one of the request's variable collections.
#[derive(Debug, Clone)]
pub struct Var {
    /// Variable name.
    pub key: String,
    /// Variable value.
    pub value: String,
}

impl Var {
    /// Creates a name/value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
