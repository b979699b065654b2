/// Static identification of the client library producing notices. Typically
/// constant per client build.
#[derive(Debug, Clone)]
pub struct Notifier {
    /// Client library name.
    pub name: String,
    /// Client library version.
    pub version: String,
    /// URL of the client library's project page.
    pub url: String,
}

impl Notifier {
    /// Creates a notifier identification.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            url: url.into(),
        }
    }
}

impl Default for Notifier {
    /// Identifies this crate as the notifier.
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").into(),
            version: env!("CARGO_PKG_VERSION").into(),
            url: env!("CARGO_PKG_REPOSITORY").into(),
        }
    }
}
