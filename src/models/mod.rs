mod error_details;
mod notice;
mod notifier;
mod request;
mod server_environment;

pub use error_details::{ErrorDetails, TraceLine};
pub use notice::{Notice, NOTICE_VERSION};
pub use notifier::Notifier;
pub use request::{Request, Var};
pub use server_environment::ServerEnvironment;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_starts_without_error_or_request() {
        let notice = Notice::new(
            "123456",
            Notifier::default(),
            ServerEnvironment::new("staging"),
        );
        assert_eq!("123456", notice.api_key);
        assert!(notice.error.is_none());
        assert!(notice.request.is_none());
    }

    #[test]
    fn default_notifier_identifies_this_crate() {
        let notifier = Notifier::default();
        assert_eq!(env!("CARGO_PKG_NAME"), notifier.name);
        assert_eq!(env!("CARGO_PKG_VERSION"), notifier.version);
        assert!(!notifier.url.is_empty());
    }

    #[test]
    fn trace_line_method_is_optional() {
        let line = TraceLine::new("app.rs", 42);
        assert!(line.method.is_none());
        let line = line.with_method("main");
        assert_eq!(Some("main"), line.method.as_deref());
    }

    #[test]
    fn request_collections_start_empty() {
        let request = Request::new("http://example.com/", "app::handlers::Home");
        assert!(request.cgi_data.is_empty());
        assert!(request.params.is_empty());
        assert!(request.session.is_empty());
        assert!(request.action.is_none());
    }
}
