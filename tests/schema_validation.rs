use airbrake_notice::{
    validate_schema, ErrorDetails, Notice, Notifier, Request, ServerEnvironment, TraceLine, Var,
};

fn hopsharp_notifier() -> Notifier {
    Notifier::new("hopsharp", "2.0", "http://github.com/krobertson/hopsharp")
}

fn staging_environment() -> ServerEnvironment {
    let mut environment = ServerEnvironment::new("staging");
    environment.project_root = Some("/test".into());
    environment
}

fn test_error() -> ErrorDetails {
    let mut error = ErrorDetails::new("TestError", "something blew up");
    error
        .backtrace
        .push(TraceLine::new("unknown.cs", 0).with_method("unknown"));
    error
}

#[test]
fn maximal_notice_generates_valid_xml() {
    let mut request = Request::new("http://example.com/myapp", "MyApp.HomeController");
    request.action = Some("maximal_notice_generates_valid_xml".into());
    request.cgi_data.push(Var::new("REQUEST_METHOD", "POST"));
    request.params.push(Var::new("Form.Key1", "Form.Value1"));
    request.session.push(Var::new("UserId", "1"));

    let mut notice = Notice::new("123456", hopsharp_notifier(), staging_environment());
    notice.error = Some(test_error());
    notice.request = Some(request);

    let xml = notice.to_xml().unwrap();
    validate_schema(&xml).unwrap();
}

#[test]
fn minimal_notice_generates_valid_xml() {
    let mut notice = Notice::new("123456", hopsharp_notifier(), staging_environment());
    notice.error = Some(test_error());

    let xml = notice.to_xml().unwrap();
    validate_schema(&xml).unwrap();
    assert!(!xml.contains("<request"));
}

#[test]
fn notice_missing_error_fails_validation() {
    let mut request = Request::new("http://example.com/", "tests::SchemaValidation");
    request.action = Some("notice_missing_error_fails_validation".into());

    let mut notice = Notice::new("123456", hopsharp_notifier(), staging_environment());
    notice.request = Some(request);

    let xml = notice.to_xml().unwrap();
    let failure = validate_schema(&xml).unwrap_err();

    assert!(failure.message.contains("'notice'"), "{}", failure.message);
    assert!(failure.message.contains("'error'"), "{}", failure.message);
    assert_eq!(17, failure.line);
    assert_eq!(3, failure.column);
}
