//! Clean XML serialization of the notice model.
//!
//! "Clean" means absent optional data produces no element or attribute at
//! all, never an empty placeholder. Emission order is fixed by the notice
//! schema and repeated elements (backtrace lines, var entries) keep their
//! source order, so the same notice always serializes to the same bytes.

use crate::models::{
    ErrorDetails, Notice, Notifier, Request, ServerEnvironment, Var, NOTICE_VERSION,
};
use crate::Error;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

type XmlWriter = Writer<Vec<u8>>;

/// Serializes a notice to schema-ordered XML, indented with two spaces and
/// without an XML declaration.
///
/// Missing required domain data (e.g. an absent [`Notice::error`]) is not
/// rejected here; the output stays well-formed and the gap is caught by
/// [`crate::validate_schema`]. That split keeps serialization infallible for
/// any model state and makes the validator the single place that knows the
/// schema.
pub fn to_xml(notice: &Notice) -> Result<String, Error> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_notice(&mut writer, notice)?;
    let xml = String::from_utf8(writer.into_inner())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    tracing::trace!(bytes = xml.len(), "serialized notice");
    Ok(xml)
}

fn write_notice(writer: &mut XmlWriter, notice: &Notice) -> Result<(), Error> {
    let mut start = BytesStart::new("notice");
    start.push_attribute(("version", NOTICE_VERSION));
    writer.write_event(Event::Start(start))?;

    write_text_element(writer, "api-key", &notice.api_key)?;
    write_notifier(writer, &notice.notifier)?;
    if let Some(error) = &notice.error {
        write_error(writer, error)?;
    }
    if let Some(request) = &notice.request {
        write_request(writer, request)?;
    }
    write_server_environment(writer, &notice.server_environment)?;

    writer.write_event(Event::End(BytesEnd::new("notice")))?;
    Ok(())
}

fn write_notifier(writer: &mut XmlWriter, notifier: &Notifier) -> Result<(), Error> {
    writer.write_event(Event::Start(BytesStart::new("notifier")))?;
    write_text_element(writer, "name", &notifier.name)?;
    write_text_element(writer, "version", &notifier.version)?;
    write_text_element(writer, "url", &notifier.url)?;
    writer.write_event(Event::End(BytesEnd::new("notifier")))?;
    Ok(())
}

fn write_error(writer: &mut XmlWriter, error: &ErrorDetails) -> Result<(), Error> {
    writer.write_event(Event::Start(BytesStart::new("error")))?;
    write_text_element(writer, "class", &error.class)?;
    write_text_element(writer, "message", &error.message)?;
    write_backtrace(writer, error)?;
    writer.write_event(Event::End(BytesEnd::new("error")))?;
    Ok(())
}

fn write_backtrace(writer: &mut XmlWriter, error: &ErrorDetails) -> Result<(), Error> {
    // The schema requires the backtrace element itself, so an empty trace
    // serializes as <backtrace/> rather than being omitted.
    if error.backtrace.is_empty() {
        writer.create_element("backtrace").write_empty()?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("backtrace")))?;
    for line in &error.backtrace {
        let number = line.number.to_string();
        let mut element = writer
            .create_element("line")
            .with_attribute(("file", line.file.as_str()))
            .with_attribute(("number", number.as_str()));
        if let Some(method) = &line.method {
            element = element.with_attribute(("method", method.as_str()));
        }
        element.write_empty()?;
    }
    writer.write_event(Event::End(BytesEnd::new("backtrace")))?;
    Ok(())
}

fn write_request(writer: &mut XmlWriter, request: &Request) -> Result<(), Error> {
    writer.write_event(Event::Start(BytesStart::new("request")))?;
    write_text_element(writer, "url", &request.url)?;
    write_text_element(writer, "component", &request.component)?;
    if let Some(action) = &request.action {
        write_text_element(writer, "action", action)?;
    }
    write_var_list(writer, "params", &request.params)?;
    write_var_list(writer, "session", &request.session)?;
    write_var_list(writer, "cgi-data", &request.cgi_data)?;
    writer.write_event(Event::End(BytesEnd::new("request")))?;
    Ok(())
}

fn write_var_list(writer: &mut XmlWriter, name: &str, vars: &[Var]) -> Result<(), Error> {
    if vars.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    for var in vars {
        writer
            .create_element("var")
            .with_attribute(("key", var.key.as_str()))
            .write_text_content(BytesText::new(&var.value))?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_server_environment(
    writer: &mut XmlWriter,
    environment: &ServerEnvironment,
) -> Result<(), Error> {
    writer.write_event(Event::Start(BytesStart::new("server-environment")))?;
    if let Some(project_root) = &environment.project_root {
        write_text_element(writer, "project-root", project_root)?;
    }
    write_text_element(writer, "environment-name", &environment.environment_name)?;
    writer.write_event(Event::End(BytesEnd::new("server-environment")))?;
    Ok(())
}

fn write_text_element(writer: &mut XmlWriter, name: &str, value: &str) -> Result<(), Error> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(value))?;
    Ok(())
}
