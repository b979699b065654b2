//! Validation of notice XML against the bundled schema.
//!
//! The document is streamed with quick-xml and matched element by element
//! against the compiled schema tables. Violations carry the 1-based line and
//! column of the offending spot in the input text, so callers can pinpoint
//! exactly where a notice was incomplete before any network call is made.

use crate::error::SchemaValidationError;
use crate::schema::{self, AttributeRule, ChildRule, Content, MaxOccurs, Schema, XS_STRING};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

/// Validates a notice XML string against the bundled schema
/// (`airbrake_2_0.xsd`).
///
/// Returns the first violation found. Missing required children are reported
/// at the parent's end tag; all other violations point at the element where
/// they were detected. The column points at the element name, not the `<`.
pub fn validate_schema(xml: &str) -> Result<(), SchemaValidationError> {
    let schema = schema::notice_schema();
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root_seen = false;

    loop {
        let offset = reader.buffer_position() as usize;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => {
                return Err(validation_error(
                    xml,
                    offset,
                    format!("The XML document is not well-formed: {source}."),
                ));
            }
        };
        match event {
            Event::Start(start) => {
                let frame = enter_element(schema, xml, &mut stack, &mut root_seen, &start, offset)?;
                stack.push(frame);
            }
            Event::Empty(start) => {
                let frame = enter_element(schema, xml, &mut stack, &mut root_seen, &start, offset)?;
                check_complete(xml, &frame, offset + 1)?;
            }
            Event::End(_) => {
                if let Some(frame) = stack.pop() {
                    check_complete(xml, &frame, offset + 2)?;
                }
            }
            Event::Text(text) => check_text(xml, &stack, &text, offset)?,
            Event::CData(_) => {
                if let Some(frame) = stack.last() {
                    if !matches!(frame.state, State::Text) {
                        return Err(validation_error(
                            xml,
                            offset,
                            format!("The element '{}' cannot contain character data.", frame.name),
                        ));
                    }
                }
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(frame) = stack.last() {
        return Err(validation_error(
            xml,
            xml.len(),
            format!("The element '{}' is not closed.", frame.name),
        ));
    }
    if !root_seen {
        return Err(validation_error(
            xml,
            0,
            format!("The root element '{}' is missing.", schema.root),
        ));
    }
    tracing::debug!("notice XML passed schema validation");
    Ok(())
}

struct Frame {
    name: String,
    state: State,
}

enum State {
    All {
        rules: &'static [ChildRule],
        seen: Vec<bool>,
    },
    Sequence {
        rules: &'static [ChildRule],
        cursor: usize,
        count: u64,
    },
    Text,
    Empty,
}

fn enter_element(
    schema: &'static Schema,
    xml: &str,
    stack: &mut [Frame],
    root_seen: &mut bool,
    start: &BytesStart<'_>,
    offset: usize,
) -> Result<Frame, SchemaValidationError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let name_pos = offset + 1;

    let type_name = match stack.last_mut() {
        Some(parent) => accept_child(xml, parent, &name, name_pos)?,
        None => {
            if *root_seen {
                return Err(validation_error(
                    xml,
                    name_pos,
                    format!("Only one root element is allowed; unexpected element '{name}'."),
                ));
            }
            if name != schema.root {
                return Err(validation_error(
                    xml,
                    name_pos,
                    format!(
                        "The '{name}' element is not declared. Expected root element '{}'.",
                        schema.root
                    ),
                ));
            }
            *root_seen = true;
            schema.root_type.as_str()
        }
    };

    let ctype = if type_name == XS_STRING {
        None
    } else {
        schema.types.get(type_name)
    };
    let attribute_rules = ctype.map(|t| t.attributes.as_slice()).unwrap_or(&[]);
    check_attributes(xml, start, &name, attribute_rules, name_pos)?;

    let state = match ctype.map(|t| &t.content) {
        Some(Content::All(rules)) => State::All {
            rules: rules.as_slice(),
            seen: vec![false; rules.len()],
        },
        Some(Content::Sequence(rules)) => State::Sequence {
            rules: rules.as_slice(),
            cursor: 0,
            count: 0,
        },
        Some(Content::Text) | None => State::Text,
        Some(Content::Empty) => State::Empty,
    };

    Ok(Frame { name, state })
}

/// Matches a child element against the parent's content model, advancing the
/// parent's matching state. Returns the child's schema type name.
fn accept_child(
    xml: &str,
    parent: &mut Frame,
    child: &str,
    name_pos: usize,
) -> Result<&'static str, SchemaValidationError> {
    match &mut parent.state {
        State::All { rules, seen } => {
            let rules = *rules;
            match rules.iter().position(|rule| rule.name == child) {
                Some(index) if !seen[index] => {
                    seen[index] = true;
                    Ok(rules[index].type_name.as_str())
                }
                Some(_) => Err(validation_error(
                    xml,
                    name_pos,
                    format!(
                        "The element '{}' has invalid child element '{child}': it may only appear once.",
                        parent.name
                    ),
                )),
                None => {
                    let expected = expected_list(
                        rules
                            .iter()
                            .zip(seen.iter())
                            .filter(|(_, seen)| !**seen)
                            .map(|(rule, _)| rule.name.as_str()),
                    );
                    Err(validation_error(
                        xml,
                        name_pos,
                        format!(
                            "The element '{}' has invalid child element '{child}'. List of possible elements expected: {expected}.",
                            parent.name
                        ),
                    ))
                }
            }
        }
        State::Sequence {
            rules,
            cursor,
            count,
        } => {
            let rules = *rules;
            loop {
                let Some(rule) = rules.get(*cursor) else {
                    return Err(validation_error(
                        xml,
                        name_pos,
                        format!(
                            "The element '{}' cannot contain child element '{child}' here.",
                            parent.name
                        ),
                    ));
                };
                if rule.name == child && (rule.max == MaxOccurs::Unbounded || *count == 0) {
                    *count += 1;
                    return Ok(rule.type_name.as_str());
                }
                if *count >= u64::from(rule.min) {
                    *cursor += 1;
                    *count = 0;
                    continue;
                }
                return Err(validation_error(
                    xml,
                    name_pos,
                    format!(
                        "The element '{}' has invalid child element '{child}'. List of possible elements expected: '{}'.",
                        parent.name, rule.name
                    ),
                ));
            }
        }
        State::Text | State::Empty => Err(validation_error(
            xml,
            name_pos,
            format!(
                "The element '{}' cannot contain child element '{child}'.",
                parent.name
            ),
        )),
    }
}

fn check_attributes(
    xml: &str,
    start: &BytesStart<'_>,
    element: &str,
    rules: &[AttributeRule],
    name_pos: usize,
) -> Result<(), SchemaValidationError> {
    let mut seen = vec![false; rules.len()];
    for attribute in start.attributes() {
        let attribute = match attribute {
            Ok(attribute) => attribute,
            Err(source) => {
                return Err(validation_error(
                    xml,
                    name_pos,
                    format!("The element '{element}' has a malformed attribute: {source}."),
                ));
            }
        };
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        match rules.iter().position(|rule| rule.name == key) {
            Some(index) => seen[index] = true,
            None => {
                return Err(validation_error(
                    xml,
                    name_pos,
                    format!("The '{key}' attribute is not declared on element '{element}'."),
                ));
            }
        }
    }
    for (rule, seen) in rules.iter().zip(seen) {
        if rule.required && !seen {
            return Err(validation_error(
                xml,
                name_pos,
                format!(
                    "The required attribute '{}' is missing on element '{element}'.",
                    rule.name
                ),
            ));
        }
    }
    Ok(())
}

/// Checks that an element's content satisfied its content model, reporting
/// still-required children at the given position (the end tag's name).
fn check_complete(
    xml: &str,
    frame: &Frame,
    name_pos: usize,
) -> Result<(), SchemaValidationError> {
    let missing: Vec<&str> = match &frame.state {
        State::All { rules, seen } => rules
            .iter()
            .zip(seen.iter())
            .filter(|(rule, seen)| rule.min >= 1 && !**seen)
            .map(|(rule, _)| rule.name.as_str())
            .collect(),
        State::Sequence {
            rules,
            cursor,
            count,
        } => rules
            .iter()
            .enumerate()
            .skip(*cursor)
            .filter(|(index, rule)| {
                let consumed = if index == cursor { *count } else { 0 };
                u64::from(rule.min) > consumed
            })
            .map(|(_, rule)| rule.name.as_str())
            .collect(),
        State::Text | State::Empty => Vec::new(),
    };
    if missing.is_empty() {
        return Ok(());
    }
    Err(validation_error(
        xml,
        name_pos,
        format!(
            "The element '{}' has incomplete content. List of possible elements expected: {}.",
            frame.name,
            expected_list(missing.into_iter())
        ),
    ))
}

fn check_text(
    xml: &str,
    stack: &[Frame],
    text: &BytesText<'_>,
    offset: usize,
) -> Result<(), SchemaValidationError> {
    let raw = String::from_utf8_lossy(text.as_ref());
    if raw.trim().is_empty() {
        return Ok(());
    }
    match stack.last() {
        Some(frame) => match frame.state {
            State::Text => Ok(()),
            _ => Err(validation_error(
                xml,
                offset,
                format!("The element '{}' cannot contain character data.", frame.name),
            )),
        },
        None => Err(validation_error(
            xml,
            offset,
            "Character data is not allowed outside the root element.".to_string(),
        )),
    }
}

fn expected_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = names.map(|name| format!("'{name}'")).collect();
    quoted.join(", ")
}

fn validation_error(xml: &str, offset: usize, message: String) -> SchemaValidationError {
    let (line, column) = position(xml, offset);
    tracing::warn!(%message, line, column, "notice failed schema validation");
    SchemaValidationError {
        message,
        line,
        column,
    }
}

/// Maps a byte offset into a 1-based line and column.
fn position(xml: &str, offset: usize) -> (u64, u64) {
    let offset = offset.min(xml.len());
    let bytes = &xml.as_bytes()[..offset];
    let line = bytes.iter().filter(|&&byte| byte == b'\n').count() as u64 + 1;
    let column = match bytes.iter().rposition(|&byte| byte == b'\n') {
        Some(newline) => (offset - newline) as u64,
        None => offset as u64 + 1,
    };
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const VALID: &str = r#"<notice version="2.0"><api-key>k</api-key><notifier><name>n</name><version>1</version><url>u</url></notifier><error><class>C</class><message>m</message><backtrace><line file="f" number="0"/></backtrace></error><server-environment><environment-name>staging</environment-name></server-environment></notice>"#;

    #[test]
    fn accepts_valid_notice() {
        validate_schema(VALID).unwrap();
    }

    #[test]
    fn accepts_xml_declaration_and_comments() {
        let xml = format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!-- generated -->\n{VALID}");
        validate_schema(&xml).unwrap();
    }

    #[test]
    fn accepts_notice_without_optional_parts() {
        // No message, no request, no method attribute, empty backtrace.
        let xml = r#"<notice version="2.0"><api-key>k</api-key><notifier><name>n</name><version>1</version><url>u</url></notifier><error><class>C</class><backtrace/></error><server-environment><environment-name>staging</environment-name></server-environment></notice>"#;
        validate_schema(xml).unwrap();
    }

    #[test]
    fn accepts_full_request_with_var_lists() {
        let xml = r#"<notice version="2.0"><api-key>k</api-key><notifier><name>n</name><version>1</version><url>u</url></notifier><error><class>C</class><backtrace/></error><request><url>http://example.com/</url><component>Home</component><action>index</action><params><var key="a">1</var><var key="b">2</var></params><session><var key="id">7</var></session><cgi-data><var key="REQUEST_METHOD">POST</var></cgi-data></request><server-environment><project-root>/srv</project-root><environment-name>production</environment-name></server-environment></notice>"#;
        validate_schema(xml).unwrap();
    }

    #[test]
    fn rejects_notice_without_error() {
        let xml = r#"<notice version="2.0"><api-key>k</api-key><notifier><name>n</name><version>1</version><url>u</url></notifier><server-environment><environment-name>staging</environment-name></server-environment></notice>"#;
        let failure = validate_schema(xml).unwrap_err();
        assert!(failure.message.contains("'notice'"), "{}", failure.message);
        assert!(failure.message.contains("'error'"), "{}", failure.message);
        assert_eq!(1, failure.line);
    }

    #[test_case(
        r#"<notice><api-key>k</api-key></notice>"#,
        "The required attribute 'version' is missing"
        ; "missing version attribute")]
    #[test_case(
        r#"<notice version="2.0" bogus="1"></notice>"#,
        "The 'bogus' attribute is not declared"
        ; "undeclared attribute")]
    #[test_case(
        r#"<notify version="2.0"></notify>"#,
        "The 'notify' element is not declared"
        ; "undeclared root")]
    #[test_case(
        r#"<notice version="2.0"><bogus/></notice>"#,
        "invalid child element 'bogus'"
        ; "undeclared child")]
    #[test_case(
        r#"<notice version="2.0"><api-key>a</api-key><api-key>b</api-key></notice>"#,
        "may only appear once"
        ; "duplicate child in all group")]
    #[test_case(
        r#"<notice version="2.0">boom</notice>"#,
        "cannot contain character data"
        ; "text in element-only content")]
    fn rejects_invalid_document(xml: &str, expected_fragment: &str) {
        let failure = validate_schema(xml).unwrap_err();
        assert!(
            failure.message.contains(expected_fragment),
            "message {:?} should contain {:?}",
            failure.message,
            expected_fragment
        );
    }

    #[test]
    fn rejects_backtrace_line_without_file() {
        let xml = VALID.replace(r#"<line file="f" number="0"/>"#, r#"<line number="0"/>"#);
        let failure = validate_schema(&xml).unwrap_err();
        assert!(failure.message.contains("'file'"), "{}", failure.message);
        assert!(failure.message.contains("'line'"), "{}", failure.message);
    }

    #[test]
    fn rejects_out_of_order_sequence() {
        let xml = VALID.replace(
            "<server-environment><environment-name>staging</environment-name>",
            "<server-environment><environment-name>staging</environment-name><project-root>/x</project-root>",
        );
        let failure = validate_schema(&xml).unwrap_err();
        assert!(
            failure.message.contains("'project-root'"),
            "{}",
            failure.message
        );
    }

    #[test]
    fn rejects_mismatched_tags() {
        let xml = r#"<notice version="2.0"><api-key>k</api-key></error>"#;
        let failure = validate_schema(xml).unwrap_err();
        assert!(
            failure.message.contains("not well-formed"),
            "{}",
            failure.message
        );
    }

    #[test]
    fn rejects_empty_document() {
        let failure = validate_schema("").unwrap_err();
        assert!(failure.message.contains("'notice'"), "{}", failure.message);
        assert_eq!(1, failure.line);
        assert_eq!(1, failure.column);
    }

    #[test]
    fn reports_position_of_start_tag_name() {
        // The undeclared child sits on line 2, with its name at column 4.
        let xml = "<notice version=\"2.0\">\n  <bogus/>\n</notice>";
        let failure = validate_schema(xml).unwrap_err();
        assert_eq!(2, failure.line);
        assert_eq!(4, failure.column);
    }

    #[test]
    fn display_includes_position() {
        let failure = validate_schema("").unwrap_err();
        assert!(format!("{failure}").contains("Line 1, position 1."));
    }
}
