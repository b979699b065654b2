//! The bundled notice schema and its compiled form.
//!
//! The XSD is a versioned artifact (`airbrake_2_0.xsd`) owned by the
//! error-tracking service. It is parsed once per process into lookup tables
//! covering exactly the XSD subset the notice schema uses: named complex
//! types, `xs:all`, `xs:sequence`, attributes and `xs:simpleContent`
//! extensions of `xs:string`.

use once_cell::sync::Lazy;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

/// Airbrake notice schema, version 2.0.
const NOTICE_XSD: &str = include_str!("airbrake_2_0.xsd");

/// Leaf element type: character data only, no attributes.
pub(crate) const XS_STRING: &str = "xs:string";

static NOTICE_SCHEMA: Lazy<Schema> =
    Lazy::new(|| Schema::parse(NOTICE_XSD).expect("bundled notice schema is valid"));

/// Returns the compiled notice schema, parsing the bundled XSD on first use.
///
/// The compiled schema is immutable and shared process-wide; concurrent
/// callers need no coordination.
pub(crate) fn notice_schema() -> &'static Schema {
    &NOTICE_SCHEMA
}

#[derive(Debug)]
pub(crate) struct Schema {
    /// Name of the single declared root element.
    pub(crate) root: String,
    /// Type of the root element.
    pub(crate) root_type: String,
    pub(crate) types: HashMap<String, ComplexType>,
}

#[derive(Debug)]
pub(crate) struct ComplexType {
    pub(crate) content: Content,
    pub(crate) attributes: Vec<AttributeRule>,
}

#[derive(Debug)]
pub(crate) enum Content {
    /// `xs:all`: each child at most once, in any order.
    All(Vec<ChildRule>),
    /// `xs:sequence`: children in declaration order with occurrence bounds.
    Sequence(Vec<ChildRule>),
    /// `xs:simpleContent`: character data only.
    Text,
    /// No content model: attributes only.
    Empty,
}

#[derive(Debug)]
pub(crate) struct ChildRule {
    pub(crate) name: String,
    /// Referenced type name; [`XS_STRING`] marks a text-only leaf.
    pub(crate) type_name: String,
    pub(crate) min: u32,
    pub(crate) max: MaxOccurs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MaxOccurs {
    One,
    Unbounded,
}

/// Errors reading the XSD text. The bundled artifact is covered by tests, so
/// callers only see these when feeding the parser a broken schema.
#[derive(thiserror::Error, Debug)]
pub(crate) enum SchemaError {
    #[error("reading schema XML failed with {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("reading schema attribute failed with {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("schema declares no root element")]
    MissingRoot,

    #[error("schema '{element}' is missing the '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("unsupported occurrence bound '{0}'")]
    UnsupportedOccurs(String),

    #[error("element '{element}' references undeclared type '{type_name}'")]
    UnknownType { element: String, type_name: String },
}

enum GroupKind {
    All,
    Sequence,
}

struct TypeBuilder {
    name: String,
    group: Option<(GroupKind, Vec<ChildRule>)>,
    attributes: Vec<AttributeRule>,
    simple: bool,
}

#[derive(Debug)]
pub(crate) struct AttributeRule {
    pub(crate) name: String,
    pub(crate) required: bool,
}

impl Schema {
    pub(crate) fn parse(xsd: &str) -> Result<Self, SchemaError> {
        let mut reader = Reader::from_str(xsd);
        let mut root: Option<(String, String)> = None;
        let mut types = HashMap::new();
        let mut current: Option<TypeBuilder> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) | Event::Empty(start) => {
                    match start.local_name().as_ref() {
                        b"element" => match current.as_mut() {
                            Some(builder) => {
                                let rule = child_rule(&start)?;
                                if let Some((_, rules)) = builder.group.as_mut() {
                                    rules.push(rule);
                                }
                            }
                            None => {
                                let name = required_attr(&start, "name", "element")?;
                                let type_name = required_attr(&start, "type", "element")?;
                                root = Some((name, type_name));
                            }
                        },
                        b"complexType" => {
                            current = Some(TypeBuilder {
                                name: required_attr(&start, "name", "complexType")?,
                                group: None,
                                attributes: Vec::new(),
                                simple: false,
                            });
                        }
                        b"all" => {
                            if let Some(builder) = current.as_mut() {
                                builder.group = Some((GroupKind::All, Vec::new()));
                            }
                        }
                        b"sequence" => {
                            if let Some(builder) = current.as_mut() {
                                builder.group = Some((GroupKind::Sequence, Vec::new()));
                            }
                        }
                        b"attribute" => {
                            if let Some(builder) = current.as_mut() {
                                let name = required_attr(&start, "name", "attribute")?;
                                let required = attr(&start, "use")?
                                    .is_some_and(|value| value == "required");
                                builder.attributes.push(AttributeRule { name, required });
                            }
                        }
                        b"simpleContent" => {
                            if let Some(builder) = current.as_mut() {
                                builder.simple = true;
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(end) => {
                    if end.local_name().as_ref() == b"complexType" {
                        if let Some(builder) = current.take() {
                            let content = match (builder.group, builder.simple) {
                                (Some((GroupKind::All, rules)), _) => Content::All(rules),
                                (Some((GroupKind::Sequence, rules)), _) => {
                                    Content::Sequence(rules)
                                }
                                (None, true) => Content::Text,
                                (None, false) => Content::Empty,
                            };
                            types.insert(
                                builder.name,
                                ComplexType {
                                    content,
                                    attributes: builder.attributes,
                                },
                            );
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let (root, root_type) = root.ok_or(SchemaError::MissingRoot)?;
        let schema = Schema {
            root,
            root_type,
            types,
        };
        schema.check_references()?;
        Ok(schema)
    }

    /// Every referenced type must be declared, so validation never has to
    /// deal with dangling lookups.
    fn check_references(&self) -> Result<(), SchemaError> {
        let mut references = vec![(self.root.clone(), self.root_type.clone())];
        for ctype in self.types.values() {
            let rules = match &ctype.content {
                Content::All(rules) | Content::Sequence(rules) => rules,
                Content::Text | Content::Empty => continue,
            };
            for rule in rules {
                references.push((rule.name.clone(), rule.type_name.clone()));
            }
        }
        for (element, type_name) in references {
            if type_name != XS_STRING && !self.types.contains_key(&type_name) {
                return Err(SchemaError::UnknownType { element, type_name });
            }
        }
        Ok(())
    }
}

fn child_rule(start: &BytesStart<'_>) -> Result<ChildRule, SchemaError> {
    let name = required_attr(start, "name", "element")?;
    let type_name = required_attr(start, "type", "element")?;
    let min = match attr(start, "minOccurs")? {
        Some(value) => value
            .parse()
            .map_err(|_| SchemaError::UnsupportedOccurs(value))?,
        None => 1,
    };
    let max = match attr(start, "maxOccurs")?.as_deref() {
        None | Some("1") => MaxOccurs::One,
        Some("unbounded") => MaxOccurs::Unbounded,
        Some(other) => return Err(SchemaError::UnsupportedOccurs(other.to_owned())),
    };
    Ok(ChildRule {
        name,
        type_name,
        min,
        max,
    })
}

fn attr(start: &BytesStart<'_>, name: &str) -> Result<Option<String>, SchemaError> {
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
        }
    }
    Ok(None)
}

fn required_attr(
    start: &BytesStart<'_>,
    name: &'static str,
    element: &'static str,
) -> Result<String, SchemaError> {
    attr(start, name)?.ok_or(SchemaError::MissingAttribute {
        element,
        attribute: name,
    })
}
