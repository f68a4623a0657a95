//! Envelope parsing and rendering.
//!
//! Requests carry one `<Operation>Request` element under `Body`, fields as
//! plain child elements. Responses mirror the shape under
//! `<Operation>Response`, or a `Fault` element with a fault string.

use fatura_core::foundation::{GatewayError, Result};
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;

pub const SOAP_NAMESPACE: &str = "urn:fatura:authority:v1";

const REQUEST_SUFFIX: &str = "Request";

/// A parsed request: the operation name and its flat fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedRequest {
    pub operation: String,
    pub fields: HashMap<String, String>,
}

/// One field of a response body. Lists render as repeated groups.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseField {
    Text { name: String, value: String },
    Group { name: String, fields: Vec<(String, String)> },
}

impl ResponseField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        ResponseField::Text { name: name.into(), value: value.into() }
    }

    pub fn group(name: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        ResponseField::Group { name: name.into(), fields }
    }
}

fn parse_err(details: impl Into<String>) -> GatewayError {
    GatewayError::ParseError(details.into())
}

/// Parses an `Envelope/Body/<Operation>Request` into operation + flat fields.
///
/// Namespace prefixes on the envelope scaffolding are tolerated; field names
/// are taken as local names.
pub fn parse_request(xml: &str) -> Result<ParsedRequest> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_body = false;
    let mut operation: Option<String> = None;
    let mut field: Option<String> = None;
    let mut fields = HashMap::new();

    loop {
        match reader.read_event().map_err(|err| parse_err(format!("malformed XML: {}", err)))? {
            Event::Start(start) => {
                let local = local_name(&start)?;
                if !in_body {
                    if local == "Body" {
                        in_body = true;
                    }
                    continue;
                }
                match (&operation, &field) {
                    (None, _) => {
                        let Some(op) = local.strip_suffix(REQUEST_SUFFIX).filter(|op| !op.is_empty()) else {
                            return Err(parse_err(format!("unexpected request element: {}", local)));
                        };
                        operation = Some(op.to_string());
                    }
                    (Some(_), None) => {
                        field = Some(local);
                    }
                    (Some(_), Some(open)) => {
                        return Err(parse_err(format!("nested element {} inside field {}", local, open)));
                    }
                }
            }
            Event::Text(text) => {
                if let Some(name) = &field {
                    let value = text.unescape().map_err(|err| parse_err(format!("bad text content: {}", err)))?;
                    fields.insert(name.clone(), value.into_owned());
                }
            }
            Event::End(end) => {
                let local = local_name_end(end.name().as_ref())?;
                if field.as_deref() == Some(local.as_str()) {
                    fields.entry(local).or_default();
                    field = None;
                } else if operation.as_deref().map(|op| format!("{}{}", op, REQUEST_SUFFIX)) == Some(local.clone()) {
                    break;
                } else if local == "Body" && operation.is_none() {
                    return Err(parse_err("empty request body"));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let operation = operation.ok_or_else(|| parse_err("no operation request element found"))?;
    Ok(ParsedRequest { operation, fields })
}

fn local_name(start: &BytesStart<'_>) -> Result<String> {
    local_name_end(start.name().as_ref())
}

fn local_name_end(raw: &[u8]) -> Result<String> {
    let name = std::str::from_utf8(raw).map_err(|err| parse_err(format!("non-utf8 element name: {}", err)))?;
    Ok(name.rsplit(':').next().unwrap_or(name).to_string())
}

fn xml_err(err: impl std::fmt::Display) -> GatewayError {
    GatewayError::SerializationError { format: "xml".to_string(), details: err.to_string() }
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name))).map_err(xml_err)?;
    writer.write_event(Event::Text(BytesText::new(value))).map_err(xml_err)?;
    writer.write_event(Event::End(BytesStart::new(name).to_end())).map_err(xml_err)?;
    Ok(())
}

fn begin_envelope(writer: &mut Writer<Vec<u8>>) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None))).map_err(xml_err)?;
    let mut envelope = BytesStart::new("Envelope");
    envelope.push_attribute(("xmlns", SOAP_NAMESPACE));
    writer.write_event(Event::Start(envelope)).map_err(xml_err)?;
    writer.write_event(Event::Empty(BytesStart::new("Header"))).map_err(xml_err)?;
    writer.write_event(Event::Start(BytesStart::new("Body"))).map_err(xml_err)?;
    Ok(())
}

fn end_envelope(writer: &mut Writer<Vec<u8>>) -> Result<()> {
    writer.write_event(Event::End(BytesStart::new("Body").to_end())).map_err(xml_err)?;
    writer.write_event(Event::End(BytesStart::new("Envelope").to_end())).map_err(xml_err)?;
    Ok(())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner())
        .map_err(|err| GatewayError::SerializationError { format: "xml".to_string(), details: err.to_string() })
}

/// Renders `<Operation>Response` with the given fields inside an envelope.
pub fn render_response(operation: &str, fields: &[ResponseField]) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    begin_envelope(&mut writer)?;

    let element = format!("{}Response", operation);
    writer.write_event(Event::Start(BytesStart::new(element.as_str()))).map_err(xml_err)?;
    for entry in fields {
        match entry {
            ResponseField::Text { name, value } => write_text_element(&mut writer, name, value)?,
            ResponseField::Group { name, fields } => {
                writer.write_event(Event::Start(BytesStart::new(name.as_str()))).map_err(xml_err)?;
                for (child, value) in fields {
                    write_text_element(&mut writer, child, value)?;
                }
                writer.write_event(Event::End(BytesStart::new(name.as_str()).to_end())).map_err(xml_err)?;
            }
        }
    }
    writer.write_event(Event::End(BytesStart::new(element.as_str()).to_end())).map_err(xml_err)?;

    end_envelope(&mut writer)?;
    finish(writer)
}

/// Well-formed fault envelope; also the rendering of every internal error.
pub fn render_fault(fault_code: &str, fault_string: &str) -> String {
    let mut writer = Writer::new(Vec::new());
    let rendered = (|| -> Result<String> {
        begin_envelope(&mut writer)?;
        writer.write_event(Event::Start(BytesStart::new("Fault"))).map_err(xml_err)?;
        write_text_element(&mut writer, "faultcode", fault_code)?;
        write_text_element(&mut writer, "faultstring", fault_string)?;
        writer.write_event(Event::End(BytesStart::new("Fault").to_end())).map_err(xml_err)?;
        end_envelope(&mut writer)?;
        finish(writer)
    })();
    // Writing into a Vec cannot fail; keep a last-resort literal anyway so a
    // fault never degenerates into unstructured output.
    rendered.unwrap_or_else(|_| {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Envelope xmlns=\"{}\"><Header/><Body><Fault><faultcode>Server</faultcode><faultstring>fault rendering failed</faultstring></Fault></Body></Envelope>",
            SOAP_NAMESPACE
        )
    })
}
