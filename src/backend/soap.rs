//! SOAP 1.2 envelopes and response parsing for the management backend.
//!
//! The backend speaks an XML request/response dialect over HTTP. Responses are
//! classified once at this boundary: callers get tagged outcomes, never raw
//! bodies to re-interpret.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use reqwest::StatusCode;
use std::collections::HashMap;

const SERVICE_NS: &str = "http://www.cryptocard.com/blackshield/";

/// Body markers the backend embeds in an otherwise-200 connect response.
const MARKER_SUCCESS: &str = "AUTH_SUCCESS";
const MARKER_FAILURE: &str = "AUTH_FAILURE";

/// Result of a login exchange, decided once from status code plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Success,
    ApplicationFailure(String),
    Unexpected(String),
}

/// Classify a connect response. HTTP 200 alone is not success: the backend
/// reports application-level failures inside a 200 body.
#[must_use]
pub fn classify_connect(status: StatusCode, body: &str) -> ConnectOutcome {
    if status.is_success() && body.contains(MARKER_SUCCESS) {
        ConnectOutcome::Success
    } else if body.contains(MARKER_FAILURE) {
        ConnectOutcome::ApplicationFailure("operator authentication failed".to_string())
    } else {
        let brief: String = body.chars().take(400).collect();
        ConnectOutcome::Unexpected(format!("{status} {brief}"))
    }
}

/// Optional filters applied to inventory queries.
#[derive(Debug, Clone, Default)]
pub struct TokenFilters {
    pub state: Option<String>,
    pub token_type: Option<String>,
    pub serial: Option<String>,
    pub container: Option<String>,
    pub organization: Option<String>,
}

fn soap_envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soap12:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap12="http://www.w3.org/2003/05/soap-envelope"><soap12:Body>{body}</soap12:Body></soap12:Envelope>"#
    )
}

fn push_element(out: &mut String, name: &str, value: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(&escape(value));
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn push_optional(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        push_element(out, name, value);
    }
}

/// Build the `Connect` login envelope.
#[must_use]
pub fn connect_request(operator_email: &str, otp: &str) -> String {
    let mut body = format!(r#"<Connect xmlns="{SERVICE_NS}">"#);
    push_element(&mut body, "OperatorEmail", operator_email);
    push_element(&mut body, "OTP", otp);
    push_element(&mut body, "validationCode", "");
    body.push_str("</Connect>");
    soap_envelope(&body)
}

/// Build a paginated `GetTokens` envelope.
#[must_use]
pub fn get_tokens_request(filters: &TokenFilters, start_record: usize, page_size: usize) -> String {
    let mut body = format!(r#"<GetTokens xmlns="{SERVICE_NS}">"#);
    push_optional(&mut body, "state", filters.state.as_deref());
    push_optional(&mut body, "type", filters.token_type.as_deref());
    push_optional(&mut body, "serial", filters.serial.as_deref());
    push_optional(&mut body, "container", filters.container.as_deref());
    push_optional(&mut body, "organization", filters.organization.as_deref());
    push_element(&mut body, "startRecord", &start_record.to_string());
    push_element(&mut body, "pageSize", &page_size.to_string());
    body.push_str("</GetTokens>");
    soap_envelope(&body)
}

/// Build a `GetTotalTokens` envelope.
#[must_use]
pub fn get_total_tokens_request(filters: &TokenFilters) -> String {
    let mut body = format!(r#"<GetTotalTokens xmlns="{SERVICE_NS}">"#);
    push_optional(&mut body, "state", filters.state.as_deref());
    push_optional(&mut body, "type", filters.token_type.as_deref());
    push_optional(&mut body, "serial", filters.serial.as_deref());
    push_optional(&mut body, "container", filters.container.as_deref());
    push_optional(&mut body, "organization", filters.organization.as_deref());
    body.push_str("</GetTotalTokens>");
    soap_envelope(&body)
}

fn local_matches(name: &[u8], target: &str) -> bool {
    name.eq_ignore_ascii_case(target.as_bytes())
}

/// Collect the text content of every element with the given local name,
/// ignoring namespaces and prefixes.
pub(crate) fn element_texts(xml: &str, local_name: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut texts = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if local_matches(e.name().local_name().as_ref(), local_name) => {
                current = Some(String::new());
            }
            Ok(Event::Empty(e)) if local_matches(e.name().local_name().as_ref(), local_name) => {
                texts.push(String::new());
            }
            Ok(Event::Text(t)) => {
                if let (Some(buf), Ok(text)) = (current.as_mut(), t.unescape()) {
                    buf.push_str(&text);
                }
            }
            Ok(Event::End(e)) if local_matches(e.name().local_name().as_ref(), local_name) => {
                if let Some(buf) = current.take() {
                    texts.push(buf.trim().to_string());
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    texts
}

/// First element with the given local name, if any.
pub(crate) fn first_element_text(xml: &str, local_name: &str) -> Option<String> {
    element_texts(xml, local_name).into_iter().next()
}

/// Parse the boolean payload returned by `PingConnection`.
///
/// Anything that is not a well-formed document with a literal boolean text
/// yields `None`, which callers treat as a failed ping.
#[must_use]
pub fn parse_boolean(xml: &str) -> Option<bool> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => {
                let text = t.unescape().ok()?;
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                if text.eq_ignore_ascii_case("true") {
                    return Some(true);
                }
                if text.eq_ignore_ascii_case("false") {
                    return Some(false);
                }
                return None;
            }
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {}
        }
    }
}

/// Parse the total record count from a `GetTotalTokens` response.
#[must_use]
pub fn parse_total_tokens(xml: &str) -> Option<usize> {
    first_element_text(xml, "GetTotalTokensResult")?.parse().ok()
}

/// Parse the `<string>` list returned by `GetTokensByOwner`.
#[must_use]
pub fn parse_string_list(xml: &str) -> Vec<String> {
    element_texts(xml, "string")
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse `Named_Tokens_Table` rows into field maps keyed by lowercased
/// element name. Field names vary in casing across backend endpoints, so
/// lookups normalize once here.
#[must_use]
pub fn parse_token_rows(xml: &str) -> Vec<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut rows = Vec::new();
    let mut row: Option<HashMap<String, String>> = None;
    let mut field: Option<(String, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name().local_name().as_ref().to_ascii_lowercase();
                if name == b"named_tokens_table" {
                    row = Some(HashMap::new());
                } else if row.is_some() {
                    field = String::from_utf8(name).ok().map(|n| (n, String::new()));
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(row) = row.as_mut() {
                    let name = e.name().local_name().as_ref().to_ascii_lowercase();
                    if let Ok(name) = String::from_utf8(name) {
                        row.insert(name, String::new());
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some((_, buf)), Ok(text)) = (field.as_mut(), t.unescape()) {
                    buf.push_str(&text);
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name().local_name().as_ref().to_ascii_lowercase();
                if name == b"named_tokens_table" {
                    if let Some(row) = row.take() {
                        rows.push(row);
                    }
                } else if let Some((field_name, value)) = field.take() {
                    if field_name.as_bytes() == name.as_slice() {
                        if let Some(row) = row.as_mut() {
                            row.insert(field_name, value.trim().to_string());
                        }
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    rows
}
