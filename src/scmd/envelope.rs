//! SOAP 1.1 envelopes for the GetCertificate operation
//! (CMD signature technical specification v1.6).
//!
//! ```text
//! GetCertificate(applicationId: xsd:base64Binary, userId: xsd:string)
//!     -> GetCertificateResult: xsd:string
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;

use super::{FetchOutcome, ScmdError};

pub const SERVICE_NAMESPACE: &str = "http://Ama.Authentication.Service/";
pub const GET_CERTIFICATE_ACTION: &str =
    "http://Ama.Authentication.Service/CCMovelSignature/GetCertificate";

const SOAP_ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Build the GetCertificate request body.
pub fn get_certificate_request(application_id: &[u8], user_id: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="{envelope}" xmlns:ama="{service}">"#,
            "<soapenv:Body>",
            "<ama:GetCertificate>",
            "<ama:applicationId>{application_id}</ama:applicationId>",
            "<ama:userId>{user_id}</ama:userId>",
            "</ama:GetCertificate>",
            "</soapenv:Body>",
            "</soapenv:Envelope>"
        ),
        envelope = SOAP_ENVELOPE_NAMESPACE,
        service = SERVICE_NAMESPACE,
        application_id = STANDARD.encode(application_id),
        user_id = escape(user_id),
    )
}

#[derive(Clone, Copy)]
enum Field {
    Result,
    FaultString,
}

/// Extract the outcome of a GetCertificate response.
///
/// A missing, empty or nil `GetCertificateResult` is [`FetchOutcome::Empty`].
/// A SOAP fault is always an error, whatever else the body contains.
pub fn parse_get_certificate_response(xml: &str) -> Result<FetchOutcome, ScmdError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut field: Option<Field> = None;
    let mut result = String::new();
    let mut fault: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ScmdError::Xml(e.to_string()))?;
        match event {
            Event::Start(e) => {
                field = match e.local_name().as_ref() {
                    b"GetCertificateResult" => Some(Field::Result),
                    b"Fault" => {
                        fault.get_or_insert_with(String::new);
                        None
                    }
                    b"faultstring" => Some(Field::FaultString),
                    _ => None,
                };
            }
            Event::Empty(e) if e.local_name().as_ref() == b"Fault" => {
                fault.get_or_insert_with(String::new);
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| ScmdError::Xml(e.to_string()))?;
                append(field, &text, &mut result, &mut fault);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c);
                append(field, &text, &mut result, &mut fault);
            }
            Event::End(_) => field = None,
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(fault) = fault {
        let message = if fault.is_empty() {
            "unspecified fault".to_string()
        } else {
            fault
        };
        return Err(ScmdError::Fault(message));
    }

    if result.trim().is_empty() {
        Ok(FetchOutcome::Empty)
    } else {
        Ok(FetchOutcome::Certificate(result))
    }
}

fn append(field: Option<Field>, text: &str, result: &mut String, fault: &mut Option<String>) {
    match field {
        Some(Field::Result) => result.push_str(text),
        Some(Field::FaultString) => fault.get_or_insert_with(String::new).push_str(text),
        None => {}
    }
}
