//! Request body decoding
//!
//! Turns a buffered body into a [`RawPayload`] using a strategy picked from the
//! declared `Content-Type`. Unknown content types and blank bodies are not
//! errors: they decode to [`RawPayload::Absent`], and only become a failure if
//! a required model later cannot be built from nothing.

use crate::error::FrameworkError;
use memchr::memmem;

/// Decoded but unvalidated request body
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// No data to build models from
    Absent,
    /// A JSON document (never `null`)
    Json(serde_json::Value),
    /// Flat form fields, in body order
    Form(Vec<(String, String)>),
}

impl RawPayload {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Decoding strategy selected by content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Form,
    Multipart { boundary: Option<String> },
    Unsupported,
}

impl ContentKind {
    /// Pick the strategy for a `Content-Type` header value
    ///
    /// Matching uses the MIME essence, case-insensitively; parameters other
    /// than the multipart boundary are ignored.
    pub fn from_header(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return Self::Unsupported;
        };
        let mut parts = content_type.split(';');
        let essence = parts.next().unwrap_or_default().trim().to_ascii_lowercase();

        match essence.as_str() {
            "application/json" => Self::Json,
            "application/x-www-form-urlencoded" => Self::Form,
            "multipart/form-data" => Self::Multipart {
                boundary: parts.find_map(|param| {
                    let (key, value) = param.split_once('=')?;
                    key.trim()
                        .eq_ignore_ascii_case("boundary")
                        .then(|| value.trim().trim_matches('"').to_string())
                }),
            },
            ct if ct.starts_with("application/") && ct.ends_with("+json") => Self::Json,
            _ => Self::Unsupported,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
            Self::Multipart { .. } => "multipart/form-data",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Decode `body` according to `content_type`
pub fn decode(content_type: Option<&str>, body: &[u8]) -> Result<RawPayload, FrameworkError> {
    let kind = ContentKind::from_header(content_type);
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawPayload::Absent);
    }

    let payload = match &kind {
        ContentKind::Json => decode_json(body)?,
        ContentKind::Form => decode_form(body)?,
        ContentKind::Multipart { boundary } => {
            let boundary = boundary
                .as_deref()
                .ok_or_else(|| FrameworkError::decode(kind.label(), "missing boundary parameter"))?;
            RawPayload::Form(decode_multipart(boundary, body)?)
        }
        ContentKind::Unsupported => RawPayload::Absent,
    };

    tracing::trace!(content_type = kind.label(), absent = payload.is_absent(), "Decoded request body");
    Ok(payload)
}

fn decode_json(body: &[u8]) -> Result<RawPayload, FrameworkError> {
    match serde_json::from_slice(body) {
        Ok(serde_json::Value::Null) => Ok(RawPayload::Absent),
        Ok(value) => Ok(RawPayload::Json(value)),
        Err(e) => Err(FrameworkError::decode(ContentKind::Json.label(), e.to_string())),
    }
}

fn decode_form(body: &[u8]) -> Result<RawPayload, FrameworkError> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .map(RawPayload::Form)
        .map_err(|e| FrameworkError::decode(ContentKind::Form.label(), e.to_string()))
}

/// Text fields of a `multipart/form-data` body; file parts are skipped
///
/// Parts are split on raw bytes so binary file contents never need to be
/// UTF-8. Only the headers and contents of text fields are checked.
fn decode_multipart(boundary: &str, body: &[u8]) -> Result<Vec<(String, String)>, FrameworkError> {
    let label = ContentKind::Multipart { boundary: None }.label();
    let delimiter = format!("--{}", boundary);
    let finder = memmem::Finder::new(delimiter.as_bytes());
    let Some(first) = finder.find(body) else {
        return Err(FrameworkError::decode(label, "boundary delimiter not found"));
    };

    let mut fields = Vec::new();
    let mut rest = &body[first + delimiter.len()..];
    while !rest.starts_with(b"--") {
        let next = finder.find(rest);
        let part = next.map_or(rest, |end| &rest[..end]);
        if let Some(field) = multipart_field(label, part)? {
            fields.push(field);
        }
        match next {
            Some(end) => rest = &rest[end + delimiter.len()..],
            None => break,
        }
    }
    Ok(fields)
}

/// One part between two delimiters; `None` for file parts and unnamed parts
fn multipart_field(
    label: &'static str,
    part: &[u8],
) -> Result<Option<(String, String)>, FrameworkError> {
    let part = part.strip_prefix(b"\r\n").unwrap_or(part);
    let Some(split) = memmem::find(part, b"\r\n\r\n") else {
        return Err(FrameworkError::decode(label, "part without header terminator"));
    };
    let head = std::str::from_utf8(&part[..split])
        .map_err(|_| FrameworkError::decode(label, "part headers are not valid UTF-8"))?;
    let content = &part[split + 4..];

    let disposition = head
        .split("\r\n")
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-disposition")
                .then_some(value)
        })
        .ok_or_else(|| FrameworkError::decode(label, "part without Content-Disposition"))?;

    if disposition_param(disposition, "filename").is_some() {
        return Ok(None);
    }
    let Some(name) = disposition_param(disposition, "name") else {
        return Ok(None);
    };
    let content = content.strip_suffix(b"\r\n").unwrap_or(content);
    let value = std::str::from_utf8(content)
        .map_err(|_| FrameworkError::decode(label, format!("field '{}' is not valid UTF-8", name)))?;
    Ok(Some((name, value.to_string())))
}

fn disposition_param(disposition: &str, key: &str) -> Option<String> {
    disposition.split(';').skip(1).find_map(|param| {
        let (k, v) = param.split_once('=')?;
        (k.trim() == key).then(|| v.trim().trim_matches('"').to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_strategy_table() {
        assert_eq!(ContentKind::from_header(Some("application/json")), ContentKind::Json);
        assert_eq!(
            ContentKind::from_header(Some("Application/JSON; charset=utf-8")),
            ContentKind::Json
        );
        assert_eq!(
            ContentKind::from_header(Some("application/merge-patch+json")),
            ContentKind::Json
        );
        assert_eq!(
            ContentKind::from_header(Some("application/x-www-form-urlencoded")),
            ContentKind::Form
        );
        assert_eq!(
            ContentKind::from_header(Some("multipart/form-data; boundary=\"xyz\"")),
            ContentKind::Multipart {
                boundary: Some("xyz".to_string())
            }
        );
        assert_eq!(ContentKind::from_header(Some("text/plain")), ContentKind::Unsupported);
        assert_eq!(ContentKind::from_header(None), ContentKind::Unsupported);
    }

    #[test]
    fn test_json_object() {
        let payload = decode(Some("application/json"), br#"{"name": "Foo"}"#).unwrap();
        assert_eq!(payload, RawPayload::Json(json!({"name": "Foo"})));
    }

    #[test]
    fn test_blank_body_is_absent() {
        assert_eq!(decode(Some("application/json"), b"").unwrap(), RawPayload::Absent);
        assert_eq!(decode(Some("application/json"), b"  \n").unwrap(), RawPayload::Absent);
        assert_eq!(decode(Some("application/json"), b"null").unwrap(), RawPayload::Absent);
    }

    #[test]
    fn test_unknown_content_type_is_absent() {
        assert_eq!(decode(Some("text/plain"), b"name=Foo").unwrap(), RawPayload::Absent);
        assert_eq!(decode(None, br#"{"name": "Foo"}"#).unwrap(), RawPayload::Absent);
    }

    #[test]
    fn test_malformed_json_is_a_decode_error() {
        let err = decode(Some("application/json"), b"{\"name\":").unwrap_err();
        assert!(matches!(err, FrameworkError::Decode { .. }));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_form_fields() {
        let payload = decode(
            Some("application/x-www-form-urlencoded"),
            b"username=ada&password=s%26cret",
        )
        .unwrap();
        assert_eq!(
            payload,
            RawPayload::Form(vec![
                ("username".to_string(), "ada".to_string()),
                ("password".to_string(), "s&cret".to_string()),
            ])
        );
    }

    #[test]
    fn test_multipart_text_fields() {
        let body = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"username\"\r\n\r\n\
            ada\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"avatar\"; filename=\"a.png\"\r\n\
            Content-Type: image/png\r\n\r\n\
            PNG\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"password\"\r\n\r\n\
            hunter2\r\n\
            --XyZ--\r\n";

        let payload = decode(Some("multipart/form-data; boundary=XyZ"), body.as_bytes()).unwrap();
        assert_eq!(
            payload,
            RawPayload::Form(vec![
                ("username".to_string(), "ada".to_string()),
                ("password".to_string(), "hunter2".to_string()),
            ])
        );
    }

    #[test]
    fn test_multipart_binary_file_part_is_skipped() {
        let mut body = Vec::new();
        body.extend_from_slice(b"--XyZ\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nFoo\r\n");
        body.extend_from_slice(
            b"--XyZ\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"a.png\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(&[0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe, 0x00]);
        body.extend_from_slice(b"\r\n--XyZ--\r\n");

        let payload = decode(Some("multipart/form-data; boundary=XyZ"), &body).unwrap();
        assert_eq!(payload, RawPayload::Form(vec![("name".to_string(), "Foo".to_string())]));
    }

    #[test]
    fn test_multipart_text_field_must_be_utf8() {
        let mut body = Vec::new();
        body.extend_from_slice(b"--XyZ\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n");
        body.extend_from_slice(&[0xff, 0xfe]);
        body.extend_from_slice(b"\r\n--XyZ--\r\n");

        let err = decode(Some("multipart/form-data; boundary=XyZ"), &body).unwrap_err();
        assert!(matches!(err, FrameworkError::Decode { .. }));
    }

    #[test]
    fn test_multipart_without_boundary_fails() {
        let err = decode(Some("multipart/form-data"), b"--a\r\n").unwrap_err();
        assert!(matches!(err, FrameworkError::Decode { .. }));
    }
}
