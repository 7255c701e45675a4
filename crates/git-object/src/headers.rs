//! The `key value` header block shared by commits and tags.

use bstr::{BString, ByteSlice};
use git_hash::ObjectId;

use crate::ObjectError;

/// A header block split into its fields, plus the body after the blank line.
pub(crate) struct HeaderBlock<'a> {
    /// `(key, value)` pairs in stored order. Continuation lines are joined
    /// into the value with `\n`.
    pub fields: Vec<(&'a [u8], BString)>,
    /// Everything after the blank separator line; `None` if there is none.
    pub body: Option<&'a [u8]>,
}

impl<'a> HeaderBlock<'a> {
    /// Split `data` into header fields and body.
    ///
    /// Every header line must be newline-terminated and contain a space
    /// after a non-empty key.
    pub fn parse(data: &'a [u8]) -> Result<Self, ObjectError> {
        let mut fields = Vec::new();
        let mut pos = 0;

        while pos < data.len() {
            if data[pos] == b'\n' {
                return Ok(Self {
                    fields,
                    body: Some(&data[pos + 1..]),
                });
            }

            let end = line_end(data, pos)?;
            let line = &data[pos..end];
            let space = match line.find_byte(b' ') {
                Some(0) | None => {
                    return Err(ObjectError::InvalidHeader(format!(
                        "malformed header line: {:?}",
                        line.as_bstr()
                    )))
                }
                Some(space) => space,
            };

            let mut value = BString::from(&line[space + 1..]);
            pos = end + 1;
            while pos < data.len() && data[pos] == b' ' {
                let end = line_end(data, pos)?;
                value.push(b'\n');
                value.extend_from_slice(&data[pos + 1..end]);
                pos = end + 1;
            }
            fields.push((&line[..space], value));
        }

        Ok(Self { fields, body: None })
    }
}

/// Index of the `\n` ending the line that starts at `pos`.
fn line_end(data: &[u8], pos: usize) -> Result<usize, ObjectError> {
    data[pos..]
        .find_byte(b'\n')
        .map(|p| p + pos)
        .ok_or_else(|| ObjectError::InvalidHeader("unterminated header line".into()))
}

/// Write `key value\n`, continuing embedded newlines with a leading space.
pub(crate) fn push_header(out: &mut Vec<u8>, key: &[u8], value: &[u8]) {
    out.extend_from_slice(key);
    out.push(b' ');
    for (i, line) in value.split(|&b| b == b'\n').enumerate() {
        if i > 0 {
            out.extend_from_slice(b"\n ");
        }
        out.extend_from_slice(line);
    }
    out.push(b'\n');
}

/// Parse an id header value. Only lowercase hex is accepted, since that is
/// the only form that serializes back to the same bytes.
pub(crate) fn header_oid(value: &[u8], field: &str) -> Result<ObjectId, ObjectError> {
    let hex = std::str::from_utf8(value)
        .map_err(|_| ObjectError::InvalidHeader(format!("non-UTF8 {field} id")))?;
    let oid = ObjectId::from_hex(hex)?;
    if hex.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(ObjectError::InvalidHeader(format!(
            "{field} id is not lowercase: {hex}"
        )));
    }
    Ok(oid)
}
