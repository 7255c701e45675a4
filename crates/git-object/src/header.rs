//! The `"<kind> <size>\0"` header hashed in front of every object payload.

use crate::{ObjectError, ObjectType};

/// Parse an object header from raw bytes.
///
/// The header format is `"<type> <size>\0"`, where `<size>` is a base-10
/// ASCII integer without sign or leading zeros. Returns
/// `(type, content_size, header_length)` where `header_length` includes the
/// null terminator.
pub fn parse_header(data: &[u8]) -> Result<(ObjectType, usize, usize), ObjectError> {
    let null_pos = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| ObjectError::InvalidHeader("missing null terminator".into()))?;

    let header = &data[..null_pos];
    let space_pos = header
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| ObjectError::InvalidHeader("missing space in header".into()))?;

    let obj_type = ObjectType::from_bytes(&header[..space_pos])?;
    let content_size = parse_size(&header[space_pos + 1..])?;

    Ok((obj_type, content_size, null_pos + 1))
}

fn parse_size(digits: &[u8]) -> Result<usize, ObjectError> {
    let invalid = || {
        ObjectError::InvalidHeader(format!(
            "invalid size: {}",
            String::from_utf8_lossy(digits)
        ))
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    if digits.len() > 1 && digits[0] == b'0' {
        return Err(invalid());
    }
    digits.iter().try_fold(0usize, |acc, &d| {
        acc.checked_mul(10)?.checked_add(usize::from(d - b'0'))
    })
    .ok_or_else(invalid)
}

/// Write an object header: `"<type> <size>\0"`.
pub fn write_header(obj_type: ObjectType, content_size: usize) -> Vec<u8> {
    format!("{obj_type} {content_size}\0").into_bytes()
}
