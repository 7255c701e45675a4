use std::borrow::Cow;

use bstr::{BString, ByteSlice};
use git_hash::ObjectId;

use crate::headers::{header_oid, push_header, HeaderBlock};
use crate::{GitObject, ObjectError, ObjectType};

/// A git annotated tag object.
///
/// `object`, `type` and `tag` lead the header block in that order, then an
/// optional `tagger`. Any later header is kept in `extra_headers` in stored
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// OID of the tagged object.
    pub target: ObjectId,
    /// Type of the tagged object.
    pub target_type: ObjectType,
    pub tag_name: BString,
    /// Raw tagger line (optional for some old tags).
    pub tagger: Option<BString>,
    pub extra_headers: Vec<(BString, BString)>,
    /// Message after the blank line, without the signature. `None` if the
    /// tag has no blank line.
    pub message: Option<BString>,
    /// Optional PGP/SSH signature appended to the message.
    pub gpgsig: Option<BString>,
}

const SIGNATURE_MARKERS: [&[u8]; 2] = [
    b"-----BEGIN PGP SIGNATURE-----",
    b"-----BEGIN SSH SIGNATURE-----",
];

impl Tag {
    /// Parse tag content from raw bytes (no object header).
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let block = HeaderBlock::parse(content)?;
        let mut fields = block.fields.into_iter().peekable();
        let mut take = |key: &str| fields.next_if(|(k, _)| *k == key.as_bytes()).map(|(_, v)| v);

        let target = take("object").ok_or(ObjectError::MissingTagField { field: "object" })?;
        let target = header_oid(&target, "object")?;
        let target_type = take("type").ok_or(ObjectError::MissingTagField { field: "type" })?;
        let target_type = ObjectType::from_bytes(&target_type)?;
        let tag_name = take("tag").ok_or(ObjectError::MissingTagField { field: "tag" })?;
        let tagger = take("tagger");

        let extra_headers = fields.map(|(k, v)| (BString::from(k), v)).collect();

        let (message, gpgsig) = match block.body {
            Some(body) => {
                let sig_start = SIGNATURE_MARKERS
                    .iter()
                    .filter_map(|marker| body.find(marker))
                    .min();
                match sig_start {
                    Some(at) => (
                        Some(BString::from(&body[..at])),
                        Some(BString::from(&body[at..])),
                    ),
                    None => (Some(BString::from(body)), None),
                }
            }
            None => (None, None),
        };

        Ok(Self {
            target,
            target_type,
            tag_name,
            tagger,
            extra_headers,
            message,
            gpgsig,
        })
    }
}

impl GitObject for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
    }

    fn serialize_content(&self) -> Cow<'_, [u8]> {
        let mut out = Vec::new();
        push_header(&mut out, b"object", self.target.to_hex().as_bytes());
        push_header(&mut out, b"type", self.target_type.as_bytes());
        push_header(&mut out, b"tag", &self.tag_name);
        if let Some(ref tagger) = self.tagger {
            push_header(&mut out, b"tagger", tagger);
        }
        for (key, val) in &self.extra_headers {
            push_header(&mut out, key, val);
        }

        if self.message.is_some() || self.gpgsig.is_some() {
            out.push(b'\n');
        }
        if let Some(ref message) = self.message {
            out.extend_from_slice(message);
        }
        if let Some(ref sig) = self.gpgsig {
            out.extend_from_slice(sig);
        }
        Cow::Owned(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git_hash::hasher::Hasher;

    const HEAD: &[u8] = b"object da39a3ee5e6b4b0d3255bfef95601890afd80709\ntype commit\ntag v1.0\n";

    fn sample_tag_bytes() -> Vec<u8> {
        let mut out = HEAD.to_vec();
        out.extend_from_slice(b"tagger John Doe <john@example.com> 1234567890 +0000\n");
        out.extend_from_slice(b"\n");
        out.extend_from_slice(b"Release v1.0\n");
        out
    }

    fn assert_stable(data: &[u8]) -> Tag {
        let tag = Tag::parse(data).unwrap();
        assert_eq!(tag.serialize_content().as_ref(), data, "{:?}", data.as_bstr());
        assert_eq!(tag.id(), Hasher::hash_object("tag", data));
        tag
    }

    #[test]
    fn parse_tag() {
        let tag = assert_stable(&sample_tag_bytes());
        assert_eq!(tag.target.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(tag.target_type, ObjectType::Commit);
        assert_eq!(tag.tag_name.as_bytes(), b"v1.0");
        assert!(tag.tagger.is_some());
        assert_eq!(tag.message.as_ref().unwrap().as_bytes(), b"Release v1.0\n");
        assert!(tag.gpgsig.is_none());
        assert!(tag.extra_headers.is_empty());
    }

    #[test]
    fn signature_split_from_message() {
        let mut data = HEAD.to_vec();
        data.extend_from_slice(b"\nmsg\n-----BEGIN SSH SIGNATURE-----\nxyz\n-----END SSH SIGNATURE-----\n");

        let tag = assert_stable(&data);
        assert!(tag.tagger.is_none());
        assert_eq!(tag.message.as_ref().unwrap().as_bytes(), b"msg\n");
        assert!(tag.gpgsig.as_ref().unwrap().starts_with(b"-----BEGIN SSH"));
    }

    #[test]
    fn unknown_headers_are_kept_in_order() {
        let mut data = HEAD.to_vec();
        data.extend_from_slice(b"tagger T <t@example.com> 1 +0000\nextra x\nother y\n z\n\nmsg\n");

        let tag = assert_stable(&data);
        let extra: Vec<(&[u8], &[u8])> = tag
            .extra_headers
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
            .collect();
        let expected: [(&[u8], &[u8]); 2] = [(b"extra", b"x"), (b"other", b"y\nz")];
        assert_eq!(extra, expected);
    }

    #[test]
    fn tag_without_separator() {
        let tag = assert_stable(HEAD);
        assert_eq!(tag.message, None);
        assert_eq!(tag.gpgsig, None);

        let mut empty_message = HEAD.to_vec();
        empty_message.push(b'\n');
        let tag = assert_stable(&empty_message);
        assert_eq!(tag.message.as_deref().map(|m| m.as_slice()), Some(&b""[..]));
    }

    #[test]
    fn missing_fields() {
        assert!(matches!(
            Tag::parse(b"type commit\ntag v1.0\n\nmessage\n"),
            Err(ObjectError::MissingTagField { field: "object" })
        ));
        assert!(matches!(
            Tag::parse(b"object da39a3ee5e6b4b0d3255bfef95601890afd80709\ntag v1.0\n\n"),
            Err(ObjectError::MissingTagField { field: "type" })
        ));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        let mut no_space = HEAD.to_vec();
        no_space.extend_from_slice(b"garbage\n\n");
        assert!(matches!(Tag::parse(&no_space), Err(ObjectError::InvalidHeader(_))));
        assert!(matches!(
            Tag::parse(&HEAD[..HEAD.len() - 1]),
            Err(ObjectError::InvalidHeader(_))
        ));
    }
}
