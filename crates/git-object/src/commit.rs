use std::borrow::Cow;

use bstr::{BStr, BString, ByteSlice};

use crate::headers::{header_oid, push_header, HeaderBlock};
use crate::{CommitId, GitObject, ObjectError, ObjectType, TreeId};

/// A git commit object.
///
/// The header block must start with `tree`, any number of `parent`s,
/// `author` and `committer`, in that order. Every header after those
/// (`encoding`, `mergetag`, `gpgsig`, ...) is kept with its original key in
/// `extra_headers`, in stored order, so a parsed commit serializes back to
/// exactly the bytes it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Root tree of the snapshot.
    pub tree: TreeId,
    /// Parent commits (empty for root commit).
    pub parents: Vec<CommitId>,
    /// Raw author line, e.g. `"A U Thor <a@example.com> 1700000000 +0000"`.
    pub author: BString,
    pub committer: BString,
    /// Headers following `committer`. Multi-line values have their
    /// continuation lines joined with `\n`.
    pub extra_headers: Vec<(BString, BString)>,
    /// Everything after the blank line; `None` if the commit has no blank
    /// line at all.
    pub message: Option<BString>,
}

impl Commit {
    /// Parse commit content from raw bytes (no object header).
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let block = HeaderBlock::parse(content)?;
        let mut fields = block.fields.into_iter().peekable();
        let mut take = |key: &str| fields.next_if(|(k, _)| *k == key.as_bytes()).map(|(_, v)| v);

        let tree = take("tree").ok_or(ObjectError::MissingCommitField { field: "tree" })?;
        let tree = TreeId::new(header_oid(&tree, "tree")?);

        let mut parents = Vec::new();
        while let Some(parent) = take("parent") {
            parents.push(CommitId::new(header_oid(&parent, "parent")?));
        }

        let author = take("author").ok_or(ObjectError::MissingCommitField { field: "author" })?;
        let committer =
            take("committer").ok_or(ObjectError::MissingCommitField { field: "committer" })?;

        let extra_headers = fields.map(|(k, v)| (BString::from(k), v)).collect();

        Ok(Self {
            tree,
            parents,
            author,
            committer,
            extra_headers,
            message: block.body.map(BString::from),
        })
    }

    /// First value of an extra header.
    pub fn header(&self, key: &str) -> Option<&BStr> {
        self.extra_headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_bstr())
    }

    /// The `encoding` header, if any.
    pub fn encoding(&self) -> Option<&BStr> {
        self.header("encoding")
    }

    /// The commit signature (`gpgsig` or `gpgsig-sha256`), if any.
    pub fn signature(&self) -> Option<&BStr> {
        self.header("gpgsig")
            .or_else(|| self.header("gpgsig-sha256"))
    }

    /// Get the first parent (or None for root commits).
    pub fn first_parent(&self) -> Option<&CommitId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Get just the summary (first line) of the message.
    pub fn summary(&self) -> &BStr {
        let msg = self.message.as_ref().map_or(&b""[..], |m| m.as_slice());
        match msg.find_byte(b'\n') {
            Some(pos) => msg[..pos].as_bstr(),
            None => msg.as_bstr(),
        }
    }
}

impl GitObject for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn serialize_content(&self) -> Cow<'_, [u8]> {
        let mut out = Vec::new();

        push_header(&mut out, b"tree", self.tree.to_hex().as_bytes());
        for parent in &self.parents {
            push_header(&mut out, b"parent", parent.to_hex().as_bytes());
        }
        push_header(&mut out, b"author", &self.author);
        push_header(&mut out, b"committer", &self.committer);
        for (key, val) in &self.extra_headers {
            push_header(&mut out, key, val);
        }

        if let Some(ref message) = self.message {
            out.push(b'\n');
            out.extend_from_slice(message);
        }
        Cow::Owned(out)
    }
}
