use std::borrow::Cow;
use std::cmp::Ordering;

use bstr::{BStr, BString, ByteSlice};
use git_hash::ObjectId;

use crate::{BlobId, CommitId, GitObject, ObjectError, ObjectType, TreeId};

/// File mode for tree entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Regular file (100644)
    Regular,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Git submodule link (160000)
    Gitlink,
    /// Subdirectory (040000)
    Tree,
    /// Unknown mode (preserved for round-trip)
    Unknown(u32),
}

impl FileMode {
    /// Parse from octal ASCII bytes (e.g., `b"100644"`).
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        let raw = parse_octal(s)
            .ok_or_else(|| ObjectError::InvalidFileMode(String::from_utf8_lossy(s).into()))?;
        Ok(Self::from_raw(raw))
    }

    /// Create from the raw numeric value.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0o100644 => Self::Regular,
            0o100755 => Self::Executable,
            0o120000 => Self::Symlink,
            0o160000 => Self::Gitlink,
            0o040000 => Self::Tree,
            other => Self::Unknown(other),
        }
    }

    /// Octal ASCII form, as written in tree payloads (`40000` for trees).
    pub fn to_octal(&self) -> String {
        format!("{:o}", self.raw())
    }

    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Gitlink => 0o160000,
            Self::Tree => 0o40000,
            Self::Unknown(v) => *v,
        }
    }

    /// The kind of object an entry with this mode points at.
    ///
    /// Symlink targets are stored as blobs; gitlinks name a commit in
    /// another repository.
    pub fn object_type(&self) -> Option<ObjectType> {
        match self {
            Self::Regular | Self::Executable | Self::Symlink => Some(ObjectType::Blob),
            Self::Tree => Some(ObjectType::Tree),
            Self::Gitlink => Some(ObjectType::Commit),
            Self::Unknown(_) => None,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree)
    }
}

fn parse_octal(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    s.iter().try_fold(0u32, |val, &b| {
        if !(b'0'..=b'7').contains(&b) {
            return None;
        }
        val.checked_mul(8)?.checked_add(u32::from(b - b'0'))
    })
}

/// A single entry in a git tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
    /// Mode digits as stored, kept only when they differ from
    /// [`FileMode::to_octal`] (e.g. the zero-padded `040000` some old tools
    /// wrote).
    pub mode_text: Option<BString>,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<BString>, oid: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
            mode_text: None,
        }
    }

    /// Mode digits as written in the tree payload.
    pub fn mode_bytes(&self) -> Cow<'_, [u8]> {
        match self.mode_text {
            Some(ref text) => Cow::Borrowed(text.as_slice()),
            None => Cow::Owned(self.mode.to_octal().into_bytes()),
        }
    }

    /// The entry's id as a [`TreeId`], if it names a subdirectory.
    pub fn tree_id(&self) -> Option<TreeId> {
        self.mode.is_tree().then(|| TreeId::new(self.oid))
    }

    /// The entry's id as a [`BlobId`], for files and symlinks.
    pub fn blob_id(&self) -> Option<BlobId> {
        (self.mode.object_type() == Some(ObjectType::Blob)).then(|| BlobId::new(self.oid))
    }

    /// The entry's id as a [`CommitId`], for submodule links.
    pub fn commit_id(&self) -> Option<CommitId> {
        (self.mode == FileMode::Gitlink).then(|| CommitId::new(self.oid))
    }

    /// Compare entries using git's tree sorting rules.
    ///
    /// Directories sort as if they have a trailing '/'. This means
    /// "foo" (dir) sorts after "foo.c" and "foo-bar" but before "foo0".
    pub fn cmp_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
        let (n1, n2) = (a.name.as_bytes(), b.name.as_bytes());
        let common = n1.len().min(n2.len());
        n1[..common].cmp(&n2[..common]).then_with(|| {
            let next = |name: &[u8], is_dir: bool| match name.get(common) {
                Some(&c) => c,
                None if is_dir => b'/',
                None => 0,
            };
            next(n1, a.mode.is_tree()).cmp(&next(n2, b.mode.is_tree()))
        })
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::cmp_entries(self, other)
    }
}

/// A git tree object: a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse tree content from binary format.
    ///
    /// Each entry is: `<mode-ascii> <name>\0<20 raw id bytes>`
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < content.len() {
            let space_pos = content[pos..]
                .find_byte(b' ')
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "missing space after mode".into(),
                })?
                + pos;

            let mode_digits = &content[pos..space_pos];
            let mode = FileMode::from_bytes(mode_digits).map_err(|_| {
                ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "invalid mode".into(),
                }
            })?;

            let name_start = space_pos + 1;
            let null_pos = content[name_start..]
                .find_byte(0)
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: name_start,
                    reason: "missing null after name".into(),
                })?
                + name_start;

            let oid_start = null_pos + 1;
            let oid = ObjectId::from_bytes_at(content, oid_start).map_err(|_| {
                ObjectError::InvalidTreeEntry {
                    offset: oid_start,
                    reason: "truncated object id".into(),
                }
            })?;

            let mode_text = (mode_digits != mode.to_octal().as_bytes())
                .then(|| BString::from(mode_digits));
            entries.push(TreeEntry {
                mode,
                name: BString::from(&content[name_start..null_pos]),
                oid,
                mode_text,
            });
            pos = oid_start + ObjectId::LEN;
        }

        Ok(Self { entries })
    }

    /// Sort entries in git canonical order.
    ///
    /// Entries are serialized in the order they are held, so a tree built
    /// by hand should be sorted before it is hashed or stored.
    pub fn sort(&mut self) {
        self.entries.sort();
    }

    /// Whether the entries are in git canonical order.
    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|w| w[0] <= w[1])
    }

    /// Lookup an entry by name.
    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GitObject for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    /// Entries are written in the order they are held.
    fn serialize_content(&self) -> Cow<'_, [u8]> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(&entry.mode_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        Cow::Owned(out)
    }
}
