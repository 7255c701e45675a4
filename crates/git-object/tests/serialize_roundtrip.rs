use bstr::BString;
use git_hash::ObjectId;
use git_object::{
    Blob, Commit, CommitId, FileMode, GitObject, Object, ObjectType, Tag, Tree, TreeEntry, TreeId,
};

fn commit(parents: Vec<CommitId>, message: &str) -> Commit {
    Commit {
        tree: TreeId::from_hex("4b825dc642cb6eb9a060e54bf8d69288fbee4904").unwrap(),
        parents,
        author: BString::from("Alice <alice@example.com> 1700000000 +0000"),
        committer: BString::from("Bob <bob@example.com> 1700000100 -0130"),
        extra_headers: vec![],
        message: Some(BString::from(message)),
    }
}

fn roundtrip(obj: Object) {
    let serialized = obj.to_bytes();
    let parsed = Object::parse(&serialized).unwrap();
    assert_eq!(parsed, obj);
    assert_eq!(parsed.id(), obj.id());
}

#[test]
fn blob_roundtrips() {
    roundtrip(Object::Blob(Blob::new(b"hello world\n".to_vec())));
    roundtrip(Object::Blob(Blob::new(vec![])));
    roundtrip(Object::Blob(Blob::new(b"\0\0\0binary\0data\0".to_vec())));
}

#[test]
fn tree_roundtrip() {
    let oid = ObjectId::from_hex("ce013625030ba8dba906f756967f9e9ca394464a").unwrap();
    let entries = [
        ("README.md", FileMode::Regular),
        ("run.sh", FileMode::Executable),
        ("src", FileMode::Tree),
    ]
    .into_iter()
    .map(|(name, mode)| TreeEntry::new(mode, name, oid))
    .collect();
    roundtrip(Object::Tree(Tree { entries }));
    roundtrip(Object::Tree(Tree::new()));
}

#[test]
fn commit_roundtrips() {
    let p = |n: u8| {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        CommitId::new(ObjectId::from_array(bytes))
    };
    roundtrip(Object::Commit(commit(vec![], "Initial commit\n")));
    roundtrip(Object::Commit(commit(vec![p(1)], "Test commit\n\nWith body.\n")));
    roundtrip(Object::Commit(commit(vec![p(1), p(2), p(3)], "Octopus merge\n")));

    let mut with_extra = commit(vec![p(1)], "extra\n");
    with_extra.extra_headers.push((
        BString::from("mergetag"),
        BString::from("object 0000000000000000000000000000000000000001\ntype commit"),
    ));
    roundtrip(Object::Commit(with_extra));
}

#[test]
fn tag_roundtrips() {
    let target = ObjectId::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
    let tag = |tagger: Option<&str>| Tag {
        target,
        target_type: ObjectType::Commit,
        tag_name: BString::from("v1.0"),
        tagger: tagger.map(BString::from),
        extra_headers: vec![],
        message: Some(BString::from("Release v1.0\n")),
        gpgsig: None,
    };
    roundtrip(Object::Tag(tag(Some("Tagger <t@example.com> 1700000000 +0000"))));
    roundtrip(Object::Tag(tag(None)));
}

#[test]
fn object_type_preserved() {
    assert_eq!(Object::from(Blob::default()).object_type(), ObjectType::Blob);
    assert_eq!(Object::from(Tree::new()).object_type(), ObjectType::Tree);
    assert_eq!(Object::from(commit(vec![], "")).object_type(), ObjectType::Commit);
}

#[test]
fn parse_with_bad_header() {
    assert!(Object::parse(b"blob").is_err());
    assert!(Object::parse(b"tree x\0").is_err());
    assert!(Object::parse(b"note 0\0").is_err());
}

#[test]
fn commit_tree_and_parent_are_typed() {
    let c = commit(vec![], "m\n");
    let obj = Object::parse(&Object::Commit(c).to_bytes()).unwrap();
    let Object::Commit(parsed) = obj else {
        panic!("expected commit");
    };
    assert_eq!(parsed.tree.expected_type(), ObjectType::Tree);
    assert_eq!(parsed.tree, Tree::new().id());
}
