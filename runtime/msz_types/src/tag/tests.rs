use super::*;

#[test]
fn scalar_range() {
    for tag in [Tag::Bool, Tag::I8, Tag::I64, Tag::U32, Tag::Usize, Tag::F64] {
        assert!(tag.is_scalar(), "{tag} should be scalar");
    }
    for tag in [Tag::Str, Tag::Array, Tag::Ptr, Tag::Struct, Tag::Interface] {
        assert!(!tag.is_scalar(), "{tag} should not be scalar");
    }
}

#[test]
fn word_references() {
    assert!(Tag::Ptr.is_word_reference());
    assert!(Tag::Map.is_word_reference());
    assert!(Tag::Chan.is_word_reference());
    assert!(Tag::Func.is_word_reference());

    // Multi-word headers and inline aggregates are not single references.
    assert!(!Tag::Str.is_word_reference());
    assert!(!Tag::Slice.is_word_reference());
    assert!(!Tag::Interface.is_word_reference());
    assert!(!Tag::Array.is_word_reference());
    assert!(!Tag::Struct.is_word_reference());
}

#[test]
fn debug_format() {
    assert_eq!(format!("{:?}", Tag::Slice), "Tag::slice");
}
