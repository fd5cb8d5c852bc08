use fluent_url::Url;

#[test]
fn parts_with_authority() {
    let url = Url::parse("http://example.com/a/b/c").unwrap();
    assert_eq!(url.raw_parts(), ["/", "a", "b", "c"]);

    let url = Url::parse("http://example.com").unwrap();
    assert_eq!(url.raw_parts(), ["/"]);

    let url = Url::parse("http://example.com/a/").unwrap();
    assert_eq!(url.raw_parts(), ["/", "a", ""]);
}

#[test]
fn parts_relative() {
    assert_eq!(Url::parse("a/b").unwrap().raw_parts(), ["a", "b"]);
    assert_eq!(Url::parse("/a/b").unwrap().raw_parts(), ["/", "a", "b"]);
    assert_eq!(Url::parse("").unwrap().raw_parts(), [""]);
}

#[test]
fn parts_are_decoded() {
    let url = Url::parse("http://h/%D0%BF%D1%83%D1%82%D1%8C/x").unwrap();
    assert_eq!(url.parts(), ["/", "путь", "x"]);
    assert_eq!(url.name(), "x");
}

#[test]
fn name_of_last_segment() {
    assert_eq!(Url::parse("http://h/a/b.txt").unwrap().raw_name(), "b.txt");
    assert_eq!(Url::parse("http://h/a/").unwrap().raw_name(), "");
    assert_eq!(Url::parse("http://h").unwrap().raw_name(), "");
    assert_eq!(Url::parse("rel").unwrap().raw_name(), "rel");
}

#[test]
fn suffixes() {
    let url = Url::parse("http://h/a/archive.tar.gz").unwrap();
    assert_eq!(url.raw_suffix(), ".gz");
    assert_eq!(url.raw_suffixes(), [".tar", ".gz"]);

    assert_eq!(Url::parse("http://h/.hidden").unwrap().raw_suffix(), "");
    assert!(Url::parse("http://h/doc.").unwrap().raw_suffixes().is_empty());
}

#[test]
fn parent_drops_last_segment_and_tail() {
    let url = Url::parse("http://h/a/b?q=1#f").unwrap();
    assert_eq!(url.parent().as_str(), "http://h/a");

    let root = Url::parse("http://h/?q=1").unwrap();
    assert_eq!(root.parent().as_str(), "http://h/");

    let root = Url::parse("http://h/").unwrap();
    assert_eq!(root.parent(), root);
}

#[test]
fn slash_operator_appends_segment() {
    let url = Url::parse("http://example.com/path?q=1#f").unwrap();
    let child = (&url / "to").unwrap();
    // Query and fragment are dropped.
    assert_eq!(child.as_str(), "http://example.com/path/to");
    assert_eq!(child.raw_parts().last().map(String::as_str), Some("to"));

    let deeper = (child / "деталь").unwrap();
    assert_eq!(
        deeper.raw_parts().last().map(String::as_str),
        Some("%D0%B4%D0%B5%D1%82%D0%B0%D0%BB%D1%8C")
    );
    assert_eq!(deeper.parts().last().map(String::as_str), Some("деталь"));
}

#[test]
fn joinpath_multiple_segments() {
    let base = Url::parse("http://example.com/a").unwrap();
    assert_eq!(
        base.joinpath(&["b", "c"]).unwrap().as_str(),
        "http://example.com/a/b/c"
    );
}

#[test]
fn joinpath_preserves_trailing_slash_of_last_segment() {
    let base = Url::parse("http://example.com/a/").unwrap();
    assert_eq!(
        base.joinpath(&["b/"]).unwrap().as_str(),
        "http://example.com/a/b/"
    );
    assert_eq!(
        base.joinpath(&["b/", "c"]).unwrap().as_str(),
        "http://example.com/a/b/c"
    );
}

#[test]
fn joinpath_rejects_rooted_segment() {
    let base = Url::parse("http://example.com/a").unwrap();
    assert!(base.joinpath(&["/b"]).is_err());
}

#[test]
fn joinpath_drops_dot_segments() {
    let base = Url::parse("http://example.com/a").unwrap();
    assert_eq!(
        base.joinpath(&["./b", "..", "c"]).unwrap().as_str(),
        "http://example.com/a/c"
    );
}

#[test]
fn joinpath_encoded_keeps_escapes() {
    let base = Url::parse("http://example.com").unwrap();
    assert_eq!(
        base.joinpath_encoded(&["%2Fseg"]).unwrap().as_str(),
        "http://example.com/%2Fseg"
    );
    // Unencoded: the percent is data.
    assert_eq!(
        base.joinpath(&["%2Fseg"]).unwrap().as_str(),
        "http://example.com/%252Fseg"
    );
}

#[test]
fn joinpath_on_relative_url() {
    let base = Url::parse("a/b").unwrap();
    assert_eq!(base.joinpath(&["c"]).unwrap().as_str(), "a/b/c");
}

#[test]
fn with_path_replaces_and_keeps_tail() {
    let url = Url::parse("http://h/old?q=1#f").unwrap();
    let new = url.with_path("/a b/c");
    assert_eq!(new.as_str(), "http://h/a%20b/c?q=1#f");
}

#[test]
fn with_path_roots_and_normalizes_with_authority() {
    let url = Url::parse("http://h/old").unwrap();
    assert_eq!(url.with_path("x/./y/../z").raw_path(), "/x/z");

    // Without authority the path is taken as-is.
    let url = Url::parse("rel").unwrap();
    assert_eq!(url.with_path("x/./y").raw_path(), "x/./y");
}

#[test]
fn with_path_encoded_keeps_escapes() {
    let url = Url::parse("http://h/old").unwrap();
    assert_eq!(url.with_path_encoded("/a%2Fb").raw_path(), "/a%2Fb");
}

#[test]
fn with_name_replaces_last_segment() {
    let url = Url::parse("http://h/a/b?q=1#f").unwrap();
    assert_eq!(url.with_name("c").unwrap().as_str(), "http://h/a/c");

    let root = Url::parse("http://h").unwrap();
    assert_eq!(root.with_name("c").unwrap().as_str(), "http://h/c");

    assert!(url.with_name("a/b").is_err());
    assert!(url.with_name("..").is_err());
}

#[test]
fn with_suffix_replaces_extension() {
    let url = Url::parse("http://h/a/report.txt").unwrap();
    assert_eq!(url.with_suffix(".pdf").unwrap().as_str(), "http://h/a/report.pdf");
    assert_eq!(url.with_suffix("").unwrap().as_str(), "http://h/a/report");

    assert!(url.with_suffix(".").is_err());
    assert!(url.with_suffix("pdf").is_err());
    assert!(Url::parse("http://h/").unwrap().with_suffix(".x").is_err());
}

#[test]
fn percent_2f_views() {
    let url = Url::parse("http://h/%2Fseg1/seg2").unwrap();
    assert_eq!(url.raw_path(), "/%2Fseg1/seg2");
    assert_eq!(url.path(), "//seg1/seg2");
    assert_eq!(url.path_safe(), "/%2Fseg1/seg2");
}

#[test]
fn plus_in_path_views() {
    let url = Url::parse("http://example.com/test/x+y%2Bz/:+%2B/").unwrap();
    assert_eq!(url.path(), "/test/x+y+z/:++/");
    assert_eq!(url.raw_path(), "/test/x+y%2Bz/:+%2B/");
}

#[test]
fn empty_segments_are_kept() {
    let url = Url::parse("http://h/a//b").unwrap();
    assert_eq!(url.raw_path(), "/a//b");
    assert_eq!(url.raw_parts(), ["/", "a", "", "b"]);
}
