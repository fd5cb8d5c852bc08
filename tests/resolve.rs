use fluent_url::Url;

trait Test {
    fn pass(&self, r: &str, res: &str);
}

impl Test for Url {
    #[track_caller]
    fn pass(&self, r: &str, expected: &str) {
        let r = Url::parse(r).unwrap();
        assert_eq!(self.join(&r).as_str(), expected);
    }
}

#[test]
fn resolve() {
    // Examples from Section 5.4 of RFC 3986.
    let base = Url::parse("http://a/b/c/d;p?q").unwrap();

    base.pass("g:h", "g:h");
    base.pass("g", "http://a/b/c/g");
    base.pass("./g", "http://a/b/c/g");
    base.pass("g/", "http://a/b/c/g/");
    base.pass("/g", "http://a/g");
    base.pass("//g", "http://g");
    base.pass("?y", "http://a/b/c/d;p?y");
    base.pass("g?y", "http://a/b/c/g?y");
    base.pass("#s", "http://a/b/c/d;p?q#s");
    base.pass("g#s", "http://a/b/c/g#s");
    base.pass("g?y#s", "http://a/b/c/g?y#s");
    base.pass(";x", "http://a/b/c/;x");
    base.pass("g;x", "http://a/b/c/g;x");
    base.pass("g;x?y#s", "http://a/b/c/g;x?y#s");
    base.pass("", "http://a/b/c/d;p?q");
    base.pass(".", "http://a/b/c/");
    base.pass("./", "http://a/b/c/");
    base.pass("..", "http://a/b/");
    base.pass("../", "http://a/b/");
    base.pass("../g", "http://a/b/g");
    base.pass("../..", "http://a/");
    base.pass("../../", "http://a/");
    base.pass("../../g", "http://a/g");

    // A ".." beyond the root is absorbed, not an error.
    base.pass("../../../g", "http://a/g");
    base.pass("../../../../g", "http://a/g");
    base.pass("/./g", "http://a/g");
    base.pass("/../g", "http://a/g");

    base.pass("g.", "http://a/b/c/g.");
    base.pass(".g", "http://a/b/c/.g");
    base.pass("g..", "http://a/b/c/g..");
    base.pass("..g", "http://a/b/c/..g");

    base.pass("./../g", "http://a/b/g");
    base.pass("./g/.", "http://a/b/c/g/");
    base.pass("g/./h", "http://a/b/c/g/h");
    base.pass("g/../h", "http://a/b/c/h");
    base.pass("g;x=1/./y", "http://a/b/c/g;x=1/y");
    base.pass("g;x=1/../y", "http://a/b/c/y");

    base.pass("g?y/./x", "http://a/b/c/g?y/./x");
    base.pass("g?y/../x", "http://a/b/c/g?y/../x");
    base.pass("g#s/./x", "http://a/b/c/g#s/./x");
    base.pass("g#s/../x", "http://a/b/c/g#s/../x");

    base.pass("http:g", "http:g");
}

#[test]
fn resolve_preserves_empty_segments() {
    let base = Url::parse("http://example.com/a").unwrap();

    base.pass("/x", "http://example.com/x");
    base.pass("//other/y", "http://other/y");
    base.pass("./https://github.com/", "http://example.com/https://github.com/");
}

#[test]
fn resolve_against_authority_with_empty_path() {
    let base = Url::parse("http://example.com").unwrap();

    base.pass("g", "http://example.com/g");
    base.pass("./g", "http://example.com/g");
    base.pass("?y", "http://example.com/?y");
}

#[test]
fn resolve_keeps_output_parseable() {
    // Merging must not let a path masquerade as an authority.
    let base = Url::parse("foo:/").unwrap();
    base.pass(".//@@", "foo:/.//@@");
}

#[test]
fn resolve_non_hierarchical_base() {
    let base = Url::parse("foo:bar").unwrap();

    base.pass("", "foo:bar");
    base.pass("#baz", "foo:bar#baz");
    base.pass("http://example.com/", "http://example.com/");
    base.pass("bar:baz", "bar:baz");
    // A relative reference replaces the opaque path wholesale.
    base.pass("baz", "foo:baz");
}

#[test]
fn resolve_drops_reference_default_port() {
    let base = Url::parse("https://h/").unwrap();
    base.pass("//example.com:443/x", "https://example.com/x");
}

#[test]
fn resolve_query_of_encoded_reference() {
    let base = Url::parse("http://127.0.0.1:62869").unwrap();
    let path = Url::parse("/api?start=2022-03-27T14:05:00%2B03:00").unwrap();
    let joined = base.join(&path);
    assert_eq!(joined.query().get("start"), Some("2022-03-27T14:05:00+03:00"));
}
