use fluent_url::Url;

#[test]
fn query_multi_map_view() {
    let url = Url::parse("http://h/?a=1&b=2&a=3&flag").unwrap();
    let query = url.query();
    assert_eq!(query.len(), 4);
    assert_eq!(query.get("a"), Some("1"));
    assert_eq!(query.get_all("a").collect::<Vec<_>>(), ["1", "3"]);
    assert_eq!(query.get("flag"), Some(""));
    assert!(query.contains_key("b"));
    assert!(!query.contains_key("c"));
    assert_eq!(
        query.iter().collect::<Vec<_>>(),
        [("a", "1"), ("b", "2"), ("a", "3"), ("flag", "")]
    );
}

#[test]
fn query_decodes_values() {
    let url = Url::parse("http://h/?text=%D1%82%D0%B5%D0%BA%D1%81%D1%82&k=a+b").unwrap();
    assert_eq!(url.query().get("text"), Some("текст"));
    assert_eq!(url.query().get("k"), Some("a b"));
}

#[test]
fn query_splits_on_both_separators() {
    let url = Url::parse("http://h/?a=1;b=2&c=3").unwrap();
    assert_eq!(
        url.query().iter().collect::<Vec<_>>(),
        [("a", "1"), ("b", "2"), ("c", "3")]
    );
}

#[test]
fn with_query_replaces() {
    let url = Url::parse("http://h/?old=1#frag").unwrap();
    let new = url.with_query(&[("a", "1")]).unwrap();
    assert_eq!(new.as_str(), "http://h/?a=1#frag");

    let cleared = new.with_query(None::<&str>).unwrap();
    assert_eq!(cleared.as_str(), "http://h/#frag");
}

#[test]
fn with_query_string_treats_percent_as_data() {
    let url = Url::parse("http://h/").unwrap();
    let new = url.with_query("next=http%3A//example.com/").unwrap();
    assert_eq!(new.raw_query_string(), "next=http%253A//example.com/");
}

#[test]
fn parsed_query_is_requoted() {
    let url = Url::parse("http://127.0.0.1/?next=http%3A//example.com/").unwrap();
    assert_eq!(url.raw_query_string(), "next=http://example.com/");
    assert_eq!(url.as_str(), "http://127.0.0.1/?next=http://example.com/");
}

#[test]
fn with_query_encodes_non_ascii() {
    let url = Url::parse("http://example.com").unwrap();
    let new = url.with_query(&[("føø", "føø")]).unwrap();
    assert_eq!(new.as_str(), "http://example.com/?f%C3%B8%C3%B8=f%C3%B8%C3%B8");
}

#[test]
fn update_query_dict_semantics() {
    let url = Url::parse("http://h/?a=b&b=1").unwrap();
    let updated = url.update_query(&[("b", "2")]).unwrap();
    assert_eq!(updated.as_str(), "http://h/?a=b&b=2");

    let extended = url.extend_query(&[("b", "2")]).unwrap();
    assert_eq!(extended.as_str(), "http://h/?a=b&b=1&b=2");
}

#[test]
fn update_query_appends_new_keys() {
    let url = Url::parse("http://h/?a=1").unwrap();
    let updated = url.update_query(&[("c", "d")]).unwrap();
    assert_eq!(updated.as_str(), "http://h/?a=1&c=d");
}

#[test]
fn update_query_clears_with_none() {
    let url = Url::parse("http://h/?a=1").unwrap();
    assert_eq!(url.update_query(None::<&str>).unwrap().raw_query_string(), "");
}

#[test]
fn rem_operator_updates_query() {
    let url = Url::parse("http://h/?a=b&b=1").unwrap();
    let updated = (&url % [("c", "d")]).unwrap();
    assert_eq!(updated.as_str(), "http://h/?a=b&b=1&c=d");
}

#[test]
fn without_query_params() {
    let url = Url::parse("http://h/?a=1&b=2&a=3&c=4").unwrap();
    let trimmed = url.without_query_params(&["a", "c"]);
    assert_eq!(trimmed.as_str(), "http://h/?b=2");
}

#[test]
fn query_values_from_numbers() {
    let url = Url::parse("http://h/").unwrap();
    let new = url.with_query(&[("n", 42i64)]).unwrap();
    assert_eq!(new.raw_query_string(), "n=42");

    let new = url.with_query(&[("x", 1.5f64)]).unwrap();
    assert_eq!(new.raw_query_string(), "x=1.5");

    assert!(url.with_query(&[("x", f64::NAN)]).is_err());
}

#[test]
fn query_sequence_values_repeat_key() {
    let url = Url::parse("http://h/").unwrap();
    let new = url.with_query(&[("k", vec!["a", "b"])]).unwrap();
    assert_eq!(new.raw_query_string(), "k=a&k=b");
}

#[test]
fn percent_encoded_key_is_escaped_again() {
    let url = Url::parse("http://example.com").unwrap();
    let new = url.with_query(&[("k%cf%80", "v%cf%80")]).unwrap();
    assert_eq!(new.raw_query_string(), "k%25cf%2580=v%25cf%2580");
    assert_eq!(new.query_string(), "k%cf%80=v%cf%80");
    assert_eq!(new.query().get("k%cf%80"), Some("v%cf%80"));
}

#[test]
fn query_string_views() {
    let url = Url::parse("http://h/p?a=x+y&b=%D0%BF").unwrap();
    assert_eq!(url.raw_query_string(), "a=x+y&b=%D0%BF");
    assert_eq!(url.query_string(), "a=x y&b=п");
    assert_eq!(url.path_qs(), "/p?a=x y&b=п");
    assert_eq!(url.raw_path_qs(), "/p?a=x+y&b=%D0%BF");
}
