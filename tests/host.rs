use fluent_url::error::ErrorKind;
use fluent_url::Url;

#[test]
fn idna_encode_and_decode() {
    let url = Url::parse("http://εμπορικόσήμα.eu/").unwrap();
    assert_eq!(url.raw_host(), Some("xn--jxagkqfkduily1i.eu"));
    assert_eq!(url.host(), Some("εμπορικόσήμα.eu"));

    let url = Url::parse("http://москва.рф/").unwrap();
    assert_eq!(url.raw_host(), Some("xn--80adxhks.xn--p1ai"));
    assert_eq!(url.host(), Some("москва.рф"));
}

#[test]
fn ascii_host_is_lowercased_without_idna() {
    let url = Url::parse("http://WWW.Example.COM/").unwrap();
    assert_eq!(url.raw_host(), Some("www.example.com"));
    assert_eq!(url.host(), Some("www.example.com"));
}

#[test]
fn unicode_case_folds_before_encoding() {
    let url = Url::parse("http://ΕΜΠΟΡΙΚΌΣΉΜΑ.eu/").unwrap();
    assert_eq!(url.raw_host(), Some("xn--jxagkqfkduily1i.eu"));
}

#[test]
fn ipv4_host() {
    let url = Url::parse("http://127.0.0.1:8080/").unwrap();
    assert_eq!(url.raw_host(), Some("127.0.0.1"));
    assert_eq!(url.host(), Some("127.0.0.1"));

    // Not a dotted quad: treated as a registered name.
    let url = Url::parse("http://256.0.0.1/").unwrap();
    assert_eq!(url.raw_host(), Some("256.0.0.1"));
}

#[test]
fn ipv6_host_is_compressed() {
    let url = Url::parse("http://[2001:0DB8:0:0:0:0:0:1]/").unwrap();
    assert_eq!(url.raw_host(), Some("2001:db8::1"));
    assert_eq!(url.host_subcomponent().as_deref(), Some("[2001:db8::1]"));
    assert_eq!(url.as_str(), "http://[2001:db8::1]/");
}

#[test]
fn ipv6_zone_id_is_preserved() {
    let url = Url::parse("http://[fe80::1%25]/").unwrap();
    assert_eq!(url.raw_host(), Some("fe80::1%25"));
    // The decoded view passes a zoned address through untouched.
    assert_eq!(url.host(), Some("fe80::1%25"));
}

#[test]
fn invalid_ip_literal() {
    let err = Url::parse("http://[not-an-ip]/").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidHost);

    let err = Url::parse("http://[::1/").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidHost);
}

#[test]
fn forbidden_characters_in_ascii_host() {
    let err = Url::builder().scheme("http").host("ex ample.com").build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidHost);

    let err = Url::builder()
        .scheme("http")
        .host("user@host.example:80")
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidHost);
    let message = err.to_string();
    assert!(message.contains("dedicated parts"), "got {message:?}");
}

#[test]
fn host_decoding_skips_non_idna_names() {
    let url = Url::parse("http://plain.example/").unwrap();
    assert_eq!(url.host(), Some("plain.example"));
}
