use codable::{Encode, ErrorKind, Value};
use codable_json::{to_string, to_string_pretty};

#[test]
fn test_basic() {
    assert_eq!(to_string(&vec![1, 2, 3, 4]).unwrap(), "[1,2,3,4]");
    assert_eq!(to_string(&"a\"b\n").unwrap(), r#""a\"b\n""#);
}

#[test]
fn test_bytes_are_unsupported() {
    let err = to_string(&Value::Bytes(vec![1, 2])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[test]
fn test_nested_paths() {
    #[derive(Encode)]
    #[codable(rename_all = "camelCase")]
    pub struct User {
        #[codable(at("account", "name"))]
        name: String,
        #[codable(coded_in("account"))]
        is_admin: bool,
        #[codable(ignore_encoding_if = Vec::is_empty)]
        tags: Vec<String>,
        nickname: Option<String>,
    }

    let json = to_string(&User {
        name: "Jane".into(),
        is_admin: true,
        tags: vec![],
        nickname: None,
    })
    .unwrap();
    assert_eq!(json, r#"{"account":{"name":"Jane","isAdmin":true}}"#);

    let json = to_string(&User {
        name: "Jane".into(),
        is_admin: false,
        tags: vec!["staff".into()],
        nickname: Some("J".into()),
    })
    .unwrap();
    assert_eq!(
        json,
        r#"{"account":{"name":"Jane","isAdmin":false},"tags":["staff"],"nickname":"J"}"#
    );
}

#[test]
fn test_enum_tags() {
    #[derive(Encode)]
    #[codable(rename_all = "snake_case")]
    pub enum Media {
        #[codable(alias = "photo")]
        Picture { url: String },
    }

    assert_eq!(
        to_string(&Media::Picture { url: "a.png".into() }).unwrap(),
        r#"{"picture":{"url":"a.png"}}"#
    );

    #[derive(Encode)]
    #[codable(tag = "type", rename_all = "lowercase")]
    pub enum Shape {
        Circle { radius: u32 },
        Point,
    }

    assert_eq!(
        to_string(&Shape::Circle { radius: 2 }).unwrap(),
        r#"{"radius":2,"type":"circle"}"#
    );
    assert_eq!(to_string(&Shape::Point).unwrap(), r#"{"type":"point"}"#);

    #[derive(Encode)]
    #[codable(tag = "t", content = "c")]
    pub enum Message {
        Ping,
        Text(String),
    }

    assert_eq!(to_string(&Message::Ping).unwrap(), r#"{"t":"Ping"}"#);
    assert_eq!(
        to_string(&Message::Text("hi".into())).unwrap(),
        r#"{"t":"Text","c":"hi"}"#
    );
}

#[test]
fn test_pretty() {
    #[derive(Encode)]
    pub struct Point {
        x: i32,
        #[codable(at("meta", "label"))]
        label: String,
        empty: Vec<u8>,
    }

    let json = to_string_pretty(&Point {
        x: -1,
        label: "origin".into(),
        empty: vec![],
    })
    .unwrap();
    assert_eq!(
        json,
        "{\n  \"x\": -1,\n  \"meta\": {\n    \"label\": \"origin\"\n  },\n  \"empty\": []\n}"
    );
}
