use codable::{Decode, ErrorKind};
use codable_json::from_str;

#[test]
fn test_basic() {
    let x: Vec<u32> = from_str(r#"[1, 2, 3, 4]"#).unwrap();
    assert_eq!(x, vec![1, 2, 3, 4]);
}

#[test]
fn test_syntax_error() {
    let err = from_str::<Vec<u32>>("[1, 2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn test_defaults_and_nesting() {
    #[derive(Decode, PartialEq, Debug)]
    pub struct Post {
        id: String,
        #[codable(at("header"))]
        title: String,
        #[codable(default = 0)]
        likes: i64,
    }

    let post: Post = from_str(r#"{"id": "x", "header": "T"}"#).unwrap();
    assert_eq!(
        post,
        Post {
            id: "x".into(),
            title: "T".into(),
            likes: 0,
        }
    );

    // a mistyped value falls back as well
    let post: Post = from_str(r#"{"id": "x", "header": "T", "likes": "many"}"#).unwrap();
    assert_eq!(post.likes, 0);

    let err = from_str::<Post>(r#"{"header": "T"}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyNotFound);
}

#[test]
fn test_shared_nested_container() {
    #[derive(Decode, PartialEq, Debug)]
    pub struct User {
        #[codable(at("account", "name"))]
        name: String,
        #[codable(at("account", "profile", "age"))]
        age: u8,
        #[codable(coded_in("account"), default_if_missing)]
        admin: bool,
    }

    let user: User = from_str(
        r#"
        {
            "account": {
                "name": "Jane",
                "profile": {"age": 42},
                "admin": null
            }
        }
    "#,
    )
    .unwrap();
    assert_eq!(
        user,
        User {
            name: "Jane".into(),
            age: 42,
            admin: false,
        }
    );

    let err = from_str::<User>(r#"{"account": {"name": "Jane", "profile": {"age": 300}}}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
    assert_eq!(err.path().map(|p| p.to_string()).as_deref(), Some("account.profile.age"));
}

#[test]
fn test_untagged_picks_case_knowing_all_keys() {
    #[derive(Decode, PartialEq, Debug)]
    #[codable(untagged)]
    pub enum Command {
        Load { key: String },
        Store { key: String, value: i64 },
    }

    let command: Command = from_str(r#"{"key": "a", "value": 1}"#).unwrap();
    assert_eq!(
        command,
        Command::Store {
            key: "a".into(),
            value: 1
        }
    );
    let command: Command = from_str(r#"{"key": "a"}"#).unwrap();
    assert_eq!(command, Command::Load { key: "a".into() });

    let err = from_str::<Command>(r#"{"value": 1}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoMatchingVariant);
}

#[test]
fn test_external_aliases() {
    #[derive(Decode, PartialEq, Debug)]
    #[codable(rename_all = "snake_case")]
    pub enum Media {
        #[codable(alias = "photo")]
        Picture { url: String },
        VideoClip { url: String, seconds: u32 },
    }

    let expected = Media::Picture { url: "a.png".into() };
    assert_eq!(from_str::<Media>(r#"{"picture": {"url": "a.png"}}"#).unwrap(), expected);
    assert_eq!(from_str::<Media>(r#"{"photo": {"url": "a.png"}}"#).unwrap(), expected);
    assert_eq!(
        from_str::<Media>(r#"{"video_clip": {"url": "b.mp4", "seconds": 3}}"#).unwrap(),
        Media::VideoClip {
            url: "b.mp4".into(),
            seconds: 3
        }
    );

    let err = from_str::<Media>(r#"{"audio": {}}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownVariant);
}

#[test]
fn test_internal_and_adjacent_tags() {
    #[derive(Decode, PartialEq, Debug)]
    #[codable(tag = "type", rename_all = "lowercase")]
    pub enum Shape {
        Circle { radius: f64 },
        Square { side: f64 },
        Point,
    }

    assert_eq!(
        from_str::<Shape>(r#"{"type": "circle", "radius": 1.5}"#).unwrap(),
        Shape::Circle { radius: 1.5 }
    );
    assert_eq!(from_str::<Shape>(r#"{"type": "point"}"#).unwrap(), Shape::Point);

    #[derive(Decode, PartialEq, Debug)]
    #[codable(tag = "t", content = "c")]
    pub enum Message {
        Ping,
        Text(String),
        Move { x: i32, y: i32 },
    }

    assert_eq!(from_str::<Message>(r#"{"t": "Ping"}"#).unwrap(), Message::Ping);
    assert_eq!(
        from_str::<Message>(r#"{"t": "Text", "c": "hi"}"#).unwrap(),
        Message::Text("hi".into())
    );
    assert_eq!(
        from_str::<Message>(r#"{"c": {"x": 1, "y": -2}, "t": "Move"}"#).unwrap(),
        Message::Move { x: 1, y: -2 }
    );
}

#[test]
fn test_optional_fields() {
    #[derive(Decode, PartialEq, Debug)]
    pub struct Profile {
        nickname: Option<String>,
        #[codable(at("links", "home"))]
        home: Option<String>,
    }

    assert_eq!(
        from_str::<Profile>(r#"{"nickname": null}"#).unwrap(),
        Profile {
            nickname: None,
            home: None,
        }
    );
    assert_eq!(
        from_str::<Profile>(r#"{"links": {"home": "https://example.com"}}"#).unwrap(),
        Profile {
            nickname: None,
            home: Some("https://example.com".into()),
        }
    );
}
