use std::collections::BTreeMap;

use codable::{from_value, to_value, Decode, Decoder, Encode, Encoder, Error, ErrorKind, Value};

#[derive(Debug, PartialEq)]
pub struct User {
    id: usize,
    email_address: String,
    tags: Vec<String>,
}

impl Decode for User {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        let container = decoder.container()?;
        let contact = container.nested_container("contact")?;
        Ok(User {
            id: container.decode("id")?,
            email_address: contact.decode("email")?,
            tags: container.decode_if_present("tags")?.unwrap_or_default(),
        })
    }
}

impl Encode for User {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        let mut container = encoder.container()?;
        container.encode("id", &self.id)?;
        container
            .nested_container("contact")?
            .encode("email", &self.email_address)?;
        if !self.tags.is_empty() {
            container.encode("tags", &self.tags)?;
        }
        Ok(())
    }
}

fn user_value() -> Value {
    [
        ("id", Value::from(42usize)),
        (
            "contact",
            [("email", Value::from("john@example.com"))]
                .into_iter()
                .collect(),
        ),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_manual_roundtrip() {
    let user: User = from_value(&user_value()).unwrap();
    assert_eq!(
        user,
        User {
            id: 42,
            email_address: "john@example.com".into(),
            tags: vec![],
        }
    );
    assert_eq!(to_value(&user).unwrap(), user_value());
}

#[test]
fn test_error_paths() {
    let value: Value = [("id", Value::from(1usize)), ("contact", Value::from(true))]
        .into_iter()
        .collect();
    let err = from_value::<User>(&value).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.path().map(|p| p.to_string()).as_deref(), Some("contact"));

    let value: Value = [
        ("id", Value::from(1usize)),
        ("contact", Value::Map(Default::default())),
    ]
    .into_iter()
    .collect();
    let err = from_value::<User>(&value).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    assert_eq!(err.to_string(), "KeyNotFound at contact.email: missing key 'email'");

    let value: Value = [
        ("id", Value::from(1usize)),
        ("contact", user_value().get("contact").cloned().unwrap()),
        ("tags", Value::Seq(vec![Value::from("a"), Value::from(2u32)])),
    ]
    .into_iter()
    .collect();
    let err = from_value::<User>(&value).unwrap_err();
    assert_eq!(err.path().map(|p| p.to_string()).as_deref(), Some("tags[1]"));
}

#[test]
fn test_maps_and_options() {
    let mut scores = BTreeMap::new();
    scores.insert("a".to_string(), Some(1u32));
    scores.insert("b".to_string(), None);
    let value = to_value(&scores).unwrap();
    assert_eq!(value.get("b"), Some(&Value::Null));
    assert_eq!(from_value::<BTreeMap<String, Option<u32>>>(&value).unwrap(), scores);

    let err = from_value::<u8>(&Value::from(-1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
}

#[test]
fn test_key_queries() {
    let value: Value = [("a", Value::Null), ("b", Value::from(true))]
        .into_iter()
        .collect();
    let decoder = Decoder::new(&value);
    let container = decoder.container().unwrap();
    assert!(container.contains("a"));
    assert!(!container.contains_non_null("a"));
    assert!(container.contains_non_null("b"));
    assert!(container.super_decoder_if_present("a").is_none());
    assert_eq!(container.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(container.len(), 2);
}
