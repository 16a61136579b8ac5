use codable::{Decode, Encode};
use codable_json::{from_str, to_string, to_string_pretty};
use proptest::prelude::*;

#[derive(Decode, Encode, PartialEq, Debug, Clone)]
#[codable(rename_all = "camelCase")]
pub struct Account {
    user_id: u64,
    #[codable(at("profile", "display_name"))]
    display_name: String,
    #[codable(at("profile", "age"))]
    age: Option<u8>,
    #[codable(coded_in("settings"), default)]
    dark_mode: bool,
    balance: i64,
    #[codable(ignore_encoding_if = Vec::is_empty, default)]
    roles: Vec<Role>,
}

#[derive(Decode, Encode, PartialEq, Debug, Clone)]
#[codable(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    Admin,
    Member { team: String },
    Guest { expires: Option<u32> },
}

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Admin),
        any::<String>().prop_map(|team| Role::Member { team }),
        any::<Option<u32>>().prop_map(|expires| Role::Guest { expires }),
    ]
}

fn account() -> impl Strategy<Value = Account> {
    (
        any::<u64>(),
        any::<String>(),
        any::<Option<u8>>(),
        any::<bool>(),
        any::<i64>(),
        proptest::collection::vec(role(), 0..4),
    )
        .prop_map(
            |(user_id, display_name, age, dark_mode, balance, roles)| Account {
                user_id,
                display_name,
                age,
                dark_mode,
                balance,
                roles,
            },
        )
}

proptest! {
    #[test]
    fn test_account_roundtrip(account in account()) {
        let json = to_string(&account).unwrap();
        prop_assert_eq!(from_str::<Account>(&json).unwrap(), account.clone());
        let pretty = to_string_pretty(&account).unwrap();
        prop_assert_eq!(from_str::<Account>(&pretty).unwrap(), account);
    }
}

#[test]
fn test_account_layout() {
    let account = Account {
        user_id: 1,
        display_name: "Jane".into(),
        age: None,
        dark_mode: true,
        balance: -5,
        roles: vec![Role::Admin],
    };
    assert_eq!(
        to_string(&account).unwrap(),
        r#"{"userId":1,"profile":{"display_name":"Jane"},"settings":{"darkMode":true},"balance":-5,"roles":[{"kind":"admin"}]}"#
    );
}
