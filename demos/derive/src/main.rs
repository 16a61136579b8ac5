use codable::{Decode, Encode, MemberInit};

#[derive(Decode, Encode, MemberInit, Debug)]
#[codable(rename_all = "camelCase")]
pub struct User {
    id: usize,
    #[codable(at("contact", "email"))]
    email_address: String,
    #[codable(default = 0)]
    login_count: u32,
    #[codable(ignore_encoding_if = Option::is_none)]
    nickname: Option<String>,
}

fn main() {
    let user = User::new_with_login_count(42, "john@example.com".into(), 3, None);
    let json = codable_json::to_string_pretty(&user).unwrap();
    println!("{}", json);

    let user: User = codable_json::from_str(r#"{"id": 1, "contact": {"email": "jane@example.com"}}"#)
        .unwrap();
    println!("{:#?}", user);
}
