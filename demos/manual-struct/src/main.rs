use codable::{Decode, Decoder, Encode, Encoder, Error};

#[derive(Debug)]
pub struct User {
    id: usize,
    email_address: String,
}

impl Decode for User {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        let container = decoder.container()?;
        let contact = container.nested_container("contact")?;
        Ok(User {
            id: container.decode("id")?,
            email_address: contact.decode("email")?,
        })
    }
}

impl Encode for User {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        let mut container = encoder.container()?;
        container.encode("id", &self.id)?;
        let mut contact = container.nested_container("contact")?;
        contact.encode("email", &self.email_address)?;
        Ok(())
    }
}

fn main() {
    let user: User =
        codable_json::from_str(r#"{"id": 42, "contact": {"email": "john@example.com"}}"#).unwrap();
    println!("{:?}", user);
    println!("{}", codable_json::to_string(&user).unwrap());
}
