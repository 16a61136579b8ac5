//! Emission of `encode` bodies.
//!
//! Containers are opened lazily: a nested container is only created if at
//! least one value below it is encoded.  If every such value is guarded by
//! a runtime predicate the container is guarded by their disjunction.
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::emit::{construct, Fresh, Members};
use crate::enums::{Case, TagStrategy};
use crate::keys::{KeyRegistry, Node, Slot};
use crate::model::Shape;
use crate::registration::Registration;
use crate::variable::Location;

struct Walk<'a> {
    members: Members<'a>,
    fresh: Fresh,
}

impl<'a> Walk<'a> {
    fn new(members: Members<'a>) -> Walk<'a> {
        Walk {
            members,
            fresh: Fresh::default(),
        }
    }

    fn children(&mut self, node: &Node<Slot>, container: &Ident) -> TokenStream {
        let registry = self.members.registry;
        let mut rv = TokenStream::new();
        for (segment, child) in node.children() {
            let key = registry.key(segment);
            for registration in self.members.encoded_at(child) {
                rv.extend(registration.variable.encode(Location::Keyed {
                    container,
                    key: &key,
                }));
            }
            let below = self.members.encoded_below(child);
            if below.is_empty() {
                continue;
            }
            let nested = self.fresh.container();
            let inner = self.children(child, &nested);
            let block = quote! {
                let mut #nested = #container.nested_container(#key)?;
                #inner
            };
            let conditions: Option<Vec<TokenStream>> = below
                .iter()
                .map(|registration| registration.variable.encode_condition())
                .collect();
            rv.extend(match conditions {
                Some(conditions) => quote! {
                    if #(#conditions)||* {
                        #block
                    }
                },
                None => quote! {
                    {
                        #block
                    }
                },
            });
        }
        rv
    }

    /// Encodes every field into `encoder`.
    ///
    /// The root container is always opened unless a value is coded at the
    /// root itself, so a struct without encoded fields becomes an empty
    /// map.
    fn body(&mut self, encoder: &Ident) -> TokenStream {
        let registry = self.members.registry;
        let root = registry.tree().root();
        let leaves = self.members.encoded_at(root);
        let mut rv = TokenStream::new();
        for registration in &leaves {
            rv.extend(registration.variable.encode(Location::Root { coder: encoder }));
        }
        if !self.members.encoded_below(root).is_empty() {
            let container = format_ident!("__container");
            let inner = self.children(root, &container);
            rv.extend(quote! {
                {
                    let mut #container = #encoder.container()?;
                    #inner
                }
            });
        } else if leaves.is_empty() {
            rv.extend(quote!(#encoder.container()?;));
        }
        rv
    }
}

/// The body of `Encode::encode` for a struct.
pub fn struct_body(registry: &KeyRegistry, fields: &[Registration]) -> TokenStream {
    let encoder = format_ident!("__encoder");
    let mut walk = Walk::new(Members {
        registry,
        fields,
        case: None,
    });
    let body = walk.body(&encoder);
    quote! {
        #body
        ::codable::__derive::Ok(())
    }
}

fn case_body(registry: &KeyRegistry, case: &Case, encoder: &Ident) -> TokenStream {
    let mut walk = Walk::new(Members {
        registry,
        fields: &case.fields,
        case: Some(case.index),
    });
    walk.body(encoder)
}

/// Opens the containers along `path` below `encoder` and lets `write`
/// fill the slot of its last segment.
fn write_at<F>(registry: &KeyRegistry, encoder: &Ident, path: &[String], write: F) -> TokenStream
where
    F: FnOnce(&Ident, &TokenStream) -> TokenStream,
{
    let (last, parents) = match path.split_last() {
        Some(split) => split,
        None => return TokenStream::new(),
    };
    let mut fresh = Fresh::default();
    let mut container = fresh.container();
    let mut stmts = quote!(let mut #container = #encoder.container()?;);
    for segment in parents {
        let key = registry.key(segment);
        let nested = fresh.container();
        stmts.extend(quote!(let mut #nested = #container.nested_container(#key)?;));
        container = nested;
    }
    let write = write(&container, &registry.key(last));
    quote! {
        {
            #stmts
            #write
        }
    }
}

/// The body of `Encode::encode` for an enum.
pub fn enum_body(registry: &KeyRegistry, strategy: &TagStrategy, cases: &[Case]) -> TokenStream {
    let encoder = format_ident!("__encoder");
    let content = format_ident!("__content");
    let arms = cases.iter().map(|case| {
        let ident = &case.ident;
        let tag = case.primary_tag();
        if case.ignored || case.tags.is_empty() {
            let message = format!("variant `{}` cannot be encoded", ident);
            return quote! {
                Self::#ident { .. } => {
                    return ::codable::__derive::Err(::codable::Error::new(
                        ::codable::ErrorKind::InvalidValue,
                        #message,
                    ));
                }
            };
        }
        let pattern = construct(quote!(Self::#ident), case.shape, &case.fields);
        let body = match strategy {
            TagStrategy::External => {
                let key = registry.key(&tag);
                let content_body = case_body(registry, case, &content);
                quote! {
                    let mut __tagged = #encoder.container()?;
                    let #content = &mut __tagged.super_encoder(#key);
                    #content_body
                }
            }
            TagStrategy::Internal { tag: tag_path } => {
                let content_body = case_body(registry, case, &encoder);
                let write_tag = write_at(registry, &encoder, tag_path, |container, key| {
                    quote!(#container.encode(#key, #tag)?;)
                });
                quote! {
                    #content_body
                    #write_tag
                }
            }
            TagStrategy::Adjacent {
                tag: tag_path,
                content: content_path,
            } => {
                let write_tag = write_at(registry, &encoder, tag_path, |container, key| {
                    quote!(#container.encode(#key, #tag)?;)
                });
                if case.has_fields() {
                    let content_body = case_body(registry, case, &content);
                    let write_content =
                        write_at(registry, &encoder, content_path, |container, key| {
                            quote! {
                                let #content = &mut #container.super_encoder(#key);
                                #content_body
                            }
                        });
                    quote! {
                        #write_tag
                        #write_content
                    }
                } else {
                    write_tag
                }
            }
            TagStrategy::Untagged if case.shape == Shape::Unit => quote! {
                #encoder.encode_nil();
            },
            TagStrategy::Untagged => case_body(registry, case, &encoder),
        };
        quote! {
            #pattern => {
                #body
            }
        }
    });
    let arms: Vec<TokenStream> = arms.collect();
    if arms.is_empty() {
        return quote!(match *self {});
    }
    quote! {
        match self {
            #(#arms)*
        }
        ::codable::__derive::Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::diag::Diagnostics;
    use crate::expand::TypeModel;

    fn encode_body(input: syn::DeriveInput) -> String {
        let mut diagnostics = Diagnostics::new();
        let model = TypeModel::build(&input, &mut diagnostics).unwrap();
        assert!(diagnostics.is_empty());
        model.encode_body().to_string()
    }

    #[test]
    fn test_lazy_containers() {
        let body = encode_body(syn::parse_quote! {
            struct Profile {
                #[codable(at("meta", "tags"), ignore_encoding_if = Vec::is_empty)]
                tags: Vec<String>,
                #[codable(at("stats", "views"), ignore_encoding)]
                views: u64,
            }
        });
        assert!(body.contains("if ! (Vec :: is_empty) (& self . tags) {"));
        assert!(!body.contains("Stats"));
    }

    #[test]
    fn test_internal_tag_written_after_content() {
        let body = encode_body(syn::parse_quote! {
            #[codable(tag = "type")]
            enum Shape {
                Circle { radius: f64 },
                Point,
            }
        });
        let content = body.find("__CodingKeys :: Radius").unwrap();
        let tag = body.find("\"circle\"").or_else(|| body.find("\"Circle\"")).unwrap();
        assert!(content < tag);
    }

    #[test]
    fn test_ignored_variant_fails() {
        let body = encode_body(syn::parse_quote! {
            enum Event {
                Started,
                #[codable(ignore)]
                Internal(u32),
            }
        });
        assert!(body.contains("Self :: Internal { .. }"));
        assert!(body.contains("InvalidValue"));
    }

    #[test]
    fn test_empty_enum() {
        let body = encode_body(syn::parse_quote!(enum Never {}));
        assert_eq!(body, "match * self { }");
    }
}
