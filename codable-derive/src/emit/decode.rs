//! Emission of `decode` bodies.
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::emit::{construct, Fresh, Members};
use crate::enums::{Case, TagStrategy};
use crate::keys::{KeyRegistry, Node, Slot};
use crate::model::Shape;
use crate::registration::Registration;
use crate::variable::{Fallback, Location};

/// Walks the key-path tree of one struct or enum case.
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

    fn registry(&self) -> &'a KeyRegistry {
        self.members.registry
    }

    fn fallback(&self, node: &Node<Slot>) -> Fallback {
        Fallback::aggregate(
            self.members
                .decoded_below(node)
                .into_iter()
                .map(|registration| registration.variable.fallback()),
        )
    }

    /// The key a leaf is read from.
    ///
    /// With aliases the first key holding a non-null value is used.
    fn leaf_key(&self, container: &Ident, segment: &str, aliases: &[String]) -> TokenStream {
        let primary = self.registry().key(segment);
        if aliases.is_empty() {
            return primary;
        }
        let alternates = aliases.iter().map(|alias| self.registry().key(alias));
        quote! {
            if #container.contains_non_null(#primary) {
                #primary
            } #(else if #container.contains_non_null(#alternates) {
                #alternates
            })* else {
                #primary
            }
        }
    }

    fn children(&mut self, node: &Node<Slot>, container: &Ident) -> TokenStream {
        let mut rv = TokenStream::new();
        for (segment, child) in node.children() {
            for registration in self.members.decoded_at(child) {
                let key = self.leaf_key(container, segment, &registration.aliases);
                let name = registration.variable.name();
                let decode = registration.variable.decode(Location::Keyed {
                    container,
                    key: &key,
                });
                rv.extend(quote!(#name = #decode;));
            }
            if self.members.decoded_below(child).is_empty() {
                continue;
            }
            let key = self.registry().key(segment);
            let nested = self.fresh.container();
            let inner = self.children(child, &nested);
            rv.extend(match self.fallback(child) {
                Fallback::Throw => quote! {
                    {
                        let #nested = #container.nested_container(#key)?;
                        #inner
                    }
                },
                Fallback::IfMissing(stmts) => quote! {
                    match #container.nested_container_if_present(#key)? {
                        ::codable::__derive::Some(#nested) => {
                            #inner
                        }
                        ::codable::__derive::None => {
                            #stmts
                        }
                    }
                },
                Fallback::IfError(stmts) => quote! {
                    match #container.nested_container(#key) {
                        ::codable::__derive::Ok(#nested) => {
                            #inner
                        }
                        ::codable::__derive::Err(_) => {
                            #stmts
                        }
                    }
                },
            });
        }
        rv
    }

    /// Decodes every field from `decoder` and evaluates to
    /// `Ok(constructor)`.
    fn body(&mut self, decoder: &Ident, path: TokenStream, shape: Shape) -> TokenStream {
        let fields = self.members.fields;
        let root = self.registry().tree().root();

        let declarations = fields.iter().map(|registration| {
            let name = registration.variable.name();
            let ty = registration.variable.ty();
            quote!(let #name: #ty;)
        });
        let fixed = fields
            .iter()
            .filter(|registration| !registration.variable.decodable())
            .map(|registration| {
                let name = registration.variable.name();
                let value = registration
                    .variable
                    .value()
                    .unwrap_or_else(|| quote!(::codable::__derive::Default::default()));
                quote!(#name = #value;)
            });
        let leaves = self.members.decoded_at(root).into_iter().map(|registration| {
            let name = registration.variable.name();
            let decode = registration.variable.decode(Location::Root { coder: decoder });
            quote!(#name = #decode;)
        });

        let nested = if self.members.decoded_below(root).is_empty() {
            TokenStream::new()
        } else {
            let container = format_ident!("__container");
            let inner = self.children(root, &container);
            match self.fallback(root) {
                Fallback::Throw => quote! {
                    let #container = #decoder.container()?;
                    #inner
                },
                Fallback::IfMissing(stmts) => quote! {
                    if #decoder.is_null() {
                        #stmts
                    } else {
                        let #container = #decoder.container()?;
                        #inner
                    }
                },
                Fallback::IfError(stmts) => quote! {
                    match #decoder.container() {
                        ::codable::__derive::Ok(#container) => {
                            #inner
                        }
                        ::codable::__derive::Err(_) => {
                            #stmts
                        }
                    }
                },
            }
        };

        let constructor = construct(path, shape, fields);
        quote! {
            {
                #(#declarations)*
                #(#fixed)*
                #(#leaves)*
                #nested
                ::codable::__derive::Ok(#constructor)
            }
        }
    }
}

/// The body of `Decode::decode` for a struct.
pub fn struct_body(registry: &KeyRegistry, shape: Shape, fields: &[Registration]) -> TokenStream {
    let decoder = format_ident!("__decoder");
    let mut walk = Walk::new(Members {
        registry,
        fields,
        case: None,
    });
    walk.body(&decoder, quote!(Self), shape)
}

fn case_body(registry: &KeyRegistry, case: &Case, decoder: &Ident) -> TokenStream {
    let ident = &case.ident;
    let mut walk = Walk::new(Members {
        registry,
        fields: &case.fields,
        case: Some(case.index),
    });
    walk.body(decoder, quote!(Self::#ident), case.shape)
}

/// Opens the containers along `path` below `decoder` and evaluates to the
/// decoder of its last segment.
fn decoder_at(registry: &KeyRegistry, decoder: &Ident, path: &[String]) -> TokenStream {
    let mut fresh = Fresh::default();
    let mut container = fresh.container();
    let mut stmts = quote!(let #container = #decoder.container()?;);
    let (last, parents) = match path.split_last() {
        Some(split) => split,
        None => return quote!(#decoder.clone()),
    };
    for segment in parents {
        let key = registry.key(segment);
        let nested = fresh.container();
        stmts.extend(quote!(let #nested = #container.nested_container(#key)?;));
        container = nested;
    }
    let key = registry.key(last);
    quote! {
        {
            #stmts
            #container.super_decoder(#key)?
        }
    }
}

fn tag_patterns(case: &Case) -> TokenStream {
    let tags = &case.tags;
    quote!(#(#tags)|*)
}

/// The cases that take part in decoding.
fn decodable_cases(cases: &[Case]) -> impl Iterator<Item = &Case> {
    cases
        .iter()
        .filter(|case| !case.ignored && !case.tags.is_empty())
}

fn unknown_variant(decoder: &Ident, tag: &Ident) -> TokenStream {
    quote! {
        ::codable::__derive::Err(#decoder.error(
            ::codable::ErrorKind::UnknownVariant,
            ::codable::__derive::format!("unknown variant `{}`", #tag),
        ))
    }
}

/// The body of `Decode::decode` for an enum.
pub fn enum_body(registry: &KeyRegistry, strategy: &TagStrategy, cases: &[Case]) -> TokenStream {
    let decoder = format_ident!("__decoder");
    match strategy {
        TagStrategy::External => external(registry, cases, &decoder),
        TagStrategy::Internal { tag } => internal(registry, cases, &decoder, tag),
        TagStrategy::Adjacent { tag, content } => {
            adjacent(registry, cases, &decoder, tag, content)
        }
        TagStrategy::Untagged => untagged(registry, cases, &decoder),
    }
}

fn external(registry: &KeyRegistry, cases: &[Case], decoder: &Ident) -> TokenStream {
    let content = format_ident!("__content");
    let tag = format_ident!("__tag");
    let arms = decodable_cases(cases).map(|case| {
        let patterns = tag_patterns(case);
        let body = case_body(registry, case, &content);
        quote!(#patterns => #body,)
    });
    let unknown = unknown_variant(&content, &tag);
    quote! {
        let __container = #decoder.container()?;
        let mut __keys = __container.keys();
        let #tag = match (__keys.next(), __keys.next()) {
            (::codable::__derive::Some(#tag), ::codable::__derive::None) => #tag,
            _ => {
                return ::codable::__derive::Err(#decoder.error(
                    ::codable::ErrorKind::TypeMismatch,
                    "expected a map with exactly one key",
                ));
            }
        };
        let #content = &__container.super_decoder(#tag)?;
        match #tag {
            #(#arms)*
            _ => #unknown,
        }
    }
}

fn internal(registry: &KeyRegistry, cases: &[Case], decoder: &Ident, tag_path: &[String]) -> TokenStream {
    let tag = format_ident!("__tag");
    let tag_decoder = decoder_at(registry, decoder, tag_path);
    let arms = decodable_cases(cases).map(|case| {
        let patterns = tag_patterns(case);
        let body = case_body(registry, case, decoder);
        quote!(#patterns => #body,)
    });
    let unknown = unknown_variant(&format_ident!("__tag_decoder"), &tag);
    quote! {
        let __tag_decoder = #tag_decoder;
        let #tag: ::codable::__derive::String = __tag_decoder.decode()?;
        match #tag.as_str() {
            #(#arms)*
            _ => #unknown,
        }
    }
}

fn adjacent(
    registry: &KeyRegistry,
    cases: &[Case],
    decoder: &Ident,
    tag_path: &[String],
    content_path: &[String],
) -> TokenStream {
    let tag = format_ident!("__tag");
    let content = format_ident!("__content");
    let tag_decoder = decoder_at(registry, decoder, tag_path);
    let content_decoder = decoder_at(registry, decoder, content_path);
    let arms = decodable_cases(cases).map(|case| {
        let patterns = tag_patterns(case);
        let body = case_body(registry, case, &content);
        if case.has_fields() {
            quote! {
                #patterns => {
                    let #content = &#content_decoder;
                    #body
                }
            }
        } else {
            let ident = &case.ident;
            let constructor = construct(quote!(Self::#ident), case.shape, &case.fields);
            quote!(#patterns => ::codable::__derive::Ok(#constructor),)
        }
    });
    let unknown = unknown_variant(&format_ident!("__tag_decoder"), &tag);
    quote! {
        let __tag_decoder = #tag_decoder;
        let #tag: ::codable::__derive::String = __tag_decoder.decode()?;
        match #tag.as_str() {
            #(#arms)*
            _ => #unknown,
        }
    }
}

/// Returns the first level keys a case reads or `None` if the case reads
/// the whole value.
fn known_keys(case: &Case) -> Option<Vec<String>> {
    let mut keys = Vec::new();
    for registration in case.fields.iter().filter(|r| r.variable.decodable()) {
        match registration.path.split_first() {
            None => return None,
            Some((first, rest)) => {
                keys.push(first.clone());
                if rest.is_empty() {
                    keys.extend(registration.aliases.iter().cloned());
                }
            }
        }
    }
    Some(keys)
}

/// Untagged enums try every case in declaration order.
///
/// A first pass only tries cases that know every key present in the
/// value, a second pass tries all cases.  The first case that decodes
/// wins; if none does the error lists why every case failed.
fn untagged(registry: &KeyRegistry, cases: &[Case], decoder: &Ident) -> TokenStream {
    let candidates: Vec<&Case> = cases.iter().filter(|case| !case.ignored).collect();
    let closures: Vec<Ident> = candidates
        .iter()
        .map(|case| format_ident!("__case_{}", case.index))
        .collect();

    let definitions = candidates.iter().zip(&closures).map(|(case, closure)| {
        let body = if case.shape == Shape::Unit {
            let ident = &case.ident;
            quote! {
                if #decoder.is_null() {
                    ::codable::__derive::Ok(Self::#ident)
                } else {
                    ::codable::__derive::Err(#decoder.unexpected("null"))
                }
            }
        } else {
            case_body(registry, case, decoder)
        };
        quote! {
            let #closure = || -> ::codable::__derive::Result<Self, ::codable::Error> {
                #body
            };
        }
    });

    let exact = candidates.iter().zip(&closures).map(|(case, closure)| {
        let attempt = quote! {
            if let ::codable::__derive::Ok(__value) = #closure() {
                return ::codable::__derive::Ok(__value);
            }
        };
        match known_keys(case) {
            Some(keys) => quote! {
                if __keys.iter().all(|__key| [#(#keys),*].contains(__key)) {
                    #attempt
                }
            },
            None => attempt,
        }
    });

    let names = candidates.iter().map(|case| case.primary_tag());
    let any = closures.iter();

    quote! {
        #(#definitions)*
        let __keys: ::codable::__derive::Vec<&str> = match #decoder.container() {
            ::codable::__derive::Ok(__container) => __container.keys().collect(),
            ::codable::__derive::Err(_) => ::codable::__derive::Vec::new(),
        };
        #(#exact)*
        let mut __errors: ::codable::__derive::Vec<::codable::__derive::String> =
            ::codable::__derive::Vec::new();
        #(
            match #any() {
                ::codable::__derive::Ok(__value) => return ::codable::__derive::Ok(__value),
                ::codable::__derive::Err(__err) => {
                    __errors.push(::codable::__derive::format!("`{}`: {}", #names, __err));
                }
            }
        )*
        ::codable::__derive::Err(#decoder.error(
            ::codable::ErrorKind::NoMatchingVariant,
            ::codable::__derive::format!("no variant matched ({})", __errors.join("; ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::expand::TypeModel;

    fn model(input: syn::DeriveInput) -> TypeModel {
        let mut diagnostics = crate::diag::Diagnostics::new();
        let model = TypeModel::build(&input, &mut diagnostics).unwrap();
        assert!(diagnostics.is_empty());
        model
    }

    #[test]
    fn test_nested_containers_are_shared() {
        let model = model(syn::parse_quote! {
            struct User {
                #[codable(at("data", "id"))]
                id: String,
                #[codable(at("data", "name"))]
                name: String,
            }
        });
        let body = model.decode_body().to_string();
        assert_eq!(body.matches("nested_container").count(), 1);
        assert!(body.contains("__field_id = __c1 . decode :: < String , _ > (__CodingKeys :: Id) ?"));
    }

    #[test]
    fn test_optional_container_falls_back() {
        let model = model(syn::parse_quote! {
            struct User {
                #[codable(at("meta", "nickname"))]
                nickname: Option<String>,
            }
        });
        let body = model.decode_body().to_string();
        assert!(body.contains("nested_container_if_present"));
        assert!(body.contains("__field_nickname = :: codable :: __derive :: None ;"));
    }

    #[test]
    fn test_aliases_pick_present_key() {
        let model = model(syn::parse_quote! {
            struct Post {
                #[codable(alias = "likeCount")]
                likes: u32,
            }
        });
        let body = model.decode_body().to_string();
        assert!(body.contains("if __container . contains_non_null (__CodingKeys :: Likes)"));
        assert!(body.contains("else if __container . contains_non_null (__CodingKeys :: LikeCount)"));
    }

    #[test]
    fn test_untagged_tries_exact_matches_first() {
        let model = model(syn::parse_quote! {
            #[codable(untagged)]
            enum Command {
                Load { key: String },
                Store { key: String, value: i64 },
            }
        });
        let body = model.decode_body().to_string();
        assert!(body.contains("[\"key\"] . contains (__key)"));
        assert!(body.contains("[\"key\" , \"value\"] . contains (__key)"));
        assert!(body.contains("NoMatchingVariant"));
    }
}
