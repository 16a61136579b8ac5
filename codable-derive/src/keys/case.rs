//! Key transformation strategies for `#[codable(rename_all = "...")]`.

/// How the words of a key are capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capitalization {
    Lower,
    Upper,
    Capitalized,
    Camel,
}

/// A key transformation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// Keys are used as declared.
    #[default]
    Verbatim,
    Lowercase,
    Uppercase,
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    ScreamingKebabCase,
    TrainCase,
}

impl KeyStrategy {
    /// All accepted strategy names, in the order they are listed in errors.
    pub const NAMES: &'static [&'static str] = &[
        "lowercase",
        "UPPERCASE",
        "PascalCase",
        "camelCase",
        "snake_case",
        "SCREAMING_SNAKE_CASE",
        "kebab-case",
        "SCREAMING-KEBAB-CASE",
        "Train-Case",
    ];

    pub fn from_name(name: &str) -> Option<KeyStrategy> {
        Some(match name {
            "lowercase" => KeyStrategy::Lowercase,
            "UPPERCASE" => KeyStrategy::Uppercase,
            "PascalCase" => KeyStrategy::PascalCase,
            "camelCase" => KeyStrategy::CamelCase,
            "snake_case" => KeyStrategy::SnakeCase,
            "SCREAMING_SNAKE_CASE" => KeyStrategy::ScreamingSnakeCase,
            "kebab-case" => KeyStrategy::KebabCase,
            "SCREAMING-KEBAB-CASE" => KeyStrategy::ScreamingKebabCase,
            "Train-Case" => KeyStrategy::TrainCase,
            _ => return None,
        })
    }

    fn rule(self) -> Option<(&'static str, Capitalization)> {
        Some(match self {
            KeyStrategy::Verbatim => return None,
            KeyStrategy::Lowercase => ("", Capitalization::Lower),
            KeyStrategy::Uppercase => ("", Capitalization::Upper),
            KeyStrategy::PascalCase => ("", Capitalization::Capitalized),
            KeyStrategy::CamelCase => ("", Capitalization::Camel),
            KeyStrategy::SnakeCase => ("_", Capitalization::Lower),
            KeyStrategy::ScreamingSnakeCase => ("_", Capitalization::Upper),
            KeyStrategy::KebabCase => ("-", Capitalization::Lower),
            KeyStrategy::ScreamingKebabCase => ("-", Capitalization::Upper),
            KeyStrategy::TrainCase => ("-", Capitalization::Capitalized),
        })
    }

    /// Transforms a key.
    ///
    /// The result is a fixed point: applying the same strategy to it again
    /// yields it unchanged.
    pub fn apply(self, key: &str) -> String {
        let (separator, capitalization) = match self.rule() {
            Some(rule) => rule,
            None => return key.to_string(),
        };
        // A single pass can merge words whose boundary is ambiguous once
        // rendered (`x_a` in PascalCase becomes `XA`, which reads back as one
        // word), so render until the output is stable.
        let mut current = render(&split_words(key), separator, capitalization);
        for _ in 0..8 {
            let next = render(&split_words(&current), separator, capitalization);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

/// Splits a key into words.
///
/// Non-alphanumeric characters separate words and are dropped.  Within an
/// alphanumeric run a word starts at an uppercase character that follows a
/// lowercase character or a digit (`myField`, `field1Name`) or at the last
/// uppercase character of an uppercase run that continues in lowercase
/// (`HTTPServer`).  Digits never start a word.
pub fn split_words(key: &str) -> Vec<String> {
    let chars: Vec<char> = key.chars().collect();
    let mut words = Vec::new();
    let mut word = String::new();

    for (idx, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !word.is_empty() {
                words.push(std::mem::take(&mut word));
            }
            continue;
        }
        if c.is_uppercase() && !word.is_empty() {
            let prev = chars[idx - 1];
            let next_is_lower = chars.get(idx + 1).map_or(false, |n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_numeric()
                || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut word));
            }
        }
        word.push(c);
    }
    if !word.is_empty() {
        words.push(word);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn render(words: &[String], separator: &str, capitalization: Capitalization) -> String {
    words
        .iter()
        .enumerate()
        .map(|(idx, word)| match capitalization {
            Capitalization::Lower => word.to_lowercase(),
            Capitalization::Upper => word.to_uppercase(),
            Capitalization::Capitalized => capitalize(word),
            Capitalization::Camel if idx == 0 => word.to_lowercase(),
            Capitalization::Camel => capitalize(word),
        })
        .collect::<Vec<_>>()
        .join(separator)
}
