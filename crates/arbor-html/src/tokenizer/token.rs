use core::fmt;

use strum_macros::IntoStaticStr;

/// An attribute on a start or end tag token.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Payload shared by start and end tag tokens.
///
/// "Start and end tag tokens have a tag name, a self-closing flag, and a
/// list of attributes, each of which has a name and a value."
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    /// "a tag name"
    pub name: String,
    /// "a self-closing flag"
    pub self_closing: bool,
    /// "a list of attributes". Names are unique.
    pub attributes: Vec<Attribute>,
}

impl Tag {
    /// A tag with no attributes, as synthesized by the tree builder
    /// ("insert an HTML element for a "tbody" start tag token with no attributes").
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// A tag carrying `attributes`; later duplicates of a name are dropped.
    #[must_use]
    pub fn with_attributes(
        name: impl Into<String>,
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> Self {
        let mut tag = Self::new(name);
        for attribute in attributes {
            let _ = tag.push_attribute(attribute);
        }
        tag
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state... if there is
    /// already an attribute on the token with the exact same name, then this
    /// is a duplicate-attribute parse error and the new attribute must be
    /// removed from the token."
    ///
    /// Returns `false` when the attribute was a duplicate and got dropped.
    pub fn push_attribute(&mut self, attribute: Attribute) -> bool {
        if self.attribute(&attribute.name).is_some() {
            return false;
        }
        self.attributes.push(attribute);
        true
    }

    /// Value of the attribute named `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Whether the tag's name is one of `names`.
    #[must_use]
    pub fn is_one_of(&self, names: &[&str]) -> bool {
        names.contains(&self.name.as_str())
    }

    /// Same name and the same attribute set, ignoring attribute order.
    ///
    /// This is the element equality the Noah's Ark clause uses.
    #[must_use]
    pub fn same_name_and_attributes(&self, other: &Self) -> bool {
        self.name == other.name
            && self.attributes.len() == other.attributes.len()
            && self
                .attributes
                .iter()
                .all(|a| other.attribute(&a.name) == Some(a.value.as_str()))
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag." Missing identifiers are `None`, which is
    /// distinct from the empty string.
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// A start tag token.
    StartTag(Tag),

    /// An end tag token. The self-closing flag and attributes are ignored by
    /// tree construction.
    EndTag(Tag),

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// "Comment and character tokens have data."
    Character {
        /// "data"
        data: char,
    },

    /// Signals the end of input.
    EndOfInput,
}

impl Token {
    /// A start tag token named `name` with the given `(name, value)` attributes.
    #[must_use]
    pub fn start_tag(name: &str, attributes: &[(&str, &str)]) -> Self {
        Self::StartTag(Tag::with_attributes(
            name,
            attributes.iter().map(|&(n, v)| Attribute::new(n, v)),
        ))
    }

    /// An end tag token named `name`.
    #[must_use]
    pub fn end_tag(name: &str) -> Self {
        Self::EndTag(Tag::new(name))
    }

    /// A comment token.
    #[must_use]
    pub fn comment(data: &str) -> Self {
        Self::Comment {
            data: data.to_string(),
        }
    }

    /// One character token per `char` of `text`.
    pub fn characters(text: &str) -> impl Iterator<Item = Self> + '_ {
        text.chars().map(|data| Self::Character { data })
    }

    /// An `<!DOCTYPE html>` token.
    #[must_use]
    pub fn html_doctype() -> Self {
        Self::Doctype {
            name: Some("html".to_string()),
            public_identifier: None,
            system_identifier: None,
            force_quirks: false,
        }
    }

    /// Whether this is the end-of-input token.
    #[must_use]
    pub const fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }

    /// Name of the token kind (`"StartTag"`, `"Character"`, ...).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype { name, .. } => {
                write!(f, "<!DOCTYPE {}>", name.as_deref().unwrap_or(""))
            }
            Self::StartTag(tag) => {
                write!(f, "<{}", tag.name)?;
                for attr in &tag.attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if tag.self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag(tag) => write!(f, "</{}>", tag.name),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Character { data } => write!(f, "{data:?}"),
            Self::EndOfInput => write!(f, "end of input"),
        }
    }
}
