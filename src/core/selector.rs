//! Minimal CSS-style selectors used to pick candidate cards out of a
//! container.
//!
//! Supported grammar: a comma-separated list of compound selectors, each made
//! of an optional tag name (or `*`) followed by any number of `.class` and
//! `#id` parts, e.g. `li`, `li.card`, `.slide.is-current`, `#hero, .pinned`.
//! Combinators and pseudo-classes are not supported.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing a selector string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,

    #[error("empty part in selector list `{0}`")]
    EmptyPart(String),

    #[error("unexpected character `{found}` in selector `{selector}`")]
    Unexpected { selector: String, found: char },

    #[error("`{0}` has a `.` or `#` with no name after it")]
    MissingName(String),
}

/// What a selector is matched against: the identifying bits of one element.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    pub tag: &'a str,
    pub id: Option<&'a str>,
    pub classes: &'a [String],
}

/// One compound selector, e.g. `li.card#first`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    /// `None` means universal (`*` or no tag given).
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, el: &ElementRef<'_>) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(el.tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id != Some(id.as_str()) {
                return false;
            }
        }
        self.classes
            .iter()
            .all(|c| el.classes.iter().any(|have| have == c))
    }
}

/// A parsed selector list.  Matches when any of its parts matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    parts: Vec<Compound>,
}

impl Selector {
    pub fn parse(s: &str) -> Result<Self, SelectorError> {
        let source = s.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut parts = Vec::new();
        for raw in source.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(SelectorError::EmptyPart(source.to_string()));
            }
            parts.push(parse_compound(raw, source)?);
        }

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    /// Selector for a single class, e.g. `active-card` → `.active-card`.
    pub fn class(name: &str) -> Result<Self, SelectorError> {
        Self::parse(&format!(".{name}"))
    }

    pub fn matches(&self, el: &ElementRef<'_>) -> bool {
        self.parts.iter().any(|p| p.matches(el))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(raw: &str, source: &str) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    let mut chars = raw.chars().peekable();

    // Leading tag or `*`.
    if chars.peek() == Some(&'*') {
        chars.next();
    } else {
        let mut tag = String::new();
        while let Some(&c) = chars.peek() {
            if !is_name_char(c) {
                break;
            }
            tag.push(c);
            chars.next();
        }
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }

    while let Some(sigil) = chars.next() {
        if sigil != '.' && sigil != '#' {
            return Err(SelectorError::Unexpected {
                selector: source.to_string(),
                found: sigil,
            });
        }
        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if !is_name_char(c) {
                break;
            }
            name.push(c);
            chars.next();
        }
        if name.is_empty() {
            return Err(SelectorError::MissingName(raw.to_string()));
        }
        if sigil == '.' {
            compound.classes.push(name);
        } else {
            compound.id = Some(name);
        }
    }

    Ok(compound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el<'a>(tag: &'a str, id: Option<&'a str>, classes: &'a [String]) -> ElementRef<'a> {
        ElementRef { tag, id, classes }
    }

    #[test]
    fn tag_selector_is_case_insensitive() {
        let sel = Selector::parse("LI").unwrap();
        assert!(sel.matches(&el("li", None, &[])));
        assert!(!sel.matches(&el("div", None, &[])));
    }

    #[test]
    fn compound_requires_every_part() {
        let classes = vec!["card".to_string(), "wide".to_string()];
        let sel = Selector::parse("li.card.wide#hero").unwrap();
        assert!(sel.matches(&el("li", Some("hero"), &classes)));
        assert!(!sel.matches(&el("li", Some("other"), &classes)));
        assert!(!sel.matches(&el("li", Some("hero"), &classes[..1])));
    }

    #[test]
    fn list_matches_any_part() {
        let classes = vec!["slick-current".to_string()];
        let sel = Selector::parse("#hero, .slick-current").unwrap();
        assert!(sel.matches(&el("div", None, &classes)));
        assert!(sel.matches(&el("div", Some("hero"), &[])));
        assert!(!sel.matches(&el("div", None, &[])));
    }

    #[test]
    fn universal_matches_everything() {
        let sel = Selector::parse("*").unwrap();
        assert!(sel.matches(&el("section", None, &[])));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert!(matches!(Selector::parse("li,"), Err(SelectorError::EmptyPart(_))));
        assert!(matches!(Selector::parse("li."), Err(SelectorError::MissingName(_))));
        assert!(matches!(
            Selector::parse("ul > li"),
            Err(SelectorError::Unexpected { .. })
        ));
    }

    #[test]
    fn class_helper_prefixes_dot() {
        let sel = Selector::class("active-card").unwrap();
        assert_eq!(sel.as_str(), ".active-card");
    }
}
