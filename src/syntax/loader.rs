//! Mode descriptor files
//!
//!     Modes can be defined in JSON or YAML instead of code. A descriptor
//!     names the mode and lists its rule sets; each rule is a tagged object
//!     whose `type` selects the rule kind. The loader validates the
//!     descriptor (a `MAIN` set must exist, set names must be unique, match
//!     sequences must be non-empty) before any rule is constructed, so a
//!     descriptor error never panics.
//!
//! Example (YAML)
//!
//!     name: ini
//!     rule_sets:
//!       - name: MAIN
//!         rules:
//!           - { type: eol_span, seq: ";", token: comment1 }
//!           - { type: span, begin: "[", end: "]", token: keyword2 }
//!           - { type: mark_previous, seq: "=", token: keyword1,
//!               at_line_start: true, exclude_match: true }

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::syntax::keywords::KeywordMap;
use crate::syntax::registry::{Mode, MAIN_RULE_SET};
use crate::syntax::rules::{action, ParserRule, ParserRuleSet};
use crate::syntax::token::TokenType;

#[derive(Debug)]
pub enum LoaderError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    /// The descriptor defines no `MAIN` rule set.
    MissingMain(String),
    /// Two rule sets in one mode share a name.
    DuplicateRuleSet { mode: String, set: String },
    /// A rule has an empty match (or span end) sequence.
    EmptySequence { set: String },
    /// The file extension is neither `.json` nor `.yaml`/`.yml`.
    UnknownFormat(String),
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::Io(err) => write!(f, "cannot read mode descriptor: {err}"),
            LoaderError::Json(err) => write!(f, "malformed JSON mode descriptor: {err}"),
            LoaderError::Yaml(err) => write!(f, "malformed YAML mode descriptor: {err}"),
            LoaderError::MissingMain(mode) => {
                write!(f, "mode {mode} does not define a MAIN rule set")
            }
            LoaderError::DuplicateRuleSet { mode, set } => {
                write!(f, "mode {mode} defines rule set {set} more than once")
            }
            LoaderError::EmptySequence { set } => {
                write!(f, "rule set {set} contains a rule with an empty sequence")
            }
            LoaderError::UnknownFormat(path) => {
                write!(f, "cannot tell the format of {path} (expected .json or .yaml)")
            }
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoaderError::Io(err) => Some(err),
            LoaderError::Json(err) => Some(err),
            LoaderError::Yaml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::Io(err)
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(err: serde_json::Error) -> Self {
        LoaderError::Json(err)
    }
}

impl From<serde_yaml::Error> for LoaderError {
    fn from(err: serde_yaml::Error) -> Self {
        LoaderError::Yaml(err)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModeDescriptor {
    name: String,
    rule_sets: Vec<RuleSetDescriptor>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSetDescriptor {
    name: String,
    #[serde(default)]
    default: Option<TokenType>,
    #[serde(default)]
    ignore_case: bool,
    #[serde(default)]
    highlight_digits: bool,
    #[serde(default)]
    escape: Option<String>,
    #[serde(default)]
    terminate_at: Option<usize>,
    #[serde(default)]
    keywords: HashMap<TokenType, Vec<String>>,
    #[serde(default)]
    rules: Vec<RuleDescriptor>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RuleDescriptor {
    Seq {
        seq: String,
        token: TokenType,
    },
    Span {
        begin: String,
        end: String,
        token: TokenType,
        #[serde(default)]
        delegate: Option<String>,
        #[serde(flatten)]
        flags: RuleFlags,
    },
    EolSpan {
        seq: String,
        token: TokenType,
        #[serde(flatten)]
        flags: RuleFlags,
    },
    MarkPrevious {
        seq: String,
        token: TokenType,
        #[serde(flatten)]
        flags: RuleFlags,
    },
    MarkFollowing {
        seq: String,
        token: TokenType,
        #[serde(flatten)]
        flags: RuleFlags,
    },
}

#[derive(Debug, Default, Deserialize)]
struct RuleFlags {
    #[serde(default)]
    at_line_start: bool,
    #[serde(default)]
    exclude_match: bool,
    #[serde(default)]
    no_line_break: bool,
    #[serde(default)]
    no_word_break: bool,
}

impl RuleFlags {
    fn bits(&self) -> u16 {
        let mut bits = 0;
        if self.at_line_start {
            bits |= action::AT_LINE_START;
        }
        if self.exclude_match {
            bits |= action::EXCLUDE_MATCH;
        }
        if self.no_line_break {
            bits |= action::NO_LINE_BREAK;
        }
        if self.no_word_break {
            bits |= action::NO_WORD_BREAK;
        }
        bits
    }
}

/// Loads a mode from a JSON descriptor.
pub fn from_json_str(text: &str) -> Result<Mode, LoaderError> {
    let descriptor: ModeDescriptor = serde_json::from_str(text)?;
    build_mode(descriptor)
}

/// Loads a mode from a YAML descriptor.
pub fn from_yaml_str(text: &str) -> Result<Mode, LoaderError> {
    let descriptor: ModeDescriptor = serde_yaml::from_str(text)?;
    build_mode(descriptor)
}

/// Loads a mode from a descriptor file, picking the format by extension.
pub fn from_path(path: &Path) -> Result<Mode, LoaderError> {
    let text = fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => from_json_str(&text),
        Some("yaml") | Some("yml") => from_yaml_str(&text),
        _ => Err(LoaderError::UnknownFormat(path.display().to_string())),
    }
}

fn build_mode(descriptor: ModeDescriptor) -> Result<Mode, LoaderError> {
    let mode_name = descriptor.name;
    let mut seen = std::collections::HashSet::new();
    for set in &descriptor.rule_sets {
        if !seen.insert(set.name.clone()) {
            return Err(LoaderError::DuplicateRuleSet {
                mode: mode_name,
                set: set.name.clone(),
            });
        }
    }
    if !seen.contains(MAIN_RULE_SET) {
        return Err(LoaderError::MissingMain(mode_name));
    }

    let mut sets = Vec::with_capacity(descriptor.rule_sets.len());
    for set_descriptor in descriptor.rule_sets {
        sets.push(build_rule_set(&mode_name, set_descriptor)?);
    }
    Ok(Mode::new(&mode_name, sets))
}

fn build_rule_set(
    mode: &str,
    descriptor: RuleSetDescriptor,
) -> Result<ParserRuleSet, LoaderError> {
    let empty = |set: &str| LoaderError::EmptySequence {
        set: set.to_string(),
    };

    let mut set = ParserRuleSet::new(mode, &descriptor.name);
    if let Some(default) = descriptor.default {
        set.set_default(default);
    }
    set.set_ignore_case(descriptor.ignore_case);
    set.set_highlight_digits(descriptor.highlight_digits);
    if let Some(at) = descriptor.terminate_at {
        set.set_terminate_at(at);
    }
    if let Some(escape) = &descriptor.escape {
        if escape.is_empty() {
            return Err(empty(&descriptor.name));
        }
        set.set_escape(escape);
    }
    if !descriptor.keywords.is_empty() {
        let mut map = KeywordMap::new(descriptor.ignore_case);
        for (token, words) in &descriptor.keywords {
            for word in words {
                map.add(word, *token);
            }
        }
        set.set_keywords(map);
    }

    for rule in descriptor.rules {
        let rule = match rule {
            RuleDescriptor::Seq { seq, token } => {
                if seq.is_empty() {
                    return Err(empty(&descriptor.name));
                }
                ParserRule::seq(&seq, token)
            }
            RuleDescriptor::Span {
                begin,
                end,
                token,
                delegate,
                flags,
            } => {
                if begin.is_empty() || end.is_empty() {
                    return Err(empty(&descriptor.name));
                }
                match delegate {
                    Some(target) => {
                        ParserRule::delegate_span(&begin, &end, token, &target, flags.bits())
                    }
                    None => ParserRule::span(&begin, &end, token, flags.bits()),
                }
            }
            RuleDescriptor::EolSpan { seq, token, flags } => {
                if seq.is_empty() {
                    return Err(empty(&descriptor.name));
                }
                ParserRule::eol_span(&seq, token, flags.bits())
            }
            RuleDescriptor::MarkPrevious { seq, token, flags } => {
                if seq.is_empty() {
                    return Err(empty(&descriptor.name));
                }
                ParserRule::mark_previous(&seq, token, flags.bits())
            }
            RuleDescriptor::MarkFollowing { seq, token, flags } => {
                if seq.is_empty() {
                    return Err(empty(&descriptor.name));
                }
                ParserRule::mark_following(&seq, token, flags.bits())
            }
        };
        set.add_rule(rule);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INI_YAML: &str = r#"
name: ini
rule_sets:
  - name: MAIN
    rules:
      - { type: eol_span, seq: ";", token: comment1 }
      - { type: span, begin: "[", end: "]", token: keyword2 }
      - { type: mark_previous, seq: "=", token: keyword1,
          at_line_start: true, exclude_match: true }
"#;

    #[test]
    fn test_yaml_descriptor_builds_a_mode() {
        let mode = from_yaml_str(INI_YAML).unwrap();
        assert_eq!(mode.name(), "ini");
        let main = mode.main();
        assert_eq!(main.rule_count(), 3);
        let eq = &main.rules_for(b'=')[0];
        assert!(eq.has(action::MARK_PREVIOUS));
        assert!(eq.has(action::AT_LINE_START));
        assert!(eq.has(action::EXCLUDE_MATCH));
    }

    #[test]
    fn test_json_descriptor_with_keywords_and_delegate() {
        let json = r#"{
            "name": "toy",
            "rule_sets": [
                {
                    "name": "MAIN",
                    "highlight_digits": true,
                    "escape": "\\",
                    "keywords": { "keyword1": ["if", "else"] },
                    "rules": [
                        { "type": "span", "begin": "(", "end": ")",
                          "token": "literal1", "delegate": "NESTED" }
                    ]
                },
                { "name": "NESTED", "default": "literal1" }
            ]
        }"#;
        let mode = from_json_str(json).unwrap();
        let main = mode.main();
        assert!(main.highlight_digits());
        assert!(main.escape_rule().is_some());
        assert_eq!(
            main.keywords().unwrap().lookup(b"else", 0, 4),
            TokenType::Keyword1
        );
        let paren = &main.rules_for(b'(')[0];
        assert_eq!(paren.delegate.as_deref(), Some("NESTED"));
        assert_eq!(
            mode.rule_set("NESTED").unwrap().default_token(),
            TokenType::Literal1
        );
    }

    #[test]
    fn test_missing_main_is_an_error() {
        let err = from_yaml_str("name: broken\nrule_sets:\n  - name: TAGS\n").unwrap_err();
        assert!(matches!(err, LoaderError::MissingMain(_)));
    }

    #[test]
    fn test_duplicate_rule_set_is_an_error() {
        let yaml = "name: broken\nrule_sets:\n  - name: MAIN\n  - name: MAIN\n";
        let err = from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, LoaderError::DuplicateRuleSet { .. }));
    }

    #[test]
    fn test_empty_sequence_is_an_error() {
        let yaml = r#"
name: broken
rule_sets:
  - name: MAIN
    rules:
      - { type: seq, seq: "", token: operator }
"#;
        let err = from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, LoaderError::EmptySequence { .. }));
    }
}
