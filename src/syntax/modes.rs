//! Built-in language modes
//!
//!     Every shipped language, expressed as rule sets under the generic
//!     engine. Each submodule builds one language family; the rule
//!     vocabulary (spans, end-of-line spans, mark rules, keyword maps) is
//!     rich enough that no language needs a bespoke state machine, including
//!     PostScript's balanced-paren string literal, which nests through a
//!     self-delegating span set.

pub mod cfamily;
pub mod perl;
pub mod postscript;
pub mod shell;
pub mod sql;
pub mod tex;
pub mod text;
pub mod web;

use crate::syntax::registry::Mode;

/// All shipped modes, used to seed [`ModeRegistry::builtin`].
///
/// [`ModeRegistry::builtin`]: crate::syntax::registry::ModeRegistry::builtin
pub fn builtin_modes() -> Vec<Mode> {
    vec![
        cfamily::c(),
        cfamily::cpp(),
        cfamily::java(),
        cfamily::javascript(),
        shell::shell(),
        perl::perl(),
        sql::sql(),
        web::html(),
        web::xml(),
        web::php(),
        text::properties(),
        text::makefile(),
        text::batch(),
        text::patch(),
        postscript::postscript(),
        tex::tex(),
    ]
}

/// Maps a file extension (without the dot) to a built-in mode name.
pub fn mode_name_for_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.to_ascii_lowercase();
    let name = match ext.as_str() {
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" => "cpp",
        "java" => "java",
        "js" | "mjs" => "javascript",
        "sh" | "bash" => "shell",
        "pl" | "pm" => "perl",
        "sql" => "sql",
        "html" | "htm" => "html",
        "xml" | "xsl" | "svg" => "xml",
        "php" => "php",
        "properties" | "ini" => "properties",
        "mk" => "makefile",
        "bat" | "cmd" => "batch",
        "patch" | "diff" => "patch",
        "ps" | "eps" => "postscript",
        "tex" | "sty" | "ltx" => "tex",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_mode_constructs() {
        let modes = builtin_modes();
        assert_eq!(modes.len(), 16);
        for mode in &modes {
            // Mode::new validated MAIN already; spot-check the accessor.
            assert_eq!(mode.main().name(), "MAIN");
        }
    }

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        assert_eq!(mode_name_for_extension("CPP"), Some("cpp"));
        assert_eq!(mode_name_for_extension("nope"), None);
    }
}
