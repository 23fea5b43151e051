//! Modes and the mode registry
//!
//!     A [`Mode`] is a named bundle of rule sets with a mandatory `MAIN`
//!     root set. The [`ModeRegistry`] maps mode names to modes and resolves
//!     the `SET` / `mode::SET` references delegate rules carry. Resolution
//!     is a read-only lookup; a failed resolution is logged once and the
//!     delegating rule behaves as a plain match failure from then on.
//!
//!     `ModeRegistry::builtin()` returns a process-wide registry populated
//!     with the built-in language modes. Hosts that load their own
//!     descriptor files can register into it or keep a private registry.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use once_cell::sync::Lazy;

use crate::syntax::modes;
use crate::syntax::rules::ParserRuleSet;

/// The root rule set every mode must define.
pub const MAIN_RULE_SET: &str = "MAIN";

/// A named language mode: a collection of rule sets, `MAIN` included.
#[derive(Debug)]
pub struct Mode {
    name: String,
    rule_sets: HashMap<String, Arc<ParserRuleSet>>,
}

impl Mode {
    /// Builds a mode from its rule sets.
    ///
    /// Panics when no `MAIN` set is present or a set name repeats; both are
    /// programming errors in mode construction, not runtime conditions
    /// (descriptor files are validated by the loader before reaching this
    /// point).
    pub fn new(name: &str, sets: Vec<ParserRuleSet>) -> Self {
        let mut rule_sets = HashMap::new();
        for set in sets {
            let previous = rule_sets.insert(set.name().to_string(), Arc::new(set));
            assert!(
                previous.is_none(),
                "mode {name} defines a duplicate rule set"
            );
        }
        assert!(
            rule_sets.contains_key(MAIN_RULE_SET),
            "mode {name} has no MAIN rule set"
        );
        Mode {
            name: name.to_string(),
            rule_sets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn main(&self) -> Arc<ParserRuleSet> {
        self.rule_sets[MAIN_RULE_SET].clone()
    }

    pub fn rule_set(&self, name: &str) -> Option<Arc<ParserRuleSet>> {
        self.rule_sets.get(name).cloned()
    }

    pub fn rule_set_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.rule_sets.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Name → mode lookup shared by however many markers a host creates.
pub struct ModeRegistry {
    modes: RwLock<HashMap<String, Arc<Mode>>>,
    /// Delegate targets already reported as unresolvable, to log each once.
    unresolved: Mutex<HashSet<String>>,
}

static BUILTIN: Lazy<Arc<ModeRegistry>> = Lazy::new(|| {
    let registry = ModeRegistry::new();
    for mode in modes::builtin_modes() {
        registry.register(mode);
    }
    Arc::new(registry)
});

impl ModeRegistry {
    pub fn new() -> Self {
        ModeRegistry {
            modes: RwLock::new(HashMap::new()),
            unresolved: Mutex::new(HashSet::new()),
        }
    }

    /// The shared registry pre-populated with the built-in modes.
    pub fn builtin() -> Arc<ModeRegistry> {
        BUILTIN.clone()
    }

    /// Registers (or replaces) a mode under its own name.
    pub fn register(&self, mode: Mode) -> Arc<Mode> {
        let mode = Arc::new(mode);
        self.modes
            .write()
            .expect("mode registry lock poisoned")
            .insert(mode.name().to_string(), mode.clone());
        mode
    }

    pub fn mode(&self, name: &str) -> Option<Arc<Mode>> {
        self.modes
            .read()
            .expect("mode registry lock poisoned")
            .get(name)
            .cloned()
    }

    pub fn mode_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .modes
            .read()
            .expect("mode registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Looks up the mode for a file based on its extension.
    pub fn mode_for_path(&self, path: &Path) -> Option<Arc<Mode>> {
        let ext = path.extension()?.to_str()?;
        let name = modes::mode_name_for_extension(ext)?;
        self.mode(name)
    }

    /// Resolves a delegate reference. `target` is either `SET` (a set in
    /// `current_mode`) or `mode::SET`. An unresolvable target is logged once
    /// and yields `None`, which makes the delegating rule a no-op match
    /// failure.
    pub fn resolve(&self, current_mode: &str, target: &str) -> Option<Arc<ParserRuleSet>> {
        let (mode_name, set_name) = match target.split_once("::") {
            Some((mode, set)) => (mode, set),
            None => (current_mode, target),
        };
        let found = self.mode(mode_name).and_then(|m| m.rule_set(set_name));
        if found.is_none() {
            let qualified = format!("{mode_name}::{set_name}");
            let mut seen = self.unresolved.lock().expect("mode registry lock poisoned");
            if seen.insert(qualified.clone()) {
                log::warn!("unresolvable delegate rule set {qualified}, treating as plain text");
            }
        }
        found
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::rules::ParserRuleSet;

    fn mode(name: &str) -> Mode {
        Mode::new(name, vec![ParserRuleSet::new(name, MAIN_RULE_SET)])
    }

    #[test]
    fn test_resolve_unqualified_name_in_current_mode() {
        let registry = ModeRegistry::new();
        registry.register(Mode::new(
            "html",
            vec![
                ParserRuleSet::new("html", MAIN_RULE_SET),
                ParserRuleSet::new("html", "TAGS"),
            ],
        ));
        let set = registry.resolve("html", "TAGS").unwrap();
        assert_eq!(set.qualified_name(), "html::TAGS");
    }

    #[test]
    fn test_resolve_qualified_name_across_modes() {
        let registry = ModeRegistry::new();
        registry.register(mode("html"));
        registry.register(mode("javascript"));
        let set = registry.resolve("html", "javascript::MAIN").unwrap();
        assert_eq!(set.mode(), "javascript");
    }

    #[test]
    fn test_unresolvable_delegate_yields_none() {
        let registry = ModeRegistry::new();
        registry.register(mode("html"));
        assert!(registry.resolve("html", "nosuch::MAIN").is_none());
        // Second resolution takes the cached-unresolved path.
        assert!(registry.resolve("html", "nosuch::MAIN").is_none());
    }

    #[test]
    #[should_panic]
    fn test_mode_without_main_is_a_construction_error() {
        Mode::new("broken", vec![ParserRuleSet::new("broken", "TAGS")]);
    }

    #[test]
    fn test_builtin_registry_has_the_shipped_modes() {
        let registry = ModeRegistry::builtin();
        for name in ["c", "java", "shell", "html", "postscript"] {
            assert!(registry.mode(name).is_some(), "missing builtin mode {name}");
        }
    }

    #[test]
    fn test_mode_for_path() {
        let registry = ModeRegistry::builtin();
        let mode = registry.mode_for_path(Path::new("src/main.c")).unwrap();
        assert_eq!(mode.name(), "c");
        assert!(registry.mode_for_path(Path::new("notes.xyz")).is_none());
    }
}
