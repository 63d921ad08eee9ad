use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use pep425_platform::InterpreterFamily;

use crate::{CPythonRules, GenericRules, InterpreterRules};

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("Unsupported interpreter family: `{0}`")]
pub struct UnsupportedInterpreterError(String);

impl UnsupportedInterpreterError {
    /// The interpreter family without a known rule set.
    pub fn family(&self) -> &str {
        &self.0
    }
}

/// The compatibility rules of each known interpreter family, keyed by family code.
///
/// New interpreter families are supported by registering their rules; the generator's ordering
/// is unaffected.
#[derive(Debug, Clone)]
pub struct RulesRegistry {
    rules: FxHashMap<InterpreterFamily, Arc<dyn InterpreterRules>>,
}

impl RulesRegistry {
    /// A registry without any rules.
    pub fn empty() -> Self {
        Self {
            rules: FxHashMap::default(),
        }
    }

    /// Register the rules for an interpreter family, returning the rules they replace.
    pub fn register(
        &mut self,
        family: InterpreterFamily,
        rules: impl InterpreterRules + 'static,
    ) -> Option<Arc<dyn InterpreterRules>> {
        self.rules.insert(family, Arc::new(rules))
    }

    /// Returns the rules for the given interpreter family.
    pub fn get(
        &self,
        family: &InterpreterFamily,
    ) -> Result<&dyn InterpreterRules, UnsupportedInterpreterError> {
        match self.rules.get(family) {
            Some(rules) => Ok(rules.as_ref()),
            None => {
                debug!("No compatibility rules registered for interpreter family `{family}`");
                Err(UnsupportedInterpreterError(family.to_string()))
            }
        }
    }

    /// Returns `true` if rules are registered for the given interpreter family.
    pub fn contains(&self, family: &InterpreterFamily) -> bool {
        self.rules.contains_key(family)
    }
}

impl Default for RulesRegistry {
    /// CPython (`cp`), plus PyPy (`pp`), IronPython (`ip`), Jython (`jy`) and generic Python
    /// (`py`) with the generic rules.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(InterpreterFamily::cpython(), CPythonRules);
        registry.register(InterpreterFamily::pypy(), GenericRules);
        registry.register(InterpreterFamily::ironpython(), GenericRules);
        registry.register(InterpreterFamily::jython(), GenericRules);
        registry.register(InterpreterFamily::generic(), GenericRules);
        registry
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn defaults() {
        let registry = RulesRegistry::default();
        for family in ["cp", "cpython", "pp", "pypy", "ip", "jy", "py"] {
            let family = InterpreterFamily::new(family).unwrap();
            assert!(registry.get(&family).is_ok(), "{family}");
        }
        assert_eq!(registry.rules.len(), 5);
        assert_eq!(
            format!("{:?}", registry.get(&InterpreterFamily::cpython()).unwrap()),
            "CPythonRules"
        );
    }

    #[test]
    fn unsupported() {
        let registry = RulesRegistry::default();
        let err = registry
            .get(&InterpreterFamily::new("graalpy").unwrap())
            .unwrap_err();
        assert_eq!(err.family(), "graalpy");
        assert_snapshot!(err, @"Unsupported interpreter family: `graalpy`");
    }

    #[test]
    fn register() {
        let mut registry = RulesRegistry::empty();
        let family = InterpreterFamily::new("graalpy").unwrap();
        assert!(!registry.contains(&family));
        assert!(registry.register(family.clone(), GenericRules).is_none());
        assert!(registry.contains(&family));
        assert!(registry.register(family, GenericRules).is_some());
    }
}
