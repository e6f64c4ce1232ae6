//! Capability whitelist
//!
//! A capability is an external module the rendered contract may import. Each one carries a
//! symbol policy (which names `from m import ...` may request) and an import style (which
//! statement forms are allowed at all).

use serde::{Deserialize, Serialize};

/// Symbols a capability exposes to `from m import ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolPolicy {
    /// Any symbol may be imported
    All,
    /// Only the listed symbols
    Only(Vec<String>),
}

impl SymbolPolicy {
    pub fn allows(&self, symbol: &str) -> bool {
        match self {
            SymbolPolicy::All => true,
            SymbolPolicy::Only(symbols) => symbols.iter().any(|s| s == symbol),
        }
    }
}

/// Statement forms allowed for a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStyle {
    /// `import m`, `import m as x` and `from m import y`
    #[default]
    Any,
    /// Reserved name: only `from m import y`
    FromOnly,
    /// Only `import m`, no alias and no `from` form
    DirectUnaliased,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRule {
    pub module: String,
    pub symbols: SymbolPolicy,
    pub style: ImportStyle,
}

impl CapabilityRule {
    pub fn new(module: impl Into<String>, symbols: SymbolPolicy, style: ImportStyle) -> Self {
        Self {
            module: module.into(),
            symbols,
            style,
        }
    }

    fn only(module: &str, symbols: &[&str]) -> Self {
        Self::new(
            module,
            SymbolPolicy::Only(symbols.iter().map(|s| s.to_string()).collect()),
            ImportStyle::Any,
        )
    }

    /// Whether `from <module> import <symbol>` passes this rule
    pub fn allows_from_import(&self, symbol: &str) -> bool {
        self.style != ImportStyle::DirectUnaliased && self.symbols.allows(symbol)
    }
}

/// Ordered capability table; order is significant because it seeds the metadata ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityWhitelist {
    rules: Vec<CapabilityRule>,
}

impl CapabilityWhitelist {
    pub fn new(rules: Vec<CapabilityRule>) -> Self {
        Self { rules }
    }

    pub fn get(&self, module: &str) -> Option<&CapabilityRule> {
        self.rules.iter().find(|rule| rule.module == module)
    }

    pub fn contains(&self, module: &str) -> bool {
        self.get(module).is_some()
    }

    pub fn rules(&self) -> &[CapabilityRule] {
        &self.rules
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.module.as_str())
    }
}

impl Default for CapabilityWhitelist {
    fn default() -> Self {
        Self::new(vec![
            CapabilityRule::new("contracts_api", SymbolPolicy::All, ImportStyle::FromOnly),
            CapabilityRule::only("calendar", &["isleap", "monthrange"]),
            CapabilityRule::only("collections", &["defaultdict"]),
            CapabilityRule::only("datetime", &["datetime"]),
            CapabilityRule::only("dateutil.parser", &["parse"]),
            CapabilityRule::only("dateutil.relativedelta", &["relativedelta"]),
            CapabilityRule::only(
                "decimal",
                &[
                    "Decimal",
                    "ROUND_05UP",
                    "ROUND_CEILING",
                    "ROUND_DOWN",
                    "ROUND_FLOOR",
                    "ROUND_HALF_DOWN",
                    "ROUND_HALF_EVEN",
                    "ROUND_HALF_UP",
                ],
            ),
            CapabilityRule::only("json", &["dumps", "loads"]),
            CapabilityRule::new(
                "math",
                SymbolPolicy::Only(Vec::new()),
                ImportStyle::DirectUnaliased,
            ),
            CapabilityRule::only(
                "typing",
                &[
                    "Any",
                    "Callable",
                    "DefaultDict",
                    "Dict",
                    "Iterable",
                    "Iterator",
                    "List",
                    "Mapping",
                    "NamedTuple",
                    "NewType",
                    "NoReturn",
                    "Optional",
                    "Set",
                    "Type",
                    "Tuple",
                    "Union",
                ],
            ),
            CapabilityRule::only("zoneinfo", &["ZoneInfo"]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_whitelist_starts_with_reserved_capability() {
        let whitelist = CapabilityWhitelist::default();
        let first = &whitelist.rules()[0];
        assert_eq!(first.module, "contracts_api");
        assert_eq!(first.style, ImportStyle::FromOnly);
        assert!(first.allows_from_import("Posting"));
    }

    #[test]
    fn test_direct_unaliased_capability_rejects_from_imports() {
        let whitelist = CapabilityWhitelist::default();
        let math = whitelist.get("math").unwrap();
        assert!(!math.allows_from_import("floor"));
        assert!(!math.allows_from_import("*"));
    }

    #[test]
    fn test_explicit_symbol_policy() {
        let whitelist = CapabilityWhitelist::default();
        let decimal = whitelist.get("decimal").unwrap();
        assert!(decimal.allows_from_import("ROUND_HALF_UP"));
        assert!(!decimal.allows_from_import("getcontext"));
        assert!(!decimal.allows_from_import("*"));
        assert!(whitelist.get("os").is_none());
    }
}
