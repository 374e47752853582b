//! Parsed view of the `extra.plugin` section of a package.
//!
//! The metadata bag is free-form JSON written by package authors, so parsing is
//! lenient: unexpected shapes are treated as absent rather than rejected.

use log::debug;
use serde_json::{Map, Value};

/// Leading character on a copy target that requests force replacement.
pub const FORCE_MARKER: char = '!';

/// A declared `source -> target` relationship.
///
/// `source` is relative to the package install directory; `target` is relative
/// to the project root or absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingPair {
    pub source: String,
    pub target: String,
}

impl MappingPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A copy target with the force marker split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTarget<'a> {
    pub path: &'a str,
    pub force_marker: bool,
}

impl<'a> CopyTarget<'a> {
    pub fn parse(spec: &'a str) -> Self {
        match spec.strip_prefix(FORCE_MARKER) {
            Some(path) => Self {
                path,
                force_marker: true,
            },
            None => Self {
                path: spec,
                force_marker: false,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginDeclaration {
    /// Install directory override.
    pub path: Option<String>,
    /// Seeded only when the target is absent.
    pub init: Vec<MappingPair>,
    /// Always copied unless an ignore marker is present.
    pub copy: Vec<MappingPair>,
    /// Delete the install directory after synchronization.
    pub clear: bool,
    /// Hook class identifiers, in declaration order.
    pub event: Vec<String>,
}

impl PluginDeclaration {
    /// Read the declaration from a package's `extra` bag.
    pub fn from_extra(extra: &Value) -> Self {
        extra
            .get("plugin")
            .map(Self::from_section)
            .unwrap_or_default()
    }

    /// Read the declaration from the `plugin` section itself.
    pub fn from_section(section: &Value) -> Self {
        let Some(section) = section.as_object() else {
            debug!("Ignoring non-object plugin section: {}", section);
            return Self::default();
        };

        Self {
            path: section
                .get("path")
                .and_then(Value::as_str)
                .filter(|p| !p.is_empty())
                .map(String::from),
            init: mappings(section, "init"),
            copy: mappings(section, "copy"),
            clear: section.get("clear").is_some_and(is_truthy),
            event: events(section),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_none()
            && self.init.is_empty()
            && self.copy.is_empty()
            && !self.clear
            && self.event.is_empty()
    }
}

fn mappings(section: &Map<String, Value>, key: &str) -> Vec<MappingPair> {
    let Some(entries) = section.get(key).and_then(Value::as_object) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(source, target)| match target.as_str() {
            Some(target) if !target.is_empty() => Some(MappingPair::new(source, target)),
            _ => {
                debug!("Skipping {} entry {:?}: target is not a path", key, source);
                None
            }
        })
        .collect()
}

fn events(section: &Map<String, Value>) -> Vec<String> {
    match section.get("event") {
        Some(Value::String(class)) if !class.is_empty() => vec![class.clone()],
        Some(Value::Array(classes)) => classes
            .iter()
            .filter_map(Value::as_str)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Loose truthiness for flags: `true`, non-zero numbers, non-empty strings other
/// than `"0"`, and non-empty collections.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_declaration() {
        let extra = json!({
            "plugin": {
                "path": "plugin/acme",
                "init": { "config.sample.php": "config/acme.php" },
                "copy": {
                    "assets/logo.png": "public/logo.png",
                    "views/": "!app/views/"
                },
                "clear": true,
                "event": ["Acme\\Setup", "Acme\\Cache"]
            }
        });

        let decl = PluginDeclaration::from_extra(&extra);

        assert_eq!(decl.path.as_deref(), Some("plugin/acme"));
        assert_eq!(
            decl.init,
            vec![MappingPair::new("config.sample.php", "config/acme.php")]
        );
        assert_eq!(
            decl.copy,
            vec![
                MappingPair::new("assets/logo.png", "public/logo.png"),
                MappingPair::new("views/", "!app/views/"),
            ]
        );
        assert!(decl.clear);
        assert_eq!(decl.event, vec!["Acme\\Setup", "Acme\\Cache"]);
    }

    #[test]
    fn test_missing_plugin_section() {
        let decl = PluginDeclaration::from_extra(&json!({ "other": 1 }));
        assert!(decl.is_empty());
        assert_eq!(decl, PluginDeclaration::default());

        let decl = PluginDeclaration::from_extra(&Value::Null);
        assert!(decl.is_empty());
    }

    #[test]
    fn test_non_object_plugin_section() {
        let decl = PluginDeclaration::from_extra(&json!({ "plugin": "yes" }));
        assert!(decl.is_empty());
    }

    #[test]
    fn test_copy_preserves_declaration_order() {
        let extra = json!({
            "plugin": {
                "copy": { "z.txt": "z.txt", "a.txt": "a.txt", "m.txt": "m.txt" }
            }
        });
        let decl = PluginDeclaration::from_extra(&extra);
        let sources: Vec<_> = decl.copy.iter().map(|p| p.source.as_str()).collect();
        assert_eq!(sources, vec!["z.txt", "a.txt", "m.txt"]);
    }

    #[test]
    fn test_non_string_targets_are_dropped() {
        let extra = json!({
            "plugin": { "init": { "a": "b", "c": 3, "d": "" } }
        });
        let decl = PluginDeclaration::from_extra(&extra);
        assert_eq!(decl.init, vec![MappingPair::new("a", "b")]);
    }

    #[test]
    fn test_event_single_string() {
        let decl = PluginDeclaration::from_extra(&json!({ "plugin": { "event": "Acme\\Setup" } }));
        assert_eq!(decl.event, vec!["Acme\\Setup"]);
    }

    #[test]
    fn test_empty_path_is_no_override() {
        let decl = PluginDeclaration::from_extra(&json!({ "plugin": { "path": "" } }));
        assert_eq!(decl.path, None);
    }

    #[test]
    fn test_clear_truthiness() {
        let cases = [
            (json!(true), true),
            (json!(false), false),
            (json!(1), true),
            (json!(0), false),
            (json!("1"), true),
            (json!("0"), false),
            (json!(""), false),
            (json!(null), false),
            (json!([]), false),
        ];
        for (value, expected) in cases {
            let decl = PluginDeclaration::from_section(&json!({ "clear": value.clone() }));
            assert_eq!(decl.clear, expected, "clear = {}", value);
        }
    }

    #[test]
    fn test_copy_target_parse() {
        assert_eq!(
            CopyTarget::parse("!/app/views/"),
            CopyTarget {
                path: "/app/views/",
                force_marker: true
            }
        );
        assert_eq!(
            CopyTarget::parse("/app/views/"),
            CopyTarget {
                path: "/app/views/",
                force_marker: false
            }
        );
        // Only a single leading marker is stripped
        assert_eq!(CopyTarget::parse("!!x").path, "!x");
    }
}
