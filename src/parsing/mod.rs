//! Lexical symbol extraction
//!
//! Turns raw file text into a flat, line-ordered list of symbols. Every line
//! is trimmed and checked against the language's rule table; the first rule
//! that produces a name wins, so a line yields at most one symbol.
//!
//! This is not a parser: nesting and scope are not tracked,
//! methods are not attributed to their enclosing type, and a declaration
//! split across lines is only seen through its first line.

pub mod rules;

pub use rules::{rules_for, NameStrategy, Rule};

use crate::language::Language;
use crate::types::Symbol;

/// Extract symbols from `content` using the rule table for `language`
pub fn extract_symbols(content: &str, language: Language) -> Vec<Symbol> {
    let rules = rules_for(language);

    content
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let line = raw.trim();
            if line.is_empty() {
                return None;
            }
            rules.iter().find_map(|rule| {
                rule.apply(line).map(|name| Symbol {
                    name: name.to_string(),
                    kind: rule.kind,
                    line: index + 1,
                    signature: rule.kind.carries_signature().then(|| line.to_string()),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymbolKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_swift_file() {
        let source = r#"
import Foundation

protocol ProfileStore {
    func load(id: UUID) async throws -> UserProfile
}

struct UserProfile: Codable {
    let id: UUID
}

final class RemoteProfileStore: ProfileStore {
    func load(id: UUID) async throws -> UserProfile {
        fatalError()
    }
}

enum ProfileError: Error {
    case missing
}
"#;
        let symbols = extract_symbols(source, Language::Swift);
        let summary: Vec<_> = symbols
            .iter()
            .map(|s| (s.name.as_str(), s.kind, s.line))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("ProfileStore", SymbolKind::Type, 4),
                ("load", SymbolKind::Function, 5),
                ("UserProfile", SymbolKind::Type, 8),
                ("RemoteProfileStore", SymbolKind::Type, 12),
                ("load", SymbolKind::Function, 13),
                ("ProfileError", SymbolKind::Type, 18),
            ]
        );
    }

    #[test]
    fn test_signatures_only_for_callables() {
        let source = "class Widget:\n    def render(self, ctx):\n        pass\n";
        let symbols = extract_symbols(source, Language::Python);

        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].signature, None);
        assert_eq!(
            symbols[1].signature.as_deref(),
            Some("def render(self, ctx):")
        );
    }

    #[test]
    fn test_objective_c_header() {
        let source = "@interface FeedController : UIViewController\n\
                      @property (nonatomic, strong) NSArray *items;\n\
                      - (void)reloadFeed:(BOOL)animated;\n\
                      + (instancetype)controller;\n\
                      @end\n";
        let symbols = extract_symbols(source, Language::ObjectiveC);
        let kinds: Vec<_> = symbols.iter().map(|s| (s.name.as_str(), s.kind)).collect();

        assert_eq!(
            kinds,
            vec![
                ("FeedController", SymbolKind::Type),
                ("items", SymbolKind::Property),
                ("reloadFeed", SymbolKind::Method),
                ("controller", SymbolKind::Method),
            ]
        );
        assert_eq!(
            symbols[2].signature.as_deref(),
            Some("- (void)reloadFeed:(BOOL)animated;")
        );
    }

    #[test]
    fn test_multiline_declaration_only_first_line() {
        let source = "func configure(\n    name: String,\n    retries: Int\n) {\n}\n";
        let symbols = extract_symbols(source, Language::Swift);

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "configure");
        assert_eq!(symbols[0].signature.as_deref(), Some("func configure("));
    }

    #[test]
    fn test_unknown_modifier_is_missed() {
        let source = "@MainActor func refresh() {}\nfileprivate func helper() {}\n";
        assert!(extract_symbols(source, Language::Swift).is_empty());
    }

    #[test]
    fn test_no_scope_tracking() {
        // Nested functions are reported flat with no parent
        let source = "def outer():\n    def inner():\n        pass\n";
        let names: Vec<_> = extract_symbols(source, Language::Python)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["outer", "inner"]);
    }

    #[test]
    fn test_crlf_and_indentation() {
        let source = "pub struct Store;\r\n    pub fn open() -> Self {\r\n";
        let symbols = extract_symbols(source, Language::Rust);
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].name, "Store");
        assert_eq!(symbols[1].line, 2);
        assert_eq!(symbols[1].signature.as_deref(), Some("pub fn open() -> Self {"));
    }

    #[test]
    fn test_empty_content() {
        assert!(extract_symbols("", Language::Go).is_empty());
    }
}
