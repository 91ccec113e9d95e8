//! Per-language lexical rule tables
//!
//! Each language owns an ordered slice of rules. A rule fires when a trimmed
//! line starts with its prefix and its name strategy produces a non-empty
//! name. Adding a language or keyword is a table edit; the extractor itself
//! never branches on language.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::language::Language;
use crate::types::SymbolKind;

// First identifier after a closing paren: `- (void)reload`, `func (r *Repo) Find(`
static AFTER_CLOSING_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\)\s*(\w+)").expect("valid regex"));
// Identifier that ends the line, ignoring a trailing `;`
static TRAILING_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s*;?\s*$").expect("valid regex"));

/// How the symbol name is pulled out of a line once the prefix matched
#[derive(Debug, Clone, Copy)]
pub enum NameStrategy {
    /// Token after the prefix, cut at whitespace or any of these characters
    Truncate(&'static [char]),
    /// First identifier following a `)`
    AfterClosingParen,
    /// Last identifier on the line
    TrailingIdentifier,
}

impl NameStrategy {
    fn name<'a>(&self, line: &'a str, rest: &'a str) -> Option<&'a str> {
        let name = match self {
            NameStrategy::Truncate(stops) => rest
                .trim_start()
                .split(|c: char| c.is_whitespace() || stops.contains(&c))
                .next()
                .unwrap_or(""),
            NameStrategy::AfterClosingParen => AFTER_CLOSING_PAREN
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map_or("", |m| m.as_str()),
            NameStrategy::TrailingIdentifier => TRAILING_IDENTIFIER
                .captures(rest)
                .and_then(|caps| caps.get(1))
                .map_or("", |m| m.as_str()),
        };
        (!name.is_empty()).then_some(name)
    }
}

/// One prefix check in a language's table
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub prefix: &'static str,
    pub kind: SymbolKind,
    pub name: NameStrategy,
}

impl Rule {
    const fn new(prefix: &'static str, kind: SymbolKind, name: NameStrategy) -> Self {
        Self { prefix, kind, name }
    }

    /// Try this rule against an already-trimmed line
    pub fn apply<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rest = line.strip_prefix(self.prefix)?;
        self.name.name(line, rest)
    }
}

const BRACE_STOPS: &[char] = &['(', ':', '{', '<'];
const RUST_STOPS: &[char] = &['(', ':', '{', '<', ';'];
const GO_STOPS: &[char] = &['(', ':', '{', '<', '['];
const OBJC_STOPS: &[char] = &['(', ':', '{', '<', ';'];
const PY_DEF_STOPS: &[char] = &['('];
const PY_CLASS_STOPS: &[char] = &['(', ':'];

macro_rules! rules {
    ($($prefix:literal => $kind:ident $strategy:expr),* $(,)?) => {
        &[$(Rule::new($prefix, SymbolKind::$kind, $strategy)),*]
    };
}

use NameStrategy::{AfterClosingParen, TrailingIdentifier, Truncate};

// `class func` must precede `class` or the method name would be read as a type
static SWIFT: &[Rule] = rules![
    "class func " => Function Truncate(BRACE_STOPS),
    "static func " => Function Truncate(BRACE_STOPS),
    "public func " => Function Truncate(BRACE_STOPS),
    "private func " => Function Truncate(BRACE_STOPS),
    "override func " => Function Truncate(BRACE_STOPS),
    "func " => Function Truncate(BRACE_STOPS),
    "class " => Type Truncate(BRACE_STOPS),
    "final class " => Type Truncate(BRACE_STOPS),
    "public class " => Type Truncate(BRACE_STOPS),
    "struct " => Type Truncate(BRACE_STOPS),
    "public struct " => Type Truncate(BRACE_STOPS),
    "enum " => Type Truncate(BRACE_STOPS),
    "public enum " => Type Truncate(BRACE_STOPS),
    "protocol " => Type Truncate(BRACE_STOPS),
    "public protocol " => Type Truncate(BRACE_STOPS),
];

static OBJECTIVE_C: &[Rule] = rules![
    "@interface " => Type Truncate(OBJC_STOPS),
    "@implementation " => Type Truncate(OBJC_STOPS),
    "@protocol " => Type Truncate(OBJC_STOPS),
    "@property" => Property TrailingIdentifier,
    "-" => Method AfterClosingParen,
    "+" => Method AfterClosingParen,
];

static PYTHON: &[Rule] = rules![
    "def " => Function Truncate(PY_DEF_STOPS),
    "async def " => Function Truncate(PY_DEF_STOPS),
    "class " => Type Truncate(PY_CLASS_STOPS),
];

static JAVASCRIPT: &[Rule] = rules![
    "function " => Function Truncate(BRACE_STOPS),
    "async function " => Function Truncate(BRACE_STOPS),
    "export function " => Function Truncate(BRACE_STOPS),
    "export async function " => Function Truncate(BRACE_STOPS),
    "export default function " => Function Truncate(BRACE_STOPS),
    "class " => Type Truncate(BRACE_STOPS),
    "export class " => Type Truncate(BRACE_STOPS),
    "export default class " => Type Truncate(BRACE_STOPS),
];

static TYPESCRIPT: &[Rule] = rules![
    "function " => Function Truncate(BRACE_STOPS),
    "async function " => Function Truncate(BRACE_STOPS),
    "export function " => Function Truncate(BRACE_STOPS),
    "export async function " => Function Truncate(BRACE_STOPS),
    "export default function " => Function Truncate(BRACE_STOPS),
    "class " => Type Truncate(BRACE_STOPS),
    "export class " => Type Truncate(BRACE_STOPS),
    "export default class " => Type Truncate(BRACE_STOPS),
    "abstract class " => Type Truncate(BRACE_STOPS),
    "export abstract class " => Type Truncate(BRACE_STOPS),
    "interface " => Type Truncate(BRACE_STOPS),
    "export interface " => Type Truncate(BRACE_STOPS),
    "enum " => Type Truncate(BRACE_STOPS),
    "export enum " => Type Truncate(BRACE_STOPS),
    "type " => Type Truncate(BRACE_STOPS),
    "export type " => Type Truncate(BRACE_STOPS),
];

static RUST: &[Rule] = rules![
    "fn " => Function Truncate(RUST_STOPS),
    "pub fn " => Function Truncate(RUST_STOPS),
    "pub(crate) fn " => Function Truncate(RUST_STOPS),
    "async fn " => Function Truncate(RUST_STOPS),
    "pub async fn " => Function Truncate(RUST_STOPS),
    "pub(crate) async fn " => Function Truncate(RUST_STOPS),
    "const fn " => Function Truncate(RUST_STOPS),
    "pub const fn " => Function Truncate(RUST_STOPS),
    "unsafe fn " => Function Truncate(RUST_STOPS),
    "pub unsafe fn " => Function Truncate(RUST_STOPS),
    "struct " => Type Truncate(RUST_STOPS),
    "pub struct " => Type Truncate(RUST_STOPS),
    "pub(crate) struct " => Type Truncate(RUST_STOPS),
    "enum " => Type Truncate(RUST_STOPS),
    "pub enum " => Type Truncate(RUST_STOPS),
    "pub(crate) enum " => Type Truncate(RUST_STOPS),
    "trait " => Type Truncate(RUST_STOPS),
    "pub trait " => Type Truncate(RUST_STOPS),
    "pub(crate) trait " => Type Truncate(RUST_STOPS),
    "type " => Type Truncate(RUST_STOPS),
    "pub type " => Type Truncate(RUST_STOPS),
];

// Receiver methods first: `func (` would otherwise yield an empty function name
static GO: &[Rule] = rules![
    "func (" => Method AfterClosingParen,
    "func " => Function Truncate(GO_STOPS),
    "type " => Type Truncate(GO_STOPS),
];

static KOTLIN: &[Rule] = rules![
    "fun " => Function Truncate(BRACE_STOPS),
    "private fun " => Function Truncate(BRACE_STOPS),
    "override fun " => Function Truncate(BRACE_STOPS),
    "suspend fun " => Function Truncate(BRACE_STOPS),
    "class " => Type Truncate(BRACE_STOPS),
    "data class " => Type Truncate(BRACE_STOPS),
    "enum class " => Type Truncate(BRACE_STOPS),
    "sealed class " => Type Truncate(BRACE_STOPS),
    "abstract class " => Type Truncate(BRACE_STOPS),
    "open class " => Type Truncate(BRACE_STOPS),
    "interface " => Type Truncate(BRACE_STOPS),
    "object " => Type Truncate(BRACE_STOPS),
];

/// Ordered rule table for a language
pub fn rules_for(language: Language) -> &'static [Rule] {
    match language {
        Language::Swift => SWIFT,
        Language::ObjectiveC => OBJECTIVE_C,
        Language::Python => PYTHON,
        Language::JavaScript => JAVASCRIPT,
        Language::TypeScript => TYPESCRIPT,
        Language::Rust => RUST,
        Language::Go => GO,
        Language::Kotlin => KOTLIN,
    }
}
