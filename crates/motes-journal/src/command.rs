//! Console command parsing.

pub const USAGE_LEARN: &str = "syntax: learn <CATEGORY> <FACT>";

const FAREWELLS: [&str; 3] = ["exit", "sleep", "rest"];
pub const CORE_CATEGORY: &str = "CORE_MEMORY";
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// End the session.
    Exit,
    /// Commit under the core-memory category.
    SaveCore(String),
    Recall(String),
    Learn { category: String, fact: String },
    /// `learn` without both a category and a fact.
    LearnUsage,
    /// Anything unrecognized.
    Chat(String),
}

type Handler = fn(&str) -> Command;

/// Prefix dispatch table, matched case-insensitively in order. Handlers get
/// the input with the prefix removed and its original case kept.
const TABLE: [(&str, Handler); 3] = [
    ("save core memory", save_core),
    ("recall", recall),
    ("learn", learn),
];

fn save_core(rest: &str) -> Command {
    let text = rest.trim();
    Command::SaveCore(if text.is_empty() { UNKNOWN } else { text }.to_string())
}

fn recall(rest: &str) -> Command {
    Command::Recall(rest.trim().to_string())
}

fn learn(rest: &str) -> Command {
    let mut parts = rest.trim_start().splitn(2, ' ');
    match (parts.next(), parts.next().map(str::trim)) {
        (Some(category), Some(fact)) if !category.is_empty() && !fact.is_empty() => {
            Command::Learn {
                category: category.to_string(),
                fact: fact.to_string(),
            }
        }
        _ => Command::LearnUsage,
    }
}

/// `line` without its leading `word`, if the word stands on its own.
fn strip_word<'a>(line: &'a str, word: &str) -> Option<&'a str> {
    let head = line.get(..word.len())?;
    let rest = &line[word.len()..];
    let bounded = rest.is_empty() || rest.starts_with(char::is_whitespace);
    (bounded && head.eq_ignore_ascii_case(word)).then_some(rest)
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let lower = line.to_lowercase();
        if FAREWELLS.contains(&lower.as_str()) {
            return Command::Exit;
        }
        for (prefix, handler) in TABLE {
            if let Some(rest) = strip_word(line, prefix) {
                return handler(rest);
            }
        }
        Command::Chat(line.to_string())
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Command::SaveCore(_) => Some(CORE_CATEGORY),
            Command::Learn { category, .. } => Some(category.as_str()),
            _ => None,
        }
    }
}
