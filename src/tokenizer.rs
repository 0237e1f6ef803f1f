//! Splitting of a raw argument vector into positional arguments and flags.

use indexmap::IndexMap;

/// Reserved flag that forces a dry run. It never reaches the composed command.
///
/// Unlike other flags it never takes the following token as its value, so
/// `--alias-dry-run topic` leaves `topic` as a positional argument.
pub const DRY_RUN_FLAG: &str = "alias-dry-run";

/// Value and dash style of a single flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    /// `None` for a presence-only flag such as `-v`.
    pub value: Option<String>,
    /// Rendered as `--name` when true, `-name` otherwise.
    pub double_dash: bool,
}

impl Flag {
    pub fn new(value: Option<String>, double_dash: bool) -> Self {
        Self { value, double_dash }
    }
}

/// Flags keyed by name (without dashes), in insertion order.
pub type Flags = IndexMap<String, Flag>;

/// Result of tokenizing the arguments that follow the alias name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    /// Positional arguments in the order they appeared.
    pub args: Vec<String>,
    /// Flags in the order they first appeared.
    pub flags: Flags,
}

struct Tokenizer<'a, S> {
    tokens: &'a [S],
    pos: usize,
}

impl<'a, S: AsRef<str>> Tokenizer<'a, S> {
    fn new(tokens: &'a [S]) -> Self {
        Tokenizer { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(AsRef::as_ref)
    }

    fn consume(&mut self) -> Option<&'a str> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn run(mut self) -> ParsedArgs {
        let mut parsed = ParsedArgs::default();

        while let Some(token) = self.consume() {
            match flag_body(token) {
                Some((body, double_dash)) => {
                    let (name, value) = match body.split_once('=') {
                        Some((name, value)) => (name, Some(value.to_owned())),
                        None => (body, self.take_value(body)),
                    };
                    // Re-inserting keeps the first position, so the last value wins in place.
                    parsed
                        .flags
                        .insert(name.to_owned(), Flag::new(value, double_dash));
                }
                None => parsed.args.push(token.to_owned()),
            }
        }

        log::debug!("tokenized args={:?} flags={:?}", parsed.args, parsed.flags);
        parsed
    }

    /// Take the next token as the value of flag `name` if it doesn't look like a flag.
    fn take_value(&mut self, name: &str) -> Option<String> {
        if name == DRY_RUN_FLAG {
            return None;
        }
        match self.peek() {
            Some(next) if !next.starts_with('-') => self.consume().map(str::to_owned),
            _ => None,
        }
    }
}

/// Strip the dashes of a flag token. Returns `None` for positional tokens.
///
/// A lone `-` or `--` is positional.
fn flag_body(token: &str) -> Option<(&str, bool)> {
    if token == "-" || token == "--" {
        return None;
    }
    if let Some(body) = token.strip_prefix("--") {
        Some((body, true))
    } else {
        token.strip_prefix('-').map(|body| (body, false))
    }
}

/// Tokenize the raw arguments that follow the alias name.
///
/// The scan is a single left-to-right pass:
/// - `--name` and `-name` start double and single dash flags,
/// - `name=value` inside a flag token is split on the first `=`,
/// - otherwise the next token becomes the value unless it starts with `-`,
/// - everything else, including a bare `--`, is a positional argument.
///
/// A repeated flag keeps its first position and takes the last value.
pub fn tokenize<S: AsRef<str>>(tokens: &[S]) -> ParsedArgs {
    Tokenizer::new(tokens).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(value: Option<&str>, double_dash: bool) -> Flag {
        Flag::new(value.map(str::to_owned), double_dash)
    }

    #[test]
    fn test_single_dash_flag_takes_next_value() {
        let parsed = tokenize(&["-b", "main"]);
        assert!(parsed.args.is_empty());
        assert_eq!(parsed.flags.get("b"), Some(&flag(Some("main"), false)));
    }

    #[test]
    fn test_inline_value_and_positional() {
        let parsed = tokenize(&["--flag=val", "pos1"]);
        assert_eq!(parsed.args, vec!["pos1"]);
        assert_eq!(parsed.flags.get("flag"), Some(&flag(Some("val"), true)));
    }

    #[test]
    fn test_inline_value_splits_on_first_equal() {
        let parsed = tokenize(&["--define=KEY=VALUE"]);
        assert_eq!(parsed.flags.get("define"), Some(&flag(Some("KEY=VALUE"), true)));
    }

    #[test]
    fn test_presence_flags_do_not_swallow_flags() {
        let parsed = tokenize(&["-v", "-x"]);
        assert!(parsed.args.is_empty());
        assert_eq!(parsed.flags.get("v"), Some(&flag(None, false)));
        assert_eq!(parsed.flags.get("x"), Some(&flag(None, false)));
    }

    #[test]
    fn test_double_dash_and_lone_dash_are_positional() {
        let parsed = tokenize(&["a", "--", "-", "b"]);
        assert_eq!(parsed.args, vec!["a", "--", "-", "b"]);
        assert!(parsed.flags.is_empty());
    }

    #[test]
    fn test_flag_before_double_dash_has_no_value() {
        let parsed = tokenize(&["--alert", "--", "x"]);
        assert_eq!(parsed.flags.get("alert"), Some(&flag(None, true)));
        assert_eq!(parsed.args, vec!["--", "x"]);
    }

    #[test]
    fn test_repeated_flag_last_value_wins_first_position_kept() {
        let parsed = tokenize(&["-m", "one", "--other", "-m", "two"]);
        let names: Vec<&str> = parsed.flags.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["m", "other"]);
        assert_eq!(parsed.flags["m"].value.as_deref(), Some("two"));
    }

    #[test]
    fn test_dry_run_flag_never_takes_a_value() {
        let parsed = tokenize(&["--alias-dry-run", "feature"]);
        assert_eq!(parsed.flags.get(DRY_RUN_FLAG), Some(&flag(None, true)));
        assert_eq!(parsed.args, vec!["feature"]);
    }

    #[test]
    fn test_mixed_order() {
        let parsed = tokenize(&["src", "-n", "3", "dst", "--force"]);
        assert_eq!(parsed.args, vec!["src", "dst"]);
        assert_eq!(parsed.flags["n"].value.as_deref(), Some("3"));
        assert_eq!(parsed.flags["force"], flag(None, true));
    }
}
