/// Command parsing and nickname validation.
///
/// A line from an active client is one of:
///   - `/exit` (case-insensitive) — disconnect
///   - `@nick message` — whisper
///   - `/w nick message` — whisper (prefix is case-sensitive)
///   - anything else non-empty — public message
///
/// Whitespace-only lines parse to [`Command::Empty`] and are ignored.

/// A parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line after trimming — ignored.
    Empty,
    /// `/exit` — leave the chat.
    Exit,
    /// Private message to one named recipient.
    Whisper { target: String, text: String },
    /// Public message to everyone.
    Public(String),
}

/// Malformed whisper syntax. The display text is sent to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Usage: @nick message")]
    BadMention,
    #[error("Usage: /w nick message")]
    BadWhisper,
}

impl Command {
    /// Parse a single input line (without the trailing newline).
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let line = input.trim();

        if line.is_empty() {
            return Ok(Command::Empty);
        }

        if line.eq_ignore_ascii_case("/exit") {
            return Ok(Command::Exit);
        }

        if line.starts_with('@') {
            // The separating space must leave at least one character of
            // target name between it and the `@`.
            return match line.find(' ') {
                Some(idx) if idx > 1 => Ok(Command::Whisper {
                    target: line[1..idx].to_owned(),
                    text: line[idx + 1..].to_owned(),
                }),
                _ => Err(CommandError::BadMention),
            };
        }

        if let Some(rest) = line.strip_prefix("/w ") {
            let rest = rest.trim();
            return match rest.find(' ') {
                Some(idx) => Ok(Command::Whisper {
                    target: rest[..idx].to_owned(),
                    text: rest[idx + 1..].to_owned(),
                }),
                None => Err(CommandError::BadWhisper),
            };
        }

        Ok(Command::Public(line.to_owned()))
    }
}

/// Nickname rules: non-empty after trimming, no space, does not start
/// with `@` (which would collide with whisper syntax).
pub fn valid_nickname(name: &str) -> bool {
    !name.is_empty() && !name.contains(' ') && !name.starts_with('@')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Public and empty ─────────────────────────────────────────

    #[test]
    fn parse_public_message() {
        assert_eq!(
            Command::parse("hello everyone"),
            Ok(Command::Public("hello everyone".into()))
        );
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        assert_eq!(
            Command::parse("  hello  "),
            Ok(Command::Public("hello".into()))
        );
    }

    #[test]
    fn parse_empty_line() {
        assert_eq!(Command::parse(""), Ok(Command::Empty));
        assert_eq!(Command::parse("   "), Ok(Command::Empty));
    }

    // ── Exit ─────────────────────────────────────────────────────

    #[test]
    fn parse_exit() {
        assert_eq!(Command::parse("/exit"), Ok(Command::Exit));
    }

    #[test]
    fn parse_exit_is_case_insensitive() {
        assert_eq!(Command::parse("/EXIT"), Ok(Command::Exit));
        assert_eq!(Command::parse("/Exit"), Ok(Command::Exit));
    }

    #[test]
    fn parse_exit_with_trailing_text_is_public() {
        assert_eq!(
            Command::parse("/exit now"),
            Ok(Command::Public("/exit now".into()))
        );
    }

    // ── Mention whisper ──────────────────────────────────────────

    #[test]
    fn parse_mention_whisper() {
        assert_eq!(
            Command::parse("@bob hi there"),
            Ok(Command::Whisper {
                target: "bob".into(),
                text: "hi there".into(),
            })
        );
    }

    #[test]
    fn parse_mention_single_char_target() {
        // `@b hi` — space at index 2 is the smallest valid position.
        assert_eq!(
            Command::parse("@b hi"),
            Ok(Command::Whisper {
                target: "b".into(),
                text: "hi".into(),
            })
        );
    }

    #[test]
    fn parse_mention_without_message() {
        assert_eq!(Command::parse("@bob"), Err(CommandError::BadMention));
    }

    #[test]
    fn parse_mention_without_target() {
        // Space at index 1 — no target name before it.
        assert_eq!(Command::parse("@ hi"), Err(CommandError::BadMention));
    }

    #[test]
    fn parse_bare_at_sign() {
        assert_eq!(Command::parse("@"), Err(CommandError::BadMention));
    }

    // ── /w whisper ───────────────────────────────────────────────

    #[test]
    fn parse_w_whisper() {
        assert_eq!(
            Command::parse("/w bob hi there"),
            Ok(Command::Whisper {
                target: "bob".into(),
                text: "hi there".into(),
            })
        );
    }

    #[test]
    fn parse_w_without_message() {
        assert_eq!(Command::parse("/w bob"), Err(CommandError::BadWhisper));
    }

    #[test]
    fn parse_w_prefix_is_case_sensitive() {
        // `/W` is not the whisper command — falls through to public.
        assert_eq!(
            Command::parse("/W bob hi"),
            Ok(Command::Public("/W bob hi".into()))
        );
    }

    #[test]
    fn parse_w_extra_spaces_before_target() {
        assert_eq!(
            Command::parse("/w   bob hi"),
            Ok(Command::Whisper {
                target: "bob".into(),
                text: "hi".into(),
            })
        );
    }

    // ── Nickname validation ──────────────────────────────────────

    #[test]
    fn nickname_accepts_plain_names() {
        assert!(valid_nickname("alice"));
        assert!(valid_nickname("bob_42"));
        assert!(valid_nickname("Ümlaut"));
    }

    #[test]
    fn nickname_rejects_empty() {
        assert!(!valid_nickname(""));
    }

    #[test]
    fn nickname_rejects_spaces() {
        assert!(!valid_nickname("al ice"));
    }

    #[test]
    fn nickname_rejects_at_prefix() {
        assert!(!valid_nickname("@alice"));
    }

    #[test]
    fn nickname_allows_interior_at_sign() {
        assert!(valid_nickname("al@ice"));
    }
}
