//! POSIX shell quoting for command previews.
//!
//! Commands are never run through a shell; these helpers only render the
//! equivalent command line for `--dry-run` output and logs.

/// Quote one word so a POSIX shell reads it back unchanged.
pub fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if safe {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Render a full command line, quoting each word.
pub fn shell_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let mut line = shell_quote(program);
    for arg in args {
        line.push(' ');
        line.push_str(&shell_quote(arg.as_ref()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words_are_untouched() {
        assert_eq!(shell_quote("Travel3Nft_backend"), "Travel3Nft_backend");
        assert_eq!(shell_quote("--network=local"), "--network=local");
    }

    #[test]
    fn quotes_spaces_and_specials() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("$(whoami)"), "'$(whoami)'");
        assert_eq!(shell_quote("Ma'an"), r"'Ma'\''an'");
    }

    #[test]
    fn renders_command_line() {
        let line = shell_line("dfx", &["canister", "call", "b", "mint", "(\"x\")"]);
        assert_eq!(line, "dfx canister call b mint '(\"x\")'");
    }
}
