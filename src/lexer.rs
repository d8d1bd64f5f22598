//! Lexical analysis for the shell's one-line command language.
//!
//! The grammar is deliberately tiny: tokens are separated by runs of
//! whitespace and there is no quoting or escaping, so `<`, `>` and `|` are
//! only recognized when they stand alone as words.

/// Split a raw command line into its whitespace-separated tokens.
///
/// Empty and all-whitespace lines produce an empty vector.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_single_spaces() {
        assert_eq!(split_into_tokens("ls -l /tmp"), vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(
            split_into_tokens("  cat\t\tfoo.txt   >  out "),
            vec!["cat", "foo.txt", ">", "out"]
        );
    }

    #[test]
    fn empty_and_blank_lines_yield_nothing() {
        assert!(split_into_tokens("").is_empty());
        assert!(split_into_tokens("   \t  ").is_empty());
    }

    #[test]
    fn operators_are_ordinary_tokens() {
        assert_eq!(
            split_into_tokens("a | b < c"),
            vec!["a", "|", "b", "<", "c"]
        );
        // Unseparated operators are not split off; there is no quoting layer.
        assert_eq!(split_into_tokens("a|b"), vec!["a|b"]);
    }
}
