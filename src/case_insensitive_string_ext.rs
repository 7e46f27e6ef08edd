pub trait CaseInsensitiveStringExt {
    fn strip_prefix_ignore_ascii_case<'a>(&'a self, prefix: &str) -> Option<&'a str>;
}

impl CaseInsensitiveStringExt for str {
    fn strip_prefix_ignore_ascii_case<'a>(&'a self, prefix: &str) -> Option<&'a str> {
        // `get` keeps a multi-byte char straddling the prefix boundary from panicking
        let head = self.get(..prefix.len())?;

        if head.eq_ignore_ascii_case(prefix) {
            Some(&self[prefix.len()..])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CaseInsensitiveStringExt;

    #[test]
    fn strips_any_casing() {
        assert_eq!("Bearer abc".strip_prefix_ignore_ascii_case("bearer "), Some("abc"));
        assert_eq!("BEARER abc".strip_prefix_ignore_ascii_case("bearer "), Some("abc"));
        assert_eq!("bearer ".strip_prefix_ignore_ascii_case("bearer "), Some(""));
    }

    #[test]
    fn leaves_other_input_alone() {
        assert_eq!("Basic abc".strip_prefix_ignore_ascii_case("bearer "), None);
        assert_eq!("bear".strip_prefix_ignore_ascii_case("bearer "), None);
        assert_eq!("bear\u{e9}\u{e9}".strip_prefix_ignore_ascii_case("bearer "), None);
    }
}
