/// Clean exam titles before they are stored or echoed back.
///
/// Titles arrive from the client and are rendered by the result page, so
/// they go through ammonia's whitelist sanitizer: harmless markup survives,
/// `<script>` and event-handler attributes are dropped.
pub fn clean_title(input: &str) -> String {
    ammonia::clean(input.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags() {
        let cleaned = clean_title("Mock <script>alert(1)</script>Test");
        assert!(!cleaned.contains("script"));
        assert!(cleaned.contains("Mock"));
    }

    #[test]
    fn plain_titles_are_untouched() {
        assert_eq!(clean_title("  Olympiad Mock 1 "), "Olympiad Mock 1");
    }
}
