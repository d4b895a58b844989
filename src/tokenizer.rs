/// Split text into words on ASCII spaces, dropping empty tokens.
///
/// Leading, trailing, and repeated spaces produce nothing; word order is
/// preserved so diagnostics can reference the original token text.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// Control characters (bytes below 0x20) are rejected everywhere: stop
/// words, document text, and query tokens.
pub(crate) fn contains_restricted_symbols(text: &str) -> bool {
    text.bytes().any(|byte| byte < 0x20)
}
