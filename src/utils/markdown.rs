/// Utility functions for handling Telegram MarkdownV2 formatting
///
/// MarkdownV2 requires escaping of special characters to prevent formatting issues.
/// Every piece of user-supplied text (names, words) goes through here before it
/// is embedded in a bot message.
/// Escapes markdown special characters for MarkdownV2 parsing mode
///
/// # Example
/// ```
/// use vocab_quiz_bot::utils::markdown::escape_markdown;
///
/// let text = "Ann - \"10 очков\"";
/// let escaped = escape_markdown(text);
/// assert_eq!(escaped, "Ann \\- \"10 очков\"");
/// ```
pub fn escape_markdown(text: &str) -> String {
    // Backslash first so the escapes added below survive
    text.replace('\\', "\\\\")
        .replace('_', "\\_")
        .replace('*', "\\*")
        .replace('[', "\\[")
        .replace(']', "\\]")
        .replace('(', "\\(")
        .replace(')', "\\)")
        .replace('~', "\\~")
        .replace('`', "\\`")
        .replace('>', "\\>")
        .replace('#', "\\#")
        .replace('+', "\\+")
        .replace('-', "\\-")
        .replace('=', "\\=")
        .replace('|', "\\|")
        .replace('{', "\\{")
        .replace('}', "\\}")
        .replace('.', "\\.")
        .replace('!', "\\!")
}

/// Wraps already-escaped text in MarkdownV2 bold markers.
pub fn bold(escaped: &str) -> String {
    format!("*{escaped}*")
}
