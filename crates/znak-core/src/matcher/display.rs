use unicode_width::UnicodeWidthStr;

/// Join translation words with `", "`, dropping trailing words until the
/// text fits in `max_width` columns. The first word is always kept.
pub fn display_text(words: &[String], max_width: usize) -> String {
    let mut kept = words.len();
    let mut text = words.join(", ");
    while kept > 1 && text.width() > max_width {
        kept -= 1;
        text = words[..kept].join(", ");
    }
    text
}
