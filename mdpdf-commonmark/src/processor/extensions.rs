//! Text-level Markdown extensions that comrak does not provide the way we
//! want them.

/// Replace `:shortcode:` sequences with their emoji glyphs.
///
/// Only names known to the GitHub shortcode table are replaced; anything
/// else is left as written. A shortcode directly preceded or followed by an
/// ASCII digit is skipped, so clock times and durations such as `00:00:00`
/// or `12:100:00` never turn into pictures.
///
/// # Examples
///
/// ```
/// use mdpdf_commonmark::processor::extensions::replace_emoji_shortcodes;
///
/// assert_eq!(replace_emoji_shortcodes("Hi :smile:!"), "Hi 😄!");
/// assert_eq!(replace_emoji_shortcodes("at 10:100:00"), "at 10:100:00");
/// ```
#[must_use]
pub fn replace_emoji_shortcodes(text: &str) -> String {
  if !text.contains(':') {
    return text.to_string();
  }

  let bytes = text.as_bytes();
  let mut result = String::with_capacity(text.len());
  let mut copied_until = 0;
  let mut cursor = 0;

  while let Some(offset) = text[cursor..].find(':') {
    let open = cursor + offset;
    let Some(len) = text[open + 1..].find(':') else {
      break;
    };
    let close = open + 1 + len;
    let name = &text[open + 1..close];

    let digit_before = open > 0 && bytes[open - 1].is_ascii_digit();
    let digit_after = bytes.get(close + 1).is_some_and(u8::is_ascii_digit);

    let emoji = if is_shortcode_name(name) && !digit_before && !digit_after {
      emojis::get_by_shortcode(name)
    } else {
      None
    };

    if let Some(emoji) = emoji {
      result.push_str(&text[copied_until..open]);
      result.push_str(emoji.as_str());
      copied_until = close + 1;
      cursor = close + 1;
    } else {
      // The closing colon may open the next shortcode.
      cursor = close;
    }
  }

  result.push_str(&text[copied_until..]);
  result
}

fn is_shortcode_name(name: &str) -> bool {
  !name.is_empty()
    && name
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'))
}
