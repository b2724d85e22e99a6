//! Small utility helpers used across modules.

/// Log-safe truncation for large strings.
/// Avoids spamming logs with whole explanations or search strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

/// Prefix every line of `text` with `pad`. Used when printing snippets.
pub fn indent(text: &str, pad: &str) -> String {
  text
    .lines()
    .map(|l| if l.is_empty() { String::new() } else { format!("{pad}{l}") })
    .collect::<Vec<_>>()
    .join("\n")
}
