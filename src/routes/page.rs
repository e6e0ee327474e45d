use std::fmt::Write;
use crate::models::Rating;

const COLUMNS: [&str; 5] = ["who", "url", "mark", "cats", "desc"];

/// A board as a plain HTML table, for viewing in a browser.
/// Column headers link to the same board re-ordered by that column.
pub fn render_board(secret: &str, ratings: &[Rating]) -> String {
    let mut page = String::new();
    let _ = write!(page, "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n<table>\n<tr>",
                   escape(secret));
    for column in COLUMNS.iter() {
        let _ = write!(page, "<th><a href=\"?order_by={0}\">{0}</a></th>", column);
    }
    page.push_str("</tr>\n");
    for rating in ratings {
        let url = rating.url.as_deref().map(escape).unwrap_or_default();
        let _ = write!(page, "<tr><td>{}</td><td><a href=\"{url}\">{url}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                       rating.who.as_deref().map(escape).unwrap_or_default(),
                       rating.mark.map(|m| m.to_string()).unwrap_or_default(),
                       rating.cats.as_deref().map(escape).unwrap_or_default(),
                       rating.description.as_deref().map(escape).unwrap_or_default(),
                       url = url);
    }
    page.push_str("</table>\n</body>\n</html>\n");
    page
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
