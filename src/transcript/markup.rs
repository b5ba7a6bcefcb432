/// Strip inline markup tags from a markup-bearing field for display.
///
/// The backend wraps every text field in presentation tags
/// (`<h1>Speaker 1</h1>`, `<p>Hello ...</p>`). Display text is derived by
/// removing the tags and collapsing whitespace; the raw markup stays
/// untouched as the source of truth.
pub fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;

    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                if in_tag {
                    in_tag = false;
                    // Keep adjacent elements from running together
                    out.push(' ');
                } else {
                    out.push(c);
                }
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_inline_tags() {
        assert_eq!(strip_tags("<b>hello</b> world"), "hello world");
    }

    #[test]
    fn strips_block_tags() {
        assert_eq!(strip_tags("<h1>Speaker 1</h1>"), "Speaker 1");
        assert_eq!(strip_tags("<h2>0:00 - 0:15</h2>"), "0:00 - 0:15");
    }

    #[test]
    fn collapses_whitespace_between_elements() {
        assert_eq!(strip_tags("<p>one</p>\n<p>two</p>"), "one two");
    }

    #[test]
    fn passes_plain_text_through() {
        assert_eq!(strip_tags("no markup here"), "no markup here");
    }

    #[test]
    fn empty_markup_yields_empty_text() {
        assert_eq!(strip_tags("<p></p>"), "");
        assert_eq!(strip_tags(""), "");
    }
}
