/// Returns the slice of `source` from `start` through the close tag that
/// balances the first `<tag` opened at or after `start`, counting nested
/// same-named tags. `None` when the tag never balances.
pub fn find_balanced<'a>(source: &'a str, start: usize, tag: &str) -> Option<&'a str> {
    let bytes = source.as_bytes();
    let name = tag.as_bytes();
    let mut depth = 0usize;
    let mut pos = start;
    while let Some(offset) = source.get(pos..)?.find('<') {
        let lt = pos + offset;
        let after = lt + 1;
        if is_tag_name_at(bytes, after, name) {
            depth += 1;
            pos = after + name.len();
            continue;
        }
        if bytes.get(after) == Some(&b'/') && is_tag_name_at(bytes, after + 1, name) {
            let gt = lt + source[lt..].find('>')?;
            if depth > 0 {
                depth -= 1;
                if depth == 0 {
                    return Some(&source[start..=gt]);
                }
            }
            pos = gt + 1;
            continue;
        }
        pos = after;
    }
    None
}

fn is_tag_name_at(bytes: &[u8], at: usize, name: &[u8]) -> bool {
    let end = at + name.len();
    let Some(candidate) = bytes.get(at..end) else {
        return false;
    };
    if !candidate.eq_ignore_ascii_case(name) {
        return false;
    }
    match bytes.get(end) {
        None => true,
        Some(b) => b.is_ascii_whitespace() || *b == b'>' || *b == b'/',
    }
}

pub(crate) fn inner_of(element: &str) -> &str {
    let open_end = element.find('>').map_or(0, |gt| gt + 1);
    let close_start = element.rfind("</").unwrap_or(element.len());
    if close_start < open_end {
        return "";
    }
    &element[open_end..close_start]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_nested_same_name_tags() {
        let html = r#"<p>x</p><div class="a"><div>in</div><div><div>deep</div></div></div><p>tail</p>"#;
        let start = html.find("<div").unwrap();
        let found = find_balanced(html, start, "div").unwrap();
        assert_eq!(
            found,
            r#"<div class="a"><div>in</div><div><div>deep</div></div></div>"#
        );
    }

    #[test]
    fn unbalanced_returns_none() {
        let html = "<div><div>open</div>";
        assert!(find_balanced(html, 0, "div").is_none());
    }

    #[test]
    fn is_case_insensitive_and_respects_name_boundaries() {
        let html = "<DIV><divider></divider><Div>x</DIV ></div>after";
        let found = find_balanced(html, 0, "div").unwrap();
        assert_eq!(found, "<DIV><divider></divider><Div>x</DIV ></div>");
    }

    #[test]
    fn stray_closers_before_the_open_are_skipped() {
        let html = "</li> text <li>item</li>";
        assert_eq!(find_balanced(html, 0, "li"), Some("</li> text <li>item</li>"));
    }

    #[test]
    fn inner_of_strips_the_wrapper() {
        assert_eq!(inner_of("<ul class=\"x\"><li>a</li></ul>"), "<li>a</li>");
        assert_eq!(inner_of("<p></p>"), "");
    }
}
