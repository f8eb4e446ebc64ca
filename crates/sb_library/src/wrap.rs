use sb_core::{hash_color, strip_formatting};

fn visible_len(s: &str) -> usize {
    strip_formatting(s).chars().count()
}

/// Pack `items` into description lines.
///
/// Every line starts with `prefix` and items on a line are separated by a
/// single space. Each item is colored with [`hash_color`], but packing only
/// counts visible characters: a line is broken before the item that would
/// push its visible length past `max_visible`. An item too long to fit even
/// on its own still gets a line of its own. At least one line is always
/// returned.
pub fn wrap_list<S: AsRef<str>>(prefix: &str, max_visible: usize, items: &[S]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = prefix.to_string();
    let mut line_has_items = false;

    for item in items {
        let colored = hash_color(item.as_ref());
        if !line_has_items {
            current.push_str(&colored);
            line_has_items = true;
            continue;
        }

        let candidate = format!("{} {}", current, colored);
        if visible_len(&candidate) <= max_visible {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, format!("{}{}", prefix, colored)));
        }
    }

    lines.push(current);
    lines
}
