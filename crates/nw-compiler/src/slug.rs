/// Convert a title to a URL slug.
///
/// ASCII letters and digits are kept (lowercased); every other run of
/// characters becomes a single dash. No leading or trailing dash.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !result.is_empty() {
                result.push('-');
            }
            pending_dash = false;
            result.push(c);
        } else {
            pending_dash = true;
        }
    }

    result
}
