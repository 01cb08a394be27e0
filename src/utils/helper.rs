use regex::Regex;

/// Replaces every `{{key}}` placeholder in `template` with the matching slot
/// value. Unknown placeholders are left untouched.
pub fn fill_slots(template: &str, slots: &[(&str, &str)]) -> String {
    let mut filled = template.to_string();
    for (key, value) in slots {
        filled = filled.replace(&format!("{{{{{key}}}}}"), value);
    }
    filled
}

pub fn extract_from_codeblock(text: &str) -> &str {
    let re = Regex::new(r"```(?:(?:[\w+-]\s*)+)?\s*\n\s*([\s\S]+?)\s*```").unwrap();
    if let Some(caps) = re.captures(text) {
        if let Some(inner) = caps.get(1) {
            return inner.as_str().trim();
        }
    }
    text.trim()
}
