//! Property-name normalization.
//!
//! Keys are matched against existing containment links by their raw text;
//! normalization is only applied where a canonical display form is needed
//! (diagnostics).

/// Splits an identifier-like string into words at non-alphanumeric
/// separators and lower-to-upper case transitions.
fn words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in input.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_numeric();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Canonical capitalized form: `myStringKey` becomes `MyStringKey`,
/// `my_string_key` becomes `MyStringKey`.
pub fn pascal_case(input: &str) -> String {
    words(input).iter().map(|w| capitalize(w)).collect()
}

/// Joins a chain of ancestor property keys with a final key into one
/// canonical compound name, e.g. `["myObjectKey"]` + `"myStringKey"` gives
/// `MyObjectKeyMyStringKey`.
pub fn compound_name(parents: &[String], key: &str) -> String {
    let mut out = String::new();
    for parent in parents {
        out.push_str(&pascal_case(parent));
    }
    out.push_str(&pascal_case(key));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_handles_camel_and_snake() {
        assert_eq!(pascal_case("myStringKey"), "MyStringKey");
        assert_eq!(pascal_case("my_string_key"), "MyStringKey");
        assert_eq!(pascal_case("my-string key"), "MyStringKey");
        assert_eq!(pascal_case("myStringKey1"), "MyStringKey1");
        assert_eq!(pascal_case(""), "");
    }

    #[test]
    fn compound_names_concatenate_pascal_parts() {
        assert_eq!(
            compound_name(&["myObjectKey".into()], "myStringKey"),
            "MyObjectKeyMyStringKey"
        );
        assert_eq!(compound_name(&[], "myStringKey"), "MyStringKey");
        assert_eq!(
            compound_name(&["a".into(), "b".into()], "c"),
            "ABC".to_string()
        );
    }
}
