//! Attribute name humanization for column headers and form labels.

const ACRONYMS: &[&str] = &[
    "crl", "http", "id", "jndi", "ocsp", "rbac", "ssl", "tls", "uri", "url",
];

/// Turns an attribute name into a human readable label.
///
/// `"credential-reference"` becomes `"Credential Reference"`, known acronyms
/// are upper-cased: `"crl-file"` becomes `"CRL File"`.
pub fn label(attribute: &str) -> String {
    attribute
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            if ACRONYMS.contains(&part.to_ascii_lowercase().as_str()) {
                part.to_ascii_uppercase()
            } else {
                capitalize(part)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
