//! First-match XML field lookup.
//!
//! The OOXML property parts and XMP packets handled here are flat documents
//! of leaf elements, so extraction is a first-match scan by local tag name
//! (namespace prefixes ignored), not a full XML parse. Missing tags yield
//! `None`; a present-but-empty tag yields an empty string.

/// Decode the five predefined XML entities.
fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn local_name(tag_name: &str) -> &str {
    tag_name.rsplit(':').next().unwrap_or(tag_name)
}

/// Text content of the first element whose local name matches.
///
/// Only leaf elements are considered: the content is everything up to the
/// next `<`. Self-closing elements yield an empty string.
pub fn first_tag_text(xml: &str, name: &str) -> Option<String> {
    let mut rest = xml;
    while let Some(lt) = rest.find('<') {
        rest = &rest[lt + 1..];
        let tag_end = rest.find(|c: char| c.is_whitespace() || c == '>' || c == '/')?;
        let tag = &rest[..tag_end];
        if tag.is_empty() || tag.starts_with(['/', '?', '!']) {
            continue;
        }
        if local_name(tag) != name {
            continue;
        }
        let gt = rest.find('>')?;
        // Self-closing: element present, no content.
        if rest[..gt].ends_with('/') {
            return Some(String::new());
        }
        let content = &rest[gt + 1..];
        let close = content.find('<')?;
        return Some(unescape(content[..close].trim()));
    }
    None
}

/// Value of the first attribute whose local name matches.
pub fn first_attr_value(xml: &str, name: &str) -> Option<String> {
    let mut rest = xml;
    loop {
        let pos = rest.find(name)?;
        let before = &rest[..pos];
        let after = &rest[pos + name.len()..];
        // Attribute position: preceded by whitespace or a namespace prefix,
        // followed by '='.
        let prefixed = before.ends_with(':');
        let boundary = if prefixed {
            before[..before.len() - 1]
                .chars()
                .rev()
                .take_while(|c| !c.is_whitespace() && *c != '<')
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
                && before[..before.len() - 1].ends_with(|c: char| !c.is_whitespace())
        } else {
            before.ends_with(char::is_whitespace)
        };
        let trimmed = after.trim_start();
        if boundary && trimmed.starts_with('=') {
            let value = trimmed[1..].trim_start();
            let quote = value.chars().next()?;
            if quote == '"' || quote == '\'' {
                let body = &value[1..];
                let end = body.find(quote)?;
                return Some(unescape(&body[..end]));
            }
        }
        rest = &rest[pos + name.len()..];
    }
}
