use crate::node::{Node, Properties};

/// `camelCase` (and `PascalCase`) to `snake_case` with `_` as splitter.
pub fn to_snake_case(input: &str) -> String {
    camel_case_to_underscore(input, '_')
}

/// Inserts `splitter` where a new word starts, then lowercases.
///
/// A word starts at an uppercase letter that follows any non-uppercase
/// character, or at the last letter of an uppercase run that is followed by a
/// lowercase letter, so acronyms stay together: `UserHTTPCode` becomes
/// `user_http_code` and `ABTest` becomes `ab_test`. An uppercase letter after
/// an existing splitter still gets one, so `user_Name` becomes `user__name`.
pub fn camel_case_to_underscore(input: &str, splitter: char) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if !prev.is_uppercase() || next_is_lower {
                out.push(splitter);
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Key for a type tag: the unqualified name, snake cased.
/// `App\Entity\OrderLine` becomes `order_line`.
pub fn namespace_as_key(type_tag: &str) -> String {
    let name = type_tag
        .rsplit(['\\', '.', ':', '/'])
        .next()
        .unwrap_or(type_tag);
    to_snake_case(name)
}

/// Rewrites every key at every depth to snake case.
///
/// Two keys converting to the same name keep the first one's position and
/// the later one's value.
pub fn keys_to_underscore(node: &mut Node) {
    match node {
        Node::Object(obj) => {
            let old = std::mem::take(&mut obj.properties);
            let mut renamed = Properties::with_capacity(old.len());
            for (key, mut value) in old {
                keys_to_underscore(&mut value);
                let key = to_snake_case(&key);
                if renamed.insert(key.clone(), value).is_some() {
                    tracing::debug!(key = %key, "snake cased keys collide; keeping the later value");
                }
            }
            obj.properties = renamed;
        }
        Node::Array(items) => items.iter_mut().for_each(keys_to_underscore),
        Node::Wrapped { .. } | Node::Scalar(_) => {}
    }
}
