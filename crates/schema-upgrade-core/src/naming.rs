/// Converts a camel-case name to underscore form.
///
/// `firstName` → `first_name`, `HTTPStatus` → `http_status`, `userID` → `user_id`.
/// Names already in underscore form come back unchanged.
pub fn underscore(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let after_word = prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
            let ends_acronym = prev.is_some_and(|p| p.is_ascii_uppercase())
                && next.is_some_and(|n| n.is_ascii_lowercase());
            if after_word || ends_acronym {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Converts an underscore name to upper camel case: `team_member` → `TeamMember`.
pub fn camelize(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Returns the last segment of a possibly namespaced constant.
pub fn unqualified(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscore_camel_case() {
        assert_eq!(underscore("firstName"), "first_name");
        assert_eq!(underscore("createdAtDate"), "created_at_date");
    }

    #[test]
    fn underscore_acronyms() {
        assert_eq!(underscore("HTTPStatus"), "http_status");
        assert_eq!(underscore("userID"), "user_id");
        assert_eq!(underscore("avatarURL"), "avatar_url");
    }

    #[test]
    fn underscore_digits() {
        assert_eq!(underscore("address2Line"), "address2_line");
    }

    #[test]
    fn underscore_is_stable() {
        assert_eq!(underscore("first_name"), "first_name");
        assert_eq!(underscore("id"), "id");
        assert_eq!(underscore(&underscore("someLongName")), "some_long_name");
    }

    #[test]
    fn camelize_words() {
        assert_eq!(camelize("user"), "User");
        assert_eq!(camelize("team_member"), "TeamMember");
        assert_eq!(camelize("User"), "User");
        assert_eq!(camelize("TodoList"), "TodoList");
    }

    #[test]
    fn unqualified_name() {
        assert_eq!(unqualified("Types::UserType"), "UserType");
        assert_eq!(unqualified("UserType"), "UserType");
    }
}
