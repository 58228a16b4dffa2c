pub const MAX_NAME_LEN: usize = 40;

/// Bookmark names are 1-40 characters of `[A-Za-z0-9_.-]`.
pub fn is_valid_name(name: &str) -> bool {
    (1..=MAX_NAME_LEN).contains(&name.len()) && name.chars().all(is_valid_name_char)
}

fn is_valid_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.')
}

pub fn invalid_name_message(name: &str) -> String {
    format!(
        "Invalid bookmark name: {name}\n\n\
         Valid bookmark names must have 1-{MAX_NAME_LEN} characters\n\
         and can only contain the following:\n   \
         [a-zA-Z0-9] alphanumeric characters\n   \
         [_.-] underscores, periods, and dashes"
    )
}
