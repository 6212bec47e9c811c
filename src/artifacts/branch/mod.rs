pub mod branch_name;

/// Patterns a branch name must not match: leading dot or slash, `..`,
/// `/.`, trailing slash or `.lock`, `@{`, control characters, and the
/// ref-syntax metacharacters.
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
