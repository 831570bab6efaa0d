// ===========================================================================
// Leaf Name of a Local Path
// ===========================================================================
//
// Names the remote folder that receives an uploaded directory.
// Examples: "./images/cats/" -> "cats", "runs/exp1" -> "exp1"

/// Final segment of `path` after dropping one trailing separator
pub fn leaf_name(path: &str) -> String {
    let mut chars = path.chars();
    let trimmed = match chars.next_back() {
        Some(c) if std::path::is_separator(c) => chars.as_str(),
        _ => path,
    };

    trimmed
        .rsplit(std::path::is_separator)
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_separator_ignored() {
        assert_eq!(leaf_name("foo/bar/"), "bar");
        assert_eq!(leaf_name("foo/bar"), "bar");
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(leaf_name("bar"), "bar");
        assert_eq!(leaf_name("bar/"), "bar");
    }

    #[test]
    fn test_relative_and_absolute() {
        assert_eq!(leaf_name("./images/cats/"), "cats");
        assert_eq!(leaf_name("/srv/datasets/mnist"), "mnist");
    }

    #[test]
    fn test_only_one_separator_stripped() {
        assert_eq!(leaf_name("foo/bar//"), "");
    }

    #[test]
    fn test_empty_and_root() {
        assert_eq!(leaf_name(""), "");
        assert_eq!(leaf_name("/"), "");
    }

    #[test]
    fn test_dot_segment_kept() {
        // `mlctl upload demo .` names the remote folder "."
        assert_eq!(leaf_name("."), ".");
        assert_eq!(leaf_name("./"), ".");
        assert_eq!(leaf_name("runs/.."), "..");
    }
}
