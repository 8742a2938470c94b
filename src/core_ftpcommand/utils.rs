//! Path resolution, pure string logic.

use crate::constants::FTP_CWD_SIZE;
use crate::error::PathTooLong;

/// Resolve a client-supplied path parameter against the current directory.
///
/// Three cases: the parameter can be an absolute path, a relative path or
/// a bare name. Empty and `"/"` both mean the root. Dot segments are
/// resolved here: `.` is dropped and `..` pops one segment, clamped at
/// the root, so the result can never climb above it. A trailing `/` is
/// stripped unless the result is the root itself. Fails when the result
/// does not fit the fixed path buffer.
pub fn make_path_from(cwd: &str, param: &str) -> Result<String, PathTooLong> {
    if param.is_empty() || param == "/" {
        return Ok(String::from("/"));
    }

    let base = if param.starts_with('/') { "" } else { cwd };
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(param.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }

    if segments.is_empty() {
        return Ok(String::from("/"));
    }
    let mut full = String::new();
    for segment in &segments {
        full.push('/');
        full.push_str(segment);
    }

    if full.len() >= FTP_CWD_SIZE {
        return Err(PathTooLong);
    }
    Ok(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_root_resolve_to_root() {
        assert_eq!(make_path_from("/music", "").unwrap(), "/");
        assert_eq!(make_path_from("/music", "/").unwrap(), "/");
    }

    #[test]
    fn relative_paths_concatenate_with_cwd() {
        assert_eq!(make_path_from("/", "a.txt").unwrap(), "/a.txt");
        assert_eq!(make_path_from("/music", "a.txt").unwrap(), "/music/a.txt");
        assert_eq!(make_path_from("/music/", "a.txt").unwrap(), "/music/a.txt");
    }

    #[test]
    fn absolute_paths_pass_through() {
        assert_eq!(make_path_from("/music", "/etc/motd").unwrap(), "/etc/motd");
    }

    #[test]
    fn trailing_slash_is_stripped_except_for_root() {
        assert_eq!(make_path_from("/", "dir/").unwrap(), "/dir");
        assert_eq!(make_path_from("/", "/dir/sub/").unwrap(), "/dir/sub");
    }

    #[test]
    fn result_never_ends_with_slash_unless_root() {
        for param in ["", "/", "a/", "/a/b/", "name"] {
            let resolved = make_path_from("/x", param).unwrap();
            assert!(resolved == "/" || !resolved.ends_with('/'), "{resolved}");
        }
    }

    #[test]
    fn dot_segments_cannot_climb_above_the_root() {
        assert_eq!(make_path_from("/", "../secret.txt").unwrap(), "/secret.txt");
        assert_eq!(make_path_from("/music", "../../../etc").unwrap(), "/etc");
        assert_eq!(make_path_from("/", "/a/../../b").unwrap(), "/b");
        assert_eq!(make_path_from("/music", "..").unwrap(), "/");
    }

    #[test]
    fn dot_segments_resolve_in_place() {
        assert_eq!(make_path_from("/music", "./a.txt").unwrap(), "/music/a.txt");
        assert_eq!(make_path_from("/", "a/../b").unwrap(), "/b");
        assert_eq!(make_path_from("/music", "albums/..").unwrap(), "/music");
    }

    #[test]
    fn resolution_is_idempotent() {
        let once = make_path_from("/music", "albums/1984").unwrap();
        let twice = make_path_from("/", &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn oversized_result_is_rejected() {
        let long = "a".repeat(FTP_CWD_SIZE);
        assert!(make_path_from("/", &long).is_err());
        // A short parameter can still overflow through the cwd.
        let deep = format!("/{}", "b".repeat(FTP_CWD_SIZE - 4));
        assert!(make_path_from(&deep, "name").is_err());
    }
}
