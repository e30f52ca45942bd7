//! Path-only exclusion policy applied before any file is read

use std::path::Path;

/// Path fragments that exclude a file wherever they appear
const SKIP_FRAGMENTS: &[&str] = &[
    "__tests__",
    ".test.",
    ".spec.",
    "/.git/",
    "/node_modules/",
    "/dist/",
    "/coverage/",
];

/// Path suffixes for docs, data, lockfiles and snapshots
const SKIP_SUFFIXES: &[&str] = &[".md", ".json", ".lock", ".snap"];

/// File name suffixes (compared lower-cased) for declaration-only and build-config files
const SKIP_NAME_SUFFIXES: &[&str] = &[".d.ts", ".config.js"];

/// Directory names whose whole subtree is pruned
const SKIP_DIRS: &[&str] = &[".git", "node_modules", "dist", "coverage", "test", "__tests__"];

fn normalized(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Whether a file must be excluded from indexing
pub fn should_skip(path: &Path) -> bool {
    let path_str = normalized(path);
    let file_name = path_str
        .rsplit('/')
        .next()
        .unwrap_or(&path_str)
        .to_lowercase();

    SKIP_FRAGMENTS.iter().any(|f| path_str.contains(f))
        || SKIP_SUFFIXES.iter().any(|s| path_str.ends_with(s))
        || SKIP_NAME_SUFFIXES.iter().any(|s| file_name.ends_with(s))
}

/// Whether a directory's subtree must be pruned, judged on its final segment only
pub fn should_skip_dir(path: &Path) -> bool {
    let path_str = normalized(path);
    let last = path_str.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    SKIP_DIRS.contains(&last)
}

/// The built-in policy extended with user-configured exclusions
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    exclude_patterns: Vec<String>,
    exclude_dirs: Vec<String>,
}

impl PathFilter {
    pub fn new(exclude_patterns: Vec<String>, exclude_dirs: Vec<String>) -> Self {
        Self {
            exclude_patterns,
            exclude_dirs,
        }
    }

    pub fn should_skip(&self, path: &Path) -> bool {
        if should_skip(path) {
            return true;
        }
        let path_str = normalized(path);
        self.exclude_patterns
            .iter()
            .any(|pattern| path_str.contains(pattern.as_str()))
    }

    pub fn should_skip_dir(&self, path: &Path) -> bool {
        if should_skip_dir(path) {
            return true;
        }
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.exclude_dirs.iter().any(|d| d == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skip(p: &str) -> bool {
        should_skip(Path::new(p))
    }

    fn skip_dir(p: &str) -> bool {
        should_skip_dir(Path::new(p))
    }

    #[test]
    fn test_keeps_plain_sources() {
        assert!(!skip("repo/src/server.go"));
        assert!(!skip("repo/web/app.ts"));
        assert!(!skip("repo/lib/util.js"));
    }

    #[test]
    fn test_skips_test_files() {
        assert!(skip("repo/src/__tests__/util.ts"));
        assert!(skip("repo/src/util.test.ts"));
        assert!(skip("repo/src/util.spec.js"));
    }

    #[test]
    fn test_skips_metadata_and_build_dirs() {
        assert!(skip("repo/.git/hooks/pre-commit.js"));
        assert!(skip("repo/node_modules/left-pad/index.js"));
        assert!(skip("repo/dist/bundle.js"));
        assert!(skip("repo/coverage/lcov-report/sorter.js"));
    }

    #[test]
    fn test_skips_by_extension() {
        assert!(skip("repo/README.md"));
        assert!(skip("repo/package.json"));
        assert!(skip("repo/Cargo.lock"));
        assert!(skip("repo/src/__snapshots__/a.snap"));
    }

    #[test]
    fn test_skips_declarations_and_build_config_case_insensitively() {
        assert!(skip("repo/types/index.d.ts"));
        assert!(skip("repo/types/Index.D.TS"));
        assert!(skip("repo/webpack.config.js"));
        assert!(skip("repo/Jest.Config.JS"));
    }

    #[test]
    fn test_windows_separators() {
        assert!(skip(r"repo\node_modules\x\index.js"));
        assert!(!skip(r"repo\src\main.go"));
    }

    #[test]
    fn test_skip_dir_exact_segment() {
        assert!(skip_dir("repo/.git"));
        assert!(skip_dir("repo/node_modules"));
        assert!(skip_dir("repo/dist"));
        assert!(skip_dir("repo/coverage"));
        assert!(skip_dir("repo/test"));
        assert!(skip_dir("repo/__tests__"));
        assert!(skip_dir("repo/test/"));
    }

    #[test]
    fn test_skip_dir_does_not_match_suffixes() {
        assert!(!skip_dir("repo/latest"));
        assert!(!skip_dir("repo/mydist"));
        assert!(!skip_dir("repo/tests"));
        assert!(!skip_dir("repo/src"));
    }

    #[test]
    fn test_filters_are_deterministic() {
        let paths = [
            "repo/src/a.go",
            "repo/a.test.ts",
            "repo/.git",
            "repo/test",
            "",
        ];
        for p in paths {
            assert_eq!(skip(p), skip(p));
            assert_eq!(skip_dir(p), skip_dir(p));
        }
    }

    #[test]
    fn test_path_filter_extra_patterns() {
        let filter = PathFilter::new(vec!["/generated/".to_string()], vec!["vendor".to_string()]);

        assert!(filter.should_skip(Path::new("repo/generated/api.go")));
        assert!(filter.should_skip(Path::new("repo/a.spec.ts")));
        assert!(!filter.should_skip(Path::new("repo/api.go")));

        assert!(filter.should_skip_dir(Path::new("repo/vendor")));
        assert!(filter.should_skip_dir(Path::new("repo/.git")));
        assert!(!filter.should_skip_dir(Path::new("repo/vendors")));
    }

    #[test]
    fn test_path_filter_default_matches_builtin_policy() {
        let filter = PathFilter::default();
        assert_eq!(
            filter.should_skip(Path::new("repo/x.md")),
            should_skip(Path::new("repo/x.md"))
        );
        assert!(!filter.should_skip_dir(Path::new("repo/src")));
    }
}
