//! Base URL joining.
//!
//! Whatever slashes the site author puts on either side, the join has exactly
//! one separator and never changes an already absolute URL.

use proptest::prelude::*;
use sitefind::paths::{is_absolute_url, join_path};

fn segment() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9_-]{1,8}").unwrap()
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..4).prop_map(|s| s.join("/"))
}

fn trailing_slashes() -> impl Strategy<Value = String> {
    (0usize..3).prop_map(|n| "/".repeat(n))
}

/// Two leading slashes would make a protocol-relative URL.
fn leading_slash() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("/".to_string())]
}

proptest! {
    #[test]
    fn prop_single_separator(base in path_strategy(), path in path_strategy(),
                             a in trailing_slashes(), b in leading_slash()) {
        let joined = join_path(&format!("/{}{}", base, a), &format!("{}{}", b, path));
        prop_assert_eq!(joined, format!("/{}/{}", base, path));
    }

    #[test]
    fn prop_empty_base_is_identity(path in path_strategy()) {
        let path = format!("/{}", path);
        prop_assert_eq!(join_path("", &path), path);
    }

    #[test]
    fn prop_absolute_links_pass_through(base in path_strategy(), host in segment(), path in path_strategy()) {
        let url = format!("https://{}.example/{}", host, path);
        prop_assert!(is_absolute_url(&url));
        prop_assert_eq!(join_path(&format!("/{}", base), &url), url);
    }

    #[test]
    fn prop_join_never_doubles_slashes(base in path_strategy(), path in path_strategy()) {
        let joined = join_path(&format!("/{}/", base), &format!("/{}", path));
        prop_assert!(!joined.contains("//"));
    }
}
