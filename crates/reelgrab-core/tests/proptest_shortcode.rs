use proptest::prelude::*;
use reelgrab_core::shortcode::extract_shortcode;

proptest! {
    /// Every supported path shape yields exactly the shortcode, whatever follows it.
    #[test]
    fn extracts_code_from_known_shapes(
        scheme in "(https?://)?",
        host in "(www\\.|m\\.)?",
        shape in "(p|reels|reel|tv)",
        code in "[A-Za-z0-9_-]{1,24}",
        suffix in "(|/|/\\?utm_source=[a-z_]{1,12}|\\?utm_source=[a-z_]{1,12}|\\?igsh=[A-Za-z0-9=]{1,16})"
    ) {
        let link = format!("{scheme}{host}instagram.com/{shape}/{code}{suffix}");
        prop_assert_eq!(extract_shortcode(&link), Some(code.as_str()));
    }

    /// Unsupported path shapes never yield a shortcode.
    #[test]
    fn rejects_unknown_shapes(
        shape in "(explore|stories|accounts|reelz|tags|direct)",
        code in "[A-Za-z0-9_-]{1,24}"
    ) {
        let link = format!("https://www.instagram.com/{shape}/{code}/");
        prop_assert_eq!(extract_shortcode(&link), None);
    }

    /// Other hosts are not mistaken for Instagram.
    #[test]
    fn rejects_other_hosts(
        host in "(youtube|tiktok|twitter|facebook)\\.com",
        shape in "(p|reels|reel|tv)",
        code in "[A-Za-z0-9_-]{1,24}"
    ) {
        let link = format!("https://www.{host}/{shape}/{code}/");
        prop_assert_eq!(extract_shortcode(&link), None);
    }

    /// Arbitrary input never panics.
    #[test]
    fn does_not_crash(s in "\\PC*") {
        let _ = extract_shortcode(&s);
    }
}
