//! URL slugs for author names and article titles.

use std::sync::LazyLock;

use regex::Regex;

/// Vietnamese vowel classes and the base letter each folds to.
static VOWELS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        ("à|á|ạ|ả|ã|â|ầ|ấ|ậ|ẩ|ẫ|ă|ằ|ắ|ặ|ẳ|ẵ", "a"),
        ("è|é|ẹ|ẻ|ẽ|ê|ề|ế|ệ|ể|ễ", "e"),
        ("ì|í|ị|ỉ|ĩ", "i"),
        ("ò|ó|ọ|ỏ|õ|ô|ồ|ố|ộ|ổ|ỗ|ơ|ờ|ớ|ợ|ở|ỡ", "o"),
        ("ù|ú|ụ|ủ|ũ|ư|ừ|ứ|ự|ử|ữ", "u"),
        ("ỳ|ý|ỵ|ỷ|ỹ", "y"),
        ("đ", "d"),
    ]
    .into_iter()
    .map(|(pattern, base)| (Regex::new(pattern).expect("valid vowel pattern"), base))
    .collect()
});

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9 ]").expect("valid disallowed pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new("-+").expect("valid dash pattern"));

/// Turn a name or title into a lower-case, dash-separated ASCII slug.
///
/// Marked vowels fold to their base letter and `đ` becomes `d`. Any other
/// character outside `[a-z0-9 ]` is dropped, then space runs become one
/// dash. Leading and trailing spaces are not trimmed, so they survive as a
/// leading or trailing dash.
pub fn to_slug(text: &str) -> String {
    let mut slug = text.to_lowercase();
    for (pattern, base) in VOWELS.iter() {
        slug = pattern.replace_all(&slug, *base).into_owned();
    }
    let slug = DISALLOWED.replace_all(&slug, "");
    let slug = WHITESPACE.replace_all(&slug, "-");
    DASHES.replace_all(&slug, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_vietnamese_names() {
        assert_eq!(to_slug("Nguyễn Văn A"), "nguyen-van-a");
        assert_eq!(to_slug("Đặng Thị Hồng Nhung"), "dang-thi-hong-nhung");
        assert_eq!(to_slug("Lưu Quang Vũ"), "luu-quang-vu");
    }

    #[test]
    fn drops_punctuation_and_collapses_dashes() {
        assert_eq!(to_slug("Hà Nội - mùa thu!"), "ha-noi-mua-thu");
        assert_eq!(to_slug("Covid-19: bài học"), "covid19-bai-hoc");
        assert_eq!(to_slug("a   b"), "a-b");
    }

    #[test]
    fn keeps_edge_spaces_as_dashes() {
        assert_eq!(to_slug(" Xin chào "), "-xin-chao-");
    }

    #[test]
    fn empty_and_symbol_only_input() {
        assert_eq!(to_slug(""), "");
        assert_eq!(to_slug("???"), "");
        assert_eq!(to_slug("Khuyết danh"), "khuyet-danh");
    }
}
