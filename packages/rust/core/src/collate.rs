//! Locale-aware string ordering for Vietnamese names and titles.
//!
//! Three levels, each consulted only when the previous one ties:
//! 1. base letters with tone marks, vowel shapes and case folded away
//! 2. lower-cased text, so marked letters sort after their base letter
//! 3. case, with lower case first

use std::cmp::Ordering;

/// Compare two strings the way a Vietnamese reader expects.
pub fn compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Fold a string to its collation base: lower case, marks removed.
pub fn primary_key(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).map(base_letter).collect()
}

/// Base letter of a lower-case character.
fn base_letter(c: char) -> char {
    match c {
        'à' | 'á' | 'ạ' | 'ả' | 'ã' | 'â' | 'ầ' | 'ấ' | 'ậ' | 'ẩ' | 'ẫ' | 'ă' | 'ằ' | 'ắ' | 'ặ'
        | 'ẳ' | 'ẵ' | 'ä' | 'å' | 'ā' => 'a',
        'è' | 'é' | 'ẹ' | 'ẻ' | 'ẽ' | 'ê' | 'ề' | 'ế' | 'ệ' | 'ể' | 'ễ' | 'ë' | 'ē' => 'e',
        'ì' | 'í' | 'ị' | 'ỉ' | 'ĩ' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ọ' | 'ỏ' | 'õ' | 'ô' | 'ồ' | 'ố' | 'ộ' | 'ổ' | 'ỗ' | 'ơ' | 'ờ' | 'ớ' | 'ợ'
        | 'ở' | 'ỡ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'ụ' | 'ủ' | 'ũ' | 'ư' | 'ừ' | 'ứ' | 'ự' | 'ử' | 'ữ' | 'û' | 'ü' => 'u',
        'ỳ' | 'ý' | 'ỵ' | 'ỷ' | 'ỹ' | 'ÿ' => 'y',
        'đ' => 'd',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_by(|a, b| compare(a, b));
        names
    }

    #[test]
    fn folds_vietnamese_marks() {
        assert_eq!(primary_key("Nguyễn Đức Ảnh"), "nguyen duc anh");
        assert_eq!(primary_key("Lưu Thị Ý"), "luu thi y");
    }

    #[test]
    fn marked_letters_sort_with_their_base() {
        // A byte-wise sort would push "Đào" after "Zoe".
        assert_eq!(
            sorted(vec!["Zoe", "Đào", "Dung", "Ánh", "Bảo"]),
            vec!["Ánh", "Bảo", "Đào", "Dung", "Zoe"]
        );
    }

    #[test]
    fn unmarked_before_marked_on_tie() {
        assert_eq!(compare("Le", "Lê"), Ordering::Less);
        assert_eq!(compare("Lê", "Le"), Ordering::Greater);
    }

    #[test]
    fn lower_case_first_on_tie() {
        assert_eq!(compare("an", "An"), Ordering::Less);
        assert_eq!(compare("An", "an"), Ordering::Greater);
        assert_eq!(compare("An", "An"), Ordering::Equal);
    }

    #[test]
    fn case_does_not_outrank_letters() {
        assert_eq!(compare("b", "A"), Ordering::Greater);
        assert_eq!(compare("Bình", "an"), Ordering::Greater);
    }
}
