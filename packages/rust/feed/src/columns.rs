//! Column-role detection.
//!
//! Each semantic role carries an ordered keyword list covering Latin and
//! Vietnamese header spellings. A role resolves to the left-most header that
//! contains any of its keywords; there is no scoring, so an unusual header can
//! claim more than one role (a plain `title` header is both the article title
//! and the job-title column).

use std::fmt;

/// A semantic field that must be mapped onto a physical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Author,
    AuthorName,
    Salutation,
    Biography,
    JobTitle,
    Title,
    Content,
    Genre,
    Date,
    Avatar,
    ArticleId,
    Comments,
    Views,
}

impl Role {
    /// Every role, in detection order.
    pub const ALL: [Role; 13] = [
        Role::Author,
        Role::AuthorName,
        Role::Salutation,
        Role::Biography,
        Role::JobTitle,
        Role::Title,
        Role::Content,
        Role::Genre,
        Role::Date,
        Role::Avatar,
        Role::ArticleId,
        Role::Comments,
        Role::Views,
    ];

    /// Lower-case header keywords, in priority order.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Role::Author => &["tác giả", "author", "người viết", "họ và tên", "họ tên", "fullname"],
            Role::AuthorName => &["author_name", "tên đầy đủ", "tên tác giả"],
            Role::Salutation => &[
                "xưng hô",
                "author_gen",
                "gender",
                "phái",
                "giới tính",
                "salutation",
            ],
            Role::Biography => &[
                "giới thiệu",
                "bio",
                "author_bio",
                "mô tả",
                "tiểu sử",
                "thông tin tác giả",
                "về tác giả",
                "author_info",
            ],
            Role::JobTitle => &[
                "chức danh",
                "nghề nghiệp",
                "job",
                "position",
                "role",
                "công việc",
                "title",
                "vị trí",
            ],
            Role::Title => &["tên bài", "title", "tiêu đề", "tác phẩm", "bài viết", "chủ đề"],
            Role::Content => &["nội dung", "content", "bài viết", "chi tiết", "bản thảo", "body"],
            Role::Genre => &["thể loại", "genre", "chuyên mục", "loại", "category"],
            Role::Date => &["ngày", "date", "thời gian", "time", "published", "xuất bản"],
            Role::Avatar => &[
                "avatar",
                "author_img",
                "author_image",
                "ảnh",
                "hình ảnh",
                "image",
                "picture",
                "photo",
                "thumbnail",
                "hình tác giả",
            ],
            Role::ArticleId => &[
                "article_id",
                "id bài",
                "id bài viết",
                "id article",
                "object_id",
                "id",
            ],
            Role::Comments => &[
                "comment",
                "thảo luận",
                "comments",
                "bình luận",
                "số thảo luận",
                "số bình luận",
            ],
            Role::Views => &["view", "lượt xem", "views", "số lượt xem", "số view"],
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Author => "author",
            Role::AuthorName => "author_name",
            Role::Salutation => "salutation",
            Role::Biography => "biography",
            Role::JobTitle => "job_title",
            Role::Title => "title",
            Role::Content => "content",
            Role::Genre => "genre",
            Role::Date => "date",
            Role::Avatar => "avatar",
            Role::ArticleId => "article_id",
            Role::Comments => "comments",
            Role::Views => "views",
        };
        f.write_str(name)
    }
}

/// Index of the first header matching any keyword.
///
/// Headers are expected lower-cased already. Exact equality is the
/// degenerate case of containment, so both kinds of match rank purely by
/// column position.
pub fn find_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|header| keywords.iter().any(|kw| header.contains(kw)))
}

/// Resolved column position for every role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    slots: [Option<usize>; 13],
}

impl ColumnMap {
    /// Detect every role against a lower-cased header row.
    pub fn detect(headers: &[String]) -> Self {
        let mut map = Self::default();
        for role in Role::ALL {
            map.slots[role.slot()] = find_column(headers, role.keywords());
        }
        map
    }

    /// Column index for a role, or `None` when no header matched.
    pub fn get(&self, role: Role) -> Option<usize> {
        self.slots[role.slot()]
    }

    /// Roles that resolved to a column.
    pub fn detected(&self) -> impl Iterator<Item = (Role, usize)> + '_ {
        Role::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|idx| (role, idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(raw: &str) -> Vec<String> {
        raw.split('\t').map(|h| h.trim().to_lowercase()).collect()
    }

    #[test]
    fn detects_vietnamese_headers() {
        let map = ColumnMap::detect(&headers("Tác giả\tTên bài\tNội dung\tComment\tView"));
        assert_eq!(map.get(Role::Author), Some(0));
        assert_eq!(map.get(Role::Title), Some(1));
        assert_eq!(map.get(Role::Content), Some(2));
        assert_eq!(map.get(Role::Comments), Some(3));
        assert_eq!(map.get(Role::Views), Some(4));
        assert_eq!(map.get(Role::Date), None);
        assert_eq!(map.get(Role::ArticleId), None);
        assert_eq!(map.get(Role::JobTitle), None);
    }

    #[test]
    fn leftmost_match_wins_over_exact_match() {
        // Column 0 matches "tiêu đề" as a substring, column 1 is an exact "title".
        let map = ColumnMap::detect(&headers("Tiêu đề chính\ttitle\tbody"));
        assert_eq!(map.get(Role::Title), Some(0));
    }

    #[test]
    fn keyword_priority_does_not_beat_position() {
        // "comment" is the first keyword, but column 0 still wins through
        // a later keyword.
        let headers = headers("Số bình luận\tComment");
        assert_eq!(find_column(&headers, Role::Comments.keywords()), Some(0));
    }

    #[test]
    fn title_header_also_claims_job_title() {
        let map = ColumnMap::detect(&headers("author\ttitle\tcontent"));
        assert_eq!(map.get(Role::Title), Some(1));
        assert_eq!(map.get(Role::JobTitle), Some(1));
    }

    #[test]
    fn id_substring_is_greedy() {
        // "video" contains "id" and sits left of the real id column.
        let map = ColumnMap::detect(&headers("video\tarticle_id"));
        assert_eq!(map.get(Role::ArticleId), Some(0));
    }

    #[test]
    fn detected_lists_only_resolved_roles() {
        let map = ColumnMap::detect(&headers("author\tviews"));
        let roles: Vec<Role> = map.detected().map(|(role, _)| role).collect();
        assert_eq!(roles, vec![Role::Author, Role::Views]);
    }

    #[test]
    fn role_display_names() {
        assert_eq!(Role::JobTitle.to_string(), "job_title");
        assert_eq!(Role::Views.to_string(), "views");
    }
}
