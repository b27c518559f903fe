//! Author grouping: the book's table of contents.
//!
//! Articles are bucketed by their exact author string. Groups are ordered by
//! author name; inside a group the newest article comes first and ties fall
//! back to the title.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, instrument};

use folio_feed::normalize::parse_day_month_year;
use folio_feed::{ParseOptions, parse_feed};
use folio_shared::{Article, AuthorGroup};

use crate::collate;

/// Parse feed text and group the resulting articles.
pub fn parse(text: &str, opts: &ParseOptions) -> Vec<AuthorGroup> {
    group(parse_feed(text, opts))
}

/// Group articles by author and order groups and their articles.
#[instrument(skip_all, fields(article_count = articles.len()))]
pub fn group(articles: Vec<Article>) -> Vec<AuthorGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<AuthorGroup> = Vec::new();

    for article in articles {
        match index.get(&article.author) {
            Some(&slot) => groups[slot].articles.push(article),
            None => {
                index.insert(article.author.clone(), groups.len());
                groups.push(AuthorGroup {
                    author: article.author.clone(),
                    articles: vec![article],
                });
            }
        }
    }

    groups.sort_by(|a, b| collate::compare(&a.author, &b.author));
    for group in &mut groups {
        insertion_sort_by(&mut group.articles, compare_articles);
    }

    debug!(groups = groups.len(), "articles grouped");

    groups
}

/// Reading order inside a group.
///
/// Newer dates first when both dates parse and differ; otherwise by title.
/// Mixing unparseable dates with valid ones makes this intransitive, so it
/// must only be used with [`insertion_sort_by`].
pub fn compare_articles(a: &Article, b: &Article) -> Ordering {
    let dates = (
        parse_day_month_year(&a.published_date),
        parse_day_month_year(&b.published_date),
    );
    match dates {
        (Some(da), Some(db)) if da != db => db.cmp(&da),
        _ => collate::compare(&a.title, &b.title),
    }
}

/// Stable in-place insertion sort.
///
/// Tolerates comparators that are not total orders: it always terminates and
/// never reorders elements the comparator calls equal.
fn insertion_sort_by<T>(items: &mut [T], mut compare: impl FnMut(&T, &T) -> Ordering) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_shared::RawRecord;

    fn article(id: &str, author: &str, title: &str, date: &str) -> Article {
        Article {
            id: id.into(),
            article_id: None,
            author: author.into(),
            author_name: None,
            author_gen: "Ông/Bà".into(),
            author_bio: None,
            author_title: None,
            avatar: None,
            title: title.into(),
            content: String::new(),
            genre: None,
            published_date: date.into(),
            views: 0,
            comments: 0,
            raw: RawRecord::default(),
        }
    }

    fn ids(group: &AuthorGroup) -> Vec<&str> {
        group.articles.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn single_row_feed_is_one_group() {
        let text = "Tác giả\tTên bài\tNội dung\tComment\tView\n\
                    Nguyễn Văn A\tBài một\tNội dung một\t1,200\t50000\n";
        let groups = parse(text, &ParseOptions::with_today("1/1/2025"));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].author, "Nguyễn Văn A");
        assert_eq!(groups[0].articles.len(), 1);
        let article = &groups[0].articles[0];
        assert_eq!(article.title, "Bài một");
        assert_eq!(article.comments, 1200);
        assert_eq!(article.views, 50000);
    }

    #[test]
    fn newer_article_first() {
        let text = "Tác giả\tTên bài\tNgày\n\
                    Nguyễn Văn A\tCũ\t05/01/2025\n\
                    Nguyễn Văn A\tMới\t20/01/2025\n";
        let groups = parse(text, &ParseOptions::with_today("1/1/2025"));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].articles[0].published_date, "20/01/2025");
        assert_eq!(groups[0].articles[1].published_date, "05/01/2025");
    }

    #[test]
    fn partitions_by_exact_author() {
        let groups = group(vec![
            article("row-1", "An", "a", "1/1/2025"),
            article("row-2", "an", "b", "1/1/2025"),
            article("row-3", "An", "c", "1/1/2025"),
        ]);
        assert_eq!(groups.len(), 2);
        let total: usize = groups.iter().map(|g| g.articles.len()).sum();
        assert_eq!(total, 3);
        for g in &groups {
            assert!(g.articles.iter().all(|a| a.author == g.author));
        }
    }

    #[test]
    fn groups_sorted_by_collation() {
        let groups = group(vec![
            article("row-1", "Trần C", "x", "1/1/2025"),
            article("row-2", "Đỗ B", "x", "1/1/2025"),
            article("row-3", "Ánh D", "x", "1/1/2025"),
            article("row-4", "Dương E", "x", "1/1/2025"),
        ]);
        let authors: Vec<&str> = groups.iter().map(|g| g.author.as_str()).collect();
        assert_eq!(authors, vec!["Ánh D", "Đỗ B", "Dương E", "Trần C"]);
    }

    #[test]
    fn same_date_falls_back_to_title() {
        let groups = group(vec![
            article("row-1", "A", "Cúc", "5/1/2025"),
            article("row-2", "A", "Ánh trăng", "5/1/2025"),
            article("row-3", "A", "Bão", "05/01/2025"),
        ]);
        assert_eq!(ids(&groups[0]), vec!["row-2", "row-3", "row-1"]);
    }

    #[test]
    fn invalid_dates_sort_by_title() {
        let groups = group(vec![
            article("row-1", "A", "Beta", "không rõ"),
            article("row-2", "A", "Alpha", "sắp ra"),
        ]);
        assert_eq!(ids(&groups[0]), vec!["row-2", "row-1"]);
    }

    #[test]
    fn mixed_dates_do_not_panic_and_keep_every_article() {
        let mut articles = Vec::new();
        for i in 0..40 {
            let date = match i % 3 {
                0 => format!("{}/1/2025", i % 28 + 1),
                1 => "không rõ".to_string(),
                _ => format!("{}/2/2024", i % 27 + 1),
            };
            articles.push(article(&format!("row-{i}"), "A", &format!("T{}", 40 - i), &date));
        }
        let groups = group(articles);
        assert_eq!(groups[0].articles.len(), 40);
    }

    #[test]
    fn equal_articles_keep_input_order() {
        let groups = group(vec![
            article("row-1", "A", "Trùng", "1/1/2025"),
            article("row-2", "A", "Trùng", "1/1/2025"),
            article("row-3", "A", "Trùng", "01/01/2025"),
        ]);
        assert_eq!(ids(&groups[0]), vec!["row-1", "row-2", "row-3"]);
    }

    #[test]
    fn adjacent_pairs_respect_order() {
        let groups = parse(
            &std::fs::read_to_string("../../../fixtures/tsv/sample-feed.tsv")
                .expect("read fixture"),
            &ParseOptions::with_today("1/1/2025"),
        );
        for g in &groups {
            for pair in g.articles.windows(2) {
                assert_ne!(compare_articles(&pair[0], &pair[1]), Ordering::Greater);
            }
        }
        for pair in groups.windows(2) {
            assert_eq!(
                collate::compare(&pair[0].author, &pair[1].author),
                Ordering::Less
            );
        }
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(group(Vec::new()).is_empty());
        assert!(parse("Tác giả\tTên bài\n", &ParseOptions::default()).is_empty());
    }
}
