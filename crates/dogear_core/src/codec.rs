use log::warn;

use crate::bookmark::{Bookmark, BookmarkList};

/// Render the list as `name=path` lines, most recent first.
pub fn encode(bookmarks: &BookmarkList) -> String {
    let mut out = String::new();
    for bookmark in bookmarks {
        out.push_str(&bookmark.name);
        out.push('=');
        out.push_str(&bookmark.path);
        out.push('\n');
    }
    out
}

/// Parse `name=path` lines. Only the first `=` on a line splits it, so paths
/// may contain `=`. A truncated record stops parsing; earlier records are kept.
pub fn decode(content: &str) -> BookmarkList {
    let mut bookmarks = Vec::new();
    let mut rest = content;

    while !rest.is_empty() {
        let line_end = rest.find('\n');
        let line = match line_end {
            Some(end) => &rest[..end],
            None => rest,
        };

        let Some((name, path)) = line.split_once('=') else {
            warn!("bookmark store is truncated after {} records", bookmarks.len());
            break;
        };
        if line_end.is_none() && path.is_empty() {
            warn!("bookmark store is truncated after {} records", bookmarks.len());
            break;
        }

        bookmarks.push(Bookmark::new(name, path));
        rest = match line_end {
            Some(end) => &rest[end + 1..],
            None => "",
        };
    }

    bookmarks.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};
    use crate::bookmark::{Bookmark, BookmarkList};

    fn pairs(list: &BookmarkList) -> Vec<(&str, &str)> {
        list.iter()
            .map(|bookmark| (bookmark.name.as_str(), bookmark.path.as_str()))
            .collect()
    }

    #[test]
    fn encode_writes_one_record_per_line() {
        let list: BookmarkList = [
            Bookmark::new("proj", "/home/u/proj"),
            Bookmark::new("tmp", "/tmp"),
        ]
        .into_iter()
        .collect();
        assert_eq!(encode(&list), "proj=/home/u/proj\ntmp=/tmp\n");
        assert_eq!(encode(&BookmarkList::new()), "");
    }

    #[test]
    fn decode_splits_on_first_equals_only() {
        let list = decode("odd=/srv/a=b/c==d\nplain=/srv/plain\n");
        assert_eq!(
            pairs(&list),
            [("odd", "/srv/a=b/c==d"), ("plain", "/srv/plain")]
        );
    }

    #[test]
    fn decode_accepts_missing_final_newline() {
        let list = decode("a=/srv/a\nb=/srv/b");
        assert_eq!(pairs(&list), [("a", "/srv/a"), ("b", "/srv/b")]);
    }

    #[test]
    fn decode_stops_at_truncated_record() {
        let list = decode("a=/srv/a\nb=/srv/b\nbroken\nc=/srv/c\n");
        assert_eq!(pairs(&list), [("a", "/srv/a"), ("b", "/srv/b")]);

        let list = decode("a=/srv/a\nb=");
        assert_eq!(pairs(&list), [("a", "/srv/a")]);
    }

    #[test]
    fn decode_of_empty_input_is_empty() {
        assert!(decode("").is_empty());
    }

    #[test]
    fn encoded_list_decodes_to_the_same_order() {
        let list: BookmarkList = [
            Bookmark::new("z", "/z"),
            Bookmark::new("a.b-c_d", "/path with spaces/x=y"),
            Bookmark::new("m", "/"),
        ]
        .into_iter()
        .collect();
        let decoded = decode(&encode(&list));
        assert_eq!(decoded, list);
        assert_eq!(encode(&decoded), encode(&list));
    }
}
