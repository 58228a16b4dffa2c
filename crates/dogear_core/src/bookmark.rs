use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub name: String,
    pub path: String,
}

impl Bookmark {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.path)
    }
}

/// Bookmarks in recency order, most recently touched first.
///
/// Name and path uniqueness is kept by the commands that mutate the list,
/// not by the list itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkList {
    entries: Vec<Bookmark>,
}

impl BookmarkList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Bookmark> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Bookmark> {
        self.entries.get_mut(index)
    }

    pub fn position<F>(&self, predicate: F) -> Option<usize>
    where
        F: Fn(&Bookmark) -> bool,
    {
        self.entries.iter().position(predicate)
    }

    pub fn position_by_name(&self, name: &str) -> Option<usize> {
        self.position(|bookmark| bookmark.name == name)
    }

    pub fn position_by_path(&self, path: &str) -> Option<usize> {
        self.position(|bookmark| bookmark.path == path)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Bookmark> {
        self.position_by_name(name).and_then(|index| self.get(index))
    }

    pub fn find_by_path(&self, path: &str) -> Option<&Bookmark> {
        self.position_by_path(path).and_then(|index| self.get(index))
    }

    /// Move the entry at `index` to the front. Returns `true` when the order changed.
    pub fn touch(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.entries.len() {
            return false;
        }
        let bookmark = self.entries.remove(index);
        self.entries.insert(0, bookmark);
        true
    }

    pub fn insert_front(&mut self, bookmark: Bookmark) {
        self.entries.insert(0, bookmark);
    }

    pub fn remove(&mut self, index: usize) -> Option<Bookmark> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Drop every entry matching `predicate`, keeping the order of the rest.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<Bookmark>
    where
        F: FnMut(&Bookmark) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for bookmark in self.entries.drain(..) {
            if predicate(&bookmark) {
                removed.push(bookmark);
            } else {
                kept.push(bookmark);
            }
        }
        self.entries = kept;
        removed
    }
}

impl FromIterator<Bookmark> for BookmarkList {
    fn from_iter<I: IntoIterator<Item = Bookmark>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BookmarkList {
    type Item = &'a Bookmark;
    type IntoIter = std::slice::Iter<'a, Bookmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Bookmark, BookmarkList};

    fn sample() -> BookmarkList {
        [
            Bookmark::new("alpha", "/srv/alpha"),
            Bookmark::new("beta", "/srv/beta"),
            Bookmark::new("gamma", "/srv/gamma"),
        ]
        .into_iter()
        .collect()
    }

    fn names(list: &BookmarkList) -> Vec<&str> {
        list.iter().map(|bookmark| bookmark.name.as_str()).collect()
    }

    #[test]
    fn display_joins_name_and_path() {
        assert_eq!(Bookmark::new("proj", "/home/u/proj").to_string(), "proj = /home/u/proj");
    }

    #[test]
    fn lookups_match_exactly() {
        let list = sample();
        assert_eq!(list.position_by_name("beta"), Some(1));
        assert_eq!(list.position_by_name("Beta"), None);
        assert_eq!(
            list.find_by_path("/srv/gamma").map(|bookmark| bookmark.name.as_str()),
            Some("gamma")
        );
        assert!(list.find_by_path("/srv/gamma/").is_none());
        assert_eq!(
            list.find_by_name("alpha").map(|bookmark| bookmark.path.as_str()),
            Some("/srv/alpha")
        );
    }

    #[test]
    fn touch_moves_entry_to_front_and_reports_change() {
        let mut list = sample();
        assert!(list.touch(2));
        assert_eq!(names(&list), ["gamma", "alpha", "beta"]);
        assert!(!list.touch(0));
        assert!(!list.touch(9));
        assert_eq!(names(&list), ["gamma", "alpha", "beta"]);
    }

    #[test]
    fn insert_and_remove_preserve_relative_order() {
        let mut list = sample();
        list.insert_front(Bookmark::new("delta", "/srv/delta"));
        assert_eq!(names(&list), ["delta", "alpha", "beta", "gamma"]);

        let removed = list.remove(2).expect("remove beta");
        assert_eq!(removed.name, "beta");
        assert_eq!(names(&list), ["delta", "alpha", "gamma"]);
        assert!(list.remove(3).is_none());
    }

    #[test]
    fn remove_where_returns_dropped_entries() {
        let mut list = sample();
        let removed = list.remove_where(|bookmark| bookmark.name.starts_with('a') || bookmark.name == "gamma");
        assert_eq!(
            removed.iter().map(|bookmark| bookmark.name.as_str()).collect::<Vec<_>>(),
            ["alpha", "gamma"]
        );
        assert_eq!(names(&list), ["beta"]);
    }
}
