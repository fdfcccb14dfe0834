use crate::core::db::Tag;

/// Case-insensitive title filter over a tag slice.
///
/// Holds no results of its own: every call to [`TagFilter::iter`] walks the
/// slice again, in its original order.
#[derive(Debug, Clone)]
pub struct TagFilter<'a> {
    tags: &'a [Tag],
    needle: String,
}

impl<'a> TagFilter<'a> {
    pub fn new(tags: &'a [Tag], search: &str) -> Self {
        Self {
            tags,
            needle: search.to_lowercase(),
        }
    }

    pub fn matches(&self, tag: &Tag) -> bool {
        self.needle.is_empty() || tag.title.to_lowercase().contains(&self.needle)
    }

    pub fn iter(&self) -> Iter<'_, 'a> {
        Iter {
            filter: self,
            inner: self.tags.iter(),
        }
    }
}

impl<'s, 'a> IntoIterator for &'s TagFilter<'a> {
    type Item = &'a Tag;
    type IntoIter = Iter<'s, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'s, 'a> {
    filter: &'s TagFilter<'a>,
    inner: std::slice::Iter<'a, Tag>,
}

impl<'s, 'a> Iterator for Iter<'s, 'a> {
    type Item = &'a Tag;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.inner.by_ref().find(|tag| filter.matches(tag))
    }
}
