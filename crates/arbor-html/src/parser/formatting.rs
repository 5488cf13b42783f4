use crate::tokenizer::Tag;

/// [§ 13.2.4.3 Pushing onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
///
/// "If there are already three elements in the list of active formatting
/// elements after the last marker, if any, or anywhere in the list if there are
/// no markers, that have the same tag name, namespace, and attributes as
/// element, then remove the earliest such element from the list"
pub const NOAHS_ARK_LIMIT: usize = 3;

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list contains elements in the formatting category, and markers."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattingEntry<H> {
    /// A formatting element with the tag token it was created from, kept to
    /// recreate the element during reconstruction and adoption.
    Element {
        /// Sink handle of the element.
        handle: H,
        /// "the token for which the element was created"
        tag: Tag,
    },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Pushed when entering applet, object, marquee, template, td, th and caption.
    Marker,
}

impl<H: Copy> FormattingEntry<H> {
    /// The element handle, or `None` for a marker.
    #[must_use]
    pub const fn handle(&self) -> Option<H> {
        match self {
            Self::Element { handle, .. } => Some(*handle),
            Self::Marker => None,
        }
    }
}

/// The list of active formatting elements.
#[derive(Debug, Clone)]
pub struct ActiveFormattingList<H> {
    entries: Vec<FormattingEntry<H>>,
}

impl<H> Default for ActiveFormattingList<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: Copy + Eq> ActiveFormattingList<H> {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FormattingEntry<H>> {
        self.entries.get(index)
    }

    /// Entries from first to last.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &FormattingEntry<H>> {
        self.entries.iter()
    }

    /// Index just past the last marker, or 0 without markers.
    fn segment_start(&self) -> usize {
        self.entries
            .iter()
            .rposition(|entry| matches!(entry, FormattingEntry::Marker))
            .map_or(0, |index| index + 1)
    }

    /// "push onto the list of active formatting elements"
    pub fn push(&mut self, handle: H, tag: Tag) {
        // STEP 2: the Noah's Ark clause.
        let start = self.segment_start();
        let matching: Vec<usize> = self.entries[start..]
            .iter()
            .enumerate()
            .filter_map(|(offset, entry)| match entry {
                FormattingEntry::Element { tag: existing, .. }
                    if existing.same_name_and_attributes(&tag) =>
                {
                    Some(start + offset)
                }
                _ => None,
            })
            .collect();
        if matching.len() >= NOAHS_ARK_LIMIT {
            let _ = self.entries.remove(matching[0]);
        }

        // STEP 3: "Add element to the list of active formatting elements."
        self.entries.push(FormattingEntry::Element { handle, tag });
    }

    /// "insert a marker at the end of the list of active formatting elements"
    pub fn push_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "Remove entries until a marker has been removed or the list is empty."
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if matches!(entry, FormattingEntry::Marker) {
                break;
            }
        }
    }

    /// Index of the entry for `handle`.
    #[must_use]
    pub fn position(&self, handle: H) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.handle() == Some(handle))
    }

    /// Whether `handle` is in the list.
    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.position(handle).is_some()
    }

    /// The last element called `name` between the end of the list and the
    /// last marker, with its index.
    #[must_use]
    pub fn last_element_named(&self, name: &str) -> Option<(usize, H)> {
        let start = self.segment_start();
        self.entries[start..]
            .iter()
            .enumerate()
            .rev()
            .find_map(|(offset, entry)| match entry {
                FormattingEntry::Element { handle, tag } if tag.name == name => {
                    Some((start + offset, *handle))
                }
                _ => None,
            })
    }

    /// Tag token the element at `index` was created from.
    #[must_use]
    pub fn tag_at(&self, index: usize) -> Option<&Tag> {
        match self.entries.get(index)? {
            FormattingEntry::Element { tag, .. } => Some(tag),
            FormattingEntry::Marker => None,
        }
    }

    /// Remove the entry for `handle`. Returns `false` if it was absent.
    pub fn remove(&mut self, handle: H) -> bool {
        match self.position(handle) {
            Some(index) => {
                let _ = self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Point the element entry at `index` to a new handle, keeping its tag.
    pub fn replace(&mut self, index: usize, new_handle: H) {
        if let Some(FormattingEntry::Element { handle, .. }) = self.entries.get_mut(index) {
            *handle = new_handle;
        }
    }

    /// Insert an element entry at `index` (clamped to the end of the list).
    pub fn insert(&mut self, index: usize, handle: H, tag: Tag) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, FormattingEntry::Element { handle, tag });
    }

    /// Number of elements after the last marker equal to `tag` in the Noah's
    /// Ark sense.
    #[must_use]
    pub fn count_matching_after_last_marker(&self, tag: &Tag) -> usize {
        self.entries[self.segment_start()..]
            .iter()
            .filter(|entry| {
                matches!(entry, FormattingEntry::Element { tag: existing, .. }
                    if existing.same_name_and_attributes(tag))
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::tokenizer::Attribute;

    fn b() -> Tag {
        Tag::new("b")
    }

    #[test]
    fn fourth_identical_push_evicts_the_earliest() {
        let mut list = ActiveFormattingList::new();
        for handle in 0..4 {
            list.push(handle, b());
        }
        assert_eq!(list.len(), 3);
        assert!(!list.contains(0));
        assert!(list.contains(1) && list.contains(3));
    }

    #[test]
    fn different_attributes_are_not_identical() {
        let mut list = ActiveFormattingList::new();
        for handle in 0..3 {
            list.push(handle, b());
        }
        list.push(3, Tag::with_attributes("b", [Attribute::new("class", "x")]));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn markers_fence_off_earlier_entries() {
        let mut list = ActiveFormattingList::new();
        for handle in 0..3 {
            list.push(handle, b());
        }
        list.push_marker();
        list.push(3, b());
        assert_eq!(list.len(), 5);
        assert_eq!(list.last_element_named("b"), Some((4, 3)));

        list.clear_to_last_marker();
        assert_eq!(list.len(), 3);
        assert_eq!(list.last_element_named("b"), Some((2, 2)));
    }

    #[test]
    fn replace_keeps_the_tag() {
        let mut list = ActiveFormattingList::new();
        list.push(1, Tag::new("i"));
        list.replace(0, 9);
        assert_eq!(list.position(9), Some(0));
        assert_eq!(list.tag_at(0).map(|t| t.name.as_str()), Some("i"));
    }

    /// An operation applied to the list by the property test.
    #[derive(Debug, Clone)]
    enum Op {
        Push(u8, bool),
        Marker,
        Clear,
    }

    impl Arbitrary for Op {
        fn arbitrary(g: &mut Gen) -> Self {
            match u8::arbitrary(g) % 8 {
                0 => Self::Marker,
                1 => Self::Clear,
                _ => Self::Push(u8::arbitrary(g) % 3, bool::arbitrary(g)),
            }
        }
    }

    #[quickcheck]
    fn never_more_than_three_matching_after_last_marker(ops: Vec<Op>) -> bool {
        let names = ["b", "i", "font"];
        let mut list = ActiveFormattingList::new();
        for (handle, op) in ops.into_iter().enumerate() {
            match op {
                Op::Push(name, with_attr) => {
                    let name = names[usize::from(name)];
                    let tag = if with_attr {
                        Tag::with_attributes(name, [Attribute::new("color", "red")])
                    } else {
                        Tag::new(name)
                    };
                    list.push(handle, tag.clone());
                    if list.count_matching_after_last_marker(&tag) > NOAHS_ARK_LIMIT {
                        return false;
                    }
                }
                Op::Marker => list.push_marker(),
                Op::Clear => list.clear_to_last_marker(),
            }
        }
        true
    }
}
