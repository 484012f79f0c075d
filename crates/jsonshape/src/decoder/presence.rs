/// Which declared fields of one object have been supplied so far.
///
/// Sized once from the record's field count. Records with up to 64 fields
/// keep their bits inline; larger ones spill into a word vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PresenceSet {
    Inline(u64),
    Spilled(Vec<u64>),
}

impl PresenceSet {
    pub(crate) fn with_capacity(fields: usize) -> Self {
        if fields <= 64 {
            PresenceSet::Inline(0)
        } else {
            PresenceSet::Spilled(vec![0; fields.div_ceil(64)])
        }
    }

    /// Marks `index` present. Returns `false` if it already was.
    pub(crate) fn insert(&mut self, index: usize) -> bool {
        let (word, bit) = match self {
            PresenceSet::Inline(word) => (word, index),
            PresenceSet::Spilled(words) => match words.get_mut(index / 64) {
                Some(word) => (word, index % 64),
                None => return false,
            },
        };
        let mask = 1u64 << bit;
        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        match self {
            PresenceSet::Inline(word) => index < 64 && word & (1u64 << index) != 0,
            PresenceSet::Spilled(words) => words
                .get(index / 64)
                .is_some_and(|word| word & (1u64 << (index % 64)) != 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::empty(0)]
    #[case::small(3)]
    #[case::word(64)]
    #[case::spilled(65)]
    #[case::wide(200)]
    fn second_insert_reports_duplicate(#[case] fields: usize) {
        let mut set = PresenceSet::with_capacity(fields);
        for index in 0..fields {
            assert!(!set.contains(index));
            assert!(set.insert(index), "first insert of {index}");
            assert!(!set.insert(index), "second insert of {index}");
            assert!(set.contains(index));
        }
    }

    #[test]
    fn inline_up_to_one_word() {
        assert_eq!(PresenceSet::with_capacity(64), PresenceSet::Inline(0));
        assert_eq!(
            PresenceSet::with_capacity(65),
            PresenceSet::Spilled(vec![0, 0])
        );
    }

    #[test]
    fn bits_are_independent() {
        let mut set = PresenceSet::with_capacity(130);
        assert!(set.insert(129));
        assert!(!set.contains(1));
        assert!(!set.contains(65));
        assert!(set.contains(129));
    }
}
