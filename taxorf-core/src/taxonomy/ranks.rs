//! Total order on the named taxonomic ranks.

/// Recognised ranks from most to least specific. The sentinel `no_rank`
/// deliberately has no entry and is never ranked.
const SORTED_LEVELS: [(&str, u8); 28] = [
    ("forma", 1),
    ("varietas", 2),
    ("subspecies", 3),
    ("species", 4),
    ("species subgroup", 5),
    ("species group", 6),
    ("subgenus", 7),
    ("genus", 8),
    ("subtribe", 9),
    ("tribe", 10),
    ("subfamily", 11),
    ("family", 12),
    ("superfamily", 13),
    ("parvorder", 14),
    ("infraorder", 15),
    ("suborder", 16),
    ("order", 17),
    ("superorder", 18),
    ("infraclass", 19),
    ("subclass", 20),
    ("class", 21),
    ("superclass", 22),
    ("subphylum", 23),
    ("phylum", 24),
    ("superphylum", 25),
    ("subkingdom", 26),
    ("kingdom", 27),
    ("superkingdom", 28),
];

/// Level of a named rank, `forma` = 1 up to `superkingdom` = 28.
///
/// Returns `None` for `no_rank` and for any name that is not a recognised
/// rank.
#[must_use]
pub fn level_of(rank: &str) -> Option<u8> {
    SORTED_LEVELS
        .iter()
        .find(|(name, _)| *name == rank)
        .map(|&(_, level)| level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_of_known_ranks() {
        assert_eq!(level_of("forma"), Some(1));
        assert_eq!(level_of("species"), Some(4));
        assert_eq!(level_of("species subgroup"), Some(5));
        assert_eq!(level_of("genus"), Some(8));
        assert_eq!(level_of("phylum"), Some(24));
        assert_eq!(level_of("superkingdom"), Some(28));
    }

    #[test]
    fn test_level_of_unranked_names() {
        assert_eq!(level_of("no_rank"), None);
        assert_eq!(level_of("clade"), None);
        assert_eq!(level_of(""), None);
        assert_eq!(level_of("Species"), None);
    }

    #[test]
    fn test_levels_are_totally_ordered() {
        let mut seen = [false; 29];
        for (name, _) in SORTED_LEVELS {
            let level = level_of(name).unwrap();
            assert!((1..=28).contains(&level));
            assert!(!seen[level as usize], "duplicate level for {name}");
            seen[level as usize] = true;
        }
    }

    #[test]
    fn test_specific_ranks_are_below_broad_ranks() {
        assert!(level_of("species").unwrap() < level_of("genus").unwrap());
        assert!(level_of("genus").unwrap() < level_of("family").unwrap());
        assert!(level_of("family").unwrap() < level_of("order").unwrap());
        assert!(level_of("order").unwrap() < level_of("class").unwrap());
        assert!(level_of("class").unwrap() < level_of("phylum").unwrap());
        assert!(level_of("phylum").unwrap() < level_of("superkingdom").unwrap());
    }
}
