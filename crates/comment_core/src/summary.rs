use crate::record::KeywordTally;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverflowBucket {
    pub total: usize,
    pub merged: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordRanking {
    pub top: Vec<KeywordCount>,
    pub overflow: Option<OverflowBucket>,
}

// Count descending, ties by keyword ascending in byte order. Where the bucket
// renders relative to the top entries is the caller's concern.
pub fn rank_keywords(tally: &KeywordTally, limit: usize) -> KeywordRanking {
    let mut entries: Vec<(String, usize)> = tally
        .iter()
        .map(|(keyword, count)| (keyword.to_string(), count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut top = Vec::new();
    let mut overflow_total = 0;
    let mut merged = 0;
    for (keyword, count) in entries {
        if top.len() < limit {
            top.push(KeywordCount { keyword, count });
        } else {
            overflow_total += count;
            merged += 1;
        }
    }

    let overflow = if overflow_total > 0 {
        Some(OverflowBucket {
            total: overflow_total,
            merged,
        })
    } else {
        None
    };

    KeywordRanking { top, overflow }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally_of(entries: &[(&str, usize)]) -> KeywordTally {
        let mut tally = KeywordTally::new();
        for (keyword, count) in entries {
            tally.add(keyword, *count);
        }
        tally
    }

    #[test]
    fn test_top_k_with_ordinal_tie_break_and_overflow() {
        let tally = tally_of(&[("x", 5), ("y", 5), ("z", 3), ("w", 1)]);
        let ranking = rank_keywords(&tally, 2);
        assert_eq!(
            ranking.top,
            vec![
                KeywordCount { keyword: "x".to_string(), count: 5 },
                KeywordCount { keyword: "y".to_string(), count: 5 },
            ]
        );
        assert_eq!(ranking.overflow, Some(OverflowBucket { total: 4, merged: 2 }));
    }

    #[test]
    fn test_sort_is_count_desc_then_keyword_asc() {
        let tally = tally_of(&[("나", 2), ("가", 2), ("다", 7)]);
        let ranking = rank_keywords(&tally, 3);
        let keywords: Vec<&str> = ranking.top.iter().map(|entry| entry.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["다", "가", "나"]);
        assert_eq!(ranking.overflow, None);
    }

    #[test]
    fn test_empty_tally_yields_empty_ranking() {
        let ranking = rank_keywords(&KeywordTally::new(), 5);
        assert!(ranking.top.is_empty());
        assert_eq!(ranking.overflow, None);
    }

    #[test]
    fn test_no_bucket_when_everything_fits() {
        let tally = tally_of(&[("a", 1), ("b", 2)]);
        let ranking = rank_keywords(&tally, 5);
        assert_eq!(ranking.top.len(), 2);
        assert_eq!(ranking.overflow, None);
    }

    #[test]
    fn test_no_bucket_when_excluded_counts_sum_to_zero() {
        let tally = tally_of(&[("a", 3), ("b", 2), ("c", 0)]);
        let ranking = rank_keywords(&tally, 2);
        assert_eq!(ranking.top.len(), 2);
        assert_eq!(ranking.overflow, None);
    }

    #[test]
    fn test_limit_zero_merges_everything() {
        let tally = tally_of(&[("a", 3), ("b", 2)]);
        let ranking = rank_keywords(&tally, 0);
        assert!(ranking.top.is_empty());
        assert_eq!(ranking.overflow, Some(OverflowBucket { total: 5, merged: 2 }));
    }
}
