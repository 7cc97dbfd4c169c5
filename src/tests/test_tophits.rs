use crate::core::SimilarityScores;
use crate::error::{ErrorKind, NetworkError};
use crate::tests::test_data::{abc_scores, make_items, make_matrix, random_symmetric_scores};
use crate::tests::IDENTIFIER;
use crate::tophits::{rank_top_n, select_top_hits, SearchBy};

#[test]
fn test_top_hits_by_queries() {
    let scores = abc_scores();
    let hits = select_top_hits(&scores, IDENTIFIER, 2, SearchBy::Queries, true).unwrap();

    assert_eq!(hits.len(), 3);
    assert_eq!(hits.indices["A"], vec![1, 2]);
    assert_eq!(hits.scores["A"], vec![0.9, 0.5]);
    assert_eq!(hits.candidates("B"), vec![(0, 0.9), (2, 0.3)]);
    assert_eq!(hits.candidates("C"), vec![(0, 0.5), (1, 0.3)]);
    assert!(hits.contains("C", 1));
    assert!(!hits.contains("C", 2));
}

#[test]
fn test_top_hits_truncates_to_n() {
    let hits = select_top_hits(&abc_scores(), IDENTIFIER, 1, SearchBy::Queries, true).unwrap();
    assert_eq!(hits.indices["A"], vec![1]);
    assert_eq!(hits.indices["B"], vec![0]);
    assert_eq!(hits.indices["C"], vec![0]);
}

#[test]
fn test_top_hits_fewer_than_requested() {
    // only two other items exist
    let hits = select_top_hits(&abc_scores(), IDENTIFIER, 20, SearchBy::Queries, true).unwrap();
    for id in ["A", "B", "C"] {
        assert_eq!(hits.indices[id].len(), 2);
    }
    assert!(hits.candidates("missing").is_empty());
}

#[test]
fn test_top_hits_keeps_diagonal_when_asked() {
    let hits = select_top_hits(&abc_scores(), IDENTIFIER, 2, SearchBy::Queries, false).unwrap();
    assert_eq!(hits.candidates("A"), vec![(0, 1.0), (1, 0.9)]);
}

#[test]
fn test_top_hits_rejects_zero() {
    let err = select_top_hits(&abc_scores(), IDENTIFIER, 0, SearchBy::Queries, true).unwrap_err();
    assert!(matches!(err, NetworkError::InvalidParameter { name: "top_n", .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_top_hits_ties_keep_index_order() {
    let scores = SimilarityScores::from_items(
        make_items(&["A", "B", "C", "D"]),
        make_matrix(vec![
            vec![1.0, 0.5, 0.5, 0.5],
            vec![0.5, 1.0, 0.2, 0.2],
            vec![0.5, 0.2, 1.0, 0.2],
            vec![0.5, 0.2, 0.2, 1.0],
        ]),
    )
    .unwrap();
    let hits = select_top_hits(&scores, IDENTIFIER, 2, SearchBy::Queries, true).unwrap();
    assert_eq!(hits.indices["A"], vec![1, 2]);
    assert_eq!(hits.indices["D"], vec![0, 1]);
}

#[test]
fn test_rank_nan_last() {
    let ranked = rank_top_n(&[0.3, f64::NAN, 0.8, 0.1], 4, None);
    let order: Vec<usize> = ranked.iter().map(|&(j, _)| j).collect();
    assert_eq!(order, vec![2, 0, 3, 1]);

    let ranked = rank_top_n(&[0.3, f64::NAN, 0.8, 0.1], 2, Some(2));
    assert_eq!(ranked, vec![(0, 0.3), (3, 0.1)]);
}

#[test]
fn test_top_hits_by_references() {
    let scores = SimilarityScores::new(
        make_items(&["Q1", "Q2", "Q3"]),
        make_items(&["R1", "R2"]),
        make_matrix(vec![vec![0.1, 0.9], vec![0.7, 0.2], vec![0.4, 0.6]]),
    )
    .unwrap();
    let hits = select_top_hits(&scores, IDENTIFIER, 2, SearchBy::References, false).unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits.candidates("R1"), vec![(1, 0.7), (2, 0.4)]);
    assert_eq!(hits.candidates("R2"), vec![(0, 0.9), (2, 0.6)]);
}

#[test]
fn test_top_hits_sorted_and_deterministic() {
    let scores = random_symmetric_scores(40, 7);
    let first = select_top_hits(&scores, IDENTIFIER, 5, SearchBy::Queries, true).unwrap();
    let second = select_top_hits(&scores, IDENTIFIER, 5, SearchBy::Queries, true).unwrap();
    assert_eq!(first, second);

    let ids = scores.query_ids(IDENTIFIER).unwrap();
    for (i, id) in ids.iter().enumerate() {
        let ranked = &first.scores[id];
        assert_eq!(ranked.len(), 5);
        assert!(ranked.windows(2).all(|w| w[0] >= w[1]), "{id} not sorted: {ranked:?}");
        assert!(!first.indices[id].contains(&i), "{id} ranked itself");
    }
}
