use super::*;

fn v(pairs: &[(&str, f64)]) -> FeatureVector {
    pairs.iter().map(|(k, x)| (*k, *x)).collect()
}

fn weights(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, w)| (k.to_string(), *w)).collect()
}

#[test]
fn test_euclidean_basic() {
    let a = v(&[("x", 0.0), ("y", 0.0)]);
    let b = v(&[("x", 3.0), ("y", 4.0)]);
    assert_eq!(euclidean_distance(&a, &b), 5.0);
}

#[test]
fn test_euclidean_key_union() {
    let a = v(&[("x", 3.0)]);
    let b = v(&[("y", 4.0)]);
    assert_eq!(euclidean_distance(&a, &b), 5.0);
    assert_eq!(euclidean_distance(&b, &a), 5.0);
}

#[test]
fn test_euclidean_identity() {
    let a = v(&[("x", 1.5), ("y", -2.0)]);
    assert_eq!(euclidean_distance(&a, &a.clone()), 0.0);
}

#[test]
fn test_cosine_parallel_and_orthogonal() {
    let a = v(&[("x", 1.0), ("y", 2.0)]);
    let b = v(&[("x", 2.0), ("y", 4.0)]);
    assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-12);

    let c = v(&[("x", 1.0)]);
    let d = v(&[("y", 1.0)]);
    assert_eq!(cosine_similarity(&c, &d), 0.0);
}

#[test]
fn test_cosine_zero_magnitude() {
    let zero = v(&[("x", 0.0)]);
    let a = v(&[("x", 1.0)]);
    assert_eq!(cosine_similarity(&zero, &a), 0.0);
    assert_eq!(cosine_similarity(&FeatureVector::new(), &a), 0.0);
}

#[test]
fn test_knn_identity_candidate() {
    let target = v(&[("a", 0.3), ("b", 0.9)]);
    let candidates = vec![
        SimilarityCandidate::new("other", v(&[("a", 1.0), ("b", 0.0)])),
        SimilarityCandidate::new("same", target.clone()),
    ];
    let ranked = find_knn(&target, &candidates, 2, DistanceMetric::Euclidean);
    assert_eq!(*ranked[0].item, "same");
    assert_eq!(ranked[0].index, 1);
    assert_eq!(ranked[0].distance, 0.0);
    assert_eq!(ranked[0].similarity, 1.0);
}

#[test]
fn test_knn_sorted_ascending() {
    let target = v(&[("x", 0.0)]);
    let candidates: Vec<_> = [5.0, 1.0, 3.0, 2.0]
        .iter()
        .map(|x| SimilarityCandidate::new(*x, v(&[("x", *x)])))
        .collect();
    let ranked = find_knn(&target, &candidates, 4, DistanceMetric::Euclidean);
    let items: Vec<f64> = ranked.iter().map(|n| *n.item).collect();
    assert_eq!(items, vec![1.0, 2.0, 3.0, 5.0]);
    for pair in ranked.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
        assert!(pair[0].similarity >= pair[1].similarity);
    }
}

#[test]
fn test_knn_fewer_candidates_than_k() {
    let target = v(&[("x", 0.0)]);
    let candidates = vec![SimilarityCandidate::new((), v(&[("x", 1.0)]))];
    assert_eq!(find_knn(&target, &candidates, 10, DistanceMetric::Euclidean).len(), 1);
    let none: Vec<SimilarityCandidate<()>> = Vec::new();
    assert!(find_knn(&target, &none, 3, DistanceMetric::Euclidean).is_empty());
}

#[test]
fn test_knn_k_zero() {
    let target = v(&[("x", 0.0)]);
    let candidates = vec![SimilarityCandidate::new((), v(&[("x", 1.0)]))];
    assert!(find_knn(&target, &candidates, 0, DistanceMetric::Euclidean).is_empty());
}

#[test]
fn test_knn_ties_keep_input_order() {
    let target = v(&[("x", 0.0)]);
    let candidates = vec![
        SimilarityCandidate::new("first", v(&[("x", 1.0)])),
        SimilarityCandidate::new("second", v(&[("x", -1.0)])),
    ];
    let ranked = find_knn(&target, &candidates, 2, DistanceMetric::Euclidean);
    assert_eq!(*ranked[0].item, "first");
    assert_eq!(*ranked[1].item, "second");
}

#[test]
fn test_knn_cosine() {
    let target = v(&[("x", 1.0), ("y", 0.0)]);
    let candidates = vec![
        SimilarityCandidate::new("orthogonal", v(&[("y", 5.0)])),
        SimilarityCandidate::new("aligned", v(&[("x", 10.0)])),
    ];
    let ranked = find_knn(&target, &candidates, 2, DistanceMetric::Cosine);
    assert_eq!(*ranked[0].item, "aligned");
    assert!(ranked[0].distance.abs() < 1e-12);
    assert!((ranked[0].similarity - 1.0).abs() < 1e-12);
    assert_eq!(ranked[1].distance, 1.0);
    assert_eq!(ranked[1].similarity, 0.0);
}

#[test]
fn test_weighted_knn_prefers_skill_match() {
    let target = v(&[("skillMatch", 1.0), ("averageRating", 1.0), ("availability", 1.0)]);
    let candidates = vec![
        SimilarityCandidate::new(
            "top-rated",
            v(&[("skillMatch", 0.2), ("averageRating", 1.0), ("availability", 1.0)]),
        ),
        SimilarityCandidate::new(
            "skilled",
            v(&[("skillMatch", 1.0), ("averageRating", 0.0), ("availability", 1.0)]),
        ),
    ];

    // Unweighted, the top-rated candidate is closer (0.8 vs 1.0)
    let plain = find_knn(&target, &candidates, 1, DistanceMetric::Euclidean);
    assert_eq!(*plain[0].item, "top-rated");

    let ranked = find_weighted_knn(&target, &candidates, 1, &weights(&[("skillMatch", 3.0)]));
    assert_eq!(ranked.len(), 1);
    assert_eq!(*ranked[0].item, "skilled");
}

#[test]
fn test_weighted_knn_effect_is_quadratic() {
    let target = v(&[("f", 1.0)]);
    let candidates = vec![SimilarityCandidate::new((), v(&[("f", 0.0)]))];
    let ranked = find_weighted_knn(&target, &candidates, 1, &weights(&[("f", 2.0)]));
    // (2*1 - 2*0)^2 = 4, so distance 2 rather than sqrt(2)
    assert!((ranked[0].distance - 2.0).abs() < 1e-12);
    assert!((ranked[0].similarity - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_weighted_knn_missing_weighted_key() {
    let target = v(&[("f", 1.0)]);
    let candidates = vec![SimilarityCandidate::new((), FeatureVector::new())];
    let ranked = find_weighted_knn(&target, &candidates, 1, &weights(&[("f", 3.0)]));
    assert!((ranked[0].distance - 3.0).abs() < 1e-12);
}

#[test]
fn test_weighted_knn_does_not_mutate_inputs() {
    let target = v(&[("f", 1.0)]);
    let candidates = vec![SimilarityCandidate::new((), v(&[("f", 0.5)]))];
    let _ = find_weighted_knn(&target, &candidates, 1, &weights(&[("f", 4.0)]));
    assert_eq!(target.get("f"), 1.0);
    assert_eq!(candidates[0].features.get("f"), 0.5);
}

#[test]
fn test_apply_weights_ignores_absent_keys() {
    let out = apply_weights(&v(&[("a", 2.0)]), &weights(&[("a", 3.0), ("b", 5.0)]));
    assert_eq!(out.get("a"), 6.0);
    assert!(!out.contains("b"));
}

#[test]
fn test_explain_similarity() {
    let target = v(&[("age", 0.50), ("gender", 1.0), ("severity", 0.0)]);
    let candidate = v(&[("age", 0.55), ("gender", 0.0), ("heartRate", 0.4)]);
    let mut names = BTreeMap::new();
    names.insert("age".to_string(), "age group".to_string());

    let reasons = explain_similarity(&target, &candidate, &names);
    assert_eq!(reasons, vec!["Similar age group: 0.50 vs 0.55".to_string()]);
}

#[test]
fn test_explain_similarity_boundary_and_unnamed() {
    let target = v(&[("a", 0.5)]);
    let candidate = v(&[("a", 0.6)]);
    let reasons = explain_similarity(&target, &candidate, &BTreeMap::new());
    assert_eq!(reasons, vec!["Similar a: 0.50 vs 0.60".to_string()]);
}

#[test]
fn test_explain_similarity_outside_tolerance() {
    let target = v(&[("a", 0.0)]);
    let candidate = v(&[("a", 0.5)]);
    assert!(explain_similarity(&target, &candidate, &BTreeMap::new()).is_empty());
}

#[test]
fn test_metric_from_str() {
    assert_eq!("Cosine".parse::<DistanceMetric>(), Ok(DistanceMetric::Cosine));
    assert_eq!("euclidean".parse::<DistanceMetric>(), Ok(DistanceMetric::Euclidean));
    assert!("manhattan".parse::<DistanceMetric>().is_err());
}

#[test]
fn test_engine_rank_normalizes_shared_basis() {
    let target = v(&[("age", 30.0), ("rating", 5.0)]);
    let candidates = vec![
        SimilarityCandidate::new("low-rated", v(&[("age", 31.0), ("rating", 1.0)])),
        SimilarityCandidate::new("close", v(&[("age", 40.0), ("rating", 5.0)])),
        SimilarityCandidate::new("old", v(&[("age", 80.0), ("rating", 5.0)])),
    ];

    // Raw age differences dominate the raw distance
    let raw = find_knn(&target, &candidates, 1, DistanceMetric::Euclidean);
    assert_eq!(*raw[0].item, "low-rated");

    // Normalized, both features span [0, 1]
    let ranked = SimilarityEngine::new(3).rank(&target, &candidates);
    assert_eq!(*ranked[0].item, "close");
    assert!((ranked[0].distance - 0.2).abs() < 1e-12);
    assert_eq!(ranked.len(), 3);
}

#[test]
fn test_engine_rank_identical_after_normalization() {
    let target = v(&[("a", 10.0)]);
    let candidates = vec![
        SimilarityCandidate::new(1, v(&[("a", 10.0)])),
        SimilarityCandidate::new(2, v(&[("a", 20.0)])),
    ];
    let ranked = SimilarityEngine::new(1).rank(&target, &candidates);
    assert_eq!(*ranked[0].item, 1);
    assert_eq!(ranked[0].distance, 0.0);
    assert_eq!(ranked[0].similarity, 1.0);
}

#[test]
fn test_engine_rank_weighted() {
    let target = v(&[("skillMatch", 1.0), ("averageRating", 5.0)]);
    let candidates = vec![
        SimilarityCandidate::new("top-rated", v(&[("skillMatch", 0.2), ("averageRating", 5.0)])),
        SimilarityCandidate::new("skilled", v(&[("skillMatch", 1.0), ("averageRating", 3.5)])),
    ];
    let engine = SimilarityEngine::new(1);
    let ranked = engine.rank_weighted(&target, &candidates, &weights(&[("skillMatch", 3.0)]));
    assert_eq!(*ranked[0].item, "skilled");
}

#[test]
fn test_engine_cosine_metric() {
    let engine = SimilarityEngine::new(2).with_metric(DistanceMetric::Cosine);
    assert_eq!(engine.metric(), DistanceMetric::Cosine);
    assert_eq!(engine.k(), 2);
}

#[test]
fn test_engine_explain_tolerance() {
    let engine = SimilarityEngine::new(1).with_explain_tolerance(1.0);
    let reasons = engine.explain(&v(&[("a", 0.0)]), &v(&[("a", 0.9)]), &BTreeMap::new());
    assert_eq!(reasons.len(), 1);
}
