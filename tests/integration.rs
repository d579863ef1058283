//! Integration tests for the clinical decision engine.
//!
//! These tests drive end-to-end workflows through `ClinicalEngine`, the way
//! a request handler would after fetching domain documents.

use clinical_decision::extract::{
    extract_patient_features, extract_volunteer_features, patient_decision_features, Gender,
    PatientProfile, Severity, Vitals, VolunteerProfile,
};
use clinical_decision::prelude::*;
use std::collections::BTreeMap;

fn engine() -> ClinicalEngine {
    ClinicalEngine::with_defaults().expect("shipped models are valid")
}

#[test]
fn test_alert_triage_critical() {
    let engine = engine();
    let result = engine.classify_alert_priority(
        Some("emergency cardiac arrest"),
        Some("code blue in ICU bed 3"),
    );

    assert_eq!(result.label, "Critical");
    let best = result.confidence();
    for (label, score) in &result.scores {
        assert!(*score <= best, "{label} outranks Critical");
    }
    let total: f64 = result.scores.values().sum();
    assert!((total - 1.0).abs() < 1e-6);
}

#[test]
fn test_alert_triage_cardiac_arrest_code_blue() {
    let engine = engine();
    let result =
        engine.classify_alert_priority(Some("emergency cardiac arrest"), Some("code blue"));
    assert_eq!(result.label, "Critical");
    assert!(result.confidence() > 0.5);
}

#[test]
fn test_discharge_blocked_by_low_oxygen() {
    let engine = engine();
    let patient = PatientProfile {
        age: Some(60.0),
        vitals: Some(Vitals {
            oxygen_saturation: Some(85.0),
            temperature: Some(36.9),
            ..Vitals::default()
        }),
        mobility_score: Some(5.0),
        days_admitted: Some(5.0),
        ..PatientProfile::default()
    };

    let result = engine.discharge_readiness(&patient_decision_features(&patient));
    assert_eq!(result.recommendation, "NOT_READY");
    assert_eq!(result.rule_path.len(), 2);
    assert!(result.reasoning.contains("Oxygen saturation below 92%"));
    assert!(!result.next_steps.is_empty());
}

#[test]
fn test_weighted_matching_prefers_skills() {
    let engine = engine();
    let target = FeatureVector::new()
        .with("skillMatch", 1.0)
        .with("averageRating", 5.0);
    let candidates = vec![
        SimilarityCandidate::new(
            "skilled",
            FeatureVector::new()
                .with("skillMatch", 1.0)
                .with("averageRating", 4.0),
        ),
        SimilarityCandidate::new(
            "popular",
            FeatureVector::new()
                .with("skillMatch", 0.2)
                .with("averageRating", 4.8),
        ),
    ];

    let unweighted = engine.find_knn(&target, &candidates, 1, DistanceMetric::Euclidean);
    assert_eq!(*unweighted[0].item, "popular");

    let weights = BTreeMap::from([("skillMatch".to_string(), 3.0)]);
    let weighted = engine.find_weighted_knn(&target, &candidates, 1, &weights);
    assert_eq!(weighted.len(), 1);
    assert_eq!(*weighted[0].item, "skilled");
    assert!((weighted[0].distance - 1.0).abs() < 1e-12);
}

#[test]
fn test_care_path_normal_vitals() {
    let engine = engine();
    let patient = PatientProfile {
        age: Some(45.0),
        gender: Some(Gender::Male),
        vitals: Some(Vitals {
            heart_rate: Some(72.0),
            blood_pressure_systolic: Some(118.0),
            blood_pressure_diastolic: Some(76.0),
            temperature: Some(36.8),
            oxygen_saturation: Some(98.0),
            respiratory_rate: Some(14.0),
            severity: Some(Severity::Normal),
        }),
        days_admitted: Some(2.0),
        mobility_score: Some(5.0),
        pain_level: Some(1.0),
        recent_surgery: Some(false),
        ..PatientProfile::default()
    };

    let result = engine.care_path(&patient_decision_features(&patient));
    assert_eq!(result.recommendation, "STANDARD_CARE");
    assert_eq!(result.rule_path.len(), result.trace.len() + 1);
    assert!(result.reasoning.starts_with("Oxygen saturation below 90%"));
}

#[test]
fn test_record_type_classification() {
    let engine = engine();
    let result = engine.classify_medical_record_type(
        Some("Prescription"),
        Some("antibiotic amoxicillin twice daily"),
        Some("otitis media"),
    );
    assert_eq!(result.label, "Prescription");
}

#[test]
fn test_similar_patient_search_with_explanations() {
    let engine = engine();
    let make = |age: f64, hr: f64, severity: Severity| PatientProfile {
        age: Some(age),
        gender: Some(Gender::Female),
        vitals: Some(Vitals {
            heart_rate: Some(hr),
            severity: Some(severity),
            ..Vitals::default()
        }),
        ..PatientProfile::default()
    };

    let target = extract_patient_features(&make(70.0, 90.0, Severity::Warning));
    let candidates = vec![
        SimilarityCandidate::new("p1", extract_patient_features(&make(30.0, 60.0, Severity::Normal))),
        SimilarityCandidate::new("p2", extract_patient_features(&make(72.0, 92.0, Severity::Warning))),
        SimilarityCandidate::new("p3", extract_patient_features(&make(85.0, 130.0, Severity::Critical))),
    ];

    let ranked = engine.similarity().rank(&target, &candidates);
    assert_eq!(ranked.len(), 3);
    assert_eq!(*ranked[0].item, "p2");
    assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));

    let names = BTreeMap::from([("severity".to_string(), "severity".to_string())]);
    let reasons = engine
        .similarity()
        .explain(&target, &candidates[1].features, &names);
    assert!(reasons.contains(&"Similar severity: 0.50 vs 0.50".to_string()));
}

#[test]
fn test_volunteer_matching_pipeline() {
    let engine = engine();
    let required: Vec<String> = vec!["driving".into(), "first aid".into()];
    let volunteer = |skills: &[&str], rating: f64| VolunteerProfile {
        skills: skills.iter().map(ToString::to_string).collect(),
        average_rating: Some(rating),
        available: Some(true),
        ..VolunteerProfile::default()
    };

    let target = FeatureVector::new()
        .with("skillMatch", 1.0)
        .with("averageRating", 5.0)
        .with("availability", 1.0);
    let pool = vec![
        SimilarityCandidate::new("a", extract_volunteer_features(&volunteer(&["cooking"], 5.0), &required)),
        SimilarityCandidate::new(
            "b",
            extract_volunteer_features(&volunteer(&["Driving", "First Aid"], 3.5), &required),
        ),
    ];

    let weights = BTreeMap::from([("skillMatch".to_string(), 3.0)]);
    let ranked = engine.similarity().rank_weighted(&target, &pool, &weights);
    assert_eq!(*ranked[0].item, "b");
}

#[test]
fn test_exported_tree_cannot_change_engine() {
    let engine = engine();
    let mut exported = engine.export_tree(TreeKind::CarePath);
    exported.nodes.truncate(1);
    exported.root = 0;

    let fresh = engine.export_tree(TreeKind::CarePath);
    assert_eq!(fresh.nodes.len(), 23);
    assert_eq!(
        engine
            .care_path(&FeatureVector::new().with("oxygenSaturation", 97.0))
            .recommendation,
        "PHYSICAL_THERAPY"
    );
}

#[test]
fn test_decision_result_json_shape() {
    let engine = engine();
    let result = engine.discharge_readiness(&FeatureVector::new().with("oxygenSaturation", 85.0));
    let json = serde_json::to_value(&result).expect("serialize");

    assert_eq!(json["recommendation"], "NOT_READY");
    assert!(json["rulePath"].is_array());
    assert!(json["nextSteps"].is_array());
    assert!(json["reasoning"].is_string());
}

#[test]
fn test_untrained_classifier_sentinel() {
    let classifier = TextClassifier::new();
    let result = classifier.predict("anything at all");
    assert_eq!(result.label, "");
    assert!(result.scores.is_empty());
    assert!(matches!(
        classifier.try_predict("anything at all"),
        Err(EngineError::NoTrainedLabels)
    ));
}
