//! Boundary adapters from domain documents to feature vectors.
//!
//! Callers fetch patients, volunteers and doctors from their own storage and
//! hand them over as these serde documents (camelCase field names). Every
//! optional field that is absent becomes `0.0`, and booleans become `1.0` or
//! `0.0`, through [`FeatureValue`].
//!
//! Categorical encodings:
//!
//! | field    | encoding                                   |
//! |----------|--------------------------------------------|
//! | gender   | male `0.0`, female `1.0`, other `0.5`      |
//! | severity | normal `0.0`, warning `0.5`, critical `1.0` |

use crate::primitives::{FeatureValue, FeatureVector, RawFeatures};
use serde::{Deserialize, Serialize};

/// Patient gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Encoded as 0.0
    Male,
    /// Encoded as 1.0
    Female,
    /// Encoded as 0.5
    Other,
}

impl Gender {
    /// Numeric encoding.
    #[must_use]
    pub fn encode(self) -> f64 {
        match self {
            Gender::Male => 0.0,
            Gender::Female => 1.0,
            Gender::Other => 0.5,
        }
    }
}

/// Status of the most recent vitals reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Encoded as 0.0
    Normal,
    /// Encoded as 0.5
    Warning,
    /// Encoded as 1.0
    Critical,
}

impl Severity {
    /// Numeric encoding.
    #[must_use]
    pub fn encode(self) -> f64 {
        match self {
            Severity::Normal => 0.0,
            Severity::Warning => 0.5,
            Severity::Critical => 1.0,
        }
    }
}

/// A single vitals reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vitals {
    /// Beats per minute
    pub heart_rate: Option<f64>,
    /// mmHg
    pub blood_pressure_systolic: Option<f64>,
    /// mmHg
    pub blood_pressure_diastolic: Option<f64>,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// SpO2 percentage
    pub oxygen_saturation: Option<f64>,
    /// Breaths per minute
    pub respiratory_rate: Option<f64>,
    /// Reading status
    pub severity: Option<Severity>,
}

/// Patient document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientProfile {
    /// Age in years
    pub age: Option<f64>,
    /// Gender
    pub gender: Option<Gender>,
    /// Latest vitals
    pub vitals: Option<Vitals>,
    /// Active diagnoses
    pub conditions: Vec<String>,
    /// Current medications
    pub medications: Vec<String>,
    /// Days since admission
    pub days_admitted: Option<f64>,
    /// 0 (bedbound) to 5 (independent)
    pub mobility_score: Option<f64>,
    /// 0 to 10
    pub pain_level: Option<f64>,
    /// Surgery within the last week
    pub recent_surgery: Option<bool>,
    /// Overrides the chronic flag derived from `conditions`
    pub has_chronic_condition: Option<bool>,
}

impl PatientProfile {
    /// Explicit chronic flag, or whether any condition is recorded.
    #[must_use]
    pub fn chronic(&self) -> bool {
        self.has_chronic_condition
            .unwrap_or(!self.conditions.is_empty())
    }

    fn vital(&self, read: impl Fn(&Vitals) -> Option<f64>) -> Option<f64> {
        self.vitals.as_ref().and_then(read)
    }
}

/// Volunteer document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolunteerProfile {
    /// Skills offered
    pub skills: Vec<String>,
    /// Languages spoken
    pub languages: Vec<String>,
    /// Mean rating, 0 to 5
    pub average_rating: Option<f64>,
    /// Tasks completed so far
    pub completed_tasks: Option<f64>,
    /// Years volunteering
    pub years_experience: Option<f64>,
    /// Currently accepting tasks
    pub available: Option<bool>,
}

/// Doctor document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoctorProfile {
    /// Primary specialization
    pub specialization: Option<String>,
    /// Years in practice
    pub years_experience: Option<f64>,
    /// Mean rating, 0 to 5
    pub average_rating: Option<f64>,
    /// Patients currently assigned
    pub current_patient_load: Option<f64>,
    /// Maximum patients
    pub max_patient_load: Option<f64>,
    /// Languages spoken
    pub languages: Vec<String>,
}

fn resolve<const N: usize>(entries: [(&str, FeatureValue); N]) -> FeatureVector {
    let raw: RawFeatures = entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    FeatureVector::from_raw(&raw)
}

/// Similarity features for patient matching.
///
/// Produces `age`, `gender`, `severity`, the vitals (`heartRate`,
/// `bloodPressureSystolic`, `bloodPressureDiastolic`, `temperature`,
/// `oxygenSaturation`, `respiratoryRate`), `conditionCount` and
/// `medicationCount`.
#[must_use]
pub fn extract_patient_features(patient: &PatientProfile) -> FeatureVector {
    resolve([
        ("age", patient.age.into()),
        ("gender", patient.gender.map(Gender::encode).into()),
        (
            "severity",
            patient
                .vitals
                .as_ref()
                .and_then(|v| v.severity)
                .map(Severity::encode)
                .into(),
        ),
        ("heartRate", patient.vital(|v| v.heart_rate).into()),
        (
            "bloodPressureSystolic",
            patient.vital(|v| v.blood_pressure_systolic).into(),
        ),
        (
            "bloodPressureDiastolic",
            patient.vital(|v| v.blood_pressure_diastolic).into(),
        ),
        ("temperature", patient.vital(|v| v.temperature).into()),
        ("oxygenSaturation", patient.vital(|v| v.oxygen_saturation).into()),
        ("respiratoryRate", patient.vital(|v| v.respiratory_rate).into()),
        ("conditionCount", (patient.conditions.len() as f64).into()),
        ("medicationCount", (patient.medications.len() as f64).into()),
    ])
}

/// Features read by the care-path and discharge-readiness trees.
#[must_use]
pub fn patient_decision_features(patient: &PatientProfile) -> FeatureVector {
    resolve([
        ("oxygenSaturation", patient.vital(|v| v.oxygen_saturation).into()),
        ("heartRate", patient.vital(|v| v.heart_rate).into()),
        (
            "bloodPressureSystolic",
            patient.vital(|v| v.blood_pressure_systolic).into(),
        ),
        ("temperature", patient.vital(|v| v.temperature).into()),
        ("recentSurgery", patient.recent_surgery.into()),
        ("age", patient.age.into()),
        ("mobilityScore", patient.mobility_score.into()),
        ("painLevel", patient.pain_level.into()),
        ("daysAdmitted", patient.days_admitted.into()),
        ("hasChronicCondition", patient.chronic().into()),
    ])
}

/// Fraction of `required` found in `offered`, compared case-insensitively.
///
/// Nothing required counts as a full match.
fn match_fraction(required: &[String], offered: &[String]) -> f64 {
    if required.is_empty() {
        return 1.0;
    }
    let hits = required
        .iter()
        .filter(|need| offered.iter().any(|have| have.eq_ignore_ascii_case(need)))
        .count();
    hits as f64 / required.len() as f64
}

/// Matching features for a volunteer against a task's required skills.
///
/// `skillMatch` is the fraction of required skills the volunteer offers.
#[must_use]
pub fn extract_volunteer_features(
    volunteer: &VolunteerProfile,
    required_skills: &[String],
) -> FeatureVector {
    resolve([
        (
            "skillMatch",
            match_fraction(required_skills, &volunteer.skills).into(),
        ),
        ("averageRating", volunteer.average_rating.into()),
        ("completedTasks", volunteer.completed_tasks.into()),
        ("yearsExperience", volunteer.years_experience.into()),
        ("availability", volunteer.available.into()),
        ("languageCount", (volunteer.languages.len() as f64).into()),
    ])
}

/// Matching features for a doctor against a needed specialization.
///
/// `availableCapacity` is the free share of the doctor's patient load,
/// clamped to [0, 1]; a doctor without a load limit has none.
#[must_use]
pub fn extract_doctor_features(
    doctor: &DoctorProfile,
    required_specialization: Option<&str>,
) -> FeatureVector {
    let specialization_match = match (required_specialization, doctor.specialization.as_deref()) {
        (None, _) => true,
        (Some(needed), Some(has)) => needed.eq_ignore_ascii_case(has),
        (Some(_), None) => false,
    };

    let current = doctor.current_patient_load.unwrap_or(0.0);
    let capacity = match doctor.max_patient_load {
        Some(max) if max > 0.0 => ((max - current) / max).clamp(0.0, 1.0),
        _ => 0.0,
    };

    resolve([
        ("specializationMatch", specialization_match.into()),
        ("yearsExperience", doctor.years_experience.into()),
        ("averageRating", doctor.average_rating.into()),
        ("patientLoad", doctor.current_patient_load.into()),
        ("availableCapacity", capacity.into()),
        ("languageCount", (doctor.languages.len() as f64).into()),
    ])
}
