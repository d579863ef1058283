//! Built-in seed corpora.
//!
//! The shipped classifiers are trained once from these fixed corpora at
//! startup. Replacing them is a configuration concern
//! (see [`crate::config::ClassifierConfig`]).

use super::TrainingExample;

/// Alert priority labels, most urgent first.
pub const ALERT_PRIORITIES: [&str; 4] = ["Critical", "High", "Medium", "Low"];

const ALERT_PRIORITY_SEEDS: &[(&str, &str)] = &[
    ("Critical", "emergency cardiac arrest code blue"),
    ("Critical", "patient unresponsive and not breathing"),
    ("Critical", "severe hemorrhage uncontrolled bleeding"),
    ("Critical", "acute stroke symptoms sudden facial droop"),
    ("Critical", "anaphylaxis severe allergic reaction airway swelling"),
    ("Critical", "oxygen saturation critically low respiratory failure"),
    ("High", "high fever with chest pain"),
    ("High", "abnormal vital signs need urgent review"),
    ("High", "fall with possible head injury"),
    ("High", "medication error reported by nurse"),
    ("High", "blood pressure elevated above threshold"),
    ("Medium", "lab results ready for physician review"),
    ("Medium", "pain medication requested"),
    ("Medium", "wound dressing change due"),
    ("Medium", "scheduled medication round overdue"),
    ("Medium", "mild nausea after meal"),
    ("Low", "routine checkup reminder"),
    ("Low", "extra blanket requested"),
    ("Low", "meal preference update"),
    ("Low", "visitor information request"),
    ("Low", "supply restock needed on ward"),
];

const MEDICAL_RECORD_SEEDS: &[(&str, &str)] = &[
    ("Lab Result", "blood test results hemoglobin glucose panel"),
    ("Lab Result", "complete blood count lab report"),
    ("Lab Result", "urinalysis and culture results"),
    ("Prescription", "prescribed medication dosage twice daily"),
    ("Prescription", "antibiotic prescription amoxicillin refill"),
    ("Prescription", "pharmacy order tablets mg"),
    ("Imaging", "chest xray radiology findings"),
    ("Imaging", "mri scan of the brain"),
    ("Imaging", "ct scan abdomen ultrasound imaging"),
    ("Consultation", "specialist consultation cardiology referral"),
    ("Consultation", "outpatient visit follow up appointment notes"),
    ("Consultation", "physician assessment history and examination"),
    ("Surgical Report", "surgical procedure operative report"),
    ("Surgical Report", "appendectomy performed under general anesthesia"),
    ("Surgical Report", "postoperative surgery incision sutures"),
    ("Vaccination", "influenza vaccine administered"),
    ("Vaccination", "immunization record booster shot"),
    ("Vaccination", "covid vaccination dose"),
];

fn to_examples(seeds: &[(&str, &str)]) -> Vec<TrainingExample> {
    seeds
        .iter()
        .map(|(label, text)| TrainingExample::new(*label, *text))
        .collect()
}

/// Seed corpus for alert priority triage.
#[must_use]
pub fn alert_priority_corpus() -> Vec<TrainingExample> {
    to_examples(ALERT_PRIORITY_SEEDS)
}

/// Seed corpus for medical-record type labelling.
#[must_use]
pub fn medical_record_corpus() -> Vec<TrainingExample> {
    to_examples(MEDICAL_RECORD_SEEDS)
}
