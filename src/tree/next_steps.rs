//! Prediction guidance table.
//!
//! Maps each terminal prediction to a short description and the ordered
//! steps a care team should take. Unknown predictions fall back to
//! [`GENERIC_GUIDANCE`] instead of failing the decision.

/// Description and next steps for one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guidance {
    /// Human-readable recommendation
    pub description: &'static str,
    /// Ordered follow-up actions
    pub steps: &'static [&'static str],
}

/// Guidance for predictions absent from the table.
pub const GENERIC_GUIDANCE: Guidance = Guidance {
    description: "Clinical review required",
    steps: &[
        "Review patient status with the attending physician",
        "Reassess vital signs within 24 hours",
        "Document clinical findings in the patient record",
    ],
};

/// Looks up guidance for `prediction`.
#[must_use]
pub fn guidance(prediction: &str) -> Option<Guidance> {
    let found = match prediction {
        "ICU_ADMISSION" => Guidance {
            description: "Admit to the intensive care unit",
            steps: &[
                "Page the ICU team immediately",
                "Start continuous cardiopulmonary monitoring",
                "Secure airway and administer supplemental oxygen",
                "Obtain arterial blood gas and stat labs",
            ],
        },
        "INTENSIVE_MONITORING" => Guidance {
            description: "Move to continuous monitoring",
            steps: &[
                "Attach continuous ECG monitoring",
                "Check vital signs every 15 minutes",
                "Order 12-lead ECG and electrolytes",
            ],
        },
        "INFECTION_WORKUP" => Guidance {
            description: "Start an infection workup",
            steps: &[
                "Draw blood cultures before antibiotics",
                "Order complete blood count and lactate",
                "Inspect surgical sites and lines for infection",
                "Consider empiric antibiotics per sepsis protocol",
            ],
        },
        "HYPERTENSION_MANAGEMENT" => Guidance {
            description: "Bring blood pressure under control",
            steps: &[
                "Repeat blood pressure measurement in 15 minutes",
                "Review antihypertensive medication",
                "Screen for end-organ damage symptoms",
            ],
        },
        "FALL_PREVENTION" => Guidance {
            description: "Apply the fall prevention protocol",
            steps: &[
                "Set bed to lowest position with rails up",
                "Place non-slip footwear and call bell within reach",
                "Schedule hourly rounding",
            ],
        },
        "GERIATRIC_ASSESSMENT" => Guidance {
            description: "Request a comprehensive geriatric assessment",
            steps: &[
                "Refer to the geriatrics service",
                "Review medications for polypharmacy",
                "Screen cognition and nutrition",
            ],
        },
        "PAIN_MANAGEMENT" => Guidance {
            description: "Establish a pain management plan",
            steps: &[
                "Reassess pain score after each intervention",
                "Review analgesic regimen with the physician",
                "Consider a pain service consultation",
            ],
        },
        "DISCHARGE_PLANNING" => Guidance {
            description: "Review the discharge plan",
            steps: &[
                "Hold a multidisciplinary discharge meeting",
                "Identify barriers to discharge",
                "Coordinate with social work",
            ],
        },
        "PHYSICAL_THERAPY" => Guidance {
            description: "Start physical therapy",
            steps: &[
                "Refer to physical therapy",
                "Encourage assisted mobilization twice daily",
            ],
        },
        "STANDARD_CARE" => Guidance {
            description: "Continue standard ward care",
            steps: &[
                "Continue routine vital sign checks",
                "Follow the current care plan",
            ],
        },
        "NOT_READY" => Guidance {
            description: "Not ready for discharge",
            steps: &[
                "Continue inpatient treatment",
                "Reassess discharge readiness in 24 hours",
            ],
        },
        "NEEDS_REHABILITATION" => Guidance {
            description: "Discharge to a rehabilitation facility",
            steps: &[
                "Refer to inpatient rehabilitation",
                "Send mobility assessment with the referral",
            ],
        },
        "HOME_WITH_SUPPORT" => Guidance {
            description: "Discharge home with support services",
            steps: &[
                "Arrange home nursing visits",
                "Confirm a caregiver is available",
                "Schedule follow-up within 7 days",
            ],
        },
        "OBSERVE_24H" => Guidance {
            description: "Observe for another 24 hours",
            steps: &[
                "Continue observation for 24 hours",
                "Repeat discharge readiness assessment tomorrow",
            ],
        },
        "READY_WITH_FOLLOWUP" => Guidance {
            description: "Ready for discharge with outpatient follow-up",
            steps: &[
                "Schedule specialist follow-up for the chronic condition",
                "Reconcile discharge medications",
                "Provide written discharge instructions",
            ],
        },
        "READY" => Guidance {
            description: "Ready for discharge",
            steps: &[
                "Reconcile discharge medications",
                "Provide written discharge instructions",
            ],
        },
        _ => return None,
    };
    Some(found)
}

/// Guidance for `prediction`, or [`GENERIC_GUIDANCE`] if unknown.
#[must_use]
pub fn guidance_or_generic(prediction: &str) -> Guidance {
    guidance(prediction).unwrap_or_else(|| {
        tracing::warn!(prediction, "no guidance for prediction, using generic steps");
        GENERIC_GUIDANCE
    })
}
