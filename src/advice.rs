//! Rule-based health advice derived from single fields of the record

use serde::Serialize;

use crate::features::FeatureRecord;
use crate::locale::Locale;

/// Fasting glucose above this (mg/dL) triggers the glucose advice
pub const GLUCOSE_LIMIT: f64 = 126.0;
pub const BMI_OBESE: f64 = 30.0;
pub const BMI_OVERWEIGHT: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    GlucoseControl,
    BloodPressure,
    WeightSevere,
    WeightModerate,
    SmokingCessation,
    CardiacMonitoring,
}

impl Advisory {
    /// Short bold lead-in
    pub fn title(&self, locale: Locale) -> &'static str {
        match self {
            Advisory::GlucoseControl => {
                locale.pick("Contrôlez votre glycémie", "Keep your blood sugar in check")
            }
            Advisory::BloodPressure => locale.pick(
                "Contrôlez votre tension artérielle",
                "Keep your blood pressure in check",
            ),
            Advisory::WeightSevere => locale.pick("Gérez votre poids", "Manage your weight"),
            Advisory::WeightModerate => {
                locale.pick("Maintenez un poids santé", "Maintain a healthy weight")
            }
            Advisory::SmokingCessation => locale.pick("Arrêtez de fumer", "Stop smoking"),
            Advisory::CardiacMonitoring => locale.pick(
                "Surveillez votre santé cardiaque",
                "Monitor your heart health",
            ),
        }
    }

    pub fn detail(&self, locale: Locale) -> &'static str {
        match self {
            Advisory::GlucoseControl => locale.pick(
                "Un niveau élevé de glucose peut augmenter le risque d'AVC.",
                "A high glucose level can increase the risk of stroke.",
            ),
            Advisory::BloodPressure => locale.pick(
                "L'hypertension est un facteur de risque majeur d'AVC.",
                "Hypertension is a major risk factor for stroke.",
            ),
            Advisory::WeightSevere => locale.pick(
                "Un indice de masse corporelle élevé augmente le risque d'AVC.",
                "A high body mass index increases the risk of stroke.",
            ),
            Advisory::WeightModerate => locale.pick(
                "Un indice de masse corporelle modéré peut réduire le risque d'AVC.",
                "A moderate body mass index can reduce the risk of stroke.",
            ),
            Advisory::SmokingCessation => locale.pick(
                "Le tabagisme augmente significativement le risque d'AVC.",
                "Smoking significantly increases the risk of stroke.",
            ),
            Advisory::CardiacMonitoring => locale.pick(
                "Les maladies cardiaques sont liées à un risque accru d'AVC.",
                "Heart disease is linked to an increased risk of stroke.",
            ),
        }
    }
}

/// Output of the advice rules; never an empty list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvicePlan {
    Recommendations(Vec<Advisory>),
    NoMajorRiskFactors,
}

impl AdvicePlan {
    pub fn advisories(&self) -> &[Advisory] {
        match self {
            AdvicePlan::Recommendations(list) => list,
            AdvicePlan::NoMajorRiskFactors => &[],
        }
    }

    pub fn congratulation(locale: Locale) -> (&'static str, &'static str) {
        (
            locale.pick("Félicitations !", "Congratulations!"),
            locale.pick(
                "Vos données ne montrent pas de facteurs de risque majeurs pour l'AVC.",
                "Your data shows no major risk factors for stroke.",
            ),
        )
    }
}

/// Apply the five rules in priority order
pub fn generate_advice(record: &FeatureRecord) -> AdvicePlan {
    let mut advice = Vec::new();

    if record.avg_glucose_level() > GLUCOSE_LIMIT {
        advice.push(Advisory::GlucoseControl);
    }
    if record.hypertension().is_present() {
        advice.push(Advisory::BloodPressure);
    }
    let bmi = record.bmi();
    if bmi >= BMI_OBESE {
        advice.push(Advisory::WeightSevere);
    } else if bmi >= BMI_OVERWEIGHT {
        advice.push(Advisory::WeightModerate);
    }
    if record.smoking_status().has_smoked() {
        advice.push(Advisory::SmokingCessation);
    }
    if record.heart_disease().is_present() {
        advice.push(Advisory::CardiacMonitoring);
    }

    if advice.is_empty() {
        AdvicePlan::NoMajorRiskFactors
    } else {
        AdvicePlan::Recommendations(advice)
    }
}
