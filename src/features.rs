//! Patient feature record and the domains of its ten fields
//!
//! A [`FeatureRecord`] can only be obtained through validation, so anything
//! holding one may assume every field is inside its declared domain. The
//! record is converted to a column-named [`FeatureRow`] only when it crosses
//! into the model.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::deserializers::de_string_forgiving;

pub const AGE_RANGE: RangeInclusive<u32> = 18..=100;
pub const GLUCOSE_RANGE: RangeInclusive<f64> = 50.0..=300.0;
pub const BMI_RANGE: RangeInclusive<f64> = 10.0..=70.0;

pub const DEFAULT_AGE: u32 = 50;
pub const DEFAULT_GLUCOSE: f64 = 120.0;
pub const DEFAULT_BMI: f64 = 25.0;

/// A fixed set of choices rendered as a selector and parsed from its exact label.
pub trait Choice: Sized + Copy + PartialEq + 'static {
    /// Every allowed value, in display order. The first one is the form default.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse_choice(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.iter().copied().find(|c| c.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Choice for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female, Gender::Other];

    fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// 0/1 indicator used for hypertension and heart disease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Indicator {
    Absent,
    Present,
}

impl Indicator {
    pub fn is_present(self) -> bool {
        self == Indicator::Present
    }

    pub fn as_number(self) -> f64 {
        match self {
            Indicator::Absent => 0.0,
            Indicator::Present => 1.0,
        }
    }
}

impl Choice for Indicator {
    const ALL: &'static [Self] = &[Indicator::Absent, Indicator::Present];

    fn as_str(&self) -> &'static str {
        match self {
            Indicator::Absent => "0",
            Indicator::Present => "1",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EverMarried {
    Yes,
    No,
}

impl Choice for EverMarried {
    const ALL: &'static [Self] = &[EverMarried::Yes, EverMarried::No];

    fn as_str(&self) -> &'static str {
        match self {
            EverMarried::Yes => "Yes",
            EverMarried::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkType {
    Private,
    SelfEmployed,
    GovtJob,
    Children,
    NeverWorked,
}

impl Choice for WorkType {
    const ALL: &'static [Self] = &[
        WorkType::Private,
        WorkType::SelfEmployed,
        WorkType::GovtJob,
        WorkType::Children,
        WorkType::NeverWorked,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            WorkType::Private => "Private",
            WorkType::SelfEmployed => "Self-employed",
            WorkType::GovtJob => "Govt_job",
            WorkType::Children => "children",
            WorkType::NeverWorked => "Never_worked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidenceType {
    Urban,
    Rural,
}

impl Choice for ResidenceType {
    const ALL: &'static [Self] = &[ResidenceType::Urban, ResidenceType::Rural];

    fn as_str(&self) -> &'static str {
        match self {
            ResidenceType::Urban => "Urban",
            ResidenceType::Rural => "Rural",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmokingStatus {
    NeverSmoked,
    FormerlySmoked,
    Smokes,
    Unknown,
}

impl SmokingStatus {
    /// Current and former smokers both count as a smoking history.
    pub fn has_smoked(self) -> bool {
        matches!(self, SmokingStatus::Smokes | SmokingStatus::FormerlySmoked)
    }
}

impl Choice for SmokingStatus {
    const ALL: &'static [Self] = &[
        SmokingStatus::NeverSmoked,
        SmokingStatus::FormerlySmoked,
        SmokingStatus::Smokes,
        SmokingStatus::Unknown,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SmokingStatus::NeverSmoked => "never smoked",
            SmokingStatus::FormerlySmoked => "formerly smoked",
            SmokingStatus::Smokes => "smokes",
            SmokingStatus::Unknown => "Unknown",
        }
    }
}

/// Why a submitted form could not become a [`FeatureRecord`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("field '{field}' is not a number: '{raw}'")]
    NotANumber { field: &'static str, raw: String },

    #[error("field '{field}' = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("field '{field}' has unknown choice '{raw}'")]
    UnknownChoice { field: &'static str, raw: String },
}

/// Ten validated patient attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRecord {
    age: u32,
    avg_glucose_level: f64,
    bmi: f64,
    gender: Gender,
    hypertension: Indicator,
    heart_disease: Indicator,
    ever_married: EverMarried,
    work_type: WorkType,
    residence_type: ResidenceType,
    smoking_status: SmokingStatus,
}

impl FeatureRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        age: u32,
        avg_glucose_level: f64,
        bmi: f64,
        gender: Gender,
        hypertension: Indicator,
        heart_disease: Indicator,
        ever_married: EverMarried,
        work_type: WorkType,
        residence_type: ResidenceType,
        smoking_status: SmokingStatus,
    ) -> Result<Self, FeatureError> {
        if !AGE_RANGE.contains(&age) {
            return Err(FeatureError::OutOfRange {
                field: "age",
                value: age as f64,
                min: *AGE_RANGE.start() as f64,
                max: *AGE_RANGE.end() as f64,
            });
        }
        check_real("avg_glucose_level", avg_glucose_level, &GLUCOSE_RANGE)?;
        check_real("bmi", bmi, &BMI_RANGE)?;

        Ok(Self {
            age,
            avg_glucose_level,
            bmi,
            gender,
            hypertension,
            heart_disease,
            ever_married,
            work_type,
            residence_type,
            smoking_status,
        })
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn avg_glucose_level(&self) -> f64 {
        self.avg_glucose_level
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn hypertension(&self) -> Indicator {
        self.hypertension
    }

    pub fn heart_disease(&self) -> Indicator {
        self.heart_disease
    }

    pub fn ever_married(&self) -> EverMarried {
        self.ever_married
    }

    pub fn work_type(&self) -> WorkType {
        self.work_type
    }

    pub fn residence_type(&self) -> ResidenceType {
        self.residence_type
    }

    pub fn smoking_status(&self) -> SmokingStatus {
        self.smoking_status
    }

    /// Tabular view with the column names the classifier was trained on
    pub fn to_row(&self) -> FeatureRow {
        FeatureRow {
            cells: vec![
                ("age", FeatureValue::Number(self.age as f64)),
                (
                    "avg_glucose_level",
                    FeatureValue::Number(self.avg_glucose_level),
                ),
                ("bmi", FeatureValue::Number(self.bmi)),
                ("gender", FeatureValue::Category(self.gender.as_str())),
                (
                    "hypertension",
                    FeatureValue::Number(self.hypertension.as_number()),
                ),
                (
                    "heart_disease",
                    FeatureValue::Number(self.heart_disease.as_number()),
                ),
                (
                    "ever_married",
                    FeatureValue::Category(self.ever_married.as_str()),
                ),
                ("work_type", FeatureValue::Category(self.work_type.as_str())),
                (
                    "Residence_type",
                    FeatureValue::Category(self.residence_type.as_str()),
                ),
                (
                    "smoking_status",
                    FeatureValue::Category(self.smoking_status.as_str()),
                ),
            ],
        }
    }
}

fn check_real(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), FeatureError> {
    // NaN fails `contains`, so it lands here too
    if !range.contains(&value) {
        return Err(FeatureError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(())
}

/// One cell handed to the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Category(&'static str),
}

/// Single-row table of named columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    cells: Vec<(&'static str, FeatureValue)>,
}

impl FeatureRow {
    pub fn get(&self, column: &str) -> Option<FeatureValue> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Form submission as received, before any validation.
///
/// Values may arrive as strings (urlencoded form) or as JSON numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeatureForm {
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub age: String,
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub avg_glucose_level: String,
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub bmi: String,
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub gender: String,
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub hypertension: String,
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub heart_disease: String,
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub ever_married: String,
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub work_type: String,
    #[serde(default, alias = "Residence_type", deserialize_with = "de_string_forgiving")]
    pub residence_type: String,
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub smoking_status: String,
}

impl RawFeatureForm {
    /// Form state as first shown to the user
    pub fn defaults() -> Self {
        Self {
            age: DEFAULT_AGE.to_string(),
            avg_glucose_level: format!("{DEFAULT_GLUCOSE:.1}"),
            bmi: format!("{DEFAULT_BMI:.1}"),
            gender: Gender::ALL[0].as_str().to_string(),
            hypertension: Indicator::ALL[0].as_str().to_string(),
            heart_disease: Indicator::ALL[0].as_str().to_string(),
            ever_married: EverMarried::ALL[0].as_str().to_string(),
            work_type: WorkType::ALL[0].as_str().to_string(),
            residence_type: ResidenceType::ALL[0].as_str().to_string(),
            smoking_status: SmokingStatus::ALL[0].as_str().to_string(),
        }
    }
}

impl From<&FeatureRecord> for RawFeatureForm {
    fn from(record: &FeatureRecord) -> Self {
        Self {
            age: record.age.to_string(),
            avg_glucose_level: record.avg_glucose_level.to_string(),
            bmi: record.bmi.to_string(),
            gender: record.gender.as_str().to_string(),
            hypertension: record.hypertension.as_str().to_string(),
            heart_disease: record.heart_disease.as_str().to_string(),
            ever_married: record.ever_married.as_str().to_string(),
            work_type: record.work_type.as_str().to_string(),
            residence_type: record.residence_type.as_str().to_string(),
            smoking_status: record.smoking_status.as_str().to_string(),
        }
    }
}

impl TryFrom<&RawFeatureForm> for FeatureRecord {
    type Error = FeatureError;

    fn try_from(raw: &RawFeatureForm) -> Result<Self, Self::Error> {
        FeatureRecord::new(
            parse_age(&raw.age)?,
            parse_real("avg_glucose_level", &raw.avg_glucose_level)?,
            parse_real("bmi", &raw.bmi)?,
            parse_choice("gender", &raw.gender)?,
            parse_choice("hypertension", &raw.hypertension)?,
            parse_choice("heart_disease", &raw.heart_disease)?,
            parse_choice("ever_married", &raw.ever_married)?,
            parse_choice("work_type", &raw.work_type)?,
            parse_choice("Residence_type", &raw.residence_type)?,
            parse_choice("smoking_status", &raw.smoking_status)?,
        )
    }
}

impl TryFrom<RawFeatureForm> for FeatureRecord {
    type Error = FeatureError;

    fn try_from(raw: RawFeatureForm) -> Result<Self, Self::Error> {
        FeatureRecord::try_from(&raw)
    }
}

fn parse_age(raw: &str) -> Result<u32, FeatureError> {
    let value = parse_real("age", raw)?;
    // Integer spinner; "50.0" is accepted, "50.5" is not
    if value.fract() != 0.0 {
        return Err(FeatureError::NotANumber {
            field: "age",
            raw: raw.to_string(),
        });
    }
    if value < *AGE_RANGE.start() as f64 || value > *AGE_RANGE.end() as f64 {
        return Err(FeatureError::OutOfRange {
            field: "age",
            value,
            min: *AGE_RANGE.start() as f64,
            max: *AGE_RANGE.end() as f64,
        });
    }
    Ok(value as u32)
}

fn parse_real(field: &'static str, raw: &str) -> Result<f64, FeatureError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FeatureError::NotANumber {
            field,
            raw: raw.to_string(),
        })
}

fn parse_choice<C: Choice>(field: &'static str, raw: &str) -> Result<C, FeatureError> {
    C::parse_choice(raw).ok_or_else(|| FeatureError::UnknownChoice {
        field,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RawFeatureForm {
        RawFeatureForm::defaults()
    }

    #[test]
    fn test_defaults_validate() {
        let record = FeatureRecord::try_from(form()).unwrap();
        assert_eq!(record.age(), 50);
        assert_eq!(record.avg_glucose_level(), 120.0);
        assert_eq!(record.bmi(), 25.0);
        assert_eq!(record.gender(), Gender::Male);
        assert_eq!(record.smoking_status(), SmokingStatus::NeverSmoked);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut raw = form();
        raw.age = "18".into();
        raw.avg_glucose_level = "300".into();
        raw.bmi = "10.0".into();
        assert!(FeatureRecord::try_from(&raw).is_ok());

        raw.age = "100".into();
        raw.avg_glucose_level = "50".into();
        raw.bmi = "70".into();
        assert!(FeatureRecord::try_from(&raw).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut raw = form();
        raw.age = "17".into();
        assert!(matches!(
            FeatureRecord::try_from(&raw),
            Err(FeatureError::OutOfRange { field: "age", .. })
        ));

        let mut raw = form();
        raw.bmi = "70.1".into();
        assert!(matches!(
            FeatureRecord::try_from(&raw),
            Err(FeatureError::OutOfRange { field: "bmi", .. })
        ));

        let mut raw = form();
        raw.avg_glucose_level = "49.9".into();
        assert!(matches!(
            FeatureRecord::try_from(&raw),
            Err(FeatureError::OutOfRange {
                field: "avg_glucose_level",
                ..
            })
        ));
    }

    #[test]
    fn test_non_numeric_and_non_finite_rejected() {
        let mut raw = form();
        raw.bmi = "NaN".into();
        assert!(matches!(
            FeatureRecord::try_from(&raw),
            Err(FeatureError::NotANumber { field: "bmi", .. })
        ));

        let mut raw = form();
        raw.age = "fifty".into();
        assert!(FeatureRecord::try_from(&raw).is_err());

        let mut raw = form();
        raw.age = "50.5".into();
        assert!(FeatureRecord::try_from(&raw).is_err());
    }

    #[test]
    fn test_unknown_choice_rejected() {
        let mut raw = form();
        raw.work_type = "Astronaut".into();
        assert_eq!(
            FeatureRecord::try_from(&raw),
            Err(FeatureError::UnknownChoice {
                field: "work_type",
                raw: "Astronaut".into()
            })
        );
    }

    #[test]
    fn test_choice_labels_are_exact() {
        assert_eq!(
            WorkType::parse_choice("Self-employed"),
            Some(WorkType::SelfEmployed)
        );
        assert_eq!(WorkType::parse_choice("children"), Some(WorkType::Children));
        assert_eq!(WorkType::parse_choice("Children"), None);
        assert_eq!(
            SmokingStatus::parse_choice("formerly smoked"),
            Some(SmokingStatus::FormerlySmoked)
        );
        assert_eq!(Indicator::parse_choice("1"), Some(Indicator::Present));
    }

    #[test]
    fn test_row_uses_training_column_names() {
        let record = FeatureRecord::try_from(form()).unwrap();
        let row = record.to_row();
        assert_eq!(row.len(), 10);
        assert_eq!(
            row.get("Residence_type"),
            Some(FeatureValue::Category("Urban"))
        );
        assert_eq!(row.get("hypertension"), Some(FeatureValue::Number(0.0)));
        assert_eq!(row.get("age"), Some(FeatureValue::Number(50.0)));
        assert_eq!(row.get("residence_type"), None);
    }

    #[test]
    fn test_record_round_trips_through_form() {
        let record = FeatureRecord::try_from(form()).unwrap();
        let back = FeatureRecord::try_from(RawFeatureForm::from(&record)).unwrap();
        assert_eq!(record, back);
    }
}
