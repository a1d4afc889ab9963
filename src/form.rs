//! The single-page input form

use crate::features::{
    AGE_RANGE, BMI_RANGE, Choice, EverMarried, GLUCOSE_RANGE, Gender, Indicator, RawFeatureForm,
    ResidenceType, SmokingStatus, WorkType,
};
use crate::locale::Locale;
use crate::report::escape_html;

struct Labels {
    title: &'static str,
    intro: &'static str,
    age: &'static str,
    glucose: &'static str,
    bmi: &'static str,
    gender: &'static str,
    hypertension: &'static str,
    heart_disease: &'static str,
    ever_married: &'static str,
    work_type: &'static str,
    residence_type: &'static str,
    smoking_status: &'static str,
    submit: &'static str,
}

fn labels(locale: Locale) -> Labels {
    Labels {
        title: locale.pick("Estimation du Risque d'AVC", "Stroke Risk Estimation"),
        intro: locale.pick(
            "Remplissez le formulaire ci-dessous pour estimer votre risque d'AVC.",
            "Fill in the form below to estimate your stroke risk.",
        ),
        age: locale.pick("Âge", "Age"),
        glucose: locale.pick(
            "Niveau moyen de glucose (mg/dL)",
            "Average glucose level (mg/dL)",
        ),
        bmi: locale.pick(
            "Indice de Masse Corporelle (BMI)",
            "Body Mass Index (BMI)",
        ),
        gender: locale.pick("Genre", "Gender"),
        hypertension: locale.pick("Hypertension", "Hypertension"),
        heart_disease: locale.pick("Maladie cardiaque", "Heart disease"),
        ever_married: locale.pick("Marié(e)", "Ever married"),
        work_type: locale.pick("Type de travail", "Work type"),
        residence_type: locale.pick("Type de résidence", "Residence type"),
        smoking_status: locale.pick("Statut tabagique", "Smoking status"),
        submit: locale.pick("Estimer le Risque d'AVC", "Estimate Stroke Risk"),
    }
}

fn number_input(
    name: &str,
    label: &str,
    value: &str,
    min: f64,
    max: f64,
    step: &str,
) -> String {
    format!(
        "<label for=\"{name}\">{}</label>\n<input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{}\" required>\n",
        escape_html(label),
        escape_html(value),
    )
}

fn select<C: Choice>(name: &str, label: &str, current: &str) -> String {
    let mut out = format!(
        "<label for=\"{name}\">{}</label>\n<select id=\"{name}\" name=\"{name}\">\n",
        escape_html(label)
    );
    for choice in C::ALL {
        let value = escape_html(choice.as_str());
        let selected = if choice.as_str() == current.trim() {
            " selected"
        } else {
            ""
        };
        out.push_str(&format!(
            "  <option value=\"{value}\"{selected}>{value}</option>\n"
        ));
    }
    out.push_str("</select>\n");
    out
}

/// The ten controls, pre-filled from `values`
pub fn render_controls(values: &RawFeatureForm, locale: Locale) -> String {
    let l = labels(locale);
    let mut out = String::new();
    out.push_str(&number_input(
        "age",
        l.age,
        &values.age,
        *AGE_RANGE.start() as f64,
        *AGE_RANGE.end() as f64,
        "1",
    ));
    out.push_str(&number_input(
        "avg_glucose_level",
        l.glucose,
        &values.avg_glucose_level,
        *GLUCOSE_RANGE.start(),
        *GLUCOSE_RANGE.end(),
        "any",
    ));
    out.push_str(&number_input(
        "bmi",
        l.bmi,
        &values.bmi,
        *BMI_RANGE.start(),
        *BMI_RANGE.end(),
        "any",
    ));
    out.push_str(&select::<Gender>("gender", l.gender, &values.gender));
    out.push_str(&select::<Indicator>(
        "hypertension",
        l.hypertension,
        &values.hypertension,
    ));
    out.push_str(&select::<Indicator>(
        "heart_disease",
        l.heart_disease,
        &values.heart_disease,
    ));
    out.push_str(&select::<EverMarried>(
        "ever_married",
        l.ever_married,
        &values.ever_married,
    ));
    out.push_str(&select::<WorkType>("work_type", l.work_type, &values.work_type));
    out.push_str(&select::<ResidenceType>(
        "residence_type",
        l.residence_type,
        &values.residence_type,
    ));
    out.push_str(&select::<SmokingStatus>(
        "smoking_status",
        l.smoking_status,
        &values.smoking_status,
    ));
    out
}

/// Full page: title, form and, after a submission, the result block
pub fn render_page(values: &RawFeatureForm, result_html: Option<&str>, locale: Locale) -> String {
    let l = labels(locale);
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 42rem; margin: 2rem auto; }}
label {{ display: block; margin-top: 0.75rem; }}
input, select {{ width: 100%; padding: 0.3rem; }}
button {{ margin-top: 1.25rem; padding: 0.5rem 1rem; }}
.error {{ color: #b00020; background: #fdecea; padding: 0.75rem; margin-top: 1rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{intro}</p>
<form method="post" action="/">
{controls}<button type="submit">{submit}</button>
</form>
<section id="result">
{result}</section>
</body>
</html>
"#,
        lang = locale.as_str(),
        title = escape_html(l.title),
        intro = escape_html(l.intro),
        controls = render_controls(values, locale),
        submit = escape_html(l.submit),
        result = result_html.unwrap_or(""),
    )
}
