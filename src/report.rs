//! Presentation of a submission as HTML or terminal text

use tracing::warn;

use crate::advice::{AdvicePlan, generate_advice};
use crate::error::StrokeRiskError;
use crate::features::{FeatureRecord, RawFeatureForm};
use crate::locale::Locale;
use crate::risk::{PredictionError, RiskAssessment, RiskEvaluator};

/// Everything the presenter needs for one submission
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Assessed {
        risk: RiskAssessment,
        advice: AdvicePlan,
    },
    Failed,
}

/// Run the evaluator and, when it succeeds, the advice rules
pub fn assess(evaluator: &RiskEvaluator, record: &FeatureRecord) -> Submission {
    match evaluator.evaluate(record) {
        Ok(risk) => Submission::Assessed {
            risk,
            advice: generate_advice(record),
        },
        Err(e) => fail(e.into()),
    }
}

/// Validate a raw form and assess it; invalid input fails like a model error
pub fn assess_form(evaluator: &RiskEvaluator, raw: &RawFeatureForm) -> Submission {
    match FeatureRecord::try_from(raw) {
        Ok(record) => assess(evaluator, &record),
        Err(e) => fail(e.into()),
    }
}

/// Log the cause and return the generic failure; the cause never reaches the user
pub fn fail(err: StrokeRiskError) -> Submission {
    warn!("Submission failed: {}", err);
    Submission::Failed
}

pub fn headline(risk: &RiskAssessment, locale: Locale) -> String {
    let sentence = locale.pick(
        "Le risque prédit d'AVC est de",
        "The predicted stroke risk is",
    );
    format!(
        "{} {} {:.2}% ({})",
        risk.tier.icon(),
        sentence,
        risk.percentage,
        risk.tier.label(locale)
    )
}

fn advice_heading(locale: Locale) -> &'static str {
    locale.pick("Conseils de santé :", "Health advice:")
}

/// HTML fragment placed under the form
pub fn render_html(submission: &Submission, locale: Locale) -> String {
    match submission {
        Submission::Failed => format!(
            "<div class=\"error\" role=\"alert\">{}</div>",
            escape_html(PredictionError::user_message(locale))
        ),
        Submission::Assessed { risk, advice } => {
            let mut out = format!(
                "<h2 style=\"color:{}; font-size: 36px;\">{}</h2>\n",
                risk.tier.color(),
                escape_html(&headline(risk, locale))
            );
            match advice {
                AdvicePlan::Recommendations(list) => {
                    out.push_str(&format!(
                        "<h3><strong>{}</strong></h3>\n<ul class=\"advice\">\n",
                        escape_html(advice_heading(locale))
                    ));
                    for item in list {
                        out.push_str(&format!(
                            "  <li><strong>{}</strong> : {}</li>\n",
                            escape_html(item.title(locale)),
                            escape_html(item.detail(locale))
                        ));
                    }
                    out.push_str("</ul>\n");
                }
                AdvicePlan::NoMajorRiskFactors => {
                    let (title, detail) = AdvicePlan::congratulation(locale);
                    out.push_str(&format!(
                        "<h3><strong>{}</strong> {}</h3>\n",
                        escape_html(title),
                        escape_html(detail)
                    ));
                }
            }
            out
        }
    }
}

/// Plain text for the terminal
pub fn render_text(submission: &Submission, locale: Locale) -> String {
    match submission {
        Submission::Failed => PredictionError::user_message(locale).to_string(),
        Submission::Assessed { risk, advice } => {
            let mut out = headline(risk, locale);
            out.push_str("\n\n");
            match advice {
                AdvicePlan::Recommendations(list) => {
                    out.push_str(advice_heading(locale));
                    out.push('\n');
                    for item in list {
                        out.push_str(&format!(
                            "  • {} : {}\n",
                            item.title(locale),
                            item.detail(locale)
                        ));
                    }
                }
                AdvicePlan::NoMajorRiskFactors => {
                    let (title, detail) = AdvicePlan::congratulation(locale);
                    out.push_str(&format!("{title} {detail}\n"));
                }
            }
            out
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
