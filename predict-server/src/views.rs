//! HTML views

use cardio_predict_core::constants::{AGE_DECIMALS, BIOMARKER_DECIMALS};
use cardio_predict_core::{PatientRecord, PredictionReport, Verdict};

pub const TITLE: &str = "🔎 Predicción de Infarto del Miocardio";
pub const INTRO: &str =
    "Ingrese los datos clínicos del paciente para ver los resultados de todos los modelos:";
pub const INPUT_HEADER: &str = "📝 Datos del paciente";
pub const RESULTS_HEADER: &str = "🔍 Resultados de cada modelo:";
pub const CHART_HEADER: &str = "📊 Comparación de probabilidades de infarto";
pub const PREDICT_BUTTON: &str = "Predecir con todos los modelos";

/// Numeric widget: name, label, step
const INPUTS: [(&str, &str, &str); 3] = [
    ("age", "Edad en años completos", "1"),
    ("ckmb", "CK-MB Nota: Los valores normales suelen ser menos de 5 ng/mL", "0.0001"),
    ("troponin", "Troponina Nota: Los valores normales son por debajo de 0.04 ng/ml", "0.0001"),
];

const STYLE: &str = r#"
body { font-family: "Source Sans Pro", sans-serif; margin: 0; }
main { max-width: 46rem; margin: 0 auto; padding: 3rem 1rem; background: rgba(255, 255, 255, 0.92); }
label { display: block; margin-top: 1rem; font-size: 0.9rem; }
input[type=number] { width: 100%; padding: 0.5rem; font-size: 1rem; }
button { margin-top: 1.5rem; padding: 0.5rem 1rem; font-size: 1rem; cursor: pointer; }
.banner { padding: 0.75rem 1rem; border-radius: 0.5rem; margin: 0.5rem 0 1.25rem; }
.banner-error { background: #ffe2e0; color: #7d353b; }
.banner-success { background: #dbf0e1; color: #177233; }
.chart svg { width: 100%; height: auto; }
"#;

const BACKGROUND_STYLE: &str = r#"
body {
    background-image: url("/background");
    background-size: cover;
    background-position: center;
    background-repeat: no-repeat;
    background-attachment: fixed;
}
"#;

/// Output of a prediction pass, ready to render
#[derive(Debug)]
pub struct ResultsView {
    pub report: PredictionReport,
    pub chart: Option<String>,
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

fn banner_class(verdict: Verdict) -> Option<&'static str> {
    match verdict {
        Verdict::High => Some("banner banner-error"),
        Verdict::Low => Some("banner banner-success"),
        Verdict::Unknown => None,
    }
}

/// Whole page for one request
pub fn render_page(record: &PatientRecord, results: Option<&ResultsView>, background: bool) -> String {
    let mut html = String::with_capacity(16 * 1024);

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Predicción de Infarto</title>\n<style>{STYLE}{}</style>\n</head>\n<body>\n<main>\n",
        if background { BACKGROUND_STYLE } else { "" }
    ));
    html.push_str(&format!("<h1>{TITLE}</h1>\n<p>{INTRO}</p>\n<h3>{INPUT_HEADER}</h3>\n"));
    render_form(&mut html, record);

    if let Some(results) = results {
        render_results(&mut html, results);
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, record: &PatientRecord) {
    let values = [
        format!("{:.*}", AGE_DECIMALS as usize, record.age),
        format!("{:.*}", BIOMARKER_DECIMALS as usize, record.ck_mb),
        format!("{:.*}", BIOMARKER_DECIMALS as usize, record.troponin),
    ];

    html.push_str("<form method=\"get\" action=\"/\">\n");
    for ((name, label, step), value) in INPUTS.iter().zip(values.iter()) {
        html.push_str(&format!(
            "<label for=\"{name}\">{}</label>\n\
             <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"0\" step=\"{step}\" value=\"{value}\">\n",
            escape_html(label)
        ));
    }
    html.push_str(&format!(
        "<button type=\"submit\" name=\"predict\" value=\"1\">{PREDICT_BUTTON}</button>\n</form>\n"
    ));
}

fn render_results(html: &mut String, results: &ResultsView) {
    html.push_str(&format!("<h3>{RESULTS_HEADER}</h3>\n"));

    for prediction in &results.report.predictions {
        html.push_str(&format!(
            "<p class=\"result-line\"><strong>{}</strong> - {}</p>\n",
            escape_html(&prediction.model),
            escape_html(&prediction.probability_text())
        ));
        if let (Some(class), Some(text)) = (banner_class(prediction.verdict), prediction.banner()) {
            html.push_str(&format!("<div class=\"{class}\">{}</div>\n", escape_html(&text)));
        }
    }

    if let Some(svg) = &results.chart {
        html.push_str(&format!("<h3>{CHART_HEADER}</h3>\n<div class=\"chart\">{svg}</div>\n"));
    }
}
