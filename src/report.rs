//! Static HTML rendering of lookup results.
//!
//! The output is a single document with the stylesheet inlined. Rendering is
//! deterministic: the same records in the same order give the same bytes.

use std::{fs, path::Path};

use crate::{Error, abuseipdb::IpRecord};

const MISSING: &str = "N/A";
const EXTENSION: &str = ".html";

const STYLE: &str = r#"
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
            margin: 0;
            padding: 20px;
            background-color: #121212;
            color: #e0e0e0;
        }
        h1 {
            color: #ffffff;
            text-align: center;
            margin-bottom: 30px;
        }
        .container {
            display: flex;
            flex-wrap: wrap;
            justify-content: center;
            gap: 20px;
        }
        .ip-card {
            background-color: #1e1e1e;
            border: 1px solid #333;
            border-radius: 8px;
            padding: 20px;
            width: 320px;
            box-shadow: 0 4px 8px rgba(0,0,0,0.3);
            transition: transform 0.2s ease-in-out;
        }
        .ip-card:hover {
            transform: translateY(-5px);
        }
        .ip-card h2 {
            margin-top: 0;
            font-size: 1.5em;
            color: #4a90e2;
            word-wrap: break-word;
        }
        .ip-card p {
            margin: 8px 0;
            line-height: 1.5;
        }
        .score {
            font-weight: bold;
            font-size: 1.1em;
            padding: 3px 8px;
            border-radius: 5px;
            color: white;
        }
        .score-low { background-color: #28a745; }
        .score-mid { background-color: #ffc107; color: #121212; }
        .score-high { background-color: #dc3545; }
    </style>
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBucket {
    Low,
    Mid,
    High,
}

impl ScoreBucket {
    pub fn of(score: f64) -> Self {
        if score < 40.0 {
            ScoreBucket::Low
        } else if score <= 75.0 {
            ScoreBucket::Mid
        } else {
            ScoreBucket::High
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ScoreBucket::Low => "score-low",
            ScoreBucket::Mid => "score-mid",
            ScoreBucket::High => "score-high",
        }
    }
}

pub fn render(records: &[IpRecord]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html><html lang='en'><head><meta charset='UTF-8'><title>AbuseIPDB Report</title>",
    );
    html.push_str(STYLE);
    html.push_str("</head><body>");
    html.push_str("<h1>AbuseIPDB IP Address Report</h1><div class='container'>");

    for record in records {
        render_card(&mut html, record);
    }

    html.push_str("</div></body></html>");
    html
}

fn render_card(html: &mut String, record: &IpRecord) {
    html.push_str(&format!(
        r#"
        <div class="ip-card">
            <h2>{ip}</h2>
            <p><strong>Country:</strong> {country}</p>
            <p><strong>ISP:</strong> {isp}</p>
            <p><strong>Domain:</strong> {domain}</p>
            <p><strong>Usage Type:</strong> {usage_type}</p>
            <p><strong>Total Reports:</strong> {total_reports}</p>
            <p><strong>Abuse Score:</strong> <span class="score {class}">{score}%</span></p>
        </div>
        "#,
        ip = field(record.ip_address()),
        country = field(record.country_code()),
        isp = field(record.isp()),
        domain = field(record.domain()),
        usage_type = field(record.usage_type()),
        total_reports = field(record.total_reports()),
        class = ScoreBucket::of(record.score()).css_class(),
        score = html_escape(&record.score_label()),
    ));
}

fn field(value: Option<String>) -> String {
    value.map_or_else(|| MISSING.to_owned(), |value| html_escape(&value))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Appends `.html` unless the name already ends with it.
pub fn with_html_extension(name: &str) -> String {
    if name.ends_with(EXTENSION) {
        name.to_owned()
    } else {
        format!("{}{}", name, EXTENSION)
    }
}

pub fn write(path: impl AsRef<Path>, html: &str) -> Result<(), Error> {
    fs::write(path, html)?;
    Ok(())
}
