use serde::Deserialize;
use serde_json::{Map, Value};

const IP_ADDRESS: &str = "ipAddress";
const COUNTRY_CODE: &str = "countryCode";
const ISP: &str = "isp";
const DOMAIN: &str = "domain";
const USAGE_TYPE: &str = "usageType";
const TOTAL_REPORTS: &str = "totalReports";
const ABUSE_CONFIDENCE_SCORE: &str = "abuseConfidenceScore";

/// The `data` object of a `/check` response, kept as the API sent it. Values
/// are not type-checked; readers get each one in its display form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct IpRecord {
    fields: Map<String, Value>,
}

impl IpRecord {
    /// Display form of `key`, or `None` when it is absent or null.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn ip_address(&self) -> Option<String> {
        self.get(IP_ADDRESS)
    }

    pub fn country_code(&self) -> Option<String> {
        self.get(COUNTRY_CODE)
    }

    pub fn isp(&self) -> Option<String> {
        self.get(ISP)
    }

    pub fn domain(&self) -> Option<String> {
        self.get(DOMAIN)
    }

    pub fn usage_type(&self) -> Option<String> {
        self.get(USAGE_TYPE)
    }

    pub fn total_reports(&self) -> Option<String> {
        self.get(TOTAL_REPORTS)
    }

    /// Score used for bucketing. Missing, null or non-numeric scores count as 0.
    pub fn score(&self) -> f64 {
        match self.fields.get(ABUSE_CONFIDENCE_SCORE) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
            Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
            _ => 0.0,
        }
    }

    /// Score as shown on the card; `0` when missing.
    pub fn score_label(&self) -> String {
        self.get(ABUSE_CONFIDENCE_SCORE)
            .unwrap_or_else(|| String::from("0"))
    }
}

#[derive(Deserialize)]
pub(super) struct CheckResponse {
    pub data: Option<Value>,
}
