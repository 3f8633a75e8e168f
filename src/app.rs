use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use crate::{
    Error,
    abuseipdb::{AbuseIpDb, HttpClient, Lookup, SkipReason},
    config::Api,
    input,
    prompt::Prompt,
    report,
};

const API_KEY_PROMPT: &str = "Enter your AbuseIPDB API key: ";
const INPUT_PROMPT: &str = "Enter the name of the .txt file with IP addresses (e.g., ips.txt): ";
const OUTPUT_PROMPT: &str = "Enter the output filename for the HTML report (e.g., report.html): ";

/// How a run ended. Every variant is a normal exit.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Aborted,
    NoData,
    Saved(PathBuf),
    SaveFailed,
}

pub struct App<'a, R, W> {
    prompt: Prompt<R, W>,
    api: &'a Api,
}

impl<'a, R, W> App<'a, R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(prompt: Prompt<R, W>, api: &'a Api) -> Self {
        Self { prompt, api }
    }

    pub async fn run(mut self) -> Outcome {
        match self.execute().await {
            Ok(outcome) => outcome,
            Err(err) => {
                if !err.is_user_abort() {
                    error!("{}", err);
                }
                if let Err(err) = self.prompt.say(&err) {
                    error!("{}", err);
                }
                Outcome::Aborted
            }
        }
    }

    async fn execute(&mut self) -> Result<Outcome, Error> {
        let api_key = self.prompt.ask(API_KEY_PROMPT)?;
        if api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }

        let filename = self.prompt.ask(INPUT_PROMPT)?;
        let addresses = input::load_addresses(&filename)?;

        self.prompt.say(format_args!(
            "\nFound {} unique IP(s) to check. Querying API...",
            addresses.len()
        ))?;

        let api = self.api;
        let client = HttpClient::new(api)?;
        let checker = AbuseIpDb::new(&client, api, &api_key);

        let mut results = Vec::with_capacity(addresses.len());
        for ip in &addresses {
            self.prompt.say(format_args!("  - Checking {}...", ip))?;
            match checker.check(ip).await {
                Lookup::Found(record) => results.push(record),
                Lookup::Skipped(reason) => self.report_skip(ip, &reason)?,
            }
        }
        info!("{} of {} addresses returned data", results.len(), addresses.len());

        self.prompt.say("Finished checking all IPs.")?;

        if results.is_empty() {
            self.prompt.say("No data was retrieved, so no report was generated.")?;
            return Ok(Outcome::NoData);
        }

        let output = report::with_html_extension(&self.prompt.ask(OUTPUT_PROMPT)?);
        self.prompt.say("Generating HTML report...")?;
        let html = report::render(&results);

        match report::write(&output, &html) {
            Ok(()) => {
                self.prompt.say(format_args!("\nSuccessfully saved report to '{}'", output))?;
                Ok(Outcome::Saved(PathBuf::from(output)))
            }
            Err(err) => {
                error!("writing {} failed: {}", output, err);
                self.prompt.say(format_args!("Error saving HTML file: {}", err))?;
                Ok(Outcome::SaveFailed)
            }
        }
    }

    fn report_skip(&mut self, ip: &str, reason: &SkipReason) -> Result<(), Error> {
        match reason {
            SkipReason::NoData => {
                debug!("no data for {}", ip);
            }
            SkipReason::Network(_) | SkipReason::Decode(_) => {
                self.prompt.say(format_args!(
                    "An error occurred while checking IP {}: {}",
                    ip, reason
                ))?;
            }
            _ => {
                if let Some(status) = reason.status() {
                    self.prompt.say(format_args!(
                        "HTTP error occurred for IP {}: {}",
                        ip, status
                    ))?;
                }
                self.prompt.say(reason)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    struct Fixture {
        dir: TempDir,
        server: MockServer,
    }

    impl Fixture {
        async fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                server: MockServer::start().await,
            }
        }

        fn api(&self) -> Api {
            Api {
                base_url: self.server.uri(),
                ..Api::default()
            }
        }

        fn path(&self, name: &str) -> String {
            self.dir.path().join(name).to_str().unwrap().to_owned()
        }

        fn input_file(&self, content: &str) -> String {
            let path = self.path("ips.txt");
            fs::write(&path, content).unwrap();
            path
        }

        async fn run(&self, answers: &[&str]) -> (Outcome, String) {
            self.run_with(&self.api(), answers).await
        }

        async fn run_with(&self, api: &Api, answers: &[&str]) -> (Outcome, String) {
            let stdin = answers.join("\n") + "\n";
            let mut out = Vec::new();
            let outcome = App::new(Prompt::new(stdin.as_bytes(), &mut out), api)
                .run()
                .await;
            (outcome, String::from_utf8(out).unwrap())
        }
    }

    fn found(ip: &str, score: u32) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "ipAddress": ip,
                "countryCode": "DE",
                "isp": "Example GmbH",
                "domain": "example.de",
                "usageType": "Fixed Line ISP",
                "totalReports": 3,
                "abuseConfidenceScore": score
            }
        }))
    }

    #[tokio::test]
    async fn empty_api_key_aborts_before_any_request() {
        let fixture = Fixture::new().await;
        Mock::given(method("GET"))
            .respond_with(found("1.2.3.4", 0))
            .expect(0)
            .mount(&fixture.server)
            .await;

        let (outcome, out) = fixture.run(&["   "]).await;

        assert_eq!(outcome, Outcome::Aborted);
        assert!(out.contains("API key is required. Exiting."));
    }

    #[tokio::test]
    async fn missing_input_file_aborts() {
        let fixture = Fixture::new().await;
        let missing = fixture.path("missing.txt");

        let (outcome, out) = fixture.run(&["key", &missing]).await;

        assert_eq!(outcome, Outcome::Aborted);
        assert!(out.contains(&format!("Error: The file '{}' was not found.", missing)));
    }

    #[tokio::test]
    async fn blank_input_file_aborts() {
        let fixture = Fixture::new().await;
        let input = fixture.input_file("\n \n\n");

        let (outcome, out) = fixture.run(&["key", &input]).await;

        assert_eq!(outcome, Outcome::Aborted);
        assert!(out.contains("No IP addresses found in the file."));
    }

    #[tokio::test]
    async fn duplicate_lines_are_queried_once() {
        let fixture = Fixture::new().await;
        Mock::given(method("GET"))
            .and(path("/check"))
            .and(query_param("ipAddress", "1.2.3.4"))
            .respond_with(found("1.2.3.4", 20))
            .expect(1)
            .mount(&fixture.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/check"))
            .and(query_param("ipAddress", "5.6.7.8"))
            .respond_with(found("5.6.7.8", 90))
            .expect(1)
            .mount(&fixture.server)
            .await;

        let input = fixture.input_file("1.2.3.4\n1.2.3.4\n5.6.7.8\n");
        let output = fixture.path("report");

        let (outcome, out) = fixture.run(&["key", &input, &output]).await;

        let expected = format!("{}.html", output);
        assert_eq!(outcome, Outcome::Saved(PathBuf::from(&expected)));
        assert!(out.contains("Found 2 unique IP(s) to check."));
        assert!(out.contains(&format!("Successfully saved report to '{}'", expected)));

        let html = fs::read_to_string(&expected).unwrap();
        assert_eq!(html.matches(r#"<div class="ip-card">"#).count(), 2);
        assert!(html.contains(r#"<span class="score score-low">20%</span>"#));
        assert!(html.contains(r#"<span class="score score-high">90%</span>"#));
    }

    #[tokio::test]
    async fn rate_limited_ip_is_left_out() {
        let fixture = Fixture::new().await;
        Mock::given(method("GET"))
            .and(path("/check"))
            .and(query_param("ipAddress", "1.2.3.4"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&fixture.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/check"))
            .and(query_param("ipAddress", "5.6.7.8"))
            .respond_with(found("5.6.7.8", 50))
            .expect(1)
            .mount(&fixture.server)
            .await;

        let input = fixture.input_file("1.2.3.4\n5.6.7.8\n");
        let output = fixture.path("report.html");

        let (outcome, out) = fixture.run(&["key", &input, &output]).await;

        assert_eq!(outcome, Outcome::Saved(PathBuf::from(&output)));
        assert!(out.contains("HTTP error occurred for IP 1.2.3.4: 429"));
        assert!(out.contains("Error: API rate limit exceeded. Please wait and try again later."));
        assert!(out.contains("  - Checking 5.6.7.8..."));

        let html = fs::read_to_string(&output).unwrap();
        assert!(!html.contains("1.2.3.4"));
        assert!(html.contains("<h2>5.6.7.8</h2>"));
    }

    #[tokio::test]
    async fn invalid_key_and_server_errors_are_reported() {
        let fixture = Fixture::new().await;
        Mock::given(method("GET"))
            .and(query_param("ipAddress", "1.1.1.1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&fixture.server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("ipAddress", "2.2.2.2"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&fixture.server)
            .await;

        let input = fixture.input_file("1.1.1.1\n2.2.2.2\n");
        let output = fixture.path("report.html");

        let (outcome, out) = fixture.run(&["key", &input, &output]).await;

        assert_eq!(outcome, Outcome::NoData);
        assert!(out.contains("Error: Invalid or unauthorized API key. Please check your key."));
        assert!(out.contains("Error details: boom"));
    }

    #[tokio::test]
    async fn unreachable_api_is_reported_per_address() {
        let fixture = Fixture::new().await;
        let api = Api {
            base_url: "http://127.0.0.1:1".into(),
            connect_timeout_secs: 1,
            timeout_secs: Some(2),
            ..Api::default()
        };

        let input = fixture.input_file("1.2.3.4\n5.6.7.8\n");
        let output = fixture.path("report.html");

        let (outcome, out) = fixture.run_with(&api, &["key", &input, &output]).await;

        assert_eq!(outcome, Outcome::NoData);
        assert!(out.contains("An error occurred while checking IP 1.2.3.4: "));
        assert!(out.contains("An error occurred while checking IP 5.6.7.8: "));
        assert!(out.contains("Finished checking all IPs."));
        assert!(!std::path::Path::new(&output).exists());
    }

    #[tokio::test]
    async fn undecodable_body_is_reported_and_skipped() {
        let fixture = Fixture::new().await;
        Mock::given(method("GET"))
            .and(query_param("ipAddress", "1.2.3.4"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&fixture.server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("ipAddress", "5.6.7.8"))
            .respond_with(found("5.6.7.8", 60))
            .mount(&fixture.server)
            .await;

        let input = fixture.input_file("1.2.3.4\n5.6.7.8\n");
        let output = fixture.path("report.html");

        let (outcome, out) = fixture.run(&["key", &input, &output]).await;

        assert_eq!(outcome, Outcome::Saved(PathBuf::from(&output)));
        assert!(out.contains("An error occurred while checking IP 1.2.3.4: "));
        let html = fs::read_to_string(&output).unwrap();
        assert!(!html.contains("1.2.3.4"));
        assert!(html.contains(r#"<span class="score score-mid">60%</span>"#));
    }

    #[tokio::test]
    async fn oddly_typed_record_is_still_reported() {
        let fixture = Fixture::new().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "ipAddress": "1.2.3.4",
                    "totalReports": "3",
                    "domain": 123,
                    "abuseConfidenceScore": 12.0
                }
            })))
            .expect(1)
            .mount(&fixture.server)
            .await;

        let input = fixture.input_file("1.2.3.4\n");
        let output = fixture.path("report.html");

        let (outcome, _) = fixture.run(&["key", &input, &output]).await;

        assert_eq!(outcome, Outcome::Saved(PathBuf::from(&output)));
        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("<h2>1.2.3.4</h2>"));
        assert!(html.contains("<strong>Domain:</strong> 123</p>"));
        assert!(html.contains(r#"<span class="score score-low">12.0%</span>"#));
    }

    #[tokio::test]
    async fn no_results_writes_no_file() {
        let fixture = Fixture::new().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
            .expect(1)
            .mount(&fixture.server)
            .await;

        let input = fixture.input_file("9.9.9.9\n");
        let output = fixture.path("report.html");

        let (outcome, out) = fixture.run(&["key", &input, &output]).await;

        assert_eq!(outcome, Outcome::NoData);
        assert!(out.contains("No data was retrieved, so no report was generated."));
        assert!(!out.contains(OUTPUT_PROMPT));
        assert!(!std::path::Path::new(&output).exists());
    }

    #[tokio::test]
    async fn write_failure_is_reported() {
        let fixture = Fixture::new().await;
        Mock::given(method("GET"))
            .respond_with(found("1.2.3.4", 10))
            .mount(&fixture.server)
            .await;

        let input = fixture.input_file("1.2.3.4\n");
        let output = fixture.path("missing-dir/report.html");

        let (outcome, out) = fixture.run(&["key", &input, &output]).await;

        assert_eq!(outcome, Outcome::SaveFailed);
        assert!(out.contains("Error saving HTML file:"));
    }
}
