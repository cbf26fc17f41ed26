use std::path::PathBuf;
use lhfcrawler::models::{Finding, Reflection};
use lhfcrawler::reporting::{write_reports, HtmlTarget};

fn finding(domain: &str, url: &str, payload: &str) -> Finding {
    Finding::new(domain, Reflection { vulnerable_url: url.into(), payload: payload.into() })
}

fn sample() -> Vec<Finding> {
    vec![
        finding("a.hu", "https://a.hu/s?q=%3Cb%3E", "<b>"),
        finding("b.hu", "https://b.hu/?x=%22", "\"><img src=x>"),
        finding("a.hu", "https://a.hu/t?id=%3Cb%3E", "<b>"),
    ]
}

fn today() -> String {
    chrono::Local::now().format("%Y%m%d").to_string()
}

#[tokio::test]
async fn test_json_round_trip_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/custom.json");

    let paths = write_reports(&sample(), &out, None, &dir.path().join("output")).await.unwrap();
    assert_eq!(paths.json, out);
    assert!(paths.html.is_none());

    let loaded: Vec<Finding> = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(loaded, sample());
}

#[tokio::test]
async fn test_default_name_is_date_stamped_and_suffixed() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output");
    let default = PathBuf::from("hu_report.json");

    let first = write_reports(&sample(), &default, None, &output).await.unwrap();
    let second = write_reports(&sample(), &default, None, &output).await.unwrap();

    assert_eq!(first.json, output.join(format!("{}_report.json", today())));
    assert_eq!(second.json, output.join(format!("{}_report_1.json", today())));
}

#[tokio::test]
async fn test_auto_html_report() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output");

    let paths = write_reports(
        &sample(),
        &dir.path().join("r.json"),
        Some(&HtmlTarget::Auto),
        &output,
    ).await.unwrap();

    let html_path = paths.html.unwrap();
    assert_eq!(html_path, output.join(format!("{}_report.html", today())));

    let html = std::fs::read_to_string(html_path).unwrap();
    assert_eq!(html.matches("<h2>").count(), 2);
    assert!(html.find("<h2>a.hu</h2>").unwrap() < html.find("<h2>b.hu</h2>").unwrap());
    assert!(html.contains("&lt;b&gt;"));
    assert!(!html.contains("\"><img src=x>"));
}

#[tokio::test]
async fn test_html_path_and_empty_findings() {
    let dir = tempfile::tempdir().unwrap();
    let html_path = dir.path().join("html/report.html");
    let target = HtmlTarget::Path(html_path.clone());

    let paths = write_reports(&[], &dir.path().join("r.json"), Some(&target), dir.path()).await.unwrap();
    assert!(paths.html.is_none());
    assert!(!html_path.exists());

    let paths = write_reports(&sample(), &dir.path().join("r.json"), Some(&target), dir.path()).await.unwrap();
    assert_eq!(paths.html, Some(html_path.clone()));
    assert!(html_path.exists());
}
