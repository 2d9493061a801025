//! Per-batch HTML report emission.
//!
//! Rendering sits behind the [`ReportRenderer`] seam; the production renderer
//! assembles the document by hand. Emission is write-then-rename so a reader
//! never observes a partially written report.

use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::ReconError;
use crate::fetch::FetchResult;

/// Capability interface for turning a batch's results into a document.
#[cfg_attr(test, mockall::automock)]
pub trait ReportRenderer: Send + Sync {
    fn render(&self, results: &[FetchResult]) -> Result<String, ReconError>;
}

/// Default renderer: a self-contained HTML table of target, title, and
/// screenshot per row.
pub struct HtmlReportRenderer;

impl ReportRenderer for HtmlReportRenderer {
    fn render(&self, results: &[FetchResult]) -> Result<String, ReconError> {
        let mut rows = String::new();

        for result in results {
            let screenshot_cell = match &result.screenshot {
                Some(path) => format!(
                    r#"<img src="{}" alt="screenshot of {}" loading="lazy">"#,
                    escape(&path.display().to_string()),
                    escape(&result.target),
                ),
                None => r#"<span class="missing">no screenshot</span>"#.to_string(),
            };

            rows.push_str(&format!(
                "<tr>\n  <td><a href=\"{url}\">{target}</a></td>\n  <td>{title}</td>\n  <td>{shot}</td>\n</tr>\n",
                url = escape(&result.url),
                target = escape(&result.target),
                title = escape(&result.title),
                shot = screenshot_cell,
            ));
        }

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Reconnaissance Report</title>
<style>
body {{ font-family: sans-serif; margin: 24px; background: #fafafa; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ddd; padding: 8px; vertical-align: top; text-align: left; }}
th {{ background: #f0f0f0; }}
img {{ max-width: 480px; border: 1px solid #ccc; }}
.missing {{ color: #888; font-style: italic; }}
</style>
</head>
<body>
<h1>Reconnaissance Report</h1>
<p>{count} targets</p>
<table>
<tr><th>Target</th><th>Title</th><th>Screenshot</th></tr>
{rows}</table>
</body>
</html>
"#,
            count = results.len(),
            rows = rows,
        ))
    }
}

/// Render one batch's results and write the report atomically.
///
/// The document is written to a sibling temp file and renamed into place;
/// rename on the same filesystem is atomic, so the destination is either the
/// previous state or the complete report.
pub async fn write_report(
    renderer: &dyn ReportRenderer,
    results: &[FetchResult],
    path: &Path,
) -> Result<(), ReconError> {
    let document = renderer.render(results)?;

    let tmp = path.with_extension("html.tmp");
    let write_err = |source| ReconError::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    fs::write(&tmp, &document).await.map_err(write_err)?;
    fs::rename(&tmp, path).await.map_err(write_err)?;

    info!("HTML report generated: {}", path.display());
    Ok(())
}

fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_results() -> Vec<FetchResult> {
        vec![
            FetchResult {
                target: "example.com".into(),
                url: "http://example.com".into(),
                title: "Example <Domain>".into(),
                screenshot: Some(PathBuf::from("screenshots/http_example.com.png")),
            },
            FetchResult::failed("down.example".into(), "http://down.example".into()),
        ]
    }

    #[test]
    fn test_render_escapes_and_marks_missing_screenshots() {
        let html = HtmlReportRenderer.render(&sample_results()).unwrap();

        assert!(html.contains("Example &lt;Domain&gt;"));
        assert!(html.contains("screenshots/http_example.com.png"));
        assert!(html.contains("Failed to Fetch"));
        assert!(html.contains("no screenshot"));
    }

    #[tokio::test]
    async fn test_write_report_is_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("url_report_1.html");

        write_report(&HtmlReportRenderer, &sample_results(), &path)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(!path.with_extension("html.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_report_unwritable_destination_is_fatal() {
        let result = write_report(
            &HtmlReportRenderer,
            &sample_results(),
            Path::new("/nonexistent/dir/report_1.html"),
        )
        .await;

        assert!(matches!(result, Err(ReconError::ReportWrite { .. })));
    }

    #[tokio::test]
    async fn test_write_report_render_failure_is_fatal() {
        let mut renderer = MockReportRenderer::new();
        renderer
            .expect_render()
            .returning(|_| Err(ReconError::Render("missing template".into())));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report_1.html");
        let result = write_report(&renderer, &[], &path).await;

        assert!(matches!(result, Err(ReconError::Render(_))));
        assert!(!path.exists());
    }
}
