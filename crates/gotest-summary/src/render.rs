// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Job summary rendering
//!
//! Renders a [`Report`] as Markdown with embedded HTML, in the shape GitHub
//! job summaries display: a heading, a totals line, an optional mermaid pie
//! chart, and one table row per package with collapsible test lists and
//! output.

use gotest_events::{Conclusion, PackageResult, Report, TestResult};
use serde_json::json;
use tracing::debug;

use crate::config::OmitOption;

const TABLE_HEADERS: [&str; 5] = [
    "📦 Package",
    "🟢 Passed",
    "🔴 Failed",
    "🟡 Skipped",
    "⏳ Duration",
];

/// Emoji displayed for a conclusion
#[must_use]
pub fn emoji_for(conclusion: Option<Conclusion>) -> &'static str {
    match conclusion {
        Some(Conclusion::Pass) => "🟢",
        Some(Conclusion::Fail) => "🔴",
        Some(Conclusion::Skip) => "🟡",
        None => "❓",
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn pie_label(conclusion: Conclusion) -> (&'static str, &'static str) {
    match conclusion {
        Conclusion::Pass => ("Passed", "#2da44e"),
        Conclusion::Fail => ("Failed", "#cf222e"),
        Conclusion::Skip => ("Skipped", "#dbab0a"),
    }
}

fn past_tense(conclusion: Conclusion) -> &'static str {
    match conclusion {
        Conclusion::Pass => "passed",
        Conclusion::Fail => "failed",
        Conclusion::Skip => "skipped",
    }
}

/// Renders a report into a job summary
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    report: &'a Report,
    module_name: Option<&'a str>,
    stderr: &'a str,
    omit: &'a [OmitOption],
}

impl<'a> Renderer<'a> {
    /// Create a renderer with no module name, stderr or omissions
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self {
            report,
            module_name: None,
            stderr: "",
            omit: &[],
        }
    }

    /// Set the module name shown in the title and used to mark the main package
    #[must_use]
    pub fn with_module_name(mut self, module_name: Option<&'a str>) -> Self {
        self.module_name = module_name;
        self
    }

    /// Set the captured stderr of the test run
    #[must_use]
    pub fn with_stderr(mut self, stderr: &'a str) -> Self {
        self.stderr = stderr;
        self
    }

    /// Set the sections to leave out
    #[must_use]
    pub fn with_omit(mut self, omit: &'a [OmitOption]) -> Self {
        self.omit = omit;
        self
    }

    fn omits(&self, option: OmitOption) -> bool {
        self.omit.contains(&option)
    }

    /// Packages that survive the `skipped` and `successful` omissions
    #[must_use]
    pub fn packages_to_render(&self) -> Vec<&'a PackageResult> {
        self.report
            .packages()
            .iter()
            .filter(|p| !(self.omits(OmitOption::Skipped) && !p.has_tests()))
            .filter(|p| {
                !(self.omits(OmitOption::Successful)
                    && p.conclusion() == Some(Conclusion::Pass)
                    && p.only_successful_tests())
            })
            .collect()
    }

    /// Render the summary
    ///
    /// Returns `None` when no package is left to render.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        let packages = self.packages_to_render();
        if packages.is_empty() {
            debug!("No packages with tests, skipping render");
            return None;
        }

        let mut out = String::new();
        out.push_str("<h2>📝 Test results</h2>\n");
        out.push_str("<div align=\"center\">");
        out.push_str(&format!(
            "<h3><code>{}</code></h3>",
            escape_html(self.module_name.unwrap_or("go test"))
        ));
        out.push_str(&self.summary_text());
        out.push_str(&self.render_pie());
        out.push_str(&self.render_table(&packages));
        out.push('\n');
        out.push_str("</div>");
        out.push_str(&self.render_stderr());
        Some(out)
    }

    /// Totals line, e.g. `4 tests (2 passed, 1 failed, 1 skipped)`
    #[must_use]
    pub fn summary_text(&self) -> String {
        let totals = self.report.totals();
        let count = totals.total();

        let mut text = format!("{count} test{}", if count == 1 { "" } else { "s" });

        let breakdown: Vec<String> = Conclusion::ALL
            .iter()
            .filter(|c| totals.get(**c) != 0)
            .map(|c| format!("{} {}", totals.get(*c), past_tense(*c)))
            .collect();

        if !breakdown.is_empty() {
            text.push_str(&format!(" ({})", breakdown.join(", ")));
        }

        text
    }

    fn render_pie(&self) -> String {
        if self.omits(OmitOption::Pie) {
            return "<br><br>".to_string();
        }

        let totals = self.report.totals();
        let mut theme_variables = serde_json::Map::new();
        theme_variables.insert("fontFamily".to_string(), json!("monospace"));
        theme_variables.insert("pieSectionTextSize".to_string(), json!("24px"));
        theme_variables.insert("darkMode".to_string(), json!(true));

        let mut data = String::new();
        for (index, conclusion) in Conclusion::ALL
            .into_iter()
            .filter(|c| totals.get(*c) != 0)
            .enumerate()
        {
            let (word, color) = pie_label(conclusion);
            theme_variables.insert(format!("pie{}", index + 1), json!(color));
            data.push_str(&format!("\"{word}\" : {}\n", totals.get(conclusion)));
        }

        let pie_config = json!({
            "theme": "base",
            "themeVariables": theme_variables,
        });

        format!("\n\n```mermaid\n%%{{init: {pie_config}}}%%\npie showData\n{data}```\n\n")
    }

    fn render_table(&self, packages: &[&PackageResult]) -> String {
        let mut table = String::from("<table>");

        table.push_str("<tr>");
        for header in TABLE_HEADERS {
            table.push_str(&format!("<th>{header}</th>"));
        }
        table.push_str("</tr>");

        for package in packages {
            table.push_str(&self.render_package_rows(package));
        }

        table.push_str("</table>");
        table
    }

    fn render_package_rows(&self, package: &PackageResult) -> String {
        let conclusions = package.conclusions();
        let main_marker = if Some(package.package()) == self.module_name {
            " (main)"
        } else {
            ""
        };
        let name = format!(
            "{} <code>{}{main_marker}</code>",
            emoji_for(package.conclusion()),
            escape_html(package.package())
        );
        let duration = format!("{}ms", package.elapsed().unwrap_or(0.0) * 1000.0);

        let mut rows = String::from("<tr>");
        for cell in [
            name,
            conclusions.pass.to_string(),
            conclusions.fail.to_string(),
            conclusions.skip.to_string(),
            duration,
        ] {
            rows.push_str(&format!("<td>{cell}</td>"));
        }
        rows.push_str("</tr>");

        let mut details = String::new();
        if !self.omits(OmitOption::PackageTests) {
            let tests = render_test_list(package);
            details.push_str(&format!(
                "<details><summary>🧪 Tests</summary>{}</details>",
                if tests.is_empty() { "(none)" } else { tests.as_str() }
            ));
        }
        if !self.omits(OmitOption::PackageOutput) {
            let output = package.output();
            details.push_str(&format!(
                "<details><summary>🖨️ Output</summary><pre><code>{}</code></pre></details>",
                if output.is_empty() {
                    "(none)".to_string()
                } else {
                    escape_html(&output)
                }
            ));
        }
        if !details.is_empty() {
            rows.push_str(&format!("<tr><td colspan=\"5\">{details}</td></tr>"));
        }

        rows
    }

    fn render_stderr(&self) -> String {
        if self.stderr.is_empty() || self.omits(OmitOption::Stderr) {
            return String::new();
        }

        format!(
            "<details><summary>🚨 Standard Error Output</summary><pre><code>{}</code></pre></details>",
            escape_html(self.stderr)
        )
    }
}

/// Nested list of tests and subtests, both in lexicographic order
fn render_test_list(package: &PackageResult) -> String {
    if package.tests().is_empty() {
        return String::new();
    }

    let mut list = String::from("<ul>");
    for (name, result) in package.tests() {
        list.push_str(&render_test_item(name, result));

        if !result.subtests.is_empty() {
            list.push_str("<ul>");
            for (subtest_name, subtest) in &result.subtests {
                list.push_str(&render_test_item(subtest_name, subtest));
            }
            list.push_str("</ul>");
        }
    }
    list.push_str("</ul>");
    list
}

fn render_test_item(name: &str, result: &TestResult) -> String {
    format!(
        "<li>{}<code>{}</code></li>",
        emoji_for(result.effective_conclusion()),
        escape_html(name)
    )
}
