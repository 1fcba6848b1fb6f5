use cn_core::{CollectionResult, PeriodResult};

const TITLE_PREVIEW_CHARS: usize = 80;
const TOP_ARTICLES: usize = 3;

/// Renders the fixed-format summary block: header, then one section per
/// period in collection order, each either an error line or range,
/// counts and up to the first three article titles.
pub fn render_report(result: &CollectionResult) -> String {
    let mut report = format!(
        "\nCOMPANY NEWS SUMMARY REPORT\n\
         ==========================\n\
         Company: {}\n\
         Generated: {}\n\n\
         PERIOD SUMMARY:\n",
        result.company_name,
        result.collected_at.to_rfc3339()
    );

    for (name, period) in &result.periods {
        let heading = display_name(name);
        match period {
            PeriodResult::Failed { error, .. } => {
                report.push_str(&format!("\n{}: ERROR - {}", heading, error));
            }
            PeriodResult::Collected {
                date_range,
                total_results,
                articles_collected,
                articles,
            } => {
                report.push_str(&format!("\n{}:", heading));
                report.push_str(&format!(
                    "\n  Date Range: {} to {}",
                    date_range.from, date_range.to
                ));
                report.push_str(&format!("\n  Total Available: {} articles", total_results));
                report.push_str(&format!("\n  Collected: {} articles", articles_collected));
                if !articles.is_empty() {
                    report.push_str("\n  Top Articles:");
                    for (i, article) in articles.iter().take(TOP_ARTICLES).enumerate() {
                        report.push_str(&format!("\n    {}. {}", i + 1, preview(&article.title)));
                    }
                }
                report.push('\n');
            }
        }
    }

    report
}

/// Title-cases the window name: `present_to_2weeks` renders as
/// `Present To 2Weeks`. Any non-letter starts a new word.
fn display_name(window_name: &str) -> String {
    let spaced = window_name.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut boundary = true;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if boundary {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            boundary = false;
        } else {
            out.push(c);
            boundary = true;
        }
    }
    out
}

fn preview(title: &str) -> String {
    if title.chars().count() > TITLE_PREVIEW_CHARS {
        let truncated: String = title.chars().take(TITLE_PREVIEW_CHARS).collect();
        format!("{}...", truncated)
    } else {
        title.to_string()
    }
}
