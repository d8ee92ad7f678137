//! HTML rendering for the dashboard page.
//!
//! Pure functions from view model to markup; nothing here touches the store
//! or the cache. The trend chart is emitted as a self-contained inline SVG —
//! a polyline with point markers — so the page needs no client-side script.

use std::fmt::Write;

use chrono::Datelike;

use trendlens_core::{KeywordDecodeError, TopKeyword};

use super::view::{ArticleView, DashboardView, KeywordInsights, TrendPoint};

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 260.0;
const CHART_MARGIN: f64 = 36.0;

const STYLE: &str = "body{font-family:sans-serif;margin:0;color:#222}\
.layout{display:flex}\
.sidebar{width:220px;padding:16px;background:#f3f4f6;min-height:100vh}\
main{flex:1;padding:16px 32px}\
.error{background:#fdecea;color:#b3261e;padding:8px 12px;border-radius:4px}\
.info{background:#e8f0fe;color:#1a3e72;padding:8px 12px;border-radius:4px}\
.columns{display:flex;gap:48px}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ddd;padding:6px 10px;text-align:left}\
svg{background:#fff;border:1px solid #eee}";

/// Renders the full dashboard page for one assembled view.
pub fn render(view: &DashboardView) -> String {
    let mut main = String::new();
    let _ = write!(main, "<h1>Trend Analyzer: {}</h1>\n", escape(&view.topic));
    for notice in &view.notices {
        let _ = write!(main, "<p class=\"error\">{}</p>\n", escape(notice));
    }
    main.push_str(&trend_section(view));
    main.push_str(&keyword_section(view.keywords.as_ref()));
    main.push_str(&articles_section(&view.articles));

    document(
        &view.topic,
        &format!(
            "<div class=\"layout\">\n{}<main>\n{main}</main>\n</div>\n",
            sidebar(&view.topic)
        ),
    )
}

/// Renders the single-banner page shown when the store connection could not
/// be established. Nothing else renders on this path.
pub fn render_connection_error(topic: &str, message: &str) -> String {
    let body = format!(
        "<main>\n<h1>Trend Analyzer: {}</h1>\n\
         <p class=\"error\">Failed to establish store connection: {}. \
         Dashboard cannot load data.</p>\n</main>\n",
        escape(topic),
        escape(message)
    );
    document(topic, &body)
}

fn document(topic: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Trend Analyzer: {}</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n{body}</body>\n</html>\n",
        escape(topic)
    )
}

fn sidebar(topic: &str) -> String {
    format!(
        "<aside class=\"sidebar\">\n\
         <p class=\"info\">Displaying trends for &#39;{}&#39;.</p>\n\
         <hr>\n\
         <form method=\"post\" action=\"/refresh\">\
         <button type=\"submit\">Refresh Data</button></form>\n\
         </aside>\n",
        escape(topic)
    )
}

fn trend_section(view: &DashboardView) -> String {
    let mut out = format!(
        "<section>\n<h2>Sentiment Trend (Last {} Days)</h2>\n",
        view.trend_window_days
    );
    if view.trend_points.is_empty() {
        out.push_str("<p class=\"info\">No daily sentiment trend data available.</p>\n");
    } else {
        out.push_str("<h3>Average Daily Sentiment Score</h3>\n");
        out.push_str(&trend_svg(&view.trend_points));
    }
    out.push_str("</section>\n");
    out
}

/// Line chart of date vs. average sentiment. The y-domain is pinned to the
/// score range [-1, 1]; the x-domain spans the first to last plotted date,
/// so non-contiguous dates keep their true spacing.
fn trend_svg(points: &[TrendPoint]) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };

    let min_day = i64::from(first.date.num_days_from_ce());
    let max_day = i64::from(last.date.num_days_from_ce());
    #[allow(clippy::cast_precision_loss)]
    let day_span = (max_day - min_day).max(1) as f64;
    let inner_width = CHART_WIDTH - 2.0 * CHART_MARGIN;
    let inner_height = CHART_HEIGHT - 2.0 * CHART_MARGIN;

    #[allow(clippy::cast_precision_loss)]
    let x = |date: chrono::NaiveDate| -> f64 {
        let day = i64::from(date.num_days_from_ce());
        CHART_MARGIN + (day - min_day) as f64 / day_span * inner_width
    };
    let y = |score: f64| -> f64 { CHART_MARGIN + (1.0 - (score + 1.0) / 2.0) * inner_height };

    let mut svg = format!(
        "<svg viewBox=\"0 0 {CHART_WIDTH:.0} {CHART_HEIGHT:.0}\" width=\"{CHART_WIDTH:.0}\" \
         height=\"{CHART_HEIGHT:.0}\" role=\"img\">\n"
    );

    // Zero line as the visual midpoint of the [-1, 1] score range.
    let zero_y = y(0.0);
    let _ = write!(
        svg,
        "<line x1=\"{CHART_MARGIN:.1}\" y1=\"{zero_y:.1}\" x2=\"{:.1}\" y2=\"{zero_y:.1}\" \
         stroke=\"#bbb\" stroke-dasharray=\"4 4\"/>\n",
        CHART_WIDTH - CHART_MARGIN
    );

    let mut polyline = String::new();
    for point in points {
        let _ = write!(polyline, "{:.1},{:.1} ", x(point.date), y(point.score));
    }
    let _ = write!(
        svg,
        "<polyline fill=\"none\" stroke=\"#1a73e8\" stroke-width=\"2\" points=\"{}\"/>\n",
        polyline.trim_end()
    );

    for point in points {
        let _ = write!(
            svg,
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"#1a73e8\">\
             <title>{}: {:.2}</title></circle>\n",
            x(point.date),
            y(point.score),
            point.date,
            point.score
        );
    }

    let _ = write!(
        svg,
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\">Date</text>\n",
        CHART_WIDTH / 2.0,
        CHART_HEIGHT - 8.0
    );
    let _ = write!(
        svg,
        "<text x=\"12\" y=\"{:.1}\" font-size=\"12\" transform=\"rotate(-90 12 {:.1})\" \
         text-anchor=\"middle\">Avg. Sentiment Score (-1 to 1)</text>\n",
        CHART_HEIGHT / 2.0,
        CHART_HEIGHT / 2.0
    );

    svg.push_str("</svg>\n");
    svg
}

fn keyword_section(keywords: Option<&KeywordInsights>) -> String {
    let mut out = String::from("<section>\n<h2>Keyword Insights (Latest Available Day)</h2>\n");
    match keywords {
        None => {
            out.push_str(
                "<p class=\"info\">No daily trend data available to show keyword insights.</p>\n",
            );
        }
        Some(insights) => {
            let _ = write!(out, "<h3>Keywords for: {}</h3>\n", insights.date);
            out.push_str("<div class=\"columns\">\n<div class=\"column\">\n<h4>Top Keywords</h4>\n");
            out.push_str(&top_keywords_column(&insights.top));
            out.push_str("</div>\n<div class=\"column\">\n<h4>Emerging Keywords</h4>\n");
            out.push_str(&emerging_keywords_column(&insights.emerging));
            out.push_str("</div>\n</div>\n");
        }
    }
    out.push_str("</section>\n");
    out
}

fn top_keywords_column(outcome: &Result<Vec<TopKeyword>, KeywordDecodeError>) -> String {
    match outcome {
        Err(_) => "<p class=\"error\">Error decoding top keywords.</p>\n".to_string(),
        Ok(list) if list.is_empty() => {
            "<p class=\"info\">No top keywords data for the latest day.</p>\n".to_string()
        }
        Ok(list) => {
            let mut out = String::from("<ul>\n");
            for entry in list {
                let count = entry
                    .count
                    .map_or_else(|| "N/A".to_string(), |c| c.to_string());
                let _ = write!(
                    out,
                    "<li><strong>{}</strong> (Count: {count})</li>\n",
                    escape(&entry.keyword)
                );
            }
            out.push_str("</ul>\n");
            out
        }
    }
}

fn emerging_keywords_column(outcome: &Result<Vec<String>, KeywordDecodeError>) -> String {
    match outcome {
        Err(_) => "<p class=\"error\">Error decoding emerging keywords.</p>\n".to_string(),
        Ok(list) if list.is_empty() => {
            "<p class=\"info\">No emerging keywords for the latest day.</p>\n".to_string()
        }
        Ok(list) => {
            let mut out = String::from("<ul>\n");
            for keyword in list {
                let _ = write!(out, "<li><strong>{}</strong></li>\n", escape(keyword));
            }
            out.push_str("</ul>\n");
            out
        }
    }
}

fn articles_section(articles: &[ArticleView]) -> String {
    let mut out = String::from("<section>\n<h2>Recent Articles &amp; Sentiment</h2>\n");
    if articles.is_empty() {
        out.push_str("<p class=\"info\">No recent articles with sentiment data found.</p>\n");
        out.push_str("</section>\n");
        return out;
    }

    out.push_str(
        "<table>\n<thead>\n<tr><th>Title</th><th>Source</th><th>Published</th>\
         <th>Sentiment</th><th>Score</th><th>Link</th></tr>\n</thead>\n<tbody>\n",
    );
    for article in articles {
        let label = article
            .sentiment_label
            .as_deref()
            .map_or_else(|| "&mdash;".to_string(), escape);
        let score = article
            .sentiment_score
            .map_or_else(|| "&mdash;".to_string(), |s| format!("{s:.2}"));
        let url = escape(&article.source_url);
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{label}</td><td>{score}</td>\
             <td><a href=\"{url}\" target=\"_blank\" rel=\"noopener\">{url}</a></td></tr>\n",
            escape(&article.title),
            escape(&article.source_name),
            escape(&article.published),
        );
    }
    out.push_str("</tbody>\n</table>\n</section>\n");
    out
}

fn escape(text: &str) -> String {
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

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use trendlens_core::{decode_emerging_keywords, decode_top_keywords};

    use super::*;

    fn empty_view() -> DashboardView {
        DashboardView {
            topic: "Test Topic".to_string(),
            trend_window_days: 30,
            notices: Vec::new(),
            trend_points: Vec::new(),
            keywords: None,
            articles: Vec::new(),
        }
    }

    #[test]
    fn empty_view_renders_placeholders_not_errors() {
        let html = render(&empty_view());

        assert!(html.contains("No daily sentiment trend data available."));
        assert!(html.contains("No daily trend data available to show keyword insights."));
        assert!(html.contains("No recent articles with sentiment data found."));
        assert!(
            !html.contains("class=\"error\""),
            "an empty store is a steady state, not an error"
        );
    }

    #[test]
    fn trend_chart_plots_each_point_in_date_order() {
        let mut view = empty_view();
        view.trend_points = vec![
            TrendPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                score: 0.2,
            },
            TrendPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                score: -0.1,
            },
        ];

        let html = render(&view);
        assert_eq!(html.matches("<circle").count(), 2);
        assert!(html.contains("<title>2024-01-01: 0.20</title>"));
        assert!(html.contains("<title>2024-01-03: -0.10</title>"));
        assert!(html.contains("Avg. Sentiment Score (-1 to 1)"));

        let first = html.find("2024-01-01").expect("first point present");
        let second = html.find("2024-01-03").expect("second point present");
        assert!(first < second, "points must be emitted ascending by date");
    }

    #[test]
    fn keyword_columns_fail_independently() {
        let mut view = empty_view();
        view.keywords = Some(KeywordInsights {
            date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            top: decode_top_keywords(Some("not-json")),
            emerging: decode_emerging_keywords(Some(r#"["perovskite"]"#)),
        });

        let html = render(&view);
        assert!(html.contains("Error decoding top keywords."));
        assert!(
            html.contains("<strong>perovskite</strong>"),
            "the valid column must still render"
        );
        assert!(!html.contains("Error decoding emerging keywords."));
    }

    #[test]
    fn keyword_counts_default_to_na() {
        let mut view = empty_view();
        view.keywords = Some(KeywordInsights {
            date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            top: decode_top_keywords(Some(
                r#"[{"keyword": "solar", "count": 4}, {"keyword": "wind"}]"#,
            )),
            emerging: decode_emerging_keywords(None),
        });

        let html = render(&view);
        assert!(html.contains("<strong>solar</strong> (Count: 4)"));
        assert!(html.contains("<strong>wind</strong> (Count: N/A)"));
        assert!(html.contains("No emerging keywords for the latest day."));
    }

    #[test]
    fn empty_decoded_list_is_a_placeholder_not_an_error() {
        let mut view = empty_view();
        view.keywords = Some(KeywordInsights {
            date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            top: decode_top_keywords(Some("[]")),
            emerging: decode_emerging_keywords(Some("[]")),
        });

        let html = render(&view);
        assert!(html.contains("No top keywords data for the latest day."));
        assert!(html.contains("No emerging keywords for the latest day."));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn articles_render_links_and_blank_sentiment() {
        let mut view = empty_view();
        view.articles = vec![ArticleView {
            title: "Storage <record> & more".to_string(),
            source_name: "Renewables Daily".to_string(),
            published: "2024-01-03 08:00".to_string(),
            sentiment_label: None,
            sentiment_score: None,
            source_url: "https://news.example.com/articles/1".to_string(),
        }];

        let html = render(&view);
        assert!(html.contains("Storage &lt;record&gt; &amp; more"), "titles are escaped");
        assert!(html.contains(
            "<a href=\"https://news.example.com/articles/1\" target=\"_blank\" rel=\"noopener\">"
        ));
        assert!(
            html.contains("<td>&mdash;</td><td>&mdash;</td>"),
            "missing sentiment renders as blanks, the row itself stays"
        );
    }

    #[test]
    fn notices_render_as_error_banners() {
        let mut view = empty_view();
        view.notices
            .push("Error fetching daily trends: disk I/O error".to_string());

        let html = render(&view);
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("Error fetching daily trends: disk I/O error"));
    }

    #[test]
    fn connection_error_page_is_a_single_banner() {
        let html = render_connection_error("Test Topic", "store file 'x.db' does not exist");

        assert!(html.contains("Failed to establish store connection"));
        assert!(html.contains("Dashboard cannot load data."));
        assert!(!html.contains("<section"), "no panels render on this path");
        assert!(!html.contains("Refresh Data"), "no sidebar on this path");
    }

    #[test]
    fn sidebar_names_the_topic_and_carries_the_refresh_control() {
        let html = render(&empty_view());
        assert!(html.contains("Displaying trends for &#39;Test Topic&#39;."));
        assert!(html.contains("<form method=\"post\" action=\"/refresh\">"));
        assert!(html.contains("Refresh Data"));
    }

    #[test]
    fn escape_covers_html_metacharacters() {
        assert_eq!(
            escape(r#"<a href="x">&'y'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;y&#39;&lt;/a&gt;"
        );
    }
}
