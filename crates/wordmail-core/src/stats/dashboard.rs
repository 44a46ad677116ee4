//! HTML statistics page.

use html_escape::encode_text as text;
use indoc::{formatdoc, indoc};
use std::fmt::Write;

use super::StatisticsReport;

const STYLE: &str = indoc! {r#"
    body { font-family: -apple-system, "Segoe UI", "PingFang SC", sans-serif; background: #f4f6fb; margin: 0; padding: 24px; color: #1f2937; }
    .wrap { max-width: 880px; margin: 0 auto; }
    .tiles { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 12px; margin-bottom: 20px; }
    .tile { background: #fff; border-radius: 12px; padding: 16px; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
    .tile .value { font-size: 26px; font-weight: 700; }
    .tile .label { color: #6b7280; font-size: 13px; }
    section { background: #fff; border-radius: 12px; padding: 16px 20px; margin-bottom: 16px; }
    table { width: 100%; border-collapse: collapse; }
    td, th { text-align: left; padding: 6px 4px; border-bottom: 1px solid #f1f5f9; }
    .bars { display: flex; align-items: flex-end; gap: 3px; height: 120px; }
    .bars div { flex: 1; background: #3b82f6; min-height: 1px; border-radius: 2px 2px 0 0; }
    .muted { color: #9ca3af; font-size: 13px; }
"#};

/// Render the dashboard page for `report`.
pub fn render_dashboard(report: &StatisticsReport) -> String {
    let tiles = [
        (report.total_learned.to_string(), "已学单词"),
        (report.total_reviews.to_string(), "累计复习"),
        (format!("{}%", report.mastery_rate), "掌握率"),
        (format!("{}%", report.progress), "学习进度"),
        (report.streak_days.to_string(), "连续天数"),
        (report.today_review_count.to_string(), "今日待复习"),
    ]
    .iter()
    .fold(String::new(), |mut out, (value, label)| {
        let _ = writeln!(
            out,
            "<div class=\"tile\"><div class=\"value\">{value}</div><div class=\"label\">{label}</div></div>"
        );
        out
    });

    let mut levels = String::new();
    for (level, count) in &report.mastery_distribution {
        let _ = writeln!(levels, "<tr><td>等级 {level}</td><td>{count}</td></tr>");
    }

    let mut recent = String::new();
    for w in &report.recent_words {
        let _ = writeln!(
            recent,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            text(&w.state.word),
            w.state.mastery_level,
            w.state.last_review,
            w.state.next_review,
        );
    }

    let peak = report.daily_stats.iter().map(|d| d.count).max().unwrap_or(0).max(1);
    let mut bars = String::new();
    for day in &report.daily_stats {
        let height = day.count * 100 / peak;
        let _ = write!(
            bars,
            "<div style=\"height: {height}%\" title=\"{} · {}\"></div>",
            day.date, day.count
        );
    }

    let updated = report
        .last_update
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".into());

    formatdoc! {r#"
        <!DOCTYPE html>
        <html lang="zh-CN">
        <head>
        <meta charset="utf-8">
        <title>单词学习统计</title>
        <style>
        {STYLE}
        </style>
        </head>
        <body>
        <div class="wrap">
        <h1>单词学习统计</h1>
        <div class="tiles">
        {tiles}
        </div>
        <section>
        <h2>最近 30 天新词</h2>
        <div class="bars">{bars}</div>
        </section>
        <section>
        <h2>掌握度分布</h2>
        <table>{levels}</table>
        </section>
        <section>
        <h2>最近复习</h2>
        <table>
        <tr><th>单词</th><th>等级</th><th>上次复习</th><th>下次复习</th></tr>
        {recent}
        </table>
        </section>
        <div class="muted">最后更新: {updated}</div>
        </div>
        </body>
        </html>
    "#}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::{ReviewState, SchedulerState};
    use chrono::NaiveDate;

    #[test]
    fn renders_tiles_and_escapes_words() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let mut state = SchedulerState::default();
        state
            .words
            .insert(0, ReviewState::introduced("<b>bold</b>", today, 1));
        state.used_indices.insert(0);

        let html = render_dashboard(&StatisticsReport::compute(&state, 10, today));

        assert!(html.contains("单词学习统计"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("10%"));
        assert!(html.contains("最后更新: N/A"));
    }

    #[test]
    fn empty_report_renders() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let html = render_dashboard(&StatisticsReport::compute(&SchedulerState::default(), 0, today));
        assert!(html.contains("<div class=\"bars\">"));
    }
}
