//! Daily mail rendering.
//!
//! Produces a plain-text body and an HTML body from the same inputs. All
//! word-list and fetched text is HTML-escaped; media are inlined as
//! `data:` URIs.

use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use indoc::{formatdoc, indoc};
use std::fmt::Write;

use crate::enrichment::EnrichedWord;
use crate::review::ProgressSummary;

const RULE: &str = "==================================================";

const STYLE: &str = indoc! {r#"
    body { font-family: -apple-system, "Segoe UI", "PingFang SC", sans-serif; background: #f4f6fb; margin: 0; padding: 24px; color: #1f2937; }
    .wrap { max-width: 640px; margin: 0 auto; }
    h1 { font-size: 22px; margin: 0 0 16px; }
    .card { background: #fff; border-radius: 12px; padding: 20px; margin-bottom: 16px; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
    .word { font-size: 24px; font-weight: 700; }
    .phonetic { color: #6b7280; margin-left: 8px; }
    .badge { display: inline-block; font-size: 12px; padding: 2px 8px; border-radius: 999px; margin-left: 8px; }
    .badge.new { background: #dbeafe; color: #1d4ed8; }
    .badge.review { background: #fef3c7; color: #b45309; }
    .definition { margin: 12px 0; }
    .example { border-left: 3px solid #93c5fd; padding-left: 12px; color: #374151; }
    .example .zh { color: #6b7280; }
    img { max-width: 100%; border-radius: 8px; margin-top: 12px; }
    audio { margin-top: 12px; width: 100%; }
    .progress { background: #fff; border-radius: 12px; padding: 16px 20px; }
    .bar { background: #e5e7eb; border-radius: 999px; height: 8px; overflow: hidden; margin-top: 8px; }
    .bar > div { background: #3b82f6; height: 100%; }
    .footer { text-align: center; color: #9ca3af; font-size: 13px; margin-top: 16px; }
"#};

/// Renders the daily word mail.
#[derive(Debug, Clone, Copy, Default)]
pub struct MailComposer;

impl MailComposer {
    pub fn subject(date: NaiveDate) -> String {
        format!("📚 每日单词 - {}", display_date(date))
    }

    pub fn render_text(words: &[EnrichedWord], progress: &ProgressSummary, date: NaiveDate) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "📚 每日单词学习 - {}", display_date(date));
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out);

        for (i, w) in words.iter().enumerate() {
            let record = &w.word.record;
            let _ = writeln!(out, "{}. {} {}", i + 1, record.word, record.phonetic);
            let _ = writeln!(out, "   {}", record.definition);
            if let (Some(en), Some(zh)) = (&w.media.example_en, &w.media.example_zh) {
                let _ = writeln!(out, "   例: {en}");
                let _ = writeln!(out, "       {zh}");
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(
            out,
            "学习进度: {}/{} ({}%)",
            progress.learned, progress.total, progress.progress_percent
        );
        let _ = writeln!(out);
        let _ = write!(out, "💡 坚持每天学习，积累成就未来");
        out
    }

    pub fn render_html(words: &[EnrichedWord], progress: &ProgressSummary, date: NaiveDate) -> String {
        let cards: String = words.iter().map(render_card).collect();
        let bar_width = progress.progress_percent.clamp(0.0, 100.0);

        formatdoc! {r#"
            <!DOCTYPE html>
            <html lang="zh-CN">
            <head>
            <meta charset="utf-8">
            <title>{title}</title>
            <style>
            {STYLE}
            </style>
            </head>
            <body>
            <div class="wrap">
            <h1>{title}</h1>
            {cards}
            <div class="progress">
            <div>学习进度 {learned}/{total} ({progress_percent}%) · 已掌握 {mastered} ({mastery_percent}%)</div>
            <div class="bar"><div style="width: {bar_width}%"></div></div>
            </div>
            <div class="footer">💡 坚持每天学习，积累成就未来</div>
            </div>
            </body>
            </html>
        "#,
            title = text(&format!("📚 每日单词 - {}", display_date(date))),
            learned = progress.learned,
            total = progress.total,
            progress_percent = progress.progress_percent,
            mastered = progress.mastered,
            mastery_percent = progress.mastery_percent,
        }
    }
}

fn render_card(w: &EnrichedWord) -> String {
    let record = &w.word.record;
    let mut card = String::from("<div class=\"card\">\n");

    let badge = if w.word.is_review {
        format!(
            "<span class=\"badge review\">复习 · 等级 {}</span>",
            w.word.mastery_level.unwrap_or_default()
        )
    } else {
        "<span class=\"badge new\">新词</span>".to_string()
    };
    let _ = writeln!(
        card,
        "<div><span class=\"word\">{}</span><span class=\"phonetic\">{}</span>{badge}</div>",
        text(&record.word),
        text(&record.phonetic),
    );
    let _ = writeln!(card, "<div class=\"definition\">{}</div>", text(&record.definition));

    if let (Some(en), Some(zh)) = (&w.media.example_en, &w.media.example_zh) {
        let _ = writeln!(
            card,
            "<div class=\"example\"><div>{}</div><div class=\"zh\">{}</div></div>",
            text(en),
            text(zh),
        );
    }
    if let Some(image) = &w.media.image {
        let _ = writeln!(card, "<img src=\"{}\" alt=\"{}\">", attr(image), attr(&record.word));
    }
    if let Some(audio) = &w.media.audio {
        let _ = writeln!(card, "<audio controls src=\"{}\"></audio>", attr(audio));
    }

    card.push_str("</div>\n");
    card
}

fn display_date(date: NaiveDate) -> String {
    date.format("%Y年%m月%d日").to_string()
}
