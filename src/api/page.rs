//! HTML for the goal page.
//!
//! Everything here is a pure function of the subscriber count, the goal, and the channel
//! roster.

use core::fmt::Write;

use num_format::{Locale, ToFormattedString};

use crate::constants::{AVATAR_SIZE, Channel, GROUP_NAME};

/// `min(100, floor(count / goal * 100))`; a zero goal counts as reached
pub fn percentage(count: u64, goal: u64) -> u8 {
    if goal == 0 {
        return 100;
    }

    let pct = (u128::from(count) * 100) / u128::from(goal);
    pct.min(100) as u8
}

pub fn status_line(pct: u8) -> String {
    if pct < 100 {
        format!("{GROUP_NAME} has reached <strong>{pct}%</strong> of their goal.")
    } else {
        format!("{GROUP_NAME} has reached the goal for their 3D debut. Congratulations!")
    }
}

pub fn render(count: u64, goal: u64, channels: &[Channel]) -> String {
    let pct = percentage(count, goal);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{group} Subscriber Goal</title>
    <style>{styles}</style>
</head>
<body>
    <div class="background-container"><div class="background"></div></div>
    <main class="main">
        <div class="text-container">{status}</div>
        {progress}
        <div class="details-container">
            <p>Current Subscribers: {count}</p>
            <p>Subscribers Goal: {goal}</p>
        </div>
        <div class="channels-container">
{roster}        </div>
    </main>
</body>
</html>"#,
        group = GROUP_NAME,
        styles = styles(),
        status = status_line(pct),
        progress = progress_bar(pct),
        count = count.to_formatted_string(&Locale::en),
        goal = goal.to_formatted_string(&Locale::en),
        roster = roster(channels),
    )
}

fn progress_bar(pct: u8) -> String {
    format!(
        r#"<div class="progress-bar-container">
            <div class="progress-bar-inner" style="width: {pct}%"></div>
            <div class="progress-bar-percentage">{pct}%</div>
        </div>"#
    )
}

fn roster(channels: &[Channel]) -> String {
    let mut out = String::new();
    for ch in channels {
        let name = escape(ch.name);
        // writing into a String can't fail
        let _ = write!(
            out,
            r#"            <a href="{url}" target="_blank" rel="noopener">
                <div class="channel-container">
                    <img class="channel-avatar" src="{avatar}" alt="{name}" width="{size}" height="{size}">
                    <p class="channel-text">{name}</p>
                </div>
            </a>
"#,
            url = escape(ch.url),
            avatar = escape(ch.avatar),
            name = name,
            size = AVATAR_SIZE,
        );
    }

    out
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }

    out
}

fn styles() -> &'static str {
    r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            color: #f5f5f5;
            background: #101018;
        }
        .background-container { position: fixed; inset: 0; z-index: -1; overflow: hidden; }
        .background {
            width: 100%;
            height: 100%;
            background: linear-gradient(135deg, #1c2a5a 0%, #5a1c4a 100%);
            opacity: 0.6;
        }
        .main {
            display: flex;
            flex-direction: column;
            align-items: center;
            gap: 2rem;
            padding: 4rem 1rem;
        }
        .text-container { font-size: 1.75rem; text-align: center; }
        .progress-bar-container {
            position: relative;
            width: min(720px, 90vw);
            height: 2.5rem;
            border-radius: 1.25rem;
            background: rgba(255, 255, 255, 0.15);
            overflow: hidden;
        }
        .progress-bar-inner { height: 100%; background: #e8b4d8; }
        .progress-bar-percentage {
            position: absolute;
            inset: 0;
            display: flex;
            align-items: center;
            justify-content: center;
            font-weight: 600;
        }
        .details-container { text-align: center; line-height: 1.8; }
        .channels-container { display: flex; flex-wrap: wrap; justify-content: center; gap: 1.5rem; }
        .channels-container a { color: inherit; text-decoration: none; }
        .channel-container { display: flex; flex-direction: column; align-items: center; gap: 0.5rem; }
        .channel-avatar { border-radius: 50%; }
    "#
}
