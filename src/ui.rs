use crate::app::App;
use crate::github::Profile;
use crate::search::View;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const NOT_AVAILABLE: &str = "Not Available";

pub fn draw(frame: &mut Frame, app: &App) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" GitHub Profile Finder ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let inner = outer.inner(frame.area());
    frame.render_widget(outer, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    draw_input(frame, chunks[0], app);

    match app.search.view() {
        View::Idle => draw_idle(frame, chunks[1]),
        View::Loading => draw_loading(frame, chunks[1]),
        View::NotFound => draw_not_found(frame, chunks[1]),
        View::Found(profile) => draw_profile(frame, chunks[1], profile),
    }
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Search ")
        .border_style(Style::default().fg(Color::Yellow));

    let query = app.search.query();
    let paragraph = if query.is_empty() {
        Paragraph::new(Span::styled(
            "Type to search a username... (e.g. octocat)",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(query)
    };
    frame.render_widget(paragraph.block(block), area);

    let cursor_col = query[..app.search.cursor()].chars().count() as u16;
    frame.set_cursor_position((area.x + 1 + cursor_col, area.y + 1));
}

fn draw_idle(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Search any GitHub user to see their profile statistics.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: search now | Esc: clear/quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn draw_loading(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Fetching profile...",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn draw_not_found(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "User not found",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Try searching for another username",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn draw_profile(frame: &mut Frame, area: Rect, profile: &Profile) {
    let bio = present(profile.bio.as_deref());
    let bio_height = bio
        .map(|b| textwrap::wrap(b, area.width.saturating_sub(2) as usize).len().min(3) as u16)
        .unwrap_or(0);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(bio_height),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(2),
        ])
        .split(area);

    draw_header(frame, chunks[0], profile);
    if let Some(bio) = bio {
        draw_bio(frame, chunks[1], bio);
    }
    draw_stats(frame, chunks[2], profile);
    draw_details(frame, chunks[3], profile);
    draw_footer(frame, chunks[4], profile);
}

fn draw_header(frame: &mut Frame, area: Rect, profile: &Profile) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(area);

    // Terminal stand-in for the avatar image: the first letter of the
    // display name (or login) in a badge.
    let badge = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            profile.initial().to_uppercase().to_string(),
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(badge, columns[0]);

    let joined = profile
        .created_at
        .as_deref()
        .map(|raw| format!("Joined {}", format_joined_date(raw)))
        .unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(
            profile.display_name().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("@{}", profile.login),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(joined, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines), columns[1]);
}

fn draw_bio(frame: &mut Frame, area: Rect, bio: &str) {
    let lines: Vec<Line> = textwrap::wrap(bio, area.width.saturating_sub(2) as usize)
        .into_iter()
        .take(area.height as usize)
        .map(|line| Line::from(Span::styled(line.into_owned(), Style::default().fg(Color::Gray))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_stats(frame: &mut Frame, area: Rect, profile: &Profile) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let stats = [
        ("Repos", profile.public_repos),
        ("Followers", profile.followers),
        ("Following", profile.following),
        ("Gists", profile.public_gists),
    ];

    for (tile, (label, value)) in tiles.iter().zip(stats) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {label} "))
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(Span::styled(
            value.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, *tile);
    }
}

fn draw_details(frame: &mut Frame, area: Rect, profile: &Profile) {
    let rows = vec![
        detail_row("Location", present(profile.location.as_deref()).map(str::to_string)),
        detail_row(
            "Twitter ",
            present(profile.twitter_username.as_deref()).map(twitter_url),
        ),
        detail_row("Website ", present(profile.blog.as_deref()).map(blog_url)),
        detail_row("Company ", present(profile.company.as_deref()).map(str::to_string)),
    ];
    frame.render_widget(Paragraph::new(rows), area);
}

fn detail_row(label: &str, value: Option<String>) -> Line<'static> {
    let label_span = Span::styled(
        format!("{label}  "),
        Style::default().fg(Color::Yellow),
    );
    match value {
        Some(value) => Line::from(vec![
            label_span,
            Span::styled(value, Style::default().fg(Color::White)),
        ]),
        None => Line::from(vec![
            label_span,
            Span::styled(
                NOT_AVAILABLE,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        ]),
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, profile: &Profile) {
    let mut lines = Vec::new();
    if let Some(url) = profile.html_url.as_deref() {
        lines.push(Line::from(vec![
            Span::styled("Profile   ", Style::default().fg(Color::Yellow)),
            Span::styled(url.to_string(), Style::default().fg(Color::Blue)),
        ]));
    }
    lines.push(Line::from(Span::styled(
        "Ctrl+O: open profile | Ctrl+B: open website | Ctrl+T: open twitter",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines), area);
}

/// Treat missing and blank-string API values the same way. GitHub sends
/// `"blog": ""` rather than null for users without a website.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn twitter_url(handle: &str) -> String {
    format!("https://twitter.com/{handle}")
}

/// Blog values come back with or without a scheme; bare domains get one.
pub fn blog_url(blog: &str) -> String {
    if blog.starts_with("http") {
        blog.to_string()
    } else {
        format!("https://{blog}")
    }
}

/// "2011-01-25T18:44:36Z" -> "25 Jan 2011". Unparseable values pass
/// through untouched.
pub fn format_joined_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|date| date.format("%-d %b %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_joined_date() {
        assert_eq!(format_joined_date("2011-01-25T18:44:36Z"), "25 Jan 2011");
        assert_eq!(format_joined_date("2020-06-05T00:00:00Z"), "5 Jun 2020");
        assert_eq!(format_joined_date("not a date"), "not a date");
    }

    #[test]
    fn test_blog_url_gains_scheme_when_missing() {
        assert_eq!(blog_url("example.com"), "https://example.com");
        assert_eq!(blog_url("https://example.com"), "https://example.com");
        assert_eq!(blog_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn test_twitter_url() {
        assert_eq!(twitter_url("octocat"), "https://twitter.com/octocat");
    }

    #[test]
    fn test_present_filters_blank_values() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some("")), None);
        assert_eq!(present(Some("   ")), None);
        assert_eq!(present(Some(" x ")), Some("x"));
    }
}
