//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::domain::{Comment, Gist, GistInfo};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// One `gisty list` row.
pub fn gist_row(gist: &GistInfo) -> String {
    let visibility = if gist.is_public {
        "public".green()
    } else {
        "secret".yellow()
    };
    let files = if gist.files == 1 { "file" } else { "files" };
    format!(
        "{}  {}  {} {}  {}  {}",
        gist.id.bold(),
        gist.description,
        gist.files,
        files,
        visibility,
        gist.updated_at.format("%Y-%m-%d %H:%M")
    )
}

pub fn print_gist(gist: &Gist) {
    header(gist.description.as_deref().unwrap_or(gist.id.as_str()));
    if !gist.html_url.is_empty() {
        detail(&gist.html_url);
    }
    for (name, file) in &gist.files {
        println!();
        action(name, &file.language.as_deref().unwrap_or("text"));
        info(&file.content);
    }
}

pub fn print_comment(comment: &Comment) {
    let edited = if comment.last_edited_at.is_some() {
        " (edited)"
    } else {
        ""
    };
    header(&format!(
        "{} commented {}{}",
        comment.author.login,
        comment.created_at.format("%Y-%m-%d %H:%M"),
        edited
    ));
    for line in comment.body_text.lines() {
        detail(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_gist_row_contains_fields() {
        colored::control::set_override(false);
        let gist = GistInfo {
            id: "abc".into(),
            description: "Title".into(),
            files: 1,
            is_public: true,
            updated_at: Utc.with_ymd_and_hms(2022, 4, 18, 3, 4, 38).unwrap(),
        };
        assert_eq!(gist_row(&gist), "abc  Title  1 file  public  2022-04-18 03:04");
    }
}
