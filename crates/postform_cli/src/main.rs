//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `postform_core` linkage.
//! - Drive one form session against a database file without a UI shell.
//!
//! Usage:
//! - `postform_cli` prints ping/version.
//! - `postform_cli <db_path>` lists saved posts.
//! - `postform_cli <db_path> <author> <category> <title> <content>` submits
//!   one post, then lists.

use postform_core::{ConnectionManager, DbConfig, PostFormSession, SubmitOutcome};
use std::process::ExitCode;

const USAGE: &str = "usage: postform_cli <db_path> [<author> <category> <title> <content>]";

/// What one invocation asks for, decided before any file is opened.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Probe,
    List {
        db_path: &'a str,
    },
    Submit {
        db_path: &'a str,
        author: &'a str,
        category: &'a str,
        title: &'a str,
        content: &'a str,
    },
}

fn main() -> ExitCode {
    println!("postform_core ping={}", postform_core::ping());
    println!("postform_core version={}", postform_core::core_version());

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let result = parse_args(&args).and_then(|command| match command {
        Command::Probe => Ok(()),
        Command::List { db_path } => run(db_path, None),
        Command::Submit {
            db_path,
            author,
            category,
            title,
            content,
        } => run(db_path, Some([author, category, title, content])),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: &[String]) -> Result<Command<'_>, String> {
    let Some((db_path, fields)) = args.split_first() else {
        return Ok(Command::Probe);
    };
    let db_path = db_path.trim();
    if db_path.is_empty() {
        return Err(format!("db_path must not be blank\n{USAGE}"));
    }

    match fields {
        [] => Ok(Command::List { db_path }),
        [author, category, title, content] => Ok(Command::Submit {
            db_path,
            author,
            category,
            title,
            content,
        }),
        _ => Err(USAGE.to_string()),
    }
}

/// `fields` is `[author, category, title, content]`.
fn run(db_path: &str, fields: Option<[&str; 4]>) -> Result<(), String> {
    let mut session = PostFormSession::start(ConnectionManager::new(DbConfig::file(db_path)))
        .map_err(|err| format!("open failed: {err}"))?;

    if let Some([author, category, title, content]) = fields {
        session.set_author(author);
        session.set_category(category);
        session.set_title(title);
        session.set_content(content);
        match session.submit().map_err(|err| format!("save failed: {err}"))? {
            SubmitOutcome::Saved(post_id) => println!("saved post_id={post_id}"),
            SubmitOutcome::Rejected(field) => {
                return Err(format!("rejected: field `{field}` is empty"));
            }
        }
    }

    for row in session.post_rows() {
        println!("{}\t{}\t{}", row.id, row.title, row.content);
    }

    session
        .close()
        .map_err(|err| format!("close failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{parse_args, Command};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn no_args_is_probe_only() {
        assert_eq!(parse_args(&[]), Ok(Command::Probe));
    }

    #[test]
    fn db_path_alone_lists() {
        let values = args(&["posts.sqlite3"]);
        assert_eq!(
            parse_args(&values),
            Ok(Command::List {
                db_path: "posts.sqlite3"
            })
        );
    }

    #[test]
    fn four_fields_submit() {
        let values = args(&["posts.sqlite3", "Au1", "Cat1", "T1", "C1"]);
        assert_eq!(
            parse_args(&values),
            Ok(Command::Submit {
                db_path: "posts.sqlite3",
                author: "Au1",
                category: "Cat1",
                title: "T1",
                content: "C1",
            })
        );
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        let values = args(&["posts.sqlite3", "Au1", "Cat1"]);
        let err = parse_args(&values).unwrap_err();
        assert!(err.starts_with("usage:"));
    }

    #[test]
    fn blank_db_path_is_rejected() {
        let values = args(&["  ", "Au1", "Cat1", "T1", "C1"]);
        let err = parse_args(&values).unwrap_err();
        assert!(err.contains("db_path must not be blank"));
    }
}
