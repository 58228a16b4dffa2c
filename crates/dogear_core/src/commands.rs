use std::fs;

use anyhow::Result;
use log::debug;

use crate::bookmark::{Bookmark, BookmarkList};
use crate::console::Console;
use crate::name::{invalid_name_message, is_valid_name};
use crate::storage::{BookmarkFile, StoreWriteError};

/// Outcome of one invocation, mapped to the process exit code at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    NotFound,
    UsageError,
    StoreWriteFailed,
    Failure,
}

impl Status {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::NotFound | Self::Failure => 1,
            Self::UsageError => 2,
            Self::StoreWriteFailed => 3,
        }
    }
}

/// Translate a command result into a status, reporting any error.
pub fn conclude(result: Result<Status>, console: &mut impl Console) -> Status {
    match result {
        Ok(status) => status,
        Err(error) if error.is::<StoreWriteError>() => {
            console.warn(&format!("{error:#}"));
            Status::StoreWriteFailed
        }
        Err(error) => {
            console.warn(&format!("error: {error:#}"));
            Status::Failure
        }
    }
}

fn confirmed(console: &mut impl Console, question: &str) -> Result<bool> {
    Ok(console.ask(question)?.as_deref() == Some("y"))
}

/// Bookmark `current_dir` as `name`, resolving name and directory clashes
/// with the user.
pub fn fold(
    file: &BookmarkFile,
    name: &str,
    current_dir: &str,
    console: &mut impl Console,
) -> Result<Status> {
    if !is_valid_name(name) {
        console.say(&invalid_name_message(name));
        return Ok(Status::UsageError);
    }

    let mut bookmarks = file.load()?;
    let Some(index) =
        bookmarks.position(|bookmark| bookmark.name == name || bookmark.path == current_dir)
    else {
        let bookmark = Bookmark::new(name, current_dir);
        bookmarks.insert_front(bookmark.clone());
        file.save(&bookmarks)?;
        console.say(&format!("Folded bookmark: {bookmark}"));
        return Ok(Status::Success);
    };

    let Some(existing) = bookmarks.get(index).cloned() else {
        return Ok(Status::Failure);
    };

    if existing.name == name && existing.path == current_dir {
        bookmarks.touch(index);
        file.save(&bookmarks)?;
        console.say(&format!("Already bookmarked: {existing}"));
        return Ok(Status::Success);
    }

    // Any later entry sharing the new name or path has to go once the match
    // is updated; say so before asking.
    let displaced: Vec<Bookmark> = bookmarks
        .iter()
        .enumerate()
        .filter(|(position, bookmark)| {
            *position != index && (bookmark.name == name || bookmark.path == current_dir)
        })
        .map(|(_, bookmark)| bookmark.clone())
        .collect();

    let mut question = if existing.name == name {
        format!("This bookmark name already exists:\n   {existing}\n")
    } else {
        format!("This is already bookmarked under another name:\n   {existing}\n")
    };
    if !displaced.is_empty() {
        question.push_str("This will also replace:\n");
        for bookmark in &displaced {
            question.push_str(&format!("   {bookmark}\n"));
        }
    }
    question.push_str(if existing.name == name {
        "Would you like to overwrite it (y/n)? "
    } else {
        "Would you like to change the name (y/n)? "
    });
    if !confirmed(console, &question)? {
        console.say(&format!("Left unchanged: {existing}"));
        return Ok(Status::Success);
    }

    // Displaced entries all sit after the first match, so `index` stays valid.
    let mut position = 0;
    bookmarks.remove_where(|bookmark| {
        let collides = position != index && (bookmark.name == name || bookmark.path == current_dir);
        position += 1;
        collides
    });
    let updated = Bookmark::new(name, current_dir);
    if let Some(bookmark) = bookmarks.get_mut(index) {
        *bookmark = updated.clone();
    }
    bookmarks.touch(index);

    file.save(&bookmarks)?;
    for bookmark in &displaced {
        console.say(&format!("Replaced bookmark: {bookmark}"));
    }
    console.say(&format!("Folded bookmark: {updated}"));
    Ok(Status::Success)
}

/// Remove the bookmark pointing at `current_dir`.
pub fn unfold(file: &BookmarkFile, current_dir: &str, console: &mut impl Console) -> Result<Status> {
    let mut bookmarks = file.load()?;
    let Some(removed) = bookmarks
        .position_by_path(current_dir)
        .and_then(|index| bookmarks.remove(index))
    else {
        console.say("This directory hasn't been bookmarked");
        return Ok(Status::NotFound);
    };

    file.save(&bookmarks)?;
    console.say(&format!("Unfolded bookmark: {removed}"));
    Ok(Status::Success)
}

/// Print the path stored under `name` and promote it to most recent.
pub fn find(file: &BookmarkFile, name: &str, console: &mut impl Console) -> Result<Status> {
    let mut bookmarks = file.load()?;
    let Some(index) = bookmarks.position_by_name(name) else {
        return Ok(Status::NotFound);
    };
    if let Some(bookmark) = bookmarks.get(index) {
        console.say(&bookmark.path);
    }
    if bookmarks.touch(index) {
        file.save(&bookmarks)?;
    }
    Ok(Status::Success)
}

/// Case-insensitive substring search over names and paths.
pub fn like(file: &BookmarkFile, term: Option<&str>, console: &mut impl Console) -> Result<Status> {
    let Some(term) = term.filter(|term| !term.is_empty()) else {
        console.say("like requires a search term: dogear like <term>");
        return Ok(Status::UsageError);
    };

    let needle = term.to_lowercase();
    let bookmarks = file.load()?;
    let mut matched = 0usize;
    for bookmark in bookmarks.iter().filter(|bookmark| {
        bookmark.name.to_lowercase().contains(&needle)
            || bookmark.path.to_lowercase().contains(&needle)
    }) {
        console.say(&bookmark.to_string());
        matched += 1;
    }

    if matched == 0 {
        console.say(&format!("No bookmarks match: {term}"));
        return Ok(Status::NotFound);
    }
    Ok(Status::Success)
}

/// List the `limit` most recently used bookmarks, numbered from 1.
pub fn recent(file: &BookmarkFile, limit: usize, console: &mut impl Console) -> Result<Status> {
    let bookmarks = file.load()?;
    if bookmarks.is_empty() {
        console.say("No bookmarks yet. Run `dogear fold <name>` to bookmark the current directory.");
        return Ok(Status::Success);
    }

    console.say("Recently Used Bookmarks:");
    for (position, bookmark) in bookmarks.iter().take(limit).enumerate() {
        console.say(&format!("{}) {bookmark}", position + 1));
    }
    Ok(Status::Success)
}

/// Walk every bookmark asking whether to delete it. `q` or end of input stops the walk.
pub fn edit(file: &BookmarkFile, console: &mut impl Console) -> Result<Status> {
    let mut bookmarks = file.load()?;
    if bookmarks.is_empty() {
        console.say("No bookmarks to edit");
        return Ok(Status::Success);
    }

    let mut index = 0;
    let mut deleted = 0usize;
    while let Some(bookmark) = bookmarks.get(index) {
        let question = format!("{bookmark}\nDelete this bookmark (y/n/q)? ");
        match console.ask(&question)?.as_deref() {
            Some("y") => {
                if let Some(removed) = bookmarks.remove(index) {
                    console.say(&format!("Deleted: {}", removed.name));
                    deleted += 1;
                }
            }
            Some("q") | None => break,
            Some(_) => index += 1,
        }
    }

    if deleted == 0 {
        console.say("No bookmarks deleted");
        return Ok(Status::Success);
    }
    file.save(&bookmarks)?;
    console.say(&format!("Deleted {deleted} bookmark(s)"));
    Ok(Status::Success)
}

/// Drop bookmarks with invalid names or paths that are no longer directories.
pub fn clean(file: &BookmarkFile, console: &mut impl Console) -> Result<Status> {
    let mut bookmarks = file.load()?;
    let removed = purge_stale(&mut bookmarks);

    file.save(&bookmarks)?;
    for bookmark in &removed {
        console.say(&format!("Removed: {bookmark}"));
    }
    console.say(&format!(
        "Cleaned bookmark list: {} removed, {} kept",
        removed.len(),
        bookmarks.len()
    ));
    Ok(Status::Success)
}

fn purge_stale(bookmarks: &mut BookmarkList) -> Vec<Bookmark> {
    bookmarks.remove_where(|bookmark| !is_valid_name(&bookmark.name) || !is_directory(&bookmark.path))
}

fn is_directory(path: &str) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_dir(),
        Err(error) => {
            debug!("treating {path} as missing: {error}");
            false
        }
    }
}
