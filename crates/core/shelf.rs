use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, Write},
    path::{Path, PathBuf},
};

use libris::Book;

use eyre::{eyre, Context};
use glob::glob;
use log::{info, trace};
use serde::{Deserialize, Serialize};

pub const EXT: &str = "shelf.json";

/// A stored book, keyed by the ISBN it was added with and its owner.
///
/// The ISBN of the record itself may be in the other form, e.g. an ISBN-13 for a book added by
/// its ISBN-10.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub isbn: String,
    pub owner: String,
    pub book: Book,
}

impl Entry {
    fn matches(&self, isbn: &str, owner: &str) -> bool {
        self.owner == owner && (self.isbn == isbn || self.book.isbn == isbn)
    }
}

/// JSON file of [`Entry`]s, written back only when changed.
///
/// A shelf opened for reading may have no file behind it yet, it then reads as empty.
pub struct Shelf {
    file: Option<File>,
    entries: Vec<Entry>,
    dirty: bool,
}

impl Shelf {
    fn read(mut file: File) -> eyre::Result<Self> {
        let content = read_file_to_string(&mut file)?;
        let entries = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content).wrap_err("Shelf file is not a valid shelf")?
        };

        Ok(Self {
            file: Some(file),
            entries,
            dirty: false,
        })
    }

    const fn empty() -> Self {
        Self {
            file: None,
            entries: Vec::new(),
            dirty: false,
        }
    }

    pub fn get(&self, isbn: &str, owner: &str) -> Option<&Book> {
        self.entries
            .iter()
            .find(|e| e.matches(isbn, owner))
            .map(|e| &e.book)
    }

    /// Stores `book` for `owner` under `isbn`, replacing any entry found by [`Shelf::get`].
    ///
    /// Returns `true` when an existing entry was replaced.
    pub fn upsert(&mut self, owner: &str, isbn: &str, book: Book) -> bool {
        self.dirty = true;
        if let Some(entry) = self.entries.iter_mut().find(|e| e.matches(isbn, owner)) {
            entry.book = book;
            true
        } else {
            self.entries.push(Entry {
                isbn: isbn.to_owned(),
                owner: owner.to_owned(),
                book,
            });
            false
        }
    }

    pub fn list(&self, owner: &str, limit: usize, offset: usize) -> Vec<&Book> {
        self.entries
            .iter()
            .filter(|e| e.owner == owner)
            .skip(offset)
            .take(limit)
            .map(|e| &e.book)
            .collect()
    }

    pub const fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn save(&mut self) -> eyre::Result<()> {
        fn overrwrite_file_from_start(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
            // Rewind the cursor back to the start of the file to write over the contents and set
            // the length of the file to be equal to bytes so that existing data is removed
            file.rewind()?;
            file.set_len(bytes.len() as u64)?;
            file.write_all(bytes)
        }

        if !self.dirty {
            return Ok(());
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| eyre!("Shelf was opened for reading only and cannot be saved"))?;
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        overrwrite_file_from_start(file, &bytes).wrap_err("Failed to write the shelf file")?;
        self.dirty = false;
        Ok(())
    }
}

/// Opens the shelf for reading, a shelf that does not exist yet reads as empty.
pub fn open_shelf(file_name: Option<PathBuf>) -> eyre::Result<Shelf> {
    let path = match file_name {
        Some(path) => Some(path).filter(|p| p.exists()),
        None => find_shelf_in_directory(".")?,
    };

    if let Some(path) = path {
        trace!("opening {} as the shelf", path.display());
        open_file_for_read_and_write(&path)
    } else {
        trace!("No shelf file found - reading as an empty shelf");
        Ok(Shelf::empty())
    }
}

pub fn open_or_create_shelf(file_name: Option<PathBuf>) -> eyre::Result<Shelf> {
    if let Some(path) = file_name {
        if path.exists() {
            trace!("opening {} as the shelf", path.display());
            open_file_for_read_and_write(&path)
        } else {
            info!("Creating the new shelf file `{}`", path.display());
            create_file_for_read_and_write(&path)
        }
    } else {
        trace!("Searching current directory for any .{EXT} files");
        if let Some(path) = find_shelf_in_directory(".")? {
            open_file_for_read_and_write(&path)
        } else {
            let path = PathBuf::from("library").with_extension(EXT);
            info!(
                "No .{EXT} file found in current directory - creating the new file `{}`",
                path.display()
            );
            create_file_for_read_and_write(&path)
        }
    }
}

#[inline]
fn open_file_for_read_and_write(path: &Path) -> eyre::Result<Shelf> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .wrap_err_with(|| {
            format!(
                "Failed to open the '{}' file for reading and writing.",
                path.display()
            )
        })
        .and_then(Shelf::read)
}

#[inline]
fn create_file_for_read_and_write(path: &Path) -> eyre::Result<Shelf> {
    OpenOptions::new()
        .create_new(true)
        .read(true)
        .write(true)
        .open(path)
        .wrap_err_with(|| format!("Failed to create the '{}' file.", path.display()))
        .and_then(Shelf::read)
}

/// The single shelf file of `dir`, `None` when there is none.
fn find_shelf_in_directory<P: AsRef<Path>>(dir: P) -> eyre::Result<Option<PathBuf>> {
    let path = dir.as_ref();
    if !path.is_dir() {
        return Err(eyre!("Path entered is not a directory"));
    }

    let pattern = format!("{}/*.{EXT}", path.to_string_lossy());

    let mut iter = glob(&pattern).wrap_err("Shelf file pattern is invalid")?;

    let path_buf = match iter.next() {
        Some(path_buf) => path_buf
            .wrap_err("Cannot determine a file path - Do you have the correct permissions?")?,
        None => return Ok(None),
    };

    if iter.next().is_some() {
        return Err(eyre!(
            "More than one .{EXT} file found - use the --file option to select one"
        ));
    }

    Ok(Some(path_buf))
}

fn read_file_to_string(file: &mut File) -> eyre::Result<String> {
    let mut content = String::new();
    file.read_to_string(&mut content)
        .wrap_err("Cannot read contents of file")
        .map(move |_| content)
}

#[cfg(test)]
mod tests {

    use super::*;

    use assert_fs::{
        fixture::{FileTouch, FileWriteStr, PathChild},
        TempDir,
    };

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.to_owned(),
            title: title.to_owned(),
            status: Book::CONFIRMED,
            ..Book::default()
        }
    }

    #[test]
    fn no_files_in_directory() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");

        assert_eq!(None, find_shelf_in_directory(TempDir::path(&dir)).unwrap());
    }

    #[test]
    #[should_panic(expected = "not a directory")]
    fn path_is_not_a_directory() {
        find_shelf_in_directory("not a directory").unwrap();
    }

    #[test]
    #[should_panic(expected = "More than one .shelf.json file")]
    fn multiple_shelf_files_in_directory() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        dir.child("one.shelf.json").touch().unwrap();
        dir.child("two.shelf.json").touch().unwrap();

        find_shelf_in_directory(TempDir::path(&dir)).unwrap();
    }

    #[test]
    fn empty_file_is_an_empty_shelf() {
        let dir = TempDir::new().unwrap();
        dir.child("home.shelf.json").touch().unwrap();

        let path = find_shelf_in_directory(TempDir::path(&dir)).unwrap();
        let shelf = open_shelf(path).unwrap();
        assert!(shelf.list("alice", 10, 0).is_empty());
        assert!(!shelf.dirty());
    }

    #[test]
    #[should_panic(expected = "not a valid shelf")]
    fn invalid_json_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.child("broken.shelf.json");
        file.write_str("{ not json").unwrap();

        open_or_create_shelf(Some(file.path().to_path_buf())).unwrap();
    }

    #[test]
    fn upsert_replaces_same_isbn_and_owner_only() {
        let dir = TempDir::new().unwrap();
        let mut shelf = open_or_create_shelf(Some(dir.child("a.shelf.json").path().to_path_buf()))
            .unwrap();

        assert!(!shelf.upsert("alice", "9780441013593", book("9780441013593", "Dune")));
        assert!(!shelf.upsert("bob", "9780441013593", book("9780441013593", "Dune")));
        assert!(shelf.upsert(
            "alice",
            "9780441013593",
            book("9780441013593", "Dune (Annotated)")
        ));

        assert_eq!(
            "Dune (Annotated)",
            shelf.get("9780441013593", "alice").unwrap().title
        );
        assert_eq!("Dune", shelf.get("9780441013593", "bob").unwrap().title);
        assert!(shelf.get("9780441013593", "carol").is_none());
        assert!(shelf.dirty());
    }

    #[test]
    fn list_applies_offset_then_limit_per_owner() {
        let dir = TempDir::new().unwrap();
        let mut shelf = open_or_create_shelf(Some(dir.child("a.shelf.json").path().to_path_buf()))
            .unwrap();

        for (i, isbn) in ["1", "2", "3", "4"].iter().enumerate() {
            shelf.upsert("alice", isbn, book(isbn, &format!("Book {i}")));
        }
        shelf.upsert("bob", "5", book("5", "Not Alice's"));

        let titles: Vec<_> = shelf
            .list("alice", 2, 1)
            .into_iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(vec!["Book 1", "Book 2"], titles);
        assert!(shelf.list("alice", 10, 4).is_empty());
    }

    #[test]
    fn saved_shelf_can_be_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("a.shelf.json").path().to_path_buf();

        let mut shelf = open_or_create_shelf(Some(path.clone())).unwrap();
        shelf.upsert("alice", "9780441013593", book("9780441013593", "Dune"));
        shelf.save().unwrap();
        assert!(!shelf.dirty());
        drop(shelf);

        let shelf = open_or_create_shelf(Some(path)).unwrap();
        assert_eq!(
            Some(&book("9780441013593", "Dune")),
            shelf.get("9780441013593", "alice")
        );
    }

    #[test]
    fn book_added_by_isbn_10_is_found_by_either_form() {
        let dir = TempDir::new().unwrap();
        let mut shelf = open_or_create_shelf(Some(dir.child("a.shelf.json").path().to_path_buf()))
            .unwrap();

        shelf.upsert("alice", "0441013597", book("9780441013593", "Dune"));

        assert_eq!(
            Some(&book("9780441013593", "Dune")),
            shelf.get("0441013597", "alice")
        );
        assert!(shelf.get("9780441013593", "alice").is_some());
        assert!(shelf.upsert("alice", "9780441013593", book("9780441013593", "Dune")));
        assert_eq!(1, shelf.list("alice", 10, 0).len());
    }

    #[test]
    fn missing_shelf_reads_as_empty_and_is_not_created() {
        let dir = TempDir::new().unwrap();
        let file = dir.child("missing.shelf.json");

        let shelf = open_shelf(Some(file.path().to_path_buf())).unwrap();

        assert!(shelf.list("alice", 10, 0).is_empty());
        assert!(shelf.get("9780441013593", "alice").is_none());
        assert!(!file.path().exists());
    }

    #[test]
    #[should_panic(expected = "opened for reading only")]
    fn shelf_without_a_file_cannot_be_saved() {
        let dir = TempDir::new().unwrap();
        let mut shelf =
            open_shelf(Some(dir.child("missing.shelf.json").path().to_path_buf())).unwrap();

        shelf.upsert("alice", "9780441013593", book("9780441013593", "Dune"));
        shelf.save().unwrap();
    }
}
