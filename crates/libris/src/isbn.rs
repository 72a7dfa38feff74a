//! ISBN clean up before any provider is queried.

use crate::{Error, ErrorKind};

/// Strips hyphens and spaces from `raw` and checks it has the shape of an ISBN-10 or ISBN-13.
///
/// An ISBN-10 may end with an `X` check character, which is upper-cased. Check digits are not
/// verified.
///
/// # Errors
///
/// An [`ErrorKind::InvalidIsbn`] error when the cleaned value is neither 10 nor 13 characters of
/// the allowed shape.
pub fn normalize(raw: &str) -> Result<String, Error> {
    let isbn: String = raw
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let valid = isbn.is_ascii()
        && match isbn.len() {
            10 => {
                let (body, check) = isbn.split_at(9);
                body.chars().all(|c| c.is_ascii_digit())
                    && check.chars().all(|c| c.is_ascii_digit() || c == 'X')
            }
            13 => isbn.chars().all(|c| c.is_ascii_digit()),
            _ => false,
        };

    if valid {
        Ok(isbn)
    } else {
        Err(Error::new(
            ErrorKind::InvalidIsbn,
            format!("'{raw}' is not an ISBN-10 or ISBN-13"),
        ))
    }
}
