use eyre::{eyre, Context, Result};
use libris::Book;

pub fn user_select<S: ToString>(prompt: &str, items: &[S]) -> Result<usize> {
    let selection = dialoguer::Select::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .default(0)
        .items(items)
        .interact_opt()
        .wrap_err_with(|| eyre!("User selection cancelled"))?;

    if let Some(index) = selection {
        Ok(index)
    } else {
        Err(eyre!("No selection made - cancelling operation"))
    }
}

/// Asks which of the disagreeing records to keep.
pub fn user_select_book(mut books: Vec<Book>) -> Result<Book> {
    let items = books_titles(&books);
    user_select("Providers disagree - choose a record", &items).map(|i| books.remove(i))
}

fn books_titles(books: &[Book]) -> Vec<String> {
    books
        .iter()
        .map(|b| format!("{} ({})", b.title, b.source))
        .collect()
}
