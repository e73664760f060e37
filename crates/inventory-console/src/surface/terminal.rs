//! Line-oriented terminal surface.
//!
//! The table is reprinted on every refresh with a marker column from the keyed diff
//! against the previous print: `+` new row, `*` changed row.

use super::{Prompt, ViewSurface};
use crate::edit::{EditField, EditForm};
use crate::notify::{Toast, ToastKind};
use crate::view::{diff_rows, Cell, RowChange, TableView};
use async_trait::async_trait;
use inventory_api::ProductId;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncBufRead, Lines};

const HEADERS: [&str; 5] = ["ID", "NAME", "CATEGORY", "QTY", "PRICE"];

/// Input lines shared between the command loop and [`ConsolePrompt`].
pub type SharedLines<R> = Arc<tokio::sync::Mutex<Lines<R>>>;

#[derive(Default)]
struct Printed {
    table: TableView,
    last_toast: u64,
}

/// A `ViewSurface` that prints to any `Write`.
pub struct TerminalSurface<W> {
    out: Mutex<W>,
    printed: Mutex<Printed>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            printed: Mutex::new(Printed::default()),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prints a free-form line.
    pub fn notice(&self, message: &str) {
        self.write(message);
    }

    fn write(&self, text: &str) {
        let mut out = lock(&self.out);
        // A closed terminal is not worth failing a handler over
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Badge(text) => format!("[{text}]"),
    }
}

fn removed_line(changes: &[RowChange]) -> Option<String> {
    let removed = changes.iter().filter(|c| matches!(c, RowChange::Removed(_))).count();
    (removed > 0).then(|| format!("({removed} removed)"))
}

fn format_table(previous: &TableView, table: &TableView) -> String {
    let changes = diff_rows(previous, table);
    if table.is_empty() {
        let mut out = vec!["(no products)".to_string()];
        out.extend(removed_line(&changes));
        return out.join("\n");
    }

    let lines: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(cell_text).collect())
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();
    for line in &lines {
        for (width, text) in widths.iter_mut().zip(line) {
            *width = (*width).max(text.chars().count());
        }
    }

    let pad = |texts: Vec<String>| -> String {
        texts
            .iter()
            .zip(&widths)
            .map(|(text, &width)| format!("{text:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![format!("  {}", pad(HEADERS.iter().map(|h| h.to_string()).collect()))];
    for (line, row) in lines.into_iter().zip(&table.rows) {
        let marker = changes
            .iter()
            .find_map(|change| match change {
                RowChange::Inserted(id) if *id == row.key => Some('+'),
                RowChange::Updated(id) if *id == row.key => Some('*'),
                _ => None,
            })
            .unwrap_or(' ');
        out.push(format!("{marker} {}", pad(line)));
    }

    out.extend(removed_line(&changes));
    out.join("\n")
}

impl<W: Write + Send> ViewSurface for TerminalSurface<W> {
    fn replace_rows(&self, table: &TableView) {
        let text = {
            let mut printed = lock(&self.printed);
            let text = format_table(&printed.table, table);
            printed.table = table.clone();
            text
        };
        self.write(&text);
    }

    fn set_total(&self, total: &str) {
        self.write(&format!("Total value: {total}"));
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            self.write("Loading...");
        }
    }

    fn show_toasts(&self, toasts: &[Toast]) {
        // Expiry republishes the list; only print toasts not seen before
        let fresh: Vec<&Toast> = {
            let mut printed = lock(&self.printed);
            let fresh: Vec<&Toast> = toasts.iter().filter(|t| t.id > printed.last_toast).collect();
            if let Some(last) = fresh.last() {
                printed.last_toast = last.id;
            }
            fresh
        };
        for toast in fresh {
            let tag = match toast.kind {
                ToastKind::Success => "ok",
                ToastKind::Error => "error",
            };
            self.write(&format!("[{tag}] {}", toast.message));
        }
    }

    fn show_editor(&self, editor: Option<(ProductId, &EditForm)>) {
        let Some((id, form)) = editor else {
            self.write("Editor closed");
            return;
        };
        let mut text = format!("Editing product {id}");
        for field in EditField::ALL {
            text.push_str(&format!("\n  {:<9} {}", field.as_str(), form.get(field)));
        }
        text.push_str("\n(set <field> <value>, save, cancel)");
        self.write(&text);
    }

    fn clear_add_form(&self) {
        // The add form is the command line itself
    }
}

/// Asks questions on stdout and reads answers from the shared input.
pub struct ConsolePrompt<R> {
    input: SharedLines<R>,
}

impl<R> ConsolePrompt<R> {
    pub fn new(input: SharedLines<R>) -> Self {
        Self { input }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Prompt for ConsolePrompt<R> {
    async fn confirm(&self, message: &str) -> bool {
        {
            let mut stdout = std::io::stdout().lock();
            let _ = write!(stdout, "{message} [y/N] ");
            let _ = stdout.flush();
        }
        match self.input.lock().await.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            _ => false,
        }
    }

    async fn alert(&self, message: &str) {
        println!("! {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::render;
    use inventory_api::Product;
    use tokio::io::AsyncBufReadExt;

    fn printed(surface: TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn test_table_marks_changes() {
        let surface = TerminalSurface::new(Vec::new());
        surface.replace_rows(&render(&[Product::new(1, "Saw", "Tools", 1, 20.0)]));
        surface.replace_rows(&render(&[
            Product::new(2, "Bolt", "Hardware", 10, 0.5),
            Product::new(1, "Saw", "Tools", 2, 20.0),
        ]));

        let out = printed(surface);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("  ID"));
        assert!(lines[1].starts_with("+ 1"));
        assert!(lines[2].starts_with("  ID"));
        assert!(lines[3].starts_with("+ 2"));
        assert!(lines[3].contains("[Hardware]"));
        assert!(lines[4].starts_with("* 1"));
        assert!(lines[4].ends_with("20.00"));
    }

    #[test]
    fn test_empty_table_and_removals() {
        let surface = TerminalSurface::new(Vec::new());
        surface.replace_rows(&render(&[Product::new(1, "Saw", "Tools", 1, 20.0)]));
        surface.replace_rows(&render(&[]));
        surface.replace_rows(&render(&[Product::new(2, "Nut", "Hardware", 1, 0.1)]));

        let out = printed(surface);
        // Emptying the table still reports what went away
        assert!(out.contains("(no products)\n(1 removed)"));
        assert_eq!(out.matches("removed").count(), 1);
    }

    #[test]
    fn test_toasts_print_once() {
        let surface = TerminalSurface::new(Vec::new());
        let saved = Toast {
            id: 1,
            message: "Saved".to_string(),
            kind: ToastKind::Success,
        };
        let failed = Toast {
            id: 2,
            message: "Failed to fetch stats".to_string(),
            kind: ToastKind::Error,
        };
        surface.show_toasts(&[saved.clone()]);
        surface.show_toasts(&[saved, failed.clone()]);
        surface.show_toasts(&[failed]);
        surface.show_toasts(&[]);

        assert_eq!(printed(surface), "[ok] Saved\n[error] Failed to fetch stats\n");
    }

    #[test]
    fn test_editor_lists_fields() {
        let surface = TerminalSurface::new(Vec::new());
        let form = EditForm {
            name: "Bolt".to_string(),
            category: "Hardware".to_string(),
            quantity: "10".to_string(),
            price: "0.5".to_string(),
        };
        surface.show_editor(Some((ProductId(3), &form)));
        surface.show_editor(None);

        let out = printed(surface);
        assert!(out.starts_with("Editing product 3\n"));
        assert!(out.contains("  price     0.5\n"));
        assert!(out.ends_with("Editor closed\n"));
    }

    #[tokio::test]
    async fn test_confirm_reads_shared_input() {
        let input: &[u8] = b"YES\nn\n";
        let lines = Arc::new(tokio::sync::Mutex::new(input.lines()));
        let prompt = ConsolePrompt::new(lines);

        assert!(prompt.confirm("Delete this product?").await);
        assert!(!prompt.confirm("Delete this product?").await);
        // End of input declines
        assert!(!prompt.confirm("Delete this product?").await);
    }
}
