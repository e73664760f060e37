use inventory_api::mock::{Call, MockApi};
use inventory_api::store::{ProductStore, StoreClient};
use inventory_api::{ApiError, Operation, Product, ProductApi, ProductDraft, ProductId, ProductPatch, QuantityValue, Stats};
use inventory_console::app::{AddForm, InventoryApp, DELETE_QUESTION};
use inventory_console::command::{execute, Command, CommandError, Flow};
use inventory_console::edit::{ClickTarget, EditField, Key};
use inventory_console::surface::{MemorySurface, ScriptedPrompt};
use inventory_console::view::{format_money, render, ActionKind, RowAction};
use std::sync::Arc;

// --- Fixtures ---

struct Harness<A> {
    app: InventoryApp<A>,
    surface: Arc<MemorySurface>,
    prompt: Arc<ScriptedPrompt>,
}

fn harness<A: ProductApi>(api: A) -> Harness<A> {
    let surface = Arc::new(MemorySurface::new());
    let prompt = Arc::new(ScriptedPrompt::new());
    let app = InventoryApp::new(api, surface.clone(), prompt.clone());
    Harness { app, surface, prompt }
}

/// A running store with four products, ids 1 to 4.
fn seeded_store() -> StoreClient {
    let (mut store, client) = ProductStore::new(32);
    for draft in [
        ProductDraft::new("Bolt", "Hardware", 10, 0.5),
        ProductDraft::new("Claw Hammer", "Tools", 2, 12.0),
        ProductDraft::new("Hex Key", "tools", 4, 3.25),
        ProductDraft::new("Wood Glue", "Adhesives", 1, 6.75),
    ] {
        store.seed(draft).unwrap();
    }
    tokio::spawn(store.run());
    client
}

fn bolt() -> Product {
    Product::new(3, "Bolt", "Hardware", 5, 0.5)
}

/// Scripts the list and stats responses of one refresh.
fn expect_refresh(mock: &MockApi, items: Vec<Product>, total: f64) {
    mock.expect_list().return_ok(items);
    mock.expect_stats().return_ok(Stats { total });
}

// --- Refresh ---

#[tokio::test]
async fn test_refresh_matches_remote_state() {
    let client = seeded_store();
    let h = harness(client.clone());

    for term in ["", "tools", "HAMMER", "nothing like this"] {
        h.app.search(term).await.unwrap();

        let expected = client.list(term).await.unwrap();
        let total = client.stats().await.unwrap().total;
        assert_eq!(h.surface.table(), render(&expected));
        assert_eq!(h.surface.total(), format_money(total));
    }
    assert_eq!(h.surface.total(), "48.75");
}

#[tokio::test]
async fn test_repeated_refresh_is_idempotent() {
    let h = harness(seeded_store());

    h.app.refresh_clicked().await;
    let first = h.surface.table();
    h.app.refresh_clicked().await;

    assert_eq!(h.surface.table(), first);
    assert_eq!(h.surface.renders(), 2);
}

#[tokio::test]
async fn test_initial_load_failure_alerts() {
    let mock = MockApi::new();
    mock.expect_list().return_err(ApiError::fetch_failed(Operation::List));
    mock.expect_stats().return_ok(Stats { total: 0.0 });
    let h = harness(mock);

    h.app.initial_load().await;

    assert_eq!(h.prompt.alerts(), vec!["Failed to fetch products"]);
    assert!(!h.surface.is_busy());
    assert!(h.surface.table().is_empty());
}

#[tokio::test]
async fn test_refresh_failure_toasts() {
    let mock = MockApi::new();
    mock.expect_list().return_ok(vec![bolt()]);
    mock.expect_stats().return_err(ApiError::fetch_failed(Operation::Stats));
    let h = harness(mock);

    h.app.refresh_clicked().await;

    assert_eq!(h.surface.toast_messages(), vec!["Failed to fetch stats"]);
    assert!(h.prompt.alerts().is_empty());
    assert!(!h.surface.is_busy());
}

// --- Row actions ---

#[tokio::test]
async fn test_increment_dispatches_absolute_quantity() {
    let mock = MockApi::new();
    expect_refresh(&mock, vec![bolt()], 2.5);
    let h = harness(mock.clone());
    h.app.initial_load().await;

    mock.expect_list().return_ok(vec![bolt()]);
    mock.expect_update().return_ok(Product::new(3, "Bolt", "Hardware", 6, 0.5));
    expect_refresh(&mock, vec![Product::new(3, "Bolt", "Hardware", 6, 0.5)], 3.0);

    let action = h.app.resolve(ProductId(3), ActionKind::Increment).unwrap();
    h.app.row_action(action).await;

    let expected = ProductPatch {
        quantity: Some(QuantityValue::Absolute(6)),
        ..ProductPatch::default()
    };
    let calls = mock.calls();
    // Lookup, rewritten update, then the refresh pair
    assert_eq!(calls[2], Call::List(String::new()));
    assert_eq!(calls[3], Call::Update(ProductId(3), expected));
    assert_eq!(calls.len(), 6);
    assert!(calls[4..].contains(&Call::Stats));
    assert_eq!(h.surface.total(), "3.00");
    mock.verify();
}

#[tokio::test]
async fn test_increment_and_decrement_against_store() {
    let h = harness(seeded_store());
    h.app.initial_load().await;

    h.app.row_action(RowAction::Increment(ProductId(1))).await;
    h.app.row_action(RowAction::Increment(ProductId(1))).await;
    h.app.row_action(RowAction::Decrement(ProductId(2))).await;

    let table = h.surface.table();
    assert_eq!(table.row(ProductId(1)).unwrap().cells[3].text(), "12");
    assert_eq!(table.row(ProductId(2)).unwrap().cells[3].text(), "1");
    assert!(h.surface.toasts().is_empty());
}

#[tokio::test]
async fn test_declined_delete_does_nothing() {
    let mock = MockApi::new();
    expect_refresh(&mock, vec![bolt()], 2.5);
    let h = harness(mock.clone());
    h.app.initial_load().await;
    h.prompt.answer(false);

    h.app.row_action(RowAction::Delete(ProductId(3))).await;

    assert_eq!(h.prompt.questions(), vec![DELETE_QUESTION]);
    // Only the initial load reached the API
    assert_eq!(mock.calls().len(), 2);
    assert_eq!(h.surface.renders(), 1);
    mock.verify();
}

#[tokio::test]
async fn test_confirmed_delete_removes_row() {
    let h = harness(seeded_store());
    h.app.initial_load().await;
    h.prompt.answer(true);

    h.app.row_action(RowAction::Delete(ProductId(2))).await;

    let table = h.surface.table();
    assert_eq!(table.len(), 3);
    assert!(table.row(ProductId(2)).is_none());
    assert_eq!(h.surface.toast_messages(), vec!["Deleted"]);
    assert_eq!(h.surface.total(), "24.75");
}

#[tokio::test]
async fn test_failed_action_toasts_operation_message() {
    let h = harness(seeded_store());
    h.app.initial_load().await;
    h.prompt.answer(true);

    // Already gone on the server
    h.app.row_action(RowAction::Delete(ProductId(99))).await;

    assert_eq!(h.surface.toast_messages(), vec!["Failed to delete product"]);
    assert_eq!(h.surface.table().len(), 4);
}

// --- Edit dialog ---

#[tokio::test]
async fn test_edit_sends_only_changed_price() {
    let mock = MockApi::new();
    expect_refresh(&mock, vec![Product::new(3, "Bolt", "Hardware", 10, 0.5)], 5.0);
    let h = harness(mock.clone());
    h.app.initial_load().await;

    let edit = h.app.resolve(ProductId(3), ActionKind::Edit).unwrap();
    h.app.row_action(edit).await;
    assert_eq!(h.app.editing(), Some(ProductId(3)));
    // Opening the dialog does not reload the table
    assert_eq!(mock.calls().len(), 2);
    assert_eq!(h.surface.renders(), 1);
    let (_, form) = h.surface.editor().unwrap();
    assert_eq!(form.price, "0.5");

    mock.expect_update().return_ok(Product::new(3, "Bolt", "Hardware", 10, 0.75));
    expect_refresh(&mock, vec![Product::new(3, "Bolt", "Hardware", 10, 0.75)], 7.5);
    assert!(h.app.set_field(EditField::Price, "0.75"));
    h.app.save_edit().await;

    let expected = ProductPatch {
        price: Some(0.75),
        ..ProductPatch::default()
    };
    assert!(mock.calls().contains(&Call::Update(ProductId(3), expected)));
    assert_eq!(h.app.editing(), None);
    assert_eq!(h.surface.editor(), None);
    assert_eq!(h.surface.toast_messages(), vec!["Saved"]);
    assert_eq!(h.surface.total(), "7.50");
    mock.verify();
}

#[tokio::test]
async fn test_unchanged_save_closes_without_request() {
    let mock = MockApi::new();
    expect_refresh(&mock, vec![bolt()], 2.5);
    let h = harness(mock.clone());
    h.app.initial_load().await;

    h.app.row_action(h.app.resolve(ProductId(3), ActionKind::Edit).unwrap()).await;
    h.app.save_edit().await;

    assert_eq!(h.app.editing(), None);
    assert_eq!(mock.calls().len(), 2);
    mock.verify();
}

#[tokio::test]
async fn test_failed_save_keeps_dialog_open() {
    let mock = MockApi::new();
    expect_refresh(&mock, vec![bolt()], 2.5);
    let h = harness(mock.clone());
    h.app.initial_load().await;
    h.app.row_action(h.app.resolve(ProductId(3), ActionKind::Edit).unwrap()).await;

    mock.expect_update().return_err(ApiError::fetch_failed(Operation::Update));
    h.app.set_field(EditField::Name, "Carriage Bolt");
    h.app.save_edit().await;

    assert_eq!(h.app.editing(), Some(ProductId(3)));
    assert_eq!(h.surface.toast_messages(), vec!["Failed to update product"]);
    assert_eq!(h.surface.editor().unwrap().1.name, "Carriage Bolt");
    mock.verify();
}

#[tokio::test]
async fn test_invalid_number_keeps_dialog_open() {
    let mock = MockApi::new();
    expect_refresh(&mock, vec![bolt()], 2.5);
    let h = harness(mock.clone());
    h.app.initial_load().await;
    h.app.row_action(h.app.resolve(ProductId(3), ActionKind::Edit).unwrap()).await;

    h.app.set_field(EditField::Quantity, "a dozen");
    h.app.save_edit().await;

    assert_eq!(h.app.editing(), Some(ProductId(3)));
    assert_eq!(h.surface.toast_messages(), vec!["Quantity must be a number"]);
    mock.verify();
}

#[tokio::test]
async fn test_escape_and_backdrop_close_dialog() {
    let h = harness(seeded_store());
    h.app.initial_load().await;

    h.app.row_action(h.app.resolve(ProductId(1), ActionKind::Edit).unwrap()).await;
    h.app.click(ClickTarget::Dialog);
    h.app.key(Key::Enter);
    assert_eq!(h.app.editing(), Some(ProductId(1)));

    h.app.click(ClickTarget::Backdrop);
    assert_eq!(h.app.editing(), None);
    assert_eq!(h.surface.editor(), None);

    h.app.row_action(h.app.resolve(ProductId(1), ActionKind::Edit).unwrap()).await;
    h.app.key(Key::Escape);
    assert_eq!(h.app.editing(), None);

    // Nothing left to attribute a save to
    assert!(!h.app.set_field(EditField::Price, "1"));
    h.app.save_edit().await;
    assert!(h.surface.toasts().is_empty());
}

// --- Add form ---

#[tokio::test]
async fn test_add_validation_alerts() {
    let mock = MockApi::new();
    let h = harness(mock.clone());

    h.app.add(&AddForm::default()).await;
    h.app
        .add(&AddForm {
            name: "Nut".to_string(),
            category: "Hardware".to_string(),
            quantity: "some".to_string(),
            price: String::new(),
        })
        .await;

    assert_eq!(
        h.prompt.alerts(),
        vec!["Name and Category are required", "Quantity and Price must be numbers"]
    );
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_add_refreshes_and_clears_form() {
    let h = harness(seeded_store());
    h.app.initial_load().await;

    h.app
        .add(&AddForm {
            name: " Wing Nut ".to_string(),
            category: "Hardware".to_string(),
            quantity: "100".to_string(),
            price: "0.1".to_string(),
        })
        .await;

    let table = h.surface.table();
    assert_eq!(table.len(), 5);
    // Newest first
    assert_eq!(table.rows[0].key, ProductId(5));
    assert_eq!(table.rows[0].cells[1].text(), "Wing Nut");
    assert_eq!(h.surface.add_form_clears(), 1);
    assert_eq!(h.surface.toast_messages(), vec!["Product added"]);
    assert!(!h.surface.is_busy());
}

#[tokio::test]
async fn test_add_failure_keeps_form() {
    let mock = MockApi::new();
    mock.expect_add().return_err(ApiError::FetchFailed {
        operation: Operation::Add,
        message: String::new(),
    });
    let h = harness(mock.clone());

    h.app
        .add(&AddForm {
            name: "Nut".to_string(),
            category: "Hardware".to_string(),
            ..AddForm::default()
        })
        .await;

    assert_eq!(h.surface.toast_messages(), vec!["Failed to add"]);
    assert_eq!(h.surface.add_form_clears(), 0);
    assert_eq!(h.surface.busy_changes(), vec![true, false]);
    mock.verify();
}

// --- Commands ---

#[tokio::test]
async fn test_command_session() {
    let h = harness(seeded_store());
    h.app.initial_load().await;

    let run = |line: &str| line.parse::<Command>().unwrap();

    assert_eq!(execute(&h.app, run("search tools")).await, Ok(Flow::Continue));
    assert_eq!(h.surface.table().len(), 2);

    // Product 1 is not in the filtered table
    assert_eq!(
        execute(&h.app, run("inc 1")).await,
        Err(CommandError::NotOnScreen(ProductId(1)))
    );

    execute(&h.app, run("edit 3")).await.unwrap();
    execute(&h.app, run("set quantity 40")).await.unwrap();
    execute(&h.app, run("save")).await.unwrap();
    // Actions refresh unfiltered
    assert_eq!(h.surface.table().len(), 4);
    assert_eq!(h.surface.table().row(ProductId(3)).unwrap().cells[3].text(), "40");

    assert_eq!(
        execute(&h.app, run("set price 2")).await,
        Err(CommandError::NotEditing)
    );
    assert_eq!(execute(&h.app, run("help")).await, Ok(Flow::ShowHelp));
    assert_eq!(execute(&h.app, run("quit")).await, Ok(Flow::Quit));
}
