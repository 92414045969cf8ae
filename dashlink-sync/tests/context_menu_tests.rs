use dashlink_sync::context_menu::mock::RecordingDialogs;
use dashlink_sync::context_menu::position_object_id;
use dashlink_sync::{context_items, CellType, GridCell, MenuAction, RowValue};
use pretty_assertions::assert_eq;
use serde_json::json;

fn row(node: Option<&str>, trade: Option<&str>, position: Option<&str>) -> RowValue {
    RowValue {
        node_id: node.map(String::from),
        trade_id: trade.map(String::from),
        position_id: position.map(String::from),
    }
}

fn cell(cell_type: CellType, row_value: RowValue) -> GridCell {
    GridCell {
        cell_type,
        row: 0,
        row_value,
    }
}

fn names(cell: &GridCell, row_is_node: bool) -> Vec<&'static str> {
    context_items(cell, row_is_node)
        .iter()
        .map(|item| item.name)
        .collect()
}

#[test]
fn node_cell_offers_insert_only() {
    let cell = cell(CellType::Node, row(Some("N1"), None, Some("P~1~1")));

    let items = context_items(&cell, true);

    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].action,
        MenuAction::InsertTrade {
            node_id: Some("N1".into())
        }
    );
}

#[test]
fn position_on_node_row_offers_insert_only() {
    let cell = cell(CellType::Position, row(Some("N1"), None, Some("P~1~1")));

    assert_eq!(names(&cell, true), vec!["Insert"]);
}

#[test]
fn position_row_edits_position_without_version() {
    let cell = cell(CellType::Position, row(Some("N1"), None, Some("DbPos~123~7")));

    let items = context_items(&cell, false);

    assert_eq!(items.len(), 2);
    assert_eq!(
        items[1].action,
        MenuAction::EditPosition {
            position_id: "DbPos~123".into()
        }
    );
}

#[test]
fn trade_cell_edits_trade() {
    let cell = cell(CellType::FungibleTrade, row(None, Some("T1"), Some("P~1~1")));

    let items = context_items(&cell, false);

    assert_eq!(
        items[1].action,
        MenuAction::EditTrade {
            trade_id: "T1".into(),
            node_id: None
        }
    );
}

#[test]
fn trade_cell_without_trade_id_falls_back_to_position() {
    let cell = cell(CellType::OtcTrade, row(None, None, Some("P~9")));

    let items = context_items(&cell, false);

    assert_eq!(
        items[1].action,
        MenuAction::EditPosition {
            position_id: "P~9".into()
        }
    );
}

#[test]
fn trade_cell_with_empty_trade_id_falls_back_to_position() {
    let cell = cell(CellType::FungibleTrade, row(Some("N1"), Some(""), Some("P~1~2")));

    let items = context_items(&cell, false);

    assert_eq!(items.len(), 2);
    assert_eq!(
        items[1].action,
        MenuAction::EditPosition {
            position_id: "P~1".into()
        }
    );
}

#[test]
fn trade_id_on_position_cell_is_ignored() {
    let cell = cell(CellType::Position, row(None, Some("T1"), None));

    assert_eq!(names(&cell, false), vec!["Insert"]);
}

#[test]
fn other_cells_without_ids_offer_insert_only() {
    let cell = cell(CellType::Other, RowValue::default());

    assert_eq!(names(&cell, false), vec!["Insert"]);
}

#[test]
fn position_object_id_variants() {
    assert_eq!(position_object_id("A~B~C"), "A~B");
    assert_eq!(position_object_id("A~B"), "A~B");
    assert_eq!(position_object_id("A"), "A");
}

#[test]
fn items_open_matching_dialogs() {
    let dialogs = RecordingDialogs::new();
    let trade = cell(CellType::OtcTrade, row(Some("N1"), Some("T1"), None));
    let position = cell(CellType::Position, row(None, None, Some("P~1~2")));

    for item in context_items(&trade, false) {
        item.invoke(&dialogs);
    }
    for item in context_items(&position, false) {
        item.invoke(&dialogs);
    }

    assert_eq!(
        dialogs.opened(),
        vec!["insert:N1", "trade:T1@N1", "insert:", "position:P~1"]
    );
}

#[test]
fn grid_cell_deserializes_from_grid_json() {
    let cell: GridCell = serde_json::from_value(json!({
        "type": "OTC_TRADE",
        "row": 4,
        "row_value": {"nodeId": "N1", "tradeId": "T1"}
    }))
    .unwrap();

    assert_eq!(cell.cell_type, CellType::OtcTrade);
    assert_eq!(cell.row, 4);
    assert_eq!(cell.row_value, row(Some("N1"), Some("T1"), None));
}

#[test]
fn unknown_cell_type_is_other() {
    let cell: GridCell = serde_json::from_value(json!({
        "type": "SOMETHING_NEW",
        "row": 0,
        "row_value": {}
    }))
    .unwrap();

    assert_eq!(cell.cell_type, CellType::Other);
}
