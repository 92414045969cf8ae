//! Cell context menu for the blotter grid.

use serde::{Deserialize, Serialize};

/// Row type of a grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellType {
    Node,
    Position,
    OtcTrade,
    FungibleTrade,
    #[serde(other)]
    Other,
}

/// Identifiers carried by the row a cell belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowValue {
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub trade_id: Option<String>,
    #[serde(default)]
    pub position_id: Option<String>,
}

/// A grid cell that was right-clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    #[serde(rename = "type")]
    pub cell_type: CellType,
    pub row: usize,
    pub row_value: RowValue,
}

/// What a menu item does when picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Blank trade-entry form scoped to a portfolio node.
    InsertTrade { node_id: Option<String> },
    /// Edit an existing trade.
    EditTrade {
        trade_id: String,
        node_id: Option<String>,
    },
    /// Edit a position.
    EditPosition { position_id: String },
}

/// One entry of the context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub name: &'static str,
    pub action: MenuAction,
}

impl MenuItem {
    /// Opens the dialog this item stands for.
    pub fn invoke(&self, dialogs: &dyn TradeDialogs) {
        match &self.action {
            MenuAction::InsertTrade { node_id } => dialogs.open_trade_entry(node_id.as_deref()),
            MenuAction::EditTrade { trade_id, node_id } => {
                dialogs.edit_trade(trade_id, node_id.as_deref())
            }
            MenuAction::EditPosition { position_id } => dialogs.edit_position(position_id),
        }
    }
}

/// Trade and position editing dialogs.
pub trait TradeDialogs: Send + Sync {
    fn open_trade_entry(&self, node_id: Option<&str>);
    fn edit_trade(&self, trade_id: &str, node_id: Option<&str>);
    fn edit_position(&self, position_id: &str);
}

/// Shows a context menu next to a cell.
pub trait ContextMenu: Send + Sync {
    fn show(&self, cell: &GridCell, items: Vec<MenuItem>);
}

/// Builds the menu for a cell.
///
/// `row_is_node` tells whether the cell's row is a portfolio node row of the
/// grid. Position cells on node rows, like node cells, can only receive new
/// trades.
pub fn context_items(cell: &GridCell, row_is_node: bool) -> Vec<MenuItem> {
    let mut items = vec![MenuItem {
        name: "Insert",
        action: MenuAction::InsertTrade {
            node_id: cell.row_value.node_id.clone(),
        },
    }];

    match cell.cell_type {
        CellType::Node => return items,
        CellType::Position if row_is_node => return items,
        _ => {}
    }

    let is_trade = matches!(cell.cell_type, CellType::OtcTrade | CellType::FungibleTrade);
    let trade_id = cell.row_value.trade_id.as_deref().filter(|id| !id.is_empty());
    match (trade_id, &cell.row_value.position_id) {
        (Some(trade_id), _) if is_trade => items.push(MenuItem {
            name: "Edit",
            action: MenuAction::EditTrade {
                trade_id: trade_id.to_string(),
                node_id: cell.row_value.node_id.clone(),
            },
        }),
        (_, Some(position_id)) => items.push(MenuItem {
            name: "Edit",
            action: MenuAction::EditPosition {
                position_id: position_object_id(position_id),
            },
        }),
        _ => {}
    }

    items
}

/// Drops the version part of a position id: `scheme~value~version` becomes
/// `scheme~value`.
pub fn position_object_id(position_id: &str) -> String {
    position_id.split('~').take(2).collect::<Vec<_>>().join("~")
}

/// Recording implementations for testing.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Records shown menus.
    #[derive(Debug, Default)]
    pub struct RecordingMenu {
        shown: Mutex<Vec<(GridCell, Vec<MenuItem>)>>,
    }

    impl RecordingMenu {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn shown(&self) -> Vec<(GridCell, Vec<MenuItem>)> {
            self.shown
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone()
        }
    }

    impl ContextMenu for RecordingMenu {
        fn show(&self, cell: &GridCell, items: Vec<MenuItem>) {
            self.shown
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push((cell.clone(), items));
        }
    }

    /// Records opened dialogs as short strings.
    #[derive(Debug, Default)]
    pub struct RecordingDialogs {
        opened: Mutex<Vec<String>>,
    }

    impl RecordingDialogs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn opened(&self) -> Vec<String> {
            self.opened
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone()
        }

        fn record(&self, entry: String) {
            self.opened
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(entry);
        }
    }

    impl TradeDialogs for RecordingDialogs {
        fn open_trade_entry(&self, node_id: Option<&str>) {
            self.record(format!("insert:{}", node_id.unwrap_or("")));
        }

        fn edit_trade(&self, trade_id: &str, node_id: Option<&str>) {
            self.record(format!("trade:{trade_id}@{}", node_id.unwrap_or("")));
        }

        fn edit_position(&self, position_id: &str) {
            self.record(format!("position:{position_id}"));
        }
    }
}
