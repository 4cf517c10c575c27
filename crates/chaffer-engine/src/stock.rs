//! Back-room inventory and the display shelf.
//!
//! The stock room owns every item instance the shop holds. An instance
//! lives in exactly one of two collections: the unbounded back-room
//! inventory or the capacity-limited shelf. Moves between them and
//! removals on sale are the only transfers; an instance is never in both.

use chaffer_types::ids::ItemInstanceId;
use chaffer_types::instances::ItemInstance;

/// Shelf capacity of a freshly opened shop.
pub const STARTING_SHELF_CAPACITY: u32 = 4;

/// Gold per current shelf slot charged for the next upgrade.
pub const UPGRADE_COST_PER_SLOT: u32 = 200;

// ---------------------------------------------------------------------------
// StockRoom
// ---------------------------------------------------------------------------

/// The shop's item holdings: back-room inventory plus the bounded shelf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRoom {
    inventory: Vec<ItemInstance>,
    shelf: Vec<ItemInstance>,
    capacity: u32,
}

impl Default for StockRoom {
    fn default() -> Self {
        Self::new()
    }
}

impl StockRoom {
    /// Create an empty stock room with the starting shelf capacity.
    pub const fn new() -> Self {
        Self {
            inventory: Vec::new(),
            shelf: Vec::new(),
            capacity: STARTING_SHELF_CAPACITY,
        }
    }

    /// Back-room items, in acquisition order.
    pub fn inventory(&self) -> &[ItemInstance] {
        &self.inventory
    }

    /// Displayed items, in placement order.
    pub fn shelf(&self) -> &[ItemInstance] {
        &self.shelf
    }

    /// Current shelf capacity.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of items currently displayed.
    pub fn shelf_occupancy(&self) -> u32 {
        u32::try_from(self.shelf.len()).unwrap_or(u32::MAX)
    }

    /// Whether the shelf has no free slot left.
    pub fn shelf_is_full(&self) -> bool {
        self.shelf_occupancy() >= self.capacity
    }

    /// Gold cost of the next capacity upgrade.
    pub const fn upgrade_cost(&self) -> u32 {
        self.capacity.saturating_mul(UPGRADE_COST_PER_SLOT)
    }

    /// Accept a freshly purchased instance into the back room.
    pub fn add_to_inventory(&mut self, item: ItemInstance) {
        self.inventory.push(item);
    }

    /// Move an inventory item onto the shelf.
    ///
    /// A silent no-op (returning `false`) when the instance is not in the
    /// back room or the shelf is full; both collections stay unchanged.
    pub fn move_to_shelf(&mut self, instance_id: ItemInstanceId) -> bool {
        if self.shelf_is_full() {
            tracing::debug!(%instance_id, "shelf is full, move rejected");
            return false;
        }
        let Some(index) = self
            .inventory
            .iter()
            .position(|i| i.instance_id == instance_id)
        else {
            tracing::debug!(%instance_id, "move requested for item not in inventory");
            return false;
        };
        let item = self.inventory.remove(index);
        self.shelf.push(item);
        true
    }

    /// Borrow a displayed item by instance id.
    pub fn find_on_shelf(&self, instance_id: ItemInstanceId) -> Option<&ItemInstance> {
        self.shelf.iter().find(|i| i.instance_id == instance_id)
    }

    /// Remove a displayed item (the sale concluded and the instance is
    /// destroyed with it).
    pub fn take_from_shelf(&mut self, instance_id: ItemInstanceId) -> Option<ItemInstance> {
        let index = self
            .shelf
            .iter()
            .position(|i| i.instance_id == instance_id)?;
        Some(self.shelf.remove(index))
    }

    /// Grow the shelf by one slot. The ledger debits the cost; this only
    /// records the new capacity.
    pub const fn upgrade(&mut self) {
        self.capacity = self.capacity.saturating_add(1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chaffer_types::catalog::WHOLESALE_CATALOG;

    use super::*;

    fn instance() -> ItemInstance {
        let template = WHOLESALE_CATALOG.first().unwrap();
        ItemInstance::from_template(template)
    }

    #[test]
    fn new_stock_room_is_empty() {
        let stock = StockRoom::new();
        assert!(stock.inventory().is_empty());
        assert!(stock.shelf().is_empty());
        assert_eq!(stock.capacity(), 4);
        assert_eq!(stock.upgrade_cost(), 800);
    }

    #[test]
    fn move_transfers_between_collections() {
        let mut stock = StockRoom::new();
        let item = instance();
        let id = item.instance_id;
        stock.add_to_inventory(item);

        assert!(stock.move_to_shelf(id));
        assert!(stock.inventory().is_empty());
        assert_eq!(stock.shelf().len(), 1);
        assert!(stock.find_on_shelf(id).is_some());
    }

    #[test]
    fn move_unknown_instance_is_noop() {
        let mut stock = StockRoom::new();
        stock.add_to_inventory(instance());

        assert!(!stock.move_to_shelf(ItemInstanceId::new()));
        assert_eq!(stock.inventory().len(), 1);
        assert!(stock.shelf().is_empty());
    }

    #[test]
    fn move_beyond_capacity_is_noop() {
        let mut stock = StockRoom::new();
        let mut overflow_id = None;
        for n in 0..5 {
            let item = instance();
            let id = item.instance_id;
            stock.add_to_inventory(item);
            if n == 4 {
                overflow_id = Some(id);
            } else {
                assert!(stock.move_to_shelf(id));
            }
        }

        let overflow_id = overflow_id.unwrap();
        assert!(stock.shelf_is_full());
        assert!(!stock.move_to_shelf(overflow_id));
        // Both collections unchanged.
        assert_eq!(stock.shelf().len(), 4);
        assert_eq!(stock.inventory().len(), 1);
    }

    #[test]
    fn upgrade_opens_one_slot() {
        let mut stock = StockRoom::new();
        for _ in 0..4 {
            let item = instance();
            let id = item.instance_id;
            stock.add_to_inventory(item);
            assert!(stock.move_to_shelf(id));
        }
        assert!(stock.shelf_is_full());

        stock.upgrade();
        assert_eq!(stock.capacity(), 5);
        assert!(!stock.shelf_is_full());
        assert_eq!(stock.upgrade_cost(), 1000);

        let item = instance();
        let id = item.instance_id;
        stock.add_to_inventory(item);
        assert!(stock.move_to_shelf(id));
    }

    #[test]
    fn take_from_shelf_destroys_ownership() {
        let mut stock = StockRoom::new();
        let item = instance();
        let id = item.instance_id;
        stock.add_to_inventory(item);
        assert!(stock.move_to_shelf(id));

        let taken = stock.take_from_shelf(id);
        assert!(taken.is_some());
        assert!(stock.shelf().is_empty());
        assert!(stock.take_from_shelf(id).is_none());
    }
}
