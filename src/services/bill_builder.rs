//! Bill builder
//!
//! An explicit state machine that collects line items from an
//! [`InputSource`] into a [`DraftBill`]:
//!
//! ```text
//! Collecting --stop, >=1 line--> Finalizing --> Committed
//!     |
//!     +--------stop, no lines--> Aborted
//! ```
//!
//! Stock is debited through the inventory ledger as each line is accepted,
//! not when the bill is committed.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::error::{InvenGoError, InvenGoResult};
use crate::models::{BillFormat, DraftBill, Item, LineItem};

use super::inventory::InventoryLedger;

/// Codes that end item entry
pub const STOP_SENTINELS: [&str; 3] = ["STOP", "0", ""];

/// What the builder is asking its input source for
#[derive(Debug, Clone, Copy)]
pub enum Prompt<'p> {
    /// An item code or a stop sentinel
    Code,
    /// A whole number of units of `item`
    Quantity { item: &'p Item },
    /// Yes or no: sell although stock runs short
    ConfirmShortage { shortage: &'p Shortage },
}

/// Something worth telling the operator while a bill is being built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderEvent {
    UnknownCode(String),
    InvalidQuantity(String),
    InvalidAnswer(String),
    /// A zero quantity was entered; nothing was added
    ZeroQuantity { code: String },
    ShortageDenied { code: String },
    /// The line just added leaves the item with exactly zero units
    StockExhausted { code: String, name: String },
    LineAdded { line: LineItem, balance: i64 },
}

/// Supplies codes, quantities and confirmations to the builder
///
/// `Ok(None)` means the source is exhausted: at the code prompt it stops
/// entry, at the quantity prompt it counts as zero, and at a confirmation it
/// counts as a refusal.
pub trait InputSource {
    fn read(&mut self, prompt: &Prompt<'_>) -> InvenGoResult<Option<String>>;

    fn notify(&mut self, _event: &BuilderEvent) {}
}

/// Whether a shortage empties the shelf or drives it negative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortageKind {
    Exhausted,
    Negative,
}

/// A requested quantity that exceeds the item's balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortage {
    pub code: String,
    pub name: String,
    pub balance: i64,
    pub requested: u32,
    /// Balance after the sale
    pub stock_left: i64,
}

impl Shortage {
    pub fn kind(&self) -> ShortageKind {
        if self.stock_left == 0 {
            ShortageKind::Exhausted
        } else {
            ShortageKind::Negative
        }
    }

    pub fn message(&self) -> String {
        match self.kind() {
            ShortageKind::Exhausted => {
                format!("Alert! Stock of {} will be empty after this sale.", self.code)
            }
            ShortageKind::Negative => format!(
                "Alert! Stock of {} will be negative ({}) after this sale.",
                self.code, self.stock_left
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    Collecting,
    Finalizing,
    Committed,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Finalized draft, ready to commit
    Completed(DraftBill),
    /// Entry stopped before any line was added
    Aborted,
}

pub struct BillBuilder<'a> {
    inventory: &'a InventoryLedger<'a>,
    state: BuilderState,
    draft: DraftBill,
}

impl<'a> BillBuilder<'a> {
    pub fn new(
        inventory: &'a InventoryLedger<'a>,
        format: BillFormat,
        phone: Option<String>,
    ) -> Self {
        Self {
            inventory,
            state: BuilderState::Collecting,
            draft: DraftBill::new(format, phone),
        }
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Run the machine to a terminal state
    pub fn build(mut self, input: &mut dyn InputSource) -> InvenGoResult<BuildOutcome> {
        loop {
            self.state = match self.state {
                BuilderState::Collecting => self.collect(input)?,
                BuilderState::Finalizing => self.finalize(),
                BuilderState::Committed => return Ok(BuildOutcome::Completed(self.draft)),
                BuilderState::Aborted => {
                    debug!("bill entry stopped with no items");
                    return Ok(BuildOutcome::Aborted);
                }
            };
        }
    }

    /// Handle one code from the input source
    fn collect(&mut self, input: &mut dyn InputSource) -> InvenGoResult<BuilderState> {
        let code = input
            .read(&Prompt::Code)?
            .unwrap_or_default()
            .trim()
            .to_uppercase();

        if STOP_SENTINELS.contains(&code.as_str()) {
            return Ok(if self.draft.is_empty() {
                BuilderState::Aborted
            } else {
                BuilderState::Finalizing
            });
        }

        let item = match self.inventory.lookup(&code) {
            Ok(item) => item,
            Err(InvenGoError::UnknownCode(code)) => {
                input.notify(&BuilderEvent::UnknownCode(code));
                return Ok(BuilderState::Collecting);
            }
            Err(e) => return Err(e),
        };

        let quantity = read_quantity(input, &item)?;
        if quantity == 0 {
            input.notify(&BuilderEvent::ZeroQuantity { code: item.code });
            return Ok(BuilderState::Collecting);
        }

        let stock_left = item.balance() - i64::from(quantity);
        if stock_left < 0 {
            let shortage = Shortage {
                code: item.code.clone(),
                name: item.name.clone(),
                balance: item.balance(),
                requested: quantity,
                stock_left,
            };
            if !confirm_shortage(input, &shortage)? {
                input.notify(&BuilderEvent::ShortageDenied { code: item.code });
                return Ok(BuilderState::Collecting);
            }
            warn!(code = %item.code, stock_left, "shortage overridden");
        }

        self.add_line(&item, quantity, input)?;
        Ok(BuilderState::Collecting)
    }

    fn add_line(
        &mut self,
        item: &Item,
        quantity: u32,
        input: &mut dyn InputSource,
    ) -> InvenGoResult<()> {
        let line = LineItem {
            sequence_no: self.draft.lines.len() as u32 + 1,
            code: Some(item.code.clone()),
            name: item.name.clone(),
            size: format!("{}GM", item.size),
            mrp: Some(item.mrp),
            unit_price: item.price,
            quantity,
            amount: item.price * quantity,
        };

        self.draft
            .packaging
            .entry(item.name.clone())
            .or_default()
            .push(format!("{}GM x {}", item.size, quantity));
        *self.draft.weights.entry(item.name.clone()).or_default() +=
            u64::from(item.size) * u64::from(quantity);
        self.draft.lines.push(line.clone());

        let updated = self.inventory.record_sale(&item.code, quantity)?;
        if updated.balance() == 0 {
            input.notify(&BuilderEvent::StockExhausted {
                code: updated.code.clone(),
                name: updated.name.clone(),
            });
        }
        input.notify(&BuilderEvent::LineAdded {
            line,
            balance: updated.balance(),
        });
        Ok(())
    }

    fn finalize(&mut self) -> BuilderState {
        self.draft.subtotal = self.draft.line_total();
        self.draft.total_row = self.draft.format.total_row(self.draft.subtotal);
        debug!(lines = self.draft.lines.len(), subtotal = %self.draft.subtotal, "bill finalized");
        BuilderState::Committed
    }
}

/// Ask until a whole number arrives; negatives count as zero
fn read_quantity(input: &mut dyn InputSource, item: &Item) -> InvenGoResult<u32> {
    loop {
        let Some(raw) = input.read(&Prompt::Quantity { item })? else {
            return Ok(0);
        };
        match raw.trim().parse::<i64>() {
            Ok(n) if n <= 0 => return Ok(0),
            Ok(n) => match u32::try_from(n) {
                Ok(quantity) => return Ok(quantity),
                Err(_) => input.notify(&BuilderEvent::InvalidQuantity(raw)),
            },
            Err(_) => input.notify(&BuilderEvent::InvalidQuantity(raw)),
        }
    }
}

fn confirm_shortage(input: &mut dyn InputSource, shortage: &Shortage) -> InvenGoResult<bool> {
    loop {
        let Some(raw) = input.read(&Prompt::ConfirmShortage { shortage })? else {
            return Ok(false);
        };
        match raw.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => input.notify(&BuilderEvent::InvalidAnswer(raw)),
        }
    }
}

/// Input source fed from a fixed list of answers
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    pub events: Vec<BuilderEvent>,
    pub shortages: Vec<Shortage>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            events: Vec::new(),
            shortages: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputSource for ScriptedInput {
    fn read(&mut self, prompt: &Prompt<'_>) -> InvenGoResult<Option<String>> {
        if let Prompt::ConfirmShortage { shortage } = prompt {
            self.shortages.push((*shortage).clone());
        }
        Ok(self.answers.pop_front())
    }

    fn notify(&mut self, event: &BuilderEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLogger;
    use crate::models::{Accumulator, Money};
    use crate::services::inventory::tests::{create_test_store, new_item};
    use crate::storage::WorkbookStore;
    use tempfile::TempDir;

    fn stocked_store() -> (TempDir, WorkbookStore, AuditLogger) {
        let (temp, store, journal) = create_test_store();
        {
            let ledger = InventoryLedger::load(&store, &journal).unwrap();
            let mut almonds = new_item("ALM050", 50, 55, 0);
            almonds.name = "Almonds".into();
            ledger
                .insert_item(almonds, Accumulator::new(100), Accumulator::new(20))
                .unwrap();
            let mut cashews = new_item("CSH100", 100, 120, 3);
            cashews.name = "Cashews".into();
            ledger.add_item(cashews).unwrap();
        }
        (temp, store, journal)
    }

    fn run(
        inventory: &InventoryLedger<'_>,
        input: &mut ScriptedInput,
    ) -> BuildOutcome {
        BillBuilder::new(inventory, BillFormat::Compact, None)
            .build(input)
            .unwrap()
    }

    #[test]
    fn test_first_input_stop_aborts() {
        for sentinel in ["STOP", "0", "", "stop"] {
            let (_temp, store, journal) = stocked_store();
            let inventory = InventoryLedger::load(&store, &journal).unwrap();
            let before = store.snapshot().unwrap();

            let mut input = ScriptedInput::new([sentinel]);
            assert_eq!(run(&inventory, &mut input), BuildOutcome::Aborted);
            assert_eq!(store.snapshot().unwrap(), before);
        }
    }

    #[test]
    fn test_exhausted_source_aborts() {
        let (_temp, store, journal) = stocked_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();

        let mut input = ScriptedInput::new(Vec::<String>::new());
        assert_eq!(run(&inventory, &mut input), BuildOutcome::Aborted);
    }

    #[test]
    fn test_sale_debits_stock_per_line() {
        let (_temp, store, journal) = stocked_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();

        let mut input = ScriptedInput::new(["alm050", "10", "STOP"]);
        let BuildOutcome::Completed(draft) = run(&inventory, &mut input) else {
            panic!("expected a draft");
        };

        let item = inventory.lookup("ALM050").unwrap();
        assert_eq!(item.stock_sold, 30);
        assert_eq!(item.balance(), 70);

        assert_eq!(draft.lines.len(), 1);
        assert_eq!(draft.lines[0].amount, Money::from_rupees(550));
        assert_eq!(draft.subtotal, Money::from_rupees(550));
        assert_eq!(draft.total_row, BillFormat::Compact.total_row(draft.subtotal));
    }

    #[test]
    fn test_packaging_and_weights() {
        let (_temp, store, journal) = stocked_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();

        let mut input = ScriptedInput::new(["ALM050", "2", "CSH100", "1", "ALM050", "3", "0"]);
        let BuildOutcome::Completed(draft) = run(&inventory, &mut input) else {
            panic!("expected a draft");
        };

        let sequence: Vec<u32> = draft.lines.iter().map(|l| l.sequence_no).collect();
        assert_eq!(sequence, vec![1, 2, 3]);
        assert_eq!(draft.packaging["Almonds"], vec!["50GM x 2", "50GM x 3"]);
        assert_eq!(draft.packaging["Cashews"], vec!["100GM x 1"]);
        assert_eq!(draft.weights["Almonds"], 250);
        assert_eq!(draft.subtotal, draft.line_total());
        assert_eq!(draft.subtotal, Money::from_rupees(55 * 5 + 120));
    }

    #[test]
    fn test_unknown_code_reprompts() {
        let (_temp, store, journal) = stocked_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();

        let mut input = ScriptedInput::new(["XYZ", "ALM050", "1", "STOP"]);
        let outcome = run(&inventory, &mut input);

        assert!(matches!(outcome, BuildOutcome::Completed(ref d) if d.lines.len() == 1));
        assert_eq!(input.events[0], BuilderEvent::UnknownCode("XYZ".into()));
    }

    #[test]
    fn test_zero_and_negative_quantity_are_noops() {
        let (_temp, store, journal) = stocked_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();

        let mut input = ScriptedInput::new(["ALM050", "0", "ALM050", "-4", "STOP"]);
        assert_eq!(run(&inventory, &mut input), BuildOutcome::Aborted);
        assert_eq!(inventory.lookup("ALM050").unwrap().stock_sold, 20);
        assert_eq!(
            input.events,
            vec![
                BuilderEvent::ZeroQuantity { code: "ALM050".into() },
                BuilderEvent::ZeroQuantity { code: "ALM050".into() },
            ]
        );
    }

    #[test]
    fn test_invalid_quantity_reprompts() {
        let (_temp, store, journal) = stocked_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();

        let mut input = ScriptedInput::new(["ALM050", "two", "2.5", "2", "STOP"]);
        let BuildOutcome::Completed(draft) = run(&inventory, &mut input) else {
            panic!("expected a draft");
        };
        assert_eq!(draft.lines[0].quantity, 2);
        assert_eq!(input.events[0], BuilderEvent::InvalidQuantity("two".into()));
        assert_eq!(input.events[1], BuilderEvent::InvalidQuantity("2.5".into()));
    }

    #[test]
    fn test_shortage_confirmed_goes_negative() {
        let (_temp, store, journal) = stocked_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();

        // CSH100 has 3 on hand; selling 8 leaves -5.
        let mut input = ScriptedInput::new(["CSH100", "8", "maybe", "y", "STOP"]);
        let BuildOutcome::Completed(draft) = run(&inventory, &mut input) else {
            panic!("expected a draft");
        };

        assert_eq!(draft.lines[0].quantity, 8);
        let item = inventory.lookup("CSH100").unwrap();
        assert_eq!(item.stock_sold, 8);
        assert_eq!(item.balance(), -5);

        assert_eq!(input.shortages.len(), 2);
        assert_eq!(input.shortages[0].kind(), ShortageKind::Negative);
        assert!(input.shortages[0].message().contains("negative (-5)"));
        assert!(input
            .events
            .contains(&BuilderEvent::InvalidAnswer("maybe".into())));
    }

    #[test]
    fn test_shortage_denied_discards_line() {
        let (_temp, store, journal) = stocked_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();

        let mut input = ScriptedInput::new(["CSH100", "8", "n", "ALM050", "1", "STOP"]);
        let BuildOutcome::Completed(draft) = run(&inventory, &mut input) else {
            panic!("expected a draft");
        };

        assert_eq!(draft.lines.len(), 1);
        assert_eq!(draft.lines[0].code.as_deref(), Some("ALM050"));
        assert_eq!(inventory.lookup("CSH100").unwrap().stock_sold, 0);
        assert!(input.events.contains(&BuilderEvent::ShortageDenied {
            code: "CSH100".into()
        }));
    }

    #[test]
    fn test_exact_balance_is_not_a_shortage() {
        let (_temp, store, journal) = stocked_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();

        let mut input = ScriptedInput::new(["CSH100", "3", "STOP"]);
        let outcome = run(&inventory, &mut input);

        assert!(matches!(outcome, BuildOutcome::Completed(_)));
        assert!(input.shortages.is_empty());
        assert_eq!(inventory.lookup("CSH100").unwrap().balance(), 0);
        assert!(input.events.contains(&BuilderEvent::StockExhausted {
            code: "CSH100".into(),
            name: "Cashews".into(),
        }));
    }

    #[test]
    fn test_shortage_message_distinguishes_zero() {
        let shortage = Shortage {
            code: "ALM050".into(),
            name: "Almonds".into(),
            balance: 2,
            requested: 2,
            stock_left: 0,
        };
        assert_eq!(shortage.kind(), ShortageKind::Exhausted);
        assert!(shortage.message().contains("empty"));
    }

    #[test]
    fn test_exhausted_source_during_confirmation_denies() {
        let (_temp, store, journal) = stocked_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();

        let mut input = ScriptedInput::new(["CSH100", "8"]);
        assert_eq!(run(&inventory, &mut input), BuildOutcome::Aborted);
        assert_eq!(inventory.lookup("CSH100").unwrap().stock_sold, 0);
    }

    #[test]
    fn test_phone_and_format_carried() {
        let (_temp, store, journal) = stocked_store();
        let inventory = InventoryLedger::load(&store, &journal).unwrap();

        let mut input = ScriptedInput::new(["ALM050", "1", "STOP"]);
        let builder =
            BillBuilder::new(&inventory, BillFormat::Full, Some("9876543210".into()));
        assert_eq!(builder.state(), BuilderState::Collecting);

        let BuildOutcome::Completed(draft) = builder.build(&mut input).unwrap() else {
            panic!("expected a draft");
        };
        assert_eq!(draft.phone.as_deref(), Some("9876543210"));
        assert_eq!(draft.format, BillFormat::Full);
        assert_eq!(draft.lines[0].mrp, Some(Money::from_rupees(60)));
    }
}
