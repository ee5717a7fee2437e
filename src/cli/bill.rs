//! Bill CLI commands
//!
//! `bill new` drives the bill builder from the terminal, then asks for the
//! payment mode and discount and commits. The other subcommands read
//! committed bills back from the bills sheet.

use std::io::{BufRead, Write};

use clap::Subcommand;
use tracing::warn;

use crate::config::{InvenGoPaths, Settings};
use crate::delivery::{MessageChannel, OutboundMessage, OutboxChannel};
use crate::display::{format_bill, format_customer, render_message};
use crate::error::{InvenGoError, InvenGoResult};
use crate::models::{
    normalize_phone, BillFormat, CommittedBill, MessageStyle, Money, PaymentMode,
};
use crate::services::{
    BillArchive, BillBuilder, BillCommitter, BuildOutcome, BuilderEvent, CustomerLedger,
    InputSource, InventoryLedger, Prompt,
};
use crate::storage::Storage;

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// Create a bill, reading item codes and quantities from stdin
    New {
        /// Customer phone number
        #[arg(short, long)]
        phone: Option<String>,
        /// Column layout (compact, detailed, full)
        #[arg(short, long)]
        format: Option<String>,
        /// Payment mode (cash, digital); asked for when omitted
        #[arg(long)]
        payment: Option<String>,
        /// Discount amount; asked for when omitted
        #[arg(short, long)]
        discount: Option<String>,
        /// Queue the bill message in the outbox after saving
        #[arg(long)]
        send: bool,
        /// Message style for --send (simple, detailed, professional)
        #[arg(short, long)]
        style: Option<String>,
    },
    /// Show a committed bill
    Show {
        /// Bill number, e.g. INV0008
        number: String,
        /// Print the outbound message in this style instead of the table
        #[arg(short, long)]
        style: Option<String>,
    },
    /// List the bills issued to a phone number
    Find {
        phone: String,
    },
    /// Queue a committed bill's message in the outbox
    Send {
        number: String,
        #[arg(short, long)]
        style: Option<String>,
    },
}

/// Handle a bill command
pub fn handle_bill_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BillCommands,
) -> InvenGoResult<()> {
    match cmd {
        BillCommands::New {
            phone,
            format,
            payment,
            discount,
            send,
            style,
        } => {
            let phone = parse_phone(phone.as_deref())?;
            let format = parse_format(format.as_deref(), settings)?;
            let style = parse_style(style.as_deref(), settings)?;
            let payment = payment.as_deref().map(parse_payment).transpose()?;
            let discount = discount.as_deref().map(parse_money).transpose()?;

            let stdin = std::io::stdin();
            let mut input = ConsoleInput::new(stdin.lock(), std::io::stdout());

            let bill = new_bill(storage, settings, &mut input, format, phone, payment, discount)?;
            let Some(bill) = bill else {
                println!("No items entered. Bill cancelled.");
                return Ok(());
            };

            print!("{}", format_bill(&bill, settings));
            println!("Bill {} saved.", bill.number);

            if send {
                send_bill(storage.paths(), settings, &bill, style)?;
            }
        }

        BillCommands::Show { number, style } => {
            let bill = BillArchive::new(&storage.cells).find(&number)?;
            match style.as_deref() {
                Some(style) => {
                    let style = parse_style(Some(style), settings)?;
                    print!("{}", render_message(&bill, style, settings));
                }
                None => print!("{}", format_bill(&bill, settings)),
            }
        }

        BillCommands::Find { phone } => {
            let customers = CustomerLedger::new(&storage.cells, &storage.journal);
            let customer = customers.get_customer(&phone)?;
            print!("{}", format_customer(&customer, &settings.currency_symbol));

            for bill in BillArchive::new(&storage.cells).for_phone(&phone)? {
                println!(
                    "  {}  {}  {}",
                    bill.number,
                    bill.timestamp.format("%d-%m-%Y %H:%M"),
                    bill.net_amount().format_with_symbol(&settings.currency_symbol)
                );
            }
        }

        BillCommands::Send { number, style } => {
            let bill = BillArchive::new(&storage.cells).find(&number)?;
            let style = parse_style(style.as_deref(), settings)?;
            send_bill(storage.paths(), settings, &bill, style)?;
        }
    }

    Ok(())
}

/// Build, price and commit one bill; `None` when entry was stopped empty
fn new_bill<R: BufRead, W: Write>(
    storage: &Storage,
    settings: &Settings,
    input: &mut ConsoleInput<R, W>,
    format: BillFormat,
    phone: Option<String>,
    payment: Option<PaymentMode>,
    discount: Option<Money>,
) -> InvenGoResult<Option<CommittedBill>> {
    let inventory = InventoryLedger::load(&storage.cells, &storage.journal)?;

    let draft = match BillBuilder::new(&inventory, format, phone).build(input)? {
        BuildOutcome::Completed(draft) => draft,
        BuildOutcome::Aborted => return Ok(None),
    };

    input.say(&format_bill(&draft, settings))?;

    let payment = match payment {
        Some(mode) => mode,
        None => input.ask_payment()?,
    };
    let discount = match discount {
        Some(amount) => amount,
        None => input.ask_discount()?,
    };

    let bill = BillCommitter::new(&storage.cells, &storage.journal, &settings.bill_prefix)
        .commit(draft, payment, discount)?;
    Ok(Some(bill))
}

fn send_bill(
    paths: &InvenGoPaths,
    settings: &Settings,
    bill: &CommittedBill,
    style: MessageStyle,
) -> InvenGoResult<()> {
    let text = render_message(bill, style, settings);
    let channel = OutboxChannel::from_settings(paths, settings);
    let receipt = channel.send(&OutboundMessage {
        bill_number: &bill.number,
        phone: bill.phone.as_deref(),
        text: &text,
        image: settings.logo_path.as_deref(),
    })?;

    println!("Message written to {}", receipt.message_file.display());
    if let Some(link) = receipt.chat_link {
        println!("Open chat: {}", link);
    }
    Ok(())
}

fn parse_format(value: Option<&str>, settings: &Settings) -> InvenGoResult<BillFormat> {
    match value {
        None => Ok(settings.bill_format),
        Some(value) => BillFormat::parse(value).ok_or_else(|| {
            InvenGoError::Validation(format!(
                "Invalid bill format: '{}'. Valid formats: compact, detailed, full",
                value
            ))
        }),
    }
}

fn parse_style(value: Option<&str>, settings: &Settings) -> InvenGoResult<MessageStyle> {
    match value {
        None => Ok(settings.message_style),
        Some(value) => MessageStyle::parse(value).ok_or_else(|| {
            InvenGoError::Validation(format!(
                "Invalid message style: '{}'. Valid styles: simple, detailed, professional",
                value
            ))
        }),
    }
}

fn parse_payment(value: &str) -> InvenGoResult<PaymentMode> {
    PaymentMode::parse(value).ok_or_else(|| {
        InvenGoError::Validation(format!(
            "Invalid payment mode: '{}'. Valid modes: cash, digital",
            value
        ))
    })
}

/// Blank means no phone
fn parse_phone(value: Option<&str>) -> InvenGoResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => normalize_phone(value).map(Some).ok_or_else(|| {
            InvenGoError::Validation(format!(
                "Invalid phone number: '{}'. Use digits, optionally with a leading '+'",
                value
            ))
        }),
    }
}

fn parse_money(value: &str) -> InvenGoResult<Money> {
    Money::parse(value)
        .map_err(|e| InvenGoError::Validation(format!("Invalid amount '{}': {}", value, e)))
}

/// Terminal input source: prompts on `out`, answers from `input`
pub struct ConsoleInput<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    fn say(&mut self, text: &str) -> InvenGoResult<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    /// Print a question and read one line; `None` at end of input
    fn ask(&mut self, question: &str) -> InvenGoResult<Option<String>> {
        self.say(question)?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_payment(&mut self) -> InvenGoResult<PaymentMode> {
        loop {
            let Some(answer) = self.ask("Payment mode (1 = Cash, 2 = Digital): ")? else {
                return Err(InvenGoError::InvalidInput(
                    "No payment mode given; bill not saved".into(),
                ));
            };
            match PaymentMode::parse(&answer) {
                Some(mode) => return Ok(mode),
                None => self.say("Please enter 1 (Cash) or 2 (Digital).\n")?,
            }
        }
    }

    fn ask_discount(&mut self) -> InvenGoResult<Money> {
        loop {
            let answer = self.ask("Discount (blank for none): ")?.unwrap_or_default();
            if answer.is_empty() {
                return Ok(Money::zero());
            }
            match Money::parse(&answer) {
                Ok(amount) if !amount.is_negative() => return Ok(amount),
                _ => self.say("Please enter an amount such as 25 or 12.50.\n")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> InputSource for ConsoleInput<R, W> {
    fn read(&mut self, prompt: &Prompt<'_>) -> InvenGoResult<Option<String>> {
        match prompt {
            Prompt::Code => self.ask("Item code (STOP to finish): "),
            Prompt::Quantity { item } => self.ask(&format!(
                "Quantity of {} {} (in stock: {}): ",
                item.name,
                item.size_label(),
                item.balance()
            )),
            Prompt::ConfirmShortage { shortage } => {
                self.ask(&format!("{} Sell anyway? (y/n): ", shortage.message()))
            }
        }
    }

    fn notify(&mut self, event: &BuilderEvent) {
        let text = match event {
            BuilderEvent::UnknownCode(code) => format!("Invalid code: {}\n", code),
            BuilderEvent::InvalidQuantity(raw) => {
                format!("'{}' is not a whole number. Try again.\n", raw)
            }
            BuilderEvent::InvalidAnswer(raw) => format!("Please answer y or n, not '{}'.\n", raw),
            BuilderEvent::ZeroQuantity { code } => format!("Nothing added for {}.\n", code),
            BuilderEvent::ShortageDenied { code } => format!("{} skipped.\n", code),
            BuilderEvent::StockExhausted { code, name } => {
                format!("Stock of {} ({}) is now empty.\n", name, code)
            }
            BuilderEvent::LineAdded { line, balance } => format!(
                "Added {} x {} = {} (stock left: {})\n",
                line.name, line.quantity, line.amount, balance
            ),
        };
        if let Err(e) = self.say(&text) {
            warn!(error = %e, "failed to write bill entry feedback");
        }
    }
}
