//! Bill rendering
//!
//! The console table for the active bill format and the three outbound
//! message styles. Rendering reads only the bill and the shop settings.

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::config::Settings;
use crate::models::{BillContent, LineItem, MessageStyle};

const DATE_FORMAT: &str = "%d-%m-%Y %H:%M";
const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━";

/// Format the line table of a bill, closed by its TOTAL row
pub fn format_bill_table(bill: &impl BillContent) -> String {
    let format = bill.format();

    let mut builder = Builder::default();
    builder.push_record(format.headers().iter().map(|h| h.to_string()));
    for line in bill.lines() {
        builder.push_record(line.row(format));
    }
    builder.push_record(format.total_row(bill.subtotal()));

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

/// Format a bill for the console: banner, header lines, table and totals
pub fn format_bill(bill: &impl BillContent, settings: &Settings) -> String {
    let width = settings.display_width;
    let symbol = &settings.currency_symbol;
    let title = match bill.number() {
        Some(number) => format!("BILL {}", number),
        None => "FINAL BILL".to_string(),
    };

    let mut output = String::new();
    output.push_str(&"=".repeat(width));
    output.push('\n');
    output.push_str(&format!("{:^width$}\n", title, width = width));
    output.push_str(&"=".repeat(width));
    output.push('\n');

    if let Some(timestamp) = bill.timestamp() {
        output.push_str(&format!("Date: {}\n", timestamp.format(DATE_FORMAT)));
    }
    if let Some(phone) = bill.phone() {
        output.push_str(&format!("Phone: {}\n", phone));
    }

    output.push_str(&format_bill_table(bill));
    output.push('\n');

    let total_line = |label: &str, amount: String| {
        format!("{:>width$}\n", format!("{} {}", label, amount), width = width)
    };
    output.push_str(&total_line(
        "Subtotal:",
        bill.subtotal().format_with_symbol(symbol),
    ));
    if bill.discount().is_positive() {
        output.push_str(&total_line(
            "Discount:",
            bill.discount().format_with_symbol(symbol),
        ));
        output.push_str(&total_line(
            "Total:",
            bill.net_amount().format_with_symbol(symbol),
        ));
    }

    if !bill.packaging().is_empty() {
        output.push_str("\nPackaging:\n");
        for (name, packs) in bill.packaging() {
            output.push_str(&format!("  {}: {}\n", name, packs.join(", ")));
        }
    }

    output
}

/// Render the outbound message for a bill in the given style
pub fn render_message(bill: &impl BillContent, style: MessageStyle, settings: &Settings) -> String {
    match style {
        MessageStyle::Simple => render_simple(bill, settings),
        MessageStyle::Detailed => render_detailed(bill, settings),
        MessageStyle::Professional => render_professional(bill, settings),
    }
}

fn bill_label(bill: &impl BillContent) -> &str {
    bill.number().unwrap_or("DRAFT")
}

fn date_line(bill: &impl BillContent) -> String {
    bill.timestamp()
        .map(|t| format!("Date: {}\n", t.format(DATE_FORMAT)))
        .unwrap_or_default()
}

fn packaging_of<'b>(bill: &'b impl BillContent, line: &LineItem) -> Option<&'b Vec<String>> {
    bill.packaging().get(&line.name).filter(|packs| !packs.is_empty())
}

fn render_simple(bill: &impl BillContent, settings: &Settings) -> String {
    let symbol = &settings.currency_symbol;
    let mut output = format!("*{} BILL #{}*\n", settings.shop_name, bill_label(bill));
    output.push_str(&date_line(bill));

    output.push_str("\nITEMS:\n");
    for (i, line) in bill.lines().iter().enumerate() {
        output.push_str(&format!(
            "{}. {} - {} x {} = {}\n",
            i + 1,
            line.name,
            line.size,
            line.quantity,
            line.amount.format_with_symbol(symbol)
        ));
    }

    output.push_str(&format!(
        "\n*Total: {}*\n",
        bill.subtotal().format_with_symbol(symbol)
    ));
    if bill.discount().is_positive() {
        output.push_str(&format!(
            "*Discount: {}*\n",
            bill.discount().format_with_symbol(symbol)
        ));
    }
    output.push_str(&format!(
        "*Final Amount: {}*\n",
        bill.net_amount().format_with_symbol(symbol)
    ));
    output.push_str("\nThank you for your purchase!\n");
    output
}

fn render_detailed(bill: &impl BillContent, settings: &Settings) -> String {
    let symbol = &settings.currency_symbol;
    let mut output = format!("*{} BILL #{}*\n", settings.shop_name, bill_label(bill));
    output.push_str(&date_line(bill));

    output.push_str("\nITEM DETAILS:\n");
    for (i, line) in bill.lines().iter().enumerate() {
        output.push_str(&format!("{}. *{}*\n", i + 1, line.name));
        output.push_str(&format!("   Size: {}\n", line.size));
        output.push_str(&format!(
            "   Rate: {}\n",
            line.unit_price.format_with_symbol(symbol)
        ));
        match packaging_of(bill, line) {
            Some(packs) => output.push_str(&format!(
                "   Qty: {} ({})\n",
                line.quantity,
                packs.join(", ")
            )),
            None => output.push_str(&format!("   Qty: {}\n", line.quantity)),
        }
        output.push_str(&format!(
            "   Amount: {}\n\n",
            line.amount.format_with_symbol(symbol)
        ));
    }

    output.push_str(&format!(
        "*Total: {}*\n",
        bill.subtotal().format_with_symbol(symbol)
    ));
    if bill.discount().is_positive() {
        output.push_str(&format!(
            "*Discount: {}*\n",
            bill.discount().format_with_symbol(symbol)
        ));
    }
    output.push_str(&format!(
        "*Final Amount: {}*\n",
        bill.net_amount().format_with_symbol(symbol)
    ));
    output.push_str("\nThank you for your purchase!\n");
    output.push_str(&format!("Share your feedback: {}\n", settings.feedback_url));
    output
}

fn render_professional(bill: &impl BillContent, settings: &Settings) -> String {
    let symbol = &settings.currency_symbol;
    let mut output = format!(
        "*{}*  •  INVOICE #{}\n",
        settings.shop_name,
        bill_label(bill)
    );
    output.push_str(&date_line(bill));
    output.push_str(&format!("{}\n*ITEMIZED BILL*\n{}\n", DIVIDER, DIVIDER));

    for (i, line) in bill.lines().iter().enumerate() {
        output.push_str(&format!("{}. *{}*\n", i + 1, line.name));
        if settings.include_full_details {
            if let Some(code) = &line.code {
                output.push_str(&format!("    Code: {}\n", code));
            }
        }
        output.push_str(&format!("    Size: {}\n", line.size));
        output.push_str(&format!(
            "    Rate: {}\n",
            line.unit_price.format_with_symbol(symbol)
        ));
        output.push_str(&format!("    Qty: {}\n", line.quantity));
        if let Some(packs) = packaging_of(bill, line) {
            output.push_str(&format!("    Packaging: {}\n", packs.join(", ")));
        }
        output.push_str(&format!(
            "    Amount: {}\n",
            line.amount.format_with_symbol(symbol)
        ));
    }

    output.push_str(DIVIDER);
    output.push('\n');
    output.push_str(&format!(
        "SUBTOTAL: {}\n",
        bill.subtotal().format_with_symbol(symbol)
    ));
    if bill.discount().is_positive() {
        output.push_str(&format!(
            "DISCOUNT: -{}\n",
            bill.discount().format_with_symbol(symbol)
        ));
    }
    output.push_str(&format!(
        "*TOTAL DUE: {}*\n",
        bill.net_amount().format_with_symbol(symbol)
    ));
    output.push_str(DIVIDER);
    output.push('\n');
    output.push_str("Thank you for choosing us!\n");
    output.push_str(&format!("Contact: {}\n", settings.contact_email));
    output.push_str(&format!("Website: {}\n", settings.website));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillFormat, CommittedBill, DraftBill, Money, PaymentMode};
    use chrono::{Local, TimeZone};

    fn line(seq: u32, code: &str, name: &str, price: i64, qty: u32) -> LineItem {
        LineItem {
            sequence_no: seq,
            code: Some(code.into()),
            name: name.into(),
            size: "50GM".into(),
            mrp: Some(Money::from_rupees(price + 5)),
            unit_price: Money::from_rupees(price),
            quantity: qty,
            amount: Money::from_rupees(price) * qty,
        }
    }

    fn committed(format: BillFormat, discount: i64) -> CommittedBill {
        let lines = vec![
            line(1, "ALM050", "Almonds", 55, 2),
            line(2, "CSH100", "Cashews", 120, 1),
        ];
        let mut packaging = crate::models::Packaging::new();
        packaging.insert("Almonds".into(), vec!["50GM x 1".into(), "50GM x 1".into()]);
        CommittedBill {
            number: "INV0008".into(),
            timestamp: Local.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap(),
            phone: Some("9876543210".into()),
            format,
            subtotal: lines.iter().map(|l| l.amount).sum(),
            lines,
            packaging,
            discount: Money::from_rupees(discount),
            payment_mode: PaymentMode::Cash,
        }
    }

    #[test]
    fn test_table_columns_follow_format() {
        let compact = format_bill_table(&committed(BillFormat::Compact, 0));
        assert!(compact.contains("S.No."));
        assert!(!compact.contains("Rate"));
        assert!(!compact.contains("ALM050"));
        assert!(compact.contains("TOTAL"));
        assert!(compact.contains("230.00"));

        let full = format_bill_table(&committed(BillFormat::Full, 0));
        assert!(full.contains("MRP"));
        assert!(full.contains("Rate"));
        assert!(full.contains("ALM050"));
        assert!(full.contains("60.00"));
    }

    #[test]
    fn test_console_totals() {
        let settings = Settings::default();
        let plain = format_bill(&committed(BillFormat::Detailed, 0), &settings);
        assert!(plain.contains("BILL INV0008"));
        assert!(plain.contains("Date: 01-03-2024 18:30"));
        assert!(plain.contains("Subtotal: ₹230.00"));
        assert!(!plain.contains("Discount:"));
        assert!(plain.contains("Almonds: 50GM x 1, 50GM x 1"));

        let discounted = format_bill(&committed(BillFormat::Detailed, 30), &settings);
        assert!(discounted.contains("Discount: ₹30.00"));
        assert!(discounted.contains("Total: ₹200.00"));
    }

    #[test]
    fn test_draft_renders_without_number() {
        let mut draft = DraftBill::new(BillFormat::Compact, None);
        draft.lines.push(line(1, "ALM050", "Almonds", 55, 2));
        draft.subtotal = draft.line_total();

        let settings = Settings::default();
        assert!(format_bill(&draft, &settings).contains("FINAL BILL"));
        let message = render_message(&draft, MessageStyle::Simple, &settings);
        assert!(message.contains("BILL #DRAFT"));
        assert!(!message.contains("Date:"));
    }

    #[test]
    fn test_simple_message() {
        let settings = Settings::default();
        let message = render_message(&committed(BillFormat::Compact, 30), MessageStyle::Simple, &settings);

        assert!(message.starts_with("*InvenGo BILL #INV0008*\n"));
        assert!(message.contains("1. Almonds - 50GM x 2 = ₹110.00"));
        assert!(message.contains("*Total: ₹230.00*"));
        assert!(message.contains("*Discount: ₹30.00*"));
        assert!(message.contains("*Final Amount: ₹200.00*"));
        assert!(!message.contains("50GM x 1"));
    }

    #[test]
    fn test_detailed_message_lists_packaging() {
        let settings = Settings::default();
        let message = render_message(&committed(BillFormat::Compact, 0), MessageStyle::Detailed, &settings);

        assert!(message.contains("ITEM DETAILS:"));
        assert!(message.contains("Qty: 2 (50GM x 1, 50GM x 1)"));
        assert!(message.contains("Qty: 1\n"));
        assert!(!message.contains("*Discount"));
        assert!(message.contains(&settings.feedback_url));
    }

    #[test]
    fn test_professional_message_codes_are_optional() {
        let mut settings = Settings::default();
        let bill = committed(BillFormat::Compact, 30);

        let message = render_message(&bill, MessageStyle::Professional, &settings);
        assert!(message.contains("INVOICE #INV0008"));
        assert!(message.contains("DISCOUNT: -₹30.00"));
        assert!(message.contains("*TOTAL DUE: ₹200.00*"));
        assert!(message.contains(&format!("Contact: {}", settings.contact_email)));
        assert!(!message.contains("Code: ALM050"));

        settings.include_full_details = true;
        let message = render_message(&bill, MessageStyle::Professional, &settings);
        assert!(message.contains("Code: ALM050"));
    }
}
