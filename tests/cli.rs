use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn invengo(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("invengo").unwrap();
    cmd.env("INVENGO_DATA_DIR", dir.path()).env_remove("INVENGO_LOG");
    cmd
}

fn shop_with_almonds() -> TempDir {
    let dir = TempDir::new().unwrap();
    invengo(&dir).arg("init").assert().success();
    invengo(&dir)
        .args([
            "stock", "add", "alm050", "Almonds", "--category", "Dry Fruits", "--size", "50",
            "--price", "55", "--mrp", "60", "--stock", "10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added item: Almonds (ALM050)"));
    dir
}

#[test]
fn commands_require_init() {
    let dir = TempDir::new().unwrap();
    invengo(&dir)
        .args(["stock", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invengo init"));
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    invengo(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workbook created"));
    invengo(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("left unchanged"));
}

#[test]
fn malformed_phone_is_rejected_before_entry() {
    let dir = shop_with_almonds();

    invengo(&dir)
        .args(["bill", "new", "--phone", "call me", "--payment", "cash", "--discount", "0"])
        .write_stdin("ALM050\n1\nSTOP\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Item code").not())
        .stderr(predicate::str::contains("Invalid phone number"));

    invengo(&dir)
        .args(["stock", "show", "ALM050"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Balance:    10"));
}

#[test]
fn empty_phone_means_no_customer() {
    let dir = shop_with_almonds();

    invengo(&dir)
        .args(["bill", "new", "--phone", "", "--payment", "digital", "--discount", "0"])
        .write_stdin("ALM050\n1\nSTOP\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bill INV0001 saved."))
        .stdout(predicate::str::contains("Phone:").not());
}

#[test]
fn bill_from_stdin_updates_every_ledger() {
    let dir = shop_with_almonds();

    invengo(&dir)
        .args(["bill", "new", "--phone", "9876543210", "--payment", "cash", "--discount", "10"])
        .write_stdin("ALM050\n4\nSTOP\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bill INV0001 saved."))
        .stdout(predicate::str::contains("Discount: ₹10.00"));

    invengo(&dir)
        .args(["stock", "show", "ALM050"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Balance:    6"));

    invengo(&dir)
        .args(["accounts", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("₹220.00"))
        .stdout(predicate::str::contains("₹210.00"));

    invengo(&dir)
        .args(["bill", "find", "98765 43210"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total spent: ₹210.00"))
        .stdout(predicate::str::contains("INV0001"));

    invengo(&dir)
        .args(["bill", "show", "inv0001", "--style", "simple"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*Final Amount: ₹210.00*"));
}

#[test]
fn stop_first_issues_no_number() {
    let dir = shop_with_almonds();

    invengo(&dir)
        .args(["bill", "new", "--payment", "cash", "--discount", "0"])
        .write_stdin("STOP\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bill cancelled"));

    invengo(&dir)
        .args(["bill", "new", "--payment", "digital", "--discount", "0"])
        .write_stdin("ALM050\n1\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bill INV0001 saved."));
}

#[test]
fn shortage_override_goes_negative() {
    let dir = shop_with_almonds();

    invengo(&dir)
        .args(["bill", "new", "--payment", "cash", "--discount", "0"])
        .write_stdin("ALM050\n15\ny\nSTOP\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("will be negative (-5)"));

    invengo(&dir)
        .args(["stock", "show", "ALM050"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Balance:    -5"));
}

#[test]
fn send_writes_outbox_message() {
    let dir = shop_with_almonds();

    invengo(&dir)
        .args([
            "bill", "new", "--phone", "9876543210", "--payment", "digital", "--discount", "0",
            "--send", "--style", "professional",
        ])
        .write_stdin("ALM050\n2\nSTOP\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://wa.me/919876543210"));

    let message = std::fs::read_to_string(dir.path().join("outbox").join("INV0001.txt")).unwrap();
    assert!(message.contains("INVOICE #INV0001"));
    assert!(message.contains("*TOTAL DUE: ₹110.00*"));
}

#[test]
fn restock_and_expenses() {
    let dir = shop_with_almonds();

    invengo(&dir)
        .args(["stock", "restock", "ALM050", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Balance: 15"));
    invengo(&dir)
        .args(["stock", "restock", "ALM050", "0"])
        .assert()
        .failure();
    invengo(&dir)
        .args(["stock", "restock", "NOPE", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown item code: NOPE"));

    invengo(&dir)
        .args(["accounts", "expense", "250", "Packing tape", "--date", "2024-03-01"])
        .assert()
        .success();
    invengo(&dir)
        .args(["accounts", "expenses"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Packing tape"))
        .stdout(predicate::str::contains("₹250.00"));
}

#[test]
fn import_and_export() {
    let dir = shop_with_almonds();
    let csv_path = dir.path().join("catalog.csv");
    std::fs::write(
        &csv_path,
        "Code,Name,Category,Size,Price,Stock\n\
         CSH100,Cashews,Dry Fruits,100,120,=40+10\n\
         ALM050,Almonds,Dry Fruits,50,55,1\n",
    )
    .unwrap();

    invengo(&dir)
        .args(["import", csv_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported:    1"))
        .stdout(predicate::str::contains("Skipped:     1"));

    let stock_csv = dir.path().join("stock.csv");
    invengo(&dir)
        .args(["export", "stock", stock_csv.to_str().unwrap()])
        .assert()
        .success();
    let exported = std::fs::read_to_string(&stock_csv).unwrap();
    assert!(exported.contains("CSH100"));
    assert!(exported.contains(",50,0,50"));

    let snapshot = dir.path().join("snapshot.yaml");
    invengo(&dir)
        .args(["export", "all", snapshot.to_str().unwrap(), "--format", "yaml"])
        .assert()
        .success();
    assert!(std::fs::read_to_string(&snapshot)
        .unwrap()
        .starts_with("# InvenGo ledger snapshot"));
}

#[test]
fn history_lists_journal() {
    let dir = shop_with_almonds();

    invengo(&dir)
        .args(["history", "--entity", "item"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ALM050"));
    invengo(&dir)
        .args(["history", "--entity", "bogus"])
        .assert()
        .failure();
}
