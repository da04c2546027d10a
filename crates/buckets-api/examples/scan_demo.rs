use buckets::logging::LogConfig;
use buckets::{Database, Item, Scanner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Info level shows opens, closes and bucket creation; RUST_LOG=debug adds batch writes
    let _guard = LogConfig::info().init()?;

    let dir = std::env::temp_dir().join("buckets-scan-demo");
    std::fs::create_dir_all(&dir)?;
    let db = Database::open(dir.join("demo.redb"))?;

    println!("=== Buckets Scan Demo ===\n");

    println!("1. Filling `paths`...");
    let paths = db.new_bucket("paths")?;
    let items: Vec<Item> = ["f/", "fo/", "foo/", "foo/bar/", "foo/bar/baz/", "food/", "good/", "goo/"]
        .iter()
        .map(|p| Item::new(*p, p.to_uppercase()))
        .collect();
    paths.insert(&items)?;

    println!("\n2. Prefix scan for `foo/`:");
    for (key, value) in paths.prefix_scanner(b"foo/").item_mapping()? {
        println!("   {} => {}", key, String::from_utf8_lossy(&value));
    }

    println!("\n3. Filling `years` with zero-padded keys...");
    let years = db.new_bucket("years")?;
    for year in (1970..=2010).step_by(5) {
        let value = format!("{:02}", year % 100);
        years.put(year.to_string().as_bytes(), value.as_bytes())?;
    }

    println!("\n4. Range scan for 1990..=2000:");
    let nineties = years.range_scanner(b"1990", b"2000");
    println!("   {} items", nineties.count()?);
    nineties.for_each(|key, value| -> buckets::Result<()> {
        println!(
            "   {} => {}",
            String::from_utf8_lossy(key),
            String::from_utf8_lossy(value)
        );
        Ok(())
    })?;

    db.delete_bucket("paths")?;
    db.delete_bucket("years")?;
    db.close()?;

    println!("\n=== Demo Complete ===");
    Ok(())
}
