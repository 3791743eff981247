/// Venusdex API Demo
///
/// Registers a few collections, loads them concurrently and runs
/// free-text and structured queries over the cached records.

use Venusdex::catalog::{self, row::raw_row, Character, CHARACTERS, EVENTS, ITEMS, SWIMSUITS};
use Venusdex::{Config, Language, SearchOptions, StaticSource, Wiki};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   Venusdex Record Cache - API Demo            ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Step 1: Register collections
    let characters = StaticSource::new(vec![
        raw_row(&[("id", "1"), ("name_en", "Kasumi"), ("name_jp", "かすみ"), ("pow", "520"), ("tec", "410"), ("stm", "380"), ("type", "pow")]),
        raw_row(&[("id", "2"), ("name_en", "Ayane"), ("pow", "310"), ("tec", "560"), ("stm", "400"), ("apl", "95"), ("type", "tec")]),
        raw_row(&[("id", "3"), ("name_en", "Honoka"), ("pow", "480"), ("tec", "300"), ("stm", "450"), ("type", "stm")]),
    ]);
    let swimsuits = StaticSource::new(vec![
        raw_row(&[("id", "100"), ("name_en", "Kasumi Sunset"), ("character", "kasumi"), ("rarity", "SSR")]),
        raw_row(&[("id", "101"), ("name_en", "Honoka Bloom"), ("character", "honoka"), ("rarity", "SR")]),
    ]);
    let items = StaticSource::new(vec![
        raw_row(&[("id", "1"), ("name_en", "Sunscreen"), ("category", "Accessory"), ("rarity", "r")]),
    ]);
    let events = StaticSource::new(vec![
        raw_row(&[("id", "7"), ("name_en", "New Year Gacha"), ("type", "gacha"), ("start", "2024-01-10"), ("end", "2024-01-20")]),
        raw_row(&[("id", "8"), ("name_en", "Kasumi Birthday"), ("type", "birthday"), ("start", "2024-02-23"), ("end", "2024-02-29")]),
    ]);

    let wiki = Wiki::new(
        Config::default(),
        vec![
            catalog::characters(characters),
            catalog::swimsuits(swimsuits),
            catalog::items(items),
            catalog::events(events),
        ],
    )?;
    println!("Registered: {:?}\n", wiki.collection_names());

    // Step 2: Load everything at once
    println!("Step 2: LOAD - Loading collections...");
    for (name, result) in wiki.load_all().await {
        match result {
            Ok(records) => println!("  {}: {} records", name, records.len()),
            Err(e) => println!("  {}: failed ({})", name, e),
        }
    }
    println!();

    // Step 3: Query
    println!("Step 3: SEARCH - Querying records...");
    for query in ["kasumi", "pow>450", "tec:500-600", "date:2024-02", "key:honoka-bloom", "date:2024-13 kasumi"] {
        let results = wiki.search(query);
        println!("  '{}': {} results", query, results.total());
        for hit in results.hits() {
            println!("      [{}] {} {}", hit.collection, hit.title, hit.badge.as_deref().unwrap_or(""));
        }
        for error in &results.errors {
            println!("      error: {}", error);
        }
    }
    println!();

    // Japanese titles, every match
    let results = wiki.search_with("かすみ", &SearchOptions::all(Language::Jp));
    println!("  'かすみ' (jp): {} results", results.total());

    // Step 4: Typed access
    println!("\nStep 4: LOOKUP - Typed access...");
    if let Some(kasumi) = wiki.lookup_typed::<Character>(CHARACTERS, "kasumi") {
        println!("  kasumi: POW {} TEC {} STM {}", kasumi.stats.pow, kasumi.stats.tec, kasumi.stats.stm);
    }
    println!("  swimsuits cached: {}", wiki.get(SWIMSUITS).len());
    println!("  items cached: {}", wiki.get(ITEMS).len());
    println!("  events cached: {}", wiki.get(EVENTS).len());

    // Step 5: Statistics
    println!("\nStep 5: STATS");
    let stats = wiki.stats();
    println!("  Cached collections: {}", stats.cache.entry_count);
    println!("  Approx bytes: {}", stats.cache.approx_bytes);
    println!("  Hit rate: {:.1}%", stats.cache.hit_rate() * 100.0);
    for (name, metrics) in &stats.loads {
        println!("  {}: {} rows in {:?} ({:?})", name, metrics.row_count, metrics.parse_duration, metrics.origin);
    }

    // Step 6: Clear
    wiki.clear_cache().await;
    println!("\nCache cleared, 'kasumi' now returns {} results", wiki.search("kasumi").total());

    Ok(())
}
