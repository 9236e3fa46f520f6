//! Simple reader to inspect GEDCOM files.
//!
//! Usage: `cargo run --example inspect_file -- family.ged [5.5.1|7.0]`

use std::fs;

use gedcom::{Document, GedcomVersion, Person, detect_version, parse, validate_document};

fn describe(person: &Person, doc: &Document) -> String {
    let name = &person.name;
    let mut line = format!("{} {} /{}/", person.id, name.given, name.surname_text());
    if !name.suffix.is_empty() {
        line.push(' ');
        line.push_str(&name.suffix);
    }
    if let Some(date) = &person.birth.date {
        line.push_str(&format!(" b. {}", date));
    }
    if let Some(date) = &person.death.date {
        line.push_str(&format!(" d. {}", date));
    }
    let families: Vec<&str> = person
        .families
        .iter()
        .filter_map(|h| doc.family(h))
        .map(|f| f.id.as_str())
        .collect();
    if !families.is_empty() {
        line.push_str(&format!(" [{}]", families.join(", ")));
    }
    line
}

fn main() {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "family.ged".to_string());

    println!("Reading: {}", path);

    let text = fs::read_to_string(&path).expect("Failed to read file");
    println!("File size: {} bytes", text.len());

    let version: GedcomVersion = match args.next() {
        Some(v) => v.parse().expect("Unsupported version argument"),
        None => detect_version(&text).unwrap_or_default(),
    };
    println!("Version: {}", version);

    let doc = parse(&text, version);

    println!("\n=== Document ===");
    println!("People:       {}", doc.people.len());
    println!("Families:     {}", doc.families.len());
    println!("Sources:      {}", doc.sources.len());
    println!("Repositories: {}", doc.repositories.len());
    println!("Notes:        {}", doc.notes.len());
    println!("Media:        {}", doc.media.len());

    println!("\n=== People (first 20) ===");
    for person in doc.people.iter().take(20) {
        println!("  {}", describe(person, &doc));
    }

    println!("\n=== Families (first 20) ===");
    for family in doc.families.iter().take(20) {
        let name = |h: Option<&gedcom::Handle>| {
            h.and_then(|h| doc.person(h))
                .map(|p| p.id.clone())
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "  {}: {} + {} -> {} children",
            family.id,
            name(family.father.as_ref()),
            name(family.mother.as_ref()),
            family.children.len()
        );
    }

    match validate_document(&doc) {
        Ok(()) => println!("\nValidation: ok"),
        Err(err) => println!("\nValidation: {}", err),
    }
}
