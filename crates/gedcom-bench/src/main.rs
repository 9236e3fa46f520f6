//! Benchmark for GEDCOM generate/parse using a synthetic family tree.
//!
//! Usage:
//!   bench-family-tree [PEOPLE]          synthetic tree with PEOPLE people
//!   bench-family-tree --json doc.json   load a serialized Document instead

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use gedcom::{
    Document, DocumentBuilder, GedcomVersion, Gender, Handle, PrimaryName, generate, new_handle,
    parse, validate_document,
};
use serde::Serialize;

// =============================================================================
// SYNTHETIC DATA
// =============================================================================

const GIVEN_MALE: [&str; 8] = ["John", "William", "James", "George", "Charles", "Thomas", "Henry", "Edward"];
const GIVEN_FEMALE: [&str; 8] = ["Mary", "Anna", "Elizabeth", "Margaret", "Sarah", "Emma", "Alice", "Clara"];
const SURNAMES: [&str; 10] = ["Smith", "Miller", "Schmidt", "Dubois", "Rossi", "Novak", "Jensen", "Kowalski", "Silva", "Murphy"];
const PLACES: [&str; 6] = ["Boston, MA", "Cork, Ireland", "Hamburg, Germany", "Lyon, France", "Kraków, Poland", "Porto, Portugal"];
const MONTHS: [&str; 12] = ["JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC"];

fn birth_date(i: usize, generation: usize) -> String {
    format!("{} {} {}", 1 + i % 28, MONTHS[i % 12], 1800 + generation * 25 + i % 10)
}

struct Couple {
    family: Handle,
    husband: Handle,
    wife: Handle,
    children: Vec<Handle>,
}

/// Builds generations of couples; every person after the first couple is a
/// child of a couple in the previous generation.
fn build_tree(people: usize) -> Document {
    let mut builder = DocumentBuilder::new();
    let mut couples: Vec<Couple> = Vec::new();
    let mut previous: std::ops::Range<usize> = 0..0;
    let mut count = 0;
    let mut generation = 0;

    while count < people {
        let parents = previous.clone();
        let slots = if parents.is_empty() { 1 } else { parents.len() * 2 };
        let first = couples.len();

        for slot in 0..slots {
            if count >= people {
                break;
            }
            let couple = Couple {
                family: new_handle(),
                husband: new_handle(),
                wife: new_handle(),
                children: Vec::new(),
            };

            for (handle, gender) in [(couple.husband, Gender::Male), (couple.wife, Gender::Female)] {
                let i = count;
                let given = match gender {
                    Gender::Male => GIVEN_MALE[i % GIVEN_MALE.len()],
                    _ => GIVEN_FEMALE[i % GIVEN_FEMALE.len()],
                };
                let surname = SURNAMES[(i / 2) % SURNAMES.len()];
                let date = birth_date(i, generation);
                builder = builder.person(handle, |p| {
                    p.primary_name(PrimaryName::new(given, surname))
                        .gender(gender)
                        .birth(Some(&date), Some(PLACES[i % PLACES.len()]))
                });
                count += 1;
            }

            if !parents.is_empty() {
                let parent = parents.start + slot / 2;
                couples[parent].children.push(couple.husband);
            }
            couples.push(couple);
        }

        previous = first..couples.len();
        generation += 1;
    }

    for couple in &couples {
        builder = builder.family(couple.family, |f| {
            couple
                .children
                .iter()
                .fold(f.father(couple.husband).mother(couple.wife), |f, &child| f.child(child))
        });
    }

    builder
        .note(new_handle(), "Synthetic tree.\nGenerated for benchmarking.")
        .build()
}

// =============================================================================
// REPORT
// =============================================================================

#[derive(Debug, Serialize)]
struct VersionReport {
    version: String,
    bytes: usize,
    lines: usize,
    generate_ms: f64,
    parse_ms: f64,
    generate_mb_per_s: f64,
    parse_mb_per_s: f64,
}

#[derive(Debug, Serialize)]
struct BenchReport {
    people: usize,
    families: usize,
    valid: bool,
    versions: Vec<VersionReport>,
}

fn mb_per_s(bytes: usize, elapsed: Duration) -> f64 {
    (bytes as f64 / 1_000_000.0) / elapsed.as_secs_f64()
}

const PARSE_ITERS: u32 = 5;

fn bench_version(doc: &Document, version: GedcomVersion) -> VersionReport {
    let generate_start = Instant::now();
    let text = generate(doc, version);
    let generate_time = generate_start.elapsed();

    // Warmup
    let _ = parse(&text, version);

    let parse_start = Instant::now();
    let mut parsed = None;
    for _ in 0..PARSE_ITERS {
        parsed = Some(parse(&text, version));
    }
    let parse_time = parse_start.elapsed() / PARSE_ITERS;

    if let Some(parsed) = parsed {
        assert_eq!(parsed.people.len(), doc.people.len());
        assert_eq!(parsed.families.len(), doc.families.len());
    }

    println!("\n{}: {} bytes, {} lines", version, text.len(), text.lines().count());
    println!("  Generate: {:?} ({:.2} MB/s)", generate_time, mb_per_s(text.len(), generate_time));
    println!(
        "  Parse:    {:?} avg of {} ({:.2} MB/s)",
        parse_time,
        PARSE_ITERS,
        mb_per_s(text.len(), parse_time)
    );

    VersionReport {
        version: version.to_string(),
        bytes: text.len(),
        lines: text.lines().count(),
        generate_ms: generate_time.as_secs_f64() * 1000.0,
        parse_ms: parse_time.as_secs_f64() * 1000.0,
        generate_mb_per_s: mb_per_s(text.len(), generate_time),
        parse_mb_per_s: mb_per_s(text.len(), parse_time),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let doc = match args.as_slice() {
        [flag, path] if flag == "--json" => {
            println!("Loading document from: {}", path);
            let json = fs::read_to_string(Path::new(path)).expect("Failed to read JSON document");
            serde_json::from_str::<Document>(&json).expect("Failed to parse JSON document")
        }
        [count] => build_tree(count.parse().expect("PEOPLE must be a number")),
        _ => build_tree(50_000),
    };

    println!("People: {}, families: {}", doc.people.len(), doc.families.len());

    let valid = match validate_document(&doc) {
        Ok(()) => true,
        Err(err) => {
            println!("Validation: {}", err);
            false
        }
    };

    let versions = [GedcomVersion::V5_5_1, GedcomVersion::V7_0]
        .into_iter()
        .map(|v| bench_version(&doc, v))
        .collect();

    let report = BenchReport {
        people: doc.people.len(),
        families: doc.families.len(),
        valid,
        versions,
    };

    println!("\n=== Summary (JSON) ===");
    println!("{}", serde_json::to_string_pretty(&report).expect("Failed to serialize report"));
}
