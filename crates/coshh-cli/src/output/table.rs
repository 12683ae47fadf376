use coshh_core::extraction::HazardFacts;
use coshh_core::inventory::{HazardProfile, InventoryRecord};
use coshh_core::model::Extracted;
use coshh_core::Assessment;

pub fn print_assessment(a: &Assessment, verbose: bool) {
    println!(
        "=== Control band {} ({}) ===\n",
        a.control_band,
        a.control_band.approach()
    );

    println!("  Severity:        {} / 5", a.severity);
    println!(
        "  Likelihood:      {} / 10 ({})",
        a.likelihood, a.likelihood_band
    );
    println!(
        "  Hazard group:    {} ({})",
        a.hazard_group,
        a.hazard_group.description()
    );
    println!("  Quantity:        {} ({})", a.quantity, a.quantity_group);
    println!("  Dustiness/volatility: {}", a.physical_characteristics);
    if let Some(ref procedure) = a.procedure {
        println!("  Procedure:       {procedure}");
    }
    println!();

    if !a.hazard_classes.is_empty() {
        let classes: Vec<&str> = a.hazard_classes.iter().map(|c| c.label()).collect();
        println!("  Hazard classes:  {}", classes.join(", "));
    }
    if !a.exposure_routes.is_empty() {
        let routes: Vec<String> = a.exposure_routes.iter().map(|r| r.to_string()).collect();
        println!("  Exposure routes: {}", routes.join(", "));
    }
    println!();

    println!("  Controls:");
    println!("    General:   {}", a.controls.general);
    println!("    PPE sheet: {}", a.controls.ppe_sheet);
    println!("    {}", a.controls.ppe_text);
    println!();

    if verbose {
        let s = &a.severity_detail;
        match (&s.determining_phrase, s.phrase_severity) {
            (Some(phrase), Some(sev)) => {
                println!("  Severity from phrases: {sev} (determined by {phrase})")
            }
            (None, Some(sev)) => println!("  Severity from phrases: {sev} (table default)"),
            _ => println!("  Severity from phrases: none given"),
        }
        println!(
            "  Severity from signal word ({}): {}",
            a.signal_word, s.signal_severity
        );
        if !s.unmatched_phrases.is_empty() {
            println!("  Phrases not in table: {}", s.unmatched_phrases.join(", "));
        }

        let l = &a.likelihood_detail;
        println!(
            "  Likelihood: procedure {} + quantity {} + frequency {} + duration {} = {}",
            l.procedure, l.quantity, l.frequency, l.duration, l.total
        );
        println!();

        println!("  Reasoning:");
        for reason in &a.reasons {
            println!("    - {reason}");
        }
        println!();
    }
}

fn field<T: std::fmt::Display>(label: &str, value: &Extracted<T>) {
    match &value.value {
        Some(v) => println!("  {:<22} {} ({})", label, v, value.confidence),
        None => println!("  {:<22} not found", label),
    }
}

fn list_field(label: &str, value: &Extracted<Vec<String>>) {
    match &value.value {
        Some(v) => println!("  {:<22} {} ({})", label, v.join(", "), value.confidence),
        None => println!("  {:<22} not found", label),
    }
}

fn section_field(label: &str, value: &Extracted<String>, max_lines: usize) {
    match &value.value {
        Some(text) => {
            println!("  {} ({}):", label, value.confidence);
            let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
            for line in lines.iter().take(max_lines) {
                println!("    {}", line.trim());
            }
            if lines.len() > max_lines {
                println!("    ... ({} more line(s))", lines.len() - max_lines);
            }
        }
        None => println!("  {:<22} not found", format!("{label}:")),
    }
}

pub fn print_facts(facts: &HazardFacts) {
    println!("=== Safety data sheet ===\n");
    field("Chemical name:", &facts.chemical_name);
    field("CAS number:", &facts.cas_number);
    field("Signal word:", &facts.signal_word);
    list_field("H-phrases:", &facts.h_phrases);
    list_field("P-phrases:", &facts.p_phrases);
    list_field("Pictograms:", &facts.pictograms);
    println!();

    section_field("First aid", &facts.first_aid, 6);
    section_field("Handling and storage", &facts.handling_and_storage, 6);
    section_field("Accidental release", &facts.spillage, 6);
    field("Disposal:", &facts.disposal);
}

pub fn print_inventory(records: &[&InventoryRecord], profiles: &[HazardProfile]) {
    if records.is_empty() {
        println!("No matching inventory records.");
        return;
    }

    let max_name = records
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(10)
        .max(4);

    println!(
        "  {:<width$}  {:<12}  {:<3}  {:<5}  {:<10}  Location",
        "Name",
        "CAS",
        "Sev",
        "Group",
        "Size",
        width = max_name
    );
    println!("  {}", "-".repeat(max_name + 50));

    for (record, profile) in records.iter().zip(profiles) {
        let location = match (&record.location, &record.sublocation) {
            (Some(loc), Some(sub)) => format!("{loc} / {sub}"),
            (Some(loc), None) => loc.clone(),
            (None, Some(sub)) => sub.clone(),
            (None, None) => "-".into(),
        };
        println!(
            "  {:<width$}  {:<12}  {:<3}  {:<5}  {:<10}  {}",
            record.name,
            record.cas_number.as_deref().unwrap_or("-"),
            profile.severity.to_string(),
            profile.hazard_group.to_string(),
            record.size_label().unwrap_or_else(|| "-".into()),
            location,
            width = max_name
        );
        if !profile.hazard_classes.is_empty() {
            let classes: Vec<&str> = profile.hazard_classes.iter().map(|c| c.label()).collect();
            println!("  {:<width$}  {}", "", classes.join(", "), width = max_name);
        }
    }

    let specialist = profiles
        .iter()
        .filter(|p| p.hazard_group.is_specialist())
        .count();
    println!(
        "\n  {} record(s), {} needing a specialist assessment",
        records.len(),
        specialist
    );
}
