use coshh_core::error::CoshhError;
use coshh_core::extraction::pdftotext::PdftotextExtractor;
use coshh_core::extraction::{extract_hazard_facts, PlainTextExtractor, TextExtractor};
use std::path::{Path, PathBuf};

use crate::commands::{load_knowledge_base, task_input};
use crate::output;
use crate::TaskArgs;

pub fn run(
    tables: Option<&Path>,
    input_file: PathBuf,
    task: Option<&TaskArgs>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), CoshhError> {
    let kb = load_knowledge_base(tables)?;
    let bytes = std::fs::read(&input_file)?;

    // Anything that is not a PDF is read as text
    let is_pdf = input_file
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    let extractor: Box<dyn TextExtractor> = if is_pdf {
        if !PdftotextExtractor::is_available() {
            return Err(CoshhError::PdftotextNotFound);
        }
        Box::new(PdftotextExtractor::new())
    } else {
        Box::new(PlainTextExtractor)
    };

    if let Some(task) = task {
        let task = task_input(task)?;
        let result = coshh_core::assess_document(&bytes, extractor.as_ref(), &kb, &task)?;
        if let Some(path) = output_file {
            write_json(&path, &result.facts)?;
        }
        match output_format {
            "json" => output::json::print(&result)?,
            _ => {
                output::table::print_facts(&result.facts);
                println!();
                output::table::print_assessment(&result.assessment, false);
            }
        }
        return Ok(());
    }

    let text = extractor.extract_text(&bytes)?;
    let facts = extract_hazard_facts(&text, &kb.hazards);

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            write_json(&path, &facts)?;
            let phrases = facts.h_phrase_codes();
            eprintln!(
                "Extracted {} H-phrase(s), written to {}",
                phrases.len(),
                path.display()
            );
            if !facts.chemical_name.is_found() {
                eprintln!("  warning: no chemical name found");
            }
            if phrases.is_empty() {
                eprintln!("  warning: no H-phrases found");
            }
        }
        None => match output_format {
            "json" => output::json::print(&facts)?,
            _ => output::table::print_facts(&facts),
        },
    }

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), CoshhError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
