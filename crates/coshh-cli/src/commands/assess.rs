use coshh_core::error::CoshhError;
use coshh_core::AssessmentInput;
use std::path::{Path, PathBuf};

use crate::commands::{load_knowledge_base, task_input};
use crate::output;
use crate::TaskArgs;

pub fn run(
    tables: Option<&Path>,
    h_phrases: Vec<String>,
    signal_word: String,
    input_file: Option<PathBuf>,
    task: &TaskArgs,
    output_format: &str,
    verbose: bool,
) -> Result<(), CoshhError> {
    let kb = load_knowledge_base(tables)?;

    let input = match input_file {
        Some(path) => {
            let json = std::fs::read(&path)?;
            serde_json::from_slice::<AssessmentInput>(&json)?
        }
        None => task_input(task)?.with_hazards(h_phrases, signal_word),
    };

    let assessment = coshh_core::assess(&kb, &input)?;

    match output_format {
        "json" => output::json::print(&assessment)?,
        _ => output::table::print_assessment(&assessment, verbose),
    }

    Ok(())
}
